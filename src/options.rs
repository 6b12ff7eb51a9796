//! Client options
//!
//! User-facing configuration for [`GranolaClient`](crate::GranolaClient),
//! loadable from YAML or JSON. Both snake_case and the desktop app's
//! camelCase spellings are accepted. Options are lowered into an
//! [`HttpClientConfig`] once, when the client is built.

use crate::error::{Error, Result, ResultExt};
use crate::http::{ClientIdentity, HttpClientConfig, RateLimiterConfig, DEFAULT_APP_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.granola.ai";

/// Options for building a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms", alias = "timeout", alias = "timeoutMs")]
    pub timeout_ms: u64,

    /// Retries after the first attempt
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_app_version", alias = "appVersion")]
    pub app_version: String,

    #[serde(default = "default_client_type", alias = "clientType")]
    pub client_type: String,

    /// Auto-detected when absent
    #[serde(default, alias = "clientPlatform")]
    pub client_platform: Option<String>,

    /// Auto-detected when absent
    #[serde(default, alias = "clientArchitecture")]
    pub client_architecture: Option<String>,

    #[serde(default = "default_electron_version", alias = "electronVersion")]
    pub electron_version: String,

    #[serde(default = "default_chrome_version", alias = "chromeVersion")]
    pub chrome_version: String,

    #[serde(default = "default_node_version", alias = "nodeVersion")]
    pub node_version: String,

    #[serde(default, alias = "osVersion")]
    pub os_version: Option<String>,

    #[serde(default, alias = "osBuild")]
    pub os_build: String,

    /// Extra headers sent after the identity block
    #[serde(default, alias = "clientHeaders")]
    pub client_headers: BTreeMap<String, String>,

    /// Client-side rate limit; disabled when absent
    #[serde(default, alias = "rateLimit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_retries() -> u32 {
    3
}

fn default_app_version() -> String {
    DEFAULT_APP_VERSION.to_string()
}

fn default_client_type() -> String {
    "electron".to_string()
}

fn default_electron_version() -> String {
    "33.4.5".to_string()
}

fn default_chrome_version() -> String {
    "130.0.6723.191".to_string()
}

fn default_node_version() -> String {
    "20.18.3".to_string()
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            app_version: default_app_version(),
            client_type: default_client_type(),
            client_platform: None,
            client_architecture: None,
            electron_version: default_electron_version(),
            chrome_version: default_chrome_version(),
            node_version: default_node_version(),
            os_version: None,
            os_build: String::new(),
            client_headers: BTreeMap::new(),
            rate_limit: None,
        }
    }
}

impl ClientOptions {
    /// Parse options from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse options YAML: {e}")))
    }

    /// Parse options from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse options JSON: {e}")))
    }

    /// Load options from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file '{}'", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Identity header block described by these options
    pub fn identity(&self) -> ClientIdentity {
        let detected = ClientIdentity::default();
        ClientIdentity {
            app_version: self.app_version.clone(),
            client_type: self.client_type.clone(),
            platform: self.client_platform.clone().unwrap_or(detected.platform),
            architecture: self
                .client_architecture
                .clone()
                .unwrap_or(detected.architecture),
            electron_version: self.electron_version.clone(),
            chrome_version: self.chrome_version.clone(),
            node_version: self.node_version.clone(),
            os_version: self.os_version.clone().unwrap_or(detected.os_version),
            os_build: self.os_build.clone(),
            extra: self.client_headers.clone(),
        }
    }

    /// Validate and lower into transport configuration
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base URL '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout must be greater than zero"));
        }

        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.as_str())
            .timeout(self.timeout())
            .max_retries(self.retries)
            .identity(self.identity());
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, "https://api.granola.ai");
        assert_eq!(options.timeout(), Duration::from_secs(10));
        assert_eq!(options.retries, 3);
        assert_eq!(options.app_version, "6.4.0");

        // Empty document gives the same defaults
        assert_eq!(ClientOptions::from_yaml_str("{}").unwrap(), options);
    }

    #[test]
    fn test_camel_case_aliases() {
        let options = ClientOptions::from_json_str(
            r#"{
                "baseUrl": "http://localhost:8080",
                "timeout": 2500,
                "appVersion": "7.0.0",
                "clientPlatform": "darwin",
                "clientHeaders": {"X-Trace": "1"}
            }"#,
        )
        .unwrap();

        assert_eq!(options.base_url, "http://localhost:8080");
        assert_eq!(options.timeout_ms, 2500);
        assert_eq!(options.app_version, "7.0.0");
        assert_eq!(options.client_platform.as_deref(), Some("darwin"));
        assert_eq!(options.client_headers.get("X-Trace").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_yaml_with_rate_limit() {
        let options = ClientOptions::from_yaml_str(
            r#"
base_url: https://api.granola.ai
retries: 1
rate_limit:
  requests_per_second: 2
  burst_size: 4
"#,
        )
        .unwrap();

        let config = options.http_config().unwrap();
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
    }

    #[test]
    fn test_identity_overrides_and_detection() {
        let options = ClientOptions {
            client_architecture: Some("arm64".to_string()),
            os_build: "24A335".to_string(),
            ..ClientOptions::default()
        };
        let identity = options.identity();

        assert_eq!(identity.architecture, "arm64");
        assert_eq!(identity.os_build, "24A335");
        assert_eq!(identity.platform, ClientIdentity::default().platform);
        assert_eq!(identity.os_version, ClientIdentity::default().os_version);
    }

    #[test]
    fn test_os_version_override() {
        let options = ClientOptions::from_yaml_str("osVersion: \"15.1\"").unwrap();
        let identity = options.identity();

        assert_eq!(identity.os_version, "15.1");
        assert!(identity
            .headers()
            .contains(&("X-OS-Version".to_string(), "15.1".to_string())));
    }

    #[test]
    fn test_http_config_rejects_bad_url() {
        let options = ClientOptions {
            base_url: "not a url".to_string(),
            ..ClientOptions::default()
        };
        let err = options.http_config().unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));

        let options = ClientOptions {
            base_url: "ftp://api.granola.ai".to_string(),
            ..ClientOptions::default()
        };
        assert!(options.http_config().is_err());
    }

    #[test]
    fn test_http_config_rejects_zero_timeout() {
        let options = ClientOptions {
            timeout_ms: 0,
            ..ClientOptions::default()
        };
        assert!(options.http_config().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("granola.yaml");
        std::fs::write(&yaml_path, "retries: 5\n").unwrap();
        assert_eq!(ClientOptions::from_file(&yaml_path).unwrap().retries, 5);

        let json_path = dir.path().join("granola.json");
        std::fs::write(&json_path, r#"{"retries": 0}"#).unwrap();
        assert_eq!(ClientOptions::from_file(&json_path).unwrap().retries, 0);

        let err = ClientOptions::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read options file"));
    }
}
