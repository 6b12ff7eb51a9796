//! Client identity header block
//!
//! The API expects the desktop app's identity on every request. The block is
//! built once from configuration and installed as default headers on the
//! connection pool.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use sysinfo::System;

/// App version reported when none is configured
pub const DEFAULT_APP_VERSION: &str = "6.4.0";

/// Identity metadata sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub app_version: String,
    pub client_type: String,
    /// Node-style platform name (`darwin`, `win32`, `linux`)
    pub platform: String,
    /// Node-style architecture name (`arm64`, `x64`)
    pub architecture: String,
    pub electron_version: String,
    pub chrome_version: String,
    pub node_version: String,
    pub os_version: String,
    pub os_build: String,
    /// Additional headers appended after the identity block
    pub extra: BTreeMap<String, String>,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            app_version: DEFAULT_APP_VERSION.to_string(),
            client_type: "electron".to_string(),
            platform: detect_platform().to_string(),
            architecture: detect_architecture().to_string(),
            electron_version: "33.4.5".to_string(),
            chrome_version: "130.0.6723.191".to_string(),
            node_version: "20.18.3".to_string(),
            os_version: detect_os_version(),
            os_build: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl ClientIdentity {
    /// Identity headers in send order; empty values are skipped
    pub fn headers(&self) -> Vec<(String, String)> {
        let block = [
            ("X-App-Version", &self.app_version),
            ("X-Client-Type", &self.client_type),
            ("X-Client-Platform", &self.platform),
            ("X-Client-Architecture", &self.architecture),
            ("X-Electron-Version", &self.electron_version),
            ("X-Chrome-Version", &self.chrome_version),
            ("X-Node-Version", &self.node_version),
            ("X-OS-Version", &self.os_version),
            ("X-OS-Build", &self.os_build),
        ];

        block
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.to_string(), value.clone()))
            .chain(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }

    /// User agent derived from the identity
    pub fn user_agent(&self) -> String {
        format!(
            "Granola/{} Electron/{} ({})",
            self.app_version, self.electron_version, self.platform
        )
    }

    /// Validated header map for the connection pool
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in self.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("invalid header name '{name}': {e}")))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|e| Error::config(format!("invalid value for header '{name}': {e}")))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

fn detect_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// OS release as reported by the platform, falling back to the kernel version
///
/// Empty when neither can be read, in which case no header is sent.
pub(crate) fn detect_os_version() -> String {
    System::os_version()
        .or_else(System::kernel_version)
        .map(|version| version.trim().to_string())
        .unwrap_or_default()
}

fn detect_architecture() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

#[cfg(test)]
mod identity_tests {
    use super::*;

    #[test]
    fn test_default_identity_headers() {
        let identity = ClientIdentity::default();
        let headers = identity.headers();

        assert!(headers.contains(&("X-App-Version".to_string(), "6.4.0".to_string())));
        assert!(headers.contains(&("X-Client-Type".to_string(), "electron".to_string())));
        assert_eq!(identity.os_version, detect_os_version());
    }

    #[test]
    fn test_default_identity_sends_detected_os_version() {
        let detected = detect_os_version();
        if detected.is_empty() {
            // Platform exposes neither an OS release nor a kernel version
            return;
        }

        let headers = ClientIdentity::default().headers();
        assert!(headers.contains(&("X-OS-Version".to_string(), detected)));
    }

    #[test]
    fn test_empty_values_not_sent() {
        let identity = ClientIdentity {
            os_version: String::new(),
            os_build: String::new(),
            ..ClientIdentity::default()
        };
        let headers = identity.headers();

        assert!(!headers.iter().any(|(name, _)| name == "X-OS-Version"));
        assert!(!headers.iter().any(|(name, _)| name == "X-OS-Build"));
    }

    #[test]
    fn test_extra_headers_appended() {
        let mut identity = ClientIdentity::default();
        identity
            .extra
            .insert("X-Trace".to_string(), "abc".to_string());

        let headers = identity.headers();
        assert_eq!(
            headers.last(),
            Some(&("X-Trace".to_string(), "abc".to_string()))
        );
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let mut identity = ClientIdentity::default();
        identity.app_version = "6.4.0\n".to_string();
        assert!(identity.header_map().is_err());
    }

    #[test]
    fn test_user_agent() {
        let identity = ClientIdentity {
            platform: "darwin".to_string(),
            ..ClientIdentity::default()
        };
        assert_eq!(identity.user_agent(), "Granola/6.4.0 Electron/33.4.5 (darwin)");
    }
}
