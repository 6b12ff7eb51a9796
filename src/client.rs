//! Granola API client
//!
//! [`GranolaClient`] is the call surface: it turns a [`RequestSpec`] into a
//! typed value by running it through the transport and the decoder. The
//! endpoint methods in `endpoints.rs` are thin wrappers over these calls.

use crate::auth::{default_provider, Authenticator, StaticToken, TokenProvider};
use crate::decode::{decode, decode_array, decode_object, Decoded, ResponseShape};
use crate::error::Result;
use crate::http::{Attempt, HttpClient, RequestSpec, RetryPolicy};
use crate::options::ClientOptions;
use crate::pagination::{paginate, Page};
use crate::types::{JsonObject, JsonValue};
use bytes::Bytes;
use futures::Stream;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Client for the Granola API
///
/// Cheap to clone; clones share one connection pool and credential cache.
#[derive(Clone, Debug)]
pub struct GranolaClient {
    http: Arc<HttpClient>,
}

impl GranolaClient {
    /// Create a client with default options
    ///
    /// With no token, the desktop app's token file is used where the
    /// platform has one; elsewhere requests go out unauthenticated.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(token) = token {
            builder = builder.token(token);
        }
        builder.build()
    }

    /// Create a client builder
    pub fn builder() -> GranolaClientBuilder {
        GranolaClientBuilder::default()
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Run a call and decode a top-level object
    pub async fn call<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let body = self.http.execute(&spec).await?;
        decode_object(&body)
    }

    /// Run a call and decode a top-level array
    pub async fn call_list<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<Vec<T>> {
        let body = self.http.execute(&spec).await?;
        decode_array(&body)
    }

    /// Run a call and decode the given shape
    pub async fn call_shaped<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        shape: ResponseShape,
    ) -> Result<Decoded<T>> {
        let body = self.http.execute(&spec).await?;
        decode(&body, shape)
    }

    /// Run a call and return the raw 2xx body
    pub async fn call_raw(&self, spec: RequestSpec) -> Result<Bytes> {
        self.http.execute(&spec).await
    }

    /// Like [`call_raw`](Self::call_raw), also returning every attempt made
    pub async fn call_traced(&self, spec: RequestSpec) -> (Result<Bytes>, Vec<Attempt>) {
        let mut attempts = Vec::new();
        let result = self.http.execute_traced(&spec, &mut attempts).await;
        (result, attempts)
    }

    /// Run a call whose response body is irrelevant
    pub async fn call_void(&self, spec: RequestSpec) -> Result<()> {
        self.http.execute(&spec).await.map(|_| ())
    }

    /// GET `path` and return the body as text
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let body = self.http.execute(&RequestSpec::get(path)).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Walk a cursor-paginated POST endpoint
    ///
    /// `body` is sent on every page; the cursor of the previous page is added
    /// as `cursor`. `R` is the page envelope the endpoint answers with.
    pub fn stream<R, T>(
        &self,
        path: &str,
        body: JsonObject,
    ) -> impl Stream<Item = Result<T>> + Send + 'static
    where
        R: DeserializeOwned + Into<Page<T>> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.clone();
        let path = path.to_string();

        paginate(move |cursor: Option<String>| {
            let client = client.clone();
            let path = path.clone();
            let mut body = body.clone();
            if let Some(cursor) = cursor {
                body.insert("cursor".to_string(), JsonValue::String(cursor));
            }

            async move {
                let spec = RequestSpec::post(path).json(JsonValue::Object(body));
                client.call::<R>(spec).await.map(Into::into)
            }
        })
    }
}

/// Builder for [`GranolaClient`]
pub struct GranolaClientBuilder {
    options: ClientOptions,
    provider: Option<Arc<dyn TokenProvider>>,
    discover_token: bool,
    retry_policy: Option<RetryPolicy>,
}

impl Default for GranolaClientBuilder {
    fn default() -> Self {
        Self {
            options: ClientOptions::default(),
            provider: None,
            discover_token: true,
            retry_policy: None,
        }
    }
}

impl GranolaClientBuilder {
    /// Use a fixed bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.provider = Some(Arc::new(StaticToken::new(token)));
        self
    }

    /// Use a custom token provider
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set client options
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the base URL from the options
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = url.into();
        self
    }

    /// Replace the retry policy derived from the options
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Do not fall back to the desktop app's token file
    pub fn without_token_discovery(mut self) -> Self {
        self.discover_token = false;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GranolaClient> {
        let mut config = self.options.http_config()?;
        if let Some(policy) = self.retry_policy {
            config.retry = policy;
        }

        let provider = match self.provider {
            Some(provider) => Some(provider),
            None if self.discover_token => default_provider(),
            None => None,
        };

        let http = HttpClient::with_auth(config, Authenticator::new(provider))?;
        Ok(GranolaClient {
            http: Arc::new(http),
        })
    }
}
