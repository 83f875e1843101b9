//! HTTP client for the documentation server API.
//!
//! Wraps a `reqwest::Client`: requests under `/v1/` carry the bearer token
//! and a `401` on anything but the login/logout endpoints is reported as
//! [`ApiError::Unauthorized`] after running the optional hook.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path prefix of authenticated API routes
pub const API_PREFIX: &str = "/v1/";

/// Version endpoint
pub const VERSION_PATH: &str = "/v1/version";

/// Endpoints whose `401` belongs to the caller
const AUTH_ENDPOINTS: &[&str] = &["/iam/login", "/iam/logout"];

/// Errors from the API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required for {path}")]
    Unauthorized { path: String },

    #[error("API request to {path} failed with status {status}")]
    Status { path: String, status: StatusCode },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response of the version endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)
    }
}

type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Request-decorating API client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
            on_unauthorized: None,
        }
    }

    /// Attach a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Run `hook` with the request path whenever a protected call returns 401
    pub fn on_unauthorized(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Build API URL
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, adding the bearer token for API routes
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));

        match &self.token {
            Some(token) if path.starts_with(API_PREFIX) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Send a request built with [`ApiClient::request`]
    pub async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        self.check_auth(path, response)
    }

    fn check_auth(&self, path: &str, response: Response) -> Result<Response, ApiError> {
        if response.status() != StatusCode::UNAUTHORIZED || is_auth_endpoint(path) {
            return Ok(response);
        }

        tracing::warn!(path, "Authentication required (401)");
        if let Some(hook) = &self.on_unauthorized {
            hook(path);
        }

        Err(ApiError::Unauthorized {
            path: path.to_string(),
        })
    }

    /// Query the server version
    pub async fn version(&self) -> Result<VersionInfo, ApiError> {
        let response = self
            .send(VERSION_PATH, self.request(Method::GET, VERSION_PATH))
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                path: VERSION_PATH.to_string(),
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }
}

fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}
