//! Authenticated requests to the Probe Dock API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use tracing::debug;

use crate::error::{ProbeDockError, ProbeDockResult};

/// User agent for API requests.
pub const USER_AGENT_VALUE: &str = concat!("probedock-core/", env!("CARGO_PKG_VERSION"));

/// A request to a resource of the API.
///
/// The target URL is never given directly: it is the API root (`api_url`)
/// joined with the resource `path`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: reqwest::Method,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub path: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: reqwest::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            api_url: None,
            api_token: None,
            path: Some(path.into()),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Full URL of the resource.
    pub fn url(&self) -> ProbeDockResult<String> {
        let path = required(
            &self.path,
            "The path to the Probe Dock API resource must be given",
        )?;
        let api_url = required(
            &self.api_url,
            "The root of the Probe Dock API must be given as \"apiUrl\"",
        )?;
        Ok(join_url(api_url, path))
    }
}

/// HTTP access to the API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client with default settings.
    pub fn new() -> ProbeDockResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProbeDockError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Use an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send a request.
    ///
    /// Fails before sending anything if the path, API root or token is
    /// missing. Any HTTP status is returned as a response: interpreting it is
    /// up to the caller. Only connection-level failures are errors.
    pub async fn send(&self, request: ApiRequest) -> ProbeDockResult<reqwest::Response> {
        let url = request.url()?;
        let token = required(
            &request.api_token,
            "The Probe Dock API authentication token must be given as \"apiToken\"",
        )?;

        let mut headers = request.headers;
        if !headers.contains_key(AUTHORIZATION) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ProbeDockError::Config {
                    message: format!("invalid API token: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        debug!(method = %request.method, url = %url, "sending API request");

        let mut builder = self.client.request(request.method, &url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        Ok(builder.send().await?)
    }
}

fn required<'a>(value: &'a Option<String>, message: &str) -> ProbeDockResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProbeDockError::Config {
            message: message.to_string(),
        })
}

/// Join the API root and a resource path with exactly one `/`.
fn join_url(api_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.strip_suffix('/').unwrap_or(api_url),
        path.strip_prefix('/').unwrap_or(path)
    )
}
