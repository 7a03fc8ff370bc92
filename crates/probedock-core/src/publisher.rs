//! Upload of serialized payloads.

use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiRequest};
use crate::config::ServerOptions;
use crate::error::{ProbeDockError, ProbeDockResult};
use crate::payload::{PayloadV1, MEDIA_TYPE_V1};

/// Resource accepting test payloads.
pub const PUBLISH_PATH: &str = "/publish";

/// Sends payloads to a Probe Dock server.
///
/// A single attempt is made per call; there is no retry and no request
/// timeout.
#[derive(Debug, Clone)]
pub struct Publisher {
    api: ApiClient,
}

impl Publisher {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload `payload` to the server described by `server`.
    ///
    /// Only `202 Accepted` counts as success.
    pub async fn upload(&self, payload: &PayloadV1, server: &ServerOptions) -> ProbeDockResult<()> {
        let body = serde_json::to_string(payload)?;

        let mut request = ApiRequest::new(reqwest::Method::POST, PUBLISH_PATH)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE_V1))
            .with_header(CONTENT_LENGTH, HeaderValue::from(body.len()))
            .with_body(body);
        request.api_url = server.api_url.clone();
        request.api_token = server.api_token.clone();

        let response = self.api.send(request).await?;
        let status = response.status();

        if status != StatusCode::ACCEPTED {
            let body = rejected_body(response.text().await);
            warn!(status = status.as_u16(), "payload rejected by server");
            return Err(ProbeDockError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            results = payload.results.len(),
            url = server.api_url.as_deref().unwrap_or_default(),
            "test payload published"
        );
        Ok(())
    }
}

/// Body of a rejected upload; a body that cannot be read is reported in its
/// place.
fn rejected_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        warn!(error = %e, "failed to read response body");
        format!("<unreadable body: {e}>")
    })
}
