use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::server::error::{Upstream, UpstreamError};

/// Sends `request` once and turns transport failures and non-2xx answers
/// into [`UpstreamError`].
pub(crate) async fn send_checked(
    service: Upstream,
    request: RequestBuilder,
) -> Result<Response, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|source| UpstreamError::Transport { service, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{} API request failed: {} - {}", service, status, body);
        return Err(UpstreamError::Status {
            service,
            status,
            body,
        });
    }

    Ok(response)
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    service: Upstream,
    response: Response,
) -> Result<T, UpstreamError> {
    response
        .json::<T>()
        .await
        .map_err(|source| UpstreamError::Decode { service, source })
}

pub(crate) fn bearer(credential: &str) -> String {
    format!("Bearer {}", credential.trim())
}
