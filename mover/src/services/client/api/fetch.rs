use bytes::Bytes;
use tracing::{debug, error};

use crate::services::client::errors::{ClientError, ClientResult};
use crate::services::client::types::AuthenticatedCaller;
use crate::services::client::CloudClient;

/// Download a resource body. Credentials are attached only when given.
pub async fn fetch_impl(
    client: &CloudClient,
    url: &str,
    credentials: Option<&AuthenticatedCaller>,
) -> ClientResult<Bytes> {
    let mut request = client.http_client.get(url);
    if let Some(caller) = credentials {
        request = request.header("Authorization", caller.bearer());
    }

    let response = request.send().await.map_err(|e| ClientError::NetworkError {
        message: format!("Failed to download {}: {}", url, e),
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!("Download of {} failed ({}): {}", url, status, error_text);
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::NetworkError {
            message: format!("Failed to read response body: {}", e),
        })?;

    debug!("Downloaded {} ({} bytes)", url, body.len());
    Ok(body)
}
