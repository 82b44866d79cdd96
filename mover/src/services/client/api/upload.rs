use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use crate::services::client::errors::{ClientError, ClientResult};
use crate::services::client::types::{
    AuthenticatedCaller, UploadCredentials, UploadFile, UploadResponseItem,
};
use crate::services::client::CloudClient;

/// Ask the storage API for upload credentials on `project_id` and keep the
/// issued token for the uploads that follow
pub async fn acquire_upload_credentials_impl(
    client: &CloudClient,
    caller: &AuthenticatedCaller,
    project_id: &str,
) -> ClientResult<()> {
    let url = client.project_url(project_id, "upload-credentials");

    let response = client
        .http_client
        .post(&url)
        .header("Authorization", caller.bearer())
        .send()
        .await
        .map_err(|e| ClientError::NetworkError {
            message: format!("Failed to request upload credentials: {}", e),
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        let error_text = response.text().await.unwrap_or_default();
        error!("Upload credentials refused for project {}: {}", project_id, error_text);
        return Err(ClientError::AuthenticationFailed {
            message: format!("{} ({})", error_text, status),
        });
    }
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!("Upload credentials request failed ({}): {}", status, error_text);
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let text = response.text().await.map_err(|e| ClientError::NetworkError {
        message: format!("Failed to read credentials response: {}", e),
    })?;
    let credentials: UploadCredentials = serde_json::from_str(&text)?;

    client
        .upload_tokens
        .write()
        .await
        .insert(project_id.to_string(), credentials.token);

    info!("Upload credentials acquired for project {}", project_id);
    Ok(())
}

/// Upload one batch as a multipart request. The answer is a JSON array
/// index-aligned with `files`.
pub async fn upload_files_impl(
    client: &CloudClient,
    caller: &AuthenticatedCaller,
    project_id: &str,
    files: &[UploadFile],
) -> ClientResult<Vec<UploadResponseItem>> {
    let token = client
        .upload_token(project_id)
        .await
        .ok_or_else(|| ClientError::AuthenticationFailed {
            message: format!("No upload credentials for project {}", project_id),
        })?;

    let form = files.iter().fold(Form::new(), |form, file| {
        form.part(
            "files",
            Part::stream(file.bytes.clone()).file_name(file.name.clone()),
        )
    });

    let total_bytes: usize = files.iter().map(|file| file.bytes.len()).sum();
    info!(
        "Uploading {} files ({} bytes) to project {}",
        files.len(),
        total_bytes,
        project_id
    );

    let response = client
        .http_client
        .post(client.project_url(project_id, "resources"))
        .header("Authorization", caller.bearer())
        .header("X-Upload-Token", token)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ClientError::NetworkError {
            message: format!("Failed to upload files: {}", e),
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!("Upload failed ({}): {}", status, error_text);
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let text = response.text().await.map_err(|e| ClientError::NetworkError {
        message: format!("Failed to read upload response: {}", e),
    })?;
    let items: Vec<UploadResponseItem> = serde_json::from_str(&text)?;

    if items.len() != files.len() {
        return Err(ClientError::InvalidResponse {
            expected: format!("{} upload results", files.len()),
            got: format!("{} upload results", items.len()),
        });
    }

    Ok(items)
}
