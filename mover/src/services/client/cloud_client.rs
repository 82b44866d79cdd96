use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::instrument;

use super::errors::{ClientError, ClientResult};
use super::traits::{CredentialService, FetchTransport, UploadService};
use super::types::{AuthenticatedCaller, UploadFile, UploadResponseItem};
use crate::services::config::NetworkConfig;

/// Client for the platform's project storage API and for plain downloads
#[derive(Clone)]
pub struct CloudClient {
    pub(crate) http_client: Client,
    pub(crate) api_base_url: String,
    /// Upload tokens per destination project, filled by
    /// `acquire_upload_credentials` and read by `upload_files`
    pub(crate) upload_tokens: Arc<RwLock<HashMap<String, String>>>,
}

impl CloudClient {
    pub fn new(config: &NetworkConfig) -> ClientResult<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ClientError::NetworkError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            upload_tokens: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub(crate) fn project_url(&self, project_id: &str, path: &str) -> String {
        format!("{}/projects/{}/{}", self.api_base_url, project_id, path)
    }

    pub(crate) async fn upload_token(&self, project_id: &str) -> Option<String> {
        self.upload_tokens.read().await.get(project_id).cloned()
    }
}

#[async_trait]
impl FetchTransport for CloudClient {
    #[instrument(skip(self, credentials), err)]
    async fn get(
        &self,
        url: &str,
        credentials: Option<&AuthenticatedCaller>,
    ) -> ClientResult<Bytes> {
        super::api::fetch_impl(self, url, credentials).await
    }
}

#[async_trait]
impl CredentialService for CloudClient {
    #[instrument(skip(self, caller), fields(user = %caller.user_id), err)]
    async fn acquire_upload_credentials(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
    ) -> ClientResult<()> {
        super::api::acquire_upload_credentials_impl(self, caller, project_id).await
    }
}

#[async_trait]
impl UploadService for CloudClient {
    #[instrument(skip(self, caller, files), fields(files = files.len()), err)]
    async fn upload_files(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
        files: &[UploadFile],
    ) -> ClientResult<Vec<UploadResponseItem>> {
        super::api::upload_files_impl(self, caller, project_id, files).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_url_trims_trailing_slash() {
        let config = NetworkConfig {
            api_base_url: "https://api.example.com/".to_string(),
            ..NetworkConfig::default()
        };
        let client = CloudClient::new(&config).unwrap();

        assert_eq!(
            client.project_url("p-1", "resources"),
            "https://api.example.com/projects/p-1/resources"
        );
    }

    #[tokio::test]
    async fn test_upload_token_is_cached_per_project() {
        let client = CloudClient::new(&NetworkConfig::default()).unwrap();
        assert_eq!(client.upload_token("p-1").await, None);

        client
            .upload_tokens
            .write()
            .await
            .insert("p-1".to_string(), "secret".to_string());

        assert_eq!(client.upload_token("p-1").await, Some("secret".to_string()));
        assert_eq!(client.upload_token("p-2").await, None);
    }
}
