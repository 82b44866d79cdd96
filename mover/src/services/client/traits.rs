//! Boundaries between the migration engine and the outside world

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use super::errors::ClientResult;
use super::types::{AuthenticatedCaller, UploadFile, UploadResponseItem};

/// Plain HTTP GET returning the whole body
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Download `url`. `credentials` is set only for the platform's own
    /// authenticated buckets; other hosts are fetched anonymously.
    /// Non-2xx answers are errors.
    async fn get(&self, url: &str, credentials: Option<&AuthenticatedCaller>)
        -> ClientResult<Bytes>;
}

#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Authorize uploads to `project_id`. Called once per migration.
    async fn acquire_upload_credentials(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
    ) -> ClientResult<()>;
}

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Upload one batch. On success the answer is index-aligned with `files`.
    async fn upload_files(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
        files: &[UploadFile],
    ) -> ClientResult<Vec<UploadResponseItem>>;
}

#[async_trait]
pub trait LocalFileReader: Send + Sync {
    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes>;
}

#[async_trait]
pub trait LocalFileWriter: Send + Sync {
    /// Write `bytes` to `path`, creating missing parent directories
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()>;

    async fn exists(&self, path: &Path) -> bool;
}
