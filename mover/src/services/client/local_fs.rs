use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

use super::traits::{LocalFileReader, LocalFileWriter};

/// Local project files through tokio's filesystem API
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl LocalFileReader for LocalFileSystem {
    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes> {
        let data = tokio::fs::read(path).await?;
        debug!("[LocalFileSystem] Read {} ({} bytes)", path.display(), data.len());
        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl LocalFileWriter for LocalFileSystem {
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, bytes).await?;
        debug!("[LocalFileSystem] Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
