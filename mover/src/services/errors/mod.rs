use thiserror::Error;

use crate::project::StorageKind;
use crate::services::client::ClientError;

/// Errors that abort a whole migration. When one of these is returned no
/// resource-level work is meaningful and the project must be considered
/// untouched by the failed call.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Could not acquire upload credentials for project {project_id}: {source}")]
    CredentialAcquisition {
        project_id: String,
        #[source]
        source: ClientError,
    },

    #[error("Authentication error: an authenticated caller is required to upload to {destination}")]
    NotAuthenticated { destination: StorageKind },

    #[error("Unsupported migration: {source_kind} -> {destination}")]
    UnsupportedMigration {
        source_kind: StorageKind,
        destination: StorageKind,
    },

    #[error("Configuration error: {field} - {message}")]
    Configuration { field: String, message: String },
}

/// Per-resource failure. Recorded in the migration result, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Unsupported relative file")]
    UnsupportedRelativeFile,

    #[error("Unsupported blob URL")]
    UnsupportedBlobUrl,

    #[error("Download failed with HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("Download failed: {message}")]
    Transport { message: String },

    #[error("Could not read local file {path}: {message}")]
    LocalRead { path: String, message: String },

    #[error("Invalid data URL: {message}")]
    InvalidDataUrl { message: String },

    #[error("Upload failed: {message}")]
    Upload { message: String },

    #[error("No upload result returned for resource")]
    MissingUploadResult,

    #[error("Could not write local file {path}: {message}")]
    LocalWrite { path: String, message: String },
}

impl From<ClientError> for ResourceError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::HttpStatus { status, .. } => ResourceError::HttpStatus { status },
            other => ResourceError::Transport {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_messages() {
        assert_eq!(
            ResourceError::UnsupportedRelativeFile.to_string(),
            "Unsupported relative file"
        );
        assert_eq!(
            ResourceError::UnsupportedBlobUrl.to_string(),
            "Unsupported blob URL"
        );
    }

    #[test]
    fn test_client_status_maps_to_http_status() {
        let error: ResourceError = ClientError::HttpStatus {
            status: 404,
            message: "not found".to_string(),
        }
        .into();
        assert_eq!(error, ResourceError::HttpStatus { status: 404 });
    }
}
