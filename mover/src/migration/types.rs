use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

use crate::services::errors::ResourceError;

/// Where the bytes of a candidate come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Fetched over HTTP (or decoded in-process for `data:` URLs)
    Url(String),
    /// Read from the local filesystem, already resolved against the
    /// project directory
    LocalPath(PathBuf),
}

impl CandidateSource {
    pub fn describe(&self) -> String {
        match self {
            CandidateSource::Url(url) => url.clone(),
            CandidateSource::LocalPath(path) => path.display().to_string(),
        }
    }
}

/// A resource selected for migration, alive for one invocation only.
/// Resources are identified by name; `target_filename` is cosmetic and may
/// collide between candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationCandidate {
    pub resource_name: String,
    pub source: CandidateSource,
    pub target_filename: String,
    /// Extension recorded in the resource metadata, if any
    pub extension_hint: Option<String>,
}

/// Outcome of downloading (or reading) one candidate
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub candidate: MigrationCandidate,
    pub outcome: Result<Bytes, ResourceError>,
}

impl FetchResult {
    pub fn payload(&self) -> Option<&Bytes> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ResourceError> {
        self.outcome.as_ref().err()
    }
}

/// A named payload ready to be uploaded or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadUnit {
    pub resource_name: String,
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadUnit {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of uploading one unit: the new location of the resource, or why
/// it has none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub resource_name: String,
    pub outcome: Result<String, ResourceError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErroredResource {
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    #[serde(serialize_with = "serialize_error_message")]
    pub error: ResourceError,
}

/// What a migration reports back to its caller. A resource missing from
/// `errored_resources` was migrated or did not need to be.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MigrationResult {
    #[serde(rename = "erroredResources")]
    pub errored_resources: Vec<ErroredResource>,
    /// Resources whose file was rewritten to a new location
    pub migrated: usize,
    /// Resources the classifier selected for transfer
    pub candidates: usize,
}

impl MigrationResult {
    pub fn record_error(&mut self, resource_name: &str, error: ResourceError) {
        self.errored_resources.push(ErroredResource {
            resource_name: resource_name.to_string(),
            error,
        });
    }

    pub fn is_success(&self) -> bool {
        self.errored_resources.is_empty()
    }

    pub fn error_for(&self, resource_name: &str) -> Option<&ResourceError> {
        self.errored_resources
            .iter()
            .find(|errored| errored.resource_name == resource_name)
            .map(|errored| &errored.error)
    }

    /// One-line summary for the user, `total` being the size of the
    /// project's resource table
    pub fn summary(&self, total: usize) -> String {
        if self.errored_resources.is_empty() {
            format!("All {} resources migrated", total)
        } else {
            format!(
                "{} of {} resources failed to migrate",
                self.errored_resources.len(),
                total
            )
        }
    }
}

fn serialize_error_message<S: Serializer>(
    error: &ResourceError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut result = MigrationResult::default();
        assert_eq!(result.summary(3), "All 3 resources migrated");

        result.record_error("a", ResourceError::UnsupportedBlobUrl);
        assert_eq!(result.summary(3), "1 of 3 resources failed to migrate");
        assert_eq!(result.error_for("a"), Some(&ResourceError::UnsupportedBlobUrl));
        assert!(!result.is_success());
    }

    #[test]
    fn test_errors_serialize_as_messages() {
        let mut result = MigrationResult::default();
        result.record_error("logo", ResourceError::UnsupportedRelativeFile);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["erroredResources"][0]["error"],
            "Unsupported relative file"
        );
        assert_eq!(json["erroredResources"][0]["resourceName"], "logo");

        result.record_error("hero", ResourceError::HttpStatus { status: 404 });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["erroredResources"][1]["error"],
            "Download failed with HTTP status 404"
        );
    }
}
