//! Decides, per resource, whether it must be transferred, skipped, or
//! reported as unsupported.

use std::path::Path;
use tracing::debug;

use super::types::{CandidateSource, MigrationCandidate, MigrationResult};
use crate::project::{ResourceRecord, ResourcesManager};
use crate::services::errors::ResourceError;
use crate::utils::{extract_filename_from_url, is_blob_url, is_url};

/// Predicate over a resource's `file` string
pub type FilePredicate<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Backend-pair specific selection rules
pub struct ClassificationRules<'a> {
    /// Resources that need to move
    pub select: FilePredicate<'a>,
    /// Selected resources that already live at the destination
    pub ignore: Option<FilePredicate<'a>>,
    /// Directory local paths are resolved against. When unset, any file that
    /// is not URL-shaped is unsupported.
    pub local_root: Option<&'a Path>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Classification {
    Candidate(CandidateSource),
    AlreadyAtDestination,
    LeftInPlace,
    Unsupported(ResourceError),
}

fn classify(file: &str, rules: &ClassificationRules<'_>) -> Classification {
    if !is_url(file) {
        return match rules.local_root {
            None => Classification::Unsupported(ResourceError::UnsupportedRelativeFile),
            Some(_) if !(rules.select)(file) => Classification::LeftInPlace,
            Some(_) if rules.ignore.is_some_and(|ignore| ignore(file)) => {
                Classification::AlreadyAtDestination
            }
            // Absolute paths replace the root when joined
            Some(root) => Classification::Candidate(CandidateSource::LocalPath(root.join(file))),
        };
    }

    if !(rules.select)(file) {
        return if is_blob_url(file) {
            Classification::Unsupported(ResourceError::UnsupportedBlobUrl)
        } else {
            Classification::LeftInPlace
        };
    }

    if rules.ignore.is_some_and(|ignore| ignore(file)) {
        return Classification::AlreadyAtDestination;
    }

    Classification::Candidate(CandidateSource::Url(file.to_string()))
}

fn target_filename(resource: &ResourceRecord, source: &CandidateSource) -> String {
    let derived = match source {
        CandidateSource::Url(url) => extract_filename_from_url(url),
        CandidateSource::LocalPath(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    };

    derived.unwrap_or_else(|| resource.name().replace(['/', '\\'], "_"))
}

/// Walk the resource table in order and return the resources to transfer.
/// Unsupported references are recorded in `result`; resources already at
/// the destination or needing no action are skipped silently.
pub fn classify_resources(
    resources: &ResourcesManager,
    rules: &ClassificationRules<'_>,
    result: &mut MigrationResult,
) -> Vec<MigrationCandidate> {
    let mut candidates = Vec::new();

    for resource in resources.iter() {
        match classify(resource.file(), rules) {
            Classification::Candidate(source) => {
                let target_filename = target_filename(resource, &source);
                debug!(
                    "[Classifier] {} selected ({} -> {})",
                    resource.name(),
                    source.describe(),
                    target_filename
                );
                candidates.push(MigrationCandidate {
                    resource_name: resource.name().to_string(),
                    source,
                    target_filename,
                    extension_hint: resource.extension_hint().map(str::to_string),
                });
            }
            Classification::AlreadyAtDestination => {
                debug!("[Classifier] {} already at destination", resource.name());
            }
            Classification::LeftInPlace => {}
            Classification::Unsupported(error) => {
                debug!("[Classifier] {} unsupported: {}", resource.name(), error);
                result.record_error(resource.name(), error);
            }
        }
    }

    candidates
}
