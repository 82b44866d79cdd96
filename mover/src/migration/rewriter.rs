use tracing::{debug, warn};

use super::types::{MigrationResult, UploadOutcome};
use crate::project::ResourcesManager;

/// Point every successfully transferred resource at its new location and
/// record the failures. Failed resources keep their old `file`, so running
/// the migration again retries them.
pub fn apply_upload_outcomes(
    resources: &mut ResourcesManager,
    outcomes: Vec<UploadOutcome>,
    result: &mut MigrationResult,
) {
    for UploadOutcome {
        resource_name,
        outcome,
    } in outcomes
    {
        match outcome {
            Ok(new_location) => match resources.get_mut(&resource_name) {
                Some(resource) => {
                    debug!(
                        "[Rewriter] {}: {} -> {}",
                        resource_name,
                        resource.file(),
                        new_location
                    );
                    resource.set_file(&new_location);
                    result.migrated += 1;
                }
                None => warn!(
                    "[Rewriter] Resource {} disappeared from the project during migration",
                    resource_name
                ),
            },
            Err(error) => result.record_error(&resource_name, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ResourceKind, ResourceRecord};
    use crate::services::errors::ResourceError;

    #[test]
    fn test_only_successes_are_rewritten() {
        let mut resources = ResourcesManager::default();
        resources
            .add(ResourceRecord::new("ok", ResourceKind::Image, "https://old/ok.png"))
            .unwrap();
        resources
            .add(ResourceRecord::new("ko", ResourceKind::Audio, "https://old/ko.mp3"))
            .unwrap();
        let mut result = MigrationResult::default();

        apply_upload_outcomes(
            &mut resources,
            vec![
                UploadOutcome {
                    resource_name: "ok".to_string(),
                    outcome: Ok("https://new/ok.png".to_string()),
                },
                UploadOutcome {
                    resource_name: "ko".to_string(),
                    outcome: Err(ResourceError::MissingUploadResult),
                },
            ],
            &mut result,
        );

        assert_eq!(resources.get("ok").unwrap().file(), "https://new/ok.png");
        assert_eq!(resources.get("ko").unwrap().file(), "https://old/ko.mp3");
        assert_eq!(result.migrated, 1);
        assert_eq!(
            result.error_for("ko"),
            Some(&ResourceError::MissingUploadResult)
        );
    }
}
