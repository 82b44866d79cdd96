use super::pipeline::migrate_to_cloud;
use super::MigrationContext;
use crate::migration::classifier::{ClassificationRules, FilePredicate};
use crate::migration::types::MigrationResult;
use crate::project::Project;
use crate::services::errors::MigrationError;
use crate::utils::{extract_cloud_project_id, has_prefix};

/// "Save as" between two cloud projects: bucket resources owned by another
/// project are copied into the destination project.
pub async fn run(
    ctx: &MigrationContext<'_>,
    project: &mut Project,
    destination_project_id: &str,
) -> Result<MigrationResult, MigrationError> {
    let bucket = ctx.config.storage.cloud_resources_url.as_str();

    let select = |file: &str| has_prefix(file, bucket);
    let ignore: FilePredicate<'_> =
        &|file: &str| extract_cloud_project_id(file, bucket) == Some(destination_project_id);
    let rules = ClassificationRules {
        select: &select,
        ignore: Some(ignore),
        local_root: None,
    };

    migrate_to_cloud(ctx, project, &rules, None, destination_project_id).await
}
