use super::pipeline::migrate_to_cloud;
use super::MigrationContext;
use crate::migration::classifier::ClassificationRules;
use crate::migration::packager::{strip_query_from_filename, FilenameTransform};
use crate::migration::types::MigrationResult;
use crate::project::Project;
use crate::services::errors::MigrationError;
use crate::utils::has_prefix;

/// Project opened from a URL (an example or a template) saved to the cloud.
/// Private catalog assets are tokenized and must be copied; public URLs
/// stay reachable and are left alone.
pub async fn run(
    ctx: &MigrationContext<'_>,
    project: &mut Project,
    destination_project_id: &str,
) -> Result<MigrationResult, MigrationError> {
    let private_assets = ctx.config.storage.private_assets_url.as_str();

    let select = |file: &str| has_prefix(file, private_assets);
    let rules = ClassificationRules {
        select: &select,
        ignore: None,
        local_root: None,
    };

    let transform: FilenameTransform<'_> = &strip_query_from_filename;

    migrate_to_cloud(ctx, project, &rules, Some(transform), destination_project_id).await
}
