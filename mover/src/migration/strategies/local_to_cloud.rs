use std::path::Path;

use super::pipeline::migrate_to_cloud;
use super::MigrationContext;
use crate::migration::classifier::ClassificationRules;
use crate::migration::types::MigrationResult;
use crate::project::Project;
use crate::services::errors::MigrationError;
use crate::utils::is_url;

/// Upload every resource stored next to the project file. URLs stay as
/// they are: they are reachable from anywhere already.
pub async fn run(
    ctx: &MigrationContext<'_>,
    project: &mut Project,
    project_directory: &Path,
    destination_project_id: &str,
) -> Result<MigrationResult, MigrationError> {
    let select = |file: &str| !is_url(file);
    let rules = ClassificationRules {
        select: &select,
        ignore: None,
        local_root: Some(project_directory),
    };

    migrate_to_cloud(ctx, project, &rules, None, destination_project_id).await
}
