//! Classify, fetch, package, upload, rewrite: the sequence every strategy
//! with a cloud destination runs.

use tracing::info;

use super::MigrationContext;
use crate::migration::classifier::{classify_resources, ClassificationRules};
use crate::migration::fetcher::Fetcher;
use crate::migration::packager::{package_fetch_results, FilenameTransform};
use crate::migration::progress::ProgressReporter;
use crate::migration::rewriter::apply_upload_outcomes;
use crate::migration::types::MigrationResult;
use crate::migration::uploader::Uploader;
use crate::project::{Project, StorageKind};
use crate::services::errors::MigrationError;

pub async fn migrate_to_cloud(
    ctx: &MigrationContext<'_>,
    project: &mut Project,
    rules: &ClassificationRules<'_>,
    transform_filename: Option<FilenameTransform<'_>>,
    destination_project_id: &str,
) -> Result<MigrationResult, MigrationError> {
    let caller = ctx.caller.ok_or(MigrationError::NotAuthenticated {
        destination: StorageKind::Cloud,
    })?;

    let mut result = MigrationResult::default();
    let candidates = classify_resources(project.resources(), rules, &mut result);
    result.candidates = candidates.len();

    if candidates.is_empty() {
        info!("[Pipeline] Nothing to transfer");
        return Ok(result);
    }

    let uploader = Uploader::new(ctx.credentials, ctx.uploads, ctx.config.upload.max_batch_bytes);
    uploader.authorize(caller, destination_project_id).await?;

    let progress = ProgressReporter::new(ctx.on_progress, candidates.len());
    let fetcher = Fetcher::new(ctx.transport, ctx.reader, Some(caller), ctx.config);
    let fetched = fetcher
        .fetch_all(candidates, &|completed, _| progress.download_progress(completed))
        .await;

    let units = package_fetch_results(fetched, transform_filename, &mut |name, error| {
        result.record_error(name, error)
    });

    let outcomes = uploader
        .upload_units(caller, destination_project_id, units, &|completed, _| {
            progress.upload_progress(completed)
        })
        .await;

    apply_upload_outcomes(project.resources_mut(), outcomes, &mut result);

    info!(
        "[Pipeline] {} of {} candidates migrated, {} errors",
        result.migrated,
        result.candidates,
        result.errored_resources.len()
    );
    Ok(result)
}
