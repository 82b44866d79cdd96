//! Saving a cloud or URL-hosted project to disk: remote resources are
//! downloaded into an assets folder next to the project file and the
//! project is rewritten to point at them with relative paths.

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use super::MigrationContext;
use crate::migration::classifier::{classify_resources, ClassificationRules};
use crate::migration::fetcher::Fetcher;
use crate::migration::packager::{
    package_fetch_results, strip_query_from_filename, FilenameTransform,
};
use crate::migration::progress::ProgressReporter;
use crate::migration::rewriter::apply_upload_outcomes;
use crate::migration::types::{MigrationResult, UploadOutcome, UploadUnit};
use crate::project::Project;
use crate::services::client::LocalFileWriter;
use crate::services::errors::{MigrationError, ResourceError};
use crate::utils::{has_prefix, with_numeric_suffix};

pub async fn run(
    ctx: &MigrationContext<'_>,
    project: &mut Project,
    project_directory: &Path,
) -> Result<MigrationResult, MigrationError> {
    let storage = &ctx.config.storage;
    let select = |file: &str| {
        has_prefix(file, &storage.cloud_resources_url)
            || has_prefix(file, &storage.private_assets_url)
    };
    // Relative paths already point inside the project directory
    let rules = ClassificationRules {
        select: &select,
        ignore: None,
        local_root: Some(project_directory),
    };

    let mut result = MigrationResult::default();
    let candidates = classify_resources(project.resources(), &rules, &mut result);
    result.candidates = candidates.len();

    if candidates.is_empty() {
        info!("[ToLocal] Nothing to download");
        return Ok(result);
    }

    let progress = ProgressReporter::new(ctx.on_progress, candidates.len());
    let fetcher = Fetcher::new(ctx.transport, ctx.reader, ctx.caller, ctx.config);
    let fetched = fetcher
        .fetch_all(candidates, &|completed, _| progress.download_progress(completed))
        .await;

    let transform: FilenameTransform<'_> = &strip_query_from_filename;
    let units = package_fetch_results(fetched, Some(transform), &mut |name, error| {
        result.record_error(name, error)
    });

    let assets_folder = storage.local_assets_folder.as_str();
    let outcomes = write_units(
        ctx.writer,
        &project_directory.join(assets_folder),
        assets_folder,
        units,
        &progress,
    )
    .await;

    apply_upload_outcomes(project.resources_mut(), outcomes, &mut result);

    info!(
        "[ToLocal] {} of {} resources saved to {}",
        result.migrated,
        result.candidates,
        project_directory.join(assets_folder).display()
    );
    Ok(result)
}

/// Write each unit under `assets_directory`, never overwriting an existing
/// file nor another unit of the same run. Outcomes carry the path relative
/// to the project directory, `/`-separated.
async fn write_units(
    writer: &dyn LocalFileWriter,
    assets_directory: &Path,
    assets_folder: &str,
    units: Vec<UploadUnit>,
    progress: &ProgressReporter<'_>,
) -> Vec<UploadOutcome> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut outcomes = Vec::with_capacity(units.len());

    for (index, unit) in units.into_iter().enumerate() {
        let file_name =
            unused_file_name(writer, assets_directory, &unit.file_name, &claimed).await;
        let path = assets_directory.join(&file_name);

        let outcome = match writer.write_file(&path, &unit.bytes).await {
            Ok(()) => {
                claimed.insert(file_name.clone());
                Ok(format!("{}/{}", assets_folder.trim_end_matches('/'), file_name))
            }
            Err(e) => {
                warn!("[ToLocal] Could not write {}: {}", path.display(), e);
                Err(ResourceError::LocalWrite {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        outcomes.push(UploadOutcome {
            resource_name: unit.resource_name,
            outcome,
        });
        progress.upload_progress(index + 1);
    }

    outcomes
}

async fn unused_file_name(
    writer: &dyn LocalFileWriter,
    directory: &Path,
    file_name: &str,
    claimed: &HashSet<String>,
) -> String {
    let mut candidate = file_name.to_string();
    let mut suffix = 0;
    while claimed.contains(&candidate) || writer.exists(&directory.join(&candidate)).await {
        suffix += 1;
        candidate = with_numeric_suffix(file_name, suffix);
    }
    candidate
}
