//! Backend-pair specific migration strategies.
//!
//! Each strategy composes the classifier, fetcher, packager, uploader and
//! rewriter with the predicates that fit its source/destination pair. The
//! selector maps a `(source kind, destination kind)` pair to a strategy.

pub mod cloud_to_cloud;
pub mod local_to_cloud;
pub mod no_op;
pub mod pipeline;
pub mod selector;
pub mod to_local;
pub mod url_to_cloud;

pub use selector::StrategySelector;

use crate::migration::progress::ProgressCallback;
use crate::migration::types::MigrationResult;
use crate::project::{Project, StorageLocation};
use crate::services::client::{
    AuthenticatedCaller, CredentialService, FetchTransport, LocalFileReader, LocalFileWriter,
    UploadService,
};
use crate::services::config::MigrationConfig;
use crate::services::errors::MigrationError;

/// Everything a strategy needs besides the project and the two locations
pub struct MigrationContext<'a> {
    pub config: &'a MigrationConfig,
    pub transport: &'a dyn FetchTransport,
    pub credentials: &'a dyn CredentialService,
    pub uploads: &'a dyn UploadService,
    pub reader: &'a dyn LocalFileReader,
    pub writer: &'a dyn LocalFileWriter,
    pub caller: Option<&'a AuthenticatedCaller>,
    pub on_progress: Option<ProgressCallback<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationStrategy {
    LocalToCloud,
    CloudToCloud,
    UrlToCloud,
    /// Cloud or URL-hosted project saved to the local filesystem
    ToLocal,
    /// Throwaway exports never need resources rewritten
    NoOp,
}

impl MigrationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            MigrationStrategy::LocalToCloud => "local-to-cloud",
            MigrationStrategy::CloudToCloud => "cloud-to-cloud",
            MigrationStrategy::UrlToCloud => "url-to-cloud",
            MigrationStrategy::ToLocal => "to-local",
            MigrationStrategy::NoOp => "no-op",
        }
    }

    pub async fn run(
        &self,
        ctx: &MigrationContext<'_>,
        project: &mut Project,
        source: &StorageLocation,
        destination: &StorageLocation,
    ) -> Result<MigrationResult, MigrationError> {
        let mismatch = || MigrationError::UnsupportedMigration {
            source_kind: source.kind(),
            destination: destination.kind(),
        };

        match (self, destination) {
            (MigrationStrategy::NoOp, _) => Ok(no_op::run()),
            (MigrationStrategy::LocalToCloud, StorageLocation::Cloud { project_id }) => {
                let project_directory = source.project_directory().ok_or_else(mismatch)?;
                local_to_cloud::run(ctx, project, project_directory, project_id).await
            }
            (MigrationStrategy::CloudToCloud, StorageLocation::Cloud { project_id }) => {
                cloud_to_cloud::run(ctx, project, project_id).await
            }
            (MigrationStrategy::UrlToCloud, StorageLocation::Cloud { project_id }) => {
                url_to_cloud::run(ctx, project, project_id).await
            }
            (MigrationStrategy::ToLocal, StorageLocation::Local { .. }) => {
                let project_directory = destination.project_directory().ok_or_else(mismatch)?;
                to_local::run(ctx, project, project_directory).await
            }
            _ => Err(mismatch()),
        }
    }
}
