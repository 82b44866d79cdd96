//! Migration orchestrator - entry point of the engine

use std::sync::Arc;
use tracing::{error, info, instrument};

use super::progress::ProgressCallback;
use super::strategies::{MigrationContext, StrategySelector};
use super::types::MigrationResult;
use crate::project::{Project, StorageKind, StorageLocation};
use crate::services::client::{
    AuthenticatedCaller, CloudClient, CredentialService, FetchTransport, LocalFileReader,
    LocalFileSystem, LocalFileWriter, UploadService,
};
use crate::services::config::MigrationConfig;
use crate::services::errors::MigrationError;

/// Collaborators the engine reaches the outside world through
#[derive(Clone)]
pub struct MigrationServices {
    pub transport: Arc<dyn FetchTransport>,
    pub credentials: Arc<dyn CredentialService>,
    pub uploads: Arc<dyn UploadService>,
    pub reader: Arc<dyn LocalFileReader>,
    pub writer: Arc<dyn LocalFileWriter>,
}

impl MigrationServices {
    /// Production services: the platform's HTTP API and the local disk
    pub fn from_config(config: &MigrationConfig) -> Result<Self, MigrationError> {
        let cloud = Arc::new(CloudClient::new(&config.network).map_err(|e| {
            MigrationError::Configuration {
                field: "network".to_string(),
                message: e.to_string(),
            }
        })?);
        let disk = Arc::new(LocalFileSystem);

        Ok(Self {
            transport: cloud.clone(),
            credentials: cloud.clone(),
            uploads: cloud,
            reader: disk.clone(),
            writer: disk,
        })
    }
}

/// One migration request
pub struct MigrateOptions<'a> {
    /// Rewritten in place
    pub project: &'a mut Project,
    pub source: &'a StorageLocation,
    pub destination: &'a StorageLocation,
    /// Required when the destination is the cloud
    pub caller: Option<&'a AuthenticatedCaller>,
    /// `(completed, total)`, with `total` twice the number of candidates
    pub on_progress: Option<ProgressCallback<'a>>,
}

pub struct ResourceMover {
    config: MigrationConfig,
    services: MigrationServices,
}

impl ResourceMover {
    pub fn new(config: MigrationConfig) -> Result<Self, MigrationError> {
        let services = MigrationServices::from_config(&config)?;
        Self::with_services(config, services)
    }

    pub fn with_services(
        config: MigrationConfig,
        services: MigrationServices,
    ) -> Result<Self, MigrationError> {
        config.validate()?;
        Ok(Self { config, services })
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Move every resource of the project that would not be reachable from
    /// the destination, and rewrite the project to point at the copies.
    ///
    /// Per-resource failures are reported in the result and leave the
    /// resource untouched. `Err` is only returned when nothing could be
    /// attempted: unsupported backend pair, missing caller, or refused
    /// upload credentials.
    #[instrument(
        skip_all,
        fields(
            project = %options.project.name,
            source = %options.source,
            destination = %options.destination
        )
    )]
    pub async fn migrate_resources(
        &self,
        options: MigrateOptions<'_>,
    ) -> Result<MigrationResult, MigrationError> {
        let MigrateOptions {
            project,
            source,
            destination,
            caller,
            on_progress,
        } = options;

        let Some(strategy) = StrategySelector::select(source.kind(), destination.kind()) else {
            error!(
                "[Migration] No migration from {} to {}",
                source.kind(),
                destination.kind()
            );
            return Err(MigrationError::UnsupportedMigration {
                source_kind: source.kind(),
                destination: destination.kind(),
            });
        };

        if destination.kind() == StorageKind::Cloud && caller.is_none() {
            error!("[Migration] Saving to the cloud requires an authenticated caller");
            return Err(MigrationError::NotAuthenticated {
                destination: destination.kind(),
            });
        }

        info!(
            "[Migration] Migrating {} resources with '{}'",
            project.resources().len(),
            strategy.name()
        );

        let ctx = MigrationContext {
            config: &self.config,
            transport: self.services.transport.as_ref(),
            credentials: self.services.credentials.as_ref(),
            uploads: self.services.uploads.as_ref(),
            reader: self.services.reader.as_ref(),
            writer: self.services.writer.as_ref(),
            caller,
            on_progress,
        };

        let result = strategy.run(&ctx, project, source, destination).await?;

        if result.is_success() {
            info!("[Migration] {}", result.summary(project.resources().len()));
        } else {
            for errored in &result.errored_resources {
                error!(
                    "[Migration] {} not migrated: {}",
                    errored.resource_name, errored.error
                );
            }
        }

        Ok(result)
    }
}
