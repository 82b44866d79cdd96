//! Command line front-end of the resource mover.
//!
//! Reads a project JSON file, migrates its resources from one storage
//! backend to another and writes the rewritten project back.
//!
//! Usage:
//!   resource-mover --project game.json --source local:/games/game.json --destination cloud:1234
//!
//! Environment variables:
//!   RESOURCE_MOVER_USER_ID, RESOURCE_MOVER_TOKEN - caller identity for cloud destinations
//!   RUST_LOG - log filter (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use mover::services::client::AuthenticatedCaller;
use mover::services::config::{get_global_config, MigrationConfig};
use mover::{MigrateOptions, Project, ResourceMover, StorageLocation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "resource-mover",
    version,
    about = "Move project resources between storage backends"
)]
struct Args {
    /// Project JSON file to migrate
    #[arg(short, long)]
    project: PathBuf,

    /// Where the project currently lives (local:<file>, cloud:<id>, url:<url>)
    #[arg(short, long)]
    source: StorageLocation,

    /// Where the project is being saved (local:<file>, cloud:<id>, ephemeral)
    #[arg(short, long)]
    destination: StorageLocation,

    #[arg(long, env = "RESOURCE_MOVER_USER_ID")]
    user_id: Option<String>,

    #[arg(long, env = "RESOURCE_MOVER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JSON configuration file; built-in defaults otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the rewritten project (defaults to --project)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the migration result as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MigrationConfig::from_json_file(path)?,
        None => get_global_config(),
    };

    let caller = match (&args.user_id, &args.token) {
        (Some(user_id), Some(token)) => Some(AuthenticatedCaller::new(user_id, token)),
        (None, None) => None,
        _ => bail!("--user-id and --token must be given together"),
    };

    let json = tokio::fs::read_to_string(&args.project)
        .await
        .with_context(|| format!("failed to read {}", args.project.display()))?;
    let mut project = Project::from_json(&json)
        .with_context(|| format!("{} is not a valid project file", args.project.display()))?;

    tracing::info!(
        "Migrating '{}' ({} resources) from {} to {}",
        project.name,
        project.resources().len(),
        args.source,
        args.destination
    );

    let mover = ResourceMover::new(config)?;
    let on_progress: &(dyn Fn(usize, usize) + Send + Sync) =
        &|completed, total| tracing::info!("Progress: {}/{}", completed, total);

    let result = mover
        .migrate_resources(MigrateOptions {
            project: &mut project,
            source: &args.source,
            destination: &args.destination,
            caller: caller.as_ref(),
            on_progress: Some(on_progress),
        })
        .await?;

    let output = args.output.as_ref().unwrap_or(&args.project);
    tokio::fs::write(output, project.to_json()?)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!("{}", result.summary(project.resources().len()));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
