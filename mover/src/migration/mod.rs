pub mod classifier;
pub mod fetcher;
pub mod orchestrator;
pub mod packager;
pub mod progress;
pub mod rewriter;
pub mod strategies;
pub mod types;
pub mod uploader;


pub use orchestrator::{MigrateOptions, MigrationServices, ResourceMover};
pub use progress::{ProgressCallback, ProgressReporter};
pub use strategies::{MigrationStrategy, StrategySelector};
pub use types::{ErroredResource, MigrationResult};
