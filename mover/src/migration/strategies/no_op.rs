use crate::migration::types::MigrationResult;

/// Exports to a temporary package keep every resource where it is
pub fn run() -> MigrationResult {
    MigrationResult::default()
}
