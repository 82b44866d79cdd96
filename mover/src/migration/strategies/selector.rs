use tracing::info;

use super::MigrationStrategy;
use crate::project::StorageKind;

/// `(source, destination) -> strategy`. Pairs not listed are unsupported,
/// except that any source may be exported to an ephemeral destination.
const DISPATCH_TABLE: &[(StorageKind, StorageKind, MigrationStrategy)] = &[
    (StorageKind::Local, StorageKind::Cloud, MigrationStrategy::LocalToCloud),
    (StorageKind::Cloud, StorageKind::Cloud, MigrationStrategy::CloudToCloud),
    (StorageKind::Url, StorageKind::Cloud, MigrationStrategy::UrlToCloud),
    (StorageKind::Cloud, StorageKind::Local, MigrationStrategy::ToLocal),
    (StorageKind::Url, StorageKind::Local, MigrationStrategy::ToLocal),
];

/// Selector for the strategy matching a pair of storage backends
pub struct StrategySelector;

impl StrategySelector {
    pub fn select(source: StorageKind, destination: StorageKind) -> Option<MigrationStrategy> {
        let selected = if destination == StorageKind::Ephemeral {
            Some(MigrationStrategy::NoOp)
        } else {
            DISPATCH_TABLE
                .iter()
                .find(|(from, to, _)| *from == source && *to == destination)
                .map(|(_, _, strategy)| *strategy)
        };

        if let Some(strategy) = selected {
            info!(
                "[StrategySelector] {} -> {}: '{}'",
                source,
                destination,
                strategy.name()
            );
        }
        selected
    }
}
