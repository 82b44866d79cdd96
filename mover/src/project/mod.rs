//! Project resource table and storage location descriptors.

mod location;
mod resources;

pub use location::{StorageKind, StorageLocation};
pub use resources::{ResourceKind, ResourceRecord, ResourcesManager};

use serde::{Deserialize, Serialize};

/// A game project as far as resource migration is concerned: a name and the
/// table of resources it owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub resources: ResourcesManager,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resources: ResourcesManager::default(),
        }
    }

    pub fn resources(&self) -> &ResourcesManager {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourcesManager {
        &mut self.resources
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
