use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the original file extension of a resource whose
/// file carries none (typically resources created from in-memory blobs).
pub const EXTENSION_METADATA_KEY: &str = "extension";

/// Kind of binary asset a resource points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Audio,
    Video,
    Font,
    Json,
    #[default]
    Other,
}

/// A named reference to a binary asset, owned by the project's resource table.
///
/// `file` is either a URL, a relative path or an absolute local path. It can
/// only be changed from inside the crate, after an upload (or download) of
/// the resource has been confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    name: String,
    #[serde(default)]
    kind: ResourceKind,
    file: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl ResourceRecord {
    pub fn new(name: &str, kind: ResourceKind, file: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            file: file.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Original extension recorded for blob-backed resources, normalized
    /// without its leading dot.
    pub fn extension_hint(&self) -> Option<&str> {
        self.metadata
            .get(EXTENSION_METADATA_KEY)
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
    }

    pub(crate) fn set_file(&mut self, file: &str) {
        self.file = file.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateResourceName(pub String);

impl fmt::Display for DuplicateResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a resource named '{}' already exists", self.0)
    }
}

impl std::error::Error for DuplicateResourceName {}

/// Ordered resource table with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ResourceRecord>", into = "Vec<ResourceRecord>")]
pub struct ResourcesManager {
    resources: Vec<ResourceRecord>,
}

impl ResourcesManager {
    pub fn add(&mut self, resource: ResourceRecord) -> Result<(), DuplicateResourceName> {
        if self.has(resource.name()) {
            return Err(DuplicateResourceName(resource.name));
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ResourceRecord> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ResourceRecord> {
        self.resources
            .iter_mut()
            .find(|resource| resource.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl TryFrom<Vec<ResourceRecord>> for ResourcesManager {
    type Error = DuplicateResourceName;

    fn try_from(resources: Vec<ResourceRecord>) -> Result<Self, Self::Error> {
        let mut manager = ResourcesManager::default();
        for resource in resources {
            manager.add(resource)?;
        }
        Ok(manager)
    }
}

impl From<ResourcesManager> for Vec<ResourceRecord> {
    fn from(manager: ResourcesManager) -> Self {
        manager.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut resources = ResourcesManager::default();
        resources
            .add(ResourceRecord::new("hero", ResourceKind::Image, "hero.png"))
            .unwrap();
        let err = resources
            .add(ResourceRecord::new("hero", ResourceKind::Image, "other.png"))
            .unwrap_err();
        assert_eq!(err, DuplicateResourceName("hero".to_string()));
        assert_eq!(resources.len(), 1);
        assert_eq!(resources.get("hero").unwrap().file(), "hero.png");
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[
            {"name": "a", "kind": "image", "file": "a.png"},
            {"name": "a", "kind": "audio", "file": "a.mp3"}
        ]"#;
        let parsed: Result<ResourcesManager, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_extension_hint_strips_dot() {
        let resource = ResourceRecord::new("blob", ResourceKind::Image, "blob:abc")
            .with_metadata(EXTENSION_METADATA_KEY, ".png");
        assert_eq!(resource.extension_hint(), Some("png"));

        let bare = ResourceRecord::new("bare", ResourceKind::Image, "bare.png");
        assert_eq!(bare.extension_hint(), None);
    }
}
