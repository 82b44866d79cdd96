use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Storage backend a project lives on, without its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Project file on a local filesystem
    Local,
    /// Project stored in the platform's cloud storage
    Cloud,
    /// Project opened from a public URL (examples, templates)
    Url,
    /// Throwaway export target (temporary package, preview)
    Ephemeral,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Local => "local",
            StorageKind::Cloud => "cloud",
            StorageKind::Url => "url",
            StorageKind::Ephemeral => "ephemeral",
        };
        f.write_str(name)
    }
}

/// Where a project is stored: the backend plus the address of the project in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageLocation {
    Local { project_file: PathBuf },
    Cloud { project_id: String },
    Url { project_url: String },
    Ephemeral,
}

impl StorageLocation {
    pub fn kind(&self) -> StorageKind {
        match self {
            StorageLocation::Local { .. } => StorageKind::Local,
            StorageLocation::Cloud { .. } => StorageKind::Cloud,
            StorageLocation::Url { .. } => StorageKind::Url,
            StorageLocation::Ephemeral => StorageKind::Ephemeral,
        }
    }

    /// Directory relative resource paths are resolved against
    pub fn project_directory(&self) -> Option<&Path> {
        match self {
            StorageLocation::Local { project_file } => {
                Some(project_file.parent().unwrap_or_else(|| Path::new("")))
            }
            _ => None,
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Local { project_file } => {
                write!(f, "local:{}", project_file.display())
            }
            StorageLocation::Cloud { project_id } => write!(f, "cloud:{}", project_id),
            StorageLocation::Url { project_url } => write!(f, "url:{}", project_url),
            StorageLocation::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocationError(pub String);

impl fmt::Display for ParseLocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid storage location '{}' (expected local:<file>, cloud:<id>, url:<url> or ephemeral)",
            self.0
        )
    }
}

impl std::error::Error for ParseLocationError {}

impl FromStr for StorageLocation {
    type Err = ParseLocationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "ephemeral" {
            return Ok(StorageLocation::Ephemeral);
        }

        let (kind, address) = value
            .split_once(':')
            .filter(|(_, address)| !address.is_empty())
            .ok_or_else(|| ParseLocationError(value.to_string()))?;

        match kind {
            "local" => Ok(StorageLocation::Local {
                project_file: PathBuf::from(address),
            }),
            "cloud" => Ok(StorageLocation::Cloud {
                project_id: address.to_string(),
            }),
            "url" => Ok(StorageLocation::Url {
                project_url: address.to_string(),
            }),
            _ => Err(ParseLocationError(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            "cloud:abc-123".parse::<StorageLocation>().unwrap(),
            StorageLocation::Cloud {
                project_id: "abc-123".to_string()
            }
        );
        assert_eq!(
            "url:https://host/game.json".parse::<StorageLocation>().unwrap(),
            StorageLocation::Url {
                project_url: "https://host/game.json".to_string()
            }
        );
        assert_eq!(
            "ephemeral".parse::<StorageLocation>().unwrap(),
            StorageLocation::Ephemeral
        );
        assert!("cloud:".parse::<StorageLocation>().is_err());
        assert!("ftp:somewhere".parse::<StorageLocation>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let location = StorageLocation::Local {
            project_file: PathBuf::from("/games/demo/game.json"),
        };
        let parsed: StorageLocation = location.to_string().parse().unwrap();
        assert_eq!(parsed, location);
        assert_eq!(parsed.project_directory(), Some(Path::new("/games/demo")));
    }
}
