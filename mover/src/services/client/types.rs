use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the user on whose behalf resources are fetched and uploaded
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

impl AuthenticatedCaller {
    pub fn new(user_id: &str, access_token: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for AuthenticatedCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedCaller")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Upload credentials issued for one destination project
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct UploadCredentials {
    pub token: String,
}

/// One file in an upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

/// Per-file answer of the upload service, index-aligned with the request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadResponseItem {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponseItem {
    pub fn uploaded(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            url: None,
            error: Some(error.to_string()),
        }
    }
}
