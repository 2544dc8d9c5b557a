//! Wire format of the release feed.
//!
//! The feed is a JSON document grouping releases into named categories.
//! Unknown fields are ignored for forward compatibility, and a category may
//! carry `"Releases": null`.

use crate::error::{Result, UpdateError};
use crate::feed::release::FileDescriptor;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedDocument {
    pub categories: Vec<FeedCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedCategory {
    pub name: String,
    pub releases: Option<Vec<FeedRelease>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedRelease {
    pub version: String,
    #[serde(default)]
    pub change_log: Vec<String>,
    pub file: Option<FileDescriptor>,
}

impl FeedDocument {
    /// Decode a feed document from raw response bytes.
    ///
    /// An empty body maps to [`UpdateError::ResponseEmpty`]; anything that
    /// is not a well-formed document with a `Categories` field maps to
    /// [`UpdateError::FeedMalformed`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(UpdateError::ResponseEmpty);
        }
        serde_json::from_slice(bytes).map_err(UpdateError::malformed)
    }
}
