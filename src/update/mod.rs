//! Update metadata - version information for a downloadable release
//!
//! Pure data; fetching a manifest over the network is out of scope.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Free-form key/value pair attached to an update entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAttribute {
    pub name: String,
    pub value: String,
}

/// One platform entry of an update manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformUpdate {
    pub platform_name: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub build_version: u32,
    pub revision_version: u32,
    pub download_url: String,
    pub extra_attributes: Vec<ExtraAttribute>,
}

impl PlatformUpdate {
    /// Parse a single manifest entry from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Version as an ordered quadruple.
    pub fn version(&self) -> (u32, u32, u32, u32) {
        (
            self.major_version,
            self.minor_version,
            self.build_version,
            self.revision_version,
        )
    }

    /// Whether this entry is strictly newer than `current`.
    pub fn is_newer_than(&self, current: (u32, u32, u32, u32)) -> bool {
        self.version() > current
    }

    /// Attribute value by name, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.extra_attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}
