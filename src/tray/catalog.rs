//! String catalog - key to display-text lookup for menu labels and alerts

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Built-in English strings, embedded so the tray never depends on files
/// being present next to the binary.
const BUILTIN_EN: &str = include_str!("../../assets/strings/en.toml");

/// Read-only key→text lookup used to label menu items and alert dialogs.
///
/// A missing key is not an error at lookup time: `lookup` returns `None`
/// and `label` falls back to the key itself. The tray controller validates
/// the keys it requires once, at construction.
#[derive(Debug, Clone)]
pub struct StringCatalog {
    strings: HashMap<String, String>,
}

impl StringCatalog {
    /// Catalog backed by the embedded English strings.
    pub fn builtin() -> Self {
        // The embedded file is validated by tests; a parse failure here is
        // a packaging defect, not a runtime condition.
        Self::from_toml_str(BUILTIN_EN).unwrap_or_else(|_| Self {
            strings: HashMap::new(),
        })
    }

    /// Parse a catalog from TOML text of flat `key = "text"` pairs.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let strings: HashMap<String, String> = toml::from_str(text).map_err(Error::Catalog)?;
        Ok(Self { strings })
    }

    /// Look up the text for `key`, if present.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Text for `key`, falling back to the key itself when absent.
    pub fn label(&self, key: &str) -> &str {
        self.lookup(key).unwrap_or(key)
    }
}
