//! About surface - application identity, website and license opening
//!
//! No window rendering happens here; the shell decides how to present the
//! information. Opening delegates to the platform's default handlers.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// License text shipped inside the binary so "open license" works without
/// an installed data directory.
pub const LICENSE_TEXT: &str = include_str!("../../LICENSE");

/// Identity shown by the about surface.
#[derive(Debug, Clone)]
pub struct AboutInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub website: String,
}

impl AboutInfo {
    pub fn new(website: impl Into<String>) -> Self {
        Self {
            name: crate::APP_NAME,
            version: env!("CARGO_PKG_VERSION"),
            website: website.into(),
        }
    }

    /// One-line "name version" string for dialogs and tooltips.
    pub fn summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Open the project website in the default browser.
    pub fn open_website(&self) -> Result<()> {
        info!("opening website {}", self.website);
        open::that(&self.website)?;
        Ok(())
    }

    /// Open the license text with the default text handler.
    ///
    /// The embedded text is materialized into the platform cache directory
    /// first; the copy is rewritten on every call so upgrades never show a
    /// stale license.
    pub fn open_license(&self) -> Result<()> {
        info!("opening license file");
        let dirs = ProjectDirs::from("com", "perch-app", "Perch").ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no home directory for cache files",
            ))
        })?;
        let path = materialize_license(dirs.cache_dir())?;
        open::that(&path)?;
        Ok(())
    }
}

/// Write the embedded license text under `dir` and return its path.
pub fn materialize_license(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("LICENSE.txt");
    std::fs::write(&path, LICENSE_TEXT)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_contains_name_and_version() {
        let info = AboutInfo::new("https://example.com");
        assert!(info.summary().starts_with(crate::APP_NAME));
        assert!(info.summary().ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_materialize_license() {
        let dir = tempfile::tempdir().unwrap();
        let path = materialize_license(dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, LICENSE_TEXT);

        // Rewriting over an existing copy is fine.
        let again = materialize_license(dir.path()).unwrap();
        assert_eq!(again, path);
    }
}
