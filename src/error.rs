//! Central error types for Perch.
//!
//! Construction-time and icon-construction failures are the only variants
//! callers are expected to handle; transient native tray issues are logged
//! and absorbed inside the controller.

use thiserror::Error;

/// Main error type for tray and about operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The string catalog is missing a label the tray menu requires.
    #[error("string catalog is missing required key '{0}'")]
    MissingLabel(String),

    /// The string catalog could not be parsed.
    #[error("invalid string catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    /// The icon asset could not be decoded or scaled.
    #[error("failed to load tray icon image: {0}")]
    Icon(#[from] image::ImageError),

    /// An update manifest entry could not be parsed.
    #[error("invalid update manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The native tray rejected the icon (resource exhaustion, missing
    /// tray host). Absorbed by `show`; surfaced only through backends.
    #[error("tray registration failed: {0}")]
    Registration(String),

    /// Filesystem error (license materialization, config directories).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
