//! Module system errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during module discovery.
///
/// Only [`ModuleError::ModulesDirNotFound`] and [`ModuleError::Io`] at the
/// root scan are fatal to discovery; every per-candidate error is logged and
/// the candidate skipped.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The configured modules root does not exist or is not a directory.
    #[error("modules directory not found: {0}")]
    ModulesDirNotFound(PathBuf),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest parsing failed.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_yaml::Error),

    /// The module directory has no manifest file.
    #[error("missing manifest: {0}")]
    MissingManifest(PathBuf),

    /// The module directory has no metadata artifact.
    #[error("missing metadata artifact: {0}")]
    MissingMetadata(PathBuf),

    /// The manifest names an entry point with no compiled-in implementation.
    #[error("unknown entry point '{entry}' for module '{module}'")]
    UnknownEntry { module: String, entry: String },
}
