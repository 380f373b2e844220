//! Module discovery — scans the modules directory and binds manifests to
//! compiled-in tool implementations.
//!
//! The loader turns a directory layout into a [`ModuleRegistry`] by:
//! 1. Listing the immediate child directories of the modules root
//! 2. Requiring each candidate to carry `module.yaml` and `AGENT.md`
//! 3. Resolving the manifest's `entry` against the [`ToolSet`]
//! 4. Parsing the metadata artifact into a capability description
//!
//! Candidates failing any check are logged and skipped; only a missing or
//! unreadable root directory fails the whole discovery pass. The returned
//! registry is immutable — build it once at startup and share it by
//! reference across requests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tools::{ToolHandle, ToolSet};

use super::error::ModuleError;
use super::manifest::{parse_description, ModuleManifest, MANIFEST_FILENAME, METADATA_FILENAME};

// ---------------------------------------------------------------------------
// ToolDescriptor
// ---------------------------------------------------------------------------

/// A discovered capability: stable name, resolver-facing description, and
/// the shared handle to its implementation.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique capability name (the module directory name).
    pub name: String,
    /// Free-text description extracted from the metadata artifact.
    pub description: String,
    /// Handle to the bound tool implementation.
    pub handle: ToolHandle,
}

// ---------------------------------------------------------------------------
// ModuleRegistry
// ---------------------------------------------------------------------------

/// Mapping of capability name → [`ToolDescriptor`].
///
/// Populated during discovery (or programmatically by embedding callers and
/// tests), then treated as read-only for the process lifetime.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    tools: HashMap<String, ToolDescriptor>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name. Last write wins.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        self.tools.insert(descriptor.name.clone(), descriptor);
    }

    /// Look up a capability by exact name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Whether a capability with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Capability names, sorted for deterministic output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render the capability table shown to the intent resolver.
    pub fn description_table(&self) -> String {
        let mut table = String::from("Available Tools:\n");
        if self.is_empty() {
            table.push_str("- No tools available.\n");
            return table;
        }
        for name in self.names() {
            // names() only returns registered keys
            if let Some(descriptor) = self.tools.get(name) {
                table.push_str(&format!("- Tool Name: {}\n", descriptor.name));
                table.push_str(&format!("  Description: {}\n", descriptor.description));
            }
        }
        table
    }
}

// ---------------------------------------------------------------------------
// ModuleLoader
// ---------------------------------------------------------------------------

/// Discovers modules on disk and resolves them into a [`ModuleRegistry`].
#[derive(Debug)]
pub struct ModuleLoader {
    modules_dir: PathBuf,
    toolset: ToolSet,
}

impl ModuleLoader {
    /// Create a loader over the configured modules directory.
    pub fn new(toolset: ToolSet) -> Self {
        Self::with_modules_dir(crate::config::modules_dir(), toolset)
    }

    /// Create a loader over a specific modules directory.
    pub fn with_modules_dir(path: impl Into<PathBuf>, toolset: ToolSet) -> Self {
        Self {
            modules_dir: path.into(),
            toolset,
        }
    }

    /// The directory this loader scans.
    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Scan the modules directory and build the registry.
    ///
    /// Invalid candidates are skipped with a warning. Fails only if the
    /// root directory itself is missing or unreadable.
    pub fn load_modules(&self) -> Result<ModuleRegistry, ModuleError> {
        if !self.modules_dir.is_dir() {
            return Err(ModuleError::ModulesDirNotFound(self.modules_dir.clone()));
        }

        let mut registry = ModuleRegistry::new();
        for entry in fs::read_dir(&self.modules_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match self.load_candidate(&name, &path) {
                Ok(descriptor) => {
                    log::info!("loaded module '{}'", name);
                    registry.register(descriptor);
                }
                Err(e) => log::warn!("skipping module '{}': {}", name, e),
            }
        }

        if registry.is_empty() {
            log::warn!("no modules loaded from {}", self.modules_dir.display());
        } else {
            log::info!(
                "discovery finished, {} tools available: {:?}",
                registry.len(),
                registry.names()
            );
        }
        Ok(registry)
    }

    /// Validate one candidate directory and resolve it into a descriptor.
    fn load_candidate(&self, name: &str, dir: &Path) -> Result<ToolDescriptor, ModuleError> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return Err(ModuleError::MissingManifest(manifest_path));
        }
        let metadata_path = dir.join(METADATA_FILENAME);
        if !metadata_path.is_file() {
            return Err(ModuleError::MissingMetadata(metadata_path));
        }

        let manifest = ModuleManifest::from_file(&manifest_path)?;
        let handle = self
            .toolset
            .get(&manifest.entry)
            .ok_or_else(|| ModuleError::UnknownEntry {
                module: name.to_string(),
                entry: manifest.entry.clone(),
            })?;

        let description = parse_description(&fs::read_to_string(&metadata_path)?);
        Ok(ToolDescriptor {
            name: name.to_string(),
            description,
            handle,
        })
    }
}
