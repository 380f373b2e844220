//! Module system — manifest-declared tool capabilities.
//!
//! A **module** is a directory under the configured modules root carrying
//! two artifacts: `AGENT.md` (free-text capability description shown to the
//! intent resolver) and `module.yaml` (a manifest naming a compiled-in entry
//! point). Discovery binds manifests to implementations from a [`ToolSet`]
//! and never executes code found on disk.
//!
//! # Architecture
//!
//! ```text
//! modules/<name>/{AGENT.md, module.yaml}
//!   ↓  ModuleLoader::load_modules()
//! ModuleRegistry (name → ToolDescriptor, immutable after discovery)
//! ```
//!
//! [`ToolSet`]: crate::tools::ToolSet

pub mod error;
pub mod loader;
pub mod manifest;

// Re-exports
pub use error::ModuleError;
pub use loader::{ModuleLoader, ModuleRegistry, ToolDescriptor};
pub use manifest::{parse_description, ModuleManifest, MANIFEST_FILENAME, METADATA_FILENAME};
