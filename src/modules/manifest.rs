//! Module manifest and metadata parsing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ModuleError;

/// File name of the metadata artifact inside a module directory.
pub const METADATA_FILENAME: &str = "AGENT.md";

/// File name of the manifest inside a module directory.
pub const MANIFEST_FILENAME: &str = "module.yaml";

/// Declaration line that starts the description section of a metadata file.
const TOOL_MARKER: &str = "# tool:";

/// Placeholder used when the metadata artifact yields no description lines.
pub const NO_DESCRIPTION: &str = "No description found.";

// ---------------------------------------------------------------------------
// ModuleManifest
// ---------------------------------------------------------------------------

/// Declarative manifest binding a module directory to a compiled-in tool.
///
/// ```yaml
/// entry: websearch
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Name of the compiled-in tool implementation to bind.
    pub entry: String,
}

impl ModuleManifest {
    /// Parse a manifest from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ModuleError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a manifest from a file.
    pub fn from_file(path: &Path) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

// ---------------------------------------------------------------------------
// Metadata parsing
// ---------------------------------------------------------------------------

/// Extract a tool description from metadata text.
///
/// Parsing policy, in priority order:
/// 1. a `# Tool:` declaration line — capture subsequent non-blank lines up
///    to the next blank line;
/// 2. else, a leading heading line — capture all subsequent non-blank lines;
/// 3. else, all non-blank lines.
///
/// Captured lines are joined with single spaces. An empty capture yields the
/// fixed [`NO_DESCRIPTION`] placeholder, never an error.
pub fn parse_description(contents: &str) -> String {
    let lines: Vec<&str> = contents.lines().collect();

    let mut captured: Vec<&str> = Vec::new();
    let mut in_section = false;
    for line in &lines {
        let stripped = line.trim();
        if !in_section && captured.is_empty() && stripped.to_lowercase().starts_with(TOOL_MARKER) {
            in_section = true;
            continue;
        }
        if in_section {
            if stripped.is_empty() {
                break;
            }
            captured.push(stripped);
        }
    }

    if captured.is_empty() && !lines.is_empty() {
        let rest = if lines[0].trim().starts_with('#') {
            &lines[1..]
        } else {
            &lines[..]
        };
        captured = rest
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
    }

    if captured.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        captured.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_from_yaml() {
        let manifest = ModuleManifest::from_yaml("entry: websearch\n").unwrap();
        assert_eq!(manifest.entry, "websearch");
    }

    #[test]
    fn test_manifest_rejects_garbage() {
        assert!(ModuleManifest::from_yaml("not: valid: yaml: [[[").is_err());
        assert!(ModuleManifest::from_yaml("name_only: x\n").is_err());
    }

    #[test]
    fn test_description_from_tool_marker() {
        let md = "# Tool: Web Search\nSearches the public web.\nUse for current events.\n\nNotes below are ignored.\n";
        assert_eq!(
            parse_description(md),
            "Searches the public web. Use for current events."
        );
    }

    #[test]
    fn test_tool_marker_is_case_insensitive() {
        let md = "# tool: something\nline one\n";
        assert_eq!(parse_description(md), "line one");
    }

    #[test]
    fn test_description_falls_back_to_heading_body() {
        let md = "# Some Heading\nFirst line.\n\nSecond line.\n";
        assert_eq!(parse_description(md), "First line. Second line.");
    }

    #[test]
    fn test_description_falls_back_to_all_lines() {
        let md = "Just text.\nMore text.\n";
        assert_eq!(parse_description(md), "Just text. More text.");
    }

    #[test]
    fn test_empty_metadata_yields_placeholder() {
        assert_eq!(parse_description(""), NO_DESCRIPTION);
        assert_eq!(parse_description("# Tool: Name\n\n"), NO_DESCRIPTION);
    }
}
