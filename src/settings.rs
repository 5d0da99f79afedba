//! Import Settings
//!
//! Configuration consumed by [`SceneImporter`](crate::assets::SceneImporter)
//! while turning a decoded document into a node tree.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use arbor::ImportSettings;
//!
//! // Defaults: lenient attributes, no index generation
//! let settings = ImportSettings::default();
//!
//! // Reject inconsistent vertex channels and synthesise missing indices
//! let settings = ImportSettings {
//!     strict_attributes: true,
//!     generate_missing_indices: true,
//!     ..Default::default()
//! };
//!
//! // Or read the same table from a JSON config file
//! let settings = ImportSettings::from_json_str(r#"{ "max_depth": 64 }"#)?;
//! ```

use serde::Deserialize;

use crate::errors::Result;

/// Global configuration for scene import.
///
/// # Fields
///
/// | Field                      | Description                                        | Default |
/// |----------------------------|----------------------------------------------------|---------|
/// | `max_depth`                | Deepest node nesting accepted from a document      | `256`   |
/// | `strict_attributes`        | Fail on mismatched vertex channel lengths          | `false` |
/// | `generate_missing_indices` | Emit `0..vertex_count` for non-indexed primitives  | `false` |
/// | `debug_labels`             | Attach node names to GPU object labels             | `true`  |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Maximum nesting depth of the node tree.
    ///
    /// Traversal is recursive, so a document deeper than this is rejected as
    /// malformed instead of risking stack exhaustion.
    pub max_depth: usize,

    /// When `true`, a normal or UV channel whose length differs from the
    /// position channel aborts the import with
    /// [`SceneError::InvalidAttribute`](crate::SceneError::InvalidAttribute).
    /// When `false` the channel is padded or truncated with a warning.
    pub strict_attributes: bool,

    /// When `true`, primitives without an index accessor get sequential
    /// indices. When `false` they import with an index count of zero and
    /// draw nothing.
    pub generate_missing_indices: bool,

    /// Attach node names to buffer and bind group labels.
    pub debug_labels: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_depth: 256,
            strict_attributes: false,
            generate_missing_indices: false,
            debug_labels: true,
        }
    }
}

impl ImportSettings {
    /// Parses settings from JSON. Absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a GPU object label when debug labels are enabled.
    #[must_use]
    pub(crate) fn label(&self, kind: &str, name: Option<&str>) -> Option<String> {
        if !self.debug_labels {
            return None;
        }
        Some(match name {
            Some(name) => format!("{kind} ({name})"),
            None => kind.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let s = ImportSettings::default();
        assert_eq!(s.max_depth, 256);
        assert!(!s.strict_attributes);
        assert!(!s.generate_missing_indices);
        assert!(s.debug_labels);
    }

    #[test]
    fn json_overrides_only_present_keys() {
        let s = ImportSettings::from_json_str(r#"{ "max_depth": 8, "strict_attributes": true }"#).unwrap();
        assert_eq!(s.max_depth, 8);
        assert!(s.strict_attributes);
        assert!(s.debug_labels);
    }

    #[test]
    fn labels_respect_toggle() {
        let mut s = ImportSettings::default();
        assert_eq!(s.label("Transform", Some("Hull")).as_deref(), Some("Transform (Hull)"));
        s.debug_labels = false;
        assert_eq!(s.label("Transform", Some("Hull")), None);
    }
}
