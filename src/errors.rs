//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`SceneError`] covers every failure the scene core can
//! report:
//! - GPU allocation failures (buffers and bind groups)
//! - Malformed or structurally invalid scene documents
//! - Attribute data that cannot be turned into vertex buffers
//! - Document I/O and parsing errors
//!
//! Missing optional attributes (normals, UVs, rotation) are *not* errors; they
//! resolve to documented defaults and the import continues.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, SceneError>`.
//!
//! ```rust,ignore
//! use arbor::errors::{Result, SceneError};
//!
//! fn load() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the scene core.
#[derive(Error, Debug)]
pub enum SceneError {
    // ========================================================================
    // GPU Errors
    // ========================================================================
    /// The device refused to create a buffer or bind group.
    #[error("GPU allocation failed for '{label}': {reason}")]
    Allocation {
        /// Debug label of the resource under construction
        label: String,
        /// Why the device refused the allocation
        reason: String,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// The decoded document is structurally invalid (shared child, cycle,
    /// excessive depth, ...).
    #[error("Malformed scene document: {0}")]
    MalformedDocument(String),

    /// A document index points outside the array it refers to.
    #[error("Document index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// Vertex attribute data is inconsistent (only raised in strict mode).
    #[error("Invalid vertex attribute: {0}")]
    InvalidAttribute(String),

    // ========================================================================
    // Format & I/O Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    Gltf(String),
}

impl SceneError {
    pub(crate) fn allocation(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Allocation {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_bounds(context: impl Into<String>, index: usize) -> Self {
        Self::IndexOutOfBounds {
            context: context.into(),
            index,
        }
    }
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for SceneError {
    fn from(err: gltf::Error) -> Self {
        SceneError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, SceneError>`.
pub type Result<T> = std::result::Result<T, SceneError>;
