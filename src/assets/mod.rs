//! Asset ingestion.
//!
//! - [`document`]: parser-independent decoded document records
//! - [`importer`]: document → [`SceneNode`](crate::scene::SceneNode) tree
//! - `gltf_loader`: glTF → document adapter (feature `gltf`)

pub mod document;
pub mod importer;

#[cfg(feature = "gltf")]
pub mod gltf_loader;

pub use document::{DocumentMesh, DocumentNode, DocumentPrimitive, SceneDocument};
pub use importer::{ImportContext, ImportStats, SceneImporter, import_document};

#[cfg(feature = "gltf")]
pub use gltf_loader::{document_from_gltf, load_gltf, load_gltf_slice};
