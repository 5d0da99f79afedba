//! glTF adapter.
//!
//! Maps a parsed `gltf::Document` and its buffer blobs onto the plain
//! [`SceneDocument`] records the importer consumes, so nothing past this
//! module depends on the glTF crate.

use std::path::Path;

use crate::assets::document::{DocumentMesh, DocumentNode, DocumentPrimitive, SceneDocument};
use crate::errors::Result;

/// Loads a `.gltf` / `.glb` file (external buffers resolved relative to it)
/// and converts it.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<SceneDocument> {
    let path = path.as_ref();
    log::debug!("Loading glTF {}", path.display());
    let (document, buffers, _images) = gltf::import(path)?;
    Ok(document_from_gltf(&document, &buffers))
}

/// Parses an in-memory `.glb` / self-contained `.gltf` and converts it.
pub fn load_gltf_slice(bytes: &[u8]) -> Result<SceneDocument> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    Ok(document_from_gltf(&document, &buffers))
}

/// Converts every node and mesh, keeping glTF indices, and takes the roots
/// from the default scene (or the first scene when none is marked default).
#[must_use]
pub fn document_from_gltf(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> SceneDocument {
    let nodes = document.nodes().map(|node| convert_node(&node)).collect();
    let meshes = document.meshes().map(|mesh| convert_mesh(&mesh, buffers)).collect();

    let roots = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    if document.scenes().len() > 1 {
        log::warn!("glTF has {} scenes; only one is imported", document.scenes().len());
    }

    SceneDocument { nodes, meshes, roots }
}

fn convert_node(node: &gltf::Node) -> DocumentNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    DocumentNode {
        name: node.name().map(str::to_string),
        translation: Some(translation),
        rotation: Some(rotation),
        scale: Some(scale),
        mesh: node.mesh().map(|m| m.index()),
        children: node.children().map(|c| c.index()).collect(),
    }
}

fn convert_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> DocumentMesh {
    let mut primitives = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Mesh {:?} primitive {} uses {:?}; only triangle lists are drawn, skipping",
                mesh.name(),
                primitive.index(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        primitives.push(DocumentPrimitive {
            positions: reader.read_positions().map(Iterator::collect),
            normals: reader.read_normals().map(Iterator::collect),
            uvs: reader.read_tex_coords(0).map(|uvs| uvs.into_f32().collect()),
            indices: reader.read_indices().map(|indices| indices.into_u32().collect()),
        });
    }

    DocumentMesh {
        name: mesh.name().map(str::to_string),
        primitives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle under a translated child node, buffer embedded as a data
    /// URI (positions then u16 indices padded to 4 bytes).
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "root", "children": [1] },
            { "name": "tri", "translation": [1.0, 0.0, 0.0], "mesh": 0 }
        ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
        "buffers": [ { "byteLength": 44, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA=" } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    #[test]
    fn converts_embedded_triangle() {
        let doc = load_gltf_slice(TRIANGLE_GLTF.as_bytes()).unwrap();

        assert_eq!(doc.roots, vec![0]);
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].children, vec![1]);
        assert_eq!(doc.nodes[1].translation, Some([1.0, 0.0, 0.0]));
        assert_eq!(doc.nodes[1].rotation, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(doc.nodes[1].mesh, Some(0));

        let prim = &doc.meshes[0].primitives[0];
        assert_eq!(prim.vertex_count(), 3);
        assert_eq!(prim.indices.as_deref(), Some([0u32, 1, 2].as_slice()));
        assert_eq!(prim.positions.as_ref().unwrap()[1], [1.0, 0.0, 0.0]);
        assert!(prim.normals.is_none());
        assert!(prim.uvs.is_none());

        assert_eq!(doc.validate(16).unwrap(), vec![0]);
    }
}
