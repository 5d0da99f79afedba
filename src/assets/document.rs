//! Decoded scene document.
//!
//! Plain records produced by an external parser (glTF or otherwise) after
//! accessors have been resolved into typed arrays. The importer only ever sees
//! these structs, never the parser's own types.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::{Result, SceneError};
use crate::resources::geometry::PrimitiveData;

/// A forest of nodes plus the meshes they reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    pub nodes: Vec<DocumentNode>,
    pub meshes: Vec<DocumentMesh>,
    /// Top-level nodes, in order. When empty, every node that is nobody's
    /// child is a root, in index order.
    pub roots: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNode {
    pub name: Option<String>,
    pub translation: Option<[f32; 3]>,
    /// `[x, y, z, w]`.
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMesh {
    pub name: Option<String>,
    pub primitives: Vec<DocumentPrimitive>,
}

/// Resolved accessor arrays of one primitive. `None` means the source had no
/// such accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPrimitive {
    pub positions: Option<Vec<[f32; 3]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
}

impl DocumentPrimitive {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, Vec::len)
    }

    /// Resolves absent channels to empty arrays.
    ///
    /// With `generate_indices`, a primitive without an index accessor gets
    /// `0..vertex_count`. Returns the data and whether indices were generated.
    #[must_use]
    pub fn to_primitive_data(&self, generate_indices: bool) -> (PrimitiveData, bool) {
        let positions = self.positions.clone().unwrap_or_default();
        let (indices, generated) = match &self.indices {
            Some(indices) => (indices.clone(), false),
            None if generate_indices && !positions.is_empty() => {
                ((0..positions.len() as u32).collect(), true)
            }
            None => (Vec::new(), false),
        };

        let data = PrimitiveData {
            positions,
            normals: self.normals.clone().unwrap_or_default(),
            uvs: self.uvs.clone().unwrap_or_default(),
            indices,
        };
        (data, generated)
    }
}

impl SceneDocument {
    // ========================================================================
    // Parsing
    // ========================================================================

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the document's structure and returns the effective root list.
    ///
    /// Fails when an index is out of range, a reachable node has more than
    /// one parent (shared child or cycle), nesting exceeds `max_depth`, or a
    /// primitive index refers past its vertex array. Nodes unreachable from
    /// the roots are ignored.
    pub fn validate(&self, max_depth: usize) -> Result<Vec<usize>> {
        let node_count = self.nodes.len();

        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(mesh) = node.mesh
                && mesh >= self.meshes.len()
            {
                return Err(SceneError::out_of_bounds(format!("node {i} mesh"), mesh));
            }
            if let Some(&child) = node.children.iter().find(|&&c| c >= node_count) {
                return Err(SceneError::out_of_bounds(format!("node {i} child"), child));
            }
        }

        let roots = self.effective_roots()?;

        let mut visited = vec![false; node_count];
        let mut stack: SmallVec<[(usize, usize); 32]> = roots.iter().rev().map(|&r| (r, 1)).collect();

        while let Some((index, depth)) = stack.pop() {
            if visited[index] {
                return Err(SceneError::MalformedDocument(format!(
                    "node {index} is reachable through more than one parent"
                )));
            }
            if depth > max_depth {
                return Err(SceneError::MalformedDocument(format!(
                    "node {index} exceeds the maximum depth of {max_depth}"
                )));
            }
            visited[index] = true;

            let node = &self.nodes[index];
            if let Some(mesh) = node.mesh {
                self.validate_mesh(mesh)?;
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }

        let unreachable = visited.iter().filter(|v| !**v).count();
        if unreachable > 0 {
            log::debug!("{unreachable} document node(s) are not reachable from any root and will be skipped");
        }

        Ok(roots)
    }

    fn effective_roots(&self) -> Result<Vec<usize>> {
        let node_count = self.nodes.len();

        if !self.roots.is_empty() {
            if let Some(&bad) = self.roots.iter().find(|&&r| r >= node_count) {
                return Err(SceneError::out_of_bounds("scene root", bad));
            }
            return Ok(self.roots.clone());
        }

        let mut referenced = vec![false; node_count];
        for node in &self.nodes {
            for &child in &node.children {
                referenced[child] = true;
            }
        }
        let roots: Vec<usize> = (0..node_count).filter(|&i| !referenced[i]).collect();

        if roots.is_empty() && node_count > 0 {
            return Err(SceneError::MalformedDocument(
                "every node is the child of another node; the hierarchy has no root".to_string(),
            ));
        }
        Ok(roots)
    }

    fn validate_mesh(&self, mesh_index: usize) -> Result<()> {
        let mesh = &self.meshes[mesh_index];
        for (p, primitive) in mesh.primitives.iter().enumerate() {
            let vertex_count = primitive.vertex_count();
            if let Some(indices) = &primitive.indices
                && let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count)
            {
                return Err(SceneError::out_of_bounds(
                    format!("mesh {mesh_index} primitive {p} vertex index ({vertex_count} vertices)"),
                    bad as usize,
                ));
            }
        }
        Ok(())
    }
}
