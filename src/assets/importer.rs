//! Scene import.
//!
//! Converts a validated [`SceneDocument`] into a [`SceneNode`] tree, allocating
//! one transform buffer per node and one [`GeometryResource`] per primitive.
//!
//! The import either returns a complete tree or an error: the document is
//! validated before the first GPU object is created, and any allocation
//! failure mid-way drops everything built so far.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::assets::document::{DocumentNode, SceneDocument};
use crate::errors::Result;
use crate::gpu::GpuDevice;
use crate::resources::geometry::GeometryResource;
use crate::resources::material::MaterialBinding;
use crate::scene::node::SceneNode;
use crate::scene::transform::LocalTransform;
use crate::settings::ImportSettings;

/// Device handles and shared state threaded through every node the importer
/// builds.
pub struct ImportContext<'a, D: GpuDevice> {
    pub device: &'a D,
    /// Layout of the per-node model transform (one uniform buffer).
    pub transform_layout: &'a D::BindGroupLayout,
    /// Layout the shared material was created against (texture + sampler).
    pub texture_layout: &'a D::BindGroupLayout,
    /// Material attached to every imported primitive.
    pub material: Arc<MaterialBinding<D>>,
    pub settings: ImportSettings,
}

impl<'a, D: GpuDevice> ImportContext<'a, D> {
    pub fn new(
        device: &'a D,
        texture_layout: &'a D::BindGroupLayout,
        transform_layout: &'a D::BindGroupLayout,
        material: Arc<MaterialBinding<D>>,
    ) -> Self {
        Self {
            device,
            transform_layout,
            texture_layout,
            material,
            settings: ImportSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Counters collected during one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Nodes created, including the synthetic root.
    pub nodes: usize,
    pub primitives: usize,
    /// Normal/UV channels zero-filled or resized.
    pub padded_channels: usize,
    /// Primitives that received generated sequential indices.
    pub generated_indices: usize,
    /// Rotations that were degenerate and replaced by identity.
    pub degenerate_rotations: usize,
}

/// Builds scene trees from decoded documents.
pub struct SceneImporter<'a, D: GpuDevice> {
    ctx: ImportContext<'a, D>,
    stats: ImportStats,
}

impl<'a, D: GpuDevice> SceneImporter<'a, D> {
    pub fn new(ctx: ImportContext<'a, D>) -> Self {
        Self {
            ctx,
            stats: ImportStats::default(),
        }
    }

    /// Statistics of the most recent [`import`](Self::import).
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    /// Imports `document` under a fresh identity root node.
    ///
    /// The document's root nodes become the root's children, in order.
    pub fn import(&mut self, document: &SceneDocument) -> Result<SceneNode<D>> {
        self.stats = ImportStats::default();

        let roots = document.validate(self.ctx.settings.max_depth)?;

        let root_label = self.ctx.settings.label("Model Transform", Some("Scene Root"));
        let mut root = SceneNode::create(
            self.ctx.device,
            self.ctx.transform_layout,
            Some("Scene Root".to_string()),
            root_label.as_deref(),
        )?;
        self.stats.nodes += 1;

        for index in roots {
            let child = self.import_node(document, index)?;
            root.add_child(child);
        }

        log::info!(
            "Imported scene: {} nodes, {} primitives ({} padded channels, {} generated index lists)",
            self.stats.nodes,
            self.stats.primitives,
            self.stats.padded_channels,
            self.stats.generated_indices
        );
        Ok(root)
    }

    fn import_node(&mut self, document: &SceneDocument, index: usize) -> Result<SceneNode<D>> {
        let record = &document.nodes[index];
        let name = record.name.clone().unwrap_or_else(|| format!("Node_{index}"));
        log::trace!("Importing node {index} '{name}'");

        let label = self.ctx.settings.label("Model Transform", Some(&name));
        let mut node = SceneNode::create(
            self.ctx.device,
            self.ctx.transform_layout,
            Some(name.clone()),
            label.as_deref(),
        )?;
        self.stats.nodes += 1;

        let transform = self.resolve_transform(record, &name);
        node.set_translation(transform.translation);
        node.set_rotation(transform.rotation);
        node.set_scale(transform.scale);

        if let Some(mesh_index) = record.mesh {
            let mesh = &document.meshes[mesh_index];
            for (p, primitive) in mesh.primitives.iter().enumerate() {
                let (data, generated) = primitive.to_primitive_data(self.ctx.settings.generate_missing_indices);
                let label = self.ctx.settings.label(&format!("Primitive {p}"), Some(&name));

                let geometry = GeometryResource::new(
                    self.ctx.device,
                    &data,
                    Arc::clone(&self.ctx.material),
                    label.as_deref(),
                    self.ctx.settings.strict_attributes,
                )?;

                self.stats.primitives += 1;
                self.stats.padded_channels += usize::from(geometry.padded_channels());
                self.stats.generated_indices += usize::from(generated);
                node.add_primitive(geometry);
            }
        }

        for &child_index in &record.children {
            let child = self.import_node(document, child_index)?;
            node.add_child(child);
        }

        Ok(node)
    }

    fn resolve_transform(&mut self, record: &DocumentNode, name: &str) -> LocalTransform {
        let translation = record.translation.map_or(Vec3::ZERO, Vec3::from_array);
        let scale = record.scale.map_or(Vec3::ONE, Vec3::from_array);

        let rotation = match record.rotation {
            None => Quat::IDENTITY,
            Some(xyzw) => LocalTransform::rotation_from_array(xyzw).unwrap_or_else(|| {
                log::warn!("Node '{name}' has a degenerate rotation {xyzw:?}; using identity");
                self.stats.degenerate_rotations += 1;
                Quat::IDENTITY
            }),
        };

        LocalTransform::new(translation, rotation, scale)
    }
}

/// One-shot import. Statistics are logged, then discarded.
pub fn import_document<D: GpuDevice>(document: &SceneDocument, ctx: ImportContext<'_, D>) -> Result<SceneNode<D>> {
    SceneImporter::new(ctx).import(document)
}
