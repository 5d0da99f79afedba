//! Per-frame traversal.
//!
//! Walks the node tree depth-first in pre-order, composing world matrices
//! from the root down, uploading each node's matrix and issuing one indexed
//! draw per drawable primitive. Siblings are visited in insertion order;
//! there is no culling, sorting or batching.

use glam::Mat4;

use crate::gpu::layouts::{MATERIAL_GROUP, NORMAL_SLOT, POSITION_SLOT, TRANSFORM_GROUP, UV_SLOT, CAMERA_GROUP};
use crate::gpu::{DrawPass, GpuDevice};
use crate::scene::node::SceneNode;

/// Counters for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes_visited: usize,
    pub draw_calls: usize,
    /// Primitives with zero vertices or zero indices.
    pub skipped_primitives: usize,
}

/// Draw orchestrator for a scene tree.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    last_stats: FrameStats,
}

impl FrameRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `camera` at group 0 and draws everything reachable from `root`,
    /// starting from the identity matrix.
    pub fn render<D, P>(&mut self, device: &D, pass: &mut P, camera: &D::BindGroup, root: &SceneNode<D>) -> FrameStats
    where
        D: GpuDevice,
        P: DrawPass<D> + ?Sized,
    {
        pass.set_bind_group(CAMERA_GROUP, camera);

        let mut stats = FrameStats::default();
        Self::visit(device, pass, root, &Mat4::IDENTITY, &mut stats);

        log::trace!(
            "Frame: {} nodes, {} draws, {} skipped",
            stats.nodes_visited,
            stats.draw_calls,
            stats.skipped_primitives
        );
        self.last_stats = stats;
        stats
    }

    /// Visits `node` and its subtree under `parent_world`.
    ///
    /// 1. `world = parent_world · local`
    /// 2. upload `world` into the node's transform buffer
    /// 3. draw each primitive in list order
    /// 4. recurse into each child in list order with `world`
    pub fn visit<D, P>(device: &D, pass: &mut P, node: &SceneNode<D>, parent_world: &Mat4, stats: &mut FrameStats)
    where
        D: GpuDevice,
        P: DrawPass<D> + ?Sized,
    {
        let world = *parent_world * node.compute_local_matrix();
        node.write_transform(device, &world);
        stats.nodes_visited += 1;

        for primitive in node.primitives() {
            if !primitive.is_drawable() {
                log::debug!(
                    "Skipping primitive of node {:?}: {} vertices, {} indices",
                    node.name(),
                    primitive.vertex_count(),
                    primitive.index_count()
                );
                stats.skipped_primitives += 1;
                continue;
            }

            pass.set_vertex_buffer(POSITION_SLOT, primitive.positions());
            pass.set_vertex_buffer(NORMAL_SLOT, primitive.normals());
            pass.set_vertex_buffer(UV_SLOT, primitive.uvs());
            pass.set_index_buffer(primitive.indices());
            pass.set_bind_group(MATERIAL_GROUP, primitive.material().bind_group());
            pass.set_bind_group(TRANSFORM_GROUP, node.transform_bind_group());
            pass.draw_indexed(primitive.index_count(), 1);
            stats.draw_calls += 1;
        }

        for child in node.children() {
            Self::visit(device, pass, child, &world, stats);
        }
    }

    /// Statistics of the most recent [`render`](Self::render).
    #[inline]
    #[must_use]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
