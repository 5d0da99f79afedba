use glam::{Mat4, Quat, Vec3};

use crate::errors::Result;
use crate::gpu::{BufferInit, BufferKind, GpuBuffer, GpuDevice};
use crate::resources::geometry::GeometryResource;
use crate::resources::uniforms::TransformUniform;
use crate::scene::transform::LocalTransform;

/// A node of the scene tree.
///
/// # Ownership
///
/// A node exclusively owns its children and its primitives. Both are moved in
/// through [`add_child`](Self::add_child) / [`add_primitive`](Self::add_primitive),
/// so a node can never have two parents and the tree can never contain a
/// cycle.
///
/// # GPU resources
///
/// Every node owns a uniform buffer holding exactly one `mat4x4<f32>` and a
/// bind group over it, created against the shared model-transform layout.
/// The buffer starts as identity and is overwritten with the composed world
/// matrix each frame by [`FrameRenderer`](crate::renderer::FrameRenderer).
///
/// # Destruction
///
/// Dropping a node destroys, in order: all children (recursively), all owned
/// primitives, then its own transform buffer and binding.
pub struct SceneNode<D: GpuDevice> {
    name: Option<String>,
    transform: LocalTransform,

    children: Vec<SceneNode<D>>,
    primitives: Vec<GeometryResource<D>>,

    transform_bind_group: D::BindGroup,
    transform_buffer: D::Buffer,
}

impl<D: GpuDevice> SceneNode<D> {
    /// Creates an unnamed node with an identity transform.
    pub fn new(device: &D, transform_layout: &D::BindGroupLayout) -> Result<Self> {
        Self::create(device, transform_layout, None, Some("Model Transform"))
    }

    /// Creates a named node; the name also labels its GPU objects.
    pub fn with_name(device: &D, transform_layout: &D::BindGroupLayout, name: &str) -> Result<Self> {
        let label = format!("Model Transform ({name})");
        Self::create(device, transform_layout, Some(name.to_string()), Some(&label))
    }

    pub(crate) fn create(
        device: &D,
        transform_layout: &D::BindGroupLayout,
        name: Option<String>,
        label: Option<&str>,
    ) -> Result<Self> {
        let transform_buffer = device.create_buffer_init(&BufferInit::new(
            label,
            bytemuck::bytes_of(&TransformUniform::IDENTITY),
            BufferKind::Uniform,
        ))?;
        let transform_bind_group =
            device.create_uniform_bind_group(label, transform_layout, &transform_buffer)?;

        Ok(Self {
            name,
            transform: LocalTransform::IDENTITY,
            children: Vec::new(),
            primitives: Vec::new(),
            transform_bind_group,
            transform_buffer,
        })
    }

    // ========================================================================
    // Local transform (import-time mutation only)
    // ========================================================================

    #[inline]
    pub fn set_translation(&mut self, translation: Vec3) {
        self.transform.translation = translation;
    }

    #[inline]
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> &LocalTransform {
        &self.transform
    }

    /// `translation · rotation · scale`.
    #[inline]
    #[must_use]
    pub fn compute_local_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Takes ownership of `child`, appending it after existing children.
    pub fn add_child(&mut self, child: SceneNode<D>) {
        self.children.push(child);
    }

    /// Takes ownership of `geometry`, appending it to the draw list.
    pub fn add_primitive(&mut self, geometry: GeometryResource<D>) {
        self.primitives.push(geometry);
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[SceneNode<D>] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn primitives(&self) -> &[GeometryResource<D>] {
        &self.primitives
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of primitives in this subtree.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitives.len() + self.children.iter().map(SceneNode::primitive_count).sum::<usize>()
    }

    // ========================================================================
    // GPU side
    // ========================================================================

    /// Overwrites the transform buffer with `world_matrix`.
    pub fn write_transform(&self, device: &D, world_matrix: &Mat4) {
        let uniform = TransformUniform::new(*world_matrix);
        device.write_buffer(&self.transform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    #[inline]
    pub fn transform_bind_group(&self) -> &D::BindGroup {
        &self.transform_bind_group
    }

    #[inline]
    pub fn transform_buffer(&self) -> &D::Buffer {
        &self.transform_buffer
    }
}

impl<D: GpuDevice> Drop for SceneNode<D> {
    fn drop(&mut self) {
        // Children first, then our own primitives, then our own buffer.
        self.children.clear();
        self.primitives.clear();
        log::trace!("Destroying transform buffer of node {:?}", self.name);
        self.transform_buffer.destroy();
    }
}

impl<D: GpuDevice> std::fmt::Debug for SceneNode<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("children", &self.children)
            .field("primitives", &self.primitives)
            .finish_non_exhaustive()
    }
}
