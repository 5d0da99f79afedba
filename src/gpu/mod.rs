//! GPU device seam.
//!
//! The scene core never talks to a graphics API directly. It allocates and
//! binds through two small traits:
//!
//! - [`GpuDevice`]: buffer / bind group creation and queue writes
//! - [`DrawPass`]: the handful of render-pass commands the traversal issues
//!
//! [`WgpuContext`] implements both over `wgpu`. Tests plug in a recording
//! device instead, which is what makes draw order, buffer contents and
//! destruction order observable without a physical adapter.

pub mod layouts;
pub mod wgpu_context;

pub use layouts::SceneLayouts;
pub use wgpu_context::WgpuContext;

/// Role of a buffer, mapped to concrete usage flags by the device.
///
/// Every kind is also a copy destination so contents can be uploaded through
/// the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data.
    Vertex,
    /// `u32` index data.
    Index,
    /// Uniform data rewritten from the CPU (transforms, camera).
    Uniform,
}

/// Description of a buffer created with initial contents.
#[derive(Debug, Clone, Copy)]
pub struct BufferInit<'a> {
    pub label: Option<&'a str>,
    pub contents: &'a [u8],
    pub kind: BufferKind,
}

impl<'a> BufferInit<'a> {
    #[inline]
    #[must_use]
    pub fn new(label: Option<&'a str>, contents: &'a [u8], kind: BufferKind) -> Self {
        Self { label, contents, kind }
    }
}

/// A device-side buffer handle.
pub trait GpuBuffer {
    /// Size in bytes.
    fn size(&self) -> u64;

    /// Releases the device memory. The handle must not be bound afterwards.
    fn destroy(&self);
}

/// The resource-creation surface the scene core needs from a device.
pub trait GpuDevice {
    type Buffer: GpuBuffer;
    type BindGroup;
    type BindGroupLayout;
    type TextureView;
    type Sampler;

    /// Creates a buffer sized exactly to `desc.contents` and uploads them once.
    fn create_buffer_init(&self, desc: &BufferInit<'_>) -> crate::Result<Self::Buffer>;

    /// Creates a bind group with a single uniform buffer at binding 0.
    fn create_uniform_bind_group(
        &self,
        label: Option<&str>,
        layout: &Self::BindGroupLayout,
        buffer: &Self::Buffer,
    ) -> crate::Result<Self::BindGroup>;

    /// Creates a bind group with a texture view at binding 0 and a sampler at
    /// binding 1.
    fn create_texture_bind_group(
        &self,
        label: Option<&str>,
        layout: &Self::BindGroupLayout,
        view: &Self::TextureView,
        sampler: &Self::Sampler,
    ) -> crate::Result<Self::BindGroup>;

    /// Queues a write of `data` into `buffer` at `offset`.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]);
}

/// The render-pass commands issued by [`FrameRenderer`](crate::renderer::FrameRenderer).
pub trait DrawPass<D: GpuDevice + ?Sized> {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &D::Buffer);

    /// Binds a buffer of `u32` indices.
    fn set_index_buffer(&mut self, buffer: &D::Buffer);

    fn set_bind_group(&mut self, index: u32, bind_group: &D::BindGroup);

    fn draw_indexed(&mut self, index_count: u32, instance_count: u32);
}
