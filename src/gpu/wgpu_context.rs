//! wgpu Context
//!
//! The [`WgpuContext`] holds the two core GPU handles the scene needs: the
//! device for resource creation and the queue for uploads. Adapter, surface
//! and presentation setup stay with the application.

use wgpu::util::DeviceExt;

use crate::errors::{Result, SceneError};
use crate::gpu::{BufferInit, BufferKind, DrawPass, GpuBuffer, GpuDevice};

/// Core wgpu handles used by the scene graph.
///
/// Both handles are reference counted inside wgpu, so a context can be built
/// from clones of an application's existing device and queue.
#[derive(Debug, Clone)]
pub struct WgpuContext {
    /// The wgpu device for GPU operations
    pub device: wgpu::Device,
    /// The command queue for submitting uploads
    pub queue: wgpu::Queue,
}

impl WgpuContext {
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    fn usage(kind: BufferKind) -> wgpu::BufferUsages {
        match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferKind::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            BufferKind::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        }
    }
}

impl GpuBuffer for wgpu::Buffer {
    #[inline]
    fn size(&self) -> u64 {
        wgpu::Buffer::size(self)
    }

    #[inline]
    fn destroy(&self) {
        wgpu::Buffer::destroy(self);
    }
}

impl GpuDevice for WgpuContext {
    type Buffer = wgpu::Buffer;
    type BindGroup = wgpu::BindGroup;
    type BindGroupLayout = wgpu::BindGroupLayout;
    type TextureView = wgpu::TextureView;
    type Sampler = wgpu::Sampler;

    fn create_buffer_init(&self, desc: &BufferInit<'_>) -> Result<wgpu::Buffer> {
        // wgpu reports oversize requests through the uncaptured error handler
        // rather than a return value, so reject them up front.
        let requested = desc.contents.len() as u64;
        let max = self.device.limits().max_buffer_size;
        if requested > max {
            return Err(SceneError::allocation(
                desc.label.unwrap_or("unnamed buffer"),
                format!("{requested} bytes exceeds max_buffer_size of {max}"),
            ));
        }

        log::debug!("Creating {:?} buffer {:?} ({} bytes)", desc.kind, desc.label, requested);
        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: desc.label,
            contents: desc.contents,
            usage: Self::usage(desc.kind),
        }))
    }

    fn create_uniform_bind_group(
        &self,
        label: Option<&str>,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> Result<wgpu::BindGroup> {
        if buffer.size() == 0 {
            return Err(SceneError::allocation(
                label.unwrap_or("unnamed bind group"),
                "uniform binding requires a non-empty buffer",
            ));
        }
        Ok(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        }))
    }

    fn create_texture_bind_group(
        &self,
        label: Option<&str>,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Result<wgpu::BindGroup> {
        Ok(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }))
    }

    #[inline]
    fn write_buffer(&self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer, offset, data);
    }
}

impl DrawPass<WgpuContext> for wgpu::RenderPass<'_> {
    #[inline]
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(..));
    }

    #[inline]
    fn set_index_buffer(&mut self, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_index_buffer(self, buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    #[inline]
    fn set_bind_group(&mut self, index: u32, bind_group: &wgpu::BindGroup) {
        wgpu::RenderPass::set_bind_group(self, index, bind_group, &[]);
    }

    #[inline]
    fn draw_indexed(&mut self, index_count: u32, instance_count: u32) {
        wgpu::RenderPass::draw_indexed(self, 0..index_count, 0, 0..instance_count);
    }
}
