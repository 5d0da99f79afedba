//! Per-primitive GPU geometry.

use std::borrow::Cow;
use std::sync::Arc;

use crate::errors::{Result, SceneError};
use crate::gpu::{BufferInit, BufferKind, GpuBuffer, GpuDevice};
use crate::resources::material::MaterialBinding;

/// Decoded CPU-side arrays for one primitive.
///
/// An empty channel means the attribute was absent in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl PrimitiveData {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// One drawable primitive's vertex/index buffers plus its shared material.
///
/// Built once at import time and immutable afterwards. Dropping it destroys
/// the four buffers; the material binding is released only when its last
/// holder goes away.
pub struct GeometryResource<D: GpuDevice> {
    positions: D::Buffer,
    normals: D::Buffer,
    uvs: D::Buffer,
    indices: D::Buffer,
    vertex_count: u32,
    index_count: u32,
    padded_channels: u8,
    material: Arc<MaterialBinding<D>>,
}

impl<D: GpuDevice> GeometryResource<D> {
    /// Allocates and uploads the four buffers.
    ///
    /// A missing normal or UV channel is zero-filled to the vertex count so
    /// all three vertex slots stay bindable. A channel whose length differs
    /// from the position count is resized with a warning, or rejected when
    /// `strict` is set.
    pub fn new(
        device: &D,
        data: &PrimitiveData,
        material: Arc<MaterialBinding<D>>,
        label: Option<&str>,
        strict: bool,
    ) -> Result<Self> {
        let vertex_count = data.vertex_count();
        let name = label.unwrap_or("Primitive");

        if let Some(&bad) = data.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SceneError::InvalidAttribute(format!(
                "{name}: index {bad} out of range for {vertex_count} vertices"
            )));
        }

        let mut padded_channels = 0;
        let normals = conform_channel(name, "normal", &data.normals, vertex_count, strict, &mut padded_channels)?;
        let uvs = conform_channel(name, "uv", &data.uvs, vertex_count, strict, &mut padded_channels)?;

        let positions_label = label.map(|l| format!("{l} Positions"));
        let normals_label = label.map(|l| format!("{l} Normals"));
        let uvs_label = label.map(|l| format!("{l} UVs"));
        let indices_label = label.map(|l| format!("{l} Indices"));

        let positions = device.create_buffer_init(&BufferInit::new(
            positions_label.as_deref(),
            bytemuck::cast_slice(&data.positions),
            BufferKind::Vertex,
        ))?;
        let normals = device.create_buffer_init(&BufferInit::new(
            normals_label.as_deref(),
            bytemuck::cast_slice(&normals),
            BufferKind::Vertex,
        ))?;
        let uvs = device.create_buffer_init(&BufferInit::new(
            uvs_label.as_deref(),
            bytemuck::cast_slice(&uvs),
            BufferKind::Vertex,
        ))?;
        let indices = device.create_buffer_init(&BufferInit::new(
            indices_label.as_deref(),
            bytemuck::cast_slice(&data.indices),
            BufferKind::Index,
        ))?;

        log::trace!(
            "Geometry '{name}': {vertex_count} vertices, {} indices",
            data.indices.len()
        );

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
            vertex_count: vertex_count as u32,
            index_count: data.indices.len() as u32,
            padded_channels,
            material,
        })
    }

    #[inline]
    pub fn positions(&self) -> &D::Buffer {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> &D::Buffer {
        &self.normals
    }

    #[inline]
    pub fn uvs(&self) -> &D::Buffer {
        &self.uvs
    }

    #[inline]
    pub fn indices(&self) -> &D::Buffer {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    #[inline]
    pub fn material(&self) -> &Arc<MaterialBinding<D>> {
        &self.material
    }

    /// Number of normal/UV channels that were synthesised or resized.
    #[inline]
    #[must_use]
    pub fn padded_channels(&self) -> u8 {
        self.padded_channels
    }

    /// Zero vertices or zero indices is valid but draws nothing.
    #[inline]
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.vertex_count > 0 && self.index_count > 0
    }
}

impl<D: GpuDevice> Drop for GeometryResource<D> {
    fn drop(&mut self) {
        log::trace!("Destroying geometry buffers ({} indices)", self.index_count);
        self.positions.destroy();
        self.normals.destroy();
        self.uvs.destroy();
        self.indices.destroy();
    }
}

impl<D: GpuDevice> std::fmt::Debug for GeometryResource<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryResource")
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count)
            .field("padded_channels", &self.padded_channels)
            .finish_non_exhaustive()
    }
}

fn conform_channel<'a, T: Copy + Default>(
    primitive: &str,
    channel: &str,
    data: &'a [T],
    vertex_count: usize,
    strict: bool,
    padded: &mut u8,
) -> Result<Cow<'a, [T]>> {
    if data.len() == vertex_count {
        return Ok(Cow::Borrowed(data));
    }

    if data.is_empty() {
        log::debug!("{primitive}: no {channel} channel, zero-filling {vertex_count} entries");
        *padded += 1;
        return Ok(Cow::Owned(vec![T::default(); vertex_count]));
    }

    if strict {
        return Err(SceneError::InvalidAttribute(format!(
            "{primitive}: {channel} channel has {} entries, expected {vertex_count}",
            data.len()
        )));
    }

    log::warn!(
        "{primitive}: {channel} channel has {} entries, expected {vertex_count}; resizing",
        data.len()
    );
    *padded += 1;
    let mut owned = data.to_vec();
    owned.resize(vertex_count, T::default());
    Ok(Cow::Owned(owned))
}
