//! GPU uniform layouts.
//!
//! Plain `#[repr(C)]` structs uploaded verbatim through
//! [`GpuDevice::write_buffer`](crate::gpu::GpuDevice::write_buffer). Field
//! order and sizes match the WGSL declarations below.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

// ============================================================================
// Model Transform (group 1)
// ============================================================================

/// Per-node model matrix.
///
/// ```wgsl
/// struct ModelTransform { model: mat4x4<f32> };
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: Mat4,
}

impl TransformUniform {
    /// Byte size of one transform; every node's buffer is exactly this size.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub const IDENTITY: Self = Self { model: Mat4::IDENTITY };

    #[inline]
    #[must_use]
    pub fn new(model: Mat4) -> Self {
        Self { model }
    }
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// Camera (group 0)
// ============================================================================

/// ```wgsl
/// struct Camera {
///     view_projection: mat4x4<f32>,
///     view: mat4x4<f32>,
///     projection: mat4x4<f32>,
///     position: vec4<f32>,
/// };
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// World-space eye position, `w = 1`.
    pub position: Vec4,
}

impl CameraUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    #[must_use]
    pub fn new(view: Mat4, projection: Mat4, position: Vec3) -> Self {
        Self {
            view_projection: projection * view,
            view,
            projection,
            position: position.extend(1.0),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO)
    }
}
