use glam::{Mat4, Vec3};

use crate::errors::Result;
use crate::gpu::{BufferInit, BufferKind, GpuBuffer, GpuDevice};
use crate::resources::uniforms::CameraUniform;

/// A perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
        }
    }

    #[must_use]
    pub fn looking_at(mut self, eye: Vec3, target: Vec3) -> Self {
        self.eye = eye;
        self.target = target;
        self
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Right-handed, depth in `0..1` as wgpu expects.
    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view_matrix(), self.projection_matrix(), self.eye)
    }
}

/// Camera uniform buffer and its group-0 bind group.
pub struct CameraBinding<D: GpuDevice> {
    bind_group: D::BindGroup,
    buffer: D::Buffer,
}

impl<D: GpuDevice> CameraBinding<D> {
    pub fn new(device: &D, layout: &D::BindGroupLayout, camera: &Camera) -> Result<Self> {
        let buffer = device.create_buffer_init(&BufferInit::new(
            Some("Camera Uniforms"),
            bytemuck::bytes_of(&camera.uniform()),
            BufferKind::Uniform,
        ))?;
        let bind_group = device.create_uniform_bind_group(Some("Camera"), layout, &buffer)?;
        Ok(Self { bind_group, buffer })
    }

    /// Uploads the camera's current matrices.
    pub fn update(&self, device: &D, camera: &Camera) {
        device.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&camera.uniform()));
    }

    #[inline]
    pub fn bind_group(&self) -> &D::BindGroup {
        &self.bind_group
    }

    #[inline]
    pub fn buffer(&self) -> &D::Buffer {
        &self.buffer
    }
}

impl<D: GpuDevice> Drop for CameraBinding<D> {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_moves_eye_to_origin() {
        let cam = Camera::new_perspective(60.0, 1.5, 0.1, 100.0)
            .looking_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO);
        let eye_in_view = cam.view_matrix().transform_point3(cam.eye);
        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn uniform_view_projection_is_product() {
        let cam = Camera::new_perspective(45.0, 1.0, 0.1, 50.0);
        let u = cam.uniform();
        assert!(u.view_projection.abs_diff_eq(u.projection * u.view, 1e-6));
        assert_eq!(u.position.w, 1.0);
    }
}
