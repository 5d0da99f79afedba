use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local TRS transform of a scene node.
///
/// The composed matrix is always `translation · rotation · scale`; no other
/// order produces the same result once scale is non-uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// `T · R · S`.
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale)
    }

    /// Sets rotation from XYZ Euler angles in radians.
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Interprets `[x, y, z, w]` as a rotation.
    ///
    /// A near-zero or non-finite quaternion describes no rotation at all and
    /// yields `None`; anything else is normalised.
    #[must_use]
    pub fn rotation_from_array(xyzw: [f32; 4]) -> Option<Quat> {
        let q = Quat::from_array(xyzw);
        let len = q.length();
        if !len.is_finite() || len < 1e-6 {
            return None;
        }
        Some(q / len)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
