//! GPU-side scene resources.
//!
//! - [`GeometryResource`]: vertex/index buffers of one primitive
//! - [`MaterialBinding`]: shared texture + sampler bind group
//! - [`MaterialCache`]: one binding per distinct texture
//! - uniform layouts uploaded to transform and camera buffers

pub mod geometry;
pub mod material;
pub mod tracked;
pub mod uniforms;

pub use geometry::{GeometryResource, PrimitiveData};
pub use material::{MaterialBinding, MaterialCache};
pub use tracked::Tracked;
pub use uniforms::{CameraUniform, TransformUniform};
