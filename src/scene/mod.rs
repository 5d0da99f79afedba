//! Scene graph.
//!
//! - [`SceneNode`]: tree node owning children, primitives and a transform buffer
//! - [`LocalTransform`]: translation / rotation / scale
//! - [`Camera`] / [`CameraBinding`]: view-projection uniforms bound at group 0

pub mod camera;
pub mod node;
pub mod transform;

pub use camera::{Camera, CameraBinding};
pub use node::SceneNode;
pub use transform::LocalTransform;
