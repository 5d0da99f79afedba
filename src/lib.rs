//! # Arbor
//!
//! Scene graph and GPU resource binding core.
//!
//! - [`scene`]: node tree with local TRS transforms and per-node transform buffers
//! - [`resources`]: per-primitive geometry buffers and shared material bindings
//! - [`assets`]: decoded documents, the scene importer and the glTF adapter
//! - [`renderer`]: depth-first transform composition and draw submission
//! - [`gpu`]: the device / draw-pass seam and its `wgpu` implementation
//!
//! ```rust,ignore
//! use arbor::{ImportContext, SceneImporter, FrameRenderer, MaterialBinding, WgpuContext, SceneLayouts};
//!
//! let ctx = WgpuContext::new(device.clone(), queue.clone());
//! let layouts = SceneLayouts::new(&ctx.device);
//! let material = MaterialBinding::new_shared(&ctx, &view, &sampler, &layouts.material, Some("Albedo"))?;
//!
//! let document = arbor::assets::load_gltf("model.gltf")?;
//! let root = SceneImporter::new(ImportContext::new(&ctx, &layouts.material, &layouts.transform, material))
//!     .import(&document)?;
//!
//! // every frame, inside a render pass with the pipeline set:
//! FrameRenderer::new().render(&ctx, &mut pass, camera.bind_group(), &root);
//! ```

pub mod assets;
pub mod errors;
pub mod gpu;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;

pub use assets::{ImportContext, ImportStats, SceneDocument, SceneImporter, import_document};
pub use errors::{Result, SceneError};
pub use gpu::{DrawPass, GpuBuffer, GpuDevice, SceneLayouts, WgpuContext};
pub use renderer::{FrameRenderer, FrameStats};
pub use resources::{GeometryResource, MaterialBinding, MaterialCache, PrimitiveData, Tracked};
pub use scene::{Camera, CameraBinding, LocalTransform, SceneNode};
pub use settings::ImportSettings;
