//! Frame submission.

pub mod frame;

pub use frame::{FrameRenderer, FrameStats};
