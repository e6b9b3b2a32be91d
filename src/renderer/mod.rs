//! WebGPU rendering module
//!
//! Scenes are built on the CPU as flat-colour triangle lists and drawn in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{Scene, runner_scene, sorter_scene};
