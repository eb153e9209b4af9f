//! wgpu render backend for the chessboard scene.
//!
//! Draws the scene graph with instanced meshes, one directional light with a
//! filtered shadow map, and summed ambient light. Colours are converted to
//! linear space; the sRGB transfer curve is applied by the surface format
//! when it supports it and by the fragment shader otherwise.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU meshes are cached per geometry and dropped when the scene changes.
//! - Only shadow-casting meshes are drawn into the shadow map; only
//!   shadow-receiving meshes sample it.

mod gpu;
mod instances;
mod lighting;
mod mesh;
mod shaders;
mod surface;

pub use gpu::{FrameReport, SceneRenderer};
pub use surface::{GpuInitError, WgpuRenderer};

pub fn crate_info() -> &'static str {
    "chessboard-render-wgpu v0.1.0"
}
