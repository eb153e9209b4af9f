//! Rendering Adapter: renderer-agnostic scene graph and frame loop.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Scene nodes are built one way from layout value records; no node refers
//!   back to the records.
//! - The camera aspect ratio equals the current viewport width over height.
//!
//! Backends implement [`Renderer`]. [`DebugTextRenderer`] is the text backend
//! used by the CLI and tests; the GPU backend lives in `chessboard-render-wgpu`.

pub mod assembler;
mod camera;
pub mod config;
mod frame;
mod renderer;
pub mod scene;

pub use assembler::{AssembleError, AssembledScene, assemble};
pub use camera::PerspectiveCamera;
pub use config::{ConfigError, RendererSettings, SceneConfig};
pub use frame::{DriverState, FrameDriver, FrameStats, FrameStatus};
pub use renderer::{DebugTextRenderer, RenderError, Renderer};
pub use scene::{
    Geometry, GeometryId, Light, LightInstance, Material, MaterialId, Mesh, MeshInstance, Node,
    NodeId, NodeKind, Scene, SceneError, SceneId,
};

pub fn crate_info() -> &'static str {
    "chessboard-render v0.1.0"
}
