use crate::camera::PerspectiveCamera;
use crate::scene::{Geometry, Light, NodeKind, Scene, SceneError};
use chessboard_common::Viewport;
use std::fmt::Write;

/// Errors a renderer can report for a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The frame could not be produced in time. Not fatal; the next tick retries.
    #[error("frame dropped: {0}")]
    FrameDropped(String),
    #[error("render surface error: {0}")]
    Surface(String),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("renderer backend error: {0}")]
    Backend(String),
}

impl RenderError {
    pub fn is_frame_dropped(&self) -> bool {
        matches!(self, RenderError::FrameDropped(_))
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene graph and camera and produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Match the drawing surface to a new viewport size.
    fn resize(&mut self, viewport: Viewport);

    /// Toggle shadow mapping for shadow-casting lights.
    fn set_shadows_enabled(&mut self, enabled: bool);

    /// Render one frame of the scene from the camera.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<Self::Output, RenderError>;
}

/// Renders a scene as human-readable text.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    viewport: Viewport,
    shadows: bool,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl DebugTextRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            shadows: true,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_shadows_enabled(&mut self, enabled: bool) {
        self.shadows = enabled;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<String, RenderError> {
        let mut out = String::new();
        let meshes = scene.mesh_instances();
        let lights = scene.lights();
        let eye = camera.position();
        let target = camera.target();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene (surface={}, shadows={}) ===",
            self.viewport,
            if self.shadows { "on" } else { "off" }
        );
        let _ = writeln!(
            out,
            "Nodes: {}  Meshes: {}  Lights: {}",
            scene.node_count(),
            meshes.len(),
            lights.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            eye.x,
            eye.y,
            eye.z,
            target.x,
            target.y,
            target.z,
            camera.fov_degrees(),
            camera.aspect()
        );

        for light in &lights {
            let p = light.position;
            match light.light {
                Light::Ambient { color, intensity } => {
                    let _ = writeln!(out, "  ambient {color} x{intensity:.2}");
                }
                Light::Directional {
                    color,
                    intensity,
                    cast_shadow,
                    ..
                } => {
                    let _ = writeln!(
                        out,
                        "  directional {color} x{intensity:.2} from ({:.1}, {:.1}, {:.1}) shadow={cast_shadow}",
                        p.x, p.y, p.z
                    );
                }
            }
        }

        for mesh in &meshes {
            let name = scene.get(mesh.node).map(|n| n.name.as_str()).unwrap_or("?");
            let shape = match scene.geometry(mesh.geometry) {
                Some(Geometry::Box { .. }) => "box",
                Some(Geometry::Cylinder { .. }) => "cylinder",
                None => return Err(SceneError::UnknownGeometry(mesh.geometry).into()),
            };
            let material = scene
                .material(mesh.material)
                .ok_or(SceneError::UnknownMaterial(mesh.material))?;
            let p = mesh.position;
            let _ = writeln!(
                out,
                "  [{name}] {shape} pos=({:.2}, {:.2}, {:.2}) color={} cast={} receive={}",
                p.x, p.y, p.z, material.color, mesh.cast_shadow, mesh.receive_shadow
            );
        }

        let groups = scene
            .roots()
            .iter()
            .filter(|id| matches!(scene.get(**id).map(|n| n.kind), Some(NodeKind::Group)))
            .count();
        let _ = writeln!(out, "Groups at top level: {groups}");

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Mesh, Node};
    use chessboard_common::Color;
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let mut renderer = DebugTextRenderer::default();
        let output = renderer
            .render(&scene, &PerspectiveCamera::default())
            .unwrap();

        assert!(output.contains("Nodes: 0"));
        assert!(output.contains("surface=1280x720"));
    }

    #[test]
    fn debug_renderer_with_meshes() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(Geometry::Cylinder {
            radius_top: 6.0,
            radius_bottom: 6.0,
            height: 20.0,
            radial_segments: 32,
        });
        let material = scene.add_material(Material::with_color(Color::from_hex(0x111111)));
        scene
            .add(Node::mesh(
                "pawn",
                Mesh::new(geometry, material).casting_shadow(),
                Vec3::new(1.0, 2.0, 3.0),
            ))
            .unwrap();

        let mut renderer = DebugTextRenderer::default();
        let output = renderer
            .render(&scene, &PerspectiveCamera::default())
            .unwrap();

        assert!(output.contains("Meshes: 1"));
        assert!(output.contains("[pawn] cylinder pos=(1.00, 2.00, 3.00) color=#111111"));
        assert!(output.contains("cast=true"));
    }

    #[test]
    fn resize_and_shadow_toggle_are_reported() {
        let mut renderer = DebugTextRenderer::default();
        renderer.resize(Viewport::new(640, 480));
        renderer.set_shadows_enabled(false);
        let output = renderer
            .render(&Scene::new(), &PerspectiveCamera::default())
            .unwrap();
        assert!(output.contains("surface=640x480, shadows=off"));
        assert_eq!(renderer.viewport(), Viewport::new(640, 480));
    }

    #[test]
    fn dropped_frame_classification() {
        assert!(RenderError::FrameDropped("timeout".into()).is_frame_dropped());
        assert!(!RenderError::Backend("lost device".into()).is_frame_dropped());
    }
}
