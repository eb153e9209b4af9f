use crate::camera::PerspectiveCamera;
use crate::renderer::{RenderError, Renderer};
use crate::scene::Scene;
use chessboard_common::Viewport;

/// Lifecycle of the frame driver. `Idle` until the first tick, then `Running`
/// until the host tears the process down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Result of a single tick.
#[derive(Debug)]
pub enum FrameStatus<T> {
    Drawn(T),
    /// The renderer skipped this frame; the next tick tries again.
    Dropped,
}

impl<T> FrameStatus<T> {
    pub fn is_drawn(&self) -> bool {
        matches!(self, FrameStatus::Drawn(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: u64,
    pub dropped: u64,
    pub resizes: u64,
}

/// Redraws a static scene once per host tick and keeps the camera and the
/// render surface in step with the viewport.
///
/// The host calls [`FrameDriver::tick`] from its refresh-synchronised
/// callback and [`FrameDriver::resize`] from its resize notification. Both
/// run to completion on the caller's thread, so they never interleave.
pub struct FrameDriver<R: Renderer> {
    renderer: R,
    scene: Scene,
    camera: PerspectiveCamera,
    viewport: Viewport,
    state: DriverState,
    stats: FrameStats,
}

impl<R: Renderer> FrameDriver<R> {
    /// The renderer must already be sized to `viewport`. A zero-area viewport
    /// leaves the camera aspect untouched, as [`FrameDriver::resize`] does.
    pub fn new(renderer: R, scene: Scene, mut camera: PerspectiveCamera, viewport: Viewport) -> Self {
        if !viewport.is_empty() {
            camera.set_aspect(viewport);
        }
        Self {
            renderer,
            scene,
            camera,
            viewport,
            state: DriverState::Idle,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn set_shadows_enabled(&mut self, enabled: bool) {
        self.renderer.set_shadows_enabled(enabled);
    }

    /// Draw one frame. Dropped frames are counted, other errors are returned as-is.
    pub fn tick(&mut self) -> Result<FrameStatus<R::Output>, RenderError> {
        if self.state == DriverState::Idle {
            tracing::info!(viewport = %self.viewport, "frame driver running");
            self.state = DriverState::Running;
        }

        match self.renderer.render(&self.scene, &self.camera) {
            Ok(output) => {
                self.stats.drawn += 1;
                Ok(FrameStatus::Drawn(output))
            }
            Err(err) if err.is_frame_dropped() => {
                self.stats.dropped += 1;
                tracing::debug!("{err}");
                Ok(FrameStatus::Dropped)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply a new viewport size. Returns `false` for a zero-area viewport,
    /// which is ignored until the window is restored.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            tracing::debug!(%viewport, "ignoring zero-area resize");
            return false;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport);
        self.renderer.resize(viewport);
        self.stats.resizes += 1;
        tracing::debug!(%viewport, aspect = self.camera.aspect(), "viewport resized");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::config::SceneConfig;
    use crate::renderer::DebugTextRenderer;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Resize(Viewport),
        Shadows(bool),
        Render { aspect: f32, meshes: usize },
    }

    /// Records every call and replays scripted failures.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        failures: VecDeque<RenderError>,
    }

    impl Renderer for RecordingRenderer {
        type Output = usize;

        fn resize(&mut self, viewport: Viewport) {
            self.calls.push(Call::Resize(viewport));
        }

        fn set_shadows_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::Shadows(enabled));
        }

        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<usize, RenderError> {
            if let Some(err) = self.failures.pop_front() {
                return Err(err);
            }
            let meshes = scene.mesh_instances().len();
            self.calls.push(Call::Render {
                aspect: camera.aspect(),
                meshes,
            });
            Ok(meshes)
        }
    }

    fn driver(renderer: RecordingRenderer, viewport: Viewport) -> FrameDriver<RecordingRenderer> {
        let assembled = assemble(&SceneConfig::default(), viewport).unwrap();
        FrameDriver::new(renderer, assembled.scene, assembled.camera, viewport)
    }

    #[test]
    fn idle_until_first_tick() {
        let mut d = driver(RecordingRenderer::default(), Viewport::new(800, 600));
        assert_eq!(d.state(), DriverState::Idle);
        assert!(d.tick().unwrap().is_drawn());
        assert_eq!(d.state(), DriverState::Running);
        d.tick().unwrap();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.stats().drawn, 2);
    }

    #[test]
    fn each_tick_draws_whole_scene() {
        let mut d = driver(RecordingRenderer::default(), Viewport::new(800, 600));
        for _ in 0..3 {
            match d.tick().unwrap() {
                FrameStatus::Drawn(meshes) => assert_eq!(meshes, 66),
                FrameStatus::Dropped => panic!("unexpected drop"),
            }
        }
    }

    #[test]
    fn resize_updates_camera_and_surface() {
        let mut d = driver(RecordingRenderer::default(), Viewport::new(800, 600));
        let before: Vec<_> = d.scene().mesh_instances().iter().map(|m| m.position).collect();

        assert!(d.resize(Viewport::new(1920, 1080)));
        assert_eq!(d.camera().aspect(), 1920.0 / 1080.0);
        assert_eq!(d.viewport(), Viewport::new(1920, 1080));
        d.tick().unwrap();

        assert_eq!(
            d.renderer().calls,
            vec![
                Call::Resize(Viewport::new(1920, 1080)),
                Call::Render {
                    aspect: 1920.0 / 1080.0,
                    meshes: 66
                },
            ]
        );
        let after: Vec<_> = d.scene().mesh_instances().iter().map(|m| m.position).collect();
        assert_eq!(before, after);
        assert_eq!(d.stats().resizes, 1);
    }

    #[test]
    fn zero_area_resize_is_ignored() {
        let mut d = driver(RecordingRenderer::default(), Viewport::new(800, 600));
        assert!(!d.resize(Viewport::new(0, 0)));
        assert_eq!(d.viewport(), Viewport::new(800, 600));
        assert_eq!(d.camera().aspect(), 800.0 / 600.0);
        assert!(d.renderer().calls.is_empty());
    }

    #[test]
    fn empty_initial_viewport_keeps_camera_aspect() {
        let assembled = assemble(&SceneConfig::default(), Viewport::new(800, 600)).unwrap();
        let d = FrameDriver::new(
            RecordingRenderer::default(),
            assembled.scene,
            assembled.camera,
            Viewport::new(0, 720),
        );
        assert_eq!(d.camera().aspect(), 800.0 / 600.0);
        assert!(d.camera().projection_matrix().is_finite());
    }

    #[test]
    fn dropped_frames_are_not_errors() {
        let renderer = RecordingRenderer {
            failures: VecDeque::from([RenderError::FrameDropped("timeout".into())]),
            ..Default::default()
        };
        let mut d = driver(renderer, Viewport::new(800, 600));
        assert!(matches!(d.tick().unwrap(), FrameStatus::Dropped));
        assert!(d.tick().unwrap().is_drawn());
        assert_eq!(
            d.stats(),
            FrameStats {
                drawn: 1,
                dropped: 1,
                resizes: 0
            }
        );
    }

    #[test]
    fn backend_errors_propagate() {
        let renderer = RecordingRenderer {
            failures: VecDeque::from([RenderError::Backend("device lost".into())]),
            ..Default::default()
        };
        let mut d = driver(renderer, Viewport::new(800, 600));
        let err = d.tick().unwrap_err();
        assert!(matches!(err, RenderError::Backend(ref m) if m == "device lost"));
    }

    #[test]
    fn shadow_toggle_passes_through() {
        let mut d = driver(RecordingRenderer::default(), Viewport::new(800, 600));
        d.set_shadows_enabled(false);
        assert_eq!(d.renderer().calls, vec![Call::Shadows(false)]);
    }

    #[test]
    fn driver_with_debug_renderer() {
        let viewport = Viewport::new(1024, 768);
        let assembled = assemble(&SceneConfig::default(), viewport).unwrap();
        let mut d = FrameDriver::new(
            DebugTextRenderer::new(viewport),
            assembled.scene,
            assembled.camera,
            viewport,
        );
        d.resize(Viewport::new(500, 250));
        let FrameStatus::Drawn(text) = d.tick().unwrap() else {
            panic!("debug renderer never drops frames");
        };
        assert!(text.contains("surface=500x250"));
        assert!(text.contains("aspect=2.000"));
        assert!(text.contains("Meshes: 66"));
    }
}
