use anyhow::{Context, Result};
use chessboard_common::Viewport;
use chessboard_render::{
    FrameDriver, FrameStatus, PerspectiveCamera, RendererSettings, Scene, SceneConfig, assemble,
};
use chessboard_render_wgpu::WgpuRenderer;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "chessboard-desktop", about = "Chessboard scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width in physical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Disable shadow mapping
    #[arg(long)]
    no_shadows: bool,
}

struct ChessboardApp {
    initial_size: PhysicalSize<u32>,
    settings: RendererSettings,
    /// Scene and camera waiting for the window to exist.
    pending: Option<(Scene, PerspectiveCamera)>,
    window: Option<Arc<Window>>,
    driver: Option<FrameDriver<WgpuRenderer>>,
    failure: Option<anyhow::Error>,
}

impl ChessboardApp {
    fn new(
        scene: Scene,
        camera: PerspectiveCamera,
        settings: RendererSettings,
        initial_size: PhysicalSize<u32>,
    ) -> Self {
        Self {
            initial_size,
            settings,
            pending: Some((scene, camera)),
            window: None,
            driver: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Chessboard")
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let renderer = pollster::block_on(WgpuRenderer::new(
            window.clone(),
            viewport,
            &self.settings,
        ))
        .context("failed to initialise GPU renderer")?;
        tracing::info!(
            backend = renderer.backend_name(),
            adapter = renderer.adapter_name(),
            "renderer ready"
        );

        let Some((scene, camera)) = self.pending.take() else {
            anyhow::bail!("scene already handed to a frame driver");
        };
        self.driver = Some(FrameDriver::new(renderer, scene, camera, viewport));
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for ChessboardApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(driver) = &mut self.driver {
                    driver.resize(Viewport::new(new_size.width, new_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(driver) = &mut self.driver else {
                    return;
                };
                match driver.tick() {
                    Ok(FrameStatus::Drawn(report)) => {
                        tracing::trace!(
                            instances = report.instances,
                            casters = report.shadow_casters,
                            "frame drawn"
                        );
                    }
                    Ok(FrameStatus::Dropped) => {}
                    Err(err) => {
                        self.fail(event_loop, anyhow::Error::new(err).context("render failed"));
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("chessboard-desktop starting");

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.no_shadows {
        config.renderer.shadows = false;
    }

    let viewport = Viewport::new(cli.width.max(1), cli.height.max(1));
    let assembled = assemble(&config, viewport)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ChessboardApp::new(
        assembled.scene,
        assembled.camera,
        config.renderer,
        PhysicalSize::new(viewport.width, viewport.height),
    );
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
