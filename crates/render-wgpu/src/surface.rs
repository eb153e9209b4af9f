use crate::gpu::{FrameReport, SceneRenderer};
use chessboard_common::Viewport;
use chessboard_render::{PerspectiveCamera, RenderError, Renderer, RendererSettings, Scene};

/// Failures while bringing up the GPU. All are fatal to the host.
#[derive(Debug, thiserror::Error)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats or alpha modes")]
    UnsupportedSurface,
}

/// Surface-backed GPU renderer: owns the window surface, device and queue and
/// presents one [`SceneRenderer`] frame per call to [`Renderer::render`].
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene_renderer: SceneRenderer,
    adapter_info: wgpu::AdapterInfo,
}

impl WgpuRenderer {
    /// Create the surface for `target` and configure it at `viewport`.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        settings: &RendererSettings,
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuInitError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("chessboard_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuInitError::UnsupportedSurface)?;
        if !surface_format.is_srgb() {
            tracing::warn!(format = ?surface_format, "no sRGB surface format, encoding in shader");
        }
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuInitError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let msaa_supported = adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(4);
        let sample_count = if settings.antialias && msaa_supported {
            4
        } else {
            1
        };

        let scene_renderer =
            SceneRenderer::new(&device, surface_format, viewport, settings, sample_count);

        let adapter_info = adapter.get_info();
        tracing::info!(
            backend = adapter_info.backend.to_str(),
            adapter = %adapter_info.name,
            format = ?surface_format,
            sample_count,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene_renderer,
            adapter_info,
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.adapter_info.backend.to_str()
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_info.name
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.scene_renderer.sample_count()
    }

    fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                Err(RenderError::FrameDropped(
                    "surface lost or outdated, reconfigured".into(),
                ))
            }
            Err(wgpu::SurfaceError::Timeout) => {
                Err(RenderError::FrameDropped("surface acquire timed out".into()))
            }
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }
}

impl Renderer for WgpuRenderer {
    type Output = FrameReport;

    fn resize(&mut self, viewport: Viewport) {
        self.config.width = viewport.width.max(1);
        self.config.height = viewport.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.scene_renderer.resize(&self.device, viewport);
        tracing::debug!(%viewport, "surface reconfigured");
    }

    fn set_shadows_enabled(&mut self, enabled: bool) {
        self.scene_renderer.set_shadows_enabled(enabled);
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<FrameReport, RenderError> {
        let output = self.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let report = self
            .scene_renderer
            .render(&self.device, &self.queue, &view, scene, camera)?;
        output.present();
        Ok(report)
    }
}
