use crate::instances::{DrawBatch, InstanceData, collect_instances};
use crate::lighting::{FrameLights, light_view_projection, scene_bounds};
use crate::mesh::{MeshData, Vertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use chessboard_common::{Color, Viewport};
use chessboard_render::{
    GeometryId, PerspectiveCamera, RenderError, RendererSettings, Scene, SceneId,
};
use glam::Mat4;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SHADOW_DEPTH_BIAS: f32 = 0.001;
const MAX_INSTANCES: u32 = 4096;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    ambient: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    shadow_params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ShadowUniforms {
    light_view_proj: [[f32; 4]; 4],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// What one GPU frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Instances drawn in the main pass.
    pub instances: u32,
    /// Instances drawn into the shadow map.
    pub shadow_casters: u32,
    /// Whether the shadow pass ran this frame.
    pub shadow_pass: bool,
}

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ]
}

/// Draws a [`Scene`] into a colour target: a depth-only shadow pass from the
/// directional light, then a lit main pass.
///
/// Owns every GPU resource except the device, queue and surface, so it can be
/// driven against any target view of `surface_format`.
pub struct SceneRenderer {
    scene_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    shadow_uniform_buffer: wgpu::Buffer,
    shadow_bind_group: wgpu::BindGroup,
    shadow_view: wgpu::TextureView,
    shadow_map_size: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    meshes: HashMap<GeometryId, GpuMesh>,
    bound_scene: Option<SceneId>,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    clear_color: Color,
    shadows_enabled: bool,
    warned_extra_lights: bool,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        settings: &RendererSettings,
        sample_count: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shadow_map_size = settings.shadow_map_size;
        let shadow_view = create_shadow_view(device, shadow_map_size);
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let shadow_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shadow_uniform_buffer"),
            contents: bytemuck::bytes_of(&ShadowUniforms {
                light_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bind_group"),
            layout: &shadow_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_uniform_buffer.as_entire_binding(),
            }],
        });

        // Scene pipeline
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });
        let buffers = vertex_layouts();
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        // Shadow pipeline: depth only, both faces so thin pieces still occlude.
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHADOW_SHADER.into()),
        });
        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shadow_pipeline_layout"),
                bind_group_layouts: &[&shadow_layout],
                push_constant_ranges: &[],
            });
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Instance buffer (pre-allocated)
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_INSTANCES as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = create_depth_view(device, viewport, sample_count);
        let msaa_view = create_msaa_view(device, surface_format, viewport, sample_count);

        Self {
            scene_pipeline,
            shadow_pipeline,
            globals_buffer,
            globals_bind_group,
            shadow_uniform_buffer,
            shadow_bind_group,
            shadow_view,
            shadow_map_size,
            instance_buffer,
            max_instances: MAX_INSTANCES,
            meshes: HashMap::new(),
            bound_scene: None,
            depth_view,
            msaa_view,
            surface_format,
            sample_count,
            clear_color: settings.clear_color,
            shadows_enabled: settings.shadows,
            warned_extra_lights: false,
        }
    }

    /// Recreate the size-dependent attachments.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        self.depth_view = create_depth_view(device, viewport, self.sample_count);
        self.msaa_view = create_msaa_view(device, self.surface_format, viewport, self.sample_count);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    pub fn set_shadows_enabled(&mut self, enabled: bool) {
        self.shadows_enabled = enabled;
    }

    /// Upload any geometry not yet on the GPU. A different scene drops the cache.
    fn upload_geometry(&mut self, device: &wgpu::Device, scene: &Scene) {
        if self.bound_scene != Some(scene.id()) {
            self.meshes.clear();
            self.bound_scene = Some(scene.id());
        }
        for (id, geometry) in scene.geometries() {
            if self.meshes.contains_key(&id) {
                continue;
            }
            let data = MeshData::from_geometry(geometry);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            tracing::debug!(
                geometry = id.index(),
                vertices = data.vertices.len(),
                indices = data.indices.len(),
                "uploaded geometry"
            );
            self.meshes.insert(
                id,
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: data.indices.len() as u32,
                },
            );
        }
    }

    /// Render one frame of `scene` into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<FrameReport, RenderError> {
        self.upload_geometry(device, scene);

        let frame = collect_instances(scene, self.max_instances as usize)?;
        if frame.truncated > 0 {
            tracing::warn!(
                dropped = frame.truncated,
                capacity = self.max_instances,
                "instance buffer full"
            );
        }

        let lights = FrameLights::from_scene(scene);
        if lights.ignored_directional > 0 && !self.warned_extra_lights {
            tracing::warn!(
                ignored = lights.ignored_directional,
                "only the first directional light is shaded"
            );
            self.warned_extra_lights = true;
        }

        let shadow_pass = self.shadows_enabled
            && lights.sun.is_some_and(|sun| sun.cast_shadow)
            && !frame.casters.is_empty();
        let light_view_proj = match (lights.sun, scene_bounds(scene)) {
            (Some(sun), Some((center, radius))) => {
                light_view_projection(sun.direction, center, radius)
            }
            _ => Mat4::IDENTITY,
        };

        let (sun_direction, sun_color) = match lights.sun {
            Some(sun) => (sun.direction.to_array(), sun.color),
            None => ([0.0, 1.0, 0.0], [0.0; 3]),
        };
        let [ax, ay, az] = lights.ambient;
        let [dx, dy, dz] = sun_direction;
        let [sr, sg, sb] = sun_color;
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            camera_position: camera.position().extend(1.0).to_array(),
            ambient: [ax, ay, az, 1.0],
            sun_direction: [dx, dy, dz, if shadow_pass { 1.0 } else { 0.0 }],
            sun_color: [sr, sg, sb, 1.0],
            shadow_params: [
                1.0 / self.shadow_map_size as f32,
                SHADOW_DEPTH_BIAS,
                if encodes_in_shader(self.surface_format) { 1.0 } else { 0.0 },
                0.0,
            ],
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        queue.write_buffer(
            &self.shadow_uniform_buffer,
            0,
            bytemuck::bytes_of(&ShadowUniforms {
                light_view_proj: light_view_proj.to_cols_array_2d(),
            }),
        );
        if !frame.data.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&frame.data));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        if shadow_pass {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.draw_batches(&mut pass, &frame.casters);
        }

        {
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(target)),
                None => (target, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_value(
                            self.clear_color,
                            self.surface_format,
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.draw_batches(&mut pass, &frame.main);
        }

        queue.submit(std::iter::once(encoder.finish()));

        Ok(FrameReport {
            instances: frame.main_count(),
            shadow_casters: if shadow_pass { frame.caster_count() } else { 0 },
            shadow_pass,
        })
    }

    fn draw_batches(&self, pass: &mut wgpu::RenderPass<'_>, batches: &[DrawBatch]) {
        for batch in batches {
            let Some(mesh) = self.meshes.get(&batch.geometry) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
        }
    }
}

fn create_shadow_view(device: &wgpu::Device, size: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("shadow_map"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_depth_view(
    device: &wgpu::Device,
    viewport: Viewport,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_msaa_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    viewport: Viewport,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_texture"),
        size: wgpu::Extent3d {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&Default::default()))
}

/// Targets without hardware sRGB encoding get the transfer curve in the
/// fragment shader instead.
fn encodes_in_shader(format: wgpu::TextureFormat) -> bool {
    !format.is_srgb()
}

/// Clear colour as stored in a target of `format`.
fn clear_value(color: Color, format: wgpu::TextureFormat) -> wgpu::Color {
    let [r, g, b, a] = if encodes_in_shader(format) {
        [color.r, color.g, color.b, 1.0]
    } else {
        color.to_linear_rgba()
    };
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_match_shader_layout() {
        // Two mat4x4 plus five vec4, all 16-byte aligned.
        assert_eq!(std::mem::size_of::<Globals>(), 2 * 64 + 5 * 16);
        assert_eq!(std::mem::size_of::<ShadowUniforms>(), 64);
    }

    #[test]
    fn vertex_layouts_cover_shader_locations() {
        let layouts = vertex_layouts();
        assert_eq!(layouts[0].array_stride, 24);
        assert_eq!(layouts[1].array_stride, 96);
        let locations: Vec<u32> = layouts
            .iter()
            .flat_map(|l| l.attributes.iter().map(|a| a.shader_location))
            .collect();
        assert_eq!(locations, (0..8).collect::<Vec<_>>());
        assert_eq!(INSTANCE_ATTRIBUTES[5].offset, 80);
    }

    #[test]
    fn unorm_targets_are_encoded_by_the_shader() {
        use wgpu::TextureFormat;

        assert!(!encodes_in_shader(TextureFormat::Bgra8UnormSrgb));
        assert!(!encodes_in_shader(TextureFormat::Rgba8UnormSrgb));
        assert!(encodes_in_shader(TextureFormat::Bgra8Unorm));
        assert!(encodes_in_shader(TextureFormat::Rgba8Unorm));

        let grey = Color::from_hex(0x808080);
        let srgb = clear_value(grey, TextureFormat::Bgra8UnormSrgb);
        let unorm = clear_value(grey, TextureFormat::Rgba8Unorm);
        assert!((unorm.r - grey.r as f64).abs() < 1e-6);
        assert!((srgb.r - grey.to_linear_rgba()[0] as f64).abs() < 1e-6);
        assert!(srgb.r < unorm.r);
        assert_eq!(unorm.a, 1.0);

        assert!(shaders::SCENE_SHADER.contains("fn linear_to_srgb"));
        assert!(shaders::SCENE_SHADER.contains("globals.shadow_params.z > 0.5"));
    }
}
