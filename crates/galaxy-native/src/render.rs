//! wgpu renderer for the galaxy: merged crystal geometry, per-body instance
//! data, and the depth-of-field post chain driven by the camera controller.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use galaxy_core::{DofSettings, Galaxy, MaterialState};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    // x: time (s), y: pulse amplitude
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos: [f32; 3],
    scale: f32,
    color: [f32; 4],
    emissive: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    dof: [f32; 4],
}

/// One body's slice of the merged buffers.
struct BodyDraw {
    index_range: std::ops::Range<u32>,
    base_vertex: i32,
    instance_offset: u64,
    shader_active: bool,
}

const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const PULSE_AMPLITUDE: f32 = 0.05;

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    crystal_pipeline: wgpu::RenderPipeline,
    flat_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    vertex_vb: Option<wgpu::Buffer>,
    index_ib: Option<wgpu::Buffer>,
    instance_vb: Option<wgpu::Buffer>,
    draws: Vec<BodyDraw>,

    // Post chain targets and bind groups, rebuilt on resize.
    depth_view: wgpu::TextureView,
    hdr_view: wgpu::TextureView,
    blur_a_view: wgpu::TextureView,
    blur_b_view: wgpu::TextureView,
    linear_sampler: wgpu::Sampler,
    post_bgl0: wgpu::BindGroupLayout,
    post_bgl1: wgpu::BindGroupLayout,
    post_ub_h: wgpu::Buffer,
    post_ub_v: wgpu::Buffer,
    post_ub_comp: wgpu::Buffer,
    bg_blur_h: wgpu::BindGroup,
    bg_blur_v: wgpu::BindGroup,
    bg_composite: wgpu::BindGroup,
    bg_composite_blur: wgpu::BindGroup,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<(Self, wgpu::Adapter)> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // Scene pipelines: crystal (pulse-animated) and flat fallback share
        // layouts so draws only swap the pipeline.
        let crystal_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("crystal"),
            source: wgpu::ShaderSource::Wgsl(galaxy_core::CRYSTAL_WGSL.into()),
        });
        let flat_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat"),
            source: wgpu::ShaderSource::Wgsl(galaxy_core::FLAT_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post"),
            source: wgpu::ShaderSource::Wgsl(galaxy_core::POST_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: merged crystal vertices
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<galaxy_core::CrystalVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 16,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 28,
                        shader_location: 3,
                    },
                ],
            },
            // slot 1: per-body instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 4,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 5,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 6,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 32,
                        shader_location: 7,
                    },
                ],
            },
        ];

        let make_scene_pipeline = |shader: &wgpu::ShaderModule, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&scene_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let crystal_pipeline = make_scene_pipeline(&crystal_shader, "crystal_pipeline");
        let flat_pipeline = make_scene_pipeline(&flat_shader, "flat_pipeline");

        // Post chain: blur (group 0 only) and composite (group 0 + 1).
        let post_bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let post_bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pl_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_blur"),
            bind_group_layouts: &[&post_bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_composite"),
            bind_group_layouts: &[&post_bgl0, &post_bgl1],
            push_constant_ranges: &[],
        });
        let blur_pipeline =
            make_post_pipeline(&device, &pl_blur, &post_shader, "fs_blur", HDR_FORMAT);
        let composite_pipeline =
            make_post_pipeline(&device, &pl_composite, &post_shader, "fs_composite", format);

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let make_post_ub = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let post_ub_h = make_post_ub("post_ub_h");
        let post_ub_v = make_post_ub("post_ub_v");
        let post_ub_comp = make_post_ub("post_ub_comp");

        let (width, height) = (config.width, config.height);
        let depth_view = make_target(&device, width, height, DEPTH_FORMAT, "depth");
        let hdr_view = make_target(&device, width, height, HDR_FORMAT, "hdr");
        let blur_a_view = make_target(&device, width, height, HDR_FORMAT, "blur_a");
        let blur_b_view = make_target(&device, width, height, HDR_FORMAT, "blur_b");
        let (bg_blur_h, bg_blur_v, bg_composite, bg_composite_blur) = make_post_bind_groups(
            &device,
            &post_bgl0,
            &post_bgl1,
            &linear_sampler,
            &hdr_view,
            &blur_a_view,
            &blur_b_view,
            &post_ub_h,
            &post_ub_v,
            &post_ub_comp,
        );

        Ok((
            Self {
                window,
                surface,
                device,
                queue,
                config,
                crystal_pipeline,
                flat_pipeline,
                uniform_buffer,
                scene_bind_group,
                vertex_vb: None,
                index_ib: None,
                instance_vb: None,
                draws: Vec::new(),
                depth_view,
                hdr_view,
                blur_a_view,
                blur_b_view,
                linear_sampler,
                post_bgl0,
                post_bgl1,
                post_ub_h,
                post_ub_v,
                post_ub_comp,
                bg_blur_h,
                bg_blur_v,
                bg_composite,
                bg_composite_blur,
                blur_pipeline,
                composite_pipeline,
                width,
                height,
            },
            adapter,
        ))
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        self.depth_view = make_target(&self.device, self.width, self.height, DEPTH_FORMAT, "depth");
        self.hdr_view = make_target(&self.device, self.width, self.height, HDR_FORMAT, "hdr");
        self.blur_a_view =
            make_target(&self.device, self.width, self.height, HDR_FORMAT, "blur_a");
        self.blur_b_view =
            make_target(&self.device, self.width, self.height, HDR_FORMAT, "blur_b");
        let (h, v, c, cb) = make_post_bind_groups(
            &self.device,
            &self.post_bgl0,
            &self.post_bgl1,
            &self.linear_sampler,
            &self.hdr_view,
            &self.blur_a_view,
            &self.blur_b_view,
            &self.post_ub_h,
            &self.post_ub_v,
            &self.post_ub_comp,
        );
        self.bg_blur_h = h;
        self.bg_blur_v = v;
        self.bg_composite = c;
        self.bg_composite_blur = cb;
    }

    /// Rebuild the merged vertex/index/instance buffers from the galaxy.
    /// Call after sync or after a quality downgrade changed geometry.
    pub fn upload(&mut self, galaxy: &Galaxy) {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut instances = Vec::new();
        let mut draws = Vec::new();

        for body in galaxy.bodies() {
            let packed = body.geometry.packed_vertices();
            let base_vertex = vertices.len() as i32;
            let index_start = indices.len() as u32;
            vertices.extend_from_slice(&packed);
            indices.extend_from_slice(&body.geometry.indices);
            let instance_offset =
                (instances.len() * std::mem::size_of::<InstanceData>()) as u64;
            instances.push(InstanceData {
                pos: body.position.to_array(),
                scale: 1.0,
                color: body.material.base_color,
                emissive: body.material.emissive_strength,
                _pad: [0.0; 3],
            });
            draws.push(BodyDraw {
                index_range: index_start..indices.len() as u32,
                base_vertex,
                instance_offset,
                shader_active: body.material.state == MaterialState::ShaderActive,
            });
        }

        if vertices.is_empty() {
            self.vertex_vb = None;
            self.index_ib = None;
            self.instance_vb = None;
            self.draws.clear();
            return;
        }

        self.vertex_vb = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("galaxy_vb"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.index_ib = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("galaxy_ib"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.instance_vb = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("galaxy_instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.draws = draws;
        log::info!(
            "uploaded {} bodies, {} vertices, {} indices",
            self.draws.len(),
            vertices.len(),
            indices.len()
        );
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.width as f32, self.height.max(1) as f32)
    }

    pub fn view_proj(&self, eye: Vec3, target: Vec3) -> Mat4 {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 500.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        proj * view
    }

    pub fn render(&mut self, galaxy: &Galaxy) -> Result<(), wgpu::SurfaceError> {
        let pose = galaxy.camera().pose();
        let dof = galaxy.camera().dof();

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: self.view_proj(pose.eye, pose.target).to_cols_array_2d(),
                camera_pos: [pose.eye.x, pose.eye.y, pose.eye.z, 1.0],
                params: [galaxy.clock(), PULSE_AMPLITUDE, 0.0, 0.0],
            }),
        );
        self.write_post_uniforms(dof);

        let frame = self.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Scene into the HDR target.
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.012,
                            g: 0.014,
                            b: 0.03,
                            a: 1.0,
                        }),
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (Some(vb), Some(ib), Some(inst)) =
                (&self.vertex_vb, &self.index_ib, &self.instance_vb)
            {
                rpass.set_bind_group(0, &self.scene_bind_group, &[]);
                rpass.set_vertex_buffer(0, vb.slice(..));
                rpass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                for draw in &self.draws {
                    let pipeline = if draw.shader_active {
                        &self.crystal_pipeline
                    } else {
                        &self.flat_pipeline
                    };
                    rpass.set_pipeline(pipeline);
                    rpass.set_vertex_buffer(1, inst.slice(draw.instance_offset..));
                    rpass.draw_indexed(draw.index_range.clone(), draw.base_vertex, 0..1);
                }
            }
        }

        // Depth-of-field chain: two blur passes, then composite to screen.
        blit(
            &mut encoder,
            "blur_h",
            &self.blur_a_view,
            &self.blur_pipeline,
            &self.bg_blur_h,
            None,
        );
        blit(
            &mut encoder,
            "blur_v",
            &self.blur_b_view,
            &self.blur_pipeline,
            &self.bg_blur_v,
            None,
        );
        blit(
            &mut encoder,
            "composite",
            &surface_view,
            &self.composite_pipeline,
            &self.bg_composite,
            Some(&self.bg_composite_blur),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn write_post_uniforms(&self, dof: DofSettings) {
        let resolution = [self.width as f32, self.height as f32];
        let strength = if dof.enabled { dof.strength } else { 0.0 };
        let dof_params = [strength, dof.focus_distance, 0.0, 0.0];
        self.queue.write_buffer(
            &self.post_ub_h,
            0,
            bytemuck::bytes_of(&PostUniforms {
                resolution,
                blur_dir: [1.0, 0.0],
                dof: dof_params,
            }),
        );
        self.queue.write_buffer(
            &self.post_ub_v,
            0,
            bytemuck::bytes_of(&PostUniforms {
                resolution,
                blur_dir: [0.0, 1.0],
                dof: dof_params,
            }),
        );
        self.queue.write_buffer(
            &self.post_ub_comp,
            0,
            bytemuck::bytes_of(&PostUniforms {
                resolution,
                blur_dir: [0.0, 0.0],
                dof: dof_params,
            }),
        );
    }
}

fn make_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::TextureView {
    let usage = if format == DEPTH_FORMAT {
        wgpu::TextureUsages::RENDER_ATTACHMENT
    } else {
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn make_post_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fs_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fs_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn make_post_bind_groups(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    hdr_view: &wgpu::TextureView,
    blur_a_view: &wgpu::TextureView,
    blur_b_view: &wgpu::TextureView,
    ub_h: &wgpu::Buffer,
    ub_v: &wgpu::Buffer,
    ub_comp: &wgpu::Buffer,
) -> (
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
) {
    let make_bg0 = |label: &str, view: &wgpu::TextureView, ub: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ub.as_entire_binding(),
                },
            ],
        })
    };
    let bg_blur_h = make_bg0("bg_blur_h", hdr_view, ub_h);
    let bg_blur_v = make_bg0("bg_blur_v", blur_a_view, ub_v);
    let bg_composite = make_bg0("bg_composite", hdr_view, ub_comp);
    let bg_composite_blur = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_composite_blur"),
        layout: bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(blur_b_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    (bg_blur_h, bg_blur_v, bg_composite, bg_composite_blur)
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    rpass.set_pipeline(pipeline);
    rpass.set_bind_group(0, bg0, &[]);
    if let Some(bg1) = bg1 {
        rpass.set_bind_group(1, bg1, &[]);
    }
    rpass.draw(0..3, 0..1);
}
