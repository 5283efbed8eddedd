use bytemuck::{Pod, Zeroable};

use crate::device::DEPTH_FORMAT;
use crate::math::{self, Mat4};
use crate::render::{RenderCtx, Texture2d, Vertex, Viewport};
use crate::transform::MatrixRegistry;

/// Registry names of the matrix uniforms consumed by the shader.
pub const PROJECTION_MATRIX: &str = "projectionMatrix";
pub const VIEW_MATRIX: &str = "viewMatrix";
pub const MODEL_MATRIX: &str = "modelMatrix";

/// Scene uniform block mirrored in `shaders/textured.wgsl`.
///
/// `flags.x` holds the texcoord v-axis inversion switch.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    flags: [u32; 4],
}

/// Compiled vertex+fragment program for depth-tested textured meshes.
///
/// Uniform slots: three named matrices (uploaded in one batched write from a
/// [`MatrixRegistry`]), the texture + sampler, and the v-flip flag. A texture
/// must be attached with [`bind_texture`](Self::bind_texture) before the
/// program can draw.
pub struct TexturedProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    ubo: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
}

impl TexturedProgram {
    /// Compiles the WGSL module and builds the pipeline for the surface
    /// format carried by `ctx`.
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("girouette textured shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/textured.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("girouette textured bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(scene_ubo_min_binding_size()),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("girouette textured pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("girouette textured pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Both faces stay visible while the quad rotates through
                    // edge-on orientations.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("girouette scene ubo"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            ubo,
            bind_group: None,
        }
    }

    /// Attaches `texture` to the program's sampler slot.
    pub fn bind_texture(&mut self, device: &wgpu::Device, texture: &Texture2d) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("girouette textured bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });
        self.bind_group = Some(bind_group);
    }

    /// Uploads every known matrix uniform in one batched write.
    ///
    /// Matrices are read from `registry` by their canonical names; a missing
    /// name silently uploads identity. The projection matrix gets the 0..1
    /// clip-depth remap here so registry contents stay in GL convention.
    pub fn upload_matrices(
        &self,
        queue: &wgpu::Queue,
        registry: &MatrixRegistry,
        invert_v: bool,
    ) {
        let fetch = |name: &str| registry.get(name).copied().unwrap_or_else(Mat4::identity);

        let uniform = SceneUniform {
            projection: (math::depth_remap() * fetch(PROJECTION_MATRIX)).into(),
            view: fetch(VIEW_MATRIX).into(),
            model: fetch(MODEL_MATRIX).into(),
            flags: [u32::from(invert_v), 0, 0, 0],
        };

        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniform));
    }

    /// Activates the program for the pass: pipeline, bindings, full-window
    /// viewport. Returns false (and draws nothing) while no texture is bound.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>, viewport: Viewport) -> bool {
        let Some(bind_group) = self.bind_group.as_ref() else {
            log::debug!("TexturedProgram::bind before bind_texture; skipping");
            return false;
        };

        rpass.set_viewport(0.0, 0.0, viewport.width, viewport.height, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        true
    }
}

fn scene_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<SceneUniform>() as u64)
        .expect("SceneUniform has non-zero size by construction")
}
