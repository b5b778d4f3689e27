use wgpu::util::DeviceExt;
use wgpu::*;

use crate::controller::{CameraUniform, FrameTransforms, LightingUniform, ObjectUniform};
use crate::model::{Scene, SceneObject};
use crate::ui::OverlayFrame;
use crate::utils::{MeshBuffer, Vertex};
use crate::view::texture::GpuTexture;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const CLEAR_COLOR: Color = Color { r: 0.5, g: 0.5, b: 0.5, a: 1.0 };
const AMBIENT: f32 = 0.25;

/// Camera, lighting and texture bindings shared by every object (group 0)
pub struct SceneResources {
    pub camera_buffer: Buffer,
    pub lighting_buffer: Buffer,
    pub bind_group_layout: BindGroupLayout,
    pub bind_group: BindGroup,
    pub texture: GpuTexture,
}

/// Per-object uniform and its bind group (group 1)
pub struct ObjectResources {
    pub buffer: Buffer,
    pub bind_group: BindGroup,
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_scene_resources(device: &Device, light_position: glam::Vec3, texture: GpuTexture) -> SceneResources {
    let camera_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as BufferAddress,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting = LightingUniform { light_pos: light_position.to_array(), ambient: AMBIENT };
    let lighting_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some("lighting_buffer"),
        contents: bytemuck::bytes_of(&lighting),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("scene_bind_group_layout"),
        entries: &[
            uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT),
            uniform_entry(1, ShaderStages::FRAGMENT),
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 3,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("scene_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
            BindGroupEntry { binding: 2, resource: BindingResource::TextureView(&texture.view) },
            BindGroupEntry { binding: 3, resource: BindingResource::Sampler(&texture.sampler) },
        ],
    });

    SceneResources { camera_buffer, lighting_buffer, bind_group_layout, bind_group, texture }
}

pub fn create_object_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("object_bind_group_layout"),
        entries: &[uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT)],
    })
}

pub fn create_object_resources(device: &Device, layout: &BindGroupLayout, object: &SceneObject, label: &str) -> ObjectResources {
    let buffer = device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(&ObjectUniform::new(object)),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });
    ObjectResources { buffer, bind_group }
}

pub fn create_scene_pipeline(
    device: &Device,
    format: TextureFormat,
    scene_layout: &BindGroupLayout,
    object_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[scene_layout, object_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            // OBJ winding is not guaranteed; draw both sides
            cull_mode: None,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

///////////////////////////////////////////////////////////////////////////////

/// Everything needed to draw a frame
pub struct RenderState {
    pub pipeline: RenderPipeline,
    pub scene_resources: SceneResources,
    pub plane_mesh: MeshBuffer,
    pub ball_mesh: MeshBuffer,
    pub plane_object: ObjectResources,
    pub ball_object: ObjectResources,
    pub depth_texture: Texture,
    pub depth_view: TextureView,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl RenderState {
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Upload this frame's camera and model matrices
    pub fn write_uniforms(&self, queue: &Queue, transforms: &FrameTransforms, scene: &Scene) {
        queue.write_buffer(
            &self.scene_resources.camera_buffer,
            0,
            bytemuck::bytes_of(&transforms.camera_uniform()),
        );
        queue.write_buffer(&self.plane_object.buffer, 0, bytemuck::bytes_of(&ObjectUniform::new(&scene.plane)));
        queue.write_buffer(&self.ball_object.buffer, 0, bytemuck::bytes_of(&ObjectUniform::new(&scene.ball)));
    }

    pub fn draw_frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        overlay: Option<OverlayFrame>,
    ) -> Result<(), SurfaceError> {
        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &self.scene_resources.bind_group, &[]);

            for (mesh, object) in [
                (&self.plane_mesh, &self.plane_object),
                (&self.ball_mesh, &self.ball_object),
            ] {
                if mesh.index_count == 0 {
                    continue;
                }
                rp.set_bind_group(1, &object.bind_group, &[]);
                rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        if let Some(overlay) = overlay {
            for (id, image_delta) in &overlay.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &overlay.primitives,
                &overlay.screen_descriptor,
            );

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.egui_renderer.render(
                    &mut egui_pass.forget_lifetime(),
                    &overlay.primitives,
                    &overlay.screen_descriptor,
                );
            }

            for id in &overlay.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
