use crate::camera::FlyCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use frenzy_assets::{LoadedModel, LoadedScene, ModelVertex, TextureData};
use frenzy_render::{DrawCommand, DrawList, ModelKind};
use glam::Vec3;
use std::ops::Range;
use wgpu::util::DeviceExt;

const MAX_INSTANCES: usize = 256;

/// Scene-wide light, fog and background colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Vec3,
    pub light_color: Vec3,
    pub light_dir: Vec3,
    pub fog_color: Vec3,
    pub fog_density: f32,
    pub background_top: Vec3,
    pub background_bottom: Vec3,
    /// Sun glow center in normalized screen coordinates.
    pub sun_position: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Vec3::new(0.0, 0.3, 0.5),
            light_color: Vec3::new(0.8, 0.9, 1.0),
            light_dir: Vec3::new(0.0, -1.0, 0.0),
            fog_color: Vec3::new(0.0, 0.2, 0.4),
            fog_density: 0.025,
            background_top: Vec3::new(0.0, 0.3, 0.5),
            background_bottom: Vec3::new(0.0, 0.1, 0.2),
            sun_position: Vec3::new(0.5, 0.8, 0.3),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_color: [f32; 4],
    light_dir: [f32; 4],
    fog: [f32; 4],
    top_color: [f32; 4],
    bottom_color: [f32; 4],
    sun: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &FlyCamera, lighting: &Lighting, time: f32) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: lighting.ambient.extend(1.0).to_array(),
            light_color: lighting.light_color.extend(1.0).to_array(),
            light_dir: lighting.light_dir.extend(0.0).to_array(),
            fog: lighting.fog_color.extend(lighting.fog_density).to_array(),
            top_color: lighting.background_top.extend(1.0).to_array(),
            bottom_color: lighting.background_bottom.extend(1.0).to_array(),
            sun: lighting.sun_position.extend(time).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    tex_coord: [f32; 2],
    mesh_id: u32,
}

impl From<ModelVertex> for Vertex {
    fn from(v: ModelVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            tex_coord: v.tex_coord,
            mesh_id: v.mesh_id,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    params: [f32; 4],
}

impl InstanceData {
    fn from_command(command: &DrawCommand) -> Self {
        let cols = command.transform.to_cols_array_2d();
        // Only the shark's tail submeshes sway; fish sway as a whole.
        let tail_only = if command.model == ModelKind::Shark { 1.0 } else { 0.0 };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            params: [command.sway, tail_only, 0.0, 0.0],
        }
    }
}

/// Pack draw commands into one instance array, grouped per model.
fn batch_instances(draws: &DrawList) -> (Vec<InstanceData>, [Range<u32>; 3]) {
    let mut instances = Vec::with_capacity(draws.len().min(MAX_INSTANCES));
    let mut ranges: [Range<u32>; 3] = [0..0, 0..0, 0..0];
    for (slot, kind) in ModelKind::ALL.into_iter().enumerate() {
        let start = instances.len() as u32;
        for command in draws.of_kind(kind) {
            if instances.len() >= MAX_INSTANCES {
                tracing::warn!("instance limit {MAX_INSTANCES} reached; dropping draws");
                break;
            }
            instances.push(InstanceData::from_command(command));
        }
        ranges[slot] = start..instances.len() as u32;
    }
    (instances, ranges)
}

/// Vertex buffer and texture bind group of one uploaded model.
struct GpuModel {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    texture_bind_group: wgpu::BindGroup,
}

impl GpuModel {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        name: &str,
        model: LoadedModel,
    ) -> Self {
        let vertices: Vec<Vertex> = model
            .data
            .vertices()
            .into_iter()
            .map(Vertex::from)
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}_vertex_buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // The CPU pixels are dropped once the upload is queued.
        let TextureData {
            rgba,
            width,
            height,
        } = model.texture;
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(&format!("{name}_texture")),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}_texture_bind_group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        tracing::debug!("uploaded {name}: {} vertices, {width}x{height} texture", vertices.len());

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            texture_bind_group,
        }
    }
}

/// wgpu renderer for the underwater scene.
pub struct FrenzyRenderer {
    background_pipeline: wgpu::RenderPipeline,
    model_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    models: [GpuModel; 3],
    depth_texture: wgpu::TextureView,
    lighting: Lighting,
}

impl FrenzyRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: LoadedScene,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::new(
                &FlyCamera::default(),
                &Lighting::default(),
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("model_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Background pipeline
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::background_shader().into()),
        });
        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_background"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_background"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            // Drawn first without touching depth.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Model pipeline
        let model_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("model_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::model_shader().into()),
        });
        let model_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let model_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&model_layout),
            vertex: wgpu::VertexState {
                module: &model_shader,
                entry_point: Some("vs_model"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x2,
                            3 => Uint32,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                            8 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &model_shader,
                entry_point: Some("fs_model"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Imported meshes do not share a winding convention.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_INSTANCES * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let LoadedScene {
            terrain,
            fish,
            shark,
        } = scene;
        let models = [
            GpuModel::upload(device, queue, &texture_layout, &sampler, "terrain", terrain),
            GpuModel::upload(device, queue, &texture_layout, &sampler, "fish", fish),
            GpuModel::upload(device, queue, &texture_layout, &sampler, "shark", shark),
        ];

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            background_pipeline,
            model_pipeline,
            frame_buffer,
            frame_bind_group,
            instance_buffer,
            models,
            depth_texture,
            lighting: Lighting::default(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: background gradient, then every draw command.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FlyCamera,
        draws: &DrawList,
        time: f32,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(camera, &self.lighting, time)),
        );

        let (instances, ranges) = batch_instances(draws);
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.background_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.draw(0..3, 0..1);

            if !instances.is_empty() {
                pass.set_pipeline(&self.model_pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                for (model, range) in self.models.iter().zip(ranges) {
                    if range.is_empty() || model.vertex_count == 0 {
                        continue;
                    }
                    pass.set_bind_group(1, &model.texture_bind_group, &[]);
                    pass.set_vertex_buffer(0, model.vertex_buffer.slice(..));
                    pass.draw(0..model.vertex_count, range);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frenzy_kernel::Simulation;
    use frenzy_render::SceneLayout;

    #[test]
    fn gpu_structs_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 192);
    }

    #[test]
    fn frame_uniforms_pack_lighting() {
        let uniforms = FrameUniforms::new(&FlyCamera::default(), &Lighting::default(), 2.5);
        assert_eq!(uniforms.fog, [0.0, 0.2, 0.4, 0.025]);
        assert_eq!(uniforms.sun[3], 2.5);
        assert_eq!(uniforms.camera_pos, [0.0, 4.0, 15.0, 1.0]);
        assert_eq!(uniforms.light_dir, [0.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn batches_group_by_model() {
        let sim = Simulation::default();
        let draws = DrawList::build(&sim, &SceneLayout::default());
        let (instances, ranges) = batch_instances(&draws);
        assert_eq!(instances.len(), 12);
        assert_eq!(ranges[0], 0..1);
        assert_eq!(ranges[1], 1..11);
        assert_eq!(ranges[2], 11..12);
        // Shark instance marks tail-only sway.
        assert_eq!(instances[11].params[1], 1.0);
        assert_eq!(instances[1].params[1], 0.0);
    }

    #[test]
    fn vertex_conversion_keeps_mesh_id() {
        let v = Vertex::from(ModelVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            tex_coord: [0.5, 0.5],
            mesh_id: 2,
        });
        assert_eq!(v.mesh_id, 2);
        assert_eq!(v.position, [1.0, 2.0, 3.0]);
    }
}
