//! Instanced disc pipeline for particle visuals
//!
//! Draws camera-facing quads, one instance per disc, and lets the fragment
//! stage cut them down to a circle. Instance data comes from a storage buffer
//! that grows with the particle count.

use crate::context::RenderError;
use bytemuck::{Pod, Zeroable};
use ember_scene::{SceneObject, ShaderSource};
use wgpu::util::DeviceExt;

/// GPU instance data for one disc, matches the WGSL `Disc` struct.
/// 64 bytes, 16-byte aligned (4 x vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DiscInstanceGpu {
    pub center: [f32; 4],
    /// Right axis of the face, scaled by the radius
    pub right: [f32; 4],
    /// Up axis of the face, scaled by the radius
    pub up: [f32; 4],
    pub color: [f32; 4],
}

impl DiscInstanceGpu {
    pub fn from_object(obj: &SceneObject) -> Self {
        let (right, up) = obj.billboard_axes();
        let p = obj.position;
        Self {
            center: [p.x, p.y, p.z, 1.0],
            right: [right.x, right.y, right.z, 0.0],
            up: [up.x, up.y, up.z, 0.0],
            color: obj.color.to_rgba(),
        }
    }
}

/// Camera uniforms shared by the scene pipelines
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ViewUniforms {
    pub view_proj: [[f32; 4]; 4],
}

const MIN_INSTANCE_CAPACITY: usize = 64;

/// Buffer capacity (in elements) able to hold `needed`, never shrinking
pub(crate) fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(MIN_INSTANCE_CAPACITY)
    }
}

pub struct DiscPipeline {
    pipeline: wgpu::RenderPipeline,
    instance_bind_group_layout: wgpu::BindGroupLayout,
    quad_index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_bind_group: wgpu::BindGroup,
    capacity: usize,
    instance_count: u32,
}

impl DiscPipeline {
    /// Build the pipeline from `shader`. Compilation and layout errors in a
    /// user-supplied shader come back as `RenderError::ShaderCompilation`.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shader: &ShaderSource,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(shader.wgsl.clone()),
        });

        // Group 0: camera uniforms
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("Disc Uniform Bind Group Layout"),
            });

        // Group 1: instance storage buffer (read-only)
        let instance_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Disc Instance Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Disc Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &instance_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Disc Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(ember_scene::shader::VERTEX_ENTRY),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(ember_scene::shader::FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilation {
                label: shader.label.clone(),
                message: err.to_string(),
            });
        }

        let quad_indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Disc Quad Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Disc Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ViewUniforms {
                view_proj: [[0.0; 4]; 4],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Disc Uniform Bind Group"),
        });

        let capacity = MIN_INSTANCE_CAPACITY;
        let (instance_buffer, instance_bind_group) =
            create_instance_buffer(device, &instance_bind_group_layout, capacity);

        tracing::debug!(shader = %shader.label, "disc pipeline created");

        Ok(Self {
            pipeline,
            instance_bind_group_layout,
            quad_index_buffer,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_bind_group,
            capacity,
            instance_count: 0,
        })
    }

    /// Upload the camera and this frame's instances
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_proj: [[f32; 4]; 4],
        instances: &[DiscInstanceGpu],
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[ViewUniforms { view_proj }]),
        );

        let capacity = grown_capacity(self.capacity, instances.len());
        if capacity != self.capacity {
            let (buffer, bind_group) =
                create_instance_buffer(device, &self.instance_bind_group_layout, capacity);
            self.instance_buffer = buffer;
            self.instance_bind_group = bind_group;
            self.capacity = capacity;
            tracing::debug!(capacity, "grew disc instance buffer");
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.instance_bind_group, &[]);
        pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..6, 0, 0..self.instance_count);
    }
}

fn create_instance_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Disc Instance Buffer"),
        size: (capacity * std::mem::size_of::<DiscInstanceGpu>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("Disc Instance Bind Group"),
    });
    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Color, Vec3};
    use ember_scene::{Scene, SceneGraph, VisualDesc};

    #[test]
    fn instance_layout_is_four_vec4s() {
        assert_eq!(std::mem::size_of::<DiscInstanceGpu>(), 64);
        assert_eq!(std::mem::size_of::<ViewUniforms>(), 64);
    }

    #[test]
    fn instance_from_camera_facing_disc() {
        let mut scene = Scene::new();
        let h = scene.add(VisualDesc::disc(Vec3::new(1.0, 2.0, 3.0), 0.5, Color::GREEN));
        let instance = DiscInstanceGpu::from_object(scene.get(h.id()).unwrap());
        assert_eq!(instance.center, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(instance.color, [0.0, 1.0, 0.0, 1.0]);
        // Default facing is +Z, so the face spans X and Y
        assert_eq!(instance.right, [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(instance.up, [0.0, 0.5, 0.0, 0.0]);
        scene.remove(h);
    }

    #[test]
    fn capacity_grows_in_powers_of_two() {
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(64, 64), 64);
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(128, 1000), 1024);
        assert_eq!(grown_capacity(0, 1), MIN_INSTANCE_CAPACITY);
        // Never shrinks
        assert_eq!(grown_capacity(4096, 3), 4096);
    }
}
