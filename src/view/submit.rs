use glam::{Mat4, Vec3};
use tracing::debug;

use crate::config::SceneConfig;
use crate::controller::frame_loop::ObjectTransform;
use crate::view::buffers::{AttributeSlot, GpuBufferSet};
use crate::view::uniforms::{
    aligned_stride, UniformName, UniformTable, LIGHTING_BINDING, LIGHTING_UNIFORM_SIZE, OBJECT_BINDING,
    OBJECT_UNIFORM_SIZE,
};

/// Uploads per-object uniforms and issues one draw per object.
///
/// Each object gets its own slot in the object uniform buffer so that all
/// writes of a frame can be queued before the pass is submitted.
pub struct RenderSubmitter {
    uniforms: UniformTable,
    object_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u64,
}

impl RenderSubmitter {
    pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: OBJECT_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(OBJECT_UNIFORM_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: LIGHTING_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(LIGHTING_UNIFORM_SIZE),
                    },
                    count: None,
                },
            ],
        })
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, uniforms: UniformTable, slots: u32) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let slot_stride = aligned_stride(OBJECT_UNIFORM_SIZE, alignment);

        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniform_buffer"),
            size: slot_stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting_uniform_buffer"),
            size: LIGHTING_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: OBJECT_BINDING,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &object_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(OBJECT_UNIFORM_SIZE),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: LIGHTING_BINDING,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        debug!("Object uniform slots: {} x {} bytes", slots, slot_stride);

        Self {
            uniforms,
            object_buffer,
            lighting_buffer,
            bind_group,
            slot_stride,
        }
    }

    fn write_uniform(&self, queue: &wgpu::Queue, name: UniformName, base: u64, bytes: &[u8]) {
        let location = self.uniforms.location(name);
        let buffer = if location.binding == OBJECT_BINDING {
            &self.object_buffer
        } else {
            &self.lighting_buffer
        };
        queue.write_buffer(buffer, base + location.offset, bytes);
    }

    fn write_matrix(&self, queue: &wgpu::Queue, name: UniformName, base: u64, matrix: &Mat4) {
        self.write_uniform(queue, name, base, bytemuck::bytes_of(&matrix.to_cols_array_2d()));
    }

    fn write_light(&self, queue: &wgpu::Queue, name: UniformName, position: Vec3) {
        self.write_uniform(queue, name, 0, bytemuck::bytes_of(&position.extend(0.0).to_array()));
    }

    /// Light positions never change, so they are written once.
    pub fn write_lights(&self, queue: &wgpu::Queue, scene: &SceneConfig) {
        self.write_light(queue, UniformName::LightPositionHangar1, scene.hangar_a_light());
        self.write_light(queue, UniformName::LightPositionHangar2, scene.hangar_b_light());
        self.write_light(queue, UniformName::LightPositionWorldspace, scene.world_light());
    }

    /// Upload the object's matrices, bind its buffers to slots 0/1/2 and draw
    /// all of its vertices as a triangle list.
    pub fn draw_object(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        queue: &wgpu::Queue,
        buffers: &GpuBufferSet,
        object: &ObjectTransform,
        view: &Mat4,
    ) {
        let base = object.drawable.slot() as u64 * self.slot_stride;
        self.write_matrix(queue, UniformName::Mvp, base, &object.mvp);
        self.write_matrix(queue, UniformName::Model, base, &object.model);
        self.write_matrix(queue, UniformName::View, base, view);

        pass.insert_debug_marker(object.drawable.label());
        pass.set_bind_group(0, &self.bind_group, &[base as wgpu::DynamicOffset]);
        for slot in AttributeSlot::ALL {
            pass.set_vertex_buffer(slot as u32, buffers.buffer(slot).slice(..));
        }
        pass.draw(0..buffers.vertex_count, 0..1);
    }
}
