use tracing::{debug, info};
use wgpu::util::DeviceExt;

use crate::model::{Mesh, MeshId, MeshStore};

/// Vertex attribute slots fed by the three buffers of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSlot {
    Position = 0,
    Uv = 1,
    Normal = 2,
}

impl AttributeSlot {
    pub const ALL: [AttributeSlot; 3] = [AttributeSlot::Position, AttributeSlot::Uv, AttributeSlot::Normal];

    pub fn components(self) -> u64 {
        match self {
            AttributeSlot::Position | AttributeSlot::Normal => 3,
            AttributeSlot::Uv => 2,
        }
    }

    /// Tightly packed f32 components, no padding between vertices
    pub fn stride(self) -> wgpu::BufferAddress {
        self.components() * std::mem::size_of::<f32>() as wgpu::BufferAddress
    }
}

static POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: AttributeSlot::Position as u32,
}];

static UV_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: AttributeSlot::Uv as u32,
}];

static NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: AttributeSlot::Normal as u32,
}];

/// One buffer layout per attribute slot, in slot order
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        wgpu::VertexBufferLayout {
            array_stride: AttributeSlot::Position.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: AttributeSlot::Uv.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &UV_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: AttributeSlot::Normal.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL_ATTRIBUTES,
        },
    ]
}

/// Position, UV and normal buffers of one mesh
pub struct GpuBufferSet {
    pub position_buffer: wgpu::Buffer,
    pub uv_buffer: wgpu::Buffer,
    pub normal_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GpuBufferSet {
    pub fn upload(mesh: &Mesh, device: &wgpu::Device, label: &str) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} position buffer")),
            contents: bytemuck::cast_slice(mesh.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} uv buffer")),
            contents: bytemuck::cast_slice(mesh.uvs()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} normal buffer")),
            contents: bytemuck::cast_slice(mesh.normals()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        debug!("Uploaded {} ({} vertices)", label, mesh.vertex_count());

        Self {
            position_buffer,
            uv_buffer,
            normal_buffer,
            vertex_count: mesh.vertex_count(),
        }
    }

    pub fn buffer(&self, slot: AttributeSlot) -> &wgpu::Buffer {
        match slot {
            AttributeSlot::Position => &self.position_buffer,
            AttributeSlot::Uv => &self.uv_buffer,
            AttributeSlot::Normal => &self.normal_buffer,
        }
    }

    fn release(self) {
        for slot in AttributeSlot::ALL {
            self.buffer(slot).destroy();
        }
    }
}

/// Exactly one [`GpuBufferSet`] per [`MeshId`], alive from startup to shutdown
pub struct GpuMeshStore {
    sets: [GpuBufferSet; 3],
}

impl GpuMeshStore {
    pub fn upload(meshes: &MeshStore, device: &wgpu::Device) -> Self {
        let sets = MeshId::ALL.map(|id| GpuBufferSet::upload(meshes.get(id), device, id.label()));
        info!("Uploaded {} meshes to the GPU", sets.len());
        Self { sets }
    }

    pub fn get(&self, id: MeshId) -> &GpuBufferSet {
        &self.sets[id.index()]
    }

    /// Destroy every buffer. Consumes the store so it happens once.
    pub fn release(self) {
        for set in self.sets {
            set.release();
        }
        info!("Released mesh buffers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_are_tightly_packed() {
        let layouts = vertex_buffer_layouts();
        for (slot, layout) in AttributeSlot::ALL.iter().zip(layouts.iter()) {
            assert_eq!(layout.array_stride, slot.components() * 4);
            assert_eq!(layout.attributes.len(), 1);
            assert_eq!(layout.attributes[0].offset, 0);
            assert_eq!(layout.attributes[0].shader_location, *slot as u32);
            assert_eq!(layout.attributes[0].format.size(), layout.array_stride);
        }
    }

    #[test]
    fn test_slot_components() {
        assert_eq!(AttributeSlot::Position.stride(), 12);
        assert_eq!(AttributeSlot::Uv.stride(), 8);
        assert_eq!(AttributeSlot::Normal.stride(), 12);
    }
}
