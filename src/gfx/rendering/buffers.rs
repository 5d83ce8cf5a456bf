//! # GPU Buffer Upload
//!
//! Turns a CPU-side [`PackedBufferSet`] into immutable wgpu buffers. The
//! vertex input layout matching the packed data comes from
//! [`Vertex::desc`](crate::gfx::geometry::Vertex::desc).

use wgpu::util::DeviceExt;

use super::consolidation::{BufferId, DrawRange, PackedBufferSet};
use crate::gfx::geometry::BoundingBox;

/// A consolidated mesh uploaded to the GPU: one immutable buffer per
/// packed array, plus the draw ranges and bounds carried over from
/// consolidation.
///
/// Buffers are released when the mesh is dropped; wgpu's ownership model
/// makes use-after-release unrepresentable.
pub struct ConsolidatedMesh {
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffers: Vec<wgpu::Buffer>,
    ranges: Vec<DrawRange>,
    bounds: BoundingBox,
}

impl PackedBufferSet {
    /// Uploads all packed buffers as immutable GPU buffers.
    pub fn upload(&self, device: &wgpu::Device) -> ConsolidatedMesh {
        let vertex_buffers = self
            .vertex_buffers
            .iter()
            .enumerate()
            .map(|(id, vertices)| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Consolidated Vertex Buffer {id}")),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();

        let index_buffers = self
            .index_buffers
            .iter()
            .enumerate()
            .map(|(id, indices)| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Consolidated Index Buffer {id}")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
            })
            .collect();

        ConsolidatedMesh {
            vertex_buffers,
            index_buffers,
            ranges: self.ranges.clone(),
            bounds: self.bounds,
        }
    }
}

impl ConsolidatedMesh {
    /// Draw ranges in submission order.
    pub fn ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    /// Bounding box over everything in the mesh, for culling and picking.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// The GPU vertex buffer behind an identity.
    ///
    /// # Panics
    /// Panics if the identity does not belong to this mesh.
    pub fn vertex_buffer(&self, id: BufferId) -> &wgpu::Buffer {
        &self.vertex_buffers[id.index()]
    }

    /// The GPU index buffer behind an identity.
    ///
    /// # Panics
    /// Panics if the identity does not belong to this mesh.
    pub fn index_buffer(&self, id: BufferId) -> &wgpu::Buffer {
        &self.index_buffers[id.index()]
    }
}
