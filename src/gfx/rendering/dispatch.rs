//! # Render Dispatch
//!
//! Walks a consolidated mesh's draw ranges and issues one indexed draw per
//! range, rebinding vertex and index buffers only when their identity
//! changes between consecutive ranges. Materials are applied through a
//! caller-supplied binder on every range; a binder may skip redundant
//! state changes internally.

use wgpu::IndexFormat;

use super::buffers::ConsolidatedMesh;
use crate::gfx::resources::MaterialHandle;

/// Applies a resolved material's GPU state (pipeline, bind groups) to a
/// render pass. Implemented by whatever owns the GPU-side material
/// resources; the handle comes from the registry used at consolidation.
pub trait MaterialBinder {
    /// Binds the material's state onto the pass.
    fn apply<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, material: MaterialHandle);
}

/// Extension trait drawing consolidated meshes on a [`wgpu::RenderPass`].
pub trait DrawConsolidated<'a> {
    /// Draws every range of the mesh in order.
    fn draw_consolidated(&mut self, mesh: &'a ConsolidatedMesh, materials: &'a dyn MaterialBinder);
}

impl<'a, 'b> DrawConsolidated<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_consolidated(&mut self, mesh: &'b ConsolidatedMesh, materials: &'b dyn MaterialBinder) {
        let mut bound_vertex = None;
        let mut bound_index = None;

        for range in mesh.ranges() {
            if bound_vertex != Some(range.vertex_buffer) {
                self.set_vertex_buffer(0, mesh.vertex_buffer(range.vertex_buffer).slice(..));
                bound_vertex = Some(range.vertex_buffer);
            }
            if bound_index != Some(range.index_buffer) {
                self.set_index_buffer(
                    mesh.index_buffer(range.index_buffer).slice(..),
                    IndexFormat::Uint32,
                );
                bound_index = Some(range.index_buffer);
            }

            materials.apply(self, range.material);
            self.draw_indexed(
                range.start_index..range.start_index + range.index_count,
                0,
                0..1,
            );
        }
    }
}
