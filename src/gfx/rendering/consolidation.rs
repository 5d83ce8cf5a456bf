//! # Buffer Consolidation
//!
//! Packs one or more built geometries into a minimal set of fixed-capacity
//! vertex/index buffers, grouped by material. The output is CPU-side data
//! ([`PackedBufferSet`]); uploading to the GPU is a separate step so the
//! packing algorithm stays testable without a device.
//!
//! Buffers rotate in two tiers: when a geometry's vertices no longer fit
//! the current vertex buffer, that buffer is finalized together with the
//! current index buffer (index buffers never span vertex buffers). When
//! only a surface's indices no longer fit, just the index buffer rotates.
//! Adjacent surfaces resolving to the same material extend one draw range
//! instead of emitting a new one, minimizing draw calls.

use log::debug;

use crate::gfx::error::{BufferKind, GraphicsError};
use crate::gfx::geometry::{BoundingBox, Geometry, GeometrySurface, Vertex};
use crate::gfx::resources::{MaterialHandle, MaterialRegistry};

/// Identity of one packed buffer. Doubles as the positional index into the
/// buffer list of the [`PackedBufferSet`] it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

impl BufferId {
    /// Positional index into the owning buffer list.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Per-buffer capacity ceilings for consolidation.
///
/// The defaults are a very large sentinel, effectively unbounded in
/// practice but still enforced; pass smaller limits to match a device's
/// addressable-index range.
#[derive(Debug, Clone, Copy)]
pub struct BufferLimits {
    /// Maximum vertex count of one packed vertex buffer.
    pub max_vertices_per_buffer: usize,
    /// Maximum index count of one packed index buffer.
    pub max_indices_per_buffer: usize,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_vertices_per_buffer: u32::MAX as usize,
            max_indices_per_buffer: u32::MAX as usize,
        }
    }
}

/// One GPU draw call: a material plus a contiguous index range inside one
/// packed index buffer, paired with the vertex buffer its indices point
/// into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    /// Resolved material to apply.
    pub material: MaterialHandle,
    /// Vertex buffer the indices refer into.
    pub vertex_buffer: BufferId,
    /// Index buffer holding the range.
    pub index_buffer: BufferId,
    /// First index of the range.
    pub start_index: u32,
    /// Number of indices in the range; always a multiple of 3.
    pub index_count: u32,
}

/// The consolidated, CPU-side output: packed buffers, draw ranges in
/// submission order, and the bounding box of everything packed.
pub struct PackedBufferSet {
    /// Packed vertex buffers, indexed by [`BufferId`].
    pub vertex_buffers: Vec<Vec<Vertex>>,
    /// Packed index buffers, indexed by [`BufferId`]. Index values are
    /// already offset against their paired vertex buffer.
    pub index_buffers: Vec<Vec<u32>>,
    /// Draw ranges in submission order.
    pub ranges: Vec<DrawRange>,
    /// Bounding box over all consolidated vertices.
    pub bounds: BoundingBox,
}

/// Consolidates built geometries into packed buffers and draw ranges.
///
/// Geometries with no vertices or no surfaces are skipped. Within each
/// geometry, surfaces are stably sorted by their material descriptor
/// (deterministic key order, see
/// [`MaterialProperties::cmp_stable`](crate::gfx::resources::MaterialProperties::cmp_stable))
/// so equal materials become adjacent and merge into single draw ranges,
/// including across geometry boundaries.
///
/// # Errors
///
/// - [`GraphicsError::BufferCapacity`] if a single geometry's vertices or
///   a single surface's indices cannot fit any one buffer; such input
///   cannot be split.
/// - [`GraphicsError::ResourceNotFound`] if a surface's material names an
///   unregistered texture; there is no fallback material.
pub fn consolidate(
    geometries: &[Geometry],
    registry: &mut MaterialRegistry,
    limits: &BufferLimits,
) -> Result<PackedBufferSet, GraphicsError> {
    let mut vertex_buffers: Vec<Vec<Vertex>> = Vec::new();
    let mut index_buffers: Vec<Vec<u32>> = Vec::new();
    let mut current_vertices: Vec<Vertex> = Vec::new();
    let mut current_indices: Vec<u32> = Vec::new();
    let mut ranges: Vec<DrawRange> = Vec::new();
    let mut bounds = BoundingBox::empty();

    for geometry in geometries {
        if geometry.vertex_count() == 0 || geometry.surface_count() == 0 {
            continue;
        }
        if geometry.vertex_count() > limits.max_vertices_per_buffer {
            return Err(GraphicsError::BufferCapacity {
                kind: BufferKind::Vertex,
                needed: geometry.vertex_count(),
                limit: limits.max_vertices_per_buffer,
            });
        }

        // Rotate the vertex buffer if this geometry no longer fits. The
        // current index buffer is finalized with it: its indices refer
        // into the buffer being closed.
        if !current_vertices.is_empty()
            && current_vertices.len() + geometry.vertex_count() > limits.max_vertices_per_buffer
        {
            vertex_buffers.push(std::mem::take(&mut current_vertices));
            if !current_indices.is_empty() {
                index_buffers.push(std::mem::take(&mut current_indices));
            }
        }

        let base_vertex = current_vertices.len() as u32;
        current_vertices.extend_from_slice(geometry.vertices());
        bounds.merge(&geometry.calculate_bounding_box());

        let mut surfaces: Vec<&GeometrySurface> = geometry.surfaces().iter().collect();
        surfaces.sort_by(|a, b| a.material().cmp_stable(b.material()));

        for surface in surfaces {
            if surface.corner_count() == 0 {
                continue;
            }
            if surface.corner_count() > limits.max_indices_per_buffer {
                return Err(GraphicsError::BufferCapacity {
                    kind: BufferKind::Index,
                    needed: surface.corner_count(),
                    limit: limits.max_indices_per_buffer,
                });
            }

            // Rotate just the index buffer if this surface no longer fits.
            if !current_indices.is_empty()
                && current_indices.len() + surface.corner_count() > limits.max_indices_per_buffer
            {
                index_buffers.push(std::mem::take(&mut current_indices));
            }

            let material = registry.resolve_or_create(surface.material())?;
            let vertex_buffer = BufferId(vertex_buffers.len() as u32);
            let index_buffer = BufferId(index_buffers.len() as u32);
            let start_index = current_indices.len() as u32;
            current_indices.extend(surface.corners().iter().map(|corner| corner + base_vertex));

            match ranges.last_mut() {
                // The previous range still targets the open index buffer
                // and resolves to the same material: extend it instead of
                // starting a new draw call.
                Some(last) if last.index_buffer == index_buffer && last.material == material => {
                    last.index_count += surface.corner_count() as u32;
                }
                _ => ranges.push(DrawRange {
                    material,
                    vertex_buffer,
                    index_buffer,
                    start_index,
                    index_count: surface.corner_count() as u32,
                }),
            }
        }
    }

    if !current_vertices.is_empty() {
        vertex_buffers.push(current_vertices);
    }
    if !current_indices.is_empty() {
        index_buffers.push(current_indices);
    }

    debug!(
        "consolidated {} geometries into {} vertex buffer(s), {} index buffer(s), {} draw range(s)",
        geometries.len(),
        vertex_buffers.len(),
        index_buffers.len(),
        ranges.len()
    );

    Ok(PackedBufferSet {
        vertex_buffers,
        index_buffers,
        ranges,
        bounds,
    })
}
