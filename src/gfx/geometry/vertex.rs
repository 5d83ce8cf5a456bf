//! # Vertex Data Structures
//!
//! This module defines the vertex format used by the geometry construction
//! engine. It provides a GPU-compatible vertex layout carrying position,
//! normal, texture coordinate, color, tangent frame, and texture visibility
//! data.

use cgmath::{Vector2, Vector3};

/// A full-featured mesh vertex.
///
/// Vertices are stored by value in the vertex pool of a
/// [`Geometry`](super::Geometry) and referenced by index from surface
/// triangles. The layout is GPU-ready: `#[repr(C)]` with no padding, so a
/// packed vertex buffer can be uploaded with a single byte copy.
///
/// # Fields
///
/// - `position`: 3D position coordinates [x, y, z]
/// - `normal`: normal vector for lighting
/// - `tex_coord`: primary texture coordinate [u, v]
/// - `color`: RGBA vertex color, transparent by default
/// - `tangent` / `binormal`: tangent frame for normal mapping
/// - `texture_factor`: texture visibility; values >= 0 show the texture,
///   negative values hide it
///
/// # Examples
///
/// ```
/// use cairn::gfx::geometry::Vertex;
/// use cgmath::Vector3;
///
/// let vertex = Vertex::new(Vector3::new(0.0, 1.0, 0.0))
///     .with_normal(Vector3::new(0.0, 1.0, 0.0));
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// Normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Primary texture coordinate [u, v]
    pub tex_coord: [f32; 2],
    /// RGBA vertex color
    pub color: [f32; 4],
    /// Tangent vector of the tangent frame
    pub tangent: [f32; 3],
    /// Binormal vector of the tangent frame
    pub binormal: [f32; 3],
    /// Texture visibility factor; >= 0 shows the texture, negative hides it
    pub texture_factor: f32,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            tex_coord: [0.0; 2],
            color: [0.0; 4],
            tangent: [0.0; 3],
            binormal: [0.0; 3],
            texture_factor: 0.0,
        }
    }
}

impl Vertex {
    /// Creates a vertex at the given position with all other attributes at
    /// their defaults (transparent color, zero normal, visible texture).
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: set the normal vector
    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal.into();
        self
    }

    /// Builder pattern: set the texture coordinate
    pub fn with_tex_coord(mut self, tex_coord: Vector2<f32>) -> Self {
        self.tex_coord = tex_coord.into();
        self
    }

    /// Builder pattern: set the vertex color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Position as a cgmath vector for geometry math.
    pub fn position(&self) -> Vector3<f32> {
        self.position.into()
    }

    /// Normal as a cgmath vector for geometry math.
    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }

    /// Texture coordinate as a cgmath vector.
    pub fn tex_coord(&self) -> Vector2<f32> {
        self.tex_coord.into()
    }

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// Describes how packed vertex data is interpreted by shaders:
    /// position, normal, tex_coord, color, tangent, binormal and
    /// texture_factor at shader locations 0 through 6.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBUTES: [wgpu::VertexAttribute; 7] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 15]>() as wgpu::BufferAddress,
                shader_location: 5,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 18]>() as wgpu::BufferAddress,
                shader_location: 6,
                format: wgpu::VertexFormat::Float32,
            },
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        // 19 floats, no padding allowed by the GPU layout.
        assert_eq!(std::mem::size_of::<Vertex>(), 19 * 4);
    }

    #[test]
    fn builder_sets_attributes() {
        let v = Vertex::new(Vector3::new(1.0, 2.0, 3.0))
            .with_normal(Vector3::new(0.0, 1.0, 0.0))
            .with_tex_coord(Vector2::new(0.5, 0.25))
            .with_color([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.position, [1.0, 2.0, 3.0]);
        assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        assert_eq!(v.tex_coord, [0.5, 0.25]);
        assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.texture_factor, 0.0);
    }
}
