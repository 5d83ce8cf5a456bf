//! # Geometry Construction
//!
//! The in-memory mesh representation and the procedural builders that fill
//! it. A [`Geometry`] owns a shared vertex pool; any number of
//! [`GeometrySurface`]s reference that pool by index, three consecutive
//! corner indices forming one triangle. Each surface carries exactly one
//! material descriptor.
//!
//! ## Usage
//!
//! ```
//! use cairn::gfx::geometry::Geometry;
//! use cairn::gfx::resources::MaterialProperties;
//! use cgmath::{Vector2, Vector3};
//!
//! let mut geometry = Geometry::new();
//! let surface = geometry.create_surface(MaterialProperties::default());
//! geometry
//!     .surface_builder(surface)
//!     .build_cube_24v(
//!         Vector3::new(0.0, 0.0, 0.0),
//!         Vector3::new(1.0, 1.0, 1.0),
//!         Vector2::new(0.0, 0.0),
//!     );
//! assert_eq!(geometry.vertex_count(), 24);
//! ```

pub mod bounds;
pub mod builders;
pub mod normals;
pub mod polygon;
pub mod text;
pub mod triangulation;
pub mod vertex;

pub use bounds::BoundingBox;
pub use polygon::{Polygon, Polygon2D};
pub use text::{GlyphPath, PathSegment, TextGeometryOptions};
pub use triangulation::triangulate;
pub use vertex::Vertex;

use cgmath::{InnerSpace, Matrix4};

use crate::gfx::resources::MaterialProperties;

/// A transform applied to every vertex as it is appended to a geometry.
///
/// This is a construction-time feature only: changing or clearing the
/// transform never touches vertices that were already appended.
pub enum VertexTransform {
    /// Transform positions (w = 1) and normals (w = 0, renormalized) by a
    /// matrix.
    Matrix(Matrix4<f32>),
    /// An arbitrary per-vertex mapping.
    Custom(Box<dyn Fn(Vertex) -> Vertex>),
}

impl VertexTransform {
    fn apply(&self, mut vertex: Vertex) -> Vertex {
        match self {
            VertexTransform::Matrix(matrix) => {
                let position = matrix * vertex.position().extend(1.0);
                vertex.position = position.truncate().into();

                let normal = (matrix * vertex.normal().extend(0.0)).truncate();
                if normal.magnitude2() > f32::EPSILON {
                    vertex.normal = normal.normalize().into();
                }
                vertex
            }
            VertexTransform::Custom(function) => function(vertex),
        }
    }
}

/// The contiguous range of pool vertices a builder call produced.
///
/// Returned by every shape builder so callers can post-process just the new
/// vertices (e.g. run a ranged smooth-normal pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltVerticesRange {
    /// Index of the first vertex in the range.
    pub start: u32,
    /// Number of vertices in the range.
    pub count: u32,
}

impl BuiltVerticesRange {
    /// Creates a range covering `count` vertices starting at `start`.
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// An empty range positioned at `start`.
    pub fn empty(start: u32) -> Self {
        Self { start, count: 0 }
    }

    /// One past the last vertex in the range.
    pub fn end(&self) -> u32 {
        self.start + self.count
    }

    /// True if the range covers no vertices.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Extends this range to the union with `other`.
    ///
    /// # Panics
    /// Panics if the two ranges are neither adjacent nor overlapping; the
    /// union of disjoint ranges is not representable.
    pub fn merge(&mut self, other: BuiltVerticesRange) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        assert!(
            other.start <= self.end() && self.start <= other.end(),
            "cannot merge disjoint vertex ranges {}..{} and {}..{}",
            self.start,
            self.end(),
            other.start,
            other.end()
        );
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        *self = Self {
            start,
            count: end - start,
        };
    }
}

/// A set of triangles sharing one material, referencing the owning
/// [`Geometry`]'s vertex pool by index.
pub struct GeometrySurface {
    corners: Vec<u32>,
    material: MaterialProperties,
}

impl GeometrySurface {
    fn new(material: MaterialProperties) -> Self {
        Self {
            corners: Vec::new(),
            material,
        }
    }

    /// The flat corner index sequence; length is always a multiple of 3.
    pub fn corners(&self) -> &[u32] {
        &self.corners
    }

    /// Number of corner indices.
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    /// Iterates over the surface's triangles as corner-index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.corners
            .chunks_exact(3)
            .map(|corners| [corners[0], corners[1], corners[2]])
    }

    /// The surface's material descriptor.
    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    /// Mutable access to the material descriptor.
    pub fn material_mut(&mut self) -> &mut MaterialProperties {
        &mut self.material
    }
}

/// An in-memory mesh: a shared vertex pool plus an ordered collection of
/// surfaces referencing it.
///
/// Lifecycle: created empty, mutated through [`SurfaceBuilder`]s during the
/// build phase, then handed read-only to normal/tangent computation and
/// buffer consolidation.
pub struct Geometry {
    vertices: Vec<Vertex>,
    surfaces: Vec<GeometrySurface>,
    build_transform: Option<VertexTransform>,
}

impl Geometry {
    /// Creates an empty geometry.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            surfaces: Vec::new(),
            build_transform: None,
        }
    }

    /// Creates an empty geometry with a vertex capacity hint.
    pub fn with_vertex_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            surfaces: Vec::new(),
            build_transform: None,
        }
    }

    /// Number of vertices in the pool.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The vertex pool.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// A single vertex by index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: u32) -> &Vertex {
        &self.vertices[index as usize]
    }

    /// Replaces the vertex at `index` by value.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn replace_vertex(&mut self, index: u32, vertex: Vertex) {
        self.vertices[index as usize] = vertex;
    }

    /// Appends a new surface carrying the given material and returns its
    /// index.
    pub fn create_surface(&mut self, material: MaterialProperties) -> usize {
        self.surfaces.push(GeometrySurface::new(material));
        self.surfaces.len() - 1
    }

    /// Appends a new surface with the default (white diffuse, untextured)
    /// material.
    pub fn create_surface_default(&mut self) -> usize {
        self.create_surface(MaterialProperties::default())
    }

    /// The geometry's surfaces in creation order.
    pub fn surfaces(&self) -> &[GeometrySurface] {
        &self.surfaces
    }

    /// Number of surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// A single surface by index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn surface(&self, index: usize) -> &GeometrySurface {
        &self.surfaces[index]
    }

    /// Borrows one surface together with the shared vertex pool for
    /// building. Shape builders live on the returned [`SurfaceBuilder`].
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn surface_builder(&mut self, index: usize) -> SurfaceBuilder<'_> {
        let Geometry {
            vertices,
            surfaces,
            build_transform,
        } = self;
        SurfaceBuilder {
            vertices,
            build_transform,
            surface: &mut surfaces[index],
        }
    }

    /// Sets the transform applied to every vertex appended from now on.
    pub fn set_build_transform(&mut self, transform: VertexTransform) {
        self.build_transform = Some(transform);
    }

    /// Removes the build transform; vertices appended from now on are taken
    /// as-is.
    pub fn clear_build_transform(&mut self) {
        self.build_transform = None;
    }

    /// Total triangle count over all surfaces.
    pub fn triangle_count(&self) -> usize {
        self.surfaces
            .iter()
            .map(GeometrySurface::triangle_count)
            .sum()
    }

    /// Computes the bounding box of the current vertex positions.
    ///
    /// Always computed fresh; after mutating vertices simply call this
    /// again.
    pub fn calculate_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().map(Vertex::position))
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

/// A split borrow of one surface plus the owning geometry's vertex pool.
///
/// All shape builders are methods on this type; the low-level primitives
/// below are what they are built from. The build transform of the owning
/// geometry is applied inside [`SurfaceBuilder::add_vertex`].
pub struct SurfaceBuilder<'a> {
    pub(crate) vertices: &'a mut Vec<Vertex>,
    pub(crate) build_transform: &'a Option<VertexTransform>,
    pub(crate) surface: &'a mut GeometrySurface,
}

impl SurfaceBuilder<'_> {
    /// Appends a vertex to the shared pool, applying the geometry's build
    /// transform, and returns its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let vertex = match self.build_transform {
            Some(transform) => transform.apply(vertex),
            None => vertex,
        };
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends one triangle referencing existing pool vertices.
    pub fn add_triangle_corners(&mut self, a: u32, b: u32, c: u32) {
        self.surface.corners.extend_from_slice(&[a, b, c]);
    }

    /// Appends three new vertices and one triangle over them.
    pub fn add_triangle(&mut self, v1: Vertex, v2: Vertex, v3: Vertex) -> BuiltVerticesRange {
        let start = self.pool_vertex_count();
        let a = self.add_vertex(v1);
        let b = self.add_vertex(v2);
        let c = self.add_vertex(v3);
        self.add_triangle_corners(a, b, c);
        BuiltVerticesRange::new(start, 3)
    }

    /// Current vertex count of the shared pool (the index the next appended
    /// vertex will get).
    pub fn pool_vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// The surface being built.
    pub fn surface(&self) -> &GeometrySurface {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector2, Vector3};

    #[test]
    fn corner_count_stays_a_multiple_of_three() {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        let mut builder = geometry.surface_builder(surface);

        builder.add_triangle(
            Vertex::new(Vector3::new(0.0, 0.0, 0.0)),
            Vertex::new(Vector3::new(1.0, 0.0, 0.0)),
            Vertex::new(Vector3::new(0.0, 1.0, 0.0)),
        );
        builder.build_rect_4v(
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            Vector2::new(0.0, 0.0),
        );

        assert_eq!(geometry.surface(surface).corner_count() % 3, 0);
        assert_eq!(geometry.surface(surface).triangle_count(), 3);
    }

    #[test]
    fn surfaces_share_the_vertex_pool() {
        let mut geometry = Geometry::new();
        let first = geometry.create_surface_default();
        let second = geometry.create_surface_default();

        let a = geometry
            .surface_builder(first)
            .add_vertex(Vertex::new(Vector3::new(0.0, 0.0, 0.0)));
        let b = geometry
            .surface_builder(second)
            .add_vertex(Vertex::new(Vector3::new(1.0, 0.0, 0.0)));

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(geometry.vertex_count(), 2);
    }

    #[test]
    fn build_transform_applies_only_to_new_vertices() {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();

        geometry
            .surface_builder(surface)
            .add_vertex(Vertex::new(Vector3::new(1.0, 0.0, 0.0)));

        geometry.set_build_transform(VertexTransform::Matrix(Matrix4::from_translation(
            Vector3::new(0.0, 10.0, 0.0),
        )));
        geometry
            .surface_builder(surface)
            .add_vertex(Vertex::new(Vector3::new(1.0, 0.0, 0.0)));

        assert_eq!(geometry.vertex(0).position, [1.0, 0.0, 0.0]);
        assert_eq!(geometry.vertex(1).position, [1.0, 10.0, 0.0]);
    }

    #[test]
    fn custom_transform_is_applied_on_append() {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        geometry.set_build_transform(VertexTransform::Custom(Box::new(|mut vertex| {
            vertex.texture_factor = -1.0;
            vertex
        })));

        geometry
            .surface_builder(surface)
            .add_vertex(Vertex::new(Vector3::new(0.0, 0.0, 0.0)));
        assert_eq!(geometry.vertex(0).texture_factor, -1.0);
    }

    #[test]
    fn bounding_box_reflects_current_positions() {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        geometry
            .surface_builder(surface)
            .add_vertex(Vertex::new(Vector3::new(1.0, 1.0, 1.0)));

        let before = geometry.calculate_bounding_box();
        assert_eq!(before.max, Vector3::new(1.0, 1.0, 1.0));

        geometry.replace_vertex(0, Vertex::new(Vector3::new(5.0, 1.0, 1.0)));
        let after = geometry.calculate_bounding_box();
        assert_eq!(after.max, Vector3::new(5.0, 1.0, 1.0));
    }

    #[test]
    fn range_merge_takes_the_union() {
        let mut range = BuiltVerticesRange::new(4, 8);
        range.merge(BuiltVerticesRange::new(12, 4));
        assert_eq!(range, BuiltVerticesRange::new(4, 12));

        let mut range = BuiltVerticesRange::empty(0);
        range.merge(BuiltVerticesRange::new(0, 3));
        assert_eq!(range, BuiltVerticesRange::new(0, 3));
    }

    #[test]
    #[should_panic(expected = "disjoint")]
    fn range_merge_rejects_gaps() {
        let mut range = BuiltVerticesRange::new(0, 3);
        range.merge(BuiltVerticesRange::new(10, 3));
    }
}
