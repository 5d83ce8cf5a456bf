//! # Normal and Tangent Computation
//!
//! Post-build passes over a populated [`Geometry`]: per-triangle flat
//! normals, per-vertex averaged (smooth) normals, and tangent/binormal
//! frames derived from UV gradients.

use cgmath::{InnerSpace, Vector3};

use super::{BuiltVerticesRange, Geometry};

impl Geometry {
    /// Computes flat normals: every triangle's face normal is written to
    /// all three of its corner vertices.
    ///
    /// Vertices shared between triangles end up with the normal of the
    /// last triangle visiting them; use [`Geometry::calculate_normals`] for
    /// averaged shading instead.
    pub fn calculate_normals_flat(&mut self) {
        let Geometry {
            vertices, surfaces, ..
        } = self;
        for surface in surfaces.iter() {
            for triangle in surface.triangles() {
                let p1 = vertices[triangle[0] as usize].position();
                let p2 = vertices[triangle[1] as usize].position();
                let p3 = vertices[triangle[2] as usize].position();

                let normal = (p2 - p1).cross(p3 - p1);
                if normal.magnitude2() <= f32::EPSILON {
                    continue;
                }
                let normal: [f32; 3] = normal.normalize().into();
                for corner in triangle {
                    vertices[corner as usize].normal = normal;
                }
            }
        }
    }

    /// Computes averaged (smooth) normals for every vertex.
    pub fn calculate_normals(&mut self) {
        let count = self.vertex_count() as u32;
        self.calculate_normals_in_range(BuiltVerticesRange::new(0, count));
    }

    /// Computes averaged (smooth) normals for the vertices in `range`.
    ///
    /// For each vertex, all surfaces' triangles referencing it contribute
    /// their unnormalized face normal; the sum is normalized and written
    /// back. The scan is O(vertices x triangles), which is acceptable for
    /// moderate meshes; the straightforward summation order is part of the
    /// observable output (floating-point rounding), so it is deliberately
    /// not replaced by an adjacency-map variant.
    ///
    /// # Panics
    /// Panics if the range extends past the vertex pool.
    pub fn calculate_normals_in_range(&mut self, range: BuiltVerticesRange) {
        let Geometry {
            vertices, surfaces, ..
        } = self;
        for index in range.start..range.end() {
            let mut accumulated = Vector3::new(0.0, 0.0, 0.0);
            for surface in surfaces.iter() {
                for triangle in surface.triangles() {
                    if triangle[0] != index && triangle[1] != index && triangle[2] != index {
                        continue;
                    }
                    let p1 = vertices[triangle[0] as usize].position();
                    let p2 = vertices[triangle[1] as usize].position();
                    let p3 = vertices[triangle[2] as usize].position();
                    accumulated += (p2 - p1).cross(p3 - p1);
                }
            }
            if accumulated.magnitude2() > f32::EPSILON {
                vertices[index as usize].normal = accumulated.normalize().into();
            }
        }
    }

    /// Derives tangents and binormals from UV gradients, one frame per
    /// triangle, written to all three corner vertices.
    ///
    /// Unlike the smooth-normal pass there is no averaging: a shared
    /// vertex keeps the frame of the last triangle visiting it. Each frame
    /// is Gram-Schmidt orthonormalized against the vertex normal, so run a
    /// normal pass first.
    pub fn calculate_tangents_and_binormals(&mut self) {
        let Geometry {
            vertices, surfaces, ..
        } = self;
        for surface in surfaces.iter() {
            for triangle in surface.triangles() {
                let v1 = &vertices[triangle[0] as usize];
                let v2 = &vertices[triangle[1] as usize];
                let v3 = &vertices[triangle[2] as usize];

                let e1 = v2.position() - v1.position();
                let e2 = v3.position() - v1.position();
                let duv1 = v2.tex_coord() - v1.tex_coord();
                let duv2 = v3.tex_coord() - v1.tex_coord();

                let det = duv1.x * duv2.y - duv2.x * duv1.y;
                if det.abs() < 1e-12 {
                    continue;
                }
                let r = 1.0 / det;
                let tangent = (e1 * duv2.y - e2 * duv1.y) * r;
                let binormal = (e2 * duv1.x - e1 * duv2.x) * r;

                for corner in triangle {
                    let vertex = &mut vertices[corner as usize];
                    let normal = vertex.normal();

                    let t = tangent - normal * normal.dot(tangent);
                    if t.magnitude2() <= f32::EPSILON {
                        continue;
                    }
                    let t = t.normalize();

                    let b = binormal - normal * normal.dot(binormal) - t * t.dot(binormal);
                    if b.magnitude2() <= f32::EPSILON {
                        continue;
                    }

                    vertex.tangent = t.into();
                    vertex.binormal = b.normalize().into();
                }
            }
        }
    }
}
