//! # Primitive Shape Builders
//!
//! This module contains the procedural shape generators. All builders are
//! methods on [`SurfaceBuilder`]: they append vertices to the owning
//! geometry's shared pool, append triangles to the surface being built, and
//! return the [`BuiltVerticesRange`] covering the new vertices.
//!
//! Builders that generate texture coordinates take a `tile_size` parameter:
//! a zero vector stretches the texture once across the shape ([0, 1] UVs),
//! a non-zero tile size maps one full UV repeat to that many world units so
//! textures tile seamlessly across differently sized shapes.

use std::collections::HashMap;
use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector2, Vector3};

use super::{BuiltVerticesRange, Polygon, SurfaceBuilder, Vertex};
use crate::gfx::error::GraphicsError;

/// UV extent of a face: [0, 1] when stretching, world size over tile size
/// when tiling.
fn uv_extent(tile_size: Vector2<f32>, world_width: f32, world_height: f32) -> Vector2<f32> {
    if tile_size.x == 0.0 || tile_size.y == 0.0 {
        Vector2::new(1.0, 1.0)
    } else {
        Vector2::new(world_width / tile_size.x, world_height / tile_size.y)
    }
}

/// UV for a point on a circular cap at the given unit-circle coordinates.
fn cap_uv(tile_size: Vector2<f32>, radius: f32, cos: f32, sin: f32) -> Vector2<f32> {
    if tile_size.x == 0.0 || tile_size.y == 0.0 {
        Vector2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin)
    } else {
        Vector2::new(radius * cos / tile_size.x, radius * sin / tile_size.y)
    }
}

fn validate_minimum(
    argument: &'static str,
    value: u32,
    minimum: u32,
) -> Result<(), GraphicsError> {
    if value < minimum {
        return Err(GraphicsError::InvalidArgument {
            argument,
            message: format!("at least {minimum} required, got {value}"),
        });
    }
    Ok(())
}

impl SurfaceBuilder<'_> {
    /// Builds a flat quad over the four given corner points (counter
    /// clockwise order). 4 vertices, 2 triangles, one shared flat normal.
    pub fn build_rect_4v(
        &mut self,
        points: [Vector3<f32>; 4],
        tile_size: Vector2<f32>,
    ) -> BuiltVerticesRange {
        let [a, b, c, d] = points;
        let normal_raw = (b - a).cross(d - a);
        let normal = if normal_raw.magnitude2() > f32::EPSILON {
            normal_raw.normalize()
        } else {
            Vector3::unit_y()
        };

        let width = (b - a).magnitude();
        let height = (d - a).magnitude();
        let extent = uv_extent(tile_size, width, height);

        let start = self.pool_vertex_count();
        let i0 = self.add_vertex(
            Vertex::new(a)
                .with_normal(normal)
                .with_tex_coord(Vector2::new(0.0, 0.0)),
        );
        let i1 = self.add_vertex(
            Vertex::new(b)
                .with_normal(normal)
                .with_tex_coord(Vector2::new(extent.x, 0.0)),
        );
        let i2 = self.add_vertex(
            Vertex::new(c)
                .with_normal(normal)
                .with_tex_coord(Vector2::new(extent.x, extent.y)),
        );
        let i3 = self.add_vertex(
            Vertex::new(d)
                .with_normal(normal)
                .with_tex_coord(Vector2::new(0.0, extent.y)),
        );

        self.add_triangle_corners(i0, i1, i2);
        self.add_triangle_corners(i2, i3, i0);
        BuiltVerticesRange::new(start, 4)
    }

    /// Builds a cube from 6 independently textured and normaled faces:
    /// 24 vertices, 12 triangles. `origin` is the minimum corner.
    pub fn build_cube_24v(
        &mut self,
        origin: Vector3<f32>,
        size: Vector3<f32>,
        tile_size: Vector2<f32>,
    ) -> BuiltVerticesRange {
        let lo = origin;
        let hi = origin + size;

        let mut range = BuiltVerticesRange::empty(self.pool_vertex_count());
        // Front (+Z)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(lo.x, lo.y, hi.z),
                Vector3::new(hi.x, lo.y, hi.z),
                Vector3::new(hi.x, hi.y, hi.z),
                Vector3::new(lo.x, hi.y, hi.z),
            ],
            tile_size,
        ));
        // Back (-Z)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(hi.x, lo.y, lo.z),
                Vector3::new(lo.x, lo.y, lo.z),
                Vector3::new(lo.x, hi.y, lo.z),
                Vector3::new(hi.x, hi.y, lo.z),
            ],
            tile_size,
        ));
        // Left (-X)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(lo.x, lo.y, lo.z),
                Vector3::new(lo.x, lo.y, hi.z),
                Vector3::new(lo.x, hi.y, hi.z),
                Vector3::new(lo.x, hi.y, lo.z),
            ],
            tile_size,
        ));
        // Right (+X)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(hi.x, lo.y, hi.z),
                Vector3::new(hi.x, lo.y, lo.z),
                Vector3::new(hi.x, hi.y, lo.z),
                Vector3::new(hi.x, hi.y, hi.z),
            ],
            tile_size,
        ));
        // Top (+Y)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(lo.x, hi.y, hi.z),
                Vector3::new(hi.x, hi.y, hi.z),
                Vector3::new(hi.x, hi.y, lo.z),
                Vector3::new(lo.x, hi.y, lo.z),
            ],
            tile_size,
        ));
        // Bottom (-Y)
        range.merge(self.build_rect_4v(
            [
                Vector3::new(lo.x, lo.y, lo.z),
                Vector3::new(hi.x, lo.y, lo.z),
                Vector3::new(hi.x, lo.y, hi.z),
                Vector3::new(lo.x, lo.y, hi.z),
            ],
            tile_size,
        ));
        range
    }

    /// Builds a cube from 8 shared corner vertices and 12 triangles. Faces
    /// share vertices, so normals point along the corner diagonals; run a
    /// smooth-normal pass or use for silhouette-only geometry.
    pub fn build_cube_8v(&mut self, origin: Vector3<f32>, size: Vector3<f32>) -> BuiltVerticesRange {
        let lo = origin;
        let hi = origin + size;
        let center = origin + size / 2.0;

        let corners = [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
        ];

        let start = self.pool_vertex_count();
        let mut indices = [0u32; 8];
        for (slot, corner) in corners.iter().enumerate() {
            let normal = (corner - center).normalize();
            indices[slot] = self.add_vertex(Vertex::new(*corner).with_normal(normal));
        }

        const FACES: [[usize; 3]; 12] = [
            [4, 5, 6],
            [6, 7, 4], // front (+Z)
            [1, 0, 3],
            [3, 2, 1], // back (-Z)
            [0, 4, 7],
            [7, 3, 0], // left (-X)
            [5, 1, 2],
            [2, 6, 5], // right (+X)
            [7, 6, 2],
            [2, 3, 7], // top (+Y)
            [0, 1, 5],
            [5, 4, 0], // bottom (-Y)
        ];
        for face in FACES {
            self.add_triangle_corners(indices[face[0]], indices[face[1]], indices[face[2]]);
        }
        BuiltVerticesRange::new(start, 8)
    }

    /// Builds an axis-aligned column standing on `bottom_middle`: a
    /// 24-vertex cube whose footprint is centered on that point.
    pub fn build_column_24v(
        &mut self,
        bottom_middle: Vector3<f32>,
        size: Vector3<f32>,
        tile_size: Vector2<f32>,
    ) -> BuiltVerticesRange {
        let origin = Vector3::new(
            bottom_middle.x - size.x / 2.0,
            bottom_middle.y,
            bottom_middle.z - size.z / 2.0,
        );
        self.build_cube_24v(origin, size, tile_size)
    }

    /// Builds a square-base pyramid standing on `bottom_middle`: a downward
    /// base quad plus 4 flat-shaded side triangles. 16 vertices, 6
    /// triangles.
    pub fn build_pyramid(
        &mut self,
        bottom_middle: Vector3<f32>,
        width: f32,
        height: f32,
    ) -> BuiltVerticesRange {
        let half = width / 2.0;
        let apex = bottom_middle + Vector3::new(0.0, height, 0.0);
        let c0 = bottom_middle + Vector3::new(-half, 0.0, -half);
        let c1 = bottom_middle + Vector3::new(half, 0.0, -half);
        let c2 = bottom_middle + Vector3::new(half, 0.0, half);
        let c3 = bottom_middle + Vector3::new(-half, 0.0, half);

        let mut range = BuiltVerticesRange::empty(self.pool_vertex_count());
        range.merge(self.build_rect_4v([c0, c1, c2, c3], Vector2::new(0.0, 0.0)));

        for (a, b) in [(c3, c2), (c2, c1), (c1, c0), (c0, c3)] {
            let normal = (b - a).cross(apex - a).normalize();
            range.merge(self.add_triangle(
                Vertex::new(a)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new(0.0, 1.0)),
                Vertex::new(b)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new(1.0, 1.0)),
                Vertex::new(apex)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new(0.5, 0.0)),
            ));
        }
        range
    }

    /// Builds a flat disc in the XZ plane facing +Y as a triangle fan.
    /// `segments + 1` vertices, `segments` triangles.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 3`.
    pub fn build_circle(
        &mut self,
        center: Vector3<f32>,
        radius: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        validate_minimum("segments", segments, 3)?;

        let start = self.pool_vertex_count();
        let middle = self.add_vertex(
            Vertex::new(center)
                .with_normal(Vector3::unit_y())
                .with_tex_coord(cap_uv(tile_size, radius, 0.0, 0.0)),
        );
        for i in 0..segments {
            let angle = i as f32 * 2.0 * PI / segments as f32;
            let (sin, cos) = angle.sin_cos();
            self.add_vertex(
                Vertex::new(center + Vector3::new(cos * radius, 0.0, sin * radius))
                    .with_normal(Vector3::unit_y())
                    .with_tex_coord(cap_uv(tile_size, radius, cos, sin)),
            );
        }
        for i in 0..segments {
            let current = start + 1 + i;
            let next = start + 1 + (i + 1) % segments;
            self.add_triangle_corners(middle, next, current);
        }
        Ok(BuiltVerticesRange::new(start, segments + 1))
    }

    /// Builds a cylinder standing on `bottom_middle`, with the side wall
    /// and each cap individually toggleable. Side normals are sampled at
    /// each segment's angular midpoint, giving flat-shaded side faces.
    ///
    /// Per segment the side wall emits 4 vertices and 2 triangles; each cap
    /// is a fan of `segments + 1` vertices and `segments` triangles.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cylinder_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
        build_sides: bool,
        build_bottom: bool,
        build_top: bool,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        validate_minimum("segments", segments, 5)?;

        let step = 2.0 * PI / segments as f32;
        let top_middle = bottom_middle + Vector3::new(0.0, height, 0.0);
        let mut range = BuiltVerticesRange::empty(self.pool_vertex_count());

        if build_sides {
            let extent = uv_extent(tile_size, 2.0 * PI * radius, height);
            for i in 0..segments {
                let angle0 = i as f32 * step;
                let angle1 = (i + 1) as f32 * step;
                let middle_angle = angle0 + step / 2.0;
                let normal =
                    Vector3::new(middle_angle.cos(), 0.0, middle_angle.sin());

                let (sin0, cos0) = angle0.sin_cos();
                let (sin1, cos1) = angle1.sin_cos();
                let bottom0 = bottom_middle + Vector3::new(cos0 * radius, 0.0, sin0 * radius);
                let bottom1 = bottom_middle + Vector3::new(cos1 * radius, 0.0, sin1 * radius);
                let top0 = bottom0 + Vector3::new(0.0, height, 0.0);
                let top1 = bottom1 + Vector3::new(0.0, height, 0.0);

                let u0 = extent.x * i as f32 / segments as f32;
                let u1 = extent.x * (i + 1) as f32 / segments as f32;

                let segment_start = self.pool_vertex_count();
                self.add_vertex(
                    Vertex::new(bottom0)
                        .with_normal(normal)
                        .with_tex_coord(Vector2::new(u0, 0.0)),
                );
                self.add_vertex(
                    Vertex::new(bottom1)
                        .with_normal(normal)
                        .with_tex_coord(Vector2::new(u1, 0.0)),
                );
                self.add_vertex(
                    Vertex::new(top0)
                        .with_normal(normal)
                        .with_tex_coord(Vector2::new(u0, extent.y)),
                );
                self.add_vertex(
                    Vertex::new(top1)
                        .with_normal(normal)
                        .with_tex_coord(Vector2::new(u1, extent.y)),
                );

                self.add_triangle_corners(segment_start, segment_start + 2, segment_start + 3);
                self.add_triangle_corners(segment_start, segment_start + 3, segment_start + 1);
                range.merge(BuiltVerticesRange::new(segment_start, 4));
            }
        }

        if build_bottom {
            range.merge(self.build_cap(bottom_middle, radius, segments, tile_size, false));
        }
        if build_top {
            range.merge(self.build_cap(top_middle, radius, segments, tile_size, true));
        }
        Ok(range)
    }

    /// Builds a full cylinder: side wall plus both caps.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cylinder_full_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        self.build_cylinder_v(
            bottom_middle,
            radius,
            height,
            segments,
            tile_size,
            true,
            true,
            true,
        )
    }

    /// Builds only the side wall of a cylinder.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cylinder_side_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        self.build_cylinder_v(
            bottom_middle,
            radius,
            height,
            segments,
            tile_size,
            true,
            false,
            false,
        )
    }

    /// Builds only the top cap of a cylinder.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cylinder_top_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        self.build_cylinder_v(
            bottom_middle,
            radius,
            height,
            segments,
            tile_size,
            false,
            false,
            true,
        )
    }

    /// Builds only the bottom cap of a cylinder.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cylinder_bottom_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        self.build_cylinder_v(
            bottom_middle,
            radius,
            height,
            segments,
            tile_size,
            false,
            true,
            false,
        )
    }

    /// Fan cap at `middle`, facing +Y when `up` is true, -Y otherwise.
    fn build_cap(
        &mut self,
        middle: Vector3<f32>,
        radius: f32,
        segments: u32,
        tile_size: Vector2<f32>,
        up: bool,
    ) -> BuiltVerticesRange {
        let normal = if up {
            Vector3::unit_y()
        } else {
            -Vector3::unit_y()
        };

        let start = self.pool_vertex_count();
        let center = self.add_vertex(
            Vertex::new(middle)
                .with_normal(normal)
                .with_tex_coord(cap_uv(tile_size, radius, 0.0, 0.0)),
        );
        for i in 0..segments {
            let angle = i as f32 * 2.0 * PI / segments as f32;
            let (sin, cos) = angle.sin_cos();
            self.add_vertex(
                Vertex::new(middle + Vector3::new(cos * radius, 0.0, sin * radius))
                    .with_normal(normal)
                    .with_tex_coord(cap_uv(tile_size, radius, cos, sin)),
            );
        }
        for i in 0..segments {
            let current = start + 1 + i;
            let next = start + 1 + (i + 1) % segments;
            if up {
                self.add_triangle_corners(center, next, current);
            } else {
                self.add_triangle_corners(center, current, next);
            }
        }
        BuiltVerticesRange::new(start, segments + 1)
    }

    /// Builds a cone standing on `bottom_middle`: a bottom cap plus
    /// flat-shaded side triangles meeting at the apex. `4 * segments + 1`
    /// vertices, `2 * segments` triangles.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `segments < 5`.
    pub fn build_cone_full_v(
        &mut self,
        bottom_middle: Vector3<f32>,
        radius: f32,
        height: f32,
        segments: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        validate_minimum("segments", segments, 5)?;

        let step = 2.0 * PI / segments as f32;
        let apex = bottom_middle + Vector3::new(0.0, height, 0.0);
        let slant = (height * height + radius * radius).sqrt();
        let extent = uv_extent(tile_size, 2.0 * PI * radius, slant);

        let mut range = self.build_cap(bottom_middle, radius, segments, tile_size, false);
        for i in 0..segments {
            let angle0 = i as f32 * step;
            let angle1 = (i + 1) as f32 * step;
            let (sin0, cos0) = angle0.sin_cos();
            let (sin1, cos1) = angle1.sin_cos();
            let bottom0 = bottom_middle + Vector3::new(cos0 * radius, 0.0, sin0 * radius);
            let bottom1 = bottom_middle + Vector3::new(cos1 * radius, 0.0, sin1 * radius);
            let normal = (apex - bottom0).cross(bottom1 - bottom0).normalize();

            let u0 = extent.x * i as f32 / segments as f32;
            let u1 = extent.x * (i + 1) as f32 / segments as f32;
            range.merge(self.add_triangle(
                Vertex::new(bottom0)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new(u0, extent.y)),
                Vertex::new(apex)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new((u0 + u1) / 2.0, 0.0)),
                Vertex::new(bottom1)
                    .with_normal(normal)
                    .with_tex_coord(Vector2::new(u1, extent.y)),
            ));
        }
        Ok(range)
    }

    /// Builds a UV sphere from a latitude/longitude grid:
    /// `(t_div + 1) * (p_div + 1)` vertices and `2 * t_div * p_div`
    /// triangles. Pole rows pinch to single rings, the standard UV-sphere
    /// seam artifact.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if `t_div < 2` or `p_div < 3`.
    pub fn build_sphere(
        &mut self,
        center: Vector3<f32>,
        radius: f32,
        t_div: u32,
        p_div: u32,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        validate_minimum("t_div", t_div, 2)?;
        validate_minimum("p_div", p_div, 3)?;

        let extent = uv_extent(tile_size, 2.0 * PI * radius, PI * radius);
        let start = self.pool_vertex_count();

        for lat in 0..=t_div {
            let theta = lat as f32 * PI / t_div as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for long in 0..=p_div {
                let phi = long as f32 * 2.0 * PI / p_div as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                // Spherical to Cartesian, Y up.
                let normal = Vector3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
                let uv = Vector2::new(
                    extent.x * long as f32 / p_div as f32,
                    extent.y * lat as f32 / t_div as f32,
                );
                self.add_vertex(
                    Vertex::new(center + normal * radius)
                        .with_normal(normal)
                        .with_tex_coord(uv),
                );
            }
        }

        for lat in 0..t_div {
            for long in 0..p_div {
                let first = start + lat * (p_div + 1) + long;
                let second = first + p_div + 1;

                self.add_triangle_corners(first, first + 1, second);
                self.add_triangle_corners(first + 1, second + 1, second);
            }
        }

        let count = (t_div + 1) * (p_div + 1);
        Ok(BuiltVerticesRange::new(start, count))
    }

    /// Builds a geosphere: a 12-vertex icosahedron subdivided
    /// `count_subdivisions` times (each round splits every triangle into 4
    /// at its edge midpoints), every vertex projected onto `radius`.
    /// Shared-edge midpoints are emitted once, so subdivision introduces no
    /// seams.
    pub fn build_geosphere(
        &mut self,
        center: Vector3<f32>,
        radius: f32,
        count_subdivisions: u32,
    ) -> BuiltVerticesRange {
        // Golden-ratio icosahedron on the unit sphere.
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let inv_len = 1.0 / (1.0 + phi * phi).sqrt();
        let a = inv_len;
        let b = phi * inv_len;

        let mut positions: Vec<Vector3<f32>> = vec![
            Vector3::new(-a, b, 0.0),
            Vector3::new(a, b, 0.0),
            Vector3::new(-a, -b, 0.0),
            Vector3::new(a, -b, 0.0),
            Vector3::new(0.0, -a, b),
            Vector3::new(0.0, a, b),
            Vector3::new(0.0, -a, -b),
            Vector3::new(0.0, a, -b),
            Vector3::new(b, 0.0, -a),
            Vector3::new(b, 0.0, a),
            Vector3::new(-b, 0.0, -a),
            Vector3::new(-b, 0.0, a),
        ];
        let mut faces: Vec<[u32; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..count_subdivisions {
            let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
            let mut next_faces = Vec::with_capacity(faces.len() * 4);
            for &[v0, v1, v2] in &faces {
                let m01 = edge_midpoint(&mut positions, &mut midpoints, v0, v1);
                let m12 = edge_midpoint(&mut positions, &mut midpoints, v1, v2);
                let m20 = edge_midpoint(&mut positions, &mut midpoints, v2, v0);
                next_faces.push([v0, m01, m20]);
                next_faces.push([v1, m12, m01]);
                next_faces.push([v2, m20, m12]);
                next_faces.push([m01, m12, m20]);
            }
            faces = next_faces;
        }

        let start = self.pool_vertex_count();
        for &unit in &positions {
            let u = 0.5 + unit.z.atan2(unit.x) / (2.0 * PI);
            let v = unit.y.clamp(-1.0, 1.0).acos() / PI;
            self.add_vertex(
                Vertex::new(center + unit * radius)
                    .with_normal(unit)
                    .with_tex_coord(Vector2::new(u, v)),
            );
        }
        for &[v0, v1, v2] in &faces {
            self.add_triangle_corners(start + v0, start + v1, start + v2);
        }
        BuiltVerticesRange::new(start, positions.len() as u32)
    }

    /// Fills a planar 3D polygon by flattening it onto its own plane and
    /// running ear-clipping triangulation. All vertices get the polygon's
    /// plane normal; UVs come from the flattened coordinates.
    ///
    /// # Errors
    /// [`GraphicsError::Triangulation`] if the polygon cannot be
    /// triangulated.
    pub fn build_polygon(
        &mut self,
        polygon: &Polygon,
        tile_size: Vector2<f32>,
    ) -> Result<BuiltVerticesRange, GraphicsError> {
        let flat = polygon.flatten();
        let indices = flat.triangulate()?;
        let normal = polygon.normal();

        let (min, max) = flat.extent();
        let size = max - min;

        let start = self.pool_vertex_count();
        for (point, projected) in polygon.points().iter().zip(flat.points()) {
            let local = projected - min;
            let uv = if tile_size.x == 0.0 || tile_size.y == 0.0 {
                Vector2::new(
                    if size.x > 0.0 { local.x / size.x } else { 0.0 },
                    if size.y > 0.0 { local.y / size.y } else { 0.0 },
                )
            } else {
                Vector2::new(local.x / tile_size.x, local.y / tile_size.y)
            };
            self.add_vertex(Vertex::new(*point).with_normal(normal).with_tex_coord(uv));
        }
        for triangle in indices.chunks_exact(3) {
            self.add_triangle_corners(
                start + triangle[0],
                start + triangle[1],
                start + triangle[2],
            );
        }
        Ok(BuiltVerticesRange::new(
            start,
            polygon.points().len() as u32,
        ))
    }
}

fn edge_midpoint(
    positions: &mut Vec<Vector3<f32>>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = (a.min(b), a.max(b));
    *cache.entry(key).or_insert_with(|| {
        let midpoint = ((positions[a as usize] + positions[b as usize]) / 2.0).normalize();
        positions.push(midpoint);
        (positions.len() - 1) as u32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Geometry;
    use approx::assert_relative_eq;

    fn build_target() -> (Geometry, usize) {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        (geometry, surface)
    }

    #[test]
    fn cube_24v_has_independent_faces() {
        let (mut geometry, surface) = build_target();
        let range = geometry.surface_builder(surface).build_cube_24v(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector2::new(0.0, 0.0),
        );

        assert_eq!(range, super::BuiltVerticesRange::new(0, 24));
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.surface(surface).triangle_count(), 12);
        assert_eq!(geometry.surface(surface).corner_count(), 36);

        let axis_units = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for vertex in geometry.vertices() {
            assert!(
                axis_units.contains(&vertex.normal),
                "unexpected face normal {:?}",
                vertex.normal
            );
            assert!(vertex.tex_coord[0] >= 0.0 && vertex.tex_coord[0] <= 1.0);
            assert!(vertex.tex_coord[1] >= 0.0 && vertex.tex_coord[1] <= 1.0);
        }

        // Each face spans the full [0,1]x[0,1] texture when stretching.
        for face in 0..6 {
            let face_vertices = &geometry.vertices()[face * 4..face * 4 + 4];
            let us: Vec<f32> = face_vertices.iter().map(|v| v.tex_coord[0]).collect();
            let vs: Vec<f32> = face_vertices.iter().map(|v| v.tex_coord[1]).collect();
            assert_eq!(us.iter().cloned().fold(f32::MAX, f32::min), 0.0);
            assert_eq!(us.iter().cloned().fold(f32::MIN, f32::max), 1.0);
            assert_eq!(vs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
            assert_eq!(vs.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        }
    }

    #[test]
    fn cube_24v_tiles_by_world_size() {
        let (mut geometry, surface) = build_target();
        geometry.surface_builder(surface).build_cube_24v(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 1.0, 1.0),
            Vector2::new(0.5, 0.5),
        );

        // Front face is 2 x 1 world units at tile size 0.5: UVs reach 4 x 2.
        let front = &geometry.vertices()[0..4];
        let max_u = front.iter().map(|v| v.tex_coord[0]).fold(f32::MIN, f32::max);
        let max_v = front.iter().map(|v| v.tex_coord[1]).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_u, 4.0, epsilon = 1e-6);
        assert_relative_eq!(max_v, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn cube_8v_shares_corners() {
        let (mut geometry, surface) = build_target();
        let range = geometry.surface_builder(surface).build_cube_8v(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(range.count, 8);
        assert_eq!(geometry.vertex_count(), 8);
        assert_eq!(geometry.surface(surface).triangle_count(), 12);
    }

    #[test]
    fn column_stands_on_bottom_middle() {
        let (mut geometry, surface) = build_target();
        geometry.surface_builder(surface).build_column_24v(
            Vector3::new(5.0, 1.0, 5.0),
            Vector3::new(2.0, 4.0, 2.0),
            Vector2::new(0.0, 0.0),
        );
        let bounds = geometry.calculate_bounding_box();
        assert_eq!(bounds.min, Vector3::new(4.0, 1.0, 4.0));
        assert_eq!(bounds.max, Vector3::new(6.0, 5.0, 6.0));
    }

    #[test]
    fn pyramid_counts() {
        let (mut geometry, surface) = build_target();
        let range = geometry
            .surface_builder(surface)
            .build_pyramid(Vector3::new(0.0, 0.0, 0.0), 2.0, 3.0);
        assert_eq!(range.count, 16);
        assert_eq!(geometry.surface(surface).triangle_count(), 6);

        // Side normals must point away from the vertical axis.
        for vertex in &geometry.vertices()[4..] {
            assert!(vertex.normal[1] >= 0.0);
            assert!(
                vertex.normal[0].abs() + vertex.normal[2].abs() > 0.0,
                "side normal {:?} has no horizontal component",
                vertex.normal
            );
        }
    }

    #[test]
    fn circle_minimum_segments() {
        let (mut geometry, surface) = build_target();
        let result = geometry.surface_builder(surface).build_circle(
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
            2,
            Vector2::new(0.0, 0.0),
        );
        assert!(matches!(result, Err(GraphicsError::InvalidArgument { .. })));

        let range = geometry
            .surface_builder(surface)
            .build_circle(Vector3::new(0.0, 0.0, 0.0), 1.0, 8, Vector2::new(0.0, 0.0))
            .unwrap();
        assert_eq!(range.count, 9);
        assert_eq!(geometry.surface(surface).triangle_count(), 8);
    }

    #[test]
    fn cylinder_rejects_too_few_segments() {
        let (mut geometry, surface) = build_target();
        let result = geometry.surface_builder(surface).build_cylinder_full_v(
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
            2.0,
            4,
            Vector2::new(0.0, 0.0),
        );
        assert!(matches!(
            result,
            Err(GraphicsError::InvalidArgument { argument: "segments", .. })
        ));
        assert_eq!(geometry.vertex_count(), 0);
    }

    #[test]
    fn cylinder_full_counts() {
        let (mut geometry, surface) = build_target();
        let range = geometry
            .surface_builder(surface)
            .build_cylinder_full_v(
                Vector3::new(0.0, 0.0, 0.0),
                1.0,
                2.0,
                5,
                Vector2::new(0.0, 0.0),
            )
            .unwrap();

        // 4 side vertices per segment plus two (segments + 1) fan caps.
        assert_eq!(range.count, 6 * 5 + 2);
        assert_eq!(geometry.surface(surface).triangle_count(), 4 * 5);
    }

    #[test]
    fn cylinder_caps_are_optional() {
        let (mut geometry, surface) = build_target();
        let range = geometry
            .surface_builder(surface)
            .build_cylinder_side_v(
                Vector3::new(0.0, 0.0, 0.0),
                1.0,
                2.0,
                6,
                Vector2::new(0.0, 0.0),
            )
            .unwrap();
        assert_eq!(range.count, 4 * 6);
        assert_eq!(geometry.surface(surface).triangle_count(), 2 * 6);

        let top = geometry
            .surface_builder(surface)
            .build_cylinder_top_v(
                Vector3::new(0.0, 0.0, 0.0),
                1.0,
                2.0,
                6,
                Vector2::new(0.0, 0.0),
            )
            .unwrap();
        assert_eq!(top.count, 7);
    }

    #[test]
    fn cone_counts() {
        let (mut geometry, surface) = build_target();
        let range = geometry
            .surface_builder(surface)
            .build_cone_full_v(
                Vector3::new(0.0, 0.0, 0.0),
                1.0,
                2.0,
                5,
                Vector2::new(0.0, 0.0),
            )
            .unwrap();
        assert_eq!(range.count, 4 * 5 + 1);
        assert_eq!(geometry.surface(surface).triangle_count(), 2 * 5);
    }

    #[test]
    fn sphere_grid_counts() {
        let (mut geometry, surface) = build_target();
        let range = geometry
            .surface_builder(surface)
            .build_sphere(
                Vector3::new(0.0, 0.0, 0.0),
                1.0,
                4,
                8,
                Vector2::new(0.0, 0.0),
            )
            .unwrap();
        assert_eq!(range.count, 5 * 9);
        assert_eq!(geometry.surface(surface).triangle_count(), 2 * 4 * 8);

        for vertex in geometry.vertices() {
            assert_relative_eq!(vertex.position().magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_rejects_small_divisions() {
        let (mut geometry, surface) = build_target();
        let result = geometry.surface_builder(surface).build_sphere(
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
            4,
            2,
            Vector2::new(0.0, 0.0),
        );
        assert!(matches!(
            result,
            Err(GraphicsError::InvalidArgument { argument: "p_div", .. })
        ));
    }

    #[test]
    fn geosphere_subdivision_growth() {
        let radius = 2.5;
        let mut expected_triangles = 20;
        let expected_vertices = [12u32, 42, 162];

        for (level, expected_vertex_count) in expected_vertices.into_iter().enumerate() {
            let (mut geometry, surface) = build_target();
            let range = geometry.surface_builder(surface).build_geosphere(
                Vector3::new(0.0, 0.0, 0.0),
                radius,
                level as u32,
            );

            assert_eq!(range.count, expected_vertex_count);
            assert_eq!(
                geometry.surface(surface).triangle_count(),
                expected_triangles
            );

            for vertex in geometry.vertices() {
                assert_relative_eq!(vertex.position().magnitude(), radius, epsilon = 1e-4);
            }
            expected_triangles *= 4;
        }
    }

    #[test]
    fn polygon_fill_uses_every_point() {
        let (mut geometry, surface) = build_target();
        let polygon = Polygon::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ])
        .unwrap();

        let range = geometry
            .surface_builder(surface)
            .build_polygon(&polygon, Vector2::new(0.0, 0.0))
            .unwrap();
        assert_eq!(range.count, 4);
        assert_eq!(geometry.surface(surface).triangle_count(), 2);

        let normal = polygon.normal();
        for vertex in geometry.vertices() {
            assert_relative_eq!(vertex.normal(), normal, epsilon = 1e-6);
        }
    }

    #[test]
    fn rect_4v_stretch_uvs() {
        let (mut geometry, surface) = build_target();
        geometry.surface_builder(surface).build_rect_4v(
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(3.0, 0.0, 0.0),
                Vector3::new(3.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            Vector2::new(0.0, 0.0),
        );
        let coords: Vec<[f32; 2]> = geometry.vertices().iter().map(|v| v.tex_coord).collect();
        assert_eq!(
            coords,
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        );
    }
}
