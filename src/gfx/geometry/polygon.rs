//! # Polygon Types
//!
//! Immutable polygon values used as triangulation input. A [`Polygon`] lives
//! in 3D and can flatten itself onto its own plane, producing a
//! [`Polygon2D`] that the ear-clipping triangulator consumes.

use std::cell::OnceCell;

use cgmath::{InnerSpace, Vector2, Vector3};

use super::triangulation;
use crate::gfx::error::GraphicsError;

/// An immutable, ordered sequence of at least 3 coplanar 3D points.
///
/// The plane normal is derived lazily from the first three vertices and
/// cached for the lifetime of the polygon.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Vector3<f32>>,
    plane_normal: OnceCell<Vector3<f32>>,
}

impl Polygon {
    /// Creates a polygon from an ordered point sequence.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if fewer than 3 points are given.
    pub fn new(points: Vec<Vector3<f32>>) -> Result<Self, GraphicsError> {
        if points.len() < 3 {
            return Err(GraphicsError::InvalidArgument {
                argument: "points",
                message: format!("a polygon needs at least 3 points, got {}", points.len()),
            });
        }
        Ok(Self {
            points,
            plane_normal: OnceCell::new(),
        })
    }

    /// The polygon's points in order.
    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// Unit normal of the polygon's plane, computed once from the first
    /// three vertices. Falls back to +Y if those vertices are collinear.
    pub fn normal(&self) -> Vector3<f32> {
        *self.plane_normal.get_or_init(|| {
            let edge1 = self.points[1] - self.points[0];
            let edge2 = self.points[2] - self.points[0];
            let cross = edge1.cross(edge2);
            if cross.magnitude2() > f32::EPSILON {
                cross.normalize()
            } else {
                Vector3::unit_y()
            }
        })
    }

    /// Projects the polygon onto its own plane.
    ///
    /// Builds a right/back orthonormal basis around the plane normal and
    /// translates so the first point becomes the local origin. Counter
    /// clockwise order in the flattened space faces the plane normal.
    pub fn flatten(&self) -> Polygon2D {
        let normal = self.normal();
        let helper = if normal.y.abs() < 0.99 {
            Vector3::unit_y()
        } else {
            Vector3::unit_x()
        };
        let right = helper.cross(normal).normalize();
        let back = normal.cross(right);

        let origin = self.points[0];
        let points = self
            .points
            .iter()
            .map(|point| {
                let delta = point - origin;
                Vector2::new(delta.dot(right), delta.dot(back))
            })
            .collect();
        Polygon2D { points }
    }
}

/// An immutable, ordered sequence of at least 3 2D points.
#[derive(Debug, Clone)]
pub struct Polygon2D {
    points: Vec<Vector2<f32>>,
}

impl Polygon2D {
    /// Creates a 2D polygon from an ordered point sequence.
    ///
    /// # Errors
    /// [`GraphicsError::InvalidArgument`] if fewer than 3 points are given.
    pub fn new(points: Vec<Vector2<f32>>) -> Result<Self, GraphicsError> {
        if points.len() < 3 {
            return Err(GraphicsError::InvalidArgument {
                argument: "points",
                message: format!("a polygon needs at least 3 points, got {}", points.len()),
            });
        }
        Ok(Self { points })
    }

    /// The polygon's points in order.
    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    /// Signed area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f32 {
        let mut area = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            area += a.perp_dot(b);
        }
        area / 2.0
    }

    /// Minimum and maximum corner of the polygon's 2D extent.
    pub fn extent(&self) -> (Vector2<f32>, Vector2<f32>) {
        let mut min = Vector2::new(f32::MAX, f32::MAX);
        let mut max = Vector2::new(f32::MIN, f32::MIN);
        for point in &self.points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        (min, max)
    }

    /// Triangulates the polygon via ear clipping.
    ///
    /// # Errors
    /// [`GraphicsError::Triangulation`] on degenerate input; see
    /// [`triangulation::triangulate`].
    pub fn triangulate(&self) -> Result<Vec<u32>, GraphicsError> {
        triangulation::triangulate(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polygon_requires_three_points() {
        let result = Polygon::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        assert!(matches!(result, Err(GraphicsError::InvalidArgument { .. })));
    }

    #[test]
    fn normal_comes_from_first_three_vertices() {
        let polygon = Polygon::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(polygon.normal(), Vector3::unit_z(), epsilon = 1e-6);
    }

    #[test]
    fn flatten_preserves_shape_and_winding() {
        // Unit square standing in the XZ plane, facing -Y... normal from
        // the first three vertices is actually +Y or -Y depending on order;
        // either way lengths and area must survive the projection.
        let polygon = Polygon::new(vec![
            Vector3::new(2.0, 5.0, 2.0),
            Vector3::new(3.0, 5.0, 2.0),
            Vector3::new(3.0, 5.0, 3.0),
            Vector3::new(2.0, 5.0, 3.0),
        ])
        .unwrap();
        let flat = polygon.flatten();
        assert_eq!(flat.points()[0], Vector2::new(0.0, 0.0));
        assert_relative_eq!(flat.signed_area().abs(), 1.0, epsilon = 1e-5);

        let (min, max) = flat.extent();
        assert_relative_eq!((max - min).x, 1.0, epsilon = 1e-5);
        assert_relative_eq!((max - min).y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn flattened_polygon_triangulates() {
        let polygon = Polygon::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 2.0),
            Vector3::new(0.0, 0.0, 2.0),
        ])
        .unwrap();
        let indices = polygon.flatten().triangulate().unwrap();
        assert_eq!(indices.len(), 6);
    }
}
