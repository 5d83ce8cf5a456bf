//! # Ear-Clipping Triangulation
//!
//! Triangulates simple 2D polygons by iteratively clipping "ear" vertices:
//! convex vertices whose triangle with their two neighbours contains no other
//! polygon vertex. O(n²) over the vertex count, which is fine for the polygon
//! sizes produced by shape builders and glyph outlines.

use cgmath::Vector2;

use crate::gfx::error::GraphicsError;

/// Tolerance for the cross-product sign tests.
const SIGN_EPSILON: f32 = 1e-10;

/// Triangulates a simple polygon into a flat, triple-grouped index list.
///
/// Input winding does not matter; the working list is put into
/// counter-clockwise order before clipping, and emitted triangles are
/// counter-clockwise in the input coordinate space.
///
/// # Errors
///
/// - [`GraphicsError::InvalidArgument`] if fewer than 3 points are given.
/// - [`GraphicsError::Triangulation`] if the polygon is degenerate or
///   self-intersecting and the iteration budget (`2 * point count`) is
///   exhausted before the working list is reduced. No partial result is
///   returned in that case.
pub fn triangulate(points: &[Vector2<f32>]) -> Result<Vec<u32>, GraphicsError> {
    if points.len() < 3 {
        return Err(GraphicsError::InvalidArgument {
            argument: "points",
            message: format!("a polygon needs at least 3 points, got {}", points.len()),
        });
    }

    let count = points.len();
    let mut working: Vec<u32> = if signed_area(points) >= 0.0 {
        (0..count as u32).collect()
    } else {
        (0..count as u32).rev().collect()
    };

    let mut triangles = Vec::with_capacity((count - 2) * 3);
    let mut budget = 2 * count;
    while working.len() > 2 && budget > 0 {
        budget -= 1;

        let len = working.len();
        let mut clipped = false;
        for i in 0..len {
            let u = working[(i + len - 1) % len];
            let v = working[i];
            let w = working[(i + 1) % len];
            if is_ear(points, &working, u, v, w) {
                triangles.extend_from_slice(&[u, v, w]);
                working.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            break;
        }
    }

    if working.len() > 2 {
        return Err(GraphicsError::Triangulation(format!(
            "no ear found with {} of {} vertices remaining",
            working.len(),
            count
        )));
    }

    Ok(triangles)
}

/// Signed area of the polygon; positive for counter-clockwise winding.
fn signed_area(points: &[Vector2<f32>]) -> f32 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += a.perp_dot(b);
    }
    area / 2.0
}

/// Tests whether `v` is a clippable ear between its neighbours `u` and `w`.
fn is_ear(points: &[Vector2<f32>], working: &[u32], u: u32, v: u32, w: u32) -> bool {
    let pu = points[u as usize];
    let pv = points[v as usize];
    let pw = points[w as usize];

    // The corner must be strictly convex in the counter-clockwise working
    // order; collinear corners are never ears.
    if (pv - pu).perp_dot(pw - pv) <= SIGN_EPSILON {
        return false;
    }

    // No other remaining vertex may lie inside (or on the edge of) the
    // candidate triangle.
    for &other in working {
        if other == u || other == v || other == w {
            continue;
        }
        if point_in_triangle(points[other as usize], pu, pv, pw) {
            return false;
        }
    }
    true
}

/// Same-side sign test against the counter-clockwise triangle (a, b, c).
/// Points on an edge count as inside.
fn point_in_triangle(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> bool {
    (b - a).perp_dot(p - a) >= -SIGN_EPSILON
        && (c - b).perp_dot(p - b) >= -SIGN_EPSILON
        && (a - c).perp_dot(p - c) >= -SIGN_EPSILON
}
