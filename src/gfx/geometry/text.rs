//! # Text Outline Geometry
//!
//! Turns glyph outlines into filled, triangulated geometry. The outlines
//! themselves come from an external text-shaping collaborator that walks a
//! font's glyph paths and reports line/curve segments; this module only
//! flattens those segments into polygons and fills them.
//!
//! A glyph that fails to triangulate (degenerate or self-intersecting
//! outline) is logged and skipped: text construction failures are non-fatal
//! to the rest of a build.

use cgmath::{InnerSpace, Vector2, Vector3};
use log::warn;

use super::{triangulation, BuiltVerticesRange, SurfaceBuilder, Vertex};

/// One segment of a glyph outline, continuing from the previous end point.
#[derive(Debug, Clone, Copy)]
pub enum PathSegment {
    /// Straight line to the given point.
    Line(Vector2<f32>),
    /// Quadratic bezier curve.
    Quadratic {
        /// Control point.
        control: Vector2<f32>,
        /// End point.
        to: Vector2<f32>,
    },
    /// Cubic bezier curve.
    Cubic {
        /// First control point.
        control1: Vector2<f32>,
        /// Second control point.
        control2: Vector2<f32>,
        /// End point.
        to: Vector2<f32>,
    },
}

/// A closed glyph outline as reported by the text-shaping collaborator.
///
/// The path is implicitly closed from the last segment's end point back to
/// `start`.
#[derive(Debug, Clone)]
pub struct GlyphPath {
    /// First point of the outline.
    pub start: Vector2<f32>,
    /// Outline segments in drawing order.
    pub segments: Vec<PathSegment>,
}

impl GlyphPath {
    /// Flattens the outline into a polyline, subdividing each curve into
    /// `steps_per_curve` straight segments. A closing point that lands on
    /// the start point is dropped so the result is directly usable as a
    /// polygon.
    pub fn flatten(&self, steps_per_curve: u32) -> Vec<Vector2<f32>> {
        let steps = steps_per_curve.max(1);
        let mut points = vec![self.start];
        let mut current = self.start;

        for segment in &self.segments {
            match *segment {
                PathSegment::Line(to) => {
                    points.push(to);
                    current = to;
                }
                PathSegment::Quadratic { control, to } => {
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        points.push(quadratic_point(current, control, to, t));
                    }
                    current = to;
                }
                PathSegment::Cubic {
                    control1,
                    control2,
                    to,
                } => {
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        points.push(cubic_point(current, control1, control2, to, t));
                    }
                    current = to;
                }
            }
        }

        if points.len() > 1 {
            let closing = points[points.len() - 1] - points[0];
            if closing.magnitude2() < 1e-12 {
                points.pop();
            }
        }
        points
    }
}

fn quadratic_point(
    from: Vector2<f32>,
    control: Vector2<f32>,
    to: Vector2<f32>,
    t: f32,
) -> Vector2<f32> {
    let u = 1.0 - t;
    from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

fn cubic_point(
    from: Vector2<f32>,
    control1: Vector2<f32>,
    control2: Vector2<f32>,
    to: Vector2<f32>,
    t: f32,
) -> Vector2<f32> {
    let u = 1.0 - t;
    from * (u * u * u)
        + control1 * (3.0 * u * u * t)
        + control2 * (3.0 * u * t * t)
        + to * (t * t * t)
}

/// Options for building text outline geometry.
#[derive(Debug, Clone, Copy)]
pub struct TextGeometryOptions {
    /// Straight segments each bezier curve is subdivided into.
    pub flatten_steps: u32,
}

impl Default for TextGeometryOptions {
    fn default() -> Self {
        Self { flatten_steps: 8 }
    }
}

impl SurfaceBuilder<'_> {
    /// Builds filled glyph outlines in the XY plane (facing +Z).
    ///
    /// Each glyph is flattened and triangulated independently; UVs stretch
    /// over the glyph's own bounds. Glyphs whose outline cannot be
    /// triangulated are reported through the logging channel and skipped,
    /// so a single broken glyph never aborts the surrounding build.
    pub fn build_text_outlines(
        &mut self,
        glyphs: &[GlyphPath],
        options: &TextGeometryOptions,
    ) -> BuiltVerticesRange {
        let mut range = BuiltVerticesRange::empty(self.pool_vertex_count());

        for (glyph_index, glyph) in glyphs.iter().enumerate() {
            let points = glyph.flatten(options.flatten_steps);
            let indices = match triangulation::triangulate(&points) {
                Ok(indices) => indices,
                Err(error) => {
                    warn!("skipping glyph outline {glyph_index}: {error}");
                    continue;
                }
            };

            let mut min = Vector2::new(f32::MAX, f32::MAX);
            let mut max = Vector2::new(f32::MIN, f32::MIN);
            for point in &points {
                min.x = min.x.min(point.x);
                min.y = min.y.min(point.y);
                max.x = max.x.max(point.x);
                max.y = max.y.max(point.y);
            }
            let size = max - min;

            let start = self.pool_vertex_count();
            for point in &points {
                let uv = Vector2::new(
                    if size.x > 0.0 { (point.x - min.x) / size.x } else { 0.0 },
                    if size.y > 0.0 { (point.y - min.y) / size.y } else { 0.0 },
                );
                self.add_vertex(
                    Vertex::new(Vector3::new(point.x, point.y, 0.0))
                        .with_normal(Vector3::unit_z())
                        .with_tex_coord(uv),
                );
            }
            for triangle in indices.chunks_exact(3) {
                self.add_triangle_corners(
                    start + triangle[0],
                    start + triangle[1],
                    start + triangle[2],
                );
            }
            range.merge(BuiltVerticesRange::new(start, points.len() as u32));
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Geometry;
    use approx::assert_relative_eq;

    fn square_glyph() -> GlyphPath {
        GlyphPath {
            start: Vector2::new(0.0, 0.0),
            segments: vec![
                PathSegment::Line(Vector2::new(1.0, 0.0)),
                PathSegment::Line(Vector2::new(1.0, 1.0)),
                PathSegment::Line(Vector2::new(0.0, 1.0)),
                PathSegment::Line(Vector2::new(0.0, 0.0)),
            ],
        }
    }

    #[test]
    fn flatten_drops_the_closing_point() {
        let points = square_glyph().flatten(8);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn flatten_subdivides_curves() {
        let path = GlyphPath {
            start: Vector2::new(0.0, 0.0),
            segments: vec![
                PathSegment::Quadratic {
                    control: Vector2::new(0.5, 1.0),
                    to: Vector2::new(1.0, 0.0),
                },
                PathSegment::Line(Vector2::new(0.5, -1.0)),
            ],
        };
        let points = path.flatten(4);
        // start + 4 curve samples + 1 line point.
        assert_eq!(points.len(), 6);

        // The curve midpoint sits halfway up towards the control point.
        assert_relative_eq!(points[2].x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(points[2].y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn text_outlines_are_filled_per_glyph() {
        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        let glyphs = vec![square_glyph(), square_glyph()];

        let range = geometry
            .surface_builder(surface)
            .build_text_outlines(&glyphs, &TextGeometryOptions::default());

        assert_eq!(range.count, 8);
        assert_eq!(geometry.surface(surface).triangle_count(), 4);
        for vertex in geometry.vertices() {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn broken_glyphs_are_skipped_not_fatal() {
        // Second glyph is collinear and cannot be triangulated.
        let broken = GlyphPath {
            start: Vector2::new(0.0, 0.0),
            segments: vec![
                PathSegment::Line(Vector2::new(1.0, 0.0)),
                PathSegment::Line(Vector2::new(2.0, 0.0)),
                PathSegment::Line(Vector2::new(3.0, 0.0)),
            ],
        };
        let glyphs = vec![square_glyph(), broken, square_glyph()];

        let mut geometry = Geometry::new();
        let surface = geometry.create_surface_default();
        let range = geometry
            .surface_builder(surface)
            .build_text_outlines(&glyphs, &TextGeometryOptions::default());

        assert_eq!(range.count, 8);
        assert_eq!(geometry.surface(surface).triangle_count(), 4);
        assert_eq!(geometry.surface(surface).corner_count() % 3, 0);
    }
}
