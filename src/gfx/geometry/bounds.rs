//! # Axis-Aligned Bounding Boxes
//!
//! Bounding volumes for built geometry and consolidated meshes. Boxes are
//! always computed on demand from current vertex positions; nothing here is
//! cached or incrementally invalidated.

use cgmath::Vector3;

/// An axis-aligned bounding box.
///
/// An empty box contains no points and is the identity element of
/// [`BoundingBox::merge`]. Growing a box never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner, componentwise.
    pub min: Vector3<f32>,
    /// Maximum corner, componentwise.
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// Creates an empty box (min > max on every axis).
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Computes the box enclosing the given points.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut bounds = Self::empty();
        for point in points {
            bounds.expand_by_point(point);
        }
        bounds
    }

    /// True if no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the box to contain `point`.
    pub fn expand_by_point(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grows the box to contain `other`.
    pub fn merge(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.expand_by_point(other.min);
        self.expand_by_point(other.max);
    }

    /// Extent of the box on each axis; zero for an empty box.
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            Vector3::new(0.0, 0.0, 0.0)
        } else {
            self.max - self.min
        }
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vector3<f32> {
        self.min + self.size() / 2.0
    }

    /// True if the point lies inside or on the boundary of the box.
    pub fn contains(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_contains_nothing() {
        let bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        assert!(!bounds.contains(Vector3::new(0.0, 0.0, 0.0)));
        assert_eq!(bounds.size(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn from_points_encloses_all() {
        let bounds = BoundingBox::from_points(vec![
            Vector3::new(-1.0, 2.0, 0.5),
            Vector3::new(3.0, -4.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ]);
        assert_eq!(bounds.min, Vector3::new(-1.0, -4.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(3.0, 2.0, 2.0));
        assert!(bounds.contains(Vector3::new(0.0, 0.0, 1.0)));
        assert!(!bounds.contains(Vector3::new(0.0, 3.0, 1.0)));
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut bounds = BoundingBox::from_points(vec![Vector3::new(1.0, 1.0, 1.0)]);
        let before = bounds;
        bounds.merge(&BoundingBox::empty());
        assert_eq!(bounds, before);
    }
}
