use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Axis-aligned bounding box.
///
/// A box whose corners are NaN has no extent; this is what an empty
/// polyhedron reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub const fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub const fn nan() -> Self {
        Self {
            min: Point3d::NAN,
            max: Point3d::NAN,
        }
    }

    /// Box around a single point.
    pub const fn around(point: Point3d) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Box around all `points`, or the NaN box if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::nan();
        };
        let mut bb = Self::around(*first);
        for p in points {
            bb.merge_with(p);
        }
        bb
    }

    pub fn merge_with(&mut self, p: &Point3d) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_nan(&self) -> bool {
        self.min.is_nan() || self.max.is_nan()
    }

    /// True if the box collapses to a single point.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Point3d {
        self.min + self.size() * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let bb = BoundingBox::from_points(&[
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 2.0, 3.0),
            Point3d::new(-1.0, 0.5, 1.0),
        ]);
        assert!((bb.min.x - (-1.0)).abs() < 1e-12);
        assert!((bb.max.y - 2.0).abs() < 1e-12);
        assert!((bb.max.z - 3.0).abs() < 1e-12);
        assert!(bb.contains_point(&Point3d::new(0.0, 1.0, 2.0)));
        assert!(!bb.contains_point(&Point3d::new(0.0, 3.0, 2.0)));
    }

    #[test]
    fn test_empty_point_set_gives_nan_box() {
        let bb = BoundingBox::from_points(&[]);
        assert!(bb.is_nan());
        assert!(!bb.contains_point(&Point3d::ORIGIN));
    }

    #[test]
    fn test_degenerate_box() {
        let p = Point3d::new(4.0, 4.0, 4.0);
        assert!(BoundingBox::around(p).is_degenerate());
        assert!(!BoundingBox::new(Point3d::ORIGIN, p).is_degenerate());
        assert_eq!(BoundingBox::new(Point3d::ORIGIN, p).center(), Point3d::new(2.0, 2.0, 2.0));
    }
}
