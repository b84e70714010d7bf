use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Which side of a face a ray may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Only faces whose normal opposes the ray direction.
    Front,
    /// Only faces whose normal agrees with the ray direction.
    Back,
    Both,
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3d,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// # Panics
    ///
    /// Panics if `direction` has zero length.
    pub fn new(origin: Point3d, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, distance: f64) -> Point3d {
        self.origin + self.direction * distance
    }
}
