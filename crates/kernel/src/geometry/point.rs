use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// A position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Marks "no position", e.g. the bounds of an empty polyhedron.
    pub const NAN: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
        z: f64::NAN,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        (*self - *other).length_squared()
    }

    /// Per-coordinate comparison: every component differs by at most `epsilon`.
    pub fn equals(&self, other: &Self, epsilon: f64) -> bool {
        self.abs_diff_eq(other, epsilon)
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn min(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl AbsDiffEq for Point3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl fmt::Display for Point3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub<Vec3> for Point3d {
    type Output = Point3d;
    fn sub(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point3d::new(1.0, 0.0, 0.0);
        let b = Point3d::new(4.0, 0.0, 0.0);
        assert!((a.distance_to(&b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_equals_is_per_coordinate() {
        let a = Point3d::new(1.0, 2.0, 3.0);
        let b = Point3d::new(1.05, 2.05, 2.95);
        assert!(a.equals(&b, 0.1));
        assert!(!a.equals(&b, 0.01));
        // Diagonal offset larger than epsilon in euclidean terms still matches.
        assert!(a.equals(&Point3d::new(1.1, 2.1, 3.1), 0.1 + 1e-12));
    }

    #[test]
    fn test_equals_with_zero_epsilon() {
        let a = Point3d::new(0.5, -0.25, 8.0);
        assert!(a.equals(&a, 0.0));
        assert!(!a.equals(&Point3d::new(0.5, -0.25, 8.0 + 1e-9), 0.0));
    }

    #[test]
    fn test_nan_never_equals() {
        assert!(Point3d::NAN.is_nan());
        assert!(!Point3d::NAN.equals(&Point3d::NAN, 1.0));
    }

    #[test]
    fn test_point_sub_gives_vector() {
        let a = Point3d::new(3.0, 4.0, 5.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        let v = a - b;
        assert!((v.x - 2.0).abs() < 1e-12);
        assert!((v.y - 3.0).abs() < 1e-12);
        assert!((v.z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_component_min_max() {
        let a = Point3d::new(1.0, 5.0, -2.0);
        let b = Point3d::new(3.0, -1.0, 0.0);
        assert_eq!(a.min(&b), Point3d::new(1.0, -1.0, -2.0));
        assert_eq!(a.max(&b), Point3d::new(3.0, 5.0, 0.0));
    }
}
