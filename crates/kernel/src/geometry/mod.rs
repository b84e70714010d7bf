pub mod bbox;
pub mod plane;
pub mod point;
pub mod ray;
pub mod vector;

pub use bbox::BoundingBox;
pub use plane::{Plane, PointStatus};
pub use point::Point3d;
pub use ray::{Ray, Side};
pub use vector::Vec3;

/// True if `c` lies within `epsilon` of the line through `a` and `b`.
///
/// Coincident `a` and `b` are treated as colinear with anything.
pub fn colinear(a: &Point3d, b: &Point3d, c: &Point3d, epsilon: f64) -> bool {
    let ab = *b - *a;
    let length = ab.length();
    if length < 1e-15 {
        return true;
    }
    ab.cross(&(*c - *a)).length() / length <= epsilon
}

/// Parameter of the projection of `c` onto the line `a + t * (b - a)`.
pub fn line_parameter(a: &Point3d, b: &Point3d, c: &Point3d) -> f64 {
    let ab = *b - *a;
    (*c - *a).dot(&ab) / ab.length_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colinear() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(2.0, 2.0, 0.0);
        assert!(colinear(&a, &b, &Point3d::new(5.0, 5.0, 0.0), 1e-9));
        assert!(colinear(&a, &b, &Point3d::new(-1.0, -1.0, 0.0), 1e-9));
        assert!(!colinear(&a, &b, &Point3d::new(1.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn test_line_parameter() {
        let a = Point3d::new(1.0, 0.0, 0.0);
        let b = Point3d::new(3.0, 0.0, 0.0);
        assert!((line_parameter(&a, &b, &Point3d::new(2.0, 7.0, 0.0)) - 0.5).abs() < 1e-12);
        assert!(line_parameter(&a, &b, &Point3d::new(0.0, 0.0, 0.0)) < 0.0);
        assert!(line_parameter(&a, &b, &Point3d::new(5.0, 0.0, 0.0)) > 1.0);
    }
}
