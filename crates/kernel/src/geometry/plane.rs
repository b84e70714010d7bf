use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::ray::Ray;
use super::vector::Vec3;

/// Where a point lies relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointStatus {
    /// On the side the normal points to.
    Above,
    /// On the opposite side.
    Below,
    /// Within epsilon of the plane.
    Inside,
}

/// An oriented plane: all points `p` with `normal . p == distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along `normal`.
    pub distance: f64,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f64) -> Self {
        Self { normal, distance }
    }

    pub fn from_point_and_normal(point: &Point3d, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: normal.dot(&point.to_vec3()),
        }
    }

    /// Plane through three points with normal `(c - a) x (b - a)`.
    ///
    /// Returns `None` if the points are colinear.
    pub fn from_points(a: &Point3d, b: &Point3d, c: &Point3d) -> Option<Self> {
        let normal = (*c - *a).cross(&(*b - *a)).normalized()?;
        Some(Self {
            normal,
            distance: normal.dot(&a.to_vec3()),
        })
    }

    /// Signed distance of `point` from the plane, positive above.
    pub fn point_distance(&self, point: &Point3d) -> f64 {
        self.normal.dot(&point.to_vec3()) - self.distance
    }

    pub fn point_status(&self, point: &Point3d, epsilon: f64) -> PointStatus {
        let distance = self.point_distance(point);
        if distance > epsilon {
            PointStatus::Above
        } else if distance < -epsilon {
            PointStatus::Below
        } else {
            PointStatus::Inside
        }
    }

    /// Distance along `ray` to the plane, or `None` if the ray is parallel
    /// to the plane or points away from it.
    pub fn intersect_with_ray(&self, ray: &Ray) -> Option<f64> {
        let denom = self.normal.dot(&ray.direction);
        if denom.abs() < 1e-15 {
            return None;
        }
        let t = (self.distance - self.normal.dot(&ray.origin.to_vec3())) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Point where the segment `a`-`b` crosses the plane.
    pub fn intersect_with_segment(&self, a: &Point3d, b: &Point3d) -> Point3d {
        let da = self.point_distance(a);
        let db = self.point_distance(b);
        let t = da / (da - db);
        *a + (*b - *a) * t
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// The point on the plane closest to the origin.
    pub fn anchor(&self) -> Point3d {
        Point3d::ORIGIN + self.normal * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_points_normal_follows_winding() {
        // Passing (b, a, c) for a counter-clockwise triangle yields the normal it faces.
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        let c = Point3d::new(0.0, 1.0, 0.0);
        let plane = Plane::from_points(&b, &a, &c).unwrap();
        assert_abs_diff_eq!(plane.normal, Vec3::Z, epsilon = 1e-12);
        assert!(plane.distance.abs() < 1e-12);
    }

    #[test]
    fn test_from_colinear_points() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        let c = Point3d::new(2.0, 2.0, 2.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
    }

    #[test]
    fn test_point_status() {
        let plane = Plane::from_point_and_normal(&Point3d::new(0.0, 0.0, 2.0), Vec3::Z);
        assert_eq!(plane.point_status(&Point3d::new(5.0, 5.0, 3.0), 1e-6), PointStatus::Above);
        assert_eq!(plane.point_status(&Point3d::new(5.0, 5.0, 1.0), 1e-6), PointStatus::Below);
        assert_eq!(plane.point_status(&Point3d::new(5.0, 5.0, 2.0 + 1e-9), 1e-6), PointStatus::Inside);
        assert_eq!(plane.flipped().point_status(&Point3d::new(0.0, 0.0, 3.0), 1e-6), PointStatus::Below);
    }

    #[test]
    fn test_intersect_with_ray() {
        let plane = Plane::from_point_and_normal(&Point3d::new(0.0, 0.0, 2.0), Vec3::Z);
        let ray = Ray::new(Point3d::ORIGIN, Vec3::Z);
        assert!((plane.intersect_with_ray(&ray).unwrap() - 2.0).abs() < 1e-12);

        let away = Ray::new(Point3d::ORIGIN, -Vec3::Z);
        assert!(plane.intersect_with_ray(&away).is_none());

        let parallel = Ray::new(Point3d::ORIGIN, Vec3::X);
        assert!(plane.intersect_with_ray(&parallel).is_none());
    }

    #[test]
    fn test_intersect_with_segment() {
        let plane = Plane::from_point_and_normal(&Point3d::new(0.0, 0.0, 1.0), Vec3::Z);
        let p = plane.intersect_with_segment(&Point3d::new(2.0, 0.0, 0.0), &Point3d::new(2.0, 4.0, 4.0));
        assert_abs_diff_eq!(p, Point3d::new(2.0, 1.0, 1.0), epsilon = 1e-12);
    }
}
