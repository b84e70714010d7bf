use crate::geometry::{Point3d, PointStatus, Ray, Side};
use crate::topology::{EdgeId, FaceId, VertexId};

use super::Polyhedron;

/// Result of [`Polyhedron::pick_face`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub face: Option<FaceId>,
    /// Distance along the ray, NaN when nothing was hit.
    pub distance: f64,
}

impl FaceHit {
    pub fn none() -> Self {
        Self {
            face: None,
            distance: f64::NAN,
        }
    }

    pub fn is_match(&self) -> bool {
        self.face.is_some()
    }
}

impl Polyhedron {
    pub fn has_vertex(&self, position: &Point3d, epsilon: f64) -> bool {
        self.find_vertex_by_position(position, epsilon).is_some()
    }

    /// True if every position in `positions` is a vertex.
    pub fn has_vertices(&self, positions: &[Point3d], epsilon: f64) -> bool {
        positions.iter().all(|p| self.has_vertex(p, epsilon))
    }

    pub fn find_vertex_by_position(&self, position: &Point3d, epsilon: f64) -> Option<VertexId> {
        self.vertices()
            .find(|(_, v)| v.position.equals(position, epsilon))
            .map(|(id, _)| id)
    }

    pub fn has_edge(&self, p1: &Point3d, p2: &Point3d, epsilon: f64) -> bool {
        self.find_edge_by_positions(p1, p2, epsilon).is_some()
    }

    /// The edge between `p1` and `p2`, in either direction.
    pub fn find_edge_by_positions(&self, p1: &Point3d, p2: &Point3d, epsilon: f64) -> Option<EdgeId> {
        self.edge_ids().into_iter().find(|&edge| {
            let (a, b) = self.edge_positions(edge);
            (a.equals(p1, epsilon) && b.equals(p2, epsilon)) || (a.equals(p2, epsilon) && b.equals(p1, epsilon))
        })
    }

    pub fn has_face(&self, positions: &[Point3d], epsilon: f64) -> bool {
        self.find_face_by_positions(positions, epsilon).is_some()
    }

    /// The face whose boundary visits `positions` in this cyclic order.
    pub fn find_face_by_positions(&self, positions: &[Point3d], epsilon: f64) -> Option<FaceId> {
        self.face_ids()
            .into_iter()
            .find(|&face| self.face_has_vertex_positions(face, positions, epsilon))
    }

    /// The first face in face order that `ray` hits.
    ///
    /// A lone polygon can be hit from both sides; faces of a polyhedron only
    /// from the front.
    pub fn pick_face(&self, ray: &Ray) -> FaceHit {
        let side = if self.is_polygon() { Side::Both } else { Side::Front };
        for (face, _) in self.faces() {
            if let Some(distance) = self.intersect_face_with_ray(face, ray, side) {
                return FaceHit {
                    face: Some(face),
                    distance,
                };
            }
        }
        FaceHit::none()
    }

    /// True if `point` is inside or on the boundary of a closed polyhedron.
    pub fn contains(&self, point: &Point3d) -> bool {
        self.is_polyhedron()
            && self
                .faces()
                .all(|(face, _)| self.face_point_status(face, point) != Some(PointStatus::Above))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, Vec3};

    fn unit_cube() -> Polyhedron {
        Polyhedron::from_bounds(&BoundingBox::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn test_find_vertex_and_edge() {
        let cube = unit_cube();
        let corner = Point3d::new(1.0, 1.0, 1.0);
        assert!(cube.find_vertex_by_position(&corner, 0.0).is_some());
        assert!(cube.find_vertex_by_position(&Point3d::new(2.0, 2.0, 2.0), 0.0).is_none());
        assert!(cube.has_vertex(&Point3d::new(1.0 + 1e-9, 1.0, 1.0), 1e-6));

        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        assert_eq!(cube.find_edge_by_positions(&a, &b, 0.0), cube.find_edge_by_positions(&b, &a, 0.0));
        assert!(cube.has_edge(&a, &b, 0.0));
        // Face diagonal.
        assert!(!cube.has_edge(&a, &Point3d::new(1.0, 1.0, 0.0), 0.0));
    }

    #[test]
    fn test_has_face_respects_winding() {
        let cube = unit_cube();
        let bottom = [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
        ];
        assert!(cube.has_face(&bottom, 0.0));
        let mut reversed = bottom;
        reversed.reverse();
        assert!(!cube.has_face(&reversed, 0.0));
    }

    #[test]
    fn test_pick_face_from_outside() {
        let cube = unit_cube();
        let ray = Ray::new(Point3d::new(0.5, 0.5, 5.0), -Vec3::Z);
        let hit = cube.pick_face(&ray);
        assert!(hit.is_match());
        assert!((hit.distance - 4.0).abs() < 1e-9);
        let face = hit.face.unwrap();
        assert!(cube.face_vertex_positions(face).iter().all(|p| p.z == 1.0));
    }

    #[test]
    fn test_pick_face_misses() {
        let cube = unit_cube();
        let ray = Ray::new(Point3d::new(3.0, 3.0, 5.0), -Vec3::Z);
        let hit = cube.pick_face(&ray);
        assert!(!hit.is_match());
        assert!(hit.distance.is_nan());
    }

    #[test]
    fn test_pick_face_from_inside_sees_only_back_faces() {
        let cube = unit_cube();
        let ray = Ray::new(Point3d::new(0.5, 0.5, 0.5), Vec3::new(0.3, 0.2, 1.0));
        assert!(!cube.pick_face(&ray).is_match());
    }

    #[test]
    fn test_pick_polygon_from_both_sides() {
        let square = Polyhedron::from_points([
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        assert!(square.is_polygon());
        let above = Ray::new(Point3d::new(0.5, 0.5, 2.0), -Vec3::Z);
        let below = Ray::new(Point3d::new(0.5, 0.5, -2.0), Vec3::Z);
        for ray in [above, below] {
            let hit = square.pick_face(&ray);
            assert!(hit.is_match());
            assert!((hit.distance - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_contains() {
        let cube = unit_cube();
        assert!(cube.contains(&Point3d::new(0.5, 0.5, 0.5)));
        assert!(cube.contains(&Point3d::new(1.0, 0.5, 0.5)));
        assert!(!cube.contains(&Point3d::new(1.5, 0.5, 0.5)));

        let square = Polyhedron::from_points([
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        assert!(!square.contains(&Point3d::new(0.1, 0.1, 0.0)));
    }
}
