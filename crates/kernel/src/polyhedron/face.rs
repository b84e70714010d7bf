use crate::geometry::{Plane, Point3d, PointStatus, Ray, Side, Vec3};
use crate::topology::{EdgeId, FaceId, VertexId};

use super::Polyhedron;

impl Polyhedron {
    pub fn face_vertices(&self, face: FaceId) -> Vec<VertexId> {
        self.store.boundary_vertices(face)
    }

    /// Boundary vertex positions in ring order.
    pub fn face_vertex_positions(&self, face: FaceId) -> Vec<Point3d> {
        self.store.faces[face]
            .boundary
            .iter(&self.store.half_edges)
            .map(|(_, h)| self.store.position(h.origin))
            .collect()
    }

    pub fn edge_positions(&self, edge: EdgeId) -> (Point3d, Point3d) {
        let (a, b) = self.store.edge_vertices(edge);
        (self.store.position(a), self.store.position(b))
    }

    /// Plane of `face` using Newell's method over the whole boundary.
    ///
    /// Unlike [`super::Callback::plane`] this tolerates colinear leading
    /// vertices. Returns `None` if the boundary encloses no area.
    pub fn face_plane(&self, face: FaceId) -> Option<Plane> {
        let positions = self.face_vertex_positions(face);
        if positions.len() < 3 {
            return None;
        }
        let mut normal = Vec3::ZERO;
        let mut centroid = Vec3::ZERO;
        for (i, p) in positions.iter().enumerate() {
            let q = positions[(i + 1) % positions.len()];
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
            centroid = centroid + p.to_vec3();
        }
        let normal = normal.normalized()?;
        let centroid = centroid / positions.len() as f64;
        Some(Plane::new(normal, normal.dot(&centroid)))
    }

    pub fn face_point_status(&self, face: FaceId, point: &Point3d) -> Option<PointStatus> {
        self.face_plane(face)
            .map(|plane| plane.point_status(point, self.tolerance().point_status))
    }

    /// Distance along `ray` to where it hits `face`, restricted to `side`.
    pub fn intersect_face_with_ray(&self, face: FaceId, ray: &Ray, side: Side) -> Option<f64> {
        let plane = self.face_plane(face)?;
        let cos = plane.normal.dot(&ray.direction);
        let admitted = match side {
            Side::Front => cos < 0.0,
            Side::Back => cos > 0.0,
            Side::Both => cos != 0.0,
        };
        if !admitted {
            return None;
        }
        let distance = plane.intersect_with_ray(ray)?;
        let hit = ray.point_at(distance);
        self.polygon_contains(face, &plane, &hit)
            .then_some(distance)
    }

    /// Point-in-convex-polygon test for a point already on the face plane.
    pub(super) fn polygon_contains(&self, face: FaceId, plane: &Plane, point: &Point3d) -> bool {
        let positions = self.face_vertex_positions(face);
        let epsilon = self.tolerance().point_status;
        positions.iter().enumerate().all(|(i, a)| {
            let b = positions[(i + 1) % positions.len()];
            let edge = b - *a;
            let Some(inward) = plane.normal.cross(&edge).normalized() else {
                return true;
            };
            inward.dot(&(*point - *a)) >= -epsilon
        })
    }

    /// True if every vertex of `a` lies on the plane of `b` and both face the
    /// same way.
    pub fn faces_coplanar(&self, a: FaceId, b: FaceId) -> bool {
        let (Some(plane_a), Some(plane_b)) = (self.face_plane(a), self.face_plane(b)) else {
            return false;
        };
        if plane_a.normal.dot(&plane_b.normal) <= 0.0 {
            return false;
        }
        let epsilon = self.tolerance().point_status;
        self.face_vertex_positions(a)
            .iter()
            .all(|p| plane_b.point_status(p, epsilon) == PointStatus::Inside)
    }

    /// True if the boundary of `face` visits `positions` in the same cyclic
    /// order, starting anywhere.
    pub fn face_has_vertex_positions(&self, face: FaceId, positions: &[Point3d], epsilon: f64) -> bool {
        let own = self.face_vertex_positions(face);
        if own.len() != positions.len() {
            return false;
        }
        if own.is_empty() {
            return true;
        }
        (0..own.len()).any(|offset| {
            positions
                .iter()
                .enumerate()
                .all(|(i, p)| own[(i + offset) % own.len()].equals(p, epsilon))
        })
    }
}
