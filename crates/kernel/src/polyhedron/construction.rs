use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::geometry::{BoundingBox, Point3d};
use crate::topology::{EdgeId, VertexId};

use super::{Callback, NoopCallback, Polyhedron};

/// Boundary of each box face as indices into the corner array, counter-clockwise
/// seen from outside.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 4, 5, 1], // front  (y = min)
    [0, 1, 3, 2], // left   (x = min)
    [0, 2, 6, 4], // bottom (z = min)
    [1, 5, 7, 3], // top    (z = max)
    [2, 3, 7, 6], // back   (y = max)
    [4, 6, 7, 5], // right  (x = max)
];

impl Polyhedron {
    /// Convex hull of four points.
    pub fn from_four_points(p1: Point3d, p2: Point3d, p3: Point3d, p4: Point3d) -> Self {
        Self::from_four_points_with_callback(p1, p2, p3, p4, &mut NoopCallback)
    }

    pub fn from_four_points_with_callback(
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
        p4: Point3d,
        callback: &mut dyn Callback,
    ) -> Self {
        Self::from_points_with_callback([p1, p2, p3, p4], callback)
    }

    /// Convex hull of `points`, built by inserting them one at a time.
    pub fn from_points(points: impl IntoIterator<Item = Point3d>) -> Self {
        Self::from_points_with_callback(points, &mut NoopCallback)
    }

    pub fn from_points_with_callback(
        points: impl IntoIterator<Item = Point3d>,
        callback: &mut dyn Callback,
    ) -> Self {
        let mut polyhedron = Self::new();
        polyhedron.add_points(points, callback);
        polyhedron
    }

    /// The axis-aligned box `bounds`, or a single point if it has no extent.
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        Self::from_bounds_with_callback(bounds, &mut NoopCallback)
    }

    pub fn from_bounds_with_callback(bounds: &BoundingBox, callback: &mut dyn Callback) -> Self {
        let mut polyhedron = Self::new();
        polyhedron.set_bounds(bounds, callback);
        polyhedron
    }

    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point3d>, callback: &mut dyn Callback) {
        for point in points {
            self.add_point(point, callback);
        }
    }

    /// Replace the contents with the box `bounds`.
    ///
    /// The topology is wired directly instead of going through
    /// [`Polyhedron::add_point`]; the result is the same.
    #[instrument(skip(self, callback), fields(min = %bounds.min, max = %bounds.max))]
    pub fn set_bounds(&mut self, bounds: &BoundingBox, callback: &mut dyn Callback) {
        self.clear();
        if bounds.is_degenerate() {
            self.add_point(bounds.min, callback);
            return;
        }

        let (min, max) = (bounds.min, bounds.max);
        let corners = [
            Point3d::new(min.x, min.y, min.z),
            Point3d::new(min.x, min.y, max.z),
            Point3d::new(min.x, max.y, min.z),
            Point3d::new(min.x, max.y, max.z),
            Point3d::new(max.x, min.y, min.z),
            Point3d::new(max.x, min.y, max.z),
            Point3d::new(max.x, max.y, min.z),
            Point3d::new(max.x, max.y, max.z),
        ];
        let vertex_ids: Vec<VertexId> = corners.iter().map(|&p| self.add_vertex(p)).collect();

        let mut edges: HashMap<(usize, usize), EdgeId> = HashMap::new();
        let mut faces = Vec::with_capacity(BOX_FACES.len());
        for indices in &BOX_FACES {
            let half_edges: Vec<_> = indices
                .iter()
                .map(|&i| self.store.new_half_edge(vertex_ids[i]))
                .collect();
            faces.push(self.add_face(&half_edges));

            for (k, &half_edge) in half_edges.iter().enumerate() {
                let start = indices[k];
                let end = indices[(k + 1) % indices.len()];
                let key = (start.min(end), start.max(end));
                match edges.get(&key) {
                    Some(&edge) => self.store.set_second_half(edge, half_edge),
                    None => {
                        let edge = self.add_edge(half_edge, None);
                        edges.insert(key, edge);
                    }
                }
            }
        }
        debug_assert!(self.edges().all(|(_, e)| e.fully_specified()));

        self.update_bounds();
        for face in faces {
            callback.face_was_created(self, face);
        }
        info!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "built box polyhedron"
        );
        debug!(bounds = ?self.bounds(), "box bounds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::FaceId;

    #[derive(Default)]
    struct CountingCallback {
        created: Vec<FaceId>,
    }

    impl Callback for CountingCallback {
        fn face_was_created(&mut self, _polyhedron: &Polyhedron, face: FaceId) {
            self.created.push(face);
        }
    }

    #[test]
    fn test_box_counts() {
        let bounds = BoundingBox::new(Point3d::new(-1.0, -2.0, -3.0), Point3d::new(4.0, 5.0, 6.0));
        let p = Polyhedron::from_bounds(&bounds);
        assert_eq!(p.vertex_count(), 8);
        assert_eq!(p.edge_count(), 12);
        assert_eq!(p.face_count(), 6);
        assert!(p.is_closed());
        assert!(p.is_polyhedron());
        assert_eq!(p.bounds(), &bounds);
        assert!(p.faces().all(|(_, f)| f.boundary.len() == 4));
    }

    #[test]
    fn test_box_reports_created_faces() {
        let mut callback = CountingCallback::default();
        let bounds = BoundingBox::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        let p = Polyhedron::from_bounds_with_callback(&bounds, &mut callback);
        assert_eq!(callback.created, p.face_ids());
    }

    #[test]
    fn test_degenerate_box_is_a_point() {
        let corner = Point3d::new(3.0, 3.0, 3.0);
        let p = Polyhedron::from_bounds(&BoundingBox::around(corner));
        assert!(p.is_point());
        assert_eq!(p.edge_count(), 0);
        assert_eq!(p.face_count(), 0);
        assert_eq!(p.vertex_positions(), vec![corner]);
    }

    #[test]
    fn test_four_points_make_a_tetrahedron() {
        let p = Polyhedron::from_four_points(
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(0.0, 0.0, 1.0),
        );
        assert_eq!(p.vertex_count(), 4);
        assert_eq!(p.edge_count(), 6);
        assert_eq!(p.face_count(), 4);
        assert!(p.is_closed());
        assert!(p.check_invariant());
    }

    #[test]
    fn test_points_match_box() {
        let bounds = BoundingBox::new(Point3d::ORIGIN, Point3d::new(2.0, 2.0, 2.0));
        let from_box = Polyhedron::from_bounds(&bounds);
        let from_points = Polyhedron::from_points(from_box.vertex_positions());
        assert_eq!(from_points.vertex_count(), 8);
        assert_eq!(from_points.edge_count(), 12);
        assert_eq!(from_points.face_count(), 6);
        for (_, face) in from_box.faces() {
            let positions: Vec<_> = face
                .boundary
                .iter(&from_box.mesh().half_edges)
                .map(|(_, h)| from_box.mesh().position(h.origin))
                .collect();
            assert!(from_points.has_face(&positions, 0.0));
        }
    }
}
