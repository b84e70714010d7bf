//! Deep copies of a polyhedron through original-to-copy correspondence maps.

use slotmap::SecondaryMap;
use tracing::{debug, instrument};

use crate::topology::{HalfEdgeId, VertexId};

use super::Polyhedron;

/// Copies the mesh of `original` into a fresh polyhedron.
///
/// Vertices are copied in ring order first so that shapes without faces
/// survive; face boundaries are then copied half-edge by half-edge and the
/// edges are rebuilt from the half-edge map.
struct PolyhedronCopy<'a> {
    original: &'a Polyhedron,
    vertex_map: SecondaryMap<VertexId, VertexId>,
    half_edge_map: SecondaryMap<HalfEdgeId, HalfEdgeId>,
    copy: Polyhedron,
}

impl<'a> PolyhedronCopy<'a> {
    fn new(original: &'a Polyhedron) -> Self {
        Self {
            original,
            vertex_map: SecondaryMap::new(),
            half_edge_map: SecondaryMap::new(),
            copy: Polyhedron::with_tolerance(*original.tolerance()),
        }
    }

    fn run(mut self) -> Polyhedron {
        let original = self.original;
        for (vertex, _) in original.vertices() {
            self.copy_vertex(vertex);
        }
        for (_, face) in original.faces() {
            let boundary: Vec<HalfEdgeId> = face
                .boundary
                .iter(&original.store.half_edges)
                .map(|(half_edge, _)| self.copy_half_edge(half_edge))
                .collect();
            self.copy.add_face(&boundary);
        }
        for (_, edge) in original.edges() {
            let first = self.find_half_edge(edge.first);
            let second = edge.second.map(|h| self.find_half_edge(h));
            self.copy.add_edge(first, second);
        }
        self.copy.update_bounds();
        self.copy
    }

    /// Find or insert the copy of `vertex`.
    fn copy_vertex(&mut self, vertex: VertexId) -> VertexId {
        if let Some(&copy) = self.vertex_map.get(vertex) {
            return copy;
        }
        let copy = self.copy.add_vertex(self.original.store.position(vertex));
        self.vertex_map.insert(vertex, copy);
        copy
    }

    fn copy_half_edge(&mut self, half_edge: HalfEdgeId) -> HalfEdgeId {
        let origin = self.copy_vertex(self.original.store.origin(half_edge));
        let copy = self.copy.store.new_half_edge(origin);
        self.half_edge_map.insert(half_edge, copy);
        copy
    }

    /// The copy of a half-edge referenced by an edge.
    ///
    /// Half-edges of an edge-shaped polyhedron have no face and are copied
    /// here on demand.
    ///
    /// # Panics
    ///
    /// Panics if a half-edge that belongs to a face was not copied with its
    /// face, which means the original topology is corrupt.
    fn find_half_edge(&mut self, half_edge: HalfEdgeId) -> HalfEdgeId {
        if let Some(&copy) = self.half_edge_map.get(half_edge) {
            return copy;
        }
        assert!(
            self.original.store.half_edges[half_edge].face.is_none(),
            "half-edge {half_edge:?} of a face was not copied"
        );
        self.copy_half_edge(half_edge)
    }
}

impl Polyhedron {
    /// Replace the contents of `destination` with a deep copy of `self`.
    #[instrument(skip_all)]
    pub fn copy_into(&self, destination: &mut Polyhedron) {
        let mut copy = PolyhedronCopy::new(self).run();
        std::mem::swap(destination, &mut copy);
        debug!(
            vertices = destination.vertex_count(),
            edges = destination.edge_count(),
            faces = destination.face_count(),
            "copied polyhedron"
        );
    }
}

impl Clone for Polyhedron {
    fn clone(&self) -> Self {
        PolyhedronCopy::new(self).run()
    }

    fn clone_from(&mut self, source: &Self) {
        source.copy_into(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, Point3d};
    use crate::topology::FaceId;

    fn unit_cube() -> Polyhedron {
        Polyhedron::from_bounds(&BoundingBox::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)))
    }

    fn face_cycles(p: &Polyhedron) -> Vec<Vec<Point3d>> {
        p.face_ids()
            .into_iter()
            .map(|f: FaceId| p.face_vertex_positions(f))
            .collect()
    }

    #[test]
    fn test_clone_preserves_counts_and_bounds() {
        let cube = unit_cube();
        let copy = cube.clone();
        assert_eq!(copy.vertex_count(), 8);
        assert_eq!(copy.edge_count(), 12);
        assert_eq!(copy.face_count(), 6);
        assert_eq!(copy.bounds(), cube.bounds());
        assert_eq!(face_cycles(&copy), face_cycles(&cube));
        assert_eq!(copy.vertex_positions(), cube.vertex_positions());
        assert!(copy.check_invariant());
        assert!(copy.edges().all(|(_, e)| e.fully_specified()));
    }

    #[test]
    fn test_copy_is_independent() {
        let cube = unit_cube();
        let mut copy = cube.clone();
        copy.add_point(Point3d::new(0.5, 0.5, 3.0), &mut crate::NoopCallback);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(copy.vertex_count(), 9);
        assert_eq!(cube.bounds().max.z, 1.0);
    }

    #[test]
    fn test_copy_degenerate_shapes() {
        let point = Polyhedron::from_points([Point3d::new(1.0, 2.0, 3.0)]);
        let copy = point.clone();
        assert!(copy.is_point());
        assert_eq!(copy.vertex_positions(), vec![Point3d::new(1.0, 2.0, 3.0)]);

        let edge = Polyhedron::from_points([Point3d::ORIGIN, Point3d::new(0.0, 0.0, 5.0)]);
        let copy = edge.clone();
        assert!(copy.is_edge());
        assert_eq!(copy.edge_count(), 1);
        assert!(copy.has_edge(&Point3d::ORIGIN, &Point3d::new(0.0, 0.0, 5.0), 0.0));

        let triangle = Polyhedron::from_points([
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        let copy = triangle.clone();
        assert!(copy.is_polygon());
        assert!(copy.edges().all(|(_, e)| !e.fully_specified()));
    }

    #[test]
    fn test_clone_from_replaces_contents() {
        let cube = unit_cube();
        let mut target = Polyhedron::from_points([Point3d::new(9.0, 9.0, 9.0)]);
        target.clone_from(&cube);
        assert_eq!(target.vertex_count(), 8);
        assert!(!target.has_vertex(&Point3d::new(9.0, 9.0, 9.0), 0.0));
        assert_eq!(target.bounds(), cube.bounds());
    }

    #[test]
    #[should_panic(expected = "was not copied")]
    fn test_edge_referencing_a_detached_face_half_edge_is_fatal() {
        let mut cube = unit_cube();
        let (edge, first) = cube.edges().map(|(id, e)| (id, e.first)).next().unwrap();
        let face = cube.store.half_edges[first].face;
        let stray = cube.store.new_half_edge(cube.store.origin(first));
        cube.store.half_edges[stray].face = face;
        cube.store.replace_half_edge(edge, first, stray);
        let _ = cube.clone();
    }
}
