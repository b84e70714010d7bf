use crate::geometry::Plane;
use crate::topology::FaceId;

use super::Polyhedron;

/// Hooks invoked while a polyhedron's faces are created, changed or removed.
///
/// Implementors can keep per-face data (materials, texture alignment, ...)
/// in sync with the mesh. Every hook defaults to doing nothing, and the
/// polyhedron passed in is always in a consistent state when a hook runs.
pub trait Callback {
    /// Supporting plane of `face`, normal pointing out of the polyhedron.
    ///
    /// The default derives it from the first three boundary vertices.
    ///
    /// # Panics
    ///
    /// Panics if those vertices are colinear, which means the face is
    /// degenerate.
    fn plane(&self, polyhedron: &Polyhedron, face: FaceId) -> Plane {
        let positions = polyhedron.face_vertex_positions(face);
        assert!(positions.len() >= 3, "face {face:?} has fewer than three vertices");
        Plane::from_points(&positions[1], &positions[0], &positions[2])
            .expect("face plane is undefined: the first three vertices are colinear")
    }

    fn face_was_created(&mut self, _polyhedron: &Polyhedron, _face: FaceId) {}

    fn face_will_be_deleted(&mut self, _polyhedron: &Polyhedron, _face: FaceId) {}

    /// The boundary of `face` changed but the face keeps its identity.
    fn face_did_change(&mut self, _polyhedron: &Polyhedron, _face: FaceId) {}

    /// `original` was cut in two and `clone` holds the other part.
    fn face_was_split(&mut self, _polyhedron: &Polyhedron, _original: FaceId, _clone: FaceId) {}

    /// `to_delete` is about to be absorbed into `remaining`.
    fn faces_will_be_merged(&mut self, _polyhedron: &Polyhedron, _remaining: FaceId, _to_delete: FaceId) {}
}

/// A callback that keeps the default behavior for every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl Callback for NoopCallback {}
