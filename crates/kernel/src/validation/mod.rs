//! Structural and geometric invariants of a [`Polyhedron`].
//!
//! The checks are not run on every mutation. Tests and debug assertions call
//! [`Polyhedron::check_invariant`] or [`Polyhedron::validate`] when they want
//! a verdict.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{info, instrument};

use crate::geometry::PointStatus;
use crate::polyhedron::Polyhedron;
use crate::topology::{EdgeId, FaceId, HalfEdgeId, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("vertex {vertex:?} lies above the plane of face {face:?}")]
    NotConvex { face: FaceId, vertex: VertexId },

    #[error("edge {0:?} is not fully specified")]
    OpenEdge(EdgeId),

    #[error("edge {edge:?} borders face {face:?}, which is not part of the polyhedron")]
    ForeignFace { edge: EdgeId, face: FaceId },

    #[error("face {face:?} has {count} boundary half-edges")]
    DegenerateFace { face: FaceId, count: usize },

    #[error("half-edge {half_edge:?} of face {face:?} is not linked to a fully specified edge")]
    UnlinkedHalfEdge { face: FaceId, half_edge: HalfEdgeId },

    #[error("edge {0:?} has the same face on both sides")]
    SelfAdjacentFace(EdgeId),

    #[error("faces {first:?} and {second:?} meeting at edge {edge:?} are coplanar")]
    CoplanarFaces { edge: EdgeId, first: FaceId, second: FaceId },
}

impl Polyhedron {
    /// Convexity, plus closure and non-degeneracy for closed polyhedra.
    ///
    /// Coplanar neighbouring faces are not reported here: faces a hair apart
    /// fall within the point status epsilon of each other and would be
    /// flagged. Use [`Polyhedron::check_no_coplanar_faces`] for that.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.validate_convex().and_then(|()| {
            if self.is_polyhedron() {
                self.validate_closed()?;
                self.validate_no_degenerate_faces()?;
            }
            Ok(())
        });
        info!(
            valid = result.is_ok(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "validation complete"
        );
        result
    }

    pub fn check_invariant(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn check_convex(&self) -> bool {
        self.validate_convex().is_ok()
    }

    pub fn check_closed(&self) -> bool {
        self.validate_closed().is_ok()
    }

    pub fn check_no_degenerate_faces(&self) -> bool {
        self.validate_no_degenerate_faces().is_ok()
    }

    pub fn check_no_coplanar_faces(&self) -> bool {
        self.validate_no_coplanar_faces().is_ok()
    }

    /// No vertex lies strictly above any face plane.
    pub fn validate_convex(&self) -> Result<(), InvariantViolation> {
        let epsilon = self.tolerance().point_status;
        for (face, _) in self.faces() {
            // A face without area has no plane to be on the wrong side of.
            let Some(plane) = self.face_plane(face) else {
                continue;
            };
            for (vertex, v) in self.vertices() {
                if plane.point_status(&v.position, epsilon) == PointStatus::Above {
                    return Err(InvariantViolation::NotConvex { face, vertex });
                }
            }
        }
        Ok(())
    }

    /// Every edge has two halves and both of their faces belong to this
    /// polyhedron.
    pub fn validate_closed(&self) -> Result<(), InvariantViolation> {
        let faces: HashSet<FaceId> = self.face_ids().into_iter().collect();
        for (edge, e) in self.edges() {
            if !e.fully_specified() {
                return Err(InvariantViolation::OpenEdge(edge));
            }
            let (first, second) = self.mesh().edge_faces(edge);
            for face in [first, second] {
                match face {
                    Some(face) if faces.contains(&face) => {}
                    Some(face) => return Err(InvariantViolation::ForeignFace { edge, face }),
                    None => return Err(InvariantViolation::OpenEdge(edge)),
                }
            }
        }
        Ok(())
    }

    /// Every face has at least three half-edges, each on a fully specified edge.
    pub fn validate_no_degenerate_faces(&self) -> Result<(), InvariantViolation> {
        let mesh = self.mesh();
        for (face, f) in self.faces() {
            if f.boundary.len() < 3 {
                return Err(InvariantViolation::DegenerateFace {
                    face,
                    count: f.boundary.len(),
                });
            }
            for (half_edge, h) in f.boundary.iter(&mesh.half_edges) {
                let linked = h
                    .edge
                    .and_then(|edge| mesh.edges.get(edge))
                    .is_some_and(|edge| edge.fully_specified());
                if !linked {
                    return Err(InvariantViolation::UnlinkedHalfEdge { face, half_edge });
                }
            }
        }
        Ok(())
    }

    /// The two faces of every edge differ and are not coplanar.
    pub fn validate_no_coplanar_faces(&self) -> Result<(), InvariantViolation> {
        for (edge, _) in self.edges() {
            let (Some(first), Some(second)) = self.mesh().edge_faces(edge) else {
                continue;
            };
            if first == second {
                return Err(InvariantViolation::SelfAdjacentFace(edge));
            }
            if self.faces_coplanar(first, second) {
                return Err(InvariantViolation::CoplanarFaces { edge, first, second });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, Point3d};

    fn unit_cube() -> Polyhedron {
        Polyhedron::from_bounds(&BoundingBox::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn test_cube_is_valid() {
        let cube = unit_cube();
        assert_eq!(cube.validate(), Ok(()));
        assert!(cube.check_convex());
        assert!(cube.check_closed());
        assert!(cube.check_no_degenerate_faces());
        assert!(cube.check_no_coplanar_faces());
    }

    #[test]
    fn test_moved_vertex_breaks_convexity() {
        let mut cube = unit_cube();
        let vertex = cube.find_vertex_by_position(&Point3d::new(1.0, 1.0, 1.0), 0.0).unwrap();
        cube.store.vertices[vertex].position = Point3d::new(0.5, 0.5, 0.5);
        assert!(matches!(cube.validate(), Err(InvariantViolation::NotConvex { .. })));
        assert!(!cube.check_invariant());
    }

    #[test]
    fn test_open_edge_breaks_closure() {
        let mut cube = unit_cube();
        let edge = cube.edge_ids()[0];
        let second = cube.store.edges[edge].second.unwrap();
        cube.store.make_partial(edge, second);
        assert_eq!(cube.validate_closed(), Err(InvariantViolation::OpenEdge(edge)));
        assert!(matches!(
            cube.validate_no_degenerate_faces(),
            Err(InvariantViolation::UnlinkedHalfEdge { .. })
        ));
        assert!(!cube.check_invariant());
    }

    #[test]
    fn test_polygons_are_not_checked_for_closure() {
        let triangle = Polyhedron::from_points([
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        assert!(!triangle.check_closed());
        assert!(triangle.check_invariant());
    }

    #[test]
    fn test_violation_messages() {
        let cube = unit_cube();
        let edge = cube.edge_ids()[0];
        let message = InvariantViolation::OpenEdge(edge).to_string();
        assert!(message.contains("not fully specified"));
    }
}
