pub mod geometry;
pub mod polyhedron;
pub mod topology;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use geometry::{BoundingBox, Plane, Point3d, PointStatus, Ray, Side, Vec3};
pub use polyhedron::{Callback, ClipResult, FaceHit, NoopCallback, Polyhedron};
pub use topology::{EdgeId, FaceId, HalfEdgeId, VertexId};
pub use validation::InvariantViolation;

/// Epsilons used by the polyhedron kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Points whose coordinates all differ by less than this are the same point.
    pub coincidence: f64,
    /// Half-thickness of a plane when classifying points against it.
    pub point_status: f64,
    /// Maximum distance of a point from a line for it to count as colinear.
    pub colinear: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-7,
            point_status: 1e-6,
            colinear: 1e-6,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.equals(b, self.coincidence)
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
