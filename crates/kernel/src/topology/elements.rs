use slotmap::new_key_type;

use crate::geometry::point::Point3d;

use super::ring::{Link, Linked, Ring};

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct HalfEdgeId;
    pub struct EdgeId;
    pub struct FaceId;
}

// ─── Mesh Elements ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3d,
    pub(crate) link: Link<VertexId>,
}

/// A directed edge segment on the boundary of one face.
///
/// The half-edges of an edge-shaped polyhedron have no face; they are not
/// members of any boundary ring.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub edge: Option<EdgeId>,
    pub face: Option<FaceId>,
    pub(crate) link: Link<HalfEdgeId>,
}

/// An undirected edge made of two opposing half-edges.
///
/// `second` stays `None` while the edge borders only one face (polygon
/// shapes, or transiently while a polyhedron is being rebuilt).
#[derive(Debug, Clone)]
pub struct Edge {
    pub first: HalfEdgeId,
    pub second: Option<HalfEdgeId>,
    pub(crate) link: Link<EdgeId>,
}

impl Edge {
    pub fn fully_specified(&self) -> bool {
        self.second.is_some()
    }

    /// The half-edge on the other side of `half_edge`, if any.
    pub fn twin_of(&self, half_edge: HalfEdgeId) -> Option<HalfEdgeId> {
        if self.first == half_edge {
            self.second
        } else if self.second == Some(half_edge) {
            Some(self.first)
        } else {
            None
        }
    }
}

/// A planar convex polygon bounded by a ring of half-edges.
#[derive(Debug, Clone)]
pub struct Face {
    pub boundary: Ring<HalfEdgeId>,
    pub(crate) link: Link<FaceId>,
}

macro_rules! impl_linked {
    ($element:ty, $key:ty) => {
        impl Linked<$key> for $element {
            fn link(&self) -> &Link<$key> {
                &self.link
            }
            fn link_mut(&mut self) -> &mut Link<$key> {
                &mut self.link
            }
        }
    };
}

impl_linked!(Vertex, VertexId);
impl_linked!(HalfEdge, HalfEdgeId);
impl_linked!(Edge, EdgeId);
impl_linked!(Face, FaceId);
