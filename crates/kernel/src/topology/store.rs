use slotmap::SlotMap;

use crate::geometry::point::Point3d;

use super::elements::*;
use super::ring::{Link, Ring};

/// Arena-based storage for all mesh elements of one polyhedron.
///
/// The store knows how elements reference each other but not which of them
/// belong to the polyhedron's vertex, edge and face rings; that is tracked
/// by the owner.
#[derive(Debug, Default)]
pub struct MeshStore {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub half_edges: SlotMap<HalfEdgeId, HalfEdge>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub faces: SlotMap<FaceId, Face>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.half_edges.clear();
        self.edges.clear();
        self.faces.clear();
    }

    // ── Construction ────────────────────────────────────────────────────

    pub fn new_vertex(&mut self, position: Point3d) -> VertexId {
        self.vertices.insert_with_key(|key| Vertex {
            position,
            link: Link::detached(key),
        })
    }

    pub fn new_half_edge(&mut self, origin: VertexId) -> HalfEdgeId {
        self.half_edges.insert_with_key(|key| HalfEdge {
            origin,
            edge: None,
            face: None,
            link: Link::detached(key),
        })
    }

    /// Create an edge and point its half-edges back at it.
    pub fn new_edge(&mut self, first: HalfEdgeId, second: Option<HalfEdgeId>) -> EdgeId {
        let edge = self.edges.insert_with_key(|key| Edge {
            first,
            second,
            link: Link::detached(key),
        });
        self.half_edges[first].edge = Some(edge);
        if let Some(second) = second {
            self.half_edges[second].edge = Some(edge);
        }
        edge
    }

    pub fn new_face(&mut self) -> FaceId {
        self.faces.insert_with_key(|key| Face {
            boundary: Ring::new(),
            link: Link::detached(key),
        })
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn position(&self, vertex: VertexId) -> Point3d {
        self.vertices[vertex].position
    }

    pub fn origin(&self, half_edge: HalfEdgeId) -> VertexId {
        self.half_edges[half_edge].origin
    }

    pub fn next(&self, half_edge: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[half_edge].link.next
    }

    pub fn previous(&self, half_edge: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[half_edge].link.previous
    }

    /// Origin of the following half-edge in the same boundary.
    pub fn destination(&self, half_edge: HalfEdgeId) -> VertexId {
        self.origin(self.next(half_edge))
    }

    pub fn twin(&self, half_edge: HalfEdgeId) -> Option<HalfEdgeId> {
        let edge = self.half_edges[half_edge].edge?;
        self.edges[edge].twin_of(half_edge)
    }

    /// The face on the other side of `half_edge`.
    pub fn neighbour(&self, half_edge: HalfEdgeId) -> Option<FaceId> {
        self.twin(half_edge)
            .and_then(|twin| self.half_edges.get(twin))
            .and_then(|twin| twin.face)
    }

    pub fn boundary(&self, face: FaceId) -> Vec<HalfEdgeId> {
        self.faces[face].boundary.keys(&self.half_edges)
    }

    pub fn boundary_vertices(&self, face: FaceId) -> Vec<VertexId> {
        self.faces[face]
            .boundary
            .iter(&self.half_edges)
            .map(|(_, h)| h.origin)
            .collect()
    }

    /// End points of `edge`, starting with the origin of its first half.
    pub fn edge_vertices(&self, edge: EdgeId) -> (VertexId, VertexId) {
        let e = &self.edges[edge];
        let start = self.origin(e.first);
        let end = match e.second {
            Some(second) => self.origin(second),
            None => self.destination(e.first),
        };
        (start, end)
    }

    pub fn edge_faces(&self, edge: EdgeId) -> (Option<FaceId>, Option<FaceId>) {
        let e = &self.edges[edge];
        (
            self.half_edges[e.first].face,
            e.second.and_then(|h| self.half_edges[h].face),
        )
    }

    /// Half-edges leaving `vertex` that lie on some face boundary.
    pub fn outgoing(&self, vertex: VertexId) -> Vec<HalfEdgeId> {
        self.half_edges
            .iter()
            .filter(|(_, h)| h.origin == vertex && h.face.is_some())
            .map(|(key, _)| key)
            .collect()
    }

    // ── Boundary edits ──────────────────────────────────────────────────

    pub fn append_to_boundary(&mut self, face: FaceId, half_edge: HalfEdgeId) {
        self.faces[face]
            .boundary
            .append(&mut self.half_edges, half_edge);
        self.half_edges[half_edge].face = Some(face);
    }

    pub fn insert_into_boundary_after(&mut self, face: FaceId, anchor: HalfEdgeId, half_edge: HalfEdgeId) {
        self.faces[face]
            .boundary
            .insert_after(&mut self.half_edges, anchor, half_edge);
        self.half_edges[half_edge].face = Some(face);
    }

    pub fn remove_from_boundary(&mut self, face: FaceId, half_edge: HalfEdgeId) {
        self.faces[face]
            .boundary
            .remove(&mut self.half_edges, half_edge);
        self.half_edges[half_edge].face = None;
    }

    /// Complete a partially specified edge with its missing half.
    pub fn set_second_half(&mut self, edge: EdgeId, half_edge: HalfEdgeId) {
        debug_assert!(self.edges[edge].second.is_none());
        self.edges[edge].second = Some(half_edge);
        self.half_edges[half_edge].edge = Some(edge);
    }

    /// Swap `old` for `new` as one of the halves of `edge`.
    pub fn replace_half_edge(&mut self, edge: EdgeId, old: HalfEdgeId, new: HalfEdgeId) {
        let e = &mut self.edges[edge];
        if e.first == old {
            e.first = new;
        } else {
            debug_assert_eq!(e.second, Some(old));
            e.second = Some(new);
        }
        if self.half_edges.get(old).and_then(|h| h.edge) == Some(edge) {
            self.half_edges[old].edge = None;
        }
        self.half_edges[new].edge = Some(edge);
    }

    /// Remove `half_edge` from `edge`, leaving the other half as the only one.
    pub fn make_partial(&mut self, edge: EdgeId, half_edge: HalfEdgeId) {
        let e = &mut self.edges[edge];
        if e.first == half_edge {
            let Some(second) = e.second.take() else {
                return;
            };
            e.first = second;
        } else if e.second == Some(half_edge) {
            e.second = None;
        }
        if let Some(h) = self.half_edges.get_mut(half_edge) {
            h.edge = None;
        }
    }

    /// Remove `edge` from the arena, unlinking any half-edge that still refers to it.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<Edge> {
        let removed = self.edges.remove(edge)?;
        for half_edge in std::iter::once(removed.first).chain(removed.second) {
            if let Some(h) = self.half_edges.get_mut(half_edge) {
                if h.edge == Some(edge) {
                    h.edge = None;
                }
            }
        }
        Some(removed)
    }
}
