//! Convex polyhedra on a half-edge mesh.
//!
//! A [`Polyhedron`] owns a [`MeshStore`] plus three rings threading its
//! vertices, edges and faces. Depending on how many points it has absorbed it
//! is empty, a point, an edge, a polygon or a closed polyhedron; all of them
//! share the same representation.

mod add_point;
mod callback;
mod clip;
mod construction;
mod copy;
mod face;
mod queries;

use std::fmt;

use tracing::debug;

use crate::geometry::{BoundingBox, Point3d};
use crate::topology::{Edge, EdgeId, Face, FaceId, HalfEdgeId, MeshStore, Ring, Vertex, VertexId};
use crate::Tolerance;

pub use callback::{Callback, NoopCallback};
pub use clip::ClipResult;
pub use queries::FaceHit;

/// A convex polyhedron, or one of its degenerate forms.
#[derive(Debug)]
pub struct Polyhedron {
    pub(crate) store: MeshStore,
    pub(crate) vertices: Ring<VertexId>,
    pub(crate) edges: Ring<EdgeId>,
    pub(crate) faces: Ring<FaceId>,
    bounds: BoundingBox,
    tolerance: Tolerance,
}

impl Default for Polyhedron {
    fn default() -> Self {
        Self::with_tolerance(Tolerance::default())
    }
}

impl Polyhedron {
    /// An empty polyhedron.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            store: MeshStore::new(),
            vertices: Ring::new(),
            edges: Ring::new(),
            faces: Ring::new(),
            bounds: BoundingBox::nan(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    // ── Counts and shape ────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn is_point(&self) -> bool {
        self.vertex_count() == 1
    }

    pub fn is_edge(&self) -> bool {
        self.vertex_count() == 2
    }

    pub fn is_polygon(&self) -> bool {
        self.face_count() == 1
    }

    pub fn is_polyhedron(&self) -> bool {
        self.face_count() > 3
    }

    /// Euler characteristic of a sphere: `V + F == E + 2`.
    pub fn is_closed(&self) -> bool {
        self.vertex_count() + self.face_count() == self.edge_count() + 2
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.store.clear();
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
        self.update_bounds();
    }

    // ── Element access ──────────────────────────────────────────────────

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.store.vertices.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.store.edges.get(id)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.store.faces.get(id)
    }

    /// Read access to the underlying arenas for navigation.
    pub fn mesh(&self) -> &MeshStore {
        &self.store
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter(&self.store.vertices)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter(&self.store.edges)
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter(&self.store.faces)
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys(&self.store.vertices)
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys(&self.store.edges)
    }

    pub fn face_ids(&self) -> Vec<FaceId> {
        self.faces.keys(&self.store.faces)
    }

    pub fn vertex_positions(&self) -> Vec<Point3d> {
        self.vertices().map(|(_, v)| v.position).collect()
    }

    // ── Element lifecycle ───────────────────────────────────────────────

    pub(crate) fn add_vertex(&mut self, position: Point3d) -> VertexId {
        let id = self.store.new_vertex(position);
        self.vertices.append(&mut self.store.vertices, id);
        id
    }

    pub(crate) fn add_edge(&mut self, first: HalfEdgeId, second: Option<HalfEdgeId>) -> EdgeId {
        let id = self.store.new_edge(first, second);
        self.edges.append(&mut self.store.edges, id);
        id
    }

    /// Create a face whose boundary is `boundary`, in order.
    pub(crate) fn add_face(&mut self, boundary: &[HalfEdgeId]) -> FaceId {
        let id = self.store.new_face();
        for &half_edge in boundary {
            self.store.append_to_boundary(id, half_edge);
        }
        self.faces.append(&mut self.store.faces, id);
        id
    }

    pub(crate) fn remove_vertex(&mut self, id: VertexId) {
        self.vertices.remove(&mut self.store.vertices, id);
        self.store.vertices.remove(id);
    }

    pub(crate) fn remove_edge(&mut self, id: EdgeId) {
        self.edges.remove(&mut self.store.edges, id);
        self.store.remove_edge(id);
    }

    /// Remove a face from the face ring and the arena. Its half-edges are
    /// left to the caller.
    pub(crate) fn remove_face(&mut self, id: FaceId) {
        self.faces.remove(&mut self.store.faces, id);
        self.store.faces.remove(id);
    }

    pub(crate) fn remove_half_edge(&mut self, id: HalfEdgeId) {
        self.store.half_edges.remove(id);
    }

    pub(crate) fn update_bounds(&mut self) {
        self.bounds = BoundingBox::from_points(self.vertices().map(|(_, v)| &v.position));
        debug!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "bounds updated"
        );
    }
}

impl fmt::Display for Polyhedron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Polyhedron ({} vertices, {} edges, {} faces)",
            self.vertex_count(),
            self.edge_count(),
            self.face_count()
        )?;
        for (_, vertex) in self.vertices() {
            writeln!(f, "{}", vertex.position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let p = Polyhedron::new();
        assert!(p.is_empty());
        assert!(!p.is_point());
        assert!(!p.is_polygon());
        assert!(!p.is_polyhedron());
        assert!(p.bounds().is_nan());
        assert_eq!(p.vertex_positions(), Vec::<Point3d>::new());
    }

    #[test]
    fn test_display_lists_vertices() {
        let mut p = Polyhedron::new();
        p.add_point(Point3d::new(1.0, 2.0, 3.0), &mut NoopCallback);
        let text = p.to_string();
        assert!(text.starts_with("Polyhedron (1 vertices, 0 edges, 0 faces)"));
        assert!(text.contains("1 2 3"));
    }

    #[test]
    fn test_clear_resets_bounds() {
        let mut p = Polyhedron::from_bounds(&BoundingBox::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 1.0, 1.0),
        ));
        assert!(!p.bounds().is_nan());
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.face_count(), 0);
        assert_eq!(p.edge_count(), 0);
        assert!(p.bounds().is_nan());
    }

    #[test]
    fn test_with_tolerance() {
        let tolerance = Tolerance {
            point_status: 0.25,
            ..Tolerance::default()
        };
        let p = Polyhedron::with_tolerance(tolerance);
        assert_eq!(p.tolerance().point_status, 0.25);
    }
}
