use std::collections::HashSet;

use slotmap::SecondaryMap;
use tracing::{debug, info, instrument};

use crate::geometry::{Plane, Point3d, PointStatus};
use crate::topology::{EdgeId, FaceId, HalfEdgeId, VertexId};

use super::{Callback, Polyhedron};

/// Outcome of [`Polyhedron::clip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipResult {
    /// Nothing lies above the plane.
    Unchanged,
    /// Nothing lies below the plane; the polyhedron was left as it was.
    Empty,
    /// The part above the plane was removed.
    Success,
}

impl Polyhedron {
    /// Cut away everything above `plane`.
    #[instrument(skip(self, callback), fields(normal = ?plane.normal, distance = plane.distance))]
    pub fn clip(&mut self, plane: &Plane, callback: &mut dyn Callback) -> ClipResult {
        let epsilon = self.tolerance().point_status;
        let mut status: SecondaryMap<VertexId, PointStatus> = SecondaryMap::new();
        for (id, vertex) in self.vertices() {
            status.insert(id, plane.point_status(&vertex.position, epsilon));
        }
        if !status.values().any(|s| *s == PointStatus::Above) {
            return ClipResult::Unchanged;
        }
        if !status.values().any(|s| *s == PointStatus::Below) {
            return ClipResult::Empty;
        }

        if self.is_polyhedron() {
            self.clip_polyhedron(plane, &mut status, callback);
        } else {
            self.clip_degenerate(plane, &status, callback);
        }
        self.update_bounds();
        info!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "clipped"
        );
        ClipResult::Success
    }

    /// Rebuild a point, edge or polygon from what survives the cut.
    fn clip_degenerate(
        &mut self,
        plane: &Plane,
        status: &SecondaryMap<VertexId, PointStatus>,
        callback: &mut dyn Callback,
    ) {
        let mut points: Vec<Point3d> = self
            .vertices()
            .filter(|(id, _)| status[*id] != PointStatus::Above)
            .map(|(_, v)| v.position)
            .collect();
        for edge in self.edge_ids() {
            let (a, b) = self.store.edge_vertices(edge);
            if crosses(status[a], status[b]) {
                points.push(plane.intersect_with_segment(&self.store.position(a), &self.store.position(b)));
            }
        }
        for face in self.face_ids() {
            callback.face_will_be_deleted(self, face);
        }
        self.clear();
        self.add_points(points, callback);
    }

    fn clip_polyhedron(
        &mut self,
        plane: &Plane,
        status: &mut SecondaryMap<VertexId, PointStatus>,
        callback: &mut dyn Callback,
    ) {
        for edge in self.edge_ids() {
            let (a, b) = self.store.edge_vertices(edge);
            if crosses(status[a], status[b]) {
                let position = plane.intersect_with_segment(&self.store.position(a), &self.store.position(b));
                let vertex = self.split_edge(edge, position);
                status.insert(vertex, PointStatus::Inside);
            }
        }

        for face in self.face_ids() {
            self.split_face(face, status, callback);
        }

        let doomed: Vec<FaceId> = self
            .face_ids()
            .into_iter()
            .filter(|&face| {
                self.face_vertices(face)
                    .iter()
                    .any(|&v| status[v] == PointStatus::Above)
            })
            .collect();
        for &face in &doomed {
            callback.face_will_be_deleted(self, face);
        }
        let seam = self.remove_clipped_faces(&doomed);

        let above: Vec<VertexId> = self
            .vertex_ids()
            .into_iter()
            .filter(|&v| status[v] == PointStatus::Above)
            .collect();
        for vertex in above {
            self.remove_vertex(vertex);
        }

        let cap = self.close_seam(&seam);
        callback.face_was_created(self, cap);
        debug!(?cap, removed = doomed.len(), "capped clipped polyhedron");
    }

    /// Insert a vertex at `position` on `edge`, splitting it in two.
    fn split_edge(&mut self, edge: EdgeId, position: Point3d) -> VertexId {
        let first = self.store.edges[edge].first;
        let second = self.store.edges[edge]
            .second
            .expect("edges of a closed polyhedron are fully specified");
        let (Some(first_face), Some(second_face)) =
            (self.store.half_edges[first].face, self.store.half_edges[second].face)
        else {
            panic!("edge {edge:?} is not bordered by two faces");
        };

        let vertex = self.add_vertex(position);
        let first_tail = self.store.new_half_edge(vertex);
        let second_tail = self.store.new_half_edge(vertex);
        self.store.insert_into_boundary_after(first_face, first, first_tail);
        self.store.insert_into_boundary_after(second_face, second, second_tail);

        // first: a -> m, first_tail: m -> b, second: b -> m, second_tail: m -> a
        self.store.replace_half_edge(edge, second, second_tail);
        self.add_edge(first_tail, Some(second));
        vertex
    }

    /// Cut `face` along the segment between its two on-plane vertices if it
    /// has vertices on both sides of the plane. The original keeps the part
    /// below.
    fn split_face(&mut self, face: FaceId, status: &SecondaryMap<VertexId, PointStatus>, callback: &mut dyn Callback) {
        let boundary = self.store.boundary(face);
        let statuses: Vec<(PointStatus, PointStatus)> = boundary
            .iter()
            .map(|&h| (status[self.store.origin(h)], status[self.store.destination(h)]))
            .collect();
        let find = |to: PointStatus| {
            statuses
                .iter()
                .position(|&(from, next)| from == PointStatus::Inside && next == to)
        };
        let (Some(up), Some(down)) = (find(PointStatus::Above), find(PointStatus::Below)) else {
            return;
        };

        let n = boundary.len();
        let upper: Vec<HalfEdgeId> = (0..n)
            .map(|k| boundary[(up + k) % n])
            .take((down + n - up) % n)
            .collect();
        let last_lower = boundary[(up + n - 1) % n];
        let up_vertex = self.store.origin(boundary[up]);
        let down_vertex = self.store.origin(boundary[down]);

        for &half_edge in &upper {
            self.store.remove_from_boundary(face, half_edge);
        }
        let closing_lower = self.store.new_half_edge(up_vertex);
        self.store.insert_into_boundary_after(face, last_lower, closing_lower);

        let closing_upper = self.store.new_half_edge(down_vertex);
        let mut clone_boundary = upper;
        clone_boundary.push(closing_upper);
        let clone = self.add_face(&clone_boundary);
        self.add_edge(closing_lower, Some(closing_upper));

        callback.face_was_split(self, face, clone);
        debug!(?face, ?clone, "split face");
    }

    /// Delete `doomed` faces. Edges shared with a surviving face become
    /// partial; their surviving halves are returned.
    fn remove_clipped_faces(&mut self, doomed: &[FaceId]) -> Vec<HalfEdgeId> {
        let doomed_set: HashSet<FaceId> = doomed.iter().copied().collect();
        let mut seam = Vec::new();
        let mut dead_edges: HashSet<EdgeId> = HashSet::new();
        for &face in doomed {
            for half_edge in self.store.boundary(face) {
                let Some(edge) = self.store.half_edges[half_edge].edge else {
                    continue;
                };
                let twin = self.store.twin(half_edge);
                let survivor = twin.filter(|&t| {
                    self.store.half_edges[t]
                        .face
                        .is_some_and(|f| !doomed_set.contains(&f))
                });
                match survivor {
                    Some(kept) => {
                        self.store.make_partial(edge, half_edge);
                        seam.push(kept);
                    }
                    None => {
                        dead_edges.insert(edge);
                    }
                }
            }
        }
        for &face in doomed {
            for half_edge in self.store.boundary(face) {
                self.remove_half_edge(half_edge);
            }
            self.store.faces[face].boundary.clear();
            self.remove_face(face);
        }
        for edge in dead_edges {
            self.remove_edge(edge);
        }
        seam
    }

    /// Close the hole bounded by the partial edges of `seam` with one face.
    fn close_seam(&mut self, seam: &[HalfEdgeId]) -> FaceId {
        let mut by_origin: SecondaryMap<VertexId, HalfEdgeId> = SecondaryMap::new();
        let mut destination: SecondaryMap<HalfEdgeId, VertexId> = SecondaryMap::new();
        for &kept in seam {
            let cap_half = self.store.new_half_edge(self.store.destination(kept));
            by_origin.insert(self.store.origin(cap_half), cap_half);
            destination.insert(cap_half, self.store.origin(kept));
            if let Some(edge) = self.store.half_edges[kept].edge {
                self.store.set_second_half(edge, cap_half);
            }
        }

        let first = *by_origin
            .values()
            .next()
            .expect("clipping leaves a hole to close");
        let mut boundary = vec![first];
        loop {
            let current = boundary[boundary.len() - 1];
            let next = *by_origin
                .get(destination[current])
                .expect("clipping seam is not closed");
            if next == first {
                break;
            }
            assert!(boundary.len() < seam.len(), "clipping seam is not a single loop");
            boundary.push(next);
        }
        self.add_face(&boundary)
    }
}

fn crosses(a: PointStatus, b: PointStatus) -> bool {
    matches!(
        (a, b),
        (PointStatus::Above, PointStatus::Below) | (PointStatus::Below, PointStatus::Above)
    )
}
