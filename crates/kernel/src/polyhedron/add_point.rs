//! Incremental convex hull: integrating one point at a time.

use std::collections::HashSet;

use slotmap::SecondaryMap;
use tracing::{debug, instrument, warn};

use crate::geometry::{colinear, line_parameter, Point3d, PointStatus};
use crate::topology::{EdgeId, FaceId, HalfEdgeId, VertexId};

use super::{Callback, Polyhedron};

impl Polyhedron {
    /// Grow the hull so that it contains `position`.
    ///
    /// Returns the vertex now standing for the point, or `None` if the point
    /// was already covered by the hull and nothing changed.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the faces the point sees do not form a
    /// single region with a closed horizon, which means the mesh was
    /// already corrupt.
    #[instrument(skip(self, callback), fields(position = %position))]
    pub fn add_point(&mut self, position: Point3d, callback: &mut dyn Callback) -> Option<VertexId> {
        let result = match self.vertex_count() {
            0 => Some(self.add_vertex(position)),
            1 => self.add_point_to_point(position),
            2 => self.add_point_to_edge(position, callback),
            _ if self.is_polygon() => self.add_point_to_polygon(position, callback),
            _ => self.add_point_to_polyhedron(position, callback),
        };
        if result.is_some() {
            self.update_bounds();
        } else {
            debug!("point absorbed");
        }
        result
    }

    fn add_point_to_point(&mut self, position: Point3d) -> Option<VertexId> {
        let existing = self.vertices.front()?;
        if self.tolerance().points_coincident(&self.store.position(existing), &position) {
            return None;
        }
        let vertex = self.add_vertex(position);
        let first = self.store.new_half_edge(existing);
        let second = self.store.new_half_edge(vertex);
        self.add_edge(first, Some(second));
        Some(vertex)
    }

    fn add_point_to_edge(&mut self, position: Point3d, callback: &mut dyn Callback) -> Option<VertexId> {
        let edge = self.edges.front()?;
        let (v1, v2) = self.store.edge_vertices(edge);
        let (p1, p2) = (self.store.position(v1), self.store.position(v2));

        if colinear(&p1, &p2, &position, self.tolerance().colinear) {
            let t = line_parameter(&p1, &p2, &position);
            return if (0.0..=1.0).contains(&t) {
                None
            } else {
                let moved = if t > 1.0 { v2 } else { v1 };
                self.store.vertices[moved].position = position;
                Some(moved)
            };
        }

        let old = self.store.edges[edge].clone();
        self.remove_edge(edge);
        self.remove_half_edge(old.first);
        if let Some(second) = old.second {
            self.remove_half_edge(second);
        }

        let v3 = self.add_vertex(position);
        let boundary: Vec<_> = [v1, v2, v3]
            .into_iter()
            .map(|v| self.store.new_half_edge(v))
            .collect();
        let face = self.add_face(&boundary);
        for &half_edge in &boundary {
            self.add_edge(half_edge, None);
        }
        callback.face_was_created(self, face);
        debug!(?face, "edge became a triangle");
        Some(v3)
    }

    fn add_point_to_polygon(&mut self, position: Point3d, callback: &mut dyn Callback) -> Option<VertexId> {
        let face = self.faces.front()?;
        let plane = callback.plane(self, face);
        match plane.point_status(&position, self.tolerance().point_status) {
            PointStatus::Inside => self.add_coplanar_point_to_polygon(face, position, callback),
            PointStatus::Above => {
                self.flip_face(face);
                callback.face_did_change(self, face);
                Some(self.make_polyhedron(face, position, callback))
            }
            PointStatus::Below => Some(self.make_polyhedron(face, position, callback)),
        }
    }

    /// Replace the boundary edges of `face` that `position` can see with two
    /// edges through `position`.
    fn add_coplanar_point_to_polygon(
        &mut self,
        face: FaceId,
        position: Point3d,
        callback: &mut dyn Callback,
    ) -> Option<VertexId> {
        let Some(normal) = self.face_plane(face).map(|plane| plane.normal) else {
            warn!(?face, "polygon has no plane");
            return None;
        };
        let boundary = self.store.boundary(face);
        let epsilon = self.tolerance().colinear;
        let visible: Vec<bool> = boundary
            .iter()
            .map(|&h| {
                let a = self.store.position(self.store.origin(h));
                let b = self.store.position(self.store.destination(h));
                let Some(outward) = (b - a).cross(&normal).normalized() else {
                    return false;
                };
                let distance = outward.dot(&(position - a));
                if distance > epsilon {
                    true
                } else if distance < -epsilon {
                    false
                } else {
                    !(0.0..=1.0).contains(&line_parameter(&a, &b, &position))
                }
            })
            .collect();

        let n = boundary.len();
        let starts: Vec<usize> = (0..n)
            .filter(|&i| visible[i] && !visible[(i + n - 1) % n])
            .collect();
        let start = match starts.as_slice() {
            [] => return None,
            [start] => *start,
            _ => {
                warn!(?face, runs = starts.len(), "visible boundary is not contiguous");
                return None;
            }
        };
        let chain: Vec<HalfEdgeId> = (0..n)
            .map(|k| (start + k) % n)
            .take_while(|&i| visible[i])
            .map(|i| boundary[i])
            .collect();

        let anchor = boundary[(start + n - 1) % n];
        let u = self.store.origin(chain[0]);
        let w = self.store.destination(chain[chain.len() - 1]);
        let interior: Vec<VertexId> = chain[1..].iter().map(|&h| self.store.origin(h)).collect();

        for &half_edge in &chain {
            let edge = self.store.half_edges[half_edge].edge;
            self.store.remove_from_boundary(face, half_edge);
            if let Some(edge) = edge {
                self.remove_edge(edge);
            }
            self.remove_half_edge(half_edge);
        }
        for vertex in interior {
            self.remove_vertex(vertex);
        }

        let vertex = self.add_vertex(position);
        let to_point = self.store.new_half_edge(u);
        let from_point = self.store.new_half_edge(vertex);
        self.store.insert_into_boundary_after(face, anchor, to_point);
        self.store.insert_into_boundary_after(face, to_point, from_point);
        self.add_edge(to_point, None);
        self.add_edge(from_point, None);
        debug_assert_eq!(self.store.destination(from_point), w);

        callback.face_did_change(self, face);
        debug!(?face, removed_edges = chain.len(), "polygon grew");
        Some(vertex)
    }

    /// Reverse the winding of `face`.
    fn flip_face(&mut self, face: FaceId) {
        let boundary = self.store.boundary(face);
        let origins: Vec<VertexId> = boundary
            .iter()
            .map(|&h| self.store.destination(h))
            .collect();
        for (&half_edge, origin) in boundary.iter().zip(origins) {
            self.store.half_edges[half_edge].origin = origin;
        }
        self.store.faces[face]
            .boundary
            .reverse(&mut self.store.half_edges);
    }

    /// Turn the polygon `base` into a pyramid with apex `position`. The
    /// polygon must face away from the apex.
    fn make_polyhedron(&mut self, base: FaceId, position: Point3d, callback: &mut dyn Callback) -> VertexId {
        let boundary = self.store.boundary(base);
        let seam: Vec<HalfEdgeId> = boundary
            .iter()
            .rev()
            .map(|&h| {
                let twin = self.store.new_half_edge(self.store.destination(h));
                if let Some(edge) = self.store.half_edges[h].edge {
                    self.store.set_second_half(edge, twin);
                }
                twin
            })
            .collect();
        let apex = self.add_vertex(position);
        self.weave_cone(&seam, apex, callback);
        debug!(?base, sides = seam.len(), "polygon became a pyramid");
        apex
    }

    /// Close the loop of detached half-edges `seam` with a fan of triangles
    /// meeting at `apex`.
    ///
    /// The destination of `seam[i]` must be the origin of `seam[i + 1]`, and
    /// each seam half-edge must already belong to an edge.
    fn weave_cone(&mut self, seam: &[HalfEdgeId], apex: VertexId, callback: &mut dyn Callback) -> Vec<FaceId> {
        let n = seam.len();
        let mut faces = Vec::with_capacity(n);
        let mut to_apex = Vec::with_capacity(n);
        let mut from_apex = Vec::with_capacity(n);
        for (i, &half_edge) in seam.iter().enumerate() {
            let next_origin = self.store.origin(seam[(i + 1) % n]);
            let up = self.store.new_half_edge(next_origin);
            let down = self.store.new_half_edge(apex);
            faces.push(self.add_face(&[half_edge, up, down]));
            to_apex.push(up);
            from_apex.push(down);
        }
        for i in 0..n {
            self.add_edge(to_apex[i], Some(from_apex[(i + 1) % n]));
        }
        for &face in &faces {
            callback.face_was_created(self, face);
        }
        faces
    }

    fn add_point_to_polyhedron(&mut self, position: Point3d, callback: &mut dyn Callback) -> Option<VertexId> {
        let visible: Vec<FaceId> = self
            .face_ids()
            .into_iter()
            .filter(|&face| self.sees_face(face, &position, callback))
            .collect();
        if visible.is_empty() {
            return None;
        }

        let seam = self.find_seam(&visible);
        debug_assert!(
            seam.is_some(),
            "visible faces {visible:?} have no closed horizon around {position}"
        );
        let seam = seam?;
        debug!(visible = visible.len(), seam = seam.len(), "integrating point");

        for &face in &visible {
            callback.face_will_be_deleted(self, face);
        }
        self.remove_visible_faces(&visible, &seam);

        let apex = self.add_vertex(position);
        self.weave_cone(&seam, apex, callback);

        let touched = self.merge_coplanar_faces_around(apex, callback);
        for vertex in touched {
            if vertex != apex && self.store.vertices.contains_key(vertex) {
                self.merge_colinear_edges(vertex);
            }
        }

        self.store.vertices.contains_key(apex).then_some(apex)
    }

    /// True if `face` must be replaced to take in `position`: the point is
    /// above its plane, or in its plane but outside its boundary.
    fn sees_face(&self, face: FaceId, position: &Point3d, callback: &dyn Callback) -> bool {
        let plane = callback.plane(self, face);
        match plane.point_status(position, self.tolerance().point_status) {
            PointStatus::Above => true,
            PointStatus::Below => false,
            PointStatus::Inside => !self.polygon_contains(face, &plane, position),
        }
    }

    /// The horizon between `visible` and the remaining faces as a closed
    /// chain of half-edges belonging to the visible faces.
    fn find_seam(&self, visible: &[FaceId]) -> Option<Vec<HalfEdgeId>> {
        let visible_set: HashSet<FaceId> = visible.iter().copied().collect();
        let mut by_origin: SecondaryMap<VertexId, HalfEdgeId> = SecondaryMap::new();
        let mut count = 0;
        for &face in visible {
            for half_edge in self.store.boundary(face) {
                let hidden = self
                    .store
                    .neighbour(half_edge)
                    .is_some_and(|neighbour| !visible_set.contains(&neighbour));
                if !hidden {
                    continue;
                }
                if by_origin.insert(self.store.origin(half_edge), half_edge).is_some() {
                    warn!(?half_edge, "seam passes through a vertex twice");
                    return None;
                }
                count += 1;
            }
        }

        let (_, &first) = by_origin.iter().next()?;
        let mut seam = Vec::with_capacity(count);
        let mut current = first;
        loop {
            seam.push(current);
            let Some(&next) = by_origin.get(self.store.destination(current)) else {
                warn!(?current, "seam is not closed");
                return None;
            };
            if next == first || seam.len() > count {
                break;
            }
            current = next;
        }
        if seam.len() != count {
            warn!(found = seam.len(), expected = count, "seam is not a single loop");
            return None;
        }
        Some(seam)
    }

    /// Delete `visible` and everything only they use, keeping the `seam`
    /// half-edges (detached) and their edges.
    fn remove_visible_faces(&mut self, visible: &[FaceId], seam: &[HalfEdgeId]) {
        let seam_set: HashSet<HalfEdgeId> = seam.iter().copied().collect();
        let seam_vertices: HashSet<VertexId> = seam.iter().map(|&h| self.store.origin(h)).collect();
        let mut doomed_edges: HashSet<EdgeId> = HashSet::new();
        let mut doomed_vertices: HashSet<VertexId> = HashSet::new();

        for &face in visible {
            for half_edge in self.store.boundary(face) {
                if seam_set.contains(&half_edge) {
                    self.store.remove_from_boundary(face, half_edge);
                    continue;
                }
                let h = &self.store.half_edges[half_edge];
                if !seam_vertices.contains(&h.origin) {
                    doomed_vertices.insert(h.origin);
                }
                doomed_edges.extend(h.edge);
                self.store.remove_from_boundary(face, half_edge);
                self.remove_half_edge(half_edge);
            }
            self.remove_face(face);
        }
        for edge in doomed_edges {
            self.remove_edge(edge);
        }
        for vertex in doomed_vertices {
            self.remove_vertex(vertex);
        }
    }

    /// Merge faces around `apex` into coplanar neighbours until none are
    /// left. Returns the vertices whose surroundings changed.
    fn merge_coplanar_faces_around(&mut self, apex: VertexId, callback: &mut dyn Callback) -> Vec<VertexId> {
        let mut touched = Vec::new();
        'search: loop {
            for face in self.face_ids() {
                if !self.face_vertices(face).contains(&apex) {
                    continue;
                }
                for half_edge in self.store.boundary(face) {
                    let Some(neighbour) = self.store.neighbour(half_edge) else {
                        continue;
                    };
                    if neighbour != face && self.faces_coplanar(face, neighbour) {
                        if let Some((u, w)) = self.merge_faces(neighbour, face, callback) {
                            touched.push(u);
                            touched.push(w);
                            continue 'search;
                        }
                    }
                }
            }
            break;
        }
        touched
    }

    /// Absorb `to_delete` into `remaining`. The faces must share one
    /// contiguous chain of edges. Returns the end points of that chain.
    fn merge_faces(
        &mut self,
        remaining: FaceId,
        to_delete: FaceId,
        callback: &mut dyn Callback,
    ) -> Option<(VertexId, VertexId)> {
        let kept_of_remaining = self.unshared_run(remaining, to_delete)?;
        let kept_of_deleted = self.unshared_run(to_delete, remaining)?;

        let first_kept = kept_of_deleted[0];
        let last_kept = kept_of_deleted[kept_of_deleted.len() - 1];
        let mut shared = Vec::new();
        let mut current = self.store.next(last_kept);
        while current != first_kept {
            shared.push(current);
            current = self.store.next(current);
        }
        let start = self.store.origin(first_kept);
        let end = self.store.destination(last_kept);

        callback.faces_will_be_merged(self, remaining, to_delete);

        // Interior vertices of the shared chain only touch these two faces.
        let interior: Vec<VertexId> = shared[1..].iter().map(|&h| self.store.origin(h)).collect();
        for half_edge in shared {
            let twin = self.store.twin(half_edge);
            if let Some(edge) = self.store.half_edges[half_edge].edge {
                self.remove_edge(edge);
            }
            self.remove_half_edge(half_edge);
            if let Some(twin) = twin {
                self.remove_half_edge(twin);
            }
        }
        for vertex in interior {
            self.remove_vertex(vertex);
        }

        self.store.faces[remaining].boundary.clear();
        self.store.faces[to_delete].boundary.clear();
        for half_edge in kept_of_remaining.into_iter().chain(kept_of_deleted) {
            self.store.append_to_boundary(remaining, half_edge);
        }
        self.remove_face(to_delete);
        debug!(?remaining, ?to_delete, "merged coplanar faces");
        Some((start, end))
    }

    /// The boundary half-edges of `face` not shared with `other`, in ring
    /// order, or `None` if they do not form a single run.
    fn unshared_run(&self, face: FaceId, other: FaceId) -> Option<Vec<HalfEdgeId>> {
        let boundary = self.store.boundary(face);
        let shared: Vec<bool> = boundary
            .iter()
            .map(|&h| self.store.neighbour(h) == Some(other))
            .collect();
        let n = boundary.len();
        let starts: Vec<usize> = (0..n)
            .filter(|&i| !shared[i] && shared[(i + n - 1) % n])
            .collect();
        let [start] = starts.as_slice() else {
            warn!(?face, ?other, "faces do not share a single chain");
            return None;
        };
        Some(
            (0..n)
                .map(|k| (start + k) % n)
                .take_while(|&i| !shared[i])
                .map(|i| boundary[i])
                .collect(),
        )
    }

    /// Dissolve `vertex` if it has exactly two edges and they are colinear.
    fn merge_colinear_edges(&mut self, vertex: VertexId) {
        let outgoing = self.store.outgoing(vertex);
        let [o1, o2] = outgoing.as_slice() else {
            return;
        };
        let (o1, o2) = (*o1, *o2);
        let Some(i1) = self.store.twin(o1) else {
            return;
        };
        let y = self.store.destination(o1);
        let x = self.store.destination(o2);
        if !colinear(
            &self.store.position(x),
            &self.store.position(y),
            &self.store.position(vertex),
            self.tolerance().colinear,
        ) {
            return;
        }
        let (Some(face_a), Some(face_b)) = (self.store.half_edges[o1].face, self.store.half_edges[o2].face) else {
            return;
        };
        let (Some(kept_edge), Some(dropped_edge)) = (self.store.half_edges[o2].edge, self.store.half_edges[o1].edge)
        else {
            return;
        };

        // The twin of o2 now runs x -> y in face A, i1 runs y -> x in face B.
        self.store.remove_from_boundary(face_a, o1);
        self.store.remove_from_boundary(face_b, o2);
        self.store.replace_half_edge(kept_edge, o2, i1);
        self.remove_edge(dropped_edge);
        self.remove_half_edge(o1);
        self.remove_half_edge(o2);
        self.remove_vertex(vertex);
        debug!(?vertex, "dissolved colinear vertex");
    }
}
