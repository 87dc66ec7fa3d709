//! Half-edge topology over an indexed triangle mesh.
//!
//! Index-based arena storage: half-edges, faces and per-vertex outgoing
//! lists are plain vectors addressed by `u32` ids. Splitting an edge appends
//! new records; collapsing one tombstones records in place, so ids stay
//! stable for the lifetime of the structure. [`HalfEdgeMesh::reconstruct`]
//! reads the surviving faces back into an index buffer.
//!
//! The structure only stores connectivity; positions and normals live in
//! [`Mesh`](crate::types::Mesh) and are indexed by the same vertex ids.

use std::collections::HashMap;

/// Index into the half-edge arena.
pub type HalfEdgeId = u32;
/// Index into the mesh vertex arrays.
pub type VertexId = u32;
/// Index into the face table.
pub type FaceId = u32;

/// A directed edge bordering one triangle.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Vertex this half-edge starts at.
    pub origin: VertexId,
    /// Next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId,
    /// Opposite half-edge, `None` on a boundary or non-manifold edge.
    pub twin: Option<HalfEdgeId>,
    pub face: FaceId,
    pub alive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    half_edges: Vec<HalfEdge>,
    /// One half-edge of each face, `None` once the face is removed.
    faces: Vec<Option<HalfEdgeId>>,
    /// Live outgoing half-edges per vertex.
    outgoing: Vec<Vec<HalfEdgeId>>,
}

impl HalfEdgeMesh {
    /// Build from a triangle index buffer.
    ///
    /// Directed edges `(a, b)` and `(b, a)` become twins when each occurs
    /// exactly once; anything else is left as boundary.
    pub fn from_indices(indices: &[u32], vertex_count: usize) -> Self {
        let num_faces = indices.len() / 3;
        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(num_faces * 3);
        let mut faces = Vec::with_capacity(num_faces);
        let mut outgoing = vec![Vec::new(); vertex_count];

        // Directed edge (from, to) -> half-edges carrying it.
        let mut edge_map: HashMap<(VertexId, VertexId), Vec<HalfEdgeId>> = HashMap::new();

        for (fi, tri) in indices.chunks_exact(3).enumerate() {
            let base = half_edges.len() as HalfEdgeId;
            for i in 0..3u32 {
                let from = tri[i as usize];
                let to = tri[((i + 1) % 3) as usize];
                let id = base + i;
                half_edges.push(HalfEdge {
                    origin: from,
                    next: base + (i + 1) % 3,
                    twin: None,
                    face: fi as FaceId,
                    alive: true,
                });
                outgoing[from as usize].push(id);
                edge_map.entry((from, to)).or_default().push(id);
            }
            faces.push(Some(base));
        }

        for (&(from, to), ids) in &edge_map {
            if ids.len() != 1 {
                continue;
            }
            if let Some(rev) = edge_map.get(&(to, from)) {
                if rev.len() == 1 {
                    half_edges[ids[0] as usize].twin = Some(rev[0]);
                }
            }
        }

        Self { half_edges, faces, outgoing }
    }

    /// Number of half-edge slots, dead ones included.
    pub fn len(&self) -> usize {
        self.half_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }

    /// Number of live faces.
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_alive(&self, he: HalfEdgeId) -> bool {
        self.half_edges.get(he as usize).is_some_and(|h| h.alive)
    }

    pub fn half_edge(&self, he: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[he as usize]
    }

    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.half_edges[he as usize].origin
    }

    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[he as usize].next
    }

    /// Previous half-edge around the (triangular) face.
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.next(self.next(he))
    }

    pub fn twin(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edges[he as usize].twin
    }

    pub fn target(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.next(he))
    }

    /// A vertex is on the boundary when any edge touching it lacks a twin.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.outgoing
            .get(v as usize)
            .is_some_and(|out| {
                out.iter().any(|&he| self.twin(he).is_none() || self.twin(self.prev(he)).is_none())
            })
    }

    /// Sorted, de-duplicated one-ring of `v`.
    pub fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let Some(out) = self.outgoing.get(v as usize) else {
            return Vec::new();
        };
        let mut ring: Vec<VertexId> = out
            .iter()
            .flat_map(|&he| [self.target(he), self.origin(self.prev(he))])
            .collect();
        ring.sort_unstable();
        ring.dedup();
        ring
    }

    fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.half_edges[a as usize].twin = Some(b);
        self.half_edges[b as usize].twin = Some(a);
    }

    fn push_half_edge(&mut self, origin: VertexId, face: FaceId) -> HalfEdgeId {
        let id = self.half_edges.len() as HalfEdgeId;
        self.half_edges.push(HalfEdge {
            origin,
            next: id,
            twin: None,
            face,
            alive: true,
        });
        if self.outgoing.len() <= origin as usize {
            self.outgoing.resize(origin as usize + 1, Vec::new());
        }
        self.outgoing[origin as usize].push(id);
        id
    }

    /// Split the face on the other side of `he` by the new vertex `v`.
    /// `he` runs `a -> b`, `v` lies on it. Returns `(v -> a, b -> v)`.
    fn split_side(&mut self, he: HalfEdgeId, v: VertexId) -> (HalfEdgeId, HalfEdgeId) {
        // Face (a, b, c) becomes (a, v, c) + new face (v, b, c).
        let he1 = self.next(he);
        let he2 = self.next(he1);
        let c = self.origin(he2);
        let f1 = self.half_edges[he as usize].face;
        let f2 = self.faces.len() as FaceId;

        let he_x = self.push_half_edge(v, f1); // v -> c
        let he_y = self.push_half_edge(v, f2); // v -> b
        let he_z = self.push_half_edge(c, f2); // c -> v

        self.half_edges[he as usize].next = he_x;
        self.half_edges[he_x as usize].next = he2;

        self.half_edges[he_y as usize].next = he1;
        self.half_edges[he1 as usize].next = he_z;
        self.half_edges[he1 as usize].face = f2;
        self.half_edges[he_z as usize].next = he_y;

        self.link(he_x, he_z);
        self.faces[f1 as usize] = Some(he);
        self.faces.push(Some(he_y));

        (he_y, he)
    }

    /// Insert vertex `v` on the edge carried by `he`, splitting the face on
    /// each side into two.
    ///
    /// # Panics
    /// If `he` is out of range or dead.
    pub fn split_edge(&mut self, he: HalfEdgeId, v: VertexId) {
        assert!(self.is_alive(he), "split of dead half-edge {he}");
        let twin = self.twin(he);

        // he: a -> v after the split, he_y: v -> b.
        let (he_y, he) = self.split_side(he, v);

        if let Some(t) = twin {
            // t: b -> v after the split, t_y: v -> a.
            let (t_y, t) = self.split_side(t, v);
            self.link(he, t_y);
            self.link(he_y, t);
        }
    }

    /// Collapse `he` (`a -> b`) by merging `b` into `a`. The two faces
    /// adjacent to the edge disappear.
    ///
    /// Returns `false` and leaves the mesh untouched when the collapse would
    /// break the structure: dead or boundary edge, an endpoint on the
    /// boundary, or a one-ring overlap other than the two opposite vertices.
    ///
    /// # Panics
    /// If `he` is out of range.
    pub fn collapse_edge(&mut self, he: HalfEdgeId) -> bool {
        assert!((he as usize) < self.half_edges.len(), "collapse of unknown half-edge {he}");
        if !self.half_edges[he as usize].alive {
            return false;
        }
        let Some(t) = self.twin(he) else {
            return false;
        };
        let a = self.origin(he);
        let b = self.target(he);
        if a == b || self.is_boundary_vertex(a) || self.is_boundary_vertex(b) {
            return false;
        }

        let n1 = self.next(he); // b -> c
        let p1 = self.next(n1); // c -> a
        let n2 = self.next(t); // a -> d
        let p2 = self.next(n2); // d -> b
        let c = self.origin(p1);
        let d = self.origin(p2);
        if c == d {
            return false;
        }

        // Link condition.
        let ring_b = self.neighbors(b);
        let common: Vec<VertexId> = self
            .neighbors(a)
            .into_iter()
            .filter(|v| ring_b.binary_search(v).is_ok())
            .collect();
        let mut expected = [c, d];
        expected.sort_unstable();
        if common != expected {
            return false;
        }

        let (Some(tn1), Some(tp1), Some(tn2), Some(tp2)) =
            (self.twin(n1), self.twin(p1), self.twin(n2), self.twin(p2))
        else {
            return false;
        };

        self.link(tn1, tp1);
        self.link(tn2, tp2);

        for dead in [he, n1, p1, t, n2, p2] {
            let h = &mut self.half_edges[dead as usize];
            h.alive = false;
            h.twin = None;
            let face = h.face;
            self.faces[face as usize] = None;
        }
        for v in [a, b, c, d] {
            let half_edges = &self.half_edges;
            self.outgoing[v as usize].retain(|&e| half_edges[e as usize].alive);
        }

        let moved = std::mem::take(&mut self.outgoing[b as usize]);
        for &e in &moved {
            self.half_edges[e as usize].origin = a;
        }
        self.outgoing[a as usize].extend(moved);
        true
    }

    /// Index buffer of all live faces. Faces whose corners coincide are
    /// skipped.
    pub fn reconstruct(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.faces.len() * 3);
        for &anchor in self.faces.iter().flatten() {
            let e1 = self.next(anchor);
            let e2 = self.next(e1);
            let (v0, v1, v2) = (self.origin(anchor), self.origin(e1), self.origin(e2));
            if v0 == v1 || v1 == v2 || v2 == v0 {
                continue;
            }
            indices.extend_from_slice(&[v0, v1, v2]);
        }
        indices
    }

    /// Structural self-check: every live half-edge sits in a closed
    /// three-cycle of live half-edges and twins are mutual and reversed.
    pub fn is_consistent(&self) -> bool {
        self.half_edges.iter().enumerate().all(|(i, h)| {
            if !h.alive {
                return true;
            }
            let id = i as HalfEdgeId;
            let e1 = h.next;
            let e2 = self.next(e1);
            let cycle = self.is_alive(e1) && self.is_alive(e2) && self.next(e2) == id;
            let twin_ok = match h.twin {
                None => true,
                Some(t) => {
                    self.is_alive(t)
                        && self.twin(t) == Some(id)
                        && self.origin(t) == self.target(id)
                        && self.target(t) == h.origin
                }
            };
            let face_ok = self.faces[h.face as usize].is_some()
                && self.half_edges[e1 as usize].face == h.face;
            cycle && twin_ok && face_ok
        })
    }
}
