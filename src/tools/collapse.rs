//! # Collapse
//!
//! Edge and face collapse. Both re-origin every surviving halfedge of the
//! merged vertices at one new vertex, splice the collapsed halfedges out of
//! their faces, and dissolve faces that shrink to two sides.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::connectivity::HalfedgeMesh;
use crate::handles::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};

impl HalfedgeMesh {
    /// Minimum degree a vertex may be left with: interior vertices need three
    /// incident triangles, boundary vertices two edges.
    fn min_degree(&self, vh: VertexHandle) -> usize {
        if self.vertex_on_boundary(vh) {
            2
        } else {
            3
        }
    }

    /// True if collapsing `eh` keeps the mesh manifold.
    ///
    /// Refused: stale or boundary edges, spokes (one face on both sides),
    /// edges joining two boundary vertices, endpoints joined by a second edge,
    /// endpoints sharing a neighbour that is not the apex of an adjacent
    /// triangle (link condition), and collapses that would leave the merged
    /// vertex or an apex with too few edges.
    pub fn is_collapse_ok(&self, eh: EdgeHandle) -> bool {
        if !self.is_valid_edge(eh) || self.edge_on_boundary(eh) {
            return false;
        }

        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.opposite_halfedge_handle(h0);
        if self.face_handle(h0) == self.face_handle(h1) {
            return false;
        }
        let (v0, v1) = (self.from_vertex_handle(h0), self.to_vertex_handle(h0));
        if self.vertex_degree(v0) < 2 || self.vertex_degree(v1) < 2 {
            return false;
        }
        if self.vertex_on_boundary(v0) && self.vertex_on_boundary(v1) {
            return false;
        }
        // a parallel edge would become a loop at the merged vertex
        if self.vertex_halfedges(v0).filter(|&h| self.to_vertex_handle(h) == v1).count() > 1 {
            return false;
        }

        let apexes: Vec<VertexHandle> = [h0, h1]
            .into_iter()
            .filter(|&h| self.face_degree(self.face_handle(h)) == 3)
            .map(|h| self.to_vertex_handle(self.next_halfedge_handle(h)))
            .collect();

        let ring0: HashSet<VertexHandle> = self.vertex_vertices(v0).collect();
        let shared = self
            .vertex_vertices(v1)
            .filter(|n| ring0.contains(n))
            .count();
        if shared != apexes.len() || apexes.iter().any(|a| !ring0.contains(a)) {
            return false;
        }
        if apexes.len() == 2 && apexes[0] == apexes[1] {
            return false;
        }

        if apexes
            .iter()
            .any(|&a| self.vertex_degree(a) <= self.min_degree(a))
        {
            return false;
        }

        let merged_degree =
            (self.vertex_degree(v0) + self.vertex_degree(v1)).saturating_sub(2 + apexes.len());
        merged_degree >= 3
    }

    /// Collapse an edge into a new vertex at its midpoint. Returns the new
    /// vertex; both endpoints, the edge and any face left with two sides are
    /// tombstoned.
    pub fn collapse_edge(&mut self, eh: EdgeHandle) -> Option<VertexHandle> {
        if !self.is_collapse_ok(eh) {
            trace!("collapse_edge: refused");
            return None;
        }

        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.opposite_halfedge_handle(h0);
        let v0 = self.from_vertex_handle(h0);
        let v1 = self.from_vertex_handle(h1);
        let f0 = self.face_handle(h0);
        let f1 = self.face_handle(h1);

        let outgoing: Vec<HalfedgeHandle> = self
            .vertex_halfedges(v0)
            .chain(self.vertex_halfedges(v1))
            .filter(|&h| h != h0 && h != h1)
            .collect();
        let p0 = self.prev_halfedge_handle(h0);
        let n0 = self.next_halfedge_handle(h0);
        let p1 = self.prev_halfedge_handle(h1);
        let n1 = self.next_halfedge_handle(h1);

        let m = self.kernel.new_vertex(self.edge_center(eh));
        for &heh in &outgoing {
            self.h_mut(heh).vertex_handle = m;
        }
        self.h_mut(p0).next_halfedge_handle = n0;
        self.h_mut(p1).next_halfedge_handle = n1;
        self.f_mut(f0).halfedge_handle = n0;
        self.f_mut(f1).halfedge_handle = n1;

        let mut apexes = Vec::new();
        for fh in [f0, f1] {
            if self.face_degree(fh) == 2 {
                apexes.push(self.dissolve_digon(fh, m));
            }
        }

        self.kernel.delete_vertex(v0);
        self.kernel.delete_vertex(v1);
        self.kernel.delete_halfedge(h0);
        self.kernel.delete_halfedge(h1);
        self.kernel.delete_edge(eh);

        self.finish_merge(m, &outgoing, &apexes);
        Some(m)
    }

    /// [`collapse_edge`](Self::collapse_edge) followed by `do_erase`, so the
    /// removed elements are gone when it returns.
    pub fn collapse_edge_erase(&mut self, eh: EdgeHandle) -> Option<VertexHandle> {
        let m = self.collapse_edge(eh)?;
        self.do_erase();
        Some(m)
    }

    /// Collapse a face into a new vertex at its centroid. Returns the new vertex.
    ///
    /// Refused for boundary faces, faces touching the boundary along an edge,
    /// faces bordering one neighbour along two edges, faces with a chord
    /// (two non-consecutive corners already joined by an edge), corners joined
    /// to one neighbour by two edges, and when the result would not be
    /// manifold.
    pub fn collapse_face(&mut self, fh: FaceHandle) -> Option<VertexHandle> {
        if !self.is_valid_face(fh) || self.is_boundary_face(fh) {
            trace!("collapse_face: stale or boundary face");
            return None;
        }
        if !self.is_face_collapse_ok(fh) {
            trace!("collapse_face: refused");
            return None;
        }

        let hs: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
        let twins: Vec<HalfedgeHandle> = hs.iter().map(|&h| self.opposite_halfedge_handle(h)).collect();
        let corners: Vec<VertexHandle> = hs.iter().map(|&h| self.from_vertex_handle(h)).collect();

        let removed: HashSet<HalfedgeHandle> = hs.iter().chain(&twins).copied().collect();
        let outgoing: Vec<HalfedgeHandle> = corners
            .iter()
            .flat_map(|&v| self.vertex_halfedges(v).collect::<Vec<_>>())
            .filter(|h| !removed.contains(h))
            .collect();
        let splices: Vec<(HalfedgeHandle, HalfedgeHandle, FaceHandle)> = twins
            .iter()
            .map(|&t| {
                (
                    self.prev_halfedge_handle(t),
                    self.next_halfedge_handle(t),
                    self.face_handle(t),
                )
            })
            .collect();

        let m = self.kernel.new_vertex(self.face_center(fh));
        for &heh in &outgoing {
            self.h_mut(heh).vertex_handle = m;
        }
        for &(prev, next, nf) in &splices {
            self.h_mut(prev).next_halfedge_handle = next;
            self.f_mut(nf).halfedge_handle = next;
        }

        let mut apexes = Vec::new();
        for &(_, _, nf) in &splices {
            if self.face_degree(nf) == 2 {
                apexes.push(self.dissolve_digon(nf, m));
            }
        }

        for (&h, &t) in hs.iter().zip(&twins) {
            self.kernel.delete_edge(self.edge_handle(h));
            self.kernel.delete_halfedge(h);
            self.kernel.delete_halfedge(t);
        }
        for &v in &corners {
            self.kernel.delete_vertex(v);
        }
        self.kernel.delete_face(fh);

        self.finish_merge(m, &outgoing, &apexes);
        Some(m)
    }

    fn is_face_collapse_ok(&self, fh: FaceHandle) -> bool {
        let hs: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
        let corners: Vec<VertexHandle> = hs.iter().map(|&h| self.from_vertex_handle(h)).collect();
        let n = corners.len();

        let mut neighbours = HashSet::new();
        let mut apexes = HashSet::new();
        for &h in &hs {
            let t = self.opposite_halfedge_handle(h);
            let nf = self.face_handle(t);
            if self.is_boundary_face(nf) || !neighbours.insert(nf) {
                return false;
            }
            if self.face_degree(nf) == 3 {
                let apex = self.to_vertex_handle(self.next_halfedge_handle(t));
                if self.vertex_degree(apex) <= self.min_degree(apex) || !apexes.insert(apex) {
                    return false;
                }
            }
        }

        let corner_set: HashSet<VertexHandle> = corners.iter().copied().collect();
        if corner_set.len() != n {
            return false;
        }
        // two boundary fans cannot meet in one vertex
        if corners.iter().filter(|&&v| self.vertex_on_boundary(v)).count() > 1 {
            return false;
        }
        let mut touches: HashMap<VertexHandle, usize> = HashMap::new();
        for (i, &v) in corners.iter().enumerate() {
            let mut seen = HashSet::new();
            for w in self.vertex_vertices(v) {
                if !seen.insert(w) {
                    return false;
                }
                if corner_set.contains(&w) {
                    // only the two loop neighbours may be adjacent
                    if w != corners[(i + 1) % n] && w != corners[(i + n - 1) % n] {
                        return false;
                    }
                } else {
                    *touches.entry(w).or_default() += 1;
                }
            }
        }
        for (w, count) in touches {
            if count > 2 || (count == 2 && !apexes.contains(&w)) {
                return false;
            }
        }

        let merged_degree: usize = corners
            .iter()
            .map(|&v| self.vertex_degree(v).saturating_sub(2))
            .sum::<usize>()
            .saturating_sub(apexes.len());
        merged_degree >= 3
    }

    /// Remove a face that has shrunk to two sides `x -> m -> x`, merging its
    /// two edges into one. Returns the far vertex `x`.
    pub(crate) fn dissolve_digon(&mut self, fh: FaceHandle, m: VertexHandle) -> VertexHandle {
        let a = self.face_halfedge_handle(fh);
        let b = self.next_halfedge_handle(a);
        // `inner` leaves the merged vertex, `outer` returns to it
        let (outer, inner) = if self.from_vertex_handle(a) == m { (b, a) } else { (a, b) };
        let x = self.from_vertex_handle(outer);
        let keep = self.edge_handle(outer);
        let drop = self.edge_handle(inner);
        let t_outer = self.opposite_halfedge_handle(outer);
        let t_inner = self.opposite_halfedge_handle(inner);

        self.h_mut(t_outer).opposite_halfedge_handle = t_inner;
        self.h_mut(t_inner).opposite_halfedge_handle = t_outer;
        self.h_mut(t_inner).edge_handle = keep;
        self.e_mut(keep).halfedge_handle = t_outer;
        if self.halfedge_handle(x) == outer {
            self.v_mut(x).halfedge_handle = t_inner;
        }

        self.kernel.delete_halfedge(outer);
        self.kernel.delete_halfedge(inner);
        self.kernel.delete_edge(drop);
        self.kernel.delete_face(fh);
        x
    }

    /// Pick the merged vertex's designated halfedge among the survivors and
    /// restore the boundary convention around the merge.
    fn finish_merge(&mut self, m: VertexHandle, outgoing: &[HalfedgeHandle], apexes: &[VertexHandle]) {
        if let Some(&heh) = outgoing.iter().find(|&&h| self.is_valid_halfedge(h)) {
            self.v_mut(m).halfedge_handle = heh;
        }
        self.canonicalize_vertex_halfedge(m);
        for &x in apexes {
            self.canonicalize_vertex_halfedge(x);
        }
    }
}
