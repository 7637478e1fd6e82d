//! # Edge operations
//!
//! Edge flip and edge split.

use log::trace;

use crate::connectivity::HalfedgeMesh;
use crate::handles::{EdgeHandle, VertexHandle};

impl HalfedgeMesh {
    /// Rotate an interior edge one step forward inside the polygon formed by
    /// its two faces. Vertex, edge and face counts are unchanged; the same
    /// edge handle is returned.
    ///
    /// Refused on boundary edges, on edges with the same face on both sides,
    /// when an endpoint has fewer than three edges and when the rotated edge
    /// already exists.
    pub fn flip_edge(&mut self, eh: EdgeHandle) -> Option<EdgeHandle> {
        if !self.is_valid_edge(eh) {
            trace!("flip_edge: stale edge");
            return None;
        }
        if self.edge_on_boundary(eh) {
            trace!("flip_edge: boundary edge");
            return None;
        }

        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.next_halfedge_handle(h0);
        let h2 = self.prev_halfedge_handle(h0);
        let h3 = self.opposite_halfedge_handle(h0);
        let h4 = self.next_halfedge_handle(h3);
        let h5 = self.prev_halfedge_handle(h3);
        let h10 = self.next_halfedge_handle(h1);
        let h11 = self.next_halfedge_handle(h4);

        let v0 = self.from_vertex_handle(h0);
        let v1 = self.from_vertex_handle(h3);
        let v2 = self.from_vertex_handle(h11);
        let v3 = self.from_vertex_handle(h10);
        let f0 = self.face_handle(h0);
        let f1 = self.face_handle(h3);

        if f0 == f1 {
            trace!("flip_edge: edge bridges one face");
            return None;
        }
        if self.vertex_degree(v0) < 3 || self.vertex_degree(v1) < 3 {
            trace!("flip_edge: endpoint would be left dangling");
            return None;
        }
        if v2 == v3 || self.find_halfedge(v2, v3).is_some() {
            trace!("flip_edge: rotated edge already exists");
            return None;
        }

        // f0: v2 -> v3 -> ... -> v0 -> v2, f1: v3 -> v2 -> ... -> v1 -> v3
        self.h_mut(h0).next_halfedge_handle = h10;
        self.h_mut(h1).next_halfedge_handle = h3;
        self.h_mut(h3).next_halfedge_handle = h11;
        self.h_mut(h4).next_halfedge_handle = h0;
        self.h_mut(h5).next_halfedge_handle = h1;
        self.h_mut(h2).next_halfedge_handle = h4;

        self.h_mut(h1).face_handle = f1;
        self.h_mut(h4).face_handle = f0;
        self.h_mut(h0).vertex_handle = v2;
        self.h_mut(h3).vertex_handle = v3;

        self.v_mut(v0).halfedge_handle = h4;
        self.v_mut(v1).halfedge_handle = h1;
        self.f_mut(f0).halfedge_handle = h0;
        self.f_mut(f1).halfedge_handle = h3;

        for vh in [v0, v1, v2, v3] {
            self.canonicalize_vertex_halfedge(vh);
        }
        Some(eh)
    }

    /// Split an edge at its midpoint and connect the new vertex to the apex
    /// of each adjacent triangle. Returns the new vertex.
    ///
    /// An interior edge needs two triangles; a boundary edge needs its one
    /// interior face to be a triangle. Every refusal happens before the mesh
    /// is touched.
    pub fn split_edge(&mut self, eh: EdgeHandle) -> Option<VertexHandle> {
        if !self.is_valid_edge(eh) {
            trace!("split_edge: stale edge");
            return None;
        }

        let h = self.edge_halfedge_handle(eh);
        let t = self.opposite_halfedge_handle(h);
        let sides = [h, t];
        if sides.iter().all(|&s| self.is_boundary_halfedge(s)) {
            return None;
        }
        let triangles = sides
            .iter()
            .all(|&s| self.is_boundary_halfedge(s) || self.face_degree(self.face_handle(s)) == 3);
        if !triangles {
            trace!("split_edge: adjacent faces are not triangles");
            return None;
        }
        if self.face_handle(h) == self.face_handle(t) {
            trace!("split_edge: edge bridges one face");
            return None;
        }

        let (v0, v1) = self.edge_vertices(eh);
        let m = self.insert_vertex(eh, self.edge_center(eh))?;

        // h0: v0 -> m, h4: m -> v1 in f0; h2: v1 -> m, h5: m -> v0 in f1
        let h0 = self.edge_halfedge_handle(eh);
        let h4 = self.next_halfedge_handle(h0);
        let h5 = self.opposite_halfedge_handle(h0);
        let h2 = self.opposite_halfedge_handle(h4);

        if !self.is_boundary_halfedge(h0) {
            let to_apex = self.prev_halfedge_handle(h0);
            self.connect_vertex(h4, to_apex)?;
        }
        if !self.is_boundary_halfedge(h5) {
            let to_apex = self.prev_halfedge_handle(h2);
            self.connect_vertex(h5, to_apex)?;
        }

        self.v_mut(m).halfedge_handle = h4;
        for vh in [m, v0, v1] {
            self.canonicalize_vertex_halfedge(vh);
        }
        Some(m)
    }
}
