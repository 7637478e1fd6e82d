//! # Circulators
//!
//! Circulators provide iterator-based traversal of adjacent mesh elements.
//! Both base circulators stop after `n_halfedges` steps so that a corrupted
//! loop can never spin forever.

use crate::connectivity::HalfedgeMesh;
use crate::handles::{FaceHandle, HalfedgeHandle, VertexHandle};

/// Vertex-Halfedge Circulator: outgoing halfedges around a vertex, in
/// `opposite -> next` sweep order starting at the vertex's designated halfedge
pub struct VertexHalfedgeIter<'a> {
    mesh: &'a HalfedgeMesh,
    start_heh: HalfedgeHandle,
    current_heh: HalfedgeHandle,
    remaining: usize,
    first: bool,
}

impl<'a> Iterator for VertexHalfedgeIter<'a> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || (!self.first && self.current_heh == self.start_heh) {
            return None;
        }
        self.first = false;
        self.remaining -= 1;

        let heh = self.current_heh;
        let incoming = self.mesh.opposite_halfedge_handle(heh);
        self.current_heh = self.mesh.next_halfedge_handle(incoming);
        Some(heh)
    }
}

/// Face-Halfedge Circulator: halfedges around a face loop in winding order
pub struct FaceHalfedgeIter<'a> {
    mesh: &'a HalfedgeMesh,
    start_heh: HalfedgeHandle,
    current_heh: HalfedgeHandle,
    remaining: usize,
    first: bool,
}

impl<'a> Iterator for FaceHalfedgeIter<'a> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || (!self.first && self.current_heh == self.start_heh) {
            return None;
        }
        self.first = false;
        self.remaining -= 1;

        let heh = self.current_heh;
        self.current_heh = self.mesh.next_halfedge_handle(heh);
        Some(heh)
    }
}

impl HalfedgeMesh {
    /// Circulate the outgoing halfedges of a vertex starting from `start`
    pub fn halfedge_fan(&self, start: HalfedgeHandle) -> VertexHalfedgeIter<'_> {
        VertexHalfedgeIter {
            mesh: self,
            start_heh: start,
            current_heh: start,
            remaining: self.n_halfedges(),
            first: true,
        }
    }

    /// Circulate a face loop starting from `start`
    pub fn halfedge_loop(&self, start: HalfedgeHandle) -> FaceHalfedgeIter<'_> {
        FaceHalfedgeIter {
            mesh: self,
            start_heh: start,
            current_heh: start,
            remaining: self.n_halfedges(),
            first: true,
        }
    }

    /// Outgoing halfedges of a vertex
    pub fn vertex_halfedges(&self, vh: VertexHandle) -> VertexHalfedgeIter<'_> {
        self.halfedge_fan(self.halfedge_handle(vh))
    }

    /// Vertices adjacent to a vertex (1-ring)
    pub fn vertex_vertices(&self, vh: VertexHandle) -> impl Iterator<Item = VertexHandle> + '_ {
        self.vertex_halfedges(vh).map(move |heh| self.to_vertex_handle(heh))
    }

    /// Faces around a vertex, boundary loops included
    pub fn vertex_faces(&self, vh: VertexHandle) -> impl Iterator<Item = FaceHandle> + '_ {
        self.vertex_halfedges(vh).map(move |heh| self.face_handle(heh))
    }

    /// Halfedges of a face in winding order
    pub fn face_halfedges(&self, fh: FaceHandle) -> FaceHalfedgeIter<'_> {
        self.halfedge_loop(self.face_halfedge_handle(fh))
    }

    /// Vertices of a face in winding order
    pub fn face_vertices(&self, fh: FaceHandle) -> impl Iterator<Item = VertexHandle> + '_ {
        self.face_halfedges(fh).map(move |heh| self.from_vertex_handle(heh))
    }

    /// Faces across the edges of a face
    pub fn face_faces(&self, fh: FaceHandle) -> impl Iterator<Item = FaceHandle> + '_ {
        self.face_halfedges(fh)
            .map(move |heh| self.face_handle(self.opposite_halfedge_handle(heh)))
    }
}
