//! # ArrayKernel
//!
//! Element store for the mesh: one slot-map container per element kind.
//! Slots are addressed by generational handles, so removing a record never
//! invalidates the handles of the records that remain.
//!
//! Erasure is two-phase. `delete_*` only sets the tombstone bit in the record's
//! status; the record keeps its links and can still be read. `do_erase` drops
//! every tombstoned record. Any traversal is only safe before the compaction of
//! the elements it touches.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use slotmap::SlotMap;

use crate::handles::{EdgeHandle, ElementHandle, FaceHandle, HalfedgeHandle, VertexHandle};
use crate::items::{Edge, Face, Halfedge, Vertex};

/// Source of element ids, shared by every element kind and every mesh.
static NEXT_ID: AtomicU32 = AtomicU32::new(0);

#[inline]
fn next_id() -> u32 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The ArrayKernel - core mesh storage
#[derive(Debug, Clone, Default)]
pub struct ArrayKernel {
    pub(crate) vertices: SlotMap<VertexHandle, Vertex>,
    pub(crate) halfedges: SlotMap<HalfedgeHandle, Halfedge>,
    pub(crate) edges: SlotMap<EdgeHandle, Edge>,
    pub(crate) faces: SlotMap<FaceHandle, Face>,
}

impl ArrayKernel {
    /// Create a new empty kernel
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.edges.clear();
        self.faces.clear();
    }

    // --- Allocation ---

    /// Allocate a vertex at the given position
    pub fn new_vertex(&mut self, point: Vec3) -> VertexHandle {
        self.vertices.insert(Vertex::new(point, next_id()))
    }

    /// Allocate an unlinked halfedge
    pub fn new_halfedge(&mut self) -> HalfedgeHandle {
        self.halfedges.insert(Halfedge::new(next_id()))
    }

    /// Allocate an edge with no halfedge yet
    pub fn new_edge(&mut self) -> EdgeHandle {
        self.edges.insert(Edge::new(next_id()))
    }

    /// Allocate a face; `boundary` marks it as a virtual boundary loop
    pub fn new_face(&mut self, boundary: bool) -> FaceHandle {
        self.faces.insert(Face::new(boundary, next_id()))
    }

    // --- Handle to item conversion ---

    /// Get a vertex by handle (const)
    #[inline]
    pub fn vertex(&self, vh: VertexHandle) -> Option<&Vertex> {
        self.vertices.get(vh)
    }

    /// Get a vertex by handle (mutable)
    #[inline]
    pub fn vertex_mut(&mut self, vh: VertexHandle) -> Option<&mut Vertex> {
        self.vertices.get_mut(vh)
    }

    /// Get a halfedge by handle (const)
    #[inline]
    pub fn halfedge(&self, heh: HalfedgeHandle) -> Option<&Halfedge> {
        self.halfedges.get(heh)
    }

    /// Get a halfedge by handle (mutable)
    #[inline]
    pub fn halfedge_mut(&mut self, heh: HalfedgeHandle) -> Option<&mut Halfedge> {
        self.halfedges.get_mut(heh)
    }

    /// Get an edge by handle (const)
    #[inline]
    pub fn edge(&self, eh: EdgeHandle) -> Option<&Edge> {
        self.edges.get(eh)
    }

    /// Get an edge by handle (mutable)
    #[inline]
    pub fn edge_mut(&mut self, eh: EdgeHandle) -> Option<&mut Edge> {
        self.edges.get_mut(eh)
    }

    /// Get a face by handle (const)
    #[inline]
    pub fn face(&self, fh: FaceHandle) -> Option<&Face> {
        self.faces.get(fh)
    }

    /// Get a face by handle (mutable)
    #[inline]
    pub fn face_mut(&mut self, fh: FaceHandle) -> Option<&mut Face> {
        self.faces.get_mut(fh)
    }

    // --- Liveness ---

    /// True if the vertex is allocated and not tombstoned
    #[inline]
    pub fn is_live_vertex(&self, vh: VertexHandle) -> bool {
        self.vertices.get(vh).is_some_and(|v| !v.status.is_deleted())
    }

    /// True if the halfedge is allocated and not tombstoned
    #[inline]
    pub fn is_live_halfedge(&self, heh: HalfedgeHandle) -> bool {
        self.halfedges.get(heh).is_some_and(|h| !h.status.is_deleted())
    }

    /// True if the edge is allocated and not tombstoned
    #[inline]
    pub fn is_live_edge(&self, eh: EdgeHandle) -> bool {
        self.edges.get(eh).is_some_and(|e| !e.status.is_deleted())
    }

    /// True if the face is allocated and not tombstoned
    #[inline]
    pub fn is_live_face(&self, fh: FaceHandle) -> bool {
        self.faces.get(fh).is_some_and(|f| !f.status.is_deleted())
    }

    /// True if the element is allocated and not tombstoned
    pub fn is_live(&self, elem: ElementHandle) -> bool {
        match elem {
            ElementHandle::Vertex(vh) => self.is_live_vertex(vh),
            ElementHandle::Edge(eh) => self.is_live_edge(eh),
            ElementHandle::Face(fh) => self.is_live_face(fh),
            ElementHandle::Halfedge(heh) => self.is_live_halfedge(heh),
        }
    }

    // --- Deferred erasure ---

    /// Tombstone a vertex
    pub fn delete_vertex(&mut self, vh: VertexHandle) {
        if let Some(v) = self.vertices.get_mut(vh) {
            v.status.set_deleted(true);
        }
    }

    /// Tombstone a halfedge
    pub fn delete_halfedge(&mut self, heh: HalfedgeHandle) {
        if let Some(h) = self.halfedges.get_mut(heh) {
            h.status.set_deleted(true);
        }
    }

    /// Tombstone an edge
    pub fn delete_edge(&mut self, eh: EdgeHandle) {
        if let Some(e) = self.edges.get_mut(eh) {
            e.status.set_deleted(true);
        }
    }

    /// Tombstone a face
    pub fn delete_face(&mut self, fh: FaceHandle) {
        if let Some(f) = self.faces.get_mut(fh) {
            f.status.set_deleted(true);
        }
    }

    /// Tombstone any element
    pub fn erase(&mut self, elem: ElementHandle) {
        match elem {
            ElementHandle::Vertex(vh) => self.delete_vertex(vh),
            ElementHandle::Edge(eh) => self.delete_edge(eh),
            ElementHandle::Face(fh) => self.delete_face(fh),
            ElementHandle::Halfedge(heh) => self.delete_halfedge(heh),
        }
    }

    /// Number of records currently tombstoned
    pub fn n_pending_erase(&self) -> usize {
        self.vertices.values().filter(|v| v.status.is_deleted()).count()
            + self.halfedges.values().filter(|h| h.status.is_deleted()).count()
            + self.edges.values().filter(|e| e.status.is_deleted()).count()
            + self.faces.values().filter(|f| f.status.is_deleted()).count()
    }

    /// Physically remove every tombstoned record. Returns how many were removed.
    pub fn do_erase(&mut self) -> usize {
        let before = self.n_vertices() + self.n_halfedges() + self.n_edges() + self.n_faces();
        self.vertices.retain(|_, v| !v.status.is_deleted());
        self.halfedges.retain(|_, h| !h.status.is_deleted());
        self.edges.retain(|_, e| !e.status.is_deleted());
        self.faces.retain(|_, f| !f.status.is_deleted());
        before - (self.n_vertices() + self.n_halfedges() + self.n_edges() + self.n_faces())
    }

    // --- Enumeration ---

    /// Iterate all vertex handles, tombstoned ones included
    pub fn vertices(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        self.vertices.keys()
    }

    /// Iterate all halfedge handles, tombstoned ones included
    pub fn halfedges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.halfedges.keys()
    }

    /// Iterate all edge handles, tombstoned ones included
    pub fn edges(&self) -> impl Iterator<Item = EdgeHandle> + '_ {
        self.edges.keys()
    }

    /// Iterate all face handles, tombstoned ones included
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle> + '_ {
        self.faces.keys()
    }

    /// Number of vertices (including tombstoned)
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of halfedges (including tombstoned)
    #[inline]
    pub fn n_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of edges (including tombstoned)
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces, boundary loops included (including tombstoned)
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_assigns_increasing_ids() {
        let mut kernel = ArrayKernel::new();
        let v0 = kernel.new_vertex(Vec3::ZERO);
        let e0 = kernel.new_edge();
        let f0 = kernel.new_face(false);
        let h0 = kernel.new_halfedge();

        let ids = [
            kernel.vertex(v0).map(|v| v.id()),
            kernel.edge(e0).map(|e| e.id()),
            kernel.face(f0).map(|f| f.id()),
            kernel.halfedge(h0).map(|h| h.id()),
        ];
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(kernel.face(f0).map(|f| f.is_boundary()), Some(false));
    }

    #[test]
    fn test_deferred_erase() {
        let mut kernel = ArrayKernel::new();
        let v0 = kernel.new_vertex(Vec3::ZERO);
        let v1 = kernel.new_vertex(Vec3::X);

        kernel.delete_vertex(v0);
        // Still readable until compaction
        assert_eq!(kernel.n_vertices(), 2);
        assert!(kernel.vertex(v0).is_some());
        assert!(!kernel.is_live_vertex(v0));
        assert_eq!(kernel.n_pending_erase(), 1);

        assert_eq!(kernel.do_erase(), 1);
        assert_eq!(kernel.n_vertices(), 1);
        assert!(kernel.vertex(v0).is_none());
        assert_eq!(kernel.vertex(v1).map(|v| v.point), Some(Vec3::X));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut kernel = ArrayKernel::new();
        let f0 = kernel.new_face(false);
        kernel.erase(ElementHandle::Face(f0));
        kernel.do_erase();

        let f1 = kernel.new_face(true);
        assert_ne!(f0, f1);
        assert!(kernel.face(f0).is_none());
        assert!(kernel.is_live_face(f1));
    }

    #[test]
    fn test_clear() {
        let mut kernel = ArrayKernel::new();
        kernel.new_vertex(Vec3::ZERO);
        kernel.new_halfedge();
        kernel.clear();
        assert_eq!(kernel.n_vertices(), 0);
        assert_eq!(kernel.n_halfedges(), 0);
    }
}
