//! # HalfedgeMesh
//!
//! The polygon mesh built on top of the element store: halfedge navigation,
//! per-element queries, the orientation flag, and the two sub-primitives
//! every local operation is composed from.
//!
//! Conventions:
//! - a halfedge stores its *origin* vertex (`from_vertex_handle`);
//! - `next` walks a face loop, `opposite -> next` walks the outgoing fan of a vertex;
//! - holes are virtual faces with `boundary == true`, so every halfedge has a face;
//! - `prev` is not stored, it is found by walking the face loop.
//!
//! Navigation accessors index the store directly and panic on a handle that is
//! not allocated. Public operations check their input handles first.

use glam::Vec3;
use log::trace;

use crate::geometry::{newell_vector, polygon_centroid, polygon_normal};
use crate::handles::{EdgeHandle, ElementHandle, FaceHandle, HalfedgeHandle, VertexHandle};
use crate::items::{Edge, Face, Halfedge, Vertex};
use crate::kernel::ArrayKernel;

/// Manifold, orientable polygon mesh with boundary loops
#[derive(Debug, Clone, Default)]
pub struct HalfedgeMesh {
    pub(crate) kernel: ArrayKernel,
    flip_orientation: bool,
}

impl HalfedgeMesh {
    /// Create a new empty mesh
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every element
    #[inline]
    pub fn clear(&mut self) {
        self.kernel.clear();
    }

    /// Underlying element store
    #[inline]
    pub fn kernel(&self) -> &ArrayKernel {
        &self.kernel
    }

    /// Physically remove every erased element (see [`ArrayKernel::do_erase`])
    pub fn do_erase(&mut self) -> usize {
        self.kernel.do_erase()
    }

    // ========================================================================
    // Counts and enumeration
    // ========================================================================

    /// Number of vertices (erased ones count until `do_erase`)
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.kernel.n_vertices()
    }

    /// Number of edges (erased ones count until `do_erase`)
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.kernel.n_edges()
    }

    /// Number of faces, boundary loops included (erased ones count until `do_erase`)
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.kernel.n_faces()
    }

    /// Number of halfedges (erased ones count until `do_erase`)
    #[inline]
    pub fn n_halfedges(&self) -> usize {
        self.kernel.n_halfedges()
    }

    /// Number of live boundary loops
    pub fn n_boundaries(&self) -> usize {
        self.kernel
            .faces
            .values()
            .filter(|f| f.boundary && !f.status.is_deleted())
            .count()
    }

    /// True if the mesh has at least one live boundary loop
    pub fn has_boundary(&self) -> bool {
        self.n_boundaries() > 0
    }

    /// Number of live non-boundary faces
    pub fn n_interior_faces(&self) -> usize {
        self.kernel
            .faces
            .values()
            .filter(|f| !f.boundary && !f.status.is_deleted())
            .count()
    }

    /// All vertex handles, erased ones included until `do_erase`
    pub fn vertices(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        self.kernel.vertices()
    }

    /// All edge handles, erased ones included until `do_erase`
    pub fn edges(&self) -> impl Iterator<Item = EdgeHandle> + '_ {
        self.kernel.edges()
    }

    /// All face handles (boundary loops included), erased ones included until `do_erase`
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle> + '_ {
        self.kernel.faces()
    }

    /// All halfedge handles, erased ones included until `do_erase`
    pub fn halfedges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.kernel.halfedges()
    }

    /// Live, non-boundary faces
    pub fn interior_faces(&self) -> impl Iterator<Item = FaceHandle> + '_ {
        self.kernel
            .faces
            .iter()
            .filter(|(_, f)| !f.boundary && !f.status.is_deleted())
            .map(|(fh, _)| fh)
    }

    // ========================================================================
    // Liveness
    // ========================================================================

    /// True if the vertex is allocated and not erased
    #[inline]
    pub fn is_valid_vertex(&self, vh: VertexHandle) -> bool {
        self.kernel.is_live_vertex(vh)
    }

    /// True if the edge is allocated and not erased
    #[inline]
    pub fn is_valid_edge(&self, eh: EdgeHandle) -> bool {
        self.kernel.is_live_edge(eh)
    }

    /// True if the face is allocated and not erased
    #[inline]
    pub fn is_valid_face(&self, fh: FaceHandle) -> bool {
        self.kernel.is_live_face(fh)
    }

    /// True if the halfedge is allocated and not erased
    #[inline]
    pub fn is_valid_halfedge(&self, heh: HalfedgeHandle) -> bool {
        self.kernel.is_live_halfedge(heh)
    }

    // ========================================================================
    // Record access
    // ========================================================================

    #[inline]
    pub(crate) fn v(&self, vh: VertexHandle) -> &Vertex {
        &self.kernel.vertices[vh]
    }

    #[inline]
    pub(crate) fn v_mut(&mut self, vh: VertexHandle) -> &mut Vertex {
        &mut self.kernel.vertices[vh]
    }

    #[inline]
    pub(crate) fn h(&self, heh: HalfedgeHandle) -> &Halfedge {
        &self.kernel.halfedges[heh]
    }

    #[inline]
    pub(crate) fn h_mut(&mut self, heh: HalfedgeHandle) -> &mut Halfedge {
        &mut self.kernel.halfedges[heh]
    }

    #[inline]
    pub(crate) fn e(&self, eh: EdgeHandle) -> &Edge {
        &self.kernel.edges[eh]
    }

    #[inline]
    pub(crate) fn e_mut(&mut self, eh: EdgeHandle) -> &mut Edge {
        &mut self.kernel.edges[eh]
    }

    #[inline]
    pub(crate) fn f(&self, fh: FaceHandle) -> &Face {
        &self.kernel.faces[fh]
    }

    #[inline]
    pub(crate) fn f_mut(&mut self, fh: FaceHandle) -> &mut Face {
        &mut self.kernel.faces[fh]
    }

    /// Set all five links of a halfedge at once
    #[inline]
    pub(crate) fn set_halfedge(
        &mut self,
        heh: HalfedgeHandle,
        next: HalfedgeHandle,
        opposite: HalfedgeHandle,
        vh: VertexHandle,
        eh: EdgeHandle,
        fh: FaceHandle,
    ) {
        let h = self.h_mut(heh);
        h.next_halfedge_handle = next;
        h.opposite_halfedge_handle = opposite;
        h.vertex_handle = vh;
        h.edge_handle = eh;
        h.face_handle = fh;
    }

    // ========================================================================
    // Halfedge navigation
    // ========================================================================

    /// The opposite halfedge (across the edge)
    #[inline]
    pub fn opposite_halfedge_handle(&self, heh: HalfedgeHandle) -> HalfedgeHandle {
        self.h(heh).opposite_halfedge_handle
    }

    /// The next halfedge in the face loop
    #[inline]
    pub fn next_halfedge_handle(&self, heh: HalfedgeHandle) -> HalfedgeHandle {
        self.h(heh).next_halfedge_handle
    }

    /// The previous halfedge in the face loop (walks the loop)
    pub fn prev_halfedge_handle(&self, heh: HalfedgeHandle) -> HalfedgeHandle {
        let mut current = heh;
        for _ in 0..self.n_halfedges() {
            let next = self.next_halfedge_handle(current);
            if next == heh {
                return current;
            }
            current = next;
        }
        current
    }

    /// The vertex a halfedge starts from
    #[inline]
    pub fn from_vertex_handle(&self, heh: HalfedgeHandle) -> VertexHandle {
        self.h(heh).vertex_handle
    }

    /// The vertex a halfedge points to
    #[inline]
    pub fn to_vertex_handle(&self, heh: HalfedgeHandle) -> VertexHandle {
        self.from_vertex_handle(self.next_halfedge_handle(heh))
    }

    /// The edge a halfedge belongs to
    #[inline]
    pub fn edge_handle(&self, heh: HalfedgeHandle) -> EdgeHandle {
        self.h(heh).edge_handle
    }

    /// The face (or boundary loop) a halfedge borders
    #[inline]
    pub fn face_handle(&self, heh: HalfedgeHandle) -> FaceHandle {
        self.h(heh).face_handle
    }

    /// True if the halfedge lies in a boundary loop
    #[inline]
    pub fn is_boundary_halfedge(&self, heh: HalfedgeHandle) -> bool {
        self.f(self.face_handle(heh)).boundary
    }

    /// Designated outgoing halfedge of a vertex
    #[inline]
    pub fn halfedge_handle(&self, vh: VertexHandle) -> HalfedgeHandle {
        self.v(vh).halfedge_handle
    }

    /// Designated halfedge of an edge
    #[inline]
    pub fn edge_halfedge_handle(&self, eh: EdgeHandle) -> HalfedgeHandle {
        self.e(eh).halfedge_handle
    }

    /// Designated halfedge of a face
    #[inline]
    pub fn face_halfedge_handle(&self, fh: FaceHandle) -> HalfedgeHandle {
        self.f(fh).halfedge_handle
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Position of a vertex
    #[inline]
    pub fn point(&self, vh: VertexHandle) -> Option<Vec3> {
        self.kernel.vertex(vh).map(|v| v.point)
    }

    /// Move a vertex
    #[inline]
    pub fn set_point(&mut self, vh: VertexHandle, point: Vec3) {
        if let Some(v) = self.kernel.vertex_mut(vh) {
            v.point = point;
        }
    }

    #[inline]
    pub(crate) fn pos(&self, vh: VertexHandle) -> Vec3 {
        self.v(vh).point
    }

    // ========================================================================
    // Vertex queries
    // ========================================================================

    /// True if any face around the vertex is a boundary loop
    pub fn vertex_on_boundary(&self, vh: VertexHandle) -> bool {
        self.vertex_halfedges(vh).any(|heh| self.is_boundary_halfedge(heh))
    }

    /// Number of edges incident to the vertex
    pub fn vertex_degree(&self, vh: VertexHandle) -> usize {
        self.vertex_halfedges(vh).count()
    }

    /// Area-weighted vertex normal over the adjacent non-boundary faces
    pub fn vertex_normal(&self, vh: VertexHandle) -> Vec3 {
        self.vertex_faces(vh)
            .filter(|&fh| !self.is_boundary_face(fh))
            .fold(Vec3::ZERO, |acc, fh| acc + newell_vector(&self.face_points(fh)))
            .normalize_or_zero()
    }

    /// Centroid of the 1-ring neighbours
    pub fn neighborhood_center(&self, vh: VertexHandle) -> Vec3 {
        let ring: Vec<Vec3> = self.vertex_vertices(vh).map(|n| self.pos(n)).collect();
        polygon_centroid(&ring)
    }

    /// The outgoing halfedge of `vh` that lies in face `fh`
    pub fn halfedge_in_face(&self, vh: VertexHandle, fh: FaceHandle) -> Option<HalfedgeHandle> {
        self.vertex_halfedges(vh).find(|&heh| self.face_handle(heh) == fh)
    }

    /// The outgoing halfedge of `vh` that lies in a boundary loop, if any
    pub fn boundary_halfedge(&self, vh: VertexHandle) -> Option<HalfedgeHandle> {
        self.vertex_halfedges(vh).find(|&heh| self.is_boundary_halfedge(heh))
    }

    /// Point a boundary vertex at the first interior halfedge after its boundary
    /// halfedge in the sweep, so that circulating from it visits every real face
    /// before reaching the boundary. Interior vertices are left alone.
    pub(crate) fn canonicalize_vertex_halfedge(&mut self, vh: VertexHandle) {
        if let Some(bh) = self.boundary_halfedge(vh) {
            let first = self.next_halfedge_handle(self.opposite_halfedge_handle(bh));
            self.v_mut(vh).halfedge_handle = first;
        }
    }

    /// The halfedge going from `from` to `to`, if the two vertices are adjacent
    pub fn find_halfedge(&self, from: VertexHandle, to: VertexHandle) -> Option<HalfedgeHandle> {
        self.vertex_halfedges(from).find(|&heh| self.to_vertex_handle(heh) == to)
    }

    // ========================================================================
    // Edge queries
    // ========================================================================

    /// The two endpoints of an edge
    pub fn edge_vertices(&self, eh: EdgeHandle) -> (VertexHandle, VertexHandle) {
        let heh = self.edge_halfedge_handle(eh);
        (self.from_vertex_handle(heh), self.to_vertex_handle(heh))
    }

    /// True if either side of the edge is a boundary loop
    pub fn edge_on_boundary(&self, eh: EdgeHandle) -> bool {
        let heh = self.edge_halfedge_handle(eh);
        self.is_boundary_halfedge(heh)
            || self.is_boundary_halfedge(self.opposite_halfedge_handle(heh))
    }

    /// Midpoint of an edge
    pub fn edge_center(&self, eh: EdgeHandle) -> Vec3 {
        let (v0, v1) = self.edge_vertices(eh);
        (self.pos(v0) + self.pos(v1)) * 0.5
    }

    /// Length of an edge
    pub fn edge_length(&self, eh: EdgeHandle) -> f32 {
        let (v0, v1) = self.edge_vertices(eh);
        self.pos(v0).distance(self.pos(v1))
    }

    /// Average of the adjacent non-boundary face normals
    pub fn edge_normal(&self, eh: EdgeHandle) -> Vec3 {
        let heh = self.edge_halfedge_handle(eh);
        [heh, self.opposite_halfedge_handle(heh)]
            .into_iter()
            .map(|h| self.face_handle(h))
            .filter(|&fh| !self.is_boundary_face(fh))
            .fold(Vec3::ZERO, |acc, fh| acc + self.face_normal(fh))
            .normalize_or_zero()
    }

    // ========================================================================
    // Face queries
    // ========================================================================

    /// True if the face is a boundary loop
    #[inline]
    pub fn is_boundary_face(&self, fh: FaceHandle) -> bool {
        self.f(fh).boundary
    }

    /// Number of sides of a face
    pub fn face_degree(&self, fh: FaceHandle) -> usize {
        self.face_halfedges(fh).count()
    }

    /// Corner positions of a face in winding order
    pub fn face_points(&self, fh: FaceHandle) -> Vec<Vec3> {
        self.face_vertices(fh).map(|vh| self.pos(vh)).collect()
    }

    /// Vertex average of a face
    pub fn face_center(&self, fh: FaceHandle) -> Vec3 {
        polygon_centroid(&self.face_points(fh))
    }

    /// Unit normal of a face, following its winding
    pub fn face_normal(&self, fh: FaceHandle) -> Vec3 {
        polygon_normal(&self.face_points(fh))
    }

    /// Area of a face
    pub fn face_area(&self, fh: FaceHandle) -> f32 {
        newell_vector(&self.face_points(fh)).length() * 0.5
    }

    /// True if every live non-boundary face is a triangle
    pub fn is_triangle_mesh(&self) -> bool {
        self.interior_faces().all(|fh| self.face_degree(fh) == 3)
    }

    // ========================================================================
    // Element-generic queries
    // ========================================================================

    /// Unique id of any element
    pub fn id_of(&self, elem: ElementHandle) -> Option<u32> {
        match elem {
            ElementHandle::Vertex(vh) => self.kernel.vertex(vh).map(|v| v.id),
            ElementHandle::Edge(eh) => self.kernel.edge(eh).map(|e| e.id),
            ElementHandle::Face(fh) => self.kernel.face(fh).map(|f| f.id),
            ElementHandle::Halfedge(heh) => self.kernel.halfedge(heh).map(|h| h.id),
        }
    }

    /// Representative position of any live element
    pub fn center_of(&self, elem: ElementHandle) -> Option<Vec3> {
        if !self.kernel.is_live(elem) {
            return None;
        }
        Some(match elem {
            ElementHandle::Vertex(vh) => self.pos(vh),
            ElementHandle::Edge(eh) => self.edge_center(eh),
            ElementHandle::Face(fh) => self.face_center(fh),
            ElementHandle::Halfedge(heh) => self.edge_center(self.edge_handle(heh)),
        })
    }

    /// Outward normal of any live element, negated when the mesh is flipped
    pub fn normal_of(&self, elem: ElementHandle) -> Option<Vec3> {
        if !self.kernel.is_live(elem) {
            return None;
        }
        let n = match elem {
            ElementHandle::Vertex(vh) => self.vertex_normal(vh),
            ElementHandle::Edge(eh) => self.edge_normal(eh),
            ElementHandle::Face(fh) => self.face_normal(fh),
            ElementHandle::Halfedge(heh) => self.edge_normal(self.edge_handle(heh)),
        };
        Some(if self.flip_orientation { -n } else { n })
    }

    // ========================================================================
    // Orientation flag
    // ========================================================================

    /// Toggle the orientation convention
    #[inline]
    pub fn flip(&mut self) {
        self.flip_orientation = !self.flip_orientation;
    }

    /// True if the orientation convention is reversed
    #[inline]
    pub fn flipped(&self) -> bool {
        self.flip_orientation
    }

    // ========================================================================
    // Sub-primitives
    // ========================================================================

    /// Split edge `eh` in two by inserting a new vertex at `point`.
    ///
    /// The original edge keeps the half from its designated halfedge's origin to
    /// the new vertex; a new edge covers the other half. Both adjacent faces
    /// (or boundary loops) gain one side.
    pub fn insert_vertex(&mut self, eh: EdgeHandle, point: Vec3) -> Option<VertexHandle> {
        if !self.is_valid_edge(eh) {
            trace!("insert_vertex: stale edge");
            return None;
        }

        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.next_halfedge_handle(h0);
        let h2 = self.opposite_halfedge_handle(h0);
        let h3 = self.next_halfedge_handle(h2);
        let f0 = self.face_handle(h0);
        let f1 = self.face_handle(h2);

        let vm = self.kernel.new_vertex(point);
        let e1 = self.kernel.new_edge();
        let h4 = self.kernel.new_halfedge();
        let h5 = self.kernel.new_halfedge();

        // h0: v0 -> vm, h4: vm -> v1 (face f0)
        // h2: v1 -> vm, h5: vm -> v0 (face f1)
        self.set_halfedge(h4, h1, h2, vm, e1, f0);
        self.set_halfedge(h5, h3, h0, vm, eh, f1);
        {
            let h = self.h_mut(h0);
            h.next_halfedge_handle = h4;
            h.opposite_halfedge_handle = h5;
        }
        {
            let h = self.h_mut(h2);
            h.next_halfedge_handle = h5;
            h.opposite_halfedge_handle = h4;
            h.edge_handle = e1;
        }

        self.v_mut(vm).halfedge_handle = h4;
        self.e_mut(e1).halfedge_handle = h4;
        self.e_mut(eh).halfedge_handle = h0;
        self.canonicalize_vertex_halfedge(vm);

        Some(vm)
    }

    /// Split the face bordered by `h0` and `h1` with a new edge between their
    /// origin vertices. The part from `h0` up to (not including) `h1` moves to a
    /// new face; the original face keeps the rest. Returns the new edge.
    pub fn connect_vertex(&mut self, h0: HalfedgeHandle, h1: HalfedgeHandle) -> Option<EdgeHandle> {
        if !self.is_valid_halfedge(h0) || !self.is_valid_halfedge(h1) {
            trace!("connect_vertex: stale halfedge");
            return None;
        }
        let fh = self.face_handle(h0);
        if h0 == h1 || self.face_handle(h1) != fh || self.is_boundary_face(fh) {
            trace!("connect_vertex: halfedges do not bound the same interior face");
            return None;
        }
        if self.next_halfedge_handle(h0) == h1 || self.next_halfedge_handle(h1) == h0 {
            trace!("connect_vertex: adjacent halfedges would leave a two-sided face");
            return None;
        }

        let v0 = self.from_vertex_handle(h0);
        let v1 = self.from_vertex_handle(h1);
        let h0_prev = self.prev_halfedge_handle(h0);
        let h1_prev = self.prev_halfedge_handle(h1);

        let new_f = self.kernel.new_face(false);
        let new_e = self.kernel.new_edge();
        let new_h0 = self.kernel.new_halfedge();
        let new_h1 = self.kernel.new_halfedge();

        // new_h0: v0 -> v1 stays in fh, new_h1: v1 -> v0 closes the split-off loop
        self.set_halfedge(new_h0, h1, new_h1, v0, new_e, fh);
        self.set_halfedge(new_h1, h0, new_h0, v1, new_e, new_f);
        self.h_mut(h0_prev).next_halfedge_handle = new_h0;
        self.h_mut(h1_prev).next_halfedge_handle = new_h1;

        let moved: Vec<HalfedgeHandle> = self.halfedge_loop(h0).collect();
        for heh in moved {
            self.h_mut(heh).face_handle = new_f;
        }

        self.e_mut(new_e).halfedge_handle = new_h0;
        self.f_mut(fh).halfedge_handle = new_h0;
        self.f_mut(new_f).halfedge_handle = new_h1;
        // a boundary corner's first interior halfedge may now be the new one
        self.canonicalize_vertex_halfedge(v0);
        self.canonicalize_vertex_halfedge(v1);

        Some(new_e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::MeshHandle;
    use crate::test_data::{generate_cube, generate_tetrahedron, generate_unit_quad};

    #[test]
    fn test_navigation_on_tetrahedron() {
        let mesh = generate_tetrahedron();
        for heh in mesh.halfedges() {
            let opp = mesh.opposite_halfedge_handle(heh);
            assert_eq!(mesh.opposite_halfedge_handle(opp), heh);
            assert_eq!(mesh.from_vertex_handle(opp), mesh.to_vertex_handle(heh));
            assert_eq!(mesh.next_halfedge_handle(mesh.prev_halfedge_handle(heh)), heh);
        }
        for vh in mesh.vertices() {
            assert_eq!(mesh.vertex_degree(vh), 3);
            assert!(!mesh.vertex_on_boundary(vh));
        }
        assert!(!mesh.has_boundary());
        assert!(mesh.is_triangle_mesh());
    }

    #[test]
    fn test_quad_queries() {
        let mesh = generate_unit_quad();
        assert_eq!(mesh.n_faces(), 2);
        assert_eq!(mesh.n_boundaries(), 1);
        assert_eq!(mesh.n_interior_faces(), 1);

        let fh = mesh.interior_faces().next().unwrap();
        assert_eq!(mesh.face_degree(fh), 4);
        assert!((mesh.face_area(fh) - 1.0).abs() < 1e-6);
        assert_eq!(mesh.face_center(fh), Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(mesh.face_normal(fh), Vec3::Z);
        for eh in mesh.edges() {
            assert!(mesh.edge_on_boundary(eh));
            assert!((mesh.edge_length(eh) - 1.0).abs() < 1e-6);
        }
        for vh in mesh.vertices() {
            assert!(mesh.vertex_on_boundary(vh));
            assert_eq!(mesh.vertex_degree(vh), 2);
        }
    }

    #[test]
    fn test_normal_of_respects_flip() {
        let mut mesh = generate_unit_quad();
        let fh = mesh.interior_faces().next().unwrap();
        assert_eq!(mesh.normal_of(fh.into()), Some(Vec3::Z));
        mesh.flip();
        assert!(mesh.flipped());
        assert_eq!(mesh.normal_of(fh.into()), Some(-Vec3::Z));
        assert_eq!(mesh.center_of(fh.into()), Some(Vec3::new(0.5, 0.5, 0.0)));
        assert!(mesh.normal_of(FaceHandle::invalid().into()).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mesh = generate_cube();
        let mut ids: Vec<u32> = mesh
            .vertices()
            .map(ElementHandle::from)
            .chain(mesh.edges().map(ElementHandle::from))
            .chain(mesh.faces().map(ElementHandle::from))
            .chain(mesh.halfedges().map(ElementHandle::from))
            .filter_map(|e| mesh.id_of(e))
            .collect();
        let n = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn test_insert_vertex() {
        let mut mesh = generate_tetrahedron();
        let eh = mesh.edges().next().unwrap();
        let (a, b) = mesh.edge_vertices(eh);
        let center = mesh.edge_center(eh);

        let vm = mesh.insert_vertex(eh, center).unwrap();
        assert_eq!(mesh.point(vm), Some(center));
        assert_eq!(mesh.vertex_degree(vm), 2);
        assert!(mesh.find_halfedge(a, vm).is_some());
        assert!(mesh.find_halfedge(vm, b).is_some());
        assert!(mesh.find_halfedge(a, b).is_none());
        assert_eq!(mesh.n_edges(), 7);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_connect_vertex_splits_quad() {
        let mut mesh = generate_unit_quad();
        let fh = mesh.interior_faces().next().unwrap();
        let hs: Vec<_> = mesh.face_halfedges(fh).collect();

        // adjacent halfedges are refused
        assert!(mesh.connect_vertex(hs[0], hs[1]).is_none());

        let eh = mesh.connect_vertex(hs[0], hs[2]).unwrap();
        assert_eq!(mesh.n_interior_faces(), 2);
        for f in mesh.interior_faces() {
            assert_eq!(mesh.face_degree(f), 3);
        }
        assert!(!mesh.edge_on_boundary(eh));
        // corners still lead with an interior halfedge
        for vh in mesh.vertices() {
            assert!(!mesh.is_boundary_halfedge(mesh.halfedge_handle(vh)));
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_connect_vertex_refuses_boundary_loop() {
        let mut mesh = generate_unit_quad();
        let bh = mesh.faces().find(|&f| mesh.is_boundary_face(f)).unwrap();
        let hs: Vec<_> = mesh.face_halfedges(bh).collect();
        assert!(mesh.connect_vertex(hs[0], hs[2]).is_none());
    }
}
