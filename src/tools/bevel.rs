//! # Bevel
//!
//! Vertex, edge and face bevel, plus the position helpers an interactive
//! caller invokes repeatedly while dragging.
//!
//! The bevel operations only build connectivity. The `*_positions` helpers
//! compute absolute positions from the positions captured when the gesture
//! started (see [`HalfedgeMesh::start_positions_of`]), so repeated calls never
//! accumulate error.

use std::collections::HashSet;

use glam::Vec3;
use log::trace;

use crate::connectivity::HalfedgeMesh;
use crate::geometry::{polygon_centroid, polygon_normal};
use crate::handles::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};

impl HalfedgeMesh {
    /// Replace an interior vertex by a face spanning the midpoints of its
    /// edges. Returns the new face. The vertex needs at least three edges.
    pub fn bevel_vertex(&mut self, vh: VertexHandle) -> Option<FaceHandle> {
        if !self.is_valid_vertex(vh) || self.vertex_on_boundary(vh) {
            trace!("bevel_vertex: stale or boundary vertex");
            return None;
        }
        self.bevel_vertex_set(&[vh], None)
    }

    /// Replace an interior edge by a face spanning the midpoints of all other
    /// edges at its two endpoints. Returns the new face.
    ///
    /// Both endpoints must be interior with at least three edges each, and no
    /// face other than the two along the edge may contain both endpoints.
    pub fn bevel_edge(&mut self, eh: EdgeHandle) -> Option<FaceHandle> {
        if !self.is_valid_edge(eh) || self.edge_on_boundary(eh) {
            trace!("bevel_edge: stale or boundary edge");
            return None;
        }
        let h = self.edge_halfedge_handle(eh);
        if self.face_handle(h) == self.face_handle(self.opposite_halfedge_handle(h)) {
            trace!("bevel_edge: edge bridges one face");
            return None;
        }
        let (v0, v1) = self.edge_vertices(eh);
        if self.vertex_on_boundary(v0) || self.vertex_on_boundary(v1) {
            trace!("bevel_edge: endpoint on boundary");
            return None;
        }
        let shared = self
            .vertex_faces(v0)
            .filter(|&fh| self.face_vertices(fh).any(|v| v == v1))
            .count();
        if shared != 2 {
            trace!("bevel_edge: endpoints share another face");
            return None;
        }
        self.bevel_vertex_set(&[v0, v1], Some(eh))
    }

    /// Cut every edge leaving `set` (except `inner`) at its midpoint, cut the
    /// corners of `set` off each incident face, then erase the vertices of
    /// `set`, which merges the corner pieces into one face.
    ///
    /// All refusals are decided before the first edge is cut.
    fn bevel_vertex_set(&mut self, set: &[VertexHandle], inner: Option<EdgeHandle>) -> Option<FaceHandle> {
        // a degree-two vertex would leave a two-sided face
        if set.iter().any(|&vh| self.vertex_degree(vh) < 3) {
            trace!("bevel: vertex has fewer than three edges");
            return None;
        }
        let members: HashSet<VertexHandle> = set.iter().copied().collect();

        let mut faces: Vec<FaceHandle> = Vec::new();
        let mut edges: Vec<EdgeHandle> = Vec::new();
        for &vh in set {
            for heh in self.vertex_halfedges(vh) {
                let eh = self.edge_handle(heh);
                if Some(eh) != inner && !edges.contains(&eh) {
                    edges.push(eh);
                }
                let fh = self.face_handle(heh);
                if !faces.contains(&fh) {
                    faces.push(fh);
                }
            }
        }
        let distinct = faces.iter().all(|&fh| {
            let hits: Vec<VertexHandle> = self.face_vertices(fh).filter(|v| members.contains(v)).collect();
            hits.iter().collect::<HashSet<_>>().len() == hits.len()
        });
        if !distinct {
            trace!("bevel: a face visits the beveled vertices more than once");
            return None;
        }

        for eh in edges {
            let center = self.edge_center(eh);
            self.insert_vertex(eh, center)?;
        }

        for fh in faces {
            let hs: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
            let n = hs.len();
            let inside = |h: HalfedgeHandle, mesh: &Self| members.contains(&mesh.from_vertex_handle(h));
            let Some(start) = (0..n).find(|&i| inside(hs[i], self) && !inside(hs[(i + n - 1) % n], self)) else {
                continue;
            };
            let Some(end) = (1..n).map(|k| (start + k) % n).find(|&i| !inside(hs[i], self)) else {
                continue;
            };
            let before = hs[(start + n - 1) % n];
            self.connect_vertex(before, hs[end])?;
        }

        let mut merged = None;
        for &vh in set {
            merged = Some(self.erase_vertex(vh)?);
        }
        merged
    }

    /// Ring of quads between a face and an inset copy of it. The inset face
    /// starts on top of the original corners; returns the inset face.
    pub fn bevel_face(&mut self, fh: FaceHandle) -> Option<FaceHandle> {
        if !self.is_valid_face(fh) || self.is_boundary_face(fh) {
            trace!("bevel_face: stale or boundary face");
            return None;
        }

        let hs: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
        let corners: Vec<VertexHandle> = hs.iter().map(|&h| self.from_vertex_handle(h)).collect();
        let n = hs.len();

        let inset = self.kernel.new_face(false);
        let new_vertices: Vec<VertexHandle> = corners
            .iter()
            .map(|&v| self.kernel.new_vertex(self.pos(v)))
            .collect();
        // ring face i sits on original side i; the first one reuses `fh`
        let ring: Vec<FaceHandle> = (0..n)
            .map(|i| if i == 0 { fh } else { self.kernel.new_face(false) })
            .collect();
        let connectors: Vec<EdgeHandle> = (0..n).map(|_| self.kernel.new_edge()).collect();
        let sides: Vec<EdgeHandle> = (0..n).map(|_| self.kernel.new_edge()).collect();
        let cu: Vec<HalfedgeHandle> = (0..n).map(|_| self.kernel.new_halfedge()).collect();
        let cd: Vec<HalfedgeHandle> = (0..n).map(|_| self.kernel.new_halfedge()).collect();
        let nh: Vec<HalfedgeHandle> = (0..n).map(|_| self.kernel.new_halfedge()).collect();
        let nt: Vec<HalfedgeHandle> = (0..n).map(|_| self.kernel.new_halfedge()).collect();

        for i in 0..n {
            let j = (i + 1) % n;
            // ring face i: h[i] (v_i -> v_j), cu[j] (v_j -> n_j), nt[i] (n_j -> n_i), cd[i] (n_i -> v_i)
            {
                let h = self.h_mut(hs[i]);
                h.next_halfedge_handle = cu[j];
                h.face_handle = ring[i];
            }
            self.set_halfedge(cu[j], nt[i], cd[j], corners[j], connectors[j], ring[i]);
            self.set_halfedge(nt[i], cd[i], nh[i], new_vertices[j], sides[i], ring[i]);
            self.set_halfedge(cd[i], hs[i], cu[i], new_vertices[i], connectors[i], ring[i]);
            self.set_halfedge(nh[i], nh[j], nt[i], new_vertices[i], sides[i], inset);

            self.v_mut(new_vertices[i]).halfedge_handle = nh[i];
            self.e_mut(connectors[i]).halfedge_handle = cu[i];
            self.e_mut(sides[i]).halfedge_handle = nh[i];
            self.f_mut(ring[i]).halfedge_handle = hs[i];
        }
        self.f_mut(inset).halfedge_handle = nh[0];

        for v in corners {
            self.canonicalize_vertex_halfedge(v);
        }
        Some(inset)
    }

    /// Corner positions of a face in loop order, as captured at the start of
    /// an interactive bevel.
    pub fn start_positions_of(&self, fh: FaceHandle) -> Vec<Vec3> {
        if !self.is_valid_face(fh) {
            return Vec::new();
        }
        self.face_points(fh)
    }

    /// Slide the corners of a vertex-bevel face along their remaining edges.
    /// Returns false if the arguments do not describe the face.
    pub fn bevel_vertex_positions(&mut self, start_positions: &[Vec3], fh: FaceHandle, tangent_offset: f32) -> bool {
        self.slide_bevel_corners(start_positions, fh, tangent_offset)
    }

    /// Slide the corners of an edge-bevel face along their remaining edges.
    /// Returns false if the arguments do not describe the face.
    pub fn bevel_edge_positions(&mut self, start_positions: &[Vec3], fh: FaceHandle, tangent_offset: f32) -> bool {
        self.slide_bevel_corners(start_positions, fh, tangent_offset)
    }

    /// Each corner moves from its start position towards the far end of the
    /// one edge it has outside the face, by `tangent_offset` in [0, 1].
    fn slide_bevel_corners(&mut self, start_positions: &[Vec3], fh: FaceHandle, tangent_offset: f32) -> bool {
        if !self.is_valid_face(fh) || self.is_boundary_face(fh) {
            return false;
        }
        let hs: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
        if hs.len() != start_positions.len() {
            return false;
        }

        let t = tangent_offset.clamp(0.0, 1.0);
        for (&h, &start) in hs.iter().zip(start_positions) {
            let out = self.next_halfedge_handle(self.opposite_halfedge_handle(h));
            let far = self.pos(self.to_vertex_handle(out));
            let vh = self.from_vertex_handle(h);
            self.v_mut(vh).point = start + (far - start) * t;
        }
        true
    }

    /// Move the inset face of a face bevel: towards the start centroid by
    /// `tangent_offset` and along the start normal by `normal_offset`. The
    /// normal is reversed when the mesh is flipped.
    pub fn bevel_face_positions(
        &mut self,
        start_positions: &[Vec3],
        fh: FaceHandle,
        tangent_offset: f32,
        normal_offset: f32,
    ) -> bool {
        if !self.is_valid_face(fh) || self.is_boundary_face(fh) {
            return false;
        }
        let corners: Vec<VertexHandle> = self.face_vertices(fh).collect();
        if corners.len() != start_positions.len() {
            return false;
        }

        let center = polygon_centroid(start_positions);
        let mut normal = polygon_normal(start_positions);
        if self.flipped() {
            normal = -normal;
        }
        for (&vh, &start) in corners.iter().zip(start_positions) {
            self.v_mut(vh).point = start + (center - start) * tangent_offset + normal * normal_offset;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::test_data::{
        generate_cube, generate_grid, generate_icosahedron, generate_pillow, generate_unit_quad,
    };

    #[test]
    fn test_bevel_face_on_quad() {
        let mut mesh = generate_unit_quad();
        let fh = mesh.interior_faces().next().unwrap();
        let corners = mesh.face_points(fh);

        let inset = mesh.bevel_face(fh).unwrap();
        let start = mesh.start_positions_of(inset);
        assert_eq!(start, corners);
        assert!(mesh.bevel_face_positions(&start, inset, 0.0, 0.0));
        assert_eq!(mesh.face_points(inset), corners);

        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.n_interior_faces(), 5);
        assert_eq!(mesh.n_vertices(), 8);
        assert_eq!(mesh.n_edges(), 12);
        for f in mesh.interior_faces() {
            assert_eq!(mesh.face_degree(f), 4);
        }
    }

    #[test]
    fn test_bevel_face_positions() {
        let mut mesh = generate_unit_quad();
        let fh = mesh.interior_faces().next().unwrap();
        let inset = mesh.bevel_face(fh).unwrap();
        let start = mesh.start_positions_of(inset);

        mesh.bevel_face_positions(&start, inset, 0.5, 1.0);
        let points = mesh.face_points(inset);
        for p in &points {
            assert_relative_eq!((p.x - 0.5).abs(), 0.25);
            assert_relative_eq!((p.y - 0.5).abs(), 0.25);
            assert_relative_eq!(p.z, 1.0);
        }

        // absolute, not incremental
        mesh.bevel_face_positions(&start, inset, 0.5, 1.0);
        assert_eq!(mesh.face_points(inset), points);

        mesh.flip();
        mesh.bevel_face_positions(&start, inset, 0.0, 1.0);
        assert_relative_eq!(mesh.face_points(inset)[0].z, -1.0);

        assert!(!mesh.bevel_face_positions(&start[..2], inset, 0.0, 0.0));
    }

    #[test]
    fn test_bevel_face_refuses_boundary_loop() {
        let mut mesh = generate_unit_quad();
        let hole = mesh.faces().find(|&f| mesh.is_boundary_face(f)).unwrap();
        assert!(mesh.bevel_face(hole).is_none());
    }

    #[test]
    fn test_bevel_face_on_cube() {
        let mut mesh = generate_cube();
        let fh = mesh.faces().next().unwrap();
        mesh.bevel_face(fh).unwrap();
        assert!(mesh.validate().is_ok());
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (12, 20, 10));
    }

    #[test]
    fn test_bevel_vertex_on_icosahedron() {
        let mut mesh = generate_icosahedron();
        let vh = mesh.vertices().next().unwrap();
        let fh = mesh.bevel_vertex(vh).unwrap();

        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.face_degree(fh), 5);
        // 5 midpoints replace the vertex, the 5 triangles become quads
        assert_eq!(mesh.n_vertices(), 16);
        assert_eq!(mesh.n_faces(), 21);
        for v in mesh.face_vertices(fh) {
            assert_eq!(mesh.vertex_degree(v), 3);
        }
    }

    #[test]
    fn test_bevel_vertex_positions() {
        let mut mesh = generate_icosahedron();
        let vh = mesh.vertices().next().unwrap();
        let fh = mesh.bevel_vertex(vh).unwrap();
        let start = mesh.start_positions_of(fh);

        assert!(mesh.bevel_vertex_positions(&start, fh, 0.0));
        assert_eq!(mesh.face_points(fh), start);

        // fully slid, every corner sits on the far end of its edge
        assert!(mesh.bevel_vertex_positions(&start, fh, 2.0));
        let corners: Vec<_> = mesh.face_halfedges(fh).collect();
        for h in corners {
            let out = mesh.next_halfedge_handle(mesh.opposite_halfedge_handle(h));
            let far = mesh.point(mesh.to_vertex_handle(out)).unwrap();
            let corner = mesh.point(mesh.from_vertex_handle(h)).unwrap();
            assert!(corner.distance(far) < 1e-6);
        }
    }

    #[test]
    fn test_bevel_vertex_refuses_boundary() {
        let mut mesh = generate_grid(3, 3);
        let vh = mesh.vertices().find(|&v| mesh.vertex_on_boundary(v)).unwrap();
        assert!(mesh.bevel_vertex(vh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
    }

    #[test]
    fn test_bevel_edge_on_icosahedron() {
        let mut mesh = generate_icosahedron();
        let eh = mesh.edges().next().unwrap();
        let fh = mesh.bevel_edge(eh).unwrap();

        assert!(mesh.validate().is_ok());
        // 8 other edges leave the two endpoints
        assert_eq!(mesh.face_degree(fh), 8);
        assert_eq!(mesh.n_vertices(), 18);
        let start = mesh.start_positions_of(fh);
        assert!(mesh.bevel_edge_positions(&start, fh, 0.5));
    }

    #[test]
    fn test_bevel_edge_in_grid() {
        let mut mesh = generate_grid(4, 4);
        let eh = mesh
            .edges()
            .find(|&e| {
                let (a, b) = mesh.edge_vertices(e);
                !mesh.vertex_on_boundary(a) && !mesh.vertex_on_boundary(b)
            })
            .unwrap();
        let fh = mesh.bevel_edge(eh).unwrap();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.face_degree(fh), 6);
    }

    #[test]
    fn test_bevel_edge_refusals() {
        let mut mesh = generate_grid(3, 3);
        let eh = mesh.edges().find(|&e| mesh.edge_on_boundary(e)).unwrap();
        assert!(mesh.bevel_edge(eh).is_none());

        // an edge of the centre vertex still touches the boundary
        let eh = mesh.edges().find(|&e| !mesh.edge_on_boundary(e)).unwrap();
        assert!(mesh.bevel_edge(eh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
    }

    #[test]
    fn test_bevel_refuses_degree_two_vertices() {
        let mut mesh = generate_pillow();
        let vh = mesh.vertices().next().unwrap();
        assert!(mesh.bevel_vertex(vh).is_none());
        let eh = mesh.edges().next().unwrap();
        assert!(mesh.bevel_edge(eh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (3, 3, 2));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_bevel_refusal_leaves_mesh_untouched() {
        // erasing one cube edge leaves both of its endpoints with two edges
        let mut mesh = generate_cube();
        let eh = mesh.edges().next().unwrap();
        let (a, _) = mesh.edge_vertices(eh);
        mesh.erase_edge(eh).unwrap();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.vertex_degree(a), 2);

        let counts = (mesh.n_vertices(), mesh.n_edges(), mesh.n_faces());
        assert!(mesh.bevel_vertex(a).is_none());
        let edges: Vec<_> = mesh.vertex_halfedges(a).map(|h| mesh.edge_handle(h)).collect();
        for eh in edges {
            assert!(mesh.bevel_edge(eh).is_none());
        }
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), counts);
        assert!(mesh.validate().is_ok());
    }
}
