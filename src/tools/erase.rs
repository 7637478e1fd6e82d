//! # Erase
//!
//! Removal of edges and vertices by merging the faces around them.

use log::trace;

use crate::connectivity::HalfedgeMesh;
use crate::handles::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};

impl HalfedgeMesh {
    /// Remove an interior edge, merging its two faces into one.
    ///
    /// When both sides of the edge lie in the same face the edge is a spoke
    /// hanging into that face: the spoke and its tip vertex are removed and
    /// the face is returned, unless that would leave it with fewer than three
    /// sides. An edge bridging two loops of one face is refused.
    pub fn erase_edge(&mut self, eh: EdgeHandle) -> Option<FaceHandle> {
        if !self.is_valid_edge(eh) {
            trace!("erase_edge: stale edge");
            return None;
        }
        if self.edge_on_boundary(eh) {
            trace!("erase_edge: boundary edge");
            return None;
        }

        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.opposite_halfedge_handle(h0);
        let f0 = self.face_handle(h0);
        let f1 = self.face_handle(h1);

        if f0 == f1 {
            return self.erase_spoke(eh, h0, h1);
        }

        let v0 = self.from_vertex_handle(h0);
        let v1 = self.from_vertex_handle(h1);
        let h2 = self.prev_halfedge_handle(h0);
        let h3 = self.next_halfedge_handle(h0);
        let h4 = self.prev_halfedge_handle(h1);
        let h5 = self.next_halfedge_handle(h1);

        let moved: Vec<HalfedgeHandle> = self.halfedge_loop(h5).take_while(|&h| h != h1).collect();
        for heh in moved {
            self.h_mut(heh).face_handle = f0;
        }
        self.h_mut(h2).next_halfedge_handle = h5;
        self.h_mut(h4).next_halfedge_handle = h3;

        if self.halfedge_handle(v0) == h0 {
            self.v_mut(v0).halfedge_handle = h5;
        }
        if self.halfedge_handle(v1) == h1 {
            self.v_mut(v1).halfedge_handle = h3;
        }
        self.f_mut(f0).halfedge_handle = h2;

        self.kernel.delete_halfedge(h0);
        self.kernel.delete_halfedge(h1);
        self.kernel.delete_edge(eh);
        self.kernel.delete_face(f1);

        self.canonicalize_vertex_halfedge(v0);
        self.canonicalize_vertex_halfedge(v1);
        Some(f0)
    }

    /// Both halfedges of `eh` lie in one face.
    fn erase_spoke(
        &mut self,
        eh: EdgeHandle,
        h0: HalfedgeHandle,
        h1: HalfedgeHandle,
    ) -> Option<FaceHandle> {
        let fh = self.face_handle(h0);
        let tip0 = self.next_halfedge_handle(h0) == h1;
        let tip1 = self.next_halfedge_handle(h1) == h0;

        if self.face_degree(fh) < 5 {
            trace!("erase_edge: face would drop below three sides");
            return None;
        }
        if !tip0 && !tip1 {
            trace!("erase_edge: edge bridges two loops of one face");
            return None;
        }

        // `inward` runs into the tip vertex, `outward` comes back out of it
        let (inward, outward) = if tip0 { (h0, h1) } else { (h1, h0) };
        let tip = self.to_vertex_handle(inward);
        let base = self.from_vertex_handle(inward);
        let before = self.prev_halfedge_handle(inward);
        let after = self.next_halfedge_handle(outward);

        self.h_mut(before).next_halfedge_handle = after;
        if self.halfedge_handle(base) == inward {
            self.v_mut(base).halfedge_handle = after;
        }
        let fh_heh = self.face_halfedge_handle(fh);
        if fh_heh == inward || fh_heh == outward {
            self.f_mut(fh).halfedge_handle = after;
        }

        self.kernel.delete_vertex(tip);
        self.kernel.delete_halfedge(inward);
        self.kernel.delete_halfedge(outward);
        self.kernel.delete_edge(eh);

        self.canonicalize_vertex_halfedge(base);
        Some(fh)
    }

    /// Remove an interior vertex, merging all of its faces into one.
    ///
    /// Refuses boundary vertices, vertices that touch the same face twice and
    /// vertices whose merged face would have fewer than three sides. The
    /// merged face is returned.
    pub fn erase_vertex(&mut self, vh: VertexHandle) -> Option<FaceHandle> {
        if !self.is_valid_vertex(vh) {
            trace!("erase_vertex: stale vertex");
            return None;
        }
        if self.vertex_on_boundary(vh) {
            trace!("erase_vertex: boundary vertex");
            return None;
        }

        let mut faces: Vec<FaceHandle> = self.vertex_faces(vh).collect();
        let degree = faces.len();
        faces.sort_unstable();
        faces.dedup();
        if faces.len() != degree {
            trace!("erase_vertex: vertex visits a face more than once");
            return None;
        }
        // every erased edge takes two sides out of the merged loop
        let sides: usize = faces.iter().map(|&fh| self.face_degree(fh)).sum();
        if sides < 2 * degree + 3 {
            trace!("erase_vertex: merged face would have {} sides", sides.saturating_sub(2 * degree));
            return None;
        }

        let edges: Vec<EdgeHandle> = self
            .vertex_halfedges(vh)
            .map(|heh| self.edge_handle(heh))
            .collect();

        let mut merged = None;
        for eh in edges {
            merged = Some(self.erase_edge(eh)?);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::{
        generate_cube, generate_grid, generate_icosahedron, generate_pillow, generate_unit_quad,
    };

    #[test]
    fn test_erase_edge_merges_faces() {
        let mut mesh = generate_cube();
        let eh = mesh.edges().next().unwrap();
        let fh = mesh.erase_edge(eh).unwrap();

        assert_eq!(mesh.face_degree(fh), 6);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.n_faces(), 5);
        assert_eq!(mesh.n_edges(), 11);
        assert_eq!(mesh.n_vertices(), 8);
    }

    #[test]
    fn test_erase_edge_refuses_boundary() {
        let mut mesh = generate_unit_quad();
        let eh = mesh.edges().next().unwrap();
        assert!(mesh.erase_edge(eh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
    }

    #[test]
    fn test_erase_vertex_on_icosahedron() {
        let mut mesh = generate_icosahedron();
        let vh = mesh.vertices().next().unwrap();
        let fh = mesh.erase_vertex(vh).unwrap();

        assert_eq!(mesh.face_degree(fh), 5);
        assert!(!mesh.is_valid_vertex(vh));
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.n_vertices(), 11);
        assert_eq!(mesh.n_edges(), 25);
        assert_eq!(mesh.n_faces(), 16);
    }

    #[test]
    fn test_erase_vertex_in_grid() {
        let mut mesh = generate_grid(3, 3);
        // the centre vertex is the only interior one
        let vh = mesh.vertices().find(|&v| !mesh.vertex_on_boundary(v)).unwrap();
        let fh = mesh.erase_vertex(vh).unwrap();

        assert_eq!(mesh.face_degree(fh), 8);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.n_interior_faces(), 1);
    }

    #[test]
    fn test_erase_vertex_refuses_boundary() {
        let mut mesh = generate_grid(3, 3);
        let vh = mesh.vertices().find(|&v| mesh.vertex_on_boundary(v)).unwrap();
        assert!(mesh.erase_vertex(vh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_erase_vertex_refuses_two_sided_face() {
        let mut mesh = generate_pillow();
        let vh = mesh.vertices().next().unwrap();
        assert!(mesh.erase_vertex(vh).is_none());
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_erase_spoke_refuses_two_sided_face() {
        let mut mesh = generate_pillow();
        let eh = mesh.edges().next().unwrap();
        // two spokes hang from the remaining vertex
        let fh = mesh.erase_edge(eh).unwrap();
        assert_eq!(mesh.face_degree(fh), 4);
        assert!(mesh.validate().is_ok());

        let spokes: Vec<_> = mesh.edges().collect();
        for eh in spokes {
            assert!(mesh.erase_edge(eh).is_none());
        }
        assert_eq!(mesh.kernel().n_pending_erase(), 0);
        assert!(mesh.validate().is_ok());
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (3, 2, 1));
    }

    #[test]
    fn test_erase_spoke_from_larger_face() {
        let mut mesh = generate_cube();
        let vh = mesh.vertices().next().unwrap();
        let edges: Vec<_> = mesh.vertex_halfedges(vh).map(|h| mesh.edge_handle(h)).collect();
        mesh.erase_edge(edges[0]).unwrap();
        mesh.erase_edge(edges[1]).unwrap();

        let fh = mesh.erase_edge(edges[2]).unwrap();
        assert_eq!(mesh.face_degree(fh), 6);
        assert!(!mesh.is_valid_vertex(vh));
        assert!(mesh.validate().is_ok());
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (7, 9, 4));
    }
}
