//! # Triangulation
//!
//! Splits every non-boundary face with more than three sides into triangles.
//! Ears are cut alternately from the two ends of the loop, which gives fans a
//! zig-zag strip layout instead of one high-valence hub. Faces that visit a
//! vertex twice are cut only where the diagonal joins two distinct vertices.

use log::debug;

use crate::connectivity::HalfedgeMesh;
use crate::handles::{FaceHandle, HalfedgeHandle};

impl HalfedgeMesh {
    /// Triangulate all interior faces in place. Returns the number of faces
    /// added; a mesh that is already triangular is left untouched.
    pub fn triangulate(&mut self) -> usize {
        self.do_erase();

        let faces: Vec<FaceHandle> = self
            .interior_faces()
            .filter(|&fh| self.face_degree(fh) > 3)
            .collect();

        let mut added = 0;
        for fh in faces {
            added += self.triangulate_face(fh);
        }
        debug!("triangulate: {} faces added", added);
        added
    }

    fn triangulate_face(&mut self, fh: FaceHandle) -> usize {
        // tracked by halfedge: a spoke or pinch visits a corner twice
        let mut ring: Vec<HalfedgeHandle> = self.face_halfedges(fh).collect();
        let mut added = 0;
        let mut cut_left = true;

        while ring.len() > 3 {
            let n = ring.len();
            let preferred = if cut_left { 0 } else { n - 1 };
            let Some(k) = std::iter::once(preferred).chain(0..n).find(|&k| self.is_ear(&ring, k)) else {
                break;
            };
            // the triangle around corner `k` moves to a new face and `fh`
            // keeps the remainder, entered through the new diagonal
            let p = (k + n - 1) % n;
            let Some(eh) = self.connect_vertex(ring[p], ring[(k + 1) % n]) else {
                break;
            };
            ring[p] = self.edge_halfedge_handle(eh);
            ring.remove(k);
            cut_left = !cut_left;
            added += 1;
        }
        added
    }

    /// Cutting corner `k` off the loop joins two distinct vertices
    fn is_ear(&self, ring: &[HalfedgeHandle], k: usize) -> bool {
        let n = ring.len();
        self.from_vertex_handle(ring[(k + n - 1) % n]) != self.from_vertex_handle(ring[(k + 1) % n])
    }
}
