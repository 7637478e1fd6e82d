//! # Subdivision
//!
//! One refinement step with one of three rules.
//!
//! ## Linear and Catmull-Clark
//!
//! New positions are computed on the old mesh for every vertex, edge and
//! face. Each face of degree `n` is then replaced by `n` quads
//! `[face point, previous edge point, vertex point, next edge point]` and the
//! mesh is rebuilt from those polygons. The result has `V + E + F` vertices
//! and `sum(deg f)` quads.
//!
//! Catmull-Clark rules (closed meshes only):
//! - face point: centroid
//! - edge point: `(f0 + f1 + p0 + p1) / 4`
//! - vertex point: `(Q + 2R + (n - 3) P) / n`, with `Q` the average face
//!   point, `R` the average edge midpoint and `n` the valence
//!
//! ## Loop
//!
//! Triangle meshes only, performed in place:
//! 1. compute vertex and edge positions on the original connectivity
//! 2. split every original edge once
//! 3. flip every new edge that joins an old vertex to a new one
//!
//! The result has `V + E` vertices and `4F` triangles.
//!
//! ## References
//!
//! - Catmull, E. and Clark, J. (1978). "Recursively generated B-spline
//!   surfaces on arbitrary topological meshes".
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles".

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use log::debug;

use crate::connectivity::HalfedgeMesh;
use crate::error::{MeshError, MeshResult};
use crate::geometry::polygon_centroid;
use crate::handles::{EdgeHandle, FaceHandle, VertexHandle};

/// Refinement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubdivisionStrategy {
    /// Quads through edge midpoints and face centroids, no smoothing
    Linear,
    /// Catmull-Clark quad subdivision (closed meshes only)
    CatmullClark,
    /// Loop triangle subdivision (triangle meshes only)
    Loop,
}

/// Information about the subdivision operation
#[derive(Debug, Clone, Default)]
pub struct SubdivisionStats {
    /// Number of original vertices
    pub original_vertices: usize,
    /// Number of original edges
    pub original_edges: usize,
    /// Number of original non-boundary faces
    pub original_faces: usize,
    /// Number of new vertices created
    pub new_vertices: usize,
    /// Number of new edges created
    pub new_edges: usize,
    /// Number of new non-boundary faces created
    pub new_faces: usize,
}

impl SubdivisionStats {
    fn before(mesh: &HalfedgeMesh) -> Self {
        Self {
            original_vertices: mesh.n_vertices(),
            original_edges: mesh.n_edges(),
            original_faces: mesh.n_interior_faces(),
            ..Self::default()
        }
    }

    fn finish(mut self, mesh: &HalfedgeMesh) -> Self {
        self.new_vertices = mesh.n_vertices().saturating_sub(self.original_vertices);
        self.new_edges = mesh.n_edges().saturating_sub(self.original_edges);
        self.new_faces = mesh.n_interior_faces().saturating_sub(self.original_faces);
        self
    }
}

impl fmt::Display for SubdivisionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subdivision: {}V {}E {}F -> {}V {}E {}F (+{}/+{}/+{})",
            self.original_vertices,
            self.original_edges,
            self.original_faces,
            self.original_vertices + self.new_vertices,
            self.original_edges + self.new_edges,
            self.original_faces + self.new_faces,
            self.new_vertices,
            self.new_edges,
            self.new_faces
        )
    }
}

impl HalfedgeMesh {
    /// Refine the mesh once with the given rule.
    ///
    /// Fails with `EmptyMesh` when there is no face, `HasBoundary` for
    /// Catmull-Clark on an open mesh and `NotTriangular` for Loop on a polygon
    /// mesh. The mesh is untouched on failure.
    pub fn subdivide(&mut self, strategy: SubdivisionStrategy) -> MeshResult<SubdivisionStats> {
        self.do_erase();
        if self.n_interior_faces() == 0 {
            return Err(MeshError::EmptyMesh);
        }

        let stats = SubdivisionStats::before(self);
        match strategy {
            SubdivisionStrategy::Linear => {
                self.linear_positions();
                self.rebuild_quads()?;
            }
            SubdivisionStrategy::CatmullClark => {
                if self.has_boundary() {
                    return Err(MeshError::HasBoundary);
                }
                self.catmull_clark_positions();
                self.rebuild_quads()?;
            }
            SubdivisionStrategy::Loop => {
                if !self.is_triangle_mesh() {
                    return Err(MeshError::NotTriangular);
                }
                self.loop_subdivide();
            }
        }

        let stats = stats.finish(self);
        debug!("{:?}: {}", strategy, stats);
        Ok(stats)
    }

    fn linear_positions(&mut self) {
        let vhs: Vec<VertexHandle> = self.vertices().collect();
        for vh in vhs {
            let v = self.v_mut(vh);
            v.new_point = v.point;
        }
        let ehs: Vec<EdgeHandle> = self.edges().collect();
        for eh in ehs {
            self.e_mut(eh).new_point = self.edge_center(eh);
        }
        let fhs: Vec<FaceHandle> = self.interior_faces().collect();
        for fh in fhs {
            self.f_mut(fh).new_point = self.face_center(fh);
        }
    }

    fn catmull_clark_positions(&mut self) {
        let fhs: Vec<FaceHandle> = self.interior_faces().collect();
        for fh in fhs {
            self.f_mut(fh).new_point = self.face_center(fh);
        }

        let ehs: Vec<EdgeHandle> = self.edges().collect();
        for eh in ehs {
            let h0 = self.edge_halfedge_handle(eh);
            let h1 = self.opposite_halfedge_handle(h0);
            let f0 = self.f(self.face_handle(h0)).new_point;
            let f1 = self.f(self.face_handle(h1)).new_point;
            let (v0, v1) = self.edge_vertices(eh);
            self.e_mut(eh).new_point = (f0 + f1 + self.pos(v0) + self.pos(v1)) * 0.25;
        }

        let vhs: Vec<VertexHandle> = self.vertices().collect();
        for vh in vhs {
            let n = self.vertex_degree(vh) as f32;
            let faces: Vec<Vec3> = self.vertex_faces(vh).map(|fh| self.f(fh).new_point).collect();
            let mids: Vec<Vec3> = self
                .vertex_halfedges(vh)
                .map(|heh| self.edge_center(self.edge_handle(heh)))
                .collect();
            let q = polygon_centroid(&faces);
            let r = polygon_centroid(&mids);
            let p = self.pos(vh);
            self.v_mut(vh).new_point = (q + r * 2.0 + p * (n - 3.0)) / n;
        }
    }

    /// Replace the mesh by one quad per face corner, built from the
    /// `new_point` fields of the old elements
    fn rebuild_quads(&mut self) -> MeshResult<()> {
        let mut positions: Vec<Vec3> = Vec::new();

        let mut vertex_index: HashMap<VertexHandle, usize> = HashMap::new();
        for vh in self.vertices() {
            vertex_index.insert(vh, positions.len());
            positions.push(self.v(vh).new_point);
        }
        let mut edge_index: HashMap<EdgeHandle, usize> = HashMap::new();
        for eh in self.edges() {
            edge_index.insert(eh, positions.len());
            positions.push(self.e(eh).new_point);
        }

        let mut quads: Vec<[usize; 4]> = Vec::new();
        for fh in self.interior_faces() {
            let face_index = positions.len();
            positions.push(self.f(fh).new_point);

            for heh in self.face_halfedges(fh) {
                let prev = self.prev_halfedge_handle(heh);
                quads.push([
                    face_index,
                    edge_index[&self.edge_handle(prev)],
                    vertex_index[&self.from_vertex_handle(heh)],
                    edge_index[&self.edge_handle(heh)],
                ]);
            }
        }

        let mut rebuilt = HalfedgeMesh::from_polygons(&quads, &positions)?;
        if self.flipped() {
            rebuilt.flip();
        }
        *self = rebuilt;
        Ok(())
    }

    fn loop_subdivide(&mut self) {
        // Phase 1: positions from the original connectivity only
        let vhs: Vec<VertexHandle> = self.vertices().collect();
        for &vh in &vhs {
            let p = self.pos(vh);
            let new_point = match self.boundary_halfedge(vh) {
                Some(bh) => {
                    let a = self.pos(self.to_vertex_handle(bh));
                    let b = self.pos(self.from_vertex_handle(self.prev_halfedge_handle(bh)));
                    p * 0.75 + (a + b) * 0.125
                }
                None => {
                    let n = self.vertex_degree(vh);
                    let u = if n == 3 { 3.0 / 16.0 } else { 3.0 / (8.0 * n as f32) };
                    let sum: Vec3 = self.vertex_vertices(vh).map(|nb| self.pos(nb)).sum();
                    p * (1.0 - n as f32 * u) + sum * u
                }
            };
            let v = self.v_mut(vh);
            v.new_point = new_point;
            v.is_new = false;
        }

        let ehs: Vec<EdgeHandle> = self.edges().collect();
        for &eh in &ehs {
            let new_point = if self.edge_on_boundary(eh) {
                self.edge_center(eh)
            } else {
                let h0 = self.edge_halfedge_handle(eh);
                let h1 = self.opposite_halfedge_handle(h0);
                let (a, b) = self.edge_vertices(eh);
                let c = self.to_vertex_handle(self.next_halfedge_handle(h0));
                let d = self.to_vertex_handle(self.next_halfedge_handle(h1));
                (self.pos(a) + self.pos(b)) * 0.375 + (self.pos(c) + self.pos(d)) * 0.125
            };
            self.e_mut(eh).new_point = new_point;
        }

        // Phase 2: split each original edge once
        for eh in ehs {
            let (v0, v1) = self.edge_vertices(eh);
            let new_point = self.e(eh).new_point;
            let Some(m) = self.split_edge(eh) else {
                continue;
            };
            {
                let v = self.v_mut(m);
                v.point = new_point;
                v.is_new = true;
            }
            let spokes: Vec<(EdgeHandle, bool)> = self
                .vertex_halfedges(m)
                .map(|heh| {
                    let to = self.to_vertex_handle(heh);
                    (self.edge_handle(heh), to != v0 && to != v1)
                })
                .collect();
            for (spoke, is_new) in spokes {
                self.e_mut(spoke).is_new = is_new;
            }
        }

        // Phase 3: turn the new edges into the inner triangles
        let to_flip: Vec<EdgeHandle> = self
            .edges()
            .filter(|&eh| {
                let (a, b) = self.edge_vertices(eh);
                self.e(eh).is_new && self.v(a).is_new != self.v(b).is_new
            })
            .collect();
        for eh in to_flip {
            self.flip_edge(eh);
        }

        for vh in vhs {
            let v = self.v_mut(vh);
            v.point = v.new_point;
        }
    }
}
