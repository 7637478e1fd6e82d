//! # Isotropic remeshing
//!
//! Drives a triangle mesh towards uniform edge length and regular valence
//! (Botsch and Kobbelt, 2004). Each iteration:
//!
//! 1. **Split** edges longer than `split_ratio * L`
//! 2. **Collapse** edges shorter than `collapse_ratio * L`, unless that would
//!    create an edge longer than the split threshold
//! 3. **Flip** edges when that brings the four vertices involved closer to
//!    valence 6 (4 on the boundary) without folding the surface
//! 4. **Smooth** tangentially, boundary vertices fixed
//!
//! `L` is the mean edge length of the input mesh. Edges touching the boundary
//! are never collapsed, so the outline of an open mesh is kept.
//!
//! # References
//!
//! - Botsch, M., & Kobbelt, L. (2004). "A remeshing approach to
//!   multiresolution modeling." Symposium on Geometry Processing.

use std::fmt;

use log::{debug, info};

use crate::connectivity::HalfedgeMesh;
use crate::error::{MeshError, MeshResult};
use crate::handles::{EdgeHandle, VertexHandle};
use crate::geometry::triangle_normal;
use crate::smoother::{tangential_smooth, SmootherConfig};

/// Remeshing configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemeshConfig {
    /// Number of split/collapse/flip/smooth passes
    pub iterations: usize,
    /// Edges longer than `split_ratio * L` are split
    pub split_ratio: f32,
    /// Edges shorter than `collapse_ratio * L` are collapsed
    pub collapse_ratio: f32,
    /// Tangential smoothing strength per pass
    pub smoothing_weight: f32,
}

impl Default for RemeshConfig {
    fn default() -> Self {
        Self {
            iterations: 6,
            split_ratio: 4.0 / 3.0,
            collapse_ratio: 4.0 / 5.0,
            smoothing_weight: 0.2,
        }
    }
}

/// Outcome of a remeshing run
#[derive(Debug, Clone, Default)]
pub struct RemeshStats {
    pub iterations: usize,
    /// Mean edge length of the input
    pub target_length: f32,
    pub splits: usize,
    pub collapses: usize,
    pub flips: usize,
    pub original_faces: usize,
    pub final_faces: usize,
}

impl fmt::Display for RemeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Remesh: {}F -> {}F in {} passes (L = {:.4}, {} splits, {} collapses, {} flips)",
            self.original_faces,
            self.final_faces,
            self.iterations,
            self.target_length,
            self.splits,
            self.collapses,
            self.flips
        )
    }
}

impl HalfedgeMesh {
    /// Isotropic remeshing with the default configuration
    pub fn isotropic_remesh(&mut self) -> MeshResult<RemeshStats> {
        self.isotropic_remesh_with(&RemeshConfig::default())
    }

    /// Isotropic remeshing. Fails on empty and non-triangle meshes without
    /// modifying them.
    pub fn isotropic_remesh_with(&mut self, config: &RemeshConfig) -> MeshResult<RemeshStats> {
        self.do_erase();
        if self.n_interior_faces() == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if !self.is_triangle_mesh() {
            return Err(MeshError::NotTriangular);
        }

        let n_edges = self.n_edges();
        let target = self.edges().map(|eh| self.edge_length(eh)).sum::<f32>() / n_edges as f32;
        let high = target * config.split_ratio;
        let low = target * config.collapse_ratio;

        let mut stats = RemeshStats {
            iterations: config.iterations,
            target_length: target,
            original_faces: self.n_interior_faces(),
            ..Default::default()
        };
        let smoothing = SmootherConfig {
            iterations: 1,
            strength: config.smoothing_weight,
            fixed_boundary: true,
        };

        for pass in 0..config.iterations {
            let splits = self.split_long_edges(high);
            let collapses = self.collapse_short_edges(low, high);
            let flips = self.flip_to_regular_valence();
            tangential_smooth(self, &smoothing);
            debug!(
                "remesh pass {}: {} splits, {} collapses, {} flips",
                pass, splits, collapses, flips
            );
            stats.splits += splits;
            stats.collapses += collapses;
            stats.flips += flips;
        }

        self.do_erase();
        stats.final_faces = self.n_interior_faces();
        info!("{}", stats);
        Ok(stats)
    }

    fn split_long_edges(&mut self, high: f32) -> usize {
        let long: Vec<EdgeHandle> = self
            .edges()
            .filter(|&eh| self.edge_length(eh) > high)
            .collect();
        long.into_iter()
            .filter(|&eh| self.split_edge(eh).is_some())
            .count()
    }

    fn collapse_short_edges(&mut self, low: f32, high: f32) -> usize {
        let short: Vec<EdgeHandle> = self
            .edges()
            .filter(|&eh| self.edge_length(eh) < low)
            .collect();

        let mut count = 0;
        for eh in short {
            if !self.is_valid_edge(eh) || self.edge_length(eh) >= low {
                continue;
            }
            let (v0, v1) = self.edge_vertices(eh);
            if self.vertex_on_boundary(v0) || self.vertex_on_boundary(v1) || !self.is_collapse_ok(eh) {
                continue;
            }
            let center = self.edge_center(eh);
            let stretched = self
                .vertex_vertices(v0)
                .chain(self.vertex_vertices(v1))
                .any(|n| self.pos(n).distance(center) > high);
            if stretched {
                continue;
            }
            if self.collapse_edge_erase(eh).is_some() {
                count += 1;
            }
        }
        count
    }

    fn target_valence(&self, vh: VertexHandle) -> i32 {
        if self.vertex_on_boundary(vh) {
            4
        } else {
            6
        }
    }

    fn flip_to_regular_valence(&mut self) -> usize {
        let interior: Vec<EdgeHandle> = self
            .edges()
            .filter(|&eh| !self.edge_on_boundary(eh))
            .collect();

        let mut count = 0;
        for eh in interior {
            if self.improves_valence(eh) && !self.flip_folds(eh) && self.flip_edge(eh).is_some() {
                count += 1;
            }
        }
        count
    }

    /// Sum of valence deviations of the four vertices around `eh` drops
    fn improves_valence(&self, eh: EdgeHandle) -> bool {
        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.opposite_halfedge_handle(h0);
        let (a, b) = (self.from_vertex_handle(h0), self.to_vertex_handle(h0));
        if self.vertex_degree(a) <= 3 || self.vertex_degree(b) <= 3 {
            return false;
        }
        let c = self.to_vertex_handle(self.next_halfedge_handle(h0));
        let d = self.to_vertex_handle(self.next_halfedge_handle(h1));

        let deviation = |vh: VertexHandle, delta: i32| {
            (self.vertex_degree(vh) as i32 + delta - self.target_valence(vh)).abs()
        };
        let before = deviation(a, 0) + deviation(b, 0) + deviation(c, 0) + deviation(d, 0);
        let after = deviation(a, -1) + deviation(b, -1) + deviation(c, 1) + deviation(d, 1);
        after < before
    }

    /// The two triangles after the flip would turn against the old normal
    fn flip_folds(&self, eh: EdgeHandle) -> bool {
        let h0 = self.edge_halfedge_handle(eh);
        let h1 = self.opposite_halfedge_handle(h0);
        let (a, b) = (self.from_vertex_handle(h0), self.to_vertex_handle(h0));
        let c = self.to_vertex_handle(self.next_halfedge_handle(h0));
        let d = self.to_vertex_handle(self.next_halfedge_handle(h1));

        let normal = self.face_normal(self.face_handle(h0)) + self.face_normal(self.face_handle(h1));
        let (pa, pb, pc, pd) = (self.pos(a), self.pos(b), self.pos(c), self.pos(d));
        [triangle_normal(pa, pd, pc), triangle_normal(pd, pb, pc)]
            .iter()
            .any(|n| n.dot(normal) <= 0.0)
    }
}
