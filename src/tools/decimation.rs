// ============================================================================
// Decimation Module - Quadric error metric simplification
// Garland-Heckbert edge collapse with a removable priority queue
// ============================================================================

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use glam::{DVec3, Vec3};
use log::{debug, info, trace, warn};

use crate::connectivity::HalfedgeMesh;
use crate::error::{MeshError, MeshResult};
use crate::handles::{EdgeHandle, VertexHandle};
use crate::quadric::Quadric;

/// Simplification configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifyConfig {
    /// Target face count as a fraction of the starting face count
    pub target_ratio: f32,
    /// Refuse to simplify when the target would fall below this many faces
    pub min_faces: usize,
    /// Determinant below which the quadric system counts as singular and
    /// the edge midpoint is used instead of the optimal point
    pub singular_threshold: f64,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            target_ratio: 0.25,
            min_faces: 4,
            singular_threshold: 1e-6,
        }
    }
}

/// Outcome of a simplification pass
#[derive(Debug, Clone, Default)]
pub struct SimplifyStats {
    pub original_vertices: usize,
    pub original_faces: usize,
    pub final_vertices: usize,
    pub final_faces: usize,
    /// Edges collapsed
    pub collapses: usize,
    /// Candidates dropped because the collapse would break the manifold
    pub skipped: usize,
    /// Edge records that fell back to the midpoint
    pub singular_fallbacks: usize,
}

impl fmt::Display for SimplifyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simplify: {}V {}F -> {}V {}F ({} collapses, {} skipped)",
            self.original_vertices,
            self.original_faces,
            self.final_vertices,
            self.final_faces,
            self.collapses,
            self.skipped
        )
    }
}

/// Collapse candidate: where the merged vertex would go and what it costs
#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    optimal: Vec3,
    cost: f64,
}

/// Queue entry ordered by cost, ties broken by the edge id
#[derive(Debug, Clone, Copy)]
struct QueueKey {
    cost: f64,
    id: u32,
    edge: EdgeHandle,
}

impl PartialEq for QueueKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueKey {}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.id.cmp(&other.id))
            .then(self.edge.cmp(&other.edge))
    }
}

/// Quadric decimater working on a triangle mesh
struct Decimater<'a> {
    mesh: &'a mut HalfedgeMesh,
    config: &'a SimplifyConfig,
    quadrics: HashMap<VertexHandle, Quadric>,
    records: HashMap<EdgeHandle, (QueueKey, EdgeRecord)>,
    queue: BTreeSet<QueueKey>,
    stats: SimplifyStats,
}

impl<'a> Decimater<'a> {
    fn new(mesh: &'a mut HalfedgeMesh, config: &'a SimplifyConfig) -> Self {
        let stats = SimplifyStats {
            original_vertices: mesh.n_vertices(),
            original_faces: mesh.n_interior_faces(),
            ..Default::default()
        };
        Self {
            mesh,
            config,
            quadrics: HashMap::new(),
            records: HashMap::new(),
            queue: BTreeSet::new(),
            stats,
        }
    }

    /// Sum of the plane quadrics of the faces around a vertex
    fn vertex_quadric(&self, vh: VertexHandle) -> Quadric {
        self.mesh
            .vertex_faces(vh)
            .filter(|&fh| !self.mesh.is_boundary_face(fh))
            .map(|fh| Quadric::from_face(self.mesh.face_normal(fh), self.mesh.face_center(fh)))
            .sum()
    }

    fn edge_record(&mut self, eh: EdgeHandle) -> EdgeRecord {
        let (v0, v1) = self.mesh.edge_vertices(eh);
        let q0 = self.quadrics.get(&v0).copied().unwrap_or_default();
        let q1 = self.quadrics.get(&v1).copied().unwrap_or_default();
        let q = q0 + q1;

        let optimal: DVec3 = match q.optimize(self.config.singular_threshold) {
            Some(p) if p.is_finite() => p,
            _ => {
                trace!("decimation: singular quadric, using edge midpoint");
                self.stats.singular_fallbacks += 1;
                self.mesh.edge_center(eh).as_dvec3()
            }
        };
        EdgeRecord {
            optimal: optimal.as_vec3(),
            cost: q.value(optimal),
        }
    }

    fn insert_record(&mut self, eh: EdgeHandle) {
        let record = self.edge_record(eh);
        let key = QueueKey {
            cost: record.cost,
            id: self.mesh.e(eh).id,
            edge: eh,
        };
        self.queue.insert(key);
        self.records.insert(eh, (key, record));
    }

    fn remove_record(&mut self, eh: EdgeHandle) {
        if let Some((key, _)) = self.records.remove(&eh) {
            self.queue.remove(&key);
        }
    }

    fn initialize(&mut self) {
        let vhs: Vec<VertexHandle> = self.mesh.vertices().collect();
        for vh in vhs {
            let q = self.vertex_quadric(vh);
            self.quadrics.insert(vh, q);
        }
        let ehs: Vec<EdgeHandle> = self.mesh.edges().collect();
        for eh in ehs {
            self.insert_record(eh);
        }
        debug!("decimation: {} candidate edges", self.queue.len());
    }

    fn run(mut self, target: usize) -> MeshResult<SimplifyStats> {
        self.initialize();
        let boundaries = self.mesh.n_boundaries();
        let mut faces = self.stats.original_faces;

        while faces > target {
            let Some(key) = self.queue.pop_first() else {
                warn!("decimation stalled at {} faces (target {})", faces, target);
                return Err(MeshError::Stalled { faces, target });
            };
            let Some((_, record)) = self.records.remove(&key.edge) else {
                continue;
            };
            if !self.mesh.is_collapse_ok(key.edge) {
                self.stats.skipped += 1;
                continue;
            }

            let (v0, v1) = self.mesh.edge_vertices(key.edge);
            let stale: Vec<EdgeHandle> = self
                .mesh
                .vertex_halfedges(v0)
                .chain(self.mesh.vertex_halfedges(v1))
                .map(|heh| self.mesh.edge_handle(heh))
                .collect();
            for eh in stale {
                self.remove_record(eh);
            }

            let Some(m) = self.mesh.collapse_edge_erase(key.edge) else {
                self.stats.skipped += 1;
                continue;
            };
            self.mesh.set_point(m, record.optimal);
            self.quadrics.remove(&v0);
            self.quadrics.remove(&v1);
            self.stats.collapses += 1;
            faces = self.mesh.n_faces() - boundaries;

            let ring: Vec<VertexHandle> = std::iter::once(m)
                .chain(self.mesh.vertex_vertices(m))
                .collect();
            for vh in ring {
                let q = self.vertex_quadric(vh);
                self.quadrics.insert(vh, q);
            }
            let around: Vec<EdgeHandle> = self
                .mesh
                .vertex_halfedges(m)
                .map(|heh| self.mesh.edge_handle(heh))
                .collect();
            for eh in around {
                self.remove_record(eh);
                self.insert_record(eh);
            }
        }

        self.stats.final_vertices = self.mesh.n_vertices();
        self.stats.final_faces = faces;
        Ok(self.stats)
    }
}

impl HalfedgeMesh {
    /// Simplify to a quarter of the faces with the default configuration
    pub fn simplify(&mut self) -> MeshResult<SimplifyStats> {
        self.simplify_with(&SimplifyConfig::default())
    }

    /// Quadric error metric simplification.
    ///
    /// Collapses the cheapest edge until the face count is at most
    /// `floor(F * target_ratio)`. Fails without touching the mesh when the mesh
    /// is empty or not triangular, or when the target is below `min_faces`. If
    /// the candidates run out first the mesh is restored and `Stalled` is
    /// returned.
    pub fn simplify_with(&mut self, config: &SimplifyConfig) -> MeshResult<SimplifyStats> {
        self.do_erase();
        let faces = self.n_interior_faces();
        if faces == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if !self.is_triangle_mesh() {
            return Err(MeshError::NotTriangular);
        }
        let target = (faces as f32 * config.target_ratio).floor() as usize;
        if target < config.min_faces {
            return Err(MeshError::TooFewFaces {
                target,
                minimum: config.min_faces,
            });
        }

        let backup = self.clone();
        let result = Decimater::new(self, config).run(target);
        match result {
            Ok(stats) => {
                if stats.singular_fallbacks > 0 {
                    warn!("decimation: {} singular quadrics fell back to midpoints", stats.singular_fallbacks);
                }
                info!("{}", stats);
                Ok(stats)
            }
            Err(err) => {
                *self = backup;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{
        generate_cube, generate_icosahedron, generate_icosphere, generate_tetrahedron,
        generate_triangle_grid,
    };

    #[test]
    fn test_queue_key_order() {
        let mesh = generate_tetrahedron();
        let edges: Vec<EdgeHandle> = mesh.edges().collect();
        let low = QueueKey { cost: 0.5, id: 9, edge: edges[0] };
        let tie = QueueKey { cost: 0.5, id: 10, edge: edges[1] };
        let high = QueueKey { cost: 2.0, id: 1, edge: edges[2] };

        let queue: BTreeSet<QueueKey> = [high, tie, low].into_iter().collect();
        let order: Vec<u32> = queue.iter().map(|k| k.id).collect();
        assert_eq!(order, vec![9, 10, 1]);
    }

    #[test]
    fn test_simplify_icosphere() {
        let mut mesh = generate_icosphere(1);
        assert_eq!(mesh.n_faces(), 80);

        let stats = mesh.simplify().unwrap();
        assert!(mesh.n_faces() <= 20);
        assert_eq!(stats.final_faces, mesh.n_faces());
        assert_eq!(stats.original_faces, 80);
        assert!(mesh.is_triangle_mesh());
        assert!(mesh.validate().is_ok());
        for vh in mesh.vertices() {
            let p = mesh.point(vh).unwrap();
            assert!(p.is_finite() && p.length() < 2.0);
        }
    }

    #[test]
    fn test_simplify_tetrahedron_refused() {
        let mut mesh = generate_tetrahedron();
        let before: Vec<Vec3> = mesh.vertices().filter_map(|v| mesh.point(v)).collect();

        let err = mesh.simplify().unwrap_err();
        assert_eq!(err, MeshError::TooFewFaces { target: 1, minimum: 4 });
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (4, 6, 4));
        let after: Vec<Vec3> = mesh.vertices().filter_map(|v| mesh.point(v)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_simplify_refuses_polygons() {
        let mut mesh = generate_cube();
        assert_eq!(mesh.simplify().unwrap_err(), MeshError::NotTriangular);
    }

    #[test]
    fn test_stalled_simplify_restores_mesh() {
        let mut mesh = generate_icosahedron();
        let config = SimplifyConfig {
            target_ratio: 0.0,
            min_faces: 0,
            ..Default::default()
        };
        let err = mesh.simplify_with(&config).unwrap_err();
        assert!(matches!(err, MeshError::Stalled { target: 0, .. }));
        assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (12, 30, 20));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_simplify_skips_refused_candidates() {
        // every edge of a flat grid costs zero, so the first edge built (a
        // boundary edge that cannot collapse) is popped first
        let mut mesh = generate_triangle_grid(8, 8);
        let first = mesh.edges().min_by_key(|&e| mesh.e(e).id).unwrap();
        assert!(mesh.edge_on_boundary(first));
        assert!(!mesh.is_collapse_ok(first));

        let config = SimplifyConfig {
            target_ratio: 0.75,
            min_faces: 0,
            ..Default::default()
        };
        let stats = mesh.simplify_with(&config).unwrap();
        assert!(stats.skipped > 0);
        assert!(stats.collapses > 0);
        assert!(stats.final_faces <= 73);
        assert_eq!(mesh.n_boundaries(), 1);
        assert!(mesh.is_triangle_mesh());
        assert!(mesh.validate().is_ok());
    }
}
