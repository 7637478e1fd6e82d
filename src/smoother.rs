//! # Smoother - tangential relaxation
//!
//! Moves vertices towards the centroid of their 1-ring, restricted to the
//! local tangent plane so the surface does not shrink.

use glam::Vec3;

use crate::connectivity::HalfedgeMesh;
use crate::geometry::project_to_plane;
use crate::handles::VertexHandle;

/// Smoothing configuration
#[derive(Debug, Clone)]
pub struct SmootherConfig {
    /// Number of smoothing iterations
    pub iterations: usize,
    /// Smoothing strength (0.0 - 1.0)
    pub strength: f32,
    /// Boundary vertices are fixed
    pub fixed_boundary: bool,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            strength: 0.2,
            fixed_boundary: true,
        }
    }
}

/// Smoothing result
#[derive(Debug, Clone, Default)]
pub struct SmoothResult {
    pub iterations: usize,
    pub moved_vertices: usize,
    pub max_displacement: f32,
}

/// Uniform Laplacian of a vertex: centroid of the 1-ring minus the vertex
fn laplacian_uniform(mesh: &HalfedgeMesh, vh: VertexHandle) -> Option<Vec3> {
    let current = mesh.point(vh)?;
    if mesh.vertex_degree(vh) == 0 {
        return None;
    }
    Some(mesh.neighborhood_center(vh) - current)
}

/// Tangential smoothing
///
/// `p' = p + strength * (L - n (n . L))` with `L` the uniform Laplacian and
/// `n` the vertex normal. Displacements of one iteration are computed from the
/// positions of the previous one (Jacobi update).
pub fn tangential_smooth(mesh: &mut HalfedgeMesh, config: &SmootherConfig) -> SmoothResult {
    let vhs: Vec<VertexHandle> = mesh
        .vertices()
        .filter(|&vh| mesh.is_valid_vertex(vh))
        .collect();
    let mut displacements: Vec<Vec3> = Vec::with_capacity(vhs.len());
    let mut result = SmoothResult {
        iterations: config.iterations,
        ..Default::default()
    };

    for _ in 0..config.iterations {
        displacements.clear();
        for &vh in &vhs {
            if config.fixed_boundary && mesh.vertex_on_boundary(vh) {
                displacements.push(Vec3::ZERO);
                continue;
            }
            let disp = laplacian_uniform(mesh, vh)
                .map(|lap| project_to_plane(lap, mesh.vertex_normal(vh)) * config.strength)
                .unwrap_or(Vec3::ZERO);
            displacements.push(disp);
        }

        for (&vh, &disp) in vhs.iter().zip(&displacements) {
            if disp == Vec3::ZERO || !disp.is_finite() {
                continue;
            }
            if let Some(p) = mesh.point(vh) {
                mesh.set_point(vh, p + disp);
                result.moved_vertices += 1;
                result.max_displacement = result.max_displacement.max(disp.length());
            }
        }
    }

    result
}
