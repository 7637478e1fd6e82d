//! # halfmesh - Half-edge Polygon Mesh
//!
//! A manifold, orientable polygon mesh with boundary loops, built for
//! interactive editing: local operators (erase, collapse, flip, split,
//! bevel) that either rewrite the connectivity in place or refuse, and
//! global passes (triangulation, subdivision, QEM simplification, isotropic
//! remeshing).
//!
//! Removed elements are tombstoned and only dropped by `do_erase`, which
//! `validate` runs before checking the structure.
//!
//! ## Quick Start
//!
//! ```rust
//! use halfmesh::{HalfedgeMesh, SubdivisionStrategy, Vec3};
//!
//! let positions = [
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = HalfedgeMesh::from_polygons(&[[0, 1, 2, 3]], &positions).unwrap();
//!
//! let face = mesh.interior_faces().next().unwrap();
//! let _inset = mesh.bevel_face(face).unwrap();
//! mesh.validate().unwrap();
//! assert_eq!(mesh.n_interior_faces(), 5);
//!
//! mesh.triangulate();
//! mesh.subdivide(SubdivisionStrategy::Loop).unwrap();
//! assert_eq!(mesh.n_interior_faces(), 40);
//! ```

// Re-export types
pub use circulators::{FaceHalfedgeIter, VertexHalfedgeIter};
pub use connectivity::HalfedgeMesh;
pub use error::{BuildError, MeshError, MeshResult, ValidationError};
pub use handles::{EdgeHandle, ElementHandle, FaceHandle, HalfedgeHandle, MeshHandle, VertexHandle};
pub use indexed::IndexedMesh;
pub use items::{Edge, Face, Halfedge, Vertex};
pub use kernel::ArrayKernel;
pub use quadric::Quadric;
pub use smoother::{tangential_smooth, SmoothResult, SmootherConfig};
pub use test_data::*;
pub use tools::{
    RemeshConfig, RemeshStats, SimplifyConfig, SimplifyStats, SubdivisionStats,
    SubdivisionStrategy,
};
pub use validation::ValidationWarning;
pub use glam::Vec3;

mod circulators;
mod connectivity;
mod error;
mod handles;
mod indexed;
mod items;
mod kernel;
mod quadric;
mod smoother;
mod status;
mod test_data;
mod validation;

pub mod geometry;
pub mod tools;
