//! # Tools
//!
//! Local editing operators and global remeshing passes, all implemented as
//! methods on [`HalfedgeMesh`](crate::HalfedgeMesh).
//!
//! Local operators return `None` when they refuse and leave the mesh as it
//! was. They tombstone the elements they remove; call
//! [`validate`](crate::HalfedgeMesh::validate) (or `do_erase`) afterwards.

pub mod bevel;
pub mod collapse;
pub mod decimation;
pub mod edge_ops;
pub mod erase;
pub mod remeshing;
pub mod subdivision;
pub mod triangulate;

pub use decimation::{SimplifyConfig, SimplifyStats};
pub use remeshing::{RemeshConfig, RemeshStats};
pub use subdivision::{SubdivisionStats, SubdivisionStrategy};
