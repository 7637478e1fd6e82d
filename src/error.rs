//! Error types for mesh construction, global operations and validation.

use thiserror::Error;

use crate::handles::ElementHandle;

/// Failure to build a half-edge mesh from polygon or triangle input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("polygon {polygon} has {len} vertices, at least 3 are required")]
    DegeneratePolygon { polygon: usize, len: usize },

    #[error("polygon {polygon} references vertex {index}, but only {n_positions} positions were given")]
    IndexOutOfRange { polygon: usize, index: usize, n_positions: usize },

    #[error("polygon {polygon} visits vertex {vertex} more than once")]
    RepeatedVertex { polygon: usize, vertex: usize },

    #[error("directed edge ({from}, {to}) appears twice: inconsistent winding or an edge shared by more than two faces")]
    DuplicateEdge { from: usize, to: usize },

    #[error("vertex {vertex} is non-manifold: its faces do not form a single fan")]
    NonManifoldVertex { vertex: usize },

    #[error("vertex {vertex} has a non-finite position")]
    NonFinitePosition { vertex: usize },

    #[error("index buffer length {len} is not a multiple of 3")]
    IndexCount { len: usize },
}

/// Failure of a global operation (subdivision, simplification, remeshing)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("mesh has no faces")]
    EmptyMesh,

    #[error("mesh is not triangular")]
    NotTriangular,

    #[error("operation is not defined for meshes with boundary")]
    HasBoundary,

    #[error("target of {target} faces is below the minimum of {minimum}")]
    TooFewFaces { target: usize, minimum: usize },

    #[error("no collapsible edge left with {faces} faces remaining (target {target})")]
    Stalled { faces: usize, target: usize },

    #[error("rebuilding the mesh failed: {0}")]
    Rebuild(#[from] BuildError),
}

/// Result type for global operations
pub type MeshResult<T> = std::result::Result<T, MeshError>;

/// First structural inconsistency found by `validate()`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{element}: {message}")]
pub struct ValidationError {
    /// The offending element
    pub element: ElementHandle,
    /// What is wrong with it
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(element: impl Into<ElementHandle>, message: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::{MeshHandle, VertexHandle};

    #[test]
    fn test_error_display() {
        let err = BuildError::DuplicateEdge { from: 1, to: 2 };
        assert!(err.to_string().contains("(1, 2)"));

        let err = MeshError::TooFewFaces { target: 1, minimum: 4 };
        assert_eq!(err.to_string(), "target of 1 faces is below the minimum of 4");

        let err = ValidationError::new(VertexHandle::invalid(), "bad fan");
        assert!(err.to_string().ends_with("bad fan"));
        assert_eq!(err.element.kind(), "vertex");
    }

    #[test]
    fn test_build_error_converts() {
        let err: MeshError = BuildError::IndexCount { len: 4 }.into();
        assert!(matches!(err, MeshError::Rebuild(_)));
    }
}
