//! # Handles
//!
//! Handle types for mesh entities (Vertex, Edge, Halfedge, Face).
//! Handles are generational keys into the element store: they stay valid while
//! the element is allocated and become detectably stale once it is removed.

use std::fmt;

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Handle referencing a vertex entity
    pub struct VertexHandle;
    /// Handle referencing a halfedge entity
    pub struct HalfedgeHandle;
    /// Handle referencing an edge entity
    pub struct EdgeHandle;
    /// Handle referencing a face entity (real polygon or boundary loop)
    pub struct FaceHandle;
}

/// Common behaviour of the four handle kinds
pub trait MeshHandle: Key {
    /// Get an invalid (null) handle
    #[inline]
    fn invalid() -> Self {
        Self::null()
    }

    /// Check if the handle is non-null. A non-null handle may still be stale.
    #[inline]
    fn is_valid(&self) -> bool {
        !self.is_null()
    }
}

impl MeshHandle for VertexHandle {}
impl MeshHandle for HalfedgeHandle {}
impl MeshHandle for EdgeHandle {}
impl MeshHandle for FaceHandle {}

/// A reference to any element of the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementHandle {
    Vertex(VertexHandle),
    Edge(EdgeHandle),
    Face(FaceHandle),
    Halfedge(HalfedgeHandle),
}

impl ElementHandle {
    /// Short name of the element kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vertex(_) => "vertex",
            Self::Edge(_) => "edge",
            Self::Face(_) => "face",
            Self::Halfedge(_) => "halfedge",
        }
    }
}

impl From<VertexHandle> for ElementHandle {
    #[inline]
    fn from(vh: VertexHandle) -> Self {
        Self::Vertex(vh)
    }
}

impl From<EdgeHandle> for ElementHandle {
    #[inline]
    fn from(eh: EdgeHandle) -> Self {
        Self::Edge(eh)
    }
}

impl From<FaceHandle> for ElementHandle {
    #[inline]
    fn from(fh: FaceHandle) -> Self {
        Self::Face(fh)
    }
}

impl From<HalfedgeHandle> for ElementHandle {
    #[inline]
    fn from(heh: HalfedgeHandle) -> Self {
        Self::Halfedge(heh)
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex(h) => write!(f, "vertex {:?}", h.data()),
            Self::Edge(h) => write!(f, "edge {:?}", h.data()),
            Self::Face(h) => write!(f, "face {:?}", h.data()),
            Self::Halfedge(h) => write!(f, "halfedge {:?}", h.data()),
        }
    }
}
