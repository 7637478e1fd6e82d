//! # Mesh Items
//!
//! Core mesh records: Vertex, Halfedge, Edge, Face.
//! Cross-references are non-owning handles resolved through the kernel.

use glam::Vec3;

use crate::handles::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};
use crate::status::StatusFlags;

/// A vertex in the mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position of the vertex in 3D space
    pub point: Vec3,
    /// One of the outgoing halfedges
    pub halfedge_handle: HalfedgeHandle,
    /// Scratch position used by subdivision and simplification passes
    pub new_point: Vec3,
    /// Set on vertices inserted by Loop subdivision
    pub is_new: bool,
    pub(crate) id: u32,
    pub(crate) status: StatusFlags,
}

impl Vertex {
    /// Create a new vertex at the given position
    pub fn new(point: Vec3, id: u32) -> Self {
        Self {
            point,
            halfedge_handle: HalfedgeHandle::default(),
            new_point: Vec3::ZERO,
            is_new: false,
            id,
            status: StatusFlags::new(),
        }
    }

    /// Unique id of this vertex
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// A halfedge in the mesh (directed side of an edge)
#[derive(Debug, Clone, PartialEq)]
pub struct Halfedge {
    /// The oppositely directed halfedge of the same edge
    pub opposite_halfedge_handle: HalfedgeHandle,
    /// The next halfedge around the face
    pub next_halfedge_handle: HalfedgeHandle,
    /// The vertex this halfedge starts from
    pub vertex_handle: VertexHandle,
    /// The edge this halfedge belongs to
    pub edge_handle: EdgeHandle,
    /// The face (or boundary loop) this halfedge borders
    pub face_handle: FaceHandle,
    pub(crate) id: u32,
    pub(crate) status: StatusFlags,
}

impl Halfedge {
    /// Create an unlinked halfedge
    pub fn new(id: u32) -> Self {
        Self {
            opposite_halfedge_handle: HalfedgeHandle::default(),
            next_halfedge_handle: HalfedgeHandle::default(),
            vertex_handle: VertexHandle::default(),
            edge_handle: EdgeHandle::default(),
            face_handle: FaceHandle::default(),
            id,
            status: StatusFlags::new(),
        }
    }

    /// Unique id of this halfedge
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// An edge in the mesh (undirected connection between two vertices)
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// One of the two halfedges of this edge
    pub halfedge_handle: HalfedgeHandle,
    /// Scratch position used by subdivision passes
    pub new_point: Vec3,
    /// Set on edges created by Loop subdivision that are not part of an original edge
    pub is_new: bool,
    pub(crate) id: u32,
    pub(crate) status: StatusFlags,
}

impl Edge {
    /// Create an edge with no halfedge yet
    pub fn new(id: u32) -> Self {
        Self {
            halfedge_handle: HalfedgeHandle::default(),
            new_point: Vec3::ZERO,
            is_new: false,
            id,
            status: StatusFlags::new(),
        }
    }

    /// Unique id of this edge
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// A face in the mesh: a real polygon, or a virtual loop standing for a hole
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// One of the halfedges bordering this face
    pub halfedge_handle: HalfedgeHandle,
    /// True if this face is a boundary loop
    pub boundary: bool,
    /// Scratch position used by subdivision passes
    pub new_point: Vec3,
    pub(crate) id: u32,
    pub(crate) status: StatusFlags,
}

impl Face {
    /// Create a face with no halfedge yet
    pub fn new(boundary: bool, id: u32) -> Self {
        Self {
            halfedge_handle: HalfedgeHandle::default(),
            boundary,
            new_point: Vec3::ZERO,
            id,
            status: StatusFlags::new(),
        }
    }

    /// Unique id of this face
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Check if this face is a boundary loop
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }
}
