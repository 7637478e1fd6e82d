//! # Mesh Status Flags
//!
//! Status bits carried by every mesh record. The deleted bit is the tombstone
//! used by deferred erasure; the tagged bit is free scratch space for passes
//! that need to mark elements while walking the mesh.

/// Status flags for mesh elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags(u32);

const DELETED: u32 = 1;
const TAGGED: u32 = 64;

impl StatusFlags {
    /// Create empty status flags
    pub fn new() -> Self {
        Self(0)
    }

    /// Check if deleted (erased but not yet removed)
    #[inline]
    pub fn is_deleted(&self) -> bool {
        (self.0 & DELETED) != 0
    }

    /// Set deleted flag
    #[inline]
    pub fn set_deleted(&mut self, deleted: bool) {
        if deleted { self.0 |= DELETED; } else { self.0 &= !DELETED; }
    }

    /// Check if tagged
    #[inline]
    pub fn is_tagged(&self) -> bool {
        (self.0 & TAGGED) != 0
    }

    /// Set tagged flag
    #[inline]
    pub fn set_tagged(&mut self, tagged: bool) {
        if tagged { self.0 |= TAGGED; } else { self.0 &= !TAGGED; }
    }

    /// Get the raw bits
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }
}
