//! # Validation
//!
//! Structural consistency check run after every edit. `validate` performs the
//! deferred cleanup and then reports the first broken invariant. It never
//! repairs connectivity, so a boundary vertex left pointing at the wrong
//! halfedge is an error. `warnings` lists legal but suspicious configurations.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::connectivity::HalfedgeMesh;
use crate::error::ValidationError;
use crate::handles::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle};

/// Valence above which a vertex is reported
const HIGH_VALENCE: usize = 16;
/// Face degree above which a face is reported
const LARGE_FACE: usize = 64;
/// Area below which a face counts as degenerate
const DEGENERATE_AREA: f32 = 1e-10;

/// Legal but suspicious configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    HighValence { vertex: VertexHandle, valence: usize },
    DegenerateFace { face: FaceHandle, area: f32 },
    LargeFace { face: FaceHandle, degree: usize },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighValence { valence, .. } => write!(f, "vertex has valence {}", valence),
            Self::DegenerateFace { area, .. } => write!(f, "face has near-zero area {:e}", area),
            Self::LargeFace { degree, .. } => write!(f, "face has {} sides", degree),
        }
    }
}

impl HalfedgeMesh {
    /// Erase tombstoned elements and check every structural invariant.
    ///
    /// Returns the first offending element with a description. References
    /// from live records to erased ones are reported before cleanup.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.check_erased_references()?;
        let erased = self.do_erase();
        if erased > 0 {
            debug!("validate: {} erased elements removed", erased);
        }

        self.check_dangling()?;
        self.check_next_and_twins()?;
        self.check_back_references()?;
        self.check_face_loops()?;
        self.check_vertex_fans()?;
        self.check_geometry()
    }

    fn check_erased_references(&self) -> Result<(), ValidationError> {
        let k = &self.kernel;
        let erased_v = |vh| k.vertex(vh).is_some_and(|v| v.status.is_deleted());
        let erased_h = |heh| k.halfedge(heh).is_some_and(|h| h.status.is_deleted());
        let erased_e = |eh| k.edge(eh).is_some_and(|e| e.status.is_deleted());
        let erased_f = |fh| k.face(fh).is_some_and(|f| f.status.is_deleted());

        for (vh, v) in k.vertices.iter().filter(|(_, v)| !v.status.is_deleted()) {
            if erased_h(v.halfedge_handle) {
                return Err(ValidationError::new(vh, "halfedge was erased"));
            }
        }
        for (heh, h) in k.halfedges.iter().filter(|(_, h)| !h.status.is_deleted()) {
            if erased_h(h.next_halfedge_handle) {
                return Err(ValidationError::new(heh, "next halfedge was erased"));
            }
            if erased_h(h.opposite_halfedge_handle) {
                return Err(ValidationError::new(heh, "opposite halfedge was erased"));
            }
            if erased_v(h.vertex_handle) {
                return Err(ValidationError::new(heh, "origin vertex was erased"));
            }
            if erased_e(h.edge_handle) {
                return Err(ValidationError::new(heh, "edge was erased"));
            }
            if erased_f(h.face_handle) {
                return Err(ValidationError::new(heh, "face was erased"));
            }
        }
        for (eh, e) in k.edges.iter().filter(|(_, e)| !e.status.is_deleted()) {
            if erased_h(e.halfedge_handle) {
                return Err(ValidationError::new(eh, "halfedge was erased"));
            }
        }
        for (fh, f) in k.faces.iter().filter(|(_, f)| !f.status.is_deleted()) {
            if erased_h(f.halfedge_handle) {
                return Err(ValidationError::new(fh, "halfedge was erased"));
            }
        }
        Ok(())
    }

    fn check_dangling(&self) -> Result<(), ValidationError> {
        let k = &self.kernel;
        for (vh, v) in k.vertices.iter() {
            if k.halfedge(v.halfedge_handle).is_none() {
                return Err(ValidationError::new(vh, "halfedge does not exist"));
            }
        }
        for (heh, h) in k.halfedges.iter() {
            let ok = k.halfedge(h.next_halfedge_handle).is_some()
                && k.halfedge(h.opposite_halfedge_handle).is_some()
                && k.vertex(h.vertex_handle).is_some()
                && k.edge(h.edge_handle).is_some()
                && k.face(h.face_handle).is_some();
            if !ok {
                return Err(ValidationError::new(heh, "references an element that does not exist"));
            }
        }
        for (eh, e) in k.edges.iter() {
            if k.halfedge(e.halfedge_handle).is_none() {
                return Err(ValidationError::new(eh, "halfedge does not exist"));
            }
        }
        for (fh, f) in k.faces.iter() {
            if k.halfedge(f.halfedge_handle).is_none() {
                return Err(ValidationError::new(fh, "halfedge does not exist"));
            }
        }
        Ok(())
    }

    fn check_next_and_twins(&self) -> Result<(), ValidationError> {
        let mut incoming: HashMap<HalfedgeHandle, usize> = HashMap::new();
        let mut per_edge: HashMap<EdgeHandle, usize> = HashMap::new();

        for heh in self.halfedges() {
            *incoming.entry(self.next_halfedge_handle(heh)).or_default() += 1;
            *per_edge.entry(self.edge_handle(heh)).or_default() += 1;

            let twin = self.opposite_halfedge_handle(heh);
            if twin == heh || self.opposite_halfedge_handle(twin) != heh {
                return Err(ValidationError::new(heh, "twin is not symmetric"));
            }
            if self.edge_handle(twin) != self.edge_handle(heh) {
                return Err(ValidationError::new(heh, "twin lies on a different edge"));
            }
            if self.from_vertex_handle(twin) != self.to_vertex_handle(heh) {
                return Err(ValidationError::new(heh, "twin does not start where this halfedge ends"));
            }
        }

        for heh in self.halfedges() {
            if incoming.get(&heh).copied().unwrap_or(0) != 1 {
                return Err(ValidationError::new(heh, "is not the next of exactly one halfedge"));
            }
        }
        for eh in self.edges() {
            if per_edge.get(&eh).copied().unwrap_or(0) != 2 {
                return Err(ValidationError::new(eh, "is not shared by exactly two halfedges"));
            }
        }
        Ok(())
    }

    fn check_back_references(&self) -> Result<(), ValidationError> {
        for vh in self.vertices() {
            if self.from_vertex_handle(self.halfedge_handle(vh)) != vh {
                return Err(ValidationError::new(vh, "halfedge does not start at this vertex"));
            }
        }
        for eh in self.edges() {
            if self.edge_handle(self.edge_halfedge_handle(eh)) != eh {
                return Err(ValidationError::new(eh, "halfedge belongs to another edge"));
            }
            let heh = self.edge_halfedge_handle(eh);
            if self.is_boundary_halfedge(heh) && self.is_boundary_halfedge(self.opposite_halfedge_handle(heh)) {
                return Err(ValidationError::new(eh, "both sides are boundary loops"));
            }
        }
        for fh in self.faces() {
            if self.face_handle(self.face_halfedge_handle(fh)) != fh {
                return Err(ValidationError::new(fh, "halfedge belongs to another face"));
            }
        }
        Ok(())
    }

    fn check_face_loops(&self) -> Result<(), ValidationError> {
        let n = self.n_halfedges();
        let mut covered = 0;
        for fh in self.faces() {
            let start = self.face_halfedge_handle(fh);
            let mut heh = start;
            let mut degree = 0;
            loop {
                if self.face_handle(heh) != fh {
                    return Err(ValidationError::new(heh, "face loop runs through a halfedge of another face"));
                }
                degree += 1;
                heh = self.next_halfedge_handle(heh);
                if heh == start {
                    break;
                }
                if degree > n {
                    return Err(ValidationError::new(fh, "face loop does not close"));
                }
            }
            if !self.is_boundary_face(fh) && degree < 3 {
                return Err(ValidationError::new(fh, format!("face has only {} sides", degree)));
            }
            covered += degree;
        }
        if covered != n {
            let unreached = self
                .halfedges()
                .find(|&h| !self.face_halfedges(self.face_handle(h)).any(|x| x == h));
            if let Some(heh) = unreached {
                return Err(ValidationError::new(heh, "not reachable from its face"));
            }
        }
        Ok(())
    }

    fn check_vertex_fans(&mut self) -> Result<(), ValidationError> {
        let result = self.walk_vertex_fans();
        for h in self.kernel.halfedges.values_mut() {
            h.status.set_tagged(false);
        }
        result
    }

    fn walk_vertex_fans(&mut self) -> Result<(), ValidationError> {
        let n = self.n_halfedges();
        let vhs: Vec<VertexHandle> = self.vertices().collect();

        for vh in vhs {
            let start = self.halfedge_handle(vh);
            let mut heh = start;
            let mut boundary: Vec<HalfedgeHandle> = Vec::new();
            let mut steps = 0;
            loop {
                if self.from_vertex_handle(heh) != vh {
                    return Err(ValidationError::new(vh, "fan runs through a halfedge of another vertex"));
                }
                if self.h(heh).status.is_tagged() {
                    return Err(ValidationError::new(heh, "visited twice while sweeping vertex fans"));
                }
                self.h_mut(heh).status.set_tagged(true);
                if self.is_boundary_halfedge(heh) {
                    boundary.push(heh);
                }

                steps += 1;
                heh = self.next_halfedge_handle(self.opposite_halfedge_handle(heh));
                if heh == start {
                    break;
                }
                if steps > n {
                    return Err(ValidationError::new(vh, "fan does not close"));
                }
            }

            match boundary.as_slice() {
                [] => {}
                [bh] => {
                    let first = self.next_halfedge_handle(self.opposite_halfedge_handle(*bh));
                    if start != first {
                        return Err(ValidationError::new(vh, "designated halfedge is not the first interior one"));
                    }
                }
                _ => return Err(ValidationError::new(vh, "vertex touches more than one boundary loop")),
            }
        }

        let stray = self
            .kernel
            .halfedges
            .iter()
            .find(|(_, h)| !h.status.is_tagged())
            .map(|(heh, _)| heh);
        match stray {
            Some(heh) => Err(ValidationError::new(heh, "not reachable from its origin vertex fan")),
            None => Ok(()),
        }
    }

    fn check_geometry(&self) -> Result<(), ValidationError> {
        for vh in self.vertices() {
            if !self.pos(vh).is_finite() {
                return Err(ValidationError::new(vh, "position is not finite"));
            }
        }
        Ok(())
    }

    /// Suspicious but legal configurations: very high valence, faces with
    /// near-zero area and faces with very many sides
    pub fn warnings(&self) -> Vec<ValidationWarning> {
        let mut out = Vec::new();
        for vh in self.vertices().filter(|&v| self.is_valid_vertex(v)) {
            let valence = self.vertex_degree(vh);
            if valence > HIGH_VALENCE {
                out.push(ValidationWarning::HighValence { vertex: vh, valence });
            }
        }
        for fh in self.interior_faces() {
            let degree = self.face_degree(fh);
            if degree > LARGE_FACE {
                out.push(ValidationWarning::LargeFace { face: fh, degree });
            }
            let area = self.face_area(fh);
            if area < DEGENERATE_AREA {
                out.push(ValidationWarning::DegenerateFace { face: fh, area });
            }
        }
        if !out.is_empty() {
            warn!("{} mesh warnings", out.len());
        }
        out
    }
}
