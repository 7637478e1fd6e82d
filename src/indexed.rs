//! # Indexed Mesh Conversion
//!
//! Building a half-edge mesh from polygon lists or triangle buffers, and
//! flattening it back into an indexed triangle buffer for rendering.

use std::collections::HashMap;

use glam::Vec3;
use log::debug;

use crate::connectivity::HalfedgeMesh;
use crate::error::BuildError;
use crate::handles::{HalfedgeHandle, VertexHandle};

/// Renderable vertex/index buffer (triangle list)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`
    pub normals: Vec<Vec3>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// Number of triangles
    pub fn n_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

impl HalfedgeMesh {
    /// Build a mesh from ordered vertex-index loops and a position list.
    ///
    /// Positions no polygon refers to are dropped. Edges used by a single
    /// polygon are closed off by boundary loops.
    pub fn from_polygons<P: AsRef<[usize]>>(
        polygons: &[P],
        positions: &[Vec3],
    ) -> Result<Self, BuildError> {
        for (i, polygon) in polygons.iter().enumerate() {
            let polygon = polygon.as_ref();
            if polygon.len() < 3 {
                return Err(BuildError::DegeneratePolygon { polygon: i, len: polygon.len() });
            }
            for (k, &index) in polygon.iter().enumerate() {
                if index >= positions.len() {
                    return Err(BuildError::IndexOutOfRange {
                        polygon: i,
                        index,
                        n_positions: positions.len(),
                    });
                }
                if polygon[..k].contains(&index) {
                    return Err(BuildError::RepeatedVertex { polygon: i, vertex: index });
                }
                if !positions[index].is_finite() {
                    return Err(BuildError::NonFinitePosition { vertex: index });
                }
            }
        }

        let mut mesh = HalfedgeMesh::new();

        let mut vertex_map: Vec<Option<VertexHandle>> = vec![None; positions.len()];
        for polygon in polygons {
            for &index in polygon.as_ref() {
                if vertex_map[index].is_none() {
                    vertex_map[index] = Some(mesh.kernel.new_vertex(positions[index]));
                }
            }
        }
        let vertex_of = |index: usize| vertex_map[index].unwrap_or_default();

        // Interior halfedges, keyed by directed vertex-index pair
        let mut directed: HashMap<(usize, usize), HalfedgeHandle> = HashMap::new();
        let mut ordered: Vec<((usize, usize), HalfedgeHandle)> = Vec::new();
        let mut outgoing = vec![0usize; positions.len()];

        for polygon in polygons {
            let polygon = polygon.as_ref();
            let fh = mesh.kernel.new_face(false);
            let hs: Vec<HalfedgeHandle> = polygon.iter().map(|_| mesh.kernel.new_halfedge()).collect();

            for (k, &a) in polygon.iter().enumerate() {
                let b = polygon[(k + 1) % polygon.len()];
                if directed.insert((a, b), hs[k]).is_some() {
                    return Err(BuildError::DuplicateEdge { from: a, to: b });
                }
                ordered.push(((a, b), hs[k]));
                outgoing[a] += 1;

                let vh = vertex_of(a);
                let h = mesh.h_mut(hs[k]);
                h.vertex_handle = vh;
                h.face_handle = fh;
                h.next_halfedge_handle = hs[(k + 1) % hs.len()];
                mesh.v_mut(vh).halfedge_handle = hs[k];
            }
            mesh.f_mut(fh).halfedge_handle = hs[0];
        }

        // Pair twins, creating boundary halfedges for unpaired sides
        let mut boundary_out: HashMap<usize, HalfedgeHandle> = HashMap::new();
        let mut boundary: Vec<(usize, HalfedgeHandle)> = Vec::new();

        for &((a, b), heh) in &ordered {
            if mesh.opposite_halfedge_handle(heh) != HalfedgeHandle::default() {
                continue;
            }
            let eh = mesh.kernel.new_edge();
            mesh.e_mut(eh).halfedge_handle = heh;

            let twin = match directed.get(&(b, a)) {
                Some(&twin) => twin,
                None => {
                    let twin = mesh.kernel.new_halfedge();
                    mesh.h_mut(twin).vertex_handle = vertex_of(b);
                    if boundary_out.insert(b, twin).is_some() {
                        return Err(BuildError::NonManifoldVertex { vertex: b });
                    }
                    boundary.push((a, twin));
                    outgoing[b] += 1;
                    twin
                }
            };
            mesh.h_mut(heh).opposite_halfedge_handle = twin;
            mesh.h_mut(heh).edge_handle = eh;
            mesh.h_mut(twin).opposite_halfedge_handle = heh;
            mesh.h_mut(twin).edge_handle = eh;
        }

        // A boundary halfedge b -> a continues with the boundary halfedge leaving a
        for &(a, twin) in &boundary {
            let next = boundary_out
                .get(&a)
                .copied()
                .ok_or(BuildError::NonManifoldVertex { vertex: a })?;
            mesh.h_mut(twin).next_halfedge_handle = next;
        }

        for &(_, start) in &boundary {
            if mesh.face_handle(start) != Default::default() {
                continue;
            }
            let fh = mesh.kernel.new_face(true);
            mesh.f_mut(fh).halfedge_handle = start;
            let loop_halfedges: Vec<HalfedgeHandle> = mesh.halfedge_loop(start).collect();
            for heh in loop_halfedges {
                mesh.h_mut(heh).face_handle = fh;
            }
        }

        // Every outgoing halfedge must be reachable from the vertex's fan
        for (index, vh) in vertex_map.iter().enumerate() {
            if let Some(vh) = *vh {
                mesh.canonicalize_vertex_halfedge(vh);
                if mesh.vertex_degree(vh) != outgoing[index] {
                    return Err(BuildError::NonManifoldVertex { vertex: index });
                }
            }
        }

        debug!(
            "built mesh: {} vertices, {} edges, {} faces ({} boundary loops)",
            mesh.n_vertices(),
            mesh.n_edges(),
            mesh.n_faces(),
            mesh.n_boundaries()
        );
        Ok(mesh)
    }

    /// Build a mesh from a triangle buffer. Vertices are not de-duplicated, so
    /// the buffer must already share vertices between adjacent triangles.
    pub fn from_indexed(indexed: &IndexedMesh) -> Result<Self, BuildError> {
        if indexed.indices.len() % 3 != 0 {
            return Err(BuildError::IndexCount { len: indexed.indices.len() });
        }
        let triangles: Vec<[usize; 3]> = indexed
            .indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();
        Self::from_polygons(&triangles, &indexed.positions)
    }

    /// Polygon loops (one per live non-boundary face) and the positions they
    /// index, in enumeration order
    pub fn to_polygons(&self) -> (Vec<Vec<usize>>, Vec<Vec3>) {
        let mut index_of: HashMap<VertexHandle, usize> = HashMap::new();
        let mut positions = Vec::with_capacity(self.n_vertices());
        for vh in self.vertices() {
            if self.is_valid_vertex(vh) {
                index_of.insert(vh, positions.len());
                positions.push(self.pos(vh));
            }
        }

        let polygons = self
            .interior_faces()
            .map(|fh| {
                self.face_vertices(fh)
                    .map(|vh| index_of.get(&vh).copied().unwrap_or_default())
                    .collect()
            })
            .collect();
        (polygons, positions)
    }

    /// Flatten into a triangle buffer. Faces are fan-triangulated. With
    /// `split_faces`, every face gets its own vertex copies carrying the face
    /// normal (flat shading); otherwise vertices are shared and carry vertex
    /// normals. Winding and normals follow the orientation flag.
    pub fn to_indexed(&self, split_faces: bool) -> IndexedMesh {
        let mut out = IndexedMesh::default();
        let sign = if self.flipped() { -1.0 } else { 1.0 };

        let push_fan = |indices: &mut Vec<u32>, corners: &[u32]| {
            for i in 1..corners.len().saturating_sub(1) {
                let (a, b, c) = (corners[0], corners[i], corners[i + 1]);
                if self.flipped() {
                    indices.extend_from_slice(&[a, c, b]);
                } else {
                    indices.extend_from_slice(&[a, b, c]);
                }
            }
        };

        if split_faces {
            for fh in self.interior_faces() {
                let normal = self.face_normal(fh) * sign;
                let mut corners = Vec::with_capacity(4);
                for vh in self.face_vertices(fh) {
                    corners.push(out.positions.len() as u32);
                    out.positions.push(self.pos(vh));
                    out.normals.push(normal);
                }
                push_fan(&mut out.indices, &corners);
            }
        } else {
            let mut index_of: HashMap<VertexHandle, u32> = HashMap::new();
            for vh in self.vertices() {
                if self.is_valid_vertex(vh) {
                    index_of.insert(vh, out.positions.len() as u32);
                    out.positions.push(self.pos(vh));
                    out.normals.push(self.vertex_normal(vh) * sign);
                }
            }
            for fh in self.interior_faces() {
                let corners: Vec<u32> = self
                    .face_vertices(fh)
                    .filter_map(|vh| index_of.get(&vh).copied())
                    .collect();
                push_fan(&mut out.indices, &corners);
            }
        }

        debug!(
            "exported {} triangles over {} vertices (split_faces = {})",
            out.n_triangles(),
            out.positions.len(),
            split_faces
        );
        out
    }
}
