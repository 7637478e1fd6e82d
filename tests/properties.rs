//! Randomised structural properties of the local and global operations

use halfmesh::{
    generate_cube, generate_grid, generate_icosphere, generate_pillow, generate_torus,
    generate_triangle_grid, EdgeHandle, FaceHandle, HalfedgeMesh, SubdivisionStrategy,
    VertexHandle,
};
use proptest::prelude::*;

fn counts(mesh: &HalfedgeMesh) -> (usize, usize, usize) {
    (mesh.n_vertices(), mesh.n_edges(), mesh.n_faces())
}

fn nth_edge(mesh: &HalfedgeMesh, pick: usize) -> EdgeHandle {
    let edges: Vec<EdgeHandle> = mesh.edges().collect();
    edges[pick % edges.len()]
}

#[derive(Debug, Clone, Copy)]
enum LocalOp {
    EraseEdge,
    EraseVertex,
    CollapseEdge,
    CollapseFace,
    FlipEdge,
    SplitEdge,
    BevelVertex,
    BevelEdge,
    BevelFace,
    Triangulate,
}

fn local_op() -> impl Strategy<Value = LocalOp> {
    prop_oneof![
        Just(LocalOp::EraseEdge),
        Just(LocalOp::EraseVertex),
        Just(LocalOp::CollapseEdge),
        Just(LocalOp::CollapseFace),
        Just(LocalOp::FlipEdge),
        Just(LocalOp::SplitEdge),
        Just(LocalOp::BevelVertex),
        Just(LocalOp::BevelEdge),
        Just(LocalOp::BevelFace),
        Just(LocalOp::Triangulate),
    ]
}

/// Closed and open fixtures, triangles and quads, plus the degree-two pillow
fn fixture(kind: usize) -> HalfedgeMesh {
    match kind {
        0 => generate_cube(),
        1 => generate_icosphere(1),
        2 => generate_triangle_grid(4, 4),
        3 => generate_grid(4, 4),
        _ => generate_pillow(),
    }
}

/// Run one operation on an element chosen by `pick`; true if it was applied
fn apply(mesh: &mut HalfedgeMesh, op: LocalOp, pick: usize) -> bool {
    let vertices: Vec<VertexHandle> = mesh.vertices().collect();
    let edges: Vec<EdgeHandle> = mesh.edges().collect();
    let faces: Vec<FaceHandle> = mesh.faces().collect();
    if vertices.is_empty() || edges.is_empty() || faces.is_empty() {
        return false;
    }
    let vh = vertices[pick % vertices.len()];
    let eh = edges[pick % edges.len()];
    let fh = faces[pick % faces.len()];

    match op {
        LocalOp::EraseEdge => mesh.erase_edge(eh).is_some(),
        LocalOp::EraseVertex => mesh.erase_vertex(vh).is_some(),
        LocalOp::CollapseEdge => mesh.collapse_edge(eh).is_some(),
        LocalOp::CollapseFace => mesh.collapse_face(fh).is_some(),
        LocalOp::FlipEdge => mesh.flip_edge(eh).is_some(),
        LocalOp::SplitEdge => mesh.split_edge(eh).is_some(),
        LocalOp::BevelVertex => mesh.bevel_vertex(vh).is_some(),
        LocalOp::BevelEdge => mesh.bevel_edge(eh).is_some(),
        LocalOp::BevelFace => mesh.bevel_face(fh).is_some(),
        LocalOp::Triangulate => mesh.triangulate() > 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_local_edits_keep_mesh_valid(
        kind in 0usize..5,
        steps in prop::collection::vec((local_op(), any::<usize>()), 1..24),
    ) {
        let mut mesh = fixture(kind);
        for (op, pick) in steps {
            let before = counts(&mesh);
            if !apply(&mut mesh, op, pick) {
                // a refusal leaves nothing behind
                prop_assert_eq!(mesh.kernel().n_pending_erase(), 0);
                prop_assert_eq!(counts(&mesh), before);
            }
            let result = mesh.validate();
            prop_assert!(result.is_ok(), "{:?} left an invalid mesh: {:?}", op, result);
        }

        // whatever faces the edits left behind, including ones that visit a
        // vertex twice, split into proper triangles
        mesh.triangulate();
        prop_assert!(mesh.interior_faces().all(|f| mesh.face_degree(f) == 3));
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn flips_preserve_counts(picks in prop::collection::vec(any::<usize>(), 1..40)) {
        let mut mesh = generate_icosphere(1);
        let before = counts(&mesh);

        for pick in picks {
            let eh = nth_edge(&mesh, pick);
            let _ = mesh.flip_edge(eh);
        }

        prop_assert_eq!(counts(&mesh), before);
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn collapse_removes_one_vertex_three_edges_two_faces(pick in any::<usize>()) {
        let mut mesh = generate_icosphere(1);
        let (v, e, f) = counts(&mesh);
        let eh = nth_edge(&mesh, pick);

        prop_assert!(mesh.is_collapse_ok(eh));
        prop_assert!(mesh.collapse_edge(eh).is_some());
        prop_assert!(mesh.validate().is_ok());
        prop_assert_eq!(counts(&mesh), (v - 1, e - 3, f - 2));
    }

    #[test]
    fn boundary_elements_are_refused(pick in any::<usize>()) {
        let mut mesh = generate_triangle_grid(5, 5);
        let before = counts(&mesh);

        let boundary_edges: Vec<EdgeHandle> = mesh.edges().filter(|&e| mesh.edge_on_boundary(e)).collect();
        let eh = boundary_edges[pick % boundary_edges.len()];
        prop_assert!(mesh.flip_edge(eh).is_none());
        prop_assert!(mesh.collapse_edge(eh).is_none());
        prop_assert!(mesh.erase_edge(eh).is_none());

        let boundary_vertices: Vec<VertexHandle> = mesh.vertices().filter(|&v| mesh.vertex_on_boundary(v)).collect();
        let vh = boundary_vertices[pick % boundary_vertices.len()];
        prop_assert!(mesh.erase_vertex(vh).is_none());
        prop_assert!(mesh.bevel_vertex(vh).is_none());

        prop_assert_eq!(mesh.kernel().n_pending_erase(), 0);
        prop_assert_eq!(counts(&mesh), before);
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn triangulate_is_idempotent(rows in 2usize..7, cols in 2usize..7) {
        let mut mesh = generate_grid(rows, cols);
        mesh.triangulate();
        let once = counts(&mesh);
        prop_assert_eq!(mesh.triangulate(), 0);
        prop_assert_eq!(counts(&mesh), once);
        prop_assert!(mesh.interior_faces().all(|f| mesh.face_degree(f) == 3));
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn quad_subdivision_count_law(rows in 2usize..6, cols in 2usize..6, catmull_clark in any::<bool>()) {
        let (mut mesh, strategy) = if catmull_clark {
            (generate_torus(2.0, 0.5, rows + 2, cols + 2), SubdivisionStrategy::CatmullClark)
        } else {
            (generate_grid(rows, cols), SubdivisionStrategy::Linear)
        };
        let (v, e, f) = (mesh.n_vertices(), mesh.n_edges(), mesh.n_interior_faces());
        let corners: usize = mesh.interior_faces().map(|fh| mesh.face_degree(fh)).sum();

        mesh.subdivide(strategy).unwrap();
        prop_assert_eq!(mesh.n_vertices(), v + e + f);
        prop_assert_eq!(mesh.n_interior_faces(), corners);
        prop_assert!(mesh.interior_faces().all(|fh| mesh.face_degree(fh) == 4));
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn loop_subdivision_count_law(rows in 2usize..6, cols in 2usize..6) {
        let mut mesh = generate_triangle_grid(rows, cols);
        let (v, e, f) = (mesh.n_vertices(), mesh.n_edges(), mesh.n_interior_faces());

        mesh.subdivide(SubdivisionStrategy::Loop).unwrap();
        prop_assert_eq!(mesh.n_vertices(), v + e);
        prop_assert_eq!(mesh.n_interior_faces(), 4 * f);
        prop_assert!(mesh.is_triangle_mesh());
        prop_assert!(mesh.validate().is_ok());
    }
}
