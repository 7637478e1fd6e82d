//! End-to-end scenarios over the public API

use halfmesh::{
    generate_cube, generate_icosahedron, generate_icosphere, generate_tetrahedron,
    generate_torus, generate_unit_quad, HalfedgeMesh, MeshError, SimplifyConfig,
    SubdivisionStrategy, Vec3,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn degree_multiset(mesh: &HalfedgeMesh) -> Vec<usize> {
    let mut degrees: Vec<usize> = mesh.interior_faces().map(|f| mesh.face_degree(f)).collect();
    degrees.sort_unstable();
    degrees
}

#[test]
fn simplify_icosphere_to_a_quarter() {
    init_logger();
    let mut mesh = generate_icosphere(2);
    assert_eq!(mesh.n_faces(), 320);

    let stats = mesh.simplify().unwrap();
    assert!(mesh.n_faces() <= 80);
    assert!(stats.collapses > 0);
    assert!(mesh.is_triangle_mesh());
    assert!(mesh.validate().is_ok());
    assert_eq!(mesh.n_vertices() as i64 - mesh.n_edges() as i64 + mesh.n_faces() as i64, 2);
}

#[test]
fn simplify_with_custom_ratio() {
    init_logger();
    let mut mesh = generate_icosphere(1);
    let config = SimplifyConfig {
        target_ratio: 0.5,
        ..Default::default()
    };
    mesh.simplify_with(&config).unwrap();
    assert!(mesh.n_faces() <= 40);
    assert!(mesh.validate().is_ok());
}

#[test]
fn simplify_tetrahedron_fails_and_leaves_mesh_alone() {
    let mut mesh = generate_tetrahedron();
    let polygons_before = mesh.to_polygons();

    assert!(matches!(mesh.simplify(), Err(MeshError::TooFewFaces { .. })));
    assert_eq!((mesh.n_vertices(), mesh.n_edges(), mesh.n_faces()), (4, 6, 4));
    assert_eq!(mesh.to_polygons(), polygons_before);
}

#[test]
fn bevel_single_quad_face() {
    let mut mesh = generate_unit_quad();
    let fh = mesh.interior_faces().next().unwrap();
    let corners = mesh.face_points(fh);

    let inset = mesh.bevel_face(fh).unwrap();
    let start = mesh.start_positions_of(inset);
    assert!(mesh.bevel_face_positions(&start, inset, 0.0, 0.0));
    assert!(mesh.validate().is_ok());

    let inset_points = mesh.face_points(inset);
    assert!(corners.iter().all(|p| inset_points.contains(p)));
    assert_eq!(mesh.n_interior_faces(), 5);
    assert_eq!(mesh.n_boundaries(), 1);
}

#[test]
fn polygon_round_trip_is_isomorphic() {
    for mut mesh in [generate_cube(), generate_torus(2.0, 0.5, 6, 5), generate_unit_quad()] {
        let fh = mesh.interior_faces().next().unwrap();
        mesh.bevel_face(fh).unwrap();
        mesh.validate().unwrap();

        let (polygons, positions) = mesh.to_polygons();
        let rebuilt = HalfedgeMesh::from_polygons(&polygons, &positions).unwrap();

        assert_eq!(rebuilt.n_vertices(), mesh.n_vertices());
        assert_eq!(rebuilt.n_edges(), mesh.n_edges());
        assert_eq!(rebuilt.n_faces(), mesh.n_faces());
        assert_eq!(degree_multiset(&rebuilt), degree_multiset(&mesh));
    }
}

#[test]
fn indexed_round_trip() {
    let mesh = generate_icosahedron();
    let indexed = mesh.to_indexed(false);
    assert_eq!(indexed.n_triangles(), 20);
    assert_eq!(indexed.positions.len(), 12);

    let rebuilt = HalfedgeMesh::from_indexed(&indexed).unwrap();
    assert_eq!((rebuilt.n_vertices(), rebuilt.n_edges(), rebuilt.n_faces()), (12, 30, 20));

    let flat = generate_cube().to_indexed(true);
    assert_eq!(flat.positions.len(), 24);
    assert_eq!(flat.n_triangles(), 12);
}

#[test]
fn non_manifold_input_is_reported() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
    // the second triangle repeats the directed edge 0 -> 1
    let err = HalfedgeMesh::from_polygons(&[[0, 1, 2], [0, 1, 3]], &positions).unwrap_err();
    assert!(err.to_string().contains("appears twice"));
}

#[test]
fn edit_session_stays_valid() {
    init_logger();
    let mut mesh = generate_icosphere(1);

    let eh = mesh.edges().next().unwrap();
    let m = mesh.split_edge(eh).unwrap();
    mesh.validate().unwrap();

    let spoke = mesh.edge_handle(mesh.halfedge_handle(m));
    mesh.flip_edge(spoke).unwrap();
    mesh.validate().unwrap();

    let vh = mesh.vertices().find(|&v| v != m).unwrap();
    let face = mesh.bevel_vertex(vh).unwrap();
    mesh.validate().unwrap();
    assert!(mesh.face_degree(face) >= 4);

    let collapsed = mesh.collapse_face(face).unwrap();
    mesh.validate().unwrap();
    assert!(mesh.is_valid_vertex(collapsed));

    mesh.triangulate();
    mesh.subdivide(SubdivisionStrategy::CatmullClark).unwrap();
    mesh.validate().unwrap();
    assert!(mesh.warnings().is_empty());
}
