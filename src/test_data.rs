//! # Test Data Generator
//!
//! Generates small consistently-oriented meshes for tests and benchmarks.

use glam::Vec3;

use crate::connectivity::HalfedgeMesh;
use crate::tools::subdivision::SubdivisionStrategy;

fn build<P: AsRef<[usize]>>(polygons: &[P], positions: &[Vec3]) -> HalfedgeMesh {
    HalfedgeMesh::from_polygons(polygons, positions)
        .unwrap_or_else(|err| panic!("generated mesh is not manifold: {err}"))
}

/// Generate a cube (6 quads, outward winding)
pub fn generate_cube() -> HalfedgeMesh {
    let positions = [
        glam::vec3(-1.0, -1.0, -1.0),
        glam::vec3( 1.0, -1.0, -1.0),
        glam::vec3( 1.0,  1.0, -1.0),
        glam::vec3(-1.0,  1.0, -1.0),
        glam::vec3(-1.0, -1.0,  1.0),
        glam::vec3( 1.0, -1.0,  1.0),
        glam::vec3( 1.0,  1.0,  1.0),
        glam::vec3(-1.0,  1.0,  1.0),
    ];

    let faces = [
        [0, 3, 2, 1], // back
        [4, 5, 6, 7], // front
        [0, 1, 5, 4], // bottom
        [3, 7, 6, 2], // top
        [0, 4, 7, 3], // left
        [1, 2, 6, 5], // right
    ];

    build(&faces, &positions)
}

/// Generate a tetrahedron
pub fn generate_tetrahedron() -> HalfedgeMesh {
    let positions = [
        glam::vec3( 1.0,  1.0,  1.0),
        glam::vec3(-1.0, -1.0,  1.0),
        glam::vec3(-1.0,  1.0, -1.0),
        glam::vec3( 1.0, -1.0, -1.0),
    ];

    build(&[[0, 2, 1], [0, 3, 2], [0, 1, 3], [1, 2, 3]], &positions)
}

/// Generate a pillow: two triangles glued along all three edges, so every
/// vertex has degree two
pub fn generate_pillow() -> HalfedgeMesh {
    let positions = [
        glam::vec3( 1.0,  0.0, 0.0),
        glam::vec3(-0.5,  0.8, 0.0),
        glam::vec3(-0.5, -0.8, 0.0),
    ];

    build(&[[0, 1, 2], [0, 2, 1]], &positions)
}

/// Generate a pyramid (square base)
pub fn generate_pyramid() -> HalfedgeMesh {
    let positions = [
        glam::vec3(-1.0, -1.0, 0.0),
        glam::vec3( 1.0, -1.0, 0.0),
        glam::vec3( 1.0,  1.0, 0.0),
        glam::vec3(-1.0,  1.0, 0.0),
        glam::vec3( 0.0,  0.0, 2.0),
    ];

    let faces: [&[usize]; 5] = [
        &[0, 3, 2, 1],
        &[0, 1, 4],
        &[1, 2, 4],
        &[2, 3, 4],
        &[3, 0, 4],
    ];

    build(&faces, &positions)
}

/// Generate an octahedron (8 triangles)
pub fn generate_octahedron() -> HalfedgeMesh {
    let positions = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
    let faces = [
        [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
        [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
    ];

    build(&faces, &positions)
}

/// Generate an icosahedron (20-sided polyhedron) inscribed in the unit sphere
pub fn generate_icosahedron() -> HalfedgeMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let positions = [
        glam::vec3(-1.0,  t,  0.0).normalize(),
        glam::vec3( 1.0,  t,  0.0).normalize(),
        glam::vec3(-1.0, -t,  0.0).normalize(),
        glam::vec3( 1.0, -t,  0.0).normalize(),
        glam::vec3( 0.0, -1.0,  t).normalize(),
        glam::vec3( 0.0,  1.0,  t).normalize(),
        glam::vec3( 0.0, -1.0, -t).normalize(),
        glam::vec3( 0.0,  1.0, -t).normalize(),
        glam::vec3( t,  0.0, -1.0).normalize(),
        glam::vec3( t,  0.0,  1.0).normalize(),
        glam::vec3(-t,  0.0, -1.0).normalize(),
        glam::vec3(-t,  0.0,  1.0).normalize(),
    ];

    // 20 triangular faces
    let faces = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    build(&faces, &positions)
}

/// Generate an icosphere: the icosahedron refined by Loop subdivision, with
/// every vertex pushed back onto the unit sphere
pub fn generate_icosphere(subdivisions: u32) -> HalfedgeMesh {
    let mut mesh = generate_icosahedron();

    for _ in 0..subdivisions {
        if mesh.subdivide(SubdivisionStrategy::Loop).is_err() {
            break;
        }
    }
    let vertices: Vec<_> = mesh.vertices().collect();
    for vh in vertices {
        if let Some(p) = mesh.point(vh) {
            mesh.set_point(vh, p.normalize());
        }
    }

    mesh
}

/// Generate a single unit square in the XY plane, bounded by one boundary loop
pub fn generate_unit_quad() -> HalfedgeMesh {
    let positions = [
        glam::vec3(0.0, 0.0, 0.0),
        glam::vec3(1.0, 0.0, 0.0),
        glam::vec3(1.0, 1.0, 0.0),
        glam::vec3(0.0, 1.0, 0.0),
    ];

    build(&[[0, 1, 2, 3]], &positions)
}

fn grid_positions(rows: usize, cols: usize) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let x = (j as f32) / ((cols - 1) as f32) - 0.5;
            let y = (i as f32) / ((rows - 1) as f32) - 0.5;
            positions.push(glam::vec3(x, y, 0.0));
        }
    }
    positions
}

/// Generate a planar grid of quads with `rows x cols` vertices (both >= 2)
pub fn generate_grid(rows: usize, cols: usize) -> HalfedgeMesh {
    let mut faces = Vec::new();
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let v0 = i * cols + j;
            faces.push([v0, v0 + 1, v0 + cols + 1, v0 + cols]);
        }
    }

    build(&faces, &grid_positions(rows, cols))
}

/// Generate a planar grid with every quad split into two triangles
pub fn generate_triangle_grid(rows: usize, cols: usize) -> HalfedgeMesh {
    let mut faces = Vec::new();
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let v0 = i * cols + j;
            faces.push([v0, v0 + 1, v0 + cols + 1]);
            faces.push([v0, v0 + cols + 1, v0 + cols]);
        }
    }

    build(&faces, &grid_positions(rows, cols))
}

/// Generate a closed quad torus (genus one)
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: usize,
    minor_segments: usize,
) -> HalfedgeMesh {
    let mut positions = Vec::with_capacity(major_segments * minor_segments);
    for i in 0..major_segments {
        let u = 2.0 * std::f32::consts::PI * (i as f32) / (major_segments as f32);
        for j in 0..minor_segments {
            let v = 2.0 * std::f32::consts::PI * (j as f32) / (minor_segments as f32);

            let x = (major_radius + minor_radius * v.cos()) * u.cos();
            let y = (major_radius + minor_radius * v.cos()) * u.sin();
            let z = minor_radius * v.sin();
            positions.push(glam::vec3(x, y, z));
        }
    }

    let index = |i: usize, j: usize| (i % major_segments) * minor_segments + (j % minor_segments);
    let mut faces = Vec::with_capacity(major_segments * minor_segments);
    for i in 0..major_segments {
        for j in 0..minor_segments {
            faces.push([index(i, j), index(i + 1, j), index(i + 1, j + 1), index(i, j + 1)]);
        }
    }

    build(&faces, &positions)
}
