//! End-to-end properties of the sample → triangulate pipeline.

use terrain_marching_cubes::{
    ChunkConfig, ChunkMeshBuilder, MeshBuffers,
    grid::ScalarGrid,
    mesher::triangulate,
    noise::{NoiseFn, TerrainNoise},
    sampler::sample,
    tables::{CORNERS, EDGE_TO_CORNER_A, EDGE_TO_CORNER_B},
    types::{ChunkCoordinate, Point, Vector},
    utils::{cube_corner_values, edge_vertex, get_state, triangle_edges},
};

const THRESHOLD: f32 = 0.5;

/// A single-cube grid whose corner `i` is above the threshold iff bit `i` of `state` is set.
fn grid_for_state(state: u8) -> ScalarGrid {
    let mut grid = ScalarGrid::uniform(1, 0.0);
    for (i, [x, y, z]) in CORNERS.iter().copied().enumerate() {
        if state & (1 << i) != 0 {
            grid.set(x, y, z, 1.0);
        }
    }
    grid
}

fn corner_point(corner: usize) -> Point {
    let [x, y, z] = CORNERS[corner];
    Point::new(x as f32, y as f32, z as f32)
}

/// Which edge of the unit cube a vertex was placed on.
fn edge_of(vertex: [f32; 3]) -> usize {
    (0..12)
        .find(|&e| edge_vertex([0, 0, 0], e, 1.0) == Point::from(vertex))
        .unwrap_or_else(|| panic!("{vertex:?} is not an edge midpoint"))
}

#[test]
fn end_to_end_single_corner() {
    let mut grid = ScalarGrid::uniform(1, 0.0);
    grid.set(1, 1, 1, 1.0);

    let mesh = triangulate(&grid, 1, 1.0, THRESHOLD);

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.indices, vec![2, 1, 0]);
    for vertex in &mesh.vertices {
        let offset = Point::from(*vertex) - Point::new(1.0, 1.0, 1.0);
        let halves = offset.iter().filter(|&&c| c == -0.5).count();
        let zeros = offset.iter().filter(|&&c| c == 0.0).count();
        assert_eq!((halves, zeros), (1, 2), "{vertex:?} is not on an edge of (1, 1, 1)");
    }
}

#[test]
fn each_lone_corner_yields_one_triangle_on_its_edges() {
    for corner in 0..8 {
        let mesh = triangulate(&grid_for_state(1 << corner), 1, 1.0, THRESHOLD);
        assert_eq!(mesh.triangle_count(), 1, "corner {corner}");
        for &vertex in &mesh.vertices {
            let edge = edge_of(vertex);
            assert!(
                EDGE_TO_CORNER_A[edge] == corner || EDGE_TO_CORNER_B[edge] == corner,
                "corner {corner}: edge {edge} does not touch it"
            );
        }
    }
}

#[test]
fn empty_and_full_cubes_emit_nothing() {
    assert_eq!(triangulate(&grid_for_state(0), 1, 1.0, THRESHOLD), MeshBuffers::default());
    assert_eq!(triangulate(&grid_for_state(255), 1, 1.0, THRESHOLD), MeshBuffers::default());
}

#[test]
fn faces_point_from_unset_corners_towards_set_corners() {
    for state in 0..=255u8 {
        let mesh = triangulate(&grid_for_state(state), 1, 1.0, THRESHOLD);
        for tri in 0..mesh.triangle_count() {
            let normal = mesh.tri_normal(tri);
            assert_ne!(normal, Vector::zeros(), "state {state}: degenerate triangle {tri}");

            // Sum of the normal projected onto each cut edge, oriented from the
            // below-threshold corner to the at-or-above-threshold corner.
            let facing: f32 = mesh
                .triangle(tri)
                .iter()
                .map(|&v| {
                    let edge = edge_of(mesh.vertices[v as usize]);
                    let (a, b) = (EDGE_TO_CORNER_A[edge], EDGE_TO_CORNER_B[edge]);
                    let (below, above) = if state & (1 << a) != 0 { (b, a) } else { (a, b) };
                    normal.dot(&(corner_point(above) - corner_point(below)))
                })
                .sum();
            assert!(facing > 0.0, "state {state}: triangle {tri} faces the wrong way");
        }
    }
}

#[test]
fn vertices_follow_cube_order_and_edge_midpoints() {
    let noise = TerrainNoise::default();
    let coordinate = ChunkCoordinate::new(1, -1, 2);
    let config = ChunkConfig::new(12.0, 6, 0.8, 0.5).unwrap();

    let mesh = ChunkMeshBuilder::new(noise).build(coordinate, &config);

    let grid = sample(&noise, coordinate, &config);
    let mut expected = Vec::new();
    for z in 0..config.segment_count {
        for y in 0..config.segment_count {
            for x in 0..config.segment_count {
                let cube = [x, y, z];
                let state = get_state(&cube_corner_values(&grid, cube), config.threshold);
                for edges in triangle_edges(state) {
                    for edge in edges {
                        let p = edge_vertex(cube, edge, config.cube_size());
                        expected.push([p.x, p.y, p.z]);
                    }
                }
            }
        }
    }

    assert_eq!(mesh.vertices, expected);
    let reversed: Vec<u32> = (0..mesh.vertices.len() as u32 / 3)
        .flat_map(|t| [3 * t + 2, 3 * t + 1, 3 * t])
        .collect();
    assert_eq!(mesh.indices, reversed);
}

#[test]
fn builds_are_bit_identical() {
    let builder = ChunkMeshBuilder::new(TerrainNoise::default());
    let config = ChunkConfig::new(16.0, 12, 0.35, 0.5).unwrap();
    let coordinate = ChunkCoordinate::new(-4, 0, 7);

    let a = builder.build(coordinate, &config);
    let b = builder.build(coordinate, &config);

    let bits = |m: &MeshBuffers| -> Vec<u32> {
        m.vertices.iter().flatten().map(|c| c.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.indices, b.indices);
}

#[test]
fn indices_reference_emitted_vertices() {
    let builder = ChunkMeshBuilder::new(TerrainNoise::default());
    let config = ChunkConfig::new(8.0, 10, 0.5, 0.45).unwrap();
    let mesh = builder.build(ChunkCoordinate::new(2, 2, 2), &config);

    assert_eq!(mesh.indices.len() % 3, 0);
    assert_eq!(mesh.indices.len(), mesh.vertices.len());
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    let limit = config.axis_size + 1e-4;
    assert!(
        mesh.vertices
            .iter()
            .flatten()
            .all(|&c| (0.0..=limit).contains(&c))
    );
}

#[test]
fn uniform_fields_build_empty_meshes() {
    for raw in [-1.0, -0.2, 0.3, 1.0] {
        let builder = ChunkMeshBuilder::new(NoiseFn(move |_: Point| raw));
        for segment_count in [1, 2, 5, 16] {
            let config = ChunkConfig::new(4.0, segment_count, 1.0, 0.5).unwrap();
            let mesh = builder.build(ChunkCoordinate::new(0, 3, -1), &config);
            assert!(mesh.is_empty() && mesh.vertices.is_empty());
        }
    }
}

#[test]
fn neighbouring_chunks_share_their_boundary_samples() {
    let noise = TerrainNoise::default();
    let config = ChunkConfig::new(8.0, 4, 0.6, 0.5).unwrap();
    let left = sample(&noise, ChunkCoordinate::new(0, 0, 0), &config);
    let right = sample(&noise, ChunkCoordinate::new(1, 0, 0), &config);

    for z in 0..=4 {
        for y in 0..=4 {
            assert_eq!(left.get(4, y, z), right.get(0, y, z));
        }
    }
}
