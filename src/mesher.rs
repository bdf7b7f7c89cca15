use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    config::segment_count_fits,
    error::MarchingCubesError,
    grid::ScalarGrid,
    mesh::MeshBuffers,
    types::{CubeIndex, Value},
    utils::{cube_corner_values, edge_vertex, get_state, triangle_edges},
};

/// Runs marching cubes over every cube of `grid`.
///
/// Cubes are visited z-outer, y-middle, x-inner. Z slabs are meshed in parallel and
/// concatenated in ascending z, so the output is identical to a sequential pass.
///
/// ```text
/// Per cube:
/// 1. cube_corner_values  →  8 scalar values in CORNERS order
/// 2. get_state           →  corner configuration (bit i = corner i >= threshold)
/// 3. triangle_edges      →  edge triples from TRIANGULATION
/// 4. edge_vertex (×3)    →  scaled edge midpoints, appended unshared
/// 5. indices             →  pushed last, middle, first
/// ```
///
/// # Panics
/// Panics if `segment_count` is zero or too large for `u32` indices, if the grid is not
/// `(segment_count + 1)^3` points, if `axis_size` is not positive and finite, or if
/// `threshold` is not finite.
pub fn triangulate(
    grid: &ScalarGrid,
    segment_count: usize,
    axis_size: Value,
    threshold: Value,
) -> MeshBuffers {
    assert!(
        segment_count_fits(segment_count),
        "{}",
        MarchingCubesError::InvalidSegmentCount(segment_count)
    );
    assert!(
        grid.segment_count() == segment_count,
        "{}",
        MarchingCubesError::GridShapeMismatch {
            expected: segment_count + 1,
            found: [grid.segment_count() + 1; 3],
        }
    );
    assert!(
        axis_size.is_finite() && axis_size > 0.0,
        "{}",
        MarchingCubesError::InvalidAxisSize(axis_size)
    );
    assert!(
        threshold.is_finite(),
        "{}",
        MarchingCubesError::InvalidThreshold(threshold)
    );

    let cube_size = axis_size / segment_count as Value;

    let per_z: Vec<MeshBuffers> = (0..segment_count)
        .into_par_iter()
        .map(|z| {
            let mut slab = MeshBuffers::new_empty();
            for y in 0..segment_count {
                for x in 0..segment_count {
                    march_cube(grid, [x, y, z], cube_size, threshold, &mut slab);
                }
            }
            slab
        })
        .collect();

    // Merge per-Z slabs into a single buffer
    let total: usize = per_z.iter().map(|m| m.vertices.len()).sum();
    let mut mesh = MeshBuffers::with_capacity(total);
    for mut slab in per_z {
        mesh.append(&mut slab);
    }

    mesh
}

/// Appends the triangles of a single cube to `mesh`.
///
/// Vertices are pushed in table edge order; each triangle's indices are pushed reversed
/// (last, middle, first). Dropping the reversal flips every face.
#[inline]
pub fn march_cube(
    grid: &ScalarGrid,
    cube: CubeIndex,
    cube_size: Value,
    threshold: Value,
    mesh: &mut MeshBuffers,
) {
    let state = get_state(&cube_corner_values(grid, cube), threshold);

    for edges in triangle_edges(state) {
        let [a, b, c] = edges.map(|edge| mesh.push_vertex(edge_vertex(cube, edge, cube_size)));
        mesh.indices.extend([c, b, a]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn single_corner_yields_one_reversed_triangle() {
        let mut grid = ScalarGrid::uniform(1, 0.0);
        grid.set(1, 1, 1, 1.0);

        let mesh = triangulate(&grid, 1, 1.0, 0.5);

        assert_eq!(mesh.indices, vec![2, 1, 0]);
        // TRIANGULATION[64] = [10, 6, 5]
        assert_eq!(
            mesh.vertices,
            vec![[1.0, 0.5, 1.0], [0.5, 1.0, 1.0], [1.0, 1.0, 0.5]]
        );
    }

    #[test]
    fn march_cube_appends_after_existing_vertices() {
        let mut grid = ScalarGrid::uniform(1, 0.0);
        grid.set(0, 0, 0, 1.0);
        let mut mesh = MeshBuffers {
            vertices: vec![[9.0; 3]; 4],
            indices: vec![0, 1, 2],
        };

        march_cube(&grid, [0, 0, 0], 1.0, 0.5, &mut mesh);

        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(&mesh.indices[3..], &[6, 5, 4]);
        // TRIANGULATION[1] = [0, 8, 3]
        assert_eq!(Point::from(mesh.vertices[4]), Point::new(0.5, 0.0, 0.0));
        assert_eq!(Point::from(mesh.vertices[5]), Point::new(0.0, 0.5, 0.0));
        assert_eq!(Point::from(mesh.vertices[6]), Point::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn value_equal_to_threshold_counts_as_set() {
        let mut grid = ScalarGrid::uniform(1, 0.2);
        grid.set(0, 0, 0, 0.5);
        assert_eq!(triangulate(&grid, 1, 1.0, 0.5).triangle_count(), 1);
    }

    #[test]
    fn uniform_grids_are_empty() {
        for segment_count in [1, 3, 8] {
            for value in [0.0, 0.49, 0.5, 1.0] {
                let grid = ScalarGrid::uniform(segment_count, value);
                let mesh = triangulate(&grid, segment_count, 4.0, 0.5);
                assert_eq!(mesh, MeshBuffers::default());
            }
        }
    }

    #[test]
    fn vertices_scale_with_cube_size() {
        let mut grid = ScalarGrid::uniform(2, 0.0);
        grid.set(2, 2, 2, 1.0);
        let mesh = triangulate(&grid, 2, 8.0, 0.5);
        // Only cube (1, 1, 1) touches corner (2, 2, 2); cube size is 4.
        assert_eq!(
            mesh.vertices,
            vec![[8.0, 6.0, 8.0], [6.0, 8.0, 8.0], [8.0, 8.0, 6.0]]
        );
    }

    #[test]
    #[should_panic]
    fn mismatched_grid_panics() {
        triangulate(&ScalarGrid::uniform(2, 0.0), 3, 1.0, 0.5);
    }

    #[test]
    #[should_panic]
    fn non_positive_axis_size_panics() {
        triangulate(&ScalarGrid::uniform(1, 0.0), 1, 0.0, 0.5);
    }

    #[test]
    #[should_panic(expected = "InvalidThreshold")]
    fn nan_threshold_panics() {
        triangulate(&ScalarGrid::uniform(1, 0.0), 1, 1.0, f32::NAN);
    }

    #[test]
    #[should_panic(expected = "InvalidSegmentCount(700)")]
    fn segment_count_beyond_u32_indices_panics() {
        // Checked before the grid, so a small grid is enough.
        triangulate(&ScalarGrid::uniform(1, 0.0), 700, 1.0, 0.5);
    }
}
