use crate::{
    grid::ScalarGrid,
    interp::midpoint,
    tables::{CORNERS, EDGE_TO_CORNER_A, EDGE_TO_CORNER_B, SENTINEL, TRIANGULATION},
    types::{ChunkCoordinate, CubeIndex, Point, Value},
};

/// Returns the 8 grid indices `[x, y, z]` of the cube at `cube`, in [`CORNERS`] order.
#[inline]
pub fn cube_corner_indices(cube: CubeIndex) -> [[usize; 3]; 8] {
    CORNERS.map(|[dx, dy, dz]| [cube[0] + dx, cube[1] + dy, cube[2] + dz])
}

/// Computes the corner configuration of a cube.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's value
/// is **at or above** the threshold:
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// state bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 >= threshold?
/// ```
#[inline]
pub fn get_state(eval_corners: &[Value; 8], threshold: Value) -> u8 {
    eval_corners
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= threshold)
        .fold(0u8, |state, (i, _)| state | (1u8 << i))
}

/// Reads the 8 corner values of `cube` from `grid` in [`CORNERS`] order.
#[inline]
pub fn cube_corner_values(grid: &ScalarGrid, cube: CubeIndex) -> [Value; 8] {
    cube_corner_indices(cube).map(|[x, y, z]| grid.get(x, y, z))
}

/// Iterates the triangles of `TRIANGULATION[state]` as edge triples, stopping at the sentinel.
#[inline]
pub fn triangle_edges(state: u8) -> impl Iterator<Item = [usize; 3]> {
    TRIANGULATION[state as usize]
        .chunks_exact(3)
        .take_while(|tri| tri[0] != SENTINEL)
        .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
}

/// Position of the vertex placed on `edge` of `cube`, in chunk-local world units.
///
/// The vertex sits at the midpoint of the edge's two corners, scaled by `cube_size`.
#[inline]
pub fn edge_vertex(cube: CubeIndex, edge: usize, cube_size: Value) -> Point {
    let corner = |c: usize| {
        let [dx, dy, dz] = CORNERS[c];
        Point::new(
            (cube[0] + dx) as Value,
            (cube[1] + dy) as Value,
            (cube[2] + dz) as Value,
        )
    };
    midpoint(
        &corner(EDGE_TO_CORNER_A[edge]),
        &corner(EDGE_TO_CORNER_B[edge]),
    ) * cube_size
}

/// Chunk containing world-space `position`, for chunks `axis_size` units wide.
///
/// Rounds to the nearest chunk, so a chunk's own origin always maps back to its coordinate.
pub fn chunk_coordinate_at(position: Point, axis_size: Value) -> ChunkCoordinate {
    (position.coords / axis_size).map(|c| c.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_sets_bit_per_corner_at_or_above_threshold() {
        let mut corners = [0.0; 8];
        assert_eq!(get_state(&corners, 0.5), 0);
        corners[0] = 0.5;
        assert_eq!(get_state(&corners, 0.5), 0b0000_0001);
        corners[6] = 0.9;
        assert_eq!(get_state(&corners, 0.5), 0b0100_0001);
        assert_eq!(get_state(&[1.0; 8], 0.5), 255);
    }

    #[test]
    fn corner_indices_follow_table_order() {
        let corners = cube_corner_indices([2, 3, 4]);
        assert_eq!(corners[0], [2, 3, 4]);
        assert_eq!(corners[2], [3, 3, 5]);
        assert_eq!(corners[4], [2, 4, 4]);
        assert_eq!(corners[6], [3, 4, 5]);
        assert_eq!(corners[7], [2, 4, 5]);
    }

    #[test]
    fn triangle_edges_stop_at_sentinel() {
        assert_eq!(triangle_edges(0).count(), 0);
        assert_eq!(triangle_edges(255).count(), 0);
        assert_eq!(triangle_edges(1).collect::<Vec<_>>(), vec![[0, 8, 3]]);
        assert_eq!(triangle_edges(64).collect::<Vec<_>>(), vec![[10, 6, 5]]);
        let max = (0..=255u8).map(|s| triangle_edges(s).count()).max();
        assert_eq!(max, Some(5));
    }

    #[test]
    fn edge_vertex_is_scaled_midpoint() {
        // Edge 10 joins corners 2 (1,0,1) and 6 (1,1,1).
        assert_eq!(edge_vertex([0, 0, 0], 10, 1.0), Point::new(1.0, 0.5, 1.0));
        assert_eq!(edge_vertex([1, 2, 3], 0, 2.0), Point::new(3.0, 4.0, 6.0));
    }

    #[test]
    fn chunk_coordinate_rounds_world_position() {
        assert_eq!(
            chunk_coordinate_at(Point::new(32.0, -16.0, 0.0), 16.0),
            ChunkCoordinate::new(2, -1, 0)
        );
        assert_eq!(
            chunk_coordinate_at(Point::new(31.0, -9.0, 7.0), 16.0),
            ChunkCoordinate::new(2, -1, 0)
        );
    }
}
