use ndarray::Zip;

use crate::{
    config::ChunkConfig,
    grid::ScalarGrid,
    noise::{NoiseSource, to_unit},
    types::{ChunkCoordinate, Point, Value},
};

/// Chunk-space position of grid point `(x, y, z)`: `coordinate + (x, y, z) / segment_count`.
#[inline]
pub fn grid_point_position(
    coordinate: &ChunkCoordinate,
    segment_count: usize,
    x: usize,
    y: usize,
    z: usize,
) -> Point {
    let s = segment_count as Value;
    Point::new(
        coordinate.x as Value + x as Value / s,
        coordinate.y as Value + y as Value / s,
        coordinate.z as Value + z as Value / s,
    )
}

/// Samples `noise` onto the `(segment_count + 1)^3` corners of the chunk at `coordinate`.
///
/// Each corner's chunk-space position is multiplied by
/// [`noise_scale`](ChunkConfig::noise_scale), evaluated, and remapped from `[-1, 1]` to `[0, 1]`.
/// Corners are filled in parallel; the result does not depend on scheduling.
///
/// # Panics
/// Panics if `config` is invalid.
pub fn sample<N>(noise: &N, coordinate: ChunkCoordinate, config: &ChunkConfig) -> ScalarGrid
where
    N: NoiseSource + ?Sized,
{
    if let Err(e) = config.validate() {
        panic!("cannot sample chunk {coordinate:?}: {e}");
    }

    let segment_count = config.segment_count;
    let noise_scale = config.noise_scale;
    let mut grid = ScalarGrid::uniform(segment_count, 0.);

    Zip::indexed(grid.values_mut()).par_for_each(|(z, y, x), value| {
        let point = grid_point_position(&coordinate, segment_count, x, y, z) * noise_scale;
        *value = to_unit(noise.sample(point));
    });

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseFn;

    fn config(segment_count: usize, noise_scale: Value) -> ChunkConfig {
        ChunkConfig::new(8.0, segment_count, noise_scale, 0.5).unwrap()
    }

    #[test]
    fn grid_points_span_one_chunk() {
        let c = ChunkCoordinate::new(2, -1, 0);
        assert_eq!(grid_point_position(&c, 4, 0, 0, 0), Point::new(2.0, -1.0, 0.0));
        assert_eq!(grid_point_position(&c, 4, 4, 4, 4), Point::new(3.0, 0.0, 1.0));
        assert_eq!(grid_point_position(&c, 4, 2, 1, 3), Point::new(2.5, -0.75, 0.75));
    }

    #[test]
    fn samples_are_scaled_then_remapped() {
        // Echoes the scaled x coordinate so the grid records where each corner was evaluated.
        let noise = NoiseFn(|p: Point| p.x);
        let grid = sample(&noise, ChunkCoordinate::new(0, 0, 0), &config(2, 0.5));
        assert_eq!(grid.segment_count(), 2);
        assert_eq!(grid.values().shape(), &[3, 3, 3]);
        // x = 0 -> 0.0 -> 0.5, x = 2 -> 1 * 0.5 -> 0.75
        assert_eq!(grid.get(0, 1, 2), 0.5);
        assert_eq!(grid.get(1, 0, 0), to_unit(0.25));
        assert_eq!(grid.get(2, 2, 1), 0.75);
    }

    #[test]
    fn stores_values_at_z_y_x() {
        let noise = NoiseFn(|p: Point| p.z - p.y);
        let grid = sample(&noise, ChunkCoordinate::new(0, 0, 0), &config(1, 1.0));
        assert_eq!(grid.values()[[1, 0, 0]], 1.0);
        assert_eq!(grid.values()[[0, 1, 0]], 0.0);
    }

    #[test]
    fn sampling_is_pure() {
        let noise = crate::noise::TerrainNoise::default();
        let c = ChunkCoordinate::new(3, 1, -2);
        let a = sample(&noise, c, &config(6, 0.3));
        let b = sample(&noise, c, &config(6, 0.3));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn rejects_invalid_config() {
        let bad = ChunkConfig {
            axis_size: 1.0,
            segment_count: 0,
            noise_scale: 1.0,
            threshold: 0.5,
        };
        sample(&NoiseFn(|_: Point| 0.0), ChunkCoordinate::new(0, 0, 0), &bad);
    }
}
