use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, debug_span};

use crate::{
    config::ChunkConfig,
    error::Result,
    mesh::MeshBuffers,
    mesher::triangulate,
    noise::NoiseSource,
    sampler::sample,
    types::ChunkCoordinate,
};

/// Builds chunk meshes: samples the noise field, then triangulates it.
///
/// Holds nothing but the noise source, so one builder can serve any number of
/// concurrent builds:
///
/// ```rust,ignore
/// let builder = ChunkMeshBuilder::new(TerrainNoise::default());
/// let config = ChunkConfig::new(16.0, 32, 0.1, 0.5)?;
/// let mesh = builder.build(ChunkCoordinate::new(0, 0, 0), &config);
/// ```
#[derive(Clone, Default)]
pub struct ChunkMeshBuilder<N> {
    noise: N,
}

impl<N: NoiseSource> ChunkMeshBuilder<N> {
    pub fn new(noise: N) -> Self {
        Self { noise }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// Builds the mesh for the chunk at `coordinate`.
    ///
    /// The intermediate grid is dropped before returning.
    ///
    /// # Panics
    /// Panics if `config` is invalid. Use [`try_build`](Self::try_build) to get an error instead.
    pub fn build(&self, coordinate: ChunkCoordinate, config: &ChunkConfig) -> MeshBuffers {
        let _span = debug_span!(
            "build_chunk",
            x = coordinate.x,
            y = coordinate.y,
            z = coordinate.z
        )
        .entered();

        let grid = sample(&self.noise, coordinate, config);
        let mesh = triangulate(
            &grid,
            config.segment_count,
            config.axis_size,
            config.threshold,
        );

        debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            "built chunk mesh"
        );
        mesh
    }

    /// Like [`build`](Self::build), but validates `config` first and returns the error.
    pub fn try_build(
        &self,
        coordinate: ChunkCoordinate,
        config: &ChunkConfig,
    ) -> Result<MeshBuffers> {
        config.validate()?;
        Ok(self.build(coordinate, config))
    }

    /// Builds every chunk in `coordinates` in parallel, returning meshes in input order.
    pub fn build_many(
        &self,
        coordinates: &[ChunkCoordinate],
        config: &ChunkConfig,
    ) -> Result<Vec<MeshBuffers>> {
        config.validate()?;
        Ok(coordinates
            .par_iter()
            .map(|&coordinate| self.build(coordinate, config))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::MarchingCubesError,
        noise::{NoiseFn, TerrainNoise},
        types::Point,
    };

    #[test]
    fn try_build_reports_invalid_config() {
        let builder = ChunkMeshBuilder::new(TerrainNoise::default());
        let bad = ChunkConfig {
            axis_size: -1.0,
            segment_count: 4,
            noise_scale: 1.0,
            threshold: 0.5,
        };
        assert_eq!(
            builder.try_build(ChunkCoordinate::new(0, 0, 0), &bad),
            Err(MarchingCubesError::InvalidAxisSize(-1.0))
        );
    }

    #[test]
    fn flat_ground_builds_one_quad_per_column() {
        // Solid below y = 0.5 in chunk space, air above.
        let builder = ChunkMeshBuilder::new(NoiseFn(|p: Point| 0.5 - p.y));
        let config = ChunkConfig::new(4.0, 4, 1.0, 0.5).unwrap();
        let mesh = builder.build(ChunkCoordinate::new(0, 0, 0), &config);

        // Grid rows y <= 2 are at or above the threshold, so only the y = 2 layer of cubes
        // is cut, each one by a single quad at the middle of its vertical edges.
        assert_eq!(mesh.triangle_count(), 4 * 4 * 2);
        assert!(mesh.vertices.iter().all(|v| v[1] == 2.5));
    }

    #[test]
    fn build_many_keeps_input_order() {
        let builder = ChunkMeshBuilder::new(TerrainNoise::default());
        let config = ChunkConfig::new(8.0, 6, 0.7, 0.5).unwrap();
        let coordinates = [
            ChunkCoordinate::new(0, 0, 0),
            ChunkCoordinate::new(1, 0, -1),
            ChunkCoordinate::new(-2, 1, 3),
        ];
        let meshes = builder.build_many(&coordinates, &config).unwrap();
        assert_eq!(meshes.len(), 3);
        for (coordinate, mesh) in coordinates.iter().zip(&meshes) {
            assert_eq!(mesh, &builder.build(*coordinate, &config));
        }
    }
}
