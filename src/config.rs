use crate::{
    error::{MarchingCubesError, Result},
    types::Value,
};

/// Most vertices a single cube can emit (5 triangles).
pub const MAX_VERTICES_PER_CUBE: usize = 15;

/// Sampling and meshing parameters shared by every chunk built with them.
///
/// There is deliberately no `Default`: every option must be chosen by the caller.
///
/// ```rust,ignore
/// let config = ChunkConfig::new(16.0, 32, 0.1, 0.5)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkConfig {
    /// World-space edge length of one chunk.
    pub axis_size: Value,
    /// Grid subdivisions per axis. The grid holds `segment_count + 1` points per axis.
    pub segment_count: usize,
    /// Frequency multiplier applied to chunk-space positions before evaluating noise.
    pub noise_scale: Value,
    /// Iso-surface threshold, compared against noise remapped to `[0, 1]`.
    /// Corners `>=` threshold set their configuration bit.
    pub threshold: Value,
}

impl ChunkConfig {
    /// Creates a validated configuration.
    pub fn new(
        axis_size: Value,
        segment_count: usize,
        noise_scale: Value,
        threshold: Value,
    ) -> Result<Self> {
        let config = Self {
            axis_size,
            segment_count,
            noise_scale,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the preconditions the sampler and mesher rely on.
    pub fn validate(&self) -> Result<()> {
        if !segment_count_fits(self.segment_count) {
            return Err(MarchingCubesError::InvalidSegmentCount(self.segment_count));
        }
        if !(self.axis_size.is_finite() && self.axis_size > 0.0) {
            return Err(MarchingCubesError::InvalidAxisSize(self.axis_size));
        }
        if !self.noise_scale.is_finite() {
            return Err(MarchingCubesError::InvalidNoiseScale(self.noise_scale));
        }
        if !self.threshold.is_finite() {
            return Err(MarchingCubesError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// World-space edge length of one cube.
    #[inline]
    pub fn cube_size(&self) -> Value {
        self.axis_size / self.segment_count as Value
    }

    /// Number of grid points per axis.
    #[inline]
    pub fn points_per_axis(&self) -> usize {
        self.segment_count + 1
    }
}

/// A segment count is usable when it is non-zero and the worst-case vertex count
/// still fits a `u32` index.
pub(crate) fn segment_count_fits(segment_count: usize) -> bool {
    segment_count >= 1
        && segment_count
            .checked_pow(3)
            .and_then(|cubes| cubes.checked_mul(MAX_VERTICES_PER_CUBE))
            .is_some_and(|vertices| vertices <= u32::MAX as usize)
}
