use derive_more::Display;

pub type Result<T> = core::result::Result<T, MarchingCubesError>;

#[derive(Debug, Display, Clone, PartialEq)]
#[display("{self:?}")]
pub enum MarchingCubesError {
    /// Segment count is zero, or so large that vertex indices would overflow `u32`.
    InvalidSegmentCount(usize),
    /// Axis size is not a positive, finite length.
    InvalidAxisSize(f32),
    InvalidNoiseScale(f32),
    InvalidThreshold(f32),
    /// Grid is not `(segment_count + 1)^3` points.
    GridShapeMismatch { expected: usize, found: [usize; 3] },
}

impl std::error::Error for MarchingCubesError {}
