use ndarray::Array3;

use crate::{
    error::{MarchingCubesError, Result},
    types::Value,
};

/// Dense scalar field sampled on the corners of one chunk.
///
/// Holds `(segment_count + 1)^3` values, indexed `[z][y][x]`, so every cube has all 8 corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    segment_count: usize,
    values: Array3<Value>,
}

impl ScalarGrid {
    /// Wraps an existing `[z, y, x]` array.
    ///
    /// Fails unless the array is a cube of `segment_count + 1` points per axis.
    pub fn from_array(segment_count: usize, values: Array3<Value>) -> Result<Self> {
        let expected = segment_count + 1;
        let shape = values.shape();
        if segment_count == 0 || shape.iter().any(|&len| len != expected) {
            return Err(MarchingCubesError::GridShapeMismatch {
                expected,
                found: [shape[0], shape[1], shape[2]],
            });
        }
        Ok(Self {
            segment_count,
            values,
        })
    }

    /// Builds a grid by calling `f(x, y, z)` for every corner.
    ///
    /// # Panics
    /// Panics if `segment_count` is zero.
    pub fn from_fn<F>(segment_count: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Value,
    {
        assert_non_empty(segment_count);
        let n = segment_count + 1;
        Self {
            segment_count,
            values: Array3::from_shape_fn((n, n, n), |(z, y, x)| f(x, y, z)),
        }
    }

    /// A grid where every corner holds `value`.
    ///
    /// # Panics
    /// Panics if `segment_count` is zero.
    pub fn uniform(segment_count: usize, value: Value) -> Self {
        assert_non_empty(segment_count);
        let n = segment_count + 1;
        Self {
            segment_count,
            values: Array3::from_elem((n, n, n), value),
        }
    }

    /// Number of cubes per axis.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Returns the value at corner `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Value {
        self.values[[z, y, x]]
    }

    /// Sets the value at corner `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: Value) {
        self.values[[z, y, x]] = v
    }

    /// The underlying `[z, y, x]` array.
    pub fn values(&self) -> &Array3<Value> {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut Array3<Value> {
        &mut self.values
    }
}

fn assert_non_empty(segment_count: usize) {
    assert!(
        segment_count >= 1,
        "{}",
        MarchingCubesError::InvalidSegmentCount(segment_count)
    );
}
