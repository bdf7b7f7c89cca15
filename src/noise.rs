use std::sync::Arc;

use bevy::math::Vec3;
use noiz::prelude::*;
use tracing::trace;

use crate::{
    interp::remap,
    types::{Point, Value},
};

/// A deterministic 3D coherent-noise function returning values nominally in `[-1, 1]`.
///
/// Implementations must be pure: the same point always yields the same value. The sampler
/// evaluates it from many threads at once.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, point: Point) -> Value;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Arc<N> {
    #[inline]
    fn sample(&self, point: Point) -> Value {
        (**self).sample(point)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    #[inline]
    fn sample(&self, point: Point) -> Value {
        (**self).sample(point)
    }
}

/// Adapts a closure into a [`NoiseSource`].
///
/// ```rust,ignore
/// let flat = NoiseFn(|p: Point| p.y.clamp(-1.0, 1.0));
/// ```
#[derive(Clone, Copy)]
pub struct NoiseFn<F>(pub F);

impl<F> NoiseSource for NoiseFn<F>
where
    F: Fn(Point) -> Value + Send + Sync,
{
    #[inline]
    fn sample(&self, point: Point) -> Value {
        (self.0)(point)
    }
}

type GradientNoise = Noise<
    LayeredNoise<
        Normed<f32>,
        Persistence,
        Octave<MixCellGradients<OrthoGrid, Smoothstep, QuickGradients>>,
    >,
>;

/// Default terrain noise: normalized gradient noise at unit frequency.
///
/// Frequency is controlled by [`ChunkConfig::noise_scale`](crate::config::ChunkConfig::noise_scale),
/// so the underlying noise is left at its default frequency.
#[derive(Clone, Copy, Default)]
pub struct TerrainNoise(GradientNoise);

impl NoiseSource for TerrainNoise {
    #[inline]
    fn sample(&self, point: Point) -> Value {
        self.0.sample_for(Vec3::new(point.x, point.y, point.z))
    }
}

/// Remaps a raw noise sample from `[-1, 1]` to `[0, 1]`.
///
/// Finite values are remapped linearly without clamping. `NaN` and `-inf` become `0.0`
/// and `+inf` becomes `1.0`, so a misbehaving noise function can never poison the grid.
#[inline]
pub fn to_unit(raw: Value) -> Value {
    if raw.is_finite() {
        return remap(raw, [-1.0, 1.0], [0.0, 1.0]);
    }
    trace!(raw, "non-finite noise sample");
    if raw == Value::INFINITY { 1.0 } else { 0.0 }
}
