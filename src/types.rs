use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f32;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// Position of a chunk in chunk-space (one unit per chunk, not world units).
pub type ChunkCoordinate = Vector3<i32>;

/// Index `[x, y, z]` of one unit cube inside a chunk, each component in `0..segment_count`.
pub type CubeIndex = [usize; 3];
