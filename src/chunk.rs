use bevy::prelude::*;

use crate::{
    config::ChunkConfig,
    types::{ChunkCoordinate, Point},
    utils::chunk_coordinate_at,
};

/// A terrain chunk waiting for, or displaying, a marching cubes mesh.
///
/// The mesh is generated in chunk-local space; the entity's [`Transform`] places it in the
/// world. Mutating the component queues the chunk for regeneration.
#[derive(Component, Debug, Clone, PartialEq)]
#[require(Transform)]
pub struct Chunk {
    /// Position in chunk-space.
    pub coordinate: ChunkCoordinate,
    /// Sampling and meshing parameters.
    pub config: ChunkConfig,
}

impl Chunk {
    pub fn new(coordinate: ChunkCoordinate, config: ChunkConfig) -> Self {
        Self { coordinate, config }
    }

    /// Creates the chunk whose origin is nearest to `translation`.
    pub fn at_translation(translation: Vec3, config: ChunkConfig) -> Self {
        let position = Point::new(translation.x, translation.y, translation.z);
        Self::new(chunk_coordinate_at(position, config.axis_size), config)
    }

    /// World-space translation of the chunk's origin.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(
            self.coordinate.x as f32,
            self.coordinate.y as f32,
            self.coordinate.z as f32,
        ) * self.config.axis_size
    }

    /// Returns `(self, Transform)` with the transform placed at [`translation`](Chunk::translation).
    ///
    /// ```rust,ignore
    /// commands.spawn(Chunk::new(coordinate, config).placed());
    /// ```
    pub fn placed(self) -> (Self, Transform) {
        let transform = Transform::from_translation(self.translation());
        (self, transform)
    }
}
