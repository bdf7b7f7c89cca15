pub mod builder;
pub mod chunk;
pub mod config;
pub mod error;
pub mod grid;
pub mod interp;
pub mod mesh;
pub mod mesher;
pub mod noise;
pub mod plugin;
pub mod sampler;
pub mod tables;
pub mod types;
pub mod utils;

pub use builder::ChunkMeshBuilder;
pub use config::ChunkConfig;
pub use mesh::MeshBuffers;
pub use plugin::MarchingCubesPlugin;
