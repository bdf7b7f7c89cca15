use std::sync::Arc;

use bevy::{
    asset::RenderAssetUsages,
    log::{debug, error},
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};

use crate::{
    builder::ChunkMeshBuilder,
    chunk::Chunk,
    mesh::MeshBuffers,
    noise::{NoiseSource, TerrainNoise},
};

/// System sets for the marching cubes pipeline.
///
/// Use these to order your own systems relative to mesh generation:
///
/// ```rust,ignore
/// // Run after geometry is ready but before it's uploaded, e.g. for collider generation:
/// app.add_systems(Update, build_collider.after(MarchingCubesSet::Generate)
///                                       .before(MarchingCubesSet::Upload));
/// ```
///
/// ```text
/// MarchingCubesSet::Spawn   →  [async compute]  →  MarchingCubesSet::Generate  →  [your systems]  →  MarchingCubesSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarchingCubesSet {
    /// Queues changed chunks and spawns an async compute task for each queued chunk.
    Spawn,
    /// Polls async tasks and inserts [`GeneratedMesh`] on completion.
    Generate,
    /// Moves [`GeneratedMesh`] data into a Bevy [`Mesh3d`], a few chunks per frame.
    Upload,
}

/// Marker component added to [`Chunk`] entities that are waiting for a compute task.
#[derive(Component)]
pub struct QueuedChunk;

/// Holds the in-flight async compute task for a [`Chunk`].
///
/// Dropping it (by removing the component or despawning the entity) cancels the task.
#[derive(Component)]
pub struct ComputeTask(Task<GeneratedMesh>);

/// Finished mesh buffers waiting for their turn to be uploaded.
#[derive(Component, Default)]
pub struct GeneratedMesh(pub MeshBuffers);

/// Runtime configuration for the marching cubes pipeline.
///
/// Inserted as a resource by [`MarchingCubesPlugin`]. Modify it at any time to change behaviour:
///
/// ```rust,ignore
/// app.add_plugins(MarchingCubesPlugin { max_tasks_per_frame: 8, ..default() });
///
/// // Or change it at runtime:
/// fn my_system(mut config: ResMut<MarchingCubesConfig>) {
///     config.max_uploads_per_frame = 4; // catch up after a teleport
/// }
/// ```
#[derive(Resource)]
pub struct MarchingCubesConfig {
    /// Maximum number of async mesh tasks spawned per frame.
    ///
    /// Higher values load chunks faster but may cause frame hitches when many chunks
    /// are queued at once. Default: `4`.
    pub max_tasks_per_frame: usize,
    /// Maximum number of finished meshes applied per frame, across all chunks.
    ///
    /// Finished meshes beyond this wait in [`GeneratedMesh`] for a later frame. Default: `1`.
    pub max_uploads_per_frame: usize,
}

impl Default for MarchingCubesConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: 4,
            max_uploads_per_frame: 1,
        }
    }
}

/// Noise sampled by every chunk build.
///
/// Insert your own before or after adding the plugin to replace the default [`TerrainNoise`]:
///
/// ```rust,ignore
/// app.insert_resource(ChunkNoise(Arc::new(NoiseFn(|p: Point| (p.y * 0.1).sin()))));
/// ```
#[derive(Resource, Clone)]
pub struct ChunkNoise(pub Arc<dyn NoiseSource>);

impl Default for ChunkNoise {
    fn default() -> Self {
        Self(Arc::new(TerrainNoise::default()))
    }
}

/// Bevy plugin that drives marching cubes mesh generation.
///
/// When the `auto_queue` feature is enabled, any [`Chunk`] added or changed is
/// automatically processed. Mesh generation runs on Bevy's `AsyncComputeTaskPool`
/// so the main thread is never blocked:
///
/// ```text
/// Chunk added / changed
///   → QueuedChunk inserted          (MarchingCubesSet::Spawn, queue_changed_chunks)
///   → ComputeTask spawned           (MarchingCubesSet::Spawn, at most max_tasks_per_frame)
///   → [async compute runs]
///   → GeneratedMesh inserted        (MarchingCubesSet::Generate, once task completes)
///   → [your collider systems here]
///   → Mesh3d inserted               (MarchingCubesSet::Upload, at most max_uploads_per_frame)
///   → GeneratedMesh removed
/// ```
pub struct MarchingCubesPlugin {
    /// Initial value for [`MarchingCubesConfig::max_tasks_per_frame`].
    pub max_tasks_per_frame: usize,
    /// Initial value for [`MarchingCubesConfig::max_uploads_per_frame`].
    pub max_uploads_per_frame: usize,
}

impl Default for MarchingCubesPlugin {
    fn default() -> Self {
        let config = MarchingCubesConfig::default();
        Self {
            max_tasks_per_frame: config.max_tasks_per_frame,
            max_uploads_per_frame: config.max_uploads_per_frame,
        }
    }
}

impl Plugin for MarchingCubesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MarchingCubesConfig {
            max_tasks_per_frame: self.max_tasks_per_frame,
            max_uploads_per_frame: self.max_uploads_per_frame,
        })
        .init_resource::<ChunkNoise>();

        #[cfg(feature = "auto_queue")]
        app.configure_sets(
            Update,
            (
                MarchingCubesSet::Spawn,
                MarchingCubesSet::Generate,
                MarchingCubesSet::Upload,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                (queue_changed_chunks, spawn_mesh_tasks)
                    .chain()
                    .in_set(MarchingCubesSet::Spawn),
                poll_mesh_tasks.in_set(MarchingCubesSet::Generate),
                upload_mesh.in_set(MarchingCubesSet::Upload),
            ),
        );
    }
}

/// Queues every added or changed [`Chunk`], discarding any stale in-flight work.
pub fn queue_changed_chunks(mut commands: Commands, query: Query<Entity, Changed<Chunk>>) {
    for entity in query.iter() {
        commands
            .entity(entity)
            .remove::<(ComputeTask, GeneratedMesh)>()
            .insert(QueuedChunk);
    }
}

/// Spawns async compute tasks for [`QueuedChunk`]s, up to [`MarchingCubesConfig::max_tasks_per_frame`] per frame.
pub fn spawn_mesh_tasks(
    mut commands: Commands,
    config: Res<MarchingCubesConfig>,
    noise: Res<ChunkNoise>,
    query: Query<(Entity, &Chunk), With<QueuedChunk>>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for (entity, chunk) in query.iter().take(config.max_tasks_per_frame) {
        if let Err(e) = chunk.config.validate() {
            error!("chunk {:?} has an invalid config: {e}", chunk.coordinate);
            commands.entity(entity).remove::<QueuedChunk>();
            continue;
        }

        // Shares the noise source; no deep copy on the main thread.
        let builder = ChunkMeshBuilder::new(Arc::clone(&noise.0));
        let coordinate = chunk.coordinate;
        let chunk_config = chunk.config;

        let task = task_pool
            .spawn(async move { GeneratedMesh(builder.build(coordinate, &chunk_config)) });

        commands
            .entity(entity)
            .insert(ComputeTask(task))
            .remove::<QueuedChunk>();
    }
}

/// Polls in-flight [`ComputeTask`]s each frame and inserts [`GeneratedMesh`] on completion.
///
/// Non-blocking: tasks that haven't finished are skipped and retried next frame.
pub fn poll_mesh_tasks(mut commands: Commands, mut query: Query<(Entity, &mut ComputeTask)>) {
    for (entity, mut compute_task) in query.iter_mut() {
        if let Some(generated_mesh) = block_on(future::poll_once(&mut compute_task.0)) {
            commands
                .entity(entity)
                .insert(generated_mesh)
                .remove::<ComputeTask>();
        }
    }
}

/// Uploads up to [`MarchingCubesConfig::max_uploads_per_frame`] [`GeneratedMesh`]es into
/// Bevy [`Mesh3d`]s, then removes them.
///
/// This is the only system that touches render meshes, so finished chunks are applied one
/// batch per frame no matter how many tasks completed. Buffers are **moved** into the Bevy
/// mesh with no copies.
pub fn upload_mesh(
    mut commands: Commands,
    config: Res<MarchingCubesConfig>,
    mut query: Query<(Entity, &Chunk, &mut GeneratedMesh)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, chunk, mut generated) in query.iter_mut().take(config.max_uploads_per_frame) {
        let buffers = std::mem::take(&mut generated.0);
        debug!(
            "uploading chunk {:?}: {} triangles",
            chunk.coordinate,
            buffers.triangle_count()
        );

        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(to_bevy_mesh(buffers))))
            .remove::<GeneratedMesh>();
    }
}

/// Converts core mesh buffers into a flat-shaded Bevy triangle list.
pub fn to_bevy_mesh(buffers: MeshBuffers) -> Mesh {
    let normals = flat_normals(&buffers);

    let mut bevy_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffers.vertices);
    bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    bevy_mesh.insert_indices(Indices::U32(buffers.indices));
    bevy_mesh
}

/// One face normal per vertex.
///
/// Vertices are never shared between triangles, so each vertex takes the normal of the
/// single triangle that references it.
pub fn flat_normals(buffers: &MeshBuffers) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0; 3]; buffers.vertices.len()];
    for tri in 0..buffers.triangle_count() {
        let n = buffers.tri_normal(tri);
        for v in buffers.triangle(tri) {
            normals[v as usize] = [n.x, n.y, n.z];
        }
    }
    normals
}
