use bevy::prelude::*;
use bevy_infinite_grid::{InfiniteGridBundle, InfiniteGridPlugin, InfiniteGridSettings};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use std::collections::HashSet;
use terrain_marching_cubes::{
    ChunkConfig, MarchingCubesPlugin, chunk::Chunk, types::ChunkCoordinate,
};

const AXIS_SIZE: f32 = 16.0;
const SEGMENT_COUNT: usize = 24;
const NOISE_SCALE: f32 = 0.35;
const THRESHOLD: f32 = 0.5;
const CHUNK_RADIUS: i32 = 4;

#[derive(Resource)]
struct TerrainMaterial(Handle<StandardMaterial>);

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            MarchingCubesPlugin::default(),
            PanOrbitCameraPlugin,
            InfiniteGridPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, (spawn_chunks, apply_material, debug))
        .run();
}

fn setup(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    commands.spawn(InfiniteGridBundle {
        settings: InfiniteGridSettings {
            fadeout_distance: 1000.0,
            ..Default::default()
        },
        ..Default::default()
    });

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera {
            button_orbit: MouseButton::Right,
            button_pan: MouseButton::Middle,
            ..default()
        },
        Transform::from_xyz(60., 80., 60.).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    commands.insert_resource(TerrainMaterial(materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.6, 0.25),
        // Faces point into the solid side of the threshold.
        double_sided: true,
        cull_mode: None,
        ..Default::default()
    })));
}

/// Spawns every chunk within `CHUNK_RADIUS` of the camera focus that doesn't exist yet.
fn spawn_chunks(
    mut commands: Commands,
    pan_orbit: Query<&PanOrbitCamera>,
    mut spawned: Local<HashSet<ChunkCoordinate>>,
) {
    let Ok(camera) = pan_orbit.single() else {
        return;
    };
    let config = ChunkConfig {
        axis_size: AXIS_SIZE,
        segment_count: SEGMENT_COUNT,
        noise_scale: NOISE_SCALE,
        threshold: THRESHOLD,
    };
    let origin = Chunk::at_translation(camera.target_focus, config).coordinate;

    for dx in -CHUNK_RADIUS..=CHUNK_RADIUS {
        for dz in -CHUNK_RADIUS..=CHUNK_RADIUS {
            if dx * dx + dz * dz > CHUNK_RADIUS * CHUNK_RADIUS {
                continue;
            }
            for y in -1..=1 {
                let coordinate = ChunkCoordinate::new(origin.x + dx, y, origin.z + dz);
                if spawned.insert(coordinate) {
                    commands.spawn(Chunk::new(coordinate, config).placed());
                }
            }
        }
    }
}

fn apply_material(
    mut commands: Commands,
    material: Res<TerrainMaterial>,
    query: Query<Entity, (With<Chunk>, Added<Mesh3d>)>,
) {
    for entity in query.iter() {
        commands
            .entity(entity)
            .insert(MeshMaterial3d(material.0.clone()));
    }
}

fn debug(mut gizmos: Gizmos, query: Query<(&GlobalTransform, &Chunk), Without<Mesh3d>>) {
    for (transform, chunk) in query.iter() {
        let half_extents = Vec3::splat(chunk.config.axis_size) / 2.0;
        let center = transform.translation() + half_extents;
        gizmos.cube(
            Transform::from_translation(center).with_scale(half_extents * 2.0),
            Color::WHITE,
        );
    }
}
