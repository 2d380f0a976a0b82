//! Visual dressing of the demo scene: view camera, lighting, the physical
//! table slab, and materials for the logic-only tile meshes.

use bevy::prelude::*;

use geomap::{GeoCamera, TileMesh};
use tabletop::TABLE_SIZE;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, dress_tiles);
    }
}

/// Shared material for freshly rebuilt tiles.
#[derive(Resource)]
struct TileMaterial(Handle<StandardMaterial>);

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // View camera orbiting nothing: a fixed three-quarter view of the table.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(1.2, 1.0, 1.2).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // The map surface's geographic camera pose (driven by `apply_camera_rig`).
    commands.spawn((GeoCamera, Transform::default(), Visibility::default()));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
    });

    // The physical table the miniature sits on.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(TABLE_SIZE * 1.4, 0.05, TABLE_SIZE * 1.4))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.24, 0.16),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.03, 0.0),
    ));

    commands.insert_resource(TileMaterial(materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.55, 0.38),
        perceptual_roughness: 1.0,
        ..default()
    })));
}

/// The map crate spawns tiles as bare meshes; attach the shared material to
/// any tile that does not have one yet.
fn dress_tiles(
    mut commands: Commands,
    material: Res<TileMaterial>,
    tiles: Query<Entity, (With<TileMesh>, Without<MeshMaterial3d<StandardMaterial>>)>,
) {
    for tile in &tiles {
        commands
            .entity(tile)
            .insert(MeshMaterial3d(material.0.clone()));
    }
}
