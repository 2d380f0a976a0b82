//! Tile grid of the stand-in map surface.
//!
//! Assigning a new extent does not update the scene immediately: a rebuild is
//! queued and runs over several frames (mirroring a streaming tile fetch).
//! When it completes, the old tile meshes are replaced by a fresh grid whose
//! heights come from seeded noise, and a single [`ExtentUpdated`] event
//! reports the world-space bounds of everything that was rebuilt. Consumers
//! finalize centering and scale from that event, never from the assignment.

use bevy::math::DVec3;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::extent::ExtentDescriptor;
use crate::surface::MapSurface;

/// Number of tiles along each axis of the rebuilt grid.
const TILE_GRID: usize = 4;
/// Quads along each axis of a single tile mesh.
const TILE_RES: usize = 8;
/// Frames a queued rebuild takes before the new tiles appear.
const REBUILD_FRAMES: u32 = 3;
/// Terrain relief as a fraction of the extent's larger dimension.
const RELIEF_RATIO: f64 = 0.02;
const NOISE_FREQUENCY: f32 = 0.9;

/// Root entity of the map scene graph; tiles are spawned as its children.
#[derive(Component, Debug, Default)]
pub struct MapRoot;

/// Marker for a mesh-bearing tile of the map surface.
#[derive(Component, Debug, Default)]
pub struct TileMesh;

/// Fired once per completed tile rebuild with the world-space bounds of the
/// rebuilt area.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExtentUpdated {
    pub area_min: DVec3,
    pub area_max: DVec3,
}

struct PendingRebuild {
    descriptor: ExtentDescriptor,
    frames_remaining: u32,
}

/// Tracks the in-flight tile rebuild, if any. Queuing a new rebuild while one
/// is pending replaces it; only the final state ever materializes.
#[derive(Resource, Default)]
pub struct TileRebuild {
    pending: Option<PendingRebuild>,
}

impl TileRebuild {
    /// Queue a rebuild for `descriptor`, replacing any pending one.
    pub fn start(&mut self, descriptor: ExtentDescriptor) {
        self.pending = Some(PendingRebuild {
            descriptor,
            frames_remaining: REBUILD_FRAMES,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Advance the pending rebuild by one frame; on the final frame, swap the tile
/// meshes and fire [`ExtentUpdated`].
pub fn advance_tile_rebuild(
    mut commands: Commands,
    mut rebuild: ResMut<TileRebuild>,
    surface: Res<MapSurface>,
    mut meshes: ResMut<Assets<Mesh>>,
    roots: Query<(Entity, &GlobalTransform), With<MapRoot>>,
    old_tiles: Query<Entity, With<TileMesh>>,
    mut events: EventWriter<ExtentUpdated>,
) {
    let Some(pending) = rebuild.pending.as_mut() else {
        return;
    };
    if pending.frames_remaining > 0 {
        pending.frames_remaining -= 1;
        return;
    }
    let Some(pending) = rebuild.pending.take() else {
        return;
    };
    let Ok((root, root_global)) = roots.get_single() else {
        // No map root yet; drop the rebuild quietly and wait for the next one.
        debug!("tile rebuild completed without a map root; dropping");
        return;
    };

    for tile in &old_tiles {
        commands.entity(tile).despawn_recursive();
    }

    let descriptor = pending.descriptor;
    // Extent dimensions in root-local engine units.
    let extent_x = (descriptor.dimensions.x / surface.meters_per_unit) as f32;
    let extent_z = (descriptor.dimensions.y / surface.meters_per_unit) as f32;
    let relief =
        (descriptor.dimensions.max_element() * RELIEF_RATIO / surface.meters_per_unit) as f32;

    // Deterministic per-extent terrain: the noise seed derives from the center.
    let seed_bits = descriptor.center.longitude.to_bits()
        ^ descriptor.center.latitude.to_bits().rotate_left(32);
    let mut rng = ChaCha8Rng::seed_from_u64(seed_bits);
    let mut noise = FastNoiseLite::with_seed(rng.gen());
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(NOISE_FREQUENCY / extent_x.max(1.0)));

    let tile_x = extent_x / TILE_GRID as f32;
    let tile_z = extent_z / TILE_GRID as f32;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;

    commands.entity(root).with_children(|parent| {
        for gx in 0..TILE_GRID {
            for gz in 0..TILE_GRID {
                // Tile origin in root-local space; the grid is centered on the root.
                let ox = gx as f32 * tile_x - extent_x / 2.0;
                let oz = gz as f32 * tile_z - extent_z / 2.0;
                let mesh = build_tile_mesh(&noise, ox, oz, tile_x, tile_z, relief);
                track_height_bounds(&mesh, &mut min_y, &mut max_y);
                parent.spawn((
                    TileMesh,
                    Mesh3d(meshes.add(mesh)),
                    Transform::from_xyz(ox, 0.0, oz),
                    Visibility::default(),
                ));
            }
        }
    });

    // Bounds of the rebuilt area in world space, via the root's last
    // propagated global transform.
    let half = Vec3::new(extent_x / 2.0, 0.0, extent_z / 2.0);
    let area_min = root_global.transform_point(Vec3::new(-half.x, min_y, -half.z));
    let area_max = root_global.transform_point(Vec3::new(half.x, max_y, half.z));
    events.send(ExtentUpdated {
        area_min: area_min.as_dvec3(),
        area_max: area_max.as_dvec3(),
    });
}

/// Build one tile as a TILE_RES x TILE_RES quad grid. Vertex positions are
/// tile-local (the tile transform carries the offset); heights are sampled in
/// root-local coordinates so adjoining tiles share edge heights.
fn build_tile_mesh(
    noise: &FastNoiseLite,
    origin_x: f32,
    origin_z: f32,
    size_x: f32,
    size_z: f32,
    relief: f32,
) -> Mesh {
    let step_x = size_x / TILE_RES as f32;
    let step_z = size_z / TILE_RES as f32;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity((TILE_RES + 1) * (TILE_RES + 1));
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(positions.capacity());
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(positions.capacity());
    let mut indices: Vec<u32> = Vec::with_capacity(TILE_RES * TILE_RES * 6);

    for iz in 0..=TILE_RES {
        for ix in 0..=TILE_RES {
            let x = ix as f32 * step_x;
            let z = iz as f32 * step_z;
            let y = noise.get_noise_2d(origin_x + x, origin_z + z) * relief;
            positions.push([x, y, z]);
            normals.push([0.0, 1.0, 0.0]);
            uvs.push([
                ix as f32 / TILE_RES as f32,
                iz as f32 / TILE_RES as f32,
            ]);
        }
    }

    let stride = (TILE_RES + 1) as u32;
    for iz in 0..TILE_RES as u32 {
        for ix in 0..TILE_RES as u32 {
            let tl = iz * stride + ix;
            let tr = tl + 1;
            let bl = tl + stride;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, br, tr, tl, bl, br]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

fn track_height_bounds(mesh: &Mesh, min_y: &mut f32, max_y: &mut f32) {
    if let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    {
        for p in positions {
            *min_y = min_y.min(p[1]);
            *max_y = max_y.max(p[1]);
        }
    }
}
