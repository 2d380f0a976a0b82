//! The map surface: origin position, applied extent, and the world<->geographic
//! mapping, plus the camera rig and the high-precision-origin refresh.
//!
//! In the shipped product this contract is fulfilled by a full tiled map
//! renderer; here a compact equirectangular local-tangent projection around
//! `origin_position` stands in for it. Engine X maps to east, engine -Z to
//! north, engine Y to altitude, all scaled by `meters_per_unit`.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::extent::ExtentDescriptor;
use crate::geo::GeoPoint;
use crate::tiles::MapRoot;

/// Meters per degree of latitude (spherical approximation).
const METERS_PER_DEG_LAT: f64 = 110_540.0;
/// Meters per degree of longitude at the equator; scaled by cos(latitude).
const METERS_PER_DEG_LON: f64 = 111_320.0;

/// The map collaborator: owns the origin position and the currently applied
/// extent. The extent field carries structural equality so callers can detect
/// redundant re-assignments and skip the tile rebuild they would trigger.
#[derive(Resource, Debug, Clone)]
pub struct MapSurface {
    /// Geographic position that maps to the map root's local origin.
    pub origin_position: GeoPoint,
    /// Extent currently applied to the surface, `None` until first assignment.
    pub extent: Option<ExtentDescriptor>,
    /// Engine-unit to meter conversion of the stand-in projection.
    pub meters_per_unit: f64,
}

impl Default for MapSurface {
    fn default() -> Self {
        Self {
            origin_position: GeoPoint::default(),
            extent: None,
            meters_per_unit: 1.0,
        }
    }
}

impl MapSurface {
    /// Convert a map-root-local engine position into a geographic point.
    pub fn world_to_geographic(&self, world: DVec3) -> GeoPoint {
        let origin = self.origin_position;
        let lat_cos = origin.latitude.to_radians().cos();
        GeoPoint::new(
            origin.longitude + world.x * self.meters_per_unit / (METERS_PER_DEG_LON * lat_cos),
            origin.latitude - world.z * self.meters_per_unit / METERS_PER_DEG_LAT,
            origin.altitude + world.y * self.meters_per_unit,
            origin.spatial_reference,
        )
    }

    /// Inverse of [`world_to_geographic`](Self::world_to_geographic).
    pub fn geographic_to_world(&self, point: &GeoPoint) -> DVec3 {
        let origin = self.origin_position;
        let lat_cos = origin.latitude.to_radians().cos();
        DVec3::new(
            (point.longitude - origin.longitude) * METERS_PER_DEG_LON * lat_cos
                / self.meters_per_unit,
            (point.altitude - origin.altitude) / self.meters_per_unit,
            -(point.latitude - origin.latitude) * METERS_PER_DEG_LAT / self.meters_per_unit,
        )
    }
}

/// The camera/location collaborator: a geographic position applied to the
/// [`GeoCamera`] transform each frame, looking down at the origin.
#[derive(Resource, Debug, Clone, Default)]
pub struct CameraRig {
    pub position: GeoPoint,
}

/// Marker for the entity that tracks the map's geographic camera pose (used
/// for LOD/visibility decisions by a real surface; purely positional here).
#[derive(Component, Debug, Default)]
pub struct GeoCamera;

/// Request to re-seat the high-precision origin, compensating for
/// floating-point drift after scale changes. Consumers fire this after
/// rescaling or finishing an elevation animation.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct HpRootRefreshRequested;

/// Apply the camera rig's geographic position to the camera transform.
pub fn apply_camera_rig(
    rig: Res<CameraRig>,
    surface: Res<MapSurface>,
    mut cameras: Query<&mut Transform, With<GeoCamera>>,
) {
    let Ok(mut transform) = cameras.get_single_mut() else {
        return;
    };
    let world = surface.geographic_to_world(&rig.position).as_vec3();
    *transform =
        Transform::from_translation(world).looking_at(Vec3::new(world.x, 0.0, world.z), Vec3::NEG_Z);
}

/// Consume pending refresh requests and re-anchor the map root.
///
/// The real renderer re-seats an HP root pair; the stand-in snaps any residual
/// translation drift off the root so `origin_position` is exactly the root's
/// local zero again.
pub fn handle_hp_root_refresh(
    mut events: EventReader<HpRootRefreshRequested>,
    mut roots: Query<&mut Transform, With<MapRoot>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    for mut transform in &mut roots {
        transform.translation = Vec3::ZERO;
    }
}
