//! Finalizes centering and scale once the map surface reports a completed
//! tile rebuild.

use bevy::math::DVec3;
use bevy::prelude::*;

use geomap::{ExtentUpdated, MapSurface};

use crate::config::TabletopRig;
use crate::elevation::ElevationUpdateRequested;

/// System: consume [`ExtentUpdated`] and recenter/rescale onto the rebuilt
/// tiles.
///
/// The event's area bounds are world-space. The new origin is the horizontal
/// center of the rebuilt area at its top altitude; the rig scale fits the
/// larger horizontal span onto the unit table. Elevation is then repositioned
/// so the miniature sits on the new tiles.
pub fn handle_extent_updated(
    mut events: EventReader<ExtentUpdated>,
    mut surface: ResMut<MapSurface>,
    mut rigs: Query<&mut Transform, With<TabletopRig>>,
    mut elevation_requests: EventWriter<ElevationUpdateRequested>,
) {
    // Only the latest rebuild matters if several completed since last tick.
    let Some(update) = events.read().last().copied() else {
        return;
    };

    let span = update.area_max - update.area_min;
    let center = DVec3::new(
        update.area_min.x + span.x / 2.0,
        update.area_min.y + span.y,
        update.area_min.z + span.z / 2.0,
    );
    let origin = surface.world_to_geographic(center);
    surface.origin_position = origin;

    let scale = 1.0 / span.x.max(span.z);
    if let Ok(mut transform) = rigs.get_single_mut() {
        transform.scale = Vec3::splat(scale as f32);
    }

    elevation_requests.send(ElevationUpdateRequested::Reposition);
}
