//! Tabletop configuration and the rig entities it drives.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use geomap::{ExtentShape, GeoPoint};

/// Everything that defines the miniature: where it looks, how big the
/// footprint is, and how the vertical offset behaves.
///
/// Plain public fields; any writer (the control panel, gameplay code, tests)
/// mutates them directly and the polling change tracker picks the edits up on
/// the next tick.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabletopConfig {
    /// Geographic center of the extent.
    pub center: GeoPoint,
    pub shape: ExtentShape,
    /// Extent width in meters. Must be > 0: a zero width yields a zero camera
    /// radius and an infinite miniature scale downstream.
    pub width: f64,
    /// Extent height in meters; only meaningful when `shape` is `Rectangle`.
    pub height: f64,
    /// Fixed vertical offset of the miniature, in extent meters.
    pub elevation_offset: f64,
    /// When set, the vertical offset tracks the lowest scanned mesh vertex
    /// instead of `elevation_offset`.
    pub automatic_elevation: bool,
}

impl Default for TabletopConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::wgs84(34.78, 32.08, 0.0),
            shape: ExtentShape::Square,
            width: 4000.0,
            height: 3000.0,
            elevation_offset: 0.0,
            automatic_elevation: false,
        }
    }
}

/// The physical table: its uniform scale is the edge length of the surface
/// the miniature has to fit.
#[derive(Component, Debug, Default)]
pub struct TabletopFrame;

/// The wrapper entity whose transform carries the miniature scale and the
/// vertical offset. Child of the frame; parent of the map root.
#[derive(Component, Debug, Default)]
pub struct TabletopRig;

/// Edge length of the default table, in engine units.
pub const TABLE_SIZE: f32 = 1.0;

/// Spawn the frame -> rig -> map-root hierarchy the controller operates on.
pub fn setup_rig(mut commands: Commands) {
    commands
        .spawn((
            TabletopFrame,
            Transform::from_scale(Vec3::splat(TABLE_SIZE)),
            Visibility::default(),
        ))
        .with_children(|frame| {
            frame
                .spawn((TabletopRig, Transform::default(), Visibility::default()))
                .with_children(|rig| {
                    rig.spawn((
                        geomap::MapRoot,
                        Transform::default(),
                        Visibility::default(),
                    ));
                });
        });
}
