//! Extent synchronizer: turns the tabletop config into a map extent, a rig
//! scale, and a camera pose.

use bevy::prelude::*;

use geomap::{CameraRig, ExtentDescriptor, GeoPoint, MapSurface, TileRebuild};

use crate::config::{TabletopConfig, TabletopRig};

/// Request to re-run the extent synchronizer. Sent by the apply pass whenever
/// a geometry field (center, shape, width, height) changed, and once at
/// startup.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ExtentSyncRequested;

/// System: recompute the extent descriptor and camera pose from the config.
///
/// When the freshly computed descriptor equals the one already applied to the
/// map surface (structural equality), the expensive tile rebuild is skipped
/// and only the origin position and miniature scale are recomputed. Otherwise
/// the descriptor is assigned, which queues an asynchronous rebuild whose
/// completion is handled in `extent_events`. The camera position is updated on
/// both paths.
pub fn sync_extent(
    mut requests: EventReader<ExtentSyncRequested>,
    config: Res<TabletopConfig>,
    mut surface: ResMut<MapSurface>,
    mut rebuild: ResMut<TileRebuild>,
    mut camera: ResMut<CameraRig>,
    mut rigs: Query<&mut Transform, With<TabletopRig>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let dimensions = config.shape.dimensions(config.width, config.height);
    let radius = config.shape.camera_radius(config.width, config.height);
    let desired = ExtentDescriptor {
        center: config.center,
        shape: config.shape,
        dimensions,
    };

    if surface.extent == Some(desired) {
        // Same footprint as what the surface already renders: recenter and
        // rescale without forcing a tile rebuild.
        surface.origin_position = desired.center;
        if let Ok(mut transform) = rigs.get_single_mut() {
            transform.scale = Vec3::splat(miniature_scale(radius));
        }
    } else {
        surface.extent = Some(desired);
        rebuild.start(desired);
    }

    camera.position = GeoPoint::new(
        config.center.longitude,
        config.center.latitude,
        radius - config.elevation_offset,
        config.center.spatial_reference,
    );
}

/// Uniform rig scale that fits a footprint of the given camera radius onto a
/// unit table. Infinite for `radius == 0`; the width > 0 precondition lives
/// with the config.
pub fn miniature_scale(radius: f64) -> f32 {
    (1.0 / (2.0 * radius)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miniature_scale_worked_example() {
        // Rectangle 20 x 10: radius ~= 11.1803, scale ~= 0.04472.
        let radius = geomap::ExtentShape::Rectangle.camera_radius(20.0, 10.0);
        assert!((miniature_scale(radius) - 0.044721359).abs() < 1e-6);
    }

    #[test]
    fn test_zero_radius_scale_is_infinite() {
        // Documented caller error: zero width is not guarded.
        assert!(miniature_scale(0.0).is_infinite());
    }
}
