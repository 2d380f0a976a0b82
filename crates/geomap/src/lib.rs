//! Stand-in map surface for the tabletop controller: geographic value types,
//! extent descriptors, an equirectangular local-tangent projection, a tile
//! grid that rebuilds asynchronously over several frames, and the
//! high-precision-origin refresh.
//!
//! The tabletop controller treats everything in this crate as an opaque
//! collaborator: it reads/writes [`MapSurface`] and [`CameraRig`], listens for
//! [`ExtentUpdated`], and fires [`HpRootRefreshRequested`].

use bevy::prelude::*;

pub mod extent;
pub mod geo;
pub mod surface;
pub mod tiles;

pub use extent::{ExtentDescriptor, ExtentShape};
pub use geo::{GeoPoint, SpatialReference};
pub use surface::{CameraRig, GeoCamera, HpRootRefreshRequested, MapSurface};
pub use tiles::{ExtentUpdated, MapRoot, TileMesh, TileRebuild};

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapSurface>()
            .init_resource::<CameraRig>()
            .init_resource::<TileRebuild>()
            .add_event::<ExtentUpdated>()
            .add_event::<HpRootRefreshRequested>()
            .add_systems(
                Update,
                (
                    tiles::advance_tile_rebuild,
                    surface::handle_hp_root_refresh,
                    surface::apply_camera_rig,
                ),
            );
    }
}
