//! Tabletop controller: presents a geographic map as a scaled miniature that
//! fits a table surface.
//!
//! Control flow per tick, in order: the polling change tracker diffs the
//! config against its snapshot and accumulates a dirty mask; the apply pass
//! consumes the mask (clearing it on every exit path) and dispatches extent
//! and elevation recomputes; the extent synchronizer writes the map extent
//! and camera pose; completed tile rebuilds finalize centering and scale; the
//! elevation controller positions the rig, in automatic mode via an
//! interruptible one-step-per-tick animation.

use bevy::prelude::*;

pub mod change_tracker;
pub mod config;
pub mod dirty;
pub mod elevation;
pub mod extent_events;
pub mod extent_sync;
pub mod mesh_scan;
pub mod raycast;

#[cfg(test)]
pub mod test_harness;

pub use change_tracker::ChangeTracker;
pub use config::{TabletopConfig, TabletopFrame, TabletopRig, TABLE_SIZE};
pub use dirty::DirtyFields;
pub use elevation::{ElevationAnimator, ElevationUpdateRequested, ELEVATION_STEP};
pub use extent_sync::ExtentSyncRequested;
pub use raycast::{raycast, TabletopHit};

pub struct TabletopPlugin;

impl Plugin for TabletopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TabletopConfig>()
            .init_resource::<ChangeTracker>()
            .init_resource::<ElevationAnimator>()
            .add_event::<ExtentSyncRequested>()
            .add_event::<ElevationUpdateRequested>()
            .add_systems(Startup, (config::setup_rig, request_initial_state).chain())
            .add_systems(
                Update,
                (
                    change_tracker::track_config_changes,
                    change_tracker::apply_config_changes,
                    extent_sync::sync_extent,
                    extent_events::handle_extent_updated,
                    elevation::update_elevation,
                    elevation::step_elevation_animation,
                )
                    .chain(),
            );
    }
}

/// Push the initial extent and fixed elevation through the pipeline, so the
/// first frame already reflects the configured state.
fn request_initial_state(
    mut sync_requests: EventWriter<ExtentSyncRequested>,
    mut elevation_requests: EventWriter<ElevationUpdateRequested>,
) {
    sync_requests.send(ExtentSyncRequested);
    elevation_requests.send(ElevationUpdateRequested::FixedOnly);
}
