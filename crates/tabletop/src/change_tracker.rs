//! Polling change tracker for the tabletop config.
//!
//! Writers mutate `TabletopConfig` fields directly, so per-field change
//! detection works by diffing against a snapshot taken at the last apply:
//! each tick, any differing field sets its bit in the dirty mask and refreshes
//! the snapshot. The apply pass then consumes the mask and clears it on every
//! exit path, panics included.

use bevy::prelude::*;

use crate::config::TabletopConfig;
use crate::dirty::DirtyFields;
use crate::elevation::ElevationUpdateRequested;
use crate::extent_sync::ExtentSyncRequested;

/// Snapshot-and-mask state of the polling tracker.
#[derive(Resource, Debug, Default)]
pub struct ChangeTracker {
    snapshot: Option<TabletopConfig>,
    pub dirty: DirtyFields,
}

impl ChangeTracker {
    /// Diff `config` against the snapshot, folding differences into the dirty
    /// mask and refreshing the snapshot. The first call only records a
    /// baseline and emits nothing.
    pub fn observe(&mut self, config: &TabletopConfig) {
        let Some(snapshot) = self.snapshot.as_mut() else {
            self.snapshot = Some(config.clone());
            return;
        };

        if snapshot.center != config.center {
            snapshot.center = config.center;
            self.dirty.mark(DirtyFields::CENTER);
        }
        if snapshot.shape != config.shape {
            snapshot.shape = config.shape;
            self.dirty.mark(DirtyFields::SHAPE);
        }
        if snapshot.width != config.width {
            snapshot.width = config.width;
            self.dirty.mark(DirtyFields::WIDTH);
        }
        if snapshot.height != config.height {
            snapshot.height = config.height;
            self.dirty.mark(DirtyFields::HEIGHT);
        }
        if snapshot.elevation_offset != config.elevation_offset {
            snapshot.elevation_offset = config.elevation_offset;
            self.dirty.mark(DirtyFields::ELEVATION_OFFSET);
        }
        if snapshot.automatic_elevation != config.automatic_elevation {
            snapshot.automatic_elevation = config.automatic_elevation;
            self.dirty.mark(DirtyFields::AUTOMATIC_ELEVATION);
        }
    }
}

/// System: poll the config for field changes. Runs before the apply pass in
/// the same tick so edits made this frame are applied this frame.
pub fn track_config_changes(config: Res<TabletopConfig>, mut tracker: ResMut<ChangeTracker>) {
    tracker.observe(&config);
}

/// Clears the dirty mask when dropped, so the apply pass resets it on every
/// exit path including unwinding.
struct MaskReset<'a>(&'a mut DirtyFields);

impl Drop for MaskReset<'_> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

/// System: consume the dirty mask and dispatch the matching recomputes.
///
/// Ordering mirrors the field semantics: elevation mode first, then the
/// extent geometry, then the fixed offset.
pub fn apply_config_changes(
    mut tracker: ResMut<ChangeTracker>,
    mut sync_requests: EventWriter<ExtentSyncRequested>,
    mut elevation_requests: EventWriter<ElevationUpdateRequested>,
) {
    let dirty = tracker.dirty;
    if dirty.is_empty() {
        return;
    }
    let _reset = MaskReset(&mut tracker.dirty);

    if dirty.intersects(DirtyFields::AUTOMATIC_ELEVATION) {
        elevation_requests.send(ElevationUpdateRequested::Reposition);
    }
    if dirty.intersects(DirtyFields::EXTENT_FIELDS) {
        sync_requests.send(ExtentSyncRequested);
    }
    if dirty.intersects(DirtyFields::ELEVATION_OFFSET) {
        elevation_requests.send(ElevationUpdateRequested::FixedOnly);
    }
}
