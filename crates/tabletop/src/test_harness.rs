//! TestTable — headless integration harness for the tabletop controller.
//!
//! Wraps a `bevy::app::App` with `MapPlugin` + `TabletopPlugin` (no window,
//! no renderer) plus small query/edit helpers, so integration tests read like
//! scripts: edit the config, tick, assert on the resulting ECS state.

use bevy::app::App;
use bevy::prelude::*;
use bevy::transform::TransformPlugin;

use geomap::{
    CameraRig, ExtentUpdated, GeoPoint, HpRootRefreshRequested, MapPlugin, MapSurface, TileMesh,
    TileRebuild,
};

use crate::config::{TabletopConfig, TabletopRig};
use crate::elevation::ElevationAnimator;
use crate::extent_sync::ExtentSyncRequested;
use crate::TabletopPlugin;

/// Running total of HP-root refresh requests observed by the harness.
#[derive(Resource, Default)]
pub struct HpRefreshCount(pub usize);

fn count_hp_refreshes(
    mut events: EventReader<HpRootRefreshRequested>,
    mut count: ResMut<HpRefreshCount>,
) {
    count.0 += events.read().count();
}

/// Running total of extent updates observed, with the most recent payload.
#[derive(Resource, Default)]
pub struct ExtentUpdateLog {
    pub count: usize,
    pub last: Option<ExtentUpdated>,
}

fn log_extent_updates(mut events: EventReader<ExtentUpdated>, mut log: ResMut<ExtentUpdateLog>) {
    for event in events.read() {
        log.count += 1;
        log.last = Some(*event);
    }
}

/// A headless app wrapping the full map + tabletop stack.
pub struct TestTable {
    pub app: App,
}

impl TestTable {
    /// Build a table with the default config and run the startup tick.
    pub fn new() -> Self {
        Self::with_config(TabletopConfig::default())
    }

    /// Build a table with `config` and run the startup tick.
    pub fn with_config(config: TabletopConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(TransformPlugin);
        app.add_plugins(AssetPlugin::default());
        app.init_asset::<Mesh>();
        app.add_plugins((MapPlugin, TabletopPlugin));

        app.insert_resource(config);
        app.init_resource::<HpRefreshCount>();
        app.init_resource::<ExtentUpdateLog>();
        app.add_systems(Last, (count_hp_refreshes, log_extent_updates));

        // First update runs Startup (rig spawn + initial sync request).
        app.update();
        Self { app }
    }

    pub fn tick(&mut self) {
        self.app.update();
    }

    pub fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Tick until the pending tile rebuild (if any) has completed and its
    /// `ExtentUpdated` has been consumed.
    pub fn tick_through_rebuild(&mut self) {
        for _ in 0..16 {
            self.tick();
            if !self.rebuild_pending() {
                break;
            }
        }
        // One extra tick so the ExtentUpdated handler runs after the event.
        self.tick();
    }

    // -----------------------------------------------------------------------
    // State access
    // -----------------------------------------------------------------------

    pub fn edit_config(&mut self, edit: impl FnOnce(&mut TabletopConfig)) {
        let mut config = self.app.world_mut().resource_mut::<TabletopConfig>();
        edit(&mut config);
    }

    pub fn surface(&self) -> &MapSurface {
        self.app.world().resource::<MapSurface>()
    }

    pub fn camera_position(&self) -> GeoPoint {
        self.app.world().resource::<CameraRig>().position
    }

    /// Overwrite the camera position with a sentinel, to observe whether a
    /// later pass rewrites it.
    pub fn poison_camera(&mut self) {
        self.app.world_mut().resource_mut::<CameraRig>().position =
            GeoPoint::wgs84(-999.0, -999.0, -999.0);
    }

    pub fn rebuild_pending(&self) -> bool {
        self.app.world().resource::<TileRebuild>().is_pending()
    }

    pub fn rig_transform(&mut self) -> Transform {
        let mut query = self
            .app
            .world_mut()
            .query_filtered::<&Transform, With<TabletopRig>>();
        *query.single(self.app.world())
    }

    /// Place the rig at an arbitrary local height, as if a previous animation
    /// or offset had left it there.
    pub fn set_rig_y(&mut self, y: f32) {
        let mut query = self
            .app
            .world_mut()
            .query_filtered::<&mut Transform, With<TabletopRig>>();
        query.single_mut(self.app.world_mut()).translation.y = y;
    }

    pub fn animator(&self) -> &ElevationAnimator {
        self.app.world().resource::<ElevationAnimator>()
    }

    pub fn animator_mut(&mut self) -> Mut<'_, ElevationAnimator> {
        self.app.world_mut().resource_mut::<ElevationAnimator>()
    }

    pub fn hp_refresh_count(&self) -> usize {
        self.app.world().resource::<HpRefreshCount>().0
    }

    pub fn extent_update_count(&self) -> usize {
        self.app.world().resource::<ExtentUpdateLog>().count
    }

    pub fn last_extent_update(&self) -> Option<ExtentUpdated> {
        self.app.world().resource::<ExtentUpdateLog>().last
    }

    pub fn tile_count(&mut self) -> usize {
        let mut query = self
            .app
            .world_mut()
            .query_filtered::<(), With<TileMesh>>();
        query.iter(self.app.world()).count()
    }

    /// Re-request an extent sync without touching the config — the "apply the
    /// same config again" path.
    pub fn request_sync(&mut self) {
        self.app.world_mut().send_event(ExtentSyncRequested);
    }
}

impl Default for TestTable {
    fn default() -> Self {
        Self::new()
    }
}
