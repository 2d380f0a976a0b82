//! Control panel for the tabletop: edits `TabletopConfig` fields directly
//! (the polling change tracker picks the edits up next tick) and shows the
//! live cursor hit-test result.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use geomap::{ExtentShape, GeoPoint, MapRoot};
use tabletop::{raycast, TabletopConfig, TabletopFrame, TabletopHit};

pub struct PanelPlugin;

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorHit>()
            .add_systems(Update, (update_cursor_hit, tabletop_panel_ui).chain());
    }
}

/// Latest cursor hit-test against the table plane, if the cursor ray crossed
/// the viewport this frame.
#[derive(Resource, Default)]
pub struct CursorHit(pub Option<TabletopHit>);

/// Each frame, cast the cursor ray against the tabletop and record the result.
pub fn update_cursor_hit(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    map_roots: Query<&GlobalTransform, (With<MapRoot>, Without<Camera3d>)>,
    frames: Query<&GlobalTransform, (With<TabletopFrame>, Without<Camera3d>)>,
    config: Res<TabletopConfig>,
    mut hit: ResMut<CursorHit>,
) {
    hit.0 = None;

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, cam_transform)) = cameras.get_single() else {
        return;
    };
    let (Ok(map_root), Ok(frame)) = (map_roots.get_single(), frames.get_single()) else {
        return;
    };
    let Some(screen_pos) = window.cursor_position() else {
        return;
    };
    if let Ok(ray) = camera.viewport_to_world(cam_transform, screen_pos) {
        hit.0 = Some(raycast(ray, map_root, frame, &config));
    }
}

/// Renders the tabletop configuration window.
pub fn tabletop_panel_ui(
    mut contexts: EguiContexts,
    mut config: ResMut<TabletopConfig>,
    hit: Res<CursorHit>,
) {
    egui::Window::new("Tabletop")
        .resizable(false)
        .default_width(260.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 8.0;

            ui.label("Center:");
            ui.horizontal(|ui| {
                ui.label("lon");
                ui.add(
                    egui::DragValue::new(&mut config.center.longitude)
                        .speed(0.001)
                        .range(-180.0..=180.0),
                );
                ui.label("lat");
                ui.add(
                    egui::DragValue::new(&mut config.center.latitude)
                        .speed(0.001)
                        .range(-90.0..=90.0),
                );
            });

            ui.separator();

            ui.label("Shape:");
            ui.horizontal(|ui| {
                for (shape, label) in [
                    (ExtentShape::Circle, "Circle"),
                    (ExtentShape::Square, "Square"),
                    (ExtentShape::Rectangle, "Rectangle"),
                ] {
                    if ui.selectable_label(config.shape == shape, label).clicked() {
                        config.shape = shape;
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Width (m)");
                ui.add(
                    egui::DragValue::new(&mut config.width)
                        .speed(50.0)
                        .range(1.0..=100_000.0),
                );
            });
            ui.add_enabled_ui(config.shape == ExtentShape::Rectangle, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Height (m)");
                    ui.add(
                        egui::DragValue::new(&mut config.height)
                            .speed(50.0)
                            .range(1.0..=100_000.0),
                    );
                });
            });

            ui.separator();

            ui.checkbox(&mut config.automatic_elevation, "Automatic elevation");
            ui.add_enabled_ui(!config.automatic_elevation, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Elevation offset (m)");
                    ui.add(egui::DragValue::new(&mut config.elevation_offset).speed(10.0));
                });
            });

            ui.separator();

            ui.label("Presets:");
            ui.horizontal(|ui| {
                if ui.button("Tel Aviv").clicked() {
                    config.center = GeoPoint::wgs84(34.7818, 32.0853, 0.0);
                }
                if ui.button("Grand Canyon").clicked() {
                    config.center = GeoPoint::wgs84(-112.1129, 36.1069, 0.0);
                }
            });

            ui.separator();

            match hit.0 {
                Some(cursor) if cursor.point.is_finite() => {
                    let tag = if cursor.inside { "inside" } else { "outside" };
                    ui.monospace(format!(
                        "cursor: {} ({:.3}, {:.3}, {:.3})",
                        tag, cursor.point.x, cursor.point.y, cursor.point.z
                    ));
                }
                _ => {
                    ui.monospace("cursor: off table");
                }
            }
        });
}
