//! Elevation controller: fixed vertical offset, or animated tracking of the
//! lowest scanned mesh vertex.
//!
//! The automatic mode runs a cooperative incremental animation: one fixed-size
//! nudge of the rig per tick until the target level is within a step. Starting
//! a new animation cancels any in-flight one first (never two active), and
//! both the completed and the canceled path owe a final HP-root refresh to
//! account for scale drift.

use bevy::prelude::*;

use geomap::{HpRootRefreshRequested, TileMesh};

use crate::config::{TabletopConfig, TabletopFrame, TabletopRig};
use crate::mesh_scan;

/// Vertical nudge applied per tick while animating, in rig-local units.
pub const ELEVATION_STEP: f32 = 0.007;

/// Requests consumed by the elevation controller.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationUpdateRequested {
    /// Re-evaluate the elevation mode: scan and animate when automatic,
    /// otherwise snap to the fixed offset and refresh the HP root.
    Reposition,
    /// Recompute only the fixed offset; no-op in automatic mode, no refresh.
    FixedOnly,
}

/// An in-flight elevation animation. The generation distinguishes a restarted
/// animation from the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevationAnimation {
    pub generation: u64,
}

/// Owns the animation state: the current target level and at most one active
/// animation.
#[derive(Resource, Debug, Default)]
pub struct ElevationAnimator {
    /// Rig-local height the animation converges toward.
    pub target_level: f32,
    active: Option<ElevationAnimation>,
    generations: u64,
}

impl ElevationAnimator {
    /// Cancel any in-flight animation and start a new one toward
    /// `target_level`. Returns true when a previous animation was canceled,
    /// in which case its completion refresh still has to be fired.
    pub fn restart(&mut self, target_level: f32) -> bool {
        let canceled = self.active.take().is_some();
        self.generations += 1;
        self.target_level = target_level;
        self.active = Some(ElevationAnimation {
            generation: self.generations,
        });
        canceled
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_generation(&self) -> Option<u64> {
        self.active.map(|a| a.generation)
    }

    fn finish(&mut self) {
        self.active = None;
    }
}

/// System: handle reposition/fixed-offset requests.
#[allow(clippy::too_many_arguments)]
pub fn update_elevation(
    mut requests: EventReader<ElevationUpdateRequested>,
    config: Res<TabletopConfig>,
    mut animator: ResMut<ElevationAnimator>,
    mut rigs: Query<(&mut Transform, &GlobalTransform, &Parent), With<TabletopRig>>,
    frames: Query<&Transform, (With<TabletopFrame>, Without<TabletopRig>)>,
    tiles: Query<(&Mesh3d, &GlobalTransform), With<TileMesh>>,
    meshes: Res<Assets<Mesh>>,
    mut refresh: EventWriter<HpRootRefreshRequested>,
) {
    let mut reposition = false;
    let mut fixed_only = false;
    for request in requests.read() {
        match request {
            ElevationUpdateRequested::Reposition => reposition = true,
            ElevationUpdateRequested::FixedOnly => fixed_only = true,
        }
    }
    if !reposition && !fixed_only {
        return;
    }

    let Ok((mut transform, global, parent)) = rigs.get_single_mut() else {
        return;
    };

    if reposition {
        if config.automatic_elevation {
            let frame_scale = frames.get(parent.get()).map(|t| t.scale.x).unwrap_or(1.0);
            let target = mesh_scan::lowest_vertex_world_y(
                &meshes,
                tiles.iter(),
                frame_scale,
                config.shape,
            )
            .map(|lowest| global.translation().y - lowest)
            // No candidate vertices: keep the previous target.
            .unwrap_or(animator.target_level);

            if animator.restart(target) {
                // The canceled run still owes its completion refresh.
                refresh.send(HpRootRefreshRequested);
            }
        } else {
            apply_fixed_offset(&mut transform, config.elevation_offset);
            refresh.send(HpRootRefreshRequested);
        }
    }

    if fixed_only && !config.automatic_elevation {
        apply_fixed_offset(&mut transform, config.elevation_offset);
    }
}

/// System: advance the active animation by one nudge per tick.
pub fn step_elevation_animation(
    mut animator: ResMut<ElevationAnimator>,
    mut rigs: Query<&mut Transform, With<TabletopRig>>,
    mut refresh: EventWriter<HpRootRefreshRequested>,
) {
    if !animator.is_animating() {
        return;
    }
    let Ok(mut transform) = rigs.get_single_mut() else {
        return;
    };

    let y = transform.translation.y;
    let target = animator.target_level;
    if (y - target).abs() > ELEVATION_STEP {
        transform.translation.y = y + if y < target {
            ELEVATION_STEP
        } else {
            -ELEVATION_STEP
        };
    } else {
        animator.finish();
        // Converged: force an HP-root refresh to account for scale changes.
        refresh.send(HpRootRefreshRequested);
    }
}

/// Fixed mode: rig-local height is the configured offset scaled into the
/// miniature's frame.
fn apply_fixed_offset(transform: &mut Transform, elevation_offset: f64) {
    transform.translation.y = (elevation_offset * transform.scale.x as f64) as f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_replaces_active_animation() {
        let mut animator = ElevationAnimator::default();
        assert!(!animator.restart(1.0));
        let first = animator.current_generation().unwrap();

        // Second start cancels the first before the second begins.
        assert!(animator.restart(2.0));
        let second = animator.current_generation().unwrap();
        assert_ne!(first, second);
        assert!(animator.is_animating());
        assert!((animator.target_level - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_finish_clears_active() {
        let mut animator = ElevationAnimator::default();
        animator.restart(0.5);
        animator.finish();
        assert!(!animator.is_animating());
        // Target survives completion; a later empty scan reuses it.
        assert!((animator.target_level - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fixed_offset_scales_with_rig() {
        let mut transform = Transform::from_scale(Vec3::splat(0.05));
        apply_fixed_offset(&mut transform, 10.0);
        assert!((transform.translation.y - 0.5).abs() < 1e-6);
    }
}
