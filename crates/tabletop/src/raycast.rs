//! Spatial hit-test against the tabletop surface.

use bevy::prelude::*;

use crate::config::TabletopConfig;

/// Result of a tabletop hit-test.
///
/// The point is always populated: `Vec3::INFINITY` when the ray never crossed
/// the reference plane, the plane intersection otherwise — even when it falls
/// outside the footprint. Callers must consult `inside`, not the point, to
/// tell a plane miss from a footprint miss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletopHit {
    /// Whether the intersection lies inside the configured footprint.
    pub inside: bool,
    /// Intersection point in the caller's local space, or the infinity
    /// sentinel on a plane miss.
    pub point: Vec3,
}

/// Cast `ray` against the horizontal plane through the map root's world
/// origin, classify the intersection against the configured footprint, and
/// re-express the point in `caller`'s local space.
pub fn raycast(
    ray: Ray3d,
    map_root: &GlobalTransform,
    caller: &GlobalTransform,
    config: &TabletopConfig,
) -> TabletopHit {
    let local = raycast_relative_to_center(ray, map_root);
    let inside = config
        .shape
        .contains_local(local, config.width, config.height);

    if !local.is_finite() {
        // Plane miss: keep the sentinel rather than pushing infinity through
        // the transforms.
        return TabletopHit {
            inside,
            point: local,
        };
    }

    let world = map_root.transform_point(local);
    let point = caller.affine().inverse().transform_point3(world);
    TabletopHit { inside, point }
}

/// Intersect `ray` with the horizontal plane through the map root's origin
/// and return the hit in map-local space, or `Vec3::INFINITY` when the ray is
/// parallel to the plane or points away from it.
fn raycast_relative_to_center(ray: Ray3d, map_root: &GlobalTransform) -> Vec3 {
    let plane_y = map_root.translation().y;
    let denom = ray.direction.y;
    if denom.abs() > f32::EPSILON {
        let t = (plane_y - ray.origin.y) / denom;
        if t > 0.0 {
            let world = ray.origin + *ray.direction * t;
            return map_root.affine().inverse().transform_point3(world);
        }
    }
    Vec3::INFINITY
}
