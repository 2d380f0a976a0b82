//! Extent footprint: the geographic area the map renders, as a center plus a
//! closed set of shapes with per-shape dimension, camera-radius, and
//! containment math.

use bevy::math::{DVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Footprint shape of the rendered extent.
///
/// Deliberately a closed variant set: every piece of shape-dependent math
/// lives in a method on this enum rather than behind an open trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtentShape {
    Circle,
    #[default]
    Square,
    Rectangle,
}

impl ExtentShape {
    /// The (width, height) dimension pair in meters. Only `Rectangle` has an
    /// independent height; the other shapes repeat the width.
    pub fn dimensions(self, width: f64, height: f64) -> DVec2 {
        match self {
            ExtentShape::Rectangle => DVec2::new(width, height),
            _ => DVec2::new(width, width),
        }
    }

    /// Camera distance above the extent center that keeps the furthest point
    /// of the footprint in view. For square and rectangle this is the
    /// half-diagonal to a corner.
    ///
    /// Precondition: `width > 0` (and `height > 0` for `Rectangle`). A zero
    /// dimension yields radius 0 and an infinite miniature scale downstream;
    /// not guarded here.
    pub fn camera_radius(self, width: f64, height: f64) -> f64 {
        match self {
            ExtentShape::Circle => width,
            ExtentShape::Square => width / 2.0 * std::f64::consts::SQRT_2,
            ExtentShape::Rectangle => ((width / 2.0).powi(2) + (height / 2.0).powi(2)).sqrt(),
        }
    }

    /// Whether a map-local point lies inside the footprint.
    ///
    /// The circle test compares the full distance from the local origin
    /// against `width` (inclusive); the box tests compare per-axis against the
    /// half-dimensions (exclusive). The asymmetry is intentional and matches
    /// the extent semantics of the map surface.
    pub fn contains_local(self, point: Vec3, width: f64, height: f64) -> bool {
        match self {
            ExtentShape::Circle => point.distance(Vec3::ZERO) <= width as f32,
            ExtentShape::Square => {
                let half = (width / 2.0) as f32;
                point.x.abs() < half && point.z.abs() < half
            }
            ExtentShape::Rectangle => {
                point.x.abs() < (width / 2.0) as f32 && point.z.abs() < (height / 2.0) as f32
            }
        }
    }

    /// Footprint test used by the mesh scan, expressed in a mesh's local frame
    /// where `offset` is the mesh translation divided by its scale and `half`
    /// is the half-size of the table in the same frame.
    pub fn scan_contains(self, vertex: Vec3, offset: Vec3, half: f32) -> bool {
        match self {
            ExtentShape::Circle => {
                Vec2::new(vertex.x, vertex.z).distance(Vec2::new(-offset.x, -offset.z)) < half
            }
            _ => (vertex.x + offset.x).abs() < half && (vertex.z + offset.z).abs() < half,
        }
    }
}

/// Geographic footprint descriptor the map surface renders: center, shape,
/// and shape dimensions in meters. Equality is structural; the extent
/// synchronizer relies on that to skip redundant tile rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentDescriptor {
    pub center: GeoPoint,
    pub shape: ExtentShape,
    pub dimensions: DVec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_radius_equals_width() {
        assert!((ExtentShape::Circle.camera_radius(250.0, 999.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_radius_is_half_diagonal() {
        let expected = 10.0 / 2.0 * std::f64::consts::SQRT_2;
        assert!((ExtentShape::Square.camera_radius(10.0, 0.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rectangle_radius_is_corner_distance() {
        // Worked example: 20 x 10 rectangle.
        let radius = ExtentShape::Rectangle.camera_radius(20.0, 10.0);
        assert!((radius - 125.0_f64.sqrt()).abs() < 1e-9);
        assert!((radius - 11.180339887498949).abs() < 1e-9);
    }

    #[test]
    fn test_dimensions_repeat_width_for_non_rectangles() {
        assert_eq!(
            ExtentShape::Circle.dimensions(5.0, 9.0),
            DVec2::new(5.0, 5.0)
        );
        assert_eq!(
            ExtentShape::Square.dimensions(5.0, 9.0),
            DVec2::new(5.0, 5.0)
        );
        assert_eq!(
            ExtentShape::Rectangle.dimensions(5.0, 9.0),
            DVec2::new(5.0, 9.0)
        );
    }

    #[test]
    fn test_circle_containment_is_inclusive_full_width() {
        // Inclusive comparison against the full width, not the half-width.
        assert!(ExtentShape::Circle.contains_local(Vec3::new(10.0, 0.0, 0.0), 10.0, 0.0));
        assert!(!ExtentShape::Circle.contains_local(Vec3::new(10.1, 0.0, 0.0), 10.0, 0.0));
    }

    #[test]
    fn test_box_containment_is_exclusive_half_width() {
        assert!(ExtentShape::Square.contains_local(Vec3::new(4.9, 0.0, -4.9), 10.0, 0.0));
        assert!(!ExtentShape::Square.contains_local(Vec3::new(5.0, 0.0, 0.0), 10.0, 0.0));

        assert!(ExtentShape::Rectangle.contains_local(Vec3::new(9.0, 0.0, 4.0), 20.0, 10.0));
        assert!(!ExtentShape::Rectangle.contains_local(Vec3::new(9.0, 0.0, 5.0), 20.0, 10.0));
    }

    #[test]
    fn test_containment_rejects_infinity_sentinel() {
        for shape in [ExtentShape::Circle, ExtentShape::Square, ExtentShape::Rectangle] {
            assert!(!shape.contains_local(Vec3::INFINITY, 100.0, 100.0));
        }
    }

    #[test]
    fn test_descriptor_structural_equality() {
        let a = ExtentDescriptor {
            center: GeoPoint::wgs84(34.78, 32.08, 0.0),
            shape: ExtentShape::Square,
            dimensions: DVec2::splat(4000.0),
        };
        let b = a;
        assert_eq!(a, b);

        let c = ExtentDescriptor {
            dimensions: DVec2::splat(4001.0),
            ..a
        };
        assert_ne!(a, c);
    }
}
