//! Geographic value types shared by the map surface and the tabletop controller.

use serde::{Deserialize, Serialize};

/// Well-known ID of a spatial reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference(pub i32);

impl SpatialReference {
    /// WGS 84 geographic coordinates (EPSG:4326).
    pub const WGS84: SpatialReference = SpatialReference(4326);
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::WGS84
    }
}

/// A geographic position: longitude/latitude in degrees, altitude in meters.
///
/// Immutable value type; equality is structural over all four fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub spatial_reference: SpatialReference,
}

impl GeoPoint {
    pub fn new(
        longitude: f64,
        latitude: f64,
        altitude: f64,
        spatial_reference: SpatialReference,
    ) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
            spatial_reference,
        }
    }

    /// Shorthand for a WGS 84 point.
    pub fn wgs84(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self::new(longitude, latitude, altitude, SpatialReference::WGS84)
    }
}
