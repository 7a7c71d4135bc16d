//! Geospatial primitives shared by the fieldmap crates.
//!
//! This crate provides:
//! - [`Coordinate`] values in (lat, lng) order with optional altitude
//! - Haversine distance calculations
//! - [`BoundingBox`] accumulation with an explicit "no data" sentinel
//! - Arithmetic centroids
//!
//! # Example
//!
//! ```
//! use fieldmap_geo::{haversine_distance, Coordinate};
//!
//! let coord1 = Coordinate::new(52.5200, 13.4050); // Berlin
//! let coord2 = Coordinate::new(48.8566, 2.3522);  // Paris
//!
//! let distance_km = haversine_distance(&coord1, &coord2);
//! assert!((distance_km - 878.0).abs() < 10.0); // ~878 km
//! ```

mod bounds;
mod haversine;

pub use bounds::BoundingBox;
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude, longitude and optional altitude.
///
/// Ranges are not enforced on construction; see [`Coordinate::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lng: f64,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

impl Coordinate {
    /// Creates a new coordinate without altitude.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, alt: None }
    }

    /// Returns the same coordinate carrying an altitude.
    #[inline]
    pub fn with_altitude(mut self, alt: f64) -> Self {
        self.alt = Some(alt);
        self
    }

    /// Returns true if latitude and longitude are inside their valid ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// The `[lng, lat]` pair used by GeoJSON and KML.
    #[inline]
    pub const fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Arithmetic mean of latitudes and longitudes.
///
/// No spherical correction is applied, so the result is only meaningful for
/// sets spanning a small area. Altitude is dropped. Returns `None` for an empty
/// slice.
pub fn centroid(coordinates: &[Coordinate]) -> Option<Coordinate> {
    if coordinates.is_empty() {
        return None;
    }

    let (lat_sum, lng_sum) = coordinates
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));
    let n = coordinates.len() as f64;

    Some(Coordinate::new(lat_sum / n, lng_sum / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(52.5200, 13.4050);
        assert_eq!(coord.lat, 52.5200);
        assert_eq!(coord.lng, 13.4050);
        assert!(coord.alt.is_none());
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (52.5200, 13.4050).into();
        assert_eq!(coord.lat, 52.5200);
        assert_eq!(coord.lng, 13.4050);
    }

    #[test]
    fn test_lng_lat_order() {
        let coord = Coordinate::new(10.0, 20.0).with_altitude(5.0);
        assert_eq!(coord.to_lng_lat(), [20.0, 10.0]);
    }

    #[test]
    fn test_altitude_skipped_when_absent() {
        let json = serde_json::to_string(&Coordinate::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"lat":1.0,"lng":2.0}"#);

        let json = serde_json::to_string(&Coordinate::new(1.0, 2.0).with_altitude(3.0)).unwrap();
        assert!(json.contains(r#""alt":3.0"#));
    }

    #[test]
    fn test_centroid() {
        let coords = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 4.0),
            Coordinate::new(4.0, 2.0),
        ];
        let c = centroid(&coords).unwrap();
        assert!((c.lat - 2.0).abs() < 1e-12);
        assert!((c.lng - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(&[]).is_none());
    }
}
