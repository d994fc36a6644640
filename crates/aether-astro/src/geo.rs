//! Geographic points in degrees.

use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees.
///
/// Serializes as a plain `[lon, lat]` array, the GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Same point with longitude wrapped into [-180, 180).
    pub fn normalized(self) -> Self {
        Self::new(normalize_longitude(self.lon_deg), self.lat_deg)
    }

    /// The diametrically opposite point on the globe.
    pub fn antipode(self) -> Self {
        Self::new(normalize_longitude(self.lon_deg + 180.0), -self.lat_deg)
    }

    /// `[lat, lng]` order, as map overlay primitives expect.
    pub fn lat_lng(self) -> [f64; 2] {
        [self.lat_deg, self.lon_deg]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon_deg, p.lat_deg]
    }
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-540.0), -180.0);
        assert!((normalize_longitude(725.5) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_antipode() {
        let p = GeoPoint::new(30.0, 45.0).antipode();
        assert_eq!(p, GeoPoint::new(-150.0, -45.0));
    }

    #[test]
    fn test_serializes_as_lon_lat_array() {
        let json = serde_json::to_string(&GeoPoint::new(-122.5, 37.75)).unwrap();
        assert_eq!(json, "[-122.5,37.75]");
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lat_lng(), [37.75, -122.5]);
    }
}
