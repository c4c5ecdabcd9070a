//! Point types for geographic positions and projected map coordinates.

use crate::crs::{geographic_to_web_mercator, web_mercator_to_geographic};

/// A geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns this position with both ordinates rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self::new(
            round_to(self.longitude, decimals),
            round_to(self.latitude, decimals),
        )
    }

    /// Projects this position into Web Mercator.
    pub fn to_map_point(&self) -> MapPoint {
        geographic_to_web_mercator(*self)
    }
}

/// A projected coordinate in Web Mercator (EPSG:3857) meters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unprojects this coordinate, or `None` if it is not finite.
    pub fn to_lon_lat(&self) -> Option<LonLat> {
        web_mercator_to_geographic(*self)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<LonLat> for MapPoint {
    fn from(value: LonLat) -> Self {
        value.to_map_point()
    }
}

impl From<MapPoint> for geo_types::Coord<f64> {
    fn from(value: MapPoint) -> Self {
        geo_types::Coord {
            x: value.x,
            y: value.y,
        }
    }
}

/// Rounds `value` to `decimals` places. Ties round toward positive infinity.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// Calculates the planar distance between two projected points.
pub fn distance(a: MapPoint, b: MapPoint) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}
