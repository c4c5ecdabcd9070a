//! Axis-aligned extents tagged with their spatial reference.

use serde::{Deserialize, Serialize};

use super::point::MapPoint;

/// Well-known id of a spatial reference, e.g. 4326 or 3857.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };
    pub const WEB_MERCATOR: SpatialReference = SpatialReference { wkid: 3857 };
}

/// Bounding box of a geometry.
///
/// Serializes as `{"xmin":..,"ymin":..,"xmax":..,"ymax":..,"spatialReference":{"wkid":..}}`
/// so the dashboard can consume it directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub spatial_reference: SpatialReference,
}

impl Extent {
    /// Creates an extent, normalizing the corner order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, spatial_reference: SpatialReference) -> Self {
        Self {
            xmin: x1.min(x2),
            ymin: y1.min(y2),
            xmax: x1.max(x2),
            ymax: y1.max(y2),
            spatial_reference,
        }
    }

    /// Builds the Web Mercator extent enclosing `points`, or `None` when empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = MapPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let sr = SpatialReference::WEB_MERCATOR;
        let mut ext = Self::new(first.x, first.y, first.x, first.y, sr);
        for p in iter {
            ext.xmin = ext.xmin.min(p.x);
            ext.ymin = ext.ymin.min(p.y);
            ext.xmax = ext.xmax.max(p.x);
            ext.ymax = ext.ymax.max(p.y);
        }
        Some(ext)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Returns the extent as `[xmin, ymin, xmax, ymax]`.
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Returns the closed counter-clockwise outline of the extent.
    pub fn to_polygon(&self) -> geo_types::Polygon<f64> {
        geo_types::Polygon::new(
            geo_types::LineString::from(vec![
                (self.xmin, self.ymin),
                (self.xmax, self.ymin),
                (self.xmax, self.ymax),
                (self.xmin, self.ymax),
                (self.xmin, self.ymin),
            ]),
            vec![],
        )
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}
