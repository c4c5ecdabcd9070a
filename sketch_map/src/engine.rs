//! Geometry capabilities consumed by the extent reporter.
//!
//! [`GeometryEngine`] is the seam between the widget and whatever geospatial
//! library supplies projection, geodesic area and polygon repair.
//! [`GeoEngine`] implements it with the `geo` crate.

use std::fmt;
use std::str::FromStr;

use geo::orient::{Direction, Orient};
use geo::{Area, BooleanOps, GeodesicArea, MapCoords};
use geo_types::{Coord, MultiPolygon};
use serde::{Deserialize, Serialize};

use crate::crs::{web_mercator_to_geographic, Crs};
use crate::error::MapError;
use crate::geometry::{Extent, MapPoint, SketchGeometry};

const SQUARE_METERS_PER_ACRE: f64 = 4_046.856_422_4;
const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
const SQUARE_METERS_PER_SQUARE_KILOMETER: f64 = 1_000_000.0;
const SQUARE_METERS_PER_SQUARE_MILE: f64 = 2_589_988.110_336;
const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.092_903_04;

/// Units an area can be reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaUnit {
    #[default]
    Acres,
    Hectares,
    SquareMeters,
    SquareKilometers,
    SquareMiles,
    SquareFeet,
}

impl AreaUnit {
    fn square_meters(self) -> f64 {
        match self {
            AreaUnit::Acres => SQUARE_METERS_PER_ACRE,
            AreaUnit::Hectares => SQUARE_METERS_PER_HECTARE,
            AreaUnit::SquareMeters => 1.0,
            AreaUnit::SquareKilometers => SQUARE_METERS_PER_SQUARE_KILOMETER,
            AreaUnit::SquareMiles => SQUARE_METERS_PER_SQUARE_MILE,
            AreaUnit::SquareFeet => SQUARE_METERS_PER_SQUARE_FOOT,
        }
    }

    /// Converts an area in square meters into this unit.
    pub fn square_meters_to(self, area: f64) -> f64 {
        area / self.square_meters()
    }

    /// Converts `area` expressed in this unit into `target`.
    pub fn convert(self, area: f64, target: AreaUnit) -> f64 {
        target.square_meters_to(area * self.square_meters())
    }

    pub fn label(&self) -> &'static str {
        match self {
            AreaUnit::Acres => "acres",
            AreaUnit::Hectares => "hectares",
            AreaUnit::SquareMeters => "square-meters",
            AreaUnit::SquareKilometers => "square-kilometers",
            AreaUnit::SquareMiles => "square-miles",
            AreaUnit::SquareFeet => "square-feet",
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AreaUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "acres" | "acre" => Ok(AreaUnit::Acres),
            "hectares" | "hectare" | "ha" => Ok(AreaUnit::Hectares),
            "square-meters" | "m2" => Ok(AreaUnit::SquareMeters),
            "square-kilometers" | "km2" => Ok(AreaUnit::SquareKilometers),
            "square-miles" | "mi2" => Ok(AreaUnit::SquareMiles),
            "square-feet" | "ft2" => Ok(AreaUnit::SquareFeet),
            other => Err(format!("unknown area unit '{other}'")),
        }
    }
}

/// Projection, measurement and repair operations on sketched shapes.
pub trait GeometryEngine {
    /// Reprojects a Web Mercator extent into geographic coordinates.
    fn to_geographic(&self, extent: &Extent) -> Result<Extent, MapError>;

    /// Signed geodesic area of `geometry` in `unit`.
    ///
    /// Rings wound against the engine's convention yield a negative value.
    fn geodesic_area(&self, geometry: &SketchGeometry, unit: AreaUnit) -> f64;

    /// Repairs self-intersections and ring orientation.
    ///
    /// Returns `None` when nothing usable remains.
    fn simplify(&self, geometry: &SketchGeometry) -> Option<SketchGeometry>;
}

/// [`GeometryEngine`] backed by the `geo` crate.
///
/// Exterior rings are expected counter-clockwise, so a clockwise sketch
/// reports a negative area until it has been simplified.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoEngine;

impl GeometryEngine for GeoEngine {
    fn to_geographic(&self, extent: &Extent) -> Result<Extent, MapError> {
        let source = Crs::from_epsg(extent.spatial_reference.wkid);
        let target = Crs::wgs84();
        source.ensure_transform(&target)?;
        source
            .transform_extent(&target, extent)
            .ok_or(MapError::Projection {
                x: extent.xmin,
                y: extent.ymin,
            })
    }

    fn geodesic_area(&self, geometry: &SketchGeometry, unit: AreaUnit) -> f64 {
        let geographic: MultiPolygon<f64> = geometry.shape().map_coords(|c| {
            match web_mercator_to_geographic(MapPoint::new(c.x, c.y)) {
                Some(ll) => Coord {
                    x: ll.longitude,
                    y: ll.latitude,
                },
                None => Coord {
                    x: f64::NAN,
                    y: f64::NAN,
                },
            }
        });
        unit.square_meters_to(geographic.geodesic_area_signed())
    }

    fn simplify(&self, geometry: &SketchGeometry) -> Option<SketchGeometry> {
        let repaired = geometry
            .shape()
            .union(&MultiPolygon::<f64>::new(Vec::new()));
        if repaired.0.is_empty() || repaired.unsigned_area() == 0.0 {
            return None;
        }
        SketchGeometry::from_shape(geometry.tool(), repaired.orient(Direction::Default)).ok()
    }
}
