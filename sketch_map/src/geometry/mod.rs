//! Geometry primitives for sketched shapes.
//!
//! Sketches are stored in Web Mercator, the coordinate system the map view
//! reports pointer positions in. Every sketch tool produces polygon rings;
//! rectangles and circles are densified when they are created.

pub mod extent;
pub mod point;

pub use extent::{Extent, SpatialReference};
pub use point::{distance, round_to, LonLat, MapPoint};

use geo::{Area, Contains, Translate};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::MapError;
use crate::sketch::SketchTool;

/// Number of vertices used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 60;

/// A polygonal shape drawn with one of the sketch tools.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchGeometry {
    tool: SketchTool,
    shape: MultiPolygon<f64>,
}

impl SketchGeometry {
    /// Creates a polygon from vertices in drawing order.
    ///
    /// Consecutive duplicates and an explicit closing vertex are dropped. The
    /// ring is kept in the order it was drawn, so clockwise input stays
    /// clockwise.
    pub fn polygon(vertices: &[MapPoint]) -> Result<Self, MapError> {
        let ring = ring_from(vertices)?;
        Ok(Self {
            tool: SketchTool::Polygon,
            shape: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
        })
    }

    /// Creates a rectangle from two opposite corners.
    pub fn rectangle(a: MapPoint, b: MapPoint) -> Result<Self, MapError> {
        let ext = Extent::new(a.x, a.y, b.x, b.y, SpatialReference::WEB_MERCATOR);
        if ext.width() <= 0.0 || ext.height() <= 0.0 {
            return Err(MapError::EmptyGeometry);
        }
        let corners = [
            MapPoint::new(ext.xmin, ext.ymin),
            MapPoint::new(ext.xmax, ext.ymin),
            MapPoint::new(ext.xmax, ext.ymax),
            MapPoint::new(ext.xmin, ext.ymax),
        ];
        let ring = ring_from(&corners)?;
        Ok(Self {
            tool: SketchTool::Rectangle,
            shape: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
        })
    }

    /// Creates a circle of `radius` map units around `center`.
    pub fn circle(center: MapPoint, radius: f64) -> Result<Self, MapError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MapError::EmptyGeometry);
        }
        let step = std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
        let vertices: Vec<MapPoint> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let (sin, cos) = (step * i as f64).sin_cos();
                MapPoint::new(center.x + radius * cos, center.y + radius * sin)
            })
            .collect();
        let ring = ring_from(&vertices)?;
        Ok(Self {
            tool: SketchTool::Circle,
            shape: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
        })
    }

    /// Wraps an existing shape, e.g. one returned by polygon repair.
    pub fn from_shape(tool: SketchTool, shape: MultiPolygon<f64>) -> Result<Self, MapError> {
        if shape.0.is_empty() {
            return Err(MapError::EmptyGeometry);
        }
        let geometry = Self { tool, shape };
        if let Some(bad) = geometry.vertices().find(|p| !p.is_finite()) {
            return Err(MapError::Projection { x: bad.x, y: bad.y });
        }
        Ok(geometry)
    }

    /// Tool the shape was drawn with.
    pub fn tool(&self) -> SketchTool {
        self.tool
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Iterates over every ring vertex, exterior rings first.
    pub fn vertices(&self) -> impl Iterator<Item = MapPoint> + '_ {
        self.shape.0.iter().flat_map(|poly| {
            std::iter::once(poly.exterior())
                .chain(poly.interiors().iter())
                .flat_map(|ring| ring.coords().map(|c| MapPoint::new(c.x, c.y)))
        })
    }

    /// Web Mercator bounding box of the shape.
    pub fn extent(&self) -> Extent {
        // constructors reject empty shapes
        let empty = Extent::new(0.0, 0.0, 0.0, 0.0, SpatialReference::WEB_MERCATOR);
        Extent::from_points(self.vertices()).unwrap_or(empty)
    }

    /// Signed planar area in square map units; negative for clockwise rings.
    pub fn planar_area(&self) -> f64 {
        self.shape.signed_area()
    }

    pub fn contains(&self, point: MapPoint) -> bool {
        self.shape.contains(&geo_types::Point::new(point.x, point.y))
    }

    /// Returns a copy moved by `(dx, dy)` map units.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            tool: self.tool,
            shape: self.shape.translate(dx, dy),
        }
    }
}

fn ring_from(vertices: &[MapPoint]) -> Result<LineString<f64>, MapError> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(vertices.len() + 1);
    for v in vertices {
        if !v.is_finite() {
            return Err(MapError::Projection { x: v.x, y: v.y });
        }
        let c: Coord<f64> = (*v).into();
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return Err(MapError::EmptyGeometry);
    }
    coords.push(coords[0]);
    Ok(LineString::new(coords))
}
