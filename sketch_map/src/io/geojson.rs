use std::io;

use geo::MapCoords;
use geo_types::{Coord, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, Value};

use crate::crs::Crs;
use crate::error::MapError;
use crate::geometry::SketchGeometry;
use crate::report::SketchResult;
use crate::sketch::SketchTool;

/// Parses polygon geometries from GeoJSON text.
///
/// Accepts a bare geometry, a feature or a feature collection. Coordinates
/// are read in `src` and projected into Web Mercator; non-polygon geometries
/// are skipped.
pub fn parse_sketches_geojson(text: &str, src: &Crs) -> Result<Vec<SketchGeometry>, MapError> {
    let geojson: GeoJson = text.parse()?;
    let mut sketches = Vec::new();
    match geojson {
        GeoJson::Geometry(geometry) => collect_geometry(geometry.value, src, &mut sketches)?,
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry {
                collect_geometry(geometry.value, src, &mut sketches)?;
            }
        }
        GeoJson::FeatureCollection(collection) => {
            for feature in collection.features {
                if let Some(geometry) = feature.geometry {
                    collect_geometry(geometry.value, src, &mut sketches)?;
                }
            }
        }
    }
    Ok(sketches)
}

/// Reads polygon geometries from a GeoJSON file.
pub fn read_sketches_geojson(path: &str, src: &Crs) -> io::Result<Vec<SketchGeometry>> {
    let contents = crate::io::read_to_string(path)?;
    parse_sketches_geojson(&contents, src)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn collect_geometry(
    value: Value,
    src: &Crs,
    out: &mut Vec<SketchGeometry>,
) -> Result<(), MapError> {
    let geometry = geo_types::Geometry::<f64>::try_from(value)?;
    collect_geo(geometry, src, out)
}

fn collect_geo(
    geometry: geo_types::Geometry<f64>,
    src: &Crs,
    out: &mut Vec<SketchGeometry>,
) -> Result<(), MapError> {
    match geometry {
        geo_types::Geometry::Polygon(polygon) => {
            out.push(to_sketch(MultiPolygon::new(vec![polygon]), src)?)
        }
        geo_types::Geometry::MultiPolygon(multi) => out.push(to_sketch(multi, src)?),
        geo_types::Geometry::GeometryCollection(collection) => {
            for inner in collection {
                collect_geo(inner, src, out)?;
            }
        }
        _ => log::debug!("skipping non-polygon geometry"),
    }
    Ok(())
}

fn to_sketch(shape: MultiPolygon<f64>, src: &Crs) -> Result<SketchGeometry, MapError> {
    let target = Crs::web_mercator();
    src.ensure_transform(&target)?;
    let projected = shape.try_map_coords(|c| {
        src.transform_point(&target, c.x, c.y)
            .map(|(x, y)| Coord { x, y })
            .ok_or(MapError::Projection { x: c.x, y: c.y })
    })?;
    SketchGeometry::from_shape(SketchTool::Polygon, projected)
}

/// Builds a feature with the result's extent as geometry and the acreage as
/// a property.
pub fn result_feature(result: &SketchResult) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("acres".to_string(), serde_json::json!(result.area_acres));
    properties.insert(
        "wkid".to_string(),
        serde_json::json!(result.extent.spatial_reference.wkid),
    );
    Feature {
        bbox: Some(result.extent.to_bbox()),
        geometry: Some(geojson::Geometry::new(Value::from(
            &result.extent.to_polygon(),
        ))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Writes results as a GeoJSON feature collection.
pub fn write_results_geojson(path: &str, results: &[SketchResult]) -> io::Result<()> {
    let collection = FeatureCollection {
        bbox: None,
        features: results.iter().map(result_feature).collect(),
        foreign_members: None,
    };
    let json = serde_json::to_string_pretty(&collection).map_err(io::Error::other)?;
    crate::io::write_string(path, &json)
}
