//! Error type shared by the map widget core.

use thiserror::Error;

use crate::sketch::SketchTool;

/// Failures surfaced by the map host, the sketch session and the I/O helpers.
///
/// A negative area from the extent reporter is not an error; the
/// unsimplified value is reported instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no map container was supplied")]
    MissingContainer,
    #[error("the map view has already been initialized")]
    AlreadyInitialized,
    #[error("the map view has not been initialized")]
    NotInitialized,
    #[error("sketch tool {0} is not available")]
    ToolUnavailable(SketchTool),
    #[error("no sketch is in progress")]
    NoActiveSketch,
    #[error("geometry has no usable vertices")]
    EmptyGeometry,
    #[error("cannot project coordinate ({x}, {y})")]
    Projection { x: f64, y: f64 },
    #[error("unsupported coordinate reference system {0}")]
    UnsupportedCrs(String),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
