//! Core library for the map sketching widget.
//!
//! A [`MapHost`] binds a map view to a graphics layer, a sketch toolbar and a
//! click-to-locate handler, and reports the geographic extent and geodesic
//! area of whatever the user sketches.

pub mod config;
pub mod crs;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod host;
pub mod io;
pub mod report;
pub mod sketch;
pub mod styles;
pub mod view;

pub use config::MapConfig;
pub use engine::{AreaUnit, GeoEngine, GeometryEngine};
pub use error::MapError;
pub use geometry::{Extent, LonLat, MapPoint, SketchGeometry};
pub use host::{MapData, MapHost, SketchPhase};
pub use report::{report, SketchResult};
pub use sketch::{SketchEvent, SketchSession, SketchState, SketchTool};
pub use view::{HeadlessView, MapView, ViewState};
