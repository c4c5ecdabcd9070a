//! Widget configuration, loadable from a JSON file.

use serde::{Deserialize, Serialize};

use crate::engine::AreaUnit;
use crate::error::MapError;
use crate::geometry::LonLat;
use crate::sketch::SketchOptions;
use crate::styles::{FillSymbol, MarkerSymbol};

pub const DEFAULT_LONGITUDE: f64 = -112.20290843602699;
pub const DEFAULT_LATITUDE: f64 = 36.50550844957497;
pub const DEFAULT_ZOOM: u8 = 7;
pub const DEFAULT_BASEMAP: &str = "topo-vector";

/// Settings for the map host. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view center and marker position.
    pub center: LonLat,
    pub zoom: u8,
    pub basemap: String,
    pub marker: MarkerSymbol,
    pub sketch_fill: FillSymbol,
    pub sketch: SketchOptions,
    /// Unit used when presenting areas.
    pub area_unit: AreaUnit,
    /// Decimal places kept from a clicked coordinate.
    pub click_precision: u32,
    /// Radius in screen pixels within which a click hits a marker.
    pub hit_tolerance_px: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LonLat::new(DEFAULT_LONGITUDE, DEFAULT_LATITUDE),
            zoom: DEFAULT_ZOOM,
            basemap: DEFAULT_BASEMAP.to_string(),
            marker: MarkerSymbol::default(),
            sketch_fill: FillSymbol::default(),
            sketch: SketchOptions::default(),
            area_unit: AreaUnit::Acres,
            click_precision: 3,
            hit_tolerance_px: 6.0,
        }
    }
}

pub fn read_config_json(path: &str) -> Result<MapConfig, MapError> {
    let contents = crate::io::read_to_string(path)?;
    let config: MapConfig = serde_json::from_str(&contents)?;
    Ok(config)
}

pub fn write_config_json(path: &str, config: &MapConfig) -> Result<(), MapError> {
    let json = serde_json::to_string_pretty(config)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}
