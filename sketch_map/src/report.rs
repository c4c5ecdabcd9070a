//! Extent and area reporting for a finished sketch.

use serde::{Deserialize, Serialize};

use crate::engine::{AreaUnit, GeometryEngine};
use crate::error::MapError;
use crate::geometry::{Extent, SketchGeometry};

/// Geographic extent and geodesic area of a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchResult {
    pub extent: Extent,
    pub area_acres: f64,
}

impl SketchResult {
    /// Area converted into `unit`.
    pub fn area_in(&self, unit: AreaUnit) -> f64 {
        AreaUnit::Acres.convert(self.area_acres, unit)
    }
}

/// Reports the geographic extent and acreage of `geometry`.
///
/// A negative area (a ring wound the wrong way or crossing itself) is
/// retried once on the simplified shape. When simplification yields nothing
/// the negative value is returned unchanged.
pub fn report<E>(engine: &E, geometry: &SketchGeometry) -> Result<SketchResult, MapError>
where
    E: GeometryEngine + ?Sized,
{
    let extent = engine.to_geographic(&geometry.extent())?;
    let mut area_acres = engine.geodesic_area(geometry, AreaUnit::Acres);
    if area_acres < 0.0 {
        match engine.simplify(geometry) {
            Some(simplified) => {
                let tool = geometry.tool();
                log::debug!("negative area {area_acres:.3}, simplified {tool}");
                area_acres = engine.geodesic_area(&simplified, AreaUnit::Acres);
            }
            None => log::warn!("negative area {area_acres:.3} could not be simplified"),
        }
    }
    log::info!("{} {} acres", extent, area_acres.round());
    Ok(SketchResult { extent, area_acres })
}
