//! Coordinate reference system utilities.
//!
//! Web Mercator and WGS84 are converted in closed form. Other pairs go
//! through the `proj` crate when the `proj` feature is enabled.

use crate::error::MapError;
use crate::geometry::{Extent, LonLat, MapPoint, SpatialReference};

/// Semi-major axis of the WGS84 ellipsoid used by spherical Web Mercator.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Representation of a coordinate reference system.
///
/// A CRS is stored internally as a definition string which can be an EPSG
/// identifier (`"EPSG:4326"`) or a Proj4 definition. When created from an
/// EPSG code the numeric value is retained so that callers can inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    definition: String,
    epsg: Option<u32>,
}

impl Crs {
    /// Creates a new CRS from the given EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self {
            definition: format!("EPSG:{}", code),
            epsg: Some(code),
        }
    }

    /// Creates a CRS from a Proj4 definition string.
    pub fn from_proj4(definition: &str) -> Self {
        Self {
            definition: definition.to_string(),
            epsg: None,
        }
    }

    /// Returns the EPSG code for this CRS, if available.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Returns the underlying definition string.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// WGS84 geographic coordinates (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// True for EPSG:3857 and its legacy aliases.
    pub fn is_web_mercator(&self) -> bool {
        matches!(self.epsg, Some(3857 | 102100 | 102113 | 900913))
    }

    pub fn is_wgs84(&self) -> bool {
        self.epsg == Some(4326)
    }

    /// Spatial reference tag for extents expressed in this CRS.
    pub fn spatial_reference(&self) -> Option<SpatialReference> {
        if self.is_web_mercator() {
            Some(SpatialReference::WEB_MERCATOR)
        } else {
            self.epsg.map(|wkid| SpatialReference { wkid })
        }
    }

    /// Transforms an `(x, y)` coordinate from this CRS to the target CRS.
    pub fn transform_point(&self, target: &Crs, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.same_as(target) {
            return Some((x, y));
        }
        if self.is_web_mercator() && target.is_wgs84() {
            let ll = web_mercator_to_geographic(MapPoint::new(x, y))?;
            return Some((ll.longitude, ll.latitude));
        }
        if self.is_wgs84() && target.is_web_mercator() {
            let p = geographic_to_web_mercator(LonLat::new(x, y));
            return p.is_finite().then_some((p.x, p.y));
        }
        self.transform_with_proj(target, x, y)
    }

    /// Transforms both corners of `extent` into the target CRS.
    pub fn transform_extent(&self, target: &Crs, extent: &Extent) -> Option<Extent> {
        let (x1, y1) = self.transform_point(target, extent.xmin, extent.ymin)?;
        let (x2, y2) = self.transform_point(target, extent.xmax, extent.ymax)?;
        let sr = target.spatial_reference()?;
        Some(Extent::new(x1, y1, x2, y2, sr))
    }

    /// Fails with [`MapError::UnsupportedCrs`] when no transform from this
    /// CRS into `target` is available in this build.
    pub fn ensure_transform(&self, target: &Crs) -> Result<(), MapError> {
        let closed_form = (self.is_web_mercator() || self.is_wgs84())
            && (target.is_web_mercator() || target.is_wgs84());
        if closed_form || cfg!(feature = "proj") {
            Ok(())
        } else {
            Err(MapError::UnsupportedCrs(self.definition.clone()))
        }
    }

    fn same_as(&self, other: &Crs) -> bool {
        (self.is_web_mercator() && other.is_web_mercator()) || self == other
    }

    #[cfg(feature = "proj")]
    fn transform_with_proj(&self, target: &Crs, x: f64, y: f64) -> Option<(f64, f64)> {
        let proj = proj::Proj::new_known_crs(&self.definition, &target.definition, None).ok()?;
        proj.convert((x, y)).ok()
    }

    #[cfg(not(feature = "proj"))]
    fn transform_with_proj(&self, target: &Crs, _x: f64, _y: f64) -> Option<(f64, f64)> {
        log::debug!(
            "no transform from {} to {} without the proj feature",
            self.definition,
            target.definition
        );
        None
    }
}

/// Unprojects a Web Mercator coordinate into longitude and latitude.
pub fn web_mercator_to_geographic(p: MapPoint) -> Option<LonLat> {
    if !p.is_finite() {
        return None;
    }
    let longitude = (p.x / EARTH_RADIUS).to_degrees();
    let phi = 2.0 * (p.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;
    Some(LonLat::new(longitude, phi.to_degrees()))
}

/// Projects longitude and latitude into Web Mercator.
///
/// Latitudes beyond the Mercator limit are clamped to it.
pub fn geographic_to_web_mercator(ll: LonLat) -> MapPoint {
    let lat = ll
        .latitude
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let x = EARTH_RADIUS * ll.longitude.to_radians();
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    MapPoint::new(x, y)
}
