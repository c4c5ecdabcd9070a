use std::cell::Cell;

use sketch_map::{
    engine::{AreaUnit, GeoEngine, GeometryEngine},
    geometry::{Extent, LonLat, MapPoint, SketchGeometry, SpatialReference},
    report, MapError, SketchTool,
};

/// Engine with scripted areas: polygons measure `raw`, anything else
/// (the simplified shape) measures `simplified`.
struct ScriptedEngine {
    raw: f64,
    simplified: Option<f64>,
    simplify_calls: Cell<usize>,
}

impl ScriptedEngine {
    fn new(raw: f64, simplified: Option<f64>) -> Self {
        Self {
            raw,
            simplified,
            simplify_calls: Cell::new(0),
        }
    }
}

impl GeometryEngine for ScriptedEngine {
    fn to_geographic(&self, extent: &Extent) -> Result<Extent, MapError> {
        Ok(Extent {
            spatial_reference: SpatialReference::WGS84,
            ..*extent
        })
    }

    fn geodesic_area(&self, geometry: &SketchGeometry, _unit: AreaUnit) -> f64 {
        match geometry.tool() {
            SketchTool::Polygon => self.raw,
            _ => self.simplified.unwrap_or(f64::NAN),
        }
    }

    fn simplify(&self, _geometry: &SketchGeometry) -> Option<SketchGeometry> {
        self.simplify_calls.set(self.simplify_calls.get() + 1);
        self.simplified?;
        SketchGeometry::rectangle(MapPoint::new(0.0, 0.0), MapPoint::new(1.0, 1.0)).ok()
    }
}

fn bowtie() -> SketchGeometry {
    SketchGeometry::polygon(&[
        MapPoint::new(0.0, 0.0),
        MapPoint::new(1000.0, 1000.0),
        MapPoint::new(1000.0, 0.0),
        MapPoint::new(0.0, 1000.0),
    ])
    .unwrap()
}

fn square_near(center: LonLat, side: f64, clockwise: bool) -> SketchGeometry {
    let c = center.to_map_point();
    let h = side / 2.0;
    let mut pts = vec![
        MapPoint::new(c.x - h, c.y - h),
        MapPoint::new(c.x + h, c.y - h),
        MapPoint::new(c.x + h, c.y + h),
        MapPoint::new(c.x - h, c.y + h),
    ];
    if clockwise {
        pts.reverse();
    }
    SketchGeometry::polygon(&pts).unwrap()
}

fn polygon_near(center: LonLat, offsets: &[(f64, f64)]) -> SketchGeometry {
    let c = center.to_map_point();
    let pts: Vec<MapPoint> = offsets
        .iter()
        .map(|&(dx, dy)| MapPoint::new(c.x + dx, c.y + dy))
        .collect();
    SketchGeometry::polygon(&pts).unwrap()
}

#[test]
fn positive_area_skips_simplification() {
    let engine = ScriptedEngine::new(12.5, Some(99.0));
    let result = report(&engine, &bowtie()).unwrap();
    assert_eq!(result.area_acres, 12.5);
    assert_eq!(engine.simplify_calls.get(), 0);
}

#[test]
fn negative_area_uses_simplified_shape() {
    let engine = ScriptedEngine::new(-3.0, Some(7.25));
    let result = report(&engine, &bowtie()).unwrap();
    assert_eq!(result.area_acres, 7.25);
    assert_eq!(engine.simplify_calls.get(), 1);
}

#[test]
fn failed_simplification_keeps_negative_area() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = ScriptedEngine::new(-3.0, None);
    let result = report(&engine, &bowtie()).unwrap();
    assert_eq!(result.area_acres, -3.0);
    assert_eq!(engine.simplify_calls.get(), 1);
}

#[test]
fn extent_is_reported_in_geographic_coordinates() {
    let center = LonLat::new(-112.20290843602699, 36.50550844957497);
    let result = report(&GeoEngine, &square_near(center, 2000.0, false)).unwrap();
    let ext = result.extent;
    assert_eq!(ext.spatial_reference.wkid, 4326);
    assert!(ext.xmin < center.longitude && center.longitude < ext.xmax);
    assert!(ext.ymin < center.latitude && center.latitude < ext.ymax);
}

#[test]
fn simple_polygons_have_non_negative_area_in_either_winding() {
    let center = LonLat::new(-112.20290843602699, 36.50550844957497);
    let ccw = report(&GeoEngine, &square_near(center, 1000.0, false)).unwrap();
    let cw = report(&GeoEngine, &square_near(center, 1000.0, true)).unwrap();
    assert!(ccw.area_acres > 0.0);
    assert!(cw.area_acres > 0.0);
    let drift = (ccw.area_acres - cw.area_acres).abs();
    assert!(drift / ccw.area_acres < 1e-6);
}

#[test]
fn mercator_square_area_matches_scale_factor() {
    // A projected square shrinks by cos(lat) per side on the ground.
    let center = LonLat::new(-112.20290843602699, 36.50550844957497);
    let result = report(&GeoEngine, &square_near(center, 1000.0, false)).unwrap();
    let k = center.latitude.to_radians().cos();
    let expected_acres = AreaUnit::Acres.square_meters_to(1_000_000.0 * k * k);
    let drift = (result.area_acres - expected_acres).abs();
    assert!(drift / expected_acres < 0.01);
}

#[test]
fn rectangle_and_circle_report_positive_areas() {
    let c = LonLat::new(-100.0, 40.0).to_map_point();
    let corner = MapPoint::new(c.x + 5000.0, c.y + 3000.0);
    let rect = SketchGeometry::rectangle(c, corner).unwrap();
    let circle = SketchGeometry::circle(c, 2500.0).unwrap();
    assert!(report(&GeoEngine, &rect).unwrap().area_acres > 0.0);
    assert!(report(&GeoEngine, &circle).unwrap().area_acres > 0.0);
}

#[test]
fn crossed_polygon_reports_area_of_both_lobes() {
    let center = LonLat::new(-112.2, 36.5);
    // Edges cross at the center, leaving a small counter-clockwise lobe on
    // the left and a large clockwise one on the right.
    let crossed = polygon_near(
        center,
        &[
            (-1000.0, -1000.0),
            (3000.0, 3000.0),
            (3000.0, -3000.0),
            (-1000.0, 1000.0),
        ],
    );
    let raw = GeoEngine.geodesic_area(&crossed, AreaUnit::Acres);
    assert!(raw < 0.0);
    assert!(GeoEngine.simplify(&crossed).is_some());

    let small = polygon_near(
        center,
        &[(-1000.0, -1000.0), (0.0, 0.0), (-1000.0, 1000.0)],
    );
    let large = polygon_near(
        center,
        &[(0.0, 0.0), (3000.0, -3000.0), (3000.0, 3000.0)],
    );
    let small = report(&GeoEngine, &small).unwrap().area_acres;
    let large = report(&GeoEngine, &large).unwrap().area_acres;
    assert!(small > 0.0 && large > small);

    let result = report(&GeoEngine, &crossed).unwrap();
    let expected = small + large;
    assert!((result.area_acres - expected).abs() / expected < 1e-6);
}
