use sketch_map::{
    graphics::{GraphicGeometry, GraphicKind},
    HeadlessView, LonLat, MapConfig, MapHost, MapPoint, SketchEvent, SketchPhase, SketchSession,
    SketchState, SketchTool,
};

fn loaded_host() -> MapHost<HeadlessView> {
    let mut host = MapHost::new(MapConfig::default());
    host.initialize("viewDiv").unwrap();
    host
}

fn draw_rectangle(
    host: &mut MapHost<HeadlessView>,
    session: &mut SketchSession,
    corner: MapPoint,
    size: f64,
) {
    host.on_sketch_event(session.begin(SketchTool::Rectangle, corner).unwrap())
        .unwrap();
    let active = session
        .drag_to(MapPoint::new(corner.x + size, corner.y + size))
        .unwrap();
    assert_eq!(active.state(), SketchState::Active);
    host.on_sketch_event(active).unwrap();
    host.on_sketch_event(session.finish().unwrap()).unwrap();
}

#[test]
fn completed_sketch_replaces_marker_and_reports() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    let corner = LonLat::new(-112.2, 36.5).to_map_point();

    host.on_sketch_event(session.begin(SketchTool::Rectangle, corner).unwrap())
        .unwrap();
    assert_eq!(host.phase(), SketchPhase::Sketching);
    assert!(host.layer().is_empty());
    assert!(host.map_data().acres.is_none());

    session
        .drag_to(MapPoint::new(corner.x + 1000.0, corner.y + 1000.0))
        .unwrap();
    host.on_sketch_event(session.finish().unwrap()).unwrap();

    assert_eq!(host.phase(), SketchPhase::HasResult);
    assert_eq!(host.layer().len(), 1);
    assert_eq!(host.layer().of_kind(GraphicKind::Sketch).count(), 1);

    let data = host.map_data();
    let acres = data.acres.unwrap();
    let k = 36.5f64.to_radians().cos();
    let expected = 1_000_000.0 * k * k / 4046.8564224;
    assert!((acres - expected).abs() / expected < 0.02);

    let extent = data.extent.unwrap();
    assert_eq!(extent.spatial_reference.wkid, 4326);
    assert!((extent.xmin - -112.2).abs() < 1e-9);
    assert!((extent.ymin - 36.5).abs() < 1e-9);
}

#[test]
fn starting_a_new_sketch_clears_previous_result() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    draw_rectangle(
        &mut host,
        &mut session,
        LonLat::new(-100.0, 45.0).to_map_point(),
        500.0,
    );
    assert!(host.map_data().acres.is_some());

    let start = session
        .begin(SketchTool::Polygon, MapPoint::new(0.0, 0.0))
        .unwrap();
    host.on_sketch_event(start).unwrap();
    let data = host.map_data();
    assert!(data.extent.is_none());
    assert!(data.acres.is_none());
    assert!(host.layer().is_empty());
}

#[test]
fn moving_a_sketch_reports_new_extent() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    draw_rectangle(
        &mut host,
        &mut session,
        LonLat::new(-100.0, 45.0).to_map_point(),
        800.0,
    );
    let before = host.map_data();

    let sketch = match &host.layer().of_kind(GraphicKind::Sketch).next().unwrap().geometry {
        GraphicGeometry::Polygon(g) => g.clone(),
        other => panic!("sketch with geometry {other:?}"),
    };
    let [start, complete] = session.move_graphic(&sketch, 5000.0, 0.0);
    host.on_sketch_event(start).unwrap();
    assert_eq!(host.map_data(), before);
    host.on_sketch_event(complete).unwrap();

    let after = host.map_data();
    assert!(after.extent.unwrap().xmin > before.extent.unwrap().xmin);
    let (moved, original) = (after.acres.unwrap(), before.acres.unwrap());
    assert!((moved - original).abs() / original < 1e-6);
    assert_eq!(host.layer().len(), 1);
}

#[test]
fn cancelled_sketch_returns_to_idle() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    let start = session
        .begin(SketchTool::Circle, MapPoint::new(0.0, 0.0))
        .unwrap();
    host.on_sketch_event(start).unwrap();
    host.on_sketch_event(session.cancel().unwrap()).unwrap();
    assert_eq!(host.phase(), SketchPhase::Idle);
    assert!(host.map_data().acres.is_none());
}

#[test]
fn clockwise_polygon_reports_positive_area() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    let o = LonLat::new(-90.0, 30.0).to_map_point();
    host.on_sketch_event(session.begin(SketchTool::Polygon, o).unwrap())
        .unwrap();
    session
        .add_vertex(MapPoint::new(o.x, o.y + 1000.0))
        .unwrap();
    session
        .add_vertex(MapPoint::new(o.x + 1000.0, o.y + 1000.0))
        .unwrap();
    session
        .add_vertex(MapPoint::new(o.x + 1000.0, o.y))
        .unwrap();
    host.on_sketch_event(session.finish().unwrap()).unwrap();
    assert!(host.map_data().acres.unwrap() > 0.0);
}

#[test]
fn update_without_geometries_is_ignored() {
    let mut host = loaded_host();
    host.on_sketch_event(SketchEvent::Update {
        state: SketchState::Complete,
        geometries: Vec::new(),
    })
    .unwrap();
    assert!(host.map_data().acres.is_none());
    assert_eq!(host.layer().len(), 1);
}

#[test]
fn reset_params_clears_result() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    draw_rectangle(
        &mut host,
        &mut session,
        LonLat::new(-100.0, 45.0).to_map_point(),
        500.0,
    );
    host.reset_params();
    assert!(host.map_data().acres.is_none());
    assert!(host.map_data().extent.is_none());
}
