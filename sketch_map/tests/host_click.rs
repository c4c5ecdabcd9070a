use sketch_map::{
    graphics::{GraphicGeometry, GraphicKind},
    HeadlessView, LonLat, MapConfig, MapError, MapHost, MapPoint, MapView, SketchSession,
    SketchTool,
};

fn loaded_host() -> MapHost<HeadlessView> {
    let mut host = MapHost::new(MapConfig::default());
    host.initialize("viewDiv").unwrap();
    host
}

fn marker_position(host: &MapHost<HeadlessView>) -> MapPoint {
    let markers: Vec<_> = host.layer().of_kind(GraphicKind::Marker).collect();
    assert_eq!(markers.len(), 1);
    match &markers[0].geometry {
        GraphicGeometry::Point(p) => *p,
        other => panic!("marker with geometry {other:?}"),
    }
}

#[test]
fn click_on_empty_map_moves_marker_and_recenters() {
    let mut host = loaded_host();
    let clicked = LonLat::new(-111.23456, 37.98765);
    let ticket = host.on_click(clicked.to_map_point()).unwrap();
    assert!(ticket.is_some());
    assert_eq!(host.process_hit_tests().unwrap(), 1);

    let expected = LonLat::new(-111.235, 37.988);
    assert_eq!(host.view_state().center(), expected);
    assert_eq!(host.layer().len(), 1);
    let marker = marker_position(&host);
    assert!((marker.x - expected.to_map_point().x).abs() < 1e-6);
    assert!((marker.y - expected.to_map_point().y).abs() < 1e-6);
    assert_eq!(host.view().unwrap().navigation(), &[expected]);
}

#[test]
fn click_on_marker_changes_nothing() {
    let mut host = loaded_host();
    let before_state = host.view_state();
    let before_marker = marker_position(&host);

    host.on_click(before_marker).unwrap();
    assert_eq!(host.process_hit_tests().unwrap(), 0);

    assert_eq!(host.view_state(), before_state);
    assert_eq!(marker_position(&host), before_marker);
    assert!(host.view().unwrap().navigation().is_empty());
}

#[test]
fn newer_click_supersedes_pending_one() {
    let mut host = loaded_host();
    let first = host
        .on_click(LonLat::new(-110.0, 35.0).to_map_point())
        .unwrap();
    let second = host
        .on_click(LonLat::new(-109.0, 34.0).to_map_point())
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(host.process_hit_tests().unwrap(), 1);
    assert_eq!(host.view_state().center(), LonLat::new(-109.0, 34.0));
}

#[test]
fn sketch_start_invalidates_pending_click() {
    let mut host = loaded_host();
    host.on_click(LonLat::new(-110.0, 35.0).to_map_point())
        .unwrap();

    let mut session = SketchSession::default();
    let start = session
        .begin(SketchTool::Polygon, MapPoint::new(0.0, 0.0))
        .unwrap();
    host.on_sketch_event(start).unwrap();

    assert_eq!(host.process_hit_tests().unwrap(), 0);
    assert!(host.layer().is_empty());
    assert_eq!(
        host.view_state().center(),
        LonLat::new(-112.20290843602699, 36.50550844957497)
    );
}

#[test]
fn clicks_are_ignored_while_sketching() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    let start = session
        .begin(SketchTool::Circle, MapPoint::new(0.0, 0.0))
        .unwrap();
    host.on_sketch_event(start).unwrap();
    let before = host.view_state().center();
    let graphics = host.layer().len();
    assert!(host
        .on_click(LonLat::new(-110.0, 35.0).to_map_point())
        .unwrap()
        .is_none());
    assert_eq!(host.view().unwrap().pending_hit_tests(), 0);
    assert_eq!(host.process_hit_tests().unwrap(), 0);
    assert_eq!(host.view_state().center(), before);
    assert_eq!(host.layer().len(), graphics);
}

#[test]
fn click_keeps_latest_sketch_result() {
    let mut host = loaded_host();
    let mut session = SketchSession::default();
    let origin = LonLat::new(-105.0, 40.0).to_map_point();
    host.on_sketch_event(session.begin(SketchTool::Rectangle, origin).unwrap())
        .unwrap();
    session
        .drag_to(MapPoint::new(origin.x + 2000.0, origin.y + 2000.0))
        .unwrap();
    host.on_sketch_event(session.finish().unwrap()).unwrap();
    let acres = host.map_data().acres;
    assert!(acres.is_some());

    host.on_click(LonLat::new(-80.0, 30.0).to_map_point())
        .unwrap();
    assert_eq!(host.process_hit_tests().unwrap(), 1);
    assert_eq!(host.map_data().acres, acres);
    assert_eq!(host.layer().len(), 1);
}

#[test]
fn click_before_initialize_fails() {
    let mut host: MapHost<HeadlessView> = MapHost::new(MapConfig::default());
    assert!(matches!(
        host.on_click(MapPoint::new(0.0, 0.0)),
        Err(MapError::NotInitialized)
    ));
}

#[test]
fn locate_recenters_without_touching_state() {
    let mut host = loaded_host();
    let before = host.view_state();
    host.on_locate(LonLat::new(2.35, 48.85)).unwrap();
    assert_eq!(host.view().unwrap().center(), LonLat::new(2.35, 48.85));
    assert_eq!(host.view_state(), before);
    assert_eq!(host.layer().len(), 1);
}
