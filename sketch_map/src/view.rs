//! Map view capability and a headless implementation.
//!
//! The map host only talks to a view through [`MapView`]. Hit-tests are
//! asynchronous: a request is queued with a ticket and answered later through
//! [`MapView::poll_hit_tests`], so callers must not assume the layer is
//! unchanged by the time the answer arrives.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::{LonLat, MapPoint};
use crate::graphics::{GraphicId, GraphicsLayer};

/// Width of the Web Mercator square in map units.
const WORLD_WIDTH: f64 = 40_075_016.686;
const TILE_SIZE: f64 = 256.0;

/// Center and zoom of the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: u8,
}

impl ViewState {
    pub fn new(center: LonLat, zoom: u8) -> Self {
        Self {
            longitude: center.longitude,
            latitude: center.latitude,
            zoom,
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

/// Widgets placed in the view's UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiControl {
    Locate,
    Sketch,
}

/// Corner a control is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Properties the view is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperties {
    pub basemap: String,
    /// Ids of the operational layers, bottom first.
    pub layers: Vec<String>,
    pub center: LonLat,
    pub zoom: u8,
    pub hit_tolerance_px: f64,
}

/// Handle of a pending hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestTicket(pub u64);

/// Hit-test of a map point restricted to one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestRequest {
    pub ticket: HitTestTicket,
    pub point: MapPoint,
    pub include_layer: String,
}

/// Answer to a [`HitTestRequest`]. `hits` is empty when nothing was hit.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestResponse {
    pub ticket: HitTestTicket,
    pub hits: Vec<GraphicId>,
}

/// The consumed map view surface.
pub trait MapView {
    /// Binds a new view to `container`.
    fn create(container: &str, properties: &MapProperties) -> Result<Self, MapError>
    where
        Self: Sized;

    /// Recenters the view.
    fn go_to(&mut self, center: LonLat);

    fn center(&self) -> LonLat;

    fn zoom(&self) -> u8;

    fn add_control(&mut self, control: UiControl, position: UiPosition);

    /// Queues a hit-test; the answer arrives through `poll_hit_tests`.
    fn hit_test(&mut self, request: HitTestRequest);

    /// Resolves queued hit-tests against the current state of `layer`.
    fn poll_hit_tests(&mut self, layer: &GraphicsLayer) -> Vec<HitTestResponse>;
}

/// View without a rendering surface. Records navigation and controls and
/// resolves hit-tests geometrically.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    container: String,
    properties: MapProperties,
    center: LonLat,
    zoom: u8,
    controls: Vec<(UiControl, UiPosition)>,
    pending: VecDeque<HitTestRequest>,
    navigation: Vec<LonLat>,
}

impl HeadlessView {
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn properties(&self) -> &MapProperties {
        &self.properties
    }

    pub fn controls(&self) -> &[(UiControl, UiPosition)] {
        &self.controls
    }

    /// Centers passed to `go_to`, oldest first.
    pub fn navigation(&self) -> &[LonLat] {
        &self.navigation
    }

    pub fn pending_hit_tests(&self) -> usize {
        self.pending.len()
    }

    /// Map units covered by one screen pixel at the current zoom.
    pub fn map_units_per_pixel(&self) -> f64 {
        WORLD_WIDTH / (TILE_SIZE * 2f64.powi(self.zoom as i32))
    }
}

impl MapView for HeadlessView {
    fn create(container: &str, properties: &MapProperties) -> Result<Self, MapError> {
        if container.trim().is_empty() {
            return Err(MapError::MissingContainer);
        }
        Ok(Self {
            container: container.to_string(),
            properties: properties.clone(),
            center: properties.center,
            zoom: properties.zoom,
            controls: Vec::new(),
            pending: VecDeque::new(),
            navigation: Vec::new(),
        })
    }

    fn go_to(&mut self, center: LonLat) {
        self.center = center;
        self.navigation.push(center);
    }

    fn center(&self) -> LonLat {
        self.center
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn add_control(&mut self, control: UiControl, position: UiPosition) {
        self.controls.push((control, position));
    }

    fn hit_test(&mut self, request: HitTestRequest) {
        self.pending.push_back(request);
    }

    fn poll_hit_tests(&mut self, layer: &GraphicsLayer) -> Vec<HitTestResponse> {
        let tolerance = self.properties.hit_tolerance_px * self.map_units_per_pixel();
        self.pending
            .drain(..)
            .map(|request| {
                let hits = if request.include_layer == layer.id() {
                    layer.hit_test(request.point, tolerance)
                } else {
                    Vec::new()
                };
                HitTestResponse {
                    ticket: request.ticket,
                    hits,
                }
            })
            .collect()
    }
}
