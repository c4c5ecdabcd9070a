//! The map host: owns the view state, the graphics layer and the latest
//! sketch result, and reacts to sketch and click events.

use serde::Serialize;

use crate::config::MapConfig;
use crate::engine::{GeoEngine, GeometryEngine};
use crate::error::MapError;
use crate::geometry::{Extent, LonLat, MapPoint, SketchGeometry};
use crate::graphics::{GraphicKind, GraphicsLayer};
use crate::report::{report, SketchResult};
use crate::sketch::{SketchEvent, SketchState};
use crate::view::{
    HitTestRequest, HitTestResponse, HitTestTicket, MapProperties, MapView, UiControl, UiPosition,
    ViewState,
};

/// Id of the layer holding the marker and the sketch.
pub const GRAPHICS_LAYER_ID: &str = "sketch-graphics";

/// Where the widget is in its sketch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchPhase {
    Idle,
    Sketching,
    HasResult,
}

/// Latest sketch answer as read by the surrounding dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapData {
    pub extent: Option<Extent>,
    pub acres: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct PendingClick {
    ticket: HitTestTicket,
    point: LonLat,
}

/// Binds a [`MapView`] to the sketch and click handlers.
pub struct MapHost<V: MapView, E: GeometryEngine = GeoEngine> {
    config: MapConfig,
    engine: E,
    view_state: ViewState,
    layer: GraphicsLayer,
    view: Option<V>,
    result: Option<SketchResult>,
    phase: SketchPhase,
    pending_click: Option<PendingClick>,
    next_ticket: u64,
}

impl<V: MapView> MapHost<V, GeoEngine> {
    pub fn new(config: MapConfig) -> Self {
        Self::with_engine(config, GeoEngine)
    }
}

impl<V: MapView, E: GeometryEngine> MapHost<V, E> {
    pub fn with_engine(config: MapConfig, engine: E) -> Self {
        Self {
            view_state: ViewState::new(config.center, config.zoom),
            config,
            engine,
            layer: GraphicsLayer::new(GRAPHICS_LAYER_ID),
            view: None,
            result: None,
            phase: SketchPhase::Idle,
            pending_click: None,
            next_ticket: 1,
        }
    }

    /// Creates the view in `container`, places the initial marker and
    /// registers the locate and sketch controls.
    pub fn initialize(&mut self, container: &str) -> Result<(), MapError> {
        if self.view.is_some() {
            return Err(MapError::AlreadyInitialized);
        }
        if container.trim().is_empty() {
            return Err(MapError::MissingContainer);
        }
        log::info!("loading map in '{}' ({})", container, self.config.basemap);
        let properties = MapProperties {
            basemap: self.config.basemap.clone(),
            layers: vec![self.layer.id().to_string()],
            center: self.view_state.center(),
            zoom: self.view_state.zoom,
            hit_tolerance_px: self.config.hit_tolerance_px,
        };
        let mut view = V::create(container, &properties)?;
        self.place_marker(self.view_state.center());
        view.add_control(UiControl::Locate, UiPosition::TopLeft);
        view.add_control(UiControl::Sketch, UiPosition::TopRight);
        self.view = Some(view);
        Ok(())
    }

    /// Dispatches a sketch event to the create or update handler.
    pub fn on_sketch_event(&mut self, event: SketchEvent) -> Result<(), MapError> {
        match event {
            SketchEvent::Create {
                state, geometry, ..
            } => self.on_create(state, geometry),
            SketchEvent::Update { state, geometries } => self.on_update(state, &geometries),
        }
    }

    /// Handles the create flow of the sketch toolbar.
    ///
    /// `start` clears the layer and the previous result; `complete` keeps the
    /// finished shape as the only graphic and reports it.
    pub fn on_create(
        &mut self,
        state: SketchState,
        geometry: Option<SketchGeometry>,
    ) -> Result<(), MapError> {
        match state {
            SketchState::Start => {
                self.layer.remove_all();
                self.reset_params();
                if let Some(stale) = self.pending_click.take() {
                    log::debug!("sketch started, dropping hit-test {:?}", stale.ticket);
                }
                self.phase = SketchPhase::Sketching;
                Ok(())
            }
            SketchState::Complete => {
                let Some(geometry) = geometry else {
                    log::debug!("create completed without geometry");
                    return Ok(());
                };
                self.layer.remove_all();
                self.layer
                    .add_sketch(geometry.clone(), self.config.sketch_fill);
                self.store_report(&geometry)
            }
            SketchState::Cancel => {
                if self.phase == SketchPhase::Sketching {
                    self.phase = SketchPhase::Idle;
                }
                Ok(())
            }
            SketchState::Active => Ok(()),
        }
    }

    /// Handles the update flow; only `complete` is acted on, with the first
    /// geometry reported.
    pub fn on_update(
        &mut self,
        state: SketchState,
        geometries: &[SketchGeometry],
    ) -> Result<(), MapError> {
        if state != SketchState::Complete {
            return Ok(());
        }
        let Some(geometry) = geometries.first() else {
            log::debug!("update completed without geometries");
            return Ok(());
        };
        let sketch_id = self.layer.of_kind(GraphicKind::Sketch).map(|g| g.id).next();
        match sketch_id {
            Some(id) => {
                self.layer.replace_sketch(id, geometry.clone());
            }
            None => {
                self.layer.remove_all();
                self.layer
                    .add_sketch(geometry.clone(), self.config.sketch_fill);
            }
        }
        self.store_report(geometry)
    }

    /// Handles a map click.
    ///
    /// The click is rounded and a hit-test against the graphics layer is
    /// queued. The returned ticket is settled by
    /// [`MapHost::on_hit_test_resolved`]. While a sketch is being drawn the
    /// click belongs to the sketch tool and `None` is returned.
    pub fn on_click(&mut self, map_point: MapPoint) -> Result<Option<HitTestTicket>, MapError> {
        let view = self.view.as_mut().ok_or(MapError::NotInitialized)?;
        if self.phase == SketchPhase::Sketching {
            log::debug!("click ignored while sketching");
            return Ok(None);
        }
        let point = map_point
            .to_lon_lat()
            .ok_or(MapError::Projection {
                x: map_point.x,
                y: map_point.y,
            })?
            .rounded(self.config.click_precision);
        let ticket = HitTestTicket(self.next_ticket);
        self.next_ticket += 1;
        if let Some(previous) = self.pending_click.replace(PendingClick { ticket, point }) {
            log::debug!("hit-test {:?} superseded by {:?}", previous.ticket, ticket);
        }
        view.hit_test(HitTestRequest {
            ticket,
            point: map_point,
            include_layer: self.layer.id().to_string(),
        });
        Ok(Some(ticket))
    }

    /// Settles a hit-test issued by [`MapHost::on_click`].
    ///
    /// Returns `true` when a new marker was placed. Answers for tickets that
    /// were superseded or invalidated by a sketch start are ignored.
    pub fn on_hit_test_resolved(&mut self, response: HitTestResponse) -> Result<bool, MapError> {
        let view = self.view.as_mut().ok_or(MapError::NotInitialized)?;
        let pending = match self.pending_click {
            Some(p) if p.ticket == response.ticket => p,
            _ => {
                log::debug!("ignoring stale hit-test {:?}", response.ticket);
                return Ok(false);
            }
        };
        self.pending_click = None;
        if !response.hits.is_empty() {
            return Ok(false);
        }
        self.view_state.longitude = pending.point.longitude;
        self.view_state.latitude = pending.point.latitude;
        view.go_to(pending.point);
        self.place_marker(pending.point);
        self.phase = SketchPhase::Idle;
        Ok(true)
    }

    /// Lets the view answer queued hit-tests and settles them.
    ///
    /// Returns the number of markers placed.
    pub fn process_hit_tests(&mut self) -> Result<usize, MapError> {
        let view = self.view.as_mut().ok_or(MapError::NotInitialized)?;
        let responses = view.poll_hit_tests(&self.layer);
        let mut placed = 0;
        for response in responses {
            if self.on_hit_test_resolved(response)? {
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Recenters on a position found by the locate control. The view state
    /// and the layer are left alone.
    pub fn on_locate(&mut self, position: LonLat) -> Result<(), MapError> {
        let view = self.view.as_mut().ok_or(MapError::NotInitialized)?;
        let LonLat {
            longitude,
            latitude,
        } = position;
        log::info!("located at {longitude:.6}, {latitude:.6}");
        view.go_to(position);
        Ok(())
    }

    /// Latest sketch extent and acreage.
    pub fn map_data(&self) -> MapData {
        MapData {
            extent: self.result.map(|r| r.extent),
            acres: self.result.map(|r| r.area_acres),
        }
    }

    /// Clears the latest sketch result.
    pub fn reset_params(&mut self) {
        self.result = None;
    }

    pub fn result(&self) -> Option<&SketchResult> {
        self.result.as_ref()
    }

    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn layer(&self) -> &GraphicsLayer {
        &self.layer
    }

    pub fn phase(&self) -> SketchPhase {
        self.phase
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    fn place_marker(&mut self, at: LonLat) {
        self.layer.remove_all();
        self.layer.add_marker(at.to_map_point(), self.config.marker);
    }

    fn store_report(&mut self, geometry: &SketchGeometry) -> Result<(), MapError> {
        match report(&self.engine, geometry) {
            Ok(result) => {
                self.result = Some(result);
                self.phase = SketchPhase::HasResult;
                Ok(())
            }
            Err(err) => {
                self.phase = SketchPhase::Idle;
                Err(err)
            }
        }
    }
}
