//! Sketch tool options, lifecycle events and a headless sketch session.
//!
//! A [`SketchSession`] turns pointer input into the same create/update
//! events an interactive sketch toolbar emits, so the map host can be driven
//! without a rendering surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::{distance, MapPoint, SketchGeometry};

/// Shapes the sketch toolbar can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchTool {
    Polygon,
    Rectangle,
    Circle,
}

impl SketchTool {
    pub fn name(&self) -> &'static str {
        match self {
            SketchTool::Polygon => "polygon",
            SketchTool::Rectangle => "rectangle",
            SketchTool::Circle => "circle",
        }
    }
}

impl fmt::Display for SketchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SketchTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polygon" => Ok(SketchTool::Polygon),
            "rectangle" => Ok(SketchTool::Rectangle),
            "circle" => Ok(SketchTool::Circle),
            other => Err(format!("unknown sketch tool '{other}'")),
        }
    }
}

/// What happens to a graphic once it has been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationMode {
    /// Create one graphic and select it for update.
    #[default]
    Single,
    /// Keep the tool active for the next graphic.
    Continuous,
    /// Create one graphic and immediately start an update.
    Update,
}

/// Orientation of the sketch toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchLayout {
    Horizontal,
    #[default]
    Vertical,
}

/// Configuration of the sketch toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchOptions {
    pub available_create_tools: Vec<SketchTool>,
    pub creation_mode: CreationMode,
    pub layout: SketchLayout,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            available_create_tools: vec![
                SketchTool::Polygon,
                SketchTool::Rectangle,
                SketchTool::Circle,
            ],
            creation_mode: CreationMode::Single,
            layout: SketchLayout::Vertical,
        }
    }
}

impl SketchOptions {
    pub fn allows(&self, tool: SketchTool) -> bool {
        self.available_create_tools.contains(&tool)
    }
}

/// Lifecycle state carried by sketch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchState {
    Start,
    Active,
    Complete,
    Cancel,
}

/// Event emitted by the sketch toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchEvent {
    /// A new graphic is being drawn. `geometry` is present once there is one.
    Create {
        state: SketchState,
        tool: SketchTool,
        geometry: Option<SketchGeometry>,
    },
    /// Existing graphics are being moved or reshaped.
    Update {
        state: SketchState,
        geometries: Vec<SketchGeometry>,
    },
}

impl SketchEvent {
    pub fn state(&self) -> SketchState {
        match self {
            SketchEvent::Create { state, .. } | SketchEvent::Update { state, .. } => *state,
        }
    }
}

/// Pointer-driven sketch of a single shape.
#[derive(Debug, Clone)]
pub struct SketchSession {
    options: SketchOptions,
    tool: Option<SketchTool>,
    vertices: Vec<MapPoint>,
}

impl SketchSession {
    pub fn new(options: SketchOptions) -> Self {
        Self {
            options,
            tool: None,
            vertices: Vec::new(),
        }
    }

    pub fn options(&self) -> &SketchOptions {
        &self.options
    }

    /// Tool of the shape in progress, if any.
    pub fn active_tool(&self) -> Option<SketchTool> {
        self.tool
    }

    /// Starts drawing with `tool` at `point`.
    ///
    /// A shape already in progress is discarded.
    pub fn begin(&mut self, tool: SketchTool, point: MapPoint) -> Result<SketchEvent, MapError> {
        if !self.options.allows(tool) {
            return Err(MapError::ToolUnavailable(tool));
        }
        self.tool = Some(tool);
        self.vertices.clear();
        self.vertices.push(point);
        Ok(SketchEvent::Create {
            state: SketchState::Start,
            tool,
            geometry: None,
        })
    }

    /// Adds a polygon vertex, or moves the dragged corner of a rectangle or
    /// the rim of a circle.
    pub fn add_vertex(&mut self, point: MapPoint) -> Result<SketchEvent, MapError> {
        let tool = self.tool.ok_or(MapError::NoActiveSketch)?;
        match tool {
            SketchTool::Polygon => self.vertices.push(point),
            SketchTool::Rectangle | SketchTool::Circle => {
                self.vertices.truncate(1);
                self.vertices.push(point);
            }
        }
        Ok(SketchEvent::Create {
            state: SketchState::Active,
            tool,
            geometry: self.build(tool).ok(),
        })
    }

    /// Alias of [`SketchSession::add_vertex`] for drag-shaped tools.
    pub fn drag_to(&mut self, point: MapPoint) -> Result<SketchEvent, MapError> {
        self.add_vertex(point)
    }

    /// Completes the shape, or cancels it if it is degenerate.
    pub fn finish(&mut self) -> Result<SketchEvent, MapError> {
        let tool = self.tool.take().ok_or(MapError::NoActiveSketch)?;
        let built = self.build(tool);
        self.vertices.clear();
        Ok(match built {
            Ok(geometry) => SketchEvent::Create {
                state: SketchState::Complete,
                tool,
                geometry: Some(geometry),
            },
            Err(err) => {
                log::debug!("discarding {tool} sketch: {err}");
                SketchEvent::Create {
                    state: SketchState::Cancel,
                    tool,
                    geometry: None,
                }
            }
        })
    }

    /// Abandons the shape in progress.
    pub fn cancel(&mut self) -> Result<SketchEvent, MapError> {
        let tool = self.tool.take().ok_or(MapError::NoActiveSketch)?;
        self.vertices.clear();
        Ok(SketchEvent::Create {
            state: SketchState::Cancel,
            tool,
            geometry: None,
        })
    }

    /// Moves an existing shape, emitting the update start and complete events.
    pub fn move_graphic(&self, geometry: &SketchGeometry, dx: f64, dy: f64) -> [SketchEvent; 2] {
        [
            SketchEvent::Update {
                state: SketchState::Start,
                geometries: vec![geometry.clone()],
            },
            SketchEvent::Update {
                state: SketchState::Complete,
                geometries: vec![geometry.translated(dx, dy)],
            },
        ]
    }

    fn build(&self, tool: SketchTool) -> Result<SketchGeometry, MapError> {
        match tool {
            SketchTool::Polygon => SketchGeometry::polygon(&self.vertices),
            SketchTool::Rectangle => match self.vertices.as_slice() {
                [a, b] => SketchGeometry::rectangle(*a, *b),
                _ => Err(MapError::EmptyGeometry),
            },
            SketchTool::Circle => match self.vertices.as_slice() {
                [center, rim] => SketchGeometry::circle(*center, distance(*center, *rim)),
                _ => Err(MapError::EmptyGeometry),
            },
        }
    }
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(SketchOptions::default())
    }
}
