//! Symbols used to draw graphics on the map.
use serde::{Deserialize, Serialize};

/// Stroke used for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    pub color: [u8; 3],
    pub width: f32,
}

impl LineSymbol {
    pub fn new(color: [u8; 3], width: f32) -> Self {
        Self { color, width }
    }
}

/// Simple round marker for point graphics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSymbol {
    pub color: [u8; 3],
    pub size: f32,
    pub outline: LineSymbol,
}

impl MarkerSymbol {
    pub fn new(color: [u8; 3], size: f32, outline: LineSymbol) -> Self {
        Self {
            color,
            size,
            outline,
        }
    }
}

impl Default for MarkerSymbol {
    /// Orange marker with a white outline.
    fn default() -> Self {
        Self::new([226, 119, 40], 12.0, LineSymbol::new([255, 255, 255], 2.0))
    }
}

/// Fill for polygon graphics. `color` carries alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillSymbol {
    pub color: [u8; 4],
    pub outline: LineSymbol,
}

impl FillSymbol {
    pub fn new(color: [u8; 4], outline: LineSymbol) -> Self {
        Self { color, outline }
    }
}

impl Default for FillSymbol {
    fn default() -> Self {
        Self::new([150, 150, 150, 50], LineSymbol::new([50, 50, 50], 2.0))
    }
}

/// Symbol attached to a graphic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Symbol {
    SimpleMarker(MarkerSymbol),
    SimpleFill(FillSymbol),
}
