//! Graphics layer holding the location marker and the sketched shape.

use crate::geometry::{distance, MapPoint, SketchGeometry};
use crate::styles::{FillSymbol, MarkerSymbol, Symbol};

/// Identifier of a graphic, unique within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicId(pub u64);

/// The two kinds of graphic the widget places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicKind {
    Marker,
    Sketch,
}

/// Geometry of a graphic in Web Mercator.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicGeometry {
    Point(MapPoint),
    Polygon(SketchGeometry),
}

/// A geometry with the symbol used to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub id: GraphicId,
    pub geometry: GraphicGeometry,
    pub symbol: Symbol,
}

impl Graphic {
    pub fn kind(&self) -> GraphicKind {
        match self.geometry {
            GraphicGeometry::Point(_) => GraphicKind::Marker,
            GraphicGeometry::Polygon(_) => GraphicKind::Sketch,
        }
    }

    /// True if `point` lies on this graphic. Markers are hit within
    /// `tolerance` map units of their position.
    pub fn hit(&self, point: MapPoint, tolerance: f64) -> bool {
        match &self.geometry {
            GraphicGeometry::Point(p) => distance(*p, point) <= tolerance,
            GraphicGeometry::Polygon(g) => g.contains(point),
        }
    }
}

/// Ordered collection of graphics drawn above the basemap.
#[derive(Debug, Clone, Default)]
pub struct GraphicsLayer {
    id: String,
    graphics: Vec<Graphic>,
    next_id: u64,
}

impl GraphicsLayer {
    /// Creates an empty layer.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            graphics: Vec::new(),
            next_id: 1,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a graphic on top of the others.
    pub fn add(&mut self, geometry: GraphicGeometry, symbol: Symbol) -> GraphicId {
        let id = GraphicId(self.next_id);
        self.next_id += 1;
        self.graphics.push(Graphic {
            id,
            geometry,
            symbol,
        });
        id
    }

    pub fn add_marker(&mut self, point: MapPoint, symbol: MarkerSymbol) -> GraphicId {
        self.add(GraphicGeometry::Point(point), Symbol::SimpleMarker(symbol))
    }

    pub fn add_sketch(&mut self, geometry: SketchGeometry, symbol: FillSymbol) -> GraphicId {
        self.add(
            GraphicGeometry::Polygon(geometry),
            Symbol::SimpleFill(symbol),
        )
    }

    /// Removes every graphic.
    pub fn remove_all(&mut self) {
        self.graphics.clear();
    }

    /// Replaces the geometry of a sketch graphic. Returns `false` if `id` is
    /// not a sketch in this layer.
    pub fn replace_sketch(&mut self, id: GraphicId, geometry: SketchGeometry) -> bool {
        match self.graphics.iter_mut().find(|g| g.id == id) {
            Some(g) if g.kind() == GraphicKind::Sketch => {
                g.geometry = GraphicGeometry::Polygon(geometry);
                true
            }
            _ => false,
        }
    }

    /// Iterator over the graphics, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter()
    }

    /// Iterator over graphics of one kind.
    pub fn of_kind(&self, kind: GraphicKind) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter().filter(move |g| g.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    /// Graphics under `point`, topmost first.
    pub fn hit_test(&self, point: MapPoint, tolerance: f64) -> Vec<GraphicId> {
        self.graphics
            .iter()
            .rev()
            .filter(|g| g.hit(point, tolerance))
            .map(|g| g.id)
            .collect()
    }
}
