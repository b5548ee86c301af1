//! In-memory draw.io document: a flat arena of cells linked by parent id.

use crate::error::{ComposeError, Result};

pub const ROOT_ID: &str = "0";
pub const LAYER_ID: &str = "1";

/// Role of a cell in the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Cell "0".
    Root,
    /// Cell "1", parent of every top-level shape.
    Layer,
    /// Outer image group or per-image axis group.
    Group,
    Image,
    /// Badge on an image.
    Label,
    AxisLine,
    AxisLabel,
}

impl CellKind {
    pub fn is_edge(self) -> bool {
        self == CellKind::AxisLine
    }

    pub fn is_vertex(self) -> bool {
        !matches!(self, CellKind::Root | CellKind::Layer | CellKind::AxisLine)
    }
}

/// Cell position, relative to the parent cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Bounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Edge geometry: draw.io wants a nominal 50×50 relative box plus the
    /// two end points.
    Line { source: (f64, f64), target: (f64, f64) },
}

impl Geometry {
    pub fn bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Geometry::Bounds { x, y, width, height }
    }

    /// `(min_x, min_y, max_x, max_y)`.
    pub fn extents(&self) -> (f64, f64, f64, f64) {
        match *self {
            Geometry::Bounds { x, y, width, height } => (x, y, x + width, y + height),
            Geometry::Line { source, target } => (
                source.0.min(target.0),
                source.1.min(target.1),
                source.0.max(target.0),
                source.1.max(target.1),
            ),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        match *self {
            Geometry::Bounds { x, y, width, height } => Geometry::Bounds {
                x: x + dx,
                y: y + dy,
                width,
                height,
            },
            Geometry::Line { source, target } => Geometry::Line {
                source: (source.0 + dx, source.1 + dy),
                target: (target.0 + dx, target.1 + dy),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: String,
    /// `None` only for the root cell.
    pub parent: Option<String>,
    pub kind: CellKind,
    pub value: String,
    pub style: String,
    /// `None` only for the root and layer cells.
    pub geometry: Option<Geometry>,
}

impl Cell {
    /// A visual cell; every one has exactly one geometry.
    pub fn new(
        id: String,
        parent: &str,
        kind: CellKind,
        value: impl Into<String>,
        style: impl Into<String>,
        geometry: Geometry,
    ) -> Self {
        Self {
            id,
            parent: Some(parent.to_string()),
            kind,
            value: value.into(),
            style: style.into(),
            geometry: Some(geometry),
        }
    }
}

/// One `mxfile` with a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramDocument {
    host: String,
    page_name: String,
    page_id: String,
    cells: Vec<Cell>,
}

impl DiagramDocument {
    /// Empty document holding only the root and layer cells.
    pub fn new(host: impl Into<String>, page_name: impl Into<String>, page_id: impl Into<String>) -> Self {
        let structural = |id: &str, parent: Option<&str>, kind| Cell {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            kind,
            value: String::new(),
            style: String::new(),
            geometry: None,
        };
        Self {
            host: host.into(),
            page_name: page_name.into(),
            page_id: page_id.into(),
            cells: vec![
                structural(ROOT_ID, None, CellKind::Root),
                structural(LAYER_ID, Some(ROOT_ID), CellKind::Layer),
            ],
        }
    }

    /// Append `cell`. Its id must be new and its parent must already exist.
    pub fn add(&mut self, cell: Cell) -> Result<usize> {
        if self.cell(&cell.id).is_some() {
            return Err(ComposeError::Internal(format!("duplicate cell id '{}'", cell.id)));
        }
        match cell.parent.as_deref() {
            Some(parent) if self.cell(parent).is_some() => {}
            other => {
                return Err(ComposeError::Internal(format!(
                    "cell '{}' has unknown parent {:?}",
                    cell.id, other
                )))
            }
        }
        self.cells.push(cell);
        Ok(self.cells.len() - 1)
    }

    pub fn set_geometry(&mut self, index: usize, geometry: Geometry) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.geometry = Some(geometry);
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// All cells in creation order (parents before children).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells
            .iter()
            .filter(move |c| c.parent.as_deref() == Some(parent))
    }

    pub fn cells_of_kind(&self, kind: CellKind) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| c.kind == kind)
    }

    /// draw.io XML for this document.
    pub fn to_xml(&self) -> Result<String> {
        super::serialize::to_xml(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DiagramDocument {
        DiagramDocument::new("host", "Page", "pid")
    }

    #[test]
    fn starts_with_root_and_layer() {
        let d = doc();
        assert_eq!(d.cells().len(), 2);
        assert_eq!(d.cells()[0].kind, CellKind::Root);
        assert_eq!(d.cells()[1].parent.as_deref(), Some(ROOT_ID));
    }

    #[test]
    fn rejects_unknown_parent_and_duplicates() {
        let mut d = doc();
        let g = Geometry::bounds(0.0, 0.0, 1.0, 1.0);
        d.add(Cell::new("a".into(), LAYER_ID, CellKind::Group, "", "group", g))
            .unwrap();
        assert!(d
            .add(Cell::new("a".into(), LAYER_ID, CellKind::Group, "", "group", g))
            .is_err());
        assert!(d
            .add(Cell::new("b".into(), "missing", CellKind::Image, "", "", g))
            .is_err());
        assert_eq!(d.children(LAYER_ID).count(), 1);
    }

    #[test]
    fn line_extents() {
        let g = Geometry::Line {
            source: (10.0, 50.0),
            target: (70.0, 50.0),
        };
        assert_eq!(g.extents(), (10.0, 50.0, 70.0, 50.0));
        assert_eq!(
            g.translate(-10.0, -50.0),
            Geometry::Line {
                source: (0.0, 0.0),
                target: (60.0, 0.0)
            }
        );
    }
}
