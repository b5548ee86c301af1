//! XML writer for [`DiagramDocument`].
//!
//! Attribute order is fixed (`id, value, style, vertex, edge, connectable,
//! parent` on cells; `x, y, width, height, relative, as` on geometry) and
//! whole numbers are written without a fractional part, so the same document
//! always serializes to the same bytes.

use super::tree::{Cell, CellKind, DiagramDocument, Geometry};
use crate::error::{ComposeError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

/// Serialize `doc` as a draw.io file.
pub fn to_xml(doc: &DiagramDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut mxfile = BytesStart::new("mxfile");
    mxfile.push_attribute(("host", doc.host()));
    write(&mut writer, Event::Start(mxfile))?;

    let mut diagram = BytesStart::new("diagram");
    diagram.push_attribute(("name", doc.page_name()));
    diagram.push_attribute(("id", doc.page_id()));
    write(&mut writer, Event::Start(diagram))?;
    write(&mut writer, Event::Start(BytesStart::new("mxGraphModel")))?;
    write(&mut writer, Event::Start(BytesStart::new("root")))?;

    for cell in doc.cells() {
        write_cell(&mut writer, cell)?;
    }

    for name in ["root", "mxGraphModel", "diagram", "mxfile"] {
        write(&mut writer, Event::End(BytesEnd::new(name)))?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| ComposeError::Internal(format!("Invalid UTF-8 in generated XML: {e}")))
}

fn write_cell(writer: &mut XmlWriter, cell: &Cell) -> Result<()> {
    let mut elem = BytesStart::new("mxCell");
    elem.push_attribute(("id", cell.id.as_str()));
    if !matches!(cell.kind, CellKind::Root | CellKind::Layer) {
        elem.push_attribute(("value", cell.value.as_str()));
        elem.push_attribute(("style", cell.style.as_str()));
    }
    if cell.kind.is_vertex() {
        elem.push_attribute(("vertex", "1"));
    }
    if cell.kind.is_edge() {
        elem.push_attribute(("edge", "1"));
    }
    if cell.kind == CellKind::Group {
        elem.push_attribute(("connectable", "0"));
    }
    if let Some(parent) = &cell.parent {
        elem.push_attribute(("parent", parent.as_str()));
    }

    match &cell.geometry {
        None => write(writer, Event::Empty(elem)),
        Some(geometry) => {
            write(writer, Event::Start(elem))?;
            write_geometry(writer, geometry)?;
            write(writer, Event::End(BytesEnd::new("mxCell")))
        }
    }
}

fn write_geometry(writer: &mut XmlWriter, geometry: &Geometry) -> Result<()> {
    let mut elem = BytesStart::new("mxGeometry");
    match *geometry {
        Geometry::Bounds { x, y, width, height } => {
            for (key, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
                elem.push_attribute((key, fmt_num(v).as_str()));
            }
            elem.push_attribute(("as", "geometry"));
            write(writer, Event::Empty(elem))
        }
        Geometry::Line { source, target } => {
            elem.push_attribute(("width", "50"));
            elem.push_attribute(("height", "50"));
            elem.push_attribute(("relative", "1"));
            elem.push_attribute(("as", "geometry"));
            write(writer, Event::Start(elem))?;
            write_point(writer, source, "sourcePoint")?;
            write_point(writer, target, "targetPoint")?;
            write(writer, Event::End(BytesEnd::new("mxGeometry")))
        }
    }
}

fn write_point(writer: &mut XmlWriter, (x, y): (f64, f64), role: &str) -> Result<()> {
    let mut elem = BytesStart::new("mxPoint");
    elem.push_attribute(("x", fmt_num(x).as_str()));
    elem.push_attribute(("y", fmt_num(y).as_str()));
    elem.push_attribute(("as", role));
    write(writer, Event::Empty(elem))
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ComposeError::Internal(format!("Failed to write diagram XML: {e}")))
}

/// Shortest form of `v` rounded to two decimals: `30`, `12.5`, `-3.25`.
pub fn fmt_num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}
