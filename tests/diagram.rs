//! Integration tests for `.drawio` export.
//!
//! Exported files are parsed back with `quick-xml` and checked for cell
//! structure, geometry and id stability.
//!
//! Run with:
//!   cargo test --test diagram

use figure_composer::{
    export_diagram, export_diagram_image, Design, DiagramBackend, IdStrategy, LayoutMode,
    OutputKind, RenderConfig,
};
use image::{Rgb, RgbImage};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn fixture_dir(n: usize, w: u32, h: u32) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..n {
        let shade = 40 + 50 * i as u8;
        RgbImage::from_pixel(w, h, Rgb([shade, 90, 160]))
            .save(dir.path().join(format!("panel{i}.png")))
            .unwrap();
    }
    dir
}

/// One parsed `mxCell` with the `mxGeometry` that follows it, if any.
#[derive(Debug, Default)]
struct ParsedCell {
    id: String,
    parent: Option<String>,
    style: String,
    value: String,
    edge: bool,
    geometry: HashMap<String, String>,
}

impl ParsedCell {
    fn num(&self, key: &str) -> f64 {
        self.geometry[key].parse().unwrap()
    }
}

fn attrs(e: &BytesStart<'_>) -> HashMap<String, String> {
    e.attributes()
        .map(|a| {
            let a = a.unwrap();
            (
                String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                unescape(&String::from_utf8_lossy(&a.value))
                    .unwrap()
                    .into_owned(),
            )
        })
        .collect()
}

fn parse_cells(xml: &str) -> Vec<ParsedCell> {
    let mut reader = Reader::from_str(xml);
    let mut cells: Vec<ParsedCell> = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"mxCell" => {
                    let mut a = attrs(&e);
                    cells.push(ParsedCell {
                        id: a.remove("id").unwrap(),
                        parent: a.remove("parent"),
                        style: a.remove("style").unwrap_or_default(),
                        value: a.remove("value").unwrap_or_default(),
                        edge: a.get("edge").map(String::as_str) == Some("1"),
                        geometry: HashMap::new(),
                    });
                }
                b"mxGeometry" => {
                    cells.last_mut().unwrap().geometry = attrs(&e);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    cells
}

fn export(design: &Design, ids: IdStrategy, path: &Path) -> Vec<ParsedCell> {
    let backend = DiagramBackend::new().with_id_strategy(ids);
    export_diagram(design, &backend, path).unwrap();
    parse_cells(&std::fs::read_to_string(path).unwrap())
}

fn children<'a>(cells: &'a [ParsedCell], parent: &str) -> Vec<&'a ParsedCell> {
    cells
        .iter()
        .filter(|c| c.parent.as_deref() == Some(parent))
        .collect()
}

// ── Structure ────────────────────────────────────────────────────────────────

#[test]
fn row_of_two_has_group_images_and_labels() {
    let src = fixture_dir(2, 100, 100);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("fig.drawio");

    let design = Design::from_dir(src.path(), RenderConfig::default()).unwrap();
    let cells = export(&design, IdStrategy::Random, &target);

    let top = children(&cells, "1");
    assert_eq!(top.len(), 1, "one outer group under the layer");
    let group = top[0];
    assert_eq!(group.style, "group");

    let images = children(&cells, &group.id);
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|c| c.style.starts_with("shape=image;")));
    assert!(images
        .iter()
        .all(|c| c.style.contains("image=data:image/png,iVBOR")));

    for img in &images {
        let labels: Vec<_> = children(&cells, &img.id)
            .into_iter()
            .filter(|c| c.id.ends_with("-numbering"))
            .collect();
        assert_eq!(labels.len(), 1, "one label per image cell");
    }
    let values: HashSet<_> = cells
        .iter()
        .filter(|c| c.id.ends_with("-numbering"))
        .map(|c| c.value.as_str())
        .collect();
    assert!(values.iter().any(|v| v.contains(">a</font>")));
    assert!(values.iter().any(|v| v.contains(">b</font>")));
}

#[test]
fn geometry_matches_raster_layout() {
    let src = fixture_dir(2, 100, 100);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("fig.drawio");

    let design = Design::from_dir(src.path(), RenderConfig::default()).unwrap();
    let cells = export(&design, IdStrategy::Sequential, &target);

    let group = children(&cells, "1")[0];
    assert_eq!((group.num("x"), group.num("y")), (30.0, 30.0));

    let mut xs: Vec<f64> = children(&cells, &group.id)
        .iter()
        .map(|c| c.num("x"))
        .collect();
    xs.sort_by(f64::total_cmp);
    // Bordered footprint 120 + spacing 10; cells sit inside the border.
    assert_eq!(xs, vec![10.0, 140.0]);

    let plan = design.plan().unwrap();
    assert_eq!(plan.positions, vec![(0, 0), (130, 0)]);
}

#[test]
fn axes_become_edges_and_labels() {
    let src = fixture_dir(2, 120, 90);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("axes.drawio");

    let config = RenderConfig::builder()
        .axes(true)
        .axis_color("red")
        .layout(LayoutMode::Column)
        .build()
        .unwrap();
    let design = Design::from_dir(src.path(), config).unwrap();
    let cells = export(&design, IdStrategy::Sequential, &target);

    let edges: Vec<_> = cells.iter().filter(|c| c.edge).collect();
    assert_eq!(edges.len(), 4, "x and y axis per image");
    assert!(edges.iter().all(|c| c.style.contains("endArrow=blockThin")));
    assert!(edges.iter().all(|c| c.style.contains("strokeColor=red")));

    let axis_labels: Vec<_> = cells
        .iter()
        .filter(|c| c.id.ends_with("-xlabel") || c.id.ends_with("-ylabel"))
        .collect();
    assert_eq!(axis_labels.len(), 4);
}

#[test]
fn no_label_means_no_label_cells() {
    let src = fixture_dir(3, 40, 40);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("plain.drawio");

    let config = RenderConfig::builder().label(false).build().unwrap();
    let design = Design::from_dir(src.path(), config).unwrap();
    let cells = export(&design, IdStrategy::Random, &target);

    assert!(!cells.iter().any(|c| c.id.ends_with("-numbering")));
}

// ── Ids ──────────────────────────────────────────────────────────────────────

#[test]
fn sequential_ids_are_byte_identical() {
    let src = fixture_dir(3, 50, 40);
    let out = tempfile::tempdir().unwrap();
    let (a, b) = (out.path().join("a.drawio"), out.path().join("b.drawio"));

    let config = RenderConfig::builder().axes(true).build().unwrap();
    let design = Design::from_dir(src.path(), config).unwrap();
    export(&design, IdStrategy::Sequential, &a);
    export(&design, IdStrategy::Sequential, &b);

    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn random_ids_are_unique_and_prefixed() {
    let src = fixture_dir(2, 50, 40);
    let out = tempfile::tempdir().unwrap();
    let (a, b) = (out.path().join("a.drawio"), out.path().join("b.drawio"));

    let config = RenderConfig::builder().axes(true).build().unwrap();
    let design = Design::from_dir(src.path(), config).unwrap();
    let first = export(&design, IdStrategy::Random, &a);
    let second = export(&design, IdStrategy::Random, &b);

    let ids: Vec<_> = first.iter().map(|c| c.id.as_str()).collect();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
    assert!(ids
        .iter()
        .filter(|id| !matches!(**id, "0" | "1"))
        .all(|id| id.starts_with("E__")));

    let group_a = &children(&first, "1")[0].id;
    let group_b = &children(&second, "1")[0].id;
    assert_ne!(group_a, group_b);
}

// ── Single image and document shape ──────────────────────────────────────────

#[test]
fn single_image_sits_on_the_layer() {
    let src = fixture_dir(2, 60, 30);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("one.drawio");

    let design = Design::from_dir(src.path(), RenderConfig::default()).unwrap();
    let backend = DiagramBackend::new().with_id_strategy(IdStrategy::Sequential);
    let summary = export_diagram_image(&design, &backend, 1, &target).unwrap();
    assert_eq!(summary.kind, OutputKind::Diagram);
    assert_eq!((summary.width, summary.height), (60, 30));

    let cells = parse_cells(&std::fs::read_to_string(&target).unwrap());
    let top = children(&cells, "1");
    assert_eq!(top.len(), 1);
    assert!(top[0].style.starts_with("shape=image;"));
    assert_eq!((top[0].num("x"), top[0].num("y")), (0.0, 0.0));
}

#[test]
fn document_envelope() {
    let src = fixture_dir(1, 20, 20);
    let config = RenderConfig::builder().label(false).build().unwrap();
    let design = Design::from_dir(src.path(), config).unwrap();
    let xml = design.diagram_xml().unwrap();

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<mxfile host=\"figure-composer\">"));
    assert!(xml.contains("<diagram name=\"Figure\""));
    assert!(xml.contains("<mxCell id=\"0\"/>"));
    assert!(xml.contains("<mxCell id=\"1\" parent=\"0\"/>"));
}
