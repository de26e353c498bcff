//! End-to-end layout tests: source text in, resolved geometry out.

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use tessera::{
    DiagramBuilder, ResolvedDiagram, TesseraError,
    config::{AppConfig, LayoutConfig, Measurement, StyleConfig, TextConfig},
    identifier::Id,
    semantic::{Block, Document, Edge},
    shape::ShapeKind,
};

const PADDING: f32 = 8.0;

fn builder() -> DiagramBuilder {
    DiagramBuilder::new(AppConfig::new(
        LayoutConfig::default(),
        TextConfig::new("Arial", 12, Measurement::Estimate),
        StyleConfig::default(),
    ))
}

fn compile(source: &str) -> (Document, ResolvedDiagram) {
    let builder = builder();
    let document = builder.parse(source).expect("Failed to parse");
    let diagram = builder.layout(&document).expect("Failed to lay out");
    (document, diagram)
}

fn center(diagram: &ResolvedDiagram, id: &str) -> (f32, f32) {
    let block = diagram
        .block(id)
        .unwrap_or_else(|| panic!("block `{id}` should be placed"));
    (block.center().x(), block.center().y())
}

#[test]
fn test_columns_inside_block() {
    let (document, diagram) = compile("block-beta\n block\n columns 2\n a\n b\n c\n end");

    let [wrapper] = document.root().children() else {
        panic!("Expected a single wrapper block");
    };
    let wrapper_block = document.block(wrapper).expect("wrapper");
    assert!(wrapper_block.is_composite());
    assert_eq!(wrapper_block.columns(), 2);
    assert_eq!(wrapper_block.children(), [Id::new("a"), Id::new("b"), Id::new("c")]);

    let (ax, ay) = center(&diagram, "a");
    let (bx, by) = center(&diagram, "b");
    let (cx, cy) = center(&diagram, "c");
    assert_eq!(ay, by);
    assert!(cy > ay);
    assert_eq!(ax, cx);
    assert!(bx > ax);

    // Two rows plus three padding gaps.
    let row = diagram.block("a").expect("a").size().height();
    assert_approx_eq!(
        f32,
        diagram.bounds().height(),
        2.0 * row + 3.0 * PADDING,
        epsilon = 0.001
    );
}

#[test]
fn test_column_wrapping() {
    let (_, diagram) = compile("block-beta\ncolumns 2\na b c d e");

    let xs: Vec<f32> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|id| center(&diagram, id).0)
        .collect();
    let ys: Vec<f32> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|id| center(&diagram, id).1)
        .collect();

    // (0,0) (1,0) (0,1) (1,1) (0,2)
    assert_eq!([xs[0], xs[2], xs[4]], [xs[0]; 3]);
    assert_eq!(xs[1], xs[3]);
    assert!(xs[1] > xs[0]);
    assert_eq!(ys[0], ys[1]);
    assert_eq!(ys[2], ys[3]);
    assert!(ys[0] < ys[2] && ys[2] < ys[4]);
}

#[test]
fn test_multi_column_width() {
    let (_, diagram) = compile("block-beta\ncolumns 3\na:2 b c");

    let a = diagram.block("a").expect("a");
    let b = diagram.block("b").expect("b");
    assert_eq!(a.width_in_columns(), 2);
    assert_approx_eq!(
        f32,
        a.size().width(),
        2.0 * b.size().width() + PADDING,
        epsilon = 0.001
    );

    // `a` consumes two columns, so `b` ends the first row.
    assert_eq!(center(&diagram, "a").1, center(&diagram, "b").1);
    assert!(center(&diagram, "c").1 > center(&diagram, "b").1);
    assert_approx_eq!(
        f32,
        center(&diagram, "c").0,
        a.center().x() - a.size().width() / 2.0 + b.size().width() / 2.0,
        epsilon = 0.001
    );
}

#[test]
fn test_single_row_without_columns() {
    let (document, diagram) = compile("block-beta\na b c d");

    assert_eq!(document.root().columns(), -1);
    let y = center(&diagram, "a").1;
    for id in ["b", "c", "d"] {
        assert_eq!(center(&diagram, id).1, y, "{id} should share the first row");
    }
}

#[test]
fn test_spacer_expansion() {
    let (document, diagram) = compile("block-beta\nblock:b\n  space:3\nend");

    assert_eq!(
        document.children("b"),
        [Id::new("b-0"), Id::new("b-1"), Id::new("b-2")]
    );
    for id in ["b-0", "b-1", "b-2"] {
        let spacer = diagram.block(id).expect("spacer placed");
        assert_eq!(spacer.kind(), ShapeKind::Space);
    }
}

#[test]
fn test_redeclaration_keeps_one_block() {
    let (document, diagram) = compile("block-beta\na\na[\"Alpha\"]");

    assert_eq!(document.root().children(), [Id::new("a")]);
    let a = diagram.block("a").expect("a");
    assert_eq!(a.kind(), ShapeKind::Square);
    assert_eq!(a.label(), "Alpha");
}

#[test]
fn test_parallel_edges_stay_distinct() {
    let (_, diagram) = compile("block-beta\na --> b\na --> b");

    let ids: Vec<&str> = diagram.edges().iter().map(|edge| edge.id().as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| id.ends_with("-a-b")));
}

#[test]
fn test_edges_run_between_centers() {
    let (_, diagram) = compile("block-beta\na -- \"calls\" --> b");

    let edge = &diagram.edges()[0];
    let a = diagram.block("a").expect("a").center();
    let b = diagram.block("b").expect("b").center();
    assert_eq!(edge.points(), [a, a.midpoint(b), b]);
    assert_eq!(edge.label(), Some("calls"));
}

#[test]
fn test_unresolved_edge_reference() {
    let mut document = Document::new();
    document.insert_block(Block::new(Id::new("a"), ShapeKind::Square));
    document.set_children("root", vec![Id::new("a")]);
    document.push_edge(Edge::new(Id::new("1-a-missing"), Id::new("a"), Id::new("missing")));

    let result = builder().layout(&document);
    assert!(matches!(
        result,
        Err(TesseraError::UnresolvedReference { ref block, .. }) if block == "missing"
    ));
}

#[test]
fn test_zero_columns_is_layout_error() {
    let mut document = Document::new();
    document.insert_block(Block::new(Id::new("a"), ShapeKind::Square));
    document.set_children("root", vec![Id::new("a")]);
    if let Some(root) = document.block_mut("root") {
        root.set_columns(0);
    }

    assert!(matches!(
        builder().layout(&document),
        Err(TesseraError::Layout(_))
    ));
}

#[test]
fn test_short_row_sits_below_tall_row() {
    let (_, diagram) = compile(
        "block-beta\ncolumns 1\nt[\"l1\nl2\nl3\nl4\nl5\"]\nblock:g\n  averyveryverylongidentifier\nend",
    );

    let t = diagram.block("t").expect("t").bounds();
    let g = diagram.block("g").expect("g").bounds();
    assert!(g.height() < t.height());
    assert!(g.min_y() >= t.max_y(), "row 1 overlaps row 0: {t:?} {g:?}");
}

#[test]
fn test_deeply_nested_blocks() {
    let depth = 40;
    let source = format!(
        "block-beta\n{}leaf\n{}",
        "block\n".repeat(depth),
        "end\n".repeat(depth)
    );
    let (_, diagram) = compile(&source);

    let leaf = diagram.block("leaf").expect("leaf placed").bounds();
    assert!(diagram.bounds().width() >= leaf.width() + 2.0 * depth as f32 * PADDING - 0.01);
    assert_eq!(diagram.blocks().count(), depth + 1);
}

fn leaf_source() -> impl Strategy<Value = String> {
    (
        prop::option::of(1u32..5),
        prop::collection::vec(("[a-z]{1,12}", 1u32..4), 1..10),
    )
        .prop_map(|(columns, leaves)| {
            let mut source = String::from("block-beta\n");
            if let Some(columns) = columns {
                source.push_str(&format!("columns {columns}\n"));
            }
            source.push_str("block:outer\n");
            for (i, (label, width)) in leaves.iter().enumerate() {
                source.push_str(&format!("  n{i}[\"{label}\"]:{width}\n"));
            }
            source.push_str("end\nlast((\"tail\"))\n");
            source
        })
}

proptest! {
    #[test]
    fn prop_bounds_contain_every_block(source in leaf_source()) {
        let (_, diagram) = compile(&source);
        let bounds = diagram.bounds();

        for block in diagram.blocks() {
            let half_w = block.size().width() / 2.0;
            let half_h = block.size().height() / 2.0;
            let c = block.center();
            prop_assert!(c.x() - half_w >= bounds.min_x() - 0.001);
            prop_assert!(c.x() + half_w <= bounds.max_x() + 0.001);
            prop_assert!(c.y() - half_h >= bounds.min_y() - 0.001);
            prop_assert!(c.y() + half_h <= bounds.max_y() + 0.001);
        }
    }
}
