//! Integration tests for overflow computation, hit testing and line
//! snapshots.

use linebox_layout::content::{AtomicContent, ContentId, ContentTree};
use linebox_layout::geometry::{Point, Rect, Size};
use linebox_layout::inline_box::{GlyphOverflow, InlineTree};
use linebox_layout::metrics::ApproximateMetrics;
use linebox_layout::style::{BoxShadow, BoxStyle};
use linebox_layout::{BoxId, LineParams, layout_line};

fn new_tree() -> InlineTree {
    InlineTree::new(ContentTree::new(BoxStyle::default(), 800.0))
}

fn text_box(tree: &mut InlineTree, parent: ContentId, text: &str, width: f32) -> BoxId {
    let content = tree
        .content_mut()
        .add_text(parent, text, BoxStyle::default())
        .unwrap();
    let id = tree.create_text_box(content, 0, text.len()).unwrap();
    tree.set_logical_width(id, width).unwrap();
    id
}

fn line_bounds(tree: &InlineTree, root: BoxId) -> (f32, f32) {
    let line = tree.root_line(root).unwrap();
    (line.line_top(), line.line_bottom())
}

/// A line holding one text run whose glyphs reach 2px above the font box.
fn glyph_line() -> (InlineTree, BoxId, BoxId) {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let text = text_box(&mut tree, ContentId::BLOCK, "glyphs", 30.0);
    tree.set_glyph_overflow(
        text,
        GlyphOverflow {
            top: 2.0,
            ..GlyphOverflow::default()
        },
    )
    .unwrap();
    tree.add_to_line(root, text, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();
    (tree, root, text)
}

// ---------------------------------------------------------------------------
// Glyph and text overflow
// ---------------------------------------------------------------------------

#[test]
fn test_glyph_overflow_extends_root_visual_overflow() {
    let (tree, root, text) = glyph_line();
    let text_top = tree.get(text).unwrap().logical_top();
    let (line_top, _) = line_bounds(&tree, root);
    assert_eq!(line_top, text_top);

    let root_node = tree.get(root).unwrap();
    assert!(!root_node.known_to_have_no_overflow());
    let record = root_node.overflow().record().unwrap();
    assert_eq!(record.visual_overflow.y, text_top - 2.0);
    assert_eq!(record.visual_overflow.height, 18.0);
    // Ink does not scroll.
    assert_eq!(record.layout_overflow.y, line_top);
}

#[test]
fn test_glyph_overflow_on_attached_box_clears_ancestors() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let text = text_box(&mut tree, ContentId::BLOCK, "x", 10.0);
    tree.add_to_line(root, text, &ApproximateMetrics).unwrap();
    assert!(tree.get(root).unwrap().known_to_have_no_overflow());

    tree.set_glyph_overflow(
        text,
        GlyphOverflow {
            bottom: 1.0,
            ..GlyphOverflow::default()
        },
    )
    .unwrap();

    assert!(!tree.get(text).unwrap().known_to_have_no_overflow());
    assert!(!tree.get(root).unwrap().known_to_have_no_overflow());
}

#[test]
fn test_plain_text_line_has_no_overflow_record() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let text = text_box(&mut tree, ContentId::BLOCK, "plain", 30.0);
    tree.add_to_line(root, text, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    let root_node = tree.get(root).unwrap();
    assert!(root_node.known_to_have_no_overflow());
    assert!(root_node.overflow().record().is_none());
    let (line_top, line_bottom) = line_bounds(&tree, root);
    assert_eq!(
        tree.visual_overflow_rect(root, line_top, line_bottom, &ApproximateMetrics),
        Rect::new(0.0, line_top, 30.0, line_bottom - line_top)
    );
}

/// Recomputing without a layout in between changes nothing.
#[test]
fn test_compute_overflow_is_idempotent() {
    let (mut tree, root, text) = glyph_line();
    let (line_top, line_bottom) = line_bounds(&tree, root);
    let before_root = tree.get(root).unwrap().overflow().clone();
    let before_text = tree.get(text).unwrap().overflow().clone();

    tree.compute_overflow(root, line_top, line_bottom, &ApproximateMetrics);
    tree.compute_overflow(root, line_top, line_bottom, &ApproximateMetrics);

    assert_eq!(tree.get(root).unwrap().overflow(), &before_root);
    assert_eq!(tree.get(text).unwrap().overflow(), &before_text);
}

// ---------------------------------------------------------------------------
// Box decorations and atomic content
// ---------------------------------------------------------------------------

#[test]
fn test_box_shadow_extends_flow_visual_overflow() {
    let mut tree = new_tree();
    let mut shadowed = BoxStyle::default();
    shadowed.box_shadow.push(BoxShadow {
        offset_x: 4.0,
        offset_y: 4.0,
        ..BoxShadow::default()
    });
    let span = tree.content_mut().add_inline(ContentId::BLOCK, shadowed).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "in", 40.0);
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    let (line_top, line_bottom) = line_bounds(&tree, root);
    let record = tree.get(flow).unwrap().overflow().record().unwrap();
    assert_eq!(record.visual_overflow.x, 0.0);
    assert_eq!(record.visual_overflow.y, line_top);
    assert_eq!(record.visual_overflow.width, 44.0);
    assert_eq!(record.visual_overflow.height, line_bottom - line_top + 4.0);
    assert_eq!(record.layout_overflow, Rect::new(0.0, line_top, 40.0, line_bottom - line_top));

    let root_record = tree.get(root).unwrap().overflow().record().unwrap();
    assert_eq!(root_record.visual_overflow.max_x(), 44.0);
}

fn atomic_line(self_painting: bool) -> (InlineTree, BoxId, BoxId) {
    let mut tree = new_tree();
    let image = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(20.0, 20.0),
                visual_overflow: Some(Rect::new(-5.0, -5.0, 30.0, 30.0)),
                ..AtomicContent::default()
            },
            BoxStyle::default(),
        )
        .unwrap();
    tree.content_mut().get_mut(image).unwrap().self_painting_layer = self_painting;
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();
    (tree, root, leaf)
}

#[test]
fn test_atomic_visual_overflow_reaches_root() {
    let (tree, root, leaf) = atomic_line(false);
    let node = tree.get(leaf).unwrap();
    let (left, top) = (node.logical_left(), node.logical_top());

    let record = tree.get(root).unwrap().overflow().record().unwrap();
    assert_eq!(record.visual_overflow.x, left - 5.0);
    assert_eq!(record.visual_overflow.y, top - 5.0);
    assert_eq!(record.visual_overflow.max_x(), left + 25.0);
}

/// Content painted in its own layer reports its ink there, not on the line.
#[test]
fn test_self_painting_atomic_visual_overflow_is_excluded() {
    let (tree, root, _) = atomic_line(true);
    assert!(tree.get(root).unwrap().overflow().record().is_none());
}

// ---------------------------------------------------------------------------
// Relative positioning
// ---------------------------------------------------------------------------

#[test]
fn test_relatively_positioned_atomic_extends_layout_overflow() {
    let mut tree = new_tree();
    let image = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(20.0, 20.0),
                ..AtomicContent::default()
            },
            BoxStyle::default(),
        )
        .unwrap();
    tree.content_mut().get_mut(image).unwrap().relative_offset = Point::new(100.0, 0.0);
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    assert_eq!(tree.get(leaf).unwrap().logical_left(), 0.0);
    let (line_top, line_bottom) = line_bounds(&tree, root);
    let layout = tree.layout_overflow_rect(root, line_top, line_bottom, &ApproximateMetrics);
    assert_eq!(layout.x, 0.0);
    assert_eq!(layout.max_x(), 120.0);
    // Ink stays where the box was placed.
    let visual = tree.visual_overflow_rect(root, line_top, line_bottom, &ApproximateMetrics);
    assert_eq!(visual.max_x(), 20.0);
}

#[test]
fn test_relatively_positioned_span_extends_layout_overflow() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    tree.content_mut().get_mut(span).unwrap().relative_offset = Point::new(30.0, 5.0);
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "in", 40.0);
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    let (line_top, line_bottom) = line_bounds(&tree, root);
    let record = tree.get(root).unwrap().overflow().record().unwrap();
    assert_eq!(record.layout_overflow, Rect::new(0.0, line_top, 70.0, line_bottom - line_top + 5.0));
    assert_eq!(record.visual_overflow.max_x(), 40.0);

    // The offset box itself keeps its frame as its layout overflow.
    let span_layout = tree.layout_overflow_rect(flow, line_top, line_bottom, &ApproximateMetrics);
    assert_eq!(span_layout, Rect::new(0.0, line_top, 40.0, line_bottom - line_top));
}

#[test]
fn test_zero_relative_offset_keeps_no_overflow_state() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    assert!(tree.get(root).unwrap().known_to_have_no_overflow());
}

#[test]
fn test_adjust_position_moves_overflow_record() {
    let (mut tree, root, text) = glyph_line();
    let before = tree.get(root).unwrap().overflow().record().unwrap().visual_overflow;
    let text_before = tree.get(text).unwrap().origin();

    tree.adjust_block_direction_position(root, 10.0);

    let after = tree.get(root).unwrap().overflow().record().unwrap().visual_overflow;
    assert_eq!(after, before.moved_by(0.0, 10.0));
    assert_eq!(tree.get(text).unwrap().origin(), text_before.moved_by(0.0, 10.0));
}

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

#[test]
fn test_node_at_point_finds_deepest_box() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let first = text_box(&mut tree, ContentId::BLOCK, "hello", 50.0);
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "world", 60.0);
    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();
    let (line_top, line_bottom) = line_bounds(&tree, root);
    let hit = |x: f32, y: f32| tree.node_at_point(root, Point::new(x, y), line_top, line_bottom, &ApproximateMetrics);

    assert_eq!(hit(10.0, 5.0), Some(first));
    assert_eq!(hit(70.0, 5.0), Some(inner));
    assert_eq!(hit(200.0, 5.0), None);
    assert_eq!(hit(10.0, 40.0), None);
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[test]
fn test_snapshot_serializes_line() {
    let (tree, root, _) = glyph_line();
    let snapshot = tree.snapshot(root, &ApproximateMetrics).unwrap();
    assert_eq!(snapshot.kind, "root");
    assert_eq!(snapshot.children.len(), 1);
    assert_eq!(snapshot.children[0].kind, "text");

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["kind"], "root");
    assert_eq!(json["children"][0]["kind"], "text");
    assert!(json.get("visual_overflow").is_some());
    // Text boxes carry no edge flags.
    assert!(json["children"][0].get("include_left_edge").is_none());
}
