//! Integration tests for inline-direction and block-direction placement.
//!
//! All numbers assume [`ApproximateMetrics`] at the default 16px font:
//! ascent 13, descent 3, line gap 3, so a line is 19px tall with the
//! baseline 14px below its top.

use linebox_layout::content::{AtomicContent, ContentId, ContentTree};
use linebox_layout::geometry::{EdgeSizes, Size};
use linebox_layout::inline_box::InlineTree;
use linebox_layout::metrics::ApproximateMetrics;
use linebox_layout::style::{BorderSide, BorderSides, BorderStyle, BoxStyle, ColorValue, TextDirection, VerticalAlign};
use linebox_layout::{BoxId, LayoutConfig, LineParams, layout_line};

fn new_tree() -> InlineTree {
    InlineTree::new(ContentTree::new(BoxStyle::default(), 800.0))
}

/// Add a text node under `parent` and one box covering all of it.
fn text_box(tree: &mut InlineTree, parent: ContentId, text: &str, width: f32) -> BoxId {
    let content = tree
        .content_mut()
        .add_text(parent, text, BoxStyle::default())
        .unwrap();
    let id = tree.create_text_box(content, 0, text.len()).unwrap();
    tree.set_logical_width(id, width).unwrap();
    id
}

fn left(tree: &InlineTree, id: BoxId) -> f32 {
    tree.get(id).unwrap().logical_left()
}

fn top(tree: &InlineTree, id: BoxId) -> f32 {
    tree.get(id).unwrap().logical_top()
}

fn width(tree: &InlineTree, id: BoxId) -> f32 {
    tree.get(id).unwrap().logical_width()
}

// ---------------------------------------------------------------------------
// Inline direction
// ---------------------------------------------------------------------------

/// Two text runs of width 50 and 60 sit side by side.
#[test]
fn test_text_runs_placed_side_by_side() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let first = text_box(&mut tree, ContentId::BLOCK, "hello", 50.0);
    let second = text_box(&mut tree, ContentId::BLOCK, "world", 60.0);
    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, second, &ApproximateMetrics).unwrap();

    let mut needs_word_spacing = false;
    let right = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, first), 0.0);
    assert_eq!(left(&tree, second), 50.0);
    assert_eq!(right, 110.0);
    assert_eq!(width(&tree, root), 110.0);
    assert!(needs_word_spacing);
}

#[test]
fn test_placement_starts_at_logical_left() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let only = text_box(&mut tree, ContentId::BLOCK, "x", 12.0);
    tree.add_to_line(root, only, &ApproximateMetrics).unwrap();

    let params = LineParams {
        logical_left: 30.0,
        ..LineParams::default()
    };
    let _ = layout_line(&mut tree, root, &params, &ApproximateMetrics).unwrap();

    assert_eq!(left(&tree, root), 30.0);
    assert_eq!(left(&tree, only), 30.0);
    assert_eq!(width(&tree, root), 12.0);
}

/// Each box starts where the previous one ended.
#[test]
fn test_inline_positions_are_monotonic() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let widths = [12.0, 7.0, 30.0, 0.0, 5.0];
    let boxes: Vec<BoxId> = widths
        .iter()
        .map(|&w| text_box(&mut tree, ContentId::BLOCK, "ab", w))
        .collect();
    for &id in &boxes {
        tree.add_to_line(root, id, &ApproximateMetrics).unwrap();
    }

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    for pair in boxes.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        assert!(left(&tree, next) >= left(&tree, prev));
        assert_eq!(left(&tree, next), tree.get(prev).unwrap().logical_right());
    }
    assert_eq!(width(&tree, root), widths.iter().sum::<f32>());
}

#[test]
fn test_word_spacing_before_leading_space() {
    let mut tree = new_tree();
    let mut spaced = BoxStyle::default();
    spaced.font.word_spacing = 5.0;
    let root = tree.create_root_box().unwrap();
    let first = text_box(&mut tree, ContentId::BLOCK, "one", 30.0);
    let content = tree.content_mut().add_text(ContentId::BLOCK, " two", spaced).unwrap();
    let second = tree.create_text_box(content, 0, 4).unwrap();
    tree.set_logical_width(second, 40.0).unwrap();
    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, second, &ApproximateMetrics).unwrap();

    let mut needs_word_spacing = false;
    let right = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, second), 35.0);
    assert_eq!(right, 75.0);
}

/// No spacing is added when the previous run already ended in a space.
#[test]
fn test_no_word_spacing_after_trailing_space() {
    let mut tree = new_tree();
    let mut spaced = BoxStyle::default();
    spaced.font.word_spacing = 5.0;
    let root = tree.create_root_box().unwrap();
    let first = text_box(&mut tree, ContentId::BLOCK, "one ", 30.0);
    let content = tree.content_mut().add_text(ContentId::BLOCK, " two", spaced).unwrap();
    let second = tree.create_text_box(content, 0, 4).unwrap();
    tree.set_logical_width(second, 40.0).unwrap();
    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, second, &ApproximateMetrics).unwrap();

    let mut needs_word_spacing = false;
    let _ = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, second), 30.0);
}

/// A run whose range runs past the end of the address space reads as empty
/// text: it is still placed but takes no word spacing.
#[test]
fn test_run_with_overflowing_range_is_treated_as_empty() {
    let mut tree = new_tree();
    let mut spaced = BoxStyle::default();
    spaced.font.word_spacing = 5.0;
    let root = tree.create_root_box().unwrap();
    let first = text_box(&mut tree, ContentId::BLOCK, "one", 30.0);
    let content = tree.content_mut().add_text(ContentId::BLOCK, " two", spaced).unwrap();
    let second = tree.create_text_box(content, usize::MAX, 2).unwrap();
    tree.set_logical_width(second, 40.0).unwrap();
    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, second, &ApproximateMetrics).unwrap();

    let mut needs_word_spacing = false;
    let right = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, second), 30.0);
    assert_eq!(right, 70.0);
    assert!(needs_word_spacing);
}

#[test]
fn test_flow_box_margins_border_and_padding() {
    let mut tree = new_tree();
    let mut span_style = BoxStyle::default();
    span_style.margin = EdgeSizes {
        left: 7.0,
        right: 3.0,
        ..EdgeSizes::default()
    };
    span_style.padding = EdgeSizes {
        left: 2.0,
        right: 4.0,
        ..EdgeSizes::default()
    };
    let span = tree.content_mut().add_inline(ContentId::BLOCK, span_style).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "in", 20.0);
    let after = text_box(&mut tree, ContentId::BLOCK, "out", 10.0);
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, after, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    assert_eq!(left(&tree, flow), 7.0);
    assert_eq!(left(&tree, inner), 9.0);
    assert_eq!(width(&tree, flow), 26.0);
    assert_eq!(left(&tree, after), 36.0);
    assert_eq!(width(&tree, root), 46.0);
}

/// An empty inline still takes the room of its borders and padding.
#[test]
fn test_empty_flow_box_width_is_border_and_padding() {
    let mut tree = new_tree();
    let mut span_style = BoxStyle::default();
    span_style.padding = EdgeSizes {
        left: 4.0,
        right: 5.0,
        ..EdgeSizes::default()
    };
    span_style.border = BorderSides {
        left: BorderSide::new(2.0, BorderStyle::Solid, ColorValue::BLACK),
        right: BorderSide::new(3.0, BorderStyle::Solid, ColorValue::BLACK),
        ..BorderSides::default()
    };
    let span = tree.content_mut().add_inline(ContentId::BLOCK, span_style).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    let flow_box = tree.get(flow).unwrap().flow().unwrap();
    assert!(flow_box.include_logical_left_edge());
    assert!(flow_box.include_logical_right_edge());
    assert_eq!(width(&tree, flow), 14.0);
    assert_eq!(width(&tree, root), 14.0);
}

/// An inline split over two lines opens on the first and closes on the
/// last.
#[test]
fn test_split_inline_edges() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "split here", BoxStyle::default()).unwrap();
    let first_root = tree.create_root_box().unwrap();
    let second_root = tree.create_root_box().unwrap();
    let first = tree.create_flow_box(span).unwrap();
    let second = tree.create_flow_box(span).unwrap();
    tree.add_to_line(first_root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(second_root, second, &ApproximateMetrics).unwrap();

    tree.determine_spacing_for_flow_boxes(first_root, false, true, Some(text));
    tree.set_constructed(first_root).unwrap();
    tree.determine_spacing_for_flow_boxes(second_root, true, false, Some(text));

    let first_flow = tree.get(first).unwrap().flow().unwrap();
    assert!(first_flow.include_logical_left_edge());
    assert!(!first_flow.include_logical_right_edge());
    let second_flow = tree.get(second).unwrap().flow().unwrap();
    assert!(!second_flow.include_logical_left_edge());
    assert!(second_flow.include_logical_right_edge());

    let root_flow = tree.get(first_root).unwrap().flow().unwrap();
    assert!(!root_flow.include_logical_left_edge());
    assert!(!root_flow.include_logical_right_edge());
}

#[test]
fn test_out_of_flow_child_takes_no_room() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let before = text_box(&mut tree, ContentId::BLOCK, "a", 50.0);
    let floating = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(40.0, 40.0),
                ..AtomicContent::default()
            },
            BoxStyle::default(),
        )
        .unwrap();
    tree.content_mut().get_mut(floating).unwrap().out_of_flow = true;
    let positioned = tree.create_atomic_box(floating).unwrap();
    let after = text_box(&mut tree, ContentId::BLOCK, "b", 20.0);
    for id in [before, positioned, after] {
        tree.add_to_line(root, id, &ApproximateMetrics).unwrap();
    }

    let mut needs_word_spacing = false;
    let right = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, positioned), 50.0);
    assert_eq!(left(&tree, after), 50.0);
    assert_eq!(right, 70.0);
}

/// In right-to-left content the static position is measured from the
/// block's right edge.
#[test]
fn test_out_of_flow_static_position_rtl() {
    let mut block_style = BoxStyle::default();
    block_style.direction = TextDirection::Rtl;
    let mut tree = InlineTree::new(ContentTree::new(block_style, 800.0));
    let root = tree.create_root_box().unwrap();
    let before = text_box(&mut tree, ContentId::BLOCK, "a", 50.0);
    let floating = tree
        .content_mut()
        .add_atomic(ContentId::BLOCK, AtomicContent::default(), BoxStyle::default())
        .unwrap();
    tree.content_mut().get_mut(floating).unwrap().out_of_flow = true;
    let positioned = tree.create_atomic_box(floating).unwrap();
    tree.add_to_line(root, before, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, positioned, &ApproximateMetrics).unwrap();

    let mut needs_word_spacing = false;
    let _ = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert_eq!(left(&tree, positioned), 750.0);
}

// ---------------------------------------------------------------------------
// Block direction
// ---------------------------------------------------------------------------

#[test]
fn test_single_text_line_bounds() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let only = text_box(&mut tree, ContentId::BLOCK, "text", 40.0);
    tree.add_to_line(root, only, &ApproximateMetrics).unwrap();

    let next = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    assert_eq!(next, 19.0);
    assert_eq!(top(&tree, root), 1.0);
    assert_eq!(top(&tree, only), 1.0);
    let line = tree.root_line(root).unwrap();
    assert_eq!(line.line_top(), 1.0);
    assert_eq!(line.line_bottom(), 17.0);
    assert_eq!(line.line_top_with_leading(), 0.0);
    assert_eq!(line.line_bottom_with_leading(), 19.0);
}

/// A line break's box sits where a text run in the same font would.
#[test]
fn test_line_break_top_matches_text_top() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let only = text_box(&mut tree, ContentId::BLOCK, "text", 40.0);
    let br = tree
        .content_mut()
        .add_line_break(ContentId::BLOCK, BoxStyle::default())
        .unwrap();
    let line_break = tree.create_text_box(br, 0, 0).unwrap();
    tree.add_to_line(root, only, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, line_break, &ApproximateMetrics).unwrap();

    let next = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    assert_eq!(next, 19.0);
    assert_eq!(top(&tree, only), 1.0);
    assert_eq!(top(&tree, line_break), 1.0);
    let line = tree.root_line(root).unwrap();
    assert_eq!(line.line_top(), 1.0);
    assert_eq!(line.line_bottom(), 17.0);
}

#[test]
fn test_line_starts_at_height_of_block() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let only = text_box(&mut tree, ContentId::BLOCK, "text", 40.0);
    tree.add_to_line(root, only, &ApproximateMetrics).unwrap();

    let params = LineParams {
        height_of_block: 38.0,
        ..LineParams::default()
    };
    let next = layout_line(&mut tree, root, &params, &ApproximateMetrics).unwrap();

    assert_eq!(next, 57.0);
    assert_eq!(top(&tree, only), 39.0);
}

/// A `vertical-align: top` box sits exactly at the line's block offset.
#[test]
fn test_vertical_align_top_sits_at_line_top() {
    let mut tree = new_tree();
    let mut image_style = BoxStyle::default();
    image_style.vertical_align = VerticalAlign::Top;
    let image = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(20.0, 20.0),
                ..AtomicContent::default()
            },
            image_style,
        )
        .unwrap();
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();

    let params = LineParams {
        height_of_block: 100.0,
        ..LineParams::default()
    };
    let next = layout_line(&mut tree, root, &params, &ApproximateMetrics).unwrap();

    assert_eq!(top(&tree, leaf), 100.0);
    assert_eq!(next, 120.0);
    assert_eq!(tree.content().get(image).unwrap().location.y, 100.0);
    assert_eq!(tree.max_logical_top(root), Ok(100.0));
}

#[test]
fn test_vertical_align_bottom_sits_at_line_bottom() {
    let mut tree = new_tree();
    let mut image_style = BoxStyle::default();
    image_style.vertical_align = VerticalAlign::Bottom;
    let image = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(10.0, 10.0),
                ..AtomicContent::default()
            },
            image_style,
        )
        .unwrap();
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    // Line is 19px tall; a 10px box aligned to the bottom starts at 9.
    assert_eq!(top(&tree, leaf), 9.0);
}

/// An atomic inline on the baseline pushes the line's ascent up.
#[test]
fn test_tall_atomic_on_baseline_grows_line() {
    let mut tree = new_tree();
    let image = tree
        .content_mut()
        .add_atomic(
            ContentId::BLOCK,
            AtomicContent {
                size: Size::new(20.0, 30.0),
                ..AtomicContent::default()
            },
            BoxStyle::default(),
        )
        .unwrap();
    let root = tree.create_root_box().unwrap();
    let text = text_box(&mut tree, ContentId::BLOCK, "x", 10.0);
    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(root, text, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();

    let next = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    // Ascent 30 from the image, descent 5 from the strut.
    assert_eq!(next, 35.0);
    assert_eq!(top(&tree, leaf), 0.0);
    assert_eq!(top(&tree, root), 17.0);
    assert_eq!(top(&tree, text), 17.0);
}

#[test]
fn test_sub_and_super_offsets() {
    let mut tree = new_tree();
    let mut sub = BoxStyle::default();
    sub.vertical_align = VerticalAlign::Sub;
    let mut sup = BoxStyle::default();
    sup.vertical_align = VerticalAlign::Super;
    let sub_span = tree.content_mut().add_inline(ContentId::BLOCK, sub).unwrap();
    let sup_span = tree.content_mut().add_inline(ContentId::BLOCK, sup).unwrap();
    let root = tree.create_root_box().unwrap();
    let sub_box = tree.create_flow_box(sub_span).unwrap();
    let sup_box = tree.create_flow_box(sup_span).unwrap();
    tree.add_to_line(root, sub_box, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, sup_box, &ApproximateMetrics).unwrap();

    assert_eq!(tree.vertical_position_for_box(sub_box, &ApproximateMetrics), 4.0);
    assert_eq!(tree.vertical_position_for_box(sup_box, &ApproximateMetrics), -6.0);
    assert_eq!(tree.vertical_position_for_box(root, &ApproximateMetrics), 0.0);
}

#[test]
fn test_length_offset_raises_box() {
    let mut tree = new_tree();
    let mut raised = BoxStyle::default();
    raised.vertical_align = VerticalAlign::Length(5.0);
    let span = tree.content_mut().add_inline(ContentId::BLOCK, raised).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();

    assert_eq!(tree.vertical_position_for_box(flow, &ApproximateMetrics), -5.0);
}

/// In strict mode the root's strut gives an empty line its height; in
/// quirks mode an empty line collapses.
#[test]
fn test_empty_line_strict_and_quirks() {
    let mut strict_tree = new_tree();
    let strict_root = strict_tree.create_root_box().unwrap();
    let next = layout_line(&mut strict_tree, strict_root, &LineParams::default(), &ApproximateMetrics).unwrap();
    assert_eq!(next, 19.0);

    let mut quirks_tree = new_tree();
    let quirks_root = quirks_tree.create_root_box().unwrap();
    let params = LineParams {
        height_of_block: 10.0,
        config: LayoutConfig {
            strict_mode: false,
            ..LayoutConfig::default()
        },
        ..LineParams::default()
    };
    let next = layout_line(&mut quirks_tree, quirks_root, &params, &ApproximateMetrics).unwrap();
    assert_eq!(next, 10.0);
    let line = quirks_tree.root_line(quirks_root).unwrap();
    assert_eq!(line.line_top(), 10.0);
    assert_eq!(line.line_bottom(), 10.0);
}

#[test]
fn test_align_rejects_non_root() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let flow = tree.create_flow_box(span).unwrap();

    assert!(
        tree.align_boxes_in_block_direction(flow, 0.0, LayoutConfig::default(), &ApproximateMetrics)
            .is_err()
    );
    assert!(layout_line(&mut tree, flow, &LineParams::default(), &ApproximateMetrics).is_err());
}

/// A failed layout leaves the subtree where it was.
#[test]
fn test_layout_line_on_non_root_changes_nothing() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "in", 40.0);
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();

    let params = LineParams {
        logical_left: 30.0,
        ..LineParams::default()
    };
    assert!(layout_line(&mut tree, flow, &params, &ApproximateMetrics).is_err());
    assert_eq!(left(&tree, inner), 0.0);
    assert_eq!(width(&tree, flow), 0.0);
}

#[test]
fn test_layout_line_marks_constructed() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();
    let only = text_box(&mut tree, ContentId::BLOCK, "x", 8.0);
    tree.add_to_line(root, only, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();

    assert!(tree.get(root).unwrap().flags().constructed);
    assert!(tree.get(only).unwrap().flags().constructed);
    assert!(tree.check_consistency(root).is_ok());
}

#[test]
fn test_layout_line_is_repeatable() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let inner = text_box(&mut tree, span, "in", 20.0);
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, inner, &ApproximateMetrics).unwrap();

    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();
    let first = tree.snapshot(root, &ApproximateMetrics).unwrap();
    let _ = layout_line(&mut tree, root, &LineParams::default(), &ApproximateMetrics).unwrap();
    let second = tree.snapshot(root, &ApproximateMetrics).unwrap();

    assert_eq!(first.frame, second.frame);
    assert_eq!(first.children[0].frame, second.children[0].frame);
    assert_eq!(
        first.children[0].children[0].frame,
        second.children[0].children[0].frame
    );
}
