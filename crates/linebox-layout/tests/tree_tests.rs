//! Integration tests for building, editing and walking inline box trees.

use linebox_layout::content::{AtomicContent, ContentId, ContentTree};
use linebox_layout::geometry::Size;
use linebox_layout::inline_box::InlineTree;
use linebox_layout::metrics::ApproximateMetrics;
use linebox_layout::style::BoxStyle;
use linebox_layout::{ConsistencyError, TreeError};

fn new_tree() -> InlineTree {
    InlineTree::new(ContentTree::new(BoxStyle::default(), 800.0))
}

fn atomic(width: f32, height: f32) -> AtomicContent {
    AtomicContent {
        size: Size::new(width, height),
        ..AtomicContent::default()
    }
}

// ---------------------------------------------------------------------------
// add_to_line
// ---------------------------------------------------------------------------

#[test]
fn test_add_to_line_links_children_in_order() {
    let mut tree = new_tree();
    let a = tree.content_mut().add_text(ContentId::BLOCK, "one", BoxStyle::default()).unwrap();
    let b = tree.content_mut().add_text(ContentId::BLOCK, "two", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let first = tree.create_text_box(a, 0, 3).unwrap();
    let second = tree.create_text_box(b, 0, 3).unwrap();

    tree.add_to_line(root, first, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, second, &ApproximateMetrics).unwrap();

    let children: Vec<_> = tree.children(root).collect();
    assert_eq!(children, vec![first, second]);
    assert_eq!(tree.get(first).unwrap().next_on_line(), Some(second));
    assert_eq!(tree.get(second).unwrap().prev_on_line(), Some(first));
    assert_eq!(tree.get(second).unwrap().parent(), Some(root));
    assert!(tree.check_consistency(root).is_ok());
}

/// Text directly inside the block counts as a text child of the root.
#[test]
fn test_text_flags_propagate_to_ancestors() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();

    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    let flow_box = tree.get(flow).unwrap().flow().unwrap();
    assert!(flow_box.has_text_children());
    assert!(flow_box.has_text_descendants());

    let root_box = tree.get(root).unwrap().flow().unwrap();
    assert!(!root_box.has_text_children());
    assert!(root_box.has_text_descendants());
}

#[test]
fn test_child_inherits_first_line_bit() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    tree.set_first_line(root, true).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();

    assert!(tree.get(leaf).unwrap().flags().first_line);
}

#[test]
fn test_add_to_line_rejects_invalid_attachments() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let other_root = tree.create_root_box().unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    let outer = tree.create_flow_box(span).unwrap();
    let inner = tree.create_flow_box(span).unwrap();

    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();
    assert_eq!(
        tree.add_to_line(root, leaf, &ApproximateMetrics),
        Err(TreeError::AlreadyAttached {
            child: leaf,
            parent: root
        })
    );
    assert_eq!(
        tree.add_to_line(root, other_root, &ApproximateMetrics),
        Err(TreeError::RootCannotBeChild(other_root))
    );
    assert_eq!(
        tree.add_to_line(leaf, outer, &ApproximateMetrics),
        Err(TreeError::NotAFlowBox(leaf))
    );

    tree.add_to_line(outer, inner, &ApproximateMetrics).unwrap();
    assert_eq!(
        tree.add_to_line(inner, outer, &ApproximateMetrics),
        Err(TreeError::WouldCreateCycle(outer))
    );
    assert_eq!(
        tree.add_to_line(outer, outer, &ApproximateMetrics),
        Err(TreeError::WouldCreateCycle(outer))
    );
}

#[test]
fn test_boxes_require_matching_content() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    assert!(matches!(
        tree.create_flow_box(text),
        Err(TreeError::WrongContentKind(_, "flow"))
    ));
    assert!(matches!(
        tree.create_atomic_box(text),
        Err(TreeError::WrongContentKind(_, "atomic"))
    ));
    assert_eq!(
        tree.create_text_box(ContentId(99), 0, 1),
        Err(TreeError::UnknownContent(ContentId(99)))
    );
}

// ---------------------------------------------------------------------------
// Fast path and overflow flags
// ---------------------------------------------------------------------------

#[test]
fn test_atomic_child_clears_same_baseline_fast_path() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let image = tree.content_mut().add_atomic(span, atomic(10.0, 10.0), BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    assert!(tree.get(root).unwrap().flow().unwrap().descendants_have_same_line_height_and_baseline());

    let leaf = tree.create_atomic_box(image).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    assert!(!tree.get(flow).unwrap().flow().unwrap().descendants_have_same_line_height_and_baseline());
    assert!(!tree.get(root).unwrap().flow().unwrap().descendants_have_same_line_height_and_baseline());
}

#[test]
fn test_span_with_different_font_size_leaves_fast_path() {
    let mut tree = new_tree();
    let mut big = BoxStyle::default();
    big.font.size = 32.0;
    let span = tree.content_mut().add_inline(ContentId::BLOCK, big).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();

    assert!(tree.get(flow).unwrap().flow().unwrap().descendants_have_same_line_height_and_baseline());
    assert!(!tree.get(root).unwrap().flow().unwrap().descendants_have_same_line_height_and_baseline());
}

#[test]
fn test_text_shadow_clears_no_overflow_on_ancestors() {
    let mut tree = new_tree();
    let mut shadowed = BoxStyle::default();
    shadowed.text_shadow.push(linebox_layout::style::TextShadow {
        offset_x: 2.0,
        offset_y: 2.0,
        ..Default::default()
    });
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", shadowed).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    assert!(tree.get(flow).unwrap().known_to_have_no_overflow());

    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    assert!(!tree.get(leaf).unwrap().known_to_have_no_overflow());
    assert!(!tree.get(flow).unwrap().known_to_have_no_overflow());
    assert!(!tree.get(root).unwrap().known_to_have_no_overflow());
    assert!(tree.get(root).unwrap().overflow().record().is_none());
}

// ---------------------------------------------------------------------------
// Removal and deletion
// ---------------------------------------------------------------------------

/// Removing the only child leaves an empty child list.
#[test]
fn test_remove_only_child_empties_list() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();

    tree.remove_child(root, leaf, false).unwrap();

    let flow = tree.get(root).unwrap().flow().unwrap();
    assert_eq!(flow.first_child(), None);
    assert_eq!(flow.last_child(), None);
    let leaf_node = tree.get(leaf).unwrap();
    assert_eq!(leaf_node.parent(), None);
    assert_eq!(leaf_node.next_on_line(), None);
    assert_eq!(leaf_node.prev_on_line(), None);
    assert!(tree.check_consistency(root).is_ok());
    assert!(tree.check_consistency(leaf).is_ok());
}

#[test]
fn test_remove_middle_child_relinks_neighbors() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "abc", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let boxes: Vec<_> = (0..3).map(|i| tree.create_text_box(text, i, 1).unwrap()).collect();
    for &leaf in &boxes {
        tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();
    }

    tree.remove(boxes[1], false).unwrap();

    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![boxes[0], boxes[2]]);
    assert_eq!(tree.get(boxes[2]).unwrap().prev_on_line(), Some(boxes[0]));
    assert!(tree.check_consistency(root).is_ok());
}

#[test]
fn test_remove_child_marks_ancestors_dirty() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    tree.remove_child(flow, leaf, true).unwrap();

    assert!(tree.get(flow).unwrap().flags().dirty);
    assert!(tree.get(root).unwrap().flags().dirty);
    assert!(!tree.get(leaf).unwrap().flags().dirty);
}

#[test]
fn test_remove_child_rejects_foreign_box() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();

    assert_eq!(
        tree.remove_child(root, leaf, false),
        Err(TreeError::NotAChild {
            parent: root,
            child: leaf
        })
    );
    // Removing an orphan through `remove` is a no-op.
    assert_eq!(tree.remove(leaf, true), Ok(()));
}

#[test]
fn test_delete_line_frees_subtree_and_content_links() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    tree.delete_line(root).unwrap();

    assert_eq!(tree.live_count(), 0);
    assert!(!tree.contains(leaf));
    assert!(tree.content().get(text).unwrap().line_boxes().is_empty());
    assert!(tree.content().get(span).unwrap().line_boxes().is_empty());
    assert!(tree.lines().is_empty());
}

/// A destroyed slot is reused under a new generation; the old handle stays
/// dead.
#[test]
fn test_stale_handles_are_rejected() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let old = tree.create_text_box(text, 0, 1).unwrap();
    tree.destroy(old).unwrap();

    let new = tree.create_text_box(text, 0, 1).unwrap();
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);
    assert!(tree.get(old).is_none());
    assert_eq!(tree.set_logical_width(old, 5.0), Err(TreeError::StaleHandle(old)));
    assert_eq!(tree.check_consistency(old), Err(ConsistencyError::DanglingHandle(old)));
}

#[test]
fn test_destroy_orphans_children() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "ab", BoxStyle::default()).unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let a = tree.create_text_box(text, 0, 1).unwrap();
    let b = tree.create_text_box(text, 1, 1).unwrap();
    tree.add_to_line(flow, a, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, b, &ApproximateMetrics).unwrap();

    tree.destroy(flow).unwrap();

    assert!(!tree.contains(flow));
    for leaf in [a, b] {
        let node = tree.get(leaf).unwrap();
        assert_eq!(node.parent(), None);
        assert_eq!(node.next_on_line(), None);
        assert_eq!(node.prev_on_line(), None);
    }
}

// ---------------------------------------------------------------------------
// Extraction and construction state
// ---------------------------------------------------------------------------

#[test]
fn test_extract_then_attach_restores_line_box_lists() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    tree.extract_line(root).unwrap();

    for (id, content) in [(root, ContentId::BLOCK), (flow, span), (leaf, text)] {
        assert!(tree.get(id).unwrap().flags().extracted);
        let node = tree.content().get(content).unwrap();
        assert!(node.line_boxes().is_empty());
        assert_eq!(node.extracted_line_boxes(), &[id]);
    }

    tree.attach_line(root).unwrap();

    for (id, content) in [(root, ContentId::BLOCK), (flow, span), (leaf, text)] {
        assert!(!tree.get(id).unwrap().flags().extracted);
        let node = tree.content().get(content).unwrap();
        assert_eq!(node.line_boxes(), &[id]);
        assert!(node.extracted_line_boxes().is_empty());
    }
    assert!(tree.check_consistency(root).is_ok());
}

/// Extracting a box takes the later line boxes of the same element with it.
#[test]
fn test_extract_takes_following_line_boxes() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let first = tree.create_flow_box(span).unwrap();
    let second = tree.create_flow_box(span).unwrap();
    let third = tree.create_flow_box(span).unwrap();

    tree.extract_line(second).unwrap();

    assert_eq!(tree.content().get(span).unwrap().line_boxes(), &[first]);
    assert!(tree.get(third).unwrap().flags().extracted);
    assert!(!tree.get(first).unwrap().flags().extracted);

    tree.attach_line(second).unwrap();
    assert_eq!(tree.content().get(span).unwrap().line_boxes(), &[first, second, third]);
}

#[test]
fn test_set_constructed_is_recursive() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let text = tree.content_mut().add_text(span, "x", BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, leaf, &ApproximateMetrics).unwrap();

    tree.set_constructed(root).unwrap();

    for id in [root, flow, leaf] {
        assert!(tree.get(id).unwrap().flags().constructed);
    }
    let late = tree.create_text_box(text, 0, 1).unwrap();
    assert!(!tree.get(late).unwrap().flags().constructed);
}

#[test]
fn test_bidi_level_is_bounded() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "x", BoxStyle::default()).unwrap();
    let leaf = tree.create_text_box(text, 0, 1).unwrap();

    assert_eq!(tree.set_bidi_level(leaf, 125), Ok(()));
    assert_eq!(tree.set_bidi_level(leaf, 126), Err(TreeError::BidiLevelOutOfRange(126)));
    assert_eq!(tree.get(leaf).unwrap().flags().bidi_level(), 125);
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

struct Line {
    tree: InlineTree,
    root: linebox_layout::BoxId,
    flow: linebox_layout::BoxId,
    leaves: [linebox_layout::BoxId; 4],
}

/// root [ a, span [ b, c ], img ]
fn traversal_line() -> Line {
    let mut tree = new_tree();
    let a_text = tree.content_mut().add_text(ContentId::BLOCK, "a", BoxStyle::default()).unwrap();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let bc_text = tree.content_mut().add_text(span, "bc", BoxStyle::default()).unwrap();
    let img = tree.content_mut().add_atomic(ContentId::BLOCK, atomic(8.0, 8.0), BoxStyle::default()).unwrap();

    let root = tree.create_root_box().unwrap();
    let a = tree.create_text_box(a_text, 0, 1).unwrap();
    let flow = tree.create_flow_box(span).unwrap();
    let b = tree.create_text_box(bc_text, 0, 1).unwrap();
    let c = tree.create_text_box(bc_text, 1, 1).unwrap();
    let d = tree.create_atomic_box(img).unwrap();

    tree.add_to_line(root, a, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, flow, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, b, &ApproximateMetrics).unwrap();
    tree.add_to_line(flow, c, &ApproximateMetrics).unwrap();
    tree.add_to_line(root, d, &ApproximateMetrics).unwrap();
    Line {
        tree,
        root,
        flow,
        leaves: [a, b, c, d],
    }
}

#[test]
fn test_leaf_walk_descends_and_climbs() {
    let Line { tree, root, leaves: [a, b, c, d], .. } = traversal_line();

    assert_eq!(tree.first_leaf_child(root), Some(a));
    assert_eq!(tree.last_leaf_child(root), Some(d));
    assert_eq!(tree.next_leaf_child(a), Some(b));
    assert_eq!(tree.next_leaf_child(c), Some(d));
    assert_eq!(tree.next_leaf_child(d), None);
    assert_eq!(tree.prev_leaf_child(b), Some(a));
    assert_eq!(tree.prev_leaf_child(d), Some(c));
    assert_eq!(tree.prev_leaf_child(a), None);
}

#[test]
fn test_next_on_line_exists_sees_content_after_ancestors() {
    let Line { mut tree, root, flow, leaves: [a, b, c, d] } = traversal_line();
    let mut needs_word_spacing = false;
    let _ = tree.place_boxes_in_inline_direction(root, 0.0, &mut needs_word_spacing);

    assert!(tree.next_on_line_exists(a));
    assert!(tree.next_on_line_exists(flow));
    assert!(tree.next_on_line_exists(b));
    assert!(tree.next_on_line_exists(c));
    assert!(!tree.next_on_line_exists(d));
    assert!(!tree.next_on_line_exists(root));
}

#[test]
fn test_root_of_and_ancestors() {
    let Line { tree, root, flow, leaves: [_, b, ..] } = traversal_line();

    assert_eq!(tree.root_of(b), Some(root));
    assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![b, flow, root]);
}

/// Visual order a b c d at levels 0 1 1 0 reads a c b d logically.
#[test]
fn test_bidi_logical_order_round_trips() {
    let Line { mut tree, root, leaves: [a, b, c, d], .. } = traversal_line();
    tree.set_bidi_level(b, 1).unwrap();
    tree.set_bidi_level(c, 1).unwrap();

    let logical = tree.collect_leaf_boxes_in_logical_order(root);
    assert_eq!(logical, vec![a, c, b, d]);
    assert_eq!(tree.reorder_leaves_visually(&logical), vec![a, b, c, d]);
}

#[test]
fn test_bidi_nested_levels() {
    let Line { mut tree, root, leaves: [a, b, c, d], .. } = traversal_line();
    for (leaf, level) in [(a, 1), (b, 2), (c, 2), (d, 1)] {
        tree.set_bidi_level(leaf, level).unwrap();
    }

    let logical = tree.collect_leaf_boxes_in_logical_order(root);
    assert_eq!(logical, vec![d, b, c, a]);
    assert_eq!(tree.reorder_leaves_visually(&logical), vec![a, b, c, d]);
}

// ---------------------------------------------------------------------------
// Root line data
// ---------------------------------------------------------------------------

#[test]
fn test_line_positions_default_selection_bottom() {
    let mut tree = new_tree();
    let root = tree.create_root_box().unwrap();

    tree.set_line_top_bottom_positions(root, 2.0, 18.0, 0.0, 20.0, None).unwrap();
    let line = tree.root_line(root).unwrap();
    assert_eq!(line.line_top(), 2.0);
    assert_eq!(line.line_bottom(), 18.0);
    assert_eq!(line.line_bottom_with_leading(), 20.0);
    assert_eq!(line.selection_bottom(), 18.0);

    assert_eq!(
        tree.set_line_top_bottom_positions(root, 5.0, 4.0, 0.0, 0.0, None),
        Err(TreeError::InvertedLine { top: 5.0, bottom: 4.0 })
    );
}

#[test]
fn test_selection_top_reaches_previous_line() {
    let mut tree = new_tree();
    let first = tree.create_root_box().unwrap();
    let second = tree.create_root_box().unwrap();
    tree.set_line_top_bottom_positions(first, 0.0, 19.0, 0.0, 19.0, Some(21.0)).unwrap();
    tree.set_line_top_bottom_positions(second, 23.0, 40.0, 19.0, 42.0, None).unwrap();

    assert_eq!(tree.selection_top(first), Ok(0.0));
    assert_eq!(tree.selection_top(second), Ok(21.0));
    assert_eq!(tree.prev_root_box(second), Some(first));
    assert_eq!(tree.next_root_box(first), Some(second));
}

#[test]
fn test_removing_break_object_clears_break_info_on_earlier_lines() {
    let mut tree = new_tree();
    let text = tree.content_mut().add_text(ContentId::BLOCK, "wrapped text", BoxStyle::default()).unwrap();
    let first = tree.create_root_box().unwrap();
    let second = tree.create_root_box().unwrap();
    let tail = tree.create_text_box(text, 8, 4).unwrap();
    tree.add_to_line(second, tail, &ApproximateMetrics).unwrap();
    tree.set_line_break_info(first, Some(text), 8).unwrap();
    tree.set_line_break_info(second, Some(text), 12).unwrap();

    tree.remove(tail, false).unwrap();

    for root in [first, second] {
        let line = tree.root_line(root).unwrap();
        assert_eq!(line.line_break_obj(), None);
        assert_eq!(line.line_break_pos(), 0);
    }
    assert!(tree.get(first).unwrap().flags().dirty);
}

#[test]
fn test_floats_are_allocated_on_first_append() {
    let mut tree = new_tree();
    let float = tree.content_mut().add_atomic(ContentId::BLOCK, atomic(5.0, 5.0), BoxStyle::default()).unwrap();
    let root = tree.create_root_box().unwrap();
    assert_eq!(tree.root_line(root).unwrap().floats(), None);

    tree.append_float(root, float).unwrap();
    tree.mark_dirty(root, true).unwrap();
    tree.append_float(root, float).unwrap();

    assert_eq!(tree.root_line(root).unwrap().floats(), Some(&[float, float][..]));
}

#[test]
fn test_line_data_requires_root() {
    let mut tree = new_tree();
    let span = tree.content_mut().add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
    let flow = tree.create_flow_box(span).unwrap();

    assert_eq!(tree.root_line(flow).err(), Some(TreeError::NotARootBox(flow)));
    assert_eq!(
        tree.set_line_break_info(flow, None, 0),
        Err(TreeError::NotARootBox(flow))
    );
}
