//! Painting a laid-out line.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! A line is painted back to front: each flow box paints its own
//! decorations, then its children in line order. Boxes whose visual
//! overflow misses the dirty rect are skipped with their whole subtree, and
//! children painted in their own layer are left to that layer.

use linebox_layout::error::Result;
use linebox_layout::geometry::{Point, Rect};
use linebox_layout::{BoxId, BoxMetricsProvider, InlineTree};

use crate::painter::paint_box_decoration_background;
use crate::surface::PaintSurface;

/// What to paint and in which mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintInfo {
    /// Dirty rect in the coordinates the offset moves boxes into.
    pub rect: Rect,
    /// No-quirks mode. In quirks mode, decorations of boxes without text are
    /// clipped to the line's top and bottom.
    pub strict_mode: bool,
}

impl PaintInfo {
    /// Paint everything inside `rect` in no-quirks mode.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            strict_mode: true,
        }
    }
}

/// Paint the line whose root box is `root`.
///
/// # Errors
///
/// Returns [`linebox_layout::TreeError::NotARootBox`] if `root` is not a
/// root box.
pub fn paint_line(
    surface: &mut dyn PaintSurface,
    tree: &InlineTree,
    root: BoxId,
    info: &PaintInfo,
    offset: Point,
    line_top: f32,
    line_bottom: f32,
    metrics: &dyn BoxMetricsProvider,
) -> Result<()> {
    let _ = tree.root_line(root)?;
    paint_box(surface, tree, root, info, offset, line_top, line_bottom, metrics);
    Ok(())
}

/// Paint one box and everything under it. Stale handles paint nothing.
pub fn paint_box(
    surface: &mut dyn PaintSurface,
    tree: &InlineTree,
    id: BoxId,
    info: &PaintInfo,
    offset: Point,
    line_top: f32,
    line_bottom: f32,
    metrics: &dyn BoxMetricsProvider,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if node.is_text_box() {
        // Text boxes contribute geometry only.
        return;
    }

    let overflow = tree
        .visual_overflow_rect(id, line_top, line_bottom, metrics)
        .moved_by(offset.x, offset.y);
    if !info.rect.intersects(&overflow.pixel_snapped()) {
        return;
    }

    if node.is_atomic() {
        paint_atomic_decorations(surface, tree, id, offset, metrics);
        return;
    }

    paint_flow_decorations(surface, tree, id, info, offset, line_top, line_bottom, metrics);

    for child in tree.children(id) {
        let is_text = tree.get(child).is_some_and(|child| child.is_text_box());
        if is_text || !tree.has_self_painting_layer(child) {
            paint_box(surface, tree, child, info, offset, line_top, line_bottom, metrics);
        }
    }
}

/// Shadow, background, inset shadow and border of a flow box.
fn paint_flow_decorations(
    surface: &mut dyn PaintSurface,
    tree: &InlineTree,
    id: BoxId,
    info: &PaintInfo,
    offset: Point,
    line_top: f32,
    line_bottom: f32,
    metrics: &dyn BoxMetricsProvider,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let Some(flow) = node.flow() else {
        return;
    };
    let Some(content) = tree.content().get(node.content()) else {
        return;
    };
    let first_line = node.flags().first_line;
    let style = content.style_for(first_line);
    if !style.visible {
        return;
    }

    if node.is_root() {
        // A root box has no decorations of its own; only a ::first-line
        // background distinct from the block's style shows up here.
        if !first_line || content.first_line_style.is_none() {
            return;
        }
    } else if !style.has_box_decoration_background() {
        return;
    }

    let mut frame = tree.frame_rect(id, metrics);
    let constrain = !info.strict_mode
        && !flow.has_text_children()
        && !(flow.descendants_have_same_line_height_and_baseline() && flow.has_text_descendants());
    if constrain {
        frame = constrain_to_line(frame, node.flags().is_horizontal, line_top, line_bottom);
    }
    let rect = frame.moved_by(offset.x, offset.y);

    if node.is_root() {
        crate::painter::paint_fill_layers(surface, rect, style, style.background_color, true, true);
        return;
    }
    paint_box_decoration_background(
        surface,
        rect,
        style,
        &content.style,
        flow.include_logical_left_edge(),
        flow.include_logical_right_edge(),
    );
}

/// Clamp the block-direction extent of `rect` to the line.
fn constrain_to_line(rect: Rect, horizontal: bool, line_top: f32, line_bottom: f32) -> Rect {
    let logical = if horizontal { rect } else { rect.transposed() };
    let bottom = line_bottom.min(logical.max_y());
    let top = line_top.max(logical.y);
    let constrained = Rect::new(logical.x, top, logical.width, bottom - top);
    if horizontal { constrained } else { constrained.transposed() }
}

/// Decorations of an atomic inline drawn in the line's layer.
fn paint_atomic_decorations(
    surface: &mut dyn PaintSurface,
    tree: &InlineTree,
    id: BoxId,
    offset: Point,
    metrics: &dyn BoxMetricsProvider,
) {
    let Some(style) = tree.style(id) else {
        return;
    };
    if !style.visible || !style.has_box_decoration_background() {
        return;
    }
    let Some(content) = tree.get(id).and_then(|node| tree.content().get(node.content())) else {
        return;
    };
    let rect = tree.frame_rect(id, metrics).moved_by(offset.x, offset.y);
    paint_box_decoration_background(surface, rect, style, &content.style, true, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_clamps_block_extent() {
        let rect = Rect::new(5.0, -4.0, 20.0, 30.0);
        assert_eq!(constrain_to_line(rect, true, 0.0, 19.0), Rect::new(5.0, 0.0, 20.0, 19.0));
        let vertical = Rect::new(-4.0, 5.0, 30.0, 20.0);
        assert_eq!(constrain_to_line(vertical, false, 0.0, 19.0), Rect::new(0.0, 5.0, 19.0, 20.0));
    }
}
