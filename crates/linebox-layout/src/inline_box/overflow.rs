//! Overflow bookkeeping and the bottom-up overflow pass.
//!
//! [§ 11.1 Overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow)
//!
//! Two kinds of overflow are tracked per flow box, and for text boxes whose
//! glyphs paint outside their frame:
//!
//! - *visual* overflow: everything that paints, including shadows, outlines
//!   and glyph ink. Used to cull painting.
//! - *layout* overflow: what contributes to the scrollable extent of the
//!   block. Shadows and outlines do not.
//!
//! A record is only allocated when one of the rects reaches past the box's
//! frame (for flow boxes, the frame stretched to the line's top and bottom).

use serde::Serialize;

use crate::geometry::{EdgeSizes, Rect};
use crate::metrics::BoxMetricsProvider;
use crate::style::{BoxStyle, ShadowStyle};

use super::{BoxId, BoxKind, InlineTree, LeafKind};

/// Overflow rectangles of a box, in physical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderOverflow {
    /// Scrollable extent.
    pub layout_overflow: Rect,
    /// Painted extent.
    pub visual_overflow: Rect,
}

impl RenderOverflow {
    pub(crate) fn move_by(&mut self, dx: f32, dy: f32) {
        self.layout_overflow = self.layout_overflow.moved_by(dx, dy);
        self.visual_overflow = self.visual_overflow.moved_by(dx, dy);
    }
}

/// Whether a box can overflow, and what it overflows by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverflowState {
    /// Nothing in this box's subtree can reach outside its frame; the
    /// overflow pass skips it.
    KnownNone,
    /// The box may overflow. `None` until the pass finds a rect that
    /// actually reaches outside the frame.
    Computed(Option<Box<RenderOverflow>>),
}

impl OverflowState {
    /// The overflow record, if one was allocated.
    #[must_use]
    pub fn record(&self) -> Option<&RenderOverflow> {
        match self {
            Self::KnownNone | Self::Computed(None) => None,
            Self::Computed(Some(record)) => Some(record),
        }
    }

    pub(crate) fn record_mut(&mut self) -> Option<&mut RenderOverflow> {
        match self {
            Self::KnownNone | Self::Computed(None) => None,
            Self::Computed(Some(record)) => Some(record),
        }
    }
}

const fn swap_axes_unless(rect: Rect, horizontal: bool) -> Rect {
    if horizontal { rect } else { rect.transposed() }
}

/// Outward reach of the outer box shadows, clamped at zero.
fn box_shadow_outsets(style: &BoxStyle) -> EdgeSizes {
    style
        .box_shadow
        .iter()
        .filter(|shadow| shadow.style == ShadowStyle::Normal)
        .map(crate::style::BoxShadow::extent)
        .fold(EdgeSizes::default(), |acc, extent| EdgeSizes {
            top: acc.top.max(extent.top),
            right: acc.right.max(extent.right),
            bottom: acc.bottom.max(extent.bottom),
            left: acc.left.max(extent.left),
        })
}

/// Text shadow reach as (left, right, top, bottom) offsets from the glyph
/// box. Left and top are non-positive.
fn text_shadow_extent(style: &BoxStyle) -> (f32, f32, f32, f32) {
    style
        .text_shadow
        .iter()
        .fold((0.0_f32, 0.0_f32, 0.0_f32, 0.0_f32), |(left, right, top, bottom), shadow| {
            (
                left.min(shadow.offset_x - shadow.blur_radius),
                right.max(shadow.offset_x + shadow.blur_radius),
                top.min(shadow.offset_y - shadow.blur_radius),
                bottom.max(shadow.offset_y + shadow.blur_radius),
            )
        })
}

impl InlineTree {
    /// Drop the "known to have no overflow" state of a box and of every
    /// ancestor that still claims it.
    pub fn clear_known_to_have_no_overflow(&mut self, id: BoxId) {
        let mut current = Some(id);
        let mut first = true;
        while let Some(box_id) = current {
            let Some(node) = self.get_mut(box_id) else {
                break;
            };
            if !node.known_to_have_no_overflow() && !first {
                break;
            }
            if node.known_to_have_no_overflow() {
                node.overflow = OverflowState::Computed(None);
            }
            first = false;
            current = node.parent;
        }
    }

    /// Logical frame used as the overflow baseline: flow boxes span the
    /// whole line vertically, leaves use their own frame.
    #[must_use]
    pub fn logical_frame_rect_including_line_height(
        &self,
        id: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Rect {
        match self.get(id) {
            Some(node) if node.is_flow() => {
                Rect::new(node.logical_left(), line_top, node.logical_width, line_bottom - line_top)
            }
            Some(_) => self.logical_frame_rect(id, metrics),
            None => Rect::default(),
        }
    }

    /// Store overflow computed in logical coordinates. A record is kept only
    /// if either rect reaches outside the frame.
    pub(crate) fn set_overflow_from_logical_rects(
        &mut self,
        id: BoxId,
        logical_layout: Rect,
        logical_visual: Rect,
        logical_frame: Rect,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.known_to_have_no_overflow() {
            return;
        }
        let horizontal = node.flags.is_horizontal;
        let frame = swap_axes_unless(logical_frame, horizontal);
        let layout = swap_axes_unless(logical_layout, horizontal);
        let visual = swap_axes_unless(logical_visual, horizontal);

        let layout_escapes = !layout.is_empty() && !frame.contains_rect(&layout);
        let visual_escapes = !visual.is_empty() && !frame.contains_rect(&visual);
        node.overflow = if layout_escapes || visual_escapes {
            OverflowState::Computed(Some(Box::new(RenderOverflow {
                layout_overflow: if layout_escapes { layout } else { frame },
                visual_overflow: if visual_escapes { visual } else { frame },
            })))
        } else {
            OverflowState::Computed(None)
        };
    }

    /// Painted extent of a box in logical coordinates.
    #[must_use]
    pub fn logical_visual_overflow_rect(
        &self,
        id: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Rect {
        let Some(node) = self.get(id) else {
            return Rect::default();
        };
        node.overflow.record().map_or_else(
            || self.logical_frame_rect_including_line_height(id, line_top, line_bottom, metrics),
            |record| swap_axes_unless(record.visual_overflow, node.flags.is_horizontal),
        )
    }

    /// Scrollable extent of a box in logical coordinates.
    #[must_use]
    pub fn logical_layout_overflow_rect(
        &self,
        id: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Rect {
        let Some(node) = self.get(id) else {
            return Rect::default();
        };
        node.overflow.record().map_or_else(
            || self.logical_frame_rect_including_line_height(id, line_top, line_bottom, metrics),
            |record| swap_axes_unless(record.layout_overflow, node.flags.is_horizontal),
        )
    }

    /// Painted extent of a box in physical coordinates.
    #[must_use]
    pub fn visual_overflow_rect(
        &self,
        id: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Rect {
        let horizontal = self.get(id).is_none_or(|node| node.flags.is_horizontal);
        swap_axes_unless(
            self.logical_visual_overflow_rect(id, line_top, line_bottom, metrics),
            horizontal,
        )
    }

    /// Scrollable extent of a box in physical coordinates.
    #[must_use]
    pub fn layout_overflow_rect(
        &self,
        id: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Rect {
        let horizontal = self.get(id).is_none_or(|node| node.flags.is_horizontal);
        swap_axes_unless(
            self.logical_layout_overflow_rect(id, line_top, line_bottom, metrics),
            horizontal,
        )
    }

    /// Compute layout and visual overflow for a flow box and its subtree.
    ///
    /// Skips boxes known to have no overflow. Running the pass twice without
    /// a layout in between yields the same records.
    pub fn compute_overflow(
        &mut self,
        flow: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) {
        let Some(node) = self.get_mut(flow) else {
            return;
        };
        if node.known_to_have_no_overflow() || !node.is_flow() {
            return;
        }
        node.overflow = OverflowState::Computed(None);
        let is_root = node.is_root();
        let horizontal = node.flags.is_horizontal;

        #[cfg(feature = "layout-trace")]
        let _depth = {
            let guard = crate::trace::DepthGuard::enter();
            eprintln!("[OVERFLOW] {}flow {flow} line {line_top}..{line_bottom}", guard.indent());
            guard
        };

        let frame = self.logical_frame_rect_including_line_height(flow, line_top, line_bottom, metrics);
        let mut layout_overflow = frame.enclosing();
        let mut visual_overflow = layout_overflow;

        if !is_root {
            if let Some(style) = self.style(flow) {
                let outsets = box_shadow_outsets(style);
                let (mut shadow_top, mut shadow_bottom) =
                    (outsets.logical_top(horizontal), outsets.logical_bottom(horizontal));
                if style.writing_mode.is_flipped_lines() {
                    std::mem::swap(&mut shadow_top, &mut shadow_bottom);
                }
                let shadowed = Rect::new(
                    visual_overflow.x - outsets.logical_left(horizontal),
                    visual_overflow.y - shadow_top,
                    visual_overflow.width + outsets.logical_left(horizontal) + outsets.logical_right(horizontal),
                    visual_overflow.height + shadow_top + shadow_bottom,
                );
                visual_overflow = visual_overflow.unite(&shadowed);

                if style.has_outline() {
                    let extent = style.outline.map_or(0.0, |outline| outline.extent());
                    visual_overflow = visual_overflow.unite(&visual_overflow.inflate(extent));
                }
            }
        }

        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if self.is_out_of_flow(child) {
                continue;
            }
            let Some(child_node) = self.get(child) else {
                continue;
            };
            match &child_node.kind {
                BoxKind::Leaf(LeafKind::Text { is_text: false, .. }) => {}
                BoxKind::Leaf(LeafKind::Text { .. }) => {
                    let text_frame = self.logical_frame_rect(child, metrics).enclosing();
                    let text_overflow = self.text_box_visual_overflow(child, text_frame, metrics);
                    visual_overflow = visual_overflow.unite(&text_overflow);
                }
                BoxKind::Flow(_) | BoxKind::Root(_) => {
                    self.compute_overflow(child, line_top, line_bottom, metrics);
                    if !self.has_self_painting_layer(child) {
                        let child_visual = self.logical_visual_overflow_rect(child, line_top, line_bottom, metrics);
                        visual_overflow = visual_overflow.unite(&child_visual);
                    }
                    let (dx, dy) = self.relative_logical_offset(child);
                    let child_layout = self
                        .logical_layout_overflow_rect(child, line_top, line_bottom, metrics)
                        .moved_by(dx, dy);
                    layout_overflow = layout_overflow.unite(&child_layout);
                }
                BoxKind::Leaf(LeafKind::Atomic) => {
                    let (visual, layout) = self.atomic_child_overflow(child);
                    if !self.has_self_painting_layer(child) {
                        visual_overflow = visual_overflow.unite(&visual);
                    }
                    layout_overflow = layout_overflow.unite(&layout);
                }
            }
        }

        self.set_overflow_from_logical_rects(flow, layout_overflow, visual_overflow, frame);
    }

    /// Ink extent of a text box (stroke, glyph overflow, emphasis marks,
    /// negative letter spacing, text shadow) in logical coordinates. Stores
    /// it on the text box and returns it.
    fn text_box_visual_overflow(&mut self, text: BoxId, text_frame: Rect, metrics: &dyn BoxMetricsProvider) -> Rect {
        let Some(node) = self.get(text) else {
            return text_frame;
        };
        if node.known_to_have_no_overflow() {
            return text_frame;
        }
        let glyph = node.text_run().map(|run| run.glyph_overflow).unwrap_or_default();
        let Some(style) = self.style(text) else {
            return text_frame;
        };

        let stroke = (style.text_stroke_width / 2.0).ceil();
        let mut top = -stroke - glyph.top;
        let bottom = stroke + glyph.bottom;
        let left = -stroke - glyph.left;
        let mut right = stroke + glyph.right;

        if style.text_emphasis_mark != crate::style::TextEmphasisMark::None {
            let emphasis_height = (style.font.size / 2.0).round();
            top = top.min(-emphasis_height);
        }
        right -= style.font.letter_spacing.min(0.0);

        let (shadow_left, shadow_right, shadow_top, shadow_bottom) = text_shadow_extent(style);
        let child_left = (shadow_left + left).min(left);
        let child_right = (shadow_right + right).max(right);
        let child_top = (shadow_top + top).min(top);
        let child_bottom = (shadow_bottom + bottom).max(bottom);

        let snapped = self.logical_frame_rect(text, metrics).pixel_snapped();
        let ink = Rect::new(
            snapped.x + child_left,
            snapped.y + child_top,
            snapped.width + child_right - child_left,
            snapped.height + child_bottom - child_top,
        )
        .unite(&text_frame);

        self.set_overflow_from_logical_rects(text, text_frame, ink, text_frame);
        ink
    }

    /// Visual and layout overflow of an atomic inline, placed at its box in
    /// logical coordinates. The layout rect also carries the box's relative
    /// offset.
    fn atomic_child_overflow(&self, child: BoxId) -> (Rect, Rect) {
        let Some(node) = self.get(child) else {
            return (Rect::default(), Rect::default());
        };
        let horizontal = node.flags.is_horizontal;
        let (left, top) = (node.logical_left(), node.logical_top());
        let (dx, dy) = self.relative_logical_offset(child);
        self.content
            .get(node.content())
            .and_then(|content| content.as_atomic())
            .map_or((Rect::default(), Rect::default()), |atomic| {
                let visual = swap_axes_unless(atomic.visual_overflow_rect(), horizontal).moved_by(left, top);
                let layout = swap_axes_unless(atomic.layout_overflow_rect(), horizontal)
                    .moved_by(left, top)
                    .moved_by(dx, dy);
                (visual, layout)
            })
    }

    /// Relative-position offset of a box's content, in logical coordinates.
    fn relative_logical_offset(&self, id: BoxId) -> (f32, f32) {
        let Some(node) = self.get(id) else {
            return (0.0, 0.0);
        };
        let offset = self
            .content
            .get(node.content())
            .map(|content| content.relative_offset)
            .unwrap_or_default();
        if node.flags.is_horizontal {
            (offset.x, offset.y)
        } else {
            (offset.y, offset.x)
        }
    }
}
