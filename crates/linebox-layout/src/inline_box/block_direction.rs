//! Placement along the block direction: baseline alignment.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of each inline-level box in the line box is calculated ...
//! The inline-level boxes are aligned vertically according to their
//! 'vertical-align' property ... The line box height is the distance
//! between the uppermost box top and the lowermost box bottom."
//!
//! Alignment runs in two passes over the line:
//!
//! 1. [`InlineTree::compute_logical_box_heights`] stores, in each box's
//!    logical top, the offset of its baseline from the root baseline, and
//!    collects the maximum ascent and descent around the root baseline.
//! 2. [`InlineTree::place_boxes_in_block_direction`] turns those offsets into
//!    final positions and records the line's top and bottom.
//!
//! Boxes aligned `top` or `bottom` are measured separately and can stretch
//! the line after the fact.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::metrics::{BoxMetricsProvider, FontBaseline};
use crate::style::VerticalAlign;

use super::{BoxId, InlineTree};

/// Settings for one block-direction alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// No-quirks mode. In quirks mode, inline boxes without text or inline
    /// border/padding do not stretch the line.
    pub strict_mode: bool,
    /// Baseline the line aligns on.
    pub baseline: FontBaseline,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            baseline: FontBaseline::Alphabetic,
        }
    }
}

/// Running maxima of the first alignment pass, relative to the root
/// baseline. Ascent and descent may be negative; the `set_*` flags record
/// whether a value was taken yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LineHeights {
    /// Tallest `vertical-align: top` box.
    pub max_position_top: f32,
    /// Tallest `vertical-align: bottom` box.
    pub max_position_bottom: f32,
    /// Highest point above the root baseline.
    pub max_ascent: f32,
    /// Lowest point below the root baseline.
    pub max_descent: f32,
    /// `max_ascent` holds a value.
    pub set_max_ascent: bool,
    /// `max_descent` holds a value.
    pub set_max_descent: bool,
}

impl LineHeights {
    fn take_ascent(&mut self, ascent: f32) {
        if self.max_ascent < ascent || !self.set_max_ascent {
            self.max_ascent = ascent;
            self.set_max_ascent = true;
        }
    }

    fn take_descent(&mut self, descent: f32) {
        if self.max_descent < descent || !self.set_max_descent {
            self.max_descent = descent;
            self.set_max_descent = true;
        }
    }
}

/// Line bounds collected while placing boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BlockExtent {
    /// Top of the highest box that affects the line bounds.
    pub line_top: f32,
    /// Bottom of the lowest box that affects the line bounds.
    pub line_bottom: f32,
    /// `line_top` including the margins of atomic inlines.
    pub line_top_including_margins: f32,
    /// `line_bottom` including the margins of atomic inlines.
    pub line_bottom_including_margins: f32,
    /// Bottom of the selection highlight.
    pub selection_bottom: f32,
    /// `line_top` holds a value.
    pub set_line_top: bool,
}

impl BlockExtent {
    /// Start collecting at the given block offset.
    #[must_use]
    pub const fn starting_at(top: f32) -> Self {
        Self {
            line_top: top,
            line_bottom: top,
            line_top_including_margins: top,
            line_bottom_including_margins: top,
            selection_bottom: top,
            set_line_top: false,
        }
    }

    fn include(&mut self, top: f32, height: f32, top_with_margins: f32, height_with_margins: f32) {
        if self.set_line_top {
            self.line_top = self.line_top.min(top);
            self.line_top_including_margins = self
                .line_top
                .min(self.line_top_including_margins.min(top_with_margins));
        } else {
            self.set_line_top = true;
            self.line_top = top;
            self.line_top_including_margins = self.line_top.min(top_with_margins);
        }
        self.selection_bottom = self.selection_bottom.max(top + height);
        self.line_bottom = self.line_bottom.max(top + height);
        self.line_bottom_including_margins = self
            .line_bottom
            .max(self.line_bottom_including_margins.max(top_with_margins + height_with_margins));
    }
}

impl InlineTree {
    fn is_top_or_bottom(align: VerticalAlign) -> bool {
        matches!(align, VerticalAlign::Top | VerticalAlign::Bottom)
    }

    /// Offset of a box's baseline from the root baseline, positive downward.
    ///
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    ///
    /// Text follows its parent box. Boxes aligned `top` or `bottom` report 0
    /// and are placed against the line box later. Everything else starts
    /// from the parent box's offset (unless the parent is the line itself or
    /// is aligned `top`/`bottom`) and applies its keyword against the parent
    /// element's font.
    #[must_use]
    pub fn vertical_position_for_box(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> f32 {
        let Some(node) = self.get(id) else {
            return 0.0;
        };
        let parent_top = node.parent.and_then(|parent| self.get(parent)).map_or(0.0, super::InlineBox::logical_top);
        if node.is_text_box() {
            return parent_top;
        }
        let align = self.vertical_align(id);
        if Self::is_top_or_bottom(align) {
            return 0.0;
        }

        let first_line = node.flags.first_line;
        let content_parent = self.content.parent(node.content());
        let Some(parent_style) = content_parent.and_then(|parent| self.content.style(parent, first_line)) else {
            return 0.0;
        };
        let parent_is_inline = content_parent
            .and_then(|parent| self.content.get(parent))
            .is_some_and(crate::content::ContentNode::is_inline);

        let mut position = 0.0;
        if parent_is_inline && !Self::is_top_or_bottom(parent_style.vertical_align) {
            position = parent_top;
        }
        if align == VerticalAlign::Baseline {
            return position;
        }

        let baseline_type = self.baseline_type(id);
        let parent_font = metrics.font_metrics(parent_style);
        let font_size = parent_style.font.size.round();
        let line_height = self.line_height(id, metrics);
        let baseline = self.baseline_position(id, metrics);

        match align {
            VerticalAlign::Sub => position += (font_size / 5.0).floor() + 1.0,
            VerticalAlign::Super => position -= (font_size / 3.0).floor() + 1.0,
            VerticalAlign::TextTop => position += baseline - parent_font.ascent_for(baseline_type),
            VerticalAlign::Middle => {
                position = (position - parent_font.x_height / 2.0 - (line_height / 2.0).trunc() + baseline).round();
            }
            VerticalAlign::TextBottom => {
                position += parent_font.descent_for(baseline_type);
                let replaced = self
                    .content
                    .get(node.content())
                    .and_then(crate::content::ContentNode::as_atomic)
                    .is_some_and(|atomic| atomic.replaced);
                if !replaced {
                    position -= line_height - baseline;
                }
            }
            VerticalAlign::Length(length) => position -= length,
            VerticalAlign::Baseline | VerticalAlign::Top | VerticalAlign::Bottom => {}
        }
        position
    }

    /// Ascent and descent of a box (including leading) and whether its font
    /// box reaches above and below the root baseline. Atomic inlines always
    /// affect both.
    fn ascent_and_descent_for_box(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> (f32, f32, bool, bool) {
        let Some(node) = self.get(id) else {
            return (0.0, 0.0, false, false);
        };
        let ascent = self.baseline_position(id, metrics);
        let descent = self.line_height(id, metrics) - ascent;
        if node.is_atomic() {
            return (ascent, descent, true, true);
        }
        if node.is_text_box() && !node.is_text() {
            return (ascent, descent, false, false);
        }
        let top = node.logical_top();
        let baseline_type = self.baseline_type(id);
        let font = self.style(id).map(|style| metrics.font_metrics(style)).unwrap_or_default();
        let affects_ascent = font.ascent_for(baseline_type) - top > 0.0;
        let affects_descent = font.descent_for(baseline_type) + top > 0.0;
        (ascent, descent, affects_ascent, affects_descent)
    }

    fn reset_logical_tops(&mut self, flow: BoxId) {
        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.set_logical_top(0.0);
            }
            self.reset_logical_tops(child);
        }
    }

    /// First alignment pass: store each box's baseline offset in its logical
    /// top and collect the line's maximum ascent and descent into `heights`.
    ///
    /// The root folds in its own strut in strict mode, or when it has text.
    /// Subtrees on the same-line-height fast path are not visited; they are
    /// placed with a single offset by the second pass.
    pub fn compute_logical_box_heights(
        &mut self,
        flow: BoxId,
        heights: &mut LineHeights,
        strict_mode: bool,
        metrics: &dyn BoxMetricsProvider,
    ) {
        let Some(node) = self.get(flow) else {
            return;
        };
        let Some(flow_box) = node.flow() else {
            return;
        };
        let is_root = node.is_root();
        let check_children = !flow_box.descendants_have_same_line_height_and_baseline;
        let has_text_children = flow_box.has_text_children;
        let has_text_descendants = flow_box.has_text_descendants;

        if is_root {
            if let Some(node) = self.get_mut(flow) {
                node.set_logical_top(0.0);
            }
            let (ascent, descent, _, _) = self.ascent_and_descent_for_box(flow, metrics);
            if strict_mode || has_text_children || (!check_children && has_text_descendants) {
                heights.take_ascent(ascent);
                heights.take_descent(descent);
            }
        }

        if !check_children {
            self.reset_logical_tops(flow);
            return;
        }

        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if self.is_out_of_flow(child) {
                continue;
            }
            let position = self.vertical_position_for_box(child, metrics);
            if let Some(node) = self.get_mut(child) {
                node.set_logical_top(position);
            }

            let (mut ascent, mut descent, affects_ascent, affects_descent) =
                self.ascent_and_descent_for_box(child, metrics);
            let box_height = ascent + descent;
            let child_flow = self.get(child).and_then(super::InlineBox::flow).cloned();

            match self.vertical_align(child) {
                VerticalAlign::Top => heights.max_position_top = heights.max_position_top.max(box_height),
                VerticalAlign::Bottom => heights.max_position_bottom = heights.max_position_bottom.max(box_height),
                _ => {
                    let contributes = child_flow.as_ref().is_none_or(|child_flow| {
                        strict_mode
                            || child_flow.has_text_children
                            || (child_flow.descendants_have_same_line_height_and_baseline
                                && child_flow.has_text_descendants)
                            || self
                                .style(child)
                                .is_some_and(crate::style::BoxStyle::has_inline_direction_borders_or_padding)
                    });
                    if contributes {
                        ascent -= position;
                        descent += position;
                        if affects_ascent {
                            heights.take_ascent(ascent);
                        }
                        if affects_descent {
                            heights.take_descent(descent);
                        }
                    }
                }
            }

            if child_flow.is_some() {
                self.compute_logical_box_heights(child, heights, strict_mode, metrics);
            }
        }
    }

    /// Stretch the maxima so `top`/`bottom` aligned boxes fit.
    fn adjust_max_ascent_and_descent(&self, flow: BoxId, heights: &mut LineHeights, metrics: &dyn BoxMetricsProvider) {
        let max_position = heights.max_position_top.max(heights.max_position_bottom);
        for child in self.children(flow) {
            if self.is_out_of_flow(child) {
                continue;
            }
            let align = self.vertical_align(child);
            if Self::is_top_or_bottom(align) {
                let line_height = self.line_height(child, metrics);
                if heights.max_ascent + heights.max_descent < line_height {
                    if align == VerticalAlign::Top {
                        heights.max_descent = line_height - heights.max_ascent;
                    } else {
                        heights.max_ascent = line_height - heights.max_descent;
                    }
                }
                if heights.max_ascent + heights.max_descent >= max_position {
                    break;
                }
            }
            if self.get(child).is_some_and(super::InlineBox::is_flow) {
                self.adjust_max_ascent_and_descent(child, heights, metrics);
            }
        }
    }

    /// Second alignment pass: turn baseline offsets into logical tops,
    /// starting at `top`, and collect the line bounds into `extent`.
    #[allow(clippy::too_many_lines)]
    pub fn place_boxes_in_block_direction(
        &mut self,
        flow: BoxId,
        top: f32,
        max_height: f32,
        max_ascent: f32,
        strict_mode: bool,
        extent: &mut BlockExtent,
        metrics: &dyn BoxMetricsProvider,
    ) {
        let Some(node) = self.get(flow) else {
            return;
        };
        let Some(flow_box) = node.flow() else {
            return;
        };
        let is_root = node.is_root();
        let has_parent = node.parent.is_some();
        let same_baseline = flow_box.descendants_have_same_line_height_and_baseline;
        let has_text_children = flow_box.has_text_children;
        let has_text_descendants = flow_box.has_text_descendants;
        let baseline_type = self.baseline_type(flow);

        #[cfg(feature = "layout-trace")]
        let trace_depth = {
            let guard = crate::trace::DepthGuard::enter();
            eprintln!("[BLOCK] {}flow {flow} top {top} max_ascent {max_ascent}", guard.indent());
            guard
        };

        if is_root {
            let ascent = self
                .style(flow)
                .map_or(0.0, |style| metrics.font_metrics(style).ascent_for(baseline_type));
            if let Some(node) = self.get_mut(flow) {
                node.set_logical_top((top + max_ascent - ascent).round());
            }
        }

        let mut same_baseline_adjustment = 0.0;
        if same_baseline {
            same_baseline_adjustment = self.get(flow).map_or(0.0, super::InlineBox::logical_top);
            if has_parent {
                same_baseline_adjustment += self
                    .style(flow)
                    .map_or(0.0, crate::style::BoxStyle::border_and_padding_before);
            }
        }

        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if self.is_out_of_flow(child) {
                continue;
            }
            if same_baseline {
                self.adjust_block_direction_position(child, same_baseline_adjustment);
                continue;
            }
            let Some(child_node) = self.get(child) else {
                continue;
            };
            let child_flow = child_node.flow().cloned();
            let child_is_text_box = child_node.is_text_box();
            let child_is_atomic = child_node.is_atomic();
            let horizontal = child_node.flags.is_horizontal;
            let mut child_top = child_node.logical_top();

            let mut affects_bounds = true;
            match self.vertical_align(child) {
                VerticalAlign::Top => child_top = top,
                VerticalAlign::Bottom => child_top = top + max_height - self.line_height(child, metrics),
                _ => {
                    if !strict_mode {
                        if let Some(child_flow) = &child_flow {
                            let has_borders = self
                                .style(child)
                                .is_some_and(crate::style::BoxStyle::has_inline_direction_borders_or_padding);
                            if !child_flow.has_text_children
                                && !has_borders
                                && !(child_flow.descendants_have_same_line_height_and_baseline
                                    && child_flow.has_text_descendants)
                            {
                                affects_bounds = false;
                            }
                        }
                    }
                    child_top += top + max_ascent - self.baseline_position(child, metrics);
                }
            }

            let mut new_top = child_top;
            let mut new_top_with_margins = new_top;
            let box_height = self.logical_height(child, metrics);
            let mut box_height_with_margins = box_height;

            // Line breaks too, so they line up with text in the same font.
            if child_is_text_box || child_flow.is_some() {
                if let Some(style) = self.style(child) {
                    let font_ascent = metrics.font_metrics(style).ascent_for(baseline_type);
                    new_top += self.baseline_position(child, metrics) - font_ascent;
                    if child_flow.is_some() {
                        new_top -= style.border_and_padding_before();
                    }
                }
                new_top_with_margins = new_top;
            } else if child_is_atomic {
                let (over, under) = self.style(child).map_or((0.0, 0.0), |style| {
                    (style.margin.logical_top(horizontal), style.margin.logical_bottom(horizontal))
                });
                new_top_with_margins = new_top;
                new_top += over;
                box_height_with_margins += over + under;
            }

            if let Some(node) = self.get_mut(child) {
                node.set_logical_top(new_top);
            }

            if affects_bounds {
                extent.include(new_top, box_height, new_top_with_margins, box_height_with_margins);
            }

            if child_flow.is_some() {
                self.place_boxes_in_block_direction(child, top, max_height, max_ascent, strict_mode, extent, metrics);
            }
        }

        if is_root {
            if strict_mode || has_text_children || (same_baseline && has_text_descendants) {
                let root_top = self.get(flow).map_or(0.0, super::InlineBox::logical_top).round();
                let root_bottom = self.logical_bottom(flow, metrics).round();
                if extent.set_line_top {
                    extent.line_top = extent.line_top.min(root_top);
                    extent.line_top_including_margins = extent.line_top.min(extent.line_top_including_margins);
                } else {
                    extent.set_line_top = true;
                    extent.line_top = root_top;
                    extent.line_top_including_margins = root_top;
                }
                extent.selection_bottom = extent.selection_bottom.max(root_bottom);
                extent.line_bottom = extent.line_bottom.max(root_bottom);
                extent.line_bottom_including_margins = extent.line_bottom.max(extent.line_bottom_including_margins);
            }

            let flipped = self
                .style(flow)
                .is_some_and(|style| style.writing_mode.is_flipped_lines());
            if flipped {
                self.flip_lines_in_block_direction(
                    flow,
                    extent.line_top_including_margins,
                    extent.line_bottom_including_margins,
                    metrics,
                );
            }
        }

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[BLOCK] {}flow {flow} line {}..{}",
            trace_depth.indent(),
            extent.line_top,
            extent.line_bottom
        );
    }

    /// Mirror every box so its top is measured from the line bottom.
    fn flip_lines_in_block_direction(
        &mut self,
        flow: BoxId,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) {
        let height = self.logical_height(flow, metrics);
        if let Some(node) = self.get_mut(flow) {
            let flipped = line_bottom - (node.logical_top() - line_top) - height;
            node.set_logical_top(flipped);
        }
        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if self.is_out_of_flow(child) {
                continue;
            }
            if self.get(child).is_some_and(super::InlineBox::is_flow) {
                self.flip_lines_in_block_direction(child, line_top, line_bottom, metrics);
            } else {
                let height = self.logical_height(child, metrics);
                if let Some(node) = self.get_mut(child) {
                    let flipped = line_bottom - (node.logical_top() - line_top) - height;
                    node.set_logical_top(flipped);
                }
            }
        }
    }

    /// Align every box of a line in the block direction and record the
    /// line's bounds on the root. Returns the block offset where the next
    /// line starts.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn align_boxes_in_block_direction(
        &mut self,
        root: BoxId,
        height_of_block: f32,
        config: LayoutConfig,
        metrics: &dyn BoxMetricsProvider,
    ) -> Result<f32> {
        if !self.node(root)?.is_root() {
            return Err(TreeError::NotARootBox(root));
        }
        {
            let node = self.node_mut(root)?;
            if let Some(line) = node.line_data_mut() {
                line.baseline_type = config.baseline;
                line.max_logical_top = None;
            }
        }

        let mut heights = LineHeights::default();
        self.compute_logical_box_heights(root, &mut heights, config.strict_mode, metrics);
        if heights.max_ascent + heights.max_descent < heights.max_position_top.max(heights.max_position_bottom) {
            self.adjust_max_ascent_and_descent(root, &mut heights, metrics);
        }

        let max_height = heights.max_ascent + heights.max_descent;
        let mut extent = BlockExtent::starting_at(height_of_block);
        self.place_boxes_in_block_direction(
            root,
            height_of_block,
            max_height,
            heights.max_ascent,
            config.strict_mode,
            &mut extent,
            metrics,
        );

        let max_height = max_height.max(0.0);
        self.set_line_top_bottom_positions(
            root,
            extent.line_top,
            extent.line_bottom,
            height_of_block,
            height_of_block + max_height,
            Some(extent.selection_bottom),
        )?;
        self.invalidate_max_logical_top(root);
        Ok(height_of_block + max_height)
    }
}
