//! Placement along the line direction.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."

use crate::content::ContentId;
use crate::style::BoxDecorationBreak;

use super::{BoxId, BoxKind, InlineTree, LeafKind};

impl InlineTree {
    /// Decide, for every flow box under `flow`, whether it draws its
    /// border, padding and margin at the start and end of the line
    /// direction.
    ///
    /// A box split over several lines only opens on the line where its
    /// element starts and closes on the line where it ends (mirrored for
    /// right-to-left), unless `box-decoration-break: clone` repeats the
    /// decorations on every fragment. Root boxes never have edges.
    ///
    /// - `last_line`: this is the last line of the block.
    /// - `is_logically_last_run_wrapped`: the last run on the line continues
    ///   on the next line.
    /// - `logically_last_run`: content of the last run on the line.
    pub fn determine_spacing_for_flow_boxes(
        &mut self,
        flow: BoxId,
        last_line: bool,
        is_logically_last_run_wrapped: bool,
        logically_last_run: Option<ContentId>,
    ) {
        let Some(node) = self.get(flow) else {
            return;
        };
        if node.is_leaf() {
            return;
        }
        let mut include_left = false;
        let mut include_right = false;

        if node.parent.is_some() {
            let content = node.content();
            if let (Some(content_node), Some(style)) = (self.content.get(content), self.style(flow)) {
                let ltr = style.is_left_to_right();
                let clone = style.box_decoration_break == BoxDecorationBreak::Clone;
                let line_boxes = content_node.line_boxes();
                let position = line_boxes.iter().position(|&other| other == flow);
                let is_constructed =
                    |id: Option<BoxId>| id.and_then(|id| self.get(id)).is_some_and(|node| node.flags.constructed);

                if !is_constructed(content_node.first_line_box()) {
                    if clone {
                        include_left = true;
                        include_right = true;
                    } else if ltr && content_node.first_line_box() == Some(flow) {
                        include_left = true;
                    } else if !ltr && content_node.last_line_box() == Some(flow) {
                        include_right = true;
                    }
                }

                if !is_constructed(content_node.last_line_box()) {
                    let is_last_object_on_line = logically_last_run.is_none_or(|last_run| {
                        !self.content.is_ancestor_within_block(content, last_run)
                            || (self.content.is_last_child_for(content, last_run) && !is_logically_last_run_wrapped)
                    });
                    let next_line_box = position.and_then(|index| line_boxes.get(index + 1).copied());
                    let prev_line_box = position
                        .and_then(|index| index.checked_sub(1))
                        .and_then(|index| line_boxes.get(index).copied());

                    if clone {
                        include_left = true;
                        include_right = true;
                    } else if ltr {
                        if next_line_box.is_none() && (last_line || is_last_object_on_line) {
                            include_right = true;
                        }
                    } else if (prev_line_box.is_none() || is_constructed(prev_line_box))
                        && (last_line || is_last_object_on_line)
                    {
                        include_left = true;
                    }
                }
            }
        }

        if let Some(flow_box) = self.get_mut(flow).and_then(super::InlineBox::flow_mut) {
            flow_box.include_logical_left_edge = include_left;
            flow_box.include_logical_right_edge = include_right;
        }

        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            if self.get(child).is_some_and(super::InlineBox::is_flow) {
                self.determine_spacing_for_flow_boxes(
                    child,
                    last_line,
                    is_logically_last_run_wrapped,
                    logically_last_run,
                );
            }
        }
    }

    /// Border plus padding at the start of the line, or 0 when the edge is
    /// not drawn on this fragment.
    pub(crate) fn border_and_padding_logical_left(&self, flow: BoxId) -> f32 {
        match self.get(flow) {
            Some(node) if !node.is_root() && node.flow().is_some_and(|f| f.include_logical_left_edge) => {
                self.style(flow).map_or(0.0, crate::style::BoxStyle::border_and_padding_logical_left)
            }
            _ => 0.0,
        }
    }

    /// Border plus padding at the end of the line, or 0 when the edge is
    /// not drawn on this fragment.
    pub(crate) fn border_and_padding_logical_right(&self, flow: BoxId) -> f32 {
        match self.get(flow) {
            Some(node) if !node.is_root() && node.flow().is_some_and(|f| f.include_logical_right_edge) => {
                self.style(flow).map_or(0.0, crate::style::BoxStyle::border_and_padding_logical_right)
            }
            _ => 0.0,
        }
    }

    /// Start margin of a flow box, honoring the left-edge flag.
    pub(crate) fn margin_logical_left(&self, flow: BoxId) -> f32 {
        match self.get(flow) {
            Some(node) if node.flow().is_some_and(|f| f.include_logical_left_edge) => self
                .style(flow)
                .map_or(0.0, |style| style.margin.logical_left(node.flags.is_horizontal)),
            _ => 0.0,
        }
    }

    /// End margin of a flow box, honoring the right-edge flag.
    pub(crate) fn margin_logical_right(&self, flow: BoxId) -> f32 {
        match self.get(flow) {
            Some(node) if node.flow().is_some_and(|f| f.include_logical_right_edge) => self
                .style(flow)
                .map_or(0.0, |style| style.margin.logical_right(node.flags.is_horizontal)),
            _ => 0.0,
        }
    }

    /// Place the children of `flow` one after another starting at
    /// `logical_left`, and return the logical right edge of `flow`.
    ///
    /// `needs_word_spacing` threads through the whole line: a text run that
    /// starts with a space after a run that ended with a non-space gets the
    /// style's `word-spacing` before it. Atomic inlines count as ending in a
    /// non-space.
    ///
    /// Out-of-flow children get a static position but take no room. In
    /// right-to-left content that position is measured from the block's
    /// right edge.
    ///
    /// Children that end up outside `flow`'s own span clear its no-overflow
    /// state.
    pub fn place_boxes_in_inline_direction(
        &mut self,
        flow: BoxId,
        logical_left: f32,
        needs_word_spacing: &mut bool,
    ) -> f32 {
        let Some(node) = self.get(flow) else {
            return logical_left;
        };
        if node.is_root() {
            self.refresh_next_on_line_exists(flow);
        }

        #[cfg(feature = "layout-trace")]
        let trace_depth = {
            let guard = crate::trace::DepthGuard::enter();
            eprintln!("[INLINE] {}flow {flow} at {logical_left}", guard.indent());
            guard
        };

        if let Some(node) = self.get_mut(flow) {
            node.set_logical_left(logical_left);
        }
        let start = logical_left;
        let mut left = logical_left + self.border_and_padding_logical_left(flow);
        let mut min_left = start;
        let mut max_right = left;

        let children: Vec<BoxId> = self.children(flow).collect();
        for child in children {
            let tracks_overflow = self.get(flow).is_some_and(super::InlineBox::known_to_have_no_overflow);
            let Some(child_node) = self.get(child) else {
                continue;
            };
            match &child_node.kind {
                BoxKind::Leaf(LeafKind::Text { run, .. }) => {
                    let run = *run;
                    let first_line = child_node.flags.first_line;
                    let content = child_node.content();
                    let text = self
                        .content
                        .get(content)
                        .and_then(crate::content::ContentNode::as_text)
                        .and_then(|text| run.start.checked_add(run.len).and_then(|end| text.get(run.start..end)))
                        .unwrap_or_default();
                    let mut space = 0.0;
                    if let (Some(first), Some(last)) = (text.chars().next(), text.chars().next_back()) {
                        if *needs_word_spacing && first.is_whitespace() {
                            space = self
                                .content
                                .style(content, first_line)
                                .map_or(0.0, |style| style.font.word_spacing);
                        }
                        *needs_word_spacing = !last.is_whitespace();
                    }
                    left += space;
                    let width = child_node.logical_width;
                    if let Some(node) = self.get_mut(child) {
                        node.set_logical_left(left);
                    }
                    if tracks_overflow {
                        min_left = min_left.min(left);
                    }
                    left += width;
                    if tracks_overflow {
                        max_right = max_right.max(left);
                    }
                }
                _ if self.is_out_of_flow(child) => {
                    let content = child_node.content();
                    let ltr = self
                        .content
                        .parent(content)
                        .and_then(|parent| self.content.style(parent, false))
                        .is_none_or(crate::style::BoxStyle::is_left_to_right);
                    let position = if ltr {
                        left
                    } else {
                        self.content.block_logical_width() - left
                    };
                    if let Some(node) = self.get_mut(child) {
                        node.set_logical_left(position);
                    }
                }
                BoxKind::Flow(_) | BoxKind::Root(_) => {
                    left += self.margin_logical_left(child);
                    if tracks_overflow {
                        min_left = min_left.min(left);
                    }
                    left = self.place_boxes_in_inline_direction(child, left, needs_word_spacing);
                    if tracks_overflow {
                        max_right = max_right.max(left);
                    }
                    left += self.margin_logical_right(child);
                }
                BoxKind::Leaf(LeafKind::Atomic) => {
                    let horizontal = child_node.flags.is_horizontal;
                    let width = child_node.logical_width;
                    let (margin_left, margin_right) = self.style(child).map_or((0.0, 0.0), |style| {
                        (style.margin.logical_left(horizontal), style.margin.logical_right(horizontal))
                    });
                    left += margin_left;
                    if let Some(node) = self.get_mut(child) {
                        node.set_logical_left(left);
                    }
                    if tracks_overflow {
                        min_left = min_left.min(left);
                    }
                    left += width;
                    if tracks_overflow {
                        max_right = max_right.max(left);
                    }
                    left += margin_right;
                    *needs_word_spacing = true;
                }
            }
        }

        left += self.border_and_padding_logical_right(flow);
        let known_none = match self.get_mut(flow) {
            Some(node) => {
                node.logical_width = left - start;
                node.known_to_have_no_overflow()
            }
            None => false,
        };
        if known_none && (min_left < start || max_right > left) {
            self.clear_known_to_have_no_overflow(flow);
        }

        #[cfg(feature = "layout-trace")]
        eprintln!("[INLINE] {}flow {flow} width {}", trace_depth.indent(), left - start);

        left
    }
}
