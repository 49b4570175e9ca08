//! Per-line state kept on root boxes.

use serde::Serialize;

use linebox_common::warning::warn_once;

use crate::content::ContentId;
use crate::error::{Result, TreeError};
use crate::metrics::FontBaseline;

use super::{BoxId, InlineTree};

/// Vertical extents and break position of one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineData {
    pub(crate) line_top: f32,
    pub(crate) line_bottom: f32,
    pub(crate) line_top_with_leading: f32,
    pub(crate) line_bottom_with_leading: f32,
    pub(crate) selection_bottom: f32,
    pub(crate) line_break_obj: Option<ContentId>,
    pub(crate) line_break_pos: usize,
    pub(crate) floats: Option<Vec<ContentId>>,
    pub(crate) max_logical_top: Option<f32>,
    pub(crate) baseline_type: FontBaseline,
}

impl LineData {
    /// Top of the tallest box on the line, without leading.
    #[must_use]
    pub const fn line_top(&self) -> f32 {
        self.line_top
    }

    /// Bottom of the lowest box on the line, without leading.
    #[must_use]
    pub const fn line_bottom(&self) -> f32 {
        self.line_bottom
    }

    /// Top of the line including half-leading.
    #[must_use]
    pub const fn line_top_with_leading(&self) -> f32 {
        self.line_top_with_leading
    }

    /// Bottom of the line including half-leading. The next line starts here.
    #[must_use]
    pub const fn line_bottom_with_leading(&self) -> f32 {
        self.line_bottom_with_leading
    }

    /// Bottom of the selection highlight.
    #[must_use]
    pub const fn selection_bottom(&self) -> f32 {
        self.selection_bottom
    }

    /// Content node where the next line resumes.
    #[must_use]
    pub const fn line_break_obj(&self) -> Option<ContentId> {
        self.line_break_obj
    }

    /// Offset into `line_break_obj` where the next line resumes.
    #[must_use]
    pub const fn line_break_pos(&self) -> usize {
        self.line_break_pos
    }

    /// Floats placed while this line was being built.
    #[must_use]
    pub fn floats(&self) -> Option<&[ContentId]> {
        self.floats.as_deref()
    }

    /// Baseline the line aligns on.
    #[must_use]
    pub const fn baseline_type(&self) -> FontBaseline {
        self.baseline_type
    }
}

impl InlineTree {
    /// Line data of a root box.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] for any other box.
    pub fn root_line(&self, root: BoxId) -> Result<&LineData> {
        self.node(root)?.line_data().ok_or(TreeError::NotARootBox(root))
    }

    fn root_line_mut(&mut self, root: BoxId) -> Result<&mut LineData> {
        self.node_mut(root)?.line_data_mut().ok_or(TreeError::NotARootBox(root))
    }

    /// Root boxes of the block in line order.
    #[must_use]
    pub fn lines(&self) -> &[BoxId] {
        self.content
            .get(self.content.block())
            .map_or(&[], crate::content::ContentNode::line_boxes)
    }

    /// The line before `root` in the block, if any.
    #[must_use]
    pub fn prev_root_box(&self, root: BoxId) -> Option<BoxId> {
        let lines = self.lines();
        let position = lines.iter().position(|&line| line == root)?;
        position.checked_sub(1).and_then(|index| lines.get(index).copied())
    }

    /// The line after `root` in the block, if any.
    #[must_use]
    pub fn next_root_box(&self, root: BoxId) -> Option<BoxId> {
        let lines = self.lines();
        let position = lines.iter().position(|&line| line == root)?;
        lines.get(position + 1).copied()
    }

    /// Record the vertical extents of a line. `selection_bottom` defaults to
    /// `bottom`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvertedLine`] if `top > bottom`, and
    /// [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn set_line_top_bottom_positions(
        &mut self,
        root: BoxId,
        top: f32,
        bottom: f32,
        top_with_leading: f32,
        bottom_with_leading: f32,
        selection_bottom: Option<f32>,
    ) -> Result<()> {
        if top > bottom {
            return Err(TreeError::InvertedLine { top, bottom });
        }
        let line = self.root_line_mut(root)?;
        line.line_top = top;
        line.line_bottom = bottom;
        line.line_top_with_leading = top_with_leading;
        line.line_bottom_with_leading = bottom_with_leading;
        line.selection_bottom = selection_bottom.unwrap_or(bottom);
        Ok(())
    }

    /// Top of the selection highlight: it reaches up to the previous line's
    /// selection bottom (or the block's content edge for the first line) so
    /// adjacent lines leave no gap. Flipped lines use the line top.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn selection_top(&self, root: BoxId) -> Result<f32> {
        let line = self.root_line(root)?;
        let block_style = self.content.style(self.content.block(), false);
        if block_style.is_some_and(|style| style.writing_mode.is_flipped_lines()) {
            return Ok(line.line_top);
        }
        Ok(match self.prev_root_box(root) {
            Some(prev) => self.root_line(prev)?.selection_bottom,
            None => block_style.map_or(0.0, crate::style::BoxStyle::border_and_padding_before),
        })
    }

    /// Record where the next line resumes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn set_line_break_info(&mut self, root: BoxId, obj: Option<ContentId>, pos: usize) -> Result<()> {
        let line = self.root_line_mut(root)?;
        line.line_break_obj = obj;
        line.line_break_pos = pos;
        Ok(())
    }

    /// Called whenever a box is removed from the line rooted at `root`.
    ///
    /// Line-break info that pointed at the removed box's content is cleared,
    /// on this line and on each earlier line that ends on the same content
    /// (those are also marked dirty). The cached max logical top is dropped.
    pub(crate) fn child_removed(&mut self, root: BoxId, child: BoxId) {
        let Some(content) = self.get(child).map(super::InlineBox::content) else {
            return;
        };
        if let Ok(line) = self.root_line_mut(root) {
            line.max_logical_top = None;
            if line.line_break_obj == Some(content) {
                line.line_break_obj = None;
                line.line_break_pos = 0;
            }
        }
        let mut prev = self.prev_root_box(root);
        while let Some(prev_root) = prev {
            let Some(node) = self.get_mut(prev_root) else {
                break;
            };
            let Some(line) = node.line_data_mut() else {
                break;
            };
            if line.line_break_obj != Some(content) {
                break;
            }
            line.line_break_obj = None;
            line.line_break_pos = 0;
            node.flags.dirty = true;
            prev = self.prev_root_box(prev_root);
        }
    }

    /// Record a float placed on this line. The list is allocated on first
    /// use. Floats are recorded once per layout, so appending to a dirty
    /// line is reported.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn append_float(&mut self, root: BoxId, float: ContentId) -> Result<()> {
        if self.node(root)?.flags.dirty {
            warn_once(
                "LineBox",
                &format!("float {float} appended to dirty line {root}"),
            );
        }
        self.root_line_mut(root)?
            .floats
            .get_or_insert_with(Vec::new)
            .push(float);
        Ok(())
    }

    /// Largest logical top among the boxes of a line that were aligned
    /// individually. Cached until a box is removed or the line is realigned.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
    pub fn max_logical_top(&mut self, root: BoxId) -> Result<f32> {
        if let Some(cached) = self.root_line(root)?.max_logical_top {
            return Ok(cached);
        }
        let value = self.compute_max_logical_top(root);
        self.root_line_mut(root)?.max_logical_top = Some(value);
        Ok(value)
    }

    fn compute_max_logical_top(&self, flow: BoxId) -> f32 {
        let same_baseline = self
            .get(flow)
            .and_then(super::InlineBox::flow)
            .is_some_and(|flow| flow.descendants_have_same_line_height_and_baseline);
        if same_baseline {
            return 0.0;
        }
        self.children(flow)
            .filter(|&child| !self.is_out_of_flow(child))
            .fold(0.0_f32, |max, child| {
                let top = self.get(child).map_or(0.0, super::InlineBox::logical_top);
                max.max(top).max(self.compute_max_logical_top(child))
            })
    }

    pub(crate) fn invalidate_max_logical_top(&mut self, root: BoxId) {
        if let Ok(line) = self.root_line_mut(root) {
            line.max_logical_top = None;
        }
    }
}
