//! Building and tearing down lines: child list maintenance, state flags and
//! position adjustment.

use crate::error::{Result, TreeError};
use crate::geometry::Point;
use crate::style::{TextEmphasisMark, VerticalAlign};
use crate::metrics::BoxMetricsProvider;

use super::{BoxId, BoxKind, InlineTree, LeafKind};

impl InlineTree {
    /// Append `child` to the end of `parent`'s child list.
    ///
    /// The child inherits the parent's first-line and orientation bits. The
    /// text-descendant flags and the same-line-height fast path of the
    /// ancestors are updated, and children that can paint outside their
    /// frame drop the no-overflow state (along with their ancestors).
    ///
    /// # Errors
    ///
    /// - [`TreeError::StaleHandle`] if either handle is dead.
    /// - [`TreeError::NotAFlowBox`] if `parent` is a leaf.
    /// - [`TreeError::RootCannotBeChild`] if `child` is a root box.
    /// - [`TreeError::AlreadyAttached`] if `child` already has a parent.
    /// - [`TreeError::WouldCreateCycle`] if `child` is `parent` or one of its
    ///   ancestors.
    pub fn add_to_line(&mut self, parent: BoxId, child: BoxId, metrics: &dyn BoxMetricsProvider) -> Result<()> {
        let parent_node = self.node(parent)?;
        if parent_node.is_leaf() {
            return Err(TreeError::NotAFlowBox(parent));
        }
        let child_node = self.node(child)?;
        if child_node.is_root() {
            return Err(TreeError::RootCannotBeChild(child));
        }
        if let Some(existing) = child_node.parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(TreeError::WouldCreateCycle(child));
        }

        let first_line = parent_node.flags.first_line;
        let horizontal = parent_node.flags.is_horizontal;
        let previous_last = parent_node.flow().and_then(|flow| flow.last_child);

        {
            let child_node = self.node_mut(child)?;
            child_node.parent = Some(parent);
            child_node.prev_on_line = previous_last;
            child_node.next_on_line = None;
            child_node.flags.first_line = first_line;
            child_node.flags.is_horizontal = horizontal;
        }
        if let Some(last) = previous_last {
            self.node_mut(last)?.next_on_line = Some(child);
        }
        if let Some(flow) = self.node_mut(parent)?.flow_mut() {
            if flow.first_child.is_none() {
                flow.first_child = Some(child);
            }
            flow.last_child = Some(child);
        }

        self.update_text_flags(parent, child);
        if !self.is_out_of_flow(child) {
            if self.child_breaks_fast_path(parent, child, metrics) {
                self.clear_descendants_have_same_line_height_and_baseline(parent);
            }
            if self.child_may_overflow(child) {
                self.clear_known_to_have_no_overflow(child);
            }
            let parent_known = self.get(parent).is_some_and(super::InlineBox::known_to_have_no_overflow);
            let child_flow_overflows = self
                .get(child)
                .is_some_and(|node| node.is_flow() && !node.known_to_have_no_overflow());
            if parent_known && child_flow_overflows {
                self.clear_known_to_have_no_overflow(parent);
            }
        }
        Ok(())
    }

    fn update_text_flags(&mut self, parent: BoxId, child: BoxId) {
        let Some(child_node) = self.get(child) else {
            return;
        };
        let parent_content = self.get(parent).map(super::InlineBox::content);
        if child_node.is_text() {
            let own_text = self.content.parent(child_node.content()) == parent_content;
            if own_text {
                if let Some(flow) = self.get_mut(parent).and_then(super::InlineBox::flow_mut) {
                    flow.has_text_children = true;
                }
            }
            self.set_has_text_descendants_on_ancestors(parent);
        } else if child_node.flow().is_some_and(|flow| flow.has_text_descendants) {
            self.set_has_text_descendants_on_ancestors(parent);
        }
    }

    fn set_has_text_descendants_on_ancestors(&mut self, start: BoxId) {
        let mut current = Some(start);
        while let Some(id) = current {
            let Some(node) = self.get_mut(id) else {
                break;
            };
            let parent = node.parent;
            match node.flow_mut() {
                Some(flow) if !flow.has_text_descendants => flow.has_text_descendants = true,
                _ => break,
            }
            current = parent;
        }
    }

    /// True if placing `child` under `parent` means the subtree can no
    /// longer be aligned with a single baseline offset.
    fn child_breaks_fast_path(&self, parent: BoxId, child: BoxId, metrics: &dyn BoxMetricsProvider) -> bool {
        let (Some(parent_node), Some(child_node)) = (self.get(parent), self.get(child)) else {
            return false;
        };
        if !parent_node
            .flow()
            .is_some_and(|flow| flow.descendants_have_same_line_height_and_baseline)
        {
            return false;
        }
        let first_line = parent_node.flags.first_line;
        let (Some(parent_style), Some(child_style)) = (
            self.content.style(parent_node.content(), first_line),
            self.content.style(child_node.content(), first_line),
        ) else {
            return false;
        };

        let differs = || {
            !metrics
                .font_metrics(parent_style)
                .has_identical_ascent_descent_and_line_gap(&metrics.font_metrics(child_style))
                || parent_style.line_height != child_style.line_height
                || (parent_style.vertical_align != VerticalAlign::Baseline && !parent_node.is_root())
                || child_style.vertical_align != VerticalAlign::Baseline
        };

        match &child_node.kind {
            BoxKind::Leaf(LeafKind::Atomic) => true,
            BoxKind::Leaf(LeafKind::Text { .. }) => {
                let is_break = self
                    .content
                    .get(child_node.content())
                    .is_some_and(crate::content::ContentNode::is_line_break);
                let foreign = self.content.parent(child_node.content()) != Some(parent_node.content());
                ((is_break || foreign) && differs()) || child_style.text_emphasis_mark != TextEmphasisMark::None
            }
            BoxKind::Flow(flow) => {
                !flow.descendants_have_same_line_height_and_baseline
                    || differs()
                    || child_style.has_border()
                    || child_style.padding != crate::geometry::EdgeSizes::default()
                    || !child_style.box_shadow.is_empty()
                    || child_style.has_outline()
                    || self.has_self_painting_layer(child)
            }
            BoxKind::Root(_) => false,
        }
    }

    /// Clear the fast-path flag on `id` and every ancestor, stopping at the
    /// first ancestor that already lost it.
    pub(crate) fn clear_descendants_have_same_line_height_and_baseline(&mut self, id: BoxId) {
        let mut current = Some(id);
        while let Some(box_id) = current {
            let Some(node) = self.get_mut(box_id) else {
                break;
            };
            let parent = node.parent;
            match node.flow_mut() {
                Some(flow) if flow.descendants_have_same_line_height_and_baseline => {
                    flow.descendants_have_same_line_height_and_baseline = false;
                }
                _ => break,
            }
            current = parent;
        }
    }

    /// True if the child's own style or content can paint or lay out
    /// outside its frame.
    fn child_may_overflow(&self, child: BoxId) -> bool {
        let Some(node) = self.get(child) else {
            return false;
        };
        let Some(style) = self.style(child) else {
            return false;
        };
        let relatively_offset = self
            .content
            .get(node.content())
            .is_some_and(|content| content.relative_offset != Point::default());
        if relatively_offset {
            return true;
        }
        match &node.kind {
            BoxKind::Leaf(LeafKind::Text { run, .. }) => {
                style.font.letter_spacing < 0.0
                    || style.has_text_shadow()
                    || style.text_emphasis_mark != TextEmphasisMark::None
                    || style.text_stroke_width > 0.0
                    || !run.glyph_overflow.is_empty()
            }
            BoxKind::Leaf(LeafKind::Atomic) => {
                self.has_self_painting_layer(child)
                    || self
                        .content
                        .get(node.content())
                        .and_then(crate::content::ContentNode::as_atomic)
                        .is_some_and(crate::content::AtomicContent::has_overflow)
            }
            BoxKind::Flow(_) | BoxKind::Root(_) => {
                !style.box_shadow.is_empty() || self.has_self_painting_layer(child) || style.has_outline()
            }
        }
    }

    /// Unlink `child` from `parent`.
    ///
    /// With `mark_dirty`, the parent and its ancestors are marked dirty first.
    /// The line's root is told about the removal so it can drop line-break
    /// and max-top state that referred to the child.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `child` is not a child of `parent`,
    /// or [`TreeError::StaleHandle`] if either handle is dead.
    pub fn remove_child(&mut self, parent: BoxId, child: BoxId, mark_dirty: bool) -> Result<()> {
        let parent_dirty = self.node(parent)?.flags.dirty;
        let child_node = self.node(child)?;
        if child_node.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        let (prev, next) = (child_node.prev_on_line, child_node.next_on_line);

        if mark_dirty && !parent_dirty {
            self.dirty_line_boxes(parent);
        }
        if let Some(root) = self.root_of(parent) {
            self.child_removed(root, child);
        }

        if let Some(flow) = self.node_mut(parent)?.flow_mut() {
            if flow.first_child == Some(child) {
                flow.first_child = next;
            }
            if flow.last_child == Some(child) {
                flow.last_child = prev;
            }
        }
        if let Some(next) = next {
            self.node_mut(next)?.prev_on_line = prev;
        }
        if let Some(prev) = prev {
            self.node_mut(prev)?.next_on_line = next;
        }
        let child_node = self.node_mut(child)?;
        child_node.parent = None;
        child_node.prev_on_line = None;
        child_node.next_on_line = None;
        Ok(())
    }

    /// Remove a box from its parent, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn remove(&mut self, id: BoxId, mark_dirty: bool) -> Result<()> {
        match self.node(id)?.parent {
            Some(parent) => self.remove_child(parent, id, mark_dirty),
            None => Ok(()),
        }
    }

    /// Destroy a single box. It is unlinked from its parent without
    /// dirtying the line, and its children (if any) are left as orphans.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn destroy(&mut self, id: BoxId) -> Result<()> {
        self.remove(id, false)?;
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent = None;
                node.prev_on_line = None;
                node.next_on_line = None;
            }
        }
        self.forget_and_release(id);
        Ok(())
    }

    /// Destroy a box and its whole subtree, dropping each box from its
    /// content node's line-box list.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn delete_line(&mut self, id: BoxId) -> Result<()> {
        self.remove(id, false)?;
        self.delete_subtree(id);
        Ok(())
    }

    fn delete_subtree(&mut self, id: BoxId) {
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            self.delete_subtree(child);
        }
        self.forget_and_release(id);
    }

    fn forget_and_release(&mut self, id: BoxId) {
        if let Some(content) = self.get(id).map(super::InlineBox::content) {
            if let Some(node) = self.content.get_mut(content) {
                node.forget_line_box(id);
            }
        }
        self.release(id);
    }

    /// Detach a box (and the later line boxes of the same content) from its
    /// content node, recursively for its children. The boxes stay alive and
    /// can be reattached with [`InlineTree::attach_line`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn extract_line(&mut self, id: BoxId) -> Result<()> {
        let node = self.node(id)?;
        if !node.flags.extracted {
            let content = node.content();
            let chain = self
                .content
                .get_mut(content)
                .map(|node| node.extract_line_box(id))
                .unwrap_or_default();
            for box_id in chain {
                if let Some(node) = self.get_mut(box_id) {
                    node.flags.extracted = true;
                }
            }
        }
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            self.extract_line(child)?;
        }
        Ok(())
    }

    /// Undo [`InlineTree::extract_line`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn attach_line(&mut self, id: BoxId) -> Result<()> {
        let node = self.node(id)?;
        if node.flags.extracted {
            let content = node.content();
            let chain = self
                .content
                .get_mut(content)
                .map(|node| node.attach_line_box(id))
                .unwrap_or_default();
            for box_id in chain {
                if let Some(node) = self.get_mut(box_id) {
                    node.flags.extracted = false;
                }
            }
        }
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            self.attach_line(child)?;
        }
        Ok(())
    }

    /// Mark a box and all its current descendants as constructed.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_constructed(&mut self, id: BoxId) -> Result<()> {
        self.node_mut(id)?.flags.constructed = true;
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            self.set_constructed(child)?;
        }
        Ok(())
    }

    /// Set or clear the dirty bit of a single box.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn mark_dirty(&mut self, id: BoxId, dirty: bool) -> Result<()> {
        self.node_mut(id)?.flags.dirty = dirty;
        Ok(())
    }

    /// Mark a box dirty, then its ancestors up to the first one that already
    /// is.
    pub fn dirty_line_boxes(&mut self, id: BoxId) {
        if let Some(node) = self.get_mut(id) {
            node.flags.dirty = true;
        }
        let mut current = self.get(id).and_then(|node| node.parent);
        while let Some(ancestor) = current {
            let Some(node) = self.get_mut(ancestor) else {
                break;
            };
            if node.flags.dirty {
                break;
            }
            node.flags.dirty = true;
            current = node.parent;
        }
    }

    /// Move a box, its in-flow descendants, their overflow records and the
    /// atomic content they position, by a physical offset.
    pub fn adjust_position(&mut self, id: BoxId, dx: f32, dy: f32) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.origin = node.origin.moved_by(dx, dy);
        if let Some(record) = node.overflow.record_mut() {
            record.move_by(dx, dy);
        }
        let content = node.content();
        if node.is_atomic() {
            if let Some(content) = self.content.get_mut(content) {
                content.location = content.location.moved_by(dx, dy);
            }
            return;
        }
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            if !self.is_out_of_flow(child) {
                self.adjust_position(child, dx, dy);
            }
        }
    }

    /// Move a box along the line direction.
    pub fn adjust_line_direction_position(&mut self, id: BoxId, delta: f32) {
        match self.get(id) {
            Some(node) if node.flags.is_horizontal => self.adjust_position(id, delta, 0.0),
            Some(_) => self.adjust_position(id, 0.0, delta),
            None => {}
        }
    }

    /// Move a box along the block direction.
    pub fn adjust_block_direction_position(&mut self, id: BoxId, delta: f32) {
        match self.get(id) {
            Some(node) if node.flags.is_horizontal => self.adjust_position(id, 0.0, delta),
            Some(_) => self.adjust_position(id, delta, 0.0),
            None => {}
        }
    }

    /// Copy the physical origin of every atomic leaf under `id` to its
    /// content node, so the atomic content paints where its box was placed.
    pub fn position_atomic_content(&mut self, id: BoxId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.is_atomic() {
            let (content, origin) = (node.content(), node.origin);
            if let Some(content) = self.content.get_mut(content) {
                content.location = origin;
            }
            return;
        }
        let children: Vec<BoxId> = self.children(id).collect();
        for child in children {
            self.position_atomic_content(child);
        }
    }
}
