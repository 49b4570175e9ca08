//! Walking a line: children, ancestors, leaves in line order, bidi
//! reordering and hit testing.

use crate::geometry::Point;
use crate::metrics::BoxMetricsProvider;

use super::{BoxId, InlineTree};

/// Iterator over the children of a flow box in line order.
pub struct Children<'a> {
    tree: &'a InlineTree,
    next: Option<BoxId>,
}

impl Iterator for Children<'_> {
    type Item = BoxId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|node| node.next_on_line);
        Some(id)
    }
}

/// Iterator from a box up to its root (inclusive of both).
pub struct Ancestors<'a> {
    tree: &'a InlineTree,
    next: Option<BoxId>,
}

impl Iterator for Ancestors<'_> {
    type Item = BoxId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|node| node.parent);
        Some(id)
    }
}

/// Reverse every maximal run of items whose level is at least `level`.
fn reverse_runs_at_or_above(items: &mut [(BoxId, u8)], level: u8) {
    let mut start = 0;
    while start < items.len() {
        if items[start].1 < level {
            start += 1;
            continue;
        }
        let end = items[start..]
            .iter()
            .position(|&(_, item_level)| item_level < level)
            .map_or(items.len(), |offset| start + offset);
        items[start..end].reverse();
        start = end;
    }
}

impl InlineTree {
    /// Children of a flow box in line order. Empty for leaves.
    #[must_use]
    pub fn children(&self, id: BoxId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).and_then(|node| node.flow()).and_then(|flow| flow.first_child),
        }
    }

    /// `id` followed by each of its ancestors.
    #[must_use]
    pub fn ancestors(&self, id: BoxId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map(|_| id),
        }
    }

    /// The root box of the line `id` is on, if it is attached to one.
    #[must_use]
    pub fn root_of(&self, id: BoxId) -> Option<BoxId> {
        self.ancestors(id)
            .last()
            .filter(|&top| self.get(top).is_some_and(super::InlineBox::is_root))
    }

    /// First leaf in the subtree of a flow box, in line order.
    #[must_use]
    pub fn first_leaf_child(&self, id: BoxId) -> Option<BoxId> {
        self.children(id).find_map(|child| {
            if self.get(child)?.is_leaf() {
                Some(child)
            } else {
                self.first_leaf_child(child)
            }
        })
    }

    /// Last leaf in the subtree of a flow box, in line order.
    #[must_use]
    pub fn last_leaf_child(&self, id: BoxId) -> Option<BoxId> {
        let mut current = self.get(id).and_then(|node| node.flow()).and_then(|flow| flow.last_child);
        while let Some(child) = current {
            let node = self.get(child)?;
            if node.is_leaf() {
                return Some(child);
            }
            if let Some(leaf) = self.last_leaf_child(child) {
                return Some(leaf);
            }
            current = node.prev_on_line;
        }
        None
    }

    /// The next leaf on the line after `id`, descending into flow siblings
    /// and climbing out of the parent when the siblings run out.
    #[must_use]
    pub fn next_leaf_child(&self, id: BoxId) -> Option<BoxId> {
        let node = self.get(id)?;
        let mut sibling = node.next_on_line;
        while let Some(current) = sibling {
            let current_node = self.get(current)?;
            let leaf = if current_node.is_leaf() {
                Some(current)
            } else {
                self.first_leaf_child(current)
            };
            if leaf.is_some() {
                return leaf;
            }
            sibling = current_node.next_on_line;
        }
        node.parent.and_then(|parent| self.next_leaf_child(parent))
    }

    /// The previous leaf on the line before `id`.
    #[must_use]
    pub fn prev_leaf_child(&self, id: BoxId) -> Option<BoxId> {
        let node = self.get(id)?;
        let mut sibling = node.prev_on_line;
        while let Some(current) = sibling {
            let current_node = self.get(current)?;
            let leaf = if current_node.is_leaf() {
                Some(current)
            } else {
                self.last_leaf_child(current)
            };
            if leaf.is_some() {
                return leaf;
            }
            sibling = current_node.prev_on_line;
        }
        node.parent.and_then(|parent| self.prev_leaf_child(parent))
    }

    /// Recompute the "more content follows on this line" bit for every box
    /// under `root`: a box has a follower if it has a next sibling or its
    /// parent has one.
    pub fn refresh_next_on_line_exists(&mut self, root: BoxId) {
        let mut stack = vec![(root, false)];
        while let Some((id, inherited)) = stack.pop() {
            let Some(node) = self.get_mut(id) else {
                continue;
            };
            let exists = node.parent.is_some() && (node.next_on_line.is_some() || inherited);
            node.flags.next_on_line_exists = exists;
            let children: Vec<BoxId> = self.children(id).collect();
            stack.extend(children.into_iter().map(|child| (child, exists)));
        }
    }

    /// Leaf boxes of the line in logical (reading) order.
    ///
    /// The leaves are stored in visual order; this undoes Unicode bidi rule
    /// L2 by reversing runs from the lowest odd level up to the highest.
    #[must_use]
    pub fn collect_leaf_boxes_in_logical_order(&self, root: BoxId) -> Vec<BoxId> {
        let mut leaves: Vec<(BoxId, u8)> = Vec::new();
        let mut leaf = self.first_leaf_child(root);
        while let Some(id) = leaf {
            let level = self.get(id).map_or(0, |node| node.flags.bidi_level);
            leaves.push((id, level));
            leaf = self.next_leaf_child(id);
        }
        let Some(max_level) = leaves.iter().map(|&(_, level)| level).max() else {
            return Vec::new();
        };
        let min_level = leaves.iter().map(|&(_, level)| level).min().unwrap_or(0);
        let lowest_odd = if min_level % 2 == 0 { min_level + 1 } else { min_level };
        for level in lowest_odd..=max_level {
            reverse_runs_at_or_above(&mut leaves, level);
        }
        leaves.into_iter().map(|(id, _)| id).collect()
    }

    /// Reorder leaves given in logical order into visual order (rule L2:
    /// from the highest level down to the lowest odd level, reverse every
    /// run at or above that level).
    #[must_use]
    pub fn reorder_leaves_visually(&self, logical: &[BoxId]) -> Vec<BoxId> {
        let mut leaves: Vec<(BoxId, u8)> = logical
            .iter()
            .map(|&id| (id, self.get(id).map_or(0, |node| node.flags.bidi_level)))
            .collect();
        let Some(max_level) = leaves.iter().map(|&(_, level)| level).max() else {
            return Vec::new();
        };
        let min_level = leaves.iter().map(|&(_, level)| level).min().unwrap_or(0);
        let lowest_odd = if min_level % 2 == 0 { min_level + 1 } else { min_level };
        for level in (lowest_odd..=max_level).rev() {
            reverse_runs_at_or_above(&mut leaves, level);
        }
        leaves.into_iter().map(|(id, _)| id).collect()
    }

    /// Deepest box under `id` whose frame contains `point`.
    ///
    /// Children are tested last to first, so boxes painted later win.
    /// Children painted in their own layer are skipped; text always counts.
    /// Flow boxes outside their visual overflow are rejected without
    /// visiting their children.
    #[must_use]
    pub fn node_at_point(
        &self,
        id: BoxId,
        point: Point,
        line_top: f32,
        line_bottom: f32,
        metrics: &dyn BoxMetricsProvider,
    ) -> Option<BoxId> {
        let node = self.get(id)?;
        if node.is_leaf() {
            return self.frame_rect(id, metrics).contains_point(point).then_some(id);
        }
        if !self
            .visual_overflow_rect(id, line_top, line_bottom, metrics)
            .contains_point(point)
        {
            return None;
        }

        let mut child = node.flow().and_then(|flow| flow.last_child);
        while let Some(current) = child {
            let current_node = self.get(current)?;
            if current_node.is_text_box() || !self.has_self_painting_layer(current) {
                if let Some(hit) = self.node_at_point(current, point, line_top, line_bottom, metrics) {
                    return Some(hit);
                }
            }
            child = current_node.prev_on_line;
        }

        let frame = if node.is_root() {
            let horizontal = node.flags.is_horizontal;
            let logical = crate::geometry::Rect::new(
                node.logical_left(),
                line_top,
                node.logical_width,
                line_bottom - line_top,
            );
            if horizontal { logical } else { logical.transposed() }
        } else {
            self.frame_rect(id, metrics)
        };
        frame.pixel_snapped().contains_point(point).then_some(id)
    }
}
