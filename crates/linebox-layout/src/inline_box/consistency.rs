//! Structural validation of child lists.

use crate::error::ConsistencyError;

use super::{BoxId, InlineTree};

impl InlineTree {
    /// Check the child list of `flow` and, recursively, of every flow box
    /// under it:
    ///
    /// - each child's parent is `flow`, and its previous link is the child
    ///   visited before it;
    /// - the walk from the first child ends at the recorded last child;
    /// - the walk terminates.
    ///
    /// Boxes without a parent must also have no sibling links; that is
    /// checked for `flow` itself.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant found.
    pub fn check_consistency(&self, flow: BoxId) -> Result<(), ConsistencyError> {
        let node = self.get(flow).ok_or(ConsistencyError::DanglingHandle(flow))?;
        if node.parent.is_none() && (node.next_on_line.is_some() || node.prev_on_line.is_some()) {
            return Err(ConsistencyError::OrphanWithSiblings(flow));
        }
        let Some(flow_box) = node.flow() else {
            return Ok(());
        };

        let limit = self.slots.len();
        let mut visited = 0;
        let mut prev: Option<BoxId> = None;
        let mut current = flow_box.first_child;
        while let Some(child) = current {
            visited += 1;
            if visited > limit {
                return Err(ConsistencyError::Cycle(flow));
            }
            let child_node = self.get(child).ok_or(ConsistencyError::DanglingHandle(child))?;
            if child_node.parent != Some(flow) {
                return Err(ConsistencyError::ParentMismatch {
                    parent: flow,
                    child,
                    found: child_node.parent,
                });
            }
            if child_node.prev_on_line != prev {
                return Err(ConsistencyError::BrokenPrevLink { parent: flow, child });
            }
            if child_node.is_flow() {
                self.check_consistency(child)?;
            }
            prev = Some(child);
            current = child_node.next_on_line;
        }

        if prev != flow_box.last_child {
            return Err(ConsistencyError::LastChildMismatch {
                parent: flow,
                expected: flow_box.last_child,
                found: prev,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentId, ContentTree};
    use crate::metrics::ApproximateMetrics;
    use crate::style::BoxStyle;

    fn line_of_three() -> (InlineTree, BoxId, Vec<BoxId>) {
        let mut tree = InlineTree::new(ContentTree::new(BoxStyle::default(), 100.0));
        let text = tree
            .content_mut()
            .add_text(ContentId::BLOCK, "abc", BoxStyle::default())
            .unwrap();
        let root = tree.create_root_box().unwrap();
        let leaves: Vec<BoxId> = (0..3).map(|i| tree.create_text_box(text, i, 1).unwrap()).collect();
        for &leaf in &leaves {
            tree.add_to_line(root, leaf, &ApproximateMetrics).unwrap();
        }
        (tree, root, leaves)
    }

    #[test]
    fn broken_prev_link_is_reported() {
        let (mut tree, root, leaves) = line_of_three();
        tree.get_mut(leaves[2]).unwrap().prev_on_line = Some(leaves[0]);
        assert_eq!(
            tree.check_consistency(root),
            Err(ConsistencyError::BrokenPrevLink {
                parent: root,
                child: leaves[2]
            })
        );
    }

    #[test]
    fn wrong_last_child_is_reported() {
        let (mut tree, root, leaves) = line_of_three();
        tree.get_mut(root).unwrap().flow_mut().unwrap().last_child = Some(leaves[1]);
        assert_eq!(
            tree.check_consistency(root),
            Err(ConsistencyError::LastChildMismatch {
                parent: root,
                expected: Some(leaves[1]),
                found: Some(leaves[2]),
            })
        );
    }

    #[test]
    fn looping_child_list_terminates() {
        let (mut tree, root, leaves) = line_of_three();
        tree.get_mut(leaves[2]).unwrap().next_on_line = Some(leaves[0]);
        tree.get_mut(leaves[0]).unwrap().prev_on_line = Some(leaves[2]);
        assert!(tree.check_consistency(root).is_err());
    }

    #[test]
    fn orphan_with_siblings_is_reported() {
        let (mut tree, _, leaves) = line_of_three();
        tree.get_mut(leaves[1]).unwrap().parent = None;
        assert_eq!(
            tree.check_consistency(leaves[1]),
            Err(ConsistencyError::OrphanWithSiblings(leaves[1]))
        );
    }
}
