//! The content tree that line boxes are generated for.
//!
//! Style resolution and block layout live outside this crate. What the line
//! boxes need from them is reduced to a small arena of content nodes: the
//! containing block, inline elements, text runs and atomic inlines, each with
//! its computed style and the ordered list of line boxes it generated.
//!
//! # Design
//!
//! Like a DOM arena, nodes are addressed by [`ContentId`] indices and keep
//! parent/children links, so the passes can walk up to the containing block
//! without borrowing issues.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::geometry::{Point, Rect, Size};
use crate::inline_box::BoxId;
use crate::style::BoxStyle;

/// A type-safe index into the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub usize);

impl ContentId {
    /// The containing block is always at index 0.
    pub const BLOCK: Self = Self(0);
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// An atomic inline (replaced element or inline-block) as laid out by its
/// own formatting context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomicContent {
    /// Border-box size.
    pub size: Size,
    /// Baseline measured from the border-box top; `None` aligns the bottom
    /// margin edge with the baseline.
    pub baseline: Option<f32>,
    /// True for replaced elements (images); false for inline-blocks.
    pub replaced: bool,
    /// Visual overflow relative to the border-box origin, if it paints
    /// outside its border box.
    pub visual_overflow: Option<Rect>,
    /// Layout overflow relative to the border-box origin, if its scrollable
    /// extent exceeds the border box.
    pub layout_overflow: Option<Rect>,
}

impl AtomicContent {
    /// Border box of the content, at the origin.
    #[must_use]
    pub const fn border_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    /// Visual overflow including the border box.
    #[must_use]
    pub fn visual_overflow_rect(&self) -> Rect {
        self.visual_overflow
            .map_or_else(|| self.border_box(), |rect| rect.unite(&self.border_box()))
    }

    /// Layout overflow including the border box.
    #[must_use]
    pub fn layout_overflow_rect(&self) -> Rect {
        self.layout_overflow
            .map_or_else(|| self.border_box(), |rect| rect.unite(&self.border_box()))
    }

    /// True if either overflow extends past the border box.
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        let border_box = self.border_box();
        !border_box.contains_rect(&self.visual_overflow_rect())
            || !border_box.contains_rect(&self.layout_overflow_rect())
    }
}

/// What a content node is.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    /// The block container that owns the lines.
    Block {
        /// Width of the block in the line direction.
        logical_width: f32,
    },
    /// An inline element; generates flow boxes.
    Inline,
    /// A run of text; generates text boxes.
    Text {
        /// The full text of the node. Text boxes reference ranges of it.
        text: String,
    },
    /// A replaced element or inline-block; generates one atomic leaf box.
    Atomic(AtomicContent),
    /// A forced line break; generates a zero-height text box.
    LineBreak,
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// One node of the content tree.
#[derive(Debug, Clone)]
pub struct ContentNode {
    /// What the node is.
    pub kind: ContentKind,
    /// Computed style.
    pub style: BoxStyle,
    /// `::first-line` style, if it differs.
    pub first_line_style: Option<BoxStyle>,
    /// Parent node (`None` for the block).
    pub parent: Option<ContentId>,
    /// Children in document order.
    pub children: Vec<ContentId>,
    /// Absolutely/fixed positioned: leaves a placeholder box on the line.
    pub out_of_flow: bool,
    /// Paints itself in a separate layer (transforms, opacity, etc.).
    pub self_painting_layer: bool,
    /// Offset from `position: relative`.
    pub relative_offset: Point,
    /// Location of an atomic inline's border box, kept in sync with its leaf
    /// box.
    pub location: Point,
    line_boxes: Vec<BoxId>,
    extracted_line_boxes: Vec<BoxId>,
}

impl ContentNode {
    fn new(kind: ContentKind, style: BoxStyle, parent: Option<ContentId>) -> Self {
        Self {
            kind,
            style,
            first_line_style: None,
            parent,
            children: Vec::new(),
            out_of_flow: false,
            self_painting_layer: false,
            relative_offset: Point::default(),
            location: Point::default(),
            line_boxes: Vec::new(),
            extracted_line_boxes: Vec::new(),
        }
    }

    /// Style to use on the first formatted line or elsewhere.
    #[must_use]
    pub fn style_for(&self, first_line: bool) -> &BoxStyle {
        if first_line {
            self.first_line_style.as_ref().unwrap_or(&self.style)
        } else {
            &self.style
        }
    }

    /// Line boxes currently attached to this node, in line order.
    #[must_use]
    pub fn line_boxes(&self) -> &[BoxId] {
        &self.line_boxes
    }

    /// Line boxes detached by `extract_line` and not yet reattached.
    #[must_use]
    pub fn extracted_line_boxes(&self) -> &[BoxId] {
        &self.extracted_line_boxes
    }

    /// First attached line box.
    #[must_use]
    pub fn first_line_box(&self) -> Option<BoxId> {
        self.line_boxes.first().copied()
    }

    /// Last attached line box.
    #[must_use]
    pub fn last_line_box(&self) -> Option<BoxId> {
        self.line_boxes.last().copied()
    }

    /// True for text nodes.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ContentKind::Text { .. })
    }

    /// True for the containing block.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self.kind, ContentKind::Block { .. })
    }

    /// True for inline elements.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self.kind, ContentKind::Inline)
    }

    /// True for forced line breaks.
    #[must_use]
    pub const fn is_line_break(&self) -> bool {
        matches!(self.kind, ContentKind::LineBreak)
    }

    /// Atomic inline data, if this is one.
    #[must_use]
    pub const fn as_atomic(&self) -> Option<&AtomicContent> {
        match &self.kind {
            ContentKind::Atomic(atomic) => Some(atomic),
            _ => None,
        }
    }

    /// Text, if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            ContentKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn push_line_box(&mut self, id: BoxId) {
        self.line_boxes.push(id);
    }

    pub(crate) fn forget_line_box(&mut self, id: BoxId) {
        self.line_boxes.retain(|&other| other != id);
        self.extracted_line_boxes.retain(|&other| other != id);
    }

    /// Detach `id` and every later line box, returning the detached chain.
    /// Returns an empty chain if `id` is not attached.
    pub(crate) fn extract_line_box(&mut self, id: BoxId) -> Vec<BoxId> {
        let Some(position) = self.line_boxes.iter().position(|&other| other == id) else {
            return Vec::new();
        };
        let mut tail = self.line_boxes.split_off(position);
        let chain = tail.clone();
        tail.append(&mut self.extracted_line_boxes);
        self.extracted_line_boxes = tail;
        chain
    }

    /// Reattach `id` and the line boxes extracted after it, in their
    /// original order, returning the reattached chain. Returns an empty chain
    /// if `id` is not extracted.
    pub(crate) fn attach_line_box(&mut self, id: BoxId) -> Vec<BoxId> {
        let Some(position) = self.extracted_line_boxes.iter().position(|&other| other == id) else {
            return Vec::new();
        };
        let chain: Vec<BoxId> = self.extracted_line_boxes.drain(position..).collect();
        self.line_boxes.extend_from_slice(&chain);
        chain
    }
}

/// Arena of content nodes.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
}

impl ContentTree {
    /// Create a tree containing only the containing block.
    #[must_use]
    pub fn new(block_style: BoxStyle, logical_width: f32) -> Self {
        Self {
            nodes: vec![ContentNode::new(
                ContentKind::Block { logical_width },
                block_style,
                None,
            )],
        }
    }

    /// The containing block.
    #[must_use]
    pub const fn block(&self) -> ContentId {
        ContentId::BLOCK
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: ContentId) -> Option<&ContentNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by its ID.
    pub fn get_mut(&mut self, id: ContentId) -> Option<&mut ContentNode> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, including the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the block is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownContent`] if `parent` does not exist.
    pub fn append(&mut self, parent: ContentId, kind: ContentKind, style: BoxStyle) -> Result<ContentId> {
        let id = ContentId(self.nodes.len());
        self.nodes
            .get_mut(parent.0)
            .ok_or(TreeError::UnknownContent(parent))?
            .children
            .push(id);
        self.nodes.push(ContentNode::new(kind, style, Some(parent)));
        Ok(id)
    }

    /// Append an inline element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownContent`] if `parent` does not exist.
    pub fn add_inline(&mut self, parent: ContentId, style: BoxStyle) -> Result<ContentId> {
        self.append(parent, ContentKind::Inline, style)
    }

    /// Append a text node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownContent`] if `parent` does not exist.
    pub fn add_text(&mut self, parent: ContentId, text: &str, style: BoxStyle) -> Result<ContentId> {
        self.append(
            parent,
            ContentKind::Text {
                text: text.to_string(),
            },
            style,
        )
    }

    /// Append an atomic inline.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownContent`] if `parent` does not exist.
    pub fn add_atomic(&mut self, parent: ContentId, atomic: AtomicContent, style: BoxStyle) -> Result<ContentId> {
        self.append(parent, ContentKind::Atomic(atomic), style)
    }

    /// Append a forced line break.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownContent`] if `parent` does not exist.
    pub fn add_line_break(&mut self, parent: ContentId, style: BoxStyle) -> Result<ContentId> {
        self.append(parent, ContentKind::LineBreak, style)
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: ContentId) -> Option<ContentId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Last child of a node.
    #[must_use]
    pub fn last_child(&self, id: ContentId) -> Option<ContentId> {
        self.get(id).and_then(|node| node.children.last().copied())
    }

    /// Style of a node for the first line or elsewhere.
    #[must_use]
    pub fn style(&self, id: ContentId, first_line: bool) -> Option<&BoxStyle> {
        self.get(id).map(|node| node.style_for(first_line))
    }

    /// Width of the containing block in the line direction.
    #[must_use]
    pub fn block_logical_width(&self) -> f32 {
        match self.get(ContentId::BLOCK).map(|node| &node.kind) {
            Some(ContentKind::Block { logical_width }) => *logical_width,
            _ => 0.0,
        }
    }

    /// Iterate from `id` up through its ancestors (inclusive).
    #[must_use]
    pub const fn ancestors(&self, id: ContentId) -> ContentAncestors<'_> {
        ContentAncestors {
            tree: self,
            current: Some(id),
        }
    }

    /// True if `ancestor` is `child` or contains it without an intervening
    /// block.
    #[must_use]
    pub fn is_ancestor_within_block(&self, ancestor: ContentId, child: ContentId) -> bool {
        self.ancestors(child)
            .take_while(|&id| self.get(id).is_some_and(|node| !node.is_block()))
            .any(|id| id == ancestor)
    }

    /// True if `child` is the last descendant of `ancestor` along a chain of
    /// last children, stopping at the containing block.
    #[must_use]
    pub fn is_last_child_for(&self, ancestor: ContentId, child: ContentId) -> bool {
        if child == ancestor {
            return true;
        }
        let mut current = child;
        while let Some(parent) = self.parent(current) {
            if self.get(parent).is_none_or(ContentNode::is_block) {
                break;
            }
            if self.last_child(parent) != Some(current) {
                return false;
            }
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        true
    }
}

/// Iterator over a content node and its ancestors.
pub struct ContentAncestors<'a> {
    tree: &'a ContentTree,
    current: Option<ContentId>,
}

impl Iterator for ContentAncestors<'_> {
    type Item = ContentId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_child_chain_stops_at_block() {
        let mut tree = ContentTree::new(BoxStyle::default(), 100.0);
        let span = tree.add_inline(ContentId::BLOCK, BoxStyle::default()).unwrap();
        let first = tree.add_text(span, "a", BoxStyle::default()).unwrap();
        let last = tree.add_text(span, "b", BoxStyle::default()).unwrap();

        assert!(tree.is_last_child_for(span, last));
        assert!(!tree.is_last_child_for(span, first));
        assert!(tree.is_ancestor_within_block(span, first));
        assert!(!tree.is_ancestor_within_block(ContentId::BLOCK, first));
    }
}
