//! Inline boxes: the tree of positioned boxes that makes up one line.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "The rectangular area that contains the boxes that form a line is called
//! a line box."
//!
//! # Design
//!
//! Every line is a tree rooted at a [`BoxKind::Root`] box. Flow boxes (one
//! per inline element fragment on the line) contain leaf boxes (text runs
//! and atomic inlines) and other flow boxes. All boxes live in one arena
//! owned by [`InlineTree`] and are addressed by generational [`BoxId`]
//! handles:
//!
//! - `parent`, `next_on_line` and `prev_on_line` are handles, and they are
//!   only ever written by [`InlineTree::add_to_line`] and
//!   [`InlineTree::remove_child`], so a box without a parent never has
//!   siblings.
//! - Destroying a box bumps its slot's generation; an old handle is then
//!   rejected instead of aliasing whatever reuses the slot.
//!
//! The passes run in a fixed order per line: inline-direction placement,
//! block-direction alignment, then overflow.

mod block_direction;
mod consistency;
mod inline_direction;
mod line_data;
mod overflow;
mod snapshot;
mod traversal;
mod tree_ops;

use std::fmt;

use serde::Serialize;

use crate::content::{ContentId, ContentKind, ContentTree};
use crate::error::{Result, TreeError};
use crate::geometry::{Point, Rect};
use crate::metrics::{BoxMetricsProvider, FontBaseline};
use crate::style::{BoxStyle, VerticalAlign};

pub use block_direction::{BlockExtent, LayoutConfig, LineHeights};
pub use line_data::LineData;
pub use overflow::{OverflowState, RenderOverflow};
pub use snapshot::BoxSnapshot;
pub use traversal::{Ancestors, Children};

/// The deepest bidi embedding level allowed.
pub const MAX_BIDI_LEVEL: u8 = 125;

/// Generational handle to a box in an [`InlineTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId {
    index: u32,
    generation: u32,
}

impl BoxId {
    /// Slot index in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// How many times the slot has been reused.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "b{}", self.index)
        } else {
            write!(f, "b{}@{}", self.index, self.generation)
        }
    }
}

/// Extra ink a text run paints outside its frame rect, as reported by the
/// shaper. All values are non-negative distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GlyphOverflow {
    /// Ink above the ascent.
    pub top: f32,
    /// Ink below the descent.
    pub bottom: f32,
    /// Ink before the first advance.
    pub left: f32,
    /// Ink past the last advance.
    pub right: f32,
}

impl GlyphOverflow {
    /// True if no glyph paints outside the frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0 && self.right <= 0.0
    }
}

/// A range of a text node placed on one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextRun {
    /// Byte offset of the run in the node's text.
    pub start: usize,
    /// Byte length of the run.
    pub len: usize,
    /// Ink outside the frame.
    pub glyph_overflow: GlyphOverflow,
}

/// The two kinds of leaf box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LeafKind {
    /// A text run. `is_text` is false for zero-height runs such as a forced
    /// line break.
    Text {
        /// The range of the node's text.
        run: TextRun,
        /// Whether the run contributes font height to the line.
        is_text: bool,
    },
    /// A replaced element or inline-block.
    Atomic,
}

/// Container state of a flow box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowBox {
    pub(crate) first_child: Option<BoxId>,
    pub(crate) last_child: Option<BoxId>,
    pub(crate) include_logical_left_edge: bool,
    pub(crate) include_logical_right_edge: bool,
    pub(crate) descendants_have_same_line_height_and_baseline: bool,
    pub(crate) has_text_children: bool,
    pub(crate) has_text_descendants: bool,
}

impl Default for FlowBox {
    fn default() -> Self {
        Self {
            first_child: None,
            last_child: None,
            include_logical_left_edge: true,
            include_logical_right_edge: true,
            descendants_have_same_line_height_and_baseline: true,
            has_text_children: false,
            has_text_descendants: false,
        }
    }
}

impl FlowBox {
    /// First child in line order.
    #[must_use]
    pub const fn first_child(&self) -> Option<BoxId> {
        self.first_child
    }

    /// Last child in line order.
    #[must_use]
    pub const fn last_child(&self) -> Option<BoxId> {
        self.last_child
    }

    /// True if the box has no children.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_child.is_none()
    }

    /// Whether border, padding and margin are drawn at the start of the line
    /// direction. False for the later fragments of a box split across lines.
    #[must_use]
    pub const fn include_logical_left_edge(&self) -> bool {
        self.include_logical_left_edge
    }

    /// Whether border, padding and margin are drawn at the end of the line
    /// direction.
    #[must_use]
    pub const fn include_logical_right_edge(&self) -> bool {
        self.include_logical_right_edge
    }

    /// Fast-path flag: every descendant shares this box's font metrics,
    /// line height and baseline, so block placement is a single offset.
    /// Once cleared it stays cleared until the line is rebuilt.
    #[must_use]
    pub const fn descendants_have_same_line_height_and_baseline(&self) -> bool {
        self.descendants_have_same_line_height_and_baseline
    }

    /// True if a direct child is a text box of this box's own element.
    #[must_use]
    pub const fn has_text_children(&self) -> bool {
        self.has_text_children
    }

    /// True if any descendant is a text box.
    #[must_use]
    pub const fn has_text_descendants(&self) -> bool {
        self.has_text_descendants
    }
}

/// A flow box that represents a whole line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootBox {
    pub(crate) flow: FlowBox,
    pub(crate) line: LineData,
}

impl RootBox {
    /// Container state.
    #[must_use]
    pub const fn flow(&self) -> &FlowBox {
        &self.flow
    }

    /// Per-line metadata.
    #[must_use]
    pub const fn line(&self) -> &LineData {
        &self.line
    }
}

/// Which kind of box this is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoxKind {
    /// Text run or atomic inline.
    Leaf(LeafKind),
    /// Fragment of an inline element.
    Flow(FlowBox),
    /// The line itself.
    Root(Box<RootBox>),
}

/// Per-box state flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoxFlags {
    /// The box is on the first formatted line and uses first-line style.
    pub first_line: bool,
    /// Set by [`InlineTree::set_constructed`] once the line is built.
    pub constructed: bool,
    /// The line needs relayout.
    pub dirty: bool,
    /// Detached from its content node by `extract_line`.
    pub extracted: bool,
    /// The line runs horizontally.
    pub is_horizontal: bool,
    /// Overrides the computed logical height.
    pub virtual_logical_height: Option<f32>,
    /// Justification expansion applied to this box, in pixels.
    pub expansion: i32,
    /// An ellipsis box is attached (root boxes only).
    pub has_ellipsis_box: bool,
    /// A hyphen is drawn at the end (text boxes only).
    pub has_hyphen: bool,
    /// Some children are selected (root boxes only).
    pub has_selected_children: bool,
    /// Justification may insert space before this box (text boxes only).
    pub can_have_leading_expansion: bool,
    pub(crate) bidi_level: u8,
    pub(crate) next_on_line_exists: bool,
}

impl BoxFlags {
    /// Bidi embedding level, at most [`MAX_BIDI_LEVEL`].
    #[must_use]
    pub const fn bidi_level(&self) -> u8 {
        self.bidi_level
    }
}

/// One box on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineBox {
    content: ContentId,
    pub(crate) parent: Option<BoxId>,
    pub(crate) next_on_line: Option<BoxId>,
    pub(crate) prev_on_line: Option<BoxId>,
    pub(crate) origin: Point,
    pub(crate) logical_width: f32,
    pub(crate) flags: BoxFlags,
    pub(crate) overflow: OverflowState,
    pub(crate) kind: BoxKind,
}

impl InlineBox {
    fn new(content: ContentId, kind: BoxKind, is_horizontal: bool) -> Self {
        Self {
            content,
            parent: None,
            next_on_line: None,
            prev_on_line: None,
            origin: Point::default(),
            logical_width: 0.0,
            flags: BoxFlags {
                is_horizontal,
                ..BoxFlags::default()
            },
            overflow: OverflowState::KnownNone,
            kind,
        }
    }

    /// The content node this box was generated for.
    #[must_use]
    pub const fn content(&self) -> ContentId {
        self.content
    }

    /// Containing flow box.
    #[must_use]
    pub const fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    /// Next sibling on the line.
    #[must_use]
    pub const fn next_on_line(&self) -> Option<BoxId> {
        self.next_on_line
    }

    /// Previous sibling on the line.
    #[must_use]
    pub const fn prev_on_line(&self) -> Option<BoxId> {
        self.prev_on_line
    }

    /// Physical top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Extent along the line direction.
    #[must_use]
    pub const fn logical_width(&self) -> f32 {
        self.logical_width
    }

    /// State flags.
    #[must_use]
    pub const fn flags(&self) -> &BoxFlags {
        &self.flags
    }

    /// Which kind of box this is.
    #[must_use]
    pub const fn kind(&self) -> &BoxKind {
        &self.kind
    }

    /// Overflow bookkeeping.
    #[must_use]
    pub const fn overflow(&self) -> &OverflowState {
        &self.overflow
    }

    /// True if the box is known not to paint or lay out anything outside
    /// its frame. A box in this state never carries an overflow record.
    #[must_use]
    pub const fn known_to_have_no_overflow(&self) -> bool {
        matches!(self.overflow, OverflowState::KnownNone)
    }

    /// Text run or atomic inline.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, BoxKind::Leaf(_))
    }

    /// Flow or root box.
    #[must_use]
    pub const fn is_flow(&self) -> bool {
        !self.is_leaf()
    }

    /// The box for a whole line.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self.kind, BoxKind::Root(_))
    }

    /// A text run box (including zero-height runs).
    #[must_use]
    pub const fn is_text_box(&self) -> bool {
        matches!(self.kind, BoxKind::Leaf(LeafKind::Text { .. }))
    }

    /// A text run that contributes font height.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, BoxKind::Leaf(LeafKind::Text { is_text: true, .. }))
    }

    /// A replaced element or inline-block.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        matches!(self.kind, BoxKind::Leaf(LeafKind::Atomic))
    }

    /// Container state of a flow or root box.
    #[must_use]
    pub fn flow(&self) -> Option<&FlowBox> {
        match &self.kind {
            BoxKind::Flow(flow) => Some(flow),
            BoxKind::Root(root) => Some(&root.flow),
            BoxKind::Leaf(_) => None,
        }
    }

    pub(crate) fn flow_mut(&mut self) -> Option<&mut FlowBox> {
        match &mut self.kind {
            BoxKind::Flow(flow) => Some(flow),
            BoxKind::Root(root) => Some(&mut root.flow),
            BoxKind::Leaf(_) => None,
        }
    }

    /// Per-line metadata of a root box.
    #[must_use]
    pub fn line_data(&self) -> Option<&LineData> {
        match &self.kind {
            BoxKind::Root(root) => Some(&root.line),
            _ => None,
        }
    }

    pub(crate) fn line_data_mut(&mut self) -> Option<&mut LineData> {
        match &mut self.kind {
            BoxKind::Root(root) => Some(&mut root.line),
            _ => None,
        }
    }

    /// The text range of a text box.
    #[must_use]
    pub const fn text_run(&self) -> Option<&TextRun> {
        match &self.kind {
            BoxKind::Leaf(LeafKind::Text { run, .. }) => Some(run),
            _ => None,
        }
    }

    /// Position along the line direction.
    #[must_use]
    pub const fn logical_left(&self) -> f32 {
        if self.flags.is_horizontal { self.origin.x } else { self.origin.y }
    }

    /// Logical left plus logical width.
    #[must_use]
    pub fn logical_right(&self) -> f32 {
        self.logical_left() + self.logical_width
    }

    /// Position along the block direction.
    #[must_use]
    pub const fn logical_top(&self) -> f32 {
        if self.flags.is_horizontal { self.origin.y } else { self.origin.x }
    }

    pub(crate) const fn set_logical_left(&mut self, left: f32) {
        if self.flags.is_horizontal {
            self.origin.x = left;
        } else {
            self.origin.y = left;
        }
    }

    pub(crate) const fn set_logical_top(&mut self, top: f32) {
        if self.flags.is_horizontal {
            self.origin.y = top;
        } else {
            self.origin.x = top;
        }
    }
}

/// One slot of the arena.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<InlineBox>,
}

/// Arena owning every inline box of a block, plus the content tree they
/// were generated for.
#[derive(Debug, Clone)]
pub struct InlineTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    content: ContentTree,
}

impl InlineTree {
    /// Create an empty box arena over a content tree.
    #[must_use]
    pub const fn new(content: ContentTree) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            content,
        }
    }

    /// The content tree.
    #[must_use]
    pub const fn content(&self) -> &ContentTree {
        &self.content
    }

    /// The content tree, mutably (for the line breaker to adjust styles or
    /// atomic sizes between layouts).
    pub const fn content_mut(&mut self) -> &mut ContentTree {
        &mut self.content
    }

    /// Get a live box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&InlineBox> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: BoxId) -> Option<&mut InlineBox> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Get a live box or report a stale handle.
    pub(crate) fn node(&self, id: BoxId) -> Result<&InlineBox> {
        self.get(id).ok_or(TreeError::StaleHandle(id))
    }

    pub(crate) fn node_mut(&mut self, id: BoxId) -> Result<&mut InlineBox> {
        self.get_mut(id).ok_or(TreeError::StaleHandle(id))
    }

    /// True if the handle refers to a live box.
    #[must_use]
    pub fn contains(&self, id: BoxId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live boxes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    /// Iterate over every live box handle, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|_| BoxId {
                index: u32::try_from(index).unwrap_or(u32::MAX),
                generation: slot.generation,
            })
        })
    }

    fn alloc(&mut self, node: InlineBox) -> BoxId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(node);
            return BoxId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            entry: Some(node),
        });
        BoxId {
            index,
            generation: 0,
        }
    }

    /// Free a slot. Links to and from the box must already be cleared.
    pub(crate) fn release(&mut self, id: BoxId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.generation == id.generation && slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    fn create(&mut self, content: ContentId, kind: BoxKind) -> Result<BoxId> {
        let node = self.content.get(content).ok_or(TreeError::UnknownContent(content))?;
        let horizontal = node.style.is_horizontal_writing_mode();
        let id = self.alloc(InlineBox::new(content, kind, horizontal));
        if let Some(node) = self.content.get_mut(content) {
            node.push_line_box(id);
        }
        Ok(id)
    }

    /// Create the root box of a new line for the containing block.
    ///
    /// # Errors
    ///
    /// Returns an error if the content tree has no block (never the case for
    /// a tree built with [`ContentTree::new`]).
    pub fn create_root_box(&mut self) -> Result<BoxId> {
        let block = self.content.block();
        let root = RootBox {
            flow: FlowBox::default(),
            line: LineData::default(),
        };
        self.create(block, BoxKind::Root(Box::new(root)))
    }

    /// Create a flow box for an inline element.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is missing or not an inline element.
    pub fn create_flow_box(&mut self, content: ContentId) -> Result<BoxId> {
        let node = self.content.get(content).ok_or(TreeError::UnknownContent(content))?;
        if !node.is_inline() {
            return Err(TreeError::WrongContentKind(content, "flow"));
        }
        self.create(content, BoxKind::Flow(FlowBox::default()))
    }

    /// Create a text box for `len` bytes of a text node starting at `start`,
    /// or the zero-height box of a line break.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is missing or is neither text nor a
    /// line break.
    pub fn create_text_box(&mut self, content: ContentId, start: usize, len: usize) -> Result<BoxId> {
        let node = self.content.get(content).ok_or(TreeError::UnknownContent(content))?;
        let is_text = match &node.kind {
            ContentKind::Text { .. } => true,
            ContentKind::LineBreak => false,
            _ => return Err(TreeError::WrongContentKind(content, "text")),
        };
        let run = TextRun {
            start,
            len,
            glyph_overflow: GlyphOverflow::default(),
        };
        self.create(content, BoxKind::Leaf(LeafKind::Text { run, is_text }))
    }

    /// Create the leaf box of an atomic inline. Its logical width is the
    /// border-box extent along the line.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is missing or not atomic.
    pub fn create_atomic_box(&mut self, content: ContentId) -> Result<BoxId> {
        let node = self.content.get(content).ok_or(TreeError::UnknownContent(content))?;
        let Some(atomic) = node.as_atomic() else {
            return Err(TreeError::WrongContentKind(content, "atomic"));
        };
        let horizontal = node.style.is_horizontal_writing_mode();
        let width = if horizontal {
            atomic.size.width
        } else {
            atomic.size.height
        };
        let id = self.create(content, BoxKind::Leaf(LeafKind::Atomic))?;
        self.node_mut(id)?.logical_width = width;
        Ok(id)
    }

    /// Set the extent along the line (done by the line breaker after
    /// measuring).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_logical_width(&mut self, id: BoxId, width: f32) -> Result<()> {
        self.node_mut(id)?.logical_width = width;
        Ok(())
    }

    /// Record the shaper's ink overflow for a text box. Overflowing glyphs
    /// make the box, and its ancestors, lose the no-overflow fast path.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_glyph_overflow(&mut self, id: BoxId, glyph_overflow: GlyphOverflow) -> Result<()> {
        let node = self.node_mut(id)?;
        if let BoxKind::Leaf(LeafKind::Text { run, .. }) = &mut node.kind {
            run.glyph_overflow = glyph_overflow;
        }
        if !glyph_overflow.is_empty() {
            self.clear_known_to_have_no_overflow(id);
        }
        Ok(())
    }

    /// Set the resolved bidi embedding level.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BidiLevelOutOfRange`] above [`MAX_BIDI_LEVEL`].
    pub fn set_bidi_level(&mut self, id: BoxId, level: u8) -> Result<()> {
        if level > MAX_BIDI_LEVEL {
            return Err(TreeError::BidiLevelOutOfRange(level));
        }
        self.node_mut(id)?.flags.bidi_level = level;
        Ok(())
    }

    /// Set the justification expansion of a box.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_expansion(&mut self, id: BoxId, expansion: i32) -> Result<()> {
        self.node_mut(id)?.flags.expansion = expansion;
        Ok(())
    }

    /// Override the computed logical height (used for boxes whose height is
    /// dictated by something other than their font, like an empty line's
    /// strut).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_virtual_logical_height(&mut self, id: BoxId, height: Option<f32>) -> Result<()> {
        self.node_mut(id)?.flags.virtual_logical_height = height;
        Ok(())
    }

    /// Mark a root box as the first formatted line. Children pick the bit
    /// up when they are added to the line.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleHandle`] for a destroyed box.
    pub fn set_first_line(&mut self, id: BoxId, first_line: bool) -> Result<()> {
        self.node_mut(id)?.flags.first_line = first_line;
        Ok(())
    }

    /// Style of the box's content, honoring the first-line bit.
    #[must_use]
    pub fn style(&self, id: BoxId) -> Option<&BoxStyle> {
        let node = self.get(id)?;
        self.content.style(node.content, node.flags.first_line)
    }

    /// True if the box's content is out-of-flow positioned.
    #[must_use]
    pub fn is_out_of_flow(&self, id: BoxId) -> bool {
        self.get(id)
            .and_then(|node| self.content.get(node.content))
            .is_some_and(|content| content.out_of_flow)
    }

    /// True if the box's content paints in its own layer.
    #[must_use]
    pub fn has_self_painting_layer(&self, id: BoxId) -> bool {
        self.get(id)
            .and_then(|node| self.content.get(node.content))
            .is_some_and(|content| content.self_painting_layer)
    }

    /// `vertical-align` of the box. Text boxes follow their parent's
    /// baseline and always report `Baseline`.
    #[must_use]
    pub fn vertical_align(&self, id: BoxId) -> VerticalAlign {
        match self.get(id) {
            Some(node) if node.is_text_box() => VerticalAlign::Baseline,
            Some(_) => self.style(id).map_or(VerticalAlign::Baseline, |style| style.vertical_align),
            None => VerticalAlign::Baseline,
        }
    }

    /// Baseline the line this box is on aligns to.
    #[must_use]
    pub fn baseline_type(&self, id: BoxId) -> FontBaseline {
        self.root_of(id)
            .and_then(|root| self.get(root))
            .and_then(InlineBox::line_data)
            .map_or(FontBaseline::Alphabetic, |line| line.baseline_type)
    }

    /// Margin-box extent of an atomic inline in the block direction, and the
    /// margin on its over side.
    fn atomic_block_extent(&self, id: BoxId) -> Option<(f32, f32, Option<f32>)> {
        let node = self.get(id)?;
        let content = self.content.get(node.content)?;
        let atomic = content.as_atomic()?;
        let horizontal = node.flags.is_horizontal;
        let margin = content.style.margin;
        let (extent, baseline) = if horizontal {
            (atomic.size.height, atomic.baseline)
        } else {
            (atomic.size.width, None)
        };
        let before = margin.logical_top(horizontal);
        let after = margin.logical_bottom(horizontal);
        Some((before + extent + after, before, baseline))
    }

    /// Used line height of the box.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// Atomic inlines use their margin-box height; zero-height text runs
    /// report 0.
    #[must_use]
    pub fn line_height(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> f32 {
        let Some(node) = self.get(id) else {
            return 0.0;
        };
        match &node.kind {
            BoxKind::Leaf(LeafKind::Text { is_text: false, .. }) => 0.0,
            BoxKind::Leaf(LeafKind::Atomic) => self.atomic_block_extent(id).map_or(0.0, |(extent, _, _)| extent),
            _ => self.style(id).map_or(0.0, |style| metrics.line_height(style)),
        }
    }

    /// Distance from the top of the box's line-height area to its baseline.
    ///
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "the leading L is added to the font's ascent and descent ... half the
    /// leading is added above A and the other half below D."
    #[must_use]
    pub fn baseline_position(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> f32 {
        let Some(node) = self.get(id) else {
            return 0.0;
        };
        match &node.kind {
            BoxKind::Leaf(LeafKind::Text { is_text: false, .. }) => 0.0,
            BoxKind::Leaf(LeafKind::Atomic) => self
                .atomic_block_extent(id)
                .map_or(0.0, |(extent, before, baseline)| baseline.map_or(extent, |b| before + b)),
            _ => {
                let Some(style) = self.style(id) else {
                    return 0.0;
                };
                let font = metrics.font_metrics(style);
                let baseline = self.baseline_type(id);
                let font_height = font.ascent_for(baseline) + font.descent_for(baseline);
                font.ascent_for(baseline) + ((metrics.line_height(style) - font_height) / 2.0).trunc()
            }
        }
    }

    /// Extent of the box in the block direction.
    ///
    /// A virtual height wins. Text runs use their font height (0 for
    /// zero-height runs), atomic inlines their border box, and flow boxes
    /// their font height plus border and padding (except the root).
    #[must_use]
    pub fn logical_height(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> f32 {
        let Some(node) = self.get(id) else {
            return 0.0;
        };
        if let Some(height) = node.flags.virtual_logical_height {
            return height;
        }
        let Some(style) = self.style(id) else {
            return 0.0;
        };
        match &node.kind {
            BoxKind::Leaf(LeafKind::Text { is_text, .. }) => {
                if *is_text {
                    metrics.font_metrics(style).height()
                } else {
                    0.0
                }
            }
            BoxKind::Leaf(LeafKind::Atomic) => {
                if node.parent.is_none() {
                    return 0.0;
                }
                self.content
                    .get(node.content)
                    .and_then(|content| content.as_atomic())
                    .map_or(0.0, |atomic| {
                        if node.flags.is_horizontal {
                            atomic.size.height
                        } else {
                            atomic.size.width
                        }
                    })
            }
            BoxKind::Flow(_) | BoxKind::Root(_) => {
                let font_height = metrics.font_metrics(style).height();
                if node.parent.is_some() {
                    font_height + style.border_and_padding_logical_height()
                } else {
                    font_height
                }
            }
        }
    }

    /// Logical top plus logical height.
    #[must_use]
    pub fn logical_bottom(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> f32 {
        self.get(id)
            .map_or(0.0, |node| node.logical_top() + self.logical_height(id, metrics))
    }

    /// The box's rectangle in physical coordinates.
    #[must_use]
    pub fn frame_rect(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> Rect {
        let Some(node) = self.get(id) else {
            return Rect::default();
        };
        let height = self.logical_height(id, metrics);
        if node.flags.is_horizontal {
            Rect::new(node.origin.x, node.origin.y, node.logical_width, height)
        } else {
            Rect::new(node.origin.x, node.origin.y, height, node.logical_width)
        }
    }

    /// The box's rectangle in logical coordinates (x along the line).
    #[must_use]
    pub fn logical_frame_rect(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> Rect {
        self.get(id).map_or_else(Rect::default, |node| {
            Rect::new(
                node.logical_left(),
                node.logical_top(),
                node.logical_width,
                self.logical_height(id, metrics),
            )
        })
    }

    /// True if any box on the line visually follows this one, either as a
    /// sibling or as content after one of its ancestors.
    ///
    /// Valid after [`InlineTree::refresh_next_on_line_exists`], which inline
    /// placement runs for the whole line.
    #[must_use]
    pub fn next_on_line_exists(&self, id: BoxId) -> bool {
        self.get(id).is_some_and(|node| node.flags.next_on_line_exists)
    }
}
