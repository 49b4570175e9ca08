//! Error types for the inline box tree.
//!
//! Misuse of the arena API is reported through [`TreeError`]; structural
//! validation of an existing tree through [`ConsistencyError`]. Neither is a
//! user-facing failure: both indicate a bug in the caller (normally the line
//! breaker), surfaced as a value so tests can assert on it.

use thiserror::Error;

use crate::content::ContentId;
use crate::inline_box::BoxId;

/// Result alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// An operation on the inline tree was given arguments it cannot honor.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TreeError {
    /// The handle refers to a box that was destroyed (or never existed).
    #[error("box {0} is not a live box")]
    StaleHandle(BoxId),

    /// The content id is not part of the content tree.
    #[error("content node {0} does not exist")]
    UnknownContent(ContentId),

    /// The content node cannot generate this kind of box.
    #[error("content node {0} cannot generate a {1} box")]
    WrongContentKind(ContentId, &'static str),

    /// Children can only be added to flow or root boxes.
    #[error("box {0} is a leaf and cannot have children")]
    NotAFlowBox(BoxId),

    /// Root-only data was requested from a non-root box.
    #[error("box {0} is not a root inline box")]
    NotARootBox(BoxId),

    /// The box already sits on a line.
    #[error("box {child} is already attached to {parent}")]
    AlreadyAttached {
        /// The box being added.
        child: BoxId,
        /// Its current parent.
        parent: BoxId,
    },

    /// A root box is always the top of its line.
    #[error("root box {0} cannot be placed inside another box")]
    RootCannotBeChild(BoxId),

    /// A box cannot be placed inside itself or one of its descendants.
    #[error("box {0} cannot be added to its own subtree")]
    WouldCreateCycle(BoxId),

    /// `remove_child` was called with a box that belongs elsewhere.
    #[error("box {child} is not a child of {parent}")]
    NotAChild {
        /// The supposed parent.
        parent: BoxId,
        /// The box that was not found among its children.
        child: BoxId,
    },

    /// Bidi embedding levels are limited to 125.
    #[error("bidi level {0} exceeds the maximum of 125")]
    BidiLevelOutOfRange(u8),

    /// `line_top` must not be below `line_bottom`.
    #[error("line top {top} is below line bottom {bottom}")]
    InvertedLine {
        /// Requested top.
        top: f32,
        /// Requested bottom.
        bottom: f32,
    },
}

/// A structural invariant of a flow box's child list does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// A handle in the tree points at a destroyed box.
    #[error("box {0} refers to a destroyed box")]
    DanglingHandle(BoxId),

    /// A child's parent link does not point back at the flow box that lists it.
    #[error("child {child} of {parent} has parent {found:?}")]
    ParentMismatch {
        /// The flow box whose list was walked.
        parent: BoxId,
        /// The child found in the list.
        child: BoxId,
        /// The parent recorded on the child.
        found: Option<BoxId>,
    },

    /// `prev_on_line` of a child is not the box visited before it.
    #[error("child {child} of {parent} has a broken previous link")]
    BrokenPrevLink {
        /// The flow box whose list was walked.
        parent: BoxId,
        /// The child with the wrong link.
        child: BoxId,
    },

    /// Walking from the first child did not end at the recorded last child.
    #[error("walk of {parent} ended at {found:?} but last child is {expected:?}")]
    LastChildMismatch {
        /// The flow box whose list was walked.
        parent: BoxId,
        /// The recorded last child.
        expected: Option<BoxId>,
        /// The box the walk ended on.
        found: Option<BoxId>,
    },

    /// A box without a parent still has sibling links.
    #[error("box {0} has sibling links but no parent")]
    OrphanWithSiblings(BoxId),

    /// The child list loops back on itself.
    #[error("child list of {0} contains a cycle")]
    Cycle(BoxId),
}
