//! Serializable view of a laid-out line, for dumps and golden tests.

use serde::Serialize;

use crate::content::ContentId;
use crate::geometry::Rect;
use crate::metrics::BoxMetricsProvider;

use super::{BoxId, BoxKind, InlineTree, LeafKind};

/// One box of a line with its resolved geometry, and its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSnapshot {
    /// Box handle.
    pub id: BoxId,
    /// Content node the box belongs to.
    pub content: ContentId,
    /// `root`, `flow`, `text`, `break` or `atomic`.
    pub kind: &'static str,
    /// Physical frame rect.
    pub frame: Rect,
    /// Baseline offset from the top of the line-height area.
    pub baseline: f32,
    /// Bidi embedding level.
    pub bidi_level: u8,
    /// Draws its start edge (flow boxes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_left_edge: Option<bool>,
    /// Draws its end edge (flow boxes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_right_edge: Option<bool>,
    /// Visual overflow, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_overflow: Option<Rect>,
    /// Layout overflow, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_overflow: Option<Rect>,
    /// Children in line order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxSnapshot>,
}

impl InlineTree {
    /// Capture the subtree under `id`, or `None` for a stale handle.
    #[must_use]
    pub fn snapshot(&self, id: BoxId, metrics: &dyn BoxMetricsProvider) -> Option<BoxSnapshot> {
        let node = self.get(id)?;
        let kind = match &node.kind {
            BoxKind::Root(_) => "root",
            BoxKind::Flow(_) => "flow",
            BoxKind::Leaf(LeafKind::Text { is_text: true, .. }) => "text",
            BoxKind::Leaf(LeafKind::Text { is_text: false, .. }) => "break",
            BoxKind::Leaf(LeafKind::Atomic) => "atomic",
        };
        let record = node.overflow.record();
        Some(BoxSnapshot {
            id,
            content: node.content(),
            kind,
            frame: self.frame_rect(id, metrics),
            baseline: self.baseline_position(id, metrics),
            bidi_level: node.flags.bidi_level,
            include_left_edge: node.flow().map(|flow| flow.include_logical_left_edge),
            include_right_edge: node.flow().map(|flow| flow.include_logical_right_edge),
            visual_overflow: record.map(|record| record.visual_overflow),
            layout_overflow: record.map(|record| record.layout_overflow),
            children: self
                .children(id)
                .filter_map(|child| self.snapshot(child, metrics))
                .collect(),
        })
    }
}
