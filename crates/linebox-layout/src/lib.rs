//! Inline line layout for the linebox engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Inline box tree** ([§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Root, flow, text and atomic boxes in a generational arena
//!   - Line construction, removal, extraction and reattachment
//!   - Consistency checking of child lists
//!
//! - **Line placement** ([§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height))
//!   - Inline-direction placement with margins, borders, padding and word spacing
//!   - Baseline alignment for every `vertical-align` keyword
//!   - Strict and quirks mode line bounds
//!
//! - **Overflow** ([§ 11.1 Overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow))
//!   - Layout and visual overflow from shadows, outlines, glyph ink and atomic content
//!
//! - **Bidi reordering** ([UAX #9 rule L2](https://www.unicode.org/reports/tr9/#L2))
//!   - Logical and visual leaf order from precomputed embedding levels
//!
//! # Not Yet Implemented
//!
//! - Ruby annotations and their effect on line bounds
//! - `line-box-contain`
//! - Pagination struts

/// Content nodes the line boxes are generated for.
pub mod content;
/// Error types for tree operations and consistency checks.
pub mod error;
/// Points, sizes, rectangles and edge sizes.
pub mod geometry;
/// The inline box tree and its layout passes.
pub mod inline_box;
/// Font metrics and the metrics provider trait.
pub mod metrics;
/// Computed style values consulted by layout and painting.
pub mod style;

#[cfg(feature = "layout-trace")]
mod trace;

pub use content::{AtomicContent, ContentId, ContentKind, ContentNode, ContentTree};
pub use error::{ConsistencyError, TreeError};
pub use geometry::{EdgeSizes, Point, Rect, Size};
pub use inline_box::{BoxId, InlineTree, LayoutConfig};
pub use metrics::{ApproximateMetrics, BoxMetricsProvider, FontBaseline, FontMetrics};

/// Where and how to lay out one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParams {
    /// Logical left of the line (after text alignment).
    pub logical_left: f32,
    /// Block offset where the line starts.
    pub height_of_block: f32,
    /// This is the last line of the block.
    pub last_line: bool,
    /// Content of the last run on the line.
    pub logically_last_run: Option<ContentId>,
    /// The last run continues on the next line.
    pub last_run_wrapped: bool,
    /// Mode and baseline settings.
    pub config: LayoutConfig,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            logical_left: 0.0,
            height_of_block: 0.0,
            last_line: true,
            logically_last_run: None,
            last_run_wrapped: false,
            config: LayoutConfig::default(),
        }
    }
}

/// Run every pass over a constructed line, in order: edge spacing,
/// inline-direction placement, block-direction alignment, atomic content
/// positioning and overflow. The line is then marked constructed.
///
/// Returns the block offset where the next line starts.
///
/// # Errors
///
/// Returns [`TreeError::NotARootBox`] if `root` is not a root box.
pub fn layout_line(
    tree: &mut InlineTree,
    root: BoxId,
    params: &LineParams,
    metrics: &dyn BoxMetricsProvider,
) -> error::Result<f32> {
    // Reject non-root boxes before any pass mutates the tree.
    tree.root_line(root).map(|_| ())?;
    tree.determine_spacing_for_flow_boxes(
        root,
        params.last_line,
        params.last_run_wrapped,
        params.logically_last_run,
    );
    let mut needs_word_spacing = false;
    // The root stores its own width, so the returned right edge is unused.
    let _logical_right = tree.place_boxes_in_inline_direction(root, params.logical_left, &mut needs_word_spacing);
    let next_line = tree.align_boxes_in_block_direction(root, params.height_of_block, params.config, metrics)?;
    tree.position_atomic_content(root);

    let line = tree.root_line(root)?;
    let (line_top, line_bottom) = (line.line_top(), line.line_bottom());
    tree.compute_overflow(root, line_top, line_bottom, metrics);
    tree.set_constructed(root)?;
    Ok(next_line)
}
