//! Box-model painting for the linebox engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Borders** ([§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders))
//!   - All ten `border-style` values, per side, with mitred corners
//!   - Rounded corners ([§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners))
//!   - Fast paths for uniform and translucent borders
//!
//! - **Backgrounds** ([§ 3.7 'background-clip'](https://www.w3.org/TR/css-backgrounds-3/#background-clip))
//!   - Background color clipped to the border, padding or content box
//!
//! - **Shadows** ([§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow))
//!   - Outer and inset shadows with spread, offset and blur
//!
//! - **Line painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Back-to-front traversal of a laid-out line with overflow culling
//!   - Fragments of split inlines drawn without their split edges
//!
//! Drawing goes through the [`PaintSurface`] trait. [`RecordingSurface`]
//! captures the calls as a [`DisplayList`]; rasterizing is left to the
//! render crate.
//!
//! # Not Yet Implemented
//!
//! - Background images and gradients
//! - Glyph painting (text boxes contribute geometry only)
//! - Background bleed avoidance modes
//! - Outlines

/// Per-side border descriptions.
pub mod border_edge;
/// Painting a laid-out line.
pub mod inline;
/// Border, background and shadow painting for one fragment.
pub mod painter;
/// Display list recording.
pub mod recording;
/// The drawing surface trait and its geometry.
pub mod surface;

pub use border_edge::{BorderEdge, BoxSide, BoxSideSet};
pub use inline::{PaintInfo, paint_box, paint_line};
pub use painter::paint_box_decoration_background;
pub use recording::{DisplayList, PaintCommand, RecordingSurface};
pub use surface::{PaintSurface, Path, RoundedRect, StateSaver};
