//! Rasterization and font metrics for the linebox engine.
//!
//! The paint crate only describes drawing; this crate supplies the concrete
//! collaborators a command-line or embedding program needs:
//!
//! - [`RasterSurface`] - a tiny-skia pixmap implementing
//!   [`linebox_paint::PaintSurface`], saved to disk with `image`
//! - [`FontdueMetrics`] - a [`linebox_layout::BoxMetricsProvider`] reading
//!   real font files with fontdue
//!
//! # Not Yet Implemented
//!
//! - Gaussian blur (shadow edges are approximated with stepped fills)
//! - Glyph rasterization

/// Font metrics backed by fontdue.
pub mod font_metrics;
/// tiny-skia raster surface.
pub mod raster;

pub use font_metrics::FontdueMetrics;
pub use raster::RasterSurface;
