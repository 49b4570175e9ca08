//! Font metrics consumed by the line boxes.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Text shaping is not done here. The layout passes only need vertical
//! metrics per style, plus a width measurement for callers that build text
//! boxes from strings.

use serde::{Deserialize, Serialize};

use crate::style::{BoxStyle, LineHeight};

/// Which baseline the line aligns on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontBaseline {
    /// The usual Latin baseline.
    #[default]
    Alphabetic,
    /// Centered baseline used for vertical CJK text.
    Ideographic,
}

/// Vertical metrics of the primary font of a style.
///
/// Values are in whole CSS pixels so that baselines computed from them stay
/// on integer positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the em box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box.
    pub descent: f32,
    /// Extra spacing the font recommends between lines.
    pub line_gap: f32,
    /// Height of a lowercase 'x'.
    pub x_height: f32,
    /// Design units per em of the underlying font file (0 if unknown).
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Ascent plus descent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Ascent relative to the requested baseline.
    ///
    /// The ideographic baseline sits in the middle of the em box.
    #[must_use]
    pub fn ascent_for(&self, baseline: FontBaseline) -> f32 {
        match baseline {
            FontBaseline::Alphabetic => self.ascent,
            FontBaseline::Ideographic => self.height() - (self.height() / 2.0).floor(),
        }
    }

    /// Descent relative to the requested baseline.
    #[must_use]
    pub fn descent_for(&self, baseline: FontBaseline) -> f32 {
        match baseline {
            FontBaseline::Alphabetic => self.descent,
            FontBaseline::Ideographic => (self.height() / 2.0).floor(),
        }
    }

    /// Height plus line gap: the used value of `line-height: normal`.
    #[must_use]
    pub fn line_spacing(&self) -> f32 {
        self.height() + self.line_gap
    }

    /// True if both fonts would produce the same line geometry.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn has_identical_ascent_descent_and_line_gap(&self, other: &Self) -> bool {
        self.ascent == other.ascent
            && self.descent == other.descent
            && self.line_gap == other.line_gap
    }
}

/// Scale a value in font design units to em units.
///
/// A font reporting zero units per em is degenerate; the raw value is
/// returned unscaled instead of dividing by zero.
#[must_use]
pub fn scale_em_to_units(value: f32, units_per_em: u16) -> f32 {
    if units_per_em == 0 {
        value
    } else {
        value / f32::from(units_per_em)
    }
}

/// Supplies font metrics and text measurement for computed styles.
///
/// The tree chooses which style to pass (first-line or regular), so
/// providers never need to know about line position.
pub trait BoxMetricsProvider {
    /// Vertical metrics of the style's primary font.
    fn font_metrics(&self, style: &BoxStyle) -> FontMetrics;

    /// Total advance width of `text` in the style's font, including letter
    /// spacing.
    fn text_width(&self, text: &str, style: &BoxStyle) -> f32;

    /// Used line height for the style.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    fn line_height(&self, style: &BoxStyle) -> f32 {
        match style.line_height {
            LineHeight::Normal => self.font_metrics(style).line_spacing(),
            LineHeight::Px(px) => px,
        }
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Without access to actual font data, every glyph is 0.6em wide, the
/// ascent is 0.8em, the descent 0.2em and the line gap 0.2em, so
/// `line-height: normal` comes out at 1.2em. All values are rounded to whole
/// pixels.
///
/// This is used as a fallback when no font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl ApproximateMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;
    const LINE_GAP_RATIO: f32 = 0.2;
    const X_HEIGHT_RATIO: f32 = 0.5;
}

impl BoxMetricsProvider for ApproximateMetrics {
    fn font_metrics(&self, style: &BoxStyle) -> FontMetrics {
        let size = style.font.size;
        FontMetrics {
            ascent: (size * Self::ASCENT_RATIO).round(),
            descent: (size * Self::DESCENT_RATIO).round(),
            line_gap: (size * Self::LINE_GAP_RATIO).round(),
            x_height: (size * Self::X_HEIGHT_RATIO).round(),
            units_per_em: 1000,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, style: &BoxStyle) -> f32 {
        let count = text.chars().count() as f32;
        count * style.font.size.mul_add(Self::CHAR_WIDTH_RATIO, style.font.letter_spacing)
    }
}
