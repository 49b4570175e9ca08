//! Font metrics backed by fontdue.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use fontdue::{Font, FontSettings};
use linebox_common::warning::warn_once;
use linebox_layout::metrics::{ApproximateMetrics, BoxMetricsProvider, FontMetrics};
use linebox_layout::style::BoxStyle;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// [`BoxMetricsProvider`] reading vertical metrics and advance widths from a
/// single font file. The style's family name is ignored.
///
/// Uses `Font::metrics()` (not `Font::rasterize()`) so measuring never
/// generates bitmaps.
pub struct FontdueMetrics {
    font: Font,
}

impl std::fmt::Debug for FontdueMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueMetrics")
            .field("units_per_em", &self.font.units_per_em())
            .finish_non_exhaustive()
    }
}

impl FontdueMetrics {
    /// Wrap a loaded font.
    #[must_use]
    pub const fn new(font: Font) -> Self {
        Self { font }
    }

    /// Parse a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if fontdue cannot parse the data.
    pub fn from_bytes(data: Vec<u8>) -> anyhow::Result<Self> {
        Font::from_bytes(data, FontSettings::default())
            .map(Self::new)
            .map_err(|e| anyhow::anyhow!("failed to parse font: {e}"))
    }

    /// Load the first readable font from the usual system locations.
    #[must_use]
    pub fn load_system_font() -> Option<Self> {
        for path in FONT_SEARCH_PATHS {
            if let Ok(data) = std::fs::read(path)
                && let Ok(metrics) = Self::from_bytes(data)
            {
                return Some(metrics);
            }
        }
        None
    }

    /// Load a system font, falling back to [`ApproximateMetrics`] with a
    /// warning when none is installed.
    #[must_use]
    pub fn system_or_approximate() -> Box<dyn BoxMetricsProvider> {
        match Self::load_system_font() {
            Some(metrics) => Box::new(metrics),
            None => {
                warn_once("Render", "no system font found, using approximate metrics");
                Box::new(ApproximateMetrics)
            }
        }
    }
}

impl BoxMetricsProvider for FontdueMetrics {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn font_metrics(&self, style: &BoxStyle) -> FontMetrics {
        let size = style.font.size;
        let Some(line) = self.font.horizontal_line_metrics(size) else {
            // Fonts without a horizontal header.
            return ApproximateMetrics.font_metrics(style);
        };
        FontMetrics {
            ascent: line.ascent.round(),
            // fontdue reports descent below the baseline as negative.
            descent: (-line.descent).round(),
            line_gap: line.line_gap.round(),
            x_height: self.font.metrics('x', size).height as f32,
            units_per_em: self.font.units_per_em().clamp(0.0, f32::from(u16::MAX)) as u16,
        }
    }

    fn text_width(&self, text: &str, style: &BoxStyle) -> f32 {
        let size = style.font.size;
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, size).advance_width + style.font.letter_spacing)
            .sum()
    }
}
