//! Computed style inputs consulted by line boxes and the box-model painter.
//!
//! Style resolution itself happens elsewhere; these are the already-computed
//! values for one content node, in the shape the layout and paint passes
//! read them.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::geometry::{EdgeSizes, Size};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::BLACK
    }
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Black lightened or darkened for 3D border styles.
    const SHADED_BLACK: Self = Self::rgba(0x54, 0x54, 0x54, 255);

    /// Create a color from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let short = |i: usize| u8::from_str_radix(&hex.get(i..=i)?.repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// True if the alpha channel is fully opaque.
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// True if nothing would be drawn with this color.
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// True if the color is partially transparent.
    #[must_use]
    pub const fn has_alpha(&self) -> bool {
        self.a < 255
    }

    /// The same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Darker shade used for the shadowed half of groove/ridge/inset/outset
    /// borders.
    #[must_use]
    pub fn dark(self) -> Self {
        if self.with_alpha(255) == Self::BLACK {
            return Self::SHADED_BLACK.with_alpha(self.a);
        }
        let (r, g, b) = self.unit_channels();
        let v = r.max(g).max(b);
        let multiplier = ((v - 0.33) / v).max(0.0);
        self.scaled(r * multiplier, g * multiplier, b * multiplier)
    }

    /// Lighter shade used for the lit half of 3D border styles.
    #[must_use]
    pub fn light(self) -> Self {
        let (r, g, b) = self.unit_channels();
        let v = r.max(g).max(b);
        if v == 0.0 {
            return Self::SHADED_BLACK.with_alpha(self.a);
        }
        let multiplier = (v + 0.33).min(1.0) / v;
        self.scaled(r * multiplier, g * multiplier, b * multiplier)
    }

    fn unit_channels(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scaled(self, r: f32, g: f32, b: f32) -> Self {
        // Just under 256 so a unit channel maps to 255.
        let to_byte = |c: f32| (c * 255.999).clamp(0.0, 255.0) as u8;
        Self::rgba(to_byte(r), to_byte(g), to_byte(b), self.a)
    }
}

/// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
///
/// Declared in the precedence order used by the border-conflict rules, so
/// `Ord` comparisons match "is at least as strong as".
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    /// "No border."
    #[default]
    None,
    /// "Same as 'none', but has different behavior in the border conflict
    /// resolution for table elements."
    Hidden,
    /// "Looks as if the content on the inside of the border is sunken into
    /// the canvas."
    Inset,
    /// "Looks as if it were carved in the canvas."
    Groove,
    /// "Looks as if the content on the inside of the border is coming out of
    /// the canvas."
    Outset,
    /// "Looks as if it were coming out of the canvas."
    Ridge,
    /// "A series of round dots."
    Dotted,
    /// "A series of square-ended dashes."
    Dashed,
    /// "A single line segment."
    Solid,
    /// "Two parallel solid lines with some space between them."
    Double,
}

impl BorderStyle {
    /// Styles that draw something when given a width.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None | Self::Hidden)
    }

    /// Groove, ridge, inset or outset.
    #[must_use]
    pub const fn is_3d(self) -> bool {
        matches!(self, Self::Inset | Self::Groove | Self::Outset | Self::Ridge)
    }
}

/// One side of a border.
///
/// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSide {
    /// [§ 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub width: f32,
    /// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    pub style: BorderStyle,
    /// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    pub color: ColorValue,
}

impl BorderSide {
    /// A border side from its three components.
    #[must_use]
    pub const fn new(width: f32, style: BorderStyle, color: ColorValue) -> Self {
        Self {
            width,
            style,
            color,
        }
    }

    /// Width that actually takes up space: `none`/`hidden` borders have zero
    /// used width.
    #[must_use]
    pub const fn used_width(&self) -> f32 {
        if self.style.is_visible() { self.width } else { 0.0 }
    }
}

/// The four border sides of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSides {
    /// Top side.
    pub top: BorderSide,
    /// Right side.
    pub right: BorderSide,
    /// Bottom side.
    pub bottom: BorderSide,
    /// Left side.
    pub left: BorderSide,
}

impl BorderSides {
    /// Every side set to the same value.
    #[must_use]
    pub const fn uniform(side: BorderSide) -> Self {
        Self {
            top: side,
            right: side,
            bottom: side,
            left: side,
        }
    }

    /// Used widths as edge sizes.
    #[must_use]
    pub const fn widths(&self) -> EdgeSizes {
        EdgeSizes {
            top: self.top.used_width(),
            right: self.right.used_width(),
            bottom: self.bottom.used_width(),
            left: self.left.used_width(),
        }
    }
}

/// [§ 5 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// Horizontal and vertical radius per corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerRadii {
    /// Top-left corner.
    pub top_left: Size,
    /// Top-right corner.
    pub top_right: Size,
    /// Bottom-left corner.
    pub bottom_left: Size,
    /// Bottom-right corner.
    pub bottom_right: Size,
}

impl CornerRadii {
    /// Circular corners of the same radius.
    #[must_use]
    pub const fn uniform(radius: f32) -> Self {
        let size = Size::new(radius, radius);
        Self {
            top_left: size,
            top_right: size,
            bottom_left: size,
            bottom_right: size,
        }
    }

    /// True if every corner is square.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
        .iter()
        .all(|corner| corner.is_empty())
    }
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    /// "Align the baseline of the box with the baseline of the parent box."
    #[default]
    Baseline,
    /// "Align the vertical midpoint of the box with the baseline plus half x-height."
    Middle,
    /// "Lower the baseline of the box for subscripts."
    Sub,
    /// "Raise the baseline of the box for superscripts."
    Super,
    /// "Align the top with the top of the parent's content area."
    TextTop,
    /// "Align the bottom with the bottom of the parent's content area."
    TextBottom,
    /// "Align the top of the aligned subtree with the top of the line box."
    Top,
    /// "Align the bottom of the aligned subtree with the bottom of the line box."
    Bottom,
    /// Raise the baseline by a specific pixel amount.
    Length(f32),
}

/// Whether a shadow is drawn outside or inside the border box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShadowStyle {
    /// Outer shadow.
    #[default]
    Normal,
    /// Inner shadow.
    Inset,
}

/// [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxShadow {
    /// Horizontal offset. Positive = right.
    pub offset_x: f32,
    /// Vertical offset. Positive = down.
    pub offset_y: f32,
    /// Blur radius. Must be >= 0. Default 0.
    pub blur_radius: f32,
    /// Spread radius. Default 0.
    pub spread_radius: f32,
    /// Shadow color.
    pub color: ColorValue,
    /// Outer or inset.
    pub style: ShadowStyle,
}

impl BoxShadow {
    /// How far the painted shadow reaches past the box on each side.
    ///
    /// Blur extends the shadow by its radius; negative results are clamped
    /// by the caller.
    #[must_use]
    pub fn extent(&self) -> EdgeSizes {
        let reach = self.spread_radius + self.blur_radius;
        EdgeSizes {
            top: reach - self.offset_y,
            right: reach + self.offset_x,
            bottom: reach + self.offset_y,
            left: reach - self.offset_x,
        }
    }
}

/// [§ 4 'text-shadow'](https://www.w3.org/TR/css-text-decor-3/#text-shadow-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextShadow {
    /// Horizontal offset.
    pub offset_x: f32,
    /// Vertical offset.
    pub offset_y: f32,
    /// Blur radius.
    pub blur_radius: f32,
    /// Shadow color.
    pub color: ColorValue,
}

/// [§ 3.1 'text-emphasis-style'](https://www.w3.org/TR/css-text-decor-3/#text-emphasis-style-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TextEmphasisMark {
    /// No emphasis marks.
    #[default]
    None,
    /// Small filled dots.
    Dot,
    /// Large circles.
    Circle,
    /// Double circles.
    DoubleCircle,
    /// Triangles.
    Triangle,
    /// Sesame marks.
    Sesame,
}

/// [§ 2 Block Flow Direction](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WritingMode {
    /// Horizontal lines stacked top to bottom.
    #[default]
    HorizontalTb,
    /// Vertical lines stacked right to left.
    VerticalRl,
    /// Vertical lines stacked left to right.
    VerticalLr,
}

impl WritingMode {
    /// True for `horizontal-tb`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::HorizontalTb)
    }

    /// True when the block direction runs against the physical axis
    /// (`vertical-rl`), so lines must be flipped after placement.
    #[must_use]
    pub const fn is_flipped_lines(self) -> bool {
        matches!(self, Self::VerticalRl)
    }
}

/// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineHeight {
    /// Use the font's own line spacing.
    #[default]
    Normal,
    /// A fixed used value in pixels.
    Px(f32),
}

/// [§ 5.1 'box-decoration-break'](https://www.w3.org/TR/css-break-3/#break-decoration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxDecorationBreak {
    /// Fragments are rendered as if the box were sliced at the break.
    #[default]
    Slice,
    /// Every fragment gets its own border, padding and margin.
    Clone,
}

/// [§ 3.7 'background-clip'](https://www.w3.org/TR/css-backgrounds-3/#background-clip)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundClip {
    /// Paint within the border box.
    #[default]
    BorderBox,
    /// Paint within the padding box.
    PaddingBox,
    /// Paint within the content box.
    ContentBox,
}

/// [§ 3 'outline'](https://www.w3.org/TR/css-ui-4/#outline)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outline {
    /// Outline width.
    pub width: f32,
    /// Gap between the border edge and the outline.
    pub offset: f32,
    /// Outline style; `none` means no outline.
    pub style: BorderStyle,
    /// Outline color.
    pub color: ColorValue,
}

impl Outline {
    /// Distance the outline reaches past the border box.
    #[must_use]
    pub fn extent(&self) -> f32 {
        if self.style.is_visible() {
            (self.width + self.offset).max(0.0)
        } else {
            0.0
        }
    }
}

/// The font inputs the metrics provider needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescription {
    /// Family name; providers may ignore it.
    pub family: String,
    /// Font size in pixels.
    pub size: f32,
    /// Extra space added at word separators.
    pub word_spacing: f32,
    /// Extra space added between characters; may be negative.
    pub letter_spacing: f32,
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 16.0,
            word_spacing: 0.0,
            letter_spacing: 0.0,
        }
    }
}

/// Computed style of one content node, as consulted by the line boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyle {
    /// Font inputs.
    pub font: FontDescription,
    /// Used line height.
    pub line_height: LineHeight,
    /// Block-direction alignment on the line.
    pub vertical_align: VerticalAlign,
    /// Inline base direction.
    pub direction: TextDirection,
    /// Orientation of lines.
    pub writing_mode: WritingMode,
    /// Margins.
    pub margin: EdgeSizes,
    /// Padding.
    pub padding: EdgeSizes,
    /// Borders.
    pub border: BorderSides,
    /// Corner radii.
    pub border_radius: CornerRadii,
    /// `None` means transparent.
    pub background_color: Option<ColorValue>,
    /// Background painting area.
    pub background_clip: BackgroundClip,
    /// Shadows in declaration order.
    pub box_shadow: Vec<BoxShadow>,
    /// Text shadows in declaration order.
    pub text_shadow: Vec<TextShadow>,
    /// Emphasis marks drawn over or under the text.
    pub text_emphasis_mark: TextEmphasisMark,
    /// `-webkit-text-stroke-width`.
    pub text_stroke_width: f32,
    /// Outline, if any.
    pub outline: Option<Outline>,
    /// Decoration behavior for boxes split across lines.
    pub box_decoration_break: BoxDecorationBreak,
    /// `visibility: visible`.
    pub visible: bool,
    /// Foreground color.
    pub color: ColorValue,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            font: FontDescription::default(),
            line_height: LineHeight::Normal,
            vertical_align: VerticalAlign::Baseline,
            direction: TextDirection::Ltr,
            writing_mode: WritingMode::HorizontalTb,
            margin: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            border: BorderSides::default(),
            border_radius: CornerRadii::default(),
            background_color: None,
            background_clip: BackgroundClip::BorderBox,
            box_shadow: Vec::new(),
            text_shadow: Vec::new(),
            text_emphasis_mark: TextEmphasisMark::None,
            text_stroke_width: 0.0,
            outline: None,
            box_decoration_break: BoxDecorationBreak::Slice,
            visible: true,
            color: ColorValue::BLACK,
        }
    }
}

impl BoxStyle {
    /// True if any side has a visible border with non-zero width.
    #[must_use]
    pub fn has_border(&self) -> bool {
        let widths = self.border.widths();
        widths.top > 0.0 || widths.right > 0.0 || widths.bottom > 0.0 || widths.left > 0.0
    }

    /// True if any corner is rounded.
    #[must_use]
    pub fn has_border_radius(&self) -> bool {
        !self.border_radius.is_zero()
    }

    /// True if a visible outline is set.
    #[must_use]
    pub fn has_outline(&self) -> bool {
        self.outline.is_some_and(|outline| outline.style.is_visible() && outline.width > 0.0)
    }

    /// True if there is a background, border or box shadow to paint.
    #[must_use]
    pub fn has_box_decoration_background(&self) -> bool {
        self.background_color.is_some_and(|color| !color.is_transparent())
            || self.has_border()
            || !self.box_shadow.is_empty()
    }

    /// True if the box is horizontal-tb.
    #[must_use]
    pub const fn is_horizontal_writing_mode(&self) -> bool {
        self.writing_mode.is_horizontal()
    }

    /// True for `direction: ltr`.
    #[must_use]
    pub fn is_left_to_right(&self) -> bool {
        self.direction == TextDirection::Ltr
    }

    /// Border and padding at the start of the line direction.
    #[must_use]
    pub fn border_and_padding_logical_left(&self) -> f32 {
        let horizontal = self.is_horizontal_writing_mode();
        self.border.widths().logical_left(horizontal) + self.padding.logical_left(horizontal)
    }

    /// Border and padding at the end of the line direction.
    #[must_use]
    pub fn border_and_padding_logical_right(&self) -> f32 {
        let horizontal = self.is_horizontal_writing_mode();
        self.border.widths().logical_right(horizontal) + self.padding.logical_right(horizontal)
    }

    /// Border and padding on the over side of the line.
    #[must_use]
    pub fn border_and_padding_before(&self) -> f32 {
        let horizontal = self.is_horizontal_writing_mode();
        self.border.widths().logical_top(horizontal) + self.padding.logical_top(horizontal)
    }

    /// Border plus padding in the block direction.
    #[must_use]
    pub fn border_and_padding_logical_height(&self) -> f32 {
        let horizontal = self.is_horizontal_writing_mode();
        let border = self.border.widths();
        border.logical_top(horizontal)
            + border.logical_bottom(horizontal)
            + self.padding.logical_top(horizontal)
            + self.padding.logical_bottom(horizontal)
    }

    /// True if there is border or padding at either end of the line direction.
    #[must_use]
    pub fn has_inline_direction_borders_or_padding(&self) -> bool {
        self.border_and_padding_logical_left() > 0.0 || self.border_and_padding_logical_right() > 0.0
    }

    /// True if there is any visible text shadow.
    #[must_use]
    pub fn has_text_shadow(&self) -> bool {
        !self.text_shadow.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_all_lengths() {
        assert_eq!(ColorValue::from_hex("#fff"), Some(ColorValue::WHITE));
        assert_eq!(
            ColorValue::from_hex("#11223380"),
            Some(ColorValue::rgba(0x11, 0x22, 0x33, 0x80))
        );
        assert_eq!(ColorValue::from_hex("#12345"), None);
    }

    #[test]
    fn dark_black_is_shaded_grey() {
        assert_eq!(ColorValue::BLACK.dark(), ColorValue::rgba(0x54, 0x54, 0x54, 255));
        assert_eq!(ColorValue::BLACK.light(), ColorValue::rgba(0x54, 0x54, 0x54, 255));
    }

    #[test]
    fn border_style_keywords_round_trip_through_strum() {
        assert_eq!(BorderStyle::Double.to_string(), "double");
        assert_eq!("dashed".parse::<BorderStyle>(), Ok(BorderStyle::Dashed));
    }

    #[test]
    fn hidden_border_has_no_used_width() {
        let side = BorderSide::new(4.0, BorderStyle::Hidden, ColorValue::BLACK);
        assert!(side.used_width().abs() < f32::EPSILON);
    }
}
