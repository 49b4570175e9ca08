//! Per-side border descriptions.
//!
//! [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
//!
//! A [`BorderEdge`] is one side of a box's border as the painter sees it:
//! resolved width, color and style, plus whether the side is present at all
//! on this fragment of a split inline.

use linebox_layout::style::{BorderSide, BorderStyle, BoxStyle, ColorValue};
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One physical side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BoxSide {
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
    /// Left side.
    Left,
}

impl BoxSide {
    /// Index into a `[BorderEdge; 4]` in top, right, bottom, left order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// True for top and bottom.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The two sides sharing a corner with this one, in the order the
    /// painter miters them.
    #[must_use]
    pub const fn adjacent(self) -> (Self, Self) {
        match self {
            Self::Top | Self::Bottom => (Self::Left, Self::Right),
            Self::Left | Self::Right => (Self::Top, Self::Bottom),
        }
    }
}

/// A set of [`BoxSide`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct BoxSideSet(u8);

impl BoxSideSet {
    /// No sides.
    pub const EMPTY: Self = Self(0);
    /// All four sides.
    pub const ALL: Self = Self(0b1111);

    const fn flag(side: BoxSide) -> u8 {
        1 << side.index()
    }

    /// A set holding one side.
    #[must_use]
    pub const fn only(side: BoxSide) -> Self {
        Self(Self::flag(side))
    }

    /// True if `side` is in the set.
    #[must_use]
    pub const fn contains(self, side: BoxSide) -> bool {
        self.0 & Self::flag(side) != 0
    }

    /// Add a side.
    pub const fn insert(&mut self, side: BoxSide) {
        self.0 |= Self::flag(side);
    }

    /// This set without the sides in `other`.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True if no side is in the set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of sides in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// True if two sides meeting at a corner are both in the set.
    #[must_use]
    pub const fn includes_adjacent_sides(self) -> bool {
        let top = self.contains(BoxSide::Top);
        let right = self.contains(BoxSide::Right);
        let bottom = self.contains(BoxSide::Bottom);
        let left = self.contains(BoxSide::Left);
        (top && right) || (right && bottom) || (bottom && left) || (left && top)
    }

    /// The sides in the set, top first.
    pub fn iter(self) -> impl Iterator<Item = BoxSide> {
        BoxSide::iter().filter(move |side| self.contains(*side))
    }
}

impl FromIterator<BoxSide> for BoxSideSet {
    fn from_iter<I: IntoIterator<Item = BoxSide>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for side in iter {
            set.insert(side);
        }
        set
    }
}

/// One side of a border, resolved for painting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderEdge {
    /// Used width.
    pub width: f32,
    /// Resolved color.
    pub color: ColorValue,
    /// Style after coercion.
    pub style: BorderStyle,
    /// The color is fully transparent.
    pub is_transparent: bool,
    /// The side exists on this fragment.
    pub is_present: bool,
}

impl Default for BorderEdge {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: ColorValue::TRANSPARENT,
            style: BorderStyle::Hidden,
            is_transparent: false,
            is_present: false,
        }
    }
}

impl BorderEdge {
    /// A resolved edge. Double borders thinner than 3px have no room for two
    /// lines and a gap, and become solid.
    #[must_use]
    pub fn new(width: f32, color: ColorValue, style: BorderStyle, is_transparent: bool, is_present: bool) -> Self {
        let style = if style == BorderStyle::Double && width < 3.0 {
            BorderStyle::Solid
        } else {
            style
        };
        Self {
            width,
            color,
            style,
            is_transparent,
            is_present,
        }
    }

    /// An edge from a computed border side.
    #[must_use]
    pub fn from_side(side: &BorderSide, is_present: bool) -> Self {
        Self::new(
            side.used_width(),
            side.color,
            side.style,
            side.color.is_transparent(),
            is_present,
        )
    }

    /// The style draws something and the color is not transparent.
    #[must_use]
    pub fn has_visible_color_and_style(&self) -> bool {
        self.style.is_visible() && !self.is_transparent
    }

    /// The edge paints pixels.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.is_present && self.width > 0.0 && self.has_visible_color_and_style()
    }

    /// The edge takes up room but paints nothing.
    #[must_use]
    pub fn present_but_invisible(&self) -> bool {
        self.width > 0.0 && self.is_present && !self.has_visible_color_and_style()
    }

    /// The edge fully covers whatever background is under it.
    #[must_use]
    pub fn obscures_background(&self) -> bool {
        if !self.is_present || self.is_transparent || self.color.has_alpha() || self.style == BorderStyle::Hidden {
            return false;
        }
        !matches!(self.style, BorderStyle::Dotted | BorderStyle::Dashed)
    }

    /// The edge covers the background edge at the given device scale, so the
    /// background need not bleed under it.
    #[must_use]
    pub fn obscures_background_edge(&self, scale: f32) -> bool {
        if !self.is_present
            || self.is_transparent
            || self.width * scale < 2.0
            || self.color.has_alpha()
            || self.style == BorderStyle::Hidden
        {
            return false;
        }
        match self.style {
            BorderStyle::Dotted | BorderStyle::Dashed => false,
            // The outer stripe needs at least 2 device pixels.
            BorderStyle::Double => self.width >= 5.0 * scale,
            _ => true,
        }
    }

    /// Both edges have the same color.
    #[must_use]
    pub fn shares_color_with(&self, other: &Self) -> bool {
        self.color == other.color
    }

    /// Width if present, else zero.
    #[must_use]
    pub fn used_width(&self) -> f32 {
        if self.is_present { self.width } else { 0.0 }
    }

    /// Widths of the outer and inner stripes of a double border, in whole
    /// pixels. The outer stripe is a third of the width and the inner edge of
    /// the gap sits at two thirds; a remainder of 2 widens the outer stripe
    /// and a remainder of 1 pushes the inner stripe out.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    #[must_use]
    pub fn double_border_stripe_widths(&self) -> (f32, f32) {
        let full = self.width.floor() as i32;
        let mut outer = full / 3;
        let mut inner = full * 2 / 3;
        match full % 3 {
            2 => outer += 1,
            1 => inner += 1,
            _ => {}
        }
        (outer as f32, inner as f32)
    }
}

/// Resolve the four border edges of `style`, top, right, bottom, left.
///
/// On a fragment of a split inline, the sides at a split are absent: in a
/// horizontal writing mode the left and right sides follow
/// `include_logical_left_edge` and `include_logical_right_edge`, and in a
/// vertical one the top and bottom sides do.
#[must_use]
pub fn border_edges(style: &BoxStyle, include_logical_left_edge: bool, include_logical_right_edge: bool) -> [BorderEdge; 4] {
    let horizontal = style.is_horizontal_writing_mode();
    [
        BorderEdge::from_side(&style.border.top, horizontal || include_logical_left_edge),
        BorderEdge::from_side(&style.border.right, !horizontal || include_logical_right_edge),
        BorderEdge::from_side(&style.border.bottom, horizontal || include_logical_right_edge),
        BorderEdge::from_side(&style.border.left, !horizontal || include_logical_left_edge),
    ]
}

/// Whether `style` paints at least one border side.
#[must_use]
pub fn has_renderable_border(style: &BoxStyle) -> bool {
    border_edges(style, true, true).iter().any(BorderEdge::should_render)
}
