//! Box-model painter
//!
//! [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)
//!
//! Paints the decorations of one box fragment in CSS order:
//!
//! ```text
//!   outer box-shadow ──► background ──► inset box-shadow ──► border
//!        (shadow.rs)     (background.rs)    (shadow.rs)      (border.rs)
//!                                                                │
//!                                                   per-side strokes
//!                                                      (line.rs)
//! ```
//!
//! Every entry point takes the fragment's border-box rectangle and two
//! flags saying whether the fragment carries its logical left and right
//! edges. A box split across lines draws no border, radius, padding or
//! shadow on the sides where it was split.

mod background;
mod border;
mod line;
mod shadow;

pub use background::paint_fill_layers;
pub use border::{
    border_styles_require_mitre, clip_border_side_polygon, paint_border, paint_one_border_side,
    will_be_overdrawn,
};
pub use line::draw_line_for_box_side;
pub use shadow::paint_box_shadow;

use linebox_layout::geometry::{EdgeSizes, Rect, Size};
use linebox_layout::style::{BoxStyle, CornerRadii, ShadowStyle};

use crate::surface::{PaintSurface, RoundedRect, expand_radii};

/// Paint shadow, background, inset shadow and border for one fragment.
pub fn paint_box_decoration_background(
    surface: &mut dyn PaintSurface,
    rect: Rect,
    style: &BoxStyle,
    border_style: &BoxStyle,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) {
    paint_box_shadow(
        surface,
        rect,
        style,
        ShadowStyle::Normal,
        include_logical_left_edge,
        include_logical_right_edge,
    );
    paint_fill_layers(
        surface,
        rect,
        style,
        style.background_color,
        include_logical_left_edge,
        include_logical_right_edge,
    );
    paint_box_shadow(
        surface,
        rect,
        style,
        ShadowStyle::Inset,
        include_logical_left_edge,
        include_logical_right_edge,
    );
    if border_style.has_border() {
        paint_border(
            surface,
            rect,
            border_style,
            include_logical_left_edge,
            include_logical_right_edge,
        );
    }
}

/// Zero the insets on sides where the fragment was split.
#[must_use]
pub fn logical_edge_insets(
    insets: EdgeSizes,
    horizontal: bool,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> EdgeSizes {
    let mut insets = insets;
    if horizontal {
        if !include_logical_left_edge {
            insets.left = 0.0;
        }
        if !include_logical_right_edge {
            insets.right = 0.0;
        }
    } else {
        if !include_logical_left_edge {
            insets.top = 0.0;
        }
        if !include_logical_right_edge {
            insets.bottom = 0.0;
        }
    }
    insets
}

/// Square off the corners on split sides.
fn include_logical_edges(
    radii: CornerRadii,
    horizontal: bool,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> CornerRadii {
    let mut radii = radii;
    if !include_logical_left_edge {
        radii.top_left = Size::default();
        if horizontal {
            radii.bottom_left = Size::default();
        } else {
            radii.top_right = Size::default();
        }
    }
    if !include_logical_right_edge {
        radii.bottom_right = Size::default();
        if horizontal {
            radii.top_right = Size::default();
        } else {
            radii.bottom_left = Size::default();
        }
    }
    radii
}

/// Outer edge of the border with the style's constrained corner radii.
#[must_use]
pub fn rounded_border_for(
    style: &BoxStyle,
    rect: Rect,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> RoundedRect {
    if !style.has_border_radius() {
        return RoundedRect::from_rect(rect);
    }
    let constrained = RoundedRect::new(rect, style.border_radius).constrained();
    RoundedRect::new(
        rect,
        include_logical_edges(
            constrained.radii,
            style.is_horizontal_writing_mode(),
            include_logical_left_edge,
            include_logical_right_edge,
        ),
    )
}

/// Border widths actually drawn on this fragment.
#[must_use]
pub fn border_insets(
    style: &BoxStyle,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> EdgeSizes {
    logical_edge_insets(
        style.border.widths(),
        style.is_horizontal_writing_mode(),
        include_logical_left_edge,
        include_logical_right_edge,
    )
}

/// Inner edge of the border (the padding edge).
#[must_use]
pub fn rounded_inner_border_for(
    style: &BoxStyle,
    rect: Rect,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> RoundedRect {
    rounded_inner_border_with_insets(
        style,
        rect,
        border_insets(style, include_logical_left_edge, include_logical_right_edge),
        include_logical_left_edge,
        include_logical_right_edge,
    )
}

/// The border box inset by arbitrary per-side amounts, with the outer radii
/// shrunk to match.
#[must_use]
pub fn rounded_inner_border_with_insets(
    style: &BoxStyle,
    rect: Rect,
    insets: EdgeSizes,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) -> RoundedRect {
    let inner = rect.contract_edges(&insets);
    if !style.has_border_radius() {
        return RoundedRect::from_rect(inner);
    }
    let outer = RoundedRect::new(rect, style.border_radius).constrained();
    let radii = expand_radii(
        outer.radii,
        -insets.top,
        -insets.bottom,
        -insets.left,
        -insets.right,
    );
    RoundedRect::new(
        inner,
        include_logical_edges(
            radii,
            style.is_horizontal_writing_mode(),
            include_logical_left_edge,
            include_logical_right_edge,
        ),
    )
}
