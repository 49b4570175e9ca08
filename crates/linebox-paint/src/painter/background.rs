//! Background color painting.
//!
//! [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
//!
//! "This property sets the background color of an element. The color is
//! drawn behind any background images."

use linebox_layout::geometry::Rect;
use linebox_layout::style::{BackgroundClip, BoxStyle, ColorValue};

use super::{border_insets, logical_edge_insets, rounded_border_for, rounded_inner_border_with_insets};
use crate::surface::{PaintSurface, StateSaver};

/// Fill the background of the box whose border box is `rect` with `color`.
///
/// [§ 3.7 'background-clip'](https://www.w3.org/TR/css-backgrounds-3/#background-clip)
///
/// The fill is clipped to the border, padding or content box, following the
/// box's corner radii. Insets on split sides of a fragment are dropped so a
/// background runs continuously across the split.
pub fn paint_fill_layers(
    surface: &mut dyn PaintSurface,
    rect: Rect,
    style: &BoxStyle,
    color: Option<ColorValue>,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) {
    let Some(color) = color.filter(|color| !color.is_transparent()) else {
        return;
    };
    let has_rounded_border = style.has_border_radius() && (include_logical_left_edge || include_logical_right_edge);

    let mut insets = match style.background_clip {
        BackgroundClip::BorderBox => {
            if has_rounded_border {
                let shape = rounded_border_for(style, rect, include_logical_left_edge, include_logical_right_edge);
                surface.fill_rounded_rect(&shape, color);
            } else {
                surface.fill_rect(rect, color);
            }
            return;
        }
        BackgroundClip::PaddingBox | BackgroundClip::ContentBox => {
            border_insets(style, include_logical_left_edge, include_logical_right_edge)
        }
    };
    if style.background_clip == BackgroundClip::ContentBox {
        let padding = logical_edge_insets(
            style.padding,
            style.is_horizontal_writing_mode(),
            include_logical_left_edge,
            include_logical_right_edge,
        );
        insets.top += padding.top;
        insets.right += padding.right;
        insets.bottom += padding.bottom;
        insets.left += padding.left;
    }

    if has_rounded_border {
        let shape = rounded_inner_border_with_insets(
            style,
            rect,
            insets,
            include_logical_left_edge,
            include_logical_right_edge,
        );
        surface.fill_rounded_rect(&shape, color);
    } else {
        let mut saver = StateSaver::new(surface, true);
        saver.clip(rect.contract_edges(&insets));
        saver.fill_rect(rect, color);
    }
}
