//! [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
//!
//! "The box-shadow property attaches one or more drop-shadows to the box.
//! The property accepts either the none value, which indicates no shadows,
//! or a comma-separated list of shadows, ordered front to back."

use linebox_common::warning::warn_once;
use linebox_layout::geometry::{Rect, Size};
use linebox_layout::style::{BoxStyle, ShadowStyle};

use super::{rounded_border_for, rounded_inner_border_for};
use crate::border_edge::{BoxSide, BoxSideSet};
use crate::surface::{PaintSurface, RoundedRect, ShadowParams, StateSaver};

/// Paint the shadows of `style` that match `shadow_style`.
///
/// Shadows are listed front to back, so they are painted in reverse. Outer
/// shadows are clipped to outside the border box; over an opaque background
/// the clip is pulled in by one pixel so antialiased box edges leave no seam.
/// Inset shadows skip the edges where an inline was split.
pub fn paint_box_shadow(
    surface: &mut dyn PaintSurface,
    rect: Rect,
    style: &BoxStyle,
    shadow_style: ShadowStyle,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) {
    if style.box_shadow.is_empty() {
        return;
    }
    let inset = shadow_style == ShadowStyle::Inset;
    let border = if inset {
        rounded_inner_border_for(style, rect, include_logical_left_edge, include_logical_right_edge)
    } else {
        rounded_border_for(style, rect, include_logical_left_edge, include_logical_right_edge)
    };
    let has_border_radius = style.has_border_radius();
    let horizontal = style.is_horizontal_writing_mode();
    let has_opaque_background = style.background_color.is_some_and(|color| color.is_opaque());

    let mut saver = StateSaver::new(surface, false);
    for shadow in style.box_shadow.iter().rev() {
        if shadow.style != shadow_style {
            continue;
        }
        let offset = Size::new(shadow.offset_x, shadow.offset_y);
        let spread = shadow.spread_radius;
        let blur = if shadow.blur_radius < 0.0 {
            warn_once("Paint", "negative box-shadow blur radius treated as 0");
            0.0
        } else {
            shadow.blur_radius
        };
        if offset.width == 0.0 && offset.height == 0.0 && blur == 0.0 && spread == 0.0 {
            continue;
        }

        if inset {
            let mut excluded = BoxSideSet::EMPTY;
            if !include_logical_left_edge {
                excluded.insert(if horizontal { BoxSide::Left } else { BoxSide::Top });
            }
            if !include_logical_right_edge {
                excluded.insert(if horizontal { BoxSide::Right } else { BoxSide::Bottom });
            }
            let params = ShadowParams {
                offset: Size::new(offset.width.floor(), offset.height.floor()),
                blur,
                spread,
                color: shadow.color,
            };
            saver.draw_inner_shadow(&border, &params, excluded);
            continue;
        }

        let fill_rect = border.rect.inflate(spread);
        if fill_rect.is_empty() {
            continue;
        }
        if !saver.saved() {
            saver.save();
            let clip_out = match (has_border_radius, has_opaque_background) {
                (true, true) => border.inflate_with_radii(-1.0),
                (false, true) => RoundedRect::from_rect(border.rect.inflate(-1.0)),
                (_, false) => border,
            };
            if !clip_out.is_empty() {
                saver.clip_out_rounded_rect(&clip_out);
            }
        }
        let shape = if has_border_radius {
            border.inflate(spread).constrained()
        } else {
            RoundedRect::from_rect(fill_rect)
        };
        let params = ShadowParams {
            offset,
            blur,
            spread: 0.0,
            color: shadow.color,
        };
        saver.draw_shadow(&shape, &params);
    }
}
