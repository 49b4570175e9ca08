//! Drawing one border side as a straight band.
//!
//! Coordinates are whole pixels: the band runs from `(x1, y1)` to
//! `(x2, y2)`, and the adjacent widths say how far each end is mitred to meet
//! the neighbouring side. A positive adjacent width slants the end inward
//! along the inner edge; a negative one slants it along the outer edge.

use linebox_layout::geometry::{Point, Rect};
use linebox_layout::style::{BorderStyle, ColorValue};

use crate::border_edge::BoxSide;
use crate::surface::{FillRule, Path, PaintSurface, StateSaver, Stroke, StrokeStyle};

/// Draw one side of a border between the two corners, in the given style.
///
/// Inputs are rounded to whole pixels. Empty bands draw nothing, and a
/// double band thinner than 3px is drawn solid.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_line_for_box_side(
    surface: &mut dyn PaintSurface,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    side: BoxSide,
    color: ColorValue,
    style: BorderStyle,
    adjacent_width1: f32,
    adjacent_width2: f32,
    antialias: bool,
) {
    let band = Band {
        x1: x1.round() as i32,
        y1: y1.round() as i32,
        x2: x2.round() as i32,
        y2: y2.round() as i32,
    };
    draw_band(
        surface,
        band,
        side,
        color,
        style,
        adjacent_width1.round() as i32,
        adjacent_width2.round() as i32,
        antialias,
    );
}

#[derive(Debug, Clone, Copy)]
struct Band {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Band {
    const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[allow(clippy::cast_precision_loss)]
    fn rect(self) -> Rect {
        Rect::new(
            self.x1 as f32,
            self.y1 as f32,
            (self.x2 - self.x1) as f32,
            (self.y2 - self.y1) as f32,
        )
    }

    /// Thickness across the side and length along it.
    const fn thickness_and_length(self, side: BoxSide) -> (i32, i32) {
        if side.is_horizontal() {
            (self.y2 - self.y1, self.x2 - self.x1)
        } else {
            (self.x2 - self.x1, self.y2 - self.y1)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn point(x: i32, y: i32) -> Point {
    Point::new(x as f32, y as f32)
}

fn draw_band(
    surface: &mut dyn PaintSurface,
    band: Band,
    side: BoxSide,
    color: ColorValue,
    style: BorderStyle,
    adjacent_width1: i32,
    adjacent_width2: i32,
    antialias: bool,
) {
    let (thickness, length) = band.thickness_and_length(side);
    if thickness == 0 || length == 0 {
        return;
    }
    let style = if style == BorderStyle::Double && thickness < 3 {
        BorderStyle::Solid
    } else {
        style
    };

    match style {
        BorderStyle::None | BorderStyle::Hidden => {}
        BorderStyle::Dotted | BorderStyle::Dashed => {
            draw_dashed_or_dotted(surface, band, side, color, thickness, style);
        }
        BorderStyle::Double => {
            draw_double(
                surface,
                band,
                side,
                color,
                thickness,
                length,
                adjacent_width1,
                adjacent_width2,
                antialias,
            );
        }
        BorderStyle::Ridge | BorderStyle::Groove => {
            draw_ridge_or_groove(
                surface,
                band,
                side,
                color,
                style,
                adjacent_width1,
                adjacent_width2,
                antialias,
            );
        }
        BorderStyle::Inset | BorderStyle::Outset | BorderStyle::Solid => {
            let shaded = match (style, side) {
                (BorderStyle::Inset, BoxSide::Top | BoxSide::Left)
                | (BorderStyle::Outset, BoxSide::Bottom | BoxSide::Right) => color.dark(),
                _ => color,
            };
            draw_solid(surface, band, side, shaded, adjacent_width1, adjacent_width2, antialias);
        }
    }
}

/// Stroke along the middle of the band.
fn draw_dashed_or_dotted(
    surface: &mut dyn PaintSurface,
    band: Band,
    side: BoxSide,
    color: ColorValue,
    thickness: i32,
    style: BorderStyle,
) {
    let mut path = Path::new();
    if side.is_horizontal() {
        let mid_y = band.y1 + thickness / 2;
        path.move_to(point(band.x1, mid_y));
        path.line_to(point(band.x2, mid_y));
    } else {
        let mid_x = band.x1 + thickness / 2;
        path.move_to(point(mid_x, band.y1));
        path.line_to(point(mid_x, band.y2));
    }
    #[allow(clippy::cast_precision_loss)]
    let stroke = Stroke {
        thickness: thickness as f32,
        style: if style == BorderStyle::Dashed {
            StrokeStyle::Dashed
        } else {
            StrokeStyle::Dotted
        },
        dash: None,
    };
    surface.stroke_path(&path, &stroke, color);
}

/// Two solid stripes a third of the thickness each. With mitred corners
/// each stripe is drawn as its own solid side so the joins line up.
fn draw_double(
    surface: &mut dyn PaintSurface,
    band: Band,
    side: BoxSide,
    color: ColorValue,
    thickness: i32,
    length: i32,
    adjacent_width1: i32,
    adjacent_width2: i32,
    antialias: bool,
) {
    let third = (thickness + 1) / 3;
    let Band { x1, y1, x2, y2 } = band;

    if adjacent_width1 == 0 && adjacent_width2 == 0 {
        let stripes = if side.is_horizontal() {
            [
                Band::new(x1, y1, x1 + length, y1 + third),
                Band::new(x1, y2 - third, x1 + length, y2),
            ]
        } else {
            [
                Band::new(x1, y1, x1 + third, y1 + length),
                Band::new(x2 - third, y1, x2, y1 + length),
            ]
        };
        for stripe in stripes {
            surface.fill_rect(stripe.rect(), color);
        }
        return;
    }

    let big_third = |width: i32| (if width > 0 { width + 1 } else { width - 1 }) / 3;
    let (adjacent1_big_third, adjacent2_big_third) = (big_third(adjacent_width1), big_third(adjacent_width2));
    // Inset of a stripe end: along the outer edge for the first stripe,
    // along the inner edge for the second.
    let outer_inset = |width: i32| ((-width * 2 + 1) / 3).max(0);
    let inner_inset = |width: i32| ((width * 2 + 1) / 3).max(0);

    let (first, second) = match side {
        BoxSide::Top => (
            Band::new(
                x1 + outer_inset(adjacent_width1),
                y1,
                x2 - outer_inset(adjacent_width2),
                y1 + third,
            ),
            Band::new(
                x1 + inner_inset(adjacent_width1),
                y2 - third,
                x2 - inner_inset(adjacent_width2),
                y2,
            ),
        ),
        BoxSide::Left => (
            Band::new(
                x1,
                y1 + outer_inset(adjacent_width1),
                x1 + third,
                y2 - outer_inset(adjacent_width2),
            ),
            Band::new(
                x2 - third,
                y1 + inner_inset(adjacent_width1),
                x2,
                y2 - inner_inset(adjacent_width2),
            ),
        ),
        BoxSide::Bottom => (
            Band::new(
                x1 + inner_inset(adjacent_width1),
                y1,
                x2 - inner_inset(adjacent_width2),
                y1 + third,
            ),
            Band::new(
                x1 + outer_inset(adjacent_width1),
                y2 - third,
                x2 - outer_inset(adjacent_width2),
                y2,
            ),
        ),
        BoxSide::Right => (
            Band::new(
                x1,
                y1 + inner_inset(adjacent_width1),
                x1 + third,
                y2 - inner_inset(adjacent_width2),
            ),
            Band::new(
                x2 - third,
                y1 + outer_inset(adjacent_width1),
                x2,
                y2 - outer_inset(adjacent_width2),
            ),
        ),
    };
    for stripe in [first, second] {
        draw_band(
            surface,
            stripe,
            side,
            color,
            BorderStyle::Solid,
            adjacent1_big_third,
            adjacent2_big_third,
            antialias,
        );
    }
}

/// Two half-thickness bands in opposite 3D styles.
fn draw_ridge_or_groove(
    surface: &mut dyn PaintSurface,
    band: Band,
    side: BoxSide,
    color: ColorValue,
    style: BorderStyle,
    adjacent_width1: i32,
    adjacent_width2: i32,
    antialias: bool,
) {
    let (s1, s2) = if style == BorderStyle::Groove {
        (BorderStyle::Inset, BorderStyle::Outset)
    } else {
        (BorderStyle::Outset, BorderStyle::Inset)
    };
    let big_half = |width: i32| (if width > 0 { width + 1 } else { width - 1 }) / 2;
    let (adjacent1_big_half, adjacent2_big_half) = (big_half(adjacent_width1), big_half(adjacent_width2));
    let Band { x1, y1, x2, y2 } = band;
    let (a1, a2) = (adjacent_width1, adjacent_width2);
    let mid_y = (y1 + y2 + 1) / 2;
    let mid_x = (x1 + x2 + 1) / 2;

    let (outer, outer_style, inner, inner_style) = match side {
        BoxSide::Top => (
            Band::new(x1 + (-a1).max(0) / 2, y1, x2 - (-a2).max(0) / 2, mid_y),
            s1,
            Band::new(x1 + (a1 + 1).max(0) / 2, mid_y, x2 - (a2 + 1).max(0) / 2, y2),
            s2,
        ),
        BoxSide::Left => (
            Band::new(x1, y1 + (-a1).max(0) / 2, mid_x, y2 - (-a2).max(0) / 2),
            s1,
            Band::new(mid_x, y1 + (a1 + 1).max(0) / 2, x2, y2 - (a2 + 1).max(0) / 2),
            s2,
        ),
        BoxSide::Bottom => (
            Band::new(x1 + a1.max(0) / 2, y1, x2 - a2.max(0) / 2, mid_y),
            s2,
            Band::new(x1 + (-a1 + 1).max(0) / 2, mid_y, x2 - (-a2 + 1).max(0) / 2, y2),
            s1,
        ),
        BoxSide::Right => (
            Band::new(x1, y1 + a1.max(0) / 2, mid_x, y2 - a2.max(0) / 2),
            s2,
            Band::new(mid_x, y1 + (-a1 + 1).max(0) / 2, x2, y2 - (-a2 + 1).max(0) / 2),
            s1,
        ),
    };
    draw_band(
        surface,
        outer,
        side,
        color,
        outer_style,
        adjacent1_big_half,
        adjacent2_big_half,
        antialias,
    );
    draw_band(
        surface,
        inner,
        side,
        color,
        inner_style,
        a1 / 2,
        a2 / 2,
        antialias,
    );
}

/// A rectangle, or a trapezoid when either end is mitred.
fn draw_solid(
    surface: &mut dyn PaintSurface,
    band: Band,
    side: BoxSide,
    color: ColorValue,
    adjacent_width1: i32,
    adjacent_width2: i32,
    antialias: bool,
) {
    if adjacent_width1 == 0 && adjacent_width2 == 0 {
        surface.fill_rect(band.rect(), color);
        return;
    }

    let Band { x1, y1, x2, y2 } = band;
    let (a1, a2) = (adjacent_width1, adjacent_width2);
    let quad = match side {
        BoxSide::Top => [
            point(x1 + (-a1).max(0), y1),
            point(x1 + a1.max(0), y2),
            point(x2 - a2.max(0), y2),
            point(x2 - (-a2).max(0), y1),
        ],
        BoxSide::Bottom => [
            point(x1 + a1.max(0), y1),
            point(x1 + (-a1).max(0), y2),
            point(x2 - (-a2).max(0), y2),
            point(x2 - a2.max(0), y1),
        ],
        BoxSide::Left => [
            point(x1, y1 + (-a1).max(0)),
            point(x1, y2 - (-a2).max(0)),
            point(x2, y2 - a2.max(0)),
            point(x2, y1 + a1.max(0)),
        ],
        BoxSide::Right => [
            point(x1, y1 + a1.max(0)),
            point(x1, y2 - a2.max(0)),
            point(x2, y2 - (-a2).max(0)),
            point(x2, y1 + (-a1).max(0)),
        ],
    };

    if antialias {
        surface.fill_path(&Path::polygon(&quad), FillRule::NonZero, color);
    } else {
        // Aliased trapezoid: clip hard to the quad and fill its band.
        let mut saver = StateSaver::new(surface, true);
        saver.clip_convex_polygon(&quad, false);
        saver.fill_rect(band.rect(), color);
    }
}
