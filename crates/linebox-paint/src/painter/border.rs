//! Border painting.
//!
//! [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
//!
//! [`paint_border`] picks one of three strategies:
//!
//! 1. Every side visible, solid (or unrounded double), one color, and either
//!    rounded or translucent: fill the ring between the outer and inner
//!    border shapes in a single even-odd path, so the corners never overlap.
//! 2. Solid translucent sides of one color on a square box, with some sides
//!    missing: fill the side rectangles as a single non-zero path.
//! 3. Otherwise paint each side on its own, clipping the corner joins to
//!    polygons where colors or styles meet. Translucent sides are grouped by
//!    color, and a group with sides meeting at a corner is drawn into a
//!    transparency layer so the overlap is not blended twice.

use linebox_layout::geometry::{EdgeSizes, Point, Rect, Size};
use linebox_layout::style::{BorderStyle, BoxStyle, ColorValue};
use strum::IntoEnumIterator;

use super::line::draw_line_for_box_side;
use super::{rounded_border_for, rounded_inner_border_for, rounded_inner_border_with_insets};
use crate::border_edge::{BorderEdge, BoxSide, BoxSideSet, border_edges};
use crate::surface::{DashPattern, FillRule, Path, PaintSurface, RoundedRect, StateSaver, Stroke, StrokeStyle};

/// Order sides are drawn in. Top and bottom go first so the overdraw check
/// only has to consider them.
const PAINT_ORDER: [BoxSide; 4] = [BoxSide::Top, BoxSide::Bottom, BoxSide::Left, BoxSide::Right];

/// Below this a quad side is treated as degenerate.
const EPSILON: f32 = 1e-2;

/// Extends each split clip parallelogram slightly to hide rounding error.
const EXTEND_FILL: f32 = 1e-2;

/// What the four edges have in common.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
struct EdgeSummary {
    have_alpha_color: bool,
    all_solid: bool,
    all_double: bool,
    visible_count: u32,
    all_share_color: bool,
    all_share_width: bool,
    first_visible: Option<BoxSide>,
    to_draw: BoxSideSet,
}

impl EdgeSummary {
    fn of(edges: &[BorderEdge; 4]) -> Self {
        let mut summary = Self {
            have_alpha_color: false,
            all_solid: true,
            all_double: true,
            visible_count: 4,
            all_share_color: true,
            all_share_width: true,
            first_visible: None,
            to_draw: BoxSideSet::EMPTY,
        };
        for side in BoxSide::iter() {
            let edge = &edges[side.index()];
            if edge.should_render() {
                summary.to_draw.insert(side);
            }
            if edge.present_but_invisible() {
                summary.visible_count -= 1;
                summary.all_share_color = false;
                summary.all_share_width = false;
                continue;
            }
            if !edge.should_render() {
                summary.visible_count -= 1;
                continue;
            }
            match summary.first_visible {
                None => summary.first_visible = Some(side),
                Some(first) => {
                    let first = &edges[first.index()];
                    if !edge.shares_color_with(first) {
                        summary.all_share_color = false;
                    }
                    if (edge.width - first.width).abs() > f32::EPSILON {
                        summary.all_share_width = false;
                    }
                }
            }
            summary.have_alpha_color |= edge.color.has_alpha();
            summary.all_solid &= edge.style == BorderStyle::Solid;
            summary.all_double &= edge.style == BorderStyle::Double;
        }
        summary
    }
}

/// Paint the border of the box whose border box is `rect`.
pub fn paint_border(
    surface: &mut dyn PaintSurface,
    rect: Rect,
    style: &BoxStyle,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) {
    let edges = border_edges(style, include_logical_left_edge, include_logical_right_edge);
    let outer = rounded_border_for(style, rect, include_logical_left_edge, include_logical_right_edge);
    let inner = rounded_inner_border_for(style, rect, include_logical_left_edge, include_logical_right_edge);
    if outer.is_empty() {
        return;
    }

    let summary = EdgeSummary::of(&edges);
    if summary.to_draw.is_empty() {
        return;
    }

    if let Some(first) = summary.first_visible
        && (summary.all_solid || summary.all_double)
        && summary.all_share_color
        && inner.is_renderable()
    {
        let color = edges[first.index()].color;

        if summary.visible_count == 4
            && (outer.is_rounded() || summary.have_alpha_color)
            && (summary.all_solid || (!outer.is_rounded() && !inner.is_rounded()))
        {
            if outer.is_rounded() && summary.all_share_width {
                surface.fill_between_rounded_rects(&outer, &inner, color);
                return;
            }
            let mut path = Path::new();
            path.add_rounded_rect(outer);
            if summary.all_double {
                let (outer_third, inner_third) = double_stripe_rects(outer.rect, &edges);
                path.add_rounded_rect(outer.with_rect(outer_third));
                path.add_rounded_rect(inner.with_rect(inner_third));
            }
            path.add_rounded_rect(inner);
            surface.fill_path(&path, FillRule::EvenOdd, color);
            return;
        }

        if summary.all_solid && summary.visible_count != 4 && !outer.is_rounded() && summary.have_alpha_color {
            let mut path = Path::new();
            for side in summary.to_draw.iter() {
                path.add_rect(side_rect(outer.rect, &edges, side));
            }
            surface.fill_path(&path, FillRule::NonZero, color);
            return;
        }
    }

    let clip_to_outer_border = outer.is_rounded();
    let mut saver = StateSaver::new(surface, clip_to_outer_border);
    if clip_to_outer_border {
        saver.clip_rounded_rect(&outer);
        if inner.is_renderable() && !inner.is_empty() {
            saver.clip_out_rounded_rect(&inner);
        }
    }

    // Sides are painted untransformed, on pixel-aligned bands.
    let antialias = false;
    let sides = Sides {
        style,
        outer: &outer,
        inner: &inner,
        edges: &edges,
        include_logical_left_edge,
        include_logical_right_edge,
        antialias,
    };
    if summary.have_alpha_color {
        paint_translucent_border_sides(&mut *saver, &sides, summary.to_draw);
    } else {
        paint_border_sides(&mut *saver, &sides, summary.to_draw, None);
    }
}

/// Rectangles whose edges are the outer edges of the outer and inner stripes
/// of a double border.
fn double_stripe_rects(rect: Rect, edges: &[BorderEdge; 4]) -> (Rect, Rect) {
    let mut outer_third = rect;
    let mut inner_third = rect;
    for side in BoxSide::iter() {
        let (outer_width, inner_width) = edges[side.index()].double_border_stripe_widths();
        outer_third = inset_side(outer_third, side, outer_width);
        inner_third = inset_side(inner_third, side, inner_width);
    }
    (outer_third, inner_third)
}

/// Move one edge of `rect` inward by `amount`.
fn inset_side(rect: Rect, side: BoxSide, amount: f32) -> Rect {
    let mut insets = EdgeSizes::default();
    match side {
        BoxSide::Top => insets.top = amount,
        BoxSide::Right => insets.right = amount,
        BoxSide::Bottom => insets.bottom = amount,
        BoxSide::Left => insets.left = amount,
    }
    rect.contract_edges(&insets)
}

/// The band of `rect` covered by one side's width.
fn side_rect(rect: Rect, edges: &[BorderEdge; 4], side: BoxSide) -> Rect {
    let width = edges[side.index()].width;
    match side {
        BoxSide::Top => Rect::new(rect.x, rect.y, rect.width, width),
        BoxSide::Bottom => Rect::new(rect.x, rect.max_y() - width, rect.width, width),
        BoxSide::Left => Rect::new(rect.x, rect.y, width, rect.height),
        BoxSide::Right => Rect::new(rect.max_x() - width, rect.y, width, rect.height),
    }
}

/// The part of `rect` a side may paint into when the inner border shape is
/// too curved to clip with a polygon: everything except the opposite side.
fn side_rect_including_inner(rect: Rect, edges: &[BorderEdge; 4], side: BoxSide) -> Rect {
    let opposite = match side {
        BoxSide::Top => BoxSide::Bottom,
        BoxSide::Bottom => BoxSide::Top,
        BoxSide::Left => BoxSide::Right,
        BoxSide::Right => BoxSide::Left,
    };
    inset_side(rect, opposite, edges[opposite.index()].width)
}

/// Everything the per-side painters need about the border being drawn.
struct Sides<'a> {
    style: &'a BoxStyle,
    outer: &'a RoundedRect,
    inner: &'a RoundedRect,
    edges: &'a [BorderEdge; 4],
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
    antialias: bool,
}

/// Paint translucent sides one color group at a time.
fn paint_translucent_border_sides(surface: &mut dyn PaintSurface, sides: &Sides<'_>, to_draw: BoxSideSet) {
    let mut remaining = to_draw;
    while !remaining.is_empty() {
        let mut common_color: Option<ColorValue> = None;
        let mut group = BoxSideSet::EMPTY;
        for side in PAINT_ORDER {
            if !remaining.contains(side) {
                continue;
            }
            let color = sides.edges[side.index()].color;
            match common_color {
                None => {
                    common_color = Some(color);
                    group.insert(side);
                }
                Some(common) if common == color => group.insert(side),
                Some(_) => {}
            }
        }
        let Some(mut color) = common_color else {
            break;
        };

        let use_transparency_layer = group.includes_adjacent_sides() && color.has_alpha();
        if use_transparency_layer {
            surface.begin_transparency_layer(f32::from(color.a) / 255.0);
            color = color.with_alpha(255);
        }
        paint_border_sides(surface, sides, group, Some(color));
        if use_transparency_layer {
            surface.end_transparency_layer();
        }
        remaining = remaining.without(group);
    }
}

/// Styles that draw more than one band and so need the rounded path.
const fn style_has_inner_detail(style: BorderStyle) -> bool {
    matches!(style, BorderStyle::Groove | BorderStyle::Ridge | BorderStyle::Double)
}

fn paint_border_sides(
    surface: &mut dyn PaintSurface,
    sides: &Sides<'_>,
    side_set: BoxSideSet,
    override_color: Option<ColorValue>,
) {
    let rounded_path = sides.outer.is_rounded().then(|| {
        let mut path = Path::new();
        path.add_rounded_rect(*sides.outer);
        path
    });
    let inner_radii = &sides.inner.radii;

    for side in PAINT_ORDER {
        let edge = &sides.edges[side.index()];
        if !edge.should_render() || !side_set.contains(side) {
            continue;
        }
        let (corner1, corner2) = match side {
            BoxSide::Top => (inner_radii.top_left, inner_radii.top_right),
            BoxSide::Bottom => (inner_radii.bottom_left, inner_radii.bottom_right),
            BoxSide::Left => (inner_radii.bottom_left, inner_radii.top_left),
            BoxSide::Right => (inner_radii.bottom_right, inner_radii.top_right),
        };
        let arcs_inner_edge = !corner1.is_empty() || !corner2.is_empty();
        let path = rounded_path
            .as_ref()
            .filter(|_| style_has_inner_detail(edge.style) || arcs_inner_edge);
        paint_one_border_side(
            surface,
            sides.style,
            sides.outer,
            sides.inner,
            side_rect(sides.outer.rect, sides.edges, side),
            side,
            sides.edges,
            path,
            sides.include_logical_left_edge,
            sides.include_logical_right_edge,
            sides.antialias,
            override_color,
        );
    }
}

/// Paint one side of a border.
///
/// With `path` (a rounded outer border), the side is clipped to its corner
/// polygon and drawn by filling the path region. Otherwise it is drawn as a
/// straight band, mitred at corners where it meets a side of another color
/// or style.
pub fn paint_one_border_side(
    surface: &mut dyn PaintSurface,
    style: &BoxStyle,
    outer: &RoundedRect,
    inner: &RoundedRect,
    side_rect: Rect,
    side: BoxSide,
    edges: &[BorderEdge; 4],
    path: Option<&Path>,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
    antialias: bool,
    override_color: Option<ColorValue>,
) {
    let (adjacent_side1, adjacent_side2) = side.adjacent();
    let edge = &edges[side.index()];
    let adjacent_edge1 = &edges[adjacent_side1.index()];
    let adjacent_edge2 = &edges[adjacent_side2.index()];

    let mut mitre_adjacent1 = join_requires_mitre(side, adjacent_side1, edges, !antialias);
    let mut mitre_adjacent2 = join_requires_mitre(side, adjacent_side2, edges, !antialias);
    let adjacent1_matches = colors_match_at_corner(side, adjacent_side1, edges);
    let adjacent2_matches = colors_match_at_corner(side, adjacent_side2, edges);
    let color = override_color.unwrap_or(edge.color);

    if let Some(path) = path {
        let mut saver = StateSaver::new(surface, true);
        if inner.is_renderable() {
            clip_border_side_polygon(&mut *saver, outer, inner, side, adjacent1_matches, adjacent2_matches);
        } else {
            clip_border_side_for_complex_inner_path(&mut *saver, outer, inner, side, edges);
        }
        let thickness = edge.width.max(adjacent_edge1.width).max(adjacent_edge2.width);
        draw_box_side_from_path(
            &mut *saver,
            outer.rect,
            path,
            edges,
            edge.width,
            thickness,
            style,
            color,
            edge.style,
            include_logical_left_edge,
            include_logical_right_edge,
        );
        return;
    }

    let clip_for_style = matches!(edge.style, BorderStyle::Dotted | BorderStyle::Dashed)
        && (mitre_adjacent1 || mitre_adjacent2);
    let clip_adjacent1 = color_needs_antialias_at_corner(side, adjacent_side1, edges) && mitre_adjacent1;
    let clip_adjacent2 = color_needs_antialias_at_corner(side, adjacent_side2, edges) && mitre_adjacent2;
    let should_clip = clip_for_style || clip_adjacent1 || clip_adjacent2;

    let mut saver = StateSaver::new(surface, should_clip);
    if should_clip {
        let alias_adjacent1 = clip_adjacent1 || (clip_for_style && mitre_adjacent1);
        let alias_adjacent2 = clip_adjacent2 || (clip_for_style && mitre_adjacent2);
        clip_border_side_polygon(&mut *saver, outer, inner, side, !alias_adjacent1, !alias_adjacent2);
        // The clip shapes the corners now.
        mitre_adjacent1 = false;
        mitre_adjacent2 = false;
    }

    draw_line_for_box_side(
        &mut *saver,
        side_rect.x,
        side_rect.y,
        side_rect.max_x(),
        side_rect.max_y(),
        side,
        color,
        edge.style,
        if mitre_adjacent1 { adjacent_edge1.width } else { 0.0 },
        if mitre_adjacent2 { adjacent_edge2.width } else { 0.0 },
        antialias,
    );
}

/// Fill the region of a rounded border belonging to one side, in its style.
/// The caller has already clipped to that side's polygon.
fn draw_box_side_from_path(
    surface: &mut dyn PaintSurface,
    border_rect: Rect,
    border_path: &Path,
    edges: &[BorderEdge; 4],
    thickness: f32,
    draw_thickness: f32,
    style: &BoxStyle,
    color: ColorValue,
    border_style: BorderStyle,
    include_logical_left_edge: bool,
    include_logical_right_edge: bool,
) {
    if thickness <= 0.0 {
        return;
    }
    let border_style = if border_style == BorderStyle::Double && thickness < 3.0 {
        BorderStyle::Solid
    } else {
        border_style
    };
    let recurse = |surface: &mut dyn PaintSurface, color: ColorValue, border_style: BorderStyle| {
        draw_box_side_from_path(
            surface,
            border_rect,
            border_path,
            edges,
            thickness,
            draw_thickness,
            style,
            color,
            border_style,
            include_logical_left_edge,
            include_logical_right_edge,
        );
    };

    let color = match border_style {
        BorderStyle::None | BorderStyle::Hidden => return,
        BorderStyle::Dotted | BorderStyle::Dashed => {
            stroke_dashed_border_path(surface, border_path, thickness, draw_thickness, border_style, color);
            return;
        }
        BorderStyle::Double => {
            let [top, right, bottom, left] = edges.map(|edge| edge.double_border_stripe_widths());
            {
                let mut saver = StateSaver::new(surface, true);
                let inner_clip = rounded_inner_border_with_insets(
                    style,
                    border_rect,
                    EdgeSizes {
                        top: top.1,
                        right: right.1,
                        bottom: bottom.1,
                        left: left.1,
                    },
                    include_logical_left_edge,
                    include_logical_right_edge,
                );
                saver.clip_rounded_rect(&inner_clip);
                recurse(&mut *saver, color, BorderStyle::Solid);
            }
            {
                let mut saver = StateSaver::new(surface, true);
                let outer_clip = rounded_inner_border_with_insets(
                    style,
                    border_rect,
                    EdgeSizes {
                        top: top.0,
                        right: right.0,
                        bottom: bottom.0,
                        left: left.0,
                    },
                    include_logical_left_edge,
                    include_logical_right_edge,
                );
                saver.clip_out_rounded_rect(&outer_clip);
                recurse(&mut *saver, color, BorderStyle::Solid);
            }
            return;
        }
        BorderStyle::Ridge | BorderStyle::Groove => {
            let (s1, s2) = if border_style == BorderStyle::Groove {
                (BorderStyle::Inset, BorderStyle::Outset)
            } else {
                (BorderStyle::Outset, BorderStyle::Inset)
            };
            recurse(&mut *surface, color, s1);

            let mut saver = StateSaver::new(surface, true);
            let half = edges.map(|edge| edge.used_width() / 2.0);
            let clip = rounded_inner_border_with_insets(
                style,
                border_rect,
                EdgeSizes {
                    top: half[BoxSide::Top.index()],
                    right: half[BoxSide::Right.index()],
                    bottom: half[BoxSide::Bottom.index()],
                    left: half[BoxSide::Left.index()],
                },
                include_logical_left_edge,
                include_logical_right_edge,
            );
            saver.clip_rounded_rect(&clip);
            recurse(&mut *saver, color, s2);
            return;
        }
        // The whole ring is filled; the caller's side clip decides which
        // side is shaded.
        BorderStyle::Inset | BorderStyle::Outset | BorderStyle::Solid => color,
    };
    surface.fill_rect(border_rect.pixel_snapped(), color);
}

/// Stroke the outer border path with a dash pattern fitted to its length.
fn stroke_dashed_border_path(
    surface: &mut dyn PaintSurface,
    border_path: &Path,
    thickness: f32,
    draw_thickness: f32,
    border_style: BorderStyle,
    color: ColorValue,
) {
    // The path is the outer edge, so half the stroke is clipped away; the
    // extra tenth lets the clip antialias the inner edge.
    let stroke_thickness = draw_thickness * 2.0 * 1.1;
    let dash_length = thickness * if border_style == BorderStyle::Dashed { 3.0 } else { 1.0 };
    let mut gap_length = dash_length;
    let number_of_dashes = border_path.length() / dash_length;

    // Fewer than two dashes and two gaps: let the stroke style decide.
    let dash = (number_of_dashes >= 4.0).then(|| {
        let even_full_dashes = number_of_dashes.trunc() % 2.0 == 0.0;
        let integral = number_of_dashes.fract() == 0.0;
        if !even_full_dashes && !integral {
            gap_length += dash_length / (number_of_dashes / 2.0);
        }
        DashPattern {
            dash: dash_length,
            gap: gap_length,
            offset: dash_length,
        }
    });
    let stroke = Stroke {
        thickness: stroke_thickness,
        style: if border_style == BorderStyle::Dashed {
            StrokeStyle::Dashed
        } else {
            StrokeStyle::Dotted
        },
        dash,
    };
    surface.stroke_path(border_path, &stroke, color);
}

/// Styles that leave gaps in the border band.
const fn style_fills_border_area(style: BorderStyle) -> bool {
    !matches!(style, BorderStyle::Dotted | BorderStyle::Dashed | BorderStyle::Double)
}

const fn is_dotted_or_dashed(style: BorderStyle) -> bool {
    matches!(style, BorderStyle::Dotted | BorderStyle::Dashed)
}

/// Inset, outset, groove and ridge shade the top-left and bottom-right
/// halves differently, so their colors differ at the top-right and
/// bottom-left corners.
fn style_has_unmatched_colors_at_corner(style: BorderStyle, side: BoxSide, adjacent_side: BoxSide) -> bool {
    if !style.is_3d() {
        return false;
    }
    let flags: BoxSideSet = [side, adjacent_side].into_iter().collect();
    flags == [BoxSide::Top, BoxSide::Right].into_iter().collect()
        || flags == [BoxSide::Bottom, BoxSide::Left].into_iter().collect()
}

/// True if `side` is drawn before `adjacent_side` and the later side will
/// cover their shared corner anyway, so no mitre is needed.
///
/// Relies on the top, bottom, left, right paint order: left and right are
/// drawn last and are never overdrawn.
#[must_use]
pub fn will_be_overdrawn(side: BoxSide, adjacent_side: BoxSide, edges: &[BorderEdge; 4]) -> bool {
    match side {
        BoxSide::Top | BoxSide::Bottom => {
            let edge = &edges[side.index()];
            let adjacent = &edges[adjacent_side.index()];
            if adjacent.present_but_invisible() {
                return false;
            }
            if !edge.shares_color_with(adjacent) && adjacent.color.has_alpha() {
                return false;
            }
            style_fills_border_area(adjacent.style)
        }
        BoxSide::Left | BoxSide::Right => false,
    }
}

/// True if the corner between two sides with these styles needs a mitred
/// join to look right.
#[must_use]
pub fn border_styles_require_mitre(
    side: BoxSide,
    adjacent_side: BoxSide,
    style: BorderStyle,
    adjacent_style: BorderStyle,
) -> bool {
    if style == BorderStyle::Double
        || matches!(adjacent_style, BorderStyle::Double | BorderStyle::Groove | BorderStyle::Ridge)
    {
        return true;
    }
    if is_dotted_or_dashed(style) != is_dotted_or_dashed(adjacent_style) {
        return true;
    }
    if style != adjacent_style {
        return true;
    }
    style_has_unmatched_colors_at_corner(style, side, adjacent_side)
}

fn join_requires_mitre(side: BoxSide, adjacent_side: BoxSide, edges: &[BorderEdge; 4], allow_overdraw: bool) -> bool {
    let edge = &edges[side.index()];
    let adjacent = &edges[adjacent_side.index()];
    if (edge.is_transparent && adjacent.is_transparent) || !adjacent.is_present {
        return false;
    }
    if allow_overdraw && will_be_overdrawn(side, adjacent_side, edges) {
        return false;
    }
    if !edge.shares_color_with(adjacent) {
        return true;
    }
    border_styles_require_mitre(side, adjacent_side, edge.style, adjacent.style)
}

fn colors_match_at_corner(side: BoxSide, adjacent_side: BoxSide, edges: &[BorderEdge; 4]) -> bool {
    let edge = &edges[side.index()];
    let adjacent = &edges[adjacent_side.index()];
    if edge.should_render() != adjacent.should_render() {
        return false;
    }
    if !edge.shares_color_with(adjacent) {
        return false;
    }
    !style_has_unmatched_colors_at_corner(edge.style, side, adjacent_side)
}

fn color_needs_antialias_at_corner(side: BoxSide, adjacent_side: BoxSide, edges: &[BorderEdge; 4]) -> bool {
    let edge = &edges[side.index()];
    let adjacent = &edges[adjacent_side.index()];
    if !edge.color.has_alpha() {
        return false;
    }
    if edge.should_render() != adjacent.should_render() {
        return false;
    }
    if !edge.shares_color_with(adjacent) {
        return true;
    }
    style_has_unmatched_colors_at_corner(edge.style, side, adjacent_side)
}

/// Where the line through `p1` and `p2` crosses the line through `d1` and
/// `d2`, or `None` if they are parallel.
fn find_intersection(p1: Point, p2: Point, d1: Point, d2: Point) -> Option<Point> {
    let (px, py) = (p2.x - p1.x, p2.y - p1.y);
    let (dx, dy) = (d2.x - d1.x, d2.y - d1.y);
    let denominator = px * dy - py * dx;
    if denominator == 0.0 {
        return None;
    }
    let param = ((d1.x - p1.x) * dy - (d1.y - p1.y) * dx) / denominator;
    Some(Point::new(param.mul_add(px, p1.x), param.mul_add(py, p1.y)))
}

/// Pull an inner quad corner onto the chord of a rounded inner corner so the
/// clip covers the curve.
fn adjust_for_inner_radius(outer: Point, inner: Point, radius: Size, dx: f32, dy: f32) -> Point {
    if radius.is_empty() {
        return inner;
    }
    find_intersection(
        outer,
        inner,
        Point::new(radius.width.mul_add(dx, inner.x), inner.y),
        Point::new(inner.x, radius.height.mul_add(dy, inner.y)),
    )
    .unwrap_or(inner)
}

/// Clip to the trapezoid one side may paint into: from the outer corners to
/// the inner corners of the border, extended to cover rounded inner corners.
///
/// A corner whose neighbouring side matches in color and style is clipped
/// without antialiasing so the two sides join without a seam. When only one
/// corner matches, the trapezoid is split into two clips so each corner gets
/// its own antialiasing.
pub fn clip_border_side_polygon(
    surface: &mut dyn PaintSurface,
    outer: &RoundedRect,
    inner: &RoundedRect,
    side: BoxSide,
    first_edge_matches: bool,
    second_edge_matches: bool,
) {
    let o = outer.rect;
    let i = inner.rect;
    let r = &inner.radii;

    //         0----------------3
    //       0  \              /  0
    //       |\  1------------2  /|
    //       | 1                1 |
    //       | |                | |
    //       | 2                2 |
    //       |/  1------------2  \|
    //       3  /              \  3
    //         0----------------3
    let mut quad = match side {
        BoxSide::Top => [
            Point::new(o.x, o.y),
            Point::new(i.x, i.y),
            Point::new(i.max_x(), i.y),
            Point::new(o.max_x(), o.y),
        ],
        BoxSide::Left => [
            Point::new(o.x, o.y),
            Point::new(i.x, i.y),
            Point::new(i.x, i.max_y()),
            Point::new(o.x, o.max_y()),
        ],
        BoxSide::Bottom => [
            Point::new(o.x, o.max_y()),
            Point::new(i.x, i.max_y()),
            Point::new(i.max_x(), i.max_y()),
            Point::new(o.max_x(), o.max_y()),
        ],
        BoxSide::Right => [
            Point::new(o.max_x(), o.y),
            Point::new(i.max_x(), i.y),
            Point::new(i.max_x(), i.max_y()),
            Point::new(o.max_x(), o.max_y()),
        ],
    };
    let (first_radius, first_dir, second_radius, second_dir) = match side {
        BoxSide::Top => (r.top_left, (1.0, 1.0), r.top_right, (-1.0, 1.0)),
        BoxSide::Left => (r.top_left, (1.0, 1.0), r.bottom_left, (1.0, -1.0)),
        BoxSide::Bottom => (r.bottom_left, (1.0, -1.0), r.bottom_right, (-1.0, -1.0)),
        BoxSide::Right => (r.top_right, (-1.0, 1.0), r.bottom_right, (-1.0, -1.0)),
    };
    quad[1] = adjust_for_inner_radius(quad[0], quad[1], first_radius, first_dir.0, first_dir.1);
    quad[2] = adjust_for_inner_radius(quad[3], quad[2], second_radius, second_dir.0, second_dir.1);

    if first_edge_matches == second_edge_matches {
        surface.clip_convex_polygon(&quad, !first_edge_matches);
        return;
    }

    // Split into two parallelograms by sliding points 1 and 2 along the
    // quad's slanted sides.
    let (ax, ay) = (quad[1].x - quad[0].x, quad[1].y - quad[0].y);
    let (bx, by) = (quad[2].x - quad[1].x, quad[2].y - quad[1].y);
    let (cx, cy) = (quad[3].x - quad[2].x, quad[3].y - quad[2].y);

    let (r1, r2) = if bx.abs() < EPSILON && by.abs() < EPSILON {
        // The quad is a triangle.
        (1.0, 1.0)
    } else {
        (
            (-ax).mul_add(by, ay * bx) / cx.mul_add(by, -(cy * bx)) + EXTEND_FILL,
            (-cx).mul_add(by, cy * bx) / ax.mul_add(by, -(ay * bx)) + EXTEND_FILL,
        )
    };

    let first_quad = [
        quad[0],
        quad[1],
        Point::new(r2.mul_add(ax, quad[3].x), r2.mul_add(ay, quad[3].y)),
        quad[3],
    ];
    surface.clip_convex_polygon(&first_quad, !first_edge_matches);

    let second_quad = [
        quad[0],
        Point::new((-r1).mul_add(cx, quad[0].x), (-r1).mul_add(cy, quad[0].y)),
        quad[2],
        quad[3],
    ];
    surface.clip_convex_polygon(&second_quad, !second_edge_matches);
}

/// Clip for a side whose inner border is not renderable: the side's half
/// of the box minus the inner shape.
fn clip_border_side_for_complex_inner_path(
    surface: &mut dyn PaintSurface,
    outer: &RoundedRect,
    inner: &RoundedRect,
    side: BoxSide,
    edges: &[BorderEdge; 4],
) {
    surface.clip(side_rect_including_inner(outer.rect, edges, side));
    let adjusted = inner.constrained();
    if !adjusted.is_empty() {
        surface.clip_out_rounded_rect(&adjusted);
    }
}
