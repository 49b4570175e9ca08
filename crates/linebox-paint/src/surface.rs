//! The drawing surface the box-model painter emits into.
//!
//! The painter never touches pixels. It issues clip, fill and stroke calls
//! against a [`PaintSurface`], which may record them (see
//! [`crate::recording::RecordingSurface`]) or rasterize them directly.
//!
//! Clip calls accumulate until the matching [`PaintSurface::restore`];
//! [`StateSaver`] pairs the two so an early return can't leak a clip.

use std::ops::{Deref, DerefMut};

use linebox_layout::geometry::{Point, Rect, Size};
use linebox_layout::style::{ColorValue, CornerRadii};
use serde::Serialize;
use strum_macros::Display;

use crate::border_edge::BoxSideSet;

/// A rectangle with per-corner elliptical radii.
///
/// [§ 5.2 Corner Shaping](https://www.w3.org/TR/css-backgrounds-3/#corner-shaping)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoundedRect {
    /// The bounding rectangle.
    pub rect: Rect,
    /// Corner radii.
    pub radii: CornerRadii,
}

impl RoundedRect {
    /// A rounded rectangle from its parts.
    #[must_use]
    pub const fn new(rect: Rect, radii: CornerRadii) -> Self {
        Self { rect, radii }
    }

    /// A rectangle with square corners.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            radii: CornerRadii::default(),
        }
    }

    /// True if any corner is rounded.
    #[must_use]
    pub fn is_rounded(&self) -> bool {
        !self.radii.is_zero()
    }

    /// True if the bounding rectangle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    /// True if the radii on every side fit along that side, so the shape can
    /// be drawn without the corner curves overlapping.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        let r = &self.radii;
        r.top_left.width + r.top_right.width <= self.rect.width
            && r.bottom_left.width + r.bottom_right.width <= self.rect.width
            && r.top_left.height + r.bottom_left.height <= self.rect.height
            && r.top_right.height + r.bottom_right.height <= self.rect.height
    }

    /// Same radii on a different rectangle.
    #[must_use]
    pub const fn with_rect(self, rect: Rect) -> Self {
        Self { rect, ..self }
    }

    /// Grow the rectangle by `amount` on every side and push each rounded
    /// corner out by the same amount. Square corners stay square.
    #[must_use]
    pub fn inflate(self, amount: f32) -> Self {
        Self {
            rect: self.rect.inflate(amount),
            radii: expand_radii(self.radii, amount, amount, amount, amount),
        }
    }

    /// Grow the rectangle by `amount` and scale the radii by the change in
    /// its shorter dimension.
    #[must_use]
    pub fn inflate_with_radii(self, amount: f32) -> Self {
        let old = self.rect;
        let rect = old.inflate(amount);
        let factor = if rect.width < rect.height {
            if old.width > 0.0 { rect.width / old.width } else { 0.0 }
        } else if old.height > 0.0 {
            rect.height / old.height
        } else {
            0.0
        };
        Self {
            rect,
            radii: scale_radii(self.radii, factor),
        }
    }

    /// Scale every radius down uniformly so adjacent corners never overlap.
    ///
    /// [§ 5.5 Overlapping Curves](https://www.w3.org/TR/css-backgrounds-3/#corner-overlap)
    ///
    /// "Let f = min(Li/Si), where i ∈ {top, right, bottom, left}, Si is the
    /// sum of the two corresponding radii of the corners on side i, and
    /// Ltop = Lbottom = the width of the box, and Lleft = Lright = the
    /// height of the box. If f < 1, then all corner radii are reduced by
    /// multiplying them by f."
    #[must_use]
    pub fn constrained(self) -> Self {
        let r = &self.radii;
        let ratios = [
            (self.rect.width, r.top_left.width + r.top_right.width),
            (self.rect.width, r.bottom_left.width + r.bottom_right.width),
            (self.rect.height, r.top_left.height + r.bottom_left.height),
            (self.rect.height, r.top_right.height + r.bottom_right.height),
        ];
        let factor = ratios
            .iter()
            .filter(|(_, sum)| *sum > 0.0)
            .map(|(length, sum)| length.max(0.0) / sum)
            .fold(1.0_f32, f32::min);
        if factor < 1.0 {
            Self {
                radii: scale_radii(self.radii, factor),
                ..self
            }
        } else {
            self
        }
    }
}

/// Multiply every radius by `factor`. A corner collapsing on either axis
/// becomes square.
#[must_use]
pub fn scale_radii(radii: CornerRadii, factor: f32) -> CornerRadii {
    let scale = |corner: Size| {
        let scaled = Size::new(corner.width * factor, corner.height * factor);
        if scaled.is_empty() { Size::default() } else { scaled }
    };
    CornerRadii {
        top_left: scale(radii.top_left),
        top_right: scale(radii.top_right),
        bottom_left: scale(radii.bottom_left),
        bottom_right: scale(radii.bottom_right),
    }
}

/// Grow each rounded corner by the amounts on its two sides; negative
/// amounts shrink, clamping at zero. Square corners are left alone.
#[must_use]
pub fn expand_radii(radii: CornerRadii, top: f32, bottom: f32, left: f32, right: f32) -> CornerRadii {
    let expand = |corner: Size, horizontal: f32, vertical: f32| {
        if corner.is_empty() {
            return corner;
        }
        Size::new((corner.width + horizontal).max(0.0), (corner.height + vertical).max(0.0))
    };
    CornerRadii {
        top_left: expand(radii.top_left, left, top),
        top_right: expand(radii.top_right, right, top),
        bottom_left: expand(radii.bottom_left, left, bottom),
        bottom_right: expand(radii.bottom_right, right, bottom),
    }
}

/// One element of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathElement {
    /// Start a new sub-path.
    MoveTo {
        /// Start point.
        to: Point,
    },
    /// Straight segment from the current point.
    LineTo {
        /// End point.
        to: Point,
    },
    /// Close the current sub-path.
    Close,
    /// A closed rectangular sub-path.
    Rect {
        /// The rectangle.
        rect: Rect,
    },
    /// A closed rounded-rectangle sub-path.
    RoundedRect {
        /// The shape.
        rect: RoundedRect,
    },
}

/// A sequence of sub-paths to fill or stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// An empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Start a new sub-path at `to`.
    pub fn move_to(&mut self, to: Point) {
        self.elements.push(PathElement::MoveTo { to });
    }

    /// Add a line from the current point.
    pub fn line_to(&mut self, to: Point) {
        self.elements.push(PathElement::LineTo { to });
    }

    /// Close the current sub-path.
    pub fn close(&mut self) {
        self.elements.push(PathElement::Close);
    }

    /// Append a rectangle.
    pub fn add_rect(&mut self, rect: Rect) {
        self.elements.push(PathElement::Rect { rect });
    }

    /// Append a rounded rectangle, or a plain rectangle if no corner is
    /// rounded.
    pub fn add_rounded_rect(&mut self, rect: RoundedRect) {
        if rect.is_rounded() {
            self.elements.push(PathElement::RoundedRect { rect });
        } else {
            self.add_rect(rect.rect);
        }
    }

    /// Append a closed polygon.
    pub fn add_polygon(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        for point in rest {
            self.line_to(*point);
        }
        self.close();
    }

    /// A closed polygon path.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        path.add_polygon(points);
        path
    }

    /// The path's elements, in order.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// True if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Approximate outline length, used to fit dash patterns.
    #[must_use]
    pub fn length(&self) -> f32 {
        let mut length = 0.0;
        let mut start = Point::default();
        let mut current = Point::default();
        for element in &self.elements {
            match *element {
                PathElement::MoveTo { to } => {
                    start = to;
                    current = to;
                }
                PathElement::LineTo { to } => {
                    length += distance(current, to);
                    current = to;
                }
                PathElement::Close => {
                    length += distance(current, start);
                    current = start;
                }
                PathElement::Rect { rect } => length += 2.0 * (rect.width + rect.height),
                PathElement::RoundedRect { rect } => length += rounded_rect_perimeter(&rect),
            }
        }
        length
    }
}

fn distance(a: Point, b: Point) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Perimeter with each quarter-ellipse corner approximated as
/// π/4 × (rx + ry).
fn rounded_rect_perimeter(rect: &RoundedRect) -> f32 {
    let r = &rect.radii;
    let straight = 2.0 * (rect.rect.width + rect.rect.height);
    [r.top_left, r.top_right, r.bottom_left, r.bottom_right]
        .iter()
        .map(|corner| (corner.width + corner.height) * (std::f32::consts::FRAC_PI_4 - 1.0))
        .fold(straight, |total, delta| total + delta)
}

/// How overlapping sub-paths decide what is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FillRule {
    /// Inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside if an odd number of edges is crossed.
    EvenOdd,
}

/// Line pattern for strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Round dots one thickness apart.
    Dotted,
    /// Dashes three thicknesses long.
    Dashed,
}

/// Explicit dash lengths overriding the stroke style's default spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashPattern {
    /// Length of each dash.
    pub dash: f32,
    /// Length of each gap.
    pub gap: f32,
    /// Distance into the pattern at which the stroke starts.
    pub offset: f32,
}

/// Stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stroke {
    /// Line thickness.
    pub thickness: f32,
    /// Solid, dotted or dashed.
    pub style: StrokeStyle,
    /// Explicit dash lengths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<DashPattern>,
}

/// A blurred shadow cast by a shape.
///
/// [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadowParams {
    /// Horizontal and vertical shadow offset.
    pub offset: Size,
    /// Blur radius.
    pub blur: f32,
    /// Spread distance (inner shadows only; outer shadows have it folded
    /// into the shape).
    pub spread: f32,
    /// Shadow color.
    pub color: ColorValue,
}

/// Target of box-model painting.
///
/// Coordinates are in CSS pixels. Every clip call intersects the current
/// clip and stays in force until the `restore` matching the last `save`.
pub trait PaintSurface {
    /// Push the clip and layer state.
    fn save(&mut self);

    /// Pop to the state at the matching `save`.
    fn restore(&mut self);

    /// Intersect the clip with a rectangle.
    fn clip(&mut self, rect: Rect);

    /// Intersect the clip with a rounded rectangle.
    fn clip_rounded_rect(&mut self, rect: &RoundedRect);

    /// Remove a rounded rectangle from the clip.
    fn clip_out_rounded_rect(&mut self, rect: &RoundedRect);

    /// Intersect the clip with a convex polygon. `antialias` selects smooth
    /// or pixel-aligned edges.
    fn clip_convex_polygon(&mut self, points: &[Point], antialias: bool);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: ColorValue);

    /// Fill a rounded rectangle.
    fn fill_rounded_rect(&mut self, rect: &RoundedRect, color: ColorValue);

    /// Fill a path.
    fn fill_path(&mut self, path: &Path, rule: FillRule, color: ColorValue);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, color: ColorValue);

    /// Start compositing into an offscreen layer that is blended back with
    /// `opacity` when ended.
    fn begin_transparency_layer(&mut self, opacity: f32);

    /// Composite the innermost transparency layer.
    fn end_transparency_layer(&mut self);

    /// Paint only the shadow `shape` would cast; the shape itself is not
    /// drawn.
    fn draw_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams);

    /// Paint an inset shadow inside `shape`. Edges in `excluded` belong to
    /// a neighbouring fragment and cast no shadow.
    fn draw_inner_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams, excluded: BoxSideSet);

    /// Fill the ring between two rounded rectangles.
    fn fill_between_rounded_rects(&mut self, outer: &RoundedRect, inner: &RoundedRect, color: ColorValue) {
        let mut path = Path::new();
        path.add_rounded_rect(*outer);
        path.add_rounded_rect(*inner);
        self.fill_path(&path, FillRule::EvenOdd, color);
    }
}

/// Scoped `save`/`restore` pair.
///
/// Dereferences to the wrapped surface so drawing continues through the
/// guard. Restores on drop only if a save was made.
pub struct StateSaver<'a, S: PaintSurface + ?Sized> {
    surface: &'a mut S,
    saved: bool,
}

impl<'a, S: PaintSurface + ?Sized> StateSaver<'a, S> {
    /// Wrap `surface`, saving immediately if `save_now` is set.
    pub fn new(surface: &'a mut S, save_now: bool) -> Self {
        if save_now {
            surface.save();
        }
        Self {
            surface,
            saved: save_now,
        }
    }

    /// Save now if not already saved.
    pub fn save(&mut self) {
        if !self.saved {
            self.surface.save();
            self.saved = true;
        }
    }

    /// True once a save has been made.
    #[must_use]
    pub const fn saved(&self) -> bool {
        self.saved
    }
}

impl<S: PaintSurface + ?Sized> Deref for StateSaver<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: PaintSurface + ?Sized> DerefMut for StateSaver<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: PaintSurface + ?Sized> Drop for StateSaver<'_, S> {
    fn drop(&mut self) {
        if self.saved {
            self.surface.restore();
        }
    }
}
