//! Software rasterizer for painted lines.
//!
//! Executes [`PaintSurface`] calls against a tiny-skia pixmap.
//!
//! ```text
//! Layout → Paint → Render
//!            ↓        ↓
//!     PaintSurface → Pixels
//! ```
//!
//! Clips are kept as a coverage mask the size of the canvas. Transparency
//! layers are separate pixmaps composited back with their opacity when the
//! layer ends.

use std::path::Path as FsPath;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use linebox_common::warning::warn_once;
use linebox_layout::geometry::{Point, Rect};
use linebox_layout::style::ColorValue;
use linebox_paint::border_edge::{BoxSide, BoxSideSet};
use linebox_paint::surface::{
    FillRule, Path, PaintSurface, PathElement, RoundedRect, ShadowParams, Stroke, StrokeStyle, expand_radii,
};
use tiny_skia::{Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

/// Bezier handle length for a quarter ellipse, relative to its radius.
const KAPPA: f32 = 0.552_284_8;

/// Number of fills a blurred shadow edge is approximated with.
const BLUR_STEPS: u8 = 4;

struct Layer {
    pixmap: Pixmap,
    opacity: f32,
}

/// A [`PaintSurface`] that draws into an RGBA pixmap.
pub struct RasterSurface {
    pixmap: Pixmap,
    clip: Option<Mask>,
    saved: Vec<Option<Mask>>,
    layers: Vec<Layer>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("clipped", &self.clip.is_some())
            .field("save_depth", &self.saved.len())
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl RasterSurface {
    /// Create a white canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).with_context(|| format!("cannot create a {width}x{height} canvas"))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self {
            pixmap,
            clip: None,
            saved: Vec::new(),
            layers: Vec::new(),
        })
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Color of one pixel of the base canvas, or `None` outside it.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<ColorValue> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(ColorValue::rgba(color.red(), color.green(), color.blue(), color.alpha()))
    }

    /// Flatten the canvas into an image buffer.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        let mut buffer = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (pixel, out) in self.pixmap.pixels().iter().zip(buffer.pixels_mut()) {
            let color = pixel.demultiply();
            *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        buffer
    }

    /// Save the canvas as a PNG file, whatever the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written to the given path.
    pub fn save_png(&self, path: &FsPath) -> Result<()> {
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to save image to '{}'", path.display()))
    }

    fn fill_skia_path(&mut self, path: &tiny_skia::Path, rule: tiny_skia::FillRule, color: ColorValue, aa: bool) {
        let paint = paint_for(color, aa);
        let mask = self.clip.as_ref();
        let target = match self.layers.last_mut() {
            Some(layer) => &mut layer.pixmap,
            None => &mut self.pixmap,
        };
        target.fill_path(path, &paint, rule, Transform::identity(), mask);
    }

    /// Coverage mask of a path over the whole canvas.
    fn mask_for(&self, path: &tiny_skia::Path, rule: tiny_skia::FillRule, aa: bool) -> Option<Mask> {
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
        mask.fill_path(path, rule, aa, Transform::identity());
        Some(mask)
    }

    /// Intersect the clip with `mask`.
    fn intersect_clip(&mut self, mask: Mask) {
        match self.clip.as_mut() {
            Some(clip) => {
                for (current, coverage) in clip.data_mut().iter_mut().zip(mask.data()) {
                    *current = multiply_coverage(*current, *coverage);
                }
            }
            None => self.clip = Some(mask),
        }
    }

    fn clip_to_path(&mut self, path: Option<tiny_skia::Path>, aa: bool, invert: bool) {
        let mask = path.and_then(|path| self.mask_for(&path, tiny_skia::FillRule::Winding, aa));
        let Some(mut mask) = mask else {
            // An empty shape clips everything away, and clipping it out
            // leaves the clip as it was.
            if invert {
                return;
            }
            if let Some(empty) = Mask::new(self.pixmap.width(), self.pixmap.height()) {
                self.intersect_clip(empty);
            }
            return;
        };
        if invert {
            for coverage in mask.data_mut() {
                *coverage = 255 - *coverage;
            }
        }
        self.intersect_clip(mask);
    }

    /// Fill `shape` in successively smaller steps so its edge fades over
    /// `blur` pixels.
    fn fill_blurred(&mut self, shape: &RoundedRect, blur: f32, color: ColorValue) {
        if blur <= 0.0 {
            if let Some(path) = rounded_rect_path(shape) {
                self.fill_skia_path(&path, tiny_skia::FillRule::Winding, color, true);
            }
            return;
        }
        warn_once("Render", "box-shadow blur is approximated with stepped fills");
        let step_color = color.with_alpha(color.a / BLUR_STEPS);
        for step in 0..BLUR_STEPS {
            let fraction = f32::from(step) / f32::from(BLUR_STEPS);
            let grown = shape.inflate(blur / 2.0 - blur * fraction);
            if let Some(path) = rounded_rect_path(&grown.constrained()) {
                self.fill_skia_path(&path, tiny_skia::FillRule::Winding, step_color, true);
            }
        }
    }
}

fn paint_for(color: ColorValue, aa: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = aa;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn multiply_coverage(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

const fn skia_fill_rule(rule: FillRule) -> tiny_skia::FillRule {
    match rule {
        FillRule::NonZero => tiny_skia::FillRule::Winding,
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
    }
}

/// Append a rounded rectangle, clockwise from the end of the top-left
/// corner.
fn push_rounded_rect(builder: &mut PathBuilder, shape: &RoundedRect) {
    let RoundedRect { rect, radii } = *shape;
    let (left, top, right, bottom) = (rect.x, rect.y, rect.max_x(), rect.max_y());
    let (tl, tr, br, bl) = (radii.top_left, radii.top_right, radii.bottom_right, radii.bottom_left);

    builder.move_to(left + tl.width, top);
    builder.line_to(right - tr.width, top);
    builder.cubic_to(
        right - tr.width * (1.0 - KAPPA),
        top,
        right,
        top + tr.height * (1.0 - KAPPA),
        right,
        top + tr.height,
    );
    builder.line_to(right, bottom - br.height);
    builder.cubic_to(
        right,
        bottom - br.height * (1.0 - KAPPA),
        right - br.width * (1.0 - KAPPA),
        bottom,
        right - br.width,
        bottom,
    );
    builder.line_to(left + bl.width, bottom);
    builder.cubic_to(
        left + bl.width * (1.0 - KAPPA),
        bottom,
        left,
        bottom - bl.height * (1.0 - KAPPA),
        left,
        bottom - bl.height,
    );
    builder.line_to(left, top + tl.height);
    builder.cubic_to(
        left,
        top + tl.height * (1.0 - KAPPA),
        left + tl.width * (1.0 - KAPPA),
        top,
        left + tl.width,
        top,
    );
    builder.close();
}

fn rounded_rect_path(shape: &RoundedRect) -> Option<tiny_skia::Path> {
    if shape.is_empty() {
        return None;
    }
    let mut builder = PathBuilder::new();
    push_rounded_rect(&mut builder, shape);
    builder.finish()
}

/// Convert a painter path. `None` if nothing was added.
fn skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathElement::MoveTo { to } => builder.move_to(to.x, to.y),
            PathElement::LineTo { to } => builder.line_to(to.x, to.y),
            PathElement::Close => builder.close(),
            PathElement::Rect { rect } => {
                if let Some(rect) = skia_rect(rect) {
                    builder.push_rect(rect);
                }
            }
            PathElement::RoundedRect { rect } => push_rounded_rect(&mut builder, &rect),
        }
    }
    builder.finish()
}

fn polygon_path(points: &[Point]) -> Option<tiny_skia::Path> {
    skia_path(&Path::polygon(points))
}

/// Dash intervals for a stroke, or `None` for a solid line.
fn dash_intervals(stroke: &Stroke) -> Option<(Vec<f32>, f32)> {
    if let Some(pattern) = stroke.dash {
        return Some((vec![pattern.dash, pattern.gap], pattern.offset));
    }
    match stroke.style {
        StrokeStyle::Solid => None,
        StrokeStyle::Dotted => Some((vec![stroke.thickness, stroke.thickness], 0.0)),
        StrokeStyle::Dashed => Some((vec![stroke.thickness * 3.0, stroke.thickness * 3.0], 0.0)),
    }
}

impl PaintSurface for RasterSurface {
    fn save(&mut self) {
        self.saved.push(self.clip.clone());
    }

    fn restore(&mut self) {
        if let Some(clip) = self.saved.pop() {
            self.clip = clip;
        }
    }

    fn clip(&mut self, rect: Rect) {
        let path = skia_rect(rect).map(PathBuilder::from_rect);
        self.clip_to_path(path, false, false);
    }

    fn clip_rounded_rect(&mut self, rect: &RoundedRect) {
        self.clip_to_path(rounded_rect_path(rect), true, false);
    }

    fn clip_out_rounded_rect(&mut self, rect: &RoundedRect) {
        self.clip_to_path(rounded_rect_path(rect), true, true);
    }

    fn clip_convex_polygon(&mut self, points: &[Point], antialias: bool) {
        self.clip_to_path(polygon_path(points), antialias, false);
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        let Some(rect) = skia_rect(rect) else {
            return;
        };
        let paint = paint_for(color, false);
        let mask = self.clip.as_ref();
        let target = match self.layers.last_mut() {
            Some(layer) => &mut layer.pixmap,
            None => &mut self.pixmap,
        };
        target.fill_rect(rect, &paint, Transform::identity(), mask);
    }

    fn fill_rounded_rect(&mut self, rect: &RoundedRect, color: ColorValue) {
        if let Some(path) = rounded_rect_path(rect) {
            self.fill_skia_path(&path, tiny_skia::FillRule::Winding, color, true);
        }
    }

    fn fill_path(&mut self, path: &Path, rule: FillRule, color: ColorValue) {
        if let Some(path) = skia_path(path) {
            self.fill_skia_path(&path, skia_fill_rule(rule), color, true);
        }
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, color: ColorValue) {
        let Some(path) = skia_path(path) else {
            return;
        };
        let mut skia_stroke = tiny_skia::Stroke {
            width: stroke.thickness,
            ..tiny_skia::Stroke::default()
        };
        if let Some((intervals, offset)) = dash_intervals(stroke) {
            skia_stroke.dash = tiny_skia::StrokeDash::new(intervals, offset);
        }
        let paint = paint_for(color, true);
        let mask = self.clip.as_ref();
        let target = match self.layers.last_mut() {
            Some(layer) => &mut layer.pixmap,
            None => &mut self.pixmap,
        };
        target.stroke_path(&path, &paint, &skia_stroke, Transform::identity(), mask);
    }

    fn begin_transparency_layer(&mut self, opacity: f32) {
        match Pixmap::new(self.pixmap.width(), self.pixmap.height()) {
            Some(pixmap) => self.layers.push(Layer {
                pixmap,
                opacity: opacity.clamp(0.0, 1.0),
            }),
            None => warn_once("Render", "transparency layer could not be allocated"),
        }
    }

    fn end_transparency_layer(&mut self) {
        let Some(layer) = self.layers.pop() else {
            return;
        };
        let paint = PixmapPaint {
            opacity: layer.opacity,
            ..PixmapPaint::default()
        };
        let target = match self.layers.last_mut() {
            Some(parent) => &mut parent.pixmap,
            None => &mut self.pixmap,
        };
        target.draw_pixmap(0, 0, layer.pixmap.as_ref(), &paint, Transform::identity(), None);
    }

    fn draw_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams) {
        let moved = shape.with_rect(shape.rect.moved_by(shadow.offset.width, shadow.offset.height));
        self.fill_blurred(&moved.inflate(shadow.spread).constrained(), shadow.blur, shadow.color);
    }

    fn draw_inner_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams, excluded: BoxSideSet) {
        let reach = shadow.offset.width.abs() + shadow.offset.height.abs() + shadow.blur + shadow.spread.abs() + 1.0;
        let mut hole = shape.rect.moved_by(shadow.offset.width, shadow.offset.height).inflate(-shadow.spread);
        // An excluded edge continues into the neighbouring fragment, so the
        // hole runs past it.
        for side in excluded.iter() {
            match side {
                BoxSide::Top => {
                    hole.height += hole.y - (shape.rect.y - reach);
                    hole.y = shape.rect.y - reach;
                }
                BoxSide::Bottom => hole.height = shape.rect.max_y() + reach - hole.y,
                BoxSide::Left => {
                    hole.width += hole.x - (shape.rect.x - reach);
                    hole.x = shape.rect.x - reach;
                }
                BoxSide::Right => hole.width = shape.rect.max_x() + reach - hole.x,
            }
        }
        let spread = -shadow.spread;
        let hole = RoundedRect::new(hole, expand_radii(shape.radii, spread, spread, spread, spread)).constrained();

        self.save();
        self.clip_rounded_rect(shape);
        let steps = if shadow.blur > 0.0 {
            warn_once("Render", "box-shadow blur is approximated with stepped fills");
            BLUR_STEPS
        } else {
            1
        };
        let step_color = shadow.color.with_alpha(shadow.color.a / steps);
        for step in 0..steps {
            let fraction = f32::from(step) / f32::from(steps);
            let hole = hole.inflate(shadow.blur * fraction - shadow.blur / 2.0).constrained();
            let mut builder = PathBuilder::new();
            if let Some(bounds) = skia_rect(shape.rect.inflate(reach)) {
                builder.push_rect(bounds);
            }
            if !hole.is_empty() {
                push_rounded_rect(&mut builder, &hole);
            }
            if let Some(path) = builder.finish() {
                self.fill_skia_path(&path, tiny_skia::FillRule::EvenOdd, step_color, true);
            }
        }
        self.restore();
    }
}
