//! Display list - a recorded sequence of surface calls
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Painting into a [`RecordingSurface`] produces a [`DisplayList`]: every
//! clip, fill and stroke in the order it was issued (back to front). A list
//! can be replayed onto any other [`PaintSurface`], dumped as JSON, or
//! inspected directly in tests.

use linebox_layout::geometry::{Point, Rect};
use linebox_layout::style::ColorValue;
use serde::Serialize;

use crate::border_edge::BoxSideSet;
use crate::surface::{FillRule, Path, PaintSurface, RoundedRect, ShadowParams, Stroke};

/// A single recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    /// Push clip and layer state.
    Save,
    /// Pop clip and layer state.
    Restore,
    /// Intersect the clip with a rectangle.
    Clip {
        /// Clip rectangle.
        rect: Rect,
    },
    /// Intersect the clip with a rounded rectangle.
    ClipRoundedRect {
        /// Clip shape.
        rect: RoundedRect,
    },
    /// Remove a rounded rectangle from the clip.
    ClipOutRoundedRect {
        /// Excluded shape.
        rect: RoundedRect,
    },
    /// Intersect the clip with a convex polygon.
    ClipConvexPolygon {
        /// Polygon corners.
        points: Vec<Point>,
        /// Smooth or pixel-aligned edges.
        antialias: bool,
    },
    /// Fill a rectangle with a solid color.
    ///
    /// Used for backgrounds and solid border sides.
    FillRect {
        /// Filled rectangle.
        rect: Rect,
        /// Fill color.
        color: ColorValue,
    },
    /// Fill a rounded rectangle.
    FillRoundedRect {
        /// Filled shape.
        rect: RoundedRect,
        /// Fill color.
        color: ColorValue,
    },
    /// Fill a path.
    FillPath {
        /// Filled path.
        path: Path,
        /// Winding rule.
        rule: FillRule,
        /// Fill color.
        color: ColorValue,
    },
    /// Stroke a path.
    StrokePath {
        /// Stroked path.
        path: Path,
        /// Thickness and dash pattern.
        stroke: Stroke,
        /// Stroke color.
        color: ColorValue,
    },
    /// Start an offscreen layer.
    BeginTransparencyLayer {
        /// Opacity the layer is composited with.
        opacity: f32,
    },
    /// Composite the innermost layer.
    EndTransparencyLayer,
    /// Paint the shadow of a shape without the shape.
    ///
    /// Outer shadows are painted before the background.
    DrawShadow {
        /// Shape casting the shadow.
        shape: RoundedRect,
        /// Offset, blur and color.
        shadow: ShadowParams,
    },
    /// Paint an inset shadow.
    ///
    /// Inset shadows are painted after the background, before the border.
    DrawInnerShadow {
        /// Shape the shadow falls inside.
        shape: RoundedRect,
        /// Offset, blur, spread and color.
        shadow: ShadowParams,
        /// Edges casting no shadow.
        excluded: BoxSideSet,
    },
}

/// A display list - the output of painting
///
/// Contains all recorded commands in painting order. Commands are stored in
/// back-to-front order, so a replay can simply iterate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<PaintCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: PaintCommand) {
        self.commands.push(command);
    }

    /// Get all commands in the display list.
    #[must_use]
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Issue every command against `surface`, in order.
    pub fn replay(&self, surface: &mut dyn PaintSurface) {
        for command in &self.commands {
            match command {
                PaintCommand::Save => surface.save(),
                PaintCommand::Restore => surface.restore(),
                PaintCommand::Clip { rect } => surface.clip(*rect),
                PaintCommand::ClipRoundedRect { rect } => surface.clip_rounded_rect(rect),
                PaintCommand::ClipOutRoundedRect { rect } => surface.clip_out_rounded_rect(rect),
                PaintCommand::ClipConvexPolygon { points, antialias } => {
                    surface.clip_convex_polygon(points, *antialias);
                }
                PaintCommand::FillRect { rect, color } => surface.fill_rect(*rect, *color),
                PaintCommand::FillRoundedRect { rect, color } => surface.fill_rounded_rect(rect, *color),
                PaintCommand::FillPath { path, rule, color } => surface.fill_path(path, *rule, *color),
                PaintCommand::StrokePath { path, stroke, color } => surface.stroke_path(path, stroke, *color),
                PaintCommand::BeginTransparencyLayer { opacity } => surface.begin_transparency_layer(*opacity),
                PaintCommand::EndTransparencyLayer => surface.end_transparency_layer(),
                PaintCommand::DrawShadow { shape, shadow } => surface.draw_shadow(shape, shadow),
                PaintCommand::DrawInnerShadow {
                    shape,
                    shadow,
                    excluded,
                } => surface.draw_inner_shadow(shape, shadow, *excluded),
            }
        }
    }
}

/// A [`PaintSurface`] that records every call into a [`DisplayList`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    list: DisplayList,
    depth: usize,
}

impl RecordingSurface {
    /// Create an empty recording.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            list: DisplayList::new(),
            depth: 0,
        }
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[PaintCommand] {
        self.list.commands()
    }

    /// Number of `save` calls not yet matched by a `restore`.
    #[must_use]
    pub const fn save_depth(&self) -> usize {
        self.depth
    }

    /// Finish recording.
    #[must_use]
    pub fn into_display_list(self) -> DisplayList {
        self.list
    }
}

impl PaintSurface for RecordingSurface {
    fn save(&mut self) {
        self.depth += 1;
        self.list.push(PaintCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.list.push(PaintCommand::Restore);
    }

    fn clip(&mut self, rect: Rect) {
        self.list.push(PaintCommand::Clip { rect });
    }

    fn clip_rounded_rect(&mut self, rect: &RoundedRect) {
        self.list.push(PaintCommand::ClipRoundedRect { rect: *rect });
    }

    fn clip_out_rounded_rect(&mut self, rect: &RoundedRect) {
        self.list.push(PaintCommand::ClipOutRoundedRect { rect: *rect });
    }

    fn clip_convex_polygon(&mut self, points: &[Point], antialias: bool) {
        self.list.push(PaintCommand::ClipConvexPolygon {
            points: points.to_vec(),
            antialias,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorValue) {
        self.list.push(PaintCommand::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: &RoundedRect, color: ColorValue) {
        self.list.push(PaintCommand::FillRoundedRect { rect: *rect, color });
    }

    fn fill_path(&mut self, path: &Path, rule: FillRule, color: ColorValue) {
        self.list.push(PaintCommand::FillPath {
            path: path.clone(),
            rule,
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, color: ColorValue) {
        self.list.push(PaintCommand::StrokePath {
            path: path.clone(),
            stroke: *stroke,
            color,
        });
    }

    fn begin_transparency_layer(&mut self, opacity: f32) {
        self.list.push(PaintCommand::BeginTransparencyLayer { opacity });
    }

    fn end_transparency_layer(&mut self) {
        self.list.push(PaintCommand::EndTransparencyLayer);
    }

    fn draw_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams) {
        self.list.push(PaintCommand::DrawShadow {
            shape: *shape,
            shadow: *shadow,
        });
    }

    fn draw_inner_shadow(&mut self, shape: &RoundedRect, shadow: &ShadowParams, excluded: BoxSideSet) {
        self.list.push(PaintCommand::DrawInnerShadow {
            shape: *shape,
            shadow: *shadow,
            excluded,
        });
    }
}
