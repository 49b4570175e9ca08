//! Text and display-list output for a laid-out line.

use std::fmt::Write;

use linebox_layout::inline_box::BoxSnapshot;
use linebox_layout::{BoxMetricsProvider, Point, Rect};
use linebox_paint::{DisplayList, PaintInfo, RecordingSurface, paint_line};

use crate::scene::Line;

/// Longest text preview shown per box.
const PREVIEW_CHARS: usize = 30;

impl Line {
    /// Indented dump of the line's bounds and every box's geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the line's root box is gone.
    pub fn layout_report(&self, metrics: &dyn BoxMetricsProvider) -> anyhow::Result<String> {
        let data = self.tree.root_line(self.root)?;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "line: top={:.1} bottom={:.1} with leading: top={:.1} bottom={:.1} next={:.1}",
            data.line_top(),
            data.line_bottom(),
            data.line_top_with_leading(),
            data.line_bottom_with_leading(),
            self.next_line_top
        );
        if let Some(snapshot) = self.tree.snapshot(self.root, metrics) {
            self.write_box(&mut out, &snapshot, 0);
        }
        Ok(out)
    }

    fn write_box(&self, out: &mut String, snapshot: &BoxSnapshot, depth: usize) {
        let indent = "  ".repeat(depth);
        let label = match self.tree.content().get(snapshot.content).and_then(|node| node.as_text()) {
            Some(text) => {
                let preview: String = text.chars().take(PREVIEW_CHARS).collect();
                let suffix = if text.chars().count() > PREVIEW_CHARS { "..." } else { "" };
                format!("text(\"{}{}\")", preview.replace('\n', "\\n"), suffix)
            }
            None => snapshot.kind.to_string(),
        };
        let frame = snapshot.frame;
        let _ = writeln!(
            out,
            "{indent}[{label}] x={:.1} y={:.1} w={:.1} h={:.1} baseline={:.1}",
            frame.x, frame.y, frame.width, frame.height, snapshot.baseline
        );
        if let (Some(left), Some(right)) = (snapshot.include_left_edge, snapshot.include_right_edge)
            && !(left && right)
        {
            let _ = writeln!(out, "{indent}  edges: left={left} right={right}");
        }
        if let Some(visual) = snapshot.visual_overflow {
            let _ = writeln!(
                out,
                "{indent}  visual overflow: x={:.1} y={:.1} w={:.1} h={:.1}",
                visual.x, visual.y, visual.width, visual.height
            );
        }
        for child in &snapshot.children {
            self.write_box(out, child, depth + 1);
        }
    }

    /// Paint the line's decorations inside `viewport` into a display list.
    ///
    /// # Errors
    ///
    /// Returns an error if the line's root box is gone.
    pub fn paint(&self, viewport: Rect, metrics: &dyn BoxMetricsProvider) -> anyhow::Result<DisplayList> {
        let data = self.tree.root_line(self.root)?;
        let (line_top, line_bottom) = (data.line_top(), data.line_bottom());
        let info = PaintInfo {
            rect: viewport,
            strict_mode: self.strict_mode,
        };
        let mut surface = RecordingSurface::new();
        paint_line(
            &mut surface,
            &self.tree,
            self.root,
            &info,
            Point::default(),
            line_top,
            line_bottom,
            metrics,
        )?;
        Ok(surface.into_display_list())
    }
}
