//! JSON scene files: one block containing one line of inline content.
//!
//! ```json
//! {
//!   "width": 400,
//!   "block": { "font": { "size": 16 } },
//!   "items": [
//!     { "type": "text", "text": "Hello " },
//!     { "type": "inline", "style": { "background_color": { "r": 255, "g": 0, "b": 0, "a": 255 } },
//!       "children": [{ "type": "text", "text": "world" }] }
//!   ]
//! }
//! ```
//!
//! Styles are [`BoxStyle`] values; omitted fields take their defaults.

use std::path::Path;

use anyhow::Context;
use linebox_layout::{
    AtomicContent, BoxId, BoxMetricsProvider, ContentId, ContentTree, InlineTree, LayoutConfig, LineParams,
    layout_line, style::BoxStyle,
};
use serde::Deserialize;

const DEFAULT_WIDTH: f32 = 800.0;

const fn default_width() -> f32 {
    DEFAULT_WIDTH
}

/// A block and the items on its single line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    /// Width of the containing block.
    #[serde(default = "default_width")]
    pub width: f32,
    /// Style of the containing block (the root box).
    #[serde(default)]
    pub block: BoxStyle,
    /// `::first-line` style of the block, if any.
    #[serde(default)]
    pub first_line: Option<BoxStyle>,
    /// Strict or quirks mode, and the line's baseline.
    #[serde(default)]
    pub config: LayoutConfig,
    /// Left edge of the line inside the block.
    #[serde(default)]
    pub logical_left: f32,
    /// Line content in logical order.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One piece of inline content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// A text run, measured with the metrics provider unless `width` is set.
    Text {
        /// The characters of the run.
        text: String,
        /// Fixed advance, overriding measurement.
        #[serde(default)]
        width: Option<f32>,
        /// Style of the text node.
        #[serde(default)]
        style: BoxStyle,
    },
    /// A replaced element or inline-block.
    Atomic {
        /// Size, baseline and overflow of the content.
        #[serde(default)]
        content: AtomicContent,
        /// Style of the atomic box.
        #[serde(default)]
        style: BoxStyle,
        /// Painted by its own layer rather than by the line.
        #[serde(default)]
        self_painting: bool,
    },
    /// An inline element with nested items.
    Inline {
        /// Style of the element.
        #[serde(default)]
        style: BoxStyle,
        /// Children in logical order.
        #[serde(default)]
        children: Vec<Self>,
    },
    /// A forced line break.
    Break {
        /// Style of the break.
        #[serde(default)]
        style: BoxStyle,
    },
}

impl Scene {
    /// Read and parse a scene file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid scene.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid scene {}", path.display()))
    }

    /// Parse a scene from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a scene.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the line's boxes and run every layout pass over them.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be attached to the line.
    pub fn build(&self, metrics: &dyn BoxMetricsProvider) -> anyhow::Result<Line> {
        let mut content = ContentTree::new(self.block.clone(), self.width);
        if let Some(block) = content.get_mut(ContentId::BLOCK) {
            block.first_line_style.clone_from(&self.first_line);
        }
        let mut tree = InlineTree::new(content);
        let root = tree.create_root_box()?;
        tree.set_first_line(root, true)?;

        for item in &self.items {
            add_item(&mut tree, root, ContentId::BLOCK, item, metrics)?;
        }

        let params = LineParams {
            logical_left: self.logical_left,
            config: self.config,
            ..LineParams::default()
        };
        let next_line_top = layout_line(&mut tree, root, &params, metrics)?;
        Ok(Line {
            tree,
            root,
            next_line_top,
            strict_mode: self.config.strict_mode,
        })
    }
}

/// A laid-out line.
#[derive(Debug)]
pub struct Line {
    /// The box tree holding the line.
    pub tree: InlineTree,
    /// The line's root box.
    pub root: BoxId,
    /// Block offset where a following line would start.
    pub next_line_top: f32,
    /// Laid out in no-quirks mode; painting uses the same mode.
    pub strict_mode: bool,
}

fn add_item(
    tree: &mut InlineTree,
    parent: BoxId,
    parent_content: ContentId,
    item: &Item,
    metrics: &dyn BoxMetricsProvider,
) -> anyhow::Result<()> {
    match item {
        Item::Text { text, width, style } => {
            let content = tree.content_mut().add_text(parent_content, text, style.clone())?;
            let id = tree.create_text_box(content, 0, text.len())?;
            let width = width.unwrap_or_else(|| metrics.text_width(text, style));
            tree.set_logical_width(id, width)?;
            tree.add_to_line(parent, id, metrics)?;
        }
        Item::Atomic {
            content,
            style,
            self_painting,
        } => {
            let node = tree
                .content_mut()
                .add_atomic(parent_content, content.clone(), style.clone())?;
            if let Some(node) = tree.content_mut().get_mut(node) {
                node.self_painting_layer = *self_painting;
            }
            let id = tree.create_atomic_box(node)?;
            tree.add_to_line(parent, id, metrics)?;
        }
        Item::Inline { style, children } => {
            let content = tree.content_mut().add_inline(parent_content, style.clone())?;
            let flow = tree.create_flow_box(content)?;
            tree.add_to_line(parent, flow, metrics)?;
            for child in children {
                add_item(tree, flow, content, child, metrics)?;
            }
        }
        Item::Break { style } => {
            let content = tree.content_mut().add_line_break(parent_content, style.clone())?;
            let id = tree.create_text_box(content, 0, 0)?;
            tree.add_to_line(parent, id, metrics)?;
        }
    }
    Ok(())
}
