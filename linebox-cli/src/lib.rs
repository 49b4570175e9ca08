//! Scene loading and reporting behind the `linebox` binary.
//!
//! A scene describes one block and the inline content of its first line.
//! [`Scene::build`] creates the boxes and runs the layout passes; the
//! resulting [`Line`] can be dumped as text or painted into a display list.

/// Layout dumps and painting of a built line.
pub mod report;
/// JSON scene files.
pub mod scene;

pub use scene::{Item, Line, Scene};
