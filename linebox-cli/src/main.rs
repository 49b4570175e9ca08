//! Linebox CLI
//!
//! Lays out a single line of inline boxes from a JSON scene file.
//!
//! - `linebox layout scene.json`            # Print box geometry
//! - `linebox paint scene.json --png a.png` # Print display list, save PNG

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use linebox_cli::Scene;
use linebox_common::warning::clear_warnings;
use linebox_layout::{ApproximateMetrics, BoxMetricsProvider, Rect};
use linebox_render::{FontdueMetrics, RasterSurface};
use owo_colors::OwoColorize;

/// Linebox - inline line layout and box-model painting
#[derive(Parser, Debug)]
#[command(name = "linebox")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the laid-out boxes of a line
    linebox layout demos/line.json

    # Same, as JSON
    linebox layout --json demos/line.json

    # Print the display list and render it
    linebox paint demos/line.json --png line.png --width 400 --height 60

    # Deterministic metrics (16px: 13 ascent, 3 descent)
    linebox --approximate layout demos/line.json
"#)]
struct Cli {
    /// Use fixed approximate font metrics instead of a system font
    #[arg(long, global = true)]
    approximate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out the scene and print every box with its geometry
    Layout {
        /// Scene file
        #[arg(value_name = "SCENE")]
        scene: PathBuf,

        /// Print the box tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Lay out and paint the scene, printing the display list as JSON
    Paint {
        /// Scene file
        #[arg(value_name = "SCENE")]
        scene: PathBuf,

        /// Also rasterize the display list and save it (PNG format)
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Canvas width (default: 800)
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height (default: 100)
        #[arg(long, default_value = "100")]
        height: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    clear_warnings();

    let metrics: Box<dyn BoxMetricsProvider> = if cli.approximate {
        Box::new(ApproximateMetrics)
    } else {
        FontdueMetrics::system_or_approximate()
    };

    match cli.command {
        Command::Layout { scene, json } => print_layout(&scene, json, &*metrics),
        Command::Paint {
            scene,
            png,
            width,
            height,
        } => paint(&scene, png.as_deref(), width, height, &*metrics),
    }
}

/// Print the laid-out box tree
fn print_layout(path: &Path, json: bool, metrics: &dyn BoxMetricsProvider) -> anyhow::Result<()> {
    let line = Scene::load(path)?.build(metrics)?;

    if json {
        let snapshot = line
            .tree
            .snapshot(line.root, metrics)
            .ok_or_else(|| anyhow::anyhow!("line has no root box"))?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", format!("=== Line ({}) ===", path.display()).bold());
    print!("{}", line.layout_report(metrics)?);
    Ok(())
}

/// Paint the line, print the display list and optionally save a PNG
fn paint(
    path: &Path,
    png: Option<&Path>,
    width: u32,
    height: u32,
    metrics: &dyn BoxMetricsProvider,
) -> anyhow::Result<()> {
    let line = Scene::load(path)?.build(metrics)?;

    #[allow(clippy::cast_precision_loss)]
    let viewport = Rect::new(0.0, 0.0, width as f32, height as f32);
    let display_list = line.paint(viewport, metrics)?;
    println!("{}", serde_json::to_string_pretty(&display_list)?);

    if let Some(output_path) = png {
        let mut surface = RasterSurface::new(width, height)?;
        display_list.replay(&mut surface);
        surface.save_png(output_path)?;
        eprintln!("{} {}", "Saved to:".green(), output_path.display());
    }
    Ok(())
}
