//! Integration tests for the tiny-skia raster surface and fontdue metrics.

use linebox_layout::geometry::{Point, Rect};
use linebox_layout::metrics::BoxMetricsProvider;
use linebox_layout::style::{BorderSide, BorderSides, BorderStyle, BoxStyle, ColorValue, CornerRadii};
use linebox_paint::painter::paint_border;
use linebox_paint::recording::RecordingSurface;
use linebox_paint::surface::{FillRule, Path, PaintSurface, RoundedRect};
use linebox_render::{FontdueMetrics, RasterSurface};

const RED: ColorValue = ColorValue::rgba(255, 0, 0, 255);

fn canvas() -> RasterSurface {
    RasterSurface::new(20, 20).unwrap()
}

// ---------------------------------------------------------------------------
// Fills and clips
// ---------------------------------------------------------------------------

#[test]
fn test_zero_sized_canvas_is_rejected() {
    assert!(RasterSurface::new(0, 10).is_err());
}

#[test]
fn test_canvas_starts_white() {
    let surface = canvas();
    assert_eq!(surface.pixel(0, 0), Some(ColorValue::WHITE));
    assert_eq!(surface.pixel(20, 0), None);
}

#[test]
fn test_fill_rect_covers_whole_pixels() {
    let mut surface = canvas();
    surface.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), RED);
    assert_eq!(surface.pixel(2, 2), Some(RED));
    assert_eq!(surface.pixel(5, 5), Some(RED));
    assert_eq!(surface.pixel(6, 6), Some(ColorValue::WHITE));
}

#[test]
fn test_clip_limits_fill_until_restore() {
    let mut surface = canvas();
    surface.save();
    surface.clip(Rect::new(0.0, 0.0, 5.0, 20.0));
    surface.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), RED);
    surface.restore();
    assert_eq!(surface.pixel(2, 10), Some(RED));
    assert_eq!(surface.pixel(10, 10), Some(ColorValue::WHITE));

    surface.fill_rect(Rect::new(10.0, 10.0, 2.0, 2.0), ColorValue::BLACK);
    assert_eq!(surface.pixel(10, 10), Some(ColorValue::BLACK));
}

#[test]
fn test_clip_out_leaves_hole() {
    let mut surface = canvas();
    surface.save();
    surface.clip_out_rounded_rect(&RoundedRect::from_rect(Rect::new(5.0, 5.0, 10.0, 10.0)));
    surface.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), RED);
    surface.restore();
    assert_eq!(surface.pixel(1, 1), Some(RED));
    assert_eq!(surface.pixel(10, 10), Some(ColorValue::WHITE));
}

#[test]
fn test_nested_clips_intersect() {
    let mut surface = canvas();
    surface.save();
    surface.clip(Rect::new(0.0, 0.0, 10.0, 20.0));
    surface.clip_convex_polygon(
        &[
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 10.0),
        ],
        false,
    );
    surface.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), RED);
    surface.restore();
    assert_eq!(surface.pixel(5, 5), Some(RED));
    assert_eq!(surface.pixel(15, 5), Some(ColorValue::WHITE));
    assert_eq!(surface.pixel(5, 15), Some(ColorValue::WHITE));
}

#[test]
fn test_even_odd_ring_keeps_center() {
    let mut surface = canvas();
    let mut path = Path::new();
    path.add_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
    path.add_rect(Rect::new(5.0, 5.0, 10.0, 10.0));
    surface.fill_path(&path, FillRule::EvenOdd, RED);
    assert_eq!(surface.pixel(2, 2), Some(RED));
    assert_eq!(surface.pixel(10, 10), Some(ColorValue::WHITE));
}

#[test]
fn test_transparency_layer_composites_with_opacity() {
    let mut surface = canvas();
    surface.begin_transparency_layer(0.5);
    surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ColorValue::BLACK);
    surface.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0), ColorValue::BLACK);
    surface.end_transparency_layer();

    // The overlap is no darker than the rest of the layer.
    let single = surface.pixel(2, 2).unwrap();
    let overlap = surface.pixel(7, 7).unwrap();
    assert_eq!(single, overlap);
    assert!((120..=135).contains(&single.r), "{single:?}");
}

// ---------------------------------------------------------------------------
// Painter output
// ---------------------------------------------------------------------------

#[test]
fn test_replayed_border_rasterizes() {
    let mut style = BoxStyle::default();
    style.border = BorderSides::uniform(BorderSide::new(3.0, BorderStyle::Solid, ColorValue::BLACK));
    let mut recording = RecordingSurface::new();
    paint_border(&mut recording, Rect::new(2.0, 2.0, 16.0, 16.0), &style, true, true);

    let mut surface = canvas();
    recording.into_display_list().replay(&mut surface);
    assert_eq!(surface.pixel(3, 10), Some(ColorValue::BLACK));
    assert_eq!(surface.pixel(10, 3), Some(ColorValue::BLACK));
    assert_eq!(surface.pixel(10, 10), Some(ColorValue::WHITE));
    assert_eq!(surface.pixel(0, 0), Some(ColorValue::WHITE));
}

#[test]
fn test_rounded_border_leaves_corner_unpainted() {
    let mut style = BoxStyle::default();
    style.border = BorderSides::uniform(BorderSide::new(4.0, BorderStyle::Solid, ColorValue::BLACK));
    style.border_radius = CornerRadii::uniform(8.0);
    let mut surface = canvas();
    paint_border(&mut surface, Rect::new(0.0, 0.0, 20.0, 20.0), &style, true, true);
    assert_eq!(surface.pixel(0, 0), Some(ColorValue::WHITE));
    assert_eq!(surface.pixel(10, 1), Some(ColorValue::BLACK));
}

#[test]
fn test_save_png_round_trips_size() {
    let mut surface = canvas();
    surface.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), RED);
    let path = std::env::temp_dir().join("linebox-render-save-test.png");
    surface.save_png(&path).unwrap();
    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (20, 20));
    assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Font metrics
// ---------------------------------------------------------------------------

#[test]
fn test_metrics_fall_back_without_font() {
    let metrics = FontdueMetrics::system_or_approximate();
    let font = metrics.font_metrics(&BoxStyle::default());
    assert!(font.ascent > 0.0);
    assert!(font.descent >= 0.0);
    assert!(metrics.line_height(&BoxStyle::default()) >= font.height());
}

#[test]
fn test_system_font_widths_scale_with_size() {
    // Skip on machines with no fonts installed.
    let Some(metrics) = FontdueMetrics::load_system_font() else {
        return;
    };
    let mut small = BoxStyle::default();
    small.font.size = 10.0;
    let mut large = BoxStyle::default();
    large.font.size = 20.0;
    let small_width = metrics.text_width("linebox", &small);
    let large_width = metrics.text_width("linebox", &large);
    assert!(small_width > 0.0);
    assert!(large_width > small_width * 1.5);
    assert_eq!(metrics.text_width("", &small), 0.0);
}

#[test]
fn test_invalid_font_data_is_an_error() {
    assert!(FontdueMetrics::from_bytes(vec![0, 1, 2, 3]).is_err());
}
