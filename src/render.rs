//! tiny-skia rendering for curve frames

use crate::colors::{Rgb, lerp};
use crate::curve::CurvePoint;
use crate::engine::Frame;
use crate::error::RenderError;
use std::path::Path;
use tiny_skia::*;

const LINE_WIDTH: f32 = 1.5;

/// Maps curve space (`[-1, 1]` on both axes, y up) onto a pixel canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Fraction of the half-extent covered by the unit square
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    /// Pixel position of a curve point
    pub fn to_pixel(&self, point: CurvePoint) -> (f32, f32) {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        (
            half_w + point.x as f32 * half_w * self.scale,
            half_h - point.y as f32 * half_h * self.scale,
        )
    }
}

/// Render a frame as a connected line strip
///
/// Each segment takes the mean of its two vertex colors. Runs of segments with
/// the same color are stroked as a single path, so a uniformly colored frozen
/// trace costs one stroke.
pub fn render_frame(frame: &Frame, viewport: &Viewport, background: Rgb) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(viewport.width, viewport.height).ok_or(RenderError::EmptyCanvas {
        width: viewport.width,
        height: viewport.height,
    })?;
    pixmap.fill(to_skia(background));

    let stroke = Stroke {
        width: LINE_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let mut run: Option<(Rgb, PathBuilder)> = None;
    for ((from, from_color), (to, to_color)) in frame.segments() {
        let color = lerp(from_color, to_color, 0.5);
        let (x0, y0) = viewport.to_pixel(from);
        let (x1, y1) = viewport.to_pixel(to);

        if let Some((run_color, pb)) = run.as_mut() {
            if *run_color == color {
                pb.line_to(x1, y1);
                continue;
            }
        }

        if let Some((run_color, pb)) = run.take() {
            stroke_run(&mut pixmap, pb, run_color, &stroke);
        }
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        run = Some((color, pb));
    }
    if let Some((run_color, pb)) = run {
        stroke_run(&mut pixmap, pb, run_color, &stroke);
    }

    Ok(pixmap)
}

fn stroke_run(pixmap: &mut Pixmap, pb: PathBuilder, color: Rgb, stroke: &Stroke) {
    // Degenerate paths (all points equal) have no bounds and are skipped
    let Some(path) = pb.finish() else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(to_skia(color));
    paint.anti_alias = true;

    pixmap.stroke_path(&path, &paint, stroke, Transform::identity(), None);
}

/// Write a rendered pixmap as PNG, creating the parent directory if needed
pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    pixmap
        .save_png(path)
        .map_err(|e| RenderError::Encode(e.to_string()))
}

fn to_skia(color: Rgb) -> Color {
    let [r, g, b] = color.to_rgb8();
    Color::from_rgba8(r, g, b, 255)
}
