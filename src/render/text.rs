//! Glyph layout and rasterization for text layers.
//!
//! Single-line layout with kerning, rasterized straight into the target
//! image as coverage-weighted alpha blending. Deterministic: no hinting
//! state, no caches, same glyphs in produce the same pixels out.

use ab_glyph::{point, Font, FontArc, Glyph, ScaleFont};
use image::{Rgba, RgbaImage};

/// Lays out one line at the given pixel size, returning positioned glyphs
/// relative to an origin at the line's left edge on the baseline.
fn layout_line(font: &FontArc, text: &str, size: f32) -> (Vec<Glyph>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut last = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(size, point(cursor_x, 0.0)));
        cursor_x += scaled.h_advance(id);
        last = Some(id);
    }

    (glyphs, cursor_x)
}

/// Measures a line's bounding box: `(advance width, line height)`.
pub fn measure_line(font: &FontArc, text: &str, size: f32) -> (f32, f32) {
    let scaled = font.as_scaled(size);
    let (_, width) = layout_line(font, text, size);
    (width, scaled.height())
}

/// Draws one line of text onto `target`.
///
/// `origin` is the top-left corner of the line's bounding box in target
/// coordinates; the baseline sits `ascent` below it. Glyphs are clipped at
/// the target bounds.
pub fn draw_line(
    target: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    size: f32,
    origin: (f32, f32),
    color: [u8; 4],
) {
    let scaled = font.as_scaled(size);
    let baseline_y = origin.1 + scaled.ascent();
    let (glyphs, _) = layout_line(font, text, size);

    let (w, h) = (target.width() as i32, target.height() as i32);
    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue; // whitespace and glyphless codepoints
        };
        let bounds = outlined.px_bounds();
        let gx = (origin.0 + bounds.min.x).round() as i32;
        let gy = (baseline_y + bounds.min.y).round() as i32;

        outlined.draw(|px, py, coverage| {
            let x = gx + px as i32;
            let y = gy + py as i32;
            if x < 0 || y < 0 || x >= w || y >= h {
                return;
            }
            let alpha = (color[3] as f32 * coverage).round().min(255.0) as u8;
            if alpha == 0 {
                return;
            }
            blend_pixel(
                target.get_pixel_mut(x as u32, y as u32),
                [color[0], color[1], color[2], alpha],
            );
        });
    }
}

/// Source-over blend of one RGBA pixel onto another.
fn blend_pixel(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        dst.0 = src;
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.0 = [0, 0, 0, 0];
        return;
    }
    for i in 0..3 {
        let s = src[i] as f32 * sa;
        let d = dst.0[i] as f32 * da * (1.0 - sa);
        dst.0[i] = ((s + d) / out_a).round().min(255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().min(255.0) as u8;
}

/// Composites `over` onto `base` at `(x, y)` with source-over blending,
/// clipping at the base image bounds.
pub fn composite_over(base: &mut RgbaImage, over: &RgbaImage, x: i64, y: i64) {
    for (ox, oy, pixel) in over.enumerate_pixels() {
        let bx = x + ox as i64;
        let by = y + oy as i64;
        if bx < 0 || by < 0 || bx >= base.width() as i64 || by >= base.height() as i64 {
            continue;
        }
        if pixel.0[3] == 0 {
            continue;
        }
        blend_pixel(base.get_pixel_mut(bx as u32, by as u32), pixel.0);
    }
}
