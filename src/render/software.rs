//! CPU rendering backend on `image::RgbaImage`.

use image::{imageops, Rgba, RgbaImage};
use tracing::warn;

use super::text::{composite_over, draw_line};
use super::RenderBackend;
use crate::error::{CraftError, CraftResult};
use crate::fonts::FontCatalog;
use crate::scene::Scene;
use crate::transform::{CropConfig, Rotation, Transform};

/// The default (and currently only) backend: deterministic software
/// compositing, bilinear sampling for the crop transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl RenderBackend for SoftwareBackend {
    fn compose_scene(
        &self,
        scene: &Scene,
        fonts: &FontCatalog,
        multiplier: u32,
    ) -> CraftResult<RgbaImage> {
        if multiplier == 0 {
            return Err(CraftError::export("multiplier must be >= 1"));
        }
        let canvas = scene.canvas();
        let (Some(out_w), Some(out_h)) = (
            canvas.width.checked_mul(multiplier),
            canvas.height.checked_mul(multiplier),
        ) else {
            return Err(CraftError::export(format!(
                "multiplier {multiplier} overflows the output dimensions"
            )));
        };
        let m = multiplier as f32;
        let mut out = RgbaImage::from_pixel(out_w, out_h, Rgba([255, 255, 255, 255]));

        if let Some(bg) = scene.background() {
            let scaled_w = ((bg.natural.width as f32 * bg.scale * m).round() as u32).max(1);
            let scaled_h = ((bg.natural.height as f32 * bg.scale * m).round() as u32).max(1);
            let resized =
                imageops::resize(&bg.image, scaled_w, scaled_h, imageops::FilterType::Triangle);
            composite_over(
                &mut out,
                &resized,
                (bg.left * m).round() as i64,
                (bg.top * m).round() as i64,
            );
        }

        let style = scene.style();
        for layer in scene.layers_in_order() {
            let Some(font) = fonts.resolve(&style.family) else {
                warn!(family = %style.family, layer = %layer.id, "font not in catalog, skipping layer");
                continue;
            };
            draw_line(
                &mut out,
                font,
                layer.display_content(),
                style.size * m,
                (layer.position.x * m, layer.position.y * m),
                scene.render_color(layer).as_array(),
            );
        }

        Ok(out)
    }

    fn apply_transform(
        &self,
        source: &RgbaImage,
        transform: &Transform,
        crop: &CropConfig,
    ) -> RgbaImage {
        let (tw, th) = (crop.target_width, crop.target_height);
        let mut out = RgbaImage::from_pixel(tw, th, Rgba([0, 0, 0, 0]));

        // Forward mapping: a source point u (relative to the image center)
        // lands at `center + R(scale * u + translate)`; pan is therefore in
        // post-scale output space. We walk it backwards per output pixel.
        let cx = tw as f32 / 2.0;
        let cy = th as f32 / 2.0;
        let half_w = source.width() as f32 / 2.0;
        let half_h = source.height() as f32 / 2.0;
        let scale = transform.scale;

        for (px, py, pixel) in out.enumerate_pixels_mut() {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let (rx, ry) = rotate_inverse(transform.rotation, dx, dy);
            let sx = (rx - transform.translate_x) / scale + half_w;
            let sy = (ry - transform.translate_y) / scale + half_h;
            *pixel = sample_bilinear(source, sx - 0.5, sy - 0.5);
        }

        out
    }
}

/// Applies the inverse of a discrete rotation to a centered vector.
fn rotate_inverse(rotation: Rotation, x: f32, y: f32) -> (f32, f32) {
    match rotation {
        Rotation::Deg0 => (x, y),
        Rotation::Deg90 => (y, -x),
        Rotation::Deg180 => (-x, -y),
        Rotation::Deg270 => (-y, x),
    }
}

/// Bilinear sample with transparent-outside semantics.
fn sample_bilinear(source: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let mut acc = [0.0f32; 4];
    for (ix, iy, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1.0, y0, fx * (1.0 - fy)),
        (x0, y0 + 1.0, (1.0 - fx) * fy),
        (x0 + 1.0, y0 + 1.0, fx * fy),
    ] {
        if weight == 0.0 {
            continue;
        }
        let p = texel(source, ix, iy);
        let a = p[3] as f32 / 255.0;
        // Premultiplied accumulation so transparent neighbors don't bleed color.
        acc[0] += p[0] as f32 * a * weight;
        acc[1] += p[1] as f32 * a * weight;
        acc[2] += p[2] as f32 * a * weight;
        acc[3] += p[3] as f32 * weight;
    }

    if acc[3] <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let alpha = acc[3] / 255.0;
    Rgba([
        (acc[0] / alpha).round().min(255.0) as u8,
        (acc[1] / alpha).round().min(255.0) as u8,
        (acc[2] / alpha).round().min(255.0) as u8,
        acc[3].round().min(255.0) as u8,
    ])
}

fn texel(source: &RgbaImage, x: f32, y: f32) -> [u8; 4] {
    if x < 0.0 || y < 0.0 || x >= source.width() as f32 || y >= source.height() as f32 {
        [0, 0, 0, 0]
    } else {
        source.get_pixel(x as u32, y as u32).0
    }
}
