//! Coordinate-space primitives shared by the scene, the crop tool and the
//! rasterizer.
//!
//! Everything here is pure math on plain values: fit-to-bounds placement of
//! an arbitrary image inside fixed canvas bounds, and the clamp that keeps a
//! dragged layer's bounding box inside the canvas. Both are free functions so
//! they can be tested without touching pixels or pointer events.

use serde::{Deserialize, Serialize};

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// A rectangle defined in pixel coordinates.
///
/// Used for layer bounding boxes and for the visible region of a cropped
/// source image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectPx {
    /// X offset from the left edge.
    pub x: f32,
    /// Y offset from the top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectPx {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A 2D position in canvas coordinates.
///
/// For text layers this is the top-left corner of the layer's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Result of fitting an image of some natural size inside canvas bounds:
/// a uniform scale plus the centered top-left offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Uniform scale, `min(W/w, H/h)`.
    pub scale: f32,
    /// Left offset of the scaled image, `(W - w*scale) / 2`.
    pub left: f32,
    /// Top offset of the scaled image, `(H - h*scale) / 2`.
    pub top: f32,
}

impl Placement {
    /// The on-canvas size of the placed image.
    pub fn scaled_size(&self, natural: SizePx) -> (f32, f32) {
        (
            natural.width as f32 * self.scale,
            natural.height as f32 * self.scale,
        )
    }
}

/// Scales and centers an image of arbitrary natural size inside fixed canvas
/// bounds, preserving aspect ratio.
///
/// `scale = min(W/w, H/h)`; the scaled image is centered on both axes. A
/// smaller-than-canvas image is scaled *up* to fit; this matches how the
/// background of a scene is always placed.
pub fn fit_to_bounds(natural: SizePx, bounds: SizePx) -> Placement {
    let scale = (bounds.width as f32 / natural.width as f32)
        .min(bounds.height as f32 / natural.height as f32);
    let left = (bounds.width as f32 - natural.width as f32 * scale) / 2.0;
    let top = (bounds.height as f32 - natural.height as f32 * scale) / 2.0;
    Placement { scale, left, top }
}

/// Clamps a desired top-left position so a box of size `extent` stays fully
/// inside `[0, W] x [0, H]`.
///
/// Clamp-at-edge policy: an out-of-range drag lands the box flush against
/// the nearest edge rather than being ignored. A box larger than the canvas
/// is pinned to the origin on the overflowing axis.
pub fn clamp_position(desired: Position, extent: (f32, f32), canvas: SizePx) -> Position {
    let max_x = (canvas.width as f32 - extent.0).max(0.0);
    let max_y = (canvas.height as f32 - extent.1).max(0.0);
    Position {
        x: desired.x.clamp(0.0, max_x),
        y: desired.y.clamp(0.0, max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 220.0);
    }

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::new(100, 100).is_square());
        assert!(!SizePx::new(100, 200).is_square());
    }

    #[test]
    fn fit_wide_image_into_tall_canvas() {
        // 1200x900 into 600x700: scale 0.5, scaled 600x450, centered vertically.
        let placement = fit_to_bounds(SizePx::new(1200, 900), SizePx::new(600, 700));
        assert_eq!(placement.scale, 0.5);
        assert_eq!(placement.left, 0.0);
        assert_eq!(placement.top, 125.0);
        assert_eq!(placement.scaled_size(SizePx::new(1200, 900)), (600.0, 450.0));
    }

    #[test]
    fn fit_small_image_scales_up() {
        let placement = fit_to_bounds(SizePx::new(100, 100), SizePx::new(600, 400));
        assert_eq!(placement.scale, 4.0);
        assert_eq!(placement.left, 100.0);
        assert_eq!(placement.top, 0.0);
    }

    #[test]
    fn fit_exact_canvas_is_identity() {
        let placement = fit_to_bounds(SizePx::new(600, 400), SizePx::new(600, 400));
        assert_eq!(placement.scale, 1.0);
        assert_eq!(placement.left, 0.0);
        assert_eq!(placement.top, 0.0);
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let canvas = SizePx::new(600, 400);
        let clamped = clamp_position(Position::new(590.0, -20.0), (100.0, 30.0), canvas);
        assert_eq!(clamped, Position::new(500.0, 0.0));
    }

    #[test]
    fn clamp_in_range_is_identity() {
        let canvas = SizePx::new(600, 400);
        let pos = Position::new(120.0, 80.0);
        assert_eq!(clamp_position(pos, (100.0, 30.0), canvas), pos);
    }

    #[test]
    fn clamp_oversized_box_pins_to_origin() {
        let canvas = SizePx::new(600, 400);
        let clamped = clamp_position(Position::new(50.0, 50.0), (800.0, 500.0), canvas);
        assert_eq!(clamped, Position::new(0.0, 0.0));
    }
}
