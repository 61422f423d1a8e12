//! Scale/pan/rotate state for the crop tool.
//!
//! A [`Transform`] is mutated only by explicit user actions (zoom buttons,
//! pan buttons, the rotate-90 button, reset) and is consumed by the
//! rasterizer to map a source image into a fixed-size output.

use serde::{Deserialize, Serialize};

/// Minimum zoom factor.
pub const SCALE_MIN: f32 = 0.1;
/// Maximum zoom factor.
pub const SCALE_MAX: f32 = 3.0;
/// Initial zoom, a deliberate zoom-out so large source images start fully
/// visible inside the target frame.
pub const DEFAULT_SCALE: f32 = 0.6;
/// Zoom button increment.
pub const ZOOM_STEP: f32 = 0.1;

/// Discrete rotation in 90° steps. There is no free-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Advances one +90° step (mod 360).
    pub fn rotated_cw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => 90.0,
            Rotation::Deg180 => 180.0,
            Rotation::Deg270 => 270.0,
        }
    }

    pub fn radians(self) -> f32 {
        self.degrees().to_radians()
    }
}

/// Scale/pan/rotation state mapping a source image into the crop frame.
///
/// Pan is expressed in post-scale (output) space: the same `translate_x`
/// offset moves the image the same number of output pixels at any zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Uniform zoom, clamped to `[SCALE_MIN, SCALE_MAX]`.
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation: Rotation,
}

impl Default for Transform {
    fn default() -> Self {
        Self::with_default_scale(DEFAULT_SCALE)
    }
}

impl Transform {
    /// Identity state around a tool-configurable initial zoom.
    pub fn with_default_scale(default_scale: f32) -> Self {
        Self {
            scale: default_scale.clamp(SCALE_MIN, SCALE_MAX),
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: Rotation::Deg0,
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - ZOOM_STEP);
    }

    /// Sets the zoom directly, clamped to the valid range.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
    }

    /// Pans by an offset in output pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Advances the rotation one +90° step.
    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.rotated_cw();
    }

    /// Restores `{scale: default_scale, translate: (0,0), rotation: 0}`.
    /// Idempotent.
    pub fn reset(&mut self, default_scale: f32) {
        *self = Self::with_default_scale(default_scale);
    }
}

/// Caller-supplied fixed output size for the crop tool.
///
/// The engine never hard-codes these; the named presets are the sizes the
/// product geometries use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropConfig {
    pub target_width: u32,
    pub target_height: u32,
}

impl CropConfig {
    /// Wide banner, 1200x600.
    pub const WIDE_BANNER: Self = Self::new(1200, 600);
    /// Square product, 600x600.
    pub const SQUARE: Self = Self::new(600, 600);
    /// Wide promo, 800x400.
    pub const WIDE_PROMO: Self = Self::new(800, 400);
    /// Landscape offer, 600x400.
    pub const LANDSCAPE: Self = Self::new(600, 400);

    pub const fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
        }
    }
}
