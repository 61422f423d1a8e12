//! Rendering backends.
//!
//! One engine, parametrized by the [`RenderBackend`] capability: the
//! composition math (fit-to-bounds placement, layer order, the crop
//! transform) is fixed by the scene and transform types, while the backend
//! decides how pixels are produced. [`SoftwareBackend`] is the CPU
//! implementation; a GPU-backed implementation would slot in behind the
//! same trait.

pub mod software;
pub mod text;

pub use software::SoftwareBackend;

use image::RgbaImage;

use crate::error::CraftResult;
use crate::fonts::FontCatalog;
use crate::scene::Scene;
use crate::transform::{CropConfig, Transform};

/// Produces rasters from scenes and crop states.
pub trait RenderBackend {
    /// Flattens a scene (background + text layers in ascending order) into
    /// an RGBA raster at `multiplier`x supersampling.
    ///
    /// The output is exactly `(canvas.width * multiplier, canvas.height *
    /// multiplier)`. Layers whose font family is not in the catalog are
    /// skipped, not fatal.
    fn compose_scene(
        &self,
        scene: &Scene,
        fonts: &FontCatalog,
        multiplier: u32,
    ) -> CraftResult<RgbaImage>;

    /// Maps a source image through a transform into a raster of exactly
    /// `(crop.target_width, crop.target_height)`.
    ///
    /// Content outside the target frame is clipped; content not covering
    /// the frame leaves transparent pixels. Never pads or resizes the
    /// output.
    fn apply_transform(
        &self,
        source: &RgbaImage,
        transform: &Transform,
        crop: &CropConfig,
    ) -> RgbaImage;
}
