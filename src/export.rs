//! Deterministic PNG export.
//!
//! Both composition paths end here: a flattened scene or a crop-tool raster
//! is encoded once into an [`ExportedArtifact`] whose ownership passes
//! immediately to the caller. Identical scene/transform state produces
//! byte-identical output: no timestamps, no metadata, no randomness.

use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tracing::debug;

use crate::error::{CraftError, CraftResult};
use crate::fonts::FontCatalog;
use crate::render::RenderBackend;
use crate::scene::Scene;
use crate::transform::{CropConfig, Transform};

/// Export-quality supersampling factor applied to scene composition.
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// Options for a scene export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Supersampling factor; the output raster is `canvas * multiplier`.
    pub multiplier: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// A finished, encoded bitmap. The engine retains nothing after handing
/// one out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ExportedArtifact {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    /// Renders as a `data:image/png;base64,…` URI, the shape the download /
    /// upload / order collaborators consume.
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.png);
        format!("data:image/png;base64,{encoded}")
    }
}

/// Flattens a scene and encodes it as PNG at `options.multiplier`x.
pub fn export_scene<B: RenderBackend>(
    backend: &B,
    scene: &Scene,
    fonts: &FontCatalog,
    options: ExportOptions,
) -> CraftResult<ExportedArtifact> {
    let raster = backend.compose_scene(scene, fonts, options.multiplier)?;
    debug!(
        width = raster.width(),
        height = raster.height(),
        multiplier = options.multiplier,
        "exporting scene"
    );
    encode_png(raster)
}

/// Renders a source image through the crop transform and encodes the
/// fixed-size result as PNG.
pub fn export_crop<B: RenderBackend>(
    backend: &B,
    source: &RgbaImage,
    transform: &Transform,
    crop: &CropConfig,
) -> CraftResult<ExportedArtifact> {
    let raster = backend.apply_transform(source, transform, crop);
    debug!(
        width = raster.width(),
        height = raster.height(),
        "exporting crop"
    );
    encode_png(raster)
}

fn encode_png(raster: RgbaImage) -> CraftResult<ExportedArtifact> {
    let (width, height) = (raster.width(), raster.height());
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(raster.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| CraftError::export(format!("png encode failed: {e}")))?;
    Ok(ExportedArtifact { png, width, height })
}
