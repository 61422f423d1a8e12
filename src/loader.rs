//! Template background loading.
//!
//! Fetches image bytes through an [`ImageFetcher`] (the proxy gateway in
//! production), decodes them, and computes the fit-to-bounds placement for
//! a scene's canvas. The loader owns no scene state; a failed load returns
//! an error and whatever the caller had stays untouched.

use tracing::debug;

use crate::error::{CraftError, CraftResult};
use crate::gateway::ImageFetcher;
use crate::geometry::SizePx;
use crate::scene::PlacedImage;
use crate::template::Template;

/// Decodes image bytes and places the result inside `canvas` bounds.
pub fn decode_background(bytes: &[u8], canvas: SizePx) -> CraftResult<PlacedImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| CraftError::load(format!("failed to decode image: {e}")))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(CraftError::load("decoded image has zero dimensions"));
    }
    Ok(PlacedImage::fit(image, canvas))
}

/// Fetch-and-decode pipeline for template backgrounds.
pub struct TemplateLoader<F: ImageFetcher> {
    fetcher: F,
}

impl<F: ImageFetcher> TemplateLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Loads a template's background: fetch through the gateway, decode,
    /// fit to the canvas. The image is always fetched via the fetcher's
    /// indirection, never from the asset's origin directly.
    pub fn load(&self, template: &Template, canvas: SizePx) -> CraftResult<PlacedImage> {
        debug!(template = %template.id, url = %template.image_url, "loading template background");
        let bytes = self.fetcher.fetch(&template.image_url)?;
        let placed = decode_background(&bytes, canvas)?;
        debug!(
            natural_w = placed.natural.width,
            natural_h = placed.natural.height,
            scale = placed.scale,
            "template background placed"
        );
        Ok(placed)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
