//! Font resolution for text layer rasterization.
//!
//! The engine never bundles font data. Callers register font bytes per
//! family name; the rasterizer resolves a layer's `font.family` through the
//! catalog and skips (with a warning) layers whose family is unknown, so a
//! missing font degrades the render instead of failing it.

use std::collections::HashMap;

use ab_glyph::FontArc;

use crate::error::{CraftError, CraftResult};

/// Registry mapping family names to loaded fonts.
#[derive(Clone, Default)]
pub struct FontCatalog {
    fonts: HashMap<String, FontArc>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a font from raw TTF/OTF bytes under `family`.
    pub fn register_bytes(&mut self, family: impl Into<String>, bytes: Vec<u8>) -> CraftResult<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| CraftError::load(format!("invalid font data: {e}")))?;
        self.fonts.insert(family.into(), font);
        Ok(())
    }

    /// Registers an already-loaded font under `family`.
    pub fn register(&mut self, family: impl Into<String>, font: FontArc) {
        self.fonts.insert(family.into(), font);
    }

    /// Looks up the font for a family name.
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.fonts.get(family)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Loads `family` from the system font database and registers it.
    ///
    /// Only available with the `system-fonts` feature.
    #[cfg(feature = "system-fonts")]
    pub fn register_system(&mut self, family: &str) -> CraftResult<()> {
        use font_kit::family_name::FamilyName;
        use font_kit::properties::Properties;
        use font_kit::source::SystemSource;

        let handle = SystemSource::new()
            .select_best_match(
                &[FamilyName::Title(family.to_string())],
                &Properties::new(),
            )
            .map_err(|e| CraftError::load(format!("system font '{family}' not found: {e}")))?;

        let font = handle
            .load()
            .map_err(|e| CraftError::load(format!("failed to load '{family}': {e}")))?;
        let bytes = font
            .copy_font_data()
            .ok_or_else(|| CraftError::load(format!("no font data for '{family}'")))?;

        self.register_bytes(family, bytes.to_vec())
    }
}

impl std::fmt::Debug for FontCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCatalog")
            .field("families", &self.fonts.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_resolves_nothing() {
        let catalog = FontCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.resolve("Inter").is_none());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut catalog = FontCatalog::new();
        let err = catalog.register_bytes("Broken", vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, CraftError::Load(_)));
        assert!(catalog.resolve("Broken").is_none());
    }
}
