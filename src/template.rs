//! Template references supplied by the external catalog.
//!
//! A [`Template`] is an immutable pointer to a background asset. The engine
//! only reads `image_url`, `name` and `category`; listing, searching and
//! persisting templates belong to the surrounding application.

use serde::{Deserialize, Serialize};

use crate::transform::CropConfig;

/// Product geometry a template is designed for.
///
/// A closed set rather than a free-form string: each variant carries the
/// crop preset used when a source photo is mapped onto that product shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    /// Wrap-around label, wide banner geometry.
    Cylindrical,
    /// Tapered body, wide promo geometry.
    Tapered,
    /// Pillar body, landscape geometry.
    Pillar,
    /// Jar lid/front, square geometry.
    Jar,
}

impl TemplateCategory {
    /// The fixed crop output size for this product geometry.
    pub fn crop_preset(&self) -> CropConfig {
        match self {
            TemplateCategory::Cylindrical => CropConfig::WIDE_BANNER,
            TemplateCategory::Tapered => CropConfig::WIDE_PROMO,
            TemplateCategory::Pillar => CropConfig::LANDSCAPE,
            TemplateCategory::Jar => CropConfig::SQUARE,
        }
    }

    pub fn all() -> &'static [TemplateCategory] {
        &[
            TemplateCategory::Cylindrical,
            TemplateCategory::Tapered,
            TemplateCategory::Pillar,
            TemplateCategory::Jar,
        ]
    }
}

/// An immutable reference to a background asset.
///
/// Matches the catalog collaborator's JSON shape:
///
/// ```json
/// { "id": "tpl-1", "name": "Amber glow", "imageUrl": "https://…", "category": "jar" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub category: TemplateCategory,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: image_url.into(),
            category,
        }
    }
}
