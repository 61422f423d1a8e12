//! labelcraft-renderer: product image composition engine
//!
//! This crate turns a fixed base image (a product template or an arbitrary
//! upload) into a final PNG artifact, either by overlaying movable, styled
//! text layers on it or by cropping/zooming/rotating it into a fixed output
//! resolution. Catalog management, persistence and checkout are external
//! collaborators; they hand templates in and take artifacts out.
//!
//! # Text composition
//!
//! ```
//! use image::RgbaImage;
//! use labelcraft_renderer::{
//!     Editor, EditorConfig, ExportOptions, FontCatalog, PlacedImage, SizePx, SoftwareBackend,
//! };
//!
//! let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
//!
//! // Install a background (in production this arrives through the
//! // TemplateLoader + proxy gateway) and edit the default line.
//! let ticket = editor.begin_template_load();
//! let background = PlacedImage::fit(
//!     RgbaImage::from_pixel(1200, 900, image::Rgba([230, 210, 180, 255])),
//!     editor.scene().canvas(),
//! );
//! editor.finish_template_load(ticket, Ok(background)).unwrap();
//! let line = editor.scene().layers()[0].id;
//! editor.update_line(line, "Amber Glow");
//!
//! // Flatten at 2x supersampling.
//! let artifact = editor
//!     .export_scene(&SoftwareBackend, &FontCatalog::new(), ExportOptions::default())
//!     .unwrap();
//! assert_eq!((artifact.width(), artifact.height()), (1200, 1400));
//! ```
//!
//! # Crop tool
//!
//! ```
//! use image::RgbaImage;
//! use labelcraft_renderer::{CropConfig, CropSession, SoftwareBackend};
//!
//! let source = RgbaImage::from_pixel(800, 800, image::Rgba([90, 40, 20, 255]));
//! let mut session = CropSession::new(source, CropConfig::SQUARE);
//! session.zoom_in();
//! session.pan_by(24.0, 0.0);
//! session.rotate_cw();
//!
//! let artifact = session.confirm(&SoftwareBackend).unwrap();
//! assert_eq!((artifact.width(), artifact.height()), (600, 600));
//! let uri = artifact.to_data_uri();
//! assert!(uri.starts_with("data:image/png;base64,"));
//! ```
//!
//! # Gateway
//!
//! Externally hosted images must be fetched through the same-origin relay
//! (`GET /image-proxy?url=…`) so exported pixels stay readable in the
//! hosting frontend. Enable the `gateway` feature for the HTTP-backed
//! `ProxyGateway`; any [`ImageFetcher`] implementation works for tests
//! and offline pipelines.

mod editor;
mod error;
mod export;
mod fonts;
mod gateway;
mod geometry;
mod hints;
mod loader;
mod render;
mod scene;
mod snapshot;
mod template;
mod transform;

pub use editor::{CropSession, Editor, EditorConfig, LoadTicket, SceneState};
pub use error::{CraftError, CraftResult};
pub use export::{
    export_crop, export_scene, ExportOptions, ExportedArtifact, DEFAULT_MULTIPLIER,
};
pub use fonts::FontCatalog;
#[cfg(feature = "gateway")]
pub use gateway::ProxyGateway;
pub use gateway::{ImageFetcher, MemoryFetcher};
pub use geometry::{clamp_position, fit_to_bounds, Placement, Position, RectPx, SizePx};
pub use hints::{CenterBandProvider, LayoutHint, LayoutHintProvider};
pub use loader::{decode_background, TemplateLoader};
pub use render::text::measure_line;
pub use render::{RenderBackend, SoftwareBackend};
pub use scene::{
    Color, LayerId, PlacedImage, Scene, StyleUpdate, TextLayer, TextStyle, BASE_OFFSET,
    LINE_SPACING, PLACEHOLDER_TEXT,
};
pub use snapshot::{LineSnapshot, SceneSnapshot, TextSnapshot};
pub use template::{Template, TemplateCategory};
pub use transform::{
    CropConfig, Rotation, Transform, DEFAULT_SCALE, SCALE_MAX, SCALE_MIN, ZOOM_STEP,
};
