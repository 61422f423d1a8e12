//! Explicitly owned editing sessions.
//!
//! [`Editor`] owns one [`Scene`] for the text-composition path; a
//! [`CropSession`] owns one source image and [`Transform`] for the
//! crop/zoom/rotate path. Each owns its pixel buffers exclusively; there is
//! no shared or ambient canvas state. Teardown is a single explicit
//! [`Editor::dispose`], or `CropSession::confirm`, which exports and closes
//! the tool in one step.

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::{CraftError, CraftResult};
use crate::export::{export_crop, export_scene, ExportOptions, ExportedArtifact};
use crate::fonts::FontCatalog;
use crate::gateway::ImageFetcher;
use crate::geometry::{Position, SizePx};
use crate::hints::{CenterBandProvider, LayoutHintProvider};
use crate::loader::TemplateLoader;
use crate::render::RenderBackend;
use crate::scene::{LayerId, PlacedImage, Scene, StyleUpdate};
use crate::snapshot::TextSnapshot;
use crate::template::Template;
use crate::transform::{CropConfig, Transform, DEFAULT_SCALE};

/// Observable scene lifecycle state.
///
/// Mutation (text edits, drags, style changes) keeps the scene `Ready`;
/// export enters and leaves its transient phase within the synchronous
/// call, so `Ready` is also what callers observe between exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// No background loaded yet.
    Empty,
    /// A template load is in flight.
    Loading,
    /// A background is loaded and editable.
    Ready,
}

/// Token tying a load completion to the request that started it.
///
/// Tickets increase monotonically; a completion whose ticket is no longer
/// the latest is discarded, so a slow fetch can never clobber a newer
/// template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Construction-time editor configuration.
#[derive(Debug, Clone, Copy)]
pub struct EditorConfig {
    pub canvas: SizePx,
    /// When true, user text (content, positions, style) is snapshotted
    /// before a template swap and restored after a successful load. When
    /// false a swap resets to a single empty line.
    pub preserve_text_on_template_switch: bool,
}

impl EditorConfig {
    pub fn new(canvas: SizePx) -> Self {
        Self {
            canvas,
            preserve_text_on_template_switch: false,
        }
    }

    pub fn preserve_text(mut self, preserve: bool) -> Self {
        self.preserve_text_on_template_switch = preserve;
        self
    }
}

/// The text-composition editing session.
pub struct Editor {
    scene: Scene,
    state: SceneState,
    preserve_text: bool,
    hints: Box<dyn LayoutHintProvider>,
    latest_ticket: u64,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(config.canvas),
            state: SceneState::Empty,
            preserve_text: config.preserve_text_on_template_switch,
            hints: Box::new(CenterBandProvider),
            latest_ticket: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Swaps in a different layout hint provider (e.g. a real detector).
    pub fn set_hint_provider(&mut self, provider: Box<dyn LayoutHintProvider>) {
        self.hints = provider;
    }

    // ---- Template loading ----

    /// Marks the start of a template load and returns its ticket.
    ///
    /// Selecting another template before the first load completes simply
    /// issues a newer ticket; the older completion will be discarded.
    pub fn begin_template_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.state = SceneState::Loading;
        LoadTicket(self.latest_ticket)
    }

    /// Applies the outcome of a template load.
    ///
    /// Returns `Ok(true)` if the background was installed, `Ok(false)` if
    /// the completion was stale and discarded. On error the scene is left
    /// exactly as it was before the load began and the error propagates.
    pub fn finish_template_load(
        &mut self,
        ticket: LoadTicket,
        result: CraftResult<PlacedImage>,
    ) -> CraftResult<bool> {
        if ticket.0 != self.latest_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale template load"
            );
            return Ok(false);
        }

        match result {
            Ok(placed) => {
                let preserved = self
                    .preserve_text
                    .then(|| TextSnapshot::capture(&self.scene));
                self.scene.replace_background(placed);
                if let Some(snapshot) = preserved {
                    snapshot.restore_into(&mut self.scene);
                }
                self.state = SceneState::Ready;
                debug!(preserve_text = self.preserve_text, "template installed");
                Ok(true)
            }
            Err(err) => {
                // Roll back to whatever was true before the load started.
                self.state = if self.scene.background().is_some() {
                    SceneState::Ready
                } else {
                    SceneState::Empty
                };
                Err(err)
            }
        }
    }

    /// Loads a template synchronously through a loader: begin, fetch,
    /// finish.
    pub fn load_template<F: ImageFetcher>(
        &mut self,
        loader: &TemplateLoader<F>,
        template: &Template,
    ) -> CraftResult<()> {
        let ticket = self.begin_template_load();
        let result = loader.load(template, self.scene.canvas());
        self.finish_template_load(ticket, result).map(|_| ())
    }

    // ---- Text layer operations ----

    pub fn add_line(&mut self) -> LayerId {
        self.scene.add_line()
    }

    pub fn update_line(&mut self, id: LayerId, content: impl Into<String>) {
        self.scene.update_line(id, content);
    }

    pub fn remove_line(&mut self, id: LayerId) {
        self.scene.remove_line(id);
    }

    pub fn set_style(&mut self, update: StyleUpdate) {
        self.scene.set_style(update);
    }

    pub fn move_line(&mut self, id: LayerId, position: Position) {
        self.scene.move_line(id, position);
    }

    /// Repositions all lines according to the hint provider: the first line
    /// centered on the suggested anchor, subsequent lines stacked below.
    pub fn auto_layout(&mut self) {
        let Some(background) = self.scene.background() else {
            return;
        };
        let hint = self.hints.suggest(self.scene.canvas(), background);

        let targets: Vec<(LayerId, Position)> = self
            .scene
            .layers_in_order()
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let (width, _) = self.scene.estimate_extent(layer.display_content());
                (
                    layer.id,
                    Position::new(
                        hint.first_line.x - width / 2.0,
                        hint.first_line.y + i as f32 * hint.line_spacing,
                    ),
                )
            })
            .collect();
        for (id, position) in targets {
            self.scene.move_line(id, position);
        }
    }

    // ---- Export ----

    /// Flattens the scene into a PNG artifact.
    ///
    /// Synchronous and CPU-bound; large canvases or multipliers block the
    /// calling thread for the duration.
    pub fn export_scene<B: RenderBackend>(
        &self,
        backend: &B,
        fonts: &FontCatalog,
        options: ExportOptions,
    ) -> CraftResult<ExportedArtifact> {
        export_scene(backend, &self.scene, fonts, options)
    }

    /// Tears the session down, releasing its pixel buffers.
    ///
    /// Ownership is single: there is nothing to dispose twice.
    pub fn dispose(self) {
        debug!("editor disposed");
    }
}

/// The independent crop/zoom/rotate editing session.
///
/// Created with identity defaults when the tool opens, mutated by explicit
/// user actions, closed by [`reset`](Self::reset)-and-abandon or by
/// [`confirm`](Self::confirm) (export then closure).
#[derive(Debug)]
pub struct CropSession {
    source: RgbaImage,
    transform: Transform,
    crop: CropConfig,
    default_scale: f32,
}

impl CropSession {
    /// Opens the tool over an already-decoded source image.
    pub fn new(source: RgbaImage, crop: CropConfig) -> Self {
        Self::with_default_scale(source, crop, DEFAULT_SCALE)
    }

    /// Opens the tool with a configurable initial zoom.
    pub fn with_default_scale(source: RgbaImage, crop: CropConfig, default_scale: f32) -> Self {
        Self {
            source,
            transform: Transform::with_default_scale(default_scale),
            crop,
            default_scale,
        }
    }

    /// Opens the tool over encoded image bytes (an upload, or bytes fetched
    /// through the gateway).
    pub fn open(bytes: &[u8], crop: CropConfig) -> CraftResult<Self> {
        let source = image::load_from_memory(bytes)
            .map_err(|e| CraftError::load(format!("failed to decode source image: {e}")))?
            .to_rgba8();
        Ok(Self::new(source, crop))
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn crop(&self) -> CropConfig {
        self.crop
    }

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out();
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform.pan_by(dx, dy);
    }

    pub fn rotate_cw(&mut self) {
        self.transform.rotate_cw();
    }

    /// Restores the identity transform around the tool's default zoom.
    pub fn reset(&mut self) {
        self.transform.reset(self.default_scale);
    }

    /// Renders the current state at target size, for live preview.
    pub fn preview<B: RenderBackend>(&self, backend: &B) -> RgbaImage {
        backend.apply_transform(&self.source, &self.transform, &self.crop)
    }

    /// Exports the current state and closes the tool.
    pub fn confirm<B: RenderBackend>(self, backend: &B) -> CraftResult<ExportedArtifact> {
        export_crop(backend, &self.source, &self.transform, &self.crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryFetcher;
    use crate::render::SoftwareBackend;
    use crate::template::TemplateCategory;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    fn loader_with(url: &str, bytes: Vec<u8>) -> TemplateLoader<MemoryFetcher> {
        let mut fetcher = MemoryFetcher::new();
        fetcher.insert(url, bytes);
        TemplateLoader::new(fetcher)
    }

    fn template(url: &str) -> Template {
        Template::new("tpl-1", "Test", url, TemplateCategory::Jar)
    }

    #[test]
    fn load_moves_empty_to_ready() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        assert_eq!(editor.state(), SceneState::Empty);

        let loader = loader_with("https://a/bg.png", png_bytes(1200, 900, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        assert_eq!(editor.state(), SceneState::Ready);
        assert_eq!(editor.scene().background().unwrap().scale, 0.5);
        assert_eq!(editor.scene().layers().len(), 1);
    }

    #[test]
    fn failed_load_leaves_previous_scene_untouched() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = loader_with("https://a/bg.png", png_bytes(1200, 900, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        let id = editor.scene().layers()[0].id;
        editor.update_line(id, "survives");
        let before = editor.scene().clone();

        let err = editor
            .load_template(&loader, &template("https://a/other.png"))
            .unwrap_err();
        assert!(matches!(err, CraftError::Load(_)));
        assert_eq!(editor.scene(), &before);
        assert_eq!(editor.state(), SceneState::Ready);
    }

    #[test]
    fn failed_first_load_rolls_back_to_empty() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = TemplateLoader::new(MemoryFetcher::new());
        assert!(editor
            .load_template(&loader, &template("https://a/missing.png"))
            .is_err());
        assert_eq!(editor.state(), SceneState::Empty);
        assert!(editor.scene().background().is_none());
    }

    #[test]
    fn stale_load_completion_is_discarded() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = loader_with("https://a/new.png", png_bytes(300, 300, [9, 9, 9, 255]));

        // First selection starts, then the user picks another template.
        let stale = editor.begin_template_load();
        let fresh = editor.begin_template_load();
        let fresh_result = loader.load(&template("https://a/new.png"), editor.scene().canvas());
        assert!(editor.finish_template_load(fresh, fresh_result).unwrap());

        // The slow first fetch finally lands with different pixels.
        let stale_result = Ok(PlacedImage::fit(
            RgbaImage::from_pixel(50, 50, Rgba([200, 0, 0, 255])),
            editor.scene().canvas(),
        ));
        let applied = editor.finish_template_load(stale, stale_result).unwrap();
        assert!(!applied);
        assert_eq!(editor.scene().background().unwrap().natural, SizePx::new(300, 300));
    }

    #[test]
    fn template_switch_discards_text_by_default() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = loader_with("https://a/bg.png", png_bytes(600, 700, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        let id = editor.scene().layers()[0].id;
        editor.update_line(id, "gone after swap");
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        assert_eq!(editor.scene().layers().len(), 1);
        assert!(editor.scene().layers()[0].content.is_empty());
    }

    #[test]
    fn template_switch_can_preserve_text() {
        let mut editor = Editor::new(
            EditorConfig::new(SizePx::new(600, 700)).preserve_text(true),
        );
        let loader = loader_with("https://a/bg.png", png_bytes(600, 700, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        let id = editor.scene().layers()[0].id;
        editor.update_line(id, "kept across swap");
        editor.add_line();
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        assert_eq!(editor.scene().layers().len(), 2);
        assert_eq!(editor.scene().layers()[0].content, "kept across swap");
    }

    #[test]
    fn auto_layout_places_lines_in_band() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = loader_with("https://a/bg.png", png_bytes(1200, 900, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();
        editor.add_line();
        editor.auto_layout();

        let layers = editor.scene().layers_in_order();
        // Background band: top 125, height 450; first line 40% in.
        assert_eq!(layers[0].position.y, 305.0);
        assert_eq!(layers[1].position.y, 305.0 + crate::scene::LINE_SPACING);
        assert!(layers[0].position.x > 0.0 && layers[0].position.x < 600.0);
    }

    #[test]
    fn export_produces_supersampled_artifact() {
        let mut editor = Editor::new(EditorConfig::new(SizePx::new(600, 700)));
        let loader = loader_with("https://a/bg.png", png_bytes(600, 700, [7, 7, 7, 255]));
        editor.load_template(&loader, &template("https://a/bg.png")).unwrap();

        let artifact = editor
            .export_scene(&SoftwareBackend, &FontCatalog::new(), ExportOptions::default())
            .unwrap();
        assert_eq!((artifact.width(), artifact.height()), (1200, 1400));
        editor.dispose();
    }

    #[test]
    fn crop_session_lifecycle() {
        let bytes = png_bytes(800, 800, [120, 10, 10, 255]);
        let mut session = CropSession::open(&bytes, CropConfig::SQUARE).unwrap();
        assert_eq!(session.transform().scale, DEFAULT_SCALE);

        session.zoom_in();
        session.pan_by(12.0, -4.0);
        session.rotate_cw();
        session.reset();
        assert_eq!(session.transform(), &Transform::default());
        assert!(format!("{session:?}").starts_with("CropSession"));

        let artifact = session.confirm(&SoftwareBackend).unwrap();
        assert_eq!((artifact.width(), artifact.height()), (600, 600));
    }

    #[test]
    fn crop_session_rejects_undecodable_bytes() {
        let err = CropSession::open(&[1, 2, 3], CropConfig::SQUARE).unwrap_err();
        assert!(matches!(err, CraftError::Load(_)));
    }

    #[test]
    fn crop_preview_matches_target_size() {
        let session = CropSession::new(
            RgbaImage::from_pixel(333, 777, Rgba([1, 2, 3, 255])),
            CropConfig::LANDSCAPE,
        );
        let preview = session.preview(&SoftwareBackend);
        assert_eq!((preview.width(), preview.height()), (600, 400));
    }
}
