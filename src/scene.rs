//! The scene model: one placed background plus an ordered list of editable
//! text layers, bound to fixed canvas dimensions.
//!
//! All text layer manager operations live here as methods on [`Scene`].
//! They are synchronous, last-write-wins, and defensive: operating on an
//! unknown layer id is a no-op because the hosting UI can deliver callbacks
//! for layers that were just removed.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{CraftError, CraftResult};
use crate::geometry::{clamp_position, fit_to_bounds, Position, RectPx, SizePx};

/// Vertical offset of the first text line.
pub const BASE_OFFSET: f32 = 80.0;
/// Fixed spacing between successive default line positions.
pub const LINE_SPACING: f32 = 48.0;
/// Shown in place of empty content so an untouched line stays visible.
pub const PLACEHOLDER_TEXT: &str = "Your text here";

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(17, 24, 39);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Muted gray used for lines with no content yet.
    pub const PLACEHOLDER: Self = Self::rgb(156, 163, 175);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> CraftResult<Self> {
        let hex = s.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(CraftError::load(format!("invalid hex color '{s}'")));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| CraftError::load(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?)),
            8 => Ok(Self::rgba(
                parse(0..2)?,
                parse(2..4)?,
                parse(4..6)?,
                parse(6..8)?,
            )),
            _ => Err(CraftError::load(format!("invalid hex color '{s}'"))),
        }
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Text styling shared by every line in a scene.
///
/// A single style for all lines is deliberate: the product offers one
/// typeface/size/color per design, not per-layer styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            size: 32.0,
            color: Color::BLACK,
        }
    }
}

/// A partial style change; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct StyleUpdate {
    pub family: Option<String>,
    pub size: Option<f32>,
    pub color: Option<Color>,
}

/// Identifier for a text layer, unique within one scene.
///
/// Ids are never reused; callers index layers by id, not position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// One editable, positionable line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub id: LayerId,
    pub content: String,
    /// Top-left corner of the layer's bounding box, in canvas coordinates.
    pub position: Position,
    /// Stacking order. Gaps are allowed after removals; never renumbered.
    pub order: u32,
}

impl TextLayer {
    /// The text actually drawn: the content, or the placeholder when empty.
    pub fn display_content(&self) -> &str {
        if self.content.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            &self.content
        }
    }
}

/// The background image after fit-to-bounds placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// Decoded pixels at natural size.
    pub image: RgbaImage,
    pub natural: SizePx,
    /// Uniform scale that fits the image inside the canvas.
    pub scale: f32,
    pub left: f32,
    pub top: f32,
}

impl PlacedImage {
    /// Places a decoded image inside canvas bounds: scaled to fit preserving
    /// aspect ratio, centered on both axes.
    pub fn fit(image: RgbaImage, canvas: SizePx) -> Self {
        let natural = SizePx::new(image.width(), image.height());
        let placement = fit_to_bounds(natural, canvas);
        Self {
            image,
            natural,
            scale: placement.scale,
            left: placement.left,
            top: placement.top,
        }
    }
}

/// The in-memory composition: background + ordered text layers on a fixed
/// canvas.
///
/// Invariant: while a background is loaded, `layers` holds at least one
/// line (the UI always offers something editable).
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    canvas: SizePx,
    background: Option<PlacedImage>,
    layers: Vec<TextLayer>,
    style: TextStyle,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene bound to fixed canvas dimensions.
    pub fn new(canvas: SizePx) -> Self {
        Self {
            canvas,
            background: None,
            layers: Vec::new(),
            style: TextStyle::default(),
            next_id: 0,
        }
    }

    pub fn canvas(&self) -> SizePx {
        self.canvas
    }

    pub fn background(&self) -> Option<&PlacedImage> {
        self.background.as_ref()
    }

    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Installs a new background, discarding all prior text layers and
    /// resetting to a single default line.
    ///
    /// Callers that want to preserve user text across a template swap must
    /// snapshot/restore it explicitly (see [`crate::snapshot::TextSnapshot`]);
    /// the scene itself never does this implicitly.
    pub fn replace_background(&mut self, background: PlacedImage) {
        self.background = Some(background);
        self.layers.clear();
        self.add_line();
    }

    /// Appends a new empty line below the previous default position and
    /// returns its id.
    ///
    /// The line starts horizontally centered; its vertical offset is
    /// `BASE_OFFSET + index * LINE_SPACING`.
    pub fn add_line(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let index = self.layers.len();
        let order = index as u32;
        let extent = self.estimate_extent(PLACEHOLDER_TEXT);
        let position = Position::new(
            (self.canvas.width as f32 - extent.0) / 2.0,
            BASE_OFFSET + index as f32 * LINE_SPACING,
        );

        self.layers.push(TextLayer {
            id,
            content: String::new(),
            position,
            order,
        });
        id
    }

    /// Replaces a line's content. Unknown id is a no-op.
    pub fn update_line(&mut self, id: LayerId, content: impl Into<String>) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.content = content.into();
        }
    }

    /// Removes a line by id. Never reduces the layer count below 1; unknown
    /// id is a no-op. Surviving layers keep their `order` values (gaps are
    /// fine, callers index by id).
    pub fn remove_line(&mut self, id: LayerId) {
        if self.layers.len() <= 1 {
            return;
        }
        self.layers.retain(|l| l.id != id);
    }

    /// Applies a style change to all lines uniformly (the style is
    /// scene-global, so this is a broadcast by construction).
    pub fn set_style(&mut self, update: StyleUpdate) {
        if let Some(family) = update.family {
            self.style.family = family;
        }
        if let Some(size) = update.size {
            self.style.size = size;
        }
        if let Some(color) = update.color {
            self.style.color = color;
        }
    }

    /// Sets a line's absolute position, clamped so its bounding box stays
    /// fully inside the canvas. Unknown id is a no-op.
    pub fn move_line(&mut self, id: LayerId, desired: Position) {
        let Some(index) = self.layers.iter().position(|l| l.id == id) else {
            return;
        };
        let extent = self.estimate_extent(self.layers[index].display_content());
        self.layers[index].position = clamp_position(desired, extent, self.canvas);
    }

    /// The color a line renders in: the configured style color, or the
    /// placeholder gray while its content is empty.
    pub fn render_color(&self, layer: &TextLayer) -> Color {
        if layer.content.is_empty() {
            Color::PLACEHOLDER
        } else {
            self.style.color
        }
    }

    /// Estimated bounding box of a layer on the canvas. Hosting UIs use
    /// this for pointer hit testing when starting a drag.
    pub fn layer_bounds(&self, id: LayerId) -> Option<RectPx> {
        let layer = self.layer(id)?;
        let (w, h) = self.estimate_extent(layer.display_content());
        Some(RectPx::new(layer.position.x, layer.position.y, w, h))
    }

    /// Layers in ascending stacking order, as the rasterizer draws them.
    pub fn layers_in_order(&self) -> Vec<&TextLayer> {
        let mut ordered: Vec<&TextLayer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| l.order);
        ordered
    }

    /// Coarse bounding-box estimate for clamping and default centering.
    ///
    /// Drag clamping must work even when no font is registered, so this
    /// uses average-advance heuristics instead of glyph metrics. Hosts with
    /// real measurements can call [`clamp_position`] directly.
    pub(crate) fn estimate_extent(&self, text: &str) -> (f32, f32) {
        let chars = text.chars().count().max(1) as f32;
        (chars * self.style.size * 0.55, self.style.size * 1.2)
    }

    pub(crate) fn restore_line(&mut self, content: String, position: Position, order: u32) {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let position = clamp_position(position, self.estimate_extent(&content), self.canvas);
        self.layers.push(TextLayer {
            id,
            content,
            position,
            order,
        });
    }

    pub(crate) fn clear_layers(&mut self) {
        self.layers.clear();
    }

    pub(crate) fn ensure_one_line(&mut self) {
        if self.layers.is_empty() {
            self.add_line();
        }
    }

    pub(crate) fn set_style_owned(&mut self, style: TextStyle) {
        self.style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scene() -> Scene {
        let mut scene = Scene::new(SizePx::new(600, 700));
        let bg = RgbaImage::from_pixel(1200, 900, image::Rgba([10, 20, 30, 255]));
        scene.replace_background(PlacedImage::fit(bg, scene.canvas()));
        scene
    }

    #[test]
    fn background_is_fit_to_bounds() {
        let scene = test_scene();
        let bg = scene.background().unwrap();
        assert_eq!(bg.scale, 0.5);
        assert_eq!(bg.left, 0.0);
        assert_eq!(bg.top, 125.0);
    }

    #[test]
    fn loading_background_yields_one_default_line() {
        let scene = test_scene();
        assert_eq!(scene.layers().len(), 1);
        assert!(scene.layers()[0].content.is_empty());
    }

    #[test]
    fn added_lines_stack_at_fixed_spacing() {
        let mut scene = test_scene();
        let first_y = scene.layers()[0].position.y;
        assert_eq!(first_y, BASE_OFFSET);

        let second = scene.add_line();
        let third = scene.add_line();
        assert_eq!(scene.layer(second).unwrap().position.y, BASE_OFFSET + LINE_SPACING);
        assert_eq!(
            scene.layer(third).unwrap().position.y,
            BASE_OFFSET + 2.0 * LINE_SPACING
        );
        assert_eq!(scene.layer(third).unwrap().order, 2);
    }

    #[test]
    fn remove_never_drops_below_one() {
        let mut scene = test_scene();
        let only = scene.layers()[0].id;
        scene.remove_line(only);
        assert_eq!(scene.layers().len(), 1);
        assert_eq!(scene.layers()[0].id, only);
    }

    #[test]
    fn remove_middle_line_keeps_others_intact() {
        let mut scene = test_scene();
        let first = scene.layers()[0].id;
        let second = scene.add_line();
        let third = scene.add_line();
        assert_eq!(scene.layers().len(), 3);

        scene.update_line(first, "hand poured");
        scene.update_line(second, "doomed");
        scene.update_line(third, "small batch");

        scene.remove_line(second);
        assert_eq!(scene.layers().len(), 2);
        assert_eq!(scene.layer(first).unwrap().content, "hand poured");
        assert_eq!(scene.layer(third).unwrap().content, "small batch");
        // Orders keep their gaps.
        assert_eq!(scene.layer(third).unwrap().order, 2);
    }

    #[test]
    fn unknown_id_operations_are_noops() {
        let mut scene = test_scene();
        let before = scene.clone();
        let ghost = LayerId(9999);
        scene.update_line(ghost, "nope");
        scene.move_line(ghost, Position::new(10.0, 10.0));
        scene.remove_line(ghost);
        assert_eq!(scene, before);
    }

    #[test]
    fn style_update_is_global() {
        let mut scene = test_scene();
        scene.add_line();
        scene.set_style(StyleUpdate {
            size: Some(48.0),
            color: Some(Color::rgb(200, 30, 30)),
            family: None,
        });
        assert_eq!(scene.style().size, 48.0);
        assert_eq!(scene.style().family, TextStyle::default().family);

        // Every non-empty line renders with the new color.
        let id = scene.layers()[0].id;
        scene.update_line(id, "amber");
        let layer = scene.layer(id).unwrap().clone();
        assert_eq!(scene.render_color(&layer), Color::rgb(200, 30, 30));
    }

    #[test]
    fn empty_content_renders_placeholder() {
        let scene = test_scene();
        let layer = &scene.layers()[0];
        assert_eq!(scene.render_color(layer), Color::PLACEHOLDER);
        assert_eq!(layer.display_content(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn move_clamps_to_canvas() {
        let mut scene = test_scene();
        let id = scene.layers()[0].id;
        scene.update_line(id, "hi");

        scene.move_line(id, Position::new(-50.0, 10_000.0));
        let pos = scene.layer(id).unwrap().position;
        assert_eq!(pos.x, 0.0);
        assert!(pos.y <= scene.canvas().height as f32);
        assert!(pos.y > 0.0);
    }

    #[test]
    fn replace_background_discards_layers() {
        let mut scene = test_scene();
        let id = scene.layers()[0].id;
        scene.update_line(id, "keep me?");
        scene.add_line();

        let bg = RgbaImage::from_pixel(300, 300, image::Rgba([0, 0, 0, 255]));
        scene.replace_background(PlacedImage::fit(bg, scene.canvas()));
        assert_eq!(scene.layers().len(), 1);
        assert!(scene.layers()[0].content.is_empty());
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(Color::from_hex("#9ca3af").unwrap(), Color::PLACEHOLDER);
        assert_eq!(Color::from_hex("11182966").unwrap().a, 0x66);
        assert!(Color::from_hex("#abc").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn non_ascii_hex_is_rejected_not_a_panic() {
        // Multi-byte input can hit the 6- and 8-byte length arms.
        assert!(Color::from_hex("€€").is_err());
        assert!(Color::from_hex("#ＡＢＣ1").is_err());
        assert!(Color::from_hex("#ffüüff").is_err());
    }

    #[test]
    fn layer_bounds_follow_position_and_content() {
        let mut scene = test_scene();
        let id = scene.layers()[0].id;
        scene.update_line(id, "hi");
        scene.move_line(id, Position::new(40.0, 90.0));

        let bounds = scene.layer_bounds(id).unwrap();
        assert_eq!((bounds.x, bounds.y), (40.0, 90.0));
        // Two chars at size 32 with the average-advance heuristic.
        assert_eq!(bounds.width, 2.0 * 32.0 * 0.55);
        assert!(bounds.right() > bounds.x);
        assert!(scene.layer_bounds(LayerId(9999)).is_none());
    }

    #[test]
    fn layers_in_order_sorts_by_order() {
        let mut scene = test_scene();
        let a = scene.layers()[0].id;
        let b = scene.add_line();
        let c = scene.add_line();
        scene.remove_line(b);
        let ordered = scene.layers_in_order();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].id, a);
        assert_eq!(ordered[1].id, c);
    }
}
