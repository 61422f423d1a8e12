//! Layout hint capability.
//!
//! A [`LayoutHintProvider`] suggests where text should land on a freshly
//! loaded background. The engine ships only the hard-coded
//! [`CenterBandProvider`] heuristic; a real detection model can be plugged
//! in behind the same trait without touching the editor.

use crate::geometry::{Position, SizePx};
use crate::scene::PlacedImage;

/// A suggested placement for the first text line, with subsequent lines
/// stacked `line_spacing` apart below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutHint {
    pub first_line: Position,
    pub line_spacing: f32,
}

/// Suggests text placement for a scene's background.
pub trait LayoutHintProvider {
    fn suggest(&self, canvas: SizePx, background: &PlacedImage) -> LayoutHint;
}

/// Places text in a horizontal band through the upper-middle of the placed
/// background. This mirrors the fixed heuristic the product shipped with;
/// it is a stand-in, not detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterBandProvider;

impl LayoutHintProvider for CenterBandProvider {
    fn suggest(&self, canvas: SizePx, background: &PlacedImage) -> LayoutHint {
        let (_, scaled_h) = (
            background.natural.width as f32 * background.scale,
            background.natural.height as f32 * background.scale,
        );
        LayoutHint {
            first_line: Position::new(
                canvas.width as f32 / 2.0,
                background.top + scaled_h * 0.4,
            ),
            line_spacing: crate::scene::LINE_SPACING,
        }
    }
}
