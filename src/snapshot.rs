//! Serializable scene snapshots for cross-process persistence.
//!
//! A [`SceneSnapshot`] captures everything an external collaborator needs to
//! persist or restore a design: canvas size, the shared text style, the text
//! lines, and optionally a crop transform. A [`TextSnapshot`] is the smaller
//! capture the editor uses to carry user text across a template swap.
//!
//! Layer ids are deliberately not serialized; they are scene-local and are
//! reassigned on restore.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "canvas": { "width": 600, "height": 700 },
//!   "style": { "family": "Inter", "size": 32.0, "color": { "r": 17, "g": 24, "b": 39, "a": 255 } },
//!   "lines": [
//!     { "content": "Amber Glow", "position": { "x": 210.0, "y": 80.0 }, "order": 0 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, SizePx};
use crate::scene::{Scene, TextStyle};
use crate::transform::Transform;

/// One captured text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSnapshot {
    pub content: String,
    pub position: Position,
    pub order: u32,
}

/// The text state of a scene: shared style plus all lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSnapshot {
    pub style: TextStyle,
    pub lines: Vec<LineSnapshot>,
}

impl TextSnapshot {
    /// Captures the text state of a scene.
    pub fn capture(scene: &Scene) -> Self {
        Self {
            style: scene.style().clone(),
            lines: scene
                .layers()
                .iter()
                .map(|layer| LineSnapshot {
                    content: layer.content.clone(),
                    position: layer.position,
                    order: layer.order,
                })
                .collect(),
        }
    }

    /// Replaces a scene's text state with this snapshot.
    ///
    /// Restored positions are clamped to the scene's canvas (the snapshot
    /// may come from a different canvas size). The scene is left with at
    /// least one line.
    pub fn restore_into(&self, scene: &mut Scene) {
        scene.set_style_owned(self.style.clone());
        scene.clear_layers();
        for line in &self.lines {
            scene.restore_line(line.content.clone(), line.position, line.order);
        }
        scene.ensure_one_line();
    }
}

/// A complete serializable design snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub canvas: SizePx,

    #[serde(flatten)]
    pub text: TextSnapshot,

    /// Crop tool state, when the design includes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl SceneSnapshot {
    /// Captures a scene's full serializable state.
    pub fn capture(scene: &Scene) -> Self {
        Self {
            canvas: scene.canvas(),
            text: TextSnapshot::capture(scene),
            transform: None,
        }
    }

    /// Attaches a crop transform to the snapshot.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the snapshot to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
