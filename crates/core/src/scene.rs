//! Reproducible description of a rendered backdrop.
//!
//! A [`Scene`] names the field variant, the viewport, the parameter overrides,
//! the PRNG seed and how many frames to run. Rendering the same scene twice
//! produces the same pixels.

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;
use crate::surface::Size;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub field: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Scene {
    /// A scene with no overrides and zero frames.
    pub fn new(field: &str, width: u32, height: u32, seed: u64) -> Self {
        Self {
            field: field.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Parses a scene from JSON text and validates it.
    pub fn from_json(text: &str) -> Result<Self, BackdropError> {
        let scene: Scene = serde_json::from_str(text)
            .map_err(|e| BackdropError::InvalidScene(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Rejects zero dimensions and pixel counts that overflow `usize`.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.width == 0 || self.height == 0 {
            return Err(BackdropError::InvalidDimensions);
        }
        usize::try_from(self.size().area()).map_err(|_| BackdropError::InvalidDimensions)?;
        Ok(())
    }
}
