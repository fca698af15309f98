//! Renderer configuration, loaded from JSON.
//!
//! Every field has a default, so `{}` is a complete configuration. Unknown
//! fields are rejected to catch typos.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::animation::{AnimationState, DEFAULT_STEP};
use crate::error::RenderError;

/// Default path of the combined shader file.
pub const DEFAULT_SHADER_PATH: &str = "res/shaders/Basic.shader";

/// Window creation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Quad Renderer".into(),
            vsync: true,
        }
    }
}

/// Parameters of the bouncing color animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub start: f32,
    pub step: f32,
    pub lower: f32,
    pub upper: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            step: DEFAULT_STEP,
            lower: 0.0,
            upper: 1.0,
        }
    }
}

impl AnimationConfig {
    pub fn to_state(self) -> AnimationState {
        AnimationState::new(self.start, self.step, self.lower, self.upper)
    }
}

/// Top-level renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub window: WindowConfig,
    pub shader_path: PathBuf,
    /// RGBA clear color.
    pub clear_color: [f32; 4],
    pub animation: AnimationConfig,
    /// Stop after this many frames; run until the window closes when unset.
    pub max_frames: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shader_path: PathBuf::from(DEFAULT_SHADER_PATH),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            animation: AnimationConfig::default(),
            max_frames: None,
        }
    }
}

impl RenderConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Config` for malformed JSON, unknown fields, or
    /// values rejected by [`RenderConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the file cannot be read, otherwise as
    /// [`RenderConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Checks values that deserialize fine but cannot drive a renderer.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Config` for a zero window size, a zero or
    /// non-finite animation step, or an empty animation range.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(RenderError::Config(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        let anim = &self.animation;
        if anim.step == 0.0 || !anim.step.is_finite() {
            return Err(RenderError::Config(format!(
                "animation step {} must be finite and non-zero",
                anim.step
            )));
        }
        if !(anim.lower < anim.upper) {
            return Err(RenderError::Config(format!(
                "animation range [{}, {}] is empty",
                anim.lower, anim.upper
            )));
        }
        Ok(())
    }
}
