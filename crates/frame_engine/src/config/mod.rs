//! Configuration system
//!
//! Config structs load from TOML or RON, picked by file extension. Every
//! field has a default so partial files are accepted.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::math::Vec3;
use crate::picking::{HighlightStyle, PickSource};
use crate::render::Camera;
use crate::scene::DEFAULT_CLEAR_COLOR;
use crate::shadow::ShadowSettings;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Value outside its accepted range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Frame pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second the host paces at; 0 runs unpaced
    pub target_fps: u32,
    /// End the session after this many frames
    pub max_frames: Option<u64>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: None,
        }
    }
}

/// Static pick ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickConfig {
    /// Ray origin in world space
    pub origin: Vec3,
    /// Ray direction; normalized when the ray is built
    pub direction: Vec3,
}

impl From<PickConfig> for PickSource {
    fn from(config: PickConfig) -> Self {
        Self::Fixed {
            origin: config.origin,
            direction: config.direction,
        }
    }
}

/// Initial camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Viewport aspect ratio
    pub aspect: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            target: Vec3::zeros(),
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraConfig {
    /// Build the camera
    pub fn build(&self) -> Camera {
        let mut camera = Camera::perspective(self.position, self.fov_degrees, self.aspect, 0.1, 100.0);
        camera.set_target(self.target);
        camera
    }
}

/// Top-level configuration of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial clear color
    pub clear_color: Color,
    /// Frame pacing
    pub frame: FrameConfig,
    /// Camera placement
    pub camera: CameraConfig,
    /// Decal plane and falloff
    pub shadow: ShadowSettings,
    /// Highlight tints
    pub highlight: HighlightStyle,
    /// Static pick ray; no picking when absent
    pub pick: Option<PickConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            frame: FrameConfig::default(),
            camera: CameraConfig::default(),
            shadow: ShadowSettings::default(),
            highlight: HighlightStyle::default(),
            pick: None,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.shadow.plane_y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "shadow.plane_y",
                reason: format!("{} is not finite", self.shadow.plane_y),
            });
        }
        if !self.shadow.falloff.is_finite() || self.shadow.falloff < 0.0 {
            return Err(ConfigError::Invalid {
                field: "shadow.falloff",
                reason: format!("{} must be a finite non-negative number", self.shadow.falloff),
            });
        }
        if !(self.camera.aspect.is_finite() && self.camera.aspect > 0.0) {
            return Err(ConfigError::Invalid {
                field: "camera.aspect",
                reason: format!("{} must be positive", self.camera.aspect),
            });
        }
        Ok(())
    }
}
