use crate::orb::{BreathClock, Palette, TransitionPolicy, VisualConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to build a [`BreathingEngine`](crate::orb::BreathingEngine).
///
/// Every field has a default, so a config file only needs to mention what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Length of a single inhale or exhale.
    pub phase_duration_ms: u64,

    /// Index of the palette scheme shown first.
    pub initial_scheme: usize,

    /// Frame gaps longer than this are treated as a suspension and not caught up on.
    /// `None` disables the check.
    pub max_frame_gap_ms: Option<u64>,

    pub transition: TransitionPolicy,

    pub visual: VisualConfig,

    pub palette: Palette,
}

impl EngineConfig {
    pub const DEFAULT_MAX_FRAME_GAP_MS: u64 = 5000;

    /// Parse and validate a YAML config.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phase_duration_ms == 0 {
            return Err(ConfigError::ZeroPhaseDuration);
        }
        if self.max_frame_gap_ms == Some(0) {
            return Err(ConfigError::ZeroFrameGap);
        }
        if self.palette.len() < Palette::MIN_SCHEMES {
            return Err(ConfigError::PaletteTooSmall(self.palette.len()));
        }
        if self.initial_scheme >= self.palette.len() {
            return Err(ConfigError::InitialSchemeOutOfRange { index: self.initial_scheme, len: self.palette.len() });
        }
        self.transition.validate()?;
        self.visual.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            phase_duration_ms: BreathClock::DEFAULT_PHASE_DURATION_MS,
            initial_scheme: 0,
            max_frame_gap_ms: Some(Self::DEFAULT_MAX_FRAME_GAP_MS),
            transition: TransitionPolicy::default(),
            visual: VisualConfig::default(),
            palette: Palette::default(),
        }
    }
}

/// Errors that can occur when building or loading an engine configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("phase duration must be positive")]
    ZeroPhaseDuration,

    #[error("{0} transition duration must be positive")]
    ZeroTransitionDuration(&'static str),

    #[error("a phase gate must span at least one phase")]
    ZeroGate,

    #[error("max frame gap must be positive")]
    ZeroFrameGap,

    #[error("palette needs at least 2 color schemes, got {0}")]
    PaletteTooSmall(usize),

    #[error("initial scheme {index} is out of range for a palette of {len}")]
    InitialSchemeOutOfRange { index: usize, len: usize },

    #[error("particle count must be positive")]
    ZeroParticles,

    #[error("particle radius must be a non-negative number, got {0}")]
    InvalidParticleRadius(f32),

    #[error("invalid {name} range: {min}..{max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("failed to read config file '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
