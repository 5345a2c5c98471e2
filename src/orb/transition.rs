use super::breath::BreathPhase;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// When and how the active color scheme moves on to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Crossfade continuously on an independent timer, ignoring breath phases.
    Continuous { duration_ms: u64 },

    /// Only transition when the breath clock completes phases that pass `gate`.
    PhaseGated { gate: Gate, mode: SwapMode },
}

impl TransitionPolicy {
    pub const DEFAULT_CONTINUOUS_DURATION_MS: u64 = 8000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Continuous { duration_ms: 0 } => Err(ConfigError::ZeroTransitionDuration("continuous")),
            Self::Continuous { .. } => Ok(()),
            Self::PhaseGated { gate, mode } => {
                if let Gate::Every { phases: 0 } = gate {
                    return Err(ConfigError::ZeroGate);
                }
                if let SwapMode::Crossfade { duration_ms: 0 } = mode {
                    return Err(ConfigError::ZeroTransitionDuration("crossfade"));
                }
                Ok(())
            }
        }
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::Continuous { duration_ms: Self::DEFAULT_CONTINUOUS_DURATION_MS }
    }
}

/// How many completed breath phases it takes to trigger a color transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gate {
    /// Every `phases` completed phases: 1 is every phase, 2 every full breath.
    Every { phases: u32 },

    /// Whenever a completion enters `phase`.
    Entering { phase: BreathPhase },
}

impl Gate {
    /// Whether the completion of `completed`, the `count`th since start, triggers a transition.
    pub fn admits(&self, completed: BreathPhase, count: u64) -> bool {
        match self {
            Self::Every { phases } => *phases > 0 && count % u64::from(*phases) == 0,
            Self::Entering { phase } => completed.toggled() == *phase,
        }
    }
}

/// How a gated transition is rendered once triggered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwapMode {
    /// Advance immediately, no blending.
    #[default]
    Instant,

    /// Blend toward the next scheme over a fixed time, independent of breath timing.
    Crossfade { duration_ms: u64 },
}

/// Color clock output for a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransitionState {
    pub active_index: usize,
    /// Progress of the blend toward the next scheme, in [0, 1].
    pub blend_progress: f32,
    pub transition_start: Option<f64>,
    /// Whether `active_index` moved on this tick.
    pub advanced: bool,
}

/// Tracks the active palette entry and the crossfade toward its successor.
#[derive(Clone, Debug)]
pub struct ColorClock {
    policy: TransitionPolicy,
    palette_len: usize,
    initial_index: usize,
    active_index: usize,
    blend_progress: f32,
    transition_start: Option<f64>,
    completed_phases: u64,
    advances: u64,
}

impl ColorClock {
    pub fn new(policy: TransitionPolicy, palette_len: usize, initial_index: usize) -> Result<Self, ConfigError> {
        policy.validate()?;
        if palette_len < 2 {
            return Err(ConfigError::PaletteTooSmall(palette_len));
        }
        if initial_index >= palette_len {
            return Err(ConfigError::InitialSchemeOutOfRange { index: initial_index, len: palette_len });
        }
        Ok(Self {
            policy,
            palette_len,
            initial_index,
            active_index: initial_index,
            blend_progress: 0.0,
            transition_start: None,
            completed_phases: 0,
            advances: 0,
        })
    }

    /// Advance the clock to `now`. `completed` is the breath phase that finished on
    /// this tick, if any. The active index moves at most once per tick.
    pub fn tick(&mut self, now: f64, completed: Option<BreathPhase>) -> ColorTransitionState {
        let advanced = match self.policy {
            TransitionPolicy::Continuous { duration_ms } => self.run_crossfade(now, duration_ms),
            TransitionPolicy::PhaseGated { gate, mode } => {
                let mut advanced = false;
                if let Some(phase) = completed {
                    self.completed_phases += 1;
                    if gate.admits(phase, self.completed_phases) {
                        advanced = self.trigger(now, mode);
                    }
                }
                if let SwapMode::Crossfade { duration_ms } = mode {
                    if self.transition_start.is_some() {
                        advanced |= self.run_crossfade(now, duration_ms);
                    }
                }
                advanced
            }
        };
        self.state(advanced)
    }

    pub fn current(&self) -> ColorTransitionState {
        self.state(false)
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn next_index(&self) -> usize {
        (self.active_index + 1) % self.palette_len
    }

    pub fn blend_progress(&self) -> f32 {
        self.blend_progress
    }

    /// Number of completed transitions since the last restart.
    pub fn advances(&self) -> u64 {
        self.advances
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_start.is_some()
    }

    pub fn restart(&mut self) {
        self.active_index = self.initial_index;
        self.blend_progress = 0.0;
        self.transition_start = None;
        self.completed_phases = 0;
        self.advances = 0;
    }

    pub(crate) fn shift(&mut self, by_ms: f64) {
        if let Some(start) = self.transition_start.as_mut() {
            *start += by_ms;
        }
    }

    fn trigger(&mut self, now: f64, mode: SwapMode) -> bool {
        match mode {
            SwapMode::Instant => {
                self.advance();
                true
            }
            SwapMode::Crossfade { .. } => {
                // an unfinished crossfade still owes its advance
                let snapped = self.transition_start.is_some();
                if snapped {
                    self.advance();
                }
                self.transition_start = Some(now);
                self.blend_progress = 0.0;
                snapped
            }
        }
    }

    fn run_crossfade(&mut self, now: f64, duration_ms: u64) -> bool {
        let start = *self.transition_start.get_or_insert(now);
        let elapsed = (now - start).max(0.0);
        let progress = (elapsed / duration_ms.max(1) as f64) as f32;
        if progress >= 1.0 {
            self.advance();
            return true;
        }
        self.blend_progress = progress;
        false
    }

    fn advance(&mut self) {
        self.active_index = (self.active_index + 1) % self.palette_len;
        self.blend_progress = 0.0;
        self.transition_start = None;
        self.advances += 1;
    }

    fn state(&self, advanced: bool) -> ColorTransitionState {
        ColorTransitionState {
            active_index: self.active_index,
            blend_progress: self.blend_progress,
            transition_start: self.transition_start,
            advanced,
        }
    }
}
