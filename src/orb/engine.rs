use super::breath::{BreathClock, BreathPhase};
use super::color::Rgb;
use super::observer::EngineObserver;
use super::palette::DisplayColors;
use super::transition::ColorClock;
use super::visual::Offset;
use crate::config::{ConfigError, EngineConfig};
use serde::Serialize;
use tracing::debug;

/// Everything the rendering layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrbSnapshot {
    /// The timestamp the engine actually used for this frame.
    pub timestamp_ms: f64,
    pub phase: BreathPhase,
    pub breath_progress: f32,
    pub scale: f32,
    pub glow_intensity: f32,
    pub flow_angle_deg: f32,
    pub active_scheme: usize,
    pub color_blend: f32,
    pub display_colors: DisplayColors,
    pub particle_offsets: Vec<Offset>,
    /// One color per particle, previewing the upcoming schemes.
    pub particle_colors: Vec<Rgb>,
}

/// Drives the breath and color clocks from host frame ticks and derives
/// the orb's visual parameters.
///
/// Each instance owns its clocks; independent orbs need independent engines.
pub struct BreathingEngine {
    config: EngineConfig,
    breath: BreathClock,
    color: ColorClock,
    observer: Option<Box<dyn EngineObserver>>,
    last_tick: Option<f64>,
}

impl BreathingEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let breath = BreathClock::new(config.phase_duration_ms)?;
        let color = ColorClock::new(config.transition, config.palette.len(), config.initial_scheme)?;
        Ok(Self { config, breath, color, observer: None, last_tick: None })
    }

    pub fn with_observer<O: EngineObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn EngineObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn breath_clock(&self) -> &BreathClock {
        &self.breath
    }

    pub fn color_clock(&self) -> &ColorClock {
        &self.color
    }

    /// Advance both clocks to `now` (host milliseconds) and compute the frame.
    ///
    /// Timestamps going backwards or not being finite are clamped to the last
    /// accepted one. A gap longer than `max_frame_gap_ms` is skipped rather than
    /// caught up on.
    pub fn tick(&mut self, now: f64) -> OrbSnapshot {
        let now = self.accept(now);
        let breath = self.breath.tick(now);
        let color = self.color.tick(now, breath.completed);
        let palette = &self.config.palette;

        if let Some(observer) = self.observer.as_mut() {
            if let Some(completed) = breath.completed {
                observer.on_phase_toggle(completed, breath.phase, self.breath.completed_phases());
            }
            if color.advanced {
                let from = (color.active_index + palette.len() - 1) % palette.len();
                observer.on_color_advance(from, color.active_index, palette.scheme(color.active_index));
            }
        }

        let visual = self.config.visual.derive(breath.phase, breath.progress);
        OrbSnapshot {
            timestamp_ms: now,
            phase: breath.phase,
            breath_progress: breath.progress,
            scale: visual.scale,
            glow_intensity: visual.glow_intensity,
            flow_angle_deg: visual.flow_angle_deg,
            active_scheme: color.active_index,
            color_blend: color.blend_progress,
            display_colors: palette.display_colors(color.active_index, color.blend_progress),
            particle_colors: palette.particle_colors(color.active_index, visual.particle_offsets.len()),
            particle_offsets: visual.particle_offsets,
        }
    }

    /// Back to the first inhale and the initial scheme; the next tick re-latches both clocks.
    pub fn restart(&mut self) {
        self.breath.restart();
        self.color.restart();
        self.last_tick = None;
    }

    /// Change the phase length. The current phase keeps its identity but restarts its timing.
    pub fn set_phase_duration_ms(&mut self, phase_duration_ms: u64) -> Result<(), ConfigError> {
        self.breath.set_phase_duration_ms(phase_duration_ms)?;
        self.config.phase_duration_ms = phase_duration_ms;
        Ok(())
    }

    fn accept(&mut self, now: f64) -> f64 {
        let Some(last) = self.last_tick else {
            let now = if now.is_finite() { now } else { 0.0 };
            self.last_tick = Some(now);
            return now;
        };
        if !now.is_finite() || now < last {
            return last;
        }
        let gap = now - last;
        if let Some(max_gap) = self.config.max_frame_gap_ms {
            if gap > max_gap as f64 {
                debug!(gap_ms = gap, max_gap_ms = max_gap, "frame gap exceeded, re-latching clocks");
                self.breath.shift(gap);
                self.color.shift(gap);
            }
        }
        self.last_tick = Some(now);
        now
    }
}

impl std::fmt::Debug for BreathingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreathingEngine")
            .field("config", &self.config)
            .field("breath", &self.breath)
            .field("color", &self.color)
            .field("observer", &self.observer.is_some())
            .field("last_tick", &self.last_tick)
            .finish()
    }
}
