use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// The respiration half-cycle currently being cued.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    #[default]
    #[strum(serialize = "Inhale")]
    Inhaling,
    #[strum(serialize = "Exhale")]
    Exhaling,
}

impl BreathPhase {
    pub fn toggled(self) -> Self {
        match self {
            Self::Inhaling => Self::Exhaling,
            Self::Exhaling => Self::Inhaling,
        }
    }

    /// Short user facing label for the phase.
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Breath clock output for a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathState {
    pub phase: BreathPhase,
    /// Fraction of the current phase that has elapsed, in [0, 1].
    pub progress: f32,
    /// When the current phase started, unset until the next tick latches it.
    pub phase_start: Option<f64>,
    /// The phase that finished on this tick, if any.
    pub completed: Option<BreathPhase>,
}

/// Advances the inhale/exhale cycle against a fixed phase duration.
///
/// Timestamps are host milliseconds from any monotonic origin. The first tick
/// after a (re)start latches the phase start; the tick on which the phase runs
/// out toggles the phase, reports progress 0 and unlatches the start so the
/// following tick latches it again.
#[derive(Clone, Debug)]
pub struct BreathClock {
    phase_duration_ms: u64,
    phase: BreathPhase,
    progress: f32,
    phase_start: Option<f64>,
    completed_phases: u64,
}

impl BreathClock {
    /// Default length of a single phase.
    pub const DEFAULT_PHASE_DURATION_MS: u64 = 4000;

    pub fn new(phase_duration_ms: u64) -> Result<Self, ConfigError> {
        if phase_duration_ms == 0 {
            return Err(ConfigError::ZeroPhaseDuration);
        }
        Ok(Self {
            phase_duration_ms,
            phase: BreathPhase::Inhaling,
            progress: 0.0,
            phase_start: None,
            completed_phases: 0,
        })
    }

    pub fn tick(&mut self, now: f64) -> BreathState {
        let start = *self.phase_start.get_or_insert(now);
        let elapsed = (now - start).max(0.0);
        // progress is only ever stored below 1
        let progress = (elapsed / self.phase_duration_ms as f64) as f32;
        if progress < 1.0 {
            self.progress = progress;
            return self.state(None);
        }

        let completed = self.phase;
        self.phase = completed.toggled();
        self.progress = 0.0;
        self.phase_start = None;
        self.completed_phases += 1;
        self.state(Some(completed))
    }

    /// The state as of the last tick, without a completion marker.
    pub fn current(&self) -> BreathState {
        self.state(None)
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase_duration_ms(&self) -> u64 {
        self.phase_duration_ms
    }

    /// Number of phase toggles since the last restart.
    pub fn completed_phases(&self) -> u64 {
        self.completed_phases
    }

    /// Change the phase length. The current phase restarts its timing on the next tick.
    pub fn set_phase_duration_ms(&mut self, phase_duration_ms: u64) -> Result<(), ConfigError> {
        if phase_duration_ms == 0 {
            return Err(ConfigError::ZeroPhaseDuration);
        }
        self.phase_duration_ms = phase_duration_ms;
        self.phase_start = None;
        self.progress = 0.0;
        Ok(())
    }

    pub fn restart(&mut self) {
        self.phase = BreathPhase::Inhaling;
        self.progress = 0.0;
        self.phase_start = None;
        self.completed_phases = 0;
    }

    /// Move the latched start forward, freezing progress across a suspension.
    pub(crate) fn shift(&mut self, by_ms: f64) {
        if let Some(start) = self.phase_start.as_mut() {
            *start += by_ms;
        }
    }

    fn state(&self, completed: Option<BreathPhase>) -> BreathState {
        BreathState { phase: self.phase, progress: self.progress, phase_start: self.phase_start, completed }
    }
}

impl Default for BreathClock {
    fn default() -> Self {
        Self {
            phase_duration_ms: Self::DEFAULT_PHASE_DURATION_MS,
            phase: BreathPhase::Inhaling,
            progress: 0.0,
            phase_start: None,
            completed_phases: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn first_tick_latches_start() {
        let mut clock = BreathClock::default();
        let state = clock.tick(1234.0);
        assert_eq!(state.phase, BreathPhase::Inhaling);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.phase_start, Some(1234.0));
        assert_eq!(state.completed, None);
    }

    #[test]
    fn toggles_exactly_at_duration() {
        let mut clock = BreathClock::new(4000).expect("valid duration");
        clock.tick(0.0);
        assert_eq!(clock.tick(2000.0).progress, 0.5);
        assert_eq!(clock.tick(3999.0).phase, BreathPhase::Inhaling);

        let state = clock.tick(4000.0);
        assert_eq!(state.phase, BreathPhase::Exhaling);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.phase_start, None);
        assert_eq!(state.completed, Some(BreathPhase::Inhaling));
        assert_eq!(clock.completed_phases(), 1);
    }

    #[test]
    fn progress_rounding_to_one_toggles() {
        let mut clock = BreathClock::new(4000).expect("valid duration");
        clock.tick(0.0);
        let state = clock.tick(4000.0 - 1e-7);
        assert_eq!(state.completed, Some(BreathPhase::Inhaling));
        assert_eq!(state.phase, BreathPhase::Exhaling);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn relatches_after_toggle() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(0.0);
        clock.tick(1000.0);
        let state = clock.tick(1016.0);
        assert_eq!(state.phase_start, Some(1016.0));
        assert_eq!(state.progress, 0.0);
        assert_eq!(clock.tick(1516.0).progress, 0.5);
    }

    #[test]
    fn toggle_is_edge_triggered() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(0.0);
        assert!(clock.tick(5000.0).completed.is_some());
        // the repeated timestamp only re-latches
        let state = clock.tick(5000.0);
        assert_eq!(state.completed, None);
        assert_eq!(state.phase, BreathPhase::Exhaling);
    }

    #[test]
    fn backwards_time_clamps_to_zero_progress() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(500.0);
        let state = clock.tick(100.0);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.phase, BreathPhase::Inhaling);
    }

    #[test]
    fn duration_change_relatches() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(0.0);
        clock.tick(600.0);
        clock.set_phase_duration_ms(2000).expect("valid duration");
        assert_eq!(clock.tick(700.0).progress, 0.0);
        assert_eq!(clock.tick(1700.0).progress, 0.5);
        assert_eq!(clock.phase(), BreathPhase::Inhaling);
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(matches!(BreathClock::new(0), Err(ConfigError::ZeroPhaseDuration)));
        let mut clock = BreathClock::default();
        assert!(clock.set_phase_duration_ms(0).is_err());
        assert_eq!(clock.phase_duration_ms(), 4000);
    }

    #[test]
    fn shift_freezes_progress() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(0.0);
        clock.tick(250.0);
        clock.shift(10_000.0);
        assert_eq!(clock.tick(10_500.0).progress, 0.5);
    }

    #[test]
    fn restart_returns_to_inhale() {
        let mut clock = BreathClock::new(1000).expect("valid duration");
        clock.tick(0.0);
        clock.tick(1000.0);
        clock.restart();
        assert_eq!(clock.phase(), BreathPhase::Inhaling);
        assert_eq!(clock.completed_phases(), 0);
        assert_eq!(clock.tick(9000.0).phase_start, Some(9000.0));
    }

    #[test]
    fn toggling_alternates_between_both_phases() {
        use strum::IntoEnumIterator;

        let phases: Vec<BreathPhase> = BreathPhase::iter().collect();
        assert_eq!(phases, vec![BreathPhase::Inhaling, BreathPhase::Exhaling]);
        for phase in BreathPhase::iter() {
            assert_ne!(phase.toggled(), phase);
            assert_eq!(phase.toggled().toggled(), phase);
        }
    }

    #[rstest]
    #[case(BreathPhase::Inhaling, BreathPhase::Exhaling, "Inhale")]
    #[case(BreathPhase::Exhaling, BreathPhase::Inhaling, "Exhale")]
    fn phase_toggle_and_label(#[case] phase: BreathPhase, #[case] toggled: BreathPhase, #[case] label: &str) {
        assert_eq!(phase.toggled(), toggled);
        assert_eq!(phase.label(), label);
        assert_eq!(phase.to_string(), label);
    }
}
