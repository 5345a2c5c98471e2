use super::breath::BreathPhase;
use super::palette::ColorScheme;
use tracing::debug;

/// Hook for diagnostics on engine transitions. Both callbacks default to no-ops.
pub trait EngineObserver {
    /// The breath clock finished `from` and is now in `to`.
    fn on_phase_toggle(&mut self, _from: BreathPhase, _to: BreathPhase, _completed_phases: u64) {}

    /// The active color scheme moved from index `from` to `to`.
    fn on_color_advance(&mut self, _from: usize, _to: usize, _scheme: &ColorScheme) {}
}

/// Reports transitions as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn on_phase_toggle(&mut self, from: BreathPhase, to: BreathPhase, completed_phases: u64) {
        debug!(%from, %to, completed_phases, "breath phase toggled");
    }

    fn on_color_advance(&mut self, from: usize, to: usize, scheme: &ColorScheme) {
        debug!(from, to, label = %scheme.label, primary = %scheme.primary, "color scheme advanced");
    }
}
