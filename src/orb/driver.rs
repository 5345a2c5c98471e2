use std::time::{Duration, Instant};

/// Turns wall-clock time into the millisecond timestamps the engine ticks on.
///
/// The origin is latched on the first call to [`FrameClock::now_ms`].
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    start_time: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since the first call.
    pub fn now_ms(&mut self) -> f64 {
        let start = *self.start_time.get_or_insert_with(Instant::now);
        duration_ms(start.elapsed())
    }

    /// Forget the origin; the next call starts again from zero.
    pub fn reset(&mut self) {
        self.start_time = None;
    }

    /// Time left until the frame that should start at `target_ms`, if any.
    pub fn until(&mut self, target_ms: f64) -> Option<Duration> {
        let remaining = target_ms - self.now_ms();
        if remaining > 0.0 { Duration::try_from_secs_f64(remaining / 1000.0).ok() } else { None }
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
