use std::fmt;

/// A mindfulness countdown: decrements once per second while running and stops at zero.
///
/// Independent of the breathing engine; the host feeds it time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownTimer {
    initial_seconds: u32,
    remaining_seconds: u32,
    running: bool,
    pending_ms: u64,
}

impl CountdownTimer {
    pub fn new(initial_seconds: u32) -> Self {
        Self { initial_seconds, remaining_seconds: initial_seconds, running: false, pending_ms: 0 }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Back to the initial time, stopped.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.initial_seconds;
        self.running = false;
        self.pending_ms = 0;
    }

    /// Reset with a new initial time.
    pub fn reset_to(&mut self, initial_seconds: u32) {
        self.initial_seconds = initial_seconds;
        self.reset();
    }

    /// One second passes. Does nothing while paused or at zero.
    pub fn tick(&mut self) {
        if self.running {
            self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        }
    }

    /// Feed elapsed host time; every whole second while running counts as a [`tick`](Self::tick).
    pub fn advance(&mut self, elapsed_ms: u64) {
        if !self.running {
            return;
        }
        self.pending_ms = self.pending_ms.saturating_add(elapsed_ms);
        let whole = self.pending_ms / 1000;
        self.pending_ms %= 1000;
        let whole = u32::try_from(whole).unwrap_or(u32::MAX);
        self.remaining_seconds = self.remaining_seconds.saturating_sub(whole);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    /// The remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }
}
