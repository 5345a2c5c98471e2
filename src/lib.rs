//! # breathorb
//!
//! A deterministic, frame-driven engine for breathing guidance visuals.
//!
//! - [`BreathClock`](orb::BreathClock) alternates inhale and exhale over a fixed phase duration.
//! - [`ColorClock`](orb::ColorClock) walks a cyclic [`Palette`](orb::Palette), either on its own
//!   timer or gated on completed breath phases.
//! - [`mix`](orb::mix) and [`derive`](orb::derive) turn clock state into colors, scale, glow,
//!   flow angle and particle offsets.
//! - [`BreathingEngine`](orb::BreathingEngine) ties them together: feed it one timestamp per
//!   frame and hand the resulting [`OrbSnapshot`](orb::OrbSnapshot) to the renderer.
//!
//! ```
//! use breathorb::{BreathingEngine, EngineConfig};
//!
//! let mut engine = BreathingEngine::new(EngineConfig::default()).unwrap();
//! engine.tick(0.0);
//! let frame = engine.tick(2000.0);
//! assert_eq!(frame.breath_progress, 0.5);
//! ```

pub mod config;
pub mod orb;
pub mod render;
pub mod timer;

pub use config::{ConfigError, EngineConfig};
pub use orb::{BreathPhase, BreathingEngine, OrbSnapshot};
pub use render::OrbFrame;
pub use timer::CountdownTimer;
