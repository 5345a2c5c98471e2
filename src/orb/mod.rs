mod breath;
mod color;
mod driver;
mod engine;
mod observer;
mod palette;
mod transition;
mod visual;

pub use breath::{BreathClock, BreathPhase, BreathState};
pub use color::{ColorParseError, Rgb, mix};
pub use driver::FrameClock;
pub use engine::{BreathingEngine, OrbSnapshot};
pub use observer::{EngineObserver, TracingObserver};
pub use palette::{ColorScheme, DisplayColors, Palette};
pub use transition::{ColorClock, ColorTransitionState, Gate, SwapMode, TransitionPolicy};
pub use visual::{GlowRange, Offset, ParticleLayout, ScaleRange, VisualConfig, VisualParams, derive};
