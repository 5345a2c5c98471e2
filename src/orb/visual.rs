use super::breath::BreathPhase;
use super::color::clamp_unit;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Orb scale bounds: `min` at the bottom of an exhale, `max` at the top of an inhale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max;
        if valid { Ok(()) } else { Err(ConfigError::InvalidRange { name: "scale", min: self.min, max: self.max }) }
    }

    pub fn at(&self, phase: BreathPhase, progress: f32) -> f32 {
        ramp(phase, progress, self.min, self.max)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self { min: 0.8, max: 1.4 }
    }
}

/// Glow intensity bounds, both within [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlowRange {
    pub min: f32,
    pub max: f32,
}

impl GlowRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if in_unit(self.min) && in_unit(self.max) && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange { name: "glow", min: self.min, max: self.max })
        }
    }

    pub fn at(&self, phase: BreathPhase, progress: f32) -> f32 {
        ramp(phase, progress, self.min, self.max)
    }
}

impl Default for GlowRange {
    fn default() -> Self {
        Self { min: 0.3, max: 1.0 }
    }
}

/// Particles sit evenly spaced on a ring of `radius` that scales with the orb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleLayout {
    pub count: usize,
    pub radius: f32,
}

impl Default for ParticleLayout {
    fn default() -> Self {
        Self { count: 6, radius: 100.0 }
    }
}

/// Visual tuning, as configured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualConfig {
    pub scale: ScaleRange,
    pub glow: GlowRange,
    pub particle_count: usize,
    pub particle_radius: f32,
}

impl VisualConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scale.validate()?;
        self.glow.validate()?;
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if !self.particle_radius.is_finite() || self.particle_radius < 0.0 {
            return Err(ConfigError::InvalidParticleRadius(self.particle_radius));
        }
        Ok(())
    }

    pub fn particles(&self) -> ParticleLayout {
        ParticleLayout { count: self.particle_count, radius: self.particle_radius }
    }

    pub fn derive(&self, phase: BreathPhase, progress: f32) -> VisualParams {
        derive(phase, progress, self.glow, self.scale, self.particles())
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        let particles = ParticleLayout::default();
        Self {
            scale: ScaleRange::default(),
            glow: GlowRange::default(),
            particle_count: particles.count,
            particle_radius: particles.radius,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

/// Numeric targets for one frame of the orb.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualParams {
    pub scale: f32,
    pub glow_intensity: f32,
    /// Rotation of the inner flow gradient, in [0, 360).
    pub flow_angle_deg: f32,
    pub particle_offsets: Vec<Offset>,
}

/// Compute the orb's visual targets for a breath phase and its progress.
///
/// Progress outside [0, 1] is clamped and NaN is treated as 0, so a bad
/// timestamp never produces an unrenderable frame.
pub fn derive(
    phase: BreathPhase,
    progress: f32,
    glow: GlowRange,
    scale: ScaleRange,
    particles: ParticleLayout,
) -> VisualParams {
    let progress = clamp_unit(progress);
    let scale = scale.at(phase, progress);
    let particle_offsets = (0..particles.count)
        .map(|i| {
            let angle = (i as f32 * 360.0 / particles.count as f32).to_radians();
            let reach = particles.radius * scale;
            Offset { dx: angle.cos() * reach, dy: angle.sin() * reach }
        })
        .collect();
    VisualParams {
        scale,
        glow_intensity: glow.at(phase, progress),
        flow_angle_deg: (progress * 360.0) % 360.0,
        particle_offsets,
    }
}

/// Rise from `min` to `max` while inhaling, fall back while exhaling.
fn ramp(phase: BreathPhase, progress: f32, min: f32, max: f32) -> f32 {
    let progress = clamp_unit(progress);
    let span = max - min;
    let value = match phase {
        BreathPhase::Inhaling => min + span * progress,
        BreathPhase::Exhaling => max - span * progress,
    };
    value.max(min).min(max)
}
