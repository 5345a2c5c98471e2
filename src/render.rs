//! Maps engine snapshots onto the layered primitives the orb is drawn with.
//!
//! Everything here is numeric: scales, opacities, blur radii, angles and RGBA
//! colors. Turning those into pixels is up to the host.

use crate::orb::{BreathPhase, OrbSnapshot, Rgb};
use serde::Serialize;
use std::fmt;

/// A color with an alpha byte, formatted as CSS `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Rgba {
    pub color: Rgb,
    pub alpha: u8,
}

impl Rgba {
    pub const fn new(color: Rgb, alpha: u8) -> Self {
        Self { color, alpha }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02x}", self.color, self.alpha)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// A gradient stop at `position`, in percent for radial gradients and degrees for conic ones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    pub color: Rgba,
    pub position: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Shadow {
    pub blur: f32,
    pub color: Rgba,
}

/// A soft halo drawn behind the orb.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GlowRing {
    pub scale: f32,
    pub opacity: f32,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoreOrb {
    pub scale: f32,
    pub gradient: Vec<GradientStop>,
    pub shadows: Vec<Shadow>,
}

/// The rotating conic layer inside the orb.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowLayer {
    pub angle_deg: f32,
    pub stops: Vec<GradientStop>,
}

/// A particle drifting out to its offset over one phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleSprite {
    pub dx: f32,
    pub dy: f32,
    pub color: Rgb,
    pub peak_opacity: f32,
    pub delay_ms: u64,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrbFrame {
    pub timestamp_ms: f64,
    pub phase: BreathPhase,
    pub phase_label: &'static str,
    pub scheme_label: String,
    pub rings: [GlowRing; 2],
    pub core: CoreOrb,
    pub flow: FlowLayer,
    pub particles: Vec<ParticleSprite>,
}

const OUTER_RING_SCALE: f32 = 1.6;
const MIDDLE_RING_SCALE: f32 = 1.3;
const PARTICLE_STAGGER_MS: u64 = 100;

impl OrbFrame {
    pub fn from_snapshot(snapshot: &OrbSnapshot, phase_duration_ms: u64) -> Self {
        let colors = &snapshot.display_colors;
        let glow = snapshot.glow_intensity;
        let scale = snapshot.scale;
        let stop = |color: Rgb, alpha: u8, position: f32| GradientStop { color: Rgba::new(color, alpha), position };
        let shadow = |blur: f32, color: Rgb, alpha: u8| Shadow { blur: blur * glow, color: Rgba::new(color, alpha) };

        let rings = [
            GlowRing { scale: scale * OUTER_RING_SCALE, opacity: glow * 0.4, color: Rgba::new(colors.tertiary, 0x20) },
            GlowRing { scale: scale * MIDDLE_RING_SCALE, opacity: glow * 0.6, color: Rgba::new(colors.secondary, 0x30) },
        ];
        let core = CoreOrb {
            scale,
            gradient: vec![
                stop(colors.primary, 0xff, 0.0),
                stop(colors.secondary, 0xcc, 40.0),
                stop(colors.tertiary, 0x88, 70.0),
            ],
            shadows: vec![
                shadow(60.0, colors.primary, 0x66),
                shadow(100.0, colors.secondary, 0x44),
                shadow(140.0, colors.tertiary, 0x22),
            ],
        };
        let flow = FlowLayer {
            angle_deg: snapshot.flow_angle_deg,
            stops: vec![
                stop(colors.primary, 0x40, 0.0),
                stop(colors.secondary, 0x60, 120.0),
                stop(colors.tertiary, 0x40, 240.0),
                stop(colors.primary, 0x40, 360.0),
            ],
        };
        let particles = snapshot
            .particle_offsets
            .iter()
            .zip(&snapshot.particle_colors)
            .enumerate()
            .map(|(i, (offset, color))| ParticleSprite {
                dx: offset.dx,
                dy: offset.dy,
                color: *color,
                peak_opacity: glow * 0.8,
                delay_ms: i as u64 * PARTICLE_STAGGER_MS,
                duration_ms: phase_duration_ms,
            })
            .collect();

        Self {
            timestamp_ms: snapshot.timestamp_ms,
            phase: snapshot.phase,
            phase_label: snapshot.phase.label(),
            scheme_label: colors.label.clone(),
            rings,
            core,
            flow,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::orb::BreathingEngine;

    fn frame_at(times: &[f64]) -> OrbFrame {
        let mut engine = BreathingEngine::new(EngineConfig::default()).expect("valid config");
        let mut snapshot = None;
        for t in times {
            snapshot = Some(engine.tick(*t));
        }
        let snapshot = snapshot.expect("at least one tick");
        OrbFrame::from_snapshot(&snapshot, engine.config().phase_duration_ms)
    }

    #[test]
    fn rgba_formats_as_css() {
        assert_eq!(Rgba::new(Rgb::new(0x66, 0x7e, 0xea), 0x20).to_string(), "#667eea20");
    }

    #[test]
    fn layers_follow_glow_and_scale() {
        let frame = frame_at(&[0.0, 2000.0]);
        let glow = 0.65;
        let scale = 1.1;
        assert!((frame.rings[0].scale - scale * 1.6).abs() < 1e-5);
        assert!((frame.rings[1].opacity - glow * 0.6).abs() < 1e-5);
        assert!((frame.core.shadows[2].blur - 140.0 * glow).abs() < 1e-3);
        assert_eq!(frame.flow.angle_deg, 180.0);
        assert_eq!(frame.phase_label, "Inhale");
    }

    #[test]
    fn particles_are_staggered() {
        let frame = frame_at(&[0.0]);
        assert_eq!(frame.particles.len(), 6);
        assert_eq!(frame.particles[3].delay_ms, 300);
        assert_eq!(frame.particles[3].duration_ms, 4000);
        assert_eq!(frame.particles[1].color.to_hex(), "#4facfe");
        assert!((frame.particles[0].peak_opacity - 0.24).abs() < 1e-6);
    }

    #[test]
    fn serializes_colors_as_hex() {
        let frame = frame_at(&[0.0]);
        let json = serde_json::to_value(&frame).expect("serialize failed");
        assert_eq!(json["core"]["gradient"][0]["color"], "#667eeaff");
        assert_eq!(json["phase"], "inhaling");
        assert_eq!(json["scheme_label"], "Serene Violet");
    }
}
