//! Laws that must hold for arbitrary colors, progress values and tick sequences.

use breathorb::orb::{
    BreathClock, ColorClock, Gate, GlowRange, ParticleLayout, Rgb, ScaleRange, SwapMode, TransitionPolicy, derive, mix,
};
use breathorb::{BreathPhase, BreathingEngine, EngineConfig};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    any::<[u8; 3]>().prop_map(|[r, g, b]| Rgb::new(r, g, b))
}

fn arb_phase() -> impl Strategy<Value = BreathPhase> {
    prop::sample::select(BreathPhase::iter().collect::<Vec<_>>())
}

fn arb_policy() -> impl Strategy<Value = TransitionPolicy> {
    let gate = prop_oneof![
        (1u32..4).prop_map(|phases| Gate::Every { phases }),
        arb_phase().prop_map(|phase| Gate::Entering { phase }),
    ];
    let mode = prop_oneof![
        Just(SwapMode::Instant),
        (1u64..3000).prop_map(|duration_ms| SwapMode::Crossfade { duration_ms }),
    ];
    prop_oneof![
        (1u64..20_000).prop_map(|duration_ms| TransitionPolicy::Continuous { duration_ms }),
        (gate, mode).prop_map(|(gate, mode)| TransitionPolicy::PhaseGated { gate, mode }),
    ]
}

/// Strictly increasing timestamps built from frame-sized steps.
fn arb_timestamps() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..2500, 1..400).prop_map(|steps| {
        let mut now = 0.0;
        steps
            .into_iter()
            .map(|step| {
                now += f64::from(step);
                now
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn mix_boundaries_are_exact(a in arb_rgb(), b in arb_rgb()) {
        prop_assert_eq!(mix(a, b, 0.0), a);
        prop_assert_eq!(mix(a, b, 1.0), b);
    }

    #[test]
    fn mix_midpoint_rounds_the_average(a in arb_rgb(), b in arb_rgb()) {
        let mixed = mix(a, b, 0.5);
        let average = |x: u8, y: u8| ((f64::from(x) + f64::from(y)) / 2.0).round() as u8;
        prop_assert_eq!(mixed, Rgb::new(average(a.r, b.r), average(a.g, b.g), average(a.b, b.b)));
    }

    #[test]
    fn mix_stays_between_inputs(a in arb_rgb(), b in arb_rgb(), ratio in -1.0f32..2.0) {
        let mixed = mix(a, b, ratio);
        for (m, (x, y)) in mixed.channels().into_iter().zip(a.channels().into_iter().zip(b.channels())) {
            prop_assert!(m >= x.min(y) && m <= x.max(y));
        }
    }

    #[test]
    fn glow_and_scale_stay_in_bounds(phase in arb_phase(), progress in -10.0f32..10.0) {
        let params = derive(phase, progress, GlowRange::default(), ScaleRange::default(), ParticleLayout::default());
        prop_assert!((0.3..=1.0).contains(&params.glow_intensity));
        prop_assert!((0.8..=1.4).contains(&params.scale));
        prop_assert!((0.0..360.0).contains(&params.flow_angle_deg));
        prop_assert_eq!(params.particle_offsets.len(), 6);
    }

    #[test]
    fn breath_progress_is_bounded_and_phases_alternate(
        duration in 1u64..10_000,
        times in arb_timestamps(),
    ) {
        let mut clock = BreathClock::new(duration).expect("valid duration");
        let mut previous = BreathPhase::Inhaling;
        for now in times {
            let state = clock.tick(now);
            prop_assert!((0.0..1.0).contains(&state.progress));
            if let Some(completed) = state.completed {
                prop_assert_eq!(completed, previous);
                prop_assert_eq!(state.phase, previous.toggled());
                prop_assert_eq!(state.progress, 0.0);
            } else {
                prop_assert_eq!(state.phase, previous);
            }
            previous = state.phase;
        }
    }

    #[test]
    fn active_index_cycles(initial in 0usize..6, events in 0u64..50) {
        let policy = TransitionPolicy::PhaseGated { gate: Gate::Every { phases: 1 }, mode: SwapMode::Instant };
        let mut clock = ColorClock::new(policy, 6, initial).expect("valid clock");
        let mut phase = BreathPhase::Inhaling;
        for k in 0..events {
            clock.tick(k as f64 * 4000.0, Some(phase));
            phase = phase.toggled();
        }
        prop_assert_eq!(clock.active_index() as u64, (initial as u64 + events) % 6);
    }

    #[test]
    fn engine_frames_stay_renderable(policy in arb_policy(), times in arb_timestamps()) {
        let config = EngineConfig { transition: policy, ..Default::default() };
        let mut engine = BreathingEngine::new(config).expect("valid config");
        let palette_len = engine.config().palette.len();
        let mut previous_scheme = 0;
        for now in times {
            let frame = engine.tick(now);
            prop_assert!((0.0..1.0).contains(&frame.breath_progress));
            prop_assert!((0.0..1.0).contains(&frame.color_blend));
            prop_assert!(frame.active_scheme < palette_len);
            prop_assert!(frame.scale.is_finite() && frame.scale > 0.0);
            let step = (frame.active_scheme + palette_len - previous_scheme) % palette_len;
            prop_assert!(step <= 1, "scheme jumped from {} to {}", previous_scheme, frame.active_scheme);
            previous_scheme = frame.active_scheme;
        }
        prop_assert_eq!(
            engine.color_clock().active_index() as u64,
            engine.color_clock().advances() % palette_len as u64
        );
    }
}
