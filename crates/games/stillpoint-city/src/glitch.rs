use rand::Rng;

use crate::WorldEvent;
use crate::city_gen::{Building, ColorState};
use crate::config::GlitchConfig;
use crate::environment::{Background, Environment};

/// What happened to one building during a glitch tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingStep {
    /// Mid-burst: shaken, recolored, one frame used.
    Shaken,
    /// A new burst of this many frames starts next tick.
    BurstStarted(u32),
    /// Idle tick, snapped back to origin.
    Rested,
}

/// Chance per idle tick that a building starts a burst.
pub fn burst_chance(intensity: f32, cfg: &GlitchConfig) -> f64 {
    (cfg.base_chance + f64::from(intensity.clamp(0.0, 1.0)) * cfg.intensity_chance).clamp(0.0, 1.0)
}

/// Advance one building by a tick.
pub fn tick_building<R: Rng + ?Sized>(
    building: &mut Building,
    intensity: f32,
    rng: &mut R,
    cfg: &GlitchConfig,
) -> BuildingStep {
    if building.glitch_frames_remaining > 0 {
        // Offsets accumulate across the burst; origin is only restored at rest.
        building.current_position.x += rng.random_range(-cfg.shake..=cfg.shake);
        building.current_position.y += rng.random_range(-cfg.shake..=cfg.shake);
        building.color_state = if rng.random_bool(cfg.gray_chance) {
            ColorState::GlitchGray
        } else {
            ColorState::Normal
        };
        building.glitch_frames_remaining = building.glitch_frames_remaining.saturating_sub(1);
        BuildingStep::Shaken
    } else if rng.random_bool(burst_chance(intensity, cfg)) {
        let frames = rng.random_range(cfg.min_burst_frames..=cfg.max_burst_frames);
        building.glitch_frames_remaining = frames;
        BuildingStep::BurstStarted(frames)
    } else {
        building.reset();
        BuildingStep::Rested
    }
}

/// Run the glitch state machine over every building, then maybe flicker the sky.
///
/// Does nothing once chaos has stopped.
pub fn tick_glitch<R: Rng + ?Sized>(
    env: &mut Environment,
    rng: &mut R,
    cfg: &GlitchConfig,
    events: &mut Vec<WorldEvent>,
) {
    if env.chaos_stopped() {
        return;
    }

    let intensity = env.glitch_intensity();
    for (index, building) in env.buildings.iter_mut().enumerate() {
        if let BuildingStep::BurstStarted(frames) = tick_building(building, intensity, rng, cfg) {
            tracing::debug!(index, frames, "Glitch burst started");
            events.push(WorldEvent::GlitchBurst { index, frames });
        }
    }

    let flicker = (f64::from(intensity) * cfg.flicker_chance).clamp(0.0, 1.0);
    if rng.random_bool(flicker) {
        env.background = if rng.random_bool(0.5) {
            Background::Charcoal
        } else {
            Background::Black
        };
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::city_gen::Dimensions;

    fn building() -> Building {
        Building::new(
            Vec3::new(4.0, 3.0, -2.0),
            Dimensions {
                width: 1.0,
                height: 6.0,
                depth: 0.5,
            },
            false,
            true,
        )
    }

    /// Config that never starts a burst on its own.
    fn quiet() -> GlitchConfig {
        GlitchConfig {
            base_chance: 0.0,
            intensity_chance: 0.0,
            flicker_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn burst_chance_scales_with_intensity() {
        let cfg = GlitchConfig::default();
        assert!((burst_chance(0.0, &cfg) - 0.01).abs() < 1e-9);
        assert!((burst_chance(1.0, &cfg) - 0.06).abs() < 1e-9);
        assert!((burst_chance(5.0, &cfg) - 0.06).abs() < 1e-9);
    }

    #[test]
    fn rest_tick_on_resting_building_is_noop() {
        let mut b = building();
        let before = b.clone();
        let step = tick_building(&mut b, 0.0, &mut StdRng::seed_from_u64(1), &quiet());
        assert_eq!(step, BuildingStep::Rested);
        assert_eq!(b, before);
    }

    #[test]
    fn rest_tick_snaps_back_to_origin() {
        let mut b = building();
        b.current_position += Vec3::new(0.7, -0.3, 0.0);
        b.color_state = ColorState::GlitchGray;
        tick_building(&mut b, 0.0, &mut StdRng::seed_from_u64(2), &quiet());
        assert!(b.is_at_rest());
    }

    #[test]
    fn burst_length_within_range() {
        let cfg = GlitchConfig {
            base_chance: 1.0,
            intensity_chance: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let mut b = building();
            match tick_building(&mut b, 0.0, &mut rng, &cfg) {
                BuildingStep::BurstStarted(frames) => {
                    assert!((15..=34).contains(&frames), "frames {frames}");
                    assert_eq!(b.glitch_frames_remaining, frames);
                    assert!(b.is_at_rest(), "starting a burst does not move the building");
                },
                other => panic!("expected burst start, got {other:?}"),
            }
        }
    }

    #[test]
    fn last_glitch_frame_then_settles() {
        let mut rng = StdRng::seed_from_u64(4);
        let cfg = quiet();
        let mut b = building();
        b.glitch_frames_remaining = 1;

        let step = tick_building(&mut b, 0.0, &mut rng, &cfg);
        assert_eq!(step, BuildingStep::Shaken);
        assert_eq!(b.glitch_frames_remaining, 0);
        assert_eq!(b.current_position.z, b.origin.z, "z is never shaken");
        let dx = (b.current_position.x - b.origin.x).abs();
        let dy = (b.current_position.y - b.origin.y).abs();
        assert!(dx <= 0.4 + 1e-6 && dy <= 0.4 + 1e-6);

        let step = tick_building(&mut b, 0.0, &mut rng, &cfg);
        assert_eq!(step, BuildingStep::Rested);
        assert!(b.is_at_rest());
    }

    #[test]
    fn shake_accumulates_across_burst() {
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = quiet();
        let mut b = building();
        b.glitch_frames_remaining = 30;

        let mut max_drift = 0.0f32;
        for _ in 0..30 {
            tick_building(&mut b, 0.0, &mut rng, &cfg);
            max_drift = max_drift.max((b.current_position - b.origin).length());
        }
        assert_eq!(b.glitch_frames_remaining, 0);
        // Bounded by the cumulative shake on two axes.
        assert!(max_drift <= 30.0 * 0.4 * std::f32::consts::SQRT_2 + 1e-4);
    }

    #[test]
    fn gray_split_is_roughly_seventy_percent() {
        let mut rng = StdRng::seed_from_u64(6);
        let cfg = quiet();
        let mut b = building();
        b.glitch_frames_remaining = 5000;
        let mut gray = 0;
        for _ in 0..5000 {
            tick_building(&mut b, 0.0, &mut rng, &cfg);
            if b.color_state == ColorState::GlitchGray {
                gray += 1;
            }
        }
        let rate = gray as f64 / 5000.0;
        assert!((0.65..=0.75).contains(&rate), "gray rate {rate}");
    }

    #[test]
    fn stopped_environment_is_untouched() {
        let mut b = building();
        b.glitch_frames_remaining = 10;
        let mut env = Environment::new(vec![b], Vec::new(), Vec3::ZERO);
        env.mark_chaos_stopped();
        let before = env.buildings.clone();

        let mut events = Vec::new();
        tick_glitch(
            &mut env,
            &mut StdRng::seed_from_u64(7),
            &GlitchConfig::default(),
            &mut events,
        );
        assert_eq!(env.buildings, before);
        assert!(events.is_empty());
    }

    #[test]
    fn bursts_are_reported_as_events() {
        let buildings = (0..5).map(|_| building()).collect();
        let mut env = Environment::new(buildings, Vec::new(), Vec3::ZERO);
        let cfg = GlitchConfig {
            base_chance: 1.0,
            intensity_chance: 0.0,
            ..Default::default()
        };
        let mut events = Vec::new();
        tick_glitch(&mut env, &mut StdRng::seed_from_u64(8), &cfg, &mut events);
        assert_eq!(events.len(), 5);
        assert_eq!(env.glitching_count(), 5);
    }

    #[test]
    fn no_flicker_at_zero_intensity() {
        let mut env = Environment::new(Vec::new(), Vec::new(), Vec3::ZERO);
        env.background = Background::Charcoal;
        let mut rng = StdRng::seed_from_u64(9);
        let mut events = Vec::new();
        for _ in 0..500 {
            tick_glitch(&mut env, &mut rng, &GlitchConfig::default(), &mut events);
        }
        assert_eq!(env.background, Background::Charcoal);
    }

    #[test]
    fn full_intensity_flickers_between_both_tones() {
        let mut env = Environment::new(Vec::new(), Vec::new(), Vec3::ZERO);
        env.set_glitch_intensity(1.0);
        let mut rng = StdRng::seed_from_u64(10);
        let mut events = Vec::new();
        let mut seen_charcoal = false;
        let mut seen_black_after_charcoal = false;
        for _ in 0..1000 {
            tick_glitch(&mut env, &mut rng, &GlitchConfig::default(), &mut events);
            match env.background {
                Background::Charcoal => seen_charcoal = true,
                Background::Black if seen_charcoal => seen_black_after_charcoal = true,
                Background::Black => {},
            }
        }
        assert!(seen_charcoal && seen_black_after_charcoal);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn frames_count_down_without_underflow(
                seed in 0u64..1000,
                start in 0u32..40,
                intensity in 0.0f32..=1.0,
                ticks in 1usize..80,
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let cfg = GlitchConfig::default();
                let mut b = building();
                b.glitch_frames_remaining = start;
                for _ in 0..ticks {
                    let before = b.glitch_frames_remaining;
                    match tick_building(&mut b, intensity, &mut rng, &cfg) {
                        BuildingStep::Shaken => {
                            prop_assert_eq!(b.glitch_frames_remaining, before - 1);
                        },
                        BuildingStep::BurstStarted(frames) => {
                            prop_assert_eq!(before, 0);
                            prop_assert!((15..=34).contains(&frames));
                        },
                        BuildingStep::Rested => {
                            prop_assert_eq!(before, 0);
                            prop_assert!(b.is_at_rest());
                        },
                    }
                    prop_assert_eq!(b.current_position.z, b.origin.z);
                }
            }
        }
    }
}
