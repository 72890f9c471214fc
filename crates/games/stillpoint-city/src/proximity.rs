use glam::Vec3;

use stillpoint_core::audio::AudioChannel;

use crate::WorldEvent;
use crate::config::ProximityConfig;
use crate::environment::{Background, Environment, TargetVisual};

/// Linear ramp: 1 at the target, 0 at `falloff_distance` and beyond.
pub fn intensity_at(distance: f32, falloff_distance: f32) -> f32 {
    let raw = 1.0 - distance / falloff_distance;
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
}

/// Recompute intensity from the viewer position and run the one-shot stop.
///
/// Returns [`WorldEvent::ChaosStopped`] on the tick the viewer arrives; every
/// later call only refreshes intensity and the stopped visual.
pub fn update_proximity<A: AudioChannel + ?Sized>(
    env: &mut Environment,
    viewer_position: Vec3,
    audio: &mut A,
    cfg: &ProximityConfig,
) -> Option<WorldEvent> {
    let distance = viewer_position.distance(env.target_point());
    env.set_glitch_intensity(intensity_at(distance, cfg.falloff_distance));

    if env.chaos_stopped() {
        env.target = TargetVisual::stopped();
        return None;
    }

    if distance < cfg.stop_distance && env.mark_chaos_stopped() {
        env.reset_buildings();
        env.background = Background::Black;
        silence(audio);
        // Turns green on the arrival tick itself rather than one tick later.
        env.target = TargetVisual::stopped();
        tracing::info!(distance, "Target reached, chaos stopped");
        return Some(WorldEvent::ChaosStopped { distance });
    }

    env.target = TargetVisual::active(env.glitch_intensity());
    None
}

fn silence<A: AudioChannel + ?Sized>(audio: &mut A) {
    audio.mute();
    if audio.is_playing() {
        audio.pause();
    }
    audio.disable();
}
