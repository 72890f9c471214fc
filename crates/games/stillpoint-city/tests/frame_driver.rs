//! End-to-end frame loop: input -> movement -> proximity -> glitch -> present.

use glam::Vec3;

use stillpoint_core::audio::{AmbientAudio, AudioChannel};
use stillpoint_core::host::Viewport;
use stillpoint_core::input::{InputSnapshot, InputState};
use stillpoint_core::scene::hex_color;
use stillpoint_core::test_helpers::{RecordingSurface, ScriptedInput};

use stillpoint_city::World;
use stillpoint_city::WorldEvent;
use stillpoint_city::city_gen::ColorState;
use stillpoint_city::config::CityConfig;
use stillpoint_city::frame::{FrameDriver, STABILIZER_NAME, TARGET_NAME, TARGET_SIZE};

fn seeded_driver(seed: u64) -> FrameDriver<RecordingSurface, AmbientAudio> {
    let world = World::new(CityConfig {
        seed: Some(seed),
        ..Default::default()
    });
    FrameDriver::new(
        world,
        RecordingSurface::default(),
        AmbientAudio::new(),
        Viewport::default(),
    )
}

/// Yaw that makes "forward" walk from `from` straight at `to`.
fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    (-d.x).atan2(-d.z)
}

#[test]
fn far_viewer_sees_faint_black_target() {
    let mut driver = seeded_driver(11);
    let target = driver.world().environment().target_point();
    driver.world_mut().viewer_mut().position = target + Vec3::new(25.0, 0.0, 0.0);

    let events = driver.frame(&mut ScriptedInput::default());
    assert!(!events.iter().any(|e| matches!(e, WorldEvent::ChaosStopped { .. })));

    let cube = driver.surface().named(TARGET_NAME).expect("target presented");
    assert_eq!(cube.material.color, hex_color(0x000000, 0.2));
    assert!((cube.transform.scale.x - TARGET_SIZE).abs() < 1e-6);
    assert!(driver.surface().named(STABILIZER_NAME).is_none());
}

#[test]
fn walking_to_target_stops_chaos_exactly_once() {
    let mut driver = seeded_driver(12);
    driver.audio_mut().toggle();
    assert!(driver.audio().is_audible());

    let start = driver.world().viewer().position;
    let target = driver.world().environment().target_point();
    driver.world_mut().viewer_mut().yaw_radians = yaw_towards(start, target);

    // sqrt(250) / 0.1 is about 158 ticks; keep walking well past the target.
    let mut input = ScriptedInput::walk_forward(400);
    let mut stops = 0;
    let mut stop_frame = None;
    for frame in 0..400 {
        let events = driver.frame(&mut input);
        for event in events {
            if let WorldEvent::ChaosStopped { distance } = event {
                assert!(distance < 2.5);
                stops += 1;
                stop_frame = Some(frame);
            }
        }
        if stop_frame.is_some() {
            assert!(driver.world().chaos_stopped());
        }
    }

    assert_eq!(stops, 1);
    let frame = stop_frame.expect("viewer reached the target");
    assert!((130..=140).contains(&frame), "stopped on frame {frame}");

    let audio = driver.audio();
    assert!(audio.is_disabled() && audio.is_muted() && !audio.is_playing());

    let surface = driver.surface();
    assert_eq!(surface.frames, 400);
    assert_eq!(surface.last_background, Some(hex_color(0x000000, 1.0)));
    let spheres = surface
        .last_objects
        .iter()
        .filter(|o| o.name == Some(STABILIZER_NAME))
        .count();
    assert_eq!(spheres, 1);
    let cube = surface.named(TARGET_NAME).expect("target presented");
    assert_eq!(cube.material.color, hex_color(0x00ff00, 1.0));

    let env = driver.world().environment();
    assert!(env.buildings.iter().all(|b| b.is_at_rest()));
    assert_eq!(env.glitching_count(), 0);
}

#[test]
fn audio_toggle_is_dead_after_stop() {
    let mut driver = seeded_driver(13);
    let target = driver.world().environment().target_point();
    driver.world_mut().viewer_mut().position = target;
    driver.frame(&mut ScriptedInput::default());

    assert!(!driver.audio_mut().toggle());
    assert!(!driver.audio().is_audible());
}

#[test]
fn near_target_the_city_glitches_visibly() {
    let mut driver = seeded_driver(14);
    let target = driver.world().environment().target_point();
    // Intensity 0.85, just outside the stop radius.
    driver.world_mut().viewer_mut().position = target + Vec3::new(3.0, 0.0, 0.0);

    let mut input = ScriptedInput::default();
    let mut bursts = 0;
    let mut saw_gray = false;
    let mut saw_displaced = false;
    for _ in 0..120 {
        bursts += driver
            .frame(&mut input)
            .iter()
            .filter(|e| matches!(e, WorldEvent::GlitchBurst { .. }))
            .count();
        let env = driver.world().environment();
        saw_gray |= env
            .buildings
            .iter()
            .any(|b| b.color_state == ColorState::GlitchGray);
        saw_displaced |= env.buildings.iter().any(|b| !b.is_at_rest());
    }

    assert!(!driver.world().chaos_stopped());
    assert!(bursts > 0);
    assert!(saw_gray && saw_displaced);

    let cube = driver.surface().named(TARGET_NAME).expect("target presented");
    assert!((cube.material.opacity() - (0.2 + 0.85 * 0.8)).abs() < 1e-4);
}

#[test]
fn host_input_state_drives_the_viewer() {
    let mut driver = seeded_driver(15);
    let mut input = InputState::new();
    input.set_pointer_locked(true);
    input.on_pointer_move(-100.0);
    input.on_key_down("KeyW");

    driver.frame(&mut input);
    let viewer = *driver.world().viewer();
    assert!((viewer.yaw_radians - 0.2).abs() < 1e-6);
    assert!((viewer.position.y - 1.7).abs() < 1e-6);

    // Pointer motion was consumed; only walking continues.
    input.on_key_up("KeyW");
    input.on_key_down("ArrowUp");
    driver.frame(&mut input);
    assert!((driver.world().viewer().yaw_radians - 0.2).abs() < 1e-6);

    let camera = driver.surface().last_camera.expect("camera presented");
    assert_eq!(camera.position, driver.world().viewer().position);
    assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
}

#[test]
fn idle_input_keeps_viewer_in_place() {
    let mut driver = seeded_driver(16);
    let before = *driver.world().viewer();
    let mut input = ScriptedInput::new([InputSnapshot::default(); 10]);
    for _ in 0..10 {
        driver.frame(&mut input);
    }
    assert_eq!(*driver.world().viewer(), before);
    assert_eq!(input.remaining(), 0);
}
