use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use stillpoint_city::World;
use stillpoint_city::config::CityConfig;
use stillpoint_city::frame::FrameDriver;
use stillpoint_core::audio::AmbientAudio;
use stillpoint_core::host::Viewport;
use stillpoint_headless::run_autopilot;
use stillpoint_headless::surface::TracingSurface;

const DEFAULT_MAX_FRAMES: u64 = 5000;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let max_frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_MAX_FRAMES);

    let config = CityConfig::load();
    tracing::info!(seed = ?config.seed, max_frames, "Stillpoint headless run starting");

    let world = World::new(config);
    let mut driver = FrameDriver::new(
        world,
        TracingSurface::new(),
        AmbientAudio::new(),
        Viewport::default(),
    );

    let summary = run_autopilot(&mut driver, max_frames);
    tracing::info!(
        frames = summary.frames,
        presented = driver.surface().frames(),
        stopped_on = ?summary.stopped_on,
        final_distance = summary.final_distance,
        "Run finished"
    );

    if summary.reached_target() {
        ExitCode::SUCCESS
    } else {
        tracing::warn!("Target not reached within {max_frames} frames");
        ExitCode::FAILURE
    }
}
