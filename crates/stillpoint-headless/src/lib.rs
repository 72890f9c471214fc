pub mod autopilot;
pub mod surface;

use stillpoint_city::WorldEvent;
use stillpoint_city::frame::FrameDriver;
use stillpoint_core::audio::AudioChannel;
use stillpoint_core::host::RenderSurface;
use stillpoint_core::input::InputState;

use autopilot::Autopilot;

/// Outcome of an autopilot run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    /// Frame (1-based) on which the chaos stopped, if it did.
    pub stopped_on: Option<u64>,
    pub final_distance: f32,
}

impl RunSummary {
    pub fn reached_target(&self) -> bool {
        self.stopped_on.is_some()
    }
}

/// Walk the viewer to the target, one frame at a time, for at most
/// `max_frames` frames. Returns as soon as the chaos stops.
pub fn run_autopilot<S, A>(driver: &mut FrameDriver<S, A>, max_frames: u64) -> RunSummary
where
    S: RenderSurface,
    A: AudioChannel,
{
    let world = driver.world();
    let pilot = Autopilot::new(
        world.environment().target_point(),
        world.config().movement.mouse_sensitivity,
    );
    let mut input = InputState::new();
    let mut stopped_on = None;
    let mut frames = 0;

    while frames < max_frames && stopped_on.is_none() {
        let world = driver.world();
        pilot.steer(world.viewer(), world.chaos_stopped(), &mut input);
        let events = driver.frame(&mut input);
        frames += 1;
        if events
            .iter()
            .any(|e| matches!(e, WorldEvent::ChaosStopped { .. }))
        {
            stopped_on = Some(frames);
        }
    }

    RunSummary {
        frames,
        stopped_on,
        final_distance: driver.world().distance_to_target(),
    }
}
