pub mod city_gen;
pub mod config;
pub mod environment;
pub mod frame;
pub mod glitch;
pub mod movement;
pub mod proximity;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use stillpoint_core::audio::AudioChannel;
use stillpoint_core::input::InputSnapshot;

use city_gen::{generate_city, scatter_particles};
use config::CityConfig;
use environment::Environment;
use glitch::tick_glitch;
use movement::{Viewer, step_viewer};
use proximity::update_proximity;

/// Notable things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// The viewer reached the target; emitted exactly once per run.
    ChaosStopped { distance: f32 },
    /// A building began a glitch burst.
    GlitchBurst { index: usize, frames: u32 },
}

/// All simulation state: the generated city, the viewer and the random source.
pub struct World<R: Rng = StdRng> {
    config: CityConfig,
    environment: Environment,
    viewer: Viewer,
    rng: R,
    ticks: u64,
}

impl World<StdRng> {
    /// Build a world seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(config: CityConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> World<R> {
    /// Build a world drawing every random value from `rng`.
    pub fn with_rng(config: CityConfig, mut rng: R) -> Self {
        let target = config.proximity.target_point();
        let buildings = generate_city(&mut rng, &config.generation);
        let particles = scatter_particles(&mut rng, target, &config.generation);
        let viewer = Viewer::new(config.movement.eye_height);
        Self {
            environment: Environment::new(buildings, particles, target),
            viewer,
            rng,
            config,
            ticks: 0,
        }
    }

    /// One simulation step: movement, then proximity, then glitches.
    pub fn tick<A: AudioChannel + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        audio: &mut A,
    ) -> Vec<WorldEvent> {
        self.ticks += 1;
        let mut events = Vec::new();

        step_viewer(&mut self.viewer, input, &self.config.movement);

        if let Some(event) = update_proximity(
            &mut self.environment,
            self.viewer.position,
            audio,
            &self.config.proximity,
        ) {
            events.push(event);
        }

        if !self.environment.chaos_stopped() {
            tick_glitch(
                &mut self.environment,
                &mut self.rng,
                &self.config.glitch,
                &mut events,
            );
        }

        events
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn chaos_stopped(&self) -> bool {
        self.environment.chaos_stopped()
    }

    pub fn distance_to_target(&self) -> f32 {
        self.viewer.position.distance(self.environment.target_point())
    }
}
