use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, MAX_LATTICE_STEPS};

/// Tint of a building this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorState {
    /// Steady white.
    #[default]
    Normal,
    /// Dark gray shown during most glitch frames.
    GlitchGray,
}

/// Box extents of a building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// One scattered box in the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// At-rest position; every reset returns here.
    pub origin: Vec3,
    pub current_position: Vec3,
    pub color_state: ColorState,
    pub glitch_frames_remaining: u32,
    pub dimensions: Dimensions,
    pub floating: bool,
    pub wireframe: bool,
}

impl Building {
    pub fn new(origin: Vec3, dimensions: Dimensions, floating: bool, wireframe: bool) -> Self {
        Self {
            origin,
            current_position: origin,
            color_state: ColorState::Normal,
            glitch_frames_remaining: 0,
            dimensions,
            floating,
            wireframe,
        }
    }

    /// Snap back to origin and steady color. Position and color always move together.
    pub fn reset(&mut self) {
        self.current_position = self.origin;
        self.color_state = ColorState::Normal;
    }

    /// Reset and drop any burst still in progress.
    pub fn settle(&mut self) {
        self.reset();
        self.glitch_frames_remaining = 0;
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch_frames_remaining > 0
    }

    pub fn is_at_rest(&self) -> bool {
        self.current_position == self.origin && self.color_state == ColorState::Normal
    }
}

/// Lattice coordinates along one axis: `-half_extent, -half_extent + spacing, ...`
/// up to and including `half_extent` when it lands on the lattice.
fn lattice_axis(cfg: &GenerationConfig) -> impl Iterator<Item = f32> {
    let (half, spacing) = (cfg.half_extent, cfg.spacing);
    // Index-based to avoid accumulating float error across steps.
    (0..=lattice_steps(cfg)).map(move |i| -half + i as f32 * spacing)
}

/// Steps between the first and last cell on one axis. Saturates on absurd inputs.
fn lattice_steps(cfg: &GenerationConfig) -> u32 {
    ((2.0 * cfg.half_extent) / cfg.spacing + 1e-4).floor() as u32
}

/// Number of lattice cells the generator visits.
pub fn lattice_cell_count(cfg: &GenerationConfig) -> usize {
    let per_axis = (lattice_steps(cfg) as usize).saturating_add(1);
    per_axis.checked_mul(per_axis).unwrap_or(usize::MAX)
}

/// Scatter buildings over the lattice. Each cell rolls independently.
pub fn generate_city<R: Rng + ?Sized>(rng: &mut R, cfg: &GenerationConfig) -> Vec<Building> {
    // Unvalidated configs can describe absurd lattices; don't preallocate for them.
    let max_cells = (MAX_LATTICE_STEPS as usize + 1).pow(2);
    let mut buildings = Vec::with_capacity(lattice_cell_count(cfg).min(max_cells));

    for x in lattice_axis(cfg) {
        for z in lattice_axis(cfg) {
            if !rng.random_bool(cfg.occupancy) {
                continue;
            }
            buildings.push(generate_building(rng, cfg, x, z));
        }
    }

    tracing::info!(
        buildings = buildings.len(),
        cells = lattice_cell_count(cfg),
        "Generated city"
    );
    buildings
}

fn generate_building<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &GenerationConfig,
    cell_x: f32,
    cell_z: f32,
) -> Building {
    let dimensions = Dimensions {
        width: rng.random_range(cfg.min_footprint..=cfg.max_footprint),
        height: rng.random_range(cfg.min_height..=cfg.max_height),
        depth: rng.random_range(cfg.min_footprint..=cfg.max_footprint),
    };

    let mut y = dimensions.height / 2.0;
    let floating = rng.random_bool(cfg.float_chance);
    if floating {
        y += rng.random_range(cfg.min_float_offset..=cfg.max_float_offset);
    }

    let x = cell_x + rng.random_range(-cfg.jitter..=cfg.jitter);
    let z = cell_z + rng.random_range(-cfg.jitter..=cfg.jitter);
    let wireframe = rng.random_bool(cfg.wireframe_chance);

    Building::new(Vec3::new(x, y, z), dimensions, floating, wireframe)
}

/// Dust points in a ring around the target.
pub fn scatter_particles<R: Rng + ?Sized>(
    rng: &mut R,
    center: Vec3,
    cfg: &GenerationConfig,
) -> Vec<Vec3> {
    (0..cfg.particle_count)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let radius = rng.random_range(cfg.particle_min_radius..=cfg.particle_max_radius);
            let dy = rng.random_range(-cfg.particle_spread_y..=cfg.particle_spread_y);
            Vec3::new(
                center.x + angle.cos() * radius,
                center.y + dy,
                center.z + angle.sin() * radius,
            )
        })
        .collect()
}
