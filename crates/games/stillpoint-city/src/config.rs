use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Eye height of the viewer above the floor.
pub const EYE_HEIGHT: f32 = 1.7;
/// Where the target cube sits unless configured otherwise.
pub const TARGET_POINT: Vec3 = Vec3::new(-5.0, EYE_HEIGHT, -15.0);

/// Upper bound on lattice steps per axis accepted by [`CityConfig::validate`].
pub const MAX_LATTICE_STEPS: f32 = 1000.0;

const CONFIG_ENV: &str = "STILLPOINT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/stillpoint.toml";

/// Failure to read or accept a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "cannot parse config: {e}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Lattice scatter parameters for the city and the dust around the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Half-width of the square footprint; cells span `[-half_extent, half_extent]`.
    pub half_extent: f32,
    /// Distance between lattice cells.
    pub spacing: f32,
    /// Chance that a cell gets a building.
    pub occupancy: f64,
    pub min_footprint: f32,
    pub max_footprint: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Chance that a building is lifted off the ground.
    pub float_chance: f64,
    pub min_float_offset: f32,
    pub max_float_offset: f32,
    /// Maximum horizontal offset from the cell center, per axis.
    pub jitter: f32,
    pub wireframe_chance: f64,
    pub particle_count: u32,
    pub particle_min_radius: f32,
    pub particle_max_radius: f32,
    /// Maximum vertical offset of a particle from the target.
    pub particle_spread_y: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            half_extent: 25.0,
            spacing: 3.0,
            occupancy: 0.8,
            min_footprint: 0.3,
            max_footprint: 1.3,
            min_height: 0.5,
            max_height: 8.5,
            float_chance: 0.6,
            min_float_offset: 3.0,
            max_float_offset: 11.0,
            jitter: 2.0,
            wireframe_chance: 0.5,
            particle_count: 100,
            particle_min_radius: 2.0,
            particle_max_radius: 5.0,
            particle_spread_y: 1.0,
        }
    }
}

/// Target placement and the distance ramp that drives glitch intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub target: [f32; 3],
    /// Distance at which intensity reaches zero.
    pub falloff_distance: f32,
    /// Strictly closer than this stops the chaos.
    pub stop_distance: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            target: TARGET_POINT.to_array(),
            falloff_distance: 20.0,
            stop_distance: 2.5,
        }
    }
}

impl ProximityConfig {
    pub fn target_point(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }
}

/// Per-building glitch burst tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Burst trigger chance per idle tick at zero intensity.
    pub base_chance: f64,
    /// Extra trigger chance per unit of intensity.
    pub intensity_chance: f64,
    pub min_burst_frames: u32,
    pub max_burst_frames: u32,
    /// Maximum per-tick displacement on X and Y while bursting.
    pub shake: f32,
    /// Chance a bursting building shows gray instead of white.
    pub gray_chance: f64,
    /// Background flicker chance per unit of intensity.
    pub flicker_chance: f64,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.01,
            intensity_chance: 0.05,
            min_burst_frames: 15,
            max_burst_frames: 34,
            shake: 0.4,
            gray_chance: 0.7,
            flicker_chance: 0.2,
        }
    }
}

/// Viewer walking and look parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance covered per tick.
    pub move_speed: f32,
    /// Radians of yaw per pixel of pointer motion.
    pub mouse_sensitivity: f32,
    pub eye_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            mouse_sensitivity: 0.002,
            eye_height: EYE_HEIGHT,
        }
    }
}

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Fixed seed for the random source; fresh entropy when absent.
    pub seed: Option<u64>,
    pub generation: GenerationConfig,
    pub proximity: ProximityConfig,
    pub glitch: GlitchConfig,
    pub movement: MovementConfig,
}

impl CityConfig {
    /// Load config from `$STILLPOINT_CONFIG` or `config/stillpoint.toml`.
    /// Falls back to defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make sampling panic or the lattice loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generation;
        let glitch = &self.glitch;

        let probabilities = [
            ("generation.occupancy", g.occupancy),
            ("generation.float_chance", g.float_chance),
            ("generation.wireframe_chance", g.wireframe_chance),
            ("glitch.base_chance", glitch.base_chance),
            ("glitch.intensity_chance", glitch.intensity_chance),
            // Intensity never exceeds 1, so this bounds the burst trigger chance.
            (
                "glitch.base_chance + glitch.intensity_chance",
                glitch.base_chance + glitch.intensity_chance,
            ),
            ("glitch.flicker_chance", glitch.flicker_chance),
            ("glitch.gray_chance", glitch.gray_chance),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} = {p} is not in [0, 1]")));
            }
        }

        if g.spacing.is_nan() || g.spacing <= 0.0 {
            return Err(ConfigError::Invalid("generation.spacing must be positive".to_string()));
        }
        if !g.half_extent.is_finite() || g.half_extent < 0.0 {
            return Err(ConfigError::Invalid(
                "generation.half_extent must be finite and not negative".to_string(),
            ));
        }
        let steps = 2.0 * g.half_extent / g.spacing;
        if steps > MAX_LATTICE_STEPS {
            return Err(ConfigError::Invalid(format!(
                "generation.spacing {} gives {steps} lattice steps per axis, limit is {MAX_LATTICE_STEPS}",
                g.spacing
            )));
        }

        let ranges = [
            ("generation.footprint", g.min_footprint, g.max_footprint),
            ("generation.height", g.min_height, g.max_height),
            ("generation.float_offset", g.min_float_offset, g.max_float_offset),
            ("generation.particle_radius", g.particle_min_radius, g.particle_max_radius),
        ];
        for (name, lo, hi) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ConfigError::Invalid(format!("{name} range {lo}..{hi} is empty")));
            }
        }

        let spreads = [
            ("generation.jitter", g.jitter),
            ("generation.particle_spread_y", g.particle_spread_y),
            ("glitch.shake", glitch.shake),
        ];
        for (name, v) in spreads {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be finite and >= 0")));
            }
        }

        if glitch.min_burst_frames > glitch.max_burst_frames {
            return Err(ConfigError::Invalid(
                "glitch.min_burst_frames exceeds glitch.max_burst_frames".to_string(),
            ));
        }

        let p = &self.proximity;
        if p.falloff_distance.is_nan() || p.falloff_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "proximity.falloff_distance must be positive".to_string(),
            ));
        }
        if !p.target.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid("proximity.target must be finite".to_string()));
        }
        Ok(())
    }
}
