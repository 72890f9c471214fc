use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::city_gen::Building;

/// Active-state opacity of the target cube at zero intensity.
pub const TARGET_BASE_OPACITY: f32 = 0.2;
/// Uniform scale of the target cube once chaos has stopped.
pub const TARGET_STOPPED_SCALE: f32 = 1.5;

/// The two dark tones the sky flickers between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    /// Pure black, the base tone.
    #[default]
    Black,
    /// Near-black `#111111`.
    Charcoal,
}

impl Background {
    pub fn hex(self) -> u32 {
        match self {
            Self::Black => 0x000000,
            Self::Charcoal => 0x111111,
        }
    }
}

/// How the target cube should look this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetVisual {
    pub opacity: f32,
    pub scale: f32,
    /// Green and solid once the chaos has been stopped, black otherwise.
    pub stabilized: bool,
}

impl TargetVisual {
    /// Fades in and grows with intensity while chaos is active.
    pub fn active(intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            opacity: TARGET_BASE_OPACITY + i * (1.0 - TARGET_BASE_OPACITY),
            scale: 1.0 + i,
            stabilized: false,
        }
    }

    pub fn stopped() -> Self {
        Self {
            opacity: 1.0,
            scale: TARGET_STOPPED_SCALE,
            stabilized: true,
        }
    }
}

impl Default for TargetVisual {
    fn default() -> Self {
        Self::active(0.0)
    }
}

/// Everything generated at startup plus the per-tick glitch scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub buildings: Vec<Building>,
    /// Dust points around the target; static.
    pub particles: Vec<Vec3>,
    target_point: Vec3,
    glitch_intensity: f32,
    chaos_stopped: bool,
    pub background: Background,
    pub target: TargetVisual,
}

impl Environment {
    pub fn new(buildings: Vec<Building>, particles: Vec<Vec3>, target_point: Vec3) -> Self {
        Self {
            buildings,
            particles,
            target_point,
            glitch_intensity: 0.0,
            chaos_stopped: false,
            background: Background::Black,
            target: TargetVisual::default(),
        }
    }

    pub fn target_point(&self) -> Vec3 {
        self.target_point
    }

    pub fn glitch_intensity(&self) -> f32 {
        self.glitch_intensity
    }

    /// Store a freshly derived intensity, re-clamped to `[0, 1]`.
    pub fn set_glitch_intensity(&mut self, intensity: f32) {
        self.glitch_intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
    }

    pub fn chaos_stopped(&self) -> bool {
        self.chaos_stopped
    }

    /// Flip the stop flag. Returns `true` only on the false→true edge.
    pub fn mark_chaos_stopped(&mut self) -> bool {
        !std::mem::replace(&mut self.chaos_stopped, true)
    }

    /// Put every building back at its origin with steady color, bursts cancelled.
    pub fn reset_buildings(&mut self) {
        for b in &mut self.buildings {
            b.settle();
        }
    }

    pub fn glitching_count(&self) -> usize {
        self.buildings.iter().filter(|b| b.is_glitching()).count()
    }
}
