use std::f32::consts::{PI, TAU};

use glam::Vec3;

use stillpoint_city::movement::Viewer;
use stillpoint_core::input::InputState;

const WALK_KEY: &str = "KeyW";

/// Fold an angle into `[-PI, PI)`.
pub fn wrap_angle(radians: f32) -> f32 {
    (radians + PI).rem_euclid(TAU) - PI
}

/// Yaw at which walking forward heads from `from` straight to `to`.
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    (-d.x).atan2(-d.z)
}

/// Plays the host's part: synthesizes pointer motion and key presses that
/// turn the viewer toward a point and walk it there.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    target: Vec3,
    mouse_sensitivity: f32,
}

impl Autopilot {
    pub fn new(target: Vec3, mouse_sensitivity: f32) -> Self {
        Self {
            target,
            mouse_sensitivity,
        }
    }

    /// Pointer motion (in pixels) that turns `viewer` to face the target in one tick.
    pub fn pointer_dx_for(&self, viewer: &Viewer) -> f32 {
        if self.mouse_sensitivity == 0.0 {
            return 0.0;
        }
        let desired = yaw_towards(viewer.position, self.target);
        wrap_angle(viewer.yaw_radians - desired) / self.mouse_sensitivity
    }

    /// Feed this tick's events into `input`. Stops walking once `arrived`.
    pub fn steer(&self, viewer: &Viewer, arrived: bool, input: &mut InputState) {
        if arrived {
            input.on_key_up(WALK_KEY);
            return;
        }
        if !input.is_pointer_locked() {
            input.set_pointer_locked(true);
        }
        input.on_pointer_move(self.pointer_dx_for(viewer));
        input.on_key_down(WALK_KEY);
    }
}
