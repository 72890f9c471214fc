use glam::Vec3;
use serde::{Deserialize, Serialize};

use stillpoint_core::input::InputSnapshot;
use stillpoint_core::scene::CameraView;

use crate::config::MovementConfig;

/// The first-person avatar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub position: Vec3,
    pub yaw_radians: f32,
}

impl Viewer {
    /// Standing at the world origin, facing -Z.
    pub fn new(eye_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, eye_height, 0.0),
            yaw_radians: 0.0,
        }
    }

    pub fn camera(&self) -> CameraView {
        CameraView::new(self.position, self.yaw_radians)
    }
}

/// Unit (or zero) direction in the viewer's local XZ plane. Forward is -Z.
pub fn local_direction(input: &InputSnapshot) -> Vec3 {
    let mut dir = Vec3::ZERO;
    if input.forward {
        dir.z -= 1.0;
    }
    if input.back {
        dir.z += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    dir.normalize_or_zero()
}

/// World-space displacement for one tick of walking.
pub fn displacement(input: &InputSnapshot, yaw: f32, move_speed: f32) -> Vec3 {
    let dir = local_direction(input);
    if dir == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let (sin, cos) = yaw.sin_cos();
    let forward = Vec3::new(sin, 0.0, cos);
    let right = Vec3::new(cos, 0.0, -sin);
    right * (dir.x * move_speed) + forward * (dir.z * move_speed)
}

/// Turn by horizontal pointer motion. The only writer of yaw.
pub fn apply_look(viewer: &mut Viewer, pointer_dx: f32, sensitivity: f32) {
    if pointer_dx.is_finite() {
        viewer.yaw_radians -= pointer_dx * sensitivity;
    }
}

/// Apply one tick of look and walk input, then pin the eye height.
pub fn step_viewer(viewer: &mut Viewer, input: &InputSnapshot, cfg: &MovementConfig) {
    apply_look(viewer, input.pointer_dx, cfg.mouse_sensitivity);
    viewer.position += displacement(input, viewer.yaw_radians, cfg.move_speed);
    viewer.position.y = cfg.eye_height;
}
