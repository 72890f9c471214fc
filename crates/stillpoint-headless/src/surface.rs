use stillpoint_core::host::{RenderSurface, Viewport};
use stillpoint_core::scene::{CameraView, Scene};

/// Render surface with no output device: counts frames and traces each one.
#[derive(Debug, Default)]
pub struct TracingSurface {
    frames: u64,
    viewport: Viewport,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl RenderSurface for TracingSurface {
    fn configure_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn present(&mut self, scene: &Scene, camera: &CameraView) {
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            objects = scene.visible_objects().count(),
            x = camera.position.x,
            z = camera.position.z,
            yaw = camera.yaw,
            "Frame presented"
        );
    }
}
