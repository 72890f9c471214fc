use serde::{Deserialize, Serialize};

use crate::scene::{CameraView, Scene};

/// Drawable area in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, treating a zero height as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Presents frames produced by the simulation.
///
/// Implemented by a graphics backend in a windowed host and by the headless
/// runner; the simulation never talks to a graphics API directly.
pub trait RenderSurface {
    /// Called on startup and whenever the host window is resized.
    fn configure_viewport(&mut self, viewport: Viewport);

    /// Called once per tick after all state updates.
    fn present(&mut self, scene: &Scene, camera: &CameraView);
}
