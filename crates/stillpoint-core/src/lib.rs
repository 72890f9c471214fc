pub mod audio;
pub mod host;
pub mod input;
pub mod scene;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use glam::Vec4;

    use crate::audio::AudioChannel;
    use crate::host::{RenderSurface, Viewport};
    use crate::input::{InputSnapshot, InputSource};
    use crate::scene::{CameraView, RenderObject, Scene};

    /// Audio channel that counts every call it receives.
    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub playing: bool,
        pub muted: bool,
        pub disabled: bool,
        pub mute_calls: usize,
        pub unmute_calls: usize,
        pub play_calls: usize,
        pub pause_calls: usize,
        pub disable_calls: usize,
    }

    impl RecordingAudio {
        /// A channel whose soundtrack is already running.
        pub fn playing() -> Self {
            Self {
                playing: true,
                ..Default::default()
            }
        }
    }

    impl AudioChannel for RecordingAudio {
        fn mute(&mut self) {
            self.mute_calls += 1;
            self.muted = true;
        }

        fn unmute(&mut self) {
            self.unmute_calls += 1;
            self.muted = false;
        }

        fn play(&mut self) {
            self.play_calls += 1;
            self.playing = true;
        }

        fn pause(&mut self) {
            self.pause_calls += 1;
            self.playing = false;
        }

        fn disable(&mut self) {
            self.disable_calls += 1;
            self.disabled = true;
        }

        fn is_playing(&self) -> bool {
            self.playing
        }
    }

    /// Render surface that keeps a copy of the last presented frame.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub frames: usize,
        pub viewport: Option<Viewport>,
        pub last_camera: Option<CameraView>,
        pub last_background: Option<Vec4>,
        pub last_objects: Vec<RenderObject>,
    }

    impl RecordingSurface {
        /// Look up an object from the last frame by its scene name.
        pub fn named(&self, name: &str) -> Option<&RenderObject> {
            self.last_objects.iter().find(|o| o.name == Some(name))
        }
    }

    impl RenderSurface for RecordingSurface {
        fn configure_viewport(&mut self, viewport: Viewport) {
            self.viewport = Some(viewport);
        }

        fn present(&mut self, scene: &Scene, camera: &CameraView) {
            self.frames += 1;
            self.last_camera = Some(*camera);
            self.last_background = Some(scene.background);
            self.last_objects = scene.visible_objects().cloned().collect();
        }
    }

    /// Replays a fixed list of snapshots, then idles with no input.
    #[derive(Debug, Default)]
    pub struct ScriptedInput {
        queue: VecDeque<InputSnapshot>,
    }

    impl ScriptedInput {
        pub fn new(snapshots: impl IntoIterator<Item = InputSnapshot>) -> Self {
            Self {
                queue: snapshots.into_iter().collect(),
            }
        }

        /// Hold forward for `ticks` ticks.
        pub fn walk_forward(ticks: usize) -> Self {
            Self::new(std::iter::repeat_n(
                InputSnapshot {
                    forward: true,
                    ..Default::default()
                },
                ticks,
            ))
        }

        pub fn remaining(&self) -> usize {
            self.queue.len()
        }
    }

    impl InputSource for ScriptedInput {
        fn snapshot(&mut self) -> InputSnapshot {
            self.queue.pop_front().unwrap_or_default()
        }
    }
}
