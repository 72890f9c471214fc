use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Key codes mapped to each movement direction (`KeyboardEvent.code` naming).
const FORWARD_KEYS: &[&str] = &["KeyW", "ArrowUp"];
const BACK_KEYS: &[&str] = &["KeyS", "ArrowDown"];
const LEFT_KEYS: &[&str] = &["KeyA", "ArrowLeft"];
const RIGHT_KEYS: &[&str] = &["KeyD", "ArrowRight"];

/// Directional and look input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Horizontal pointer motion since the previous tick, in CSS pixels.
    pub pointer_dx: f32,
}

/// Anything the frame driver can poll for one tick of input.
pub trait InputSource {
    fn snapshot(&mut self) -> InputSnapshot;
}

/// Keyboard/pointer state, written by host events between frames.
pub struct InputState {
    /// Keys currently held down.
    pub keys_down: HashSet<String>,
    /// Relative pointer motion accumulated since the last poll.
    pending_dx: f32,
    /// Motion only counts while the host holds pointer lock.
    pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            pending_dx: 0.0,
            pointer_locked: false,
        }
    }

    pub fn on_key_down(&mut self, code: impl Into<String>) {
        self.keys_down.insert(code.into());
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.keys_down.remove(code);
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.pending_dx = 0.0;
        }
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Called on pointer move with the event's `movementX`.
    pub fn on_pointer_move(&mut self, movement_x: f32) {
        if self.pointer_locked && movement_x.is_finite() {
            self.pending_dx += movement_x;
        }
    }

    pub fn is_key_down(&self, code: &str) -> bool {
        self.keys_down.contains(code)
    }

    fn any_down(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.is_key_down(c))
    }
}

impl InputSource for InputState {
    fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            forward: self.any_down(FORWARD_KEYS),
            back: self.any_down(BACK_KEYS),
            left: self.any_down(LEFT_KEYS),
            right: self.any_down(RIGHT_KEYS),
            pointer_dx: std::mem::take(&mut self.pending_dx),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
