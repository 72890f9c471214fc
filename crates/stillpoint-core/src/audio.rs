/// Side channel to the host's ambient soundtrack.
///
/// The simulation only ever silences it; starting playback is the host UI's
/// job. `disable` is irreversible and every call must be safe to repeat.
pub trait AudioChannel {
    fn mute(&mut self);
    fn unmute(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn disable(&mut self);
    fn is_playing(&self) -> bool;
}

/// Ambient soundtrack state with the UI play/pause toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientAudio {
    playing: bool,
    muted: bool,
    disabled: bool,
}

impl AmbientAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// UI button: start (unmuted) when stopped, stop (muted) when playing.
    /// Returns whether the soundtrack is playing afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.disabled {
            tracing::debug!("Audio toggle ignored, channel disabled");
            return false;
        }
        if self.playing {
            self.pause();
            self.mute();
        } else {
            self.unmute();
            self.play();
        }
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the host should currently be producing sound.
    pub fn is_audible(&self) -> bool {
        self.playing && !self.muted
    }
}

impl AudioChannel for AmbientAudio {
    fn mute(&mut self) {
        self.muted = true;
    }

    fn unmute(&mut self) {
        if !self.disabled {
            self.muted = false;
        }
    }

    fn play(&mut self) {
        if !self.disabled {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn disable(&mut self) {
        if !self.disabled {
            tracing::debug!("Ambient audio disabled");
        }
        self.disabled = true;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
