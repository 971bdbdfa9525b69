//! Alarm and preview playback.
//!
//! [`SoundPlayer`] owns at most one [`Clip`] at a time and never lets an
//! audio failure escape: errors are logged and the player falls back to
//! "not playing". Where the sound actually comes from is an
//! [`AudioBackend`].

mod backend;
mod player;

pub use backend::{CommandBackend, SilentBackend};
pub use player::SoundPlayer;

use crate::error::AudioError;
use crate::group::AlarmSound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Repeat until stopped. A second `play` is ignored.
    Loop,
    /// Play through once. A second `play` replaces the first.
    Once,
}

/// A loaded clip. `stop` halts playback; `unload` releases whatever the
/// clip holds (process, file handle). Both may be called more than once.
pub trait Clip {
    fn play(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
    fn unload(&mut self) -> Result<(), AudioError>;

    /// Whether playback ended on its own.
    fn is_finished(&mut self) -> bool {
        false
    }
}

pub trait AudioBackend {
    fn load(&mut self, sound: AlarmSound, mode: PlaybackMode) -> Result<Box<dyn Clip>, AudioError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn load(&mut self, sound: AlarmSound, mode: PlaybackMode) -> Result<Box<dyn Clip>, AudioError> {
        (**self).load(sound, mode)
    }
}
