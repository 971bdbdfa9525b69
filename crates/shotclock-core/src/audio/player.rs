use super::{AudioBackend, Clip, PlaybackMode};
use crate::group::AlarmSound;

/// One playback slot over a backend.
///
/// The alarm uses a looping player; the editor's preview uses a one-shot
/// player. Each owns its clip independently and releases it on drop.
pub struct SoundPlayer<B: AudioBackend> {
    backend: B,
    mode: PlaybackMode,
    current: Option<(AlarmSound, Box<dyn Clip>)>,
}

impl<B: AudioBackend> SoundPlayer<B> {
    pub fn alarm(backend: B) -> Self {
        Self::new(backend, PlaybackMode::Loop)
    }

    pub fn preview(backend: B) -> Self {
        Self::new(backend, PlaybackMode::Once)
    }

    pub fn new(backend: B, mode: PlaybackMode) -> Self {
        Self {
            backend,
            mode,
            current: None,
        }
    }

    pub fn is_playing(&mut self) -> bool {
        self.playing().is_some()
    }

    /// The sound currently playing, if any. A one-shot clip that has run to
    /// its end is released here.
    pub fn playing(&mut self) -> Option<AlarmSound> {
        let finished = self.mode == PlaybackMode::Once
            && self
                .current
                .as_mut()
                .is_some_and(|(_, clip)| clip.is_finished());
        if finished {
            tracing::debug!("preview finished");
            self.stop();
        }
        self.current.as_ref().map(|(sound, _)| *sound)
    }

    /// Start `sound`. Returns whether a clip is now playing.
    ///
    /// A looping player that is already playing ignores the call; a one-shot
    /// player stops its current clip and starts the new one.
    pub fn play(&mut self, sound: AlarmSound) -> bool {
        if self.current.is_some() {
            match self.mode {
                PlaybackMode::Loop => return true,
                PlaybackMode::Once => self.stop(),
            }
        }

        let mut clip = match self.backend.load(sound, self.mode) {
            Ok(clip) => clip,
            Err(err) => {
                tracing::warn!(%sound, error = %err, "could not load sound");
                return false;
            }
        };
        if let Err(err) = clip.play() {
            tracing::warn!(%sound, error = %err, "could not play sound");
            let _ = clip.unload();
            return false;
        }
        tracing::debug!(%sound, mode = ?self.mode, "playback started");
        self.current = Some((sound, clip));
        true
    }

    /// Halt and release the current clip. The slot is cleared even when the
    /// backend fails, so the next `play` is never blocked.
    pub fn stop(&mut self) {
        let Some((sound, mut clip)) = self.current.take() else {
            return;
        };
        if let Err(err) = clip.stop() {
            tracing::warn!(%sound, error = %err, "could not stop sound");
        }
        if let Err(err) = clip.unload() {
            tracing::warn!(%sound, error = %err, "could not release sound");
        }
    }
}

impl<B: AudioBackend> Drop for SoundPlayer<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        fail_load: bool,
        fail_stop: bool,
        finished: Rc<RefCell<bool>>,
    }

    struct RecordedClip {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
        fail_stop: bool,
        finished: Rc<RefCell<bool>>,
    }

    impl Clip for RecordedClip {
        fn play(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().push(format!("play {}", self.name));
            Ok(())
        }
        fn stop(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().push(format!("stop {}", self.name));
            if self.fail_stop {
                return Err(AudioError::StopFailed(std::io::Error::other("device gone")));
            }
            Ok(())
        }
        fn unload(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().push(format!("unload {}", self.name));
            Ok(())
        }
        fn is_finished(&mut self) -> bool {
            *self.finished.borrow()
        }
    }

    impl AudioBackend for Recorder {
        fn load(&mut self, sound: AlarmSound, mode: PlaybackMode) -> Result<Box<dyn Clip>, AudioError> {
            if self.fail_load {
                return Err(AudioError::MissingClip(sound.file_name().into()));
            }
            self.log.borrow_mut().push(format!("load {sound} {mode:?}"));
            Ok(Box::new(RecordedClip {
                name: sound.to_string(),
                log: self.log.clone(),
                fail_stop: self.fail_stop,
                finished: self.finished.clone(),
            }))
        }
    }

    fn log(rec: &Recorder) -> Vec<String> {
        rec.log.borrow().clone()
    }

    #[test]
    fn looping_player_ignores_second_play() {
        let rec = Recorder::default();
        let mut player = SoundPlayer::alarm(rec.clone());
        assert!(player.play(AlarmSound::Sound1));
        assert!(player.play(AlarmSound::Sound2));
        assert_eq!(player.playing(), Some(AlarmSound::Sound1));
        assert_eq!(log(&rec), ["load sound1 Loop", "play sound1"]);
    }

    #[test]
    fn preview_replaces_current_clip() {
        let rec = Recorder::default();
        let mut player = SoundPlayer::preview(rec.clone());
        player.play(AlarmSound::Sound1);
        player.play(AlarmSound::Sound3);
        assert_eq!(player.playing(), Some(AlarmSound::Sound3));
        assert_eq!(
            log(&rec),
            [
                "load sound1 Once",
                "play sound1",
                "stop sound1",
                "unload sound1",
                "load sound3 Once",
                "play sound3",
            ]
        );
    }

    #[test]
    fn failed_stop_still_clears_and_releases() {
        let rec = Recorder {
            fail_stop: true,
            ..Recorder::default()
        };
        let mut player = SoundPlayer::alarm(rec.clone());
        player.play(AlarmSound::Sound2);
        player.stop();
        assert!(!player.is_playing());
        assert!(log(&rec).contains(&"unload sound2".to_string()));
        assert!(player.play(AlarmSound::Sound2));
    }

    #[test]
    fn load_failure_is_swallowed() {
        let rec = Recorder {
            fail_load: true,
            ..Recorder::default()
        };
        let mut player = SoundPlayer::alarm(rec);
        assert!(!player.play(AlarmSound::Sound1));
        assert!(!player.is_playing());
        player.stop();
    }

    #[test]
    fn finished_preview_is_released() {
        let rec = Recorder::default();
        let mut player = SoundPlayer::preview(rec.clone());
        player.play(AlarmSound::Sound2);
        assert!(player.is_playing());
        *rec.finished.borrow_mut() = true;
        assert_eq!(player.playing(), None);
        assert!(!player.is_playing());
        assert_eq!(log(&rec).last().map(String::as_str), Some("unload sound2"));
    }

    #[test]
    fn looping_player_is_not_reaped_early() {
        let rec = Recorder::default();
        let mut player = SoundPlayer::alarm(rec.clone());
        player.play(AlarmSound::Sound1);
        *rec.finished.borrow_mut() = true;
        assert!(player.is_playing());
    }

    #[test]
    fn drop_releases_clip() {
        let rec = Recorder::default();
        {
            let mut player = SoundPlayer::alarm(rec.clone());
            player.play(AlarmSound::Sound1);
        }
        assert_eq!(log(&rec).last().map(String::as_str), Some("unload sound1"));
    }
}
