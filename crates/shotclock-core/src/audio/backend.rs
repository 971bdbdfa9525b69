use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use super::{AudioBackend, Clip, PlaybackMode};
use crate::error::AudioError;
use crate::group::AlarmSound;
use crate::storage::Config;

/// Plays clips by running an external player (`mpv` by default) on the
/// bundled files in the sounds directory.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    loop_args: Vec<String>,
    sounds_dir: PathBuf,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            loop_args: Vec::new(),
            sounds_dir: sounds_dir.into(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>, loop_args: Vec<String>) -> Self {
        self.args = args;
        self.loop_args = loop_args;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.audio.player.clone(), config.sounds_dir())
            .with_args(config.audio.args.clone(), config.audio.loop_args.clone())
    }

    /// Command backend, or a silent one when audio is switched off.
    pub fn boxed_from_config(config: &Config) -> Box<dyn AudioBackend> {
        if config.audio.enabled {
            Box::new(Self::from_config(config))
        } else {
            Box::new(SilentBackend)
        }
    }

    pub fn clip_path(&self, sound: AlarmSound) -> PathBuf {
        self.sounds_dir.join(sound.file_name())
    }
}

impl AudioBackend for CommandBackend {
    fn load(&mut self, sound: AlarmSound, mode: PlaybackMode) -> Result<Box<dyn Clip>, AudioError> {
        let path = self.clip_path(sound);
        if !path.is_file() {
            return Err(AudioError::MissingClip(path));
        }
        let mut args = self.args.clone();
        if mode == PlaybackMode::Loop {
            args.extend(self.loop_args.iter().cloned());
        }
        Ok(Box::new(ProcessClip {
            program: self.program.clone(),
            args,
            path,
            child: None,
        }))
    }
}

struct ProcessClip {
    program: String,
    args: Vec<String>,
    path: PathBuf,
    child: Option<Child>,
}

impl Clip for ProcessClip {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.child.is_some() {
            return Ok(());
        }
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };
        match child.kill() {
            Ok(()) => Ok(()),
            // Already exited on its own.
            Err(err) if err.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(err) => Err(AudioError::StopFailed(err)),
        }
    }

    fn unload(&mut self) -> Result<(), AudioError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if let Ok(None) = child.try_wait() {
            let _ = child.kill();
        }
        child.wait().map(|_| ()).map_err(AudioError::StopFailed)
    }

    fn is_finished(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(Some(_))))
    }
}

impl Drop for ProcessClip {
    fn drop(&mut self) {
        let _ = self.unload();
    }
}

/// Plays nothing. Used when audio is disabled in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

struct SilentClip(AlarmSound);

impl AudioBackend for SilentBackend {
    fn load(&mut self, sound: AlarmSound, _mode: PlaybackMode) -> Result<Box<dyn Clip>, AudioError> {
        Ok(Box::new(SilentClip(sound)))
    }
}

impl Clip for SilentClip {
    fn play(&mut self) -> Result<(), AudioError> {
        tracing::info!(sound = %self.0, "audio disabled; not playing");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn unload(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}
