use clap::Subcommand;
use std::time::{Duration, Instant};

use shotclock_core::{AlarmSound, CommandBackend, Config, SoundPlayer};

use super::CmdResult;

#[derive(Subcommand)]
pub enum SoundAction {
    /// List the alarm sounds and where their clips are expected
    List,
    /// Play a sound once
    Preview {
        sound: AlarmSound,
        /// Stop the preview after at most this many seconds
        #[arg(long, default_value = "3")]
        seconds: u64,
    },
}

pub fn run(action: SoundAction) -> CmdResult {
    let config = Config::load()?;

    match action {
        SoundAction::List => {
            let backend = CommandBackend::from_config(&config);
            for sound in AlarmSound::ALL {
                let path = backend.clip_path(sound);
                let status = if path.is_file() { "ok" } else { "missing" };
                println!("{sound}  {}  [{status}]", path.display());
            }
            if !config.audio.enabled {
                println!("(audio is disabled: audio.enabled = false)");
            }
        }
        SoundAction::Preview { sound, seconds } => {
            let mut player = SoundPlayer::preview(CommandBackend::boxed_from_config(&config));
            if !player.play(sound) {
                return Err(format!("could not play {sound}; see `shotclock sound list`").into());
            }
            let deadline = Instant::now() + Duration::from_secs(seconds);
            while player.is_playing() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(50));
            }
            player.stop();
        }
    }
    Ok(())
}
