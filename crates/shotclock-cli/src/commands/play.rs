//! Interactive play screen.
//!
//! Reads one command per line from stdin while the countdown ticks:
//! `shot`, `skip`, `ack` (or an empty line while the alarm rings), `quit`.

use clap::Args;
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use shotclock_core::{AudioBackend, CommandBackend, Config, Event, PlaySession, TurnView};

use super::{open_store, CmdResult};

#[derive(Args)]
pub struct PlayArgs {
    /// Group ID
    id: String,
    /// Emit JSON lines (events and state) instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Shot,
    Skip,
    Ack,
    Quit,
    Help,
}

fn parse_command(line: &str, ringing: bool) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "shot" | "s" => Some(Command::Shot),
        "skip" | "k" => Some(Command::Skip),
        "ack" | "a" => Some(Command::Ack),
        "" if ringing => Some(Command::Ack),
        "quit" | "q" | "exit" => Some(Command::Quit),
        "help" | "?" => Some(Command::Help),
        _ => None,
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'a Event>,
    view: &'a TurnView,
}

struct Screen {
    json: bool,
}

impl Screen {
    fn render(&self, view: &TurnView, events: &[Event]) -> CmdResult {
        if self.json {
            if events.is_empty() {
                println!("{}", serde_json::to_string(&Frame { event: None, view })?);
            }
            for event in events {
                println!("{}", serde_json::to_string(&Frame { event: Some(event), view })?);
            }
            return Ok(());
        }

        let dots: String = (0..view.member_count)
            .map(|i| if i == view.current_index { '●' } else { '○' })
            .collect();
        if view.alarm_ringing {
            println!(
                "[{}] TIME'S UP! {} drinks. Press Enter to stop the alarm.",
                view.clock, view.current_player
            );
        } else {
            println!(
                "[{}] Round {} · Turn: {}  {dots}",
                view.clock, view.round, view.current_player
            );
        }
        Ok(())
    }

    fn help(&self) {
        if !self.json {
            println!("commands: shot (s), skip (k), ack (a / Enter while ringing), quit (q)");
        }
    }
}

pub fn run(args: PlayArgs) -> CmdResult {
    let config = Config::load()?;
    let store = open_store()?;
    let backend = CommandBackend::boxed_from_config(&config);
    let session = PlaySession::open(
        &store,
        &args.id,
        backend,
        Duration::from_millis(config.play.tick_ms),
    );
    if !session.is_loaded() {
        // An unknown id leaves the session idle; that is not a failure.
        eprintln!("Loading... group not found or not playable: {}", args.id);
        return Ok(());
    }

    // Stdin is served by the blocking pool; only the timer driver is needed.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(play_loop(session, Screen { json: args.json }));
    // A pending stdin read lives on a blocking thread; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn play_loop<B: AudioBackend>(mut session: PlaySession<B>, screen: Screen) -> CmdResult {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if let Some(view) = session.view() {
        screen.render(&view, &[session.engine().snapshot()])?;
    }
    screen.help();

    loop {
        let events: Vec<Event> = tokio::select! {
            _ = session.next_tick() => session.tick().into_iter().collect(),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let ringing = session.engine().state() == shotclock_core::TurnState::AlarmRinging;
                match parse_command(&line, ringing) {
                    Some(Command::Shot) => session.take_shot(),
                    Some(Command::Skip) => session.skip_turn(),
                    Some(Command::Ack) => session.acknowledge().into_iter().collect(),
                    Some(Command::Quit) => break,
                    Some(Command::Help) => {
                        screen.help();
                        continue;
                    }
                    None => {
                        if !line.trim().is_empty() {
                            eprintln!("unknown command: {}", line.trim());
                        }
                        continue;
                    }
                }
            }
        };

        if let Some(view) = session.view() {
            screen.render(&view, &events)?;
        }
    }

    session.close();
    Ok(())
}
