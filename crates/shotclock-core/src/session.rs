//! One play screen: a [`TurnEngine`], its alarm player and its ticker.
//!
//! The engine decides, the session carries out the side effects: it starts
//! the looping alarm when the countdown hits zero, stops it on
//! acknowledgment or turn change, and keeps exactly one ticker scheduled
//! while a countdown runs.

use std::time::Duration;

use crate::audio::{AudioBackend, SoundPlayer};
use crate::error::ValidationError;
use crate::events::{Event, TurnAction};
use crate::group::Group;
use crate::storage::{GroupStore, KeyValueStore};
use crate::turn::{Ticker, TurnEngine, TurnView};

pub struct PlaySession<B: AudioBackend> {
    engine: TurnEngine,
    alarm: SoundPlayer<B>,
    ticker: Ticker,
}

impl<B: AudioBackend> PlaySession<B> {
    pub fn new(alarm_backend: B, tick_period: Duration) -> Self {
        Self {
            engine: TurnEngine::new(),
            alarm: SoundPlayer::alarm(alarm_backend),
            ticker: Ticker::new(tick_period),
        }
    }

    /// Resolve `group_id` in the store and load it. An unknown id (or an
    /// unplayable group) leaves the session idle.
    pub fn open<S: KeyValueStore>(
        store: &GroupStore<S>,
        group_id: &str,
        alarm_backend: B,
        tick_period: Duration,
    ) -> Self {
        let mut session = Self::new(alarm_backend, tick_period);
        match store.find(group_id) {
            Some(group) => {
                if let Err(err) = session.load(group) {
                    tracing::warn!(%group_id, error = %err, "group cannot be played");
                }
            }
            None => tracing::warn!(%group_id, "group not found; session stays idle"),
        }
        session
    }

    pub fn load(&mut self, group: Group) -> Result<Event, ValidationError> {
        self.alarm.stop();
        let event = self.engine.load(group)?;
        self.sync_ticker(true);
        Ok(event)
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.group().is_some()
    }

    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    pub fn view(&self) -> Option<TurnView> {
        self.engine.view()
    }

    pub fn alarm_playing(&mut self) -> bool {
        self.alarm.is_playing()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Wait for the next countdown tick. Pending forever when no countdown
    /// runs.
    pub async fn next_tick(&mut self) {
        self.ticker.tick().await;
    }

    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        if let Some(Event::AlarmTriggered { sound, ref player, .. }) = event {
            tracing::info!(%player, %sound, "time is up");
            self.alarm.play(sound);
        }
        self.sync_ticker(false);
        event
    }

    pub fn acknowledge(&mut self) -> Option<Event> {
        self.alarm.stop();
        self.engine.acknowledge()
    }

    pub fn take_shot(&mut self) -> Vec<Event> {
        self.advance(TurnAction::TakeShot)
    }

    pub fn skip_turn(&mut self) -> Vec<Event> {
        self.advance(TurnAction::SkipTurn)
    }

    pub fn advance(&mut self, action: TurnAction) -> Vec<Event> {
        self.alarm.stop();
        let events = self.engine.advance(action);
        self.sync_ticker(true);
        events
    }

    /// Leave the screen: silence the alarm and stop ticking.
    pub fn close(&mut self) {
        self.alarm.stop();
        self.ticker.cancel();
    }

    /// `reset` means `time_left` was just refilled and the period restarts.
    fn sync_ticker(&mut self, reset: bool) {
        if !self.engine.countdown_running() {
            self.ticker.cancel();
        } else if reset {
            self.ticker.rearm();
        } else {
            self.ticker.arm();
        }
    }
}

impl<B: AudioBackend> Drop for PlaySession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
