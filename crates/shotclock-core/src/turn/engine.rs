//! Turn engine implementation.
//!
//! The turn engine is a pure state machine. It has no clock and no audio:
//! the caller invokes `tick()` once per second and reacts to the events it
//! returns (see `PlaySession`).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --load--> InTurn --tick (time_left hits 0)--> AlarmRinging
//!                  ^                                     |
//!                  +------- acknowledge / advance -------+
//! ```
//!
//! `advance` is valid from both `InTurn` and `AlarmRinging` and restarts the
//! countdown for the next member.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{format_time, NO_TIMER_PLACEHOLDER};
use crate::error::ValidationError;
use crate::events::{Event, TurnAction};
use crate::group::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// No group loaded yet.
    Idle,
    /// A member is up; the countdown (if any) is running or has been
    /// acknowledged at zero.
    InTurn,
    /// Countdown hit zero and nobody has acknowledged it yet.
    AlarmRinging,
}

/// Render-ready state of the play screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnView {
    pub group_id: String,
    pub group_name: String,
    pub state: TurnState,
    pub current_player: String,
    pub current_index: usize,
    pub member_count: usize,
    pub round: u32,
    /// `MM:SS`, or `--:--` without a timer.
    pub clock: String,
    pub time_left: Option<u32>,
    pub alarm_ringing: bool,
}

#[derive(Debug, Clone)]
pub struct TurnEngine {
    group: Option<Group>,
    state: TurnState,
    current_index: usize,
    round: u32,
    /// Seconds left in the current turn. Only meaningful with a countdown.
    time_left: u32,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnEngine {
    pub fn new() -> Self {
        Self {
            group: None,
            state: TurnState::Idle,
            current_index: 0,
            round: 1,
            time_left: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Seconds remaining, or `None` when the group plays without a timer
    /// (or nothing is loaded).
    pub fn time_left(&self) -> Option<u32> {
        self.countdown_secs().map(|_| self.time_left)
    }

    pub fn current_player(&self) -> Option<&str> {
        self.group
            .as_ref()
            .and_then(|g| g.members.get(self.current_index))
            .map(String::as_str)
    }

    /// True while a tick would change anything.
    pub fn countdown_running(&self) -> bool {
        self.state == TurnState::InTurn && self.countdown_secs().is_some() && self.time_left > 0
    }

    pub fn clock_text(&self) -> String {
        match self.time_left() {
            Some(secs) => format_time(secs),
            None => NO_TIMER_PLACEHOLDER.to_string(),
        }
    }

    pub fn view(&self) -> Option<TurnView> {
        let group = self.group.as_ref()?;
        Some(TurnView {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            state: self.state,
            current_player: self.current_player().unwrap_or_default().to_string(),
            current_index: self.current_index,
            member_count: group.members.len(),
            round: self.round,
            clock: self.clock_text(),
            time_left: self.time_left(),
            alarm_ringing: self.state == TurnState::AlarmRinging,
        })
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            current_index: self.current_index,
            round: self.round,
            time_left: self.time_left(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session for `group`: first member, round 1, full countdown.
    ///
    /// # Errors
    /// A group without members is refused and the engine stays as it was.
    pub fn load(&mut self, group: Group) -> Result<Event, ValidationError> {
        if group.members.is_empty() {
            return Err(ValidationError::NoMembers(group.name));
        }
        let countdown = group.countdown_secs();
        let event = Event::GroupLoaded {
            group_id: group.id.clone(),
            member_count: group.members.len(),
            countdown_secs: countdown,
            at: Utc::now(),
        };
        self.time_left = countdown.unwrap_or(0);
        self.current_index = 0;
        self.round = 1;
        self.state = TurnState::InTurn;
        self.group = Some(group);
        Ok(event)
    }

    /// One second passed. Returns `AlarmTriggered` when the countdown
    /// reaches zero, `Tick` otherwise, and `None` when no countdown runs.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.countdown_running() {
            return None;
        }
        self.time_left -= 1;
        if self.time_left > 0 {
            return Some(Event::Tick {
                time_left: self.time_left,
                at: Utc::now(),
            });
        }

        self.state = TurnState::AlarmRinging;
        let group = self.group.as_ref()?;
        tracing::debug!(group = %group.id, "countdown reached zero");
        Some(Event::AlarmTriggered {
            player: self.current_player().unwrap_or_default().to_string(),
            sound: group.alarm_sound,
            at: Utc::now(),
        })
    }

    /// Silence a ringing alarm. The clock stays at zero until the next turn.
    pub fn acknowledge(&mut self) -> Option<Event> {
        if self.state != TurnState::AlarmRinging {
            return None;
        }
        self.state = TurnState::InTurn;
        Some(Event::AlarmCleared { at: Utc::now() })
    }

    /// Hand the turn to the next member, clearing any alarm first.
    pub fn advance(&mut self, action: TurnAction) -> Vec<Event> {
        let Some(group) = self.group.as_ref() else {
            return Vec::new();
        };
        let member_count = group.members.len();
        let countdown = group.countdown_secs();

        let mut events = Vec::with_capacity(2);
        events.extend(self.acknowledge());

        let from = self.current_index;
        let to = (from + 1) % member_count;
        let new_round = to == 0;
        if new_round {
            self.round += 1;
        }
        self.current_index = to;
        if let Some(secs) = countdown {
            self.time_left = secs;
        }
        self.state = TurnState::InTurn;

        events.push(Event::TurnAdvanced {
            action,
            from_index: from,
            to_index: to,
            round: self.round,
            new_round,
            at: Utc::now(),
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn countdown_secs(&self) -> Option<u32> {
        self.group.as_ref().and_then(Group::countdown_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::AlarmSound;
    use proptest::prelude::*;

    fn group(members: &[&str], timer: Option<u32>) -> Group {
        Group {
            id: "g".into(),
            name: "Friday".into(),
            members: members.iter().map(|m| m.to_string()).collect(),
            timer_enabled: timer.is_some(),
            timer_seconds: timer,
            alarm_sound: AlarmSound::Sound1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn starts_idle() {
        let mut engine = TurnEngine::new();
        assert_eq!(engine.state(), TurnState::Idle);
        assert!(engine.view().is_none());
        assert!(engine.tick().is_none());
        assert!(engine.advance(TurnAction::TakeShot).is_empty());
    }

    #[test]
    fn load_refuses_empty_member_list() {
        let mut engine = TurnEngine::new();
        let err = engine.load(group(&[], Some(10))).unwrap_err();
        assert_eq!(err, ValidationError::NoMembers("Friday".into()));
        assert_eq!(engine.state(), TurnState::Idle);
    }

    #[test]
    fn friday_scenario() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A", "B"], Some(10))).unwrap();
        assert_eq!(
            (engine.current_index(), engine.round(), engine.time_left()),
            (0, 1, Some(10))
        );

        for _ in 0..9 {
            assert!(matches!(engine.tick(), Some(Event::Tick { .. })));
        }
        let alarm = engine.tick();
        assert!(matches!(alarm, Some(Event::AlarmTriggered { ref player, .. }) if player == "A"));
        assert_eq!(engine.state(), TurnState::AlarmRinging);
        assert!(engine.tick().is_none());

        assert!(engine.acknowledge().is_some());
        assert_eq!(engine.state(), TurnState::InTurn);
        assert_eq!(engine.time_left(), Some(0));
        assert!(engine.acknowledge().is_none());
        assert!(engine.tick().is_none());

        engine.advance(TurnAction::TakeShot);
        assert_eq!(
            (engine.current_index(), engine.round(), engine.time_left()),
            (1, 1, Some(10))
        );
        assert!(engine.countdown_running());
    }

    #[test]
    fn advance_from_last_member_starts_new_round() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A", "B"], None)).unwrap();
        engine.advance(TurnAction::SkipTurn);
        assert_eq!(engine.current_index(), 1);
        let events = engine.advance(TurnAction::SkipTurn);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.round(), 2);
        assert!(matches!(
            events.as_slice(),
            [Event::TurnAdvanced { new_round: true, round: 2, .. }]
        ));
    }

    #[test]
    fn advance_while_ringing_clears_alarm() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A", "B", "C"], Some(1))).unwrap();
        engine.tick();
        assert_eq!(engine.state(), TurnState::AlarmRinging);
        let events = engine.advance(TurnAction::TakeShot);
        assert!(matches!(events[0], Event::AlarmCleared { .. }));
        assert!(matches!(events[1], Event::TurnAdvanced { to_index: 1, .. }));
        assert_eq!(engine.state(), TurnState::InTurn);
        assert_eq!(engine.time_left(), Some(1));
    }

    #[test]
    fn no_timer_shows_placeholder_and_never_rings() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A"], None)).unwrap();
        assert_eq!(engine.clock_text(), NO_TIMER_PLACEHOLDER);
        assert_eq!(engine.time_left(), None);
        assert!(engine.tick().is_none());
        assert_eq!(engine.state(), TurnState::InTurn);
    }

    #[test]
    fn enabled_timer_without_duration_plays_untimed() {
        let mut g = group(&["A", "B"], None);
        g.timer_enabled = true;
        let mut engine = TurnEngine::new();
        engine.load(g).unwrap();
        assert_eq!(engine.clock_text(), "--:--");
        assert!(!engine.countdown_running());
    }

    #[test]
    fn single_member_every_advance_is_a_new_round() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["Solo"], Some(5))).unwrap();
        engine.advance(TurnAction::TakeShot);
        engine.advance(TurnAction::TakeShot);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.round(), 3);
    }

    #[test]
    fn view_reflects_state() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A", "B"], Some(65))).unwrap();
        let view = engine.view().unwrap();
        assert_eq!(view.current_player, "A");
        assert_eq!(view.clock, "01:05");
        assert_eq!(view.member_count, 2);
        assert!(!view.alarm_ringing);
    }

    #[test]
    fn snapshot_captures_position_and_clock() {
        let mut engine = TurnEngine::new();
        engine.load(group(&["A", "B"], Some(3))).unwrap();
        engine.advance(TurnAction::SkipTurn);
        engine.tick();
        match engine.snapshot() {
            Event::StateSnapshot { state, current_index, round, time_left, .. } => {
                assert_eq!(state, TurnState::InTurn);
                assert_eq!((current_index, round, time_left), (1, 1, Some(2)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn n_advances_complete_one_round(n in 1usize..12, start in 0usize..12) {
            let names: Vec<String> = (0..n).map(|i| format!("m{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut engine = TurnEngine::new();
            engine.load(group(&refs, Some(3))).unwrap();
            for _ in 0..(start % n) {
                engine.advance(TurnAction::SkipTurn);
            }
            let (index, round) = (engine.current_index(), engine.round());
            for _ in 0..n {
                engine.advance(TurnAction::TakeShot);
            }
            prop_assert_eq!(engine.current_index(), index);
            prop_assert_eq!(engine.round(), round + 1);
        }
    }
}
