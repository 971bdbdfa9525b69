use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::group::AlarmSound;
use crate::turn::TurnState;

/// How a turn ended. Both advance the turn the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    TakeShot,
    SkipTurn,
}

/// Every state change of a play session produces an Event.
/// The presentation layer renders from them; the session reacts to
/// `AlarmTriggered` and `AlarmCleared` by driving the alarm player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GroupLoaded {
        group_id: String,
        member_count: usize,
        countdown_secs: Option<u32>,
        at: DateTime<Utc>,
    },
    Tick {
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero.
    AlarmTriggered {
        player: String,
        sound: AlarmSound,
        at: DateTime<Utc>,
    },
    /// Alarm stopped by acknowledgment or by advancing the turn.
    AlarmCleared {
        at: DateTime<Utc>,
    },
    TurnAdvanced {
        action: TurnAction,
        from_index: usize,
        to_index: usize,
        round: u32,
        /// True when the turn order wrapped and a new round began.
        new_round: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TurnState,
        current_index: usize,
        round: u32,
        time_left: Option<u32>,
        at: DateTime<Utc>,
    },
}
