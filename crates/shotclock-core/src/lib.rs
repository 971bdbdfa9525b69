//! # Shot Clock Core Library
//!
//! Business logic for Shot Clock, a turn keeper for drinking games. The CLI
//! binary is a thin layer over this crate: everything it does goes through
//! the types exported here.
//!
//! ## Architecture
//!
//! - **Group Store**: an ordered list of [`Group`] records kept as one JSON
//!   document under the `groups` key of a SQLite key-value table
//! - **Group Editor**: transient form state that validates and appends a
//!   new group
//! - **Turn Engine**: an explicit `Idle / InTurn / AlarmRinging` state
//!   machine driven by `tick()`, `acknowledge()` and `advance()`
//! - **Alarm Player**: looping alarm and one-shot preview playback over a
//!   pluggable audio backend
//!
//! ## Key Components
//!
//! - [`TurnEngine`]: turn rotation and countdown state machine
//! - [`PlaySession`]: engine + alarm player + ticker for one play screen
//! - [`GroupStore`]: load/append/delete contract over a [`KeyValueStore`]
//! - [`GroupEditor`]: form state and the save path
//! - [`Config`]: TOML configuration

pub mod audio;
pub mod editor;
pub mod error;
pub mod events;
pub mod group;
pub mod session;
pub mod storage;
pub mod turn;

pub use audio::{AudioBackend, Clip, CommandBackend, PlaybackMode, SilentBackend, SoundPlayer};
pub use editor::{GroupEditor, GroupForm};
pub use error::{AudioError, ConfigError, CoreError, StoreError, ValidationError};
pub use events::{Event, TurnAction};
pub use group::{AlarmSound, Group};
pub use session::PlaySession;
pub use storage::{Config, Database, GroupStore, KeyValueStore};
pub use turn::{format_time, Ticker, TurnEngine, TurnState, TurnView, NO_TIMER_PLACEHOLDER};
