//! The persisted `Group` record.
//!
//! Field names follow the stored JSON layout (`timerEnabled`, `createdAt`,
//! ...), so the serialized form of a `Group` is exactly one element of the
//! `groups` array.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Bundled alarm clips. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    #[default]
    Sound1,
    Sound2,
    Sound3,
}

impl AlarmSound {
    pub const ALL: [AlarmSound; 3] = [AlarmSound::Sound1, AlarmSound::Sound2, AlarmSound::Sound3];

    pub fn as_str(self) -> &'static str {
        match self {
            AlarmSound::Sound1 => "sound1",
            AlarmSound::Sound2 => "sound2",
            AlarmSound::Sound3 => "sound3",
        }
    }

    /// File name of the bundled clip inside the sounds directory.
    pub fn file_name(self) -> String {
        format!("{}.mp3", self.as_str())
    }
}

impl fmt::Display for AlarmSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmSound {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlarmSound::ALL
            .into_iter()
            .find(|sound| sound.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSound(s.to_string()))
    }
}

/// A named set of participants with optional timer/alarm configuration.
///
/// Created once by the editor and never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Turn order.
    pub members: Vec<String>,
    pub timer_enabled: bool,
    /// Always `None` when `timer_enabled` is false. Stored values that are
    /// not a positive whole number of seconds read back as `None`.
    #[serde(default, deserialize_with = "lenient_seconds::deserialize")]
    pub timer_seconds: Option<u32>,
    #[serde(default)]
    pub alarm_sound: AlarmSound,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Countdown length for each turn, if this group plays with a timer.
    ///
    /// A group saved with the timer switched on but no usable duration
    /// plays without a countdown.
    pub fn countdown_secs(&self) -> Option<u32> {
        if self.timer_enabled {
            self.timer_seconds.filter(|secs| *secs > 0)
        } else {
            None
        }
    }

    /// One-line timer summary for listings, e.g. `⏱ 30s • sound1`.
    pub fn timer_summary(&self) -> Option<String> {
        if !self.timer_enabled {
            return None;
        }
        let secs = self
            .timer_seconds
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "no duration".to_string());
        Some(format!("⏱ {secs} • {}", self.alarm_sound))
    }
}

/// Durations written by older clients may be any JSON value (`2.5`, `-5`,
/// `"30"`). Anything that is not a positive whole number of seconds
/// degrades to no duration.
mod lenient_seconds {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(Value::as_f64).and_then(whole_seconds))
    }

    fn whole_seconds(secs: f64) -> Option<u32> {
        if secs >= 1.0 && secs.fract() == 0.0 && secs <= f64::from(u32::MAX) {
            Some(secs as u32)
        } else {
            None
        }
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
