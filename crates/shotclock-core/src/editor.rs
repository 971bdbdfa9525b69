//! Group editor: unsaved form state and the save path.
//!
//! The form is deliberately forgiving. An empty name silently skips the
//! save, and an unusable timer duration degrades to "no timer" rather than
//! rejecting the group. The one hard rule is that a saved group has at
//! least one non-blank member.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audio::{AudioBackend, SoundPlayer};
use crate::error::{Result, ValidationError};
use crate::group::{AlarmSound, Group};
use crate::storage::{GroupStore, KeyValueStore};

/// Candidate values for a new group, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupForm {
    pub name: String,
    /// Never shorter than one slot.
    pub members: Vec<String>,
    pub timer_enabled: bool,
    pub timer_text: String,
    pub alarm_sound: AlarmSound,
}

impl Default for GroupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            members: vec![String::new()],
            timer_enabled: false,
            timer_text: String::new(),
            alarm_sound: AlarmSound::default(),
        }
    }
}

impl GroupForm {
    /// Turn the form into a group record.
    ///
    /// Returns `Ok(None)` when the name is blank.
    ///
    /// # Errors
    /// `NoMembers` when every member slot is blank.
    pub fn build(&self, id: String, created_at: DateTime<Utc>) -> Result<Option<Group>, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let members: Vec<String> = self
            .members
            .iter()
            .filter(|m| !m.trim().is_empty())
            .cloned()
            .collect();
        if members.is_empty() {
            return Err(ValidationError::NoMembers(name.to_string()));
        }

        let timer_seconds = if self.timer_enabled {
            self.timer_text.trim().parse::<u32>().ok().filter(|s| *s > 0)
        } else {
            None
        };

        Ok(Some(Group {
            id,
            name: name.to_string(),
            members,
            timer_enabled: self.timer_enabled,
            timer_seconds,
            alarm_sound: self.alarm_sound,
            created_at,
        }))
    }
}

/// Form state plus the one-shot preview player used while picking a sound.
pub struct GroupEditor<B: AudioBackend> {
    form: GroupForm,
    preview: SoundPlayer<B>,
}

impl<B: AudioBackend> GroupEditor<B> {
    pub fn new(preview_backend: B) -> Self {
        Self {
            form: GroupForm::default(),
            preview: SoundPlayer::preview(preview_backend),
        }
    }

    pub fn form(&self) -> &GroupForm {
        &self.form
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn add_member_field(&mut self) {
        self.form.members.push(String::new());
    }

    /// Drop the slot at `index`. The last remaining slot is kept.
    pub fn remove_member_field(&mut self, index: usize) {
        if self.form.members.len() <= 1 || index >= self.form.members.len() {
            return;
        }
        self.form.members.remove(index);
    }

    /// Returns false when `index` has no slot.
    pub fn set_member(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.form.members.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_timer_enabled(&mut self, enabled: bool) {
        self.form.timer_enabled = enabled;
    }

    pub fn set_timer_text(&mut self, text: impl Into<String>) {
        self.form.timer_text = text.into();
    }

    /// Choose the alarm and play it once as a preview.
    pub fn select_alarm(&mut self, sound: AlarmSound) {
        self.form.alarm_sound = sound;
        self.preview.play(sound);
    }

    pub fn previewing(&mut self) -> Option<AlarmSound> {
        self.preview.playing()
    }

    /// Build, append and reset. Returns the saved group, or `None` when the
    /// name was blank and nothing was saved.
    ///
    /// # Errors
    /// Fails when no member is filled in, or when the store cannot be
    /// written. The form is kept in both cases.
    pub fn save<S: KeyValueStore>(&mut self, store: &GroupStore<S>) -> Result<Option<Group>> {
        let Some(group) = self.form.build(Uuid::new_v4().to_string(), now_millis())? else {
            tracing::debug!("group name is blank; nothing saved");
            return Ok(None);
        };
        if self.form.timer_enabled && group.timer_seconds.is_none() {
            tracing::warn!(
                text = %self.form.timer_text,
                "timer duration is not a positive number; saving without a countdown"
            );
        }
        store.append(group.clone())?;
        self.form = GroupForm::default();
        Ok(Some(group))
    }

    /// Leave the editor: stop and release any preview.
    pub fn close(&mut self) {
        self.preview.stop();
    }
}

/// Current time truncated to milliseconds, the precision the stored
/// timestamp keeps.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
