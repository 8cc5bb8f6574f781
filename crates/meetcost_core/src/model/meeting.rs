//! Meeting history record and the pending-save draft.
//!
//! # Responsibility
//! - Define the persisted meeting entry with its derived fields.
//! - Define the draft snapshot carried between ending a meeting and
//!   deciding whether to keep it.
//!
//! # Invariants
//! - `cost` and `participants_count` are always re-derived from
//!   `participants` and `duration_in_seconds` on every write path.
//! - `rating` stays within 1..=5, `name` stays non-blank.
//! - Blank notes are stored as absent, never as an empty string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing;
use crate::model::participant::Participant;
use crate::model::ValidationError;

/// Stable meeting identity.
pub type MeetingId = Uuid;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Rating preselected when a save dialog opens.
pub const DEFAULT_RATING: u8 = 3;

/// One saved meeting.
///
/// Wire names are camelCase (`durationInSeconds`, `participantsCount`) and
/// `date` serializes as RFC 3339, matching the document layout earlier
/// builds persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingHistoryEntry {
    pub id: MeetingId,
    pub name: String,
    /// Star rating, 1..=5.
    pub rating: u8,
    /// Total cost in EUR, derived from participants and duration at the
    /// time of the last save.
    pub cost: f64,
    pub duration_in_seconds: u64,
    /// When the entry was saved.
    pub date: DateTime<Utc>,
    /// Always equals `participants.len()`.
    pub participants_count: usize,
    /// Snapshot copies of everyone present when the meeting ended.
    pub participants: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MeetingHistoryEntry {
    /// Builds the entry committed for `draft` at save time.
    ///
    /// Assigns a fresh id, stamps the current time and normalizes blank
    /// notes to absent.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the name is blank or the rating
    /// is out of range.
    pub fn from_draft(
        draft: &MeetingDraft,
        name: impl Into<String>,
        rating: u8,
        notes: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let entry = Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            rating,
            cost: draft.cost,
            duration_in_seconds: draft.duration_in_seconds,
            date: Utc::now(),
            participants_count: draft.participants.len(),
            participants: draft.participants.clone(),
            notes: normalize_notes(notes.into()),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Re-derives `cost` and `participants_count` from the entry's own
    /// participants and duration, and normalizes blank notes to absent.
    ///
    /// Called on every append and update so edits to salaries, duration
    /// or notes can never leave a stale total or a blank note behind.
    pub fn derive_computed_fields(&mut self) {
        self.participants_count = self.participants.len();
        self.cost = costing::total_cost(&self.participants, self.duration_in_seconds);
        self.notes = self.notes.take().and_then(normalize_notes);
    }

    /// Checks the structural invariants of the entry.
    ///
    /// Deliberately does not re-check `cost`: entries written by other
    /// builds may carry a total computed under different assumptions, and
    /// the next write path re-derives it anyway.
    ///
    /// # Errors
    /// - [`ValidationError::BlankName`] when the trimmed name is empty.
    /// - [`ValidationError::RatingOutOfRange`] outside 1..=5.
    /// - [`ValidationError::CountMismatch`] when `participants_count`
    ///   disagrees with the list.
    /// - Any participant failing its own validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange { given: self.rating });
        }
        if self.participants_count != self.participants.len() {
            return Err(ValidationError::CountMismatch {
                recorded: self.participants_count,
                actual: self.participants.len(),
            });
        }
        for participant in &self.participants {
            participant.validate()?;
        }
        Ok(())
    }
}

/// Snapshot captured when a meeting with accrued cost is ended.
///
/// Lives only until the user saves or discards; participants are copies,
/// so later registry edits cannot rewrite an ended meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingDraft {
    pub participants: Vec<Participant>,
    pub duration_in_seconds: u64,
    /// Total accrued at the moment the meeting was ended.
    pub cost: f64,
    /// When the meeting was ended; drives the suggested name.
    pub ended_at: DateTime<Utc>,
}

impl MeetingDraft {
    /// Name offered by save dialogs, `Meeting - YYYY-MM-DD`.
    pub fn suggested_name(&self) -> String {
        format!("Meeting - {}", self.ended_at.format("%Y-%m-%d"))
    }
}

/// Blank notes become absent.
pub fn normalize_notes(notes: String) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
