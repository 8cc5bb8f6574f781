//! Meeting session facade.
//!
//! # Responsibility
//! - Expose the read models and the whole mutation surface a presentation
//!   shell needs, in one place.
//! - Wire registry, timer, cost model and history store together.
//!
//! # Invariants
//! - All state mutation funnels through this surface; shells never hold
//!   their own copy of session state.
//! - A pending disposition always carries participant copies taken at the
//!   moment the meeting ended.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use chrono::Utc;
use log::info;

use crate::costing;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::export::CsvExport;
use crate::model::meeting::{MeetingDraft, MeetingHistoryEntry, MeetingId};
use crate::model::participant::{Participant, ParticipantId};
use crate::model::ValidationError;
use crate::repo::history_repo::{HistoryRepository, SqliteHistoryRepository};
use crate::service::history::{HistoryStore, HistoryStoreError};
use crate::service::roster::ParticipantRoster;
use crate::service::timer::{EndOutcome, TickMode, TimerController, TimerError, TimerPhase};
use crate::service::{ConfirmOutcome, Confirmation};

/// Database file created inside a session's data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "meetcost.sqlite3";

/// Where a session persists its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// `meetcost.sqlite3` inside the given directory.
    DataDir(PathBuf),
    /// An explicit database file path.
    File(PathBuf),
    /// Volatile storage; nothing survives the session.
    InMemory,
}

/// Injected construction options for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub storage: StorageLocation,
    pub tick_mode: TickMode,
}

impl SessionConfig {
    /// Volatile storage with caller-driven ticks. The configuration tests
    /// run under.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageLocation::InMemory,
            tick_mode: TickMode::Manual,
        }
    }

    /// File storage under `dir` with the autonomous one-second ticker.
    pub fn at_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::DataDir(dir.into()),
            tick_mode: TickMode::Interval,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    Validation(ValidationError),
    Timer(TimerError),
    History(HistoryStoreError),
    Db(DbError),
    /// Save, discard or resume was called with no ended meeting pending.
    NoPendingDisposition,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Validation(err) => write!(f, "{err}"),
            SessionError::Timer(err) => write!(f, "{err}"),
            SessionError::History(err) => write!(f, "{err}"),
            SessionError::Db(err) => write!(f, "{err}"),
            SessionError::NoPendingDisposition => {
                write!(f, "no ended meeting is awaiting a decision")
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Validation(err) => Some(err),
            SessionError::Timer(err) => Some(err),
            SessionError::History(err) => Some(err),
            SessionError::Db(err) => Some(err),
            SessionError::NoPendingDisposition => None,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Validation(err)
    }
}

impl From<TimerError> for SessionError {
    fn from(err: TimerError) -> Self {
        SessionError::Timer(err)
    }
}

impl From<HistoryStoreError> for SessionError {
    fn from(err: HistoryStoreError) -> Self {
        SessionError::History(err)
    }
}

impl From<DbError> for SessionError {
    fn from(err: DbError) -> Self {
        SessionError::Db(err)
    }
}

/// The one object a shell drives.
pub struct MeetingSession<R: HistoryRepository> {
    roster: ParticipantRoster,
    timer: TimerController,
    history: HistoryStore<R>,
    draft: Option<MeetingDraft>,
}

impl MeetingSession<SqliteHistoryRepository> {
    /// Opens a session over SQLite storage described by `config`.
    pub fn open(config: &SessionConfig) -> SessionResult<Self> {
        let conn = match &config.storage {
            StorageLocation::DataDir(dir) => open_db(dir.join(DEFAULT_DB_FILE_NAME))?,
            StorageLocation::File(path) => open_db(path)?,
            StorageLocation::InMemory => open_db_in_memory()?,
        };
        Self::with_repository(SqliteHistoryRepository::new(conn), config.tick_mode)
    }
}

impl<R: HistoryRepository> MeetingSession<R> {
    /// Builds a session over any repository implementation.
    pub fn with_repository(repo: R, tick_mode: TickMode) -> SessionResult<Self> {
        let history = HistoryStore::open(repo)?;
        info!(
            "event=session_open module=session status=ok entries={} recovered={}",
            history.len(),
            history.recovered_from_corruption()
        );
        Ok(Self {
            roster: ParticipantRoster::new(),
            timer: TimerController::new(tick_mode),
            history,
            draft: None,
        })
    }

    // Read models.

    /// Live registry in insertion order.
    pub fn participants(&self) -> &[Participant] {
        self.roster.participants()
    }

    pub fn time_in_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    /// Accrual rate of the live registry in EUR per second.
    pub fn cost_per_second(&self) -> f64 {
        self.roster.cost_per_second()
    }

    /// Cost accrued so far, from the live registry and elapsed time.
    pub fn total_cost(&self) -> f64 {
        costing::total_cost(self.roster.participants(), self.timer.elapsed_seconds())
    }

    /// Saved meetings in insertion order.
    pub fn history(&self) -> &[MeetingHistoryEntry] {
        self.history.entries()
    }

    /// Saved meetings newest-first.
    pub fn history_sorted(&self) -> Vec<MeetingHistoryEntry> {
        self.history.list_sorted_by_date_desc()
    }

    /// The ended meeting awaiting save or discard, if any.
    pub fn pending_draft(&self) -> Option<&MeetingDraft> {
        self.draft.as_ref()
    }

    /// Whether opening found a corrupt history document and started empty.
    pub fn history_recovered_from_corruption(&self) -> bool {
        self.history.recovered_from_corruption()
    }

    // Registry operations.

    /// Adds one participant; salary in thousands of EUR.
    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        annual_salary_k_eur: f64,
    ) -> SessionResult<ParticipantId> {
        Ok(self.roster.add(name, annual_salary_k_eur)?)
    }

    /// Adds `count` auto-named participants sharing an average salary in
    /// thousands of EUR.
    pub fn bulk_add_participants(
        &mut self,
        count: u32,
        average_salary_k_eur: f64,
    ) -> SessionResult<Vec<ParticipantId>> {
        Ok(self.roster.bulk_add(count, average_salary_k_eur)?)
    }

    /// Removes a participant; absent ids are ignored.
    pub fn remove_participant(&mut self, id: ParticipantId) -> bool {
        self.roster.remove(id)
    }

    /// Empties the registry when confirmed.
    pub fn clear_participants(&mut self, confirmation: Confirmation) -> ConfirmOutcome {
        self.roster.clear(confirmation)
    }

    // Timer operations.

    /// Starts or resumes the meeting.
    ///
    /// # Errors
    /// - [`ValidationError::NoParticipants`] when the registry is empty.
    /// - A timer error when a disposition is pending.
    pub fn start(&mut self) -> SessionResult<()> {
        if self.roster.is_empty() {
            return Err(ValidationError::NoParticipants.into());
        }
        self.timer.start()?;
        Ok(())
    }

    /// Pauses the meeting; no-op unless running.
    pub fn pause(&mut self) {
        self.timer.pause();
    }

    /// Applies one manual tick. Meaningful under [`TickMode::Manual`];
    /// ignored outside the running phase.
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    /// Drains queued interval ticks into elapsed time; returns how many
    /// seconds were applied.
    pub fn poll_ticks(&mut self) -> u32 {
        self.timer.poll_ticks()
    }

    /// Ends the meeting. With accrued cost a draft becomes pending and
    /// awaits [`MeetingSession::save_meeting`] or
    /// [`MeetingSession::discard_meeting`]; otherwise everything resets
    /// silently.
    pub fn end(&mut self) -> SessionResult<EndOutcome> {
        let cost = self.total_cost();
        let duration = self.timer.elapsed_seconds();
        let outcome = self.timer.end(cost)?;
        self.draft = match outcome {
            EndOutcome::AwaitingDisposition => Some(MeetingDraft {
                participants: self.roster.snapshot(),
                duration_in_seconds: duration,
                cost,
                ended_at: Utc::now(),
            }),
            EndOutcome::DiscardedSilently => None,
        };
        Ok(outcome)
    }

    /// Cancels the pending disposition and resumes the meeting from its
    /// retained elapsed time.
    pub fn resume(&mut self) -> SessionResult<()> {
        self.timer.resume()?;
        self.draft = None;
        Ok(())
    }

    /// Commits the pending draft to history, then resets the timer.
    ///
    /// Blank notes are stored as absent. On a persist failure the entry
    /// still landed in the in-memory history and the timer resets; the
    /// returned error reports that the write did not stick.
    ///
    /// # Errors
    /// - [`SessionError::NoPendingDisposition`] with nothing to save.
    /// - A validation error for a blank name or out-of-range rating; the
    ///   draft stays pending in that case.
    pub fn save_meeting(
        &mut self,
        name: impl Into<String>,
        rating: u8,
        notes: impl Into<String>,
    ) -> SessionResult<MeetingHistoryEntry> {
        let draft = self
            .draft
            .as_ref()
            .ok_or(SessionError::NoPendingDisposition)?;
        let entry = MeetingHistoryEntry::from_draft(draft, name, rating, notes)?;
        match self.history.append(entry) {
            Ok(committed) => {
                self.draft = None;
                self.timer.resolve_disposition()?;
                info!(
                    "event=meeting_save module=session status=ok id={} duration_s={}",
                    committed.id, committed.duration_in_seconds
                );
                Ok(committed)
            }
            Err(err @ HistoryStoreError::Persist(_)) => {
                // Committed in memory; the disposition is resolved and the
                // degraded write surfaces as the error.
                self.draft = None;
                self.timer.resolve_disposition()?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Drops the pending draft without saving and resets the timer.
    pub fn discard_meeting(&mut self) -> SessionResult<()> {
        if self.draft.is_none() {
            return Err(SessionError::NoPendingDisposition);
        }
        self.draft = None;
        self.timer.resolve_disposition()?;
        info!("event=meeting_discard module=session status=ok");
        Ok(())
    }

    // History operations.

    /// Replaces a saved meeting wholesale; cost and participant count are
    /// re-derived from the payload.
    pub fn update_meeting(
        &mut self,
        entry: MeetingHistoryEntry,
    ) -> SessionResult<MeetingHistoryEntry> {
        Ok(self.history.update(entry)?)
    }

    /// Deletes a saved meeting when confirmed; absent ids remove nothing.
    pub fn delete_meeting(
        &mut self,
        id: MeetingId,
        confirmation: Confirmation,
    ) -> SessionResult<ConfirmOutcome> {
        Ok(self.history.delete(id, confirmation)?)
    }

    /// The CSV export artifact, or `None` when the history is empty.
    pub fn export_history(&self) -> Option<CsvExport> {
        self.history.export()
    }
}
