//! Meeting history store.
//!
//! # Responsibility
//! - Keep the authoritative in-memory history collection and persist the
//!   whole collection after every mutation.
//! - Re-derive `cost` and `participants_count` on every write path.
//!
//! # Invariants
//! - Persisted state is always the full collection; readers never see a
//!   partially written document.
//! - A corrupt stored document never poisons the store: it recovers empty
//!   and says so through [`HistoryStore::recovered_from_corruption`].
//! - A failed persist keeps the in-memory mutation; the error tells the
//!   caller the write did not stick.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::{error, info, warn};

use crate::export::{render_csv, CsvExport};
use crate::model::meeting::{MeetingHistoryEntry, MeetingId};
use crate::model::ValidationError;
use crate::repo::history_repo::{HistoryRepository, RepoError};
use crate::service::{ConfirmOutcome, Confirmation};

pub type HistoryResult<T> = Result<T, HistoryStoreError>;

#[derive(Debug)]
pub enum HistoryStoreError {
    Validation(ValidationError),
    /// No stored entry has the requested id.
    EntryNotFound(MeetingId),
    /// The write and its single retry both failed. The in-memory
    /// collection kept the mutation.
    Persist(RepoError),
    /// The initial load failed below the recoverable level, for instance
    /// because the database is unreachable. Document corruption does not
    /// land here; it recovers as an empty store.
    Load(RepoError),
}

impl Display for HistoryStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryStoreError::Validation(err) => write!(f, "invalid meeting entry: {err}"),
            HistoryStoreError::EntryNotFound(id) => {
                write!(f, "no saved meeting with id {id}")
            }
            HistoryStoreError::Persist(err) => {
                write!(f, "history could not be persisted: {err}")
            }
            HistoryStoreError::Load(err) => {
                write!(f, "history could not be loaded: {err}")
            }
        }
    }
}

impl Error for HistoryStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HistoryStoreError::Validation(err) => Some(err),
            HistoryStoreError::EntryNotFound(_) => None,
            HistoryStoreError::Persist(err) | HistoryStoreError::Load(err) => Some(err),
        }
    }
}

impl From<ValidationError> for HistoryStoreError {
    fn from(err: ValidationError) -> Self {
        HistoryStoreError::Validation(err)
    }
}

/// History collection over a [`HistoryRepository`].
pub struct HistoryStore<R: HistoryRepository> {
    repo: R,
    entries: Vec<MeetingHistoryEntry>,
    recovered_from_corruption: bool,
}

impl<R: HistoryRepository> HistoryStore<R> {
    /// Opens the store, loading whatever the repository holds.
    ///
    /// A corrupt document is logged and recovered as an empty collection;
    /// storage-level failures are returned.
    pub fn open(repo: R) -> HistoryResult<Self> {
        match repo.load_entries() {
            Ok(entries) => {
                info!(
                    "event=history_load module=history status=ok entries={}",
                    entries.len()
                );
                Ok(Self {
                    repo,
                    entries,
                    recovered_from_corruption: false,
                })
            }
            Err(RepoError::Corrupt(details)) => {
                warn!(
                    "event=history_load module=history status=recovered \
                     reason=corrupt_document details={details}"
                );
                Ok(Self {
                    repo,
                    entries: Vec::new(),
                    recovered_from_corruption: true,
                })
            }
            Err(err) => {
                error!("event=history_load module=history status=error error={err}");
                Err(HistoryStoreError::Load(err))
            }
        }
    }

    /// Whether the last open found a corrupt document and started empty.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered_from_corruption
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[MeetingHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest-first; entries sharing a date keep insertion order.
    pub fn list_sorted_by_date_desc(&self) -> Vec<MeetingHistoryEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Validates `entry`, re-derives its computed fields, appends it and
    /// persists the collection. Returns the entry as stored.
    pub fn append(&mut self, mut entry: MeetingHistoryEntry) -> HistoryResult<MeetingHistoryEntry> {
        entry.derive_computed_fields();
        entry.validate()?;
        self.entries.push(entry.clone());
        self.persist()?;
        info!(
            "event=history_append module=history status=ok id={} entries={}",
            entry.id,
            self.entries.len()
        );
        Ok(entry)
    }

    /// Replaces the stored entry carrying `entry.id` with `entry`,
    /// re-deriving cost and participant count from the payload itself.
    /// Returns the entry as stored.
    ///
    /// # Errors
    /// [`HistoryStoreError::EntryNotFound`] when no stored entry matches;
    /// the collection is unchanged.
    pub fn update(&mut self, mut entry: MeetingHistoryEntry) -> HistoryResult<MeetingHistoryEntry> {
        entry.derive_computed_fields();
        entry.validate()?;
        let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry.id) else {
            return Err(HistoryStoreError::EntryNotFound(entry.id));
        };
        *slot = entry.clone();
        self.persist()?;
        info!(
            "event=history_update module=history status=ok id={}",
            entry.id
        );
        Ok(entry)
    }

    /// Removes the entry with `id` when confirmed. An absent id is a
    /// no-op that still counts as applied (with zero removed).
    pub fn delete(
        &mut self,
        id: MeetingId,
        confirmation: Confirmation,
    ) -> HistoryResult<ConfirmOutcome> {
        if confirmation == Confirmation::Declined {
            return Ok(ConfirmOutcome::Declined);
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()?;
            info!(
                "event=history_delete module=history status=ok id={id} entries={}",
                self.entries.len()
            );
        }
        Ok(ConfirmOutcome::Applied { removed })
    }

    /// The export artifact over the whole collection, or `None` when
    /// there is nothing to export.
    pub fn export(&self) -> Option<CsvExport> {
        if self.entries.is_empty() {
            return None;
        }
        Some(render_csv(&self.entries))
    }

    /// Persists the whole collection, retrying once before giving up.
    fn persist(&self) -> HistoryResult<()> {
        if let Err(first) = self.repo.save_entries(&self.entries) {
            warn!("event=history_persist module=history status=retry error={first}");
            if let Err(second) = self.repo.save_entries(&self.entries) {
                error!("event=history_persist module=history status=error error={second}");
                return Err(HistoryStoreError::Persist(second));
            }
        }
        Ok(())
    }
}
