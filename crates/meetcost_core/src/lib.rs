//! Core domain logic for the meetcost meeting-cost tracker.
//!
//! The crate is the single source of truth for costing, timer and history
//! invariants. Presentation shells hold no state of their own; they drive
//! [`MeetingSession`] and render what it exposes.
//!
//! Layering, top to bottom:
//! - `service`: session facade, registry, timer, history store.
//! - `model` and `costing`: records, validation, money math.
//! - `repo` over `db`: document persistence in SQLite.

pub mod costing;
pub mod db;
pub mod export;
pub mod inputs;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use costing::{cost_per_second, total_cost, SECONDS_PER_HOUR, WORKING_HOURS_PER_YEAR};
pub use export::{render_csv, CsvExport, CSV_HEADER, EXPORT_FILE_NAME};
pub use inputs::{
    format_hms, parse_count, parse_hms, parse_rating, parse_salary_k_eur, validate_rating,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::meeting::{
    normalize_notes, MeetingDraft, MeetingHistoryEntry, MeetingId, DEFAULT_RATING, MAX_RATING,
    MIN_RATING,
};
pub use model::participant::{Participant, ParticipantId};
pub use model::ValidationError;
pub use repo::history_repo::{
    HistoryRepository, RepoError, RepoResult, SqliteHistoryRepository, HISTORY_STORAGE_KEY,
};
pub use service::history::{HistoryResult, HistoryStore, HistoryStoreError};
pub use service::roster::{ParticipantRoster, AUTO_NAME_PREFIX, K_EUR};
pub use service::session::{
    MeetingSession, SessionConfig, SessionError, SessionResult, StorageLocation,
    DEFAULT_DB_FILE_NAME,
};
pub use service::timer::{
    EndOutcome, TickMode, TimerController, TimerError, TimerPhase, TICK_INTERVAL,
};
pub use service::{ConfirmOutcome, Confirmation};

/// Version of the core crate.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
