//! End-to-end flows through the session facade.

use meetcost_core::{
    ConfirmOutcome, Confirmation, EndOutcome, MeetingSession, SessionConfig, SessionError,
    SqliteHistoryRepository, StorageLocation, TickMode, TimerPhase, ValidationError,
    DEFAULT_RATING,
};
use uuid::Uuid;

fn session() -> MeetingSession<SqliteHistoryRepository> {
    MeetingSession::open(&SessionConfig::in_memory()).unwrap()
}

fn tick(session: &mut MeetingSession<SqliteHistoryRepository>, seconds: u64) {
    for _ in 0..seconds {
        session.tick();
    }
}

#[test]
fn starting_without_participants_is_rejected() {
    let mut session = session();
    match session.start() {
        Err(SessionError::Validation(ValidationError::NoParticipants)) => {}
        other => panic!("expected a no-participants rejection, got {other:?}"),
    }
    assert_eq!(session.phase(), TimerPhase::Idle);
}

#[test]
fn a_full_meeting_travels_from_roster_to_history() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    assert!((session.cost_per_second() - 0.027_778).abs() < 1e-5);

    session.start().unwrap();
    assert!(session.is_active());
    tick(&mut session, 3600);
    assert_eq!(session.time_in_seconds(), 3600);
    assert!((session.total_cost() - 100.0).abs() < 1e-9);

    assert_eq!(session.end().unwrap(), EndOutcome::AwaitingDisposition);
    let draft = session.pending_draft().unwrap();
    assert_eq!(draft.duration_in_seconds, 3600);
    assert!((draft.cost - 100.0).abs() < 1e-9);

    let saved = session
        .save_meeting("Architecture review", 4, "went long")
        .unwrap();
    assert!((saved.cost - 100.0).abs() < 1e-9);
    assert_eq!(saved.participants_count, 1);
    assert_eq!(saved.notes.as_deref(), Some("went long"));

    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.time_in_seconds(), 0);
    assert!(session.pending_draft().is_none());
    assert_eq!(session.history().len(), 1);
    // The live registry survives the save for the next meeting.
    assert_eq!(session.participants().len(), 1);
}

#[test]
fn roster_changes_mid_meeting_change_the_accrual() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 100);
    let solo_cost = session.total_cost();

    session.add_participant("Ben", 128.0).unwrap();
    // Same elapsed time, twice the salary pool.
    assert!((session.total_cost() - 2.0 * solo_cost).abs() < 1e-9);
}

#[test]
fn ending_with_nothing_accrued_resets_silently() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();

    assert_eq!(session.end().unwrap(), EndOutcome::DiscardedSilently);
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert!(session.pending_draft().is_none());
    assert!(session.history().is_empty());
}

#[test]
fn resume_cancels_the_pending_decision() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 5);
    session.end().unwrap();
    assert!(session.pending_draft().is_some());

    session.resume().unwrap();
    assert_eq!(session.phase(), TimerPhase::Running);
    assert!(session.pending_draft().is_none());
    assert_eq!(session.time_in_seconds(), 5);

    tick(&mut session, 1);
    assert_eq!(session.time_in_seconds(), 6);
}

#[test]
fn discard_drops_the_draft_and_saves_nothing() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 5);
    session.end().unwrap();

    session.discard_meeting().unwrap();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.time_in_seconds(), 0);
    assert!(session.history().is_empty());

    assert!(matches!(
        session.discard_meeting(),
        Err(SessionError::NoPendingDisposition)
    ));
}

#[test]
fn drafts_snapshot_participants_by_copy() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.add_participant("Ben", 96.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 10);
    session.end().unwrap();

    // Emptying the live registry must not touch the ended meeting.
    session.clear_participants(Confirmation::Confirmed);
    assert!(session.participants().is_empty());

    let draft = session.pending_draft().unwrap();
    assert_eq!(draft.participants.len(), 2);

    let saved = session.save_meeting("Standup", 3, "").unwrap();
    assert_eq!(saved.participants_count, 2);
    assert_eq!(saved.participants[0].name, "Ana");
}

#[test]
fn save_needs_a_pending_draft() {
    let mut session = session();
    assert!(matches!(
        session.save_meeting("Standup", 3, ""),
        Err(SessionError::NoPendingDisposition)
    ));
}

#[test]
fn a_rejected_save_keeps_the_draft_pending() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 5);
    session.end().unwrap();

    assert!(matches!(
        session.save_meeting("   ", 3, ""),
        Err(SessionError::Validation(ValidationError::BlankName))
    ));
    assert!(matches!(
        session.save_meeting("Standup", 0, ""),
        Err(SessionError::Validation(
            ValidationError::RatingOutOfRange { given: 0 }
        ))
    ));
    assert_eq!(session.phase(), TimerPhase::AwaitingDisposition);
    assert!(session.pending_draft().is_some());

    session.save_meeting("Standup", DEFAULT_RATING, "").unwrap();
    assert_eq!(session.history().len(), 1);
}

#[test]
fn blank_notes_are_saved_as_absent() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 5);
    session.end().unwrap();

    let saved = session.save_meeting("Standup", 3, "   ").unwrap();
    assert_eq!(saved.notes, None);
}

#[test]
fn the_draft_offers_a_dated_default_name() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 5);
    session.end().unwrap();

    let draft = session.pending_draft().unwrap();
    let expected = format!("Meeting - {}", draft.ended_at.format("%Y-%m-%d"));
    assert_eq!(draft.suggested_name(), expected);
    assert_eq!(DEFAULT_RATING, 3);
}

#[test]
fn history_survives_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        storage: StorageLocation::DataDir(dir.path().to_path_buf()),
        tick_mode: TickMode::Manual,
    };

    {
        let mut session = MeetingSession::open(&config).unwrap();
        session.add_participant("Ana", 128.0).unwrap();
        session.start().unwrap();
        tick(&mut session, 60);
        session.end().unwrap();
        session.save_meeting("Kickoff", 5, "notes here").unwrap();
    }

    let reopened = MeetingSession::open(&config).unwrap();
    assert_eq!(reopened.history().len(), 1);
    let entry = &reopened.history()[0];
    assert_eq!(entry.name, "Kickoff");
    assert_eq!(entry.rating, 5);
    assert_eq!(entry.duration_in_seconds, 60);
    assert_eq!(entry.notes.as_deref(), Some("notes here"));
    assert_eq!(entry.participants.len(), 1);
    // A new session starts with a fresh registry and an idle timer.
    assert!(reopened.participants().is_empty());
    assert_eq!(reopened.phase(), TimerPhase::Idle);
}

#[test]
fn saved_meetings_can_be_edited_and_deleted_through_the_facade() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 600);
    session.end().unwrap();
    let saved = session.save_meeting("Planning", 3, "").unwrap();

    let mut edited = saved.clone();
    edited.name = "Planning (extended)".to_string();
    edited.duration_in_seconds = 1200;
    let updated = session.update_meeting(edited).unwrap();
    assert!((updated.cost - 2.0 * saved.cost).abs() < 1e-9);

    let mut ghost = saved.clone();
    ghost.id = Uuid::new_v4();
    assert!(session.update_meeting(ghost).is_err());

    assert_eq!(
        session
            .delete_meeting(updated.id, Confirmation::Declined)
            .unwrap(),
        ConfirmOutcome::Declined
    );
    assert_eq!(session.history().len(), 1);

    assert_eq!(
        session
            .delete_meeting(updated.id, Confirmation::Confirmed)
            .unwrap(),
        ConfirmOutcome::Applied { removed: 1 }
    );
    assert!(session.history().is_empty());
}

#[test]
fn export_goes_through_the_facade() {
    let mut session = session();
    assert!(session.export_history().is_none());

    session.add_participant("Ana", 128.0).unwrap();
    session.start().unwrap();
    tick(&mut session, 60);
    session.end().unwrap();
    session.save_meeting("Kickoff", 4, "").unwrap();

    let export = session.export_history().unwrap();
    assert_eq!(export.file_name, "meeting_history.csv");
    assert!(export.content.lines().nth(1).unwrap().starts_with("\"Kickoff\","));
}

#[test]
fn clearing_participants_goes_through_confirmation() {
    let mut session = session();
    session.add_participant("Ana", 128.0).unwrap();

    assert_eq!(
        session.clear_participants(Confirmation::Declined),
        ConfirmOutcome::Declined
    );
    assert_eq!(session.participants().len(), 1);

    assert_eq!(
        session.clear_participants(Confirmation::Confirmed),
        ConfirmOutcome::Applied { removed: 1 }
    );
    assert!(session.participants().is_empty());
}

#[test]
fn removing_participants_via_the_facade_ignores_unknown_ids() {
    let mut session = session();
    let ana = session.add_participant("Ana", 128.0).unwrap();
    assert!(session.remove_participant(ana));
    assert!(!session.remove_participant(ana));
}
