//! Participant registry coverage.

use meetcost_core::{
    ConfirmOutcome, Confirmation, ParticipantRoster, ValidationError, AUTO_NAME_PREFIX,
};

#[test]
fn add_trims_names_and_scales_salaries_to_eur() {
    let mut roster = ParticipantRoster::new();
    roster.add("  Ana  ", 85.5).unwrap();

    let participants = roster.participants();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].name, "Ana");
    assert_eq!(participants[0].annual_salary, 85_500.0);
}

#[test]
fn add_rejects_blank_names_and_bad_salaries() {
    let mut roster = ParticipantRoster::new();
    assert!(matches!(
        roster.add("   ", 50.0),
        Err(ValidationError::BlankName)
    ));
    assert!(matches!(
        roster.add("Ben", 0.0),
        Err(ValidationError::NonPositiveSalary { .. })
    ));
    assert!(matches!(
        roster.add("Ben", -12.0),
        Err(ValidationError::NonPositiveSalary { .. })
    ));
    assert!(roster.is_empty());
}

#[test]
fn bulk_add_numbers_after_existing_auto_names() {
    let mut roster = ParticipantRoster::new();
    roster.add("Ana", 100.0).unwrap();
    roster.add("Ben", 90.0).unwrap();

    roster.bulk_add(3, 90.0).unwrap();
    let names: Vec<&str> = roster.participants().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Ana",
            "Ben",
            "Participant #1",
            "Participant #2",
            "Participant #3"
        ]
    );
    assert!(roster
        .participants()
        .iter()
        .skip(2)
        .all(|p| p.annual_salary == 90_000.0));
}

#[test]
fn bulk_add_continues_counting_across_calls() {
    let mut roster = ParticipantRoster::new();
    roster.bulk_add(2, 70.0).unwrap();
    roster.bulk_add(2, 70.0).unwrap();

    let names: Vec<&str> = roster.participants().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Participant #1",
            "Participant #2",
            "Participant #3",
            "Participant #4"
        ]
    );
}

#[test]
fn bulk_numbering_restarts_once_auto_names_are_gone() {
    let mut roster = ParticipantRoster::new();
    let ids = roster.bulk_add(2, 70.0).unwrap();
    for id in ids {
        assert!(roster.remove(id));
    }
    roster.bulk_add(1, 70.0).unwrap();
    assert_eq!(roster.participants()[0].name, format!("{AUTO_NAME_PREFIX}1"));
}

#[test]
fn manually_named_participants_do_not_shift_numbering() {
    let mut roster = ParticipantRoster::new();
    roster.add("Part-timer", 40.0).unwrap();
    roster.bulk_add(1, 70.0).unwrap();
    // Only names with the generated prefix count.
    assert_eq!(roster.participants()[1].name, "Participant #1");
}

#[test]
fn bulk_add_of_zero_adds_nothing() {
    let mut roster = ParticipantRoster::new();
    let added = roster.bulk_add(0, 70.0).unwrap();
    assert!(added.is_empty());
    assert!(roster.is_empty());
}

#[test]
fn bulk_add_with_a_bad_salary_adds_no_one() {
    let mut roster = ParticipantRoster::new();
    roster.add("Ana", 100.0).unwrap();
    assert!(matches!(
        roster.bulk_add(3, 0.0),
        Err(ValidationError::NonPositiveSalary { .. })
    ));
    assert_eq!(roster.len(), 1);
}

#[test]
fn remove_preserves_order_and_ignores_unknown_ids() {
    let mut roster = ParticipantRoster::new();
    let ana = roster.add("Ana", 100.0).unwrap();
    roster.add("Ben", 90.0).unwrap();
    roster.add("Cleo", 80.0).unwrap();

    assert!(roster.remove(ana));
    assert!(!roster.remove(ana));

    let names: Vec<&str> = roster.participants().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ben", "Cleo"]);
}

#[test]
fn clear_is_gated_by_confirmation() {
    let mut roster = ParticipantRoster::new();
    roster.add("Ana", 100.0).unwrap();
    roster.add("Ben", 90.0).unwrap();

    assert_eq!(
        roster.clear(Confirmation::Declined),
        ConfirmOutcome::Declined
    );
    assert_eq!(roster.len(), 2);

    assert_eq!(
        roster.clear(Confirmation::Confirmed),
        ConfirmOutcome::Applied { removed: 2 }
    );
    assert!(roster.is_empty());
}

#[test]
fn rate_follows_registry_mutations() {
    let mut roster = ParticipantRoster::new();
    assert_eq!(roster.cost_per_second(), 0.0);

    roster.add("Ana", 128.0).unwrap();
    let solo = roster.cost_per_second();
    assert!((solo - 0.027_778).abs() < 1e-5);

    let ben = roster.add("Ben", 128.0).unwrap();
    assert!((roster.cost_per_second() - 2.0 * solo).abs() < 1e-12);

    roster.remove(ben);
    assert!((roster.cost_per_second() - solo).abs() < 1e-12);
}

#[test]
fn snapshots_are_copies() {
    let mut roster = ParticipantRoster::new();
    roster.add("Ana", 100.0).unwrap();

    let snapshot = roster.snapshot();
    roster.clear(Confirmation::Confirmed);

    assert!(roster.is_empty());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "Ana");
}
