//! Live participant registry.
//!
//! # Responsibility
//! - Maintain the ordered set of participants for the meeting currently
//!   being costed.
//! - Validate additions and gate the destructive clear behind an explicit
//!   confirmation.
//!
//! # Invariants
//! - Insertion order of surviving participants is preserved across
//!   removals.
//! - Auto-generated names continue numbering from the live registry only;
//!   numbering restarts once those entries are gone.

use log::debug;

use crate::costing;
use crate::model::participant::{Participant, ParticipantId};
use crate::model::ValidationError;
use crate::service::{ConfirmOutcome, Confirmation};

/// Prefix of auto-generated bulk-add names.
pub const AUTO_NAME_PREFIX: &str = "Participant #";

/// Salary forms collect thousands of EUR; storage keeps EUR.
pub const K_EUR: f64 = 1000.0;

#[derive(Debug, Default)]
pub struct ParticipantRoster {
    participants: Vec<Participant>,
}

impl ParticipantRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one participant. `annual_salary_k_eur` is in thousands of EUR,
    /// as salary fields collect it.
    ///
    /// # Errors
    /// [`ValidationError::BlankName`] or
    /// [`ValidationError::NonPositiveSalary`]; the registry is unchanged on
    /// error.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        annual_salary_k_eur: f64,
    ) -> Result<ParticipantId, ValidationError> {
        let participant = Participant::new(name, annual_salary_k_eur * K_EUR)?;
        let id = participant.id;
        self.participants.push(participant);
        debug!(
            "event=roster_add module=roster status=ok participants={}",
            self.participants.len()
        );
        Ok(id)
    }

    /// Appends `count` auto-named participants sharing one average salary
    /// (thousands of EUR).
    ///
    /// Numbering continues after the auto-named entries already present;
    /// manually named participants are never renumbered. A count of zero
    /// adds nothing and succeeds.
    ///
    /// # Errors
    /// [`ValidationError::NonPositiveSalary`] when the average salary is
    /// invalid; no participant is added in that case.
    pub fn bulk_add(
        &mut self,
        count: u32,
        average_salary_k_eur: f64,
    ) -> Result<Vec<ParticipantId>, ValidationError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let existing_auto_named = self
            .participants
            .iter()
            .filter(|p| p.name.starts_with(AUTO_NAME_PREFIX))
            .count();
        let mut batch = Vec::with_capacity(count as usize);
        for offset in 0..count as usize {
            let name = format!("{AUTO_NAME_PREFIX}{}", existing_auto_named + offset + 1);
            batch.push(Participant::new(name, average_salary_k_eur * K_EUR)?);
        }
        let ids = batch.iter().map(|p| p.id).collect();
        self.participants.extend(batch);
        debug!(
            "event=roster_bulk_add module=roster status=ok added={count} participants={}",
            self.participants.len()
        );
        Ok(ids)
    }

    /// Removes the participant with `id`. Absent ids are ignored; returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        self.participants.len() != before
    }

    /// Empties the registry when explicitly confirmed.
    pub fn clear(&mut self, confirmation: Confirmation) -> ConfirmOutcome {
        match confirmation {
            Confirmation::Declined => ConfirmOutcome::Declined,
            Confirmation::Confirmed => {
                let removed = self.participants.len();
                self.participants.clear();
                debug!("event=roster_clear module=roster status=ok removed={removed}");
                ConfirmOutcome::Applied { removed }
            }
        }
    }

    /// Participants in insertion order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Joint accrual rate of the current registry in EUR per second.
    pub fn cost_per_second(&self) -> f64 {
        costing::cost_per_second(&self.participants)
    }

    /// Snapshot copies for embedding in a history entry.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.clone()
    }
}
