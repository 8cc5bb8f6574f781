//! Participant record.
//!
//! # Responsibility
//! - Define the participant entity embedded in the live registry and in
//!   saved meeting snapshots.
//! - Check participant invariants wherever one is created or loaded.
//!
//! # Invariants
//! - `id` is globally unique and never reassigned.
//! - `name` is non-blank, `annual_salary` is strictly positive EUR.
//! - Snapshots embed copies; a saved meeting never shares participant
//!   state with the live registry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ValidationError;

/// Stable participant identity.
pub type ParticipantId = Uuid;

/// One person attending the meeting, priced by annual gross salary.
///
/// Field names stay camelCase on the wire (`annualSalary`) so documents
/// written by earlier builds keep loading unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name, already trimmed.
    pub name: String,
    /// Annual gross salary in EUR.
    pub annual_salary: f64,
}

impl Participant {
    /// Creates a participant with a freshly generated id.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the name is blank or the salary
    /// is not strictly positive.
    pub fn new(name: impl Into<String>, annual_salary: f64) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, annual_salary)
    }

    /// Creates a participant with a caller-provided id.
    ///
    /// Meant for paths where identity already exists, such as rebuilding
    /// records from storage.
    pub fn with_id(
        id: ParticipantId,
        name: impl Into<String>,
        annual_salary: f64,
    ) -> Result<Self, ValidationError> {
        let participant = Self {
            id,
            name: name.into().trim().to_string(),
            annual_salary,
        };
        participant.validate()?;
        Ok(participant)
    }

    /// Checks the participant invariants.
    ///
    /// # Errors
    /// - [`ValidationError::BlankName`] when the trimmed name is empty.
    /// - [`ValidationError::NonPositiveSalary`] when the salary is zero,
    ///   negative or not a number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !(self.annual_salary > 0.0) || !self.annual_salary.is_finite() {
            return Err(ValidationError::NonPositiveSalary {
                given: self.annual_salary,
            });
        }
        Ok(())
    }
}
