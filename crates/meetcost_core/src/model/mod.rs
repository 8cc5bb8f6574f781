//! Domain model types shared across services and repositories.
//!
//! # Responsibility
//! - Define the participant and meeting-history records and their
//!   invariant checks.
//! - Provide the validation error taxonomy surfaced at every entry point
//!   that accepts user-shaped data.
//!
//! # See also
//! - `crate::costing` for how these records turn into money.
//! - `crate::repo::history_repo` for how they are persisted.

pub mod meeting;
pub mod participant;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for user-shaped input.
///
/// Raised before any state changes; an operation that returns one of these
/// leaves registry, timer and history exactly as they were.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// Salary must be strictly positive (EUR).
    NonPositiveSalary { given: f64 },
    /// Salary field did not parse as a number.
    InvalidSalary { raw: String },
    /// Participant count field did not parse as a whole number.
    InvalidCount { raw: String },
    /// Rating outside the 1..=5 scale.
    RatingOutOfRange { given: u8 },
    /// Rating field did not parse as a whole number.
    InvalidRating { raw: String },
    /// Duration field is not of the form `HH:MM:SS`.
    InvalidDuration { raw: String },
    /// The operation needs at least one participant.
    NoParticipants,
    /// A stored participant count disagrees with the participant list.
    CountMismatch { recorded: usize, actual: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BlankName => write!(f, "name must not be blank"),
            ValidationError::NonPositiveSalary { given } => {
                write!(f, "annual salary must be greater than zero, got {given}")
            }
            ValidationError::InvalidSalary { raw } => {
                write!(f, "`{raw}` is not a valid salary")
            }
            ValidationError::InvalidCount { raw } => {
                write!(f, "`{raw}` is not a valid participant count")
            }
            ValidationError::RatingOutOfRange { given } => {
                write!(f, "rating must be between 1 and 5, got {given}")
            }
            ValidationError::InvalidRating { raw } => {
                write!(f, "`{raw}` is not a valid rating")
            }
            ValidationError::InvalidDuration { raw } => {
                write!(f, "`{raw}` is not a valid HH:MM:SS duration")
            }
            ValidationError::NoParticipants => {
                write!(f, "at least one participant is required")
            }
            ValidationError::CountMismatch { recorded, actual } => {
                write!(
                    f,
                    "participant count {recorded} does not match the {actual} listed participants"
                )
            }
        }
    }
}

impl Error for ValidationError {}
