//! Use-case service layer.
//!
//! # Responsibility
//! - Orchestrate model, cost model and persistence into the operations a
//!   presentation shell calls.
//! - Keep destructive operations behind explicit confirmation values.
//!
//! # See also
//! - `session::MeetingSession` for the single facade shells talk to.

pub mod history;
pub mod roster;
pub mod session;
pub mod timer;

/// An explicit user decision gating a destructive operation.
///
/// Passing [`Confirmation::Declined`] is always a no-op; callers collect
/// the answer however they like (dialog, prompt, flag) and hand the result
/// down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// What a confirmation-gated operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The operation ran; `removed` records left the collection.
    Applied { removed: usize },
    /// The user declined; nothing changed.
    Declined,
}
