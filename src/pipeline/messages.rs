//! Message types passed between the controller, its handle, and the
//! dispatch tasks.

use crate::movement::Movement;
use crate::movements_api::MovementRecord;
use uuid::Uuid;

/// An operator-facing control request.
#[derive(Debug, Clone)]
pub enum OperatorCommand {
    /// Toggle listening on/off. The only externally driven listening
    /// transition.
    Toggle,
    /// Enable or disable spoken confirmations.
    SetSpokenConfirmations(bool),
}

/// Outcome of one dispatch attempt, reported back to the controller loop.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Correlation id tying log lines of one attempt together.
    pub id: Uuid,
    /// The movement that was dispatched.
    pub movement: Movement,
    /// The recorded movement on success, or a human-readable cause.
    pub result: Result<MovementRecord, String>,
    /// Latest-movement record fetched strictly after a successful POST.
    /// `None` when the POST failed or the best-effort refresh did.
    pub refreshed: Option<MovementRecord>,
}
