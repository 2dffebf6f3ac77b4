//! Runtime events emitted by the pipeline for UI and observability.
//!
//! Intentionally lightweight: presentation layers (console, UI) render
//! notification text from these; the pipeline never blocks on a slow
//! consumer (broadcast, lossy).

use crate::movement::Movement;
use crate::movements_api::MovementRecord;

/// Events that describe what the pipeline is doing "right now".
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Listening was turned on or off (operator toggle or error reset).
    ListeningChanged { listening: bool },
    /// The recognition engine heard something (interim or final).
    Heard { transcript: String, is_final: bool },
    /// A command phrase was classified into a movement.
    Detected { movement: Movement },
    /// A movement was recorded by the movement service.
    Dispatched { movement: Movement },
    /// Recording a movement failed. Not retried.
    DispatchFailed { movement: Movement, cause: String },
    /// The latest-movement display was refreshed after a dispatch.
    StatusRefreshed { record: MovementRecord },
    /// The history view rows were refreshed.
    HistoryRefreshed { rows: Vec<MovementRecord> },
    /// The recognition session reported an error and listening reset.
    SessionError { cause: String },
}
