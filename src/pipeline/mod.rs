//! The voice intent pipeline.
//!
//! [`controller`] owns the listening session state machine; [`messages`]
//! holds the types passed between the controller, its handle, and the
//! dispatch tasks.

pub mod controller;
pub mod messages;

pub use controller::{ControllerHandle, ControllerSnapshot, ListeningState, spawn};
pub use messages::{DispatchOutcome, OperatorCommand};
