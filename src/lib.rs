//! Rover Voice: continuous-listening voice command front end for a
//! remotely operated rover.
//!
//! The operator speaks a wake word followed by a maneuver phrase; the
//! pipeline gates on the wake word, classifies the phrase into one of 11
//! fixed movement intents, and dispatches the intent to the remote
//! movement service while confirming it visually and aloud.
//!
//! # Architecture
//!
//! Streaming recognition events flow through independent stages connected
//! by async channels:
//!
//! Recognition source → Wake-word gate → Normalizer → Intent classifier
//! → Dispatcher → movement service + spoken confirmation
//!
//! The [`pipeline`] module owns the listening session controller: a single
//! task that serializes operator toggles, recognition events, and dispatch
//! outcomes into one coherent control flow, and that restarts the
//! recognition session whenever the engine ends it while the operator
//! still intends to listen.

pub mod config;
pub mod error;
pub mod gate;
pub mod history;
pub mod intent;
pub mod movement;
pub mod movements_api;
pub mod normalize;
pub mod paths;
pub mod pipeline;
pub mod recognizer;
pub mod runtime;
pub mod speech;

pub use config::RoverConfig;
pub use error::{Result, VoiceError};
pub use movement::Movement;
pub use movements_api::{MovementRecord, MovementsClient};
pub use pipeline::controller::{ControllerHandle, ControllerSnapshot, ListeningState};
pub use recognizer::{RecognitionEvent, RecognitionSource, ScriptedSource, SessionEvent};
pub use runtime::RuntimeEvent;
pub use speech::ConfirmationSpeaker;
