//! Streaming recognition source abstraction.
//!
//! The transcription engine itself is an external collaborator; this
//! module defines the seam the pipeline consumes it through, plus a
//! scripted implementation used by the integration tests and the
//! operator console.

use crate::error::{Result, VoiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// A transcription notification from the recognition engine.
///
/// Multiple events may describe the same utterance as it stabilizes
/// (interim, then final); only the final event may trigger classification.
#[derive(Debug, Clone)]
pub struct RecognitionEvent {
    /// Transcript text so far for the current utterance.
    pub transcript: String,
    /// Whether this is the stabilized, non-revisable text.
    pub is_final: bool,
}

/// An event from an active recognition session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A transcription result (interim or final).
    Result(RecognitionEvent),
    /// The engine reported a failure (permission denied, no audio, ...).
    Error(String),
    /// The session ended. Engines commonly end sessions after a period of
    /// silence or a provider-imposed limit; this is not an error.
    Ended,
}

/// A continuous, interim-enabled streaming recognition source.
///
/// `start` hands the engine a sender for session events; the engine emits
/// results, errors, and finally [`SessionEvent::Ended`] on it. `stop` is
/// cooperative: the engine acknowledges asynchronously and may still emit
/// a trailing `Ended` afterwards.
#[async_trait]
pub trait RecognitionSource: Send + Sync {
    /// Start a recognition session emitting events on `events`.
    async fn start(&self, events: mpsc::Sender<SessionEvent>) -> Result<()>;

    /// Request the active session stop. Cooperative, not immediate.
    async fn stop(&self) -> Result<()>;
}

/// A manually driven recognition source for tests and the console.
///
/// Each `start` stores the session's event sender; the driver then pushes
/// events through [`ScriptedSource::emit`]. Start attempts can be made to
/// fail ahead of time to exercise the restart-failure path.
#[derive(Default)]
pub struct ScriptedSource {
    session_tx: Mutex<Option<mpsc::Sender<SessionEvent>>>,
    start_failures: Mutex<VecDeque<String>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` call fail with `cause`.
    pub fn fail_next_start(&self, cause: impl Into<String>) {
        if let Ok(mut failures) = self.start_failures.lock() {
            failures.push_back(cause.into());
        }
    }

    /// Emit an event on the most recently started session.
    ///
    /// # Errors
    ///
    /// Returns an error if no session has been started or the receiving
    /// side is gone.
    pub async fn emit(&self, event: SessionEvent) -> Result<()> {
        let tx = self
            .session_tx
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| VoiceError::Recognition("no active session".to_owned()))?;
        tx.send(event)
            .await
            .map_err(|e| VoiceError::Channel(e.to_string()))
    }

    /// Emit an interim or final transcription result.
    ///
    /// # Errors
    ///
    /// Same as [`ScriptedSource::emit`].
    pub async fn emit_result(&self, transcript: impl Into<String>, is_final: bool) -> Result<()> {
        self.emit(SessionEvent::Result(RecognitionEvent {
            transcript: transcript.into(),
            is_final,
        }))
        .await
    }

    /// How many times `start` has succeeded.
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// How many times `stop` has been requested.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionSource for ScriptedSource {
    async fn start(&self, events: mpsc::Sender<SessionEvent>) -> Result<()> {
        let failure = self
            .start_failures
            .lock()
            .ok()
            .and_then(|mut failures| failures.pop_front());
        if let Some(cause) = failure {
            return Err(VoiceError::Recognition(cause));
        }

        if let Ok(mut guard) = self.session_tx.lock() {
            *guard = Some(events);
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        // Cooperative: keep the sender so a trailing Ended can still be
        // scripted after the stop request, as real engines do.
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[tokio::test]
    async fn scripted_source_delivers_emitted_events() {
        let source = ScriptedSource::new();
        let (tx, mut rx) = mpsc::channel(8);
        source.start(tx).await.unwrap();
        assert_eq!(source.start_count(), 1);

        source.emit_result("tony detener", true).await.unwrap();
        match rx.recv().await.unwrap() {
            SessionEvent::Result(ev) => {
                assert_eq!(ev.transcript, "tony detener");
                assert!(ev.is_final);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn emit_without_session_is_an_error() {
        let source = ScriptedSource::new();
        assert!(source.emit(SessionEvent::Ended).await.is_err());
    }

    #[tokio::test]
    async fn scripted_start_failure_fires_once() {
        let source = ScriptedSource::new();
        source.fail_next_start("no microphone");

        let (tx, _rx) = mpsc::channel(8);
        assert!(source.start(tx.clone()).await.is_err());
        assert_eq!(source.start_count(), 0);

        assert!(source.start(tx).await.is_ok());
        assert_eq!(source.start_count(), 1);
    }
}
