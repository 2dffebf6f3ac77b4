//! Spoken-confirmation collaborator seam.
//!
//! Playback mechanics live outside this crate; the pipeline only needs a
//! fire-and-forget speak contract. A new utterance cancels and replaces
//! any in-flight one.

use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Speaks short confirmation phrases to the operator.
#[async_trait]
pub trait ConfirmationSpeaker: Send + Sync {
    /// Speak `utterance` in `locale`, replacing any in-flight utterance.
    async fn speak(&self, utterance: &str, locale: &str) -> Result<()>;
}

/// Discards all utterances. Used when spoken confirmation is disabled and
/// in tests.
pub struct NullSpeaker;

#[async_trait]
impl ConfirmationSpeaker for NullSpeaker {
    async fn speak(&self, _utterance: &str, _locale: &str) -> Result<()> {
        Ok(())
    }
}

/// Logs utterances instead of playing them. Used by the operator console,
/// where actual synthesis is an external concern.
pub struct LoggingSpeaker;

#[async_trait]
impl ConfirmationSpeaker for LoggingSpeaker {
    async fn speak(&self, utterance: &str, locale: &str) -> Result<()> {
        info!("speaking ({locale}): {utterance}");
        Ok(())
    }
}
