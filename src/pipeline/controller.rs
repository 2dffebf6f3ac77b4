//! The listening session controller.
//!
//! A single task owns all mutable pipeline state and serializes operator
//! commands, recognition session events, and dispatch outcomes through
//! one `select!` loop. Presentation layers observe it through read-only
//! snapshots (watch) and runtime events (broadcast); nothing else writes
//! the listening state.
//!
//! The critical resilience property lives here: real recognition engines
//! end sessions after silence or a provider-imposed limit, so an `Ended`
//! event while the operator still intends to listen triggers exactly one
//! restart, without transitioning through `Error` and without operator
//! action. Whether to restart is decided from the controller's own
//! "should listen" intent flag, never from engine state — a stray `Ended`
//! arriving after a toggle-initiated stop must not resurrect the session.

use crate::config::RoverConfig;
use crate::error::{Result, VoiceError};
use crate::movement::Movement;
use crate::movements_api::MovementsClient;
use crate::pipeline::messages::{DispatchOutcome, OperatorCommand};
use crate::recognizer::{RecognitionEvent, RecognitionSource, SessionEvent};
use crate::runtime::RuntimeEvent;
use crate::speech::ConfirmationSpeaker;
use crate::{gate, intent, normalize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Listening lifecycle state. Owned exclusively by the controller task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListeningState {
    /// Not listening. Initial state.
    #[default]
    Idle,
    /// A recognition session is active.
    Listening,
    /// Transient: the session reported an error. The controller resets to
    /// `Idle` immediately; it never stays here.
    Error,
}

/// Read-only mirror of the controller's displays.
#[derive(Debug, Clone, Default)]
pub struct ControllerSnapshot {
    /// Current listening state.
    pub state: ListeningState,
    /// Latest transcript heard, interim or final.
    pub last_heard: String,
    /// Last detected movement, as "{id} — {label}".
    pub detected: String,
    /// Action-in-progress or error text.
    pub action: String,
    /// Whether spoken confirmations are enabled.
    pub spoken_confirmations: bool,
}

/// Cloneable handle to a running controller task.
#[derive(Clone)]
pub struct ControllerHandle {
    cmd_tx: mpsc::Sender<OperatorCommand>,
    snapshot_rx: watch::Receiver<ControllerSnapshot>,
    events_tx: broadcast::Sender<RuntimeEvent>,
}

impl ControllerHandle {
    /// Toggle listening on/off.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller task has shut down.
    pub async fn toggle(&self) -> Result<()> {
        self.cmd_tx
            .send(OperatorCommand::Toggle)
            .await
            .map_err(|e| VoiceError::Channel(e.to_string()))
    }

    /// Enable or disable spoken confirmations.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller task has shut down.
    pub async fn set_spoken_confirmations(&self, enabled: bool) -> Result<()> {
        self.cmd_tx
            .send(OperatorCommand::SetSpokenConfirmations(enabled))
            .await
            .map_err(|e| VoiceError::Channel(e.to_string()))
    }

    /// Current display snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Watch receiver for display snapshots.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Subscribe to runtime events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events_tx.subscribe()
    }

    /// Broadcast sender, for wiring other tasks (e.g. the history poller)
    /// onto the same event stream.
    #[must_use]
    pub fn events(&self) -> broadcast::Sender<RuntimeEvent> {
        self.events_tx.clone()
    }
}

/// Spawn the controller task and return its handle.
///
/// The controller stops the recognition source and exits when `cancel`
/// fires.
pub fn spawn(
    config: RoverConfig,
    source: Arc<dyn RecognitionSource>,
    client: MovementsClient,
    speaker: Arc<dyn ConfirmationSpeaker>,
    cancel: CancellationToken,
) -> ControllerHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (session_tx, session_rx) = mpsc::channel(32);
    let (outcome_tx, outcome_rx) = mpsc::channel(8);
    let (events_tx, _) = broadcast::channel(64);

    let initial = ControllerSnapshot {
        spoken_confirmations: config.confirmation.enabled,
        ..ControllerSnapshot::default()
    };
    let (snapshot_tx, snapshot_rx) = watch::channel(initial.clone());

    let controller = Controller {
        config,
        source,
        client,
        speaker,
        cancel,
        events_tx: events_tx.clone(),
        snapshot_tx,
        session_tx,
        outcome_tx,
        snapshot: initial,
        should_listen: false,
        consumed: None,
    };
    tokio::spawn(controller.run(cmd_rx, session_rx, outcome_rx));

    ControllerHandle {
        cmd_tx,
        snapshot_rx,
        events_tx,
    }
}

struct Controller {
    config: RoverConfig,
    source: Arc<dyn RecognitionSource>,
    client: MovementsClient,
    speaker: Arc<dyn ConfirmationSpeaker>,
    cancel: CancellationToken,
    events_tx: broadcast::Sender<RuntimeEvent>,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
    /// Cloned into every session start so stray events from a stopped
    /// session still arrive here and hit the intent-flag guard.
    session_tx: mpsc::Sender<SessionEvent>,
    outcome_tx: mpsc::Sender<DispatchOutcome>,
    snapshot: ControllerSnapshot,
    /// The operator's intent, distinct from engine state.
    should_listen: bool,
    /// Transcript of the last consumed final event. A duplicate terminal
    /// event with the same text must not re-dispatch.
    consumed: Option<String>,
}

impl Controller {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::Receiver<OperatorCommand>,
        mut session_rx: mpsc::Receiver<SessionEvent>,
        mut outcome_rx: mpsc::Receiver<DispatchOutcome>,
    ) {
        info!(
            "listening controller started, wake word \"{}\"",
            self.config.recognition.wake_word
        );

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                Some(cmd) = cmd_rx.recv() => self.handle_command(cmd, &mut cmd_rx).await,
                Some(event) = session_rx.recv() => self.handle_session_event(event).await,
                Some(outcome) = outcome_rx.recv() => self.handle_outcome(outcome),
            }
        }

        if self.should_listen {
            let _ = self.source.stop().await;
        }
        info!("listening controller shut down");
    }

    async fn handle_command(
        &mut self,
        cmd: OperatorCommand,
        cmd_rx: &mut mpsc::Receiver<OperatorCommand>,
    ) {
        match cmd {
            OperatorCommand::Toggle => {
                self.toggle().await;
                // Toggles that queued while the transition was in progress
                // are dropped, mirroring a disable-then-re-enable control.
                loop {
                    match cmd_rx.try_recv() {
                        Ok(OperatorCommand::Toggle) => {
                            debug!("dropping toggle queued during transition");
                        }
                        Ok(other) => {
                            if let OperatorCommand::SetSpokenConfirmations(enabled) = other {
                                self.set_spoken_confirmations(enabled);
                            }
                        }
                        Err(_) => break,
                    }
                }
            }
            OperatorCommand::SetSpokenConfirmations(enabled) => {
                self.set_spoken_confirmations(enabled);
            }
        }
    }

    fn set_spoken_confirmations(&mut self, enabled: bool) {
        self.snapshot.spoken_confirmations = enabled;
        self.publish();
        info!("spoken confirmations {}", if enabled { "enabled" } else { "disabled" });
    }

    async fn toggle(&mut self) {
        if self.snapshot.state == ListeningState::Listening {
            self.should_listen = false;
            self.consumed = None;
            if let Err(e) = self.source.stop().await {
                warn!("stop request failed: {e}");
            }
            self.set_state(ListeningState::Idle);
            info!("listening stopped by operator");
            return;
        }

        self.should_listen = true;
        match self.source.start(self.session_tx.clone()).await {
            Ok(()) => {
                self.snapshot.detected.clear();
                self.snapshot.action.clear();
                self.set_state(ListeningState::Listening);
                info!("listening started");
                if self.snapshot.spoken_confirmations {
                    let readiness = self
                        .config
                        .confirmation
                        .readiness_for(&self.config.recognition.wake_word);
                    self.speak(readiness);
                }
            }
            Err(e) => {
                self.should_listen = false;
                warn!("failed to start recognition session: {e}");
                self.snapshot.action = format!("Error de micrófono: {e}");
                self.set_state(ListeningState::Idle);
                let _ = self.events_tx.send(RuntimeEvent::SessionError {
                    cause: e.to_string(),
                });
            }
        }
    }

    async fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Result(ev) => self.on_result(ev),
            SessionEvent::Error(cause) => {
                if !self.should_listen && self.snapshot.state == ListeningState::Idle {
                    debug!("ignoring session error after stop: {cause}");
                    return;
                }
                warn!("recognition session error: {cause}");
                self.should_listen = false;
                self.snapshot.action = format!("Error de micrófono: {cause}");
                // Through Error so observers see the failure, then
                // immediately back to Idle so the controls reset.
                self.set_state(ListeningState::Error);
                self.set_state(ListeningState::Idle);
                let _ = self.events_tx.send(RuntimeEvent::SessionError { cause });
            }
            SessionEvent::Ended => {
                if !self.should_listen {
                    debug!("session ended after stop request");
                    return;
                }
                debug!("recognition session ended unexpectedly, restarting");
                self.consumed = None;
                if let Err(e) = self.source.start(self.session_tx.clone()).await {
                    warn!("session restart failed: {e}");
                    self.should_listen = false;
                    self.snapshot.action = format!("Error de micrófono: {e}");
                    self.set_state(ListeningState::Idle);
                    let _ = self.events_tx.send(RuntimeEvent::SessionError {
                        cause: e.to_string(),
                    });
                }
            }
        }
    }

    fn on_result(&mut self, ev: RecognitionEvent) {
        if self.snapshot.state != ListeningState::Listening || !self.should_listen {
            return;
        }
        if ev.transcript.is_empty() {
            return;
        }

        self.snapshot.last_heard = ev.transcript.clone();
        self.publish();
        let _ = self.events_tx.send(RuntimeEvent::Heard {
            transcript: ev.transcript.clone(),
            is_final: ev.is_final,
        });

        // A fresh interim with different text means a new utterance has
        // begun; the consumed record no longer applies.
        if !ev.is_final && self.consumed.as_deref() != Some(ev.transcript.as_str()) {
            self.consumed = None;
        }

        let Some(phrase) = gate::extract_command_phrase_min(
            &ev.transcript,
            &self.config.recognition.wake_word,
            self.config.recognition.min_command_len,
        ) else {
            return;
        };

        // Finality is the sole dispatch gate.
        if !ev.is_final {
            return;
        }
        if self.consumed.as_deref() == Some(ev.transcript.as_str()) {
            debug!("duplicate final event ignored: {}", ev.transcript);
            return;
        }
        self.consumed = Some(ev.transcript.clone());

        let movement = intent::classify(&normalize::normalize(&phrase));
        info!("classified \"{phrase}\" as {movement}");
        self.snapshot.detected = movement.to_string();
        self.snapshot.action = format!("Ejecutando: {}", movement.label());
        self.publish();
        let _ = self.events_tx.send(RuntimeEvent::Detected { movement });

        self.dispatch(movement);
    }

    /// Dispatch a movement without blocking the controller loop. The
    /// spoken confirmation races the remote call by design; the status
    /// refresh is ordered strictly after POST success inside the task.
    fn dispatch(&self, movement: Movement) {
        let dispatch_id = Uuid::new_v4();
        debug!(dispatch = %dispatch_id, "dispatching {movement}");

        if self.snapshot.spoken_confirmations {
            self.speak(movement.confirmation().to_owned());
        }

        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let (result, refreshed) = match client.post_movement(movement.id()).await {
                Ok(record) => {
                    let refreshed = match client.latest().await {
                        Ok(latest) => Some(latest),
                        Err(e) => {
                            // Best-effort: the next successful refresh
                            // corrects the display.
                            debug!(dispatch = %dispatch_id, "status refresh failed: {e}");
                            None
                        }
                    };
                    (Ok(record), refreshed)
                }
                Err(e) => (Err(e.to_string()), None),
            };
            let _ = outcome_tx
                .send(DispatchOutcome {
                    id: dispatch_id,
                    movement,
                    result,
                    refreshed,
                })
                .await;
        });
    }

    fn handle_outcome(&mut self, outcome: DispatchOutcome) {
        match outcome.result {
            Ok(_) => {
                info!(
                    dispatch = %outcome.id,
                    "movement recorded: {}",
                    outcome.movement.label()
                );
                let _ = self.events_tx.send(RuntimeEvent::Dispatched {
                    movement: outcome.movement,
                });
                if let Some(record) = outcome.refreshed {
                    let _ = self.events_tx.send(RuntimeEvent::StatusRefreshed { record });
                }
            }
            Err(cause) => {
                warn!(dispatch = %outcome.id, "dispatch failed: {cause}");
                let _ = self.events_tx.send(RuntimeEvent::DispatchFailed {
                    movement: outcome.movement,
                    cause,
                });
            }
        }
    }

    /// Fire-and-forget confirmation speech.
    fn speak(&self, utterance: String) {
        let speaker = Arc::clone(&self.speaker);
        let locale = self.config.recognition.locale.clone();
        tokio::spawn(async move {
            if let Err(e) = speaker.speak(&utterance, &locale).await {
                warn!("confirmation speech failed: {e}");
            }
        });
    }

    fn set_state(&mut self, state: ListeningState) {
        let was_listening = self.snapshot.state == ListeningState::Listening;
        self.snapshot.state = state;
        self.publish();
        let listening = state == ListeningState::Listening;
        if listening != was_listening {
            let _ = self
                .events_tx
                .send(RuntimeEvent::ListeningChanged { listening });
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot.clone());
    }
}
