//! Movement history poller.
//!
//! While the operator's history view is open, polls the recent-movements
//! query on a fixed interval and republishes the rows as
//! [`RuntimeEvent::HistoryRefreshed`]. A successful dispatch nudges an
//! immediate refresh so an open view updates without waiting out the
//! interval. Closed view, no traffic.

use crate::config::HistoryConfig;
use crate::movements_api::MovementsClient;
use crate::runtime::RuntimeEvent;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle controlling the history view flag.
#[derive(Clone)]
pub struct HistoryHandle {
    open_tx: watch::Sender<bool>,
}

impl HistoryHandle {
    /// Open or close the history view. Opening triggers an immediate
    /// refresh.
    pub fn set_open(&self, open: bool) {
        let _ = self.open_tx.send(open);
    }

    /// Whether the history view is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.open_tx.borrow()
    }
}

/// Spawn the history poller task.
///
/// Refreshed rows go out on `events`; the poller also listens on the same
/// stream for [`RuntimeEvent::Dispatched`] nudges.
pub fn spawn(
    client: MovementsClient,
    config: HistoryConfig,
    events: broadcast::Sender<RuntimeEvent>,
    cancel: CancellationToken,
) -> HistoryHandle {
    let (open_tx, mut open_rx) = watch::channel(false);
    let mut nudge_rx = events.subscribe();

    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(config.poll_interval_s.max(1)));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            let open = *open_rx.borrow();
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = open_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if *open_rx.borrow() {
                        refresh(&client, config.fetch_count, &events).await;
                    }
                }
                _ = tick.tick(), if open => {
                    refresh(&client, config.fetch_count, &events).await;
                }
                event = nudge_rx.recv() => {
                    match event {
                        Ok(RuntimeEvent::Dispatched { .. }) if open => {
                            debug!("dispatch nudge, refreshing history");
                            refresh(&client, config.fetch_count, &events).await;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!("history poller lagged {skipped} events");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
        debug!("history poller shut down");
    });

    HistoryHandle { open_tx }
}

async fn refresh(client: &MovementsClient, n: u32, events: &broadcast::Sender<RuntimeEvent>) {
    match client.recent(n).await {
        Ok(rows) => {
            let _ = events.send(RuntimeEvent::HistoryRefreshed { rows });
        }
        Err(e) => warn!("failed to load movement history: {e}"),
    }
}
