//! History poller behavior tests: refresh on open, refresh on dispatch
//! nudge, and no traffic while the view is closed.

use rover_voice::config::HistoryConfig;
use rover_voice::history;
use rover_voice::movement::Movement;
use rover_voice::movements_api::MovementsClient;
use rover_voice::runtime::RuntimeEvent;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_refresh(events: &mut broadcast::Receiver<RuntimeEvent>) -> Vec<String> {
    timeout(Duration::from_secs(2), async {
        loop {
            if let RuntimeEvent::HistoryRefreshed { rows } =
                events.recv().await.expect("event stream closed")
            {
                return rows.into_iter().map(|r| r.movimiento).collect();
            }
        }
    })
    .await
    .expect("timed out waiting for history refresh")
}

#[tokio::test]
async fn opening_the_view_refreshes_and_dispatch_nudges() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimos"))
        .and(query_param("n", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "movimiento": "Adelante" }
        ])))
        .mount(&server)
        .await;

    let (events, _) = broadcast::channel(32);
    let mut rx = events.subscribe();
    let cancel = CancellationToken::new();
    let handle = history::spawn(
        MovementsClient::with_base_url(server.uri()),
        HistoryConfig {
            poll_interval_s: 60,
            fetch_count: 20,
        },
        events.clone(),
        cancel.clone(),
    );

    // Opening triggers an immediate refresh, no interval wait.
    handle.set_open(true);
    let rows = next_refresh(&mut rx).await;
    assert_eq!(rows, vec!["Adelante".to_owned()]);

    // A successful dispatch nudges another refresh while open.
    let _ = events.send(RuntimeEvent::Dispatched {
        movement: Movement::Forward,
    });
    next_refresh(&mut rx).await;

    cancel.cancel();
}

#[tokio::test]
async fn closed_view_generates_no_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (events, _) = broadcast::channel(32);
    let cancel = CancellationToken::new();
    let handle = history::spawn(
        MovementsClient::with_base_url(server.uri()),
        HistoryConfig {
            poll_interval_s: 60,
            fetch_count: 20,
        },
        events.clone(),
        cancel.clone(),
    );
    assert!(!handle.is_open());

    // Dispatches while the view is closed must not poll.
    let _ = events.send(RuntimeEvent::Dispatched {
        movement: Movement::Stop,
    });
    sleep(Duration::from_millis(100)).await;

    cancel.cancel();
    // MockServer verifies zero GETs on drop.
}
