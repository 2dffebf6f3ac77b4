//! Movement service contract tests.
//!
//! Verify the exact HTTP wire format against a mock server: request
//! bodies and query parameters, tolerance for the service's loose
//! response framing (bare, `{ "data": ... }`, array), and error-body
//! `message` surfacing on non-2xx statuses.

use rover_voice::movements_api::MovementsClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn post_sends_id_movimiento_and_parses_bare_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movimientos"))
        .and(body_partial_json(json!({ "id_movimiento": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 17,
            "movimiento": "Vuelta adelante derecha",
            "fecha_hora": "2026-08-24T15:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let record = client.post_movement(4).await.expect("post should succeed");
    assert_eq!(record.id, Some(17));
    assert_eq!(record.movimiento, "Vuelta adelante derecha");
    assert!(record.fecha_hora.is_some());
}

#[tokio::test]
async fn post_succeeds_when_timestamp_is_not_rfc3339() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movimientos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "movimiento": "Detener",
            "fecha_hora": "2026-08-24 12:00:00"
        })))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let record = client.post_movement(3).await.expect("recorded movement must not fail on timestamp format");
    assert_eq!(record.movimiento, "Detener");
    assert_eq!(record.fecha_hora.as_deref(), Some("2026-08-24 12:00:00"));
    assert!(record.fecha_hora_parsed().is_none());
}

#[tokio::test]
async fn post_accepts_data_wrapped_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movimientos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "movimiento": "Detener" }
        })))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let record = client.post_movement(3).await.expect("post should succeed");
    assert_eq!(record.movimiento, "Detener");
}

#[tokio::test]
async fn post_error_surfaces_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movimientos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Motor desconectado"
        })))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let err = client.post_movement(1).await.expect_err("post should fail");
    assert_eq!(err.to_string(), "movement service error: Motor desconectado");
}

#[tokio::test]
async fn post_error_without_message_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/movimientos"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let err = client.post_movement(1).await.expect_err("post should fail");
    assert!(err.to_string().contains("Error HTTP 502"), "{err}");
}

#[tokio::test]
async fn latest_accepts_single_element_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "movimiento": "Atrás", "fecha_hora": "2026-08-24T15:31:00Z" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let record = client.latest().await.expect("latest should succeed");
    assert_eq!(record.movimiento, "Atrás");
}

#[tokio::test]
async fn recent_sends_count_and_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimos"))
        .and(query_param("n", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "movimiento": "Adelante" },
            { "movimiento": "Detener" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let rows = client.recent(20).await.expect("recent should succeed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].movimiento, "Adelante");
}

#[tokio::test]
async fn recent_accepts_data_wrapped_rows_with_alternate_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimos"))
        .and(query_param("n", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id_movimiento": 2, "descripcion": "Atrás" }
            ]
        })))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let rows = client.recent(5).await.expect("recent should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, Some(2));
    assert_eq!(rows[0].movimiento, "Atrás");
}

#[tokio::test]
async fn recent_error_surfaces_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movimientos/ultimos"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "sin registros"
        })))
        .mount(&server)
        .await;

    let client = MovementsClient::with_base_url(server.uri());
    let err = client.recent(10).await.expect_err("recent should fail");
    assert!(err.to_string().contains("sin registros"), "{err}");
}
