//! Full overlay lifecycle over real HTTP.
//!
//! # Design
//! Starts the mock data store and the API server on random ports (the API
//! wired to the mock store through `RestStore`), then exercises every client
//! operation with ureq. This checks the client's request building and
//! envelope parsing against the real server, and the server's store calls
//! against the REST interface, in one pass.

use std::sync::Arc;

use axum::http::HeaderValue;
use overlay_client::{ClientError, CreateOverlay, HttpMethod, HttpResponse, OverlayClient, UpdateOverlay};
use overlay_store::{RestStore, StoreConfig};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data and the client interprets them.
fn execute(req: overlay_client::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let content_type = req.header("content-type").unwrap_or("application/json").to_string();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => agent.post(&req.url).content_type(&content_type).send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => agent.put(&req.url).content_type(&content_type).send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string()))
        .collect();
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse { headers, ..HttpResponse::new(status, body) }
}

/// Start the mock store and the API on one background runtime; return the
/// API's base URL.
fn start_servers(store_key: &str) -> String {
    let store_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let store_addr = store_listener.local_addr().unwrap();
    store_listener.set_nonblocking(true).unwrap();

    let api_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let api_addr = api_listener.local_addr().unwrap();
    api_listener.set_nonblocking(true).unwrap();

    let store = RestStore::new(&StoreConfig {
        url: format!("http://{store_addr}"),
        key: store_key.to_string(),
    });

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let store_listener = tokio::net::TcpListener::from_std(store_listener).unwrap();
            tokio::spawn(mock_store::serve(
                store_listener,
                mock_store::MockStore::with_api_key("anon-key"),
            ));

            let api_listener = tokio::net::TcpListener::from_std(api_listener).unwrap();
            let state = overlay_api::AppState::new(Arc::new(store));
            let app = overlay_api::app(state, HeaderValue::from_static("http://localhost:5173"));
            overlay_api::run(api_listener, app).await
        })
        .unwrap();
    });

    format!("http://{api_addr}")
}

#[test]
fn crud_lifecycle() {
    let client = OverlayClient::new(&start_servers("anon-key"));

    // Step 1: health.
    let message = client.parse_health(execute(client.build_health())).unwrap();
    assert_eq!(message, "API is running");

    // Step 2: list — should be empty.
    let response = execute(client.build_list_overlays());
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    let overlays = client.parse_list_overlays(response).unwrap();
    assert!(overlays.is_empty(), "expected empty list");

    // Step 3: create with defaults.
    let input = CreateOverlay {
        kind: Some("text".to_string()),
        content: Some("Integration test".to_string()),
        ..CreateOverlay::default()
    };
    let req = client.build_create_overlay(&input).unwrap();
    let created = client.parse_create_overlay(execute(req)).unwrap();
    assert_eq!(created.text("content"), Some("Integration test"));
    for (field, default) in [("position_x", 50), ("position_y", 50), ("width", 200), ("height", 100), ("font_size", 24)] {
        assert_eq!(created.get(field), Some(&serde_json::json!(default)), "{field}");
    }
    assert_eq!(created.text("color"), Some("#FFFFFF"));
    let id = created.id().to_string();

    // Step 4: a second overlay, created later.
    let input = CreateOverlay {
        kind: Some("image".to_string()),
        width: Some(640.0),
        ..CreateOverlay::default()
    };
    let second = client
        .parse_create_overlay(execute(client.build_create_overlay(&input).unwrap()))
        .unwrap();

    // Step 5: get round-trips the created overlay.
    let fetched = client.parse_get_overlay(execute(client.build_get_overlay(&id))).unwrap();
    assert_eq!(fetched, created);

    // Step 6: list is ordered by created_at.
    let overlays = client.parse_list_overlays(execute(client.build_list_overlays())).unwrap();
    let ids: Vec<_> = overlays.iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec![id.as_str(), second.id()]);

    // Step 7: update only color.
    let update = UpdateOverlay {
        color: Some("#000000".to_string()),
        ..UpdateOverlay::default()
    };
    let req = client.build_update_overlay(&id, &update).unwrap();
    let updated = client.parse_update_overlay(execute(req)).unwrap();
    assert_eq!(updated.text("color"), Some("#000000"));
    assert!(updated.text("updated_at").is_some());
    for field in ["content", "width", "created_at"] {
        assert_eq!(updated.get(field), created.get(field), "{field}");
    }

    // Step 8: delete.
    let message = client.parse_delete_overlay(execute(client.build_delete_overlay(&id))).unwrap();
    assert_eq!(message, "Overlay deleted successfully");

    // Step 9: get and update after delete — NotFound.
    let err = client.parse_get_overlay(execute(client.build_get_overlay(&id))).unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    let req = client.build_update_overlay(&id, &update).unwrap();
    let err = client.parse_update_overlay(execute(req)).unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    // Step 10: delete again — still reports success.
    let message = client.parse_delete_overlay(execute(client.build_delete_overlay(&id))).unwrap();
    assert_eq!(message, "Overlay deleted successfully");

    // Step 11: list — only the second overlay remains.
    let overlays = client.parse_list_overlays(execute(client.build_list_overlays())).unwrap();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].id(), second.id());
}

#[test]
fn store_rejection_surfaces_as_500() {
    let client = OverlayClient::new(&start_servers("wrong-key"));

    // Health never touches the store.
    assert!(client.parse_health(execute(client.build_health())).is_ok());

    let err = client.parse_list_overlays(execute(client.build_list_overlays())).unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("401"), "unexpected message: {message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
