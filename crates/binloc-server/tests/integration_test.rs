//! End-to-end integration tests for the binloc HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! LocationService -> inventory -> store -> HTTP response.
//!
//! Each test creates a fresh in-memory AppState and sends requests with
//! `tower::ServiceExt::oneshot`, without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use binloc_server::config::{Backend, ServerConfig};
use binloc_server::router::build_router;
use binloc_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_app() -> Router {
    build_router(AppState::in_memory())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

async fn send_json(
    app: &Router,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(json!(null)))
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(json!(null)))
}

async fn import(app: &Router, csv: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/parts/import")
        .header("content-type", "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(json!(null)))
}

async fn save(
    app: &Router,
    part_code: &str,
    row: &str,
    rack: &str,
    shelf: &str,
) -> (StatusCode, serde_json::Value) {
    send_json(
        app,
        "PUT",
        "/locations",
        json!({ "part_code": part_code, "row": row, "rack": rack, "shelf": shelf }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_resolve_blank_query_is_idle() {
    let app = test_app();
    let (status, body) = get_json(&app, "/parts/resolve?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    let (_, body) = get_json(&app, "/parts/resolve").await;
    assert_eq!(body["status"], "idle");
}

#[tokio::test]
async fn test_resolve_exact_match_wins() {
    let app = test_app();
    import(&app, "part_code\nAB\nAB1\nAB2\n").await;

    let (status, body) = get_json(&app, "/parts/resolve?q=AB").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "exact", "part_code": "AB" }));
}

#[tokio::test]
async fn test_resolve_offers_sorted_suggestions() {
    let app = test_app();
    import(&app, "part_code\nAB2\nAB1\nZZ\n").await;

    let (_, body) = get_json(&app, "/parts/resolve?q=A").await;
    assert_eq!(body["status"], "suggestions");
    assert_eq!(body["query"], "A");
    assert_eq!(body["candidates"], json!(["AB1", "AB2"]));
}

#[tokio::test]
async fn test_unregistered_code_flow() {
    let app = test_app();

    let (_, body) = get_json(&app, "/parts/resolve?q=NEW-7").await;
    assert_eq!(body, json!({ "status": "unregistered", "query": "NEW-7" }));

    // Saving before registering is refused.
    let (status, body) = save(&app, "NEW-7", "R1", "K1", "S1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send_json(&app, "POST", "/parts", json!({ "part_code": " NEW-7 " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "part_code": "NEW-7", "created": true }));

    // Retrying the registration is harmless.
    let (_, body) = send_json(&app, "POST", "/parts", json!({ "part_code": "NEW-7" })).await;
    assert_eq!(body["created"], false);

    let (status, _) = save(&app, "NEW-7", "R1", "K1", "S1").await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_location_round_trip() {
    let app = test_app();
    import(&app, "part_code\nP1\n").await;

    let (status, body) = get_json(&app, "/locations?part_code=P1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], true);
    assert!(body["location"].is_null());

    let (status, first) = save(&app, "P1", "R0", "K0", "S0").await;
    assert_eq!(status, StatusCode::OK, "save failed: {:?}", first);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/locations",
        json!({
            "part_code": "P1",
            "row": " R1 ",
            "rack": "K2",
            "shelf": "S3",
            "bin": "B4",
            "updated_by": "alice"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "save failed: {:?}", body);

    let (_, body) = get_json(&app, "/locations?part_code=P1").await;
    let loc = &body["location"];
    assert_eq!(loc["row"], "R1");
    assert_eq!(loc["rack"], "K2");
    assert_eq!(loc["shelf"], "S3");
    assert_eq!(loc["bin"], "B4");
    assert_eq!(loc["updated_by"], "alice");
    let updated_at = loc["updated_at"].as_str().unwrap();
    assert!(!updated_at.is_empty());
    assert_ne!(updated_at, first["location"]["updated_at"].as_str().unwrap());

    let (_, entries) = get_json(&app, "/entries").await;
    assert_eq!(entries["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_validation_lists_every_missing_field() {
    let app = test_app();
    import(&app, "part_code\nP1\n").await;

    let (status, body) = save(&app, "P1", "", " ", "X").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"]["missing"], json!(["row", "rack"]));

    // Nothing was written.
    let (_, body) = get_json(&app, "/locations?part_code=P1").await;
    assert!(body["location"].is_null());
}

#[tokio::test]
async fn test_unknown_code_lookup_is_soft() {
    let app = test_app();
    let (status, body) = get_json(&app, "/locations?part_code=GHOST").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], false);
    assert!(body["location"].is_null());
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_import_is_idempotent() {
    let app = test_app();
    let (status, body) = import(&app, "part_code\nA1\nA1\n A2 \n\n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "received": 2, "inserted": 2, "total": 2 }));

    let (_, body) = import(&app, "part_code\nA1\n").await;
    assert_eq!(body, json!({ "received": 1, "inserted": 0, "total": 2 }));
}

#[tokio::test]
async fn test_import_without_part_code_column_is_rejected() {
    let app = test_app();
    let (status, body) = import(&app, "sku\nA1\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_export_csv_lists_every_code() {
    let app = test_app();
    import(&app, "part_code\nA1\nB2\n").await;
    save(&app, "B2", "R1", "K2", "S3").await;

    let request = Request::builder().uri("/export.csv").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "part_code,row,rack,shelf,bin,updated_at,updated_by");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("B2,R1,K2,S3,,"));
    assert_eq!(lines[2], "A1,,,,,,");
}

#[tokio::test]
async fn test_health_reports_counts() {
    let app = test_app();
    import(&app, "part_code\nA1\nB2\n").await;
    save(&app, "A1", "R", "K", "S").await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["part_codes"], 2);
    assert_eq!(body["locations"], 1);
}

#[tokio::test]
async fn test_sqlite_backend_persists_between_states() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        backend: Backend::Sqlite,
        db_path: dir.path().join("binloc.db").to_string_lossy().to_string(),
        ..ServerConfig::default()
    };

    {
        let app = build_router(AppState::new(&config).unwrap());
        import(&app, "part_code\nP1\n").await;
        let (status, _) = save(&app, "P1", "R1", "K1", "S1").await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = build_router(AppState::new(&config).unwrap());
    let (_, body) = get_json(&app, "/locations?part_code=P1").await;
    assert_eq!(body["location"]["shelf"], "S1");
    let (_, body) = get_json(&app, "/parts/resolve?q=P1").await;
    assert_eq!(body["status"], "exact");
}
