use axum::http::{Request, StatusCode};
use conngate::{app, config::Config, AppState, HealthStatus};
use conngate_core::{ErrorPayload, ListingResponse};
use http_body_util::BodyExt;
use tower::ServiceExt;

// Nothing listens on port 1, so live calls fail fast with a refused connection.
const DEAD_UPSTREAM: &str = "http://127.0.0.1:1";

fn state(mock_mode: bool) -> AppState {
    AppState::new(Config {
        base_url: DEAD_UPSTREAM.to_string(),
        auth_user: "admin".to_string(),
        auth_pass: "top-secret".to_string(),
        mock_mode,
        port: 0,
    })
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- health ---

#[tokio::test]
async fn health_returns_ok() {
    let resp = app(state(true)).oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthStatus = body_json(resp).await;
    assert_eq!(health.status, "ok");
}

// --- mock listing ---

#[tokio::test]
async fn mock_second_page_of_ten() {
    let resp = app(state(true))
        .oneshot(get("/api/connections?page=2&itemsPerPage=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: ListingResponse = body_json(resp).await;
    assert_eq!(listing.page_count, 5);
    assert_eq!(listing.item_count, 47);
    let ids: Vec<_> = listing.items.iter().map(|c| c.id.clone()).collect();
    let expected: Vec<_> = (11..=20).map(|n| format!("conn_{n:03}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn mock_without_params_returns_everything() {
    let resp = app(state(true)).oneshot(get("/api/connections")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: ListingResponse = body_json(resp).await;
    assert_eq!(listing.page_count, 1);
    assert_eq!(listing.item_count, 47);
    assert_eq!(listing.items.len(), 47);
}

#[tokio::test]
async fn mock_invalid_params_fall_back_to_defaults() {
    let resp = app(state(true))
        .oneshot(get("/api/connections?page=abc&itemsPerPage=-3"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: ListingResponse = body_json(resp).await;
    assert_eq!(listing.items.len(), 47);
    assert_eq!(listing.items[0].id, "conn_001");
}

#[tokio::test]
async fn mock_repeated_keys_use_first_value() {
    let resp = app(state(true))
        .oneshot(get("/api/connections?page=2&page=3&itemsPerPage=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: ListingResponse = body_json(resp).await;
    assert_eq!(listing.page_count, 5);
    assert_eq!(listing.items.first().map(|c| c.id.as_str()), Some("conn_011"));
    assert_eq!(listing.items.len(), 10);
}

#[tokio::test]
async fn mock_page_past_the_end_is_empty() {
    let resp = app(state(true))
        .oneshot(get("/api/connections?page=9&itemsPerPage=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let listing: ListingResponse = body_json(resp).await;
    assert!(listing.items.is_empty());
    assert_eq!(listing.page_count, 5);
    assert_eq!(listing.item_count, 47);
}

#[tokio::test]
async fn mock_items_keep_nullable_session_shape() {
    let resp = app(state(true))
        .oneshot(get("/api/connections?itemsPerPage=1"))
        .await
        .unwrap();

    let json: serde_json::Value = body_json(resp).await;
    let item = &json["items"][0];
    assert_eq!(item["session"], "session_001");
    assert_eq!(item["remoteAddr"], "192.168.0.0:50000");
    assert_eq!(item["tunnel"], "tunnel_1");
}

// --- method handling ---

#[tokio::test]
async fn non_get_methods_are_rejected_with_405() {
    for method in ["POST", "PUT", "DELETE", "HEAD"] {
        let resp = app(state(true))
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/connections")
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        if method != "HEAD" {
            let payload: ErrorPayload = body_json(resp).await;
            assert_eq!(payload.error, "method_not_allowed");
        }
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app(state(true)).oneshot(get("/api/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- live mode against a dead upstream ---

#[tokio::test]
async fn unreachable_upstream_is_502_with_hint() {
    let resp = app(state(false))
        .oneshot(get("/api/connections?page=1&itemsPerPage=5"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let payload: ErrorPayload = body_json(resp).await;
    assert_eq!(payload.error, "upstream_unreachable");
    assert!(payload.message.unwrap().contains("MOCK_MODE=true"));
}

// --- debug ---

#[tokio::test]
async fn debug_reports_config_and_three_probes_in_order() {
    let resp = app(state(true)).oneshot(get("/api/debug")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let report: serde_json::Value = body_json(resp).await;

    assert_eq!(report["config"]["baseUrl"], DEAD_UPSTREAM);
    assert_eq!(report["config"]["authUser"], "admin");
    assert_eq!(report["config"]["mockMode"], true);
    assert!(!report.to_string().contains("top-secret"));

    let probes = report["probes"].as_array().unwrap();
    let names: Vec<_> = probes.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "GET /api/v3/rtspconns/list",
            "GET /api/v3/webrtcsessions/list",
            "GET /api/v3/rtspsessions/list",
        ]
    );
    for probe in probes {
        assert_eq!(probe["verdict"], "transport_error");
        assert!(probe["error"].is_string());
        assert_eq!(probe["isJson"], false);
    }
}
