use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use messcut_backend::{models::RequestStatus, repositories::RequestStore, services::DispatchMode};

mod support;

use support::{memory_store, test_config, test_router, test_router_with, FlakyStore};

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("call app");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|r| r["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn list_narrows_by_status_and_search() {
    let app = test_router(memory_store());

    let (status, body) = send(&app, get("/api/admin/requests")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);

    let (_, body) = send(&app, get("/api/admin/requests?status=pending")).await;
    assert_eq!(ids(&body["requests"]), ["r1", "r2", "r4"]);

    let (_, body) = send(&app, get("/api/admin/requests?search=edwin")).await;
    assert_eq!(ids(&body["requests"]), ["r1", "r5"]);

    let (_, body) = send(&app, get("/api/admin/requests?status=rejected&search=12213015")).await;
    assert_eq!(ids(&body["requests"]), ["r5"]);
}

#[tokio::test]
async fn list_applies_the_requested_order() {
    let app = test_router(memory_store());

    let (status, body) = send(&app, get("/api/admin/requests?sort=newest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["requests"]), ["r5", "r4", "r3", "r2", "r1"]);

    let (_, body) = send(&app, get("/api/admin/requests?sort=oldest")).await;
    assert_eq!(ids(&body["requests"]), ["r1", "r2", "r3", "r4", "r5"]);

    let (_, body) = send(&app, get("/api/admin/requests?status=pending&sort=newest")).await;
    assert_eq!(ids(&body["requests"]), ["r4", "r2", "r1"]);

    let (_, body) = send(&app, get("/api/admin/requests?sort=admission_no")).await;
    assert_eq!(ids(&body["requests"]), ["r1", "r5", "r2", "r3", "r4"]);

    let (_, body) = send(&app, get("/api/admin/requests?search=edwin&sort=status")).await;
    assert_eq!(ids(&body["requests"]), ["r1", "r5"]);
}

#[tokio::test]
async fn overlong_search_is_rejected() {
    let app = test_router(memory_store());
    let term = "x".repeat(101);
    let (status, body) = send(&app, get(&format!("/api/admin/requests?search={term}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn filter_returns_requests_leaving_inside_the_window() {
    let app = test_router(memory_store());
    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/filter",
            json!({
                "from_date": "2025-10-18",
                "from_time": "08:00 AM",
                "to_date": "2025-10-20",
                "to_time": "04:00 PM"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["requests"]), ["r1", "r3", "r4"]);
}

#[tokio::test]
async fn filter_reports_window_problems_before_reading_the_store() {
    let app = test_router(memory_store());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/filter",
            json!({ "from_date": "2025-10-18", "from_time": "", "to_date": "2025-10-20" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INCOMPLETE_WINDOW");
    assert_eq!(body["details"]["missing"], json!(["from_time", "to_time"]));

    let (_, body) = send(
        &app,
        post_json(
            "/api/admin/requests/filter",
            json!({
                "from_date": "2025-10-18",
                "from_time": "13:00 PM",
                "to_date": "2025-10-20",
                "to_time": "04:00 PM"
            }),
        ),
    )
    .await;
    assert_eq!(body["code"], "MALFORMED_TIME_LABEL");

    let (_, body) = send(
        &app,
        post_json(
            "/api/admin/requests/filter",
            json!({
                "from_date": "2025-10-21",
                "from_time": "08:00 AM",
                "to_date": "2025-10-20",
                "to_time": "04:00 PM"
            }),
        ),
    )
    .await;
    assert_eq!(body["code"], "INVERTED_WINDOW");
}

#[tokio::test]
async fn malformed_window_dates_get_a_json_error_without_store_reads() {
    let store = Arc::new(FlakyStore::new(memory_store()).failing_list());
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/filter",
            json!({
                "from_date": "18/10/2025",
                "from_time": "08:00 AM",
                "to_date": "2025-10-20",
                "to_time": "04:00 PM"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_DATE");
    assert!(body["error"].as_str().unwrap().contains("18/10/2025"));

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({
                "status": "accepted",
                "window": {
                    "from_date": "2025-10-18",
                    "from_time": "08:00 AM",
                    "to_date": "2025-02-30",
                    "to_time": "04:00 PM"
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_DATE");
    assert_eq!(store.list_calls(), 0);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn bulk_status_by_ids_updates_and_returns_the_fresh_list() {
    let store = memory_store();
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({ "status": "accepted", "ids": ["r1", "r2", "r4"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["target_status"], "accepted");
    assert_eq!(body["result"]["attempted"], 3);
    assert_eq!(body["result"]["succeeded"], json!(["r1", "r2", "r4"]));
    assert_eq!(body["result"]["failed"], json!([]));

    let pending = store.list(Some(RequestStatus::Pending)).await.unwrap();
    assert!(pending.is_empty());
    let statuses: Vec<_> = body["requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, ["accepted", "accepted", "accepted", "accepted", "rejected"]);
}

#[tokio::test]
async fn bulk_status_by_window_only_touches_pending_matches() {
    let store = Arc::new(FlakyStore::new(memory_store()));
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({
                "status": "rejected",
                "window": {
                    "from_date": "2025-10-18",
                    "from_time": "08:00 AM",
                    "to_date": "2025-10-20",
                    "to_time": "04:00 PM"
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["succeeded"], json!(["r1", "r4"]));
    let touched: Vec<_> = store.calls().iter().map(|id| id.to_string()).collect();
    assert_eq!(touched, ["r1", "r4"]);
}

#[tokio::test]
async fn bulk_status_reports_partial_failure() {
    let store = Arc::new(FlakyStore::new(memory_store()).failing("r2"));
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({ "status": "accepted", "ids": ["r1", "r2", "r4"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["succeeded"], json!(["r1", "r4"]));
    assert_eq!(body["result"]["failed"][0]["id"], "r2");
    assert!(body["result"]["failed"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn concurrent_dispatch_keeps_selection_order_through_the_api() {
    let store = Arc::new(FlakyStore::new(memory_store()).failing("r2"));
    let config = messcut_backend::config::Config {
        bulk_dispatch: DispatchMode::Concurrent { max_in_flight: 2 },
        ..test_config()
    };
    let app = test_router_with(store.clone(), config);

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({ "status": "accepted", "ids": ["r4", "r2", "r1"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["attempted"], 3);
    assert_eq!(body["result"]["succeeded"], json!(["r4", "r1"]));
    assert_eq!(body["result"]["failed"][0]["id"], "r2");

    let mut touched: Vec<_> = store.calls().iter().map(|id| id.to_string()).collect();
    touched.sort();
    assert_eq!(touched, ["r1", "r2", "r4"]);
    let pending = store.list(Some(RequestStatus::Pending)).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id.as_str(), "r2");
}

#[tokio::test]
async fn bulk_status_rejects_empty_or_ambiguous_selections() {
    let app = test_router(memory_store());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests/bulk-status",
            json!({ "status": "accepted", "ids": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_SELECTION");

    let (status, _) = send(
        &app,
        post_json("/api/admin/requests/bulk-status", json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_leaving_after_returning() {
    let store = memory_store();
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests",
            json!({
                "student_name": "ANU THOMAS",
                "admission_no": "12213020",
                "room_no": "101",
                "leaving_date": "2025-10-25",
                "leaving_time": "09:00 AM",
                "returning_date": "2025-10-24",
                "returning_time": "09:00 AM",
                "reason": null
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/requests",
            json!({
                "student_name": "ANU THOMAS",
                "admission_no": "12213020",
                "room_no": "101",
                "leaving_date": "2025-10-24",
                "leaving_time": "09:00 AM",
                "returning_date": "2025-10-25",
                "returning_time": "09:00 AM",
                "reason": "Fest"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["leaving_time"], "09:00 AM");
    assert_eq!(store.list(None).await.unwrap().len(), 6);
}

#[tokio::test]
async fn reports_group_by_student() {
    let app = test_router(memory_store());

    let (status, body) = send(&app, get("/api/admin/reports/students")).await;
    assert_eq!(status, StatusCode::OK);
    let first = &body[0];
    assert_eq!(first["student_name"], "EDWIN PAUL");
    assert_eq!(first["total"], 2);
    assert_eq!(first["pending"], 1);
    assert_eq!(first["rejected"], 1);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = send(
        &app,
        get("/api/admin/reports/mess-cut?from=2025-10-18&to=2025-10-20"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "student_key": "12213017", "student_name": "KIRAN DAS", "days": 2 }]));

    let (status, body) = send(
        &app,
        get("/api/admin/reports/mess-cut?from=2025-10-20&to=2025-10-18"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVERTED_WINDOW");
}

#[tokio::test]
async fn inverted_mess_cut_range_is_rejected_before_reading_the_store() {
    let store = Arc::new(FlakyStore::new(memory_store()).failing_list());
    let app = test_router(store.clone());

    let (status, body) = send(
        &app,
        get("/api/admin/reports/mess-cut?from=2025-10-20&to=2025-10-18"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVERTED_WINDOW");
    assert_eq!(store.list_calls(), 0);

    let (status, body) = send(
        &app,
        get("/api/admin/reports/mess-cut?from=2025-10-18&to=2025-10-20"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn health_and_openapi_are_served_with_request_ids() {
    let app = test_router(memory_store());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "admin-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "admin-42");

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().expect("paths");
    assert!(paths.contains_key("/api/admin/requests/bulk-status"));
    assert!(paths.contains_key("/api/admin/reports/mess-cut"));
}
