use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Scan, ScanList};
use tower::ServiceExt;

const KEYS: &str = "accessKey=test-access; secretKey=test-secret";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-ApiKeys", KEYS)
        .body(body.to_string())
        .unwrap()
}

// --- server status ---

#[tokio::test]
async fn server_status_is_open() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/server/status")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let status: serde_json::Value = body_json(resp).await;
    assert_eq!(status["status"], "ready");
}

// --- auth ---

#[tokio::test]
async fn list_scans_without_keys_returns_401() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/scans").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn list_scans_with_empty_keys_returns_401() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/scans")
                .header("X-ApiKeys", "accessKey=; secretKey=")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- list ---

#[tokio::test]
async fn list_scans_empty() {
    let app = app();
    let resp = app
        .oneshot(authed_request("GET", "/scans", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: ScanList = body_json(resp).await;
    assert!(list.scans.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_scan_returns_201() {
    let app = app();
    let resp = app
        .oneshot(authed_request("POST", "/scans", r#"{"name":"Weekly scan"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let scan: Scan = body_json(resp).await;
    assert_eq!(scan.name, "Weekly scan");
    assert_eq!(scan.status, "empty");
    assert_eq!(scan.id, 1);
}

#[tokio::test]
async fn create_scan_malformed_json_returns_422() {
    let app = app();
    let resp = app
        .oneshot(authed_request("POST", "/scans", r#"{"label":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / launch / delete ---

#[tokio::test]
async fn get_scan_not_found() {
    let app = app();
    let resp = app
        .oneshot(authed_request("GET", "/scans/42", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn launch_scan_marks_it_running() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(authed_request("POST", "/scans", r#"{"name":"Launch me"}"#))
        .await
        .unwrap();
    let created: Scan = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(authed_request(
            "POST",
            &format!("/scans/{}/launch", created.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["scan_uuid"], created.uuid.to_string());

    let resp = app
        .oneshot(authed_request("GET", &format!("/scans/{}", created.id), ""))
        .await
        .unwrap();
    let scan: Scan = body_json(resp).await;
    assert_eq!(scan.status, "running");
}

#[tokio::test]
async fn delete_scan_then_404() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(authed_request("POST", "/scans", r#"{"name":"Short lived"}"#))
        .await
        .unwrap();
    let created: Scan = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/scans/{}", created.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(authed_request("GET", &format!("/scans/{}", created.id), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
