//! In-memory mock of a minimal scanner management API, used by the core
//! crate's integration tests.
//!
//! Every `/scans` route requires an `X-ApiKeys` header of the form
//! `accessKey=<k>; secretKey=<s>` with non-empty keys, so the client's
//! authentication injection is exercised end-to-end. `/server/status` is
//! open, matching the real service.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scan {
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateScan {
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScanList {
    pub scans: Vec<Scan>,
}

#[derive(Default)]
pub struct ScanStore {
    scans: HashMap<i32, Scan>,
    next_id: i32,
}

pub type Db = Arc<RwLock<ScanStore>>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ScanStore::default()));
    Router::new()
        .route("/server/status", get(server_status))
        .route("/scans", get(list_scans).post(create_scan))
        .route("/scans/{id}", get(get_scan).delete(delete_scan))
        .route("/scans/{id}/launch", post(launch_scan))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Accepts `accessKey=<k>; secretKey=<s>` with both keys non-empty.
fn require_keys(headers: &HeaderMap) -> Result<(), ApiError> {
    let value = headers
        .get("x-apikeys")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let keys: Vec<&str> = value.split("; ").collect();
    let valid = matches!(keys.as_slice(),
        [access, secret] if access.strip_prefix("accessKey=").is_some_and(|k| !k.is_empty())
            && secret.strip_prefix("secretKey=").is_some_and(|k| !k.is_empty()));
    if valid {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid credentials"})),
        ))
    }
}

async fn server_status() -> Json<Value> {
    Json(json!({"status": "ready", "progress": null}))
}

async fn list_scans(State(db): State<Db>, headers: HeaderMap) -> Result<Json<ScanList>, ApiError> {
    require_keys(&headers)?;
    let store = db.read().await;
    Ok(Json(ScanList {
        scans: store.scans.values().cloned().collect(),
    }))
}

async fn create_scan(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateScan>,
) -> Result<(StatusCode, Json<Scan>), ApiError> {
    require_keys(&headers)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let scan = Scan {
        id: store.next_id,
        uuid: Uuid::new_v4(),
        name: input.name,
        status: "empty".to_string(),
    };
    store.scans.insert(scan.id, scan.clone());
    Ok((StatusCode::CREATED, Json(scan)))
}

async fn get_scan(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Scan>, ApiError> {
    require_keys(&headers)?;
    let store = db.read().await;
    store
        .scans
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "scan not found"}))))
}

async fn launch_scan(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    require_keys(&headers)?;
    let mut store = db.write().await;
    let scan = store
        .scans
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "scan not found"}))))?;
    scan.status = "running".to_string();
    Ok(Json(json!({"scan_uuid": scan.uuid})))
}

async fn delete_scan(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_keys(&headers)?;
    let mut store = db.write().await;
    store
        .scans
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "scan not found"}))))
}
