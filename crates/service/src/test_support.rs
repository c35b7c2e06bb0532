#![cfg(test)]
use std::{collections::{BTreeMap, HashMap}, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use configs::{AirtableConfig, SqliteConfig};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::coffee::repo::seaorm::SeaOrmCoffeeRepository;

/// A migrated and seeded repository on a throwaway SQLite file.
pub async fn temp_sqlite_repo() -> Result<(SeaOrmCoffeeRepository, PathBuf), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("service_coffee_{}.db", uuid::Uuid::new_v4()));
    let cfg = SqliteConfig { path: path.display().to_string(), max_connections: 2 };
    let db = models::db::connect(&cfg).await?;
    Ok((SeaOrmCoffeeRepository { db }, path))
}

const TOKEN: &str = "test-token";
const BASE: &str = "appTestBase";
const TABLE: &str = "tblCoffees";

#[derive(Default)]
struct FakeState {
    records: BTreeMap<String, Map<String, Value>>,
    next: u64,
    requests: usize,
    page_size: usize,
}

impl FakeState {
    fn insert(&mut self, fields: Map<String, Value>) -> String {
        self.next += 1;
        let id = format!("rec{:014}", self.next);
        self.records.insert(id.clone(), fields);
        id
    }
}

type Shared = Arc<Mutex<FakeState>>;

/// In-process stand-in for the Airtable records API, enough for the calls the
/// repository makes: list with offsets, create, get, patch, delete.
pub struct FakeAirtable {
    addr: SocketAddr,
    state: Shared,
}

impl FakeAirtable {
    pub async fn start(page_size: usize) -> Result<Self, anyhow::Error> {
        let state: Shared = Arc::new(Mutex::new(FakeState { page_size, ..Default::default() }));
        let app = Router::new()
            .route("/v0/:base/:table", get(list).post(create))
            .route("/v0/:base/:table/:id", get(fetch).patch(patch).delete(remove))
            .layer(middleware::from_fn_with_state(state.clone(), require_token))
            .with_state(state.clone());

        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, state })
    }

    pub fn config(&self) -> AirtableConfig {
        AirtableConfig {
            api_url: format!("http://{}/v0", self.addr),
            api_token: TOKEN.into(),
            base_id: BASE.into(),
            table_id: TABLE.into(),
            timeout_secs: 5,
        }
    }

    /// Insert fields directly, bypassing the API (e.g. a record without `votes`).
    pub async fn insert_raw(&self, fields: Value) -> String {
        let fields = fields.as_object().cloned().unwrap_or_default();
        self.state.lock().await.insert(fields)
    }

    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests
    }
}

fn record(id: &str, fields: &Map<String, Value>) -> Value {
    json!({ "id": id, "createdTime": "2024-06-01T00:00:00.000Z", "fields": fields })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "NOT_FOUND" }))).into_response()
}

async fn require_token(State(state): State<Shared>, req: Request, next: Next) -> Response {
    state.lock().await.requests += 1;
    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "AUTHENTICATION_REQUIRED" }))).into_response();
    }
    next.run(req).await
}

async fn list(State(state): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let s = state.lock().await;
    let start: usize = q.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
    let records: Vec<Value> = s
        .records
        .iter()
        .skip(start)
        .take(s.page_size)
        .map(|(id, f)| record(id, f))
        .collect();
    let end = start + records.len();
    let mut body = json!({ "records": records });
    if end < s.records.len() {
        body["offset"] = json!(end.to_string());
    }
    Json(body)
}

async fn create(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let fields: Map<String, Value> = body["fields"]
        .as_object()
        .map(|m| m.iter().filter(|(_, v)| !v.is_null()).map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();
    let mut s = state.lock().await;
    let id = s.insert(fields.clone());
    Json(record(&id, &fields))
}

async fn fetch(State(state): State<Shared>, Path((_, _, id)): Path<(String, String, String)>) -> Response {
    let s = state.lock().await;
    match s.records.get(&id) {
        Some(fields) => Json(record(&id, fields)).into_response(),
        None => not_found(),
    }
}

async fn patch(
    State(state): State<Shared>,
    Path((_, _, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().await;
    let Some(fields) = s.records.get_mut(&id) else { return not_found() };
    if let Some(changes) = body["fields"].as_object() {
        for (k, v) in changes {
            if v.is_null() {
                fields.remove(k);
            } else {
                fields.insert(k.clone(), v.clone());
            }
        }
    }
    Json(record(&id, fields)).into_response()
}

async fn remove(State(state): State<Shared>, Path((_, _, id)): Path<(String, String, String)>) -> Response {
    let mut s = state.lock().await;
    match s.records.remove(&id) {
        Some(_) => Json(json!({ "id": id, "deleted": true })).into_response(),
        None => not_found(),
    }
}
