//! In-memory stand-in for the subset of the Mautic REST API used by the
//! client's end-to-end tests.
//!
//! Failures are reported the way Mautic reports them: a JSON body with an
//! `errors` array, alongside a matching status code.

use std::{
    collections::BTreeMap,
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, RawQuery, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// How long `/api/slow` waits before answering.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UtmTag {
    pub id: i64,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: Option<i64>,
    pub fields: ContactFields,
    pub utmtags: Vec<UtmTag>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactFields {
    pub all: Map<String, Value>,
}

#[derive(Default)]
pub struct Db {
    next_contact_id: i64,
    next_utm_id: i64,
    contacts: BTreeMap<i64, Contact>,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
    expected_auth: Arc<str>,
}

pub type ApiResult = Result<Json<Value>, ApiFailure>;

/// An error answered as `{"errors": [{"code", "message"}]}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: &'static str,
}

impl ApiFailure {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Item was not found.",
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{"code": self.status.as_u16(), "message": self.message, "details": []}]
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app(username: &str, password: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Db::default())),
        expected_auth: format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))).into(),
    };
    let api = Router::new()
        .route("/campaigns", get(list_campaigns))
        .route("/contacts", get(list_contacts))
        .route("/contacts/new", post(create_contact))
        .route("/contacts/{id}", get(get_contact))
        .route("/contacts/{id}/edit", axum::routing::put(replace_contact).patch(merge_contact))
        .route("/contacts/{id}/delete", delete(delete_contact))
        .route("/contacts/{id}/utm/add", post(add_utm_tags))
        .route("/contacts/{id}/utm/{utm_id}/remove", post(remove_utm_tag))
        .route("/stats/{table}", get(query_stats))
        .route("/slow", get(slow))
        .route("/broken", get(broken))
        .layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener, username: &str, password: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock mautic listening");
    }
    axum::serve(listener, app(username, password)).await
}

async fn require_basic_auth(State(state): State<AppState>, headers: HeaderMap, request: Request, next: Next) -> Response {
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if provided != Some(&*state.expected_auth) {
        debug!(uri = %request.uri(), "rejecting request with bad credentials");
        return ApiFailure {
            status: StatusCode::UNAUTHORIZED,
            message: "API authorization denied.",
        }
        .into_response();
    }
    next.run(request).await
}

async fn list_campaigns() -> Json<Value> {
    Json(json!({"total": 0, "campaigns": {}}))
}

#[derive(Deserialize)]
struct ContactSearch {
    search: Option<String>,
}

/// Supports `search=email:<address>`; any other search matches nothing.
async fn list_contacts(State(state): State<AppState>, Query(params): Query<ContactSearch>) -> Json<Value> {
    let db = state.db.read().await;
    let email = params.search.as_deref().map(|s| s.strip_prefix("email:"));
    let contacts: Map<String, Value> = db
        .contacts
        .iter()
        .filter(|(_, contact)| match email {
            None => true,
            Some(Some(address)) => contact.fields.all.get("email").and_then(Value::as_str) == Some(address),
            Some(None) => false,
        })
        .map(|(id, contact)| (id.to_string(), json!(contact)))
        .collect();
    // Mautic reports the total as a string.
    Json(json!({"total": contacts.len().to_string(), "contacts": contacts}))
}

/// Stores body fields as Mautic does: the `overwriteWithBlank` flag is
/// consumed and empty strings are stored as null.
fn store_fields(target: &mut Map<String, Value>, body: Map<String, Value>) {
    for (key, value) in body {
        if key == "overwriteWithBlank" {
            continue;
        }
        let value = match value {
            Value::String(s) if s.is_empty() => Value::Null,
            other => other,
        };
        target.insert(key, value);
    }
}

async fn create_contact(State(state): State<AppState>, Json(body): Json<Map<String, Value>>) -> Json<Value> {
    let mut db = state.db.write().await;
    db.next_contact_id += 1;
    let id = db.next_contact_id;
    let mut contact = Contact {
        id: Some(id),
        fields: ContactFields::default(),
        utmtags: Vec::new(),
    };
    store_fields(&mut contact.fields.all, body);
    db.contacts.insert(id, contact.clone());
    Json(json!({"contact": contact}))
}

async fn get_contact(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let db = state.db.read().await;
    let contact = db.contacts.get(&id).ok_or_else(ApiFailure::not_found)?;
    Ok(Json(json!({"contact": contact})))
}

async fn replace_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult {
    let mut db = state.db.write().await;
    let contact = db.contacts.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    contact.fields.all.clear();
    store_fields(&mut contact.fields.all, body);
    Ok(Json(json!({"contact": contact})))
}

async fn merge_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult {
    let mut db = state.db.write().await;
    let contact = db.contacts.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    store_fields(&mut contact.fields.all, body);
    Ok(Json(json!({"contact": contact})))
}

async fn delete_contact(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let mut db = state.db.write().await;
    let mut contact = db.contacts.remove(&id).ok_or_else(ApiFailure::not_found)?;
    contact.id = None;
    Ok(Json(json!({"contact": contact})))
}

/// `utm_source` -> `utmSource`.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

async fn add_utm_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult {
    let mut db = state.db.write().await;
    db.next_utm_id += 1;
    let utm_id = db.next_utm_id;
    let contact = db.contacts.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    let values = body.into_iter().map(|(k, v)| (camel_case(&k), v)).collect();
    contact.utmtags.push(UtmTag { id: utm_id, values });
    Ok(Json(json!({"contact": contact})))
}

async fn remove_utm_tag(State(state): State<AppState>, Path((id, utm_id)): Path<(i64, i64)>) -> ApiResult {
    let mut db = state.db.write().await;
    let contact = db.contacts.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    let before = contact.utmtags.len();
    contact.utmtags.retain(|tag| tag.id != utm_id);
    if contact.utmtags.len() == before {
        return Err(ApiFailure::not_found());
    }
    Ok(Json(json!({"contact": contact})))
}

/// Echoes back the `where[i][col|val|expr]` filters it received, grouped by
/// index, so tests can check how the client encoded them.
async fn query_stats(Path(table): Path<String>, RawQuery(query): RawQuery) -> Json<Value> {
    let mut filters: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
    for pair in query.as_deref().unwrap_or("").split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let Some(rest) = key.strip_prefix("where[") else {
            continue;
        };
        let Some((index, field)) = rest.split_once("][") else {
            continue;
        };
        let (Ok(index), Some(field)) = (index.parse::<usize>(), field.strip_suffix(']')) else {
            continue;
        };
        filters
            .entry(index)
            .or_default()
            .insert(field.to_string(), Value::String(value.to_string()));
    }
    let filters: Vec<Value> = filters.into_values().map(Value::Object).collect();
    Json(json!({"table": table, "where": filters, "stats": []}))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!({}))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "<html>upstream unavailable</html>")
}
