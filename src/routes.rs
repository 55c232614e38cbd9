//! Request handlers, one per (verb, path) pair.
//!
//! # Design
//! Handlers read query/path/body parameters through the explicit coercion
//! functions in [`crate::coerce`], look up or mutate the shared store, and
//! produce a JSON envelope with a status code. Unknown ids and unparsable id
//! segments both surface as 404 through [`ApiError`]; nothing in here turns a
//! bad parameter into a 500. Every response timestamp is ISO-8601 UTC,
//! generated at response time.

use axum::{
    extract::{Path, Query, Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::coerce::{int_from_value, parse_id, truthy};
use crate::error::ApiError;
use crate::store::{Todo, TodoPatch, TodoStore};
use crate::AppState;

/// The static route directory rendered by `/`, `/status`, and the 404
/// fallback. Single source of truth for what this service supports.
pub fn endpoint_directory() -> Value {
    json!({
        "GET /": "Service banner and this endpoint directory",
        "GET /status": "Store size, uptime, and supported endpoints",
        "GET /todos": "List todos; optional query params: userId, limit",
        "GET /todos/{id}": "Fetch a single todo by id",
        "POST /todos": "Create a todo; body: title (required), completed, userId",
        "PUT /todos/{id}": "Update the supplied fields of a todo",
        "PATCH /todos/{id}": "Update the supplied fields of a todo",
        "DELETE /todos/{id}": "Delete a todo",
        "POST /todos/{id}/toggle": "Flip a todo's completed flag",
        "POST /todos/{id}/complete": "Set a todo's completed flag; body: completed (default true)",
    })
}

/// Response-time timestamp, ISO-8601 UTC.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The id as the client sent it: a JSON number when parsable, the raw path
/// segment otherwise. Used to echo ids back in 404 bodies.
fn id_value(raw: &str) -> Value {
    parse_id(raw).map_or_else(|| Value::String(raw.to_string()), Value::from)
}

fn log_payload(body: &Value) {
    if body.as_object().is_some_and(|o| !o.is_empty()) {
        tracing::info!(payload = %body, "request payload");
    }
}

/// Builds a partial update from whichever fields the body supplies.
/// Non-string titles and unparsable userIds are treated as absent.
fn patch_from_body(body: &Value) -> TodoPatch {
    TodoPatch {
        title: body.get("title").and_then(Value::as_str).map(str::to_string),
        completed: body.get("completed").map(truthy),
        user_id: body.get("userId").and_then(int_from_value),
    }
}

/// Logs method, path, and any non-empty query string for every request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    match uri.query() {
        Some(query) if !query.is_empty() => {
            tracing::info!(method = %method, path = %uri.path(), query = %query, "request");
        }
        _ => tracing::info!(method = %method, path = %uri.path(), "request"),
    }
    next.run(request).await
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    limit: Option<String>,
}

/// `GET /todos`
pub async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Todo>> {
    // An unparsable userId compares equal to no stored record, so the
    // filtered result is empty rather than an error.
    let user_id = match params.user_id.as_deref() {
        None => None,
        Some(raw) => match parse_id(raw) {
            Some(id) => Some(id),
            None => return Json(Vec::new()),
        },
    };
    let limit = params
        .limit
        .as_deref()
        .and_then(parse_id)
        .and_then(|n| usize::try_from(n).ok());

    let store = state.store.read().await;
    Json(store.list(user_id, limit))
}

/// `GET /todos/{id}`
pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let store = state.store.read().await;
    parse_id(&raw_id)
        .and_then(|id| store.get(id))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            id: id_value(&raw_id),
            available_ids: Some(store.ids()),
        })
}

/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    log_payload(&body);
    let title = body.get("title").and_then(Value::as_str).unwrap_or("");
    let completed = body.get("completed").map(truthy).unwrap_or(false);
    let user_id = body.get("userId").and_then(int_from_value).unwrap_or(1);

    let mut store = state.store.write().await;
    let todo = store
        .create(title, completed, user_id)
        .map_err(|_| ApiError::Validation {
            received_body: body.clone(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Todo created successfully",
            "todo": todo,
            "timestamp": now(),
        })),
    ))
}

/// Parses the id, applies the patch, and reports which fields were applied.
fn apply_patch(
    store: &mut TodoStore,
    raw_id: &str,
    body: &Value,
) -> Result<(Todo, Vec<&'static str>), ApiError> {
    let patch = patch_from_body(body);
    let todo = parse_id(raw_id)
        .and_then(|id| store.update(id, &patch))
        .ok_or_else(|| ApiError::not_found(id_value(raw_id)))?;
    Ok((todo, patch.field_names()))
}

/// `PUT /todos/{id}` — deliberately the same partial-update semantics as
/// PATCH; only the response envelope differs.
pub async fn replace_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    log_payload(&body);
    let mut store = state.store.write().await;
    let (todo, updated_fields) = apply_patch(&mut store, &raw_id, &body)?;
    Ok(Json(json!({
        "message": "Todo updated successfully",
        "updated_todo": todo,
        "updated_fields": updated_fields,
        "timestamp": now(),
    })))
}

/// `PATCH /todos/{id}`
pub async fn patch_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    log_payload(&body);
    let mut store = state.store.write().await;
    let (todo, updated_fields) = apply_patch(&mut store, &raw_id, &body)?;
    Ok(Json(json!({
        "message": "Todo patched successfully",
        "todo": todo,
        "updated_fields": updated_fields,
        "timestamp": now(),
    })))
}

/// `DELETE /todos/{id}`
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut store = state.store.write().await;
    let deleted = parse_id(&raw_id)
        .and_then(|id| store.delete(id))
        .ok_or_else(|| ApiError::not_found(id_value(&raw_id)))?;
    tracing::info!(id = deleted.id, "todo deleted");
    Ok(Json(json!({
        "message": "Todo deleted successfully",
        "deleted_todo": deleted,
        "remaining_todos": store.len(),
        "timestamp": now(),
    })))
}

/// `POST /todos/{id}/toggle`
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut store = state.store.write().await;
    let todo = parse_id(&raw_id)
        .and_then(|id| store.toggle(id))
        .ok_or_else(|| ApiError::not_found(id_value(&raw_id)))?;
    tracing::info!(id = todo.id, completed = todo.completed, "todo toggled");
    Ok(Json(json!({
        "message": "Todo completion toggled",
        "todo": todo,
        "timestamp": now(),
    })))
}

/// `POST /todos/{id}/complete` — body is optional; a missing or `completed`-
/// less body means "mark completed".
pub async fn complete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or(Value::Null);
    log_payload(&body);
    let completed = body.get("completed").map(truthy).unwrap_or(true);

    let mut store = state.store.write().await;
    let todo = parse_id(&raw_id)
        .and_then(|id| store.set_completed(id, completed))
        .ok_or_else(|| ApiError::not_found(id_value(&raw_id)))?;

    let action = if completed { "completed" } else { "reopened" };
    Ok(Json(json!({
        "message": format!("Todo {action}"),
        "todo": todo,
        "action": action,
        "timestamp": now(),
    })))
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({
        "status": "ok",
        "uptime": state.started_at.elapsed().as_secs(),
        "timestamp": now(),
        "current_todos_count": store.len(),
        "endpoints": endpoint_directory(),
    }))
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Mock todo API for local development",
        "endpoints": endpoint_directory(),
    }))
}

/// Structured 404 for anything the router doesn't know about.
pub async fn fallback(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        requested_url: uri.to_string(),
    }
}
