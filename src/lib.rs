//! Mock todo HTTP API backed by an in-memory store.
//!
//! # Overview
//! A thin request-routing and body-validation layer over a single ordered
//! list of todo records held in process memory. Intended for local
//! development and testing: state lives for the lifetime of the process and
//! resets on restart. No persistence, no auth, no pagination cursors.
//!
//! # Design
//! - The store is a plain value ([`store::TodoStore`]) injected into handlers
//!   through [`AppState`], never a global.
//! - All store operations are short synchronous in-memory computations; one
//!   coarse `RwLock` around the store is the only synchronization.
//! - Parameter coercion is explicit and total ([`coerce`]); an unparsable id
//!   is "not found", never a server error.
//! - Errors become responses in exactly one place
//!   ([`error::ApiError::into_response`]).

pub mod coerce;
pub mod error;
pub mod routes;
pub mod store;

pub use error::ApiError;
pub use store::{Todo, TodoPatch, TodoStore};

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

/// Shared state handed to every handler: the store behind a coarse lock,
/// plus the process start time for the diagnostics endpoint.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<RwLock<TodoStore>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            started_at: Instant::now(),
        }
    }
}

/// The router with the default seed data (five records, ids 1–5).
pub fn app() -> Router {
    app_with_store(TodoStore::seeded())
}

/// The router over an explicit store; useful for tests that want to start
/// empty or from a crafted dataset.
pub fn app_with_store(store: TodoStore) -> Router {
    let state = AppState::new(store);
    Router::new()
        .route("/", get(routes::root))
        .route("/status", get(routes::status))
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route(
            "/todos/{id}",
            get(routes::get_todo)
                .put(routes::replace_todo)
                .patch(routes::patch_todo)
                .delete(routes::delete_todo),
        )
        .route("/todos/{id}/toggle", post(routes::toggle_todo))
        .route("/todos/{id}/complete", post(routes::complete_todo))
        // Both unknown paths and known paths with an unsupported verb get the
        // same structured 404.
        .fallback(routes::fallback)
        .method_not_allowed_fallback(routes::fallback)
        .layer(middleware::from_fn(routes::log_request))
        .with_state(state)
}

/// Serves the seeded app on the given listener until the process exits.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
