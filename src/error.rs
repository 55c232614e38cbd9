//! Error taxonomy for the API.
//!
//! # Design
//! Three request-level failure classes map onto HTTP statuses: unknown id →
//! 404 with identifying context, invalid create payload → 400 echoing the
//! offending body, and anything unexpected → 500 with the failure message.
//! The `IntoResponse` impl below is the single place errors become HTTP
//! responses; handlers only ever return `Result<_, ApiError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::routes::endpoint_directory;

/// A request-level failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No stored record matches the requested id. Carries the id as the
    /// client sent it (a number when parsable, the raw string otherwise) and,
    /// for lookups, the ids that do exist.
    #[error("Todo not found")]
    NotFound {
        id: Value,
        available_ids: Option<Vec<i64>>,
    },

    /// The create payload is missing a usable `title`.
    #[error("Title is required and must be a non-empty string")]
    Validation { received_body: Value },

    /// No route matches the request.
    #[error("Route not found")]
    RouteNotFound { method: String, requested_url: String },

    /// Catch-all for unexpected failures.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// A 404 without the `available_ids` listing, for mutation endpoints.
    pub fn not_found(id: Value) -> Self {
        Self::NotFound {
            id,
            available_ids: None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            Self::NotFound { id, available_ids } => {
                let mut body = json!({ "error": message, "id": id });
                if let Some(ids) = available_ids {
                    body["available_ids"] = json!(ids);
                }
                (StatusCode::NOT_FOUND, body)
            }
            Self::Validation { received_body } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "received_body": received_body }),
            ),
            Self::RouteNotFound {
                method,
                requested_url,
            } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": message,
                    "requested_url": requested_url,
                    "method": method,
                    "available_endpoints": endpoint_directory(),
                }),
            ),
            Self::Internal(_) => {
                tracing::error!(error = %message, "request failed unexpectedly");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
