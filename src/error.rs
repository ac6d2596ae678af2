// Engine error surface shared with the HTTP layer
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::search::error::FilterError;
use crate::search::mapper::MapError;
use crate::search::scope::ScopeError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SearchError {
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::Filter(_) => 400,
            SearchError::Scope(_) => 401,
            SearchError::Map(_) | SearchError::Store(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::Filter(_) => "VALIDATION_ERROR",
            SearchError::Scope(_) => "UNAUTHORIZED",
            SearchError::Map(_) | SearchError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe message. Internal failures are logged and replaced so SQL
    /// and driver details never reach the caller.
    pub fn client_message(&self) -> String {
        match self {
            SearchError::Filter(e) => e.to_string(),
            SearchError::Scope(e) => e.to_string(),
            SearchError::Map(e) => {
                tracing::error!("Result mapping error: {}", e);
                "An error occurred while processing your request".to_string()
            }
            SearchError::Store(e) => {
                tracing::error!("Store error: {}", e);
                "An error occurred while processing your request".to_string()
            }
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": true,
            "message": self.client_message(),
            "code": self.error_code(),
        });
        (status, Json(body)).into_response()
    }
}
