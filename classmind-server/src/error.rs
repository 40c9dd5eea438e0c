use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::supabase::SupabaseError;

/// An error answered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Failure of one routines table operation.
#[derive(Debug, Error)]
pub enum RoutineError {
    #[error("Routine with id {0} not found")]
    NotFound(i64),
    #[error("Routine with id {0} not found or you don't have permission to delete it")]
    NotOwned(i64),
    #[error("Failed to create routine: no data returned")]
    NothingCreated,
    #[error("Failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: SupabaseError,
    },
}

impl RoutineError {
    pub fn database(operation: &'static str) -> impl FnOnce(SupabaseError) -> Self {
        move |source| RoutineError::Database { operation, source }
    }
}

impl From<RoutineError> for ApiError {
    fn from(e: RoutineError) -> Self {
        match e {
            RoutineError::NotFound(_) | RoutineError::NotOwned(_) => {
                ApiError::NotFound(e.to_string())
            }
            RoutineError::NothingCreated | RoutineError::Database { .. } => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
