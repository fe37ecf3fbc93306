//! Request/response types and the HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ConstraintKind, CrmError};
use crate::models::TaskCategory;
use crate::ordering::ReorderItem;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Crm(CrmError),
    /// Failure outside the domain (e.g. a poisoned lock)
    Internal(String),
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        ApiError::Crm(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Crm(CrmError::field("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Crm(CrmError::field("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Crm(err) => err,
            ApiError::Internal(message) => {
                log::error!("internal error: {}", message);
                return internal_error();
            }
        };

        match err {
            CrmError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            CrmError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
            }
            CrmError::Constraint {
                kind: ConstraintKind::ForeignKey | ConstraintKind::Enumeration,
                ref message,
            } => {
                log::debug!("rejected write: {}", message);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))).into_response()
            }
            other => {
                log::error!("request failed: {}", other);
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Parse a path id; a malformed id is a validation error on `id`.
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CrmError::field("id", format!("Invalid id: {}", raw)).into())
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub contact_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReminderListParams {
    pub upcoming: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub contact_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub category: TaskCategory,
    pub index: usize,
}
