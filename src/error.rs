//! Domain errors shared by storage, ordering and the HTTP layer.

use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = CrmError> = std::result::Result<T, E>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// What kind of storage constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A referenced contact/task does not exist
    ForeignKey,
    /// A CHECK constraint on status/priority/category failed
    Enumeration,
    Other,
}

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("constraint violation: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("transaction failed: {0}")]
    Transaction(String),

    #[error(transparent)]
    Database(rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrmError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<rusqlite::Error> for CrmError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref msg)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let message = msg.clone().unwrap_or_else(|| failure.to_string());
                let kind = if message.contains("FOREIGN KEY") {
                    ConstraintKind::ForeignKey
                } else if message.contains("CHECK") {
                    ConstraintKind::Enumeration
                } else {
                    ConstraintKind::Other
                };
                CrmError::Constraint { kind, message }
            }
            other => CrmError::Database(other),
        }
    }
}

/// Accumulates field errors while validating a request body.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record the error of a fallible field conversion and yield its value.
    pub fn check<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(CrmError::Validation(errs)) => {
                self.0.extend(errs);
                None
            }
            Err(other) => {
                self.push("unknown", other.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise a `Validation` error.
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(CrmError::Validation(self.0))
        }
    }
}
