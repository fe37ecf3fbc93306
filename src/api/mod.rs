//! REST API over the CRM database.
//!
//! All routes live under `/api`. Every handler locks the shared connection,
//! runs one short storage call and releases the lock before responding.

use axum::routing::{get, put};
use axum::Router;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{CrmError, Result};
use crate::models::{optional_text, uuid_field};

mod contacts;
mod reminders;
mod stats;
mod tasks;
pub mod types;

use types::ApiError;

/// Shared application state passed to handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    fn db(&self) -> std::result::Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }
}

/// Build the router. With `static_dir` set, unknown paths are served from
/// that directory, falling back to its `index.html`.
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/contacts/{id}",
            get(contacts::show)
                .put(contacts::update)
                .delete(contacts::remove),
        )
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/board", get(tasks::board))
        .route("/tasks/reorder", put(tasks::reorder))
        .route(
            "/tasks/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::remove),
        )
        .route("/tasks/{id}/move", put(tasks::move_task))
        .route("/tasks/{id}/toggle", put(tasks::toggle))
        .route("/reminders", get(reminders::list).post(reminders::create))
        .route(
            "/reminders/{id}",
            get(reminders::show)
                .put(reminders::update)
                .delete(reminders::remove),
        )
        .route("/stats", get(stats::dashboard))
        .route("/calendar", get(stats::calendar));

    let router = Router::new().nest("/api", api).with_state(state);

    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router,
    };

    router.layer(CorsLayer::permissive())
}

// ==================== QUERY PARSING ====================

/// Optional numeric query value; blank is absent.
pub(crate) fn query_number<T: FromStr>(field: &str, value: Option<String>) -> Result<Option<T>> {
    optional_text(value)
        .map(|s| {
            s.parse::<T>()
                .map_err(|_| CrmError::field(field, format!("Invalid number: {}", s)))
        })
        .transpose()
}

/// Boolean query flag: `true`/`1` or `false`/`0`; absent is false.
pub(crate) fn query_flag(field: &str, value: Option<String>) -> Result<bool> {
    match optional_text(value).as_deref() {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(CrmError::field(
            field,
            format!("Expected true or false, got {}", other),
        )),
    }
}

pub(crate) fn optional_query_id(field: &str, value: Option<String>) -> Result<Option<Uuid>> {
    optional_text(value)
        .map(|s| uuid_field(field, &s))
        .transpose()
}
