use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::types::{parse_id, ApiResult, MessageResponse, ReminderListParams};
use super::{optional_query_id, query_flag, query_number, AppState};
use crate::error::{CrmError, FieldErrors};
use crate::models::{Reminder, ReminderFilter, ReminderInput, ReminderUpdate, WithContact};

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ReminderListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<WithContact<Reminder>>>> {
    let Query(params) = params?;

    let mut errors = FieldErrors::new();
    let upcoming = errors.check(query_flag("upcoming", params.upcoming));
    let month = errors.check(query_number::<u32>("month", params.month)).flatten();
    let year = errors.check(query_number::<i32>("year", params.year)).flatten();
    let contact_id = errors
        .check(optional_query_id("contact_id", params.contact_id))
        .flatten();

    // Month filtering needs both parts
    let filter = errors.finish(ReminderFilter {
        upcoming: upcoming.unwrap_or(false),
        month: year.zip(month),
        contact_id,
    })?;

    let reminders = state.db()?.list_reminders(&filter)?;
    Ok(Json(reminders))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WithContact<Reminder>>> {
    let id = parse_id(&id)?;
    let reminder = state
        .db()?
        .get_reminder(id)?
        .ok_or_else(|| CrmError::not_found("reminder", id))?;
    Ok(Json(reminder))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ReminderInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let Json(input) = body?;
    let new = input.validate()?;
    let reminder = state.db()?.insert_reminder(&new)?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ReminderUpdate>, JsonRejection>,
) -> ApiResult<Json<Reminder>> {
    let id = parse_id(&id)?;
    let Json(update) = body?;
    let changes = update.validate()?;
    let reminder = state.db()?.update_reminder(id, changes)?;
    Ok(Json(reminder))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.db()?.delete_reminder(id)?;
    Ok(MessageResponse::new("Reminder deleted"))
}
