use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::types::{
    parse_id, ApiResult, MessageResponse, MoveRequest, ReorderRequest, TaskListParams,
};
use super::{optional_query_id, AppState};
use crate::error::{CrmError, FieldErrors};
use crate::models::{enum_field, Task, TaskFilter, TaskInput, TaskUpdate, WithContact};
use crate::ordering::TaskBoard;

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<TaskListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<WithContact<Task>>>> {
    let Query(params) = params?;

    let mut errors = FieldErrors::new();
    let filter = TaskFilter {
        status: errors.check(enum_field("status", params.status)).flatten(),
        priority: errors.check(enum_field("priority", params.priority)).flatten(),
        category: errors.check(enum_field("category", params.category)).flatten(),
        contact_id: errors
            .check(optional_query_id("contact_id", params.contact_id))
            .flatten(),
    };
    let filter = errors.finish(filter)?;

    let tasks = state.db()?.list_tasks(&filter)?;
    Ok(Json(tasks))
}

pub async fn board(State(state): State<AppState>) -> ApiResult<Json<TaskBoard>> {
    let board = state.db()?.task_board()?;
    Ok(Json(board))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WithContact<Task>>> {
    let id = parse_id(&id)?;
    let task = state
        .db()?
        .get_task_with_contact(id)?
        .ok_or_else(|| CrmError::not_found("task", id))?;
    Ok(Json(task))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(input) = body?;
    let new = input.validate()?;
    let task = state.db()?.create_task(&new)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;
    let Json(update) = body?;
    let changes = update.validate()?;
    let task = state.db()?.update_task(id, changes)?;
    Ok(Json(task))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;
    let task = state.db()?.toggle_task(id)?;
    Ok(Json(task))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.db()?.delete_task(id)?;
    Ok(MessageResponse::new("Task deleted"))
}

/// Apply a client-computed reorder batch. On failure nothing is written and
/// the client is expected to refetch.
pub async fn reorder(
    State(state): State<AppState>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(request) = body?;
    state.db()?.reorder_tasks(&request.items)?;
    Ok(MessageResponse::new("Tasks reordered"))
}

/// Server-side drag and drop: move one task and get the resulting board.
pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult<Json<TaskBoard>> {
    let id = parse_id(&id)?;
    let Json(request) = body?;
    let board = state.db()?.move_task(id, request.category, request.index)?;
    Ok(Json(board))
}
