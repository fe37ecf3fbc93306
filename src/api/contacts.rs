use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::types::{parse_id, ApiResult, ContactListParams, MessageResponse};
use super::AppState;
use crate::error::CrmError;
use crate::models::{
    Contact, ContactDetail, ContactInput, ContactQuery, ContactSort, ContactUpdate, SortDirection,
};

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ContactListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Contact>>> {
    let Query(params) = params?;
    let query = ContactQuery {
        search: params.search,
        sort: params
            .sort
            .as_deref()
            .map(ContactSort::parse)
            .unwrap_or_default(),
        direction: params
            .order
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default(),
    };
    let contacts = state.db()?.list_contacts(&query)?;
    Ok(Json(contacts))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactDetail>> {
    let id = parse_id(&id)?;
    let detail = state
        .db()?
        .get_contact_detail(id)?
        .ok_or_else(|| CrmError::not_found("contact", id))?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let Json(input) = body?;
    let new = input.validate(&mut rand::thread_rng())?;
    let contact = state.db()?.insert_contact(&new)?;
    log::info!("created contact {} ({})", contact.id, contact.display_name());
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ContactUpdate>, JsonRejection>,
) -> ApiResult<Json<Contact>> {
    let id = parse_id(&id)?;
    let Json(update) = body?;
    let changes = update.validate()?;
    let contact = state.db()?.update_contact(id, changes)?;
    Ok(Json(contact))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.db()?.delete_contact(id)?;
    log::info!("deleted contact {}", id);
    Ok(MessageResponse::new("Contact deleted"))
}
