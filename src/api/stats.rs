use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::types::{ApiResult, CalendarParams};
use super::{query_number, AppState};
use crate::error::FieldErrors;
use crate::models::{CalendarDay, DashboardStats};

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let stats = state.db()?.dashboard_stats()?;
    Ok(Json(stats))
}

pub async fn calendar(
    State(state): State<AppState>,
    params: Result<Query<CalendarParams>, QueryRejection>,
) -> ApiResult<Json<Vec<CalendarDay>>> {
    let Query(params) = params?;

    let mut errors = FieldErrors::new();
    let year = match errors.check(query_number::<i32>("year", params.year)) {
        Some(Some(year)) => year,
        Some(None) => {
            errors.push("year", "year is required");
            0
        }
        None => 0,
    };
    let month = match errors.check(query_number::<u32>("month", params.month)) {
        Some(Some(month)) => month,
        Some(None) => {
            errors.push("month", "month is required");
            0
        }
        None => 0,
    };
    let (year, month) = errors.finish((year, month))?;

    let days = state.db()?.calendar_month(year, month)?;
    Ok(Json(days))
}
