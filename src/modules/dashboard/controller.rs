use axum::{Json, extract::State};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::dashboard::model::{DashboardStats, RecentActivitiesResponse};
use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;

/// Campus-wide totals
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = DashboardService::get_stats(&state.db).await?;
    Ok(Json(stats))
}

/// Latest borrowings, housing applications and counseling sessions, newest first
#[utoipa::path(
    get,
    path = "/api/recent-activities",
    responses(
        (status = 200, description = "Up to 10 recent activities", body = RecentActivitiesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_recent_activities(
    State(state): State<AppState>,
) -> Result<Json<RecentActivitiesResponse>, AppError> {
    let activities = DashboardService::get_recent_activities(&state.db).await?;
    Ok(Json(RecentActivitiesResponse { activities }))
}
