use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::housing::model::{
    CreateHousingApplicationDto, CreateHousingDto, HousingApplication,
    HousingApplicationFilterParams, HousingApplicationId, HousingFilterParams, HousingId,
    HousingView, PaginatedHousingApplicationsResponse, PaginatedHousingResponse,
    UpdateHousingApplicationDto, UpdateHousingDto,
};
use crate::modules::housing::service::{HousingApplicationService, HousingService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Housing
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/housing",
    request_body = CreateHousingDto,
    responses(
        (status = 201, description = "Housing created", body = HousingView),
        (status = 400, description = "Room already exists in the building", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_housing(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateHousingDto>,
) -> Result<(StatusCode, Json<HousingView>), AppError> {
    let housing = HousingService::create_housing(&state.db, dto).await?;
    track_record_created("housing");
    Ok((StatusCode::CREATED, Json(housing)))
}

/// List rooms. A truthy `available` keeps rooms with a free bed.
#[utoipa::path(
    get,
    path = "/api/housing",
    params(HousingFilterParams),
    responses(
        (status = 200, description = "Paginated list of rooms", body = PaginatedHousingResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_housing_list(
    State(state): State<AppState>,
    Query(filters): Query<HousingFilterParams>,
) -> Result<Json<PaginatedHousingResponse>, AppError> {
    let housing_list = HousingService::get_housing_list(&state.db, filters).await?;
    Ok(Json(housing_list))
}

#[utoipa::path(
    get,
    path = "/api/housing/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing ID")),
    responses(
        (status = 200, description = "Housing details", body = HousingView),
        (status = 404, description = "Housing not found", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_housing(
    State(state): State<AppState>,
    Path(id): Path<HousingId>,
) -> Result<Json<HousingView>, AppError> {
    let housing = HousingService::get_housing(&state.db, id).await?;
    Ok(Json(housing))
}

#[utoipa::path(
    put,
    path = "/api/housing/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing ID")),
    request_body = UpdateHousingDto,
    responses(
        (status = 200, description = "Housing updated", body = HousingView),
        (status = 400, description = "Room already exists in the building", body = ErrorResponse),
        (status = 404, description = "Housing not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_housing(
    State(state): State<AppState>,
    Path(id): Path<HousingId>,
    ValidatedJson(dto): ValidatedJson<UpdateHousingDto>,
) -> Result<Json<HousingView>, AppError> {
    let housing = HousingService::update_housing(&state.db, id, dto).await?;
    Ok(Json(housing))
}

#[utoipa::path(
    delete,
    path = "/api/housing/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing ID")),
    responses(
        (status = 204, description = "Housing deleted"),
        (status = 404, description = "Housing not found", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_housing(
    State(state): State<AppState>,
    Path(id): Path<HousingId>,
) -> Result<StatusCode, AppError> {
    HousingService::delete_housing(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Housing applications
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/housing-applications",
    request_body = CreateHousingApplicationDto,
    responses(
        (status = 201, description = "Housing application created", body = HousingApplication),
        (status = 400, description = "Unknown student or semester", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_housing_application(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateHousingApplicationDto>,
) -> Result<(StatusCode, Json<HousingApplication>), AppError> {
    let housing_application =
        HousingApplicationService::create_housing_application(&state.db, dto).await?;
    track_record_created("housing_applications");
    Ok((StatusCode::CREATED, Json(housing_application)))
}

#[utoipa::path(
    get,
    path = "/api/housing-applications",
    params(HousingApplicationFilterParams),
    responses(
        (status = 200, description = "Paginated list of housing applications", body = PaginatedHousingApplicationsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_housing_applications(
    State(state): State<AppState>,
    Query(filters): Query<HousingApplicationFilterParams>,
) -> Result<Json<PaginatedHousingApplicationsResponse>, AppError> {
    let housing_applications =
        HousingApplicationService::get_housing_applications(&state.db, filters).await?;
    Ok(Json(housing_applications))
}

#[utoipa::path(
    get,
    path = "/api/housing-applications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing application ID")),
    responses(
        (status = 200, description = "Housing application details", body = HousingApplication),
        (status = 404, description = "Housing application not found", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_housing_application(
    State(state): State<AppState>,
    Path(id): Path<HousingApplicationId>,
) -> Result<Json<HousingApplication>, AppError> {
    let housing_application =
        HousingApplicationService::get_housing_application(&state.db, id).await?;
    Ok(Json(housing_application))
}

#[utoipa::path(
    put,
    path = "/api/housing-applications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing application ID")),
    request_body = UpdateHousingApplicationDto,
    responses(
        (status = 200, description = "Housing application updated", body = HousingApplication),
        (status = 404, description = "Housing application not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_housing_application(
    State(state): State<AppState>,
    Path(id): Path<HousingApplicationId>,
    ValidatedJson(dto): ValidatedJson<UpdateHousingApplicationDto>,
) -> Result<Json<HousingApplication>, AppError> {
    let housing_application =
        HousingApplicationService::update_housing_application(&state.db, id, dto).await?;
    Ok(Json(housing_application))
}

#[utoipa::path(
    delete,
    path = "/api/housing-applications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Housing application ID")),
    responses(
        (status = 204, description = "Housing application deleted"),
        (status = 404, description = "Housing application not found", body = ErrorResponse)
    ),
    tag = "Housing",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_housing_application(
    State(state): State<AppState>,
    Path(id): Path<HousingApplicationId>,
) -> Result<StatusCode, AppError> {
    HousingApplicationService::delete_housing_application(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
