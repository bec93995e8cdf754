use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, DepartmentId,
    PaginatedDepartmentsResponse, UpdateDepartmentDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Duplicate code or unknown head", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create_department(&state.db, dto).await?;
    track_record_created("departments");
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    params(DepartmentFilterParams),
    responses(
        (status = 200, description = "Paginated list of departments", body = PaginatedDepartmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    Query(filters): Query<DepartmentFilterParams>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let departments = DepartmentService::get_departments(&state.db, filters).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = Department),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department(&state.db, id).await?;
    Ok(Json(department))
}

/// Update a department. Send `"head_id": null` to remove the head.
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Duplicate code or unknown head", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

/// Delete a department along with its courses and audits.
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
) -> Result<StatusCode, AppError> {
    DepartmentService::delete_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
