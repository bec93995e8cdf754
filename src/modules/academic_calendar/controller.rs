use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::academic_calendar::model::{
    AcademicYear, AcademicYearFilterParams, AcademicYearId, CreateAcademicYearDto,
    CreateSemesterDto, PaginatedAcademicYearsResponse, PaginatedSemestersResponse, Semester,
    SemesterFilterParams, SemesterId, UpdateAcademicYearDto, UpdateSemesterDto,
};
use crate::modules::academic_calendar::service::{AcademicYearService, SemesterService};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Academic years
// ============================================================================

/// Create an academic year. Omitted dates default to today and a year from today.
#[utoipa::path(
    post,
    path = "/api/academic-years",
    request_body = CreateAcademicYearDto,
    responses(
        (status = 201, description = "Academic year created", body = AcademicYear),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_academic_year(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAcademicYearDto>,
) -> Result<(StatusCode, Json<AcademicYear>), AppError> {
    let year = AcademicYearService::create_academic_year(&state.db, dto).await?;
    track_record_created("academic_years");
    Ok((StatusCode::CREATED, Json(year)))
}

#[utoipa::path(
    get,
    path = "/api/academic-years",
    params(AcademicYearFilterParams),
    responses(
        (status = 200, description = "Paginated list of academic years", body = PaginatedAcademicYearsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_academic_years(
    State(state): State<AppState>,
    Query(filters): Query<AcademicYearFilterParams>,
) -> Result<Json<PaginatedAcademicYearsResponse>, AppError> {
    let years = AcademicYearService::get_academic_years(&state.db, filters).await?;
    Ok(Json(years))
}

#[utoipa::path(
    get,
    path = "/api/academic-years/{id}",
    params(("id" = uuid::Uuid, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "Academic year details", body = AcademicYear),
        (status = 404, description = "Academic year not found", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_academic_year(
    State(state): State<AppState>,
    Path(id): Path<AcademicYearId>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::get_academic_year(&state.db, id).await?;
    Ok(Json(year))
}

#[utoipa::path(
    put,
    path = "/api/academic-years/{id}",
    params(("id" = uuid::Uuid, Path, description = "Academic year ID")),
    request_body = UpdateAcademicYearDto,
    responses(
        (status = 200, description = "Academic year updated", body = AcademicYear),
        (status = 404, description = "Academic year not found", body = ErrorResponse),
        (status = 422, description = "End date before start date", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_academic_year(
    State(state): State<AppState>,
    Path(id): Path<AcademicYearId>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicYearDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::update_academic_year(&state.db, id, dto).await?;
    Ok(Json(year))
}

#[utoipa::path(
    delete,
    path = "/api/academic-years/{id}",
    params(("id" = uuid::Uuid, Path, description = "Academic year ID")),
    responses(
        (status = 204, description = "Academic year and its semesters deleted"),
        (status = 404, description = "Academic year not found", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_academic_year(
    State(state): State<AppState>,
    Path(id): Path<AcademicYearId>,
) -> Result<StatusCode, AppError> {
    AcademicYearService::delete_academic_year(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Semesters
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/semesters",
    request_body = CreateSemesterDto,
    responses(
        (status = 201, description = "Semester created", body = Semester),
        (status = 400, description = "Unknown academic year", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_semester(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSemesterDto>,
) -> Result<(StatusCode, Json<Semester>), AppError> {
    let semester = SemesterService::create_semester(&state.db, dto).await?;
    track_record_created("semesters");
    Ok((StatusCode::CREATED, Json(semester)))
}

#[utoipa::path(
    get,
    path = "/api/semesters",
    params(SemesterFilterParams),
    responses(
        (status = 200, description = "Paginated list of semesters", body = PaginatedSemestersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_semesters(
    State(state): State<AppState>,
    Query(filters): Query<SemesterFilterParams>,
) -> Result<Json<PaginatedSemestersResponse>, AppError> {
    let semesters = SemesterService::get_semesters(&state.db, filters).await?;
    Ok(Json(semesters))
}

#[utoipa::path(
    get,
    path = "/api/semesters/{id}",
    params(("id" = uuid::Uuid, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester details", body = Semester),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::get_semester(&state.db, id).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    put,
    path = "/api/semesters/{id}",
    params(("id" = uuid::Uuid, Path, description = "Semester ID")),
    request_body = UpdateSemesterDto,
    responses(
        (status = 200, description = "Semester updated", body = Semester),
        (status = 404, description = "Semester not found", body = ErrorResponse),
        (status = 422, description = "End date before start date", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
    ValidatedJson(dto): ValidatedJson<UpdateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::update_semester(&state.db, id, dto).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    delete,
    path = "/api/semesters/{id}",
    params(("id" = uuid::Uuid, Path, description = "Semester ID")),
    responses(
        (status = 204, description = "Semester deleted"),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    tag = "Academic Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
) -> Result<StatusCode, AppError> {
    SemesterService::delete_semester(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
