use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::faculty::model::{
    CreateFacultyProfileDto, CreatePublicationDto, FacultyProfile, FacultyProfileFilterParams,
    FacultyProfileId, PaginatedFacultyProfilesResponse, PaginatedPublicationsResponse,
    Publication, PublicationFilterParams, PublicationId, UpdateFacultyProfileDto,
    UpdatePublicationDto,
};
use crate::modules::faculty::service::{FacultyProfileService, PublicationService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Faculty profiles
// ============================================================================

/// Create the faculty profile of an existing user. A user has at most one.
#[utoipa::path(
    post,
    path = "/api/faculty-profiles",
    request_body = CreateFacultyProfileDto,
    responses(
        (status = 201, description = "Faculty profile created", body = FacultyProfile),
        (status = 400, description = "User already has a profile or unknown reference", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_faculty_profile(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateFacultyProfileDto>,
) -> Result<(StatusCode, Json<FacultyProfile>), AppError> {
    let faculty_profile = FacultyProfileService::create_faculty_profile(&state.db, dto).await?;
    track_record_created("faculty_profiles");
    Ok((StatusCode::CREATED, Json(faculty_profile)))
}

/// List faculty profiles with their nested user, optionally by department code.
#[utoipa::path(
    get,
    path = "/api/faculty-profiles",
    params(FacultyProfileFilterParams),
    responses(
        (status = 200, description = "Paginated list of faculty profiles", body = PaginatedFacultyProfilesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculty_profiles(
    State(state): State<AppState>,
    Query(filters): Query<FacultyProfileFilterParams>,
) -> Result<Json<PaginatedFacultyProfilesResponse>, AppError> {
    let faculty_profiles = FacultyProfileService::get_faculty_profiles(&state.db, filters).await?;
    Ok(Json(faculty_profiles))
}

#[utoipa::path(
    get,
    path = "/api/faculty-profiles/{id}",
    params(("id" = uuid::Uuid, Path, description = "Faculty profile ID")),
    responses(
        (status = 200, description = "Faculty profile details", body = FacultyProfile),
        (status = 404, description = "Faculty profile not found", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculty_profile(
    State(state): State<AppState>,
    Path(id): Path<FacultyProfileId>,
) -> Result<Json<FacultyProfile>, AppError> {
    let faculty_profile = FacultyProfileService::get_faculty_profile(&state.db, id).await?;
    Ok(Json(faculty_profile))
}

#[utoipa::path(
    put,
    path = "/api/faculty-profiles/{id}",
    params(("id" = uuid::Uuid, Path, description = "Faculty profile ID")),
    request_body = UpdateFacultyProfileDto,
    responses(
        (status = 200, description = "Faculty profile updated", body = FacultyProfile),
        (status = 400, description = "User already has a profile or unknown reference", body = ErrorResponse),
        (status = 404, description = "Faculty profile not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_faculty_profile(
    State(state): State<AppState>,
    Path(id): Path<FacultyProfileId>,
    ValidatedJson(dto): ValidatedJson<UpdateFacultyProfileDto>,
) -> Result<Json<FacultyProfile>, AppError> {
    let faculty_profile = FacultyProfileService::update_faculty_profile(&state.db, id, dto).await?;
    Ok(Json(faculty_profile))
}

#[utoipa::path(
    delete,
    path = "/api/faculty-profiles/{id}",
    params(("id" = uuid::Uuid, Path, description = "Faculty profile ID")),
    responses(
        (status = 204, description = "Faculty profile deleted"),
        (status = 404, description = "Faculty profile not found", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_faculty_profile(
    State(state): State<AppState>,
    Path(id): Path<FacultyProfileId>,
) -> Result<StatusCode, AppError> {
    FacultyProfileService::delete_faculty_profile(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Publications
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/publications",
    request_body = CreatePublicationDto,
    responses(
        (status = 201, description = "Publication created", body = Publication),
        (status = 400, description = "Unknown faculty profile", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_publication(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePublicationDto>,
) -> Result<(StatusCode, Json<Publication>), AppError> {
    let publication = PublicationService::create_publication(&state.db, dto).await?;
    track_record_created("publications");
    Ok((StatusCode::CREATED, Json(publication)))
}

/// List publications. `faculty` takes the author's user id, not the profile id.
#[utoipa::path(
    get,
    path = "/api/publications",
    params(PublicationFilterParams),
    responses(
        (status = 200, description = "Paginated list of publications", body = PaginatedPublicationsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_publications(
    State(state): State<AppState>,
    Query(filters): Query<PublicationFilterParams>,
) -> Result<Json<PaginatedPublicationsResponse>, AppError> {
    let publications = PublicationService::get_publications(&state.db, filters).await?;
    Ok(Json(publications))
}

#[utoipa::path(
    get,
    path = "/api/publications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Publication ID")),
    responses(
        (status = 200, description = "Publication details", body = Publication),
        (status = 404, description = "Publication not found", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_publication(
    State(state): State<AppState>,
    Path(id): Path<PublicationId>,
) -> Result<Json<Publication>, AppError> {
    let publication = PublicationService::get_publication(&state.db, id).await?;
    Ok(Json(publication))
}

#[utoipa::path(
    put,
    path = "/api/publications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Publication ID")),
    request_body = UpdatePublicationDto,
    responses(
        (status = 200, description = "Publication updated", body = Publication),
        (status = 404, description = "Publication not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_publication(
    State(state): State<AppState>,
    Path(id): Path<PublicationId>,
    ValidatedJson(dto): ValidatedJson<UpdatePublicationDto>,
) -> Result<Json<Publication>, AppError> {
    let publication = PublicationService::update_publication(&state.db, id, dto).await?;
    Ok(Json(publication))
}

#[utoipa::path(
    delete,
    path = "/api/publications/{id}",
    params(("id" = uuid::Uuid, Path, description = "Publication ID")),
    responses(
        (status = 204, description = "Publication deleted"),
        (status = 404, description = "Publication not found", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_publication(
    State(state): State<AppState>,
    Path(id): Path<PublicationId>,
) -> Result<StatusCode, AppError> {
    PublicationService::delete_publication(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
