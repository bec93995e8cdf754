use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::research::model::{
    CreateResearchGrantDto, CreateResearchProjectDto, PaginatedResearchGrantsResponse,
    PaginatedResearchProjectsResponse, ResearchGrant, ResearchGrantFilterParams, ResearchGrantId,
    ResearchProject, ResearchProjectFilterParams, ResearchProjectId, UpdateResearchGrantDto,
    UpdateResearchProjectDto,
};
use crate::modules::research::service::{ResearchGrantService, ResearchProjectService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Research grants
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/research-grants",
    request_body = CreateResearchGrantDto,
    responses(
        (status = 201, description = "Research grant created", body = ResearchGrant),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_research_grant(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateResearchGrantDto>,
) -> Result<(StatusCode, Json<ResearchGrant>), AppError> {
    let research_grant = ResearchGrantService::create_research_grant(&state.db, dto).await?;
    track_record_created("research_grants");
    Ok((StatusCode::CREATED, Json(research_grant)))
}

#[utoipa::path(
    get,
    path = "/api/research-grants",
    params(ResearchGrantFilterParams),
    responses(
        (status = 200, description = "Paginated list of research grants", body = PaginatedResearchGrantsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_research_grants(
    State(state): State<AppState>,
    Query(filters): Query<ResearchGrantFilterParams>,
) -> Result<Json<PaginatedResearchGrantsResponse>, AppError> {
    let research_grants = ResearchGrantService::get_research_grants(&state.db, filters).await?;
    Ok(Json(research_grants))
}

#[utoipa::path(
    get,
    path = "/api/research-grants/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research grant ID")),
    responses(
        (status = 200, description = "Research grant details", body = ResearchGrant),
        (status = 404, description = "Research grant not found", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_research_grant(
    State(state): State<AppState>,
    Path(id): Path<ResearchGrantId>,
) -> Result<Json<ResearchGrant>, AppError> {
    let research_grant = ResearchGrantService::get_research_grant(&state.db, id).await?;
    Ok(Json(research_grant))
}

#[utoipa::path(
    put,
    path = "/api/research-grants/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research grant ID")),
    request_body = UpdateResearchGrantDto,
    responses(
        (status = 200, description = "Research grant updated", body = ResearchGrant),
        (status = 404, description = "Research grant not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_research_grant(
    State(state): State<AppState>,
    Path(id): Path<ResearchGrantId>,
    ValidatedJson(dto): ValidatedJson<UpdateResearchGrantDto>,
) -> Result<Json<ResearchGrant>, AppError> {
    let research_grant = ResearchGrantService::update_research_grant(&state.db, id, dto).await?;
    Ok(Json(research_grant))
}

#[utoipa::path(
    delete,
    path = "/api/research-grants/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research grant ID")),
    responses(
        (status = 204, description = "Research grant deleted"),
        (status = 404, description = "Research grant not found", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_research_grant(
    State(state): State<AppState>,
    Path(id): Path<ResearchGrantId>,
) -> Result<StatusCode, AppError> {
    ResearchGrantService::delete_research_grant(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Research projects
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/research-projects",
    request_body = CreateResearchProjectDto,
    responses(
        (status = 201, description = "Research project created", body = ResearchProject),
        (status = 400, description = "Unknown faculty profile", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_research_project(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateResearchProjectDto>,
) -> Result<(StatusCode, Json<ResearchProject>), AppError> {
    let research_project = ResearchProjectService::create_research_project(&state.db, dto).await?;
    track_record_created("research_projects");
    Ok((StatusCode::CREATED, Json(research_project)))
}

/// List research projects.
///
/// `investigator` is a user id and matches projects where that user is the
/// principal investigator or a co-investigator.
#[utoipa::path(
    get,
    path = "/api/research-projects",
    params(ResearchProjectFilterParams),
    responses(
        (status = 200, description = "Paginated list of research projects", body = PaginatedResearchProjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_research_projects(
    State(state): State<AppState>,
    Query(filters): Query<ResearchProjectFilterParams>,
) -> Result<Json<PaginatedResearchProjectsResponse>, AppError> {
    let research_projects =
        ResearchProjectService::get_research_projects(&state.db, filters).await?;
    Ok(Json(research_projects))
}

#[utoipa::path(
    get,
    path = "/api/research-projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research project ID")),
    responses(
        (status = 200, description = "Research project details", body = ResearchProject),
        (status = 404, description = "Research project not found", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_research_project(
    State(state): State<AppState>,
    Path(id): Path<ResearchProjectId>,
) -> Result<Json<ResearchProject>, AppError> {
    let research_project = ResearchProjectService::get_research_project(&state.db, id).await?;
    Ok(Json(research_project))
}

/// Update a research project. A `co_investigators` array replaces the whole set.
#[utoipa::path(
    put,
    path = "/api/research-projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research project ID")),
    request_body = UpdateResearchProjectDto,
    responses(
        (status = 200, description = "Research project updated", body = ResearchProject),
        (status = 400, description = "Unknown faculty profile", body = ErrorResponse),
        (status = 404, description = "Research project not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_research_project(
    State(state): State<AppState>,
    Path(id): Path<ResearchProjectId>,
    ValidatedJson(dto): ValidatedJson<UpdateResearchProjectDto>,
) -> Result<Json<ResearchProject>, AppError> {
    let research_project =
        ResearchProjectService::update_research_project(&state.db, id, dto).await?;
    Ok(Json(research_project))
}

#[utoipa::path(
    delete,
    path = "/api/research-projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Research project ID")),
    responses(
        (status = 204, description = "Research project deleted"),
        (status = 404, description = "Research project not found", body = ErrorResponse)
    ),
    tag = "Research",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_research_project(
    State(state): State<AppState>,
    Path(id): Path<ResearchProjectId>,
) -> Result<StatusCode, AppError> {
    ResearchProjectService::delete_research_project(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
