use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::library::model::{
    CreateLibraryBorrowingDto, CreateLibraryResourceDto, LibraryBorrowing,
    LibraryBorrowingFilterParams, LibraryBorrowingId, LibraryResourceFilterParams,
    LibraryResourceId, LibraryResourceView, PaginatedLibraryBorrowingsResponse,
    PaginatedLibraryResourcesResponse, UpdateLibraryBorrowingDto, UpdateLibraryResourceDto,
};
use crate::modules::library::service::{LibraryBorrowingService, LibraryResourceService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Library resources
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/library-resources",
    request_body = CreateLibraryResourceDto,
    responses(
        (status = 201, description = "Library resource created", body = LibraryResourceView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_library_resource(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLibraryResourceDto>,
) -> Result<(StatusCode, Json<LibraryResourceView>), AppError> {
    let library_resource = LibraryResourceService::create_library_resource(&state.db, dto).await?;
    track_record_created("library_resources");
    Ok((StatusCode::CREATED, Json(library_resource)))
}

/// List library resources by `type`; a truthy `available` keeps only those with a copy on the shelf.
#[utoipa::path(
    get,
    path = "/api/library-resources",
    params(LibraryResourceFilterParams),
    responses(
        (status = 200, description = "Paginated list of library resources", body = PaginatedLibraryResourcesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_library_resources(
    State(state): State<AppState>,
    Query(filters): Query<LibraryResourceFilterParams>,
) -> Result<Json<PaginatedLibraryResourcesResponse>, AppError> {
    let library_resources =
        LibraryResourceService::get_library_resources(&state.db, filters).await?;
    Ok(Json(library_resources))
}

#[utoipa::path(
    get,
    path = "/api/library-resources/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library resource ID")),
    responses(
        (status = 200, description = "Library resource details", body = LibraryResourceView),
        (status = 404, description = "Library resource not found", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_library_resource(
    State(state): State<AppState>,
    Path(id): Path<LibraryResourceId>,
) -> Result<Json<LibraryResourceView>, AppError> {
    let library_resource = LibraryResourceService::get_library_resource(&state.db, id).await?;
    Ok(Json(library_resource))
}

#[utoipa::path(
    put,
    path = "/api/library-resources/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library resource ID")),
    request_body = UpdateLibraryResourceDto,
    responses(
        (status = 200, description = "Library resource updated", body = LibraryResourceView),
        (status = 404, description = "Library resource not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_library_resource(
    State(state): State<AppState>,
    Path(id): Path<LibraryResourceId>,
    ValidatedJson(dto): ValidatedJson<UpdateLibraryResourceDto>,
) -> Result<Json<LibraryResourceView>, AppError> {
    let library_resource =
        LibraryResourceService::update_library_resource(&state.db, id, dto).await?;
    Ok(Json(library_resource))
}

#[utoipa::path(
    delete,
    path = "/api/library-resources/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library resource ID")),
    responses(
        (status = 204, description = "Library resource deleted"),
        (status = 404, description = "Library resource not found", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_library_resource(
    State(state): State<AppState>,
    Path(id): Path<LibraryResourceId>,
) -> Result<StatusCode, AppError> {
    LibraryResourceService::delete_library_resource(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Library borrowings
// ============================================================================

/// Borrow a resource. Without a `return_date` this takes one available copy.
#[utoipa::path(
    post,
    path = "/api/library-borrowings",
    request_body = CreateLibraryBorrowingDto,
    responses(
        (status = 201, description = "Library borrowing created", body = LibraryBorrowing),
        (status = 400, description = "No copies available or unknown reference", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_library_borrowing(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLibraryBorrowingDto>,
) -> Result<(StatusCode, Json<LibraryBorrowing>), AppError> {
    let library_borrowing =
        LibraryBorrowingService::create_library_borrowing(&state.db, dto).await?;
    track_record_created("library_borrowings");
    Ok((StatusCode::CREATED, Json(library_borrowing)))
}

#[utoipa::path(
    get,
    path = "/api/library-borrowings",
    params(LibraryBorrowingFilterParams),
    responses(
        (status = 200, description = "Paginated list of library borrowings", body = PaginatedLibraryBorrowingsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_library_borrowings(
    State(state): State<AppState>,
    Query(filters): Query<LibraryBorrowingFilterParams>,
) -> Result<Json<PaginatedLibraryBorrowingsResponse>, AppError> {
    let library_borrowings =
        LibraryBorrowingService::get_library_borrowings(&state.db, filters).await?;
    Ok(Json(library_borrowings))
}

#[utoipa::path(
    get,
    path = "/api/library-borrowings/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library borrowing ID")),
    responses(
        (status = 200, description = "Library borrowing details", body = LibraryBorrowing),
        (status = 404, description = "Library borrowing not found", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_library_borrowing(
    State(state): State<AppState>,
    Path(id): Path<LibraryBorrowingId>,
) -> Result<Json<LibraryBorrowing>, AppError> {
    let library_borrowing = LibraryBorrowingService::get_library_borrowing(&state.db, id).await?;
    Ok(Json(library_borrowing))
}

/// Update a borrowing. Setting `return_date` puts the copy back on the shelf.
#[utoipa::path(
    put,
    path = "/api/library-borrowings/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library borrowing ID")),
    request_body = UpdateLibraryBorrowingDto,
    responses(
        (status = 200, description = "Library borrowing updated", body = LibraryBorrowing),
        (status = 400, description = "No copies available or unknown reference", body = ErrorResponse),
        (status = 404, description = "Library borrowing not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_library_borrowing(
    State(state): State<AppState>,
    Path(id): Path<LibraryBorrowingId>,
    ValidatedJson(dto): ValidatedJson<UpdateLibraryBorrowingDto>,
) -> Result<Json<LibraryBorrowing>, AppError> {
    let library_borrowing =
        LibraryBorrowingService::update_library_borrowing(&state.db, id, dto).await?;
    Ok(Json(library_borrowing))
}

/// Delete a borrowing, returning its copy if it was still out.
#[utoipa::path(
    delete,
    path = "/api/library-borrowings/{id}",
    params(("id" = uuid::Uuid, Path, description = "Library borrowing ID")),
    responses(
        (status = 204, description = "Library borrowing deleted"),
        (status = 404, description = "Library borrowing not found", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_library_borrowing(
    State(state): State<AppState>,
    Path(id): Path<LibraryBorrowingId>,
) -> Result<StatusCode, AppError> {
    LibraryBorrowingService::delete_library_borrowing(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
