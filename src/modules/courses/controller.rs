use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::courses::model::{
    Course, CourseFilterParams, CourseId, CreateCourseDto, PaginatedCoursesResponse,
    UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Duplicate code, unknown reference or self-prerequisite", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    track_record_created("courses");
    Ok((StatusCode::CREATED, Json(course)))
}

/// List courses, optionally narrowed to one department by its code.
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Paginated list of courses", body = PaginatedCoursesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let courses = CourseService::get_courses(&state.db, filters).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = uuid::Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(course))
}

/// Update a course. A `prerequisites` array replaces the whole set.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = uuid::Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Duplicate code, unknown reference or self-prerequisite", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = uuid::Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
