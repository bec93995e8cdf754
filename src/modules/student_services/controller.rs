use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::student_services::model::{
    CounselingAppointment, CounselingAppointmentFilterParams, CounselingAppointmentId,
    CreateCounselingAppointmentDto, CreateFitnessClassDto, CreateHealthRecordDto,
    FitnessClassFilterParams, FitnessClassId, FitnessClassView, HealthRecord,
    HealthRecordFilterParams, HealthRecordId, PaginatedCounselingAppointmentsResponse,
    PaginatedFitnessClassesResponse, PaginatedHealthRecordsResponse,
    UpdateCounselingAppointmentDto, UpdateFitnessClassDto, UpdateHealthRecordDto,
};
use crate::modules::student_services::service::{
    CounselingAppointmentService, FitnessClassService, HealthRecordService,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Counseling appointments
// ============================================================================

/// Schedule a counseling session. `status` defaults to `SCHEDULED`.
#[utoipa::path(
    post,
    path = "/api/counseling-appointments",
    request_body = CreateCounselingAppointmentDto,
    responses(
        (status = 201, description = "Counseling appointment created", body = CounselingAppointment),
        (status = 400, description = "Unknown student or counselor", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_counseling_appointment(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCounselingAppointmentDto>,
) -> Result<(StatusCode, Json<CounselingAppointment>), AppError> {
    let counseling_appointment =
        CounselingAppointmentService::create_counseling_appointment(&state.db, dto).await?;
    track_record_created("counseling_appointments");
    Ok((StatusCode::CREATED, Json(counseling_appointment)))
}

#[utoipa::path(
    get,
    path = "/api/counseling-appointments",
    params(CounselingAppointmentFilterParams),
    responses(
        (status = 200, description = "Paginated list of counseling appointments", body = PaginatedCounselingAppointmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_counseling_appointments(
    State(state): State<AppState>,
    Query(filters): Query<CounselingAppointmentFilterParams>,
) -> Result<Json<PaginatedCounselingAppointmentsResponse>, AppError> {
    let counseling_appointments =
        CounselingAppointmentService::get_counseling_appointments(&state.db, filters).await?;
    Ok(Json(counseling_appointments))
}

#[utoipa::path(
    get,
    path = "/api/counseling-appointments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Counseling appointment ID")),
    responses(
        (status = 200, description = "Counseling appointment details", body = CounselingAppointment),
        (status = 404, description = "Counseling appointment not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_counseling_appointment(
    State(state): State<AppState>,
    Path(id): Path<CounselingAppointmentId>,
) -> Result<Json<CounselingAppointment>, AppError> {
    let counseling_appointment =
        CounselingAppointmentService::get_counseling_appointment(&state.db, id).await?;
    Ok(Json(counseling_appointment))
}

#[utoipa::path(
    put,
    path = "/api/counseling-appointments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Counseling appointment ID")),
    request_body = UpdateCounselingAppointmentDto,
    responses(
        (status = 200, description = "Counseling appointment updated", body = CounselingAppointment),
        (status = 404, description = "Counseling appointment not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_counseling_appointment(
    State(state): State<AppState>,
    Path(id): Path<CounselingAppointmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateCounselingAppointmentDto>,
) -> Result<Json<CounselingAppointment>, AppError> {
    let counseling_appointment =
        CounselingAppointmentService::update_counseling_appointment(&state.db, id, dto).await?;
    Ok(Json(counseling_appointment))
}

#[utoipa::path(
    delete,
    path = "/api/counseling-appointments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Counseling appointment ID")),
    responses(
        (status = 204, description = "Counseling appointment deleted"),
        (status = 404, description = "Counseling appointment not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_counseling_appointment(
    State(state): State<AppState>,
    Path(id): Path<CounselingAppointmentId>,
) -> Result<StatusCode, AppError> {
    CounselingAppointmentService::delete_counseling_appointment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Health records
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/health-records",
    request_body = CreateHealthRecordDto,
    responses(
        (status = 201, description = "Health record created", body = HealthRecord),
        (status = 400, description = "Unknown student", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_health_record(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateHealthRecordDto>,
) -> Result<(StatusCode, Json<HealthRecord>), AppError> {
    let health_record = HealthRecordService::create_health_record(&state.db, dto).await?;
    track_record_created("health_records");
    Ok((StatusCode::CREATED, Json(health_record)))
}

#[utoipa::path(
    get,
    path = "/api/health-records",
    params(HealthRecordFilterParams),
    responses(
        (status = 200, description = "Paginated list of health records", body = PaginatedHealthRecordsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_health_records(
    State(state): State<AppState>,
    Query(filters): Query<HealthRecordFilterParams>,
) -> Result<Json<PaginatedHealthRecordsResponse>, AppError> {
    let health_records = HealthRecordService::get_health_records(&state.db, filters).await?;
    Ok(Json(health_records))
}

#[utoipa::path(
    get,
    path = "/api/health-records/{id}",
    params(("id" = uuid::Uuid, Path, description = "Health record ID")),
    responses(
        (status = 200, description = "Health record details", body = HealthRecord),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
) -> Result<Json<HealthRecord>, AppError> {
    let health_record = HealthRecordService::get_health_record(&state.db, id).await?;
    Ok(Json(health_record))
}

#[utoipa::path(
    put,
    path = "/api/health-records/{id}",
    params(("id" = uuid::Uuid, Path, description = "Health record ID")),
    request_body = UpdateHealthRecordDto,
    responses(
        (status = 200, description = "Health record updated", body = HealthRecord),
        (status = 404, description = "Health record not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
    ValidatedJson(dto): ValidatedJson<UpdateHealthRecordDto>,
) -> Result<Json<HealthRecord>, AppError> {
    let health_record = HealthRecordService::update_health_record(&state.db, id, dto).await?;
    Ok(Json(health_record))
}

#[utoipa::path(
    delete,
    path = "/api/health-records/{id}",
    params(("id" = uuid::Uuid, Path, description = "Health record ID")),
    responses(
        (status = 204, description = "Health record deleted"),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
) -> Result<StatusCode, AppError> {
    HealthRecordService::delete_health_record(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Fitness classes
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/fitness-classes",
    request_body = CreateFitnessClassDto,
    responses(
        (status = 201, description = "Fitness class created", body = FitnessClassView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_fitness_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateFitnessClassDto>,
) -> Result<(StatusCode, Json<FitnessClassView>), AppError> {
    let fitness_class = FitnessClassService::create_fitness_class(&state.db, dto).await?;
    track_record_created("fitness_classes");
    Ok((StatusCode::CREATED, Json(fitness_class)))
}

#[utoipa::path(
    get,
    path = "/api/fitness-classes",
    params(FitnessClassFilterParams),
    responses(
        (status = 200, description = "Paginated list of fitness classes", body = PaginatedFitnessClassesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_fitness_classes(
    State(state): State<AppState>,
    Query(filters): Query<FitnessClassFilterParams>,
) -> Result<Json<PaginatedFitnessClassesResponse>, AppError> {
    let fitness_classes = FitnessClassService::get_fitness_classes(&state.db, filters).await?;
    Ok(Json(fitness_classes))
}

#[utoipa::path(
    get,
    path = "/api/fitness-classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Fitness class ID")),
    responses(
        (status = 200, description = "Fitness class details", body = FitnessClassView),
        (status = 404, description = "Fitness class not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_fitness_class(
    State(state): State<AppState>,
    Path(id): Path<FitnessClassId>,
) -> Result<Json<FitnessClassView>, AppError> {
    let fitness_class = FitnessClassService::get_fitness_class(&state.db, id).await?;
    Ok(Json(fitness_class))
}

#[utoipa::path(
    put,
    path = "/api/fitness-classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Fitness class ID")),
    request_body = UpdateFitnessClassDto,
    responses(
        (status = 200, description = "Fitness class updated", body = FitnessClassView),
        (status = 404, description = "Fitness class not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_fitness_class(
    State(state): State<AppState>,
    Path(id): Path<FitnessClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateFitnessClassDto>,
) -> Result<Json<FitnessClassView>, AppError> {
    let fitness_class = FitnessClassService::update_fitness_class(&state.db, id, dto).await?;
    Ok(Json(fitness_class))
}

#[utoipa::path(
    delete,
    path = "/api/fitness-classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Fitness class ID")),
    responses(
        (status = 204, description = "Fitness class deleted"),
        (status = 404, description = "Fitness class not found", body = ErrorResponse)
    ),
    tag = "Student Services",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_fitness_class(
    State(state): State<AppState>,
    Path(id): Path<FitnessClassId>,
) -> Result<StatusCode, AppError> {
    FitnessClassService::delete_fitness_class(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
