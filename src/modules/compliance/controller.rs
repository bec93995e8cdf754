use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::metrics::track_record_created;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::compliance::model::{
    Audit, AuditFilterParams, AuditId, ComplianceReport, ComplianceReportFilterParams,
    ComplianceReportId, CreateAuditDto, CreateComplianceReportDto, PaginatedAuditsResponse,
    PaginatedComplianceReportsResponse, UpdateAuditDto, UpdateComplianceReportDto,
};
use crate::modules::compliance::service::{AuditService, ComplianceReportService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

// ============================================================================
// Compliance reports
// ============================================================================

/// File a compliance report. Without `generated_by_id` the report is attributed to the caller.
#[utoipa::path(
    post,
    path = "/api/compliance-reports",
    request_body = CreateComplianceReportDto,
    responses(
        (status = 201, description = "Compliance report created", body = ComplianceReport),
        (status = 400, description = "Unknown author", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_compliance_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateComplianceReportDto>,
) -> Result<(StatusCode, Json<ComplianceReport>), AppError> {
    let compliance_report =
        ComplianceReportService::create_compliance_report(&state.db, dto, auth_user.id)
            .await?;
    track_record_created("compliance_reports");
    Ok((StatusCode::CREATED, Json(compliance_report)))
}

#[utoipa::path(
    get,
    path = "/api/compliance-reports",
    params(ComplianceReportFilterParams),
    responses(
        (status = 200, description = "Paginated list of compliance reports", body = PaginatedComplianceReportsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_compliance_reports(
    State(state): State<AppState>,
    Query(filters): Query<ComplianceReportFilterParams>,
) -> Result<Json<PaginatedComplianceReportsResponse>, AppError> {
    let compliance_reports =
        ComplianceReportService::get_compliance_reports(&state.db, filters).await?;
    Ok(Json(compliance_reports))
}

#[utoipa::path(
    get,
    path = "/api/compliance-reports/{id}",
    params(("id" = uuid::Uuid, Path, description = "Compliance report ID")),
    responses(
        (status = 200, description = "Compliance report details", body = ComplianceReport),
        (status = 404, description = "Compliance report not found", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_compliance_report(
    State(state): State<AppState>,
    Path(id): Path<ComplianceReportId>,
) -> Result<Json<ComplianceReport>, AppError> {
    let compliance_report = ComplianceReportService::get_compliance_report(&state.db, id).await?;
    Ok(Json(compliance_report))
}

#[utoipa::path(
    put,
    path = "/api/compliance-reports/{id}",
    params(("id" = uuid::Uuid, Path, description = "Compliance report ID")),
    request_body = UpdateComplianceReportDto,
    responses(
        (status = 200, description = "Compliance report updated", body = ComplianceReport),
        (status = 400, description = "Unknown author", body = ErrorResponse),
        (status = 404, description = "Compliance report not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_compliance_report(
    State(state): State<AppState>,
    Path(id): Path<ComplianceReportId>,
    ValidatedJson(dto): ValidatedJson<UpdateComplianceReportDto>,
) -> Result<Json<ComplianceReport>, AppError> {
    let compliance_report =
        ComplianceReportService::update_compliance_report(&state.db, id, dto).await?;
    Ok(Json(compliance_report))
}

#[utoipa::path(
    delete,
    path = "/api/compliance-reports/{id}",
    params(("id" = uuid::Uuid, Path, description = "Compliance report ID")),
    responses(
        (status = 204, description = "Compliance report deleted"),
        (status = 404, description = "Compliance report not found", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_compliance_report(
    State(state): State<AppState>,
    Path(id): Path<ComplianceReportId>,
) -> Result<StatusCode, AppError> {
    ComplianceReportService::delete_compliance_report(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Audits
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/audits",
    request_body = CreateAuditDto,
    responses(
        (status = 201, description = "Audit created", body = Audit),
        (status = 400, description = "Unknown department", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_audit(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAuditDto>,
) -> Result<(StatusCode, Json<Audit>), AppError> {
    let audit = AuditService::create_audit(&state.db, dto).await?;
    track_record_created("audits");
    Ok((StatusCode::CREATED, Json(audit)))
}

#[utoipa::path(
    get,
    path = "/api/audits",
    params(AuditFilterParams),
    responses(
        (status = 200, description = "Paginated list of audits", body = PaginatedAuditsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_audits(
    State(state): State<AppState>,
    Query(filters): Query<AuditFilterParams>,
) -> Result<Json<PaginatedAuditsResponse>, AppError> {
    let audits = AuditService::get_audits(&state.db, filters).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    get,
    path = "/api/audits/{id}",
    params(("id" = uuid::Uuid, Path, description = "Audit ID")),
    responses(
        (status = 200, description = "Audit details", body = Audit),
        (status = 404, description = "Audit not found", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_audit(
    State(state): State<AppState>,
    Path(id): Path<AuditId>,
) -> Result<Json<Audit>, AppError> {
    let audit = AuditService::get_audit(&state.db, id).await?;
    Ok(Json(audit))
}

#[utoipa::path(
    put,
    path = "/api/audits/{id}",
    params(("id" = uuid::Uuid, Path, description = "Audit ID")),
    request_body = UpdateAuditDto,
    responses(
        (status = 200, description = "Audit updated", body = Audit),
        (status = 400, description = "Unknown department", body = ErrorResponse),
        (status = 404, description = "Audit not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_audit(
    State(state): State<AppState>,
    Path(id): Path<AuditId>,
    ValidatedJson(dto): ValidatedJson<UpdateAuditDto>,
) -> Result<Json<Audit>, AppError> {
    let audit = AuditService::update_audit(&state.db, id, dto).await?;
    Ok(Json(audit))
}

#[utoipa::path(
    delete,
    path = "/api/audits/{id}",
    params(("id" = uuid::Uuid, Path, description = "Audit ID")),
    responses(
        (status = 204, description = "Audit deleted"),
        (status = 404, description = "Audit not found", body = ErrorResponse)
    ),
    tag = "Compliance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_audit(
    State(state): State<AppState>,
    Path(id): Path<AuditId>,
) -> Result<StatusCode, AppError> {
    AuditService::delete_audit(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
