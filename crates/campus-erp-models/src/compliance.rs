//! Compliance reporting and internal audits.

use campus_erp_core::serde::{deserialize_optional_parsed, deserialize_optional_string};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::{AuditStatus, ReportStatus};
use crate::ids::{AuditId, ComplianceReportId, DepartmentId, UserId};
use crate::validation::date_order;

// ============================================================================
// Compliance report
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ComplianceReport {
    pub id: ComplianceReportId,
    pub title: String,
    pub report_type: String,
    pub generated_by_id: UserId,
    pub generated_by_name: String,
    /// Set by the server when the report is created
    pub generated_on: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReportStatus,
    pub file_path: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_report_period"))]
pub struct CreateComplianceReportDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub report_type: String,
    /// Defaults to the authenticated user
    pub generated_by_id: Option<UserId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReportStatus,
    #[validate(length(max = 255))]
    pub file_path: String,
}

fn validate_report_period(dto: &CreateComplianceReportDto) -> Result<(), ValidationError> {
    date_order(dto.start_date, dto.end_date, ("start_date", "end_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateComplianceReportDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub report_type: Option<String>,
    pub generated_by_id: Option<UserId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ReportStatus>,
    #[validate(length(max = 255))]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ComplianceReportFilterParams {
    /// Report type, matched exactly
    #[serde(rename = "type", default, deserialize_with = "deserialize_optional_string")]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub status: Option<ReportStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedComplianceReportsResponse {
    pub data: Vec<ComplianceReport>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Audit
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Audit {
    pub id: AuditId,
    pub audit_type: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub assigned_to_id: DepartmentId,
    pub assigned_to_name: String,
    pub status: AuditStatus,
    pub findings: String,
    pub recommendations: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_audit_window"))]
pub struct CreateAuditDto {
    #[validate(length(min = 1, max = 100))]
    pub audit_type: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub assigned_to_id: DepartmentId,
    pub status: AuditStatus,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub recommendations: String,
}

fn validate_audit_window(dto: &CreateAuditDto) -> Result<(), ValidationError> {
    date_order(dto.start_date, dto.due_date, ("start_date", "due_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuditDto {
    #[validate(length(min = 1, max = 100))]
    pub audit_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to_id: Option<DepartmentId>,
    pub status: Option<AuditStatus>,
    pub findings: Option<String>,
    pub recommendations: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AuditFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub status: Option<AuditStatus>,
    /// Code of the assigned department
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAuditsResponse {
    pub data: Vec<Audit>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_author_is_valid() {
        let dto: CreateComplianceReportDto = serde_json::from_str(
            r#"{"title":"Q1 Safety","report_type":"SAFETY","start_date":"2025-01-01","end_date":"2025-03-31","status":"DRAFT","file_path":"/reports/q1.pdf"}"#,
        )
        .unwrap();
        assert!(dto.generated_by_id.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_report_filter_uses_type_key() {
        let params: ComplianceReportFilterParams =
            serde_json::from_str(r#"{"type":"FINANCIAL","status":"APPROVED"}"#).unwrap();
        assert_eq!(params.report_type.as_deref(), Some("FINANCIAL"));
        assert_eq!(params.status, Some(ReportStatus::Approved));
    }

    #[test]
    fn test_audit_due_date_must_follow_start() {
        let dto = CreateAuditDto {
            audit_type: "Financial".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            assigned_to_id: DepartmentId::new(),
            status: AuditStatus::Planned,
            findings: String::new(),
            recommendations: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
