//! Research grants and projects.
//!
//! Money columns are `NUMERIC(12, 2)` in the database and `f64` here.

use campus_erp_core::serde::deserialize_optional_parsed;
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::{GrantStatus, ProjectStatus};
use crate::ids::{FacultyProfileId, ResearchGrantId, ResearchProjectId, UserId};
use crate::validation::date_order;

// ============================================================================
// Research grant
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResearchGrant {
    pub id: ResearchGrantId,
    pub name: String,
    pub description: String,
    #[schema(example = 250000.0)]
    pub amount: f64,
    pub deadline: NaiveDate,
    pub status: GrantStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResearchGrantDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, max = 9_999_999_999.99))]
    pub amount: f64,
    pub deadline: NaiveDate,
    pub status: GrantStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResearchGrantDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 9_999_999_999.99))]
    pub amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<GrantStatus>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ResearchGrantFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub status: Option<GrantStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResearchGrantsResponse {
    pub data: Vec<ResearchGrant>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Research project
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResearchProject {
    pub id: ResearchProjectId,
    pub title: String,
    pub principal_investigator_id: FacultyProfileId,
    pub principal_investigator_name: String,
    pub co_investigators: Vec<FacultyProfileId>,
    /// Names in the same order as `co_investigators`
    pub co_investigators_names: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub status: ProjectStatus,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_project_dates"))]
pub struct CreateResearchProjectDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub principal_investigator_id: FacultyProfileId,
    #[serde(default)]
    pub co_investigators: Vec<FacultyProfileId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 0.0, max = 9_999_999_999.99))]
    pub budget: f64,
    pub status: ProjectStatus,
    #[serde(default)]
    pub description: String,
}

fn validate_project_dates(dto: &CreateResearchProjectDto) -> Result<(), ValidationError> {
    date_order(dto.start_date, dto.end_date, ("start_date", "end_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResearchProjectDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub principal_investigator_id: Option<FacultyProfileId>,
    /// Replaces the whole co-investigator set when present
    pub co_investigators: Option<Vec<FacultyProfileId>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0.0, max = 9_999_999_999.99))]
    pub budget: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ResearchProjectFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub status: Option<ProjectStatus>,
    /// User id of the principal investigator or of any co-investigator
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub investigator: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResearchProjectsResponse {
    pub data: Vec<ResearchProject>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_amount_cannot_be_negative() {
        let dto = CreateResearchGrantDto {
            name: "NSF".to_string(),
            description: String::new(),
            amount: -1.0,
            deadline: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status: GrantStatus::Open,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_project_dates_must_be_ordered() {
        let dto = CreateResearchProjectDto {
            title: "Quantum".to_string(),
            principal_investigator_id: FacultyProfileId::new(),
            co_investigators: vec![],
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            budget: 1000.0,
            status: ProjectStatus::Planning,
            description: String::new(),
        };
        let errors = dto.validate().unwrap_err();
        let message = errors.field_errors()["__all__"][0].message.clone().unwrap();
        assert_eq!(message, "end_date must not be before start_date");
    }

    #[test]
    fn test_project_filter_params() {
        let params: ResearchProjectFilterParams =
            serde_json::from_str(r#"{"status":"IN_PROGRESS","investigator":""}"#).unwrap();
        assert_eq!(params.status, Some(ProjectStatus::InProgress));
        assert!(params.investigator.is_none());

        assert!(
            serde_json::from_str::<ResearchProjectFilterParams>(r#"{"status":"DONE"}"#).is_err()
        );
    }
}
