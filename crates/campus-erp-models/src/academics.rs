//! Departments, academic calendar and courses.

use campus_erp_core::serde::{deserialize_nullable, deserialize_optional_string};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::SemesterName;
use crate::ids::{AcademicYearId, CourseId, DepartmentId, SemesterId, UserId};
use crate::validation::date_order;

// ============================================================================
// Department
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
    pub head_id: Option<UserId>,
    /// Full name of the head, when one is assigned
    pub head_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 10))]
    #[schema(example = "CS")]
    pub code: String,
    pub head_id: Option<UserId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub code: Option<String>,
    /// `null` clears the head
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub head_id: Option<Option<UserId>>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct DepartmentFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDepartmentsResponse {
    pub data: Vec<Department>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Academic year
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    #[schema(example = "2024-2025")]
    pub year: String,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn default_year() -> String {
    "2024-2025".to_string()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn a_year_from_today() -> NaiveDate {
    today() + Duration::days(365)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_academic_year_dates"))]
pub struct CreateAcademicYearDto {
    #[serde(default = "default_year")]
    #[validate(length(min = 1, max = 9))]
    pub year: String,
    #[serde(default)]
    pub is_active: bool,
    /// Defaults to today
    #[serde(default = "today")]
    pub start_date: NaiveDate,
    /// Defaults to one year from today
    #[serde(default = "a_year_from_today")]
    pub end_date: NaiveDate,
}

fn validate_academic_year_dates(dto: &CreateAcademicYearDto) -> Result<(), ValidationError> {
    date_order(dto.start_date, dto.end_date, ("start_date", "end_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAcademicYearDto {
    #[validate(length(min = 1, max = 9))]
    pub year: Option<String>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AcademicYearFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAcademicYearsResponse {
    pub data: Vec<AcademicYear>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Semester
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Semester {
    pub id: SemesterId,
    pub academic_year_id: AcademicYearId,
    /// The academic year label, e.g. `2024-2025`
    pub academic_year_display: String,
    pub name: SemesterName,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_semester_dates"))]
pub struct CreateSemesterDto {
    pub academic_year_id: AcademicYearId,
    pub name: SemesterName,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

fn validate_semester_dates(dto: &CreateSemesterDto) -> Result<(), ValidationError> {
    date_order(dto.start_date, dto.end_date, ("start_date", "end_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSemesterDto {
    pub academic_year_id: Option<AcademicYearId>,
    pub name: Option<SemesterName>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SemesterFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSemestersResponse {
    pub data: Vec<Semester>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Course
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    #[schema(example = "CS101")]
    pub code: String,
    pub name: String,
    pub department_id: DepartmentId,
    pub department_name: String,
    pub credits: i32,
    pub description: String,
    /// Courses that must be completed first
    pub prerequisites: Vec<CourseId>,
    pub instructor_id: Option<UserId>,
    pub instructor_name: Option<String>,
    pub semester_id: Option<SemesterId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 10))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub department_id: DepartmentId,
    #[validate(range(min = 1))]
    pub credits: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
    pub instructor_id: Option<UserId>,
    pub semester_id: Option<SemesterId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 10))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub department_id: Option<DepartmentId>,
    #[validate(range(min = 1))]
    pub credits: Option<i32>,
    pub description: Option<String>,
    /// Replaces the whole prerequisite set when present
    pub prerequisites: Option<Vec<CourseId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub instructor_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub semester_id: Option<Option<SemesterId>>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CourseFilterParams {
    /// Department code, e.g. `CS`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_department_dto_validation() {
        let valid = CreateDepartmentDto {
            name: "Computer Science".to_string(),
            code: "CS".to_string(),
            head_id: None,
        };
        assert!(valid.validate().is_ok());

        let long_code = CreateDepartmentDto {
            name: "Computer Science".to_string(),
            code: "COMPSCIENCE".to_string(),
            head_id: None,
        };
        assert!(long_code.validate().is_err());
    }

    #[test]
    fn test_update_department_dto_head_tristate() {
        let keep: UpdateDepartmentDto = serde_json::from_str(r#"{"name":"Physics"}"#).unwrap();
        assert!(keep.head_id.is_none());

        let clear: UpdateDepartmentDto = serde_json::from_str(r#"{"head_id":null}"#).unwrap();
        assert_eq!(clear.head_id, Some(None));
    }

    #[test]
    fn test_academic_year_defaults() {
        let dto: CreateAcademicYearDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.year, "2024-2025");
        assert!(!dto.is_active);
        assert_eq!(dto.end_date - dto.start_date, Duration::days(365));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_semester_dates_must_be_ordered() {
        let dto: CreateSemesterDto = serde_json::from_str(&format!(
            r#"{{"academic_year_id":"{}","name":"FALL","start_date":"2024-12-20","end_date":"2024-09-01"}}"#,
            AcademicYearId::new()
        ))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_course_credits_must_be_positive() {
        let dto = CreateCourseDto {
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            department_id: DepartmentId::new(),
            credits: 0,
            description: String::new(),
            prerequisites: vec![],
            instructor_id: None,
            semester_id: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_course_filter_ignores_empty_department() {
        let params: CourseFilterParams = serde_json::from_str(r#"{"department":""}"#).unwrap();
        assert!(params.department.is_none());

        let params: CourseFilterParams = serde_json::from_str(r#"{"department":"CS"}"#).unwrap();
        assert_eq!(params.department.as_deref(), Some("CS"));
    }
}
