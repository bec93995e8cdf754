//! Faculty profiles and their publications.

use campus_erp_core::serde::{
    deserialize_nullable, deserialize_optional_parsed, deserialize_optional_string,
};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{DepartmentId, FacultyProfileId, PublicationId, UserId};
use crate::users::User;

// ============================================================================
// Faculty profile
// ============================================================================

/// A faculty member's employment record, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacultyProfile {
    pub id: FacultyProfileId,
    pub user_id: UserId,
    pub user_details: User,
    pub department_id: Option<DepartmentId>,
    pub department_name: Option<String>,
    pub position: String,
    pub office_location: String,
    pub phone: String,
    pub bio: String,
    pub joining_date: NaiveDate,
}

// The nested user arrives as `user_*` columns of the same row.
impl<'r> FromRow<'r, PgRow> for FacultyProfile {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let user_id: UserId = row.try_get("user_id")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id,
            user_details: User {
                id: user_id,
                username: row.try_get("user_username")?,
                email: row.try_get("user_email")?,
                first_name: row.try_get("user_first_name")?,
                last_name: row.try_get("user_last_name")?,
                role: row.try_get("user_role")?,
                department: row.try_get("user_department")?,
                phone_number: row.try_get("user_phone_number")?,
                is_active: row.try_get("user_is_active")?,
                created_at: row.try_get("user_created_at")?,
                updated_at: row.try_get("user_updated_at")?,
            },
            department_id: row.try_get("department_id")?,
            department_name: row.try_get("department_name")?,
            position: row.try_get("position")?,
            office_location: row.try_get("office_location")?,
            phone: row.try_get("phone")?,
            bio: row.try_get("bio")?,
            joining_date: row.try_get("joining_date")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFacultyProfileDto {
    pub user_id: UserId,
    pub department_id: Option<DepartmentId>,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[validate(length(max = 100))]
    pub office_location: String,
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    pub joining_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFacultyProfileDto {
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub department_id: Option<Option<DepartmentId>>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 100))]
    pub office_location: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FacultyProfileFilterParams {
    /// Department code
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFacultyProfilesResponse {
    pub data: Vec<FacultyProfile>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Publication
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publication {
    pub id: PublicationId,
    pub faculty_id: FacultyProfileId,
    /// Full name of the authoring faculty member
    pub faculty_name: String,
    pub title: String,
    pub journal: String,
    pub publication_date: NaiveDate,
    pub doi: String,
    pub citation_count: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePublicationDto {
    pub faculty_id: FacultyProfileId,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub journal: String,
    pub publication_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub doi: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub citation_count: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePublicationDto {
    pub faculty_id: Option<FacultyProfileId>,
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub journal: Option<String>,
    pub publication_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub doi: Option<String>,
    #[validate(range(min = 0))]
    pub citation_count: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PublicationFilterParams {
    /// User id of the authoring faculty member
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub faculty: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPublicationsResponse {
    pub data: Vec<Publication>,
    pub meta: PaginationMeta,
}
