//! Library catalogue and loans.

use campus_erp_core::serde::{deserialize_flag, deserialize_nullable, deserialize_optional_parsed};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::ResourceType;
use crate::ids::{LibraryBorrowingId, LibraryResourceId, UserId};
use crate::validation::date_order;

// ============================================================================
// Library resource
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryResource {
    pub id: LibraryResourceId,
    pub title: String,
    pub author: String,
    pub resource_type: ResourceType,
    pub isbn: String,
    pub location: String,
    pub available_copies: i32,
    pub total_copies: i32,
}

/// A resource together with its shelf status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryResourceView {
    #[serde(flatten)]
    pub resource: LibraryResource,
    /// `Available` or `Checked Out`
    pub availability_status: String,
}

impl From<LibraryResource> for LibraryResourceView {
    fn from(resource: LibraryResource) -> Self {
        let availability_status = availability_status(resource.available_copies).to_string();
        Self {
            resource,
            availability_status,
        }
    }
}

pub fn availability_status(available_copies: i32) -> &'static str {
    if available_copies > 0 {
        "Available"
    } else {
        "Checked Out"
    }
}

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_copies"))]
pub struct CreateLibraryResourceDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub author: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    #[validate(length(max = 13))]
    pub isbn: String,
    #[validate(length(max = 100))]
    pub location: String,
    #[serde(default = "one")]
    #[validate(range(min = 0))]
    pub available_copies: i32,
    #[serde(default = "one")]
    #[validate(range(min = 0))]
    pub total_copies: i32,
}

fn validate_copies(dto: &CreateLibraryResourceDto) -> Result<(), ValidationError> {
    copies_within_total(dto.available_copies, dto.total_copies)
}

pub fn copies_within_total(available: i32, total: i32) -> Result<(), ValidationError> {
    if available > total {
        return Err(ValidationError::new("copies")
            .with_message("available_copies cannot exceed total_copies".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLibraryResourceDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub author: Option<String>,
    pub resource_type: Option<ResourceType>,
    #[validate(length(max = 13))]
    pub isbn: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub available_copies: Option<i32>,
    #[validate(range(min = 0))]
    pub total_copies: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LibraryResourceFilterParams {
    #[serde(rename = "type", default, deserialize_with = "deserialize_optional_parsed")]
    pub resource_type: Option<ResourceType>,
    /// Any truthy value keeps only resources with a copy on the shelf
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<String>)]
    pub available: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLibraryResourcesResponse {
    pub data: Vec<LibraryResourceView>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Library borrowing
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryBorrowing {
    pub id: LibraryBorrowingId,
    pub resource_id: LibraryResourceId,
    pub resource_details: LibraryResourceView,
    pub user_id: UserId,
    pub user_name: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    /// `null` while the item is still out
    pub return_date: Option<NaiveDate>,
    pub renewals: i32,
}

// The borrowed resource arrives as `resource_*` columns of the same row.
impl<'r> FromRow<'r, PgRow> for LibraryBorrowing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let resource_id: LibraryResourceId = row.try_get("resource_id")?;
        let resource = LibraryResource {
            id: resource_id,
            title: row.try_get("resource_title")?,
            author: row.try_get("resource_author")?,
            resource_type: row.try_get("resource_resource_type")?,
            isbn: row.try_get("resource_isbn")?,
            location: row.try_get("resource_location")?,
            available_copies: row.try_get("resource_available_copies")?,
            total_copies: row.try_get("resource_total_copies")?,
        };
        Ok(Self {
            id: row.try_get("id")?,
            resource_id,
            resource_details: resource.into(),
            user_id: row.try_get("user_id")?,
            user_name: row.try_get("user_name")?,
            borrow_date: row.try_get("borrow_date")?,
            due_date: row.try_get("due_date")?,
            return_date: row.try_get("return_date")?,
            renewals: row.try_get("renewals")?,
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_loan_dates"))]
pub struct CreateLibraryBorrowingDto {
    pub resource_id: LibraryResourceId,
    pub user_id: UserId,
    /// Defaults to today
    #[serde(default = "today")]
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub renewals: i32,
}

fn validate_loan_dates(dto: &CreateLibraryBorrowingDto) -> Result<(), ValidationError> {
    date_order(dto.borrow_date, dto.due_date, ("borrow_date", "due_date"))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLibraryBorrowingDto {
    pub resource_id: Option<LibraryResourceId>,
    pub user_id: Option<UserId>,
    pub borrow_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Setting a date returns the item; `null` marks it as out again
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub return_date: Option<Option<NaiveDate>>,
    #[validate(range(min = 0))]
    pub renewals: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LibraryBorrowingFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub user: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLibraryBorrowingsResponse {
    pub data: Vec<LibraryBorrowing>,
    pub meta: PaginationMeta,
}
