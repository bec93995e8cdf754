//! Residence rooms and housing applications.

use campus_erp_core::serde::{deserialize_flag, deserialize_optional_parsed};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::{ApplicationStatus, RoomType};
use crate::ids::{HousingApplicationId, HousingId, SemesterId, UserId};

/// Rooms with this many free beds or fewer are reported as `Limited`.
pub const LIMITED_THRESHOLD: i32 = 2;

// ============================================================================
// Housing
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Housing {
    pub id: HousingId,
    pub building: String,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: i32,
    pub occupied: i32,
    pub semester_fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HousingView {
    #[serde(flatten)]
    pub housing: Housing,
    /// `Full`, `Limited` or `Available`
    pub availability: String,
}

impl From<Housing> for HousingView {
    fn from(housing: Housing) -> Self {
        let availability = housing_availability(housing.capacity, housing.occupied).to_string();
        Self {
            housing,
            availability,
        }
    }
}

pub fn housing_availability(capacity: i32, occupied: i32) -> &'static str {
    match capacity - occupied {
        free if free <= 0 => "Full",
        free if free <= LIMITED_THRESHOLD => "Limited",
        _ => "Available",
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_occupancy"))]
pub struct CreateHousingDto {
    #[validate(length(min = 1, max = 100))]
    pub building: String,
    #[validate(length(min = 1, max = 10))]
    pub room_number: String,
    pub room_type: RoomType,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub occupied: i32,
    #[validate(range(min = 0.0, max = 999_999.99))]
    pub semester_fee: f64,
}

fn validate_occupancy(dto: &CreateHousingDto) -> Result<(), ValidationError> {
    occupancy_within_capacity(dto.occupied, dto.capacity)
}

pub fn occupancy_within_capacity(occupied: i32, capacity: i32) -> Result<(), ValidationError> {
    if occupied > capacity {
        return Err(ValidationError::new("occupancy")
            .with_message("occupied cannot exceed capacity".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHousingDto {
    #[validate(length(min = 1, max = 100))]
    pub building: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub occupied: Option<i32>,
    #[validate(range(min = 0.0, max = 999_999.99))]
    pub semester_fee: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct HousingFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub room_type: Option<RoomType>,
    /// Any truthy value keeps only rooms with a free bed
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<String>)]
    pub available: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedHousingResponse {
    pub data: Vec<HousingView>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Housing application
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HousingApplication {
    pub id: HousingApplicationId,
    pub student_id: UserId,
    pub student_name: String,
    pub preferred_building: String,
    pub room_type: RoomType,
    pub semester_id: SemesterId,
    #[schema(example = "FALL 2024-2025")]
    pub semester_display: String,
    pub roommate_preference: String,
    pub special_requests: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHousingApplicationDto {
    pub student_id: UserId,
    #[validate(length(min = 1, max = 100))]
    pub preferred_building: String,
    pub room_type: RoomType,
    pub semester_id: SemesterId,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub roommate_preference: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHousingApplicationDto {
    pub student_id: Option<UserId>,
    #[validate(length(min = 1, max = 100))]
    pub preferred_building: Option<String>,
    pub room_type: Option<RoomType>,
    pub semester_id: Option<SemesterId>,
    #[validate(length(max = 200))]
    pub roommate_preference: Option<String>,
    pub special_requests: Option<String>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct HousingApplicationFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub student: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedHousingApplicationsResponse {
    pub data: Vec<HousingApplication>,
    pub meta: PaginationMeta,
}
