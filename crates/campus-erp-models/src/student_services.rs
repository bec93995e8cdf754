//! Counseling, health and fitness services offered to students.

use campus_erp_core::serde::{deserialize_flag, deserialize_optional_parsed};
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub use crate::choices::SessionType;
use crate::ids::{CounselingAppointmentId, FitnessClassId, HealthRecordId, UserId};

pub const DEFAULT_APPOINTMENT_STATUS: &str = "SCHEDULED";

// ============================================================================
// Counseling appointment
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CounselingAppointment {
    pub id: CounselingAppointmentId,
    pub student_id: UserId,
    pub student_name: String,
    pub counselor_id: UserId,
    pub counselor_name: String,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub time: NaiveTime,
    pub session_type: SessionType,
    pub reason: String,
    /// Free text, `SCHEDULED` unless changed
    pub status: String,
}

fn default_appointment_status() -> String {
    DEFAULT_APPOINTMENT_STATUS.to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCounselingAppointmentDto {
    pub student_id: UserId,
    pub counselor_id: UserId,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub time: NaiveTime,
    pub session_type: SessionType,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_appointment_status")]
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCounselingAppointmentDto {
    pub student_id: Option<UserId>,
    pub counselor_id: Option<UserId>,
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub time: Option<NaiveTime>,
    pub session_type: Option<SessionType>,
    pub reason: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CounselingAppointmentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub student: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub counselor: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCounselingAppointmentsResponse {
    pub data: Vec<CounselingAppointment>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Health record
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HealthRecord {
    pub id: HealthRecordId,
    pub student_id: UserId,
    pub student_name: String,
    pub visit_date: NaiveDate,
    pub visit_type: String,
    pub diagnosis: String,
    pub prescription: String,
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHealthRecordDto {
    pub student_id: UserId,
    pub visit_date: NaiveDate,
    #[validate(length(min = 1, max = 100))]
    pub visit_type: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHealthRecordDto {
    pub student_id: Option<UserId>,
    pub visit_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100))]
    pub visit_type: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct HealthRecordFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub student: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedHealthRecordsResponse {
    pub data: Vec<HealthRecord>,
    pub meta: PaginationMeta,
}

// ============================================================================
// Fitness class
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FitnessClass {
    pub id: FitnessClassId,
    pub name: String,
    pub instructor: String,
    #[schema(example = "Mon/Wed 18:00")]
    pub schedule: String,
    pub capacity: i32,
    pub enrolled: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FitnessClassView {
    #[serde(flatten)]
    pub class: FitnessClass,
    /// Free places left
    pub availability: i32,
}

impl From<FitnessClass> for FitnessClassView {
    fn from(class: FitnessClass) -> Self {
        let availability = open_spots(class.capacity, class.enrolled);
        Self {
            class,
            availability,
        }
    }
}

pub fn open_spots(capacity: i32, enrolled: i32) -> i32 {
    capacity - enrolled
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_enrollment"))]
pub struct CreateFitnessClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub instructor: String,
    #[validate(length(min = 1, max = 100))]
    pub schedule: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub enrolled: i32,
    #[serde(default)]
    pub description: String,
}

fn validate_enrollment(dto: &CreateFitnessClassDto) -> Result<(), ValidationError> {
    enrollment_within_capacity(dto.enrolled, dto.capacity)
}

pub fn enrollment_within_capacity(enrolled: i32, capacity: i32) -> Result<(), ValidationError> {
    if enrolled > capacity {
        return Err(ValidationError::new("enrollment")
            .with_message("enrolled cannot exceed capacity".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFitnessClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub instructor: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub schedule: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub enrolled: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FitnessClassFilterParams {
    /// Any truthy value keeps only classes with a free place
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<String>)]
    pub available: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFitnessClassesResponse {
    pub data: Vec<FitnessClassView>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_status_defaults_to_scheduled() {
        let dto: CreateCounselingAppointmentDto = serde_json::from_str(&format!(
            r#"{{"student_id":"{}","counselor_id":"{}","date":"2025-03-03","time":"09:30:00","session_type":"VIRTUAL"}}"#,
            UserId::new(),
            UserId::new()
        ))
        .unwrap();
        assert_eq!(dto.status, "SCHEDULED");
        assert_eq!(dto.session_type, SessionType::Virtual);
        assert_eq!(dto.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_fitness_view_reports_open_spots() {
        let view = FitnessClassView::from(FitnessClass {
            id: FitnessClassId::new(),
            name: "Yoga".to_string(),
            instructor: "Sam".to_string(),
            schedule: "Tue 07:00".to_string(),
            capacity: 20,
            enrolled: 18,
            description: String::new(),
        });
        assert_eq!(view.availability, 2);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Yoga");
        assert_eq!(json["availability"], 2);
    }

    #[test]
    fn test_enrollment_cannot_exceed_capacity() {
        assert!(enrollment_within_capacity(21, 20).is_err());
        assert!(enrollment_within_capacity(20, 20).is_ok());
    }

    #[test]
    fn test_health_record_requires_visit_type() {
        let dto = CreateHealthRecordDto {
            student_id: UserId::new(),
            visit_date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            visit_type: String::new(),
            diagnosis: String::new(),
            prescription: String::new(),
            notes: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
