use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::validation::unprocessable;

use crate::modules::student_services::model::{
    CounselingAppointment, CounselingAppointmentFilterParams, CounselingAppointmentId,
    CreateCounselingAppointmentDto, CreateFitnessClassDto, CreateHealthRecordDto, FitnessClass,
    FitnessClassFilterParams, FitnessClassId, FitnessClassView, HealthRecord,
    HealthRecordFilterParams, HealthRecordId, PaginatedCounselingAppointmentsResponse,
    PaginatedFitnessClassesResponse, PaginatedHealthRecordsResponse,
    UpdateCounselingAppointmentDto, UpdateFitnessClassDto, UpdateHealthRecordDto,
    enrollment_within_capacity,
};

const SELECT_APPOINTMENT: &str = r#"
    SELECT c.id, c.student_id, TRIM(s.first_name || ' ' || s.last_name) AS student_name,
           c.counselor_id, TRIM(co.first_name || ' ' || co.last_name) AS counselor_name,
           c.date, c.time, c.session_type, c.reason, c.status
    FROM counseling_appointments c
    JOIN users s ON s.id = c.student_id
    JOIN users co ON co.id = c.counselor_id"#;

const SELECT_HEALTH_RECORD: &str = r#"
    SELECT h.id, h.student_id, TRIM(s.first_name || ' ' || s.last_name) AS student_name,
           h.visit_date, h.visit_type, h.diagnosis, h.prescription, h.notes
    FROM health_records h
    JOIN users s ON s.id = h.student_id"#;

const SELECT_FITNESS_CLASS: &str = r#"
    SELECT f.id, f.name, f.instructor, f.schedule, f.capacity, f.enrolled, f.description
    FROM fitness_classes f"#;

fn push_appointment_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &CounselingAppointmentFilterParams,
) {
    qb.push(" WHERE TRUE");
    if let Some(student_id) = filters.student {
        qb.push(" AND c.student_id = ").push_bind(student_id);
    }
    if let Some(counselor_id) = filters.counselor {
        qb.push(" AND c.counselor_id = ").push_bind(counselor_id);
    }
}

fn push_health_record_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &HealthRecordFilterParams,
) {
    qb.push(" WHERE TRUE");
    if let Some(student_id) = filters.student {
        qb.push(" AND h.student_id = ").push_bind(student_id);
    }
}

fn push_fitness_class_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &FitnessClassFilterParams,
) {
    qb.push(" WHERE TRUE");
    if filters.available {
        qb.push(" AND f.enrolled < f.capacity");
    }
}

pub struct CounselingAppointmentService;

impl CounselingAppointmentService {
    #[instrument(skip(db))]
    pub async fn create_counseling_appointment(
        db: &PgPool,
        dto: CreateCounselingAppointmentDto,
    ) -> Result<CounselingAppointment, AppError> {
        let id: CounselingAppointmentId = sqlx::query_scalar(
            r#"INSERT INTO counseling_appointments
                   (student_id, counselor_id, date, time, session_type, reason, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(dto.student_id)
        .bind(dto.counselor_id)
        .bind(dto.date)
        .bind(dto.time)
        .bind(dto.session_type)
        .bind(&dto.reason)
        .bind(&dto.status)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Appointment already exists"))?;

        Self::get_counseling_appointment(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_counseling_appointments(
        db: &PgPool,
        filters: CounselingAppointmentFilterParams,
    ) -> Result<PaginatedCounselingAppointmentsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM counseling_appointments c");
        push_appointment_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_APPOINTMENT);
        push_appointment_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY c.date DESC, c.time DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let appointments = data_query
            .build_query_as::<CounselingAppointment>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedCounselingAppointmentsResponse {
            data: appointments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_counseling_appointment(
        db: &PgPool,
        id: CounselingAppointmentId,
    ) -> Result<CounselingAppointment, AppError> {
        sqlx::query_as::<_, CounselingAppointment>(&format!("{} WHERE c.id = $1", SELECT_APPOINTMENT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Counseling appointment not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_counseling_appointment(
        db: &PgPool,
        id: CounselingAppointmentId,
        dto: UpdateCounselingAppointmentDto,
    ) -> Result<CounselingAppointment, AppError> {
        let existing = Self::get_counseling_appointment(db, id).await?;

        sqlx::query(
            r#"UPDATE counseling_appointments
               SET student_id = $1, counselor_id = $2, date = $3, time = $4,
                   session_type = $5, reason = $6, status = $7
               WHERE id = $8"#,
        )
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.counselor_id.unwrap_or(existing.counselor_id))
        .bind(dto.date.unwrap_or(existing.date))
        .bind(dto.time.unwrap_or(existing.time))
        .bind(dto.session_type.unwrap_or(existing.session_type))
        .bind(dto.reason.unwrap_or(existing.reason))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Appointment already exists"))?;

        Self::get_counseling_appointment(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_counseling_appointment(
        db: &PgPool,
        id: CounselingAppointmentId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM counseling_appointments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Counseling appointment not found")));
        }

        Ok(())
    }
}

pub struct HealthRecordService;

impl HealthRecordService {
    #[instrument(skip(db))]
    pub async fn create_health_record(
        db: &PgPool,
        dto: CreateHealthRecordDto,
    ) -> Result<HealthRecord, AppError> {
        let id: HealthRecordId = sqlx::query_scalar(
            r#"INSERT INTO health_records
                   (student_id, visit_date, visit_type, diagnosis, prescription, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.student_id)
        .bind(dto.visit_date)
        .bind(&dto.visit_type)
        .bind(&dto.diagnosis)
        .bind(&dto.prescription)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Health record already exists"))?;

        Self::get_health_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_health_records(
        db: &PgPool,
        filters: HealthRecordFilterParams,
    ) -> Result<PaginatedHealthRecordsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM health_records h");
        push_health_record_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_HEALTH_RECORD);
        push_health_record_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY h.visit_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let records = data_query
            .build_query_as::<HealthRecord>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedHealthRecordsResponse {
            data: records,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_health_record(
        db: &PgPool,
        id: HealthRecordId,
    ) -> Result<HealthRecord, AppError> {
        sqlx::query_as::<_, HealthRecord>(&format!("{} WHERE h.id = $1", SELECT_HEALTH_RECORD))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Health record not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_health_record(
        db: &PgPool,
        id: HealthRecordId,
        dto: UpdateHealthRecordDto,
    ) -> Result<HealthRecord, AppError> {
        let existing = Self::get_health_record(db, id).await?;

        sqlx::query(
            r#"UPDATE health_records
               SET student_id = $1, visit_date = $2, visit_type = $3, diagnosis = $4,
                   prescription = $5, notes = $6
               WHERE id = $7"#,
        )
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.visit_date.unwrap_or(existing.visit_date))
        .bind(dto.visit_type.unwrap_or(existing.visit_type))
        .bind(dto.diagnosis.unwrap_or(existing.diagnosis))
        .bind(dto.prescription.unwrap_or(existing.prescription))
        .bind(dto.notes.unwrap_or(existing.notes))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Health record already exists"))?;

        Self::get_health_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_health_record(db: &PgPool, id: HealthRecordId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM health_records WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Health record not found")));
        }

        Ok(())
    }
}

pub struct FitnessClassService;

impl FitnessClassService {
    #[instrument(skip(db))]
    pub async fn create_fitness_class(
        db: &PgPool,
        dto: CreateFitnessClassDto,
    ) -> Result<FitnessClassView, AppError> {
        let class = sqlx::query_as::<_, FitnessClass>(
            r#"INSERT INTO fitness_classes (name, instructor, schedule, capacity, enrolled, description)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, instructor, schedule, capacity, enrolled, description"#,
        )
        .bind(&dto.name)
        .bind(&dto.instructor)
        .bind(&dto.schedule)
        .bind(dto.capacity)
        .bind(dto.enrolled)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Fitness class already exists"))?;

        Ok(class.into())
    }

    #[instrument(skip(db))]
    pub async fn get_fitness_classes(
        db: &PgPool,
        filters: FitnessClassFilterParams,
    ) -> Result<PaginatedFitnessClassesResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM fitness_classes f");
        push_fitness_class_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_FITNESS_CLASS);
        push_fitness_class_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY f.name LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let classes = data_query
            .build_query_as::<FitnessClass>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedFitnessClassesResponse {
            data: classes.into_iter().map(FitnessClassView::from).collect(),
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_fitness_class(
        db: &PgPool,
        id: FitnessClassId,
    ) -> Result<FitnessClassView, AppError> {
        sqlx::query_as::<_, FitnessClass>(&format!("{} WHERE f.id = $1", SELECT_FITNESS_CLASS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(FitnessClassView::from)
            .ok_or_else(|| AppError::not_found(anyhow!("Fitness class not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_fitness_class(
        db: &PgPool,
        id: FitnessClassId,
        dto: UpdateFitnessClassDto,
    ) -> Result<FitnessClassView, AppError> {
        let existing = Self::get_fitness_class(db, id).await?.class;

        let capacity = dto.capacity.unwrap_or(existing.capacity);
        let enrolled = dto.enrolled.unwrap_or(existing.enrolled);
        enrollment_within_capacity(enrolled, capacity).map_err(unprocessable)?;

        let class = sqlx::query_as::<_, FitnessClass>(
            r#"UPDATE fitness_classes
               SET name = $1, instructor = $2, schedule = $3, capacity = $4,
                   enrolled = $5, description = $6
               WHERE id = $7
               RETURNING id, name, instructor, schedule, capacity, enrolled, description"#,
        )
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.instructor.unwrap_or(existing.instructor))
        .bind(dto.schedule.unwrap_or(existing.schedule))
        .bind(capacity)
        .bind(enrolled)
        .bind(dto.description.unwrap_or(existing.description))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Fitness class already exists"))?;

        Ok(class.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_fitness_class(db: &PgPool, id: FitnessClassId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fitness_classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Fitness class not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::ids::UserId;
    use campus_erp_models::student_services::{DEFAULT_APPOINTMENT_STATUS, SessionType};
    use chrono::{NaiveDate, NaiveTime};

    async fn user(pool: &PgPool, username: &str, role: &str) -> UserId {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ($1, $2, 'x', $1, 'Tester', $3) RETURNING id",
        )
        .bind(username)
        .bind(format!("{}@uni.edu", username))
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn class(name: &str, capacity: i32, enrolled: i32) -> CreateFitnessClassDto {
        CreateFitnessClassDto {
            name: name.to_string(),
            instructor: "Coach".to_string(),
            schedule: "Mon 18:00".to_string(),
            capacity,
            enrolled,
            description: String::new(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_appointment_names_and_default_status(pool: PgPool) {
        let student = user(&pool, "stu", "student").await;
        let counselor = user(&pool, "cou", "staff").await;

        let dto: CreateCounselingAppointmentDto = serde_json::from_str(&format!(
            r#"{{"student_id":"{}","counselor_id":"{}","date":"2025-04-02","time":"14:30:00","session_type":"VIRTUAL"}}"#,
            student, counselor
        ))
        .unwrap();
        let appointment = CounselingAppointmentService::create_counseling_appointment(&pool, dto)
            .await
            .unwrap();

        assert_eq!(appointment.status, DEFAULT_APPOINTMENT_STATUS);
        assert_eq!(appointment.student_name, "stu Tester");
        assert_eq!(appointment.counselor_name, "cou Tester");
        assert_eq!(appointment.session_type, SessionType::Virtual);
        assert_eq!(appointment.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());

        let by_counselor = CounselingAppointmentService::get_counseling_appointments(
            &pool,
            CounselingAppointmentFilterParams {
                student: None,
                counselor: Some(counselor),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_counselor.meta.total, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_health_records_filter_by_student(pool: PgPool) {
        let a = user(&pool, "a", "student").await;
        let b = user(&pool, "b", "student").await;
        for student_id in [a, b, b] {
            HealthRecordService::create_health_record(
                &pool,
                CreateHealthRecordDto {
                    student_id,
                    visit_date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
                    visit_type: "Checkup".to_string(),
                    diagnosis: String::new(),
                    prescription: String::new(),
                    notes: String::new(),
                },
            )
            .await
            .unwrap();
        }

        let page = HealthRecordService::get_health_records(
            &pool,
            HealthRecordFilterParams {
                student: Some(b),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 2);
        assert!(page.data.iter().all(|r| r.student_id == b));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_fitness_availability_and_filter(pool: PgPool) {
        let yoga = FitnessClassService::create_fitness_class(&pool, class("Yoga", 20, 15))
            .await
            .unwrap();
        assert_eq!(yoga.availability, 5);
        FitnessClassService::create_fitness_class(&pool, class("Spin", 10, 10))
            .await
            .unwrap();

        let open = FitnessClassService::get_fitness_classes(
            &pool,
            FitnessClassFilterParams {
                available: true,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(open.meta.total, 1);
        assert_eq!(open.data[0].class.name, "Yoga");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_fitness_update_rejects_overbooking(pool: PgPool) {
        let spin = FitnessClassService::create_fitness_class(&pool, class("Spin", 10, 5))
            .await
            .unwrap();
        let update: UpdateFitnessClassDto = serde_json::from_str(r#"{"capacity":4}"#).unwrap();
        let err = FitnessClassService::update_fitness_class(&pool, spin.class.id, update)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert_eq!(err.message(), "enrolled cannot exceed capacity");
    }
}
