use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::validation::unprocessable;

use crate::modules::housing::model::{
    CreateHousingApplicationDto, CreateHousingDto, Housing, HousingApplication,
    HousingApplicationFilterParams, HousingApplicationId, HousingFilterParams, HousingId,
    HousingView, PaginatedHousingApplicationsResponse, PaginatedHousingResponse,
    UpdateHousingApplicationDto, UpdateHousingDto, occupancy_within_capacity,
};

const SELECT_HOUSING: &str = r#"
    SELECT h.id, h.building, h.room_number, h.room_type, h.capacity, h.occupied,
           h.semester_fee::FLOAT8 AS semester_fee
    FROM housing h"#;

const SELECT_APPLICATION: &str = r#"
    SELECT a.id, a.student_id, TRIM(u.first_name || ' ' || u.last_name) AS student_name,
           a.preferred_building, a.room_type, a.semester_id,
           s.name || ' ' || ay.year AS semester_display,
           a.roommate_preference, a.special_requests, a.status, a.created_at
    FROM housing_applications a
    JOIN users u ON u.id = a.student_id
    JOIN semesters s ON s.id = a.semester_id
    JOIN academic_years ay ON ay.id = s.academic_year_id"#;

const DUPLICATE_ROOM: &str = "This room already exists in the building";

fn push_housing_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &HousingFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(room_type) = filters.room_type {
        qb.push(" AND h.room_type = ").push_bind(room_type);
    }
    if filters.available {
        qb.push(" AND h.occupied < h.capacity");
    }
}

fn push_application_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &HousingApplicationFilterParams,
) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filters.status {
        qb.push(" AND a.status = ").push_bind(status);
    }
    if let Some(student_id) = filters.student {
        qb.push(" AND a.student_id = ").push_bind(student_id);
    }
}

pub struct HousingService;

impl HousingService {
    #[instrument(skip(db))]
    pub async fn create_housing(db: &PgPool, dto: CreateHousingDto) -> Result<HousingView, AppError> {
        let id: HousingId = sqlx::query_scalar(
            r#"INSERT INTO housing (building, room_number, room_type, capacity, occupied, semester_fee)
               VALUES ($1, $2, $3, $4, $5, $6::NUMERIC)
               RETURNING id"#,
        )
        .bind(&dto.building)
        .bind(&dto.room_number)
        .bind(dto.room_type)
        .bind(dto.capacity)
        .bind(dto.occupied)
        .bind(dto.semester_fee)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_ROOM))?;

        Self::get_housing(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_housing_list(
        db: &PgPool,
        filters: HousingFilterParams,
    ) -> Result<PaginatedHousingResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM housing h");
        push_housing_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_HOUSING);
        push_housing_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY h.building, h.room_number LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let rooms = data_query.build_query_as::<Housing>().fetch_all(db).await?;

        Ok(PaginatedHousingResponse {
            data: rooms.into_iter().map(HousingView::from).collect(),
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_housing(db: &PgPool, id: HousingId) -> Result<HousingView, AppError> {
        sqlx::query_as::<_, Housing>(&format!("{} WHERE h.id = $1", SELECT_HOUSING))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(HousingView::from)
            .ok_or_else(|| AppError::not_found(anyhow!("Housing not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_housing(
        db: &PgPool,
        id: HousingId,
        dto: UpdateHousingDto,
    ) -> Result<HousingView, AppError> {
        let existing = Self::get_housing(db, id).await?.housing;

        let capacity = dto.capacity.unwrap_or(existing.capacity);
        let occupied = dto.occupied.unwrap_or(existing.occupied);
        occupancy_within_capacity(occupied, capacity).map_err(unprocessable)?;

        sqlx::query(
            r#"UPDATE housing
               SET building = $1, room_number = $2, room_type = $3, capacity = $4,
                   occupied = $5, semester_fee = $6::NUMERIC
               WHERE id = $7"#,
        )
        .bind(dto.building.unwrap_or(existing.building))
        .bind(dto.room_number.unwrap_or(existing.room_number))
        .bind(dto.room_type.unwrap_or(existing.room_type))
        .bind(capacity)
        .bind(occupied)
        .bind(dto.semester_fee.unwrap_or(existing.semester_fee))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_ROOM))?;

        Self::get_housing(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_housing(db: &PgPool, id: HousingId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM housing WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Housing not found")));
        }

        Ok(())
    }
}

pub struct HousingApplicationService;

impl HousingApplicationService {
    #[instrument(skip(db))]
    pub async fn create_housing_application(
        db: &PgPool,
        dto: CreateHousingApplicationDto,
    ) -> Result<HousingApplication, AppError> {
        let id: HousingApplicationId = sqlx::query_scalar(
            r#"INSERT INTO housing_applications
                   (student_id, preferred_building, room_type, semester_id,
                    roommate_preference, special_requests, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(dto.student_id)
        .bind(&dto.preferred_building)
        .bind(dto.room_type)
        .bind(dto.semester_id)
        .bind(&dto.roommate_preference)
        .bind(&dto.special_requests)
        .bind(dto.status)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Housing application already exists"))?;

        Self::get_housing_application(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_housing_applications(
        db: &PgPool,
        filters: HousingApplicationFilterParams,
    ) -> Result<PaginatedHousingApplicationsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM housing_applications a");
        push_application_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_APPLICATION);
        push_application_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY a.created_at DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let applications = data_query
            .build_query_as::<HousingApplication>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedHousingApplicationsResponse {
            data: applications,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_housing_application(
        db: &PgPool,
        id: HousingApplicationId,
    ) -> Result<HousingApplication, AppError> {
        sqlx::query_as::<_, HousingApplication>(&format!("{} WHERE a.id = $1", SELECT_APPLICATION))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Housing application not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_housing_application(
        db: &PgPool,
        id: HousingApplicationId,
        dto: UpdateHousingApplicationDto,
    ) -> Result<HousingApplication, AppError> {
        let existing = Self::get_housing_application(db, id).await?;

        sqlx::query(
            r#"UPDATE housing_applications
               SET student_id = $1, preferred_building = $2, room_type = $3, semester_id = $4,
                   roommate_preference = $5, special_requests = $6, status = $7
               WHERE id = $8"#,
        )
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.preferred_building.unwrap_or(existing.preferred_building))
        .bind(dto.room_type.unwrap_or(existing.room_type))
        .bind(dto.semester_id.unwrap_or(existing.semester_id))
        .bind(dto.roommate_preference.unwrap_or(existing.roommate_preference))
        .bind(dto.special_requests.unwrap_or(existing.special_requests))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Housing application already exists"))?;

        Self::get_housing_application(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_housing_application(
        db: &PgPool,
        id: HousingApplicationId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM housing_applications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Housing application not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::housing::{ApplicationStatus, RoomType};
    use campus_erp_models::ids::{SemesterId, UserId};

    fn room(number: &str, capacity: i32, occupied: i32) -> CreateHousingDto {
        CreateHousingDto {
            building: "North Hall".to_string(),
            room_number: number.to_string(),
            room_type: RoomType::Double,
            capacity,
            occupied,
            semester_fee: 1500.0,
        }
    }

    async fn student_and_semester(pool: &PgPool) -> (UserId, SemesterId) {
        let student: UserId = sqlx::query_scalar(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ('stu', 'stu@uni.edu', 'x', 'Sam', 'Student', 'student') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let semester: SemesterId = sqlx::query_scalar(
            "WITH y AS (
                 INSERT INTO academic_years (year, start_date, end_date)
                 VALUES ('2024-2025', '2024-09-01', '2025-06-30') RETURNING id
             )
             INSERT INTO semesters (academic_year_id, name, start_date, end_date)
             SELECT id, 'FALL', '2024-09-01', '2024-12-20' FROM y RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        (student, semester)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_availability_labels(pool: PgPool) {
        let full = HousingService::create_housing(&pool, room("101", 2, 2)).await.unwrap();
        let limited = HousingService::create_housing(&pool, room("102", 4, 2)).await.unwrap();
        let open = HousingService::create_housing(&pool, room("103", 6, 1)).await.unwrap();

        assert_eq!(full.availability, "Full");
        assert_eq!(limited.availability, "Limited");
        assert_eq!(open.availability, "Available");
        assert_eq!(open.housing.semester_fee, 1500.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_available_filter_excludes_full_rooms(pool: PgPool) {
        HousingService::create_housing(&pool, room("101", 2, 2)).await.unwrap();
        HousingService::create_housing(&pool, room("102", 2, 1)).await.unwrap();

        let page = HousingService::get_housing_list(
            &pool,
            HousingFilterParams {
                room_type: None,
                available: true,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].housing.room_number, "102");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_room_numbers_are_unique_per_building(pool: PgPool) {
        HousingService::create_housing(&pool, room("101", 2, 0)).await.unwrap();
        let err = HousingService::create_housing(&pool, room("101", 2, 0))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message(), DUPLICATE_ROOM);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_rejects_overfull_room(pool: PgPool) {
        let view = HousingService::create_housing(&pool, room("101", 2, 0)).await.unwrap();
        let update: UpdateHousingDto = serde_json::from_str(r#"{"occupied":3}"#).unwrap();
        let err = HousingService::update_housing(&pool, view.housing.id, update)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_application_defaults_to_pending(pool: PgPool) {
        let (student_id, semester_id) = student_and_semester(&pool).await;
        let dto: CreateHousingApplicationDto = serde_json::from_str(&format!(
            r#"{{"student_id":"{}","preferred_building":"North Hall","room_type":"SINGLE","semester_id":"{}"}}"#,
            student_id, semester_id
        ))
        .unwrap();

        let application = HousingApplicationService::create_housing_application(&pool, dto)
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.student_name, "Sam Student");
        assert_eq!(application.semester_display, "FALL 2024-2025");

        let pending = HousingApplicationService::get_housing_applications(
            &pool,
            HousingApplicationFilterParams {
                status: Some(ApplicationStatus::Pending),
                student: Some(student_id),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(pending.meta.total, 1);
    }
}
