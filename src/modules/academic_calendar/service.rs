use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::validation::ensure_date_order;

use crate::modules::academic_calendar::model::{
    AcademicYear, AcademicYearFilterParams, AcademicYearId, CreateAcademicYearDto,
    CreateSemesterDto, PaginatedAcademicYearsResponse, PaginatedSemestersResponse, Semester,
    SemesterFilterParams, SemesterId, UpdateAcademicYearDto, UpdateSemesterDto,
};

const SELECT_ACADEMIC_YEAR: &str =
    "SELECT ay.id, ay.year, ay.is_active, ay.start_date, ay.end_date FROM academic_years ay";

const SELECT_SEMESTER: &str = r#"
    SELECT s.id, s.academic_year_id, ay.year AS academic_year_display,
           s.name, s.start_date, s.end_date, s.is_active
    FROM semesters s
    JOIN academic_years ay ON ay.id = s.academic_year_id"#;

pub struct AcademicYearService;

impl AcademicYearService {
    #[instrument(skip(db))]
    pub async fn create_academic_year(
        db: &PgPool,
        dto: CreateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(
            r#"INSERT INTO academic_years (year, is_active, start_date, end_date)
               VALUES ($1, $2, $3, $4)
               RETURNING id, year, is_active, start_date, end_date"#,
        )
        .bind(&dto.year)
        .bind(dto.is_active)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Academic year already exists"))?;

        Ok(year)
    }

    #[instrument(skip(db))]
    pub async fn get_academic_years(
        db: &PgPool,
        filters: AcademicYearFilterParams,
    ) -> Result<PaginatedAcademicYearsResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM academic_years")
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::<Postgres>::new(SELECT_ACADEMIC_YEAR);
        data_query
            .push(" ORDER BY ay.start_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let years = data_query
            .build_query_as::<AcademicYear>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedAcademicYearsResponse {
            data: years,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_academic_year(
        db: &PgPool,
        id: AcademicYearId,
    ) -> Result<AcademicYear, AppError> {
        sqlx::query_as::<_, AcademicYear>(&format!("{} WHERE ay.id = $1", SELECT_ACADEMIC_YEAR))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Academic year not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_academic_year(
        db: &PgPool,
        id: AcademicYearId,
        dto: UpdateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        let existing = Self::get_academic_year(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        ensure_date_order(start_date, end_date, ("start_date", "end_date"))?;

        let year = sqlx::query_as::<_, AcademicYear>(
            r#"UPDATE academic_years
               SET year = $1, is_active = $2, start_date = $3, end_date = $4
               WHERE id = $5
               RETURNING id, year, is_active, start_date, end_date"#,
        )
        .bind(dto.year.unwrap_or(existing.year))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Academic year already exists"))?;

        Ok(year)
    }

    /// Deleting a year removes its semesters too.
    #[instrument(skip(db))]
    pub async fn delete_academic_year(db: &PgPool, id: AcademicYearId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM academic_years WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Academic year not found")));
        }

        Ok(())
    }
}

pub struct SemesterService;

impl SemesterService {
    #[instrument(skip(db))]
    pub async fn create_semester(
        db: &PgPool,
        dto: CreateSemesterDto,
    ) -> Result<Semester, AppError> {
        let id: SemesterId = sqlx::query_scalar(
            r#"INSERT INTO semesters (academic_year_id, name, start_date, end_date, is_active)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(dto.academic_year_id)
        .bind(dto.name)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Semester already exists"))?;

        Self::get_semester(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_semesters(
        db: &PgPool,
        filters: SemesterFilterParams,
    ) -> Result<PaginatedSemestersResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM semesters")
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::<Postgres>::new(SELECT_SEMESTER);
        data_query
            .push(" ORDER BY s.start_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let semesters = data_query
            .build_query_as::<Semester>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedSemestersResponse {
            data: semesters,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_semester(db: &PgPool, id: SemesterId) -> Result<Semester, AppError> {
        sqlx::query_as::<_, Semester>(&format!("{} WHERE s.id = $1", SELECT_SEMESTER))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Semester not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_semester(
        db: &PgPool,
        id: SemesterId,
        dto: UpdateSemesterDto,
    ) -> Result<Semester, AppError> {
        let existing = Self::get_semester(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        ensure_date_order(start_date, end_date, ("start_date", "end_date"))?;

        sqlx::query(
            r#"UPDATE semesters
               SET academic_year_id = $1, name = $2, start_date = $3, end_date = $4, is_active = $5
               WHERE id = $6"#,
        )
        .bind(dto.academic_year_id.unwrap_or(existing.academic_year_id))
        .bind(dto.name.unwrap_or(existing.name))
        .bind(start_date)
        .bind(end_date)
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Semester already exists"))?;

        Self::get_semester(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_semester(db: &PgPool, id: SemesterId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM semesters WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Semester not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::academics::SemesterName;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn year(pool: &PgPool) -> AcademicYear {
        AcademicYearService::create_academic_year(
            pool,
            CreateAcademicYearDto {
                year: "2024-2025".to_string(),
                is_active: true,
                start_date: date(2024, 9, 1),
                end_date: date(2025, 6, 30),
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_semester_carries_year_label(pool: PgPool) {
        let year = year(&pool).await;
        let semester = SemesterService::create_semester(
            &pool,
            CreateSemesterDto {
                academic_year_id: year.id,
                name: SemesterName::Fall,
                start_date: date(2024, 9, 1),
                end_date: date(2024, 12, 20),
                is_active: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(semester.academic_year_display, "2024-2025");
        assert_eq!(semester.name, SemesterName::Fall);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_rejects_reversed_dates(pool: PgPool) {
        let year = year(&pool).await;
        let update = UpdateAcademicYearDto {
            year: None,
            is_active: None,
            start_date: None,
            end_date: Some(date(2024, 1, 1)),
        };

        let err = AcademicYearService::update_academic_year(&pool, year.id, update)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert_eq!(err.message(), "end_date must not be before start_date");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleting_year_cascades_to_semesters(pool: PgPool) {
        let year = year(&pool).await;
        SemesterService::create_semester(
            &pool,
            CreateSemesterDto {
                academic_year_id: year.id,
                name: SemesterName::Spring,
                start_date: date(2025, 1, 10),
                end_date: date(2025, 5, 30),
                is_active: false,
            },
        )
        .await
        .unwrap();

        AcademicYearService::delete_academic_year(&pool, year.id)
            .await
            .unwrap();

        let page = SemesterService::get_semesters(
            &pool,
            SemesterFilterParams {
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_semester_for_unknown_year_is_bad_request(pool: PgPool) {
        let err = SemesterService::create_semester(
            &pool,
            CreateSemesterDto {
                academic_year_id: AcademicYearId::new(),
                name: SemesterName::Summer,
                start_date: date(2025, 6, 1),
                end_date: date(2025, 8, 1),
                is_active: false,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }
}
