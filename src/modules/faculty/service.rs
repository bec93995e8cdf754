use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;

use crate::modules::faculty::model::{
    CreateFacultyProfileDto, CreatePublicationDto, FacultyProfile, FacultyProfileFilterParams,
    FacultyProfileId, PaginatedFacultyProfilesResponse, PaginatedPublicationsResponse,
    Publication, PublicationFilterParams, PublicationId, UpdateFacultyProfileDto,
    UpdatePublicationDto,
};

const SELECT_FACULTY_PROFILE: &str = r#"
    SELECT fp.id, fp.user_id,
           u.username AS user_username, u.email AS user_email,
           u.first_name AS user_first_name, u.last_name AS user_last_name,
           u.role AS user_role, u.department AS user_department,
           u.phone_number AS user_phone_number, u.is_active AS user_is_active,
           u.created_at AS user_created_at, u.updated_at AS user_updated_at,
           fp.department_id, d.name AS department_name,
           fp.position, fp.office_location, fp.phone, fp.bio, fp.joining_date
    FROM faculty_profiles fp
    JOIN users u ON u.id = fp.user_id
    LEFT JOIN departments d ON d.id = fp.department_id"#;

const SELECT_PUBLICATION: &str = r#"
    SELECT p.id, p.faculty_id, TRIM(u.first_name || ' ' || u.last_name) AS faculty_name,
           p.title, p.journal, p.publication_date, p.doi, p.citation_count
    FROM publications p
    JOIN faculty_profiles fp ON fp.id = p.faculty_id
    JOIN users u ON u.id = fp.user_id"#;

const DUPLICATE_PROFILE: &str = "This user already has a faculty profile";

fn push_profile_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &FacultyProfileFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(code) = &filters.department {
        qb.push(" AND d.code = ").push_bind(code.clone());
    }
}

fn push_publication_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &PublicationFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(user_id) = filters.faculty {
        qb.push(" AND fp.user_id = ").push_bind(user_id);
    }
}

pub struct FacultyProfileService;

impl FacultyProfileService {
    #[instrument(skip(db))]
    pub async fn create_faculty_profile(
        db: &PgPool,
        dto: CreateFacultyProfileDto,
    ) -> Result<FacultyProfile, AppError> {
        let id: FacultyProfileId = sqlx::query_scalar(
            r#"INSERT INTO faculty_profiles
                   (user_id, department_id, position, office_location, phone, bio, joining_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(dto.user_id)
        .bind(dto.department_id)
        .bind(&dto.position)
        .bind(&dto.office_location)
        .bind(&dto.phone)
        .bind(&dto.bio)
        .bind(dto.joining_date)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_PROFILE))?;

        Self::get_faculty_profile(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_faculty_profiles(
        db: &PgPool,
        filters: FacultyProfileFilterParams,
    ) -> Result<PaginatedFacultyProfilesResponse, AppError> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM faculty_profiles fp \
             LEFT JOIN departments d ON d.id = fp.department_id",
        );
        push_profile_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_FACULTY_PROFILE);
        push_profile_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY u.last_name, u.first_name LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let profiles = data_query
            .build_query_as::<FacultyProfile>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedFacultyProfilesResponse {
            data: profiles,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_faculty_profile(
        db: &PgPool,
        id: FacultyProfileId,
    ) -> Result<FacultyProfile, AppError> {
        sqlx::query_as::<_, FacultyProfile>(&format!("{} WHERE fp.id = $1", SELECT_FACULTY_PROFILE))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Faculty profile not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_faculty_profile(
        db: &PgPool,
        id: FacultyProfileId,
        dto: UpdateFacultyProfileDto,
    ) -> Result<FacultyProfile, AppError> {
        let existing = Self::get_faculty_profile(db, id).await?;

        sqlx::query(
            r#"UPDATE faculty_profiles
               SET user_id = $1, department_id = $2, position = $3, office_location = $4,
                   phone = $5, bio = $6, joining_date = $7
               WHERE id = $8"#,
        )
        .bind(dto.user_id.unwrap_or(existing.user_id))
        .bind(dto.department_id.unwrap_or(existing.department_id))
        .bind(dto.position.unwrap_or(existing.position))
        .bind(dto.office_location.unwrap_or(existing.office_location))
        .bind(dto.phone.unwrap_or(existing.phone))
        .bind(dto.bio.unwrap_or(existing.bio))
        .bind(dto.joining_date.unwrap_or(existing.joining_date))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_PROFILE))?;

        Self::get_faculty_profile(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_faculty_profile(
        db: &PgPool,
        id: FacultyProfileId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM faculty_profiles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Faculty profile not found")));
        }

        Ok(())
    }
}

pub struct PublicationService;

impl PublicationService {
    #[instrument(skip(db))]
    pub async fn create_publication(
        db: &PgPool,
        dto: CreatePublicationDto,
    ) -> Result<Publication, AppError> {
        let id: PublicationId = sqlx::query_scalar(
            r#"INSERT INTO publications
                   (faculty_id, title, journal, publication_date, doi, citation_count)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.faculty_id)
        .bind(&dto.title)
        .bind(&dto.journal)
        .bind(dto.publication_date)
        .bind(&dto.doi)
        .bind(dto.citation_count)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Publication already exists"))?;

        Self::get_publication(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_publications(
        db: &PgPool,
        filters: PublicationFilterParams,
    ) -> Result<PaginatedPublicationsResponse, AppError> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM publications p \
             JOIN faculty_profiles fp ON fp.id = p.faculty_id",
        );
        push_publication_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_PUBLICATION);
        push_publication_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY p.publication_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let publications = data_query
            .build_query_as::<Publication>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedPublicationsResponse {
            data: publications,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_publication(db: &PgPool, id: PublicationId) -> Result<Publication, AppError> {
        sqlx::query_as::<_, Publication>(&format!("{} WHERE p.id = $1", SELECT_PUBLICATION))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Publication not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_publication(
        db: &PgPool,
        id: PublicationId,
        dto: UpdatePublicationDto,
    ) -> Result<Publication, AppError> {
        let existing = Self::get_publication(db, id).await?;

        sqlx::query(
            r#"UPDATE publications
               SET faculty_id = $1, title = $2, journal = $3, publication_date = $4,
                   doi = $5, citation_count = $6
               WHERE id = $7"#,
        )
        .bind(dto.faculty_id.unwrap_or(existing.faculty_id))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.journal.unwrap_or(existing.journal))
        .bind(dto.publication_date.unwrap_or(existing.publication_date))
        .bind(dto.doi.unwrap_or(existing.doi))
        .bind(dto.citation_count.unwrap_or(existing.citation_count))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Publication already exists"))?;

        Self::get_publication(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_publication(db: &PgPool, id: PublicationId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM publications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Publication not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::ids::{DepartmentId, UserId};
    use campus_erp_models::users::UserRole;
    use chrono::NaiveDate;

    async fn faculty_user(pool: &PgPool, username: &str) -> UserId {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ($1, $2, 'x', 'Grace', $3, 'faculty') RETURNING id",
        )
        .bind(username)
        .bind(format!("{}@uni.edu", username))
        .bind(username.to_uppercase())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn department(pool: &PgPool, code: &str) -> DepartmentId {
        sqlx::query_scalar("INSERT INTO departments (name, code) VALUES ($1, $2) RETURNING id")
            .bind(format!("{} Department", code))
            .bind(code)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn profile_dto(user_id: UserId, department_id: Option<DepartmentId>) -> CreateFacultyProfileDto {
        CreateFacultyProfileDto {
            user_id,
            department_id,
            position: "Professor".to_string(),
            office_location: "B-201".to_string(),
            phone: "555-0100".to_string(),
            bio: String::new(),
            joining_date: NaiveDate::from_ymd_opt(2020, 8, 15).unwrap(),
        }
    }

    fn publication_dto(faculty_id: FacultyProfileId, title: &str) -> CreatePublicationDto {
        CreatePublicationDto {
            faculty_id,
            title: title.to_string(),
            journal: "Journal of Examples".to_string(),
            publication_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            doi: String::new(),
            citation_count: 0,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_profile_nests_user_details(pool: PgPool) {
        let user_id = faculty_user(&pool, "hopper").await;
        let cs = department(&pool, "CS").await;
        let profile = FacultyProfileService::create_faculty_profile(&pool, profile_dto(user_id, Some(cs)))
            .await
            .unwrap();

        assert_eq!(profile.user_details.id, user_id);
        assert_eq!(profile.user_details.username, "hopper");
        assert_eq!(profile.user_details.role, UserRole::Faculty);
        assert_eq!(profile.department_name.as_deref(), Some("CS Department"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_one_profile_per_user(pool: PgPool) {
        let user_id = faculty_user(&pool, "hopper").await;
        FacultyProfileService::create_faculty_profile(&pool, profile_dto(user_id, None))
            .await
            .unwrap();
        let err = FacultyProfileService::create_faculty_profile(&pool, profile_dto(user_id, None))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message(), DUPLICATE_PROFILE);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filter_profiles_by_department_code(pool: PgPool) {
        let cs = department(&pool, "CS").await;
        let a = faculty_user(&pool, "a").await;
        let b = faculty_user(&pool, "b").await;
        FacultyProfileService::create_faculty_profile(&pool, profile_dto(a, Some(cs)))
            .await
            .unwrap();
        FacultyProfileService::create_faculty_profile(&pool, profile_dto(b, None))
            .await
            .unwrap();

        let page = FacultyProfileService::get_faculty_profiles(
            &pool,
            FacultyProfileFilterParams {
                department: Some("CS".to_string()),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].user_id, a);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filter_publications_by_faculty_user(pool: PgPool) {
        let a = faculty_user(&pool, "a").await;
        let b = faculty_user(&pool, "b").await;
        let pa = FacultyProfileService::create_faculty_profile(&pool, profile_dto(a, None))
            .await
            .unwrap();
        let pb = FacultyProfileService::create_faculty_profile(&pool, profile_dto(b, None))
            .await
            .unwrap();
        PublicationService::create_publication(&pool, publication_dto(pa.id, "First"))
            .await
            .unwrap();
        PublicationService::create_publication(&pool, publication_dto(pb.id, "Second"))
            .await
            .unwrap();

        let page = PublicationService::get_publications(
            &pool,
            PublicationFilterParams {
                faculty: Some(a),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].title, "First");
        assert_eq!(page.data[0].faculty_name, "Grace A");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleting_profile_removes_publications(pool: PgPool) {
        let a = faculty_user(&pool, "a").await;
        let profile = FacultyProfileService::create_faculty_profile(&pool, profile_dto(a, None))
            .await
            .unwrap();
        let publication = PublicationService::create_publication(&pool, publication_dto(profile.id, "Gone"))
            .await
            .unwrap();

        FacultyProfileService::delete_faculty_profile(&pool, profile.id)
            .await
            .unwrap();

        let err = PublicationService::get_publication(&pool, publication.id)
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
