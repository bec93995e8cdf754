use anyhow::anyhow;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;

use crate::modules::courses::model::{
    Course, CourseFilterParams, CourseId, CreateCourseDto, PaginatedCoursesResponse,
    UpdateCourseDto,
};

const SELECT_COURSE: &str = r#"
    SELECT c.id, c.code, c.name, c.department_id, d.name AS department_name,
           c.credits, c.description,
           ARRAY(
               SELECT cp.prerequisite_id FROM course_prerequisites cp
               WHERE cp.course_id = c.id ORDER BY cp.prerequisite_id
           ) AS prerequisites,
           c.instructor_id,
           TRIM(u.first_name || ' ' || u.last_name) AS instructor_name,
           c.semester_id, c.created_at, c.updated_at
    FROM courses c
    JOIN departments d ON d.id = c.department_id
    LEFT JOIN users u ON u.id = c.instructor_id"#;

const DUPLICATE_CODE: &str = "A course with this code already exists";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &CourseFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(code) = &filters.department {
        qb.push(" AND d.code = ").push_bind(code.clone());
    }
}

/// Replaces the prerequisite set of `course_id` with `prerequisites`.
async fn replace_prerequisites(
    conn: &mut PgConnection,
    course_id: CourseId,
    prerequisites: &[CourseId],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM course_prerequisites WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut *conn)
        .await?;

    if prerequisites.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"INSERT INTO course_prerequisites (course_id, prerequisite_id)
           SELECT $1, UNNEST($2::uuid[])
           ON CONFLICT DO NOTHING"#,
    )
    .bind(course_id)
    .bind(prerequisites)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_constraint_error(e, "Duplicate prerequisite"))?;

    Ok(())
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let mut tx = db.begin().await?;

        let id: CourseId = sqlx::query_scalar(
            r#"INSERT INTO courses
                   (code, name, department_id, credits, description, instructor_id, semester_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(dto.department_id)
        .bind(dto.credits)
        .bind(&dto.description)
        .bind(dto.instructor_id)
        .bind(dto.semester_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_CODE))?;

        replace_prerequisites(&mut tx, id, &dto.prerequisites).await?;
        tx.commit().await?;

        Self::get_course(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filters: CourseFilterParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM courses c JOIN departments d ON d.id = c.department_id",
        );
        push_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_COURSE);
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY c.code LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let courses = data_query.build_query_as::<Course>().fetch_all(db).await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("{} WHERE c.id = $1", SELECT_COURSE))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, id).await?;

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE courses
               SET code = $1, name = $2, department_id = $3, credits = $4, description = $5,
                   instructor_id = $6, semester_id = $7, updated_at = NOW()
               WHERE id = $8"#,
        )
        .bind(dto.code.unwrap_or(existing.code))
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.department_id.unwrap_or(existing.department_id))
        .bind(dto.credits.unwrap_or(existing.credits))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(dto.instructor_id.unwrap_or(existing.instructor_id))
        .bind(dto.semester_id.unwrap_or(existing.semester_id))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_CODE))?;

        if let Some(prerequisites) = &dto.prerequisites {
            replace_prerequisites(&mut tx, id, prerequisites).await?;
        }
        tx.commit().await?;

        Self::get_course(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        Ok(())
    }
}
