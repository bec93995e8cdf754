use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;

use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, DepartmentId,
    PaginatedDepartmentsResponse, UpdateDepartmentDto,
};

const SELECT_DEPARTMENT: &str = r#"
    SELECT d.id, d.name, d.code, d.head_id,
           TRIM(u.first_name || ' ' || u.last_name) AS head_name,
           d.created_at, d.updated_at
    FROM departments d
    LEFT JOIN users u ON u.id = d.head_id"#;

const DUPLICATE_CODE: &str = "A department with this code already exists";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, _filters: &DepartmentFilterParams) {
    qb.push(" WHERE TRUE");
}

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let id: DepartmentId = sqlx::query_scalar(
            "INSERT INTO departments (name, code, head_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(dto.head_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_CODE))?;

        Self::get_department(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &PgPool,
        filters: DepartmentFilterParams,
    ) -> Result<PaginatedDepartmentsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM departments d");
        push_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_DEPARTMENT);
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY d.name LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let departments = data_query
            .build_query_as::<Department>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedDepartmentsResponse {
            data: departments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: DepartmentId) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(&format!("{} WHERE d.id = $1", SELECT_DEPARTMENT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department(db, id).await?;

        sqlx::query(
            r#"UPDATE departments
               SET name = $1, code = $2, head_id = $3, updated_at = NOW()
               WHERE id = $4"#,
        )
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.code.unwrap_or(existing.code))
        .bind(dto.head_id.unwrap_or(existing.head_id))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_CODE))?;

        Self::get_department(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_erp_core::PaginationParams;
    use campus_erp_models::ids::UserId;

    async fn head(pool: &PgPool) -> UserId {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ('head', 'head@uni.edu', 'x', 'Ada', 'Lovelace', 'faculty') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn dto(code: &str, head_id: Option<UserId>) -> CreateDepartmentDto {
        CreateDepartmentDto {
            name: format!("Department {}", code),
            code: code.to_string(),
            head_id,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_department_resolves_head_name(pool: PgPool) {
        let head_id = head(&pool).await;
        let department = DepartmentService::create_department(&pool, dto("CS", Some(head_id)))
            .await
            .unwrap();

        assert_eq!(department.head_id, Some(head_id));
        assert_eq!(department.head_name.as_deref(), Some("Ada Lovelace"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_department_without_head(pool: PgPool) {
        let department = DepartmentService::create_department(&pool, dto("MATH", None))
            .await
            .unwrap();
        assert!(department.head_id.is_none());
        assert!(department.head_name.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_code_is_bad_request(pool: PgPool) {
        DepartmentService::create_department(&pool, dto("CS", None))
            .await
            .unwrap();
        let err = DepartmentService::create_department(&pool, dto("CS", None))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.message(), DUPLICATE_CODE);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_clears_head_with_null(pool: PgPool) {
        let head_id = head(&pool).await;
        let department = DepartmentService::create_department(&pool, dto("PHY", Some(head_id)))
            .await
            .unwrap();

        let keep: UpdateDepartmentDto = serde_json::from_str(r#"{"name":"Physics"}"#).unwrap();
        let updated = DepartmentService::update_department(&pool, department.id, keep)
            .await
            .unwrap();
        assert_eq!(updated.name, "Physics");
        assert_eq!(updated.head_id, Some(head_id));

        let clear: UpdateDepartmentDto = serde_json::from_str(r#"{"head_id":null}"#).unwrap();
        let cleared = DepartmentService::update_department(&pool, department.id, clear)
            .await
            .unwrap();
        assert!(cleared.head_id.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_is_paginated(pool: PgPool) {
        for code in ["A", "B", "C"] {
            DepartmentService::create_department(&pool, dto(code, None))
                .await
                .unwrap();
        }
        let page = DepartmentService::get_departments(
            &pool,
            DepartmentFilterParams {
                pagination: PaginationParams {
                    limit: Some(2),
                    offset: None,
                    page: Some(2),
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(page.meta.total, 3);
        assert_eq!(page.data.len(), 1);
        assert!(!page.meta.has_more);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_department(pool: PgPool) {
        let err = DepartmentService::delete_department(&pool, DepartmentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
