use anyhow::anyhow;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::ids::FacultyProfileId;
use campus_erp_models::validation::ensure_date_order;

use crate::modules::research::model::{
    CreateResearchGrantDto, CreateResearchProjectDto, PaginatedResearchGrantsResponse,
    PaginatedResearchProjectsResponse, ResearchGrant, ResearchGrantFilterParams, ResearchGrantId,
    ResearchProject, ResearchProjectFilterParams, ResearchProjectId, UpdateResearchGrantDto,
    UpdateResearchProjectDto,
};

const SELECT_GRANT: &str = r#"
    SELECT g.id, g.name, g.description, g.amount::FLOAT8 AS amount,
           g.deadline, g.status, g.created_at
    FROM research_grants g"#;

const SELECT_PROJECT: &str = r#"
    SELECT rp.id, rp.title, rp.principal_investigator_id,
           TRIM(u.first_name || ' ' || u.last_name) AS principal_investigator_name,
           ARRAY(
               SELECT ci.faculty_profile_id FROM research_project_co_investigators ci
               WHERE ci.research_project_id = rp.id
               ORDER BY ci.faculty_profile_id
           ) AS co_investigators,
           ARRAY(
               SELECT TRIM(cu.first_name || ' ' || cu.last_name)
               FROM research_project_co_investigators ci
               JOIN faculty_profiles cf ON cf.id = ci.faculty_profile_id
               JOIN users cu ON cu.id = cf.user_id
               WHERE ci.research_project_id = rp.id
               ORDER BY ci.faculty_profile_id
           ) AS co_investigators_names,
           rp.start_date, rp.end_date, rp.budget::FLOAT8 AS budget, rp.status, rp.description
    FROM research_projects rp
    JOIN faculty_profiles pf ON pf.id = rp.principal_investigator_id
    JOIN users u ON u.id = pf.user_id"#;

fn push_grant_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ResearchGrantFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filters.status {
        qb.push(" AND g.status = ").push_bind(status);
    }
}

/// `investigator` matches the principal investigator's user or any
/// co-investigator's user. `EXISTS` keeps each project once.
fn push_project_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ResearchProjectFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filters.status {
        qb.push(" AND rp.status = ").push_bind(status);
    }
    if let Some(user_id) = filters.investigator {
        qb.push(" AND (pf.user_id = ")
            .push_bind(user_id)
            .push(
                " OR EXISTS (SELECT 1 FROM research_project_co_investigators ci \
                 JOIN faculty_profiles cf ON cf.id = ci.faculty_profile_id \
                 WHERE ci.research_project_id = rp.id AND cf.user_id = ",
            )
            .push_bind(user_id)
            .push("))");
    }
}

async fn replace_co_investigators(
    conn: &mut PgConnection,
    project_id: ResearchProjectId,
    co_investigators: &[FacultyProfileId],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM research_project_co_investigators WHERE research_project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    if co_investigators.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"INSERT INTO research_project_co_investigators (research_project_id, faculty_profile_id)
           SELECT $1, UNNEST($2::uuid[])
           ON CONFLICT DO NOTHING"#,
    )
    .bind(project_id)
    .bind(co_investigators)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_constraint_error(e, "Duplicate co-investigator"))?;

    Ok(())
}

pub struct ResearchGrantService;

impl ResearchGrantService {
    #[instrument(skip(db))]
    pub async fn create_research_grant(
        db: &PgPool,
        dto: CreateResearchGrantDto,
    ) -> Result<ResearchGrant, AppError> {
        let id: ResearchGrantId = sqlx::query_scalar(
            r#"INSERT INTO research_grants (name, description, amount, deadline, status)
               VALUES ($1, $2, $3::NUMERIC, $4, $5)
               RETURNING id"#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.amount)
        .bind(dto.deadline)
        .bind(dto.status)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Research grant already exists"))?;

        Self::get_research_grant(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_research_grants(
        db: &PgPool,
        filters: ResearchGrantFilterParams,
    ) -> Result<PaginatedResearchGrantsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM research_grants g");
        push_grant_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_GRANT);
        push_grant_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY g.deadline LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let grants = data_query
            .build_query_as::<ResearchGrant>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedResearchGrantsResponse {
            data: grants,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_research_grant(
        db: &PgPool,
        id: ResearchGrantId,
    ) -> Result<ResearchGrant, AppError> {
        sqlx::query_as::<_, ResearchGrant>(&format!("{} WHERE g.id = $1", SELECT_GRANT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Research grant not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_research_grant(
        db: &PgPool,
        id: ResearchGrantId,
        dto: UpdateResearchGrantDto,
    ) -> Result<ResearchGrant, AppError> {
        let existing = Self::get_research_grant(db, id).await?;

        sqlx::query(
            r#"UPDATE research_grants
               SET name = $1, description = $2, amount = $3::NUMERIC, deadline = $4, status = $5
               WHERE id = $6"#,
        )
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(dto.amount.unwrap_or(existing.amount))
        .bind(dto.deadline.unwrap_or(existing.deadline))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Research grant already exists"))?;

        Self::get_research_grant(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_research_grant(db: &PgPool, id: ResearchGrantId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM research_grants WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Research grant not found")));
        }

        Ok(())
    }
}

pub struct ResearchProjectService;

impl ResearchProjectService {
    #[instrument(skip(db))]
    pub async fn create_research_project(
        db: &PgPool,
        dto: CreateResearchProjectDto,
    ) -> Result<ResearchProject, AppError> {
        let mut tx = db.begin().await?;

        let id: ResearchProjectId = sqlx::query_scalar(
            r#"INSERT INTO research_projects
                   (title, principal_investigator_id, start_date, end_date, budget, status, description)
               VALUES ($1, $2, $3, $4, $5::NUMERIC, $6, $7)
               RETURNING id"#,
        )
        .bind(&dto.title)
        .bind(dto.principal_investigator_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.budget)
        .bind(dto.status)
        .bind(&dto.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "Research project already exists"))?;

        replace_co_investigators(&mut tx, id, &dto.co_investigators).await?;
        tx.commit().await?;

        Self::get_research_project(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_research_projects(
        db: &PgPool,
        filters: ResearchProjectFilterParams,
    ) -> Result<PaginatedResearchProjectsResponse, AppError> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM research_projects rp \
             JOIN faculty_profiles pf ON pf.id = rp.principal_investigator_id",
        );
        push_project_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_PROJECT);
        push_project_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY rp.start_date DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let projects = data_query
            .build_query_as::<ResearchProject>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedResearchProjectsResponse {
            data: projects,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_research_project(
        db: &PgPool,
        id: ResearchProjectId,
    ) -> Result<ResearchProject, AppError> {
        sqlx::query_as::<_, ResearchProject>(&format!("{} WHERE rp.id = $1", SELECT_PROJECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Research project not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_research_project(
        db: &PgPool,
        id: ResearchProjectId,
        dto: UpdateResearchProjectDto,
    ) -> Result<ResearchProject, AppError> {
        let existing = Self::get_research_project(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        ensure_date_order(start_date, end_date, ("start_date", "end_date"))?;

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE research_projects
               SET title = $1, principal_investigator_id = $2, start_date = $3, end_date = $4,
                   budget = $5::NUMERIC, status = $6, description = $7
               WHERE id = $8"#,
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(
            dto.principal_investigator_id
                .unwrap_or(existing.principal_investigator_id),
        )
        .bind(start_date)
        .bind(end_date)
        .bind(dto.budget.unwrap_or(existing.budget))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "Research project already exists"))?;

        if let Some(co_investigators) = &dto.co_investigators {
            replace_co_investigators(&mut tx, id, co_investigators).await?;
        }
        tx.commit().await?;

        Self::get_research_project(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_research_project(
        db: &PgPool,
        id: ResearchProjectId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM research_projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Research project not found")));
        }

        Ok(())
    }
}
