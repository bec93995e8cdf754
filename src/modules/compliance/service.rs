use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use campus_erp_core::{AppError, PaginationMeta};
use campus_erp_db::map_constraint_error;
use campus_erp_models::ids::UserId;
use campus_erp_models::validation::ensure_date_order;

use crate::modules::compliance::model::{
    Audit, AuditFilterParams, AuditId, ComplianceReport, ComplianceReportFilterParams,
    ComplianceReportId, CreateAuditDto, CreateComplianceReportDto, PaginatedAuditsResponse,
    PaginatedComplianceReportsResponse, UpdateAuditDto, UpdateComplianceReportDto,
};

const SELECT_REPORT: &str = r#"
    SELECT r.id, r.title, r.report_type, r.generated_by_id,
           TRIM(u.first_name || ' ' || u.last_name) AS generated_by_name,
           r.generated_on, r.start_date, r.end_date, r.status, r.file_path
    FROM compliance_reports r
    JOIN users u ON u.id = r.generated_by_id"#;

const SELECT_AUDIT: &str = r#"
    SELECT a.id, a.audit_type, a.start_date, a.due_date, a.assigned_to_id,
           d.name AS assigned_to_name, a.status, a.findings, a.recommendations
    FROM audits a
    JOIN departments d ON d.id = a.assigned_to_id"#;

fn push_report_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ComplianceReportFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(report_type) = &filters.report_type {
        qb.push(" AND r.report_type = ").push_bind(report_type.clone());
    }
    if let Some(status) = filters.status {
        qb.push(" AND r.status = ").push_bind(status);
    }
}

fn push_audit_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &AuditFilterParams) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filters.status {
        qb.push(" AND a.status = ").push_bind(status);
    }
    if let Some(code) = &filters.department {
        qb.push(" AND d.code = ").push_bind(code.clone());
    }
}

pub struct ComplianceReportService;

impl ComplianceReportService {
    /// Creates a report, attributing it to `requested_by` unless the body names an author.
    #[instrument(skip(db))]
    pub async fn create_compliance_report(
        db: &PgPool,
        dto: CreateComplianceReportDto,
        requested_by: UserId,
    ) -> Result<ComplianceReport, AppError> {
        let id: ComplianceReportId = sqlx::query_scalar(
            r#"INSERT INTO compliance_reports
                   (title, report_type, generated_by_id, start_date, end_date, status, file_path)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(&dto.title)
        .bind(&dto.report_type)
        .bind(dto.generated_by_id.unwrap_or(requested_by))
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.status)
        .bind(&dto.file_path)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Compliance report already exists"))?;

        Self::get_compliance_report(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_compliance_reports(
        db: &PgPool,
        filters: ComplianceReportFilterParams,
    ) -> Result<PaginatedComplianceReportsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM compliance_reports r");
        push_report_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_REPORT);
        push_report_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY r.generated_on DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let reports = data_query
            .build_query_as::<ComplianceReport>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedComplianceReportsResponse {
            data: reports,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_compliance_report(
        db: &PgPool,
        id: ComplianceReportId,
    ) -> Result<ComplianceReport, AppError> {
        sqlx::query_as::<_, ComplianceReport>(&format!("{} WHERE r.id = $1", SELECT_REPORT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Compliance report not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_compliance_report(
        db: &PgPool,
        id: ComplianceReportId,
        dto: UpdateComplianceReportDto,
    ) -> Result<ComplianceReport, AppError> {
        let existing = Self::get_compliance_report(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        ensure_date_order(start_date, end_date, ("start_date", "end_date"))?;

        sqlx::query(
            r#"UPDATE compliance_reports
               SET title = $1, report_type = $2, generated_by_id = $3, start_date = $4,
                   end_date = $5, status = $6, file_path = $7
               WHERE id = $8"#,
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.report_type.unwrap_or(existing.report_type))
        .bind(dto.generated_by_id.unwrap_or(existing.generated_by_id))
        .bind(start_date)
        .bind(end_date)
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.file_path.unwrap_or(existing.file_path))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Compliance report already exists"))?;

        Self::get_compliance_report(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_compliance_report(
        db: &PgPool,
        id: ComplianceReportId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM compliance_reports WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Compliance report not found")));
        }

        Ok(())
    }
}

pub struct AuditService;

impl AuditService {
    #[instrument(skip(db))]
    pub async fn create_audit(db: &PgPool, dto: CreateAuditDto) -> Result<Audit, AppError> {
        let id: AuditId = sqlx::query_scalar(
            r#"INSERT INTO audits
                   (audit_type, start_date, due_date, assigned_to_id, status, findings, recommendations)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(&dto.audit_type)
        .bind(dto.start_date)
        .bind(dto.due_date)
        .bind(dto.assigned_to_id)
        .bind(dto.status)
        .bind(&dto.findings)
        .bind(&dto.recommendations)
        .fetch_one(db)
        .await
        .map_err(|e| map_constraint_error(e, "Audit already exists"))?;

        Self::get_audit(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_audits(
        db: &PgPool,
        filters: AuditFilterParams,
    ) -> Result<PaginatedAuditsResponse, AppError> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM audits a JOIN departments d ON d.id = a.assigned_to_id",
        );
        push_audit_filters(&mut count_query, &filters);
        let total: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut data_query = QueryBuilder::new(SELECT_AUDIT);
        push_audit_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY a.due_date LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let audits = data_query.build_query_as::<Audit>().fetch_all(db).await?;

        Ok(PaginatedAuditsResponse {
            data: audits,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_audit(db: &PgPool, id: AuditId) -> Result<Audit, AppError> {
        sqlx::query_as::<_, Audit>(&format!("{} WHERE a.id = $1", SELECT_AUDIT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Audit not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_audit(
        db: &PgPool,
        id: AuditId,
        dto: UpdateAuditDto,
    ) -> Result<Audit, AppError> {
        let existing = Self::get_audit(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let due_date = dto.due_date.unwrap_or(existing.due_date);
        ensure_date_order(start_date, due_date, ("start_date", "due_date"))?;

        sqlx::query(
            r#"UPDATE audits
               SET audit_type = $1, start_date = $2, due_date = $3, assigned_to_id = $4,
                   status = $5, findings = $6, recommendations = $7
               WHERE id = $8"#,
        )
        .bind(dto.audit_type.unwrap_or(existing.audit_type))
        .bind(start_date)
        .bind(due_date)
        .bind(dto.assigned_to_id.unwrap_or(existing.assigned_to_id))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.findings.unwrap_or(existing.findings))
        .bind(dto.recommendations.unwrap_or(existing.recommendations))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| map_constraint_error(e, "Audit already exists"))?;

        Self::get_audit(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_audit(db: &PgPool, id: AuditId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM audits WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Audit not found")));
        }

        Ok(())
    }
}
