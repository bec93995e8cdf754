//! Compliance reports and departmental audits.

use campus_erp_models::choices::{AuditStatus, ReportStatus};
use campus_erp_models::ids::{DepartmentId, UserId};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{AuditSeed, ComplianceReportSeed};
use super::{SeedResult, values_clause};

const REPORT_TYPES: &[&str] = &["SAFETY", "FINANCIAL", "ACCREDITATION", "DATA_PRIVACY"];
const AUDIT_TYPES: &[&str] = &["Financial", "Safety", "Academic Quality", "IT Security"];

/// One report per quarter going back from `today`, cycling types and statuses.
pub fn generate_reports(
    authors: &[UserId],
    count: usize,
    today: NaiveDate,
) -> Vec<ComplianceReportSeed> {
    if authors.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|idx| {
            let end_date = today - Duration::days(91 * idx as i64);
            let start_date = end_date - Duration::days(90);
            let report_type = REPORT_TYPES[idx % REPORT_TYPES.len()];
            ComplianceReportSeed {
                title: format!(
                    "{} review Q{} {}",
                    title_case(report_type),
                    quarter(end_date),
                    end_date.year()
                ),
                report_type: report_type.to_string(),
                generated_by_id: authors[idx % authors.len()],
                start_date,
                end_date,
                status: ReportStatus::ALL[idx % ReportStatus::ALL.len()],
                file_path: format!("/reports/{}-{}.pdf", report_type.to_lowercase(), end_date),
            }
        })
        .collect()
}

fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

fn title_case(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub async fn seed_reports(db: &PgPool, authors: &[UserId], count: usize) -> SeedResult<usize> {
    let start_time = Instant::now();
    let reports = generate_reports(authors, count, Utc::now().date_naive());
    println!("📋 Seeding {} compliance reports...", reports.len());
    if reports.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO compliance_reports (title, report_type, generated_by_id, start_date, end_date, status, file_path) \
         VALUES {}",
        values_clause(reports.len(), 7)
    );
    let mut q = sqlx::query(&query);
    for report in &reports {
        q = q
            .bind(&report.title)
            .bind(&report.report_type)
            .bind(report.generated_by_id)
            .bind(report.start_date)
            .bind(report.end_date)
            .bind(report.status)
            .bind(&report.file_path);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} reports in {:?}",
        reports.len(),
        start_time.elapsed()
    );
    Ok(reports.len())
}

/// One audit per department. Completed audits carry findings.
pub fn generate_audits(departments: &[DepartmentId], today: NaiveDate) -> Vec<AuditSeed> {
    departments
        .iter()
        .enumerate()
        .map(|(idx, &assigned_to_id)| {
            let status = AuditStatus::ALL[idx % AuditStatus::ALL.len()];
            let start_date = today - Duration::days((0..120).fake::<i64>());
            AuditSeed {
                audit_type: AUDIT_TYPES[idx % AUDIT_TYPES.len()].to_string(),
                start_date,
                due_date: start_date + Duration::days((30..90).fake::<i64>()),
                assigned_to_id,
                status,
                findings: if status == AuditStatus::Completed {
                    Sentence(6..12).fake()
                } else {
                    String::new()
                },
            }
        })
        .collect()
}

pub async fn seed_audits(db: &PgPool, departments: &[(DepartmentId, String)]) -> SeedResult<usize> {
    let start_time = Instant::now();
    let ids: Vec<DepartmentId> = departments.iter().map(|(id, _)| *id).collect();
    let audits = generate_audits(&ids, Utc::now().date_naive());
    println!("🔎 Seeding {} audits...", audits.len());
    if audits.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO audits (audit_type, start_date, due_date, assigned_to_id, status, findings) VALUES {}",
        values_clause(audits.len(), 6)
    );
    let mut q = sqlx::query(&query);
    for audit in &audits {
        q = q
            .bind(&audit.audit_type)
            .bind(audit.start_date)
            .bind(audit.due_date)
            .bind(audit.assigned_to_id)
            .bind(audit.status)
            .bind(&audit.findings);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} audits in {:?}",
        audits.len(),
        start_time.elapsed()
    );
    Ok(audits.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn test_reports_need_an_author() {
        assert!(generate_reports(&[], 4, today()).is_empty());
    }

    #[test]
    fn test_reports_cover_quarters() {
        let author = UserId::new();
        let reports = generate_reports(&[author], 3, today());
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].title, "Safety review Q2 2025");
        assert_eq!(reports[0].file_path, "/reports/safety-2025-05-10.pdf");
        assert_eq!(reports[1].report_type, "FINANCIAL");
        assert_eq!(reports[2].status, ReportStatus::Approved);
        for report in &reports {
            assert_eq!(report.generated_by_id, author);
            assert!(report.start_date <= report.end_date);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("DATA_PRIVACY"), "Data Privacy");
        assert_eq!(title_case("SAFETY"), "Safety");
    }

    #[test]
    fn test_only_completed_audits_have_findings() {
        let departments: Vec<DepartmentId> = (0..3).map(|_| DepartmentId::new()).collect();
        let audits = generate_audits(&departments, today());
        assert_eq!(audits.len(), 3);
        assert!(audits[0].findings.is_empty());
        assert_eq!(audits[2].status, AuditStatus::Completed);
        assert!(!audits[2].findings.is_empty());
        for audit in &audits {
            assert!(audit.start_date <= audit.due_date);
        }
    }
}
