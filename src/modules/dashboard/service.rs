use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use campus_erp_core::AppError;

use crate::modules::dashboard::model::{
    ACTIVITIES_PER_SOURCE, Activity, DashboardStats, HousingOccupancy, merge_activities,
};

#[derive(FromRow)]
struct StatsRow {
    total_students: i64,
    total_faculty: i64,
    total_departments: i64,
    active_courses: i64,
    library_resources: i64,
    total_capacity: i64,
    total_occupied: i64,
    research_projects: i64,
    compliance_score: i64,
}

#[derive(FromRow)]
struct BorrowingRow {
    user_name: String,
    title: String,
    borrow_date: NaiveDate,
}

#[derive(FromRow)]
struct HousingApplicationRow {
    student_name: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CounselingRow {
    student_name: String,
    date: NaiveDate,
}

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(db))]
    pub async fn get_stats(db: &PgPool) -> Result<DashboardStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'student') AS total_students,
                (SELECT COUNT(*) FROM faculty_profiles) AS total_faculty,
                (SELECT COUNT(*) FROM departments) AS total_departments,
                (SELECT COUNT(*) FROM courses c
                    JOIN semesters s ON s.id = c.semester_id
                    WHERE s.is_active) AS active_courses,
                (SELECT COUNT(*) FROM library_resources) AS library_resources,
                (SELECT COALESCE(SUM(capacity), 0)::BIGINT FROM housing) AS total_capacity,
                (SELECT COALESCE(SUM(occupied), 0)::BIGINT FROM housing) AS total_occupied,
                (SELECT COUNT(*) FROM research_projects
                    WHERE status = 'IN_PROGRESS') AS research_projects,
                (SELECT COUNT(*) FROM compliance_reports
                    WHERE status = 'APPROVED') AS compliance_score"#,
        )
        .fetch_one(db)
        .await?;

        Ok(DashboardStats {
            total_students: row.total_students,
            total_faculty: row.total_faculty,
            total_departments: row.total_departments,
            active_courses: row.active_courses,
            library_resources: row.library_resources,
            housing_occupancy: HousingOccupancy {
                total_capacity: row.total_capacity,
                total_occupied: row.total_occupied,
            },
            research_projects: row.research_projects,
            compliance_score: row.compliance_score,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_recent_activities(db: &PgPool) -> Result<Vec<Activity>, AppError> {
        let borrowings = sqlx::query_as::<_, BorrowingRow>(
            r#"SELECT TRIM(u.first_name || ' ' || u.last_name) AS user_name,
                      r.title, b.borrow_date
               FROM library_borrowings b
               JOIN users u ON u.id = b.user_id
               JOIN library_resources r ON r.id = b.resource_id
               ORDER BY b.borrow_date DESC
               LIMIT $1"#,
        )
        .bind(ACTIVITIES_PER_SOURCE)
        .fetch_all(db)
        .await?;

        let applications = sqlx::query_as::<_, HousingApplicationRow>(
            r#"SELECT TRIM(u.first_name || ' ' || u.last_name) AS student_name, a.created_at
               FROM housing_applications a
               JOIN users u ON u.id = a.student_id
               ORDER BY a.created_at DESC
               LIMIT $1"#,
        )
        .bind(ACTIVITIES_PER_SOURCE)
        .fetch_all(db)
        .await?;

        let sessions = sqlx::query_as::<_, CounselingRow>(
            r#"SELECT TRIM(u.first_name || ' ' || u.last_name) AS student_name, c.date
               FROM counseling_appointments c
               JOIN users u ON u.id = c.student_id
               ORDER BY c.date DESC
               LIMIT $1"#,
        )
        .bind(ACTIVITIES_PER_SOURCE)
        .fetch_all(db)
        .await?;

        Ok(merge_activities([
            borrowings
                .iter()
                .map(|b| Activity::borrowing(&b.user_name, &b.title, b.borrow_date))
                .collect(),
            applications
                .iter()
                .map(|a| Activity::housing_application(&a.student_name, a.created_at))
                .collect(),
            sessions
                .iter()
                .map(|s| Activity::counseling(&s.student_name, s.date))
                .collect(),
        ]))
    }
}
