//! Departments, courses and the semester they are scheduled in.

use campus_erp_models::choices::SemesterName;
use campus_erp_models::ids::{AcademicYearId, DepartmentId, SemesterId, UserId};
use chrono::{Datelike, NaiveDate, Utc};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{CourseSeed, DepartmentSeed};
use super::{DEPARTMENT_CODE_PREFIX, SeedResult, values_clause};

const SUBJECTS: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Economics",
    "Philosophy",
    "Linguistics",
    "Engineering",
];

const COURSE_LEVELS: &[&str] = &[
    "Introduction to",
    "Foundations of",
    "Topics in",
    "Advanced",
    "Seminar in",
    "Research Methods in",
];

/// Codes are `SD` + run tag + index, at most 10 characters.
pub fn generate_departments(count: usize, tag: &str, heads: &[UserId]) -> Vec<DepartmentSeed> {
    (0..count)
        .map(|idx| {
            let subject = SUBJECTS[idx % SUBJECTS.len()];
            let name = if idx < SUBJECTS.len() {
                subject.to_string()
            } else {
                format!("{} {}", subject, idx / SUBJECTS.len() + 1)
            };
            DepartmentSeed {
                name,
                code: format!("{}{}{:02}", DEPARTMENT_CODE_PREFIX, tag, idx % 100),
                head_id: heads.get(idx).copied(),
            }
        })
        .collect()
}

pub fn generate_courses(
    departments: &[(DepartmentId, String)],
    per_department: usize,
    tag: &str,
    instructors: &[UserId],
    semester_id: SemesterId,
) -> Vec<CourseSeed> {
    departments
        .iter()
        .enumerate()
        .flat_map(|(dept_idx, (department_id, name))| {
            (0..per_department).map(move |course_idx| {
                let level = COURSE_LEVELS[course_idx % COURSE_LEVELS.len()];
                let seq = dept_idx * per_department + course_idx;
                CourseSeed {
                    code: format!("C{}{:04}", tag, seq % 10_000),
                    name: format!("{} {}", level, name),
                    department_id: *department_id,
                    credits: (1..5).fake::<i32>(),
                    description: Sentence(6..12).fake(),
                    instructor_id: if instructors.is_empty() {
                        None
                    } else {
                        Some(instructors[seq % instructors.len()])
                    },
                    semester_id: Some(semester_id),
                }
            })
        })
        .collect()
}

/// Seeds departments and returns `(id, name)` pairs.
pub async fn seed_departments(
    db: &PgPool,
    count: usize,
    tag: &str,
    heads: &[UserId],
) -> SeedResult<Vec<(DepartmentId, String)>> {
    let start_time = Instant::now();
    println!("🏛️  Seeding {} departments...", count);

    let departments = generate_departments(count, tag, heads);
    if departments.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO departments (name, code, head_id) VALUES {} RETURNING id",
        values_clause(departments.len(), 3)
    );
    let mut q = sqlx::query_scalar::<_, DepartmentId>(&query);
    for department in &departments {
        q = q
            .bind(&department.name)
            .bind(&department.code)
            .bind(department.head_id);
    }
    let ids = q.fetch_all(db).await?;

    println!(
        "   ✓ Inserted {} departments in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids
        .into_iter()
        .zip(departments.into_iter().map(|d| d.name))
        .collect())
}

/// Returns the active semester, creating an academic year with an active
/// fall semester when none is active.
pub async fn ensure_active_semester(db: &PgPool) -> SeedResult<SemesterId> {
    let existing: Option<SemesterId> =
        sqlx::query_scalar("SELECT id FROM semesters WHERE is_active ORDER BY start_date DESC LIMIT 1")
            .fetch_optional(db)
            .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let today = Utc::now().date_naive();
    let (year_start, year_end, label) = academic_year_bounds(today)?;

    let mut tx = db.begin().await?;
    let year_id: AcademicYearId = sqlx::query_scalar(
        "INSERT INTO academic_years (year, is_active, start_date, end_date)
         VALUES ($1, TRUE, $2, $3) RETURNING id",
    )
    .bind(&label)
    .bind(year_start)
    .bind(year_end)
    .fetch_one(&mut *tx)
    .await?;

    let fall_end = NaiveDate::from_ymd_opt(year_start.year(), 12, 20)
        .ok_or("invalid semester end date")?;
    let semester_id: SemesterId = sqlx::query_scalar(
        "INSERT INTO semesters (academic_year_id, name, start_date, end_date, is_active)
         VALUES ($1, $2, $3, $4, TRUE) RETURNING id",
    )
    .bind(year_id)
    .bind(SemesterName::Fall)
    .bind(year_start)
    .bind(fall_end)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    println!("📅 Created academic year {} with an active FALL semester", label);
    Ok(semester_id)
}

/// September to June of the academic year containing `today`.
pub fn academic_year_bounds(today: NaiveDate) -> SeedResult<(NaiveDate, NaiveDate, String)> {
    let first = if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    };
    let start = NaiveDate::from_ymd_opt(first, 9, 1).ok_or("invalid academic year start")?;
    let end = NaiveDate::from_ymd_opt(first + 1, 6, 30).ok_or("invalid academic year end")?;
    Ok((start, end, format!("{}-{}", first, first + 1)))
}

pub async fn seed_courses(
    db: &PgPool,
    departments: &[(DepartmentId, String)],
    per_department: usize,
    tag: &str,
    instructors: &[UserId],
    semester_id: SemesterId,
) -> SeedResult<usize> {
    let start_time = Instant::now();
    let courses = generate_courses(departments, per_department, tag, instructors, semester_id);
    println!("📖 Seeding {} courses...", courses.len());

    // 7 params per course
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    for chunk in courses.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO courses (code, name, department_id, credits, description, instructor_id, semester_id) \
             VALUES {}",
            values_clause(chunk.len(), 7)
        );
        let mut q = sqlx::query(&query);
        for course in chunk {
            q = q
                .bind(&course.code)
                .bind(&course.name)
                .bind(course.department_id)
                .bind(course.credits)
                .bind(&course.description)
                .bind(course.instructor_id)
                .bind(course.semester_id);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        courses.len(),
        start_time.elapsed()
    );
    Ok(courses.len())
}

/// Deleting a department takes its courses and audits with it.
pub async fn clear_departments(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded departments...");

    let result = sqlx::query("DELETE FROM departments WHERE code LIKE $1")
        .bind(format!("{}%", DEPARTMENT_CODE_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} departments in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}
