//! Fake data for development databases.
//!
//! Seeded rows carry markers so `clear_all` can remove them without touching
//! real records:
//!
//! - users: emails under [`SEED_EMAIL_DOMAIN`]
//! - departments: codes starting with [`DEPARTMENT_CODE_PREFIX`]
//! - library resources: locations starting with [`LIBRARY_LOCATION_PREFIX`]
//! - housing: buildings starting with [`HOUSING_BUILDING_PREFIX`]
//! - research grants: description [`SEED_NOTE`]
//!
//! Everything else hangs off those rows and goes with them through
//! `ON DELETE CASCADE`. The academic calendar is shared and kept.

pub mod academics;
pub mod compliance;
pub mod housing;
pub mod library;
pub mod models;
pub mod research;
pub mod users;

pub use models::{SeedConfig, UsersPerRole};

use campus_erp_core::hash_password;
use campus_erp_models::users::UserRole;
use fake::Fake;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

pub type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const SEED_EMAIL_DOMAIN: &str = "example.com";
pub const DEPARTMENT_CODE_PREFIX: &str = "SD";
pub const LIBRARY_LOCATION_PREFIX: &str = "Seed Stacks";
pub const HOUSING_BUILDING_PREFIX: &str = "Seed Hall";
pub const SEED_NOTE: &str = "Generated by campus-erp-cli seed";

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// `($1, $2), ($3, $4)` for `rows` tuples of `columns` placeholders each.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    cast_values_clause(rows, &vec![""; columns])
}

/// Like [`values_clause`] with a cast suffix per column, e.g. `"::NUMERIC"`.
pub(crate) fn cast_values_clause(rows: usize, casts: &[&str]) -> String {
    let columns = casts.len();
    (0..rows)
        .map(|row| {
            let placeholders: Vec<String> = casts
                .iter()
                .enumerate()
                .map(|(col, cast)| format!("${}{}", row * columns + col + 1, cast))
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short tag that keeps unique columns distinct across seed runs.
pub(crate) fn run_tag() -> String {
    Uuid::new_v4().simple().to_string()[..4].to_uppercase()
}

pub(crate) fn pick<T: Copy>(items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    Some(items[(0..items.len()).fake::<usize>()])
}

/// Seeds every domain in dependency order.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> SeedResult<()> {
    let total_start = Instant::now();
    let tag = run_tag();

    println!("\n🌱 Starting database seeding (run {})...\n", tag);
    println!("Configuration:");
    println!("   Departments: {}", config.departments);
    println!("   Courses: {}", config.total_courses());
    println!(
        "   Users: {} staff, {} faculty, {} students",
        config.users.staff, config.users.faculty, config.users.students
    );
    println!("   Library resources: {}", config.library_resources);
    println!("   Housing rooms: {}", config.housing_rooms);
    println!();

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.message()))?;

    let accounts = users::seed_users(db, &config.users, &tag, &password_hash).await?;
    let staff = users::ids_with_role(&accounts, UserRole::Staff);
    let faculty = users::ids_with_role(&accounts, UserRole::Faculty);
    let students = users::ids_with_role(&accounts, UserRole::Student);

    let departments = academics::seed_departments(db, config.departments, &tag, &faculty).await?;
    let semester = academics::ensure_active_semester(db).await?;
    academics::seed_courses(
        db,
        &departments,
        config.courses_per_department,
        &tag,
        &faculty,
        semester,
    )
    .await?;

    let profiles = research::seed_faculty_profiles(db, &faculty, &departments).await?;
    research::seed_publications(db, &profiles).await?;
    research::seed_grants(db, config.grants).await?;
    research::seed_projects(db, &profiles, config.projects).await?;

    library::seed_library(db, config.library_resources, config.borrowings(), &students).await?;

    housing::seed_rooms(db, config.housing_rooms, &tag).await?;
    housing::seed_applications(db, &students, config.housing_applications(), semester).await?;

    compliance::seed_reports(db, &staff, config.reports).await?;
    compliance::seed_audits(db, &departments).await?;

    println!(
        "\n✅ Seeding complete in {:?}. Seeded accounts use the password `{}`.",
        total_start.elapsed(),
        SEED_PASSWORD
    );

    Ok(())
}

/// Removes every marked row and what cascades from it.
pub async fn clear_all(db: &PgPool) -> SeedResult<()> {
    let start = Instant::now();
    println!("\n🗑️  Clearing seeded data...\n");

    // Users first: loans and applications go with them.
    users::clear_users(db).await?;
    library::clear_library(db).await?;
    housing::clear_rooms(db).await?;
    research::clear_grants(db).await?;
    academics::clear_departments(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_clause() {
        assert_eq!(values_clause(1, 3), "($1, $2, $3)");
        assert_eq!(values_clause(2, 2), "($1, $2), ($3, $4)");
        assert_eq!(values_clause(0, 4), "");
    }

    #[test]
    fn test_cast_values_clause() {
        assert_eq!(
            cast_values_clause(2, &["", "::NUMERIC"]),
            "($1, $2::NUMERIC), ($3, $4::NUMERIC)"
        );
    }

    #[test]
    fn test_run_tag_shape() {
        let tag = run_tag();
        assert_eq!(tag.len(), 4);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(tag, tag.to_uppercase());
    }

    #[test]
    fn test_pick() {
        assert_eq!(pick::<i32>(&[]), None);
        assert_eq!(pick(&[7]), Some(7));
        let value = pick(&[1, 2, 3]).unwrap();
        assert!((1..=3).contains(&value));
    }
}
