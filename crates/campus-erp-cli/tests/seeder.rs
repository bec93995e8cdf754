use campus_erp_cli::admin::{NewAdmin, create_admin};
use campus_erp_cli::seeder::{SeedConfig, UsersPerRole, clear_all, seed_all};
use sqlx::PgPool;

fn small_config() -> SeedConfig {
    SeedConfig::new(2)
        .with_users(UsersPerRole {
            staff: 2,
            faculty: 4,
            students: 12,
        })
        .with_courses_per_department(3)
        .with_library_resources(5)
        .with_housing_rooms(6)
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_seed_populates_every_domain(pool: PgPool) {
    seed_all(&pool, small_config()).await.unwrap();

    assert_eq!(count(&pool, "users").await, 18);
    assert_eq!(count(&pool, "departments").await, 2);
    assert_eq!(count(&pool, "courses").await, 6);
    assert_eq!(count(&pool, "faculty_profiles").await, 4);
    assert_eq!(count(&pool, "publications").await, 8);
    assert_eq!(count(&pool, "library_resources").await, 5);
    assert_eq!(count(&pool, "housing").await, 6);
    assert_eq!(count(&pool, "housing_applications").await, 2);
    assert_eq!(count(&pool, "audits").await, 2);
    assert!(count(&pool, "compliance_reports").await > 0);
    assert!(count(&pool, "research_projects").await > 0);

    let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM semesters WHERE is_active")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(active, 1);

    // Outstanding loans are reflected in the catalogue.
    let mismatched: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM library_resources r
         WHERE r.available_copies <> r.total_copies - (
             SELECT COUNT(*) FROM library_borrowings b
             WHERE b.resource_id = r.id AND b.return_date IS NULL)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(mismatched, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_seeding_twice_does_not_collide(pool: PgPool) {
    seed_all(&pool, small_config()).await.unwrap();
    seed_all(&pool, small_config()).await.unwrap();

    assert_eq!(count(&pool, "departments").await, 4);
    assert_eq!(count(&pool, "housing").await, 12);
    assert_eq!(count(&pool, "semesters").await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_clear_seed_keeps_admins_and_calendar(pool: PgPool) {
    let admin = NewAdmin {
        username: "registrar".to_string(),
        email: "registrar@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Admin".to_string(),
        password: "long-enough".to_string(),
    };
    create_admin(&pool, &admin).await.unwrap();
    seed_all(&pool, small_config()).await.unwrap();

    clear_all(&pool).await.unwrap();

    assert_eq!(count(&pool, "users").await, 1);
    for table in [
        "departments",
        "courses",
        "faculty_profiles",
        "research_projects",
        "research_grants",
        "library_resources",
        "library_borrowings",
        "housing",
        "housing_applications",
        "compliance_reports",
        "audits",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{} not cleared", table);
    }
    assert_eq!(count(&pool, "semesters").await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_admin(pool: PgPool) {
    let admin = NewAdmin {
        username: "dean".to_string(),
        email: "dean@uni.edu".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        password: "correct-horse".to_string(),
    };
    let id = create_admin(&pool, &admin).await.unwrap();

    let (role, password): (String, String) =
        sqlx::query_as("SELECT role, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(role, "admin");
    assert!(campus_erp_core::verify_password("correct-horse", &password).unwrap());

    let duplicate = create_admin(&pool, &admin).await.unwrap_err();
    assert_eq!(
        duplicate.to_string(),
        "A user with this username or email already exists"
    );
}
