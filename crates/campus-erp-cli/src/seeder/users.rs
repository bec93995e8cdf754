//! Account seeding.
//!
//! Generates staff, faculty and student users with fake names and inserts
//! them with multi-row `INSERT` statements.

use campus_erp_models::ids::UserId;
use campus_erp_models::users::UserRole;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{UserSeed, UsersPerRole};
use super::{SEED_EMAIL_DOMAIN, SeedResult, values_clause};

const DEPARTMENT_NAMES: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Physics",
    "Biology",
    "History",
    "Economics",
];

/// Generates accounts for every role in parallel.
pub fn generate_users(counts: &UsersPerRole, tag: &str, password_hash: &str) -> Vec<UserSeed> {
    let roles = [
        (UserRole::Staff, counts.staff),
        (UserRole::Faculty, counts.faculty),
        (UserRole::Student, counts.students),
    ];

    roles
        .par_iter()
        .flat_map(|&(role, count)| {
            (0..count)
                .into_par_iter()
                .map(move |idx| generate_user(role, idx, tag, password_hash))
        })
        .collect()
}

fn generate_user(role: UserRole, idx: usize, tag: &str, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let username = format!(
        "{}.{}.{}{}.{}",
        first_name.to_lowercase().replace(' ', ""),
        last_name.to_lowercase().replace(' ', ""),
        role.as_str(),
        idx,
        tag.to_lowercase()
    );
    let email = format!("{}@{}", username, SEED_EMAIL_DOMAIN);

    let department = match role {
        UserRole::Student | UserRole::Faculty => {
            DEPARTMENT_NAMES[idx % DEPARTMENT_NAMES.len()].to_string()
        }
        _ => "Administration".to_string(),
    };

    UserSeed {
        username,
        email,
        password_hash: password_hash.to_string(),
        first_name,
        last_name,
        role,
        department,
        phone_number: format!("555-{:04}", (0..10_000).fake::<u32>()),
    }
}

pub fn ids_with_role(accounts: &[(UserId, UserRole)], role: UserRole) -> Vec<UserId> {
    accounts
        .iter()
        .filter(|(_, r)| *r == role)
        .map(|(id, _)| *id)
        .collect()
}

/// Seeds users and returns `(id, role)` pairs in insertion order.
pub async fn seed_users(
    db: &PgPool,
    counts: &UsersPerRole,
    tag: &str,
    password_hash: &str,
) -> SeedResult<Vec<(UserId, UserRole)>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users ({} staff, {} faculty, {} students)...",
        counts.total(),
        counts.staff,
        counts.faculty,
        counts.students
    );

    let users = generate_users(counts, tag, password_hash);
    let accounts = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        accounts.len(),
        start_time.elapsed()
    );

    Ok(accounts)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> SeedResult<Vec<(UserId, UserRole)>> {
    let mut tx = db.begin().await?;

    // 8 params per user
    const BATCH_SIZE: usize = 800;

    let mut accounts = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk).await?;
        accounts.extend(ids.into_iter().zip(chunk.iter().map(|u| u.role)));
    }

    tx.commit().await?;
    Ok(accounts)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> SeedResult<Vec<UserId>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, email, password, first_name, last_name, role, department, phone_number) \
         VALUES {} RETURNING id",
        values_clause(users.len(), 8)
    );

    let mut q = sqlx::query_scalar::<_, UserId>(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(&user.department)
            .bind(&user.phone_number);
    }

    // RETURNING follows VALUES order for a single INSERT.
    Ok(q.fetch_all(&mut **tx).await?)
}

/// Clears seeded users. Admin accounts are kept even on the seed domain.
pub async fn clear_users(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> $2")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .bind(UserRole::Admin)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users_counts_per_role() {
        let counts = UsersPerRole {
            staff: 2,
            faculty: 3,
            students: 5,
        };
        let users = generate_users(&counts, "AB12", "hash");
        assert_eq!(users.len(), 10);
        assert_eq!(
            users.iter().filter(|u| u.role == UserRole::Student).count(),
            5
        );
        assert_eq!(
            users.iter().filter(|u| u.role == UserRole::Staff).count(),
            2
        );
    }

    #[test]
    fn test_generated_user_is_marked_and_unique() {
        let user = generate_user(UserRole::Student, 7, "AB12", "hash");
        assert!(user.email.ends_with("@example.com"));
        assert!(user.username.ends_with("student7.ab12"));
        assert_eq!(user.password_hash, "hash");
        assert!(user.phone_number.len() <= 20);
        assert!(!user.department.is_empty());
    }

    #[test]
    fn test_staff_belong_to_administration() {
        let user = generate_user(UserRole::Staff, 0, "AB12", "hash");
        assert_eq!(user.department, "Administration");
    }

    #[test]
    fn test_ids_with_role() {
        let a = UserId::new();
        let b = UserId::new();
        let accounts = vec![(a, UserRole::Faculty), (b, UserRole::Student)];
        assert_eq!(ids_with_role(&accounts, UserRole::Faculty), vec![a]);
        assert!(ids_with_role(&accounts, UserRole::Staff).is_empty());
    }
}
