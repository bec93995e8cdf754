//! Library catalogue and loans.
//!
//! Loans are planned before the catalogue is inserted so each resource goes in
//! with `available_copies` already reduced by its outstanding loans.

use campus_erp_models::choices::ResourceType;
use campus_erp_models::ids::{LibraryResourceId, UserId};
use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::company::en::CatchPhrase;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{BorrowingSeed, LibraryResourceSeed};
use super::{LIBRARY_LOCATION_PREFIX, SeedResult, values_clause};

/// Loan period in days.
const LOAN_DAYS: i64 = 14;

pub fn generate_resources(count: usize) -> Vec<LibraryResourceSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let total_copies = (1..6).fake::<i32>();
            LibraryResourceSeed {
                title: CatchPhrase().fake(),
                author: Name().fake(),
                resource_type: ResourceType::ALL[idx % ResourceType::ALL.len()],
                isbn: format!("978{:010}", (0..10_000_000_000u64).fake::<u64>()),
                location: format!(
                    "{} {}{}",
                    LIBRARY_LOCATION_PREFIX,
                    (b'A' + (idx % 6) as u8) as char,
                    idx % 20 + 1
                ),
                total_copies,
                available_copies: total_copies,
            }
        })
        .collect()
}

/// Plans up to `count` loans, spreading them over the catalogue.
///
/// Every third loan is already returned. Outstanding loans take a copy from
/// their resource; resources with no copies left are skipped.
pub fn plan_borrowings(
    resources: &mut [LibraryResourceSeed],
    borrowers: &[UserId],
    count: usize,
    today: NaiveDate,
) -> Vec<BorrowingSeed> {
    let mut borrowings = Vec::with_capacity(count);
    if resources.is_empty() || borrowers.is_empty() {
        return borrowings;
    }

    for i in 0..count {
        let returned = i % 3 == 0;
        let start = (i * 7) % resources.len();
        let Some(resource_index) = (0..resources.len())
            .map(|offset| (start + offset) % resources.len())
            .find(|&idx| returned || resources[idx].available_copies > 0)
        else {
            break;
        };

        let borrow_date = today - Duration::days((i % 30) as i64 + 1);
        let return_date = if returned {
            Some((borrow_date + Duration::days(7)).min(today))
        } else {
            resources[resource_index].available_copies -= 1;
            None
        };

        borrowings.push(BorrowingSeed {
            resource_index,
            user_id: borrowers[i % borrowers.len()],
            borrow_date,
            due_date: borrow_date + Duration::days(LOAN_DAYS),
            return_date,
        });
    }

    borrowings
}

pub async fn seed_library(
    db: &PgPool,
    resource_count: usize,
    borrowing_count: usize,
    borrowers: &[UserId],
) -> SeedResult<()> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} library resources and {} loans...",
        resource_count, borrowing_count
    );

    let mut resources = generate_resources(resource_count);
    if resources.is_empty() {
        return Ok(());
    }
    let borrowings = plan_borrowings(
        &mut resources,
        borrowers,
        borrowing_count,
        Utc::now().date_naive(),
    );

    let mut tx = db.begin().await?;

    let query = format!(
        "INSERT INTO library_resources (title, author, resource_type, isbn, location, total_copies, available_copies) \
         VALUES {} RETURNING id",
        values_clause(resources.len(), 7)
    );
    let mut q = sqlx::query_scalar::<_, LibraryResourceId>(&query);
    for resource in &resources {
        q = q
            .bind(&resource.title)
            .bind(&resource.author)
            .bind(resource.resource_type)
            .bind(&resource.isbn)
            .bind(&resource.location)
            .bind(resource.total_copies)
            .bind(resource.available_copies);
    }
    let resource_ids = q.fetch_all(&mut *tx).await?;

    if !borrowings.is_empty() {
        let query = format!(
            "INSERT INTO library_borrowings (resource_id, user_id, borrow_date, due_date, return_date) VALUES {}",
            values_clause(borrowings.len(), 5)
        );
        let mut q = sqlx::query(&query);
        for borrowing in &borrowings {
            let resource_id = resource_ids
                .get(borrowing.resource_index)
                .copied()
                .ok_or("library resource missing from insert")?;
            q = q
                .bind(resource_id)
                .bind(borrowing.user_id)
                .bind(borrowing.borrow_date)
                .bind(borrowing.due_date)
                .bind(borrowing.return_date);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} resources and {} loans in {:?}",
        resource_ids.len(),
        borrowings.len(),
        start_time.elapsed()
    );
    Ok(())
}

/// Deleting a resource takes its loans with it.
pub async fn clear_library(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded library resources...");

    let result = sqlx::query("DELETE FROM library_resources WHERE location LIKE $1")
        .bind(format!("{}%", LIBRARY_LOCATION_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} resources in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(copies: i32) -> LibraryResourceSeed {
        LibraryResourceSeed {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            resource_type: ResourceType::Book,
            isbn: "9780441013593".to_string(),
            location: "Seed Stacks A1".to_string(),
            total_copies: copies,
            available_copies: copies,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_generated_resources_fit_columns() {
        let resources = generate_resources(8);
        assert_eq!(resources.len(), 8);
        for r in &resources {
            assert_eq!(r.isbn.len(), 13);
            assert!(r.location.starts_with(LIBRARY_LOCATION_PREFIX));
            assert!((1..6).contains(&r.total_copies));
            assert_eq!(r.available_copies, r.total_copies);
        }
    }

    #[test]
    fn test_outstanding_loans_take_copies() {
        let mut resources = vec![resource(2)];
        let borrowers = vec![UserId::new()];
        let loans = plan_borrowings(&mut resources, &borrowers, 3, today());

        assert_eq!(loans.len(), 3);
        assert!(loans[0].return_date.is_some());
        assert!(loans[1].return_date.is_none());
        assert!(loans[2].return_date.is_none());
        assert_eq!(resources[0].available_copies, 0);
    }

    #[test]
    fn test_planning_stops_when_copies_run_out() {
        let mut resources = vec![resource(1)];
        let borrowers = vec![UserId::new()];
        let loans = plan_borrowings(&mut resources, &borrowers, 10, today());

        // returned, outstanding, then nothing left to lend
        assert_eq!(loans.len(), 2);
        assert_eq!(resources[0].available_copies, 0);
    }

    #[test]
    fn test_loan_dates() {
        let mut resources = vec![resource(3), resource(3)];
        let borrowers = vec![UserId::new(), UserId::new()];
        let loans = plan_borrowings(&mut resources, &borrowers, 4, today());

        for loan in &loans {
            assert!(loan.borrow_date < today());
            assert_eq!(loan.due_date - loan.borrow_date, Duration::days(LOAN_DAYS));
            if let Some(returned) = loan.return_date {
                assert!(returned <= today());
                assert!(returned >= loan.borrow_date);
            }
        }
        assert_eq!(loans[1].user_id, borrowers[1]);
    }

    #[test]
    fn test_no_borrowers_no_loans() {
        let mut resources = vec![resource(3)];
        assert!(plan_borrowings(&mut resources, &[], 5, today()).is_empty());
        assert_eq!(resources[0].available_copies, 3);
    }
}
