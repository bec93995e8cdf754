//! Faculty profiles, publications, grants and research projects.

use campus_erp_models::choices::{GrantStatus, ProjectStatus};
use campus_erp_models::ids::{DepartmentId, FacultyProfileId, ResearchProjectId, UserId};
use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{FacultyProfileSeed, GrantSeed, ProjectSeed, PublicationSeed};
use super::{SEED_NOTE, SeedResult, cast_values_clause, values_clause};

const POSITIONS: &[&str] = &[
    "Lecturer",
    "Assistant Professor",
    "Associate Professor",
    "Professor",
];

const JOURNALS: &[&str] = &[
    "Journal of Applied Research",
    "Annals of Theory",
    "Review of Modern Studies",
    "International Science Letters",
];

const PUBLICATIONS_PER_FACULTY: usize = 2;

fn days_ago(max_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days((0..max_days).fake::<i64>())
}

pub fn generate_faculty_profiles(
    faculty: &[UserId],
    departments: &[DepartmentId],
) -> Vec<FacultyProfileSeed> {
    faculty
        .par_iter()
        .enumerate()
        .map(|(idx, &user_id)| FacultyProfileSeed {
            user_id,
            department_id: if departments.is_empty() {
                None
            } else {
                Some(departments[idx % departments.len()])
            },
            position: POSITIONS[idx % POSITIONS.len()].to_string(),
            office_location: format!("Building {}, Room {}", idx % 5 + 1, 100 + idx),
            phone: format!("555-{:04}", (0..10_000).fake::<u32>()),
            bio: Paragraph(1..3).fake(),
            joining_date: days_ago(365 * 15),
        })
        .collect()
}

pub async fn seed_faculty_profiles(
    db: &PgPool,
    faculty: &[UserId],
    departments: &[(DepartmentId, String)],
) -> SeedResult<Vec<FacultyProfileId>> {
    let start_time = Instant::now();
    println!("🧑‍🏫 Seeding {} faculty profiles...", faculty.len());

    let department_ids: Vec<DepartmentId> = departments.iter().map(|(id, _)| *id).collect();
    let profiles = generate_faculty_profiles(faculty, &department_ids);
    if profiles.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO faculty_profiles (user_id, department_id, position, office_location, phone, bio, joining_date) \
         VALUES {} RETURNING id",
        values_clause(profiles.len(), 7)
    );
    let mut q = sqlx::query_scalar::<_, FacultyProfileId>(&query);
    for profile in &profiles {
        q = q
            .bind(profile.user_id)
            .bind(profile.department_id)
            .bind(&profile.position)
            .bind(&profile.office_location)
            .bind(&profile.phone)
            .bind(&profile.bio)
            .bind(profile.joining_date);
    }
    let ids = q.fetch_all(db).await?;

    println!(
        "   ✓ Inserted {} profiles in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub fn generate_publications(profiles: &[FacultyProfileId]) -> Vec<PublicationSeed> {
    profiles
        .par_iter()
        .flat_map_iter(|&faculty_id| {
            (0..PUBLICATIONS_PER_FACULTY).map(move |n| PublicationSeed {
                faculty_id,
                title: CatchPhrase().fake(),
                journal: JOURNALS[n % JOURNALS.len()].to_string(),
                publication_date: days_ago(365 * 5),
                doi: format!(
                    "10.{}/{}",
                    (1000..9999).fake::<u32>(),
                    (10_000..99_999).fake::<u32>()
                ),
                citation_count: (0..250).fake::<i32>(),
            })
        })
        .collect()
}

pub async fn seed_publications(db: &PgPool, profiles: &[FacultyProfileId]) -> SeedResult<usize> {
    let start_time = Instant::now();
    let publications = generate_publications(profiles);
    println!("📰 Seeding {} publications...", publications.len());
    if publications.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO publications (faculty_id, title, journal, publication_date, doi, citation_count) VALUES {}",
        values_clause(publications.len(), 6)
    );
    let mut q = sqlx::query(&query);
    for publication in &publications {
        q = q
            .bind(publication.faculty_id)
            .bind(&publication.title)
            .bind(&publication.journal)
            .bind(publication.publication_date)
            .bind(&publication.doi)
            .bind(publication.citation_count);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} publications in {:?}",
        publications.len(),
        start_time.elapsed()
    );
    Ok(publications.len())
}

pub fn generate_grants(count: usize) -> Vec<GrantSeed> {
    (0..count)
        .map(|idx| GrantSeed {
            name: format!("{} Fund", CatchPhrase().fake::<String>()),
            amount: f64::from((10..500).fake::<u32>()) * 1000.0,
            deadline: Utc::now().date_naive() + Duration::days((30..365).fake::<i64>()),
            status: GrantStatus::ALL[idx % GrantStatus::ALL.len()],
        })
        .collect()
}

pub async fn seed_grants(db: &PgPool, count: usize) -> SeedResult<usize> {
    let start_time = Instant::now();
    println!("💰 Seeding {} research grants...", count);

    let grants = generate_grants(count);
    if grants.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO research_grants (name, description, amount, deadline, status) VALUES {}",
        cast_values_clause(grants.len(), &["", "", "::NUMERIC", "", ""])
    );
    let mut q = sqlx::query(&query);
    for grant in &grants {
        q = q
            .bind(&grant.name)
            .bind(SEED_NOTE)
            .bind(grant.amount)
            .bind(grant.deadline)
            .bind(grant.status);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} grants in {:?}",
        grants.len(),
        start_time.elapsed()
    );
    Ok(grants.len())
}

/// Each project gets a principal investigator and up to two other
/// profiles as co-investigators.
pub fn generate_projects(profiles: &[FacultyProfileId], count: usize) -> Vec<ProjectSeed> {
    if profiles.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|idx| {
            let principal_investigator_id = profiles[idx % profiles.len()];
            let co_investigator_ids = (1..=2)
                .map(|offset| profiles[(idx + offset) % profiles.len()])
                .filter(|id| *id != principal_investigator_id)
                .collect::<Vec<_>>();
            let start_date = days_ago(365 * 2);
            ProjectSeed {
                title: CatchPhrase().fake(),
                principal_investigator_id,
                co_investigator_ids,
                start_date,
                end_date: start_date + Duration::days((180..1100).fake::<i64>()),
                budget: f64::from((5..200).fake::<u32>()) * 1000.0,
                status: ProjectStatus::ALL[idx % ProjectStatus::ALL.len()],
                description: Sentence(8..16).fake(),
            }
        })
        .collect()
}

pub async fn seed_projects(
    db: &PgPool,
    profiles: &[FacultyProfileId],
    count: usize,
) -> SeedResult<usize> {
    let start_time = Instant::now();
    let projects = generate_projects(profiles, count);
    println!("🔬 Seeding {} research projects...", projects.len());

    let mut tx = db.begin().await?;
    for project in &projects {
        let project_id: ResearchProjectId = sqlx::query_scalar(
            "INSERT INTO research_projects
                (title, principal_investigator_id, start_date, end_date, budget, status, description)
             VALUES ($1, $2, $3, $4, $5::NUMERIC, $6, $7)
             RETURNING id",
        )
        .bind(&project.title)
        .bind(project.principal_investigator_id)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.budget)
        .bind(project.status)
        .bind(&project.description)
        .fetch_one(&mut *tx)
        .await?;

        for co_investigator in &project.co_investigator_ids {
            sqlx::query(
                "INSERT INTO research_project_co_investigators (research_project_id, faculty_profile_id)
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(project_id)
            .bind(*co_investigator)
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} projects in {:?}",
        projects.len(),
        start_time.elapsed()
    );
    Ok(projects.len())
}

pub async fn clear_grants(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded grants...");

    let result = sqlx::query("DELETE FROM research_grants WHERE description = $1")
        .bind(SEED_NOTE)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} grants in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_cycle_departments() {
        let faculty = vec![UserId::new(), UserId::new(), UserId::new()];
        let departments = vec![DepartmentId::new(), DepartmentId::new()];
        let profiles = generate_faculty_profiles(&faculty, &departments);

        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].department_id, Some(departments[0]));
        assert_eq!(profiles[2].department_id, Some(departments[0]));
        assert_eq!(profiles[1].position, "Assistant Professor");
        assert!(profiles[0].joining_date <= Utc::now().date_naive());
    }

    #[test]
    fn test_publications_per_profile() {
        let profiles = vec![FacultyProfileId::new(), FacultyProfileId::new()];
        let publications = generate_publications(&profiles);
        assert_eq!(publications.len(), 4);
        assert!(publications.iter().all(|p| p.citation_count >= 0));
        assert!(publications.iter().all(|p| p.doi.starts_with("10.")));
    }

    #[test]
    fn test_projects_never_list_the_investigator_twice() {
        let profiles = vec![FacultyProfileId::new(), FacultyProfileId::new()];
        let projects = generate_projects(&profiles, 3);
        assert_eq!(projects.len(), 3);
        for project in &projects {
            assert!(
                !project
                    .co_investigator_ids
                    .contains(&project.principal_investigator_id)
            );
            assert!(project.start_date <= project.end_date);
        }
        assert_eq!(projects[0].co_investigator_ids, vec![profiles[1]]);
    }

    #[test]
    fn test_projects_need_profiles() {
        assert!(generate_projects(&[], 5).is_empty());
    }

    #[test]
    fn test_grants_cycle_statuses() {
        let grants = generate_grants(4);
        assert_eq!(grants[0].status, GrantStatus::Open);
        assert_eq!(grants[3].status, GrantStatus::Awarded);
        assert!(grants.iter().all(|g| g.amount >= 10_000.0));
    }
}
