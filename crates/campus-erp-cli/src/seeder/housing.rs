//! Residence rooms and housing applications.

use campus_erp_models::choices::{ApplicationStatus, RoomType};
use campus_erp_models::ids::{SemesterId, UserId};
use fake::Fake;
use fake::faker::name::en::FirstName;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{HousingApplicationSeed, HousingSeed};
use super::{HOUSING_BUILDING_PREFIX, SeedResult, cast_values_clause, pick, values_clause};

const ROOMS_PER_FLOOR: usize = 10;
const FLOORS_PER_BUILDING: usize = 4;

fn room_shape(room_type: RoomType) -> (i32, f64) {
    match room_type {
        RoomType::Single => (1, 2400.0),
        RoomType::Double => (2, 1800.0),
        RoomType::Suite => (4, 3200.0),
    }
}

fn building_name(tag: &str, idx: usize) -> String {
    let letter = (b'A' + (idx % 26) as u8) as char;
    format!("{} {} {}", HOUSING_BUILDING_PREFIX, tag, letter)
}

/// Rooms fill floors of `ROOMS_PER_FLOOR`, numbered `101`, `102`, ...
pub fn generate_rooms(count: usize, tag: &str) -> Vec<HousingSeed> {
    (0..count)
        .map(|idx| {
            let per_building = ROOMS_PER_FLOOR * FLOORS_PER_BUILDING;
            let in_building = idx % per_building;
            let floor = in_building / ROOMS_PER_FLOOR + 1;
            let room = in_building % ROOMS_PER_FLOOR + 1;
            let room_type = RoomType::ALL[idx % RoomType::ALL.len()];
            let (capacity, semester_fee) = room_shape(room_type);
            HousingSeed {
                building: building_name(tag, idx / per_building),
                room_number: format!("{}{:02}", floor, room),
                room_type,
                capacity,
                occupied: (0..=capacity).fake::<i32>(),
                semester_fee,
            }
        })
        .collect()
}

pub async fn seed_rooms(db: &PgPool, count: usize, tag: &str) -> SeedResult<usize> {
    let start_time = Instant::now();
    println!("🏠 Seeding {} housing rooms...", count);

    let rooms = generate_rooms(count, tag);
    if rooms.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO housing (building, room_number, room_type, capacity, occupied, semester_fee) VALUES {}",
        cast_values_clause(rooms.len(), &["", "", "", "", "", "::NUMERIC"])
    );
    let mut q = sqlx::query(&query);
    for room in &rooms {
        q = q
            .bind(&room.building)
            .bind(&room.room_number)
            .bind(room.room_type)
            .bind(room.capacity)
            .bind(room.occupied)
            .bind(room.semester_fee);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} rooms in {:?}",
        rooms.len(),
        start_time.elapsed()
    );
    Ok(rooms.len())
}

pub fn generate_applications(
    students: &[UserId],
    count: usize,
    semester_id: SemesterId,
) -> Vec<HousingApplicationSeed> {
    students
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, &student_id)| HousingApplicationSeed {
            student_id,
            preferred_building: format!(
                "{} {}",
                HOUSING_BUILDING_PREFIX,
                (b'A' + (idx % 3) as u8) as char
            ),
            room_type: pick(RoomType::ALL).unwrap_or(RoomType::Double),
            semester_id,
            roommate_preference: if idx % 2 == 0 {
                FirstName().fake()
            } else {
                String::new()
            },
        })
        .collect()
}

pub async fn seed_applications(
    db: &PgPool,
    students: &[UserId],
    count: usize,
    semester_id: SemesterId,
) -> SeedResult<usize> {
    let start_time = Instant::now();
    let applications = generate_applications(students, count, semester_id);
    println!("📝 Seeding {} housing applications...", applications.len());
    if applications.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO housing_applications (student_id, preferred_building, room_type, semester_id, roommate_preference, status) \
         VALUES {}",
        values_clause(applications.len(), 6)
    );
    let mut q = sqlx::query(&query);
    for (idx, application) in applications.iter().enumerate() {
        let status = match idx % 4 {
            0 => ApplicationStatus::Approved,
            3 => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Pending,
        };
        q = q
            .bind(application.student_id)
            .bind(&application.preferred_building)
            .bind(application.room_type)
            .bind(application.semester_id)
            .bind(&application.roommate_preference)
            .bind(status);
    }
    q.execute(db).await?;

    println!(
        "   ✓ Inserted {} applications in {:?}",
        applications.len(),
        start_time.elapsed()
    );
    Ok(applications.len())
}

pub async fn clear_rooms(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded housing...");

    let result = sqlx::query("DELETE FROM housing WHERE building LIKE $1")
        .bind(format!("{}%", HOUSING_BUILDING_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} rooms in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}
