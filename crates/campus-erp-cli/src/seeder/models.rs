//! Seed records and the configuration that sizes a seed run.

use campus_erp_models::choices::{
    AuditStatus, GrantStatus, ProjectStatus, ReportStatus, ResourceType, RoomType,
};
use campus_erp_models::ids::{DepartmentId, FacultyProfileId, SemesterId, UserId};
use campus_erp_models::users::UserRole;
use chrono::NaiveDate;

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub department: String,
    pub phone_number: String,
}

pub struct DepartmentSeed {
    pub name: String,
    pub code: String,
    pub head_id: Option<UserId>,
}

pub struct CourseSeed {
    pub code: String,
    pub name: String,
    pub department_id: DepartmentId,
    pub credits: i32,
    pub description: String,
    pub instructor_id: Option<UserId>,
    pub semester_id: Option<SemesterId>,
}

pub struct FacultyProfileSeed {
    pub user_id: UserId,
    pub department_id: Option<DepartmentId>,
    pub position: String,
    pub office_location: String,
    pub phone: String,
    pub bio: String,
    pub joining_date: NaiveDate,
}

pub struct PublicationSeed {
    pub faculty_id: FacultyProfileId,
    pub title: String,
    pub journal: String,
    pub publication_date: NaiveDate,
    pub doi: String,
    pub citation_count: i32,
}

pub struct GrantSeed {
    pub name: String,
    pub amount: f64,
    pub deadline: NaiveDate,
    pub status: GrantStatus,
}

pub struct ProjectSeed {
    pub title: String,
    pub principal_investigator_id: FacultyProfileId,
    pub co_investigator_ids: Vec<FacultyProfileId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub status: ProjectStatus,
    pub description: String,
}

pub struct LibraryResourceSeed {
    pub title: String,
    pub author: String,
    pub resource_type: ResourceType,
    pub isbn: String,
    pub location: String,
    pub total_copies: i32,
    /// Lowered as loans are planned against the resource.
    pub available_copies: i32,
}

/// A loan against `resources[resource_index]`.
pub struct BorrowingSeed {
    pub resource_index: usize,
    pub user_id: UserId,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

pub struct HousingSeed {
    pub building: String,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: i32,
    pub occupied: i32,
    pub semester_fee: f64,
}

pub struct HousingApplicationSeed {
    pub student_id: UserId,
    pub preferred_building: String,
    pub room_type: RoomType,
    pub semester_id: SemesterId,
    pub roommate_preference: String,
}

pub struct ComplianceReportSeed {
    pub title: String,
    pub report_type: String,
    pub generated_by_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReportStatus,
    pub file_path: String,
}

pub struct AuditSeed {
    pub audit_type: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub assigned_to_id: DepartmentId,
    pub status: AuditStatus,
    pub findings: String,
}

/// Number of accounts per role.
#[derive(Clone)]
pub struct UsersPerRole {
    pub staff: usize,
    pub faculty: usize,
    pub students: usize,
}

impl Default for UsersPerRole {
    fn default() -> Self {
        Self {
            staff: 5,
            faculty: 20,
            students: 200,
        }
    }
}

impl UsersPerRole {
    pub fn total(&self) -> usize {
        self.staff + self.faculty + self.students
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub departments: usize,
    pub courses_per_department: usize,
    pub users: UsersPerRole,
    pub library_resources: usize,
    pub housing_rooms: usize,
    pub grants: usize,
    pub projects: usize,
    pub reports: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            departments: 5,
            courses_per_department: 6,
            users: UsersPerRole::default(),
            library_resources: 60,
            housing_rooms: 40,
            grants: 8,
            projects: 10,
            reports: 6,
        }
    }
}

impl SeedConfig {
    /// Creates a configuration for `departments` departments with defaults elsewhere.
    pub fn new(departments: usize) -> Self {
        Self {
            departments,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: UsersPerRole) -> Self {
        self.users = users;
        self
    }

    pub fn with_courses_per_department(mut self, courses: usize) -> Self {
        self.courses_per_department = courses;
        self
    }

    pub fn with_library_resources(mut self, resources: usize) -> Self {
        self.library_resources = resources;
        self
    }

    pub fn with_housing_rooms(mut self, rooms: usize) -> Self {
        self.housing_rooms = rooms;
        self
    }

    pub fn total_courses(&self) -> usize {
        self.departments * self.courses_per_department
    }

    /// One loan for every fourth student.
    pub fn borrowings(&self) -> usize {
        self.users.students / 4
    }

    /// One housing application for every fifth student.
    pub fn housing_applications(&self) -> usize {
        self.users.students / 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let config = SeedConfig::default();
        assert_eq!(config.users.total(), 225);
        assert_eq!(config.total_courses(), 30);
        assert_eq!(config.borrowings(), 50);
        assert_eq!(config.housing_applications(), 40);
    }

    #[test]
    fn test_builders() {
        let config = SeedConfig::new(2)
            .with_users(UsersPerRole {
                staff: 1,
                faculty: 3,
                students: 10,
            })
            .with_courses_per_department(4)
            .with_library_resources(7)
            .with_housing_rooms(3);
        assert_eq!(config.total_courses(), 8);
        assert_eq!(config.users.total(), 14);
        assert_eq!(config.library_resources, 7);
        assert_eq!(config.housing_rooms, 3);
        assert_eq!(config.borrowings(), 2);
    }
}
