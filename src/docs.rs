//! OpenAPI document served at `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use campus_erp_core::{PaginationMeta, PaginationParams};
use campus_erp_models::academics::{
    AcademicYear, Course, CreateAcademicYearDto, CreateCourseDto, CreateDepartmentDto,
    CreateSemesterDto, Department, PaginatedAcademicYearsResponse, PaginatedCoursesResponse,
    PaginatedDepartmentsResponse, PaginatedSemestersResponse, Semester, UpdateAcademicYearDto,
    UpdateCourseDto, UpdateDepartmentDto, UpdateSemesterDto,
};
use campus_erp_models::auth::{LoginRequest, LoginResponse};
use campus_erp_models::choices::{
    ApplicationStatus, AuditStatus, GrantStatus, ProjectStatus, ReportStatus, ResourceType,
    RoomType, SemesterName, SessionType,
};
use campus_erp_models::compliance::{
    Audit, ComplianceReport, CreateAuditDto, CreateComplianceReportDto, PaginatedAuditsResponse,
    PaginatedComplianceReportsResponse, UpdateAuditDto, UpdateComplianceReportDto,
};
use campus_erp_models::dashboard::{
    Activity, ActivityKind, DashboardStats, HousingOccupancy, RecentActivitiesResponse,
};
use campus_erp_models::faculty::{
    CreateFacultyProfileDto, CreatePublicationDto, FacultyProfile, PaginatedFacultyProfilesResponse,
    PaginatedPublicationsResponse, Publication, UpdateFacultyProfileDto, UpdatePublicationDto,
};
use campus_erp_models::housing::{
    CreateHousingApplicationDto, CreateHousingDto, Housing, HousingApplication, HousingView,
    PaginatedHousingApplicationsResponse, PaginatedHousingResponse, UpdateHousingApplicationDto,
    UpdateHousingDto,
};
use campus_erp_models::library::{
    CreateLibraryBorrowingDto, CreateLibraryResourceDto, LibraryBorrowing, LibraryResource,
    LibraryResourceView, PaginatedLibraryBorrowingsResponse, PaginatedLibraryResourcesResponse,
    UpdateLibraryBorrowingDto, UpdateLibraryResourceDto,
};
use campus_erp_models::research::{
    CreateResearchGrantDto, CreateResearchProjectDto, PaginatedResearchGrantsResponse,
    PaginatedResearchProjectsResponse, ResearchGrant, ResearchProject, UpdateResearchGrantDto,
    UpdateResearchProjectDto,
};
use campus_erp_models::student_services::{
    CounselingAppointment, CreateCounselingAppointmentDto, CreateFitnessClassDto,
    CreateHealthRecordDto, FitnessClass, FitnessClassView, HealthRecord,
    PaginatedCounselingAppointmentsResponse, PaginatedFitnessClassesResponse,
    PaginatedHealthRecordsResponse, UpdateCounselingAppointmentDto, UpdateFitnessClassDto,
    UpdateHealthRecordDto,
};
use campus_erp_models::users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserRole,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::dashboard::controller::get_stats,
        crate::modules::dashboard::controller::get_recent_activities,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::academic_calendar::controller::create_academic_year,
        crate::modules::academic_calendar::controller::get_academic_years,
        crate::modules::academic_calendar::controller::get_academic_year,
        crate::modules::academic_calendar::controller::update_academic_year,
        crate::modules::academic_calendar::controller::delete_academic_year,
        crate::modules::academic_calendar::controller::create_semester,
        crate::modules::academic_calendar::controller::get_semesters,
        crate::modules::academic_calendar::controller::get_semester,
        crate::modules::academic_calendar::controller::update_semester,
        crate::modules::academic_calendar::controller::delete_semester,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::faculty::controller::create_faculty_profile,
        crate::modules::faculty::controller::get_faculty_profiles,
        crate::modules::faculty::controller::get_faculty_profile,
        crate::modules::faculty::controller::update_faculty_profile,
        crate::modules::faculty::controller::delete_faculty_profile,
        crate::modules::faculty::controller::create_publication,
        crate::modules::faculty::controller::get_publications,
        crate::modules::faculty::controller::get_publication,
        crate::modules::faculty::controller::update_publication,
        crate::modules::faculty::controller::delete_publication,
        crate::modules::research::controller::create_research_grant,
        crate::modules::research::controller::get_research_grants,
        crate::modules::research::controller::get_research_grant,
        crate::modules::research::controller::update_research_grant,
        crate::modules::research::controller::delete_research_grant,
        crate::modules::research::controller::create_research_project,
        crate::modules::research::controller::get_research_projects,
        crate::modules::research::controller::get_research_project,
        crate::modules::research::controller::update_research_project,
        crate::modules::research::controller::delete_research_project,
        crate::modules::library::controller::create_library_resource,
        crate::modules::library::controller::get_library_resources,
        crate::modules::library::controller::get_library_resource,
        crate::modules::library::controller::update_library_resource,
        crate::modules::library::controller::delete_library_resource,
        crate::modules::library::controller::create_library_borrowing,
        crate::modules::library::controller::get_library_borrowings,
        crate::modules::library::controller::get_library_borrowing,
        crate::modules::library::controller::update_library_borrowing,
        crate::modules::library::controller::delete_library_borrowing,
        crate::modules::housing::controller::create_housing,
        crate::modules::housing::controller::get_housing_list,
        crate::modules::housing::controller::get_housing,
        crate::modules::housing::controller::update_housing,
        crate::modules::housing::controller::delete_housing,
        crate::modules::housing::controller::create_housing_application,
        crate::modules::housing::controller::get_housing_applications,
        crate::modules::housing::controller::get_housing_application,
        crate::modules::housing::controller::update_housing_application,
        crate::modules::housing::controller::delete_housing_application,
        crate::modules::student_services::controller::create_counseling_appointment,
        crate::modules::student_services::controller::get_counseling_appointments,
        crate::modules::student_services::controller::get_counseling_appointment,
        crate::modules::student_services::controller::update_counseling_appointment,
        crate::modules::student_services::controller::delete_counseling_appointment,
        crate::modules::student_services::controller::create_health_record,
        crate::modules::student_services::controller::get_health_records,
        crate::modules::student_services::controller::get_health_record,
        crate::modules::student_services::controller::update_health_record,
        crate::modules::student_services::controller::delete_health_record,
        crate::modules::student_services::controller::create_fitness_class,
        crate::modules::student_services::controller::get_fitness_classes,
        crate::modules::student_services::controller::get_fitness_class,
        crate::modules::student_services::controller::update_fitness_class,
        crate::modules::student_services::controller::delete_fitness_class,
        crate::modules::compliance::controller::create_compliance_report,
        crate::modules::compliance::controller::get_compliance_reports,
        crate::modules::compliance::controller::get_compliance_report,
        crate::modules::compliance::controller::update_compliance_report,
        crate::modules::compliance::controller::delete_compliance_report,
        crate::modules::compliance::controller::create_audit,
        crate::modules::compliance::controller::get_audits,
        crate::modules::compliance::controller::get_audit,
        crate::modules::compliance::controller::update_audit,
        crate::modules::compliance::controller::delete_audit,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            PaginatedUsersResponse,
            AcademicYear,
            CreateAcademicYearDto,
            UpdateAcademicYearDto,
            PaginatedAcademicYearsResponse,
            Semester,
            CreateSemesterDto,
            UpdateSemesterDto,
            PaginatedSemestersResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            PaginatedDepartmentsResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            FacultyProfile,
            CreateFacultyProfileDto,
            UpdateFacultyProfileDto,
            PaginatedFacultyProfilesResponse,
            Publication,
            CreatePublicationDto,
            UpdatePublicationDto,
            PaginatedPublicationsResponse,
            ResearchGrant,
            CreateResearchGrantDto,
            UpdateResearchGrantDto,
            PaginatedResearchGrantsResponse,
            ResearchProject,
            CreateResearchProjectDto,
            UpdateResearchProjectDto,
            PaginatedResearchProjectsResponse,
            LibraryResource,
            LibraryResourceView,
            CreateLibraryResourceDto,
            UpdateLibraryResourceDto,
            PaginatedLibraryResourcesResponse,
            LibraryBorrowing,
            CreateLibraryBorrowingDto,
            UpdateLibraryBorrowingDto,
            PaginatedLibraryBorrowingsResponse,
            Housing,
            HousingView,
            CreateHousingDto,
            UpdateHousingDto,
            PaginatedHousingResponse,
            HousingApplication,
            CreateHousingApplicationDto,
            UpdateHousingApplicationDto,
            PaginatedHousingApplicationsResponse,
            CounselingAppointment,
            CreateCounselingAppointmentDto,
            UpdateCounselingAppointmentDto,
            PaginatedCounselingAppointmentsResponse,
            HealthRecord,
            CreateHealthRecordDto,
            UpdateHealthRecordDto,
            PaginatedHealthRecordsResponse,
            FitnessClass,
            FitnessClassView,
            CreateFitnessClassDto,
            UpdateFitnessClassDto,
            PaginatedFitnessClassesResponse,
            ComplianceReport,
            CreateComplianceReportDto,
            UpdateComplianceReportDto,
            PaginatedComplianceReportsResponse,
            Audit,
            CreateAuditDto,
            UpdateAuditDto,
            PaginatedAuditsResponse,
            DashboardStats,
            HousingOccupancy,
            Activity,
            ActivityKind,
            RecentActivitiesResponse,
            LoginRequest,
            LoginResponse,
            ApplicationStatus,
            AuditStatus,
            GrantStatus,
            ProjectStatus,
            ReportStatus,
            ResourceType,
            RoomType,
            SemesterName,
            SessionType,
            PaginationMeta,
            PaginationParams,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token login"),
        (name = "Dashboard", description = "Campus statistics and recent activity"),
        (name = "Users", description = "User accounts, administrators only"),
        (name = "Departments", description = "Academic departments"),
        (name = "Academic Calendar", description = "Academic years and semesters"),
        (name = "Courses", description = "Course catalogue and prerequisites"),
        (name = "Faculty", description = "Faculty profiles and publications"),
        (name = "Research", description = "Research grants and projects"),
        (name = "Library", description = "Library resources and borrowings"),
        (name = "Housing", description = "Rooms and housing applications"),
        (name = "Student Services", description = "Counseling, health records and fitness classes"),
        (name = "Compliance", description = "Compliance reports and audits")
    ),
    info(
        title = "Campus ERP API",
        version = "0.1.0",
        description = "University administration REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/login",
            "/api/stats",
            "/api/recent-activities",
            "/api/users",
            "/api/courses/{id}",
            "/api/library-borrowings",
            "/api/housing-applications/{id}",
            "/api/audits",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
