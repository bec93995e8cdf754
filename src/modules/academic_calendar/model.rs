pub use campus_erp_models::academics::{
    AcademicYear, AcademicYearFilterParams, CreateAcademicYearDto, CreateSemesterDto,
    PaginatedAcademicYearsResponse, PaginatedSemestersResponse, Semester, SemesterFilterParams,
    SemesterName, UpdateAcademicYearDto, UpdateSemesterDto,
};
pub use campus_erp_models::ids::{AcademicYearId, SemesterId};
