pub use campus_erp_models::academics::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
pub use campus_erp_models::ids::CourseId;
