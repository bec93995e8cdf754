pub use campus_erp_models::academics::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};
pub use campus_erp_models::ids::DepartmentId;
