pub use campus_erp_models::ids::{CounselingAppointmentId, FitnessClassId, HealthRecordId};
pub use campus_erp_models::student_services::{
    CounselingAppointment, CounselingAppointmentFilterParams, CreateCounselingAppointmentDto,
    CreateFitnessClassDto, CreateHealthRecordDto, FitnessClass, FitnessClassFilterParams,
    FitnessClassView, HealthRecord, HealthRecordFilterParams,
    PaginatedCounselingAppointmentsResponse, PaginatedFitnessClassesResponse,
    PaginatedHealthRecordsResponse, UpdateCounselingAppointmentDto, UpdateFitnessClassDto,
    UpdateHealthRecordDto, enrollment_within_capacity,
};
