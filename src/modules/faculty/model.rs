pub use campus_erp_models::faculty::{
    CreateFacultyProfileDto, CreatePublicationDto, FacultyProfile, FacultyProfileFilterParams,
    PaginatedFacultyProfilesResponse, PaginatedPublicationsResponse, Publication,
    PublicationFilterParams, UpdateFacultyProfileDto, UpdatePublicationDto,
};
pub use campus_erp_models::ids::{FacultyProfileId, PublicationId};
