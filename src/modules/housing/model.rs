pub use campus_erp_models::housing::{
    CreateHousingApplicationDto, CreateHousingDto, Housing, HousingApplication,
    HousingApplicationFilterParams, HousingFilterParams, HousingView,
    PaginatedHousingApplicationsResponse, PaginatedHousingResponse, UpdateHousingApplicationDto,
    UpdateHousingDto, occupancy_within_capacity,
};
pub use campus_erp_models::ids::{HousingApplicationId, HousingId};
