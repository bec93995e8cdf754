pub use campus_erp_models::ids::{ResearchGrantId, ResearchProjectId};
pub use campus_erp_models::research::{
    CreateResearchGrantDto, CreateResearchProjectDto, PaginatedResearchGrantsResponse,
    PaginatedResearchProjectsResponse, ResearchGrant, ResearchGrantFilterParams, ResearchProject,
    ResearchProjectFilterParams, UpdateResearchGrantDto, UpdateResearchProjectDto,
};
