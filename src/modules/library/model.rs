pub use campus_erp_models::ids::{LibraryBorrowingId, LibraryResourceId};
pub use campus_erp_models::library::{
    CreateLibraryBorrowingDto, CreateLibraryResourceDto, LibraryBorrowing,
    LibraryBorrowingFilterParams, LibraryResource, LibraryResourceFilterParams,
    LibraryResourceView, PaginatedLibraryBorrowingsResponse, PaginatedLibraryResourcesResponse,
    UpdateLibraryBorrowingDto, UpdateLibraryResourceDto, copies_within_total,
};
