use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_library_borrowing, create_library_resource, delete_library_borrowing,
    delete_library_resource, get_library_borrowing, get_library_borrowings, get_library_resource,
    get_library_resources, update_library_borrowing, update_library_resource,
};

pub fn init_library_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_library_resources).post(create_library_resource))
        .route(
            "/{id}",
            get(get_library_resource)
                .put(update_library_resource)
                .patch(update_library_resource)
                .delete(delete_library_resource),
        )
}

pub fn init_library_borrowings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_library_borrowings).post(create_library_borrowing))
        .route(
            "/{id}",
            get(get_library_borrowing)
                .put(update_library_borrowing)
                .patch(update_library_borrowing)
                .delete(delete_library_borrowing),
        )
}
