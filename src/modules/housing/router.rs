use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_housing, create_housing_application, delete_housing, delete_housing_application,
    get_housing, get_housing_application, get_housing_applications, get_housing_list,
    update_housing, update_housing_application,
};

pub fn init_housing_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_housing_list).post(create_housing))
        .route(
            "/{id}",
            get(get_housing)
                .put(update_housing)
                .patch(update_housing)
                .delete(delete_housing),
        )
}

pub fn init_housing_applications_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_housing_applications).post(create_housing_application),
        )
        .route(
            "/{id}",
            get(get_housing_application)
                .put(update_housing_application)
                .patch(update_housing_application)
                .delete(delete_housing_application),
        )
}
