use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_faculty_profile, create_publication, delete_faculty_profile, delete_publication,
    get_faculty_profile, get_faculty_profiles, get_publication, get_publications,
    update_faculty_profile, update_publication,
};

pub fn init_faculty_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_faculty_profiles).post(create_faculty_profile))
        .route(
            "/{id}",
            get(get_faculty_profile)
                .put(update_faculty_profile)
                .patch(update_faculty_profile)
                .delete(delete_faculty_profile),
        )
}

pub fn init_publications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_publications).post(create_publication))
        .route(
            "/{id}",
            get(get_publication)
                .put(update_publication)
                .patch(update_publication)
                .delete(delete_publication),
        )
}
