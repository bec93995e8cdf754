use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_academic_year, create_semester, delete_academic_year, delete_semester,
    get_academic_year, get_academic_years, get_semester, get_semesters, update_academic_year,
    update_semester,
};

pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_academic_years).post(create_academic_year))
        .route(
            "/{id}",
            get(get_academic_year)
                .put(update_academic_year)
                .patch(update_academic_year)
                .delete(delete_academic_year),
        )
}

pub fn init_semesters_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_semesters).post(create_semester))
        .route(
            "/{id}",
            get(get_semester)
                .put(update_semester)
                .patch(update_semester)
                .delete(delete_semester),
        )
}
