use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_counseling_appointment, create_fitness_class, create_health_record,
    delete_counseling_appointment, delete_fitness_class, delete_health_record,
    get_counseling_appointment, get_counseling_appointments, get_fitness_class,
    get_fitness_classes, get_health_record, get_health_records, update_counseling_appointment,
    update_fitness_class, update_health_record,
};

pub fn init_counseling_appointments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_counseling_appointments).post(create_counseling_appointment),
        )
        .route(
            "/{id}",
            get(get_counseling_appointment)
                .put(update_counseling_appointment)
                .patch(update_counseling_appointment)
                .delete(delete_counseling_appointment),
        )
}

pub fn init_health_records_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_health_records).post(create_health_record))
        .route(
            "/{id}",
            get(get_health_record)
                .put(update_health_record)
                .patch(update_health_record)
                .delete(delete_health_record),
        )
}

pub fn init_fitness_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_fitness_classes).post(create_fitness_class))
        .route(
            "/{id}",
            get(get_fitness_class)
                .put(update_fitness_class)
                .patch(update_fitness_class)
                .delete(delete_fitness_class),
        )
}
