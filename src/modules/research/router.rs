use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_research_grant, create_research_project, delete_research_grant, delete_research_project,
    get_research_grant, get_research_grants, get_research_project, get_research_projects,
    update_research_grant, update_research_project,
};

pub fn init_research_grants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_research_grants).post(create_research_grant))
        .route(
            "/{id}",
            get(get_research_grant)
                .put(update_research_grant)
                .patch(update_research_grant)
                .delete(delete_research_grant),
        )
}

pub fn init_research_projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_research_projects).post(create_research_project))
        .route(
            "/{id}",
            get(get_research_project)
                .put(update_research_project)
                .patch(update_research_project)
                .delete(delete_research_project),
        )
}
