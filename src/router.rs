use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Json, Router, extract::State, middleware, routing::get};
use serde_json::{Value, json};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::middleware::role::{require_admin, require_auth};
use crate::modules::academic_calendar::{init_academic_years_router, init_semesters_router};
use crate::modules::auth::init_auth_router;
use crate::modules::compliance::{init_audits_router, init_compliance_reports_router};
use crate::modules::courses::init_courses_router;
use crate::modules::dashboard::init_dashboard_router;
use crate::modules::departments::init_departments_router;
use crate::modules::faculty::{init_faculty_profiles_router, init_publications_router};
use crate::modules::housing::{init_housing_applications_router, init_housing_router};
use crate::modules::library::{init_library_borrowings_router, init_library_resources_router};
use crate::modules::research::{init_research_grants_router, init_research_projects_router};
use crate::modules::student_services::{
    init_counseling_appointments_router, init_fitness_classes_router, init_health_records_router,
};
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Liveness plus a database round trip.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}

/// Every resource that any authenticated caller may use.
fn resource_routes() -> Router<AppState> {
    Router::new()
        .nest("/departments", init_departments_router())
        .nest("/academic-years", init_academic_years_router())
        .nest("/semesters", init_semesters_router())
        .nest("/courses", init_courses_router())
        .nest("/faculty-profiles", init_faculty_profiles_router())
        .nest("/publications", init_publications_router())
        .nest("/research-grants", init_research_grants_router())
        .nest("/research-projects", init_research_projects_router())
        .nest("/library-resources", init_library_resources_router())
        .nest("/library-borrowings", init_library_borrowings_router())
        .nest("/housing", init_housing_router())
        .nest("/housing-applications", init_housing_applications_router())
        .nest(
            "/counseling-appointments",
            init_counseling_appointments_router(),
        )
        .nest("/health-records", init_health_records_router())
        .nest("/fitness-classes", init_fitness_classes_router())
        .nest("/compliance-reports", init_compliance_reports_router())
        .nest("/audits", init_audits_router())
        .merge(init_dashboard_router())
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .merge(
                    resource_routes()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
                )
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .merge(init_auth_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
}

/// The served stack: the route tree, `/metrics` when a recorder is installed,
/// and trailing slashes trimmed so `/api/departments/` reaches `/api/departments`.
pub fn app(state: AppState, metrics: Option<PrometheusHandle>) -> NormalizePath<Router> {
    let mut router = init_router(state);
    if let Some(handle) = metrics {
        router = router.merge(metrics_app(handle));
    }
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
