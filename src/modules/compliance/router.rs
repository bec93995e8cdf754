use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_audit, create_compliance_report, delete_audit, delete_compliance_report, get_audit,
    get_audits, get_compliance_report, get_compliance_reports, update_audit,
    update_compliance_report,
};

pub fn init_compliance_reports_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_compliance_reports).post(create_compliance_report),
        )
        .route(
            "/{id}",
            get(get_compliance_report)
                .put(update_compliance_report)
                .patch(update_compliance_report)
                .delete(delete_compliance_report),
        )
}

pub fn init_audits_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_audits).post(create_audit))
        .route(
            "/{id}",
            get(get_audit)
                .put(update_audit)
                .patch(update_audit)
                .delete(delete_audit),
        )
}
