//! HTTP handlers for the presentation boundary

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use tokio::sync::watch;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::evaluation::{ConditionsReport, SharedReport};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct DashboardState {
    pub report: SharedReport,
    /// Live flag from the enhancement pipeline
    pub validating: watch::Receiver<bool>,
}

/// Conditions payload: the latest report plus the loading-state flag.
#[derive(Serialize)]
struct ConditionsDto<'a> {
    #[serde(flatten)]
    report: &'a ConditionsReport,
    /// True while the enhancement pipeline is still working
    validating: bool,
}

/// GET /api/v1/conditions - current verdict, factors, and displayed text.
pub async fn get_conditions(State(state): State<DashboardState>) -> Response {
    let guard = state.report.read().await;
    match guard.as_ref() {
        None => ApiErrorResponse::service_unavailable("first evaluation cycle still running"),
        Some(report) => ApiResponse::ok(ConditionsDto {
            report,
            validating: *state.validating.borrow(),
        }),
    }
}

/// GET /api/v1/health - liveness probe.
pub async fn get_health() -> Response {
    ApiResponse::ok(serde_json::json!({ "status": "ok" }))
}
