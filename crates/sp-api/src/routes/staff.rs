//! Staff scoring endpoint.

use axum::Json;

use crate::scoring::evaluate_scores;
use sp_protocol::{ScoredStaff, StaffCounters};

/// POST /api/v1/staff/score — score and rank the supplied counter rows.
pub async fn score(Json(rows): Json<Vec<StaffCounters>>) -> Json<Vec<ScoredStaff>> {
    Json(evaluate_scores(rows))
}
