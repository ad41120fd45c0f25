//! Deployment status endpoint for pipeline health checks.
//!
//! Reports version, environment and host facts so a deploy step can confirm
//! which build is serving traffic where.

use axum::{extract::State, Json};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::status::StatusRecord;

/// `GET /status`
///
/// Returns a freshly collected [`StatusRecord`] as JSON.
#[instrument(name = "status::get_status", skip(state))]
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusRecord>, AppError> {
    let record = state.reporter.report()?;
    Ok(Json(record))
}
