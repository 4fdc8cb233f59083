//! Feedrate, spindle speed and absolute position.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use cnc_link_common::{AxisPositionData, FeedrateData, SpindleSpeedData};

use super::{run, FocasJson};
use crate::state::AppState;

/// Build the telemetry router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feedrate", get(feedrate))
        .route("/spindle-speed", get(spindle_speed))
        .route("/absolute-position", get(absolute_position))
}

async fn feedrate(State(state): State<Arc<AppState>>) -> FocasJson<FeedrateData> {
    run(&state, Ok(()), |link, ()| link.feedrate()).await
}

async fn spindle_speed(State(state): State<Arc<AppState>>) -> FocasJson<SpindleSpeedData> {
    run(&state, Ok(()), |link, ()| link.spindle_speed()).await
}

async fn absolute_position(State(state): State<Arc<AppState>>) -> FocasJson<AxisPositionData> {
    run(&state, Ok(()), |link, ()| link.absolute_position()).await
}
