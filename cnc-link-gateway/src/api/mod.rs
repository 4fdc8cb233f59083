//! HTTP API mounted under `/api/focas`.
//!
//! Every handler answers 200 with a [`FocasResponse`] envelope. Malformed
//! bodies and path parameters become failed envelopes as well.

pub mod connection;
pub mod health;
pub mod macros;
pub mod offsets;
pub mod telemetry;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::{Json, Router};
use cnc_link_common::FocasResponse;

use crate::error::{envelope, LinkError, Result};
use crate::link::CncLink;
use crate::state::AppState;

/// Prefix the API is served under.
pub const API_PREFIX: &str = "/api/focas";

/// Envelope body shared by every operation.
pub type FocasJson<T> = Json<FocasResponse<T>>;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(connection::router())
        .merge(telemetry::router())
        .merge(offsets::router())
        .merge(macros::router())
}

/// Unwrap a JSON body, reporting a rejection as an invalid request.
pub(crate) fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| LinkError::InvalidRequest(rejection.body_text()))
}

/// Unwrap path parameters, reporting a rejection as an invalid request.
pub(crate) fn params<T>(payload: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    payload
        .map(|Path(value)| value)
        .map_err(|rejection| LinkError::InvalidRequest(rejection.body_text()))
}

/// Run `op` on the link once `input` parsed, and wrap the outcome.
pub(crate) async fn run<I, T, F>(state: &AppState, input: Result<I>, op: F) -> FocasJson<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut CncLink, I) -> Result<T> + Send + 'static,
{
    let result = match input {
        Ok(input) => state.with_link(move |link| op(link, input)).await,
        Err(e) => {
            tracing::warn!("Rejected request: {}", e);
            Err(e)
        }
    };
    Json(envelope(result))
}
