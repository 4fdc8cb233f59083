//! Custom macro variable writes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use cnc_link_common::WriteMacroRequest;

use super::{body, run, FocasJson};
use crate::state::AppState;

/// Build the macro router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/write-macro", post(write_macro))
}

/// POST /api/focas/write-macro
async fn write_macro(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WriteMacroRequest>, JsonRejection>,
) -> FocasJson<String> {
    run(&state, body(payload), |link, request| {
        link.write_macro(request.number, request.mcr_val, request.dec_val)
    })
    .await
}
