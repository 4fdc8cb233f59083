//! Connect, disconnect and service status.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cnc_link_common::{ConnectionRequest, ServiceStatus};

use super::{run, FocasJson};
use crate::error::{LinkError, Result};
use crate::link::ConnectParams;
use crate::state::AppState;

/// Build the connection router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
        .route("/status", get(status))
}

/// An empty body asks for a local connection on the configured port.
fn connection_request(body: &[u8], default_port: u16) -> Result<ConnectionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConnectionRequest {
            port: default_port,
            ..ConnectionRequest::default()
        });
    }
    serde_json::from_slice(body).map_err(|e| LinkError::InvalidRequest(e.to_string()))
}

/// POST /api/focas/connect
async fn connect(State(state): State<Arc<AppState>>, body: Bytes) -> FocasJson<String> {
    let request = connection_request(&body, state.config.focas.default_port);
    run(&state, request, |link, request| {
        let timeout = request
            .timeout
            .unwrap_or(link.settings().connect_timeout_secs);
        link.connect(ConnectParams::from_request(
            request.ip_address,
            request.port,
            timeout,
        ))
    })
    .await
}

/// POST /api/focas/disconnect
async fn disconnect(State(state): State<Arc<AppState>>) -> FocasJson<String> {
    run(&state, Ok(()), |link, ()| link.disconnect()).await
}

/// GET /api/focas/status - Static liveness message; never touches the link.
async fn status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "FOCAS Service is running".to_string(),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    })
}
