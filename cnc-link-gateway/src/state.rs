//! Shared application state.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::link::CncLink;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    link: Arc<Mutex<CncLink>>,
}

impl AppState {
    pub fn new(config: Config, link: CncLink) -> Self {
        Self {
            config,
            link: Arc::new(Mutex::new(link)),
        }
    }

    /// Run `op` against the link on the blocking pool.
    ///
    /// Operations are serialized by the link mutex. A panicking operation is
    /// reported as a fault and leaves the lock usable for the next request.
    pub async fn with_link<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut CncLink) -> Result<T> + Send + 'static,
    {
        let link = self.link.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = link.lock().unwrap_or_else(PoisonError::into_inner);
            op(&mut guard)
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!("FOCAS operation aborted: {}", e);
            Err(LinkError::Fault(format!("Operation aborted: {}", e)))
        })
    }
}
