//! Reconnect-and-retry on a stale handle.

use crate::error::{LinkError, Result};
use crate::focas::{DriverResult, FocasDriver, Handle};

use super::{CncLink, Session};

impl CncLink {
    /// Run one driver call against the current handle.
    ///
    /// When the library reports a handle error, the link reconnects with the
    /// cached parameters and runs the call exactly once more. Any other
    /// error is returned as is.
    pub(crate) fn with_handle_retry<T, F>(&mut self, what: &str, call: F) -> Result<T>
    where
        F: Fn(&dyn FocasDriver, Handle) -> DriverResult<T>,
    {
        let handle = self.require_handle()?;
        let first = call(self.driver.as_ref(), handle);
        match first {
            Err(e) if e.is_handle_error() => {
                tracing::warn!(
                    "Handle {} rejected while reading {}, reconnecting",
                    handle,
                    what
                );
                let handle = self.reconnect()?;
                call(self.driver.as_ref(), handle).map_err(LinkError::from)
            }
            result => result.map_err(LinkError::from),
        }
    }

    /// Replace a stale handle using the cached parameters.
    ///
    /// The stale handle is not released; the library has already dropped it.
    /// On failure the link falls back to `Disconnected`.
    fn reconnect(&mut self) -> Result<Handle> {
        let params = match &self.session {
            Some(session) => session.params.clone(),
            None => return Err(LinkError::NotConnected),
        };

        match self.open(&params) {
            Ok(handle) => {
                tracing::info!("Reconnected to CNC with handle: {} ({})", handle, params);
                self.session = Some(Session { handle, params });
                Ok(handle)
            }
            Err(e) => {
                tracing::error!("Reconnect to CNC failed: {} ({})", e, params);
                self.session = None;
                Err(LinkError::Reconnect {
                    code: e.code(),
                    message: e.to_string(),
                })
            }
        }
    }
}
