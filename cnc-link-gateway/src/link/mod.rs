//! Connection lifecycle of the single FOCAS handle.
//!
//! `CncLink` is the only owner of the handle. It is either `Disconnected`
//! (no handle) or `Connected` (handle plus the parameters that produced it).
//! Every driver call goes through `with_handle_retry`, which reconnects once
//! with the cached parameters when the library reports a stale handle.

mod reads;
mod retry;

use std::fmt;
use std::sync::Arc;

use cnc_link_common::DEFAULT_FOCAS_PORT;

use crate::error::{LinkError, Result};
use crate::focas::{DriverResult, FocasDriver, Handle};

/// Tunables of a link, taken from the `[focas]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    /// Axes reported by bulk reads (absolute position, work-zero offsets).
    pub axis_count: usize,
    /// Connect timeout used when a request does not name one.
    pub connect_timeout_secs: i32,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            axis_count: crate::focas::layout::MAX_AXIS,
            connect_timeout_secs: 10,
        }
    }
}

/// Parameters of the last successful connect, reused on reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// `None` selects a local (HSSB) connection.
    pub host: Option<String>,
    pub port: u16,
    pub timeout_secs: i32,
}

impl ConnectParams {
    pub fn local() -> Self {
        Self {
            host: None,
            port: DEFAULT_FOCAS_PORT,
            timeout_secs: 10,
        }
    }

    pub fn network(host: impl Into<String>, port: u16, timeout_secs: i32) -> Self {
        Self {
            host: Some(host.into()),
            port,
            timeout_secs,
        }
    }

    /// Build from optional request fields; an empty host means local.
    pub fn from_request(host: Option<String>, port: u16, timeout_secs: i32) -> Self {
        match host.filter(|h| !h.trim().is_empty()) {
            Some(host) => Self::network(host.trim(), port, timeout_secs),
            None => Self {
                timeout_secs,
                ..Self::local()
            },
        }
    }
}

impl fmt::Display for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "IP: {}, Port: {}", host, self.port),
            None => f.write_str("local connection"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

#[derive(Debug, Clone)]
struct Session {
    handle: Handle,
    params: ConnectParams,
}

/// Owner of the FOCAS connection handle.
///
/// Not internally synchronized: the service keeps it behind a mutex so one
/// operation, including its reconnect-retry, runs at a time.
pub struct CncLink {
    driver: Arc<dyn FocasDriver>,
    settings: LinkSettings,
    session: Option<Session>,
}

impl CncLink {
    pub fn new(driver: Arc<dyn FocasDriver>, settings: LinkSettings) -> Self {
        Self {
            driver,
            settings,
            session: None,
        }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    pub fn state(&self) -> LinkState {
        if self.session.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        self.session.as_ref().map(|s| s.handle)
    }

    pub fn params(&self) -> Option<&ConnectParams> {
        self.session.as_ref().map(|s| &s.params)
    }

    /// Open a connection, replacing any handle already held.
    ///
    /// The previous handle is released first; a failed release is only
    /// logged since the handle is abandoned either way.
    pub fn connect(&mut self, params: ConnectParams) -> Result<String> {
        if let Some(previous) = self.session.take() {
            tracing::info!("Releasing handle {} before reconnecting", previous.handle);
            if let Err(e) = self.driver.disconnect(previous.handle) {
                tracing::warn!("Failed to release previous handle {}: {}", previous.handle, e);
            }
        }

        match self.open(&params) {
            Ok(handle) => {
                tracing::info!("Connected to CNC with handle: {} ({})", handle, params);
                self.session = Some(Session { handle, params });
                Ok(format!("Connected with handle: {}", handle))
            }
            Err(e) => {
                tracing::error!("Failed to connect to CNC: {} ({})", e, params);
                let (code, target) = match e.code() {
                    Some(code) => (Some(code), params.to_string()),
                    None => (None, format!("Attempted connection to: {}", params)),
                };
                Err(LinkError::Connect {
                    code,
                    message: e.to_string(),
                    target,
                })
            }
        }
    }

    /// Release the handle and forget the cached parameters.
    pub fn disconnect(&mut self) -> Result<String> {
        let handle = self.require_handle()?;
        match self.driver.disconnect(handle) {
            Ok(()) => {
                tracing::info!("Disconnected from CNC (handle {})", handle);
                self.session = None;
                Ok("Disconnected".to_string())
            }
            Err(e) => {
                tracing::error!("Error disconnecting from CNC: {}", e);
                Err(e.into())
            }
        }
    }

    fn require_handle(&self) -> Result<Handle> {
        self.handle().ok_or(LinkError::NotConnected)
    }

    fn open(&self, params: &ConnectParams) -> DriverResult<Handle> {
        match &params.host {
            Some(host) => self
                .driver
                .connect_network(host, params.port, params.timeout_secs),
            None => self.driver.connect_local(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focas::{DriverError, ReturnCode};
    use crate::test_util::{Call, FakeDriver};

    fn link_with(driver: &Arc<FakeDriver>) -> CncLink {
        CncLink::new(driver.clone(), LinkSettings::default())
    }

    #[test]
    fn test_connect_without_host_is_local() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);

        let message = link.connect(ConnectParams::local()).unwrap();

        assert_eq!(message, "Connected with handle: 1");
        assert_eq!(driver.calls(), vec![Call::ConnectLocal]);
        assert_eq!(link.state(), LinkState::Connected);
    }

    #[test]
    fn test_connect_with_host_is_networked() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);

        link.connect(ConnectParams::network("192.168.3.105", 8193, 10))
            .unwrap();

        assert_eq!(
            driver.calls(),
            vec![Call::ConnectNetwork {
                host: "192.168.3.105".to_string(),
                port: 8193,
                timeout_secs: 10,
            }]
        );
        assert_eq!(
            link.params(),
            Some(&ConnectParams::network("192.168.3.105", 8193, 10))
        );
    }

    #[test]
    fn test_from_request_treats_blank_host_as_local() {
        let params = ConnectParams::from_request(Some("  ".to_string()), 8193, 5);
        assert_eq!(params.host, None);
        assert_eq!(params.timeout_secs, 5);
        assert_eq!(params.to_string(), "local connection");
    }

    #[test]
    fn test_connect_failure_stays_disconnected() {
        let driver = Arc::new(FakeDriver::new());
        driver.fail_always(Call::is_connect, DriverError::Code(ReturnCode::SOCKET));
        let mut link = link_with(&driver);

        let err = link
            .connect(ConnectParams::network("10.0.0.9", 8193, 10))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Windows socket error (IP: 10.0.0.9, Port: 8193)"
        );
        assert_eq!(err.error_code(), Some(-16));
        assert_eq!(link.state(), LinkState::Disconnected);
        assert_eq!(link.params(), None);
    }

    #[test]
    fn test_connect_fault_names_attempted_target() {
        let driver = Arc::new(FakeDriver::new());
        driver.fail_always(Call::is_connect, DriverError::Fault("library missing".to_string()));
        let mut link = link_with(&driver);

        let err = link.connect(ConnectParams::local()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "library missing (Attempted connection to: local connection)"
        );
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_connect_while_connected_releases_old_handle() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);

        link.connect(ConnectParams::local()).unwrap();
        link.connect(ConnectParams::network("10.0.0.2", 8193, 10))
            .unwrap();

        let calls = driver.calls();
        assert_eq!(calls[1], Call::Disconnect(Handle(1)));
        assert_eq!(link.handle(), Some(Handle(2)));
    }

    #[test]
    fn test_disconnect_when_not_connected() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);

        let err = link.disconnect().unwrap_err();

        assert_eq!(err, LinkError::NotConnected);
        assert_eq!(err.to_string(), "Not connected");
        assert_eq!(driver.call_count(), 0);
    }

    #[test]
    fn test_disconnect_clears_handle_and_params() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);
        link.connect(ConnectParams::network("10.0.0.2", 8193, 10))
            .unwrap();

        assert_eq!(link.disconnect().unwrap(), "Disconnected");

        assert_eq!(link.state(), LinkState::Disconnected);
        assert_eq!(link.handle(), None);
        assert_eq!(link.params(), None);
        assert_eq!(link.feedrate().unwrap_err(), LinkError::NotConnected);
    }

    #[test]
    fn test_disconnect_failure_keeps_handle() {
        let driver = Arc::new(FakeDriver::new());
        let mut link = link_with(&driver);
        link.connect(ConnectParams::local()).unwrap();
        driver.fail_once(
            |call| matches!(call, Call::Disconnect(_)),
            DriverError::Code(ReturnCode::BUSY),
        );

        let err = link.disconnect().unwrap_err();

        assert_eq!(err.error_code(), Some(-1));
        assert_eq!(link.state(), LinkState::Connected);
    }
}
