//! Error types for the CNC link.

use cnc_link_common::FocasResponse;

use crate::focas::{DriverError, ReturnCode};

/// Error types for gateway operations.
///
/// Every variant ends up in the response envelope; none is surfaced as an
/// HTTP error status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("Not connected")]
    NotConnected,

    #[error("{code}")]
    Driver { code: ReturnCode },

    #[error("{message} ({target})")]
    Connect {
        code: Option<ReturnCode>,
        message: String,
        target: String,
    },

    #[error("Reconnect failed: {message}")]
    Reconnect {
        code: Option<ReturnCode>,
        message: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Fault(String),
}

impl LinkError {
    /// FOCAS result code behind the error, if any.
    pub fn error_code(&self) -> Option<i16> {
        match self {
            LinkError::Driver { code } => Some(code.code()),
            LinkError::Connect { code, .. } | LinkError::Reconnect { code, .. } => {
                code.map(ReturnCode::code)
            }
            LinkError::NotConnected | LinkError::InvalidRequest(_) | LinkError::Fault(_) => None,
        }
    }

    pub fn into_response<T>(self) -> FocasResponse<T> {
        let code = self.error_code();
        FocasResponse::failure(self.to_string(), code)
    }
}

impl From<DriverError> for LinkError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Code(code) => LinkError::Driver { code },
            DriverError::Fault(message) => LinkError::Fault(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;

/// Fold an operation result into the response envelope.
pub fn envelope<T>(result: Result<T>) -> FocasResponse<T> {
    match result {
        Ok(data) => FocasResponse::ok(data),
        Err(err) => err.into_response(),
    }
}
