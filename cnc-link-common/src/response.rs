//! Uniform response envelope.

use serde::{Deserialize, Serialize};

/// Envelope returned by every gateway operation.
///
/// Domain failures are reported with `success = false` and an error text
/// rather than through the HTTP status, so a caller can always parse the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocasResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// FOCAS result code, when the failure came from the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i16>,
}

impl<T> FocasResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    pub fn failure(error: impl Into<String>, error_code: Option<i16>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_code,
        }
    }

    /// Convert into a plain `Result`, keeping the error text and code.
    pub fn into_result(self) -> Result<Option<T>, (String, Option<i16>)> {
        if self.success {
            Ok(self.data)
        } else {
            Err((
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
                self.error_code,
            ))
        }
    }
}

/// Static liveness payload for `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    /// RFC 3339 time at which the payload was produced.
    #[serde(default)]
    pub timestamp: Option<String>,
}
