//! Request bodies accepted by the gateway.

use serde::{Deserialize, Serialize};

/// Default FOCAS/Ethernet port of a FANUC controller.
pub const DEFAULT_FOCAS_PORT: u16 = 8193;

fn default_port() -> u16 {
    DEFAULT_FOCAS_PORT
}

/// `POST /connect`. A missing `ipAddress` requests a local (HSSB) connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect timeout in seconds; the gateway default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
}

impl Default for ConnectionRequest {
    fn default() -> Self {
        Self {
            ip_address: None,
            port: default_port(),
            timeout: None,
        }
    }
}

/// `POST /tool-radius`. Group 0 selects the group currently in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRadiusRequest {
    #[serde(default)]
    pub tool_group: i16,
    pub tool_number: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOffsetRequest {
    pub tool_number: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOffsetsRangeRequest {
    pub start_tool_number: i16,
    pub end_tool_number: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkZeroOffsetsRangeRequest {
    pub start_coord_sys: i16,
    pub end_coord_sys: i16,
}

/// `POST /work-zero-offset`. Axis -1 reads every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkZeroOffsetRequest {
    pub number: i16,
    pub axis: i16,
    /// Record length in bytes; derived from the axis selection when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkZeroOffsetsRangeSingleRequest {
    pub axis: i16,
    pub start_number: i16,
    pub end_number: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i16>,
}

/// `POST /write-macro`. The stored value is `mcr_val * 10^-dec_val`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteMacroRequest {
    pub number: i16,
    pub mcr_val: i32,
    #[serde(default)]
    pub dec_val: i16,
}
