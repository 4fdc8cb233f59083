//! Live machine readings. Fetched fresh on every request.

use serde::{Deserialize, Serialize};

/// Actual feedrate as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedrateData {
    pub feedrate: i32,
}

/// Actual spindle speed as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpindleSpeedData {
    pub speed: i32,
}

/// Absolute position of every axis, in controller least-input increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisPositionData {
    pub positions: Vec<i32>,
    pub axis_type: i16,
}
