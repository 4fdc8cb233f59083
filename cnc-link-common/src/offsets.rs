//! Tool and work-zero offset records.

use serde::{Deserialize, Serialize};

/// Tool radius from tool-life management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRadiusData {
    pub radius: i32,
    pub tool_group: i16,
    pub tool_number: i16,
}

/// The four compensation values of one tool.
///
/// A field is `None` when its individual read failed; the record as a whole
/// is still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOffsetData {
    pub tool_number: i16,
    pub cutter_radius_wear: Option<i32>,
    pub cutter_radius_geometry: Option<i32>,
    pub tool_length_wear: Option<i32>,
    pub tool_length_geometry: Option<i32>,
}

impl ToolOffsetData {
    /// Record with no values, used when a tool could not be read at all.
    pub fn empty(tool_number: i16) -> Self {
        Self {
            tool_number,
            cutter_radius_wear: None,
            cutter_radius_geometry: None,
            tool_length_wear: None,
            tool_length_geometry: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cutter_radius_wear.is_none()
            && self.cutter_radius_geometry.is_none()
            && self.tool_length_wear.is_none()
            && self.tool_length_geometry.is_none()
    }
}

/// Offset value of a single axis. Axes are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOffset {
    pub axis: i16,
    pub value: i32,
}

/// Work-zero offsets of one coordinate system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkZeroOffsetData {
    pub number: i16,
    /// `EXT`, `G54`..`G59`, or `G54.1 P<n>`.
    pub label: String,
    pub axes: Vec<AxisOffset>,
}

impl WorkZeroOffsetData {
    pub fn new(number: i16, axes: Vec<AxisOffset>) -> Self {
        Self {
            number,
            label: coordinate_system_label(number),
            axes,
        }
    }
}

/// Name of a work coordinate system as the controller numbers them.
pub fn coordinate_system_label(number: i16) -> String {
    match number {
        0 => "EXT".to_string(),
        1..=6 => format!("G{}", 53 + number),
        n if n > 6 => format!("G54.1 P{}", n - 6),
        n => format!("#{}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_system_labels() {
        assert_eq!(coordinate_system_label(0), "EXT");
        assert_eq!(coordinate_system_label(1), "G54");
        assert_eq!(coordinate_system_label(6), "G59");
        assert_eq!(coordinate_system_label(7), "G54.1 P1");
        assert_eq!(coordinate_system_label(54), "G54.1 P48");
        assert_eq!(coordinate_system_label(-3), "#-3");
    }

    #[test]
    fn test_empty_tool_offsets_serialize_as_null() {
        let data = ToolOffsetData::empty(6);
        assert!(data.is_empty());
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["toolNumber"], 6);
        assert!(json["cutterRadiusWear"].is_null());
        assert!(json["toolLengthGeometry"].is_null());
    }

    #[test]
    fn test_partial_tool_offsets_not_empty() {
        let data = ToolOffsetData {
            tool_length_wear: Some(-12),
            ..ToolOffsetData::empty(3)
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn test_work_zero_offset_carries_label() {
        let data = WorkZeroOffsetData::new(2, vec![AxisOffset { axis: 1, value: 150_000 }]);
        assert_eq!(data.label, "G55");
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains(r#""axes":[{"axis":1,"value":150000}]"#));
    }
}
