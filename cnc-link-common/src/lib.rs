//! CNC Link Common Types
//!
//! Shared wire types used by both the gateway service and its HTTP client.
//! Field names are camelCase on the wire.

pub mod offsets;
pub mod request;
pub mod response;
pub mod telemetry;

pub use offsets::{
    coordinate_system_label, AxisOffset, ToolOffsetData, ToolRadiusData, WorkZeroOffsetData,
};
pub use request::{
    ConnectionRequest, ToolOffsetRequest, ToolOffsetsRangeRequest, ToolRadiusRequest,
    WorkZeroOffsetRequest, WorkZeroOffsetsRangeRequest, WorkZeroOffsetsRangeSingleRequest,
    WriteMacroRequest, DEFAULT_FOCAS_PORT,
};
pub use response::{FocasResponse, ServiceStatus};
pub use telemetry::{AxisPositionData, FeedrateData, SpindleSpeedData};
