//! FOCAS driver abstraction.
//!
//! This module defines the `FocasDriver` trait that stands between the
//! connection logic and the vendor library. The production implementation
//! (`FocasLibrary`) calls into the native library; tests use a recording fake.

pub mod codes;
pub mod layout;
mod library;

pub use codes::{describe, ReturnCode};
pub use library::{default_library_path, FocasLibrary};

use std::fmt;

/// Library handle issued on a successful connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u16);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure of a single driver call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The library returned a non-zero result code.
    #[error("{0}")]
    Code(ReturnCode),
    /// The call could not be made at all (library missing, symbol missing).
    #[error("{0}")]
    Fault(String),
}

impl DriverError {
    pub fn code(&self) -> Option<ReturnCode> {
        match self {
            DriverError::Code(code) => Some(*code),
            DriverError::Fault(_) => None,
        }
    }

    pub fn is_handle_error(&self) -> bool {
        self.code().is_some_and(ReturnCode::is_handle_error)
    }

    pub fn is_length_error(&self) -> bool {
        self.code().is_some_and(ReturnCode::is_length_error)
    }
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Turn a raw result code into a `DriverResult`.
pub fn check(result: i16) -> DriverResult<()> {
    let code = ReturnCode(result);
    if code.is_ok() {
        Ok(())
    } else {
        Err(DriverError::Code(code))
    }
}

/// Tool offset kinds of a machining-center controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetType {
    CutterRadiusWear,
    CutterRadiusGeometry,
    ToolLengthWear,
    ToolLengthGeometry,
}

impl OffsetType {
    pub const ALL: [OffsetType; 4] = [
        OffsetType::CutterRadiusWear,
        OffsetType::CutterRadiusGeometry,
        OffsetType::ToolLengthWear,
        OffsetType::ToolLengthGeometry,
    ];

    /// `type` argument of `cnc_rdtofs`.
    pub fn code(self) -> i16 {
        match self {
            OffsetType::CutterRadiusWear => 0,
            OffsetType::CutterRadiusGeometry => 1,
            OffsetType::ToolLengthWear => 2,
            OffsetType::ToolLengthGeometry => 3,
        }
    }
}

impl fmt::Display for OffsetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffsetType::CutterRadiusWear => "Cutter Radius Wear",
            OffsetType::CutterRadiusGeometry => "Cutter Radius Geometry",
            OffsetType::ToolLengthWear => "Tool Length Wear",
            OffsetType::ToolLengthGeometry => "Tool Length Geometry",
        };
        f.write_str(name)
    }
}

/// Result of `cnc_absolute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisRecord {
    pub axis_type: i16,
    pub values: Vec<i32>,
}

/// Result of `cnc_rd1radius`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusRecord {
    pub group: i16,
    pub number: i16,
    pub radius: i32,
}

/// Work-zero values of one coordinate system, in axis order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkZeroRecord {
    pub number: i16,
    pub axis: i16,
    pub values: Vec<i32>,
}

/// Blocking calls into a FOCAS implementation.
///
/// Every method maps to exactly one library call. Callers hold the handle;
/// the driver itself is stateless with respect to connections.
pub trait FocasDriver: Send + Sync {
    /// `cnc_allclibhndl`: connect over HSSB / the local bus.
    fn connect_local(&self) -> DriverResult<Handle>;

    /// `cnc_allclibhndl3`: connect over Ethernet.
    fn connect_network(&self, host: &str, port: u16, timeout_secs: i32) -> DriverResult<Handle>;

    /// `cnc_freelibhndl`.
    fn disconnect(&self, handle: Handle) -> DriverResult<()>;

    /// `cnc_actf`.
    fn read_feedrate(&self, handle: Handle) -> DriverResult<i32>;

    /// `cnc_acts`.
    fn read_spindle_speed(&self, handle: Handle) -> DriverResult<i32>;

    /// `cnc_absolute`.
    fn read_absolute(&self, handle: Handle, axis: i16, length: i16) -> DriverResult<AxisRecord>;

    /// `cnc_rd1radius`.
    fn read_tool_radius(&self, handle: Handle, group: i16, number: i16)
        -> DriverResult<RadiusRecord>;

    /// `cnc_rdtofs`.
    fn read_tool_offset(
        &self,
        handle: Handle,
        number: i16,
        kind: OffsetType,
        length: i16,
    ) -> DriverResult<i32>;

    /// `cnc_rdzofs`.
    fn read_work_zero(
        &self,
        handle: Handle,
        number: i16,
        axis: i16,
        length: i16,
    ) -> DriverResult<WorkZeroRecord>;

    /// `cnc_rdzofsr`, one record per coordinate system in `start..=end`.
    fn read_work_zero_range(
        &self,
        handle: Handle,
        start: i16,
        axis: i16,
        end: i16,
        length: i16,
    ) -> DriverResult<Vec<WorkZeroRecord>>;

    /// `cnc_wrmacro`.
    fn write_macro(
        &self,
        handle: Handle,
        number: i16,
        length: i16,
        value: i32,
        decimals: i16,
    ) -> DriverResult<()>;
}
