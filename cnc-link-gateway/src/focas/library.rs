//! Native FOCAS library binding.
//!
//! The vendor library is loaded on first use, so the service starts (and
//! answers `/status`) on machines where it is not installed. Records assume
//! the 32-bit `long` of the Fwlib32 headers.

use std::ffi::CString;
use std::os::raw::{c_char, c_long};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use libloading::{Library, Symbol};

use super::layout::{self, IodbZofs, IodbZor, OdbAct, OdbAxis, OdbTlife4, OdbTofs};
use super::{
    check, AxisRecord, DriverError, DriverResult, FocasDriver, Handle, OffsetType, RadiusRecord,
    WorkZeroRecord,
};

type AllcLibHndl = unsafe extern "system" fn(*mut u16) -> i16;
type AllcLibHndl3 = unsafe extern "system" fn(*const c_char, u16, c_long, *mut u16) -> i16;
type FreeLibHndl = unsafe extern "system" fn(u16) -> i16;
type ActRead = unsafe extern "system" fn(u16, *mut OdbAct) -> i16;
type Absolute = unsafe extern "system" fn(u16, i16, i16, *mut OdbAxis) -> i16;
type Rd1Radius = unsafe extern "system" fn(u16, i16, i16, *mut OdbTlife4) -> i16;
type RdTofs = unsafe extern "system" fn(u16, i16, i16, i16, *mut OdbTofs) -> i16;
type RdZofs = unsafe extern "system" fn(u16, i16, i16, i16, *mut IodbZofs) -> i16;
type RdZofsr = unsafe extern "system" fn(u16, i16, i16, i16, i16, *mut IodbZor) -> i16;
type WrMacro = unsafe extern "system" fn(u16, i16, i16, c_long, i16) -> i16;

/// Platform file name of the vendor library.
pub fn default_library_path() -> &'static str {
    if cfg!(windows) {
        "Fwlib32.dll"
    } else {
        "libfwlib32.so"
    }
}

/// FOCAS driver backed by the vendor shared library.
pub struct FocasLibrary {
    path: PathBuf,
    library: OnceLock<Result<Library, String>>,
}

impl FocasLibrary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            library: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn library(&self) -> DriverResult<&Library> {
        let loaded = self.library.get_or_init(|| {
            tracing::info!("Loading FOCAS library from {}", self.path.display());
            // SAFETY: loading runs the library initializers; the vendor library has none
            // with preconditions beyond being loaded once per process.
            unsafe { Library::new(&self.path) }.map_err(|e| e.to_string())
        });
        loaded.as_ref().map_err(|e| {
            DriverError::Fault(format!(
                "Failed to load FOCAS library {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn symbol<T>(&self, name: &'static str) -> DriverResult<Symbol<'_, T>> {
        let library = self.library()?;
        // SAFETY: every `T` used with this helper is the exact prototype from fwlib32.h.
        unsafe { library.get::<T>(name.as_bytes()) }
            .map_err(|e| DriverError::Fault(format!("FOCAS function {} unavailable: {}", name, e)))
    }

    fn read_act(&self, name: &'static str, handle: Handle) -> DriverResult<i32> {
        let read = self.symbol::<ActRead>(name)?;
        let mut act = OdbAct::default();
        check(unsafe { read(handle.0, &mut act) })?;
        Ok(act.data)
    }
}

/// Refuse a `length` the output buffer cannot hold; the library writes up to
/// `length` bytes into it.
fn ensure_fits(name: &str, length: i16, header: usize, max: i16) -> DriverResult<()> {
    if layout::fits_record(length, header, max) {
        Ok(())
    } else {
        Err(DriverError::Fault(format!(
            "{} length {} does not fit the {}-byte record buffer",
            name, length, max
        )))
    }
}

impl FocasDriver for FocasLibrary {
    fn connect_local(&self) -> DriverResult<Handle> {
        let connect = self.symbol::<AllcLibHndl>("cnc_allclibhndl")?;
        let mut handle = 0u16;
        check(unsafe { connect(&mut handle) })?;
        Ok(Handle(handle))
    }

    fn connect_network(&self, host: &str, port: u16, timeout_secs: i32) -> DriverResult<Handle> {
        let connect = self.symbol::<AllcLibHndl3>("cnc_allclibhndl3")?;
        let host = CString::new(host)
            .map_err(|_| DriverError::Fault(format!("Invalid host address: {:?}", host)))?;
        let mut handle = 0u16;
        check(unsafe { connect(host.as_ptr(), port, c_long::from(timeout_secs), &mut handle) })?;
        Ok(Handle(handle))
    }

    fn disconnect(&self, handle: Handle) -> DriverResult<()> {
        let free = self.symbol::<FreeLibHndl>("cnc_freelibhndl")?;
        check(unsafe { free(handle.0) })
    }

    fn read_feedrate(&self, handle: Handle) -> DriverResult<i32> {
        self.read_act("cnc_actf", handle)
    }

    fn read_spindle_speed(&self, handle: Handle) -> DriverResult<i32> {
        self.read_act("cnc_acts", handle)
    }

    fn read_absolute(&self, handle: Handle, axis: i16, length: i16) -> DriverResult<AxisRecord> {
        ensure_fits("cnc_absolute", length, layout::RECORD_HEADER_LEN, layout::AXIS_RECORD_MAX_LEN)?;
        let read = self.symbol::<Absolute>("cnc_absolute")?;
        let mut record = OdbAxis::default();
        check(unsafe { read(handle.0, axis, length, &mut record) })?;
        let count = layout::values_for_len(length, layout::RECORD_HEADER_LEN).min(layout::MAX_AXIS);
        Ok(AxisRecord {
            axis_type: record.kind,
            values: record.data[..count].to_vec(),
        })
    }

    fn read_tool_radius(
        &self,
        handle: Handle,
        group: i16,
        number: i16,
    ) -> DriverResult<RadiusRecord> {
        let read = self.symbol::<Rd1Radius>("cnc_rd1radius")?;
        let mut record = OdbTlife4::default();
        check(unsafe { read(handle.0, group, number, &mut record) })?;
        Ok(RadiusRecord {
            group: record.datano,
            number: record.kind,
            radius: record.data,
        })
    }

    fn read_tool_offset(
        &self,
        handle: Handle,
        number: i16,
        kind: OffsetType,
        length: i16,
    ) -> DriverResult<i32> {
        ensure_fits("cnc_rdtofs", length, layout::RECORD_HEADER_LEN, layout::TOOL_OFFSET_LEN)?;
        let read = self.symbol::<RdTofs>("cnc_rdtofs")?;
        let mut record = OdbTofs::default();
        check(unsafe { read(handle.0, number, kind.code(), length, &mut record) })?;
        Ok(record.data)
    }

    fn read_work_zero(
        &self,
        handle: Handle,
        number: i16,
        axis: i16,
        length: i16,
    ) -> DriverResult<WorkZeroRecord> {
        ensure_fits("cnc_rdzofs", length, layout::RECORD_HEADER_LEN, layout::AXIS_RECORD_MAX_LEN)?;
        let read = self.symbol::<RdZofs>("cnc_rdzofs")?;
        let mut record = IodbZofs::default();
        check(unsafe { read(handle.0, number, axis, length, &mut record) })?;
        let count = layout::values_for_len(length, layout::RECORD_HEADER_LEN).min(layout::MAX_AXIS);
        Ok(WorkZeroRecord {
            number: record.datano,
            axis,
            values: record.data[..count].to_vec(),
        })
    }

    fn read_work_zero_range(
        &self,
        handle: Handle,
        start: i16,
        axis: i16,
        end: i16,
        length: i16,
    ) -> DriverResult<Vec<WorkZeroRecord>> {
        ensure_fits("cnc_rdzofsr", length, layout::RANGE_HEADER_LEN, layout::RANGE_RECORD_MAX_LEN)?;
        let read = self.symbol::<RdZofsr>("cnc_rdzofsr")?;
        let mut record = IodbZor::zeroed();
        // Argument order follows the vendor prototype: s_number, axis, e_number, length.
        check(unsafe { read(handle.0, start, axis, end, length, &mut record) })?;

        let systems = layout::range_count(start, end);
        let values = layout::values_for_len(length, layout::RANGE_HEADER_LEN).min(record.data.len());
        let per_system = if systems == 0 { 0 } else { values / systems };
        let records = layout::split_range_values(&record.data[..values], per_system, systems)
            .into_iter()
            .zip(start..=end)
            .map(|(values, number)| WorkZeroRecord {
                number,
                axis,
                values,
            })
            .collect();
        Ok(records)
    }

    fn write_macro(
        &self,
        handle: Handle,
        number: i16,
        length: i16,
        value: i32,
        decimals: i16,
    ) -> DriverResult<()> {
        let write = self.symbol::<WrMacro>("cnc_wrmacro")?;
        check(unsafe { write(handle.0, number, length, c_long::from(value), decimals) })
    }
}
