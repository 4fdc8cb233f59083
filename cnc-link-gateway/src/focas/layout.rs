//! Byte layout of the FOCAS records and the length arguments derived from it.
//!
//! Every FOCAS read takes a `length` argument describing how many bytes of
//! the output record the caller expects. The controller rejects a mismatch
//! with a length error, so all of that arithmetic lives here.

/// Axis capacity compiled into the vendor records.
pub const MAX_AXIS: usize = 8;

/// Pseudo axis number selecting every axis.
pub const ALL_AXES: i16 = -1;

/// `datano` + `type` header of single-record structures.
pub const RECORD_HEADER_LEN: usize = 4;

/// `datano_s` + `type` + `datano_e` header of ranged work-zero reads.
///
/// This is the header as counted by the `length` argument of `cnc_rdzofsr`.
/// In the record itself `data` is 4-byte aligned and starts at offset 8;
/// the library places values by field, so only the value count is derived
/// from `length`.
pub const RANGE_HEADER_LEN: usize = 6;

/// Size of one axis value (`long` in the vendor headers).
pub const VALUE_LEN: usize = 4;

/// `ODBTOFS`: header plus one value.
pub const TOOL_OFFSET_LEN: i16 = (RECORD_HEADER_LEN + VALUE_LEN) as i16;

/// `ODBM` as declared to `cnc_wrmacro`: datano, dummy, mcr_val, dec_val.
pub const MACRO_LEN: i16 = 10;

/// Coordinate systems that fit in one `IODBZOR` buffer.
pub const MAX_RANGE_SYSTEMS: usize = 7;

/// Largest `length` an `ODBAXIS` or `IODBZOFS` buffer can take.
pub const AXIS_RECORD_MAX_LEN: i16 = (RECORD_HEADER_LEN + VALUE_LEN * MAX_AXIS) as i16;

/// Largest `length` an `IODBZOR` buffer can take.
pub const RANGE_RECORD_MAX_LEN: i16 =
    (RANGE_HEADER_LEN + VALUE_LEN * MAX_RANGE_SYSTEMS * MAX_AXIS) as i16;

/// Axes of the per-axis fallback used when a bulk work-zero read is rejected.
pub const FALLBACK_AXES: [i16; 3] = [1, 2, 3];

/// `ODBACT`: actual feedrate / spindle speed.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbAct {
    pub dummy: [i16; 2],
    pub data: i32,
}

/// `ODBAXIS`: per-axis position data.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbAxis {
    pub dummy: i16,
    pub kind: i16,
    pub data: [i32; MAX_AXIS],
}

/// `ODBTOFS`: one tool offset value.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbTofs {
    pub datano: i16,
    pub kind: i16,
    pub data: i32,
}

/// `ODBTLIFE4`: tool-life record, used for the radius read.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbTlife4 {
    pub datano: i16,
    pub kind: i16,
    pub data: i32,
}

/// `IODBZOFS`: work-zero offsets of one coordinate system.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct IodbZofs {
    pub datano: i16,
    pub kind: i16,
    pub data: [i32; MAX_AXIS],
}

/// `IODBZOR`: work-zero offsets of a run of coordinate systems.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IodbZor {
    pub datano_s: i16,
    pub kind: i16,
    pub datano_e: i16,
    pub data: [i32; MAX_RANGE_SYSTEMS * MAX_AXIS],
}

impl IodbZor {
    pub fn zeroed() -> Self {
        Self {
            datano_s: 0,
            kind: 0,
            datano_e: 0,
            data: [0; MAX_RANGE_SYSTEMS * MAX_AXIS],
        }
    }
}

/// Clamp a configured axis count to what the records can hold.
pub fn clamp_axis_count(axis_count: usize) -> usize {
    axis_count.clamp(1, MAX_AXIS)
}

/// Number of values a record carries for the given axis selection.
pub fn axes_in_record(axis: i16, axis_count: usize) -> usize {
    if axis == ALL_AXES {
        clamp_axis_count(axis_count)
    } else {
        1
    }
}

/// Length for `cnc_absolute` over every axis.
pub fn axis_record_len(axis_count: usize) -> i16 {
    (RECORD_HEADER_LEN + VALUE_LEN * clamp_axis_count(axis_count)) as i16
}

/// Length for `cnc_rdzofs`.
pub fn work_zero_len(axis: i16, axis_count: usize) -> i16 {
    (RECORD_HEADER_LEN + VALUE_LEN * axes_in_record(axis, axis_count)) as i16
}

/// Length for `cnc_rdzofsr` covering `start..=end`.
pub fn work_zero_range_len(axis: i16, axis_count: usize, start: i16, end: i16) -> i16 {
    let systems = range_count(start, end);
    (RANGE_HEADER_LEN + VALUE_LEN * axes_in_record(axis, axis_count) * systems) as i16
}

/// Values actually carried by a record of `length` bytes after `header` bytes.
pub fn values_for_len(length: i16, header: usize) -> usize {
    let length = usize::try_from(length).unwrap_or(0);
    length.saturating_sub(header) / VALUE_LEN
}

/// Whether `length` asks for at least one value and no more than `max` bytes.
pub fn fits_record(length: i16, header: usize, max: i16) -> bool {
    length <= max && usize::try_from(length).is_ok_and(|length| length >= header + VALUE_LEN)
}

/// Inclusive count of numbers in `start..=end`; zero when inverted.
pub fn range_count(start: i16, end: i16) -> usize {
    if end < start {
        0
    } else {
        (i32::from(end) - i32::from(start) + 1) as usize
    }
}

/// Split the flat `IODBZOR` data area into one slice per coordinate system.
pub fn split_range_values(data: &[i32], per_system: usize, systems: usize) -> Vec<Vec<i32>> {
    if per_system == 0 {
        return vec![Vec::new(); systems];
    }
    data.chunks(per_system)
        .take(systems)
        .map(|chunk| chunk.to_vec())
        .collect()
}
