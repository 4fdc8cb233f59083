//! Telemetry reads, offset reads and macro writes.

use cnc_link_common::{
    AxisOffset, AxisPositionData, FeedrateData, SpindleSpeedData, ToolOffsetData, ToolRadiusData,
    WorkZeroOffsetData,
};

use crate::error::{LinkError, Result};
use crate::focas::layout::{self, ALL_AXES, FALLBACK_AXES, MACRO_LEN, TOOL_OFFSET_LEN};
use crate::focas::{OffsetType, WorkZeroRecord};

use super::CncLink;

fn to_offset_data(record: WorkZeroRecord) -> WorkZeroOffsetData {
    let WorkZeroRecord {
        number,
        axis,
        values,
    } = record;
    let axes = if axis == ALL_AXES {
        values
            .into_iter()
            .zip(1i16..)
            .map(|(value, axis)| AxisOffset { axis, value })
            .collect()
    } else {
        values
            .into_iter()
            .take(1)
            .map(|value| AxisOffset { axis, value })
            .collect()
    };
    WorkZeroOffsetData::new(number, axes)
}

fn invalid_length(length: i16, max: i16) -> LinkError {
    LinkError::InvalidRequest(format!(
        "record length {} is outside the record buffer (at most {} bytes)",
        length, max
    ))
}

impl CncLink {
    pub fn feedrate(&mut self) -> Result<FeedrateData> {
        let feedrate = self.with_handle_retry("feedrate", |driver, handle| {
            driver.read_feedrate(handle)
        })?;
        Ok(FeedrateData { feedrate })
    }

    pub fn spindle_speed(&mut self) -> Result<SpindleSpeedData> {
        let speed = self.with_handle_retry("spindle speed", |driver, handle| {
            driver.read_spindle_speed(handle)
        })?;
        Ok(SpindleSpeedData { speed })
    }

    pub fn absolute_position(&mut self) -> Result<AxisPositionData> {
        let length = layout::axis_record_len(self.settings.axis_count);
        let record = self.with_handle_retry("absolute position", |driver, handle| {
            driver.read_absolute(handle, ALL_AXES, length)
        })?;
        Ok(AxisPositionData {
            positions: record.values,
            axis_type: record.axis_type,
        })
    }

    pub fn tool_radius(&mut self, group: i16, number: i16) -> Result<ToolRadiusData> {
        let record = self.with_handle_retry("tool radius", |driver, handle| {
            driver.read_tool_radius(handle, group, number)
        })?;
        Ok(ToolRadiusData {
            radius: record.radius,
            tool_group: record.group,
            tool_number: record.number,
        })
    }

    /// Read all four offsets of one tool.
    ///
    /// A result code on an individual read leaves that field empty; the
    /// record is still returned. Faults and failed reconnects abort the read.
    pub fn tool_offsets(&mut self, tool_number: i16) -> Result<ToolOffsetData> {
        self.require_handle()?;
        let mut data = ToolOffsetData::empty(tool_number);

        for kind in OffsetType::ALL {
            let read = self.with_handle_retry("tool offset", |driver, handle| {
                driver.read_tool_offset(handle, tool_number, kind, TOOL_OFFSET_LEN)
            });
            let value = match read {
                Ok(value) => Some(value),
                Err(LinkError::Driver { code }) => {
                    tracing::warn!(
                        "Failed to read {} for tool {}: {}",
                        kind,
                        tool_number,
                        code
                    );
                    None
                }
                Err(e) => return Err(e),
            };
            match kind {
                OffsetType::CutterRadiusWear => data.cutter_radius_wear = value,
                OffsetType::CutterRadiusGeometry => data.cutter_radius_geometry = value,
                OffsetType::ToolLengthWear => data.tool_length_wear = value,
                OffsetType::ToolLengthGeometry => data.tool_length_geometry = value,
            }
        }

        Ok(data)
    }

    /// Offsets of every tool in `start..=end`. A tool that cannot be read
    /// yields an empty record instead of failing the range.
    pub fn tool_offsets_range(&mut self, start: i16, end: i16) -> Result<Vec<ToolOffsetData>> {
        self.require_handle()?;
        let mut tools = Vec::with_capacity(layout::range_count(start, end));
        if start > end {
            return Ok(tools);
        }

        for tool_number in start..=end {
            match self.tool_offsets(tool_number) {
                Ok(data) => tools.push(data),
                Err(e) => {
                    tracing::warn!("Error reading offsets for tool {}: {}", tool_number, e);
                    tools.push(ToolOffsetData::empty(tool_number));
                }
            }
        }

        Ok(tools)
    }

    /// Work-zero offsets of every coordinate system in `start..=end`.
    ///
    /// Each system is read in bulk. When the controller rejects the bulk
    /// record length, axes 1-3 are read one by one instead. Systems that
    /// cannot be read are returned without axis data.
    pub fn work_zero_offsets_range(
        &mut self,
        start: i16,
        end: i16,
    ) -> Result<Vec<WorkZeroOffsetData>> {
        self.require_handle()?;
        let mut systems = Vec::with_capacity(layout::range_count(start, end));
        if start > end {
            return Ok(systems);
        }

        let bulk_len = layout::work_zero_len(ALL_AXES, self.settings.axis_count);
        for number in start..=end {
            let bulk = self.with_handle_retry("work zero offsets", |driver, handle| {
                driver.read_work_zero(handle, number, ALL_AXES, bulk_len)
            });
            let data = match bulk {
                Ok(record) => to_offset_data(record),
                Err(LinkError::Driver { code }) if code.is_length_error() => {
                    tracing::debug!(
                        "Bulk work zero read rejected for {}, reading axes individually",
                        number
                    );
                    WorkZeroOffsetData::new(number, self.work_zero_axes(number))
                }
                Err(e) => {
                    tracing::warn!("Error reading work zero offsets for {}: {}", number, e);
                    WorkZeroOffsetData::new(number, Vec::new())
                }
            };
            systems.push(data);
        }

        Ok(systems)
    }

    fn work_zero_axes(&mut self, number: i16) -> Vec<AxisOffset> {
        let mut axes = Vec::with_capacity(FALLBACK_AXES.len());
        for axis in FALLBACK_AXES {
            let length = layout::work_zero_len(axis, self.settings.axis_count);
            let read = self.with_handle_retry("work zero offset", |driver, handle| {
                driver.read_work_zero(handle, number, axis, length)
            });
            match read {
                Ok(record) => {
                    if let Some(value) = record.values.first() {
                        axes.push(AxisOffset {
                            axis,
                            value: *value,
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Error reading work zero offset {} axis {}: {}",
                        number,
                        axis,
                        e
                    );
                }
            }
        }
        axes
    }

    /// Single work-zero read. Without `length`, the length matching the axis
    /// selection is used.
    pub fn work_zero_offset(
        &mut self,
        number: i16,
        axis: i16,
        length: Option<i16>,
    ) -> Result<WorkZeroOffsetData> {
        let length =
            length.unwrap_or_else(|| layout::work_zero_len(axis, self.settings.axis_count));
        if !layout::fits_record(length, layout::RECORD_HEADER_LEN, layout::AXIS_RECORD_MAX_LEN) {
            return Err(invalid_length(length, layout::AXIS_RECORD_MAX_LEN));
        }
        let record = self.with_handle_retry("work zero offset", |driver, handle| {
            driver.read_work_zero(handle, number, axis, length)
        })?;
        Ok(to_offset_data(record))
    }

    /// Ranged work-zero read of one axis (or all axes) over `start..=end`.
    pub fn work_zero_offsets_range_single(
        &mut self,
        axis: i16,
        start: i16,
        end: i16,
        length: Option<i16>,
    ) -> Result<Vec<WorkZeroOffsetData>> {
        self.require_handle()?;
        let systems = layout::range_count(start, end);
        if systems == 0 || systems > layout::MAX_RANGE_SYSTEMS {
            return Err(LinkError::InvalidRequest(format!(
                "coordinate system range {}..{} must cover 1 to {} systems",
                start,
                end,
                layout::MAX_RANGE_SYSTEMS
            )));
        }

        let length = length.unwrap_or_else(|| {
            layout::work_zero_range_len(axis, self.settings.axis_count, start, end)
        });
        if !layout::fits_record(length, layout::RANGE_HEADER_LEN, layout::RANGE_RECORD_MAX_LEN) {
            return Err(invalid_length(length, layout::RANGE_RECORD_MAX_LEN));
        }
        let records = self.with_handle_retry("work zero offset range", |driver, handle| {
            driver.read_work_zero_range(handle, start, axis, end, length)
        })?;
        Ok(records.into_iter().map(to_offset_data).collect())
    }

    pub fn write_macro(&mut self, number: i16, value: i32, decimals: i16) -> Result<String> {
        self.with_handle_retry("macro write", |driver, handle| {
            driver.write_macro(handle, number, MACRO_LEN, value, decimals)
        })?;
        tracing::info!("Macro #{} set to {} (decimals: {})", number, value, decimals);
        if decimals == 0 {
            Ok(format!("Macro #{} set to {}", number, value))
        } else {
            Ok(format!(
                "Macro #{} set to {} (decimals: {})",
                number, value, decimals
            ))
        }
    }
}
