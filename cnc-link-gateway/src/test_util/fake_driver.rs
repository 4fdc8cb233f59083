use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::focas::layout::{self, ALL_AXES};
use crate::focas::{
    AxisRecord, DriverError, DriverResult, FocasDriver, Handle, OffsetType, RadiusRecord,
    WorkZeroRecord,
};

/// One driver call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ConnectLocal,
    ConnectNetwork {
        host: String,
        port: u16,
        timeout_secs: i32,
    },
    Disconnect(Handle),
    Feedrate(Handle),
    SpindleSpeed(Handle),
    Absolute {
        handle: Handle,
        axis: i16,
        length: i16,
    },
    ToolRadius {
        handle: Handle,
        group: i16,
        number: i16,
    },
    ToolOffset {
        handle: Handle,
        number: i16,
        kind: OffsetType,
        length: i16,
    },
    WorkZero {
        handle: Handle,
        number: i16,
        axis: i16,
        length: i16,
    },
    WorkZeroRange {
        handle: Handle,
        start: i16,
        axis: i16,
        end: i16,
        length: i16,
    },
    WriteMacro {
        handle: Handle,
        number: i16,
        length: i16,
        value: i32,
        decimals: i16,
    },
}

impl Call {
    pub fn is_connect(&self) -> bool {
        matches!(self, Call::ConnectLocal | Call::ConnectNetwork { .. })
    }
}

type Matcher = Box<dyn Fn(&Call) -> bool + Send + Sync>;

struct Rule {
    matcher: Matcher,
    error: DriverError,
    remaining: Option<usize>,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    rules: Vec<Rule>,
    issued_handles: u16,
}

/// Recording stand-in for the vendor library.
///
/// Successful reads return values derived from their arguments:
/// - feedrate 1500, spindle speed 8000
/// - absolute position `1000 * axis`
/// - tool radius `500 + tool number`
/// - tool offset `100 * tool number + offset type`
/// - work zero offset `1000 * coordinate system + axis`
///
/// Handles are issued as 1, 2, 3... on each successful connect.
#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<FakeState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call matching `matcher` with `error`.
    pub fn fail_once(
        &self,
        matcher: impl Fn(&Call) -> bool + Send + Sync + 'static,
        error: DriverError,
    ) -> &Self {
        self.push_rule(Box::new(matcher), error, Some(1))
    }

    /// Fail every call matching `matcher` with `error`.
    pub fn fail_always(
        &self,
        matcher: impl Fn(&Call) -> bool + Send + Sync + 'static,
        error: DriverError,
    ) -> &Self {
        self.push_rule(Box::new(matcher), error, None)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn connect_count(&self) -> usize {
        self.count(Call::is_connect)
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_rule(&self, matcher: Matcher, error: DriverError, remaining: Option<usize>) -> &Self {
        self.state().rules.push(Rule {
            matcher,
            error,
            remaining,
        });
        self
    }

    fn record(&self, call: Call) -> DriverResult<()> {
        let mut state = self.state();
        let failure = state
            .rules
            .iter_mut()
            .find(|rule| rule.remaining != Some(0) && (rule.matcher)(&call))
            .map(|rule| {
                if let Some(remaining) = rule.remaining.as_mut() {
                    *remaining -= 1;
                }
                rule.error.clone()
            });
        state.calls.push(call);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn issue_handle(&self) -> Handle {
        let mut state = self.state();
        state.issued_handles += 1;
        Handle(state.issued_handles)
    }
}

fn work_zero_values(number: i16, axis: i16, per_system: usize) -> Vec<i32> {
    if axis == ALL_AXES {
        (1..=per_system as i32)
            .map(|a| i32::from(number) * 1000 + a)
            .collect()
    } else {
        vec![i32::from(number) * 1000 + i32::from(axis)]
    }
}

impl FocasDriver for FakeDriver {
    fn connect_local(&self) -> DriverResult<Handle> {
        self.record(Call::ConnectLocal)?;
        Ok(self.issue_handle())
    }

    fn connect_network(&self, host: &str, port: u16, timeout_secs: i32) -> DriverResult<Handle> {
        self.record(Call::ConnectNetwork {
            host: host.to_string(),
            port,
            timeout_secs,
        })?;
        Ok(self.issue_handle())
    }

    fn disconnect(&self, handle: Handle) -> DriverResult<()> {
        self.record(Call::Disconnect(handle))
    }

    fn read_feedrate(&self, handle: Handle) -> DriverResult<i32> {
        self.record(Call::Feedrate(handle))?;
        Ok(1500)
    }

    fn read_spindle_speed(&self, handle: Handle) -> DriverResult<i32> {
        self.record(Call::SpindleSpeed(handle))?;
        Ok(8000)
    }

    fn read_absolute(&self, handle: Handle, axis: i16, length: i16) -> DriverResult<AxisRecord> {
        self.record(Call::Absolute {
            handle,
            axis,
            length,
        })?;
        let count = layout::values_for_len(length, layout::RECORD_HEADER_LEN) as i32;
        Ok(AxisRecord {
            axis_type: axis,
            values: (1..=count).map(|a| a * 1000).collect(),
        })
    }

    fn read_tool_radius(
        &self,
        handle: Handle,
        group: i16,
        number: i16,
    ) -> DriverResult<RadiusRecord> {
        self.record(Call::ToolRadius {
            handle,
            group,
            number,
        })?;
        Ok(RadiusRecord {
            group,
            number,
            radius: 500 + i32::from(number),
        })
    }

    fn read_tool_offset(
        &self,
        handle: Handle,
        number: i16,
        kind: OffsetType,
        length: i16,
    ) -> DriverResult<i32> {
        self.record(Call::ToolOffset {
            handle,
            number,
            kind,
            length,
        })?;
        Ok(i32::from(number) * 100 + i32::from(kind.code()))
    }

    fn read_work_zero(
        &self,
        handle: Handle,
        number: i16,
        axis: i16,
        length: i16,
    ) -> DriverResult<WorkZeroRecord> {
        self.record(Call::WorkZero {
            handle,
            number,
            axis,
            length,
        })?;
        let per_system = layout::values_for_len(length, layout::RECORD_HEADER_LEN);
        Ok(WorkZeroRecord {
            number,
            axis,
            values: work_zero_values(number, axis, per_system),
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
        self.record(Call::WorkZeroRange {
            handle,
            start,
            axis,
            end,
            length,
        })?;
        let systems = layout::range_count(start, end).max(1);
        let per_system = layout::values_for_len(length, layout::RANGE_HEADER_LEN) / systems;
        Ok((start..=end)
            .map(|number| WorkZeroRecord {
                number,
                axis,
                values: work_zero_values(number, axis, per_system),
            })
            .collect())
    }

    fn write_macro(
        &self,
        handle: Handle,
        number: i16,
        length: i16,
        value: i32,
        decimals: i16,
    ) -> DriverResult<()> {
        self.record(Call::WriteMacro {
            handle,
            number,
            length,
            value,
            decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focas::ReturnCode;

    #[test]
    fn test_fail_once_applies_to_first_match_only() {
        let driver = FakeDriver::new();
        driver.fail_once(
            |c| matches!(c, Call::Feedrate(_)),
            DriverError::Code(ReturnCode::BUSY),
        );

        assert!(driver.read_feedrate(Handle(1)).is_err());
        assert_eq!(driver.read_feedrate(Handle(1)), Ok(1500));
        assert_eq!(driver.call_count(), 2);
    }

    #[test]
    fn test_failed_connect_issues_no_handle() {
        let driver = FakeDriver::new();
        driver.fail_once(Call::is_connect, DriverError::Code(ReturnCode::SOCKET));

        assert!(driver.connect_local().is_err());
        assert_eq!(driver.connect_local(), Ok(Handle(1)));
        assert_eq!(driver.connect_count(), 2);
    }
}
