//! FOCAS result codes and their human-readable descriptions.

use std::fmt;

/// Signed 16-bit result code returned by every FOCAS library call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(pub i16);

impl ReturnCode {
    pub const PROTOCOL: ReturnCode = ReturnCode(-17);
    pub const SOCKET: ReturnCode = ReturnCode(-16);
    pub const NODLL: ReturnCode = ReturnCode(-15);
    pub const BUS: ReturnCode = ReturnCode(-11);
    pub const SYSTEM2: ReturnCode = ReturnCode(-10);
    pub const HSSB: ReturnCode = ReturnCode(-9);
    pub const HANDLE: ReturnCode = ReturnCode(-8);
    pub const VERSION: ReturnCode = ReturnCode(-7);
    pub const UNEXP: ReturnCode = ReturnCode(-6);
    pub const SYSTEM: ReturnCode = ReturnCode(-5);
    pub const PARITY: ReturnCode = ReturnCode(-4);
    pub const MMCSYS: ReturnCode = ReturnCode(-3);
    pub const RESET: ReturnCode = ReturnCode(-2);
    pub const BUSY: ReturnCode = ReturnCode(-1);
    pub const OK: ReturnCode = ReturnCode(0);
    pub const FUNC: ReturnCode = ReturnCode(1);
    pub const LENGTH: ReturnCode = ReturnCode(2);
    pub const NUMBER: ReturnCode = ReturnCode(3);
    pub const ATTRIB: ReturnCode = ReturnCode(4);
    pub const DATA: ReturnCode = ReturnCode(5);
    pub const NOOPT: ReturnCode = ReturnCode(6);
    pub const PROT: ReturnCode = ReturnCode(7);
    pub const OVRFLOW: ReturnCode = ReturnCode(8);
    pub const PARAM: ReturnCode = ReturnCode(9);
    pub const BUFFER: ReturnCode = ReturnCode(10);
    pub const PATH: ReturnCode = ReturnCode(11);
    pub const MODE: ReturnCode = ReturnCode(12);
    pub const REJECT: ReturnCode = ReturnCode(13);
    pub const DTSRVR: ReturnCode = ReturnCode(14);
    pub const ALARM: ReturnCode = ReturnCode(15);
    pub const STOP: ReturnCode = ReturnCode(16);
    pub const PASSWD: ReturnCode = ReturnCode(17);

    pub fn code(self) -> i16 {
        self.0
    }

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    /// The library no longer recognizes the handle; a reconnect is required.
    pub fn is_handle_error(self) -> bool {
        self == Self::HANDLE
    }

    /// The requested record length does not match what the controller holds.
    pub fn is_length_error(self) -> bool {
        self == Self::LENGTH
    }

    pub fn description(self) -> String {
        describe(self.0)
    }
}

impl From<i16> for ReturnCode {
    fn from(code: i16) -> Self {
        ReturnCode(code)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self.0))
    }
}

/// Map a raw FOCAS result code to its description.
pub fn describe(code: i16) -> String {
    let text = match code {
        -17 => "Protocol error",
        -16 => "Windows socket error",
        -15 => "DLL not exist error",
        -11 => "Bus error",
        -10 => "System error",
        -9 => "HSSB communication error",
        -8 => "Windows library handle error",
        -7 => "CNC/PMC version mismatch",
        -6 => "Abnormal error",
        -5 => "System error",
        -4 => "Shared RAM parity error",
        -3 => "emm386 or mmcsys install error",
        -2 => "Reset or stop occurred error",
        -1 => "Busy error",
        0 => "No error",
        1 => "Function not executed or not available",
        2 => "Data block length error",
        3 => "Data number error",
        4 => "Data attribute error",
        5 => "Data error",
        6 => "No option",
        7 => "Write protection",
        8 => "Memory overflow",
        9 => "CNC parameter error",
        10 => "Buffer empty/full",
        11 => "Path number error",
        12 => "CNC mode error",
        13 => "CNC execution rejection",
        14 => "Data server error",
        15 => "Alarm",
        16 => "Stop",
        17 => "State of data protection",
        other => return format!("Unknown error: {}", other),
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_codes() {
        assert_eq!(describe(-17), "Protocol error");
        assert_eq!(describe(-16), "Windows socket error");
        assert_eq!(describe(-15), "DLL not exist error");
        assert_eq!(describe(-11), "Bus error");
        assert_eq!(describe(-8), "Windows library handle error");
        assert_eq!(describe(-7), "CNC/PMC version mismatch");
        assert_eq!(describe(-2), "Reset or stop occurred error");
        assert_eq!(describe(-1), "Busy error");
        assert_eq!(describe(0), "No error");
        assert_eq!(describe(2), "Data block length error");
        assert_eq!(describe(3), "Data number error");
        assert_eq!(describe(4), "Data attribute error");
        assert_eq!(describe(5), "Data error");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(describe(-12), "Unknown error: -12");
        assert_eq!(describe(18), "Unknown error: 18");
        assert_eq!(describe(i16::MIN), format!("Unknown error: {}", i16::MIN));
    }

    #[test]
    fn test_every_known_code_has_its_own_text() {
        for code in -17..=17i16 {
            let text = describe(code);
            let unknown = matches!(code, -14 | -13 | -12);
            assert_eq!(text.starts_with("Unknown error"), unknown, "code {}", code);
        }
    }

    #[test]
    fn test_describe_is_stable() {
        assert_eq!(describe(-8), describe(-8));
        assert_eq!(ReturnCode::HANDLE.to_string(), describe(-8));
    }

    #[test]
    fn test_error_classes() {
        assert!(ReturnCode::HANDLE.is_handle_error());
        assert!(!ReturnCode::SOCKET.is_handle_error());
        assert!(ReturnCode::LENGTH.is_length_error());
        assert!(!ReturnCode::NUMBER.is_length_error());
        assert!(ReturnCode::from(0).is_ok());
    }
}
