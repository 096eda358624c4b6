//! Status Word (SW) constants for APDU responses
//!
//! ISO 7816-4 status words the filesystem walker dispatches on.

/// Status Word constants and helpers.
pub struct SW;

impl SW {
    pub const SUCCESS: u16 = 0x9000;

    pub const MEMORY_FAILURE: u16 = 0x6581;
    pub const WRONG_LENGTH: u16 = 0x6700;
    pub const SECURITY_STATUS_NOT_SATISFIED: u16 = 0x6982;
    pub const CONDITIONS_NOT_SATISFIED: u16 = 0x6985;
    pub const FILE_NOT_FOUND: u16 = 0x6A82;
    pub const RECORD_NOT_FOUND: u16 = 0x6A83;
    pub const INCORRECT_P1_P2: u16 = 0x6A86;
    pub const FILE_ALREADY_EXISTS: u16 = 0x6A89;
    pub const INS_NOT_SUPPORTED: u16 = 0x6D00;
    pub const CLA_NOT_SUPPORTED: u16 = 0x6E00;

    /// Check whether a status word means the command completed.
    #[inline]
    pub fn is_success(sw: u16) -> bool {
        sw == Self::SUCCESS
    }

    /// Check for a "response bytes available" status (61xx).
    #[inline]
    pub fn is_more_data(sw: u16) -> bool {
        (sw & 0xFF00) == 0x6100
    }

    /// Check for a "wrong Le, retry with SW2" status (6Cxx).
    #[inline]
    pub fn is_wrong_le(sw: u16) -> bool {
        (sw & 0xFF00) == 0x6C00
    }

    /// Short description for logging.
    pub fn describe(sw: u16) -> &'static str {
        match sw {
            Self::SUCCESS => "ok",
            Self::MEMORY_FAILURE => "memory failure",
            Self::WRONG_LENGTH => "wrong length",
            Self::SECURITY_STATUS_NOT_SATISFIED => "security status not satisfied",
            Self::CONDITIONS_NOT_SATISFIED => "conditions of use not satisfied",
            Self::FILE_NOT_FOUND => "file not found",
            Self::RECORD_NOT_FOUND => "record not found",
            Self::INCORRECT_P1_P2 => "incorrect P1/P2",
            Self::FILE_ALREADY_EXISTS => "file already exists",
            Self::INS_NOT_SUPPORTED => "instruction not supported",
            Self::CLA_NOT_SUPPORTED => "class not supported",
            sw if Self::is_more_data(sw) => "response bytes available",
            sw if Self::is_wrong_le(sw) => "wrong Le",
            _ => "unrecognized status",
        }
    }
}
