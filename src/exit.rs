//! Stable exit codes for `rootcert-dump`

use rootcert_format::DecodeError;

/// Process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every declared entry decoded
    Success = 0,
    /// Store structure is corrupt (truncated or unknown key type)
    Corrupt = 1,
    /// Config, image or usage problem; nothing was decoded
    Usage = 2,
    /// Magic matches no known schema (including erased flash)
    Unrecognized = 3,
}

impl ExitCode {
    /// Get the integer value of the exit code
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Exit code for a decode failure
    pub fn from_decode_error(err: &DecodeError) -> Self {
        match err {
            DecodeError::Unrecognized { .. } => ExitCode::Unrecognized,
            DecodeError::TooShort { .. }
            | DecodeError::Truncated { .. }
            | DecodeError::UnknownKeyType { .. } => ExitCode::Corrupt,
        }
    }

    /// Check if this exit code indicates success
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}
