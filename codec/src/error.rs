//! Typed libopus status codes and codec errors.

use std::fmt;

use thiserror::Error;

use crate::ffi;

/// A negative status returned by libopus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// One or more invalid/out of range arguments.
    BadArg,
    /// Not enough bytes allocated in the buffer.
    BufferTooSmall,
    /// An internal error was detected.
    InternalError,
    /// The compressed data passed is corrupted.
    InvalidPacket,
    /// Invalid/unsupported request number.
    Unimplemented,
    /// An encoder or decoder structure is invalid or already freed.
    InvalidState,
    /// Memory allocation has failed.
    AllocFail,
    /// A code outside the documented set.
    Unknown(i32),
}

impl ErrorCode {
    /// Maps a raw libopus return value to a typed code.
    pub fn from_raw(code: i32) -> Self {
        match code {
            ffi::OPUS_BAD_ARG => Self::BadArg,
            ffi::OPUS_BUFFER_TOO_SMALL => Self::BufferTooSmall,
            ffi::OPUS_INTERNAL_ERROR => Self::InternalError,
            ffi::OPUS_INVALID_PACKET => Self::InvalidPacket,
            ffi::OPUS_UNIMPLEMENTED => Self::Unimplemented,
            ffi::OPUS_INVALID_STATE => Self::InvalidState,
            ffi::OPUS_ALLOC_FAIL => Self::AllocFail,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw libopus value.
    pub fn raw(&self) -> i32 {
        match self {
            Self::BadArg => ffi::OPUS_BAD_ARG,
            Self::BufferTooSmall => ffi::OPUS_BUFFER_TOO_SMALL,
            Self::InternalError => ffi::OPUS_INTERNAL_ERROR,
            Self::InvalidPacket => ffi::OPUS_INVALID_PACKET,
            Self::Unimplemented => ffi::OPUS_UNIMPLEMENTED,
            Self::InvalidState => ffi::OPUS_INVALID_STATE,
            Self::AllocFail => ffi::OPUS_ALLOC_FAIL,
            Self::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", ffi::error_string(self.raw()), self.raw())
    }
}

/// Opus codec error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("opus: encoder create failed: {0}")]
    CreateEncoderFailed(ErrorCode),

    #[error("opus: decoder create failed: {0}")]
    CreateDecoderFailed(ErrorCode),

    #[error("opus: encode failed: {0}")]
    EncodeFailed(ErrorCode),

    #[error("opus: decode failed: {0}")]
    DecodeFailed(ErrorCode),

    #[error("opus: ctl {request} failed: {code}")]
    CtlFailed { request: &'static str, code: ErrorCode },
}

impl CodecError {
    /// Returns the underlying libopus status.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CreateEncoderFailed(code)
            | Self::CreateDecoderFailed(code)
            | Self::EncodeFailed(code)
            | Self::DecodeFailed(code)
            | Self::CtlFailed { code, .. } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_raw() {
        assert_eq!(ErrorCode::from_raw(-1), ErrorCode::BadArg);
        assert_eq!(ErrorCode::from_raw(-2), ErrorCode::BufferTooSmall);
        assert_eq!(ErrorCode::from_raw(-4), ErrorCode::InvalidPacket);
        assert_eq!(ErrorCode::from_raw(-7), ErrorCode::AllocFail);
        assert_eq!(ErrorCode::from_raw(-42), ErrorCode::Unknown(-42));
    }

    #[test]
    fn test_error_code_raw_roundtrip() {
        for raw in -7..=-1 {
            assert_eq!(ErrorCode::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::CreateEncoderFailed(ErrorCode::BadArg);
        let msg = format!("{}", err);
        assert!(msg.contains("encoder create failed"));
        assert!(msg.contains("(-1)"));

        let err = CodecError::DecodeFailed(ErrorCode::InvalidPacket);
        assert!(format!("{}", err).contains("decode failed"));

        let err = CodecError::CtlFailed {
            request: "complexity",
            code: ErrorCode::BadArg,
        };
        assert!(format!("{}", err).contains("ctl complexity failed"));
        assert_eq!(err.code(), ErrorCode::BadArg);
    }
}
