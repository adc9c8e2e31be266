//! Safe owners for libopus encoder and decoder state.
//!
//! This crate wraps the small slice of the libopus C API needed for
//! stateful, one-frame-per-call voice encoding and decoding:
//!
//! - [`Encoder`]: owns an `OpusEncoder*`, configured through typed setters
//! - [`Decoder`]: owns an `OpusDecoder*`
//! - [`ErrorCode`] / [`CodecError`]: typed versions of libopus status codes
//!
//! Both owners destroy their native state exactly once, on drop.
//!
//! # Example
//!
//! ```ignore
//! use opusbridge_codec::{Application, Decoder, Encoder};
//!
//! let mut encoder = Encoder::new(16000, 1, Application::VoIP)?;
//! encoder.set_bitrate(16000)?;
//!
//! let pcm = vec![0i16; 320]; // 20ms at 16kHz
//! let mut packet = vec![0u8; 1024];
//! let n = encoder.encode_to(&pcm, 320, &mut packet)?;
//!
//! let mut decoder = Decoder::new(16000, 1)?;
//! let mut out = vec![0i16; 1024];
//! let samples = decoder.decode_to(&packet[..n], &mut out, 320, false)?;
//! ```

mod decoder;
mod encoder;
mod error;
mod ffi;

pub use decoder::Decoder;
pub use encoder::{Application, Encoder, Signal};
pub use error::{CodecError, ErrorCode};

use std::ffi::CStr;
use std::os::raw::c_char;

/// Returns the libopus version string, e.g. `"libopus 1.4"`.
pub fn version() -> String {
    unsafe { CStr::from_ptr(ffi::opus_get_version_string()) }
        .to_string_lossy()
        .into_owned()
}

/// Returns the libopus version string as a static NUL-terminated pointer.
pub fn version_ptr() -> *const c_char {
    unsafe { ffi::opus_get_version_string() }
}
