//! C ABI exports.
//!
//! ```c
//! int64_t enc = opusbridge_init_encoder(16000, 1, 2048, 16000, 5, false, true);
//! if (enc == 0) { /* creation failed */ }
//!
//! OpusBridgeBuffer packet = {0};
//! if (opusbridge_encode(enc, pcm, pcm_len, 320, &packet) == 0) {
//!     send(packet.data, packet.len);
//!     opusbridge_buffer_free(&packet);
//! }
//!
//! opusbridge_release_encoder(enc);
//! ```
//!
//! Buffers filled by [`opusbridge_encode`] / [`opusbridge_decode`] belong to
//! the caller and must be returned with [`opusbridge_buffer_free`].

use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::api;
use crate::error::BridgeError;

/// Result codes returned by the transcoding exports.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    NotInitialized = -1,
    UnknownHandle = -2,
    Released = -3,
    WrongRole = -4,
    InvalidArgument = -5,
    CodecFailed = -6,
    NullPointer = -7,
}

impl From<&BridgeError> for Status {
    fn from(err: &BridgeError) -> Self {
        match err {
            BridgeError::NotInitialized => Status::NotInitialized,
            BridgeError::UnknownHandle(_) => Status::UnknownHandle,
            BridgeError::Released(_) => Status::Released,
            BridgeError::WrongRole { .. } => Status::WrongRole,
            BridgeError::UnknownApplication(_)
            | BridgeError::InvalidBitrate(_)
            | BridgeError::InvalidFrameSize(_)
            | BridgeError::OddPcmLength(_)
            | BridgeError::ShortPcm { .. }
            | BridgeError::InvalidConfig(_) => Status::InvalidArgument,
            BridgeError::Codec(_) => Status::CodecFailed,
        }
    }
}

/// Heap buffer handed to the caller.
#[repr(C)]
#[derive(Debug)]
pub struct OpusBridgeBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl OpusBridgeBuffer {
    fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    fn from_vec(bytes: Vec<u8>) -> Self {
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        let data = Box::into_raw(boxed) as *mut u8;
        Self { data, len }
    }
}

/// Creates an encoder. Returns `0` on failure.
#[unsafe(no_mangle)]
pub extern "C" fn opusbridge_init_encoder(
    sample_rate: i32,
    channels: i32,
    application: i32,
    bitrate: i32,
    complexity: i32,
    vbr: bool,
    dtx: bool,
) -> i64 {
    api::init_encoder(sample_rate, channels, application, bitrate, complexity, vbr, dtx)
}

/// Creates a decoder. Returns `0` on failure.
#[unsafe(no_mangle)]
pub extern "C" fn opusbridge_init_decoder(sample_rate: i32, channels: i32) -> i64 {
    api::init_decoder(sample_rate, channels)
}

/// Encodes one frame of PCM into `out`.
///
/// # Safety
///
/// `pcm` must point to `pcm_len` readable bytes (it may be null only when
/// `pcm_len` is 0) and `out` must point to writable storage for one
/// [`OpusBridgeBuffer`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn opusbridge_encode(
    token: i64,
    pcm: *const u8,
    pcm_len: usize,
    frame_size: i32,
    out: *mut OpusBridgeBuffer,
) -> i32 {
    if out.is_null() {
        return Status::NullPointer as i32;
    }
    let Some(pcm) = (unsafe { input(pcm, pcm_len) }) else {
        unsafe { out.write(OpusBridgeBuffer::empty()) };
        return Status::NullPointer as i32;
    };
    unsafe { finish(api::try_encode(token, pcm, frame_size), out) }
}

/// Decodes one packet into `out`. An empty packet conceals a lost frame.
///
/// # Safety
///
/// Same contract as [`opusbridge_encode`], with `packet`/`packet_len`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn opusbridge_decode(
    token: i64,
    packet: *const u8,
    packet_len: usize,
    frame_size: i32,
    out: *mut OpusBridgeBuffer,
) -> i32 {
    if out.is_null() {
        return Status::NullPointer as i32;
    }
    let Some(packet) = (unsafe { input(packet, packet_len) }) else {
        unsafe { out.write(OpusBridgeBuffer::empty()) };
        return Status::NullPointer as i32;
    };
    unsafe { finish(api::try_decode(token, packet, frame_size), out) }
}

/// Frees a buffer filled by [`opusbridge_encode`] or [`opusbridge_decode`]
/// and resets it to empty. Null and already-empty buffers are ignored.
///
/// # Safety
///
/// `buf` must be null or point to a buffer produced by this library that
/// has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn opusbridge_buffer_free(buf: *mut OpusBridgeBuffer) {
    if buf.is_null() {
        return;
    }
    let buf = unsafe { &mut *buf };
    if !buf.data.is_null() {
        drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(buf.data, buf.len)) });
    }
    *buf = OpusBridgeBuffer::empty();
}

/// Returns the libopus version as a static NUL-terminated string.
#[unsafe(no_mangle)]
pub extern "C" fn opusbridge_version() -> *const c_char {
    opusbridge_codec::version_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn opusbridge_release_encoder(token: i64) {
    api::release_encoder(token);
}

#[unsafe(no_mangle)]
pub extern "C" fn opusbridge_release_decoder(token: i64) {
    api::release_decoder(token);
}

unsafe fn input<'a>(data: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        return None;
    }
    Some(unsafe { slice::from_raw_parts(data, len) })
}

unsafe fn finish(result: Result<Vec<u8>, BridgeError>, out: *mut OpusBridgeBuffer) -> i32 {
    match result {
        Ok(bytes) => {
            unsafe { out.write(OpusBridgeBuffer::from_vec(bytes)) };
            Status::Ok as i32
        }
        Err(err) => {
            unsafe { out.write(OpusBridgeBuffer::empty()) };
            Status::from(&err) as i32
        }
    }
}
