//! Opus decoder.

use std::ptr;

use crate::error::{CodecError, ErrorCode};
use crate::ffi::{self, OpusDecoder as OpusDecoderHandle};

/// Opus decoder.
pub struct Decoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut OpusDecoderHandle,
}

// Safety: The decoder handle is owned exclusively and never aliased.
unsafe impl Send for Decoder {}

impl Drop for Decoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_decoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Decoder {
    /// Creates a new Opus decoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate to decode at (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    pub fn new(sample_rate: i32, channels: i32) -> Result<Self, CodecError> {
        let mut error: i32 = 0;
        let handle = unsafe { ffi::opus_decoder_create(sample_rate, channels, &mut error) };

        if handle.is_null() || error != ffi::OPUS_OK {
            if !handle.is_null() {
                unsafe { ffi::opus_decoder_destroy(handle) };
            }
            let code = if error == ffi::OPUS_OK { ffi::OPUS_ALLOC_FAIL } else { error };
            return Err(CodecError::CreateDecoderFailed(ErrorCode::from_raw(code)));
        }

        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Decodes a packet into `buf`. Returns the number of samples per channel.
    ///
    /// At most `frame_size` samples per channel are requested, further capped
    /// by the capacity of `buf`. An empty packet runs packet loss concealment.
    pub fn decode_to(
        &mut self,
        packet: &[u8],
        buf: &mut [i16],
        frame_size: i32,
        fec: bool,
    ) -> Result<usize, CodecError> {
        let capacity = i32::try_from(buf.len() / self.channels as usize).unwrap_or(i32::MAX);
        let frame_size = frame_size.min(capacity);
        if frame_size <= 0 {
            return Err(CodecError::DecodeFailed(ErrorCode::BufferTooSmall));
        }
        let data_len = i32::try_from(packet.len())
            .map_err(|_| CodecError::DecodeFailed(ErrorCode::InvalidPacket))?;

        let data_ptr = if packet.is_empty() {
            ptr::null()
        } else {
            packet.as_ptr()
        };

        let n = unsafe {
            ffi::opus_decode(
                self.handle,
                data_ptr,
                data_len,
                buf.as_mut_ptr(),
                frame_size,
                fec as i32,
            )
        };

        if n < 0 {
            return Err(CodecError::DecodeFailed(ErrorCode::from_raw(n)));
        }

        Ok(n as usize)
    }
}
