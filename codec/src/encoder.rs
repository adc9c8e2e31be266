//! Opus encoder.

use std::ptr;

use crate::error::{CodecError, ErrorCode};
use crate::ffi::{self, OpusEncoder as OpusEncoderHandle};

/// Opus application type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    /// Best quality for voice signals.
    VoIP,
    /// Best quality for non-voice signals.
    Audio,
    /// Minimum possible coding delay.
    RestrictedLowdelay,
}

impl Application {
    /// Maps a raw `OPUS_APPLICATION_*` value. Returns `None` for unknown modes.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            ffi::OPUS_APPLICATION_VOIP => Some(Self::VoIP),
            ffi::OPUS_APPLICATION_AUDIO => Some(Self::Audio),
            ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY => Some(Self::RestrictedLowdelay),
            _ => None,
        }
    }

    /// Returns the raw `OPUS_APPLICATION_*` value.
    pub fn raw(&self) -> i32 {
        match self {
            Self::VoIP => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::RestrictedLowdelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

/// Signal type hint for the encoder's mode decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Auto,
    Voice,
    Music,
}

impl Signal {
    fn raw(&self) -> i32 {
        match self {
            Self::Auto => ffi::OPUS_AUTO,
            Self::Voice => ffi::OPUS_SIGNAL_VOICE,
            Self::Music => ffi::OPUS_SIGNAL_MUSIC,
        }
    }
}

/// Opus encoder.
///
/// Owns one native encoder instance, destroyed on drop. The instance is
/// movable between threads but must not be used from two at once.
pub struct Encoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut OpusEncoderHandle,
}

// Safety: The encoder handle is owned exclusively and never aliased.
unsafe impl Send for Encoder {}

impl Drop for Encoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_encoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl Encoder {
    /// Creates a new Opus encoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    /// - `application`: Intended application type
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Result<Self, CodecError> {
        let mut error: i32 = 0;
        let handle = unsafe {
            ffi::opus_encoder_create(sample_rate, channels, application.raw(), &mut error)
        };

        if handle.is_null() || error != ffi::OPUS_OK {
            if !handle.is_null() {
                unsafe { ffi::opus_encoder_destroy(handle) };
            }
            let code = if error == ffi::OPUS_OK { ffi::OPUS_ALLOC_FAIL } else { error };
            return Err(CodecError::CreateEncoderFailed(ErrorCode::from_raw(code)));
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

    /// Encodes one frame into `buf`. Returns the number of bytes written.
    ///
    /// `pcm` must hold at least `frame_size * channels` interleaved samples;
    /// the library never writes more than `buf.len()` bytes.
    pub fn encode_to(&mut self, pcm: &[i16], frame_size: i32, buf: &mut [u8]) -> Result<usize, CodecError> {
        let needed = frame_size.max(0) as usize * self.channels as usize;
        if frame_size <= 0 || pcm.len() < needed {
            return Err(CodecError::EncodeFailed(ErrorCode::BadArg));
        }
        let max_data_bytes = i32::try_from(buf.len()).unwrap_or(i32::MAX);

        let n = unsafe {
            ffi::opus_encode(
                self.handle,
                pcm.as_ptr(),
                frame_size,
                buf.as_mut_ptr(),
                max_data_bytes,
            )
        };

        if n < 0 {
            return Err(CodecError::EncodeFailed(ErrorCode::from_raw(n)));
        }

        Ok(n as usize)
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_BITRATE_REQUEST, "bitrate", bitrate)
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_COMPLEXITY_REQUEST, "complexity", complexity)
    }

    /// Enables or disables variable bitrate.
    pub fn set_vbr(&mut self, enabled: bool) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_VBR_REQUEST, "vbr", enabled as i32)
    }

    /// Enables or disables discontinuous transmission.
    pub fn set_dtx(&mut self, enabled: bool) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_DTX_REQUEST, "dtx", enabled as i32)
    }

    /// Sets the signal type hint.
    pub fn set_signal(&mut self, signal: Signal) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_SIGNAL_REQUEST, "signal", signal.raw())
    }

    /// Sets the bit depth of the input signal (8-24).
    pub fn set_lsb_depth(&mut self, depth: i32) -> Result<(), CodecError> {
        self.set(ffi::OPUS_SET_LSB_DEPTH_REQUEST, "lsb depth", depth)
    }

    /// Returns the configured bitrate.
    pub fn bitrate(&mut self) -> Result<i32, CodecError> {
        self.get(ffi::OPUS_GET_BITRATE_REQUEST, "bitrate")
    }

    /// Returns the configured complexity.
    pub fn complexity(&mut self) -> Result<i32, CodecError> {
        self.get(ffi::OPUS_GET_COMPLEXITY_REQUEST, "complexity")
    }

    /// Returns whether variable bitrate is enabled.
    pub fn vbr(&mut self) -> Result<bool, CodecError> {
        Ok(self.get(ffi::OPUS_GET_VBR_REQUEST, "vbr")? != 0)
    }

    /// Returns whether discontinuous transmission is enabled.
    pub fn dtx(&mut self) -> Result<bool, CodecError> {
        Ok(self.get(ffi::OPUS_GET_DTX_REQUEST, "dtx")? != 0)
    }

    fn set(&mut self, request: i32, name: &'static str, value: i32) -> Result<(), CodecError> {
        let ret = unsafe { ffi::opus_encoder_ctl(self.handle, request, value) };
        if ret != ffi::OPUS_OK {
            return Err(CodecError::CtlFailed {
                request: name,
                code: ErrorCode::from_raw(ret),
            });
        }
        Ok(())
    }

    fn get(&mut self, request: i32, name: &'static str) -> Result<i32, CodecError> {
        let mut value: i32 = 0;
        let ret = unsafe { ffi::opus_encoder_ctl(self.handle, request, &mut value as *mut i32) };
        if ret != ffi::OPUS_OK {
            return Err(CodecError::CtlFailed {
                request: name,
                code: ErrorCode::from_raw(ret),
            });
        }
        Ok(value)
    }
}
