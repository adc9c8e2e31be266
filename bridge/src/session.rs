//! Codec sessions and the tokens that name them.

use std::fmt;

use opusbridge_codec::{Application, Decoder, Encoder, Signal};
use tracing::debug;

use crate::error::BridgeError;

/// Input bit depth advertised to every encoder.
pub const LSB_DEPTH: i32 = 16;

/// Opaque capability naming one live session.
///
/// [`Token::NONE`] (zero) means "no session". Crosses the boundary as a
/// signed 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

impl Token {
    /// The "no session" sentinel.
    pub const NONE: Token = Token(0);

    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Reinterprets a boundary value. Negative values never name a session.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw as u64)
    }

    /// Returns the boundary value.
    pub fn raw(self) -> i64 {
        self.0 as i64
    }

    pub fn id(self) -> u64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a session does with frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Encoder,
    Decoder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoder => write!(f, "encoder"),
            Self::Decoder => write!(f, "decoder"),
        }
    }
}

/// Parameters fixed at encoder creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub sample_rate: i32,
    pub channels: i32,
    /// Raw `OPUS_APPLICATION_*` value.
    pub application: i32,
    /// Target bitrate in bits per second.
    pub bitrate: i32,
    /// 0-10.
    pub complexity: i32,
    pub vbr: bool,
    pub dtx: bool,
}

impl Default for EncoderConfig {
    /// 16kHz mono VoIP at 16kbps, complexity 5, CBR with DTX.
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            application: Application::VoIP.raw(),
            bitrate: 16000,
            complexity: 5,
            vbr: false,
            dtx: true,
        }
    }
}

/// Parameters fixed at decoder creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub sample_rate: i32,
    pub channels: i32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// A live encoder and the configuration it was built with.
pub struct EncoderSession {
    config: EncoderConfig,
    pub(crate) encoder: Encoder,
}

impl EncoderSession {
    /// Creates and configures an encoder.
    ///
    /// If any setting is rejected the half-built encoder is dropped and the
    /// error returned.
    pub fn open(config: &EncoderConfig) -> Result<Self, BridgeError> {
        if config.bitrate <= 0 {
            return Err(BridgeError::InvalidBitrate(config.bitrate));
        }
        let application = Application::from_raw(config.application)
            .ok_or(BridgeError::UnknownApplication(config.application))?;

        let mut encoder = Encoder::new(config.sample_rate, config.channels, application)?;
        encoder.set_bitrate(config.bitrate)?;
        encoder.set_complexity(config.complexity)?;
        encoder.set_vbr(config.vbr)?;
        encoder.set_dtx(config.dtx)?;
        encoder.set_signal(Signal::Voice)?;
        encoder.set_lsb_depth(LSB_DEPTH)?;
        debug!("encoder configured: {:?}", config);

        Ok(Self {
            config: *config,
            encoder,
        })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

/// A live decoder and the configuration it was built with.
pub struct DecoderSession {
    config: DecoderConfig,
    pub(crate) decoder: Decoder,
}

impl DecoderSession {
    pub fn open(config: &DecoderConfig) -> Result<Self, BridgeError> {
        let decoder = Decoder::new(config.sample_rate, config.channels)?;
        Ok(Self {
            config: *config,
            decoder,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}
