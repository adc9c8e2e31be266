//! Sentinel call surface shared by the C ABI and JNI exports.
//!
//! Mirrors the boundary contract: creation returns a token or `0`,
//! transcoding returns bytes or `None`, release returns nothing. Every
//! failure is logged here and never propagates as a panic.

use once_cell::sync::Lazy;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::logging;
use crate::registry::Registry;
use crate::session::{DecoderConfig, EncoderConfig, Role, Token};

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    logging::init();
    let config = BridgeConfig::from_env().unwrap_or_else(|err| {
        warn!("{}, using defaults", err);
        BridgeConfig::default()
    });
    Registry::new(config)
});

/// Returns the process-wide registry backing the exported functions.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Creates an encoder. Returns `0` on failure.
pub fn init_encoder(
    sample_rate: i32,
    channels: i32,
    application: i32,
    bitrate: i32,
    complexity: i32,
    vbr: bool,
    dtx: bool,
) -> i64 {
    let config = EncoderConfig {
        sample_rate,
        channels,
        application,
        bitrate,
        complexity,
        vbr,
        dtx,
    };
    match registry().create_encoder(&config) {
        Ok(token) => token.raw(),
        Err(err) => {
            error!("failed to create opus encoder: {}", err);
            Token::NONE.raw()
        }
    }
}

/// Creates a decoder. Returns `0` on failure.
pub fn init_decoder(sample_rate: i32, channels: i32) -> i64 {
    match registry().create_decoder(&DecoderConfig { sample_rate, channels }) {
        Ok(token) => token.raw(),
        Err(err) => {
            error!("failed to create opus decoder: {}", err);
            Token::NONE.raw()
        }
    }
}

/// Encodes one frame, logging any failure.
pub fn try_encode(token: i64, pcm: &[u8], frame_size: i32) -> Result<Vec<u8>, BridgeError> {
    registry()
        .encode(Token::from_raw(token), pcm, frame_size)
        .inspect_err(|err| error!("opus encoding failed: {}", err))
}

/// Decodes one packet, logging any failure.
pub fn try_decode(token: i64, packet: &[u8], frame_size: i32) -> Result<Vec<u8>, BridgeError> {
    registry()
        .decode(Token::from_raw(token), packet, frame_size)
        .inspect_err(|err| error!("opus decoding failed: {}", err))
}

/// Encodes one frame. Returns `None` on failure.
pub fn encode(token: i64, pcm: &[u8], frame_size: i32) -> Option<Vec<u8>> {
    try_encode(token, pcm, frame_size).ok()
}

/// Decodes one packet. Returns `None` on failure.
pub fn decode(token: i64, packet: &[u8], frame_size: i32) -> Option<Vec<u8>> {
    try_decode(token, packet, frame_size).ok()
}

/// Returns the libopus version string.
pub fn version() -> String {
    let version = opusbridge_codec::version();
    info!("opus version: {}", version);
    version
}

pub fn release_encoder(token: i64) {
    release(token, Role::Encoder);
}

pub fn release_decoder(token: i64) {
    release(token, Role::Decoder);
}

fn release(token: i64, role: Role) {
    if let Err(err) = registry().release(Token::from_raw(token), role) {
        warn!("release {} ignored: {}", role, err);
    }
}
