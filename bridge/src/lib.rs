//! Exposes libopus encode/decode across a foreign-function boundary.
//!
//! A caller outside Rust never sees codec state directly. It receives an
//! opaque 64-bit [`Token`] from an init call, passes it back with each
//! frame, and hands it to a release call when done.
//!
//! - [`registry`]: the handle manager. Issues tokens, resolves them, frees
//!   sessions on release. Released and never-issued tokens are rejected.
//! - [`transcoder`]: one PCM frame to one packet and back, through
//!   call-scoped scratch buffers sized by [`BridgeConfig`].
//! - [`api`]: the sentinel surface (`0` token, `None` bytes) over a
//!   process-wide registry.
//! - [`capi`]: `extern "C"` exports.
//! - `jni` (feature `jni`): exports for the Android `OpusCodec` class.
//!
//! # Example
//!
//! ```no_run
//! use opusbridge::{DecoderConfig, EncoderConfig, Registry};
//!
//! let registry = Registry::default();
//! let enc = registry.create_encoder(&EncoderConfig::default()).unwrap();
//! let dec = registry.create_decoder(&DecoderConfig::default()).unwrap();
//!
//! let pcm = vec![0u8; 640]; // 20ms of 16kHz mono silence
//! let packet = registry.encode(enc, &pcm, 320).unwrap();
//! let decoded = registry.decode(dec, &packet, 320).unwrap();
//! assert_eq!(decoded.len(), 640);
//! ```
//!
//! # Thread Safety
//!
//! Different tokens may be used from different threads at the same time.
//! Calls on one token are serialized by that session's lock.

pub mod api;
pub mod capi;
pub mod config;
mod error;
pub mod logging;
pub mod registry;
pub mod session;
pub mod transcoder;

#[cfg(feature = "jni")]
pub mod jni;

#[cfg(test)]
mod tests;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use registry::Registry;
pub use session::{DecoderConfig, DecoderSession, EncoderConfig, EncoderSession, Role, Token};

pub use opusbridge_codec::{Application, CodecError, ErrorCode};
