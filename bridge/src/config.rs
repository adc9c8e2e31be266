//! Bridge configuration.
//!
//! Scratch capacities default to the voice-call profile. Hosts that need
//! larger frames (e.g. 48kHz stereo music) raise them through the
//! environment or by deserializing a [`BridgeConfig`] from their own config.

use serde::Deserialize;

use crate::error::BridgeError;

/// Default encode scratch size in bytes.
pub const DEFAULT_MAX_PACKET_BYTES: usize = 1024;

/// Default decode scratch size in interleaved samples.
pub const DEFAULT_MAX_FRAME_SAMPLES: usize = 1024;

/// Environment variable overriding [`BridgeConfig::max_packet_bytes`].
pub const ENV_MAX_PACKET_BYTES: &str = "OPUSBRIDGE_MAX_PACKET_BYTES";

/// Environment variable overriding [`BridgeConfig::max_frame_samples`].
pub const ENV_MAX_FRAME_SAMPLES: &str = "OPUSBRIDGE_MAX_FRAME_SAMPLES";

/// Capacity limits applied to every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Upper bound on one compressed packet.
    pub max_packet_bytes: usize,
    /// Upper bound on one decoded frame, counted across all channels.
    pub max_frame_samples: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_packet_bytes: DEFAULT_MAX_PACKET_BYTES,
            max_frame_samples: DEFAULT_MAX_FRAME_SAMPLES,
        }
    }
}

impl BridgeConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_MAX_PACKET_BYTES) {
            config.max_packet_bytes = parse_capacity(ENV_MAX_PACKET_BYTES, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_FRAME_SAMPLES) {
            config.max_frame_samples = parse_capacity(ENV_MAX_FRAME_SAMPLES, &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_packet_bytes(mut self, n: usize) -> Self {
        self.max_packet_bytes = n;
        self
    }

    pub fn with_max_frame_samples(mut self, n: usize) -> Self {
        self.max_frame_samples = n;
        self
    }

    /// Rejects zero capacities.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.max_packet_bytes == 0 {
            return Err(BridgeError::InvalidConfig("max_packet_bytes must be positive".into()));
        }
        if self.max_frame_samples == 0 {
            return Err(BridgeError::InvalidConfig("max_frame_samples must be positive".into()));
        }
        Ok(())
    }
}

fn parse_capacity(key: &str, value: &str) -> Result<usize, BridgeError> {
    value
        .trim()
        .parse()
        .map_err(|e| BridgeError::InvalidConfig(format!("{key}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.max_packet_bytes, 1024);
        assert_eq!(config.max_frame_samples, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = BridgeConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = BridgeConfig::from_lookup(lookup_from(&[
            (ENV_MAX_PACKET_BYTES, "4000"),
            (ENV_MAX_FRAME_SAMPLES, " 11520 "),
        ]))
        .unwrap();
        assert_eq!(config.max_packet_bytes, 4000);
        assert_eq!(config.max_frame_samples, 11520);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = BridgeConfig::from_lookup(lookup_from(&[(ENV_MAX_PACKET_BYTES, "lots")])).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(msg) if msg.contains(ENV_MAX_PACKET_BYTES)));
    }

    #[test]
    fn test_from_lookup_rejects_zero() {
        let err = BridgeConfig::from_lookup(lookup_from(&[(ENV_MAX_FRAME_SAMPLES, "0")])).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(_)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: BridgeConfig = serde_json::from_str(r#"{"max_packet_bytes": 4000}"#).unwrap();
        assert_eq!(config.max_packet_bytes, 4000);
        assert_eq!(config.max_frame_samples, DEFAULT_MAX_FRAME_SAMPLES);
    }

    #[test]
    fn test_builders() {
        let config = BridgeConfig::default()
            .with_max_packet_bytes(64)
            .with_max_frame_samples(5760);
        assert_eq!(config.max_packet_bytes, 64);
        assert_eq!(config.max_frame_samples, 5760);
    }
}
