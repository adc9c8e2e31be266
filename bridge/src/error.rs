use opusbridge_codec::CodecError;
use thiserror::Error;

use crate::session::{Role, Token};

/// Errors returned by bridge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("bridge: session not initialized")]
    NotInitialized,

    #[error("bridge: unknown handle {0}")]
    UnknownHandle(Token),

    #[error("bridge: handle {0} already released")]
    Released(Token),

    #[error("bridge: handle {token} is not an {expected} handle")]
    WrongRole { token: Token, expected: Role },

    #[error("bridge: unknown application mode {0}")]
    UnknownApplication(i32),

    #[error("bridge: bitrate must be positive, got {0}")]
    InvalidBitrate(i32),

    #[error("bridge: frame size must be positive, got {0}")]
    InvalidFrameSize(i32),

    #[error("bridge: pcm length {0} is not a whole number of 16-bit samples")]
    OddPcmLength(usize),

    #[error("bridge: pcm holds {got} samples, frame needs {needed}")]
    ShortPcm { needed: usize, got: usize },

    #[error("bridge: invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use opusbridge_codec::ErrorCode;

    #[test]
    fn test_bridge_error_display() {
        assert_eq!(
            BridgeError::NotInitialized.to_string(),
            "bridge: session not initialized"
        );
        assert_eq!(
            BridgeError::Released(Token::from_raw(7)).to_string(),
            "bridge: handle 7 already released"
        );
        assert_eq!(
            BridgeError::WrongRole {
                token: Token::from_raw(3),
                expected: Role::Encoder,
            }
            .to_string(),
            "bridge: handle 3 is not an encoder handle"
        );
        assert!(
            BridgeError::ShortPcm { needed: 320, got: 160 }
                .to_string()
                .contains("frame needs 320")
        );
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err: BridgeError = CodecError::EncodeFailed(ErrorCode::BadArg).into();
        assert!(err.to_string().starts_with("opus: encode failed"));
    }
}
