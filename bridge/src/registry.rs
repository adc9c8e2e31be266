//! Handle manager: issues, resolves and retires session tokens.
//!
//! Every session lives behind its own lock, so calls on distinct tokens
//! never wait on each other. The map lock is held only long enough to
//! insert, look up or remove an entry, never across a codec call.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::session::{DecoderConfig, DecoderSession, EncoderConfig, EncoderSession, Role, Token};

enum Slot {
    Encoder(Arc<Mutex<EncoderSession>>),
    Decoder(Arc<Mutex<DecoderSession>>),
}

impl Slot {
    fn role(&self) -> Role {
        match self {
            Slot::Encoder(_) => Role::Encoder,
            Slot::Decoder(_) => Role::Decoder,
        }
    }
}

/// Table of live sessions keyed by token.
///
/// Tokens come from a counter starting at 1 and are never reissued, so a
/// released token is told apart from one that was never handed out.
pub struct Registry {
    config: BridgeConfig,
    next: AtomicU64,
    slots: RwLock<HashMap<Token, Slot>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl Registry {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            next: AtomicU64::new(1),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Creates and configures an encoder session.
    pub fn create_encoder(&self, config: &EncoderConfig) -> Result<Token, BridgeError> {
        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            application = config.application,
            bitrate = config.bitrate,
            complexity = config.complexity,
            vbr = config.vbr,
            dtx = config.dtx,
            "initializing opus encoder"
        );
        let session = EncoderSession::open(config)?;
        let token = self.insert(Slot::Encoder(Arc::new(Mutex::new(session))));
        info!(%token, "opus encoder initialized");
        Ok(token)
    }

    /// Creates a decoder session.
    pub fn create_decoder(&self, config: &DecoderConfig) -> Result<Token, BridgeError> {
        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            "initializing opus decoder"
        );
        let session = DecoderSession::open(config)?;
        let token = self.insert(Slot::Decoder(Arc::new(Mutex::new(session))));
        info!(%token, "opus decoder initialized");
        Ok(token)
    }

    /// Retires `token` and frees its codec state.
    ///
    /// The sentinel is a no-op. A token of the other role is left alone.
    pub fn release(&self, token: Token, role: Role) -> Result<(), BridgeError> {
        if token.is_none() {
            return Ok(());
        }

        let slot = {
            let mut slots = self.slots.write();
            match slots.get(&token).map(Slot::role) {
                None => return Err(self.missing(token)),
                Some(found) if found != role => {
                    return Err(BridgeError::WrongRole { token, expected: role });
                }
                Some(_) => slots.remove(&token),
            }
        };

        // Native state is destroyed here, outside the map lock.
        drop(slot);
        info!(%token, "opus {} released", role);
        Ok(())
    }

    /// Resolves an encoder token.
    pub fn encoder(&self, token: Token) -> Result<Arc<Mutex<EncoderSession>>, BridgeError> {
        if token.is_none() {
            return Err(BridgeError::NotInitialized);
        }
        match self.slots.read().get(&token) {
            Some(Slot::Encoder(session)) => Ok(Arc::clone(session)),
            Some(Slot::Decoder(_)) => Err(BridgeError::WrongRole {
                token,
                expected: Role::Encoder,
            }),
            None => Err(self.missing(token)),
        }
    }

    /// Resolves a decoder token.
    pub fn decoder(&self, token: Token) -> Result<Arc<Mutex<DecoderSession>>, BridgeError> {
        if token.is_none() {
            return Err(BridgeError::NotInitialized);
        }
        match self.slots.read().get(&token) {
            Some(Slot::Decoder(session)) => Ok(Arc::clone(session)),
            Some(Slot::Encoder(_)) => Err(BridgeError::WrongRole {
                token,
                expected: Role::Decoder,
            }),
            None => Err(self.missing(token)),
        }
    }

    /// Returns true if `token` names a live session.
    pub fn is_live(&self, token: Token) -> bool {
        self.slots.read().contains_key(&token)
    }

    /// Returns the role of a live session.
    pub fn role(&self, token: Token) -> Option<Role> {
        self.slots.read().get(&token).map(Slot::role)
    }

    /// Returns the number of live sessions.
    pub fn live_sessions(&self) -> usize {
        self.slots.read().len()
    }

    fn insert(&self, slot: Slot) -> Token {
        let token = Token::new(self.next.fetch_add(1, Ordering::Relaxed));
        self.slots.write().insert(token, slot);
        token
    }

    fn missing(&self, token: Token) -> BridgeError {
        if token.id() < self.next.load(Ordering::Relaxed) {
            BridgeError::Released(token)
        } else {
            warn!(%token, "lookup of a token that was never issued");
            BridgeError::UnknownHandle(token)
        }
    }
}
