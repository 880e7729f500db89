//! Anti-forgery tokens
//!
//! A token is `hex(sha256(secret ‖ 0 ‖ action ‖ 0 ‖ tick))`, truncated to 20
//! hex characters. The tick advances every half lifetime and the previous
//! tick is still accepted, so a token lives between one half and one full
//! lifetime.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Action every customizer request is checked against
pub const NONCE_ACTION: &str = "ac-nonce";

const TOKEN_LEN: usize = 20;

/// Checks anti-forgery tokens
pub trait NonceVerifier {
    /// Token is valid for the action
    fn verify(&self, action: &str, token: &str) -> bool;
}

/// SHA-256 tick tokens
#[derive(Clone)]
pub struct Sha256Nonce {
    secret: Vec<u8>,
    lifetime_secs: u64,
}

impl std::fmt::Debug for Sha256Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256Nonce")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl Sha256Nonce {
    /// Tokens derived from `secret`, valid for one day
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            lifetime_secs: 86_400,
        }
    }

    /// With token lifetime; clamped to at least two seconds
    #[inline]
    #[must_use]
    pub fn with_lifetime(mut self, secs: u64) -> Self {
        self.lifetime_secs = secs.max(2);
        self
    }

    /// Issue a token for the action, now
    #[must_use]
    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, now_secs())
    }

    /// Issue a token for the action at a given Unix time
    #[must_use]
    pub fn issue_at(&self, action: &str, unix_secs: u64) -> String {
        self.token(action, self.tick(unix_secs))
    }

    /// Verify a token at a given Unix time
    #[must_use]
    pub fn verify_at(&self, action: &str, token: &str, unix_secs: u64) -> bool {
        let tick = self.tick(unix_secs);
        [Some(tick), tick.checked_sub(1)]
            .into_iter()
            .flatten()
            .any(|t| constant_time_eq(self.token(action, t).as_bytes(), token.as_bytes()))
    }

    fn tick(&self, unix_secs: u64) -> u64 {
        unix_secs / (self.lifetime_secs / 2)
    }

    fn token(&self, action: &str, tick: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update([0]);
        hasher.update(action.as_bytes());
        hasher.update([0]);
        hasher.update(tick.to_le_bytes());
        let mut token = hex::encode(hasher.finalize());
        token.truncate(TOKEN_LEN);
        token
    }
}

impl NonceVerifier for Sha256Nonce {
    fn verify(&self, action: &str, token: &str) -> bool {
        self.verify_at(action, token, now_secs())
    }
}

/// Verifier that accepts everything, for trusted local tooling
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedCaller;

impl NonceVerifier for TrustedCaller {
    fn verify(&self, _action: &str, _token: &str) -> bool {
        true
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
