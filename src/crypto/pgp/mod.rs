//! OpenPGP engine capability.
//!
//! The orchestrator never touches OpenPGP packets itself. It drives an
//! implementation of [`PgpEngine`], whose associated handle types keep key
//! states apart at compile time: only an [`PgpEngine::UnlockedKey`] can
//! decrypt or sign, and it is consumed by the one call it serves.
//!
//! - [`engine::RpgpEngine`] is the production engine, built on rPGP 0.16
//! - `keypair` parses, inspects and generates keys
//! - `message` encrypts and decrypts armored messages
//! - `signing` unlocks keys and produces/checks cleartext signatures

pub mod engine;
pub mod keypair;
pub mod message;
pub mod signing;

pub use engine::RpgpEngine;

use anyhow::Result;
use async_trait::async_trait;

use crate::crypto::passphrase::Passphrase;
use crate::model::KeyInfo;

/// Default RSA modulus size for generated keys.
pub const DEFAULT_KEY_STRENGTH: u32 = 4096;

/// Public-key algorithm for key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa { bits: u32 },
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        KeyAlgorithm::Rsa {
            bits: DEFAULT_KEY_STRENGTH,
        }
    }
}

/// Identity for a new key, already trimmed and validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// OpenPGP user id in the usual `Name <email>` form.
    pub fn user_id(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Everything the engine needs to generate a key pair.
#[derive(Debug)]
pub struct KeyGenRequest {
    pub identity: Identity,
    pub passphrase: Passphrase,
    pub algorithm: KeyAlgorithm,
}

/// Raw armored output of key generation, before the orchestrator checks it.
#[derive(Debug, Default)]
pub struct GeneratedArmor {
    pub public_armored: String,
    pub private_armored: String,
}

/// Raised by [`PgpEngine::decrypt_key`] when no secret key material accepts
/// the passphrase. Engines return it inside `anyhow::Error`; any other unlock
/// error is treated as an engine failure.
#[derive(Debug, thiserror::Error)]
pub enum KeyUnlockError {
    #[error("Private key rejected the passphrase")]
    Rejected,
}

impl KeyUnlockError {
    /// Whether `error` carries [`KeyUnlockError::Rejected`] anywhere in its chain.
    pub fn is_rejected(error: &anyhow::Error) -> bool {
        error.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<KeyUnlockError>(),
                Some(KeyUnlockError::Rejected)
            )
        })
    }
}

/// Capability interface of an OpenPGP implementation.
///
/// Methods return `anyhow::Result`; the orchestrator decides how each failure
/// is reported to the user.
#[async_trait]
pub trait PgpEngine: Send + Sync {
    /// Parsed public key.
    type PublicKey: Send + Sync;
    /// Parsed private key that has not been unlocked.
    type LockedKey: Send + Sync;
    /// Private key with its passphrase applied; usable once.
    type UnlockedKey: Send;
    /// Plaintext prepared for encryption.
    type Plaintext: Send;
    /// Parsed encrypted message.
    type Encrypted: Send;
    /// Text prepared for clear-signing.
    type Cleartext: Send;
    /// Parsed clear-signed message.
    type Signed: Send;

    async fn read_key(&self, armored: &str) -> Result<Self::PublicKey>;

    async fn read_private_key(&self, armored: &str) -> Result<Self::LockedKey>;

    /// Apply `passphrase` to a locked key. A rejected passphrase must surface
    /// as [`KeyUnlockError::Rejected`].
    async fn decrypt_key(
        &self,
        key: Self::LockedKey,
        passphrase: Passphrase,
    ) -> Result<Self::UnlockedKey>;

    async fn create_message(&self, text: &str) -> Result<Self::Plaintext>;

    /// Encrypt to `key`, returning an armored PGP message.
    async fn encrypt(&self, message: Self::Plaintext, key: &Self::PublicKey) -> Result<String>;

    async fn read_message(&self, armored: &str) -> Result<Self::Encrypted>;

    async fn decrypt(&self, message: Self::Encrypted, key: Self::UnlockedKey) -> Result<String>;

    async fn create_cleartext_message(&self, text: &str) -> Result<Self::Cleartext>;

    /// Clear-sign, returning the armored signed message.
    async fn sign(&self, message: Self::Cleartext, key: Self::UnlockedKey) -> Result<String>;

    async fn read_cleartext_message(&self, armored: &str) -> Result<Self::Signed>;

    /// Check the signature. `Ok(Some(key_id_hex))` when it verifies, `Ok(None)` when it does not.
    async fn verify(&self, message: Self::Signed, key: &Self::PublicKey) -> Result<Option<String>>;

    async fn generate_key(&self, request: KeyGenRequest) -> Result<GeneratedArmor>;

    fn describe_key(&self, key: &Self::PublicKey) -> KeyInfo;

    fn describe_private_key(&self, key: &Self::LockedKey) -> KeyInfo;
}
