//! rPGP-backed [`PgpEngine`].
//!
//! Key handles are Arc-wrapped so they can move onto the blocking pool
//! without deep-cloning key material. RSA work runs on the blocking pool
//! via [`tokio::task::spawn_blocking`].

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use pgp::composed::{CleartextSignedMessage, SignedPublicKey, SignedSecretKey};

use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::keypair::PgpKeyManager;
use crate::crypto::pgp::message::PgpCipher;
use crate::crypto::pgp::signing::PgpSigner;
use crate::crypto::pgp::{GeneratedArmor, KeyGenRequest, PgpEngine};
use crate::model::KeyInfo;

/// Arc-wrapped public key.
pub type ArcPublicKey = Arc<SignedPublicKey>;

/// Arc-wrapped secret key that has not been unlocked.
pub type ArcSecretKey = Arc<SignedSecretKey>;

/// Secret key paired with the passphrase that unlocked it.
///
/// Not `Clone`; the passphrase is zeroized when this is dropped after use.
pub struct UnlockedSecretKey {
    key: ArcSecretKey,
    passphrase: Passphrase,
}

/// Text waiting to be encrypted or clear-signed.
pub struct PreparedText(String);

/// Armored message that has been checked to parse.
pub struct ArmoredMessage(String);

/// Production engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpgpEngine;

impl RpgpEngine {
    pub fn new() -> Self {
        Self
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow!("OpenPGP task join error: {}", e))?
}

#[async_trait]
impl PgpEngine for RpgpEngine {
    type PublicKey = ArcPublicKey;
    type LockedKey = ArcSecretKey;
    type UnlockedKey = UnlockedSecretKey;
    type Plaintext = PreparedText;
    type Encrypted = ArmoredMessage;
    type Cleartext = PreparedText;
    type Signed = CleartextSignedMessage;

    async fn read_key(&self, armored: &str) -> Result<ArcPublicKey> {
        PgpKeyManager::parse_public_key(armored).map(Arc::new)
    }

    async fn read_private_key(&self, armored: &str) -> Result<ArcSecretKey> {
        PgpKeyManager::parse_secret_key(armored).map(Arc::new)
    }

    async fn decrypt_key(
        &self,
        key: ArcSecretKey,
        passphrase: Passphrase,
    ) -> Result<UnlockedSecretKey> {
        run_blocking(move || {
            PgpSigner::check_passphrase(&key, &passphrase)?;
            Ok(UnlockedSecretKey { key, passphrase })
        })
        .await
    }

    async fn create_message(&self, text: &str) -> Result<PreparedText> {
        Ok(PreparedText(text.to_string()))
    }

    async fn encrypt(&self, message: PreparedText, key: &ArcPublicKey) -> Result<String> {
        let key = Arc::clone(key);
        run_blocking(move || PgpCipher::encrypt(&key, &message.0)).await
    }

    async fn read_message(&self, armored: &str) -> Result<ArmoredMessage> {
        PgpCipher::check_message(armored)?;
        Ok(ArmoredMessage(armored.to_string()))
    }

    async fn decrypt(&self, message: ArmoredMessage, key: UnlockedSecretKey) -> Result<String> {
        run_blocking(move || PgpCipher::decrypt(&key.key, &key.passphrase, &message.0)).await
    }

    async fn create_cleartext_message(&self, text: &str) -> Result<PreparedText> {
        Ok(PreparedText(text.to_string()))
    }

    async fn sign(&self, message: PreparedText, key: UnlockedSecretKey) -> Result<String> {
        run_blocking(move || PgpSigner::sign_cleartext(&key.key, &message.0, &key.passphrase))
            .await
    }

    async fn read_cleartext_message(&self, armored: &str) -> Result<CleartextSignedMessage> {
        PgpSigner::parse_cleartext(armored)
    }

    async fn verify(
        &self,
        message: CleartextSignedMessage,
        key: &ArcPublicKey,
    ) -> Result<Option<String>> {
        let key = Arc::clone(key);
        run_blocking(move || Ok(PgpSigner::verify_cleartext(&message, &key))).await
    }

    async fn generate_key(&self, request: KeyGenRequest) -> Result<GeneratedArmor> {
        run_blocking(move || PgpKeyManager::generate_armored(&request)).await
    }

    fn describe_key(&self, key: &ArcPublicKey) -> KeyInfo {
        PgpKeyManager::describe_public(key)
    }

    fn describe_private_key(&self, key: &ArcSecretKey) -> KeyInfo {
        PgpKeyManager::describe_secret(key)
    }
}
