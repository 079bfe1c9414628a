//! Cleartext signatures and key unlocking using rPGP 0.16

use anyhow::{anyhow, Result};
use pgp::composed::{CleartextSignedMessage, SignedPublicKey, SignedSecretKey};
use pgp::packet::{SignatureConfig, SignatureType};
use pgp::types::{KeyDetails, Password};
use rand::thread_rng;

use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::KeyUnlockError;

/// Text as the cleartext signature framework sees it: LF line endings and no
/// trailing spaces or tabs on any line. Verifiers strip both before hashing.
/// Trailing line breaks are dropped too, since the line break before the
/// signature block is not part of the signed text.
pub fn canonical_cleartext(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_end_matches(['\r', ' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end_matches('\n')
        .to_string()
}

/// Signing operations on top of rPGP.
pub struct PgpSigner;

impl PgpSigner {
    /// Check that `passphrase` unlocks the key.
    ///
    /// rPGP only unlocks secret material inside a signing or decryption call,
    /// so this signs a throwaway buffer and discards the result. The primary
    /// key is tried first, then each secret subkey, so keys exported with a
    /// stub primary still unlock through their subkeys.
    pub fn check_passphrase(secret_key: &SignedSecretKey, passphrase: &Passphrase) -> Result<()> {
        let password = Password::from(passphrase.as_str());

        let config = SignatureConfig::from_key(
            thread_rng(),
            &secret_key.primary_key,
            SignatureType::Binary,
        )
        .map_err(|e| anyhow!("Failed to create signature config: {}", e))?;
        match config.sign(&secret_key.primary_key, &password, &b"unlock"[..]) {
            Ok(_) => return Ok(()),
            Err(e) => log::debug!("Primary key did not unlock: {}", e),
        }

        for subkey in &secret_key.secret_subkeys {
            let Ok(config) =
                SignatureConfig::from_key(thread_rng(), &subkey.key, SignatureType::Binary)
            else {
                continue;
            };
            if config.sign(&subkey.key, &password, &b"unlock"[..]).is_ok() {
                log::debug!("Unlocked through subkey {}", hex::encode(subkey.key.key_id()));
                return Ok(());
            }
        }

        Err(KeyUnlockError::Rejected.into())
    }

    /// Clear-sign `text` with the primary key, returning the armored message.
    ///
    /// The text is put in canonical form first (see [`canonical_cleartext`]),
    /// so what gets signed is exactly what a verifier reconstructs.
    pub fn sign_cleartext(
        secret_key: &SignedSecretKey,
        text: &str,
        passphrase: &Passphrase,
    ) -> Result<String> {
        let text = canonical_cleartext(text);
        log::info!("Creating cleartext PGP signature for {} bytes of text", text.len());

        let signed = CleartextSignedMessage::sign(
            thread_rng(),
            &text,
            &secret_key.primary_key,
            &Password::from(passphrase.as_str()),
        )
        .map_err(|e| anyhow!("Failed to create signature: {}", e))?;

        signed
            .to_armored_string(Default::default())
            .map_err(|e| anyhow!("Failed to armor signed message: {}", e))
    }

    /// Parse an armored clear-signed message.
    pub fn parse_cleartext(armored: &str) -> Result<CleartextSignedMessage> {
        let (message, _) = CleartextSignedMessage::from_string(armored)
            .map_err(|e| anyhow!("Failed to parse clear-signed message: {}", e))?;
        Ok(message)
    }

    /// Verify against the primary key and then each subkey.
    ///
    /// Returns the hex key id of the key that verified, or `None` when no key does.
    pub fn verify_cleartext(
        message: &CleartextSignedMessage,
        public_key: &SignedPublicKey,
    ) -> Option<String> {
        if message.verify(&public_key.primary_key).is_ok() {
            return Some(hex::encode(public_key.primary_key.key_id()));
        }

        public_key
            .public_subkeys
            .iter()
            .find(|subkey| message.verify(&subkey.key).is_ok())
            .map(|subkey| hex::encode(subkey.key.key_id()))
    }
}
