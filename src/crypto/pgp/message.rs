//! Message encryption and decryption using rPGP 0.16

use anyhow::{anyhow, Result};
use pgp::composed::{Message, MessageBuilder, SignedPublicKey, SignedSecretKey};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::Password;
use rand::thread_rng;

use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::keypair::PgpKeyManager;

/// Encryption operations on top of rPGP.
pub struct PgpCipher;

impl PgpCipher {
    /// Encrypt `text` to the first encryption subkey of `public_key` and armor
    /// the result. A key without one is used directly when its primary key is
    /// flagged for encryption.
    pub fn encrypt(public_key: &SignedPublicKey, text: &str) -> Result<String> {
        let subkey = PgpKeyManager::encryption_subkeys(public_key).into_iter().next();
        if subkey.is_none() && !PgpKeyManager::primary_can_encrypt(public_key) {
            return Err(anyhow!("Public key has no encryption-capable key"));
        }
        log::info!("Encrypting {} bytes of text", text.len());

        let mut rng = thread_rng();
        let mut builder = MessageBuilder::from_bytes("", text.as_bytes().to_vec())
            .seipd_v1(&mut rng, SymmetricKeyAlgorithm::AES256);
        let recipient = match subkey {
            Some(subkey) => builder.encrypt_to_key(&mut rng, &subkey.key),
            None => builder.encrypt_to_key(&mut rng, &public_key.primary_key),
        };
        recipient.map_err(|e| anyhow!("Failed to encrypt to key: {}", e))?;

        builder
            .to_armored_string(&mut rng, Default::default())
            .map_err(|e| anyhow!("Failed to armor encrypted message: {}", e))
    }

    /// Check that `armored` parses as an OpenPGP message without decrypting it.
    pub fn check_message(armored: &str) -> Result<()> {
        Message::from_string(armored)
            .map(|_| ())
            .map_err(|e| anyhow!("Failed to parse PGP message: {}", e))
    }

    /// Decrypt an armored message with an already unlocked key.
    pub fn decrypt(
        secret_key: &SignedSecretKey,
        passphrase: &Passphrase,
        armored: &str,
    ) -> Result<String> {
        let (message, _) = Message::from_string(armored)
            .map_err(|e| anyhow!("Failed to parse PGP message: {}", e))?;

        let mut message = message
            .decrypt(&Password::from(passphrase.as_str()), secret_key)
            .map_err(|e| anyhow!("Failed to decrypt message: {}", e))?;

        if message.is_compressed() {
            message = message
                .decompress()
                .map_err(|e| anyhow!("Failed to decompress message: {}", e))?;
        }

        message
            .as_data_string()
            .map_err(|e| anyhow!("Failed to read decrypted message: {}", e))
    }
}
