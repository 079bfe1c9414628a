//! Key parsing, inspection and generation using rPGP 0.16

use anyhow::{anyhow, Result};
use pgp::composed::{
    Deserializable, KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedPublicSubKey,
    SignedSecretKey, SubkeyParamsBuilder,
};
use pgp::packet::{Signature, SubpacketData};
use pgp::types::{KeyDetails, Password};
use rand::thread_rng;
use zeroize::Zeroizing;

use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::{GeneratedArmor, KeyAlgorithm, KeyGenRequest};
use crate::model::KeyInfo;

/// Key handling utilities on top of rPGP.
pub struct PgpKeyManager;

impl PgpKeyManager {
    /// Parse an armored public key block.
    pub fn parse_public_key(armored: &str) -> Result<SignedPublicKey> {
        let (public_key, _) = SignedPublicKey::from_string(armored)
            .map_err(|e| anyhow!("Failed to parse PGP public key: {}", e))?;
        Ok(public_key)
    }

    /// Parse an armored private key block. The key stays locked.
    pub fn parse_secret_key(armored: &str) -> Result<SignedSecretKey> {
        let (secret_key, _) = SignedSecretKey::from_string(armored)
            .map_err(|e| anyhow!("Failed to parse PGP private key: {}", e))?;
        Ok(secret_key)
    }

    /// Subkeys whose binding signature carries an encryption key flag.
    pub fn encryption_subkeys(public_key: &SignedPublicKey) -> Vec<&SignedPublicSubKey> {
        public_key
            .public_subkeys
            .iter()
            .filter(|subkey| subkey.signatures.iter().any(allows_encryption))
            .collect()
    }

    /// Whether a self-signature on the primary key carries an encryption key flag.
    pub fn primary_can_encrypt(public_key: &SignedPublicKey) -> bool {
        public_key
            .details
            .users
            .iter()
            .flat_map(|user| user.signatures.iter())
            .chain(public_key.details.direct_signatures.iter())
            .any(allows_encryption)
    }

    pub fn describe_public(public_key: &SignedPublicKey) -> KeyInfo {
        KeyInfo {
            fingerprint: hex::encode(public_key.fingerprint().as_bytes()),
            key_id: hex::encode(public_key.key_id()),
            user_ids: public_key
                .details
                .users
                .iter()
                .map(|user| String::from_utf8_lossy(user.id.id()).to_string())
                .collect(),
            has_secret: false,
        }
    }

    pub fn describe_secret(secret_key: &SignedSecretKey) -> KeyInfo {
        KeyInfo {
            fingerprint: hex::encode(secret_key.fingerprint().as_bytes()),
            key_id: hex::encode(secret_key.key_id()),
            user_ids: secret_key
                .details
                .users
                .iter()
                .map(|user| String::from_utf8_lossy(user.id.id()).to_string())
                .collect(),
            has_secret: true,
        }
    }

    /// Generate an RSA key pair: a certify+sign primary key and an encryption
    /// subkey, both protected by the request's passphrase.
    ///
    /// An empty passphrase produces an unprotected key.
    pub fn generate_keypair(request: &KeyGenRequest) -> Result<(SignedSecretKey, SignedPublicKey)> {
        let KeyAlgorithm::Rsa { bits } = request.algorithm;
        let user_id = request.identity.user_id();
        log::info!("Generating RSA-{} PGP keypair", bits);

        // rPGP's param builders take the passphrase as a plain `String`; those
        // copies live inside the params until `generate` consumes them.
        let key_passphrase = protection(&request.passphrase);

        let mut encryptkey = SubkeyParamsBuilder::default();
        encryptkey
            .key_type(KeyType::Rsa(bits))
            .can_sign(false)
            .can_encrypt(true)
            .can_authenticate(false)
            .passphrase(key_passphrase.as_deref().cloned());

        let mut key_params = SecretKeyParamsBuilder::default();
        key_params
            .key_type(KeyType::Rsa(bits))
            .can_certify(true)
            .can_sign(true)
            .can_encrypt(false)
            .primary_user_id(user_id)
            .passphrase(key_passphrase.as_deref().cloned())
            .subkeys(vec![encryptkey
                .build()
                .map_err(|e| anyhow!("Failed to build encryption subkey: {}", e))?]);

        let secret_key_params = key_params
            .build()
            .map_err(|e| anyhow!("Failed to build secret key params: {}", e))?;
        let secret_key = secret_key_params
            .generate(thread_rng())
            .map_err(|e| anyhow!("Failed to generate secret key: {}", e))?;

        let password = Password::from(request.passphrase.as_str());
        let signed_secret_key = secret_key
            .sign(&mut thread_rng(), &password)
            .map_err(|e| anyhow!("Failed to sign secret key: {}", e))?;

        let signed_public_key = SignedPublicKey::from(signed_secret_key.clone());

        log::info!("Generated RSA-{} PGP keypair", bits);
        Ok((signed_secret_key, signed_public_key))
    }

    /// Generate a key pair and armor both halves.
    pub fn generate_armored(request: &KeyGenRequest) -> Result<GeneratedArmor> {
        let (secret_key, public_key) = Self::generate_keypair(request)?;

        let public_armored = public_key
            .to_armored_string(Default::default())
            .map_err(|e| anyhow!("Failed to armor public key: {}", e))?;
        let private_armored = secret_key
            .to_armored_string(Default::default())
            .map_err(|e| anyhow!("Failed to armor secret key: {}", e))?;

        Ok(GeneratedArmor {
            public_armored,
            private_armored,
        })
    }
}

fn allows_encryption(signature: &Signature) -> bool {
    signature.config().map_or(false, |config| {
        config.hashed_subpackets.iter().any(|subpkt| {
            matches!(
                &subpkt.data,
                SubpacketData::KeyFlags(flags) if flags.encrypt_comms() || flags.encrypt_storage()
            )
        })
    })
}

fn protection(passphrase: &Passphrase) -> Option<Zeroizing<String>> {
    if passphrase.is_empty() {
        None
    } else {
        Some(Zeroizing::new(passphrase.as_str().to_string()))
    }
}
