//! Mock OpenPGP engine for orchestrator tests
//!
//! `MockEngine` records every capability call in order and produces
//! structurally valid armor without any real cryptography. Ciphertext is the
//! hex of the plaintext and a "signature" is the hex of the signed body, so
//! round trips and tamper checks behave like the real thing.

use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::{GeneratedArmor, KeyGenRequest, KeyUnlockError, PgpEngine};
use crate::model::KeyInfo;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub const MOCK_PASSPHRASE: &str = "correct horse";
pub const MOCK_KEY_ID: &str = "0123456789abcdef";
pub const MOCK_FINGERPRINT: &str = "0123456789abcdef0123456789abcdef01234567";

const MESSAGE_BEGIN: &str = "-----BEGIN PGP MESSAGE-----";
const MESSAGE_END: &str = "-----END PGP MESSAGE-----";
const SIGNED_BEGIN: &str = "-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA256\n\n";
const SIGNATURE_BEGIN: &str = "\n-----BEGIN PGP SIGNATURE-----\n";
const SIGNATURE_END: &str = "\n-----END PGP SIGNATURE-----\n";

/// Parsed mock key; remembers the armor it came from.
#[derive(Debug, Clone)]
pub struct MockKey {
    pub armored: String,
}

/// Parsed mock clear-signed message.
#[derive(Debug, Clone)]
pub struct MockSigned {
    pub body: String,
    pub signature: String,
}

/// What a generate call was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub user_id: String,
    pub bits: u32,
    pub had_passphrase: bool,
}

/// Output shape of mock key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateOutput {
    #[default]
    Complete,
    /// Private half comes back empty.
    MissingPrivate,
    /// Halves come back swapped.
    Swapped,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<&'static str>,
    generate_calls: Vec<GenerateCall>,
    fail_on: Option<&'static str>,
    generate_output: GenerateOutput,
}

/// Recording mock of the engine capability.
#[derive(Clone)]
pub struct MockEngine {
    passphrase: String,
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    /// Mock whose private key unlocks with [`MOCK_PASSPHRASE`].
    pub fn new() -> Self {
        Self::with_passphrase(MOCK_PASSPHRASE)
    }

    pub fn with_passphrase(passphrase: &str) -> Self {
        Self {
            passphrase: passphrase.to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make the named capability call fail with an engine error.
    pub fn fail_on(self, call: &'static str) -> Self {
        self.state.lock().unwrap().fail_on = Some(call);
        self
    }

    pub fn generate_output(self, output: GenerateOutput) -> Self {
        self.state.lock().unwrap().generate_output = output;
        self
    }

    /// Names of all capability calls so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.state.lock().unwrap().generate_calls.clone()
    }

    fn record(&self, call: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_on == Some(call) {
            return Err(anyhow!("mock engine failure in {}", call));
        }
        Ok(())
    }

    fn info(&self, has_secret: bool) -> KeyInfo {
        KeyInfo {
            fingerprint: MOCK_FINGERPRINT.to_string(),
            key_id: MOCK_KEY_ID.to_string(),
            user_ids: vec!["Mock User <mock@example.org>".to_string()],
            has_secret,
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Armored mock key block for `kind` ("PUBLIC" or "PRIVATE").
pub fn mock_key_block(kind: &str) -> String {
    format!(
        "-----BEGIN PGP {kind} KEY BLOCK-----\n\nbW9jaw==\n-----END PGP {kind} KEY BLOCK-----\n"
    )
}

/// Clear-signed armor in the mock engine's format.
pub fn mock_signed_message(body: &str) -> String {
    format!(
        "{SIGNED_BEGIN}{body}{SIGNATURE_BEGIN}{}{SIGNATURE_END}",
        hex::encode(body)
    )
}

#[async_trait]
impl PgpEngine for MockEngine {
    type PublicKey = MockKey;
    type LockedKey = MockKey;
    type UnlockedKey = MockKey;
    type Plaintext = String;
    type Encrypted = String;
    type Cleartext = String;
    type Signed = MockSigned;

    async fn read_key(&self, armored: &str) -> Result<MockKey> {
        self.record("read_key")?;
        Ok(MockKey {
            armored: armored.to_string(),
        })
    }

    async fn read_private_key(&self, armored: &str) -> Result<MockKey> {
        self.record("read_private_key")?;
        Ok(MockKey {
            armored: armored.to_string(),
        })
    }

    async fn decrypt_key(&self, key: MockKey, passphrase: Passphrase) -> Result<MockKey> {
        self.record("decrypt_key")?;
        if passphrase.as_str() != self.passphrase {
            return Err(KeyUnlockError::Rejected.into());
        }
        Ok(key)
    }

    async fn create_message(&self, text: &str) -> Result<String> {
        self.record("create_message")?;
        Ok(text.to_string())
    }

    async fn encrypt(&self, message: String, _key: &MockKey) -> Result<String> {
        self.record("encrypt")?;
        Ok(format!(
            "{MESSAGE_BEGIN}\n\n{}\n{MESSAGE_END}\n",
            hex::encode(message)
        ))
    }

    async fn read_message(&self, armored: &str) -> Result<String> {
        self.record("read_message")?;
        let body = armored
            .split_once(MESSAGE_BEGIN)
            .and_then(|(_, rest)| rest.split_once(MESSAGE_END))
            .map(|(body, _)| body.trim().to_string())
            .ok_or_else(|| anyhow!("no message packet"))?;
        Ok(body)
    }

    async fn decrypt(&self, message: String, _key: MockKey) -> Result<String> {
        self.record("decrypt")?;
        let bytes = hex::decode(message)?;
        Ok(String::from_utf8(bytes)?)
    }

    async fn create_cleartext_message(&self, text: &str) -> Result<String> {
        self.record("create_cleartext_message")?;
        Ok(text.to_string())
    }

    async fn sign(&self, message: String, _key: MockKey) -> Result<String> {
        self.record("sign")?;
        Ok(mock_signed_message(&message))
    }

    async fn read_cleartext_message(&self, armored: &str) -> Result<MockSigned> {
        self.record("read_cleartext_message")?;
        let rest = armored
            .strip_prefix(SIGNED_BEGIN)
            .ok_or_else(|| anyhow!("missing signed message header"))?;
        let (body, tail) = rest
            .split_once(SIGNATURE_BEGIN)
            .ok_or_else(|| anyhow!("missing signature"))?;
        let signature = tail.trim_end().trim_end_matches(SIGNATURE_END.trim());
        Ok(MockSigned {
            body: body.to_string(),
            signature: signature.trim().to_string(),
        })
    }

    async fn verify(&self, message: MockSigned, _key: &MockKey) -> Result<Option<String>> {
        self.record("verify")?;
        let valid = hex::encode(&message.body) == message.signature;
        Ok(valid.then(|| MOCK_KEY_ID.to_string()))
    }

    async fn generate_key(&self, request: KeyGenRequest) -> Result<GeneratedArmor> {
        self.record("generate_key")?;
        let crate::crypto::pgp::KeyAlgorithm::Rsa { bits } = request.algorithm;
        let output = {
            let mut state = self.state.lock().unwrap();
            state.generate_calls.push(GenerateCall {
                user_id: request.identity.user_id(),
                bits,
                had_passphrase: !request.passphrase.is_empty(),
            });
            state.generate_output
        };

        let public_armored = mock_key_block("PUBLIC");
        let private_armored = mock_key_block("PRIVATE");
        Ok(match output {
            GenerateOutput::Complete => GeneratedArmor {
                public_armored,
                private_armored,
            },
            GenerateOutput::MissingPrivate => GeneratedArmor {
                public_armored,
                private_armored: String::new(),
            },
            GenerateOutput::Swapped => GeneratedArmor {
                public_armored: private_armored,
                private_armored: public_armored,
            },
        })
    }

    fn describe_key(&self, _key: &MockKey) -> KeyInfo {
        self.info(false)
    }

    fn describe_private_key(&self, _key: &MockKey) -> KeyInfo {
        self.info(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_encrypt_round_trip() {
        let engine = MockEngine::new();
        let armored = engine
            .encrypt("hi".to_string(), &MockKey { armored: String::new() })
            .await
            .unwrap();
        let body = engine.read_message(&armored).await.unwrap();
        let plain = engine
            .decrypt(body, MockKey { armored: String::new() })
            .await
            .unwrap();
        assert_eq!(plain, "hi");
        assert_eq!(engine.calls(), vec!["encrypt", "read_message", "decrypt"]);
    }

    #[tokio::test]
    async fn test_mock_signed_parse() {
        let engine = MockEngine::new();
        let signed = engine
            .read_cleartext_message(&mock_signed_message("body"))
            .await
            .unwrap();
        assert_eq!(signed.body, "body");
        assert_eq!(signed.signature, hex::encode("body"));
    }
}
