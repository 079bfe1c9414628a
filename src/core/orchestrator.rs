//! Operation orchestration.
//!
//! [`Orchestrator`] runs the five user operations plus key inspection. Each
//! call validates its inputs and gates key and message text through
//! [`ArmorClassifier`](crate::core::armor::ArmorClassifier). It then drives
//! the engine in a fixed order, mapping every failure onto [`OperationError`].
//! Engine errors never escape unwrapped.
//!
//! The orchestrator holds no per-call state. Keys are fetched and parsed
//! fresh on every call and passphrases are consumed by the unlock they serve.

use crate::core::error::{OperationError, OperationResult};
use crate::core::key_source::KeySource;
use crate::core::pipeline::{Operation, Pipeline, Stage};
use crate::crypto::passphrase::Passphrase;
use crate::crypto::pgp::{
    Identity, KeyAlgorithm, KeyGenRequest, KeyUnlockError, PgpEngine, DEFAULT_KEY_STRENGTH,
};
use crate::model::{ArmoredBlob, Classification, GeneratedKeys, KeyInfo, KeyRole, Verification};

pub struct Orchestrator<E, K> {
    engine: E,
    keys: K,
    key_strength: u32,
}

impl<E: PgpEngine, K: KeySource> Orchestrator<E, K> {
    pub fn new(engine: E, keys: K) -> Self {
        Self {
            engine,
            keys,
            key_strength: DEFAULT_KEY_STRENGTH,
        }
    }

    /// RSA modulus size used by [`Orchestrator::generate`].
    pub fn with_key_strength(mut self, bits: u32) -> Self {
        self.key_strength = bits;
        self
    }

    pub fn key_strength(&self) -> u32 {
        self.key_strength
    }

    /// Encrypt `message` to the public key. Returns the armored PGP message.
    pub async fn encrypt(&self, message: &str) -> OperationResult<String> {
        let mut pipeline = Pipeline::start(Operation::Encrypt);
        let result = self.run_encrypt(&mut pipeline, message).await;
        pipeline.resolve(result)
    }

    /// Decrypt an armored PGP message with the private key.
    pub async fn decrypt(&self, message: &str, passphrase: Passphrase) -> OperationResult<String> {
        let mut pipeline = Pipeline::start(Operation::Decrypt);
        let result = self.run_decrypt(&mut pipeline, message, passphrase).await;
        pipeline.resolve(result)
    }

    /// Clear-sign `message` with the private key.
    pub async fn sign(&self, message: &str, passphrase: Passphrase) -> OperationResult<String> {
        let mut pipeline = Pipeline::start(Operation::Sign);
        let result = self.run_sign(&mut pipeline, message, passphrase).await;
        pipeline.resolve(result)
    }

    /// Check a clear-signed message against the public key.
    ///
    /// A signature that does not verify is `Ok(Verification::NotValid)`.
    pub async fn verify(&self, message: &str) -> OperationResult<Verification> {
        let mut pipeline = Pipeline::start(Operation::Verify);
        let result = self.run_verify(&mut pipeline, message).await;
        pipeline.resolve(result)
    }

    /// Generate an RSA key pair for `Name <email>`.
    pub async fn generate(
        &self,
        name: &str,
        email: &str,
        passphrase: Passphrase,
    ) -> OperationResult<GeneratedKeys> {
        let mut pipeline = Pipeline::start(Operation::Generate);
        let result = self.run_generate(&mut pipeline, name, email, passphrase).await;
        pipeline.resolve(result)
    }

    /// Parse the key for `role` and report its fingerprint and user ids.
    ///
    /// Either key kind is accepted regardless of `role`; anything else is
    /// [`OperationError::NotAKey`].
    pub async fn inspect_key(&self, role: KeyRole) -> OperationResult<KeyInfo> {
        let mut pipeline = Pipeline::start(Operation::InspectKey);
        let result = self.run_inspect(&mut pipeline, role).await;
        pipeline.resolve(result)
    }

    async fn run_encrypt(&self, pipeline: &mut Pipeline, message: &str) -> OperationResult<String> {
        pipeline.enter(Stage::Validating);
        require_message(message)?;

        let key = self.load_public_key(pipeline).await?;

        let stage = pipeline.enter(Stage::EngineCall);
        let plaintext = self
            .engine
            .create_message(message)
            .await
            .map_err(|e| OperationError::engine(stage, e))?;
        self.engine
            .encrypt(plaintext, &key)
            .await
            .map_err(|e| OperationError::engine(stage, e))
    }

    async fn run_decrypt(
        &self,
        pipeline: &mut Pipeline,
        message: &str,
        passphrase: Passphrase,
    ) -> OperationResult<String> {
        pipeline.enter(Stage::Validating);
        require_message(message)?;
        let message = ArmoredBlob::new(message);
        expect_classification(&message, Classification::PgpMessage)?;

        let key = self.load_unlocked_key(pipeline, passphrase).await?;

        let stage = pipeline.enter(Stage::EngineCall);
        let encrypted = self
            .engine
            .read_message(message.text())
            .await
            .map_err(|e| OperationError::engine(stage, e))?;
        self.engine
            .decrypt(encrypted, key)
            .await
            .map_err(|e| OperationError::engine(stage, e))
    }

    async fn run_sign(
        &self,
        pipeline: &mut Pipeline,
        message: &str,
        passphrase: Passphrase,
    ) -> OperationResult<String> {
        pipeline.enter(Stage::Validating);
        require_message(message)?;

        let key = self.load_unlocked_key(pipeline, passphrase).await?;

        let stage = pipeline.enter(Stage::EngineCall);
        let cleartext = self
            .engine
            .create_cleartext_message(message)
            .await
            .map_err(|e| OperationError::engine(stage, e))?;
        self.engine
            .sign(cleartext, key)
            .await
            .map_err(|e| OperationError::engine(stage, e))
    }

    async fn run_verify(
        &self,
        pipeline: &mut Pipeline,
        message: &str,
    ) -> OperationResult<Verification> {
        pipeline.enter(Stage::Validating);
        require_message(message)?;
        let message = ArmoredBlob::new(message);
        expect_classification(&message, Classification::ClearSignedMessage)?;

        let key = self.load_public_key(pipeline).await?;

        let stage = pipeline.enter(Stage::EngineCall);
        let signed = self
            .engine
            .read_cleartext_message(message.text())
            .await
            .map_err(|e| OperationError::engine(stage, e))?;
        let signer = self
            .engine
            .verify(signed, &key)
            .await
            .map_err(|e| OperationError::engine(stage, e))?;

        Ok(match signer {
            Some(signer_id) => {
                log::info!("Signature verified, signer key id {}", signer_id);
                Verification::Valid { signer_id }
            }
            None => {
                log::info!("Signature did not verify");
                Verification::NotValid
            }
        })
    }

    async fn run_generate(
        &self,
        pipeline: &mut Pipeline,
        name: &str,
        email: &str,
        passphrase: Passphrase,
    ) -> OperationResult<GeneratedKeys> {
        pipeline.enter(Stage::Validating);
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(OperationError::MissingIdentity);
        }

        let stage = pipeline.enter(Stage::EngineCall);
        log::info!("Generating RSA-{} key pair", self.key_strength);
        let request = KeyGenRequest {
            identity: Identity {
                name: name.to_string(),
                email: email.to_string(),
            },
            passphrase,
            algorithm: KeyAlgorithm::Rsa {
                bits: self.key_strength,
            },
        };
        let armor = self
            .engine
            .generate_key(request)
            .await
            .map_err(|e| OperationError::engine(stage, e))?;

        let public = ArmoredBlob::new(armor.public_armored);
        let private = ArmoredBlob::new(armor.private_armored);
        if public.classification() != Classification::PublicKey
            || private.classification() != Classification::PrivateKey
        {
            return Err(OperationError::engine(
                stage,
                anyhow::anyhow!(
                    "Generated key pair is incomplete (public: {}, private: {})",
                    public.classification(),
                    private.classification()
                ),
            ));
        }

        Ok(GeneratedKeys { public, private })
    }

    async fn run_inspect(&self, pipeline: &mut Pipeline, role: KeyRole) -> OperationResult<KeyInfo> {
        pipeline.enter(Stage::KeyLoading);
        let blob = self.keys.fetch(role).await?;

        let stage = pipeline.enter(Stage::KeyParsing);
        let info = match blob.classification() {
            Classification::PublicKey => {
                let key = self
                    .engine
                    .read_key(blob.text())
                    .await
                    .map_err(|e| OperationError::engine(stage, e))?;
                self.engine.describe_key(&key)
            }
            Classification::PrivateKey => {
                let key = self
                    .engine
                    .read_private_key(blob.text())
                    .await
                    .map_err(|e| OperationError::engine(stage, e))?;
                self.engine.describe_private_key(&key)
            }
            got => return Err(OperationError::NotAKey { got }),
        };

        log::info!("Loaded key fingerprint: {}", info.fingerprint);
        Ok(info)
    }

    async fn load_public_key(&self, pipeline: &mut Pipeline) -> OperationResult<E::PublicKey> {
        pipeline.enter(Stage::KeyLoading);
        let blob = self.keys.fetch(KeyRole::Public).await?;
        expect_classification(&blob, KeyRole::Public.expected_classification())?;

        let stage = pipeline.enter(Stage::KeyParsing);
        self.engine
            .read_key(blob.text())
            .await
            .map_err(|e| OperationError::engine(stage, e))
    }

    async fn load_unlocked_key(
        &self,
        pipeline: &mut Pipeline,
        passphrase: Passphrase,
    ) -> OperationResult<E::UnlockedKey> {
        pipeline.enter(Stage::KeyLoading);
        let blob = self.keys.fetch(KeyRole::Private).await?;
        expect_classification(&blob, KeyRole::Private.expected_classification())?;

        let stage = pipeline.enter(Stage::KeyParsing);
        let locked = self
            .engine
            .read_private_key(blob.text())
            .await
            .map_err(|e| OperationError::engine(stage, e))?;

        let stage = pipeline.enter(Stage::Unlocking);
        self.engine
            .decrypt_key(locked, passphrase)
            .await
            .map_err(|e| {
                if KeyUnlockError::is_rejected(&e) {
                    log::debug!("Key unlock rejected: {:#}", e);
                    OperationError::WrongPassphrase
                } else {
                    OperationError::engine(stage, e)
                }
            })
    }
}

fn require_message(message: &str) -> OperationResult<()> {
    if message.trim().is_empty() {
        return Err(OperationError::EmptyMessage);
    }
    Ok(())
}

fn expect_classification(blob: &ArmoredBlob, expected: Classification) -> OperationResult<()> {
    let got = blob.classification();
    if got != expected {
        return Err(OperationError::BadArmor { expected, got });
    }
    Ok(())
}
