//! Common test setup and utilities for integration tests
//!
//! Key generation is slow, so one RSA-2048 key pair is generated per test
//! binary and shared through a `OnceCell`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pgp_workbench::core::key_source::{SelectedFile, SplitKeySource};
use pgp_workbench::core::orchestrator::Orchestrator;
use pgp_workbench::crypto::passphrase::{Passphrase, PassphraseField, PassphraseHandle};
use pgp_workbench::crypto::pgp::RpgpEngine;
use tokio::sync::OnceCell;

pub const TEST_PASSPHRASE: &str = "integration-test-passphrase";
pub const TEST_KEY_BITS: u32 = 2048;

/// Armored halves of the shared test key pair.
pub struct TestKeys {
    pub public: String,
    pub private: String,
}

static TEST_KEYS: OnceCell<TestKeys> = OnceCell::const_new();

/// Initialize test logging (safe to call from every test)
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Take a passphrase the way the CLI does, through a single-use field.
pub fn passphrase(value: &str) -> Passphrase {
    let mut field = PassphraseField::new(value);
    PassphraseHandle::take(&mut field).expect("fresh field")
}

/// The shared key pair, generated on first use.
pub async fn test_keys() -> &'static TestKeys {
    TEST_KEYS
        .get_or_init(|| async {
            let orch = Orchestrator::new(RpgpEngine::new(), SelectedFile::default())
                .with_key_strength(TEST_KEY_BITS);
            let keys = orch
                .generate("Test User", "test@example.org", passphrase(TEST_PASSPHRASE))
                .await
                .expect("test key generation");
            TestKeys {
                public: keys.public.text().to_string(),
                private: keys.private.text().to_string(),
            }
        })
        .await
}

/// Write `text` into `dir/name` and return the path.
pub fn write_key_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write key file");
    path
}

/// Orchestrator reading keys from the given files, as the CLI sets it up.
pub fn file_orchestrator(
    public: Option<PathBuf>,
    private: Option<PathBuf>,
) -> Orchestrator<RpgpEngine, SplitKeySource> {
    let keys = SplitKeySource::new(SelectedFile::new(public), SelectedFile::new(private));
    Orchestrator::new(RpgpEngine::new(), keys).with_key_strength(TEST_KEY_BITS)
}

/// Orchestrator over key files for the shared key pair, living in `dir`.
pub async fn shared_orchestrator(dir: &Path) -> Orchestrator<RpgpEngine, SplitKeySource> {
    let keys = test_keys().await;
    let public = write_key_file(dir, "public.asc", &keys.public);
    let private = write_key_file(dir, "private.asc", &keys.private);
    file_orchestrator(Some(public), Some(private))
}
