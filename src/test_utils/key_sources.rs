//! Key source fixtures for orchestrator tests

use crate::core::error::{OperationError, OperationResult};
use crate::core::key_source::KeySource;
use crate::model::{ArmoredBlob, KeyRole};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// An OpenSSH public key line, the classic wrong-file mistake.
pub const SSH_PUBLIC_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIGq3e0lVvUu2QmL8yDFFzJ3Qk alice@laptop\n";

/// In-memory key source that counts how often it is asked for a key.
#[derive(Clone, Default)]
pub struct CountingKeySource {
    public: Option<String>,
    private: Option<String>,
    fetches: Arc<AtomicUsize>,
}

impl CountingKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public(mut self, text: impl Into<String>) -> Self {
        self.public = Some(text.into());
        self
    }

    pub fn with_private(mut self, text: impl Into<String>) -> Self {
        self.private = Some(text.into());
        self
    }

    /// Number of `fetch` calls so far, across clones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySource for CountingKeySource {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let text = match role {
            KeyRole::Public => self.public.as_ref(),
            KeyRole::Private => self.private.as_ref(),
        };
        text.map(|text| ArmoredBlob::new(text.as_str()))
            .ok_or(OperationError::MissingKey { role })
    }
}
