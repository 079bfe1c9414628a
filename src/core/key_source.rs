//! Where armored key text comes from.
//!
//! A [`KeySource`] only retrieves text. It never parses or classifies what it
//! returns; that is left to the orchestrator's armor gate.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::{OperationError, OperationResult};
use crate::model::{ArmoredBlob, KeyRole};

/// Provider of armored key text for a given role.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the key text for `role`, or fail with `MissingKey` when none is configured.
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob>;
}

#[async_trait]
impl<T: KeySource + ?Sized> KeySource for Arc<T> {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        (**self).fetch(role).await
    }
}

#[async_trait]
impl<T: KeySource + ?Sized> KeySource for Box<T> {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        (**self).fetch(role).await
    }
}

/// The key file picked by the user, if any.
#[derive(Debug, Clone, Default)]
pub struct SelectedFile {
    path: Option<PathBuf>,
}

impl SelectedFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }
}

#[async_trait]
impl KeySource for SelectedFile {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        let path = self
            .path
            .as_ref()
            .ok_or(OperationError::MissingKey { role })?;

        log::debug!("Reading {} key from {}", role, path.display());
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| OperationError::KeyUnreadable { role, source })?;

        Ok(ArmoredBlob::new(text))
    }
}

/// Key text pasted directly into a form.
#[derive(Debug, Clone, Default)]
pub struct PastedKey {
    text: Option<String>,
}

impl PastedKey {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeySource for PastedKey {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(ArmoredBlob::new(text)),
            _ => Err(OperationError::MissingKey { role }),
        }
    }
}

/// Routes each role to its own source, e.g. a public key file alongside a
/// pasted private key.
pub struct SplitKeySource {
    public: Box<dyn KeySource>,
    private: Box<dyn KeySource>,
}

impl SplitKeySource {
    pub fn new(public: impl KeySource + 'static, private: impl KeySource + 'static) -> Self {
        Self {
            public: Box::new(public),
            private: Box::new(private),
        }
    }
}

#[async_trait]
impl KeySource for SplitKeySource {
    async fn fetch(&self, role: KeyRole) -> OperationResult<ArmoredBlob> {
        match role {
            KeyRole::Public => self.public.fetch(role).await,
            KeyRole::Private => self.private.fetch(role).await,
        }
    }
}
