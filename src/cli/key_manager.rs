//! CLI key handling - key file selection and passphrase prompting

use std::path::PathBuf;

use crate::config::Settings;
use crate::core::key_source::SelectedFile;
use crate::crypto::passphrase::{
    EnvPassphrase, FallbackPassphrase, Passphrase, PassphraseError, PassphraseHandle,
    PromptPassphrase,
};

/// Resolves keys and passphrases for a single CLI invocation.
pub struct KeyManager<'a> {
    settings: &'a Settings,
}

impl<'a> KeyManager<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// The key file given on the command line, if any.
    pub fn key_file(&self, path: Option<PathBuf>) -> SelectedFile {
        if let Some(path) = &path {
            log::debug!("Using key file {}", path.display());
        }
        SelectedFile::new(path)
    }

    /// Passphrase from the configured env var, or a hidden prompt when unset.
    ///
    /// Called only after all other inputs are read, right before the
    /// operation that consumes it.
    pub fn passphrase(&self, prompt: &str) -> Result<Passphrase, PassphraseError> {
        let mut source = FallbackPassphrase::new(
            EnvPassphrase::new(self.settings.passphrase_env.as_str()),
            PromptPassphrase::new(prompt),
        );
        PassphraseHandle::take(&mut source)
    }
}
