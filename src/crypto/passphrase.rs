//! Single-use passphrase handling.
//!
//! A passphrase is pulled out of its origin exactly once through
//! [`PassphraseHandle::take`]. Every [`PassphraseSource`] clears its origin in
//! the same call that reads it, so the secret is gone from the field, the
//! environment or the terminal buffer before any key work starts.

use std::fmt;
use std::io::{self, Write};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Errors that can occur while acquiring a passphrase.
#[derive(Debug, thiserror::Error)]
pub enum PassphraseError {
    /// The source had already given up its value.
    #[error("Passphrase was already taken from this source")]
    AlreadyTaken,

    /// The configured environment variable is not set.
    #[error("Environment variable {0} is not set")]
    NotSet(String),

    /// The configured environment variable is set but empty.
    #[error("Passphrase in {0} is empty")]
    Empty(String),

    /// Interactive input was aborted.
    #[error("Passphrase input cancelled")]
    Cancelled,

    #[error("Failed to read passphrase: {0}")]
    Io(#[from] io::Error),
}

/// Secret phrase that unlocks a private key.
///
/// Zeroized on drop. Deliberately not `Clone`: a passphrase moves from its
/// source into the single unlock call it serves.
#[derive(ZeroizeOnDrop)]
pub struct Passphrase {
    passphrase: String,
}

impl Passphrase {
    pub fn new(passphrase: String) -> Self {
        Self { passphrase }
    }

    pub fn as_str(&self) -> &str {
        &self.passphrase
    }

    pub fn is_empty(&self) -> bool {
        self.passphrase.is_empty()
    }
}

impl From<Zeroizing<String>> for Passphrase {
    fn from(mut secret: Zeroizing<String>) -> Self {
        // Moves the buffer out; the wrapper is left holding an empty string.
        Self::new(std::mem::take(&mut *secret))
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Somewhere a passphrase can be read from once.
pub trait PassphraseSource {
    /// Read the secret and clear it at its origin before returning.
    fn take_secret(&mut self) -> Result<Zeroizing<String>, PassphraseError>;
}

/// Entry point for acquiring a passphrase from any source.
pub struct PassphraseHandle;

impl PassphraseHandle {
    /// Consume the passphrase from `source`, leaving the source empty.
    pub fn take<S>(source: &mut S) -> Result<Passphrase, PassphraseError>
    where
        S: PassphraseSource + ?Sized,
    {
        let secret = source.take_secret()?;
        log::debug!("Passphrase taken ({} chars)", secret.chars().count());
        Ok(Passphrase::from(secret))
    }
}

/// In-memory single-use field, the counterpart of a form's passphrase input.
#[derive(Default)]
pub struct PassphraseField {
    value: Option<String>,
}

impl PassphraseField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// True once the value has been taken.
    pub fn is_cleared(&self) -> bool {
        self.value.is_none()
    }
}

impl PassphraseSource for PassphraseField {
    fn take_secret(&mut self) -> Result<Zeroizing<String>, PassphraseError> {
        self.value
            .take()
            .map(Zeroizing::new)
            .ok_or(PassphraseError::AlreadyTaken)
    }
}

impl Drop for PassphraseField {
    fn drop(&mut self) {
        if let Some(value) = self.value.as_mut() {
            value.zeroize();
        }
    }
}

/// Passphrase from an environment variable, removed from the process
/// environment as soon as it is read.
pub struct EnvPassphrase {
    var: String,
}

impl EnvPassphrase {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn is_set(&self) -> bool {
        std::env::var_os(&self.var).is_some()
    }
}

impl PassphraseSource for EnvPassphrase {
    fn take_secret(&mut self) -> Result<Zeroizing<String>, PassphraseError> {
        let value = std::env::var(&self.var)
            .map(Zeroizing::new)
            .map_err(|_| PassphraseError::NotSet(self.var.clone()))?;
        std::env::remove_var(&self.var);

        if value.is_empty() {
            return Err(PassphraseError::Empty(self.var.clone()));
        }
        log::info!("Using passphrase from {} environment variable", self.var);
        Ok(value)
    }
}

/// Interactive hidden prompt on the terminal.
pub struct PromptPassphrase {
    prompt: String,
}

impl PromptPassphrase {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl PassphraseSource for PromptPassphrase {
    fn take_secret(&mut self) -> Result<Zeroizing<String>, PassphraseError> {
        eprint!("{}: ", self.prompt);
        io::stderr().flush()?;

        // rpassword disables terminal echo while reading.
        match rpassword::read_password() {
            Ok(value) => Ok(Zeroizing::new(value)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(PassphraseError::Cancelled),
            Err(e) => Err(PassphraseError::Io(e)),
        }
    }
}

/// Environment first, interactive prompt otherwise.
pub struct FallbackPassphrase {
    env: EnvPassphrase,
    prompt: PromptPassphrase,
}

impl FallbackPassphrase {
    pub fn new(env: EnvPassphrase, prompt: PromptPassphrase) -> Self {
        Self { env, prompt }
    }
}

impl PassphraseSource for FallbackPassphrase {
    fn take_secret(&mut self) -> Result<Zeroizing<String>, PassphraseError> {
        if self.env.is_set() {
            return self.env.take_secret();
        }
        self.prompt.take_secret()
    }
}
