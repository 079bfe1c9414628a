//! Status lines and payload output

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::error::OperationError;
use crate::model::{GeneratedKeys, KeyInfo, Verification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("success"),
            Severity::Error => f.write_str("error"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// One human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub severity: Severity,
    pub text: String,
    /// Stable error code, present for failures.
    pub code: Option<&'static str>,
}

impl Status {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
            code: None,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
            code: None,
        }
    }

    /// Verification outcome. An invalid signature is reported as an error line
    /// even though the operation itself succeeded.
    pub fn verification(verification: &Verification) -> Self {
        match verification {
            Verification::Valid { signer_id } => {
                Self::success(format!("Valid message!\nHex: {}", signer_id))
            }
            Verification::NotValid => Self {
                severity: Severity::Error,
                text: "Signature is not valid.".to_string(),
                code: None,
            },
        }
    }

    pub fn key_info(info: &KeyInfo) -> Self {
        Self::info(format!("Loaded key fingerprint: {}", info.fingerprint))
    }
}

impl From<&OperationError> for Status {
    fn from(err: &OperationError) -> Self {
        Self {
            severity: Severity::Error,
            text: err.to_string(),
            code: Some(err.code()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.severity, self.code) {
            (Severity::Error, Some(code)) => write!(f, "error [{}]: {}", code, self.text),
            (Severity::Error, None) => write!(f, "{}", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

/// Renders operation outcomes.
pub trait ResultPresenter {
    /// Main textual result: ciphertext, plaintext or a signed message.
    fn show_payload(&mut self, payload: &str) -> io::Result<()>;

    fn show_status(&mut self, status: &Status) -> io::Result<()>;

    /// Both halves of a freshly generated key pair.
    fn show_key_pair(&mut self, keys: &GeneratedKeys) -> io::Result<()>;
}

/// Writes payloads to stdout (or files) and status lines to stderr.
pub struct ConsolePresenter<O, E> {
    out: O,
    err: E,
    output: Option<PathBuf>,
    public_out: Option<PathBuf>,
    private_out: Option<PathBuf>,
}

impl ConsolePresenter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsolePresenter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            output: None,
            public_out: None,
            private_out: None,
        }
    }

    /// Write payloads to `path` instead of the output stream.
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    /// Write generated keys to these files instead of the output stream.
    pub fn with_key_outputs(mut self, public: Option<PathBuf>, private: Option<PathBuf>) -> Self {
        self.public_out = public;
        self.private_out = private;
        self
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_text(&mut self, path: Option<&Path>, text: &str) -> io::Result<()> {
        match path {
            Some(path) => {
                std::fs::write(path, text)?;
                log::info!("Wrote {} bytes to {}", text.len(), path.display());
                Ok(())
            }
            None => {
                self.out.write_all(text.as_bytes())?;
                if !text.ends_with('\n') {
                    self.out.write_all(b"\n")?;
                }
                self.out.flush()
            }
        }
    }
}

impl<O: Write, E: Write> ResultPresenter for ConsolePresenter<O, E> {
    fn show_payload(&mut self, payload: &str) -> io::Result<()> {
        let path = self.output.clone();
        self.write_text(path.as_deref(), payload)
    }

    fn show_status(&mut self, status: &Status) -> io::Result<()> {
        writeln!(self.err, "{}", status)
    }

    fn show_key_pair(&mut self, keys: &GeneratedKeys) -> io::Result<()> {
        let public_out = self.public_out.clone();
        let private_out = self.private_out.clone();
        self.write_text(public_out.as_deref(), keys.public.text())?;
        self.write_text(private_out.as_deref(), keys.private.text())
    }
}
