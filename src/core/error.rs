//! Error taxonomy for orchestrator operations.
//!
//! Every failure an operation can report maps onto one [`OperationError`]
//! variant. Messages are stable and never include passphrases, key text or
//! the engine's own error text; the engine cause stays reachable through
//! [`std::error::Error::source`] for diagnostics only.

use crate::core::pipeline::Stage;
use crate::model::{Classification, KeyRole};

/// Outcome of every orchestrator operation.
pub type OperationResult<T> = Result<T, OperationError>;

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The message field was blank.
    #[error("Message is empty")]
    EmptyMessage,

    /// No key was supplied for the role the operation needs.
    #[error("Add a {role} key first")]
    MissingKey { role: KeyRole },

    /// A key was selected but could not be read as text.
    #[error("Could not read the {role} key file")]
    KeyUnreadable {
        role: KeyRole,
        #[source]
        source: std::io::Error,
    },

    /// Name or email was blank when generating a key.
    #[error("Name and email are both required")]
    MissingIdentity,

    /// Input text is not the kind of armored block the operation needs.
    #[error("Expected {expected}, found {got}")]
    BadArmor {
        expected: Classification,
        got: Classification,
    },

    /// Key-info inspection was given something other than a key block.
    #[error(
        "This file does not look like an ASCII-armored OpenPGP key. \
         Please use a PGP key file (not an SSH .pub file)."
    )]
    NotAKey { got: Classification },

    /// The private key refused the supplied passphrase.
    #[error("Wrong passphrase for the private key")]
    WrongPassphrase,

    /// Any other failure inside the OpenPGP engine.
    #[error("OpenPGP operation failed while {stage}")]
    EngineFailure {
        stage: Stage,
        #[source]
        cause: anyhow::Error,
    },
}

impl OperationError {
    /// Stable machine-readable code for presenters and exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            OperationError::EmptyMessage => "EMPTY_MESSAGE",
            OperationError::MissingKey { .. } => "MISSING_KEY",
            OperationError::KeyUnreadable { .. } => "KEY_UNREADABLE",
            OperationError::MissingIdentity => "MISSING_IDENTITY",
            OperationError::BadArmor { .. } => "BAD_ARMOR",
            OperationError::NotAKey { .. } => "NOT_A_KEY",
            OperationError::WrongPassphrase => "WRONG_PASSPHRASE",
            OperationError::EngineFailure { .. } => "ENGINE_FAILURE",
        }
    }

    pub fn engine(stage: Stage, cause: anyhow::Error) -> Self {
        OperationError::EngineFailure { stage, cause }
    }
}
