//! Data passed between the orchestrator, its collaborators and the presenter.

pub mod blob;
pub mod key;

pub use blob::{ArmoredBlob, Classification};
pub use key::{GeneratedKeys, KeyInfo, KeyRole};

/// Result of checking a clear-signed message.
///
/// An invalid signature is an ordinary answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The signature checks out; carries the signing key id as hex.
    Valid { signer_id: String },
    /// The signature did not verify against the supplied key.
    NotValid,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }

    pub fn signer_id(&self) -> Option<&str> {
        match self {
            Verification::Valid { signer_id } => Some(signer_id),
            Verification::NotValid => None,
        }
    }
}
