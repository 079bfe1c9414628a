//! Cryptographic building blocks for the workbench
//!
//! This module provides:
//! - Single-use passphrase acquisition
//! - The OpenPGP engine capability and its rPGP implementation

pub mod passphrase;
pub mod pgp;

// Re-export main types
pub use passphrase::{Passphrase, PassphraseError, PassphraseHandle, PassphraseSource};
pub use pgp::{PgpEngine, RpgpEngine};
