//! PGP Workbench - form-style OpenPGP operations on ASCII-armored keys
//!
//! This crate wraps an OpenPGP engine behind a small orchestration layer that
//! validates and classifies armored input, handles single-use passphrases and
//! reports every failure through a stable error taxonomy.

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod model;
pub mod ui;

#[cfg(test)]
pub mod test_pgp;
#[cfg(test)]
pub mod test_utils;

// Re-export commonly used items for convenience
pub use crate::core::error::{OperationError, OperationResult};
pub use crate::core::orchestrator::Orchestrator;
pub use crate::crypto::pgp::{PgpEngine, RpgpEngine};
