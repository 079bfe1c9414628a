//! Test utilities for the workbench
//!
//! - A recording mock of the OpenPGP engine
//! - In-memory key sources with call counting

#![cfg(test)]

pub mod key_sources;
pub mod mock_engine;

pub use key_sources::*;
pub use mock_engine::*;
