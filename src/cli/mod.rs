//! Command-line surface: argument parsing, key files and passphrase prompts

pub mod commands;
pub mod key_manager;

pub use commands::*;
pub use key_manager::KeyManager;
