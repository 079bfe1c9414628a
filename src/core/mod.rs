//! Core modules for the OpenPGP workbench
pub mod armor;
pub mod error;
pub mod key_source;
pub mod orchestrator;
pub mod pipeline;

pub use armor::ArmorClassifier;
pub use error::{OperationError, OperationResult};
pub use key_source::{KeySource, PastedKey, SelectedFile, SplitKeySource};
pub use orchestrator::Orchestrator;
pub use pipeline::{Operation, Stage};
