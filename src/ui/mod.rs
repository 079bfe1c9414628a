//! Presentation of operation outcomes.
//!
//! The orchestrator hands back an `OperationResult`; everything that turns it
//! into user-visible text lives here.

pub mod presenter;

pub use presenter::{ConsolePresenter, ResultPresenter, Severity, Status};
