//! Per-call progress tracking for orchestrator operations.
//!
//! Each call walks `Idle → Validating → KeyLoading → KeyParsing → (Unlocking)
//! → EngineCall` and always ends in a resolved state. Nothing here outlives the
//! call that created it.

use std::fmt;

use crate::core::error::OperationResult;

/// The five user-facing operations plus key inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Generate,
    InspectKey,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Generate => "generate",
            Operation::InspectKey => "inspect-key",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Validating,
    KeyLoading,
    KeyParsing,
    Unlocking,
    EngineCall,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating input",
            Stage::KeyLoading => "loading the key",
            Stage::KeyParsing => "parsing the key",
            Stage::Unlocking => "unlocking the private key",
            Stage::EngineCall => "running the OpenPGP engine",
        };
        f.write_str(name)
    }
}

/// Tracks one call's position in the stage sequence.
#[derive(Debug)]
pub struct Pipeline {
    operation: Operation,
    stage: Stage,
}

impl Pipeline {
    pub fn start(operation: Operation) -> Self {
        log::debug!("{}: {}", operation, Stage::Idle);
        Self {
            operation,
            stage: Stage::Idle,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move forward to `stage`. Stages never go backwards within a call.
    pub fn enter(&mut self, stage: Stage) -> Stage {
        debug_assert!(
            stage >= self.stage,
            "{} cannot go from {:?} back to {:?}",
            self.operation,
            self.stage,
            stage
        );
        if stage != self.stage {
            log::debug!("{}: {}", self.operation, stage);
            self.stage = stage;
        }
        stage
    }

    /// Terminal transition. Logs the outcome and hands the result back unchanged.
    pub fn resolve<T>(self, result: OperationResult<T>) -> OperationResult<T> {
        match &result {
            Ok(_) => log::info!("{} succeeded", self.operation),
            Err(e) => {
                log::warn!(
                    "{} failed while {} [{}]: {}",
                    self.operation,
                    self.stage,
                    e.code(),
                    e
                );
                if let Some(cause) = std::error::Error::source(e) {
                    log::debug!("{} failure cause: {}", self.operation, cause);
                }
            }
        }
        result
    }
}
