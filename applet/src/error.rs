use std::path::PathBuf;

use thiserror::Error;

use crate::controller::Phase;

/// Failures loading the jackd startup command. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please create the file {}\nand make sure it contains your jackd startup line", .path.display())]
    Missing { path: PathBuf },

    #[error("{} is empty; its first line must be your jackd startup command", .path.display())]
    Empty { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The host could not answer a process-table query.
#[derive(Debug, Error)]
pub enum ProcessQueryError {
    #[error("process table unavailable: {0}")]
    Unavailable(String),
}

/// A start or stop request that does not fit the controller's current phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("cannot {op} jackd while {phase:?}")]
    InvalidPhase { op: &'static str, phase: Phase },
}
