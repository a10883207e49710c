//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success (the point was rendered)
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: flow error (no surface, fetch failure, compile or link failure)
//! - 11: I/O error (reading the config file)
//! - 12: input error (bad config JSON or empty identifiers)
//! - 13: serialization error

use point_demo_core::{DemoError, FetchError};
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// The demo flow ended in `Failed`.
    Flow(DemoError),
    /// An I/O error outside the flow.
    Io(String),
    /// A user input error.
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Flow(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Flow(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<DemoError> for CliError {
    fn from(e: DemoError) -> Self {
        match e {
            DemoError::Config(e) => CliError::Input(e.to_string()),
            DemoError::Fetch(FetchError::Unresolved(locator)) => CliError::Input(format!(
                "element locator {locator} needs a document; use a path instead"
            )),
            other => CliError::Flow(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
