//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: backdrop error (unknown field, bad dimensions, frame loop refused)
//! - 11: I/O error (scene file read, PNG write)
//! - 12: input error (bad JSON params or scene, bad --resize-at)
//! - 13: serialization error

use backdrop_core::BackdropError;
use thiserror::Error;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected by the backdrop itself: unknown field, bad dimensions.
    #[error(transparent)]
    Backdrop(BackdropError),
    /// Scene file could not be read or the snapshot could not be written.
    #[error("{0}")]
    Io(String),
    /// Bad flags: malformed params JSON, resize spec or color.
    #[error("{0}")]
    Input(String),
    /// The JSON report could not be produced.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Backdrop(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl From<BackdropError> for CliError {
    /// I/O, scene and color failures keep their own exit codes.
    fn from(e: BackdropError) -> Self {
        match e {
            BackdropError::Io(msg) => CliError::Io(msg),
            BackdropError::InvalidColor(msg) => CliError::Input(msg),
            e @ BackdropError::InvalidScene(_) => CliError::Input(e.to_string()),
            other => CliError::Backdrop(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
