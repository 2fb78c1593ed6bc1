//! Error types for scenesh.

use thiserror::Error;

/// Unified error type for all scenesh operations.
///
/// Command handlers surface failures as one of these variants; the session
/// error boundary renders them on the output stream instead of unwinding,
/// so a failed command never takes the shell down with it.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A path, node or attribute lookup found nothing. The payload is the
    /// full user-facing message, already phrased for display.
    #[error("{0}")]
    NotFound(String),

    /// Dispatch found no registered command under the first token.
    #[error("command not found: {0}")]
    UnknownCommand(String),

    /// A command was invoked with arguments it cannot work with.
    #[error("command error: {0}")]
    Command(String),

    /// An HTTP fetch or socket connection failed outside our control.
    #[error("transport error: {0}")]
    Transport(String),

    /// The host evaluation capability rejected or failed to run a snippet.
    #[error("eval error: {0}")]
    Eval(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ShellError>;
