//! Error types for flag resolution.

use thiserror::Error;

/// Errors surfaced while resolving flags.
#[derive(Debug, Error)]
pub enum FlagsError {
    /// Two mutually exclusive flags were both supplied by the user. Rendered
    /// through the CLI's usage-error machinery so the message reaches the
    /// user the same way the parser's own errors do.
    #[error("{flag}: not allowed with argument {other}")]
    FlagConflict { flag: String, other: String },

    /// The requested name is not a declared parameter anywhere.
    #[error("no such flag: {0}")]
    UnknownFlag(String),
}
