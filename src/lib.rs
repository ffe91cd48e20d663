//! strata: pipeline runner with layered flag resolution.
//!
//! Every invocation folds the parsed command line, the user's profiles file,
//! and built-in defaults into one frozen, case-insensitive [`Flags`] value
//! that the rest of the program reads.
//!
//! # Flag precedence
//!
//! From highest to lowest priority:
//!
//! 1. Explicit command-line input (including values supplied through a
//!    parameter's environment variable)
//! 2. The `config` section of the user's profiles file
//!    (`~/.strata/profiles.yml` unless `--profiles-dir` says otherwise)
//! 3. The parameter's built-in default from the parameter table

pub mod cli;
pub mod config;
pub mod error;
pub mod flags;

pub use error::FlagsError;
pub use flags::{FlagValue, Flags, Param, ParamContext, ParamSource};
