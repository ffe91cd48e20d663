//! User configuration loading.
//!
//! The profiles directory may hold a profiles file whose `config` section
//! carries per-user defaults. Those values sit between explicit command-line
//! input and built-in defaults in the flag precedence order.

pub mod profile;

pub use profile::{read_user_config, UserConfig};
