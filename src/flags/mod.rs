//! Flag resolution.
//!
//! Folds everything the command-line parser produced into one frozen,
//! case-insensitive [`Flags`] bag. Per-flag precedence, highest first:
//! explicit command-line or environment input, the `config` section of the
//! user's profiles file, the parameter's built-in default.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::cli::params;
use crate::config::profile::{read_user_config, UserConfig};
use crate::error::FlagsError;

mod context;
mod value;

pub use context::{Param, ParamContext, ParamSource};
pub use value::FlagValue;

/// Environment variable honoring the console do-not-track convention.
pub const DO_NOT_TRACK: &str = "DO_NOT_TRACK";

/// At most one of these may be explicitly supplied per invocation.
const EXCLUSIVE_WARN_FLAGS: [&str; 2] = ["WARN_ERROR", "WARN_ERROR_OPTIONS"];

/// Mutable accumulator for flag resolution; [`FlagsBuilder::freeze`]
/// produces the immutable [`Flags`].
#[derive(Debug, Default)]
pub struct FlagsBuilder {
    values: BTreeMap<String, FlagValue>,
    // Lower-cased names of parameters the parser filled in from their
    // built-in default. Only these are eligible for user-config overrides.
    assigned_from_default: BTreeSet<String>,
}

impl FlagsBuilder {
    pub fn new() -> Self {
        FlagsBuilder::default()
    }

    /// Record one parsed parameter. The first recording of a name wins;
    /// outer contexts never shadow inner ones.
    pub fn record(&mut self, name: &str, value: FlagValue, source: ParamSource) {
        let key = name.to_ascii_uppercase();
        if self.values.contains_key(&key) {
            return;
        }
        if source.is_default() {
            self.assigned_from_default.insert(name.to_ascii_lowercase());
        }
        self.values.insert(key, value);
    }

    /// Unconditionally set an injected flag.
    pub fn set(&mut self, name: &str, value: FlagValue) {
        self.values.insert(name.to_ascii_uppercase(), value);
    }

    fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(&name.to_ascii_uppercase())
    }

    /// Replace default-assigned values with their user-configuration
    /// counterparts. An overridden flag no longer counts as default-assigned.
    fn apply_user_config(&mut self, config: &UserConfig) {
        let candidates: Vec<String> = self.assigned_from_default.iter().cloned().collect();
        for name in candidates {
            if let Some(value) = config.get(&name) {
                debug!(flag = %name, "profile configuration overrides built-in default");
                self.values.insert(name.to_ascii_uppercase(), value);
                self.assigned_from_default.remove(&name);
            }
        }
    }

    /// Ensure at most one of `group` was explicitly supplied by the user.
    /// The error names the flag that came later in `group` order.
    fn assert_mutually_exclusive(&self, group: &[&str]) -> Result<(), FlagsError> {
        let mut set_flag: Option<&str> = None;
        for flag in group {
            let set_by_user = self.values.contains_key(&flag.to_ascii_uppercase())
                && !self.assigned_from_default.contains(&flag.to_ascii_lowercase());
            if set_by_user {
                if let Some(previous) = set_flag {
                    return Err(FlagsError::FlagConflict {
                        flag: flag.to_ascii_lowercase(),
                        other: previous.to_ascii_lowercase(),
                    });
                }
                set_flag = Some(flag);
            }
        }
        Ok(())
    }

    pub fn freeze(self) -> Flags {
        Flags {
            values: self.values,
        }
    }
}

/// The frozen flag set for one process invocation.
#[derive(Debug, Clone)]
pub struct Flags {
    values: BTreeMap<String, FlagValue>,
}

impl Flags {
    /// Resolve flags from a parsed-command context chain.
    ///
    /// `ctx` is the innermost context (the invoked subcommand when there is
    /// one); parent links lead back to the root command. When `user_config`
    /// is `None` and the chain produced a `PROFILES_DIR` value, the user
    /// configuration is loaded from that directory.
    pub fn from_context(
        ctx: &ParamContext,
        user_config: Option<&UserConfig>,
    ) -> Result<Self, FlagsError> {
        let mut builder = FlagsBuilder::new();

        let mut current = Some(ctx);
        while let Some(level) = current {
            for param in level.params() {
                builder.record(&param.name, param.value.clone(), param.source);
            }
            current = level.parent();
        }

        let loaded;
        let user_config = match user_config {
            Some(config) => Some(config),
            None => {
                loaded = builder
                    .get("PROFILES_DIR")
                    .and_then(FlagValue::as_path)
                    .map(Path::to_path_buf)
                    .and_then(|dir| read_user_config(&dir));
                loaded.as_ref()
            }
        };
        if let Some(config) = user_config {
            builder.apply_user_config(config);
        }

        let which = ctx
            .invoked()
            .unwrap_or_else(|| ctx.command())
            .to_owned();
        builder.set("WHICH", FlagValue::from(which));
        // Worker processes are always spawned fresh; forking once the
        // runtime is up is not fork-safe.
        builder.set("WORKER_START_METHOD", FlagValue::from("spawn"));
        builder.set(
            "ANONYMOUS_USAGE_STATS",
            FlagValue::Bool(!opted_out_of_tracking(
                std::env::var(DO_NOT_TRACK).ok().as_deref(),
            )),
        );

        builder.assert_mutually_exclusive(&EXCLUSIVE_WARN_FLAGS)?;

        Ok(builder.freeze())
    }

    /// Case-insensitive lookup: `use_colors` and `USE_COLORS` name the same
    /// flag.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(&name.to_ascii_uppercase())
    }

    /// [`Flags::get`], falling back to the parameter table's declared
    /// default for names this invocation never produced.
    pub fn lookup(&self, name: &str) -> Result<FlagValue, FlagsError> {
        if let Some(value) = self.get(name) {
            return Ok(value.clone());
        }
        params::declared_default(name)
            .ok_or_else(|| FlagsError::UnknownFlag(name.to_ascii_lowercase()))
    }

    /// Name of the active subcommand.
    pub fn which(&self) -> &str {
        self.get("WHICH").and_then(FlagValue::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.values) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "{:#?}", self.values),
        }
    }
}

/// Accepted truthy spellings for the do-not-track opt-out.
fn opted_out_of_tracking(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "t" | "true" | "y" | "yes")
    )
}
