//! Profiles-file loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::flags::FlagValue;

/// Candidate profiles file names, checked in order.
const PROFILE_FILES: [&str; 3] = ["profiles.yml", "profiles.yaml", "profiles.toml"];

/// Per-user defaults from the profiles file's `config` section.
///
/// Every field is optional; an absent field never overrides anything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub use_colors: Option<bool>,
    pub printer_width: Option<i64>,
    pub log_format: Option<String>,
    pub partial_parse: Option<bool>,
    pub static_parser: Option<bool>,
    pub version_check: Option<bool>,
    pub fail_fast: Option<bool>,
    pub warn_error: Option<bool>,
    pub threads: Option<i64>,
    pub indirect_selection: Option<String>,
}

impl UserConfig {
    /// Configured value for a lower-cased flag name.
    pub fn get(&self, name: &str) -> Option<FlagValue> {
        match name {
            "use_colors" => self.use_colors.map(FlagValue::Bool),
            "printer_width" => self.printer_width.map(FlagValue::Int),
            "log_format" => self.log_format.clone().map(FlagValue::Str),
            "partial_parse" => self.partial_parse.map(FlagValue::Bool),
            "static_parser" => self.static_parser.map(FlagValue::Bool),
            "version_check" => self.version_check.map(FlagValue::Bool),
            "fail_fast" => self.fail_fast.map(FlagValue::Bool),
            "warn_error" => self.warn_error.map(FlagValue::Bool),
            "threads" => self.threads.map(FlagValue::Int),
            "indirect_selection" => self.indirect_selection.clone().map(FlagValue::Str),
            _ => None,
        }
    }
}

/// First existing profiles file in `dir`.
pub fn find_profiles_file(dir: &Path) -> Option<PathBuf> {
    PROFILE_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load the `config` section of the profiles file in `dir`.
///
/// A missing file yields `None`. An unreadable or unparsable file is logged
/// as a warning and also yields `None`, so a broken profile never blocks the
/// invocation.
pub fn read_user_config(dir: &Path) -> Option<UserConfig> {
    let file = find_profiles_file(dir)?;
    match parse_profiles_file(&file) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("failed to load user config from {}: {err:#}", file.display());
            None
        }
    }
}

fn parse_profiles_file(path: &Path) -> Result<UserConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_profiles(&content, path),
        _ => parse_yaml_profiles(&content, path),
    }
}

fn parse_yaml_profiles(content: &str, path: &Path) -> Result<UserConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("invalid YAML syntax: {}", path.display()))?;

    // A profiles file without a config section is valid; it just configures
    // nothing.
    let Some(section) = raw.get("config") else {
        return Ok(UserConfig::default());
    };
    serde_yaml::from_value(section.clone())
        .with_context(|| format!("invalid config section: {}", path.display()))
}

fn parse_toml_profiles(content: &str, path: &Path) -> Result<UserConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("invalid TOML syntax: {}", path.display()))?;

    let Some(section) = raw.get("config") else {
        return Ok(UserConfig::default());
    };
    section
        .clone()
        .try_into()
        .with_context(|| format!("invalid config section: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_none() {
        let tmp = TempDir::new().expect("tmp");
        assert_eq!(read_user_config(tmp.path()), None);
    }

    #[test]
    fn test_yaml_config_section_parses() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("profiles.yml"),
            "config:\n  printer_width: 120\n  use_colors: false\n  threads: 8\n",
        )
        .expect("write");

        let config = read_user_config(tmp.path()).expect("config");
        assert_eq!(config.printer_width, Some(120));
        assert_eq!(config.use_colors, Some(false));
        assert_eq!(config.threads, Some(8));
        assert_eq!(config.warn_error, None);
    }

    #[test]
    fn test_yaml_without_config_section_is_empty() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("profiles.yml"),
            "default:\n  target: dev\n",
        )
        .expect("write");

        let config = read_user_config(tmp.path()).expect("config");
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_invalid_yaml_soft_fails() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("profiles.yml"), "config: [unclosed\n").expect("write");
        assert_eq!(read_user_config(tmp.path()), None);
    }

    #[test]
    fn test_invalid_field_type_soft_fails() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("profiles.yml"),
            "config:\n  printer_width: wide\n",
        )
        .expect("write");
        assert_eq!(read_user_config(tmp.path()), None);
    }

    #[test]
    fn test_toml_profiles_parse() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("profiles.toml"),
            "[config]\nprinter_width = 100\nfail_fast = true\n",
        )
        .expect("write");

        let config = read_user_config(tmp.path()).expect("config");
        assert_eq!(config.printer_width, Some(100));
        assert_eq!(config.fail_fast, Some(true));
    }

    #[test]
    fn test_yml_preferred_over_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("profiles.yml"),
            "config:\n  printer_width: 111\n",
        )
        .expect("write");
        fs::write(
            tmp.path().join("profiles.toml"),
            "[config]\nprinter_width = 222\n",
        )
        .expect("write");

        let config = read_user_config(tmp.path()).expect("config");
        assert_eq!(config.printer_width, Some(111));
    }

    #[test]
    fn test_get_maps_names_to_values() {
        let config = UserConfig {
            printer_width: Some(120),
            log_format: Some("json".to_owned()),
            ..UserConfig::default()
        };
        assert_eq!(config.get("printer_width"), Some(FlagValue::Int(120)));
        assert_eq!(config.get("log_format"), Some(FlagValue::from("json")));
        assert_eq!(config.get("use_colors"), None);
        assert_eq!(config.get("unknown"), None);
    }
}
