//! Resolved flag values.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A single resolved flag value.
///
/// Values keep the kind their parameter was declared with; the accessors
/// return `None` on a kind mismatch instead of coercing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Path(PathBuf),
    Strs(Vec<String>),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FlagValue::Path(value) => Some(value.as_path()),
            _ => None,
        }
    }

    pub fn as_strs(&self) -> Option<&[String]> {
        match self {
            FlagValue::Strs(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(value) => write!(f, "{value}"),
            FlagValue::Int(value) => write!(f, "{value}"),
            FlagValue::Str(value) => f.write_str(value),
            FlagValue::Path(value) => write!(f, "{}", value.display()),
            FlagValue::Strs(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Str(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Str(value)
    }
}

impl From<PathBuf> for FlagValue {
    fn from(value: PathBuf) -> Self {
        FlagValue::Path(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(values: Vec<String>) -> Self {
        FlagValue::Strs(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_kind() {
        assert_eq!(FlagValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FlagValue::Int(80).as_int(), Some(80));
        assert_eq!(FlagValue::from("text").as_str(), Some("text"));
        assert_eq!(
            FlagValue::from(PathBuf::from("logs")).as_path(),
            Some(Path::new("logs"))
        );
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        assert_eq!(FlagValue::Bool(true).as_int(), None);
        assert_eq!(FlagValue::Int(80).as_str(), None);
        assert_eq!(FlagValue::from("text").as_bool(), None);
    }

    #[test]
    fn test_display_joins_lists() {
        let value = FlagValue::from(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(value.to_string(), "a,b");
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&FlagValue::Int(80)).expect("serialize");
        assert_eq!(json, "80");
        let json = serde_json::to_string(&FlagValue::Bool(false)).expect("serialize");
        assert_eq!(json, "false");
    }
}
