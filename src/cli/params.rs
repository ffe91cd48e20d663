//! Central parameter table.
//!
//! Every option the CLI understands is declared here exactly once: its flag
//! name, its value kind, and a factory for the clap argument that parses it.
//! The command tree is assembled from these specs, parsed values are
//! extracted through them, and [`declared_default`] answers default-value
//! questions for names an invocation never produced.

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};

use crate::flags::{FlagValue, Param, ParamSource};

/// Value kind a parameter is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    Int,
    Str,
    Path,
    Strs,
}

/// One declared parameter.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub name: &'static str,
    pub kind: FlagKind,
    arg: fn() -> Arg,
}

impl FlagSpec {
    /// Build the clap argument for this parameter.
    pub fn to_arg(&self) -> Arg {
        (self.arg)()
    }
}

const PROFILES_DIR: FlagSpec = FlagSpec {
    name: "profiles_dir",
    kind: FlagKind::Path,
    arg: profiles_dir,
};
const PROJECT_DIR: FlagSpec = FlagSpec {
    name: "project_dir",
    kind: FlagKind::Path,
    arg: project_dir,
};
const TARGET_PATH: FlagSpec = FlagSpec {
    name: "target_path",
    kind: FlagKind::Path,
    arg: target_path,
};
const LOG_PATH: FlagSpec = FlagSpec {
    name: "log_path",
    kind: FlagKind::Path,
    arg: log_path,
};
const LOG_FORMAT: FlagSpec = FlagSpec {
    name: "log_format",
    kind: FlagKind::Str,
    arg: log_format,
};
const USE_COLORS: FlagSpec = FlagSpec {
    name: "use_colors",
    kind: FlagKind::Bool,
    arg: use_colors,
};
const PRINTER_WIDTH: FlagSpec = FlagSpec {
    name: "printer_width",
    kind: FlagKind::Int,
    arg: printer_width,
};
const VERSION_CHECK: FlagSpec = FlagSpec {
    name: "version_check",
    kind: FlagKind::Bool,
    arg: version_check,
};
const PARTIAL_PARSE: FlagSpec = FlagSpec {
    name: "partial_parse",
    kind: FlagKind::Bool,
    arg: partial_parse,
};
const STATIC_PARSER: FlagSpec = FlagSpec {
    name: "static_parser",
    kind: FlagKind::Bool,
    arg: static_parser,
};
const FAIL_FAST: FlagSpec = FlagSpec {
    name: "fail_fast",
    kind: FlagKind::Bool,
    arg: fail_fast,
};
const QUIET: FlagSpec = FlagSpec {
    name: "quiet",
    kind: FlagKind::Bool,
    arg: quiet,
};
const DEBUG: FlagSpec = FlagSpec {
    name: "debug",
    kind: FlagKind::Bool,
    arg: debug,
};
const WARN_ERROR: FlagSpec = FlagSpec {
    name: "warn_error",
    kind: FlagKind::Bool,
    arg: warn_error,
};
const WARN_ERROR_OPTIONS: FlagSpec = FlagSpec {
    name: "warn_error_options",
    kind: FlagKind::Str,
    arg: warn_error_options,
};

const SELECT: FlagSpec = FlagSpec {
    name: "select",
    kind: FlagKind::Strs,
    arg: select,
};
const EXCLUDE: FlagSpec = FlagSpec {
    name: "exclude",
    kind: FlagKind::Strs,
    arg: exclude,
};
const THREADS: FlagSpec = FlagSpec {
    name: "threads",
    kind: FlagKind::Int,
    arg: threads,
};
const FULL_REFRESH: FlagSpec = FlagSpec {
    name: "full_refresh",
    kind: FlagKind::Bool,
    arg: full_refresh,
};
const INDIRECT_SELECTION: FlagSpec = FlagSpec {
    name: "indirect_selection",
    kind: FlagKind::Str,
    arg: indirect_selection,
};
const CONFIG_DIR: FlagSpec = FlagSpec {
    name: "config_dir",
    kind: FlagKind::Bool,
    arg: config_dir,
};

/// Options declared on the root command.
pub static GLOBAL_PARAMS: &[FlagSpec] = &[
    PROFILES_DIR,
    PROJECT_DIR,
    TARGET_PATH,
    LOG_PATH,
    LOG_FORMAT,
    USE_COLORS,
    PRINTER_WIDTH,
    VERSION_CHECK,
    PARTIAL_PARSE,
    STATIC_PARSER,
    FAIL_FAST,
    QUIET,
    DEBUG,
    WARN_ERROR,
    WARN_ERROR_OPTIONS,
];

pub static RUN_PARAMS: &[FlagSpec] = &[SELECT, EXCLUDE, THREADS, FULL_REFRESH];
pub static BUILD_PARAMS: &[FlagSpec] = &[SELECT, EXCLUDE, THREADS, FULL_REFRESH];
pub static COMPILE_PARAMS: &[FlagSpec] = &[SELECT, EXCLUDE, THREADS];
pub static TEST_PARAMS: &[FlagSpec] = &[SELECT, EXCLUDE, THREADS, INDIRECT_SELECTION];
pub static DEBUG_PARAMS: &[FlagSpec] = &[CONFIG_DIR];
pub static CLEAN_PARAMS: &[FlagSpec] = &[];

/// Specs for a subcommand by name; unknown names have no parameters.
pub fn subcommand_params(name: &str) -> &'static [FlagSpec] {
    match name {
        "run" => RUN_PARAMS,
        "build" => BUILD_PARAMS,
        "compile" => COMPILE_PARAMS,
        "test" => TEST_PARAMS,
        "debug" => DEBUG_PARAMS,
        "clean" => CLEAN_PARAMS,
        _ => &[],
    }
}

/// `~/.strata`, falling back to a relative `.strata` when no home directory
/// can be determined.
pub fn default_profiles_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".strata"))
        .unwrap_or_else(|| PathBuf::from(".strata"))
}

fn profiles_dir() -> Arg {
    Arg::new("profiles_dir")
        .long("profiles-dir")
        .env("STRATA_PROFILES_DIR")
        .value_name("DIR")
        .help("Directory holding the profiles file")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value(default_profiles_dir().into_os_string())
        .num_args(1)
}

fn project_dir() -> Arg {
    Arg::new("project_dir")
        .long("project-dir")
        .value_name("DIR")
        .help("Root of the project to operate on")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value(".")
        .num_args(1)
}

fn target_path() -> Arg {
    Arg::new("target_path")
        .long("target-path")
        .value_name("DIR")
        .help("Directory for build artifacts, relative to the project root")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value("target")
        .num_args(1)
}

fn log_path() -> Arg {
    Arg::new("log_path")
        .long("log-path")
        .value_name("DIR")
        .help("Directory for log files, relative to the project root")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value("logs")
        .num_args(1)
}

fn log_format() -> Arg {
    Arg::new("log_format")
        .long("log-format")
        .value_name("FORMAT")
        .help("Log output format")
        .value_parser(["text", "json"])
        .default_value("text")
        .num_args(1)
}

fn use_colors() -> Arg {
    Arg::new("use_colors")
        .long("use-colors")
        .value_name("BOOL")
        .help("Colorize terminal output")
        .value_parser(clap::value_parser!(bool))
        .default_value("true")
        .num_args(1)
}

fn printer_width() -> Arg {
    Arg::new("printer_width")
        .long("printer-width")
        .value_name("WIDTH")
        .help("Width of printed console output")
        .value_parser(clap::value_parser!(i64))
        .default_value("80")
        .num_args(1)
}

fn version_check() -> Arg {
    Arg::new("version_check")
        .long("version-check")
        .value_name("BOOL")
        .help("Verify the installed version against the project's requirement")
        .value_parser(clap::value_parser!(bool))
        .default_value("true")
        .num_args(1)
}

fn partial_parse() -> Arg {
    Arg::new("partial_parse")
        .long("partial-parse")
        .value_name("BOOL")
        .help("Reuse the parse result of the previous invocation when possible")
        .value_parser(clap::value_parser!(bool))
        .default_value("true")
        .num_args(1)
}

fn static_parser() -> Arg {
    Arg::new("static_parser")
        .long("static-parser")
        .value_name("BOOL")
        .help("Use static analysis to parse models where possible")
        .value_parser(clap::value_parser!(bool))
        .default_value("true")
        .num_args(1)
}

fn fail_fast() -> Arg {
    Arg::new("fail_fast")
        .long("fail-fast")
        .short('x')
        .help("Stop at the first failure")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

fn quiet() -> Arg {
    Arg::new("quiet")
        .long("quiet")
        .short('q')
        .help("Only show error logs")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

fn debug() -> Arg {
    Arg::new("debug")
        .long("debug")
        .short('d')
        .help("Show debug logs")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

fn warn_error() -> Arg {
    Arg::new("warn_error")
        .long("warn-error")
        .help("Treat every warning as an error")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

fn warn_error_options() -> Arg {
    Arg::new("warn_error_options")
        .long("warn-error-options")
        .value_name("JSON")
        .help("Fine-grained include/exclude rules for warnings treated as errors")
        .value_parser(clap::value_parser!(String))
        .default_value("{}")
        .num_args(1)
}

fn select() -> Arg {
    Arg::new("select")
        .long("select")
        .short('s')
        .value_name("SELECTOR")
        .help("Only operate on these nodes (comma-separated or repeated)")
        .value_parser(clap::value_parser!(String))
        .value_delimiter(',')
        .action(ArgAction::Append)
}

fn exclude() -> Arg {
    Arg::new("exclude")
        .long("exclude")
        .value_name("SELECTOR")
        .help("Skip these nodes (comma-separated or repeated)")
        .value_parser(clap::value_parser!(String))
        .value_delimiter(',')
        .action(ArgAction::Append)
}

fn threads() -> Arg {
    Arg::new("threads")
        .long("threads")
        .value_name("N")
        .help("Number of worker threads")
        .value_parser(clap::value_parser!(i64))
        .default_value("4")
        .num_args(1)
}

fn full_refresh() -> Arg {
    Arg::new("full_refresh")
        .long("full-refresh")
        .short('f')
        .help("Rebuild incremental models from scratch")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

fn indirect_selection() -> Arg {
    Arg::new("indirect_selection")
        .long("indirect-selection")
        .value_name("MODE")
        .help("How tests attached to selected nodes are picked up")
        .value_parser(["eager", "cautious"])
        .default_value("eager")
        .num_args(1)
}

fn config_dir() -> Arg {
    Arg::new("config_dir")
        .long("config-dir")
        .help("Print the profiles directory and exit")
        .action(ArgAction::SetTrue)
        .default_value("false")
}

/// Extract the parameters of one command level from its parsed matches.
pub fn collect_params(specs: &[FlagSpec], matches: &ArgMatches) -> Vec<Param> {
    specs
        .iter()
        .map(|spec| Param::new(spec.name, extract(spec, matches), source_of(spec, matches)))
        .collect()
}

fn source_of(spec: &FlagSpec, matches: &ArgMatches) -> ParamSource {
    match matches.value_source(spec.name) {
        Some(ValueSource::CommandLine) => ParamSource::CommandLine,
        Some(ValueSource::EnvVariable) => ParamSource::Environment,
        // Absent list-valued parameters report no source at all; they count
        // as default-assigned like everything else the user never typed.
        _ => ParamSource::Default,
    }
}

fn extract(spec: &FlagSpec, matches: &ArgMatches) -> FlagValue {
    match spec.kind {
        FlagKind::Bool => {
            FlagValue::Bool(matches.get_one::<bool>(spec.name).copied().unwrap_or(false))
        }
        FlagKind::Int => FlagValue::Int(matches.get_one::<i64>(spec.name).copied().unwrap_or(0)),
        FlagKind::Str => FlagValue::Str(
            matches
                .get_one::<String>(spec.name)
                .cloned()
                .unwrap_or_default(),
        ),
        FlagKind::Path => FlagValue::Path(
            matches
                .get_one::<PathBuf>(spec.name)
                .cloned()
                .unwrap_or_default(),
        ),
        FlagKind::Strs => FlagValue::Strs(
            matches
                .get_many::<String>(spec.name)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        ),
    }
}

/// The registry's declared default for a flag name, converted through the
/// declared kind. `None` when no parameter of that name exists.
pub fn declared_default(name: &str) -> Option<FlagValue> {
    let lower = name.to_ascii_lowercase();
    let spec = all_params().find(|spec| spec.name == lower)?;
    let arg = spec.to_arg();
    let defaults: Vec<String> = arg
        .get_default_values()
        .iter()
        .filter_map(|value| value.to_str())
        .map(str::to_owned)
        .collect();

    match spec.kind {
        FlagKind::Strs => Some(FlagValue::Strs(defaults)),
        _ => convert_default(spec.kind, &defaults.into_iter().next()?),
    }
}

fn convert_default(kind: FlagKind, raw: &str) -> Option<FlagValue> {
    match kind {
        FlagKind::Bool => raw.parse::<bool>().ok().map(FlagValue::Bool),
        FlagKind::Int => raw.parse::<i64>().ok().map(FlagValue::Int),
        FlagKind::Str => Some(FlagValue::Str(raw.to_owned())),
        FlagKind::Path => Some(FlagValue::Path(PathBuf::from(raw))),
        FlagKind::Strs => Some(FlagValue::Strs(vec![raw.to_owned()])),
    }
}

fn all_params() -> impl Iterator<Item = &'static FlagSpec> {
    GLOBAL_PARAMS
        .iter()
        .chain(RUN_PARAMS)
        .chain(BUILD_PARAMS)
        .chain(COMPILE_PARAMS)
        .chain(TEST_PARAMS)
        .chain(DEBUG_PARAMS)
        .chain(CLEAN_PARAMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_from(specs: &'static [FlagSpec]) -> clap::Command {
        clap::Command::new("strata").args(specs.iter().map(FlagSpec::to_arg))
    }

    #[test]
    fn test_every_param_declares_a_default() {
        for spec in all_params() {
            let default = declared_default(spec.name);
            assert!(default.is_some(), "{} has no declared default", spec.name);
        }
    }

    #[test]
    fn test_declared_defaults_convert_to_declared_kind() {
        assert_eq!(declared_default("printer_width"), Some(FlagValue::Int(80)));
        assert_eq!(declared_default("use_colors"), Some(FlagValue::Bool(true)));
        assert_eq!(declared_default("warn_error"), Some(FlagValue::Bool(false)));
        assert_eq!(
            declared_default("log_format"),
            Some(FlagValue::Str("text".to_owned()))
        );
        assert_eq!(
            declared_default("log_path"),
            Some(FlagValue::Path(PathBuf::from("logs")))
        );
        assert_eq!(declared_default("select"), Some(FlagValue::Strs(Vec::new())));
    }

    #[test]
    fn test_declared_default_is_case_insensitive() {
        assert_eq!(declared_default("PRINTER_WIDTH"), declared_default("printer_width"));
    }

    #[test]
    fn test_declared_default_unknown_name() {
        assert_eq!(declared_default("no_such_param"), None);
    }

    #[test]
    fn test_collect_params_classifies_sources() {
        let matches = command_from(GLOBAL_PARAMS)
            .try_get_matches_from(["strata", "--printer-width", "100"])
            .expect("parse");
        let params = collect_params(GLOBAL_PARAMS, &matches);

        let width = params.iter().find(|p| p.name == "printer_width").expect("param");
        assert_eq!(width.value, FlagValue::Int(100));
        assert_eq!(width.source, ParamSource::CommandLine);

        let quiet = params.iter().find(|p| p.name == "quiet").expect("param");
        assert_eq!(quiet.value, FlagValue::Bool(false));
        assert_eq!(quiet.source, ParamSource::Default);
    }

    #[test]
    fn test_collect_params_splits_comma_separated_selectors() {
        let matches = command_from(RUN_PARAMS)
            .try_get_matches_from(["strata", "--select", "a,b", "--select", "c"])
            .expect("parse");
        let params = collect_params(RUN_PARAMS, &matches);

        let select = params.iter().find(|p| p.name == "select").expect("param");
        assert_eq!(
            select.value,
            FlagValue::Strs(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
        assert_eq!(select.source, ParamSource::CommandLine);
    }

    #[test]
    fn test_absent_selector_collects_as_empty_default() {
        let matches = command_from(RUN_PARAMS)
            .try_get_matches_from(["strata"])
            .expect("parse");
        let params = collect_params(RUN_PARAMS, &matches);

        let exclude = params.iter().find(|p| p.name == "exclude").expect("param");
        assert_eq!(exclude.value, FlagValue::Strs(Vec::new()));
        assert_eq!(exclude.source, ParamSource::Default);
    }
}
