//! Command-line interface for strata.
//!
//! The command tree is assembled from the parameter table in [`params`].
//! After parsing, every parameter is folded into a frozen [`Flags`] value
//! that the subcommand handlers consume.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{crate_version, ArgMatches, Command};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::FlagsError;
use crate::flags::{FlagValue, Flags, ParamContext};

mod build;
mod clean;
mod compile;
mod debug;
pub mod params;
mod plan;
mod run;
mod test;

/// Assemble the root command from the parameter table.
pub fn build_command() -> Command {
    Command::new("strata")
        .about("Pipeline runner with layered flag resolution")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(params::GLOBAL_PARAMS.iter().map(params::FlagSpec::to_arg))
        .subcommand(subcommand(
            "run",
            "Run the models of the active project",
            params::RUN_PARAMS,
        ))
        .subcommand(subcommand(
            "build",
            "Build the active project: models, tests, and snapshots",
            params::BUILD_PARAMS,
        ))
        .subcommand(subcommand(
            "compile",
            "Compile the active project without executing it",
            params::COMPILE_PARAMS,
        ))
        .subcommand(subcommand(
            "test",
            "Execute the tests of the active project",
            params::TEST_PARAMS,
        ))
        .subcommand(subcommand(
            "debug",
            "Show diagnostics for paths, profiles, and resolved flags",
            params::DEBUG_PARAMS,
        ))
        .subcommand(subcommand(
            "clean",
            "Remove the project's derived directories",
            params::CLEAN_PARAMS,
        ))
}

fn subcommand(name: &'static str, about: &'static str, specs: &'static [params::FlagSpec]) -> Command {
    Command::new(name)
        .about(about)
        .args(specs.iter().map(params::FlagSpec::to_arg))
}

/// Fold the parsed matches into a parent-linked context chain, returning the
/// innermost context.
fn build_context(matches: &ArgMatches) -> ParamContext {
    let mut root = ParamContext::new("strata");
    for param in params::collect_params(params::GLOBAL_PARAMS, matches) {
        root.push(param);
    }

    match matches.subcommand() {
        Some((name, sub_matches)) => {
            let mut sub = ParamContext::new(name);
            for param in params::collect_params(params::subcommand_params(name), sub_matches) {
                sub.push(param);
            }
            sub.with_parent(root.with_invoked_subcommand(name))
        }
        None => root,
    }
}

pub fn run() -> Result<()> {
    let matches = build_command().get_matches();
    let ctx = build_context(&matches);

    let flags = match Flags::from_context(&ctx, None) {
        Ok(flags) => flags,
        Err(err @ FlagsError::FlagConflict { .. }) => {
            build_command()
                .error(ErrorKind::ArgumentConflict, err.to_string())
                .exit()
        }
        Err(err) => return Err(err.into()),
    };

    init_tracing(&flags);

    match flags.which() {
        "run" => run::run(&flags),
        "build" => build::run(&flags),
        "compile" => compile::run(&flags),
        "test" => test::run(&flags),
        "debug" => debug::run(&flags),
        "clean" => clean::run(&flags),
        other => anyhow::bail!("unknown command: {other}"),
    }
}

/// Wire the resolved flags to the tracing subscriber.
///
/// `RUST_LOG` in the environment always takes precedence; `--debug` falls
/// back to DEBUG and `--quiet` to ERROR.
fn init_tracing(flags: &Flags) {
    let debug_enabled = bool_flag(flags, "DEBUG");
    let level = if debug_enabled {
        Level::DEBUG
    } else if bool_flag(flags, "QUIET") {
        Level::ERROR
    } else {
        Level::WARN
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let json = flags.get("LOG_FORMAT").and_then(FlagValue::as_str) == Some("json");
    if json {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    } else {
        let use_colors = flags
            .get("USE_COLORS")
            .and_then(FlagValue::as_bool)
            .unwrap_or(true);
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(use_colors).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    }
}

fn bool_flag(flags: &Flags, name: &str) -> bool {
    flags.get(name).and_then(FlagValue::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::ParamSource;

    #[test]
    fn test_command_tree_parses_global_then_subcommand() {
        let matches = build_command()
            .try_get_matches_from(["strata", "--printer-width", "100", "run", "--threads", "2"])
            .expect("parse");
        let ctx = build_context(&matches);

        assert_eq!(ctx.command(), "run");
        let threads = ctx.params().iter().find(|p| p.name == "threads").expect("param");
        assert_eq!(threads.value, FlagValue::Int(2));
        assert_eq!(threads.source, ParamSource::CommandLine);

        let root = ctx.parent().expect("root context");
        assert_eq!(root.command(), "strata");
        assert_eq!(root.invoked(), Some("run"));
        let width = root.params().iter().find(|p| p.name == "printer_width").expect("param");
        assert_eq!(width.value, FlagValue::Int(100));
    }

    #[test]
    fn test_command_tree_debug_assert() {
        build_command().debug_assert();
    }
}
