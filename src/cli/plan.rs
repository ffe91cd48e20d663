//! Effective execution settings shared by the project commands.

use crate::flags::{FlagValue, Flags};

/// Settings a project command actually runs with, resolved from the flag bag.
#[derive(Debug)]
pub struct ExecutionPlan {
    pub select: Vec<String>,
    pub exclude: Vec<String>,
    pub threads: i64,
    pub full_refresh: bool,
    pub fail_fast: bool,
}

impl ExecutionPlan {
    pub fn from_flags(flags: &Flags) -> Self {
        ExecutionPlan {
            select: strs(flags, "SELECT"),
            exclude: strs(flags, "EXCLUDE"),
            threads: flags.get("THREADS").and_then(FlagValue::as_int).unwrap_or(1),
            full_refresh: bool_flag(flags, "FULL_REFRESH"),
            fail_fast: bool_flag(flags, "FAIL_FAST"),
        }
    }

    /// Print a labeled summary of the plan.
    pub fn print(&self, title: &str) {
        println!("{title}:");
        println!("  selected: {}", render_selection(&self.select));
        if !self.exclude.is_empty() {
            println!("  excluded: {}", self.exclude.join(", "));
        }
        println!("  threads: {}", self.threads);
        println!("  fail fast: {}", self.fail_fast);
        if self.full_refresh {
            println!("  refresh: full");
        }
    }
}

fn strs(flags: &Flags, name: &str) -> Vec<String> {
    flags
        .get(name)
        .and_then(FlagValue::as_strs)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

fn bool_flag(flags: &Flags, name: &str) -> bool {
    flags.get(name).and_then(FlagValue::as_bool).unwrap_or(false)
}

fn render_selection(selection: &[String]) -> String {
    if selection.is_empty() {
        "all".to_owned()
    } else {
        selection.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{ParamContext, ParamSource};

    #[test]
    fn test_plan_resolves_from_flag_bag() {
        let ctx = ParamContext::new("run")
            .with_param(
                "select",
                vec!["model_a".to_owned(), "model_b".to_owned()],
                ParamSource::CommandLine,
            )
            .with_param("threads", 2i64, ParamSource::CommandLine)
            .with_param("full_refresh", true, ParamSource::CommandLine)
            .with_parent(ParamContext::new("strata").with_invoked_subcommand("run"));
        let flags = Flags::from_context(&ctx, None).expect("flags");

        let plan = ExecutionPlan::from_flags(&flags);
        assert_eq!(plan.select, vec!["model_a", "model_b"]);
        assert!(plan.exclude.is_empty());
        assert_eq!(plan.threads, 2);
        assert!(plan.full_refresh);
        assert!(!plan.fail_fast);
    }

    #[test]
    fn test_render_selection_falls_back_to_all() {
        assert_eq!(render_selection(&[]), "all");
        assert_eq!(render_selection(&["a".to_owned()]), "a");
    }
}
