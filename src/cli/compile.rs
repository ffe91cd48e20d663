//! `compile` command: compile the project without executing it.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::plan::ExecutionPlan;
use crate::flags::{FlagValue, Flags};

pub fn run(flags: &Flags) -> Result<()> {
    let plan = ExecutionPlan::from_flags(flags);
    let target = flags
        .get("TARGET_PATH")
        .and_then(FlagValue::as_path)
        .unwrap_or_else(|| Path::new("target"));
    info!(target = %target.display(), "resolved compile settings");

    plan.print("Compile plan");
    println!("  output: {}", target.display());
    Ok(())
}
