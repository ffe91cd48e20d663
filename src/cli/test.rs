//! `test` command: execute the tests of the active project.

use anyhow::Result;
use tracing::info;

use super::plan::ExecutionPlan;
use crate::flags::{FlagValue, Flags};

pub fn run(flags: &Flags) -> Result<()> {
    let plan = ExecutionPlan::from_flags(flags);
    let indirect = flags
        .lookup("indirect_selection")?
        .as_str()
        .unwrap_or("eager")
        .to_owned();
    info!(indirect_selection = %indirect, "resolved test settings");

    plan.print("Test plan");
    println!("  indirect selection: {indirect}");
    Ok(())
}
