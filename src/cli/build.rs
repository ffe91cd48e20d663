//! `build` command: models, tests, and snapshots in dependency order.

use anyhow::Result;
use tracing::info;

use super::plan::ExecutionPlan;
use crate::flags::Flags;

pub fn run(flags: &Flags) -> Result<()> {
    let plan = ExecutionPlan::from_flags(flags);
    info!(threads = plan.threads, "resolved build settings");

    plan.print("Build plan");
    println!("  resources: models, tests, snapshots");
    Ok(())
}
