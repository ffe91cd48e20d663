//! `run` command: execute the selected models.

use anyhow::Result;
use tracing::info;

use super::plan::ExecutionPlan;
use crate::flags::{FlagValue, Flags};

pub fn run(flags: &Flags) -> Result<()> {
    let plan = ExecutionPlan::from_flags(flags);
    info!(
        threads = plan.threads,
        full_refresh = plan.full_refresh,
        start_method = flags
            .get("WORKER_START_METHOD")
            .and_then(FlagValue::as_str)
            .unwrap_or(""),
        "resolved run settings"
    );

    plan.print("Run plan");
    Ok(())
}
