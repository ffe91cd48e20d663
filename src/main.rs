//! strata: pipeline runner with layered flag resolution.

use anyhow::Result;

fn main() -> Result<()> {
    strata::cli::run()
}
