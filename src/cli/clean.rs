//! `clean` command: remove the project's derived directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::flags::{FlagValue, Flags};

pub fn run(flags: &Flags) -> Result<()> {
    let project_dir = flags
        .get("PROJECT_DIR")
        .and_then(FlagValue::as_path)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut cleaned = 0usize;
    for name in ["TARGET_PATH", "LOG_PATH"] {
        let Some(dir) = flags.get(name).and_then(FlagValue::as_path) else {
            continue;
        };
        let full = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            project_dir.join(dir)
        };
        if full.is_dir() {
            fs::remove_dir_all(&full)
                .with_context(|| format!("failed to remove {}", full.display()))?;
            println!("Cleaned {}", full.display());
            cleaned += 1;
        } else {
            debug!(path = %full.display(), "nothing to clean");
        }
    }

    if cleaned == 0 {
        println!("Nothing to clean");
    }
    Ok(())
}
