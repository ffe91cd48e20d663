//! `debug` command: diagnostics for paths, profiles, and resolved flags.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::profile;
use crate::flags::{FlagValue, Flags};

pub fn run(flags: &Flags) -> Result<()> {
    let profiles_dir = path_flag(flags, "PROFILES_DIR");

    if flags
        .get("CONFIG_DIR")
        .and_then(FlagValue::as_bool)
        .unwrap_or(false)
    {
        println!("{}", profiles_dir.display());
        return Ok(());
    }

    let project_dir = path_flag(flags, "PROJECT_DIR");
    let width = flags.lookup("printer_width")?.as_int().unwrap_or(80).clamp(1, 512) as usize;

    println!("profiles dir: {}", profiles_dir.display());
    match profile::find_profiles_file(&profiles_dir) {
        Some(file) => println!("profiles file: {} (found)", file.display()),
        None => println!("profiles file: not found"),
    }
    println!("project dir: {}", project_dir.display());
    println!("{}", "-".repeat(width));
    println!("{flags}");
    Ok(())
}

fn path_flag(flags: &Flags, name: &str) -> PathBuf {
    flags
        .get(name)
        .and_then(FlagValue::as_path)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
