use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$SPENDWISE_HOME`, or `~/.spendwise` when unset.
pub fn spendwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPENDWISE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendwise"))
}

pub fn ensure_spendwise_home() -> Result<PathBuf> {
    let dir = spendwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
