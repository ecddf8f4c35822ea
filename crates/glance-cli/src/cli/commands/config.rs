//! Config command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glance_core::config;

/// The file the other commands read: `--config` if given, else the default.
fn resolve(config_override: Option<&Path>) -> PathBuf {
    config_override.map_or_else(config::paths::config_path, Path::to_path_buf)
}

pub fn path(config_override: Option<&Path>) {
    println!("{}", resolve(config_override).display());
}

pub fn init(config_override: Option<&Path>) -> Result<()> {
    let config_path = resolve(config_override);
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}
