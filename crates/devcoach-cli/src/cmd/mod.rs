pub mod coach;
pub mod config;
pub mod init;
pub mod normalize;
pub mod queue;
pub mod serve;

use anyhow::Context;
use devcoach_core::config::Config;
use std::path::Path;

/// `--user` if given, else `github.username` from the project config.
pub fn resolve_user(root: &Path, explicit: Option<&str>) -> anyhow::Result<Option<String>> {
    if let Some(user) = explicit.filter(|u| !u.is_empty()) {
        return Ok(Some(user.to_string()));
    }
    let config = Config::load_or_default(root).context("failed to load config")?;
    Ok(config.github.username.filter(|u| !u.is_empty()))
}
