use anyhow::Context;
use devcoach_core::config::Config;
use devcoach_core::paths;
use std::path::Path;

pub fn run(root: &Path, user: Option<&str>) -> anyhow::Result<()> {
    println!("Initializing devcoach in: {}", root.display());

    let dir = paths::devcoach_dir(root);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut config = Config::default();
    config.github.username = user.map(str::to_string);

    if config
        .save_if_missing(root)
        .context("failed to write config.yaml")?
    {
        println!("  created: {}", paths::CONFIG_FILE);
        return Ok(());
    }

    match user {
        Some(user) => {
            let mut existing = Config::load(root).context("failed to load config")?;
            existing.github.username = Some(user.to_string());
            existing.save(root).context("failed to write config.yaml")?;
            println!("  updated: {} (github.username = {user})", paths::CONFIG_FILE);
        }
        None => println!("  exists:  {}", paths::CONFIG_FILE),
    }
    Ok(())
}
