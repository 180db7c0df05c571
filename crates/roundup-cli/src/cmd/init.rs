use anyhow::Context;
use roundup_core::config::Config;
use roundup_core::{io, paths, population};
use std::path::Path;

/// Scaffold `.roundup/`. Existing files are never overwritten.
pub fn run(root: &Path) -> anyhow::Result<()> {
    io::ensure_dir(&paths::roundup_dir(root))?;
    io::ensure_dir(&paths::locks_dir(root))?;

    let config = if paths::config_path(root).exists() {
        println!("kept existing {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load existing config")?
    } else {
        let config = Config::default();
        config.save(root).context("failed to write config")?;
        println!("created {}", paths::CONFIG_FILE);
        config
    };

    let roster = config.roster_path(root);
    let wrote_roster = io::write_if_missing(&roster, population::EXAMPLE_ROSTER.as_bytes())
        .context("failed to write roster")?;
    if wrote_roster {
        println!("created {}", roster.display());
    } else {
        println!("kept existing {}", roster.display());
    }
    Ok(())
}
