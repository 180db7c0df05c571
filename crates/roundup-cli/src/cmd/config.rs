use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use roundup_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    println!("Form URL:       {}", config.form_url);
    println!("Send day rule:  {:?}", config.schedule.send_day);
    println!(
        "Times:          send {}, reminder {}, report {}",
        config.times.send.format("%H:%M"),
        config.times.reminder.format("%H:%M"),
        config.times.report.format("%H:%M")
    );
    println!(
        "Runner:         {} {}",
        config.runner.program,
        config.runner.args.join(" ")
    );
    println!("Roster:         {}", config.roster_path(root).display());
    println!("Responses:      {}", config.responses_path(root).display());
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
