use crate::output::print_json;
use anyhow::Context;
use roundup_core::action::{ActionKind, CommandInvoker};
use roundup_core::clock::{SystemClock, ThreadSleeper};
use roundup_core::config::{parse_hhmm, Config};
use roundup_core::dispatch::{DispatchConfig, DispatchOutcome, Dispatcher};
use std::path::Path;

pub fn run(root: &Path, force: Option<&str>, at: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let invoker = CommandInvoker::new(config.runner.clone(), config.tasks.clone(), root);
    let dispatcher = Dispatcher::new(
        DispatchConfig::from_config(root, &config),
        &invoker,
        &SystemClock,
        &ThreadSleeper,
    );

    let outcome = match force {
        Some(name) => {
            let action: ActionKind = name.parse()?;
            let at = at.map(parse_hhmm).transpose()?;
            dispatcher.run_forced(action, at)?
        }
        None => dispatcher.run()?,
    };

    if json {
        print_json(&outcome)?;
    } else {
        match &outcome {
            DispatchOutcome::Idle => println!("No scheduled task for today."),
            DispatchOutcome::Skipped { action } => {
                println!("Skipped {action}: an action was already dispatched today.")
            }
            DispatchOutcome::Dispatched { action } => println!("Dispatched {action}."),
            DispatchOutcome::Failed { action, .. } => println!("Dispatch of {action} failed."),
        }
    }

    if let DispatchOutcome::Failed { action, reason } = outcome {
        anyhow::bail!("{action} failed: {reason}");
    }
    Ok(())
}
