use crate::output::print_json;
use anyhow::Context;
use roundup_core::clock::{Clock, SystemClock};
use roundup_core::config::Config;
use roundup_core::reminder::{CommandNotifier, ReminderJob, ReminderOutcome};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let job = ReminderJob::from_config(root, &config);
    let notifier = CommandNotifier::new(config.notify.clone());

    let outcome = job
        .run(&notifier, SystemClock.now())
        .context("reminder run aborted")?;

    if json {
        return print_json(&outcome);
    }
    match outcome {
        ReminderOutcome::Skipped => println!("Reminders were already sent today. Skipping."),
        ReminderOutcome::AllResponded => println!("All employees have responded."),
        ReminderOutcome::Sent { recipients } => {
            for r in &recipients {
                println!("Reminder sent to: {r}");
            }
            println!("{} reminders sent.", recipients.len());
        }
    }
    Ok(())
}
