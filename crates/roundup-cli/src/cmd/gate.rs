use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDate;
use roundup_core::clock::{Clock, SystemClock};
use roundup_core::config::Config;
use roundup_core::schedule::CycleSchedule;
use std::path::Path;

/// Succeeds when the form is open on `date`, fails when the period has closed.
pub fn run(root: &Path, date: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let date = date.unwrap_or_else(|| SystemClock.today());
    let schedule = CycleSchedule::containing(date, config.schedule.send_day)?;
    let open = schedule.accepts_submissions_on(date);

    if json {
        print_json(&serde_json::json!({
            "date": date,
            "open": open,
            "last_submission_day": schedule.last_submission_day,
        }))?;
    } else if open {
        println!(
            "open: submissions accepted through {}",
            schedule.last_submission_day
        );
    } else {
        println!(
            "closed: the submission period ended on {}",
            schedule.last_submission_day
        );
    }

    if !open {
        anyhow::bail!("submission period closed on {date}");
    }
    Ok(())
}
