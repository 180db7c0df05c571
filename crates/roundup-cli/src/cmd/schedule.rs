use crate::output::{print_json, Table};
use anyhow::Context;
use chrono::Datelike;
use roundup_core::clock::{Clock, SystemClock};
use roundup_core::config::Config;
use roundup_core::dispatch::action_for;
use roundup_core::schedule::{CycleDay, CycleKey, CycleSchedule};
use roundup_core::RoundupError;
use std::path::Path;

pub fn run(root: &Path, year: Option<i32>, month: Option<u32>, json: bool) -> anyhow::Result<()> {
    // Dates can be previewed before `init`; fall back to the defaults.
    let config = match Config::load(root) {
        Err(RoundupError::NotInitialized) => Config::default(),
        other => other.context("failed to load config")?,
    };
    let today = SystemClock.today();
    let key = CycleKey::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()));
    let schedule = CycleSchedule::for_month(key, config.schedule.send_day)?;

    if json {
        let value = serde_json::json!({
            "cycle": key.to_string(),
            "send_day_rule": config.schedule.send_day,
            "schedule": schedule,
        });
        return print_json(&value);
    }

    let mut table = Table::new(&["DAY", "DATE", "WEEKDAY", "ACTION"]);
    for (day, date) in [
        (CycleDay::Send, schedule.send_day),
        (CycleDay::Reminder, schedule.reminder_day),
        (CycleDay::LastSubmission, schedule.last_submission_day),
        (CycleDay::Report, schedule.report_day),
    ] {
        let action = match action_for(day) {
            Some(a) => format!(
                "{} at {}",
                config.tasks.for_action(a),
                config.times.for_action(a).format("%H:%M")
            ),
            None => "submissions close at end of day".to_string(),
        };
        table.row(vec![
            label(day).to_string(),
            date.to_string(),
            date.format("%a").to_string(),
            action,
        ]);
    }

    println!("Cycle {key}");
    print!("{table}");
    Ok(())
}

fn label(day: CycleDay) -> &'static str {
    match day {
        CycleDay::Send => "send",
        CycleDay::Reminder => "reminder",
        CycleDay::LastSubmission => "last submission",
        CycleDay::Report => "report",
    }
}
