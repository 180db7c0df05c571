//! Daily dispatcher: decides which single action, if any, fires today.
//!
//! One invocation per day walks `Idle → Matched → Waiting → Dispatched`:
//!
//! - today is compared against the cycle's send, reminder and report days
//!   (the last-submission day only gates the form and fires nothing);
//! - on a match the day's lock is created *before* waiting, so an
//!   overlapping invocation sees it and skips;
//! - the dispatcher suspends until the action's configured time, then
//!   invokes the action exactly once.
//!
//! A failed action is not retried and its lock is kept: the attempt counts
//! as made, so a rerun the same day cannot produce duplicate side effects.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::action::{ActionInvoker, ActionKind};
use crate::clock::{suspend_until, Clock, Sleeper};
use crate::config::{Config, TimesConfig};
use crate::error::Result;
use crate::lock::DailyLock;
use crate::paths;
use crate::schedule::{CycleDay, CycleSchedule, SendDayRule};

/// Lock namespace for dispatched actions.
pub const DISPATCH_LOCK: &str = "dispatch";

// ---------------------------------------------------------------------------
// DispatchConfig
// ---------------------------------------------------------------------------

/// Everything the dispatcher needs besides its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Time of day each action fires.
    pub times: TimesConfig,
    pub form_url: String,
    pub send_day: SendDayRule,
    pub lock_dir: PathBuf,
}

impl DispatchConfig {
    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self {
            times: config.times.clone(),
            form_url: config.form_url.clone(),
            send_day: config.schedule.send_day,
            lock_dir: paths::locks_dir(root),
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Today is not an action day.
    Idle,
    /// Today's lock already existed; nothing ran.
    Skipped { action: ActionKind },
    Dispatched { action: ActionKind },
    /// The action ran and failed. The lock stays in place.
    Failed { action: ActionKind, reason: String },
}

/// The action bound to a cycle date, if any.
pub fn action_for(day: CycleDay) -> Option<ActionKind> {
    match day {
        CycleDay::Send => Some(ActionKind::SendForm),
        CycleDay::Reminder => Some(ActionKind::SendReminders),
        CycleDay::Report => Some(ActionKind::GenerateReport),
        CycleDay::LastSubmission => None,
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct Dispatcher<'a> {
    config: DispatchConfig,
    invoker: &'a dyn ActionInvoker,
    clock: &'a dyn Clock,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        config: DispatchConfig,
        invoker: &'a dyn ActionInvoker,
        clock: &'a dyn Clock,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            config,
            invoker,
            clock,
            sleeper,
        }
    }

    /// The action scheduled for `today`, computed fresh from the cycle.
    pub fn action_due(&self, today: NaiveDate) -> Result<Option<ActionKind>> {
        let schedule = CycleSchedule::containing(today, self.config.send_day)?;
        Ok(schedule.day_of(today).and_then(action_for))
    }

    /// The daily entry point.
    pub fn run(&self) -> Result<DispatchOutcome> {
        let now = self.clock.now();
        let today = now.date();
        let Some(action) = self.action_due(today)? else {
            tracing::info!("no scheduled task for {today}");
            return Ok(DispatchOutcome::Idle);
        };
        tracing::info!("{today} is the {action} day");
        self.fire(action, now, self.config.times.for_action(action))
    }

    /// Fire `action` today regardless of the cycle, at `at` or the action's
    /// configured time. The daily lock still applies.
    pub fn run_forced(&self, action: ActionKind, at: Option<NaiveTime>) -> Result<DispatchOutcome> {
        let now = self.clock.now();
        let at = at.unwrap_or_else(|| self.config.times.for_action(action));
        tracing::warn!(
            "forced run: {action} at {} regardless of the cycle",
            at.format("%H:%M")
        );
        self.fire(action, now, at)
    }

    fn fire(&self, action: ActionKind, now: NaiveDateTime, at: NaiveTime) -> Result<DispatchOutcome> {
        let today = now.date();
        match DailyLock::try_acquire(&self.config.lock_dir, DISPATCH_LOCK, today, now)? {
            Some(lock) => tracing::info!("lock acquired: {}", lock.path().display()),
            None => {
                tracing::info!("an action was already dispatched on {today}, skipping {action}");
                return Ok(DispatchOutcome::Skipped { action });
            }
        }

        suspend_until(self.clock, self.sleeper, at);

        match self.invoker.invoke(action, &self.config.form_url) {
            Ok(()) => {
                tracing::info!("dispatched {action}");
                Ok(DispatchOutcome::Dispatched { action })
            }
            Err(e) => {
                tracing::error!("{action} failed, not retrying today: {e}");
                Ok(DispatchOutcome::Failed {
                    action,
                    reason: e.to_string(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
