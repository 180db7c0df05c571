//! Reminder job: email everyone in the roster who has not responded yet.
//!
//! The job takes its own daily lock (namespace `remind`) before reading
//! anything, so a rerun the same day never sends a second batch, even if the
//! first one failed halfway.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::{Config, NotifyConfig};
use crate::error::{Result, RoundupError};
use crate::lock::DailyLock;
use crate::paths;
use crate::population::{load_roster, non_responders};
use crate::submission::ResponseLog;

/// Lock namespace for the reminder job.
pub const REMIND_LOCK: &str = "remind";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub subject: String,
    pub body: String,
}

impl ReminderMessage {
    pub fn new(subject: impl Into<String>, form_url: &str) -> Self {
        Self {
            subject: subject.into(),
            body: format!(
                "Hello,\n\n\
                 This is a friendly reminder to complete the monthly activity report form. \
                 The deadline is close.\n\n\
                 Please use the following link to fill in the form:\n{form_url}\n\n\
                 Thank you for your cooperation.\n"
            ),
        }
    }
}

/// Delivers one reminder to one recipient.
pub trait Notifier {
    fn notify(&self, recipient: &str, message: &ReminderMessage) -> Result<()>;
}

// ---------------------------------------------------------------------------
// CommandNotifier
// ---------------------------------------------------------------------------

/// Pipes each message, with `To:`/`Subject:` headers, into a mail command
/// such as `sendmail -t`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    config: NotifyConfig,
}

impl CommandNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    fn render(recipient: &str, message: &ReminderMessage) -> String {
        format!(
            "To: {recipient}\nSubject: {}\nContent-Type: text/plain; charset=utf-8\n\n{}",
            message.subject, message.body
        )
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, recipient: &str, message: &ReminderMessage) -> Result<()> {
        let fail = |reason: String| RoundupError::NotifyFailed {
            recipient: recipient.to_string(),
            reason,
        };

        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|a| a.replace("{to}", recipient).replace("{subject}", &message.subject))
            .collect();

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(format!("cannot start '{}': {e}", self.config.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(Self::render(recipient, message).as_bytes())
                .map_err(|e| fail(format!("failed to write message: {e}")))?;
        }

        let output = child.wait_with_output().map_err(|e| fail(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let hint: String = stderr.chars().take(300).collect();
            return Err(fail(format!("{} ({})", hint.trim(), output.status)));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ReminderJob
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReminderOutcome {
    /// Reminders were already handled today.
    Skipped,
    /// Nobody is missing; nothing was sent.
    AllResponded,
    Sent { recipients: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct ReminderJob {
    pub lock_dir: PathBuf,
    pub roster: PathBuf,
    pub responses: PathBuf,
    pub form_url: String,
    pub subject: String,
}

impl ReminderJob {
    pub fn from_config(root: &std::path::Path, config: &Config) -> Self {
        Self {
            lock_dir: paths::locks_dir(root),
            roster: config.roster_path(root),
            responses: config.responses_path(root),
            form_url: config.form_url.clone(),
            subject: config.notify.subject.clone(),
        }
    }

    pub fn run(&self, notifier: &dyn Notifier, now: NaiveDateTime) -> Result<ReminderOutcome> {
        if DailyLock::try_acquire(&self.lock_dir, REMIND_LOCK, now.date(), now)?.is_none() {
            tracing::info!("reminders already sent today, skipping duplicate");
            return Ok(ReminderOutcome::Skipped);
        }

        let population = load_roster(&self.roster)?;
        let responded = ResponseLog::new(&self.responses).responders()?;
        let missing = non_responders(&population, &responded);

        if missing.is_empty() {
            tracing::info!("all {} employees have responded", population.len());
            return Ok(ReminderOutcome::AllResponded);
        }

        tracing::info!(
            "{} of {} employees have not responded, sending reminders",
            missing.len(),
            population.len()
        );
        let message = ReminderMessage::new(self.subject.clone(), &self.form_url);
        let mut sent = Vec::with_capacity(missing.len());
        for recipient in missing {
            notifier.notify(&recipient, &message)?;
            tracing::info!("reminder sent to {recipient}");
            sent.push(recipient);
        }
        Ok(ReminderOutcome::Sent { recipients: sent })
    }
}
