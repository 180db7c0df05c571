//! Activity-report submissions and the append-only response log.

use crate::error::{Result, RoundupError};
use crate::io;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SubmissionForm
// ---------------------------------------------------------------------------

/// Raw form fields as posted by the page. Every field is optional here;
/// [`Submission::from_form`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    pub employee_email: Option<String>,
    pub sector: Option<String>,
    pub department: Option<String>,
    pub division: Option<String>,
    pub section: Option<String>,
    /// `"yes"` when the employee has activities to report.
    pub has_activities: Option<String>,
    pub activity_topic: Option<String>,
    pub activity_type: Option<String>,
    pub strategic_goal_level1: Option<String>,
    pub strategic_goal_level2: Option<String>,
    pub presenter_category: Option<String>,
    pub activity_start_date: Option<String>,
    pub activity_end_date: Option<String>,
    pub presenter_name: Option<String>,
    pub attendance_responsible: Option<String>,
    pub target_audience_type: Option<String>,
    pub target_audience_details: Option<String>,
    pub attendee_count: Option<String>,
    pub activity_duration: Option<String>,
    pub content_location: Option<String>,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub topic: String,
    pub activity_type: String,
    pub strategic_goal_1: String,
    pub strategic_goal_2: String,
    pub presenter_category: String,
    pub start_date: String,
    pub end_date: String,
    pub presenter_name: String,
    pub attendance_responsible: String,
    pub target_audience_type: String,
    pub target_audience_details: String,
    pub attendee_count: u32,
    pub duration_hours: f64,
    pub content_location: String,
}

/// One stored response. `activity` is `None` when there was nothing to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub employee_email: String,
    pub sector: String,
    pub department: String,
    pub division: String,
    pub section: String,
    pub activity: Option<Activity>,
    pub submitted_at: NaiveDateTime,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn text(field: Option<String>) -> String {
    field.map(|s| s.trim().to_string()).unwrap_or_default()
}

impl Submission {
    pub fn from_form(form: SubmissionForm, submitted_at: NaiveDateTime) -> Result<Self> {
        let employee_email = text(form.employee_email);
        if employee_email.is_empty() {
            return Err(RoundupError::InvalidSubmission(
                "employeeEmail is required".to_string(),
            ));
        }
        if !email_re().is_match(&employee_email) {
            return Err(RoundupError::InvalidSubmission(format!(
                "'{employee_email}' is not an email address"
            )));
        }

        let has_activities = form.has_activities.as_deref().map(str::trim) == Some("yes");
        let activity = if has_activities {
            let topic = text(form.activity_topic);
            if topic.is_empty() {
                return Err(RoundupError::InvalidSubmission(
                    "activityTopic is required when activities are reported".to_string(),
                ));
            }
            Some(Activity {
                topic,
                activity_type: text(form.activity_type),
                strategic_goal_1: text(form.strategic_goal_level1),
                strategic_goal_2: text(form.strategic_goal_level2),
                presenter_category: text(form.presenter_category),
                start_date: text(form.activity_start_date),
                end_date: text(form.activity_end_date),
                presenter_name: text(form.presenter_name),
                attendance_responsible: text(form.attendance_responsible),
                target_audience_type: text(form.target_audience_type),
                target_audience_details: text(form.target_audience_details),
                attendee_count: parse_count(form.attendee_count)?,
                duration_hours: parse_hours(form.activity_duration)?,
                content_location: text(form.content_location),
            })
        } else {
            None
        };

        Ok(Self {
            id: Uuid::new_v4(),
            employee_email,
            sector: text(form.sector),
            department: text(form.department),
            division: text(form.division),
            section: text(form.section),
            activity,
            submitted_at,
        })
    }
}

fn parse_count(raw: Option<String>) -> Result<u32> {
    let raw = text(raw);
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| RoundupError::InvalidSubmission(format!("attendeeCount '{raw}' is not a count")))
}

fn parse_hours(raw: Option<String>) -> Result<f64> {
    let raw = text(raw);
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(h) if h.is_finite() && h >= 0.0 => Ok(h),
        _ => Err(RoundupError::InvalidSubmission(format!(
            "activityDuration '{raw}' is not a number of hours"
        ))),
    }
}

// ---------------------------------------------------------------------------
// ResponseLog
// ---------------------------------------------------------------------------

/// JSON-lines file of submissions, one per line, never rewritten.
#[derive(Debug, Clone)]
pub struct ResponseLog {
    path: PathBuf,
}

impl ResponseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, submission: &Submission) -> Result<()> {
        let line = serde_json::to_string(submission)?;
        io::append_line(&self.path, &line)
    }

    /// Everyone who has submitted so far. A missing log means nobody has;
    /// lines without an `employee_email` are ignored.
    pub fn responders(&self) -> Result<BTreeSet<String>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let mut responders = BTreeSet::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let value: serde_json::Value = serde_json::from_str(line)?;
            if let Some(email) = value.get("employee_email").and_then(|v| v.as_str()) {
                if !email.is_empty() {
                    responders.insert(email.to_string());
                }
            }
        }
        Ok(responders)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
