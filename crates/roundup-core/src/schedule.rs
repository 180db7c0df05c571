//! Monthly collection cycle: the four operational dates of a month.
//!
//! Both the form server (submission gate) and the daily dispatcher derive
//! the cycle from [`CycleSchedule::for_month`]. Nothing is cached; every
//! caller recomputes from the same pure function so their answers agree.

use crate::calendar::{add_working_days, next_working_day};
use crate::error::{Result, RoundupError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Working-day offsets from `send_day`.
pub const REMINDER_OFFSET: i64 = 2;
pub const LAST_SUBMISSION_OFFSET: i64 = 4;
pub const REPORT_OFFSET: i64 = 5;

// ---------------------------------------------------------------------------
// CycleKey
// ---------------------------------------------------------------------------

/// Identifies one scheduling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleKey {
    pub year: i32,
    pub month: u32,
}

impl CycleKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The cycle `date` belongs to.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(RoundupError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }
}

impl fmt::Display for CycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// SendDayRule
// ---------------------------------------------------------------------------

/// How `send_day` is anchored on the first of the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendDayRule {
    /// The 1st itself, even when it is a weekend day.
    #[default]
    FirstOfMonth,
    /// The first working day on or after the 1st.
    FirstWorkingDay,
}

// ---------------------------------------------------------------------------
// CycleDay
// ---------------------------------------------------------------------------

/// Which of the four cycle dates a given day is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleDay {
    Send,
    Reminder,
    LastSubmission,
    Report,
}

// ---------------------------------------------------------------------------
// CycleSchedule
// ---------------------------------------------------------------------------

/// The four derived dates of one cycle.
///
/// Invariant: `send_day < reminder_day < last_submission_day < report_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSchedule {
    pub send_day: NaiveDate,
    pub reminder_day: NaiveDate,
    pub last_submission_day: NaiveDate,
    pub report_day: NaiveDate,
}

impl CycleSchedule {
    pub fn for_month(key: CycleKey, rule: SendDayRule) -> Result<Self> {
        let first = key.first_day()?;
        let send_day = match rule {
            SendDayRule::FirstOfMonth => add_working_days(first, 0)?,
            SendDayRule::FirstWorkingDay => next_working_day(first)?,
        };
        Ok(Self {
            send_day,
            reminder_day: add_working_days(send_day, REMINDER_OFFSET)?,
            last_submission_day: add_working_days(send_day, LAST_SUBMISSION_OFFSET)?,
            report_day: add_working_days(send_day, REPORT_OFFSET)?,
        })
    }

    /// The cycle containing `today`.
    pub fn containing(today: NaiveDate, rule: SendDayRule) -> Result<Self> {
        Self::for_month(CycleKey::of(today), rule)
    }

    /// Which cycle date `day` is, if any. Dates are distinct so at most one matches.
    pub fn day_of(&self, day: NaiveDate) -> Option<CycleDay> {
        if day == self.send_day {
            Some(CycleDay::Send)
        } else if day == self.reminder_day {
            Some(CycleDay::Reminder)
        } else if day == self.last_submission_day {
            Some(CycleDay::LastSubmission)
        } else if day == self.report_day {
            Some(CycleDay::Report)
        } else {
            None
        }
    }

    pub fn accepts_submissions_on(&self, day: NaiveDate) -> bool {
        day <= self.last_submission_day
    }
}

/// Cycle dates for `year`/`month` with the 1st taken as `send_day` unmodified.
pub fn get_monthly_schedule(year: i32, month: u32) -> Result<CycleSchedule> {
    CycleSchedule::for_month(CycleKey::new(year, month), SendDayRule::FirstOfMonth)
}

/// Whether the form still accepts submissions on `today`.
///
/// Must be asked fresh on every render and every submission: the deadline
/// can pass while a session is open.
pub fn is_submission_open(today: NaiveDate, rule: SendDayRule) -> Result<bool> {
    Ok(CycleSchedule::containing(today, rule)?.accepts_submissions_on(today))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
