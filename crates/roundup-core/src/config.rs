use crate::action::ActionKind;
use crate::error::{Result, RoundupError};
use crate::paths;
use crate::schedule::SendDayRule;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TimesConfig
// ---------------------------------------------------------------------------

/// Time of day each action fires on its cycle date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesConfig {
    #[serde(with = "hhmm", default = "default_send_time")]
    pub send: NaiveTime,
    #[serde(with = "hhmm", default = "default_reminder_time")]
    pub reminder: NaiveTime,
    #[serde(with = "hhmm", default = "default_report_time")]
    pub report: NaiveTime,
}

fn default_send_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

fn default_report_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

impl Default for TimesConfig {
    fn default() -> Self {
        Self {
            send: default_send_time(),
            reminder: default_reminder_time(),
            report: default_report_time(),
        }
    }
}

impl TimesConfig {
    pub fn for_action(&self, action: ActionKind) -> NaiveTime {
        match action {
            ActionKind::SendForm => self.send,
            ActionKind::SendReminders => self.reminder,
            ActionKind::GenerateReport => self.report,
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub send_day: SendDayRule,
}

// ---------------------------------------------------------------------------
// RunnerConfig / TaskNames
// ---------------------------------------------------------------------------

/// External automation command that performs the named actions.
///
/// `{task}` and `{form_url}` in `args` are substituted per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_runner_program")]
    pub program: String,
    #[serde(default = "default_runner_args")]
    pub args: Vec<String>,
}

fn default_runner_program() -> String {
    "robot".to_string()
}

fn default_runner_args() -> Vec<String> {
    [
        "--task",
        "{task}",
        "--variable",
        "FORM_URL:{form_url}",
        "tasks.robot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: default_runner_program(),
            args: default_runner_args(),
        }
    }
}

/// Task names the runner knows the actions by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNames {
    #[serde(default = "default_send_task")]
    pub send_form: String,
    #[serde(default = "default_remind_task")]
    pub send_reminders: String,
    #[serde(default = "default_report_task")]
    pub generate_report: String,
}

fn default_send_task() -> String {
    "Send Form To All Employees".to_string()
}

fn default_remind_task() -> String {
    "Send Reminders To Non Responders".to_string()
}

fn default_report_task() -> String {
    "Generate And Send Final Report".to_string()
}

impl Default for TaskNames {
    fn default() -> Self {
        Self {
            send_form: default_send_task(),
            send_reminders: default_remind_task(),
            generate_report: default_report_task(),
        }
    }
}

impl TaskNames {
    pub fn for_action(&self, action: ActionKind) -> &str {
        match action {
            ActionKind::SendForm => &self.send_form,
            ActionKind::SendReminders => &self.send_reminders,
            ActionKind::GenerateReport => &self.generate_report,
        }
    }
}

// ---------------------------------------------------------------------------
// PopulationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// YAML list of everyone expected to respond.
    #[serde(default = "default_roster")]
    pub roster: PathBuf,
    /// Append-only JSON-lines log written by the form server.
    #[serde(default = "default_responses")]
    pub responses: PathBuf,
}

fn default_roster() -> PathBuf {
    PathBuf::from(paths::ROSTER_FILE)
}

fn default_responses() -> PathBuf {
    PathBuf::from(paths::RESPONSES_FILE)
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            responses: default_responses(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotifyConfig
// ---------------------------------------------------------------------------

/// Mail command that receives one reminder message on stdin.
///
/// `{to}` and `{subject}` in `args` are substituted per recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_notify_program")]
    pub program: String,
    #[serde(default = "default_notify_args")]
    pub args: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_notify_program() -> String {
    "sendmail".to_string()
}

fn default_notify_args() -> Vec<String> {
    vec!["-t".to_string()]
}

fn default_subject() -> String {
    "Reminder: please complete the monthly activity report".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            program: default_notify_program(),
            args: default_notify_args(),
            subject: default_subject(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_form_url")]
    pub form_url: String,
    #[serde(default)]
    pub times: TimesConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub tasks: TaskNames,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

fn default_form_url() -> String {
    "http://localhost:5000/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            form_url: default_form_url(),
            times: TimesConfig::default(),
            schedule: ScheduleConfig::default(),
            runner: RunnerConfig::default(),
            tasks: TaskNames::default(),
            population: PopulationConfig::default(),
            notify: NotifyConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(RoundupError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn roster_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.population.roster)
    }

    pub fn responses_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.population.responses)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut push = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message })
        };

        if self.form_url.trim().is_empty() {
            push(WarnLevel::Error, "form_url is empty".to_string());
        }

        if self.runner.program.trim().is_empty() {
            push(WarnLevel::Error, "runner.program is empty".to_string());
        } else if !self.runner.args.iter().any(|a| a.contains("{task}")) {
            push(
                WarnLevel::Warning,
                "runner.args has no '{task}' placeholder: every action will run the same command"
                    .to_string(),
            );
        }

        for (field, name) in [
            ("tasks.send_form", &self.tasks.send_form),
            ("tasks.send_reminders", &self.tasks.send_reminders),
            ("tasks.generate_report", &self.tasks.generate_report),
        ] {
            if name.trim().is_empty() {
                push(WarnLevel::Error, format!("{field} is empty"));
            }
        }

        if self.population.roster.as_os_str().is_empty() {
            push(WarnLevel::Error, "population.roster is empty".to_string());
        }
        if self.population.responses.as_os_str().is_empty() {
            push(WarnLevel::Error, "population.responses is empty".to_string());
        }

        if self.notify.program.trim().is_empty() {
            push(
                WarnLevel::Warning,
                "notify.program is empty: reminders cannot be delivered".to_string(),
            );
        }

        if self.schedule.send_day == SendDayRule::FirstOfMonth {
            push(
                WarnLevel::Warning,
                "schedule.send_day is first_of_month: the form goes out on the 1st even when \
                 it is a weekend day (set first_working_day to avoid this)"
                    .to_string(),
            );
        }

        warnings
    }
}

/// Parse a wall-clock time written as `HH:MM`.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| RoundupError::InvalidTime(s.into()))
}

// ---------------------------------------------------------------------------
// Serde helpers for NaiveTime (serialized as "HH:MM")
// ---------------------------------------------------------------------------

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(yaml.contains("08:00"));
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.times, cfg.times);
        assert_eq!(parsed.runner, cfg.runner);
        assert_eq!(parsed.tasks, cfg.tasks);
    }

    #[test]
    fn empty_document_takes_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.form_url, "http://localhost:5000/");
        assert_eq!(cfg.times.send, hm(8, 0));
        assert_eq!(cfg.times.reminder, hm(10, 0));
        assert_eq!(cfg.times.report, hm(9, 0));
        assert_eq!(cfg.schedule.send_day, SendDayRule::FirstOfMonth);
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn partial_times_and_rule_parse() {
        let yaml = "times:\n  send: \"07:15\"\nschedule:\n  send_day: first_working_day\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.times.send, hm(7, 15));
        assert_eq!(cfg.times.report, hm(9, 0));
        assert_eq!(cfg.schedule.send_day, SendDayRule::FirstWorkingDay);
    }

    #[test]
    fn malformed_time_is_rejected() {
        let yaml = "times:\n  send: \"8 o'clock\"\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(RoundupError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.form_url = "https://forms.example.org/".to_string();
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.form_url, "https://forms.example.org/");
    }

    #[test]
    fn times_and_tasks_per_action() {
        let cfg = Config::default();
        assert_eq!(cfg.times.for_action(ActionKind::SendReminders), hm(10, 0));
        assert_eq!(
            cfg.tasks.for_action(ActionKind::GenerateReport),
            "Generate And Send Final Report"
        );
    }

    #[test]
    fn relative_population_paths_resolve_under_root() {
        let cfg = Config::default();
        let root = Path::new("/srv/roundup");
        assert_eq!(
            cfg.roster_path(root),
            PathBuf::from("/srv/roundup/.roundup/roster.yaml")
        );
    }

    #[test]
    fn validate_default_only_warns_about_weekend_send_day() {
        let warnings = Config::default().validate();
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("schedule.send_day")));
    }

    #[test]
    fn validate_empty_runner_is_error() {
        let mut cfg = Config::default();
        cfg.runner.program = "  ".to_string();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("runner.program")));
    }

    #[test]
    fn validate_runner_without_task_placeholder_warns() {
        let mut cfg = Config::default();
        cfg.schedule.send_day = SendDayRule::FirstWorkingDay;
        cfg.runner.args = vec!["run.sh".to_string()];
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn parse_hhmm_accepts_and_rejects() {
        assert_eq!(parse_hhmm("13:27").unwrap(), hm(13, 27));
        assert!(matches!(
            parse_hhmm("25:00"),
            Err(RoundupError::InvalidTime(_))
        ));
    }
}
