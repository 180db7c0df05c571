//! The three named cycle actions and how they are carried out.
//!
//! Actions run through an external automation command (by default a Robot
//! Framework task file). The command is configured in `runner`; `{task}` and
//! `{form_url}` placeholders in its arguments are filled in per invocation.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{RunnerConfig, TaskNames};
use crate::error::{Result, RoundupError};

/// One of the actions the dispatcher can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SendForm,
    SendReminders,
    GenerateReport,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::SendForm,
            ActionKind::SendReminders,
            ActionKind::GenerateReport,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SendForm => "send_form",
            ActionKind::SendReminders => "send_reminders",
            ActionKind::GenerateReport => "generate_report",
        }
    }

    /// Short name accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            ActionKind::SendForm => "send",
            ActionKind::SendReminders => "remind",
            ActionKind::GenerateReport => "report",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = RoundupError;

    fn from_str(s: &str) -> Result<Self> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|a| a.short_name() == s || a.as_str() == s)
            .ok_or_else(|| RoundupError::UnknownAction(s.to_string()))
    }
}

/// Carries out a named action. Returns once the action has finished.
pub trait ActionInvoker {
    fn invoke(&self, action: ActionKind, form_url: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// CommandInvoker
// ---------------------------------------------------------------------------

/// Runs actions as a subprocess of the configured automation tool.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    runner: RunnerConfig,
    tasks: TaskNames,
    workdir: PathBuf,
}

impl CommandInvoker {
    pub fn new(runner: RunnerConfig, tasks: TaskNames, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            tasks,
            workdir: workdir.into(),
        }
    }

    /// Argument list for `action` with placeholders filled in.
    pub fn args_for(&self, action: ActionKind, form_url: &str) -> Vec<String> {
        let task = self.tasks.for_action(action);
        self.runner
            .args
            .iter()
            .map(|a| a.replace("{task}", task).replace("{form_url}", form_url))
            .collect()
    }
}

impl ActionInvoker for CommandInvoker {
    fn invoke(&self, action: ActionKind, form_url: &str) -> Result<()> {
        let program = which::which(&self.runner.program)
            .map_err(|_| RoundupError::RunnerNotFound(self.runner.program.clone()))?;
        let args = self.args_for(action, form_url);

        tracing::info!(
            "running task '{}': {} {}",
            self.tasks.for_action(action),
            program.display(),
            args.join(" ")
        );

        let output = build_command(&program, &args, &self.workdir)
            .output()
            .map_err(|e| RoundupError::ActionSpawnFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            tracing::debug!(target: "runner", "{line}");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let source = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            let hint: String = source.chars().take(500).collect();
            return Err(RoundupError::ActionFailed {
                action: action.to_string(),
                hint: format!("{} ({})", hint.trim(), output.status),
            });
        }

        Ok(())
    }
}

fn build_command(program: &Path, args: &[String], workdir: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoker(program: &str, args: &[&str], dir: &Path) -> CommandInvoker {
        CommandInvoker::new(
            RunnerConfig {
                program: program.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            },
            TaskNames::default(),
            dir,
        )
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("send".parse::<ActionKind>().unwrap(), ActionKind::SendForm);
        assert_eq!(
            "send_reminders".parse::<ActionKind>().unwrap(),
            ActionKind::SendReminders
        );
        assert_eq!(
            "report".parse::<ActionKind>().unwrap(),
            ActionKind::GenerateReport
        );
        assert!(matches!(
            "REMIND".parse::<ActionKind>(),
            Err(RoundupError::UnknownAction(_))
        ));
    }

    #[test]
    fn default_args_substitute_task_and_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let inv = CommandInvoker::new(RunnerConfig::default(), TaskNames::default(), dir.path());
        let args = inv.args_for(ActionKind::SendReminders, "http://forms.local/");
        assert_eq!(
            args,
            vec![
                "--task",
                "Send Reminders To Non Responders",
                "--variable",
                "FORM_URL:http://forms.local/",
                "tasks.robot",
            ]
        );
    }

    #[test]
    fn missing_runner_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let inv = invoker("roundup-no-such-runner-xyz", &[], dir.path());
        assert!(matches!(
            inv.invoke(ActionKind::SendForm, "http://x/"),
            Err(RoundupError::RunnerNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn successful_runner_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        let inv = invoker("true", &["{task}"], dir.path());
        inv.invoke(ActionKind::SendForm, "http://x/").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_runner_surfaces_exit_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let inv = invoker("sh", &["-c", "echo boom >&2; exit 3"], dir.path());
        let err = inv
            .invoke(ActionKind::GenerateReport, "http://x/")
            .unwrap_err();
        match err {
            RoundupError::ActionFailed { action, hint } => {
                assert_eq!(action, "generate_report");
                assert!(hint.contains("boom"), "{hint}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
