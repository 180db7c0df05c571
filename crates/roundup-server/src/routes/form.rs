use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use roundup_core::config::Config;
use roundup_core::schedule::is_submission_open;
use roundup_core::submission::{ResponseLog, Submission, SubmissionForm};
use roundup_core::RoundupError;

use crate::embed;
use crate::error::AppError;
use crate::state::AppState;

/// GET /: the form while the cycle accepts submissions, the closed page after.
///
/// The gate is re-evaluated on every request; the deadline can pass while
/// the server is running.
pub async fn home(State(app): State<AppState>) -> Result<Html<String>, AppError> {
    let root = app.root.clone();
    let today = app.clock.today();
    let open = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        is_submission_open(today, config.schedule.send_day)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let name = if open { "index.html" } else { "closed.html" };
    embed::page(name).ok_or_else(|| AppError(anyhow::anyhow!("page '{name}' is not embedded")))
}

/// POST /form: validate and append one submission to the response log.
pub async fn submit(
    State(app): State<AppState>,
    Form(form): Form<SubmissionForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let clock = app.clock.clone();
    let append_lock = app.append_lock.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let now = clock.now();
        if !is_submission_open(now.date(), config.schedule.send_day)? {
            tracing::info!("rejected late submission on {}", now.date());
            return Err(RoundupError::SubmissionClosed);
        }
        let submission = Submission::from_form(form, now)?;

        let _guard = append_lock.lock().unwrap_or_else(|e| e.into_inner());
        ResponseLog::new(config.responses_path(&root)).append(&submission)?;
        tracing::info!("stored response {} from {}", submission.id, submission.employee_email);

        Ok::<_, RoundupError>(serde_json::json!({
            "ok": true,
            "id": submission.id,
            "message": "Your response has been received successfully. Thank you!",
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roundup_core::clock::FixedClock;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state_on(dir: &TempDir, day: u32) -> AppState {
        Config::default().save(dir.path()).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        AppState::with_clock(dir.path().to_path_buf(), Arc::new(FixedClock(now)))
    }

    fn form(email: &str) -> SubmissionForm {
        SubmissionForm {
            employee_email: Some(email.to_string()),
            has_activities: Some("no".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn home_serves_form_before_deadline() {
        let dir = TempDir::new().unwrap();
        let page = home(State(state_on(&dir, 5))).await.unwrap();
        assert!(page.0.contains("<form"));
    }

    #[tokio::test]
    async fn home_serves_closed_page_after_deadline() {
        let dir = TempDir::new().unwrap();
        let page = home(State(state_on(&dir, 6))).await.unwrap();
        assert!(page.0.contains("closed"));
        assert!(!page.0.contains("<form"));
    }

    #[tokio::test]
    async fn home_requires_config() {
        let dir = TempDir::new().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        assert!(home(State(app)).await.is_err());
    }

    #[tokio::test]
    async fn submit_appends_to_log() {
        let dir = TempDir::new().unwrap();
        let app = state_on(&dir, 3);
        let body = submit(State(app), Form(form("a@x.org"))).await.unwrap();
        assert_eq!(body.0["ok"], true);

        let log = ResponseLog::new(Config::default().responses_path(dir.path()));
        assert!(log.responders().unwrap().contains("a@x.org"));
    }

    #[tokio::test]
    async fn submit_after_deadline_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = state_on(&dir, 6);
        let err = submit(State(app), Form(form("a@x.org"))).await.unwrap_err();
        assert!(matches!(
            err.0.downcast_ref::<RoundupError>(),
            Some(RoundupError::SubmissionClosed)
        ));
        let log = ResponseLog::new(Config::default().responses_path(dir.path()));
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn submit_without_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = state_on(&dir, 3);
        let err = submit(State(app), Form(SubmissionForm::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.0.downcast_ref::<RoundupError>(),
            Some(RoundupError::InvalidSubmission(_))
        ));
    }
}
