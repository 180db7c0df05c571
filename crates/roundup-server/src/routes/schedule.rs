use axum::extract::State;
use axum::Json;
use roundup_core::config::Config;
use roundup_core::schedule::{CycleKey, CycleSchedule};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/schedule: the current cycle's dates and whether the form is open.
pub async fn get_schedule(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let today = app.clock.today();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let schedule = CycleSchedule::containing(today, config.schedule.send_day)?;
        Ok::<_, roundup_core::RoundupError>(serde_json::json!({
            "cycle": CycleKey::of(today).to_string(),
            "today": today,
            "send_day": schedule.send_day,
            "reminder_day": schedule.reminder_day,
            "last_submission_day": schedule.last_submission_day,
            "report_day": schedule.report_day,
            "submission_open": schedule.accepts_submissions_on(today),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
