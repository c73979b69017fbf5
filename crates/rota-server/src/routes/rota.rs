use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rota_core::date;
use rota_core::picker::NextPick;

use crate::error::AppError;
use crate::state::AppState;

/// GET /rota/next — side-effect-free preview of who would be picked.
pub async fn next(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let team = app.team.clone();
    let pick = tokio::task::spawn_blocking(move || team.select_next())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let body = match pick {
        NextPick::Member(name) => serde_json::json!({ "next": name }),
        NextPick::NoHistory => {
            serde_json::json!({ "next": null, "reason": "team has no recorded history" })
        }
        NextPick::NoneEligible => {
            serde_json::json!({ "next": null, "reason": "no eligible candidate" })
        }
    };
    Ok(Json(body))
}

/// GET /rota/confirm/{name}/{date} — confirm the pick for today.
///
/// The date in the path must be today's: confirm links live in yesterday's
/// announcements too, and a stale click must not claim a fresh day.
pub async fn confirm(
    State(app): State<AppState>,
    Path((name, day)): Path<(String, String)>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let day = date::parse_day(&day)
        .map_err(|_| AppError::bad_request("confirmation date should be DD-MM-YYYY"))?;
    if day != date::today() {
        return Err(AppError::bad_request(
            "illegal confirmation: date has to be today",
        ));
    }
    working_day_guard(&app)?;

    let _guard = app.commit_lock.lock().await;
    let team = app.team.clone();
    let member = name.clone();
    tokio::task::spawn_blocking(move || team.commit_pick(&member))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    announce(&app, format!("The person picked today is confirmed to be: {name}")).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "confirmed": name })),
    ))
}

/// GET /rota/override/{name} — replace today's pick.
pub async fn override_pick(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    working_day_guard(&app)?;

    let _guard = app.commit_lock.lock().await;
    let team = app.team.clone();
    let member = name.clone();
    tokio::task::spawn_blocking(move || team.override_pick(&member))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    announce(&app, format!("The rota pick for today was overridden. It's now: {name}")).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "assigned": name })),
    ))
}

fn working_day_guard(app: &AppState) -> Result<(), AppError> {
    match app.calendar.today_non_working() {
        Some(reason) => Err(AppError::forbidden(format!(
            "no pick on a non-working day: today is {reason}"
        ))),
        None => Ok(()),
    }
}

/// Fire-and-forget announcement. The commit already landed; a delivery
/// failure is logged, never returned.
async fn announce(app: &AppState, message: String) {
    let notifier = app.notifier.clone();
    let result = tokio::task::spawn_blocking(move || notifier.send(&message)).await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(%err, "failed to announce pick"),
        Err(err) => tracing::error!(%err, "notifier task panicked"),
    }
}
