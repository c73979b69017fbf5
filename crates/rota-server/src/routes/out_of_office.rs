use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rota_core::{date, RotaError};

use crate::error::AppError;
use crate::state::AppState;

/// GET /outofoffice — every member with a recorded window.
pub async fn team_windows(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team = app.team.clone();
    let records = tokio::task::spawn_blocking(move || team.team_out_of_office())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(records)))
}

/// GET /outofoffice/{name} — one member's window.
pub async fn member_window(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team = app.team.clone();
    let lookup = name.clone();
    let window = tokio::task::spawn_blocking(move || team.get_out_of_office(&lookup))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    match window {
        Some(window) => Ok(Json(serde_json::json!(window))),
        None => Err(AppError::not_found(format!(
            "no out of office dates registered for {name}"
        ))),
    }
}

/// POST /outofoffice/{name}/{from}/{to} — record an absence window.
///
/// Dates are `DD-MM-YYYY`. The range is validated here, before the engine:
/// `from` must not exceed `to`, and `to` must not already be in the past.
pub async fn set_window(
    State(app): State<AppState>,
    Path((name, from, to)): Path<(String, String, String)>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let (from, to) = match (date::parse_day(&from), date::parse_day(&to)) {
        (Ok(from), Ok(to)) => (from, to),
        _ => {
            return Err(AppError::bad_request(
                "invalid date format: from and to dates should be DD-MM-YYYY",
            ))
        }
    };

    if from > to {
        return Err(RotaError::InvalidDateRange(
            "from date cannot be greater than to date".to_string(),
        )
        .into());
    }
    if to < date::today() {
        return Err(RotaError::InvalidDateRange(
            "to date cannot be in the past".to_string(),
        )
        .into());
    }

    let team = app.team.clone();
    tokio::task::spawn_blocking(move || team.set_out_of_office(&name, from, to))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "recorded" })),
    ))
}
