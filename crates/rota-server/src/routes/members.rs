use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /members — every member's history, in membership order.
pub async fn list_members(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team = app.team.clone();
    let history = tokio::task::spawn_blocking(move || team.team_history())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(history)))
}

/// POST /members/{name} — add a member. Idempotent on duplicates.
pub async fn add_member(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let team = app.team.clone();
    let members = tokio::task::spawn_blocking(move || {
        team.add_member(&name)?;
        team.list_members()
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "members": members })),
    ))
}

/// DELETE /members/{name} — remove a member. Idempotent on absentees.
pub async fn remove_member(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team = app.team.clone();
    let members = tokio::task::spawn_blocking(move || {
        team.remove_member(&name)?;
        team.list_members()
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "members": members })))
}
