use crate::{error::AppError, AppState};
use appeal_shared::{
    api::{AppealResponse, ListResponse, SubmitResponse},
    Appeal,
};
use appeal_store::{slot, StoreError};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Local;
use tracing::{info, warn};

pub async fn submit_appeal(
    State(state): State<AppState>,
    payload: Result<Json<Appeal>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(mut appeal) = payload.map_err(|e| AppError::MalformedBody(e.body_text()))?;

    // Format and length rules are the form's job; only presence is checked here.
    if appeal.missing_required() {
        warn!("Rejected appeal with missing required fields");
        return Err(AppError::MissingFields);
    }

    appeal.stamp(Local::now());

    let id = state
        .store
        .insert(&appeal)
        .await
        .map_err(AppError::SaveFailed)?;

    let file_name = slot::file_name(id);
    info!("Appeal saved: {} (user: {})", file_name, appeal.username);
    tracing::debug!(
        "Reason: {}...",
        appeal.reason.chars().take(50).collect::<String>()
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: format!("Appeal saved as {}", file_name),
        appeal_id: id,
    }))
}

pub async fn list_appeals(State(state): State<AppState>) -> Result<Json<ListResponse>, AppError> {
    let appeals = state.store.list().await.map_err(AppError::ListFailed)?;

    Ok(Json(ListResponse {
        success: true,
        count: appeals.len(),
        appeals,
    }))
}

pub async fn get_appeal(
    Path(raw_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AppealResponse>, AppError> {
    let id = slot::parse_id(&raw_id).ok_or(AppError::NotFound)?;

    let appeal = state.store.read(id).await.map_err(|e| match e {
        StoreError::NotFound(_) => AppError::NotFound,
        other => AppError::ReadFailed(other),
    })?;

    Ok(Json(AppealResponse {
        success: true,
        appeal,
    }))
}
