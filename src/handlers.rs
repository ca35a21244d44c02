use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::commands::{CommandError, CommandInfo};
use crate::config_manager::SettingsError;
use crate::editor::{Notification, Selection};
use crate::state::AppState;
use crate::translate::{Severity, TranslateError, TranslateRequest, TranslateResponse, TranslationRequest};

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct RunCommandRequest {
    pub text: String,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

#[derive(Debug, Serialize)]
pub struct RunCommandResponse {
    pub text: String,
    pub applied: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: Value,
}

fn api_error(status: StatusCode, level: Severity, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"status": level, "message": message.into()})))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let translator = &state.config.translator_config;
    Json(json!({
        "status": "ok",
        "endpoint": translator.endpoint,
        "selection_mode": translator.selection_mode,
    }))
}

pub async fn list_commands(State(state): State<AppState>) -> Json<Vec<CommandInfo>> {
    Json(state.commands.list())
}

pub async fn run_command(
    State(state): State<AppState>,
    Path(command_id): Path<String>,
    Json(payload): Json<RunCommandRequest>,
) -> Result<Json<RunCommandResponse>, ApiError> {
    info!("Running command {} on {} selections", command_id, payload.selections.len());

    let (buffer, report) = state
        .commands
        .run_on_buffer(&command_id, &state.session, payload.text, payload.selections)
        .await
        .map_err(|e| match e {
            CommandError::Unknown(_) => api_error(StatusCode::NOT_FOUND, Severity::Error, e.to_string()),
            CommandError::Editor(_) => api_error(StatusCode::BAD_REQUEST, Severity::Error, e.to_string()),
        })?;

    let (text, notifications) = buffer.into_parts();
    Ok(Json(RunCommandResponse {
        text,
        applied: report.applied,
        notifications,
    }))
}

pub async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let mark_unknown = payload
        .mark_unknown
        .unwrap_or_else(|| state.settings.mark_unknown());
    let result = match TranslationRequest::build(&payload.text, &payload.source, &payload.target, mark_unknown) {
        Ok(request) => state.session.translate(&request).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(translated_text) => Ok(Json(TranslateResponse { translated_text })),
        Err(err) => {
            warn!("Translation failed: {}", err);
            let status = match err {
                TranslateError::EmptyInput => StatusCode::BAD_REQUEST,
                TranslateError::NoTranslation { .. } | TranslateError::Transport(_) => StatusCode::BAD_GATEWAY,
            };
            Err(api_error(status, err.severity(), err.to_string()))
        }
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "schema": state.settings.schema(),
        "values": state.settings.snapshot(),
    }))
}

pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<Json<Value>, ApiError> {
    // The store writes its file synchronously
    let settings = state.settings.clone();
    let (setting_key, value) = (key.clone(), payload.value.clone());
    let result = tokio::task::spawn_blocking(move || settings.set(&setting_key, value))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, Severity::Error, e.to_string()))?;

    result.map_err(|e| {
        let status = match e {
            SettingsError::UnknownKey(_) => StatusCode::NOT_FOUND,
            SettingsError::WrongType { .. } => StatusCode::BAD_REQUEST,
            SettingsError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, Severity::Error, e.to_string())
    })?;

    Ok(Json(json!({"key": key, "value": payload.value})))
}
