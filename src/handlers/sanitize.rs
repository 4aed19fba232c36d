use axum::{Json, extract::Path, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::sanitize::{SanitizeRequest, SanitizeResponse},
    sanitizer::{Preset, sanitize},
};

/// Sanitize a piece of text against one of the policy presets.
pub async fn sanitize_text(
    Json(payload): Json<SanitizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let render_markdown = payload.renders_markdown();
    let preset = payload.preset;
    let text = payload.text;

    // Sanitizing is CPU-bound; keep it off the async workers.
    let html = tokio::task::spawn_blocking(move || {
        sanitize(&text, preset.policy(), render_markdown)
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    tracing::debug!(
        preset = preset.as_str(),
        render_markdown,
        "sanitized text via api"
    );

    Ok(Json(SanitizeResponse { html }))
}

/// Describe the tags, attributes and schemes a preset allows.
pub async fn get_policy(Path(preset): Path<String>) -> Result<impl IntoResponse, AppError> {
    let preset = preset.parse::<Preset>().map_err(AppError::NotFound)?;

    Ok(Json(preset.policy()))
}
