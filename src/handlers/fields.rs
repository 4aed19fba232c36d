use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};

use crate::{
    config::Config,
    error::AppError,
    forms::{Field, FieldKind, WysiwygWidget},
    models::field::{CleanedFieldResponse, FieldParams},
};

fn parse_kind(kind: &str) -> Result<FieldKind, AppError> {
    kind.parse::<FieldKind>().map_err(AppError::NotFound)
}

/// Validate and clean a raw field submission.
/// The request body is the field value exactly as submitted.
pub async fn clean_field(
    State(config): State<Config>,
    Path(kind): Path<String>,
    Query(params): Query<FieldParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let field = Field::new(params.field_name(), kind).max_length(config.max_field_chars);

    let (field, result) = tokio::task::spawn_blocking(move || {
        let result = field.clean(&body);
        (field, result)
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let cleaned = result.map_err(|e| {
        tracing::info!(field = field.name(), kind = kind.as_str(), "field rejected: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(CleanedFieldResponse {
        field: field.name().to_string(),
        cleaned,
    }))
}

/// Render the editor widget for a field.
pub async fn render_widget(
    Path(kind): Path<String>,
    Query(params): Query<FieldParams>,
) -> Result<impl IntoResponse, AppError> {
    parse_kind(&kind)?;

    Ok(Html(WysiwygWidget::new().render(params.field_name(), None)))
}
