//! Axum route handlers for the Screening API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::models::{AnalysisRequest, ResumeUpload, ValidatedAnalysis};
use crate::state::AppState;

/// POST /analyze
///
/// Multipart form: `position_title`, optional `position_description`, `cv_pdf`.
/// Returns the validated analysis object exactly as the model produced it.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ValidatedAnalysis>, AppError> {
    let request_id = Uuid::new_v4();

    async move {
        let multipart = multipart.map_err(|e| AppError::InvalidInput(e.body_text()))?;
        let request = read_analysis_form(multipart).await?;
        let analysis = state.pipeline.analyze(request).await?;
        Ok(Json(analysis))
    }
    .instrument(info_span!("analyze", %request_id))
    .await
}

async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisRequest, AppError> {
    let mut position_title = String::new();
    let mut position_description = String::new();
    let mut resume = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "position_title" => position_title = field.text().await.map_err(invalid_form)?,
            "position_description" => {
                position_description = field.text().await.map_err(invalid_form)?
            }
            "cv_pdf" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(invalid_form)?;
                resume = Some(ResumeUpload {
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| AppError::InvalidInput("cv_pdf is required".to_string()))?;

    Ok(AnalysisRequest {
        position_title,
        position_description,
        resume,
    })
}

fn invalid_form(e: MultipartError) -> AppError {
    AppError::InvalidInput(e.body_text())
}
