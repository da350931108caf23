use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::screening::validation::Violation;

/// Why a model completion could not be turned into an analysis result.
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("invalid JSON from model")]
    InvalidJson,

    #[error("schema validation error: {0}")]
    Schema(#[from] Violation),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The `Display` form is the caller-visible `CODE: detail` string.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    #[error("UNSUPPORTED_FILE_TYPE: PDF only")]
    UnsupportedFileType,

    #[error("PDF_READ_FAILED: {0}")]
    PdfReadFailed(String),

    #[error("NO_EXTRACTABLE_TEXT: looks like scan ({chars} characters extracted)")]
    NoExtractableText { chars: usize },

    #[error("OPENAI_CALL_FAILED: {0}")]
    ModelCallFailed(#[source] LlmError),

    #[error("OPENAI_REPAIR_FAILED: {0}")]
    RepairFailed(#[source] LlmError),

    #[error("ANALYSIS_FAILED: {0}")]
    AnalysisFailed(#[from] AnalysisFailure),
}

impl AppError {
    /// The fixed machine-readable code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            AppError::PdfReadFailed(_) => "PDF_READ_FAILED",
            AppError::NoExtractableText { .. } => "NO_EXTRACTABLE_TEXT",
            AppError::ModelCallFailed(_) => "OPENAI_CALL_FAILED",
            AppError::RepairFailed(_) => "OPENAI_REPAIR_FAILED",
            AppError::AnalysisFailed(_) => "ANALYSIS_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::UnsupportedFileType
            | AppError::PdfReadFailed(_)
            | AppError::NoExtractableText { .. } => StatusCode::BAD_REQUEST,
            AppError::ModelCallFailed(_)
            | AppError::RepairFailed(_)
            | AppError::AnalysisFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let detail = self.to_string();
        let message = detail
            .strip_prefix(code)
            .and_then(|rest| rest.strip_prefix(": "))
            .unwrap_or(&detail)
            .to_string();

        if status.is_server_error() {
            tracing::error!("{detail}");
        } else {
            tracing::warn!("{detail}");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            },
            "detail": detail
        }));

        (status, body).into_response()
    }
}
