//! Analysis pipeline — one screening request from upload to validated verdict.
//!
//! extract text → build prompts → call model → parse → (repair once) → validate.
//! Every exit maps to a fixed `AppError` code. Nothing is persisted.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::errors::{AnalysisFailure, AppError};
use crate::llm_client::prompts::build_repair_prompt;
use crate::llm_client::{ChatMessage, ChatModel};
use crate::screening::models::{AnalysisRequest, ValidatedAnalysis};
use crate::screening::pdf_text::TextExtractor;
use crate::screening::prompts::build_prompts;
use crate::screening::validation::{parse_object, validate};

pub const MIN_TITLE_CHARS: usize = 3;
/// Below this many characters the upload is treated as a scanned, image-only PDF.
pub const MIN_RESUME_CHARS: usize = 300;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Composes text extraction, prompting, the model call and validation.
/// Holds only immutable collaborators, so one instance serves all requests.
pub struct AnalysisPipeline {
    model: Arc<dyn ChatModel>,
    extractor: Arc<dyn TextExtractor>,
}

impl AnalysisPipeline {
    pub fn new(model: Arc<dyn ChatModel>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { model, extractor }
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<ValidatedAnalysis, AppError> {
        let title = request.position_title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(AppError::InvalidInput(
                "position_title too short".to_string(),
            ));
        }

        if request.resume.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::UnsupportedFileType);
        }

        let extracted = self.extract_text(request.resume.bytes).await?;
        let resume_text = extracted.trim();
        let chars = resume_text.chars().count();
        if chars < MIN_RESUME_CHARS {
            return Err(AppError::NoExtractableText { chars });
        }
        debug!("Extracted {chars} characters of resume text");

        let prompts = build_prompts(title, &request.position_description, resume_text);
        let mut messages = vec![
            ChatMessage::system(prompts.system),
            ChatMessage::user(prompts.user),
        ];

        let completion = self
            .model
            .complete(&messages)
            .await
            .map_err(AppError::ModelCallFailed)?;
        let completion = completion.trim();

        let parsed = match parse_object(completion) {
            Some(object) => object,
            None => {
                warn!("Model output was not a JSON object; sending one repair request");
                messages.push(ChatMessage::user(build_repair_prompt(completion)));
                let repaired = self
                    .model
                    .complete(&messages)
                    .await
                    .map_err(AppError::RepairFailed)?;
                parse_object(&repaired).ok_or(AnalysisFailure::InvalidJson)?
            }
        };

        let analysis = validate(parsed).map_err(AnalysisFailure::from)?;

        info!(
            title,
            fit_level = ?analysis.fit_level(),
            confidence = ?analysis.confidence(),
            suitable = analysis.suitable(),
            recommendation = ?analysis.screening_recommendation(),
            "Analysis complete"
        );

        Ok(analysis)
    }

    /// Runs the extractor on the blocking pool. A panic inside the extractor is
    /// reported as an unreadable PDF.
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| AppError::PdfReadFailed(format!("extraction aborted: {e}")))?
    }
}
