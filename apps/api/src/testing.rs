//! Test doubles shared by the pipeline and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, ChatModel, LlmError};
use crate::screening::pdf_text::TextExtractor;

/// Replays canned completions in order and records every conversation it receives.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            conversations: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversations.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 599,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

/// Returns fixed text (or a fixed open failure) regardless of the bytes given.
pub struct StubExtractor {
    text: Result<String, String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            text: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _bytes: &[u8]) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone().map_err(AppError::PdfReadFailed)
    }
}

/// A resume comfortably above the scanned-PDF threshold.
pub fn resume_text() -> String {
    "Jane Doe\nSenior Software Engineer\n\n\
     Experience\n\
     Acme Corp (2019-2024): Built a Rust ingestion service handling 40k events per second. \
     Tuned PostgreSQL queries, cutting p99 latency by 60%. Led migration of batch jobs to Tokio.\n\
     Globex (2016-2019): Backend developer on payment APIs in Go and Python; owned on-call rotation.\n\n\
     Skills\nRust, Tokio, Axum, PostgreSQL, Kafka, Docker, Terraform\n\n\
     Education\nBSc Computer Science, University of Somewhere, 2016\n"
        .to_string()
}
