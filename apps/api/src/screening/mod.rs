// Resume screening: PDF text → prompt → model → validated verdict.
// All model calls go through llm_client; nothing here talks to the provider directly.

pub mod handlers;
pub mod models;
pub mod pdf_text;
pub mod pipeline;
pub mod prompts;
pub mod validation;
