//! Stateless generation agents. Each operation builds one prompt, makes one
//! backend call and post-processes the text with the `extract` heuristics.

pub mod email;
pub mod extract;
pub mod handlers;
pub mod jd_generator;
pub mod prompts;
pub mod recommendation;
pub mod resume_ranker;
pub mod scheduler;
pub mod sentiment;

use crate::errors::AppError;
use crate::llm_client::{GenerationRequest, TextGenerator};

/// One backend call with the given sampling settings; failures are tagged with `operation`.
pub(crate) async fn complete(
    llm: &dyn TextGenerator,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    operation: &str,
) -> Result<String, AppError> {
    let request = GenerationRequest::new(prompt)
        .max_tokens(max_tokens)
        .temperature(temperature);

    llm.generate(&request)
        .await
        .map_err(|e| AppError::llm(operation, e))
}
