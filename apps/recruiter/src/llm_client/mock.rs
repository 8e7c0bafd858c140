//! Scripted `TextGenerator` for tests. Records every request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationRequest, LlmError, TextGenerator};

enum Scripted {
    Text(String),
    Fail,
}

/// Returns scripted completions in order, then `fallback` (if set) forever.
#[derive(Default)]
pub struct MockGenerator {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    /// A generator that always answers `text`.
    pub fn always(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// A generator whose every call fails as if the model server were down.
    pub fn failing() -> Self {
        Self::default()
    }

    /// A generator that answers `responses` in order and fails once they run out.
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::default();
        mock.script
            .lock()
            .unwrap()
            .extend(responses.into_iter().map(|s| Scripted::Text(s.into())));
        mock
    }

    /// Queues a failure for the next unscripted call.
    pub fn push_failure(&self) {
        self.script.lock().unwrap().push_back(Scripted::Fail);
    }

    pub fn push_response(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Text(text.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Fail) => Err(LlmError::Unavailable("mock".to_string())),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::Unavailable("mock".to_string())),
        }
    }
}
