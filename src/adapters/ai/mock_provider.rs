//! Scripted AI provider for tests.
//!
//! Answers are consumed in order; once the script runs out every call gets
//! the fallback text. Every request is recorded for later inspection.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("a".repeat(300))
//!     .with_response("short enough");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AIError, AIProvider, Completion, CompletionRequest};

const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider. Clones share the script and the call history.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    fallback: Option<String>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful answer.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()))
    }

    /// Queues a failure.
    pub fn with_error(self, error: AIError) -> Self {
        self.push(Err(error))
    }

    /// Content returned for every call once the script is empty.
    pub fn with_fallback(mut self, content: impl Into<String>) -> Self {
        self.fallback = Some(content.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every request received so far, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, answer: Result<String, AIError>) -> Self {
        self.script.lock().unwrap().push_back(answer);
        self
    }

    fn next_answer(&self) -> Result<String, AIError> {
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(self
                .fallback
                .clone()
                .unwrap_or_else(|| "Mock response".to_string()))
        })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AIError> {
        self.calls.lock().unwrap().push(request);

        self.next_answer().map(|content| Completion {
            content,
            model: MOCK_MODEL.to_string(),
        })
    }
}
