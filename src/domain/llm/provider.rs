use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers (OpenAI, Ollama, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays queued text responses in order; the last one repeats once the queue drains
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        responses: Mutex<VecDeque<String>>,
        last: Mutex<Option<String>>,
        requests: Mutex<Vec<LlmRequest>>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                responses: Mutex::new(VecDeque::new()),
                last: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_response(self, content: impl Into<String>) -> Self {
            self.responses.lock().unwrap().push_back(content.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let next = self.responses.lock().unwrap().pop_front();
            let content = match next {
                Some(content) => {
                    *self.last.lock().unwrap() = Some(content.clone());
                    content
                }
                None => self.last.lock().unwrap().clone().ok_or_else(|| {
                    DomainError::provider(self.name, "No mock response configured")
                })?,
            };

            Ok(LlmResponse::new("mock-id", model, Message::assistant(content)))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
