//! Application state shared by all handlers

use std::sync::Arc;
use std::time::Duration;

use crate::domain::KnowledgeBaseProvider;
use crate::infrastructure::crag::CragWorkflow;

/// Pacing of the re-chunked answer on `/stream`
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    /// Characters per event
    pub chunk_size: usize,
    pub chunk_delay: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            chunk_size: 5,
            chunk_delay: Duration::from_millis(50),
        }
    }
}

/// Services built once at start-up
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<CragWorkflow>,
    pub knowledge_base: Arc<dyn KnowledgeBaseProvider>,
    pub stream: StreamSettings,
}

impl AppState {
    pub fn new(workflow: Arc<CragWorkflow>, knowledge_base: Arc<dyn KnowledgeBaseProvider>) -> Self {
        Self {
            workflow,
            knowledge_base,
            stream: StreamSettings::default(),
        }
    }

    pub fn with_stream_settings(mut self, stream: StreamSettings) -> Self {
        self.stream = StreamSettings {
            chunk_size: stream.chunk_size.max(1),
            ..stream
        };
        self
    }
}
