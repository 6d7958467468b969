use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{DomainError, WebSearchProvider, WebSearchRecord};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Web search backed by the Tavily search API
#[derive(Debug)]
pub struct TavilySearchProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    answer: Option<String>,
}

impl<C: HttpClientTrait> TavilySearchProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_TAVILY_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: 5,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

fn into_records(response: TavilyResponse) -> Vec<WebSearchRecord> {
    if response.results.is_empty() {
        return response
            .answer
            .filter(|a| !a.trim().is_empty())
            .map(WebSearchRecord::PlainText)
            .into_iter()
            .collect();
    }

    response
        .results
        .into_iter()
        .map(|result| match result {
            Value::Object(map) => WebSearchRecord::Structured(map),
            Value::String(text) => WebSearchRecord::PlainText(text),
            other => WebSearchRecord::PlainText(other.to_string()),
        })
        .collect()
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for TavilySearchProvider<C> {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchRecord>, DomainError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });

        let json = self
            .client
            .post_json(
                &self.search_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await
            .map_err(|e| DomainError::provider("tavily", e.to_string()))?;

        let response: TavilyResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("tavily", format!("Failed to parse response: {}", e))
        })?;

        let records = into_records(response);
        debug!(results = records.len(), "Tavily search completed");

        Ok(records)
    }

    fn provider_name(&self) -> &'static str {
        "tavily"
    }
}
