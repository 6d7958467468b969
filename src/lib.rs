//! Corrective RAG service
//!
//! Answers questions from a knowledge base, grading each retrieved document
//! for relevance and falling back to a rewritten web search when any of them
//! misses. Services are built once at start-up and shared by every request.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::{AppState, StreamSettings};
use domain::{KnowledgeBaseProvider, WebSearchProvider};
use infrastructure::{
    crag::{
        CragWorkflow, KnowledgeBaseRetriever, LlmAnswerGenerator, LlmQueryRewriter,
        LlmRelevanceGrader,
    },
    knowledge_base::{load_corpus, InMemoryKnowledgeBaseProvider},
    llm::{HttpClient, LlmProviderFactory},
    web_search::TavilySearchProvider,
};
use tracing::{info, warn};

/// Build the knowledge base and seed it from the configured corpus
pub async fn create_knowledge_base(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn KnowledgeBaseProvider>> {
    let mut kb = InMemoryKnowledgeBaseProvider::new(&config.knowledge_base.id);

    if config.embedding.enabled {
        let connection = config.embedding.connection(&config.llm);
        let embedder = LlmProviderFactory::create_embedding(&connection, &config.embedding.model)?;
        info!(model = %config.embedding.model, "Ranking knowledge base by embeddings");
        kb = kb.with_embedder(embedder);
    }

    match config.knowledge_base.corpus_path {
        Some(ref path) => {
            let documents = load_corpus(path).await?;
            kb.add_documents(documents).await?;
        }
        None => warn!("No knowledge_base.corpus_path configured; every question will use web search"),
    }

    Ok(Arc::new(kb))
}

fn create_web_search(config: &AppConfig) -> anyhow::Result<Arc<dyn WebSearchProvider>> {
    let web = &config.web_search;
    let api_key = web
        .api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("TAVILY_API_KEY is not configured"))?;
    let client = HttpClient::with_timeout(Duration::from_secs(web.timeout_secs))?;

    Ok(Arc::new(
        TavilySearchProvider::with_base_url(client, api_key, &web.base_url)
            .with_max_results(web.max_results),
    ))
}

/// Wire the workflow collaborators from configuration
pub fn create_workflow(
    config: &AppConfig,
    knowledge_base: Arc<dyn KnowledgeBaseProvider>,
) -> anyhow::Result<CragWorkflow> {
    let llm = LlmProviderFactory::create(&config.llm.connection())?;
    let temperature = config.llm.temperature;

    let retriever = KnowledgeBaseRetriever::new(knowledge_base)
        .with_top_k(config.knowledge_base.top_k)
        .with_similarity_threshold(config.knowledge_base.similarity_threshold);
    let grader = LlmRelevanceGrader::new(llm.clone(), config.llm.grader_model())
        .with_temperature(temperature);
    let rewriter = LlmQueryRewriter::new(llm.clone(), config.llm.rewriter_model())
        .with_temperature(temperature);
    let generator = LlmAnswerGenerator::new(llm, &config.llm.model).with_temperature(temperature);

    info!(
        provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        grader_model = %config.llm.grader_model(),
        rewriter_model = %config.llm.rewriter_model(),
        "Workflow configured"
    );

    Ok(CragWorkflow::new(
        Arc::new(retriever),
        Arc::new(grader),
        Arc::new(rewriter),
        create_web_search(config)?,
        Arc::new(generator),
    )
    .with_config(config.workflow.crag_config()))
}

/// Validate configuration and build every shared service
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let knowledge_base = create_knowledge_base(config).await?;
    let workflow = create_workflow(config, knowledge_base.clone())?;

    Ok(AppState::new(Arc::new(workflow), knowledge_base).with_stream_settings(StreamSettings {
        chunk_size: config.workflow.stream_chunk_size,
        chunk_delay: config.workflow.stream_chunk_delay(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys() -> AppConfig {
        let mut config = AppConfig::default();
        config.web_search.api_key = Some("tvly-test".to_string());
        config
    }

    #[tokio::test]
    async fn test_create_app_state_rejects_missing_key() {
        let result = create_app_state(&AppConfig::default()).await;

        let error = result.err().unwrap().to_string();
        assert!(error.contains("TAVILY_API_KEY"));
    }

    #[tokio::test]
    async fn test_create_app_state_with_defaults() {
        let state = create_app_state(&config_with_keys()).await.unwrap();

        assert_eq!(state.knowledge_base.knowledge_base_id(), "default");
        assert_eq!(state.knowledge_base.document_count().await.unwrap(), 0);
        assert_eq!(state.stream.chunk_size, 5);
        assert_eq!(state.workflow.config().max_corrective_passes, 1);
    }

    #[tokio::test]
    async fn test_missing_corpus_fails_start_up() {
        let mut config = config_with_keys();
        config.knowledge_base.corpus_path = Some("/nonexistent/corpus.json".into());

        assert!(create_knowledge_base(&config).await.is_err());
    }
}
