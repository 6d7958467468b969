//! CRAG workflow engine
//!
//! Runs retrieve -> grade -> (transform query -> web search) -> generate for a
//! single question. Every external call is raced against the per-step timeout
//! and the caller's cancellation token.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::crag::{
    build_context, decide_route, extract_rewritten_question, AnswerGenerator, CragConfig,
    GradingOutcome, QueryRewriter, RelevanceGrade, RelevanceGrader, Retriever, Route, StepTiming,
    WebSearchProvider, WebSearchRecord, WorkflowError, WorkflowNode, WorkflowOutcome,
    WorkflowState,
};
use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_documents_graded, record_step_duration, record_web_search_results,
    record_workflow_run,
};

/// The corrective RAG state machine
#[derive(Debug, Clone)]
pub struct CragWorkflow {
    retriever: Arc<dyn Retriever>,
    grader: Arc<dyn RelevanceGrader>,
    rewriter: Arc<dyn QueryRewriter>,
    web_search: Arc<dyn WebSearchProvider>,
    generator: Arc<dyn AnswerGenerator>,
    config: CragConfig,
}

impl CragWorkflow {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        grader: Arc<dyn RelevanceGrader>,
        rewriter: Arc<dyn QueryRewriter>,
        web_search: Arc<dyn WebSearchProvider>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            retriever,
            grader,
            rewriter,
            web_search,
            generator,
            config: CragConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CragConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CragConfig {
        &self.config
    }

    /// Answer a question
    pub async fn run(&self, question: &str) -> Result<WorkflowOutcome, WorkflowError> {
        self.run_with_cancellation(question, CancellationToken::new())
            .await
    }

    /// Answer a question, aborting with `Cancelled` as soon as `cancel` fires
    pub async fn run_with_cancellation(
        &self,
        question: &str,
        cancel: CancellationToken,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let span = info_span!("crag_workflow", request_id = %Uuid::new_v4());
        let start = Instant::now();

        let result = self.execute(question, &cancel).instrument(span).await;

        match &result {
            Ok(outcome) => {
                record_workflow_run("success", Some(outcome.route.as_str()), start.elapsed())
            }
            Err(e) => record_workflow_run(e.kind(), None, start.elapsed()),
        }

        result
    }

    async fn execute(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        if question.trim().is_empty() {
            return Err(WorkflowError::invalid_input("question must not be empty"));
        }

        let start = Instant::now();
        let mut state = WorkflowState::new(question);
        let mut steps = Vec::new();

        let documents = self
            .guarded(
                WorkflowNode::Retrieve,
                cancel,
                &mut steps,
                self.retriever.retrieve(state.question()),
            )
            .await?;
        info!(count = documents.len(), "Retrieved documents");
        state.set_retrieved(documents);

        let mut first_route = None;

        loop {
            let grades = self
                .guarded(
                    WorkflowNode::GradeDocuments,
                    cancel,
                    &mut steps,
                    self.grade_all(state.question(), state.documents()),
                )
                .await?;

            let outcome = GradingOutcome::from_grades(state.documents().to_vec(), &grades);
            record_documents_graded(outcome.relevant.len(), outcome.discarded);
            info!(
                relevant = outcome.relevant.len(),
                discarded = outcome.discarded,
                "Graded documents"
            );
            state.apply_grading(outcome);

            let route = decide_route(&state);
            first_route.get_or_insert(route);
            info!(route = route.as_str(), "Routing after grading");

            if route == Route::Generate {
                break;
            }

            let rewritten = self
                .guarded(
                    WorkflowNode::TransformQuery,
                    cancel,
                    &mut steps,
                    self.rewriter.rewrite(state.question()),
                )
                .await?;
            let better_question = extract_rewritten_question(&rewritten, state.question());
            info!(question = %better_question, "Rewrote question");
            state.set_rewritten_question(better_question);

            let records = self
                .guarded(
                    WorkflowNode::WebSearch,
                    cancel,
                    &mut steps,
                    self.web_search.search(state.question()),
                )
                .await?;
            record_web_search_results(records.len());
            info!(count = records.len(), "Web search returned results");
            state.append_web_results(
                records
                    .into_iter()
                    .map(WebSearchRecord::into_document)
                    .collect(),
            );

            // Web results are trusted once the corrective budget is spent
            if !state.can_correct(self.config.max_corrective_passes) {
                break;
            }
        }

        let context = build_context(state.documents());
        let generation = self
            .guarded(
                WorkflowNode::Generate,
                cancel,
                &mut steps,
                self.generator.generate(&context, state.question()),
            )
            .await?;
        state.set_generation(generation);

        let execution_time_ms = start.elapsed().as_millis() as u64;
        info!(
            execution_time_ms,
            corrective_passes = state.corrective_passes(),
            "Workflow complete"
        );

        Ok(WorkflowOutcome {
            state,
            route: first_route.unwrap_or(Route::Generate),
            steps,
            execution_time_ms,
        })
    }

    /// Grade every document, keeping input order. The first failure aborts the pass.
    async fn grade_all(
        &self,
        question: &str,
        documents: &[Document],
    ) -> Result<Vec<RelevanceGrade>, DomainError> {
        let grading: Vec<_> = documents
            .iter()
            .map(|doc| self.grader.grade(question, doc.content()))
            .collect();
        let grades: Vec<RelevanceGrade> = stream::iter(grading)
        .buffered(self.config.grading_concurrency.max(1))
        .try_collect()
        .await?;

        for (doc, grade) in documents.iter().zip(&grades) {
            debug!(grade = grade.as_str(), source = ?doc.source(), "Document graded");
        }

        Ok(grades)
    }

    async fn guarded<T, F>(
        &self,
        node: WorkflowNode,
        cancel: &CancellationToken,
        steps: &mut Vec<StepTiming>,
        call: F,
    ) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        info!(node = %node, "Entering node");
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WorkflowError::cancelled(node)),
            res = tokio::time::timeout(self.config.step_timeout(), call) => match res {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(WorkflowError::for_node(node, e)),
                Err(_) => Err(WorkflowError::timeout(node, self.config.step_timeout_ms)),
            },
        };

        let elapsed = started.elapsed();
        record_step_duration(node.as_str(), elapsed);
        steps.push(StepTiming {
            node,
            duration_ms: elapsed.as_millis() as u64,
        });

        if let Err(ref e) = result {
            warn!(node = %node, error = %e, "Workflow step failed");
        }

        result
    }
}
