//! `GET /stream`
//!
//! Waits for the full generation, then replays it in fixed-size character
//! chunks as server-sent events terminated by `[DONE]`. This is paced
//! delivery of a finished answer, not token streaming from the model.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::AppState;
use super::types::{ApiError, StreamParams};
use crate::domain::WorkflowError;

pub const DONE_SENTINEL: &str = "[DONE]";

type EventSender = mpsc::Sender<Result<Event, Infallible>>;

pub async fn stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(question = %params.question, "Stream query received");

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(produce_events(state, params.question, tx));

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default())
}

async fn produce_events(state: AppState, question: String, tx: EventSender) {
    let cancel = CancellationToken::new();
    let run = state.workflow.run_with_cancellation(&question, cancel.clone());
    tokio::pin!(run);

    let finished = tokio::select! {
        result = &mut run => Some(result),
        _ = tx.closed() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => {
            debug!("Stream client disconnected, cancelling workflow");
            cancel.cancel();
            run.await
        }
    };

    match result {
        Ok(outcome) => {
            for chunk in chunk_text(outcome.generation(), state.stream.chunk_size) {
                if tx.send(Ok(Event::default().data(chunk))).await.is_err() {
                    return;
                }

                if !state.stream.chunk_delay.is_zero() {
                    tokio::time::sleep(state.stream.chunk_delay).await;
                }
            }
        }
        Err(WorkflowError::Cancelled { .. }) => return,
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "Stream query failed");
            let detail = ApiError::from(e).response.detail.replace('\r', "");

            if tx
                .send(Ok(Event::default().event("error").data(detail)))
                .await
                .is_err()
            {
                return;
            }
        }
    }

    let _ = tx.send(Ok(Event::default().data(DONE_SENTINEL))).await;
}

/// Split `text` into chunks of at most `size` characters.
///
/// Carriage returns are dropped since SSE data fields cannot carry them.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().filter(|c| *c != '\r').collect();

    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
