//! Intent parsing service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::XeroMlResult;
use crate::services::executor::RequestExecutor;
use crate::types::graph::{GraphPayload, IntentGraph, ParseResponse};
use crate::types::requests::ParseRequest;

const PARSE_PATH: &str = "/v1/parse";

/// Service for turning free text into an [`IntentGraph`].
pub struct IntentService {
    executor: Arc<RequestExecutor>,
}

impl IntentService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Classifies a piece of text with the server's default provider.
    pub async fn classify(&self, text: &str) -> XeroMlResult<IntentGraph> {
        self.parse(ParseRequest::new(text)).await
    }

    /// Parses a message into an intent graph.
    pub async fn parse(&self, request: impl Into<ParseRequest>) -> XeroMlResult<IntentGraph> {
        self.parse_full(request).await.map(|response| response.graph)
    }

    /// Parses a message and returns the full response envelope.
    #[instrument(skip(self, request))]
    pub async fn parse_full(&self, request: impl Into<ParseRequest>) -> XeroMlResult<ParseResponse> {
        let request = request.into();
        request_graph(&self.executor, "parse", PARSE_PATH, &request).await
    }
}

impl std::fmt::Debug for IntentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentService").finish()
    }
}

/// Validates and posts a parse request, then checks the returned graph.
pub(crate) async fn request_graph(
    executor: &RequestExecutor,
    operation: &'static str,
    path: &str,
    request: &ParseRequest,
) -> XeroMlResult<ParseResponse> {
    request.validate()?;
    let payload: GraphPayload = executor.post_json(operation, path, request).await?;
    let response = payload.into_response();
    response.graph.validate()?;
    tracing::debug!(
        sub_goals = response.graph.sub_goal_count(),
        confidence = response.graph.meta.confidence,
        "Parsed intent graph"
    );
    Ok(response)
}

/// Fetches a graph with GET, accepting envelope or bare payloads.
pub(crate) async fn fetch_graph(
    executor: &RequestExecutor,
    operation: &'static str,
    path: &str,
) -> XeroMlResult<IntentGraph> {
    let payload: GraphPayload = executor.get_json(operation, path).await?;
    let graph = payload.into_response().graph;
    graph.validate()?;
    Ok(graph)
}
