//! The request pipeline: a request logger wrapping an ordered list of stages.
//!
//! Every request runs `logger → stages[0] → stages[1] → … → handler`. Each
//! stage either lets the request through, answers it (a rejection), or fails.
//! A failure is an unhandled error: the logger records it as status 500 and
//! the axum adapter renders it as a generic 500.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use taskgate_core::error::AppError;

use crate::error::ApiError;
use crate::middleware::logging::RequestLogger;

/// What a stage decided.
#[derive(Debug)]
pub enum Flow {
    /// Pass the request to the next stage.
    Continue,
    /// Answer now; later stages and the handler do not run.
    Respond(Response),
}

/// Per-request state threaded through the stages.
#[derive(Debug)]
pub struct StageContext {
    /// The request, mutable so stages can attach extensions.
    pub request: Request,
    /// Headers set on whatever response the request ends with.
    pub response_headers: HeaderMap,
}

impl StageContext {
    fn new(request: Request) -> Self {
        Self {
            request,
            response_headers: HeaderMap::new(),
        }
    }
}

/// One step of the pipeline.
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspects the request. `Err` is an unhandled failure, not a rejection.
    async fn handle(&self, ctx: &mut StageContext) -> Result<Flow, AppError>;
}

/// Logger plus ordered stages.
pub struct Pipeline {
    logger: RequestLogger,
    stages: Vec<Arc<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("Pipeline").field("stages", &names).finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            logger: RequestLogger,
            stages: Vec::new(),
        }
    }

    /// Appends a stage. Stages run in the order they are added.
    pub fn stage(mut self, stage: impl Stage) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Drives `request` through the stages, then `terminal`.
    pub async fn run<F, Fut>(&self, request: Request, terminal: F) -> Result<Response, AppError>
    where
        F: FnOnce(Request) -> Fut + Send,
        Fut: Future<Output = Response> + Send,
    {
        let record = self.logger.start(&request);
        let outcome = self.drive(request, terminal).await;
        match &outcome {
            Ok(response) => record.finish(response.status()),
            Err(err) => record.fail(err),
        }
        outcome
    }

    async fn drive<F, Fut>(&self, request: Request, terminal: F) -> Result<Response, AppError>
    where
        F: FnOnce(Request) -> Fut + Send,
        Fut: Future<Output = Response> + Send,
    {
        let mut ctx = StageContext::new(request);

        for stage in &self.stages {
            match stage.handle(&mut ctx).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Respond(response)) => {
                    tracing::debug!(stage = stage.name(), status = %response.status(), "Stage answered request");
                    return Ok(with_headers(response, ctx.response_headers));
                }
                Err(err) => {
                    tracing::debug!(stage = stage.name(), error = %err, "Stage failed");
                    return Err(err);
                }
            }
        }

        let StageContext {
            request,
            response_headers,
        } = ctx;
        let response = terminal(request).await;
        Ok(with_headers(response, response_headers))
    }
}

fn with_headers(mut response: Response, headers: HeaderMap) -> Response {
    for (name, value) in headers.iter() {
        response.headers_mut().insert(name.clone(), value.clone());
    }
    response
}

/// Axum adapter: `from_fn_with_state(pipeline, run_pipeline)`.
pub async fn run_pipeline(
    State(pipeline): State<Arc<Pipeline>>,
    request: Request,
    next: Next,
) -> Response {
    match pipeline.run(request, |req| next.run(req)).await {
        Ok(response) => response,
        Err(err) => ApiError(AppError::internal(err.message)).into_response(),
    }
}
