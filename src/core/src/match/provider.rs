use crate::r#match::action::blueprint::{ActionBlueprint, ActionRequest, ValidationError};
use log::{debug, error, warn};
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Attempts per request before the pipeline gives up.
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// A single failed attempt at producing narration content. Every variant
/// is retryable up to the attempt bound; the distinction only matters for
/// diagnostics.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("content provider refused the request: {0}")]
    Refused(String),
    #[error("content provider returned malformed output: {0}")]
    Malformed(String),
    #[error("content provider transport failure: {0}")]
    Transport(String),
    #[error("content generation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("content generation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: GenerationError,
    },
    #[error("action provider is closed or exhausted")]
    Closed,
}

/// The external narration boundary: one request in, one blueprint out.
/// Implementations live outside the core (an LLM call, a template bank);
/// the returned blueprint is still unvalidated.
pub trait BlueprintGenerator: Send + 'static {
    fn generate(
        &mut self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<ActionBlueprint, GenerationError>> + Send;
}

/// Hands out validated blueprints in the order they were requested.
/// `request` never blocks; `get` suspends until the matching blueprint
/// is ready.
pub trait ActionProvider {
    fn request(&mut self, request: ActionRequest) -> Result<(), ProviderError>;
    fn get(&mut self) -> impl Future<Output = Result<ActionBlueprint, ProviderError>> + Send;
}

/// The prefetch pipeline: a background task pulls queued requests, calls
/// the generator, validates, retries up to the bound, and pushes results
/// onto the outgoing queue. Strict FIFO pairing between `request` and
/// `get` holds because a single worker serves the queue. Dropping or
/// closing the provider aborts the worker; in-flight generation is
/// abandoned.
pub struct QueueActionProvider {
    request_tx: mpsc::UnboundedSender<ActionRequest>,
    result_rx: mpsc::UnboundedReceiver<Result<ActionBlueprint, ProviderError>>,
    worker: JoinHandle<()>,
}

impl QueueActionProvider {
    pub fn start<G: BlueprintGenerator>(generator: G) -> QueueActionProvider {
        QueueActionProvider::start_with_timeout(generator, DEFAULT_ATTEMPT_TIMEOUT)
    }

    pub fn start_with_timeout<G: BlueprintGenerator>(
        mut generator: G,
        attempt_timeout: Duration,
    ) -> QueueActionProvider {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ActionRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                match fulfil(&mut generator, request, attempt_timeout).await {
                    Ok(blueprint) => {
                        if result_tx.send(Ok(blueprint)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        // Fatal for the whole pipeline: surface the error to
                        // the pending `get` and stop serving requests.
                        error!("action provider giving up: {err}");
                        let _ = result_tx.send(Err(err));
                        break;
                    }
                }
            }
        });

        QueueActionProvider {
            request_tx,
            result_rx,
            worker,
        }
    }

    pub fn close(&mut self) {
        self.worker.abort();
    }
}

impl Drop for QueueActionProvider {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

impl ActionProvider for QueueActionProvider {
    fn request(&mut self, request: ActionRequest) -> Result<(), ProviderError> {
        self.request_tx
            .send(request)
            .map_err(|_| ProviderError::Closed)
    }

    async fn get(&mut self) -> Result<ActionBlueprint, ProviderError> {
        match self.result_rx.recv().await {
            Some(result) => result,
            None => Err(ProviderError::Closed),
        }
    }
}

async fn fulfil<G: BlueprintGenerator>(
    generator: &mut G,
    request: ActionRequest,
    attempt_timeout: Duration,
) -> Result<ActionBlueprint, ProviderError> {
    let mut last_error = GenerationError::Malformed("no attempt was made".to_string());

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let generated = match tokio::time::timeout(attempt_timeout, generator.generate(request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(attempt_timeout)),
        };

        let validated = generated.and_then(|blueprint| match blueprint.validate() {
            Ok(()) => Ok(blueprint),
            Err(err) => Err(GenerationError::Validation(err)),
        });

        match validated {
            Ok(blueprint) => {
                debug!(
                    "blueprint ready for {:?} on attempt {attempt}",
                    request.outcome
                );
                return Ok(blueprint);
            }
            Err(err) => {
                warn!(
                    "generation attempt {attempt}/{MAX_GENERATION_ATTEMPTS} failed: {err}"
                );
                last_error = err;
            }
        }
    }

    Err(ProviderError::RetriesExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
        source: last_error,
    })
}

/// An in-memory provider backed by a prepared queue of blueprints.
/// Used by tests and by callers that prepare content up front.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<ActionBlueprint>,
    requests: Vec<ActionRequest>,
}

impl ScriptedProvider {
    pub fn new() -> ScriptedProvider {
        ScriptedProvider::default()
    }

    pub fn with_blueprints(blueprints: impl IntoIterator<Item = ActionBlueprint>) -> ScriptedProvider {
        ScriptedProvider {
            queue: blueprints.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    pub fn push(&mut self, blueprint: ActionBlueprint) {
        self.queue.push_back(blueprint);
    }

    pub fn requests(&self) -> &[ActionRequest] {
        &self.requests
    }
}

impl ActionProvider for ScriptedProvider {
    fn request(&mut self, request: ActionRequest) -> Result<(), ProviderError> {
        self.requests.push(request);
        Ok(())
    }

    async fn get(&mut self) -> Result<ActionBlueprint, ProviderError> {
        self.queue.pop_front().ok_or(ProviderError::Closed)
    }
}
