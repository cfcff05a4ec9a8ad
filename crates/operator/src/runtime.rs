use std::sync::Arc;
use std::time::Duration;

use kiai_primitives::IProofServiceManager::NewTaskCreated;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::aggregator::ResponseSubmitter;
use crate::identity::OperatorIdentity;
use crate::processor::TaskProcessor;
use crate::signer::ResponseSigner;
use crate::subscription::{TaskSource, TaskStream};

/// First pause before retrying a failed resubscription.
const RESUBSCRIBE_BASE_DELAY: Duration = Duration::from_millis(500);
/// Ceiling for the resubscription backoff.
const RESUBSCRIBE_MAX_DELAY: Duration = Duration::from_secs(30);

/// Failures that prevent the operator loop from starting. Once the loop is
/// running, no task-level failure terminates it.
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// The initial task subscription could not be opened.
    #[error(transparent)]
    Subscription(#[from] crate::subscription::SubscriptionError),
}

/// The top-level operator runtime.
///
/// One long-lived loop selects over the caller's cancellation token and the
/// task event stream. Verification and signing are strictly serial; only
/// aggregator submissions run on detached tasks, bounded by a semaphore so
/// a slow aggregator cannot pile up unbounded work. A dropped subscription
/// is replaced in place with backoff; missed events are not replayed — the
/// aggregator tolerates gaps as long as the BLS threshold is met.
pub struct Operator<S> {
    identity: OperatorIdentity,
    source: S,
    handler: TaskHandler,
}

impl<S: TaskSource> Operator<S> {
    /// Assembles the runtime. `max_in_flight_submissions` bounds the number
    /// of concurrent aggregator submissions.
    pub fn new(
        identity: OperatorIdentity,
        source: S,
        processor: TaskProcessor,
        submitter: Arc<dyn ResponseSubmitter>,
        max_in_flight_submissions: usize,
    ) -> Self {
        let handler = TaskHandler {
            processor,
            signer: ResponseSigner::new(identity.bls_keypair().clone()),
            submitter,
            submission_permits: Arc::new(Semaphore::new(max_in_flight_submissions)),
        };
        Self {
            identity,
            source,
            handler,
        }
    }

    /// Runs the intake loop until `cancel` fires.
    ///
    /// On cancellation the subscription is released and the loop returns
    /// immediately; in-flight submissions may be dropped.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), OperatorError> {
        let mut stream = self.source.subscribe().await?;
        info!(
            address = %self.identity.address(),
            operator_id = %self.identity.operator_id(),
            "operator started; watching for new tasks"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("operator shutting down");
                    return Ok(());
                }
                event = stream.recv() => match event {
                    Ok(event) => self.handler.handle(event).await,
                    Err(err) => {
                        warn!(%err, "task subscription lost; resubscribing");
                        drop(stream);
                        match self.resubscribe(&cancel).await {
                            Some(fresh) => stream = fresh,
                            None => {
                                info!("operator shutting down");
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }

    /// Reopens the subscription with exponential backoff. Returns `None`
    /// only when cancelled.
    async fn resubscribe(&self, cancel: &CancellationToken) -> Option<S::Stream> {
        let mut delay = RESUBSCRIBE_BASE_DELAY;
        loop {
            match self.source.subscribe().await {
                Ok(stream) => return Some(stream),
                Err(err) => warn!(%err, "could not reopen task subscription"),
            }

            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(delay) => {}
            }
            delay = (delay * 2).min(RESUBSCRIBE_MAX_DELAY);
        }
    }
}

/// Per-task work: process, sign, fire off the submission.
struct TaskHandler {
    processor: TaskProcessor,
    signer: ResponseSigner,
    submitter: Arc<dyn ResponseSubmitter>,
    submission_permits: Arc<Semaphore>,
}

impl TaskHandler {
    async fn handle(&self, event: NewTaskCreated) {
        let task_index = event.taskIndex;
        info!(task_index, "received task");

        let response = match self.processor.process(&event).await {
            Ok(response) => response,
            Err(err) => {
                error!(task_index, %err, "abandoning task");
                return;
            }
        };

        let signed = self.signer.sign(response);
        debug!(task_index, signature = %signed.bls_signature, "signed task response");

        let submitter = Arc::clone(&self.submitter);
        let permits = Arc::clone(&self.submission_permits);
        tokio::spawn(async move {
            // the permit bounds concurrent submissions; waiting for one
            // happens here, never on the intake loop
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            submitter.send(signed).await;
        });
    }
}
