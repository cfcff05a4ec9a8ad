use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use kiai_primitives::IProofServiceManager::NewTaskCreated;
use tracing::warn;

/// Errors from the task event stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    /// The log subscription could not be opened.
    #[error("could not open log subscription: {0}")]
    Subscribe(String),
    /// The underlying stream terminated; the holder must open a fresh
    /// subscription to keep receiving tasks.
    #[error("task subscription closed")]
    Closed,
}

/// A live, ordered stream of decoded task events.
#[async_trait]
pub trait TaskStream: Send {
    /// The next task event. [`SubscriptionError::Closed`] means the handle
    /// is dead and must be replaced.
    async fn recv(&mut self) -> Result<NewTaskCreated, SubscriptionError>;
}

/// Something that can open a [`TaskStream`]. At most one live stream should
/// exist per operator; callers drop the old handle before opening the next.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// The stream type this source produces.
    type Stream: TaskStream;

    /// Opens a fresh subscription.
    async fn subscribe(&self) -> Result<Self::Stream, SubscriptionError>;
}

/// Opens WebSocket log subscriptions on the service manager's
/// `NewTaskCreated` event.
#[derive(Debug, Clone)]
pub struct TaskSubscriber<P> {
    provider: P,
    service_manager: Address,
}

impl<P> TaskSubscriber<P> {
    /// Creates a subscriber for the service manager at `service_manager`.
    pub fn new(provider: P, service_manager: Address) -> Self {
        Self {
            provider,
            service_manager,
        }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> TaskSource for TaskSubscriber<P> {
    type Stream = TaskEventStream;

    async fn subscribe(&self) -> Result<TaskEventStream, SubscriptionError> {
        let filter = Filter::new()
            .address(self.service_manager)
            .event_signature(NewTaskCreated::SIGNATURE_HASH);

        let subscription = self
            .provider
            .subscribe_logs(&filter)
            .await
            .map_err(|err| SubscriptionError::Subscribe(err.to_string()))?;

        Ok(TaskEventStream {
            inner: subscription.into_stream().boxed(),
        })
    }
}

/// Decoded `NewTaskCreated` events off a live log subscription.
///
/// Events arrive in the order the node observed them; the subscription's
/// internal channel is bounded, so a stalled consumer sheds load at the
/// node rather than buffering without limit.
pub struct TaskEventStream {
    inner: BoxStream<'static, Log>,
}

impl TaskEventStream {
    fn decode(log: &Log) -> Result<NewTaskCreated, alloy_sol_types::Error> {
        Ok(log.log_decode::<NewTaskCreated>()?.inner.data)
    }
}

#[async_trait]
impl TaskStream for TaskEventStream {
    async fn recv(&mut self) -> Result<NewTaskCreated, SubscriptionError> {
        loop {
            let Some(log) = self.inner.next().await else {
                return Err(SubscriptionError::Closed);
            };
            match Self::decode(&log) {
                Ok(event) => return Ok(event),
                // a log that matches the filter but not the schema is the
                // contract's problem, not a reason to die
                Err(err) => warn!(%err, "skipping undecodable NewTaskCreated log"),
            }
        }
    }
}

impl std::fmt::Debug for TaskEventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEventStream").finish_non_exhaustive()
    }
}
