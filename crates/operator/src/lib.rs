//! The verifier-operator core: task intake, per-proof verification, and
//! signed-response submission.
//!
//! The runtime loop subscribes to the service manager's `NewTaskCreated`
//! stream, hands each decoded task to the [`processor::TaskProcessor`],
//! signs the resulting verdict vector with the operator's BLS key, and
//! fires the signed response at the aggregator on a detached task. Tasks
//! whose inputs cannot be obtained are abandoned whole; proofs that merely
//! fail to verify contribute a `false` verdict and stay in the response.

pub mod identity;
pub use identity::OperatorIdentity;

pub mod chain;
pub use chain::ServiceManagerReader;

pub mod subscription;
pub use subscription::{SubscriptionError, TaskEventStream, TaskSource, TaskStream, TaskSubscriber};

pub mod processor;
pub use processor::{TaskError, TaskProcessor};

pub mod signer;
pub use signer::{ResponseSigner, SignedTaskResponse};

pub mod aggregator;
pub use aggregator::{AggregatorClientError, AggregatorRpcClient, ResponseSubmitter};

pub mod runtime;
pub use runtime::{Operator, OperatorError};
