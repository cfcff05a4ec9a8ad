//! Core wire and domain types for the kiai verifier-operator.
//!
//! The service manager announces batches of proofs to verify through the
//! `NewTaskCreated` event; this crate carries the Solidity schema for that
//! event, the domain model the operator works with once a task has been
//! decoded, and the canonical encoding of the response that gets signed.

mod bindings;
pub use bindings::{
    BatchProofVerificationTask, BatchProofVerificationTaskResponse, DAPayload,
    IProofServiceManager, ProofVerificationData,
};

mod task;
pub use task::{DaPayload, NewTask, ProofVerification, ProvingSystemId, TaskDecodeError};

mod response;
pub use response::TaskResponse;
