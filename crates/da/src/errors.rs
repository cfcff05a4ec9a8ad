use std::time::Duration;

/// Failure to resolve proof bytes from a DA backend. Every variant abandons
/// the task it occurred in: an unfetchable proof leaves an unfillable slot
/// in the result vector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or an error reported by the backend itself.
    #[error("DA backend error: {0}")]
    Backend(String),
    /// The backend answered, but no blob matched the locator.
    #[error("no blob matched the DA locator")]
    NotFound,
    /// The fetch deadline elapsed before the backend answered.
    #[error("DA fetch timed out after {0:?}")]
    Timeout(Duration),
}
