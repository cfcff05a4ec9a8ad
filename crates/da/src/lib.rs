//! Data-availability resolution for proof payloads.
//!
//! A task announces, per proof, which DA backend holds the proof bytes and a
//! backend-specific locator. [`DaFetcher`] is the single dispatch point that
//! turns a [`kiai_primitives::DaPayload`] into raw bytes: calldata payloads
//! are returned inline, EigenDA and Celestia payloads are retrieved through
//! the provider traits in [`traits`]. Backend client internals stay behind
//! those traits; the implementations here are thin HTTP clients.

mod errors;
pub use errors::FetchError;

mod traits;
pub use traits::{CelestiaProvider, EigenDaProvider};

mod fetcher;
pub use fetcher::{DaFetcher, DEFAULT_FETCH_TIMEOUT};

mod eigenda;
pub use eigenda::ProxyEigenDaClient;

mod celestia;
pub use celestia::CelestiaLightNodeClient;
