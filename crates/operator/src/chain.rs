use alloy_primitives::Address;
use alloy_provider::Provider;
use kiai_primitives::IProofServiceManager;

/// A service-manager view call failed.
#[derive(Debug, thiserror::Error)]
#[error("service manager call failed: {0}")]
pub struct ChainReadError(#[from] alloy_contract::Error);

/// Read-side handle to the proof service manager contract.
#[derive(Debug, Clone)]
pub struct ServiceManagerReader<P> {
    instance: IProofServiceManager::IProofServiceManagerInstance<P>,
}

impl<P: Provider> ServiceManagerReader<P> {
    /// Creates a reader for the service manager deployed at `address`.
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            instance: IProofServiceManager::new(address, provider),
        }
    }

    /// Whether `operator` is registered with the service. Checked once at
    /// startup; an unregistered operator must not run.
    pub async fn is_operator_registered(&self, operator: Address) -> Result<bool, ChainReadError> {
        Ok(self
            .instance
            .isOperatorRegistered(operator)
            .call()
            .await?)
    }
}
