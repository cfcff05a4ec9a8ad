use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use alloy_provider::{ProviderBuilder, WsConnect};
use alloy_signer_local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use kiai_bls::BlsKeyPair;
use kiai_da::{CelestiaLightNodeClient, DaFetcher, ProxyEigenDaClient};
use kiai_operator::{
    AggregatorRpcClient, Operator, OperatorIdentity, ServiceManagerReader, TaskProcessor,
    TaskSubscriber,
};
use kiai_verifiers::VerifierRegistry;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

/// The verifier-operator CLI application arguments.
#[derive(Parser, Debug, Clone)]
#[command(about = "Verifier-operator node for the proof verification service")]
pub struct OperatorCli {
    /// WebSocket endpoint of the settlement-chain RPC node.
    #[clap(long, env = "OPERATOR_WS_RPC_URL")]
    pub ws_rpc_url: Url,

    /// Address of the proof service manager contract.
    #[clap(long, env = "OPERATOR_SERVICE_MANAGER_ADDRESS")]
    pub service_manager_address: Address,

    /// JSON-RPC endpoint of the aggregator.
    #[clap(long, env = "OPERATOR_AGGREGATOR_URL")]
    pub aggregator_url: Url,

    /// Hex-encoded BLS secret key (32 bytes).
    #[clap(long, env = "OPERATOR_BLS_PRIVATE_KEY", hide_env_values = true)]
    pub bls_private_key: String,

    /// Hex-encoded ECDSA private key for chain-level auth.
    #[clap(long, env = "OPERATOR_ECDSA_PRIVATE_KEY", hide_env_values = true)]
    pub ecdsa_private_key: String,

    /// Base URL of the EigenDA retrieval proxy.
    #[clap(long, visible_alias = "eigenda", env = "OPERATOR_EIGENDA_PROXY_URL")]
    pub eigenda_proxy_url: Url,

    /// RPC endpoint of the Celestia light node.
    #[clap(long, visible_alias = "celestia", env = "OPERATOR_CELESTIA_RPC_URL")]
    pub celestia_rpc_url: Url,

    /// Bearer token for the Celestia light node, if it requires one.
    #[clap(long, env = "OPERATOR_CELESTIA_AUTH_TOKEN", hide_env_values = true)]
    pub celestia_auth_token: Option<String>,

    /// Hex-encoded Celestia namespace proof blobs are posted under.
    #[clap(long, env = "OPERATOR_CELESTIA_NAMESPACE")]
    pub celestia_namespace: String,

    /// Deadline in seconds for a single DA fetch or aggregator call.
    #[clap(long, default_value_t = 30, env = "OPERATOR_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of concurrent aggregator submissions.
    #[clap(long, default_value_t = 32)]
    pub max_in_flight_submissions: usize,

    /// Verbosity level (0 = info, 1 = debug, 2+ = trace).
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl OperatorCli {
    /// Builds every dependency and runs the operator loop until `cancel`
    /// fires. Any failure before the loop starts is fatal.
    pub async fn start(self, cancel: CancellationToken) -> Result<()> {
        let identity = self.identity()?;
        info!(address = %identity.address(), "operator identity loaded");

        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(self.ws_rpc_url.as_str()))
            .await
            .context("could not connect to the settlement-chain RPC node")?;

        let reader = ServiceManagerReader::new(self.service_manager_address, provider.clone());
        let registered = reader
            .is_operator_registered(identity.address())
            .await
            .context("could not check operator registration")?;
        if !registered {
            bail!(
                "operator {} is not registered with the proof service manager",
                identity.address()
            );
        }

        let timeout = Duration::from_secs(self.fetch_timeout_secs);
        let fetcher = self.da_fetcher(timeout)?;

        let aggregator = AggregatorRpcClient::new(self.aggregator_url.clone(), timeout)
            .context("could not create aggregator client; is the aggregator running?")?;

        let subscriber = TaskSubscriber::new(provider, self.service_manager_address);
        let operator = Operator::new(
            identity,
            subscriber,
            TaskProcessor::new(fetcher, VerifierRegistry::standard()),
            Arc::new(aggregator),
            self.max_in_flight_submissions,
        );

        operator.run(cancel).await.map_err(Into::into)
    }

    fn identity(&self) -> Result<OperatorIdentity> {
        let ecdsa_signer = PrivateKeySigner::from_str(self.ecdsa_private_key.trim())
            .context("invalid ECDSA private key")?;

        let bls_bytes = decode_hex(&self.bls_private_key).context("invalid BLS private key")?;
        let bls_keypair =
            BlsKeyPair::from_secret_bytes(&bls_bytes).context("invalid BLS private key")?;

        Ok(OperatorIdentity::new(ecdsa_signer, bls_keypair))
    }

    fn da_fetcher(&self, timeout: Duration) -> Result<DaFetcher> {
        let eigenda = ProxyEigenDaClient::new(self.eigenda_proxy_url.clone(), timeout)
            .context("could not create EigenDA client")?;
        let celestia = CelestiaLightNodeClient::new(
            self.celestia_rpc_url.clone(),
            self.celestia_auth_token.clone(),
            timeout,
        )
        .context("could not create Celestia client")?;

        let namespace: Bytes = decode_hex(&self.celestia_namespace)
            .context("invalid Celestia namespace")?
            .into();
        if namespace.is_empty() {
            bail!("Celestia namespace must not be empty");
        }

        Ok(DaFetcher::new(
            Arc::new(eigenda),
            Arc::new(celestia),
            namespace,
            timeout,
        ))
    }
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim().trim_start_matches("0x");
    hex::decode(trimmed).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> OperatorCli {
        let base = [
            "operator",
            "--ws-rpc-url",
            "ws://localhost:8546",
            "--service-manager-address",
            "0x1111111111111111111111111111111111111111",
            "--aggregator-url",
            "http://localhost:8090",
            "--bls-private-key",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--ecdsa-private-key",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--eigenda-proxy-url",
            "http://localhost:3100",
            "--celestia-rpc-url",
            "http://localhost:26658",
            "--celestia-namespace",
            "0x0000000000000000000000000000000000000000000000000000506f4b61",
        ];
        OperatorCli::try_parse_from(base.iter().copied().chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_a_complete_command_line() {
        let cfg = cli(&[]);
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.max_in_flight_submissions, 32);
        assert_eq!(cfg.verbose, 0);
    }

    #[test]
    fn builds_identity_from_hex_keys() {
        let cfg = cli(&[]);
        let identity = cfg.identity().unwrap();
        // address of the well-known secp256k1 key 0x...01
        assert_eq!(
            identity.address(),
            Address::from_str("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap()
        );
    }

    #[test]
    fn rejects_a_malformed_bls_key() {
        let mut cfg = cli(&[]);
        cfg.bls_private_key = "0xzz".into();
        assert!(cfg.identity().is_err());
    }

    #[test]
    fn builds_the_da_fetcher() {
        let cfg = cli(&["--fetch-timeout-secs", "5"]);
        assert!(cfg.da_fetcher(Duration::from_secs(5)).is_ok());
    }
}
