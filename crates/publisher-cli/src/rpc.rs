//! Deployment state backed by a JSON-RPC node
//!
//! Deployed addresses come from the `networks` map of the build artifacts,
//! keyed by the node's network id, the same lookup a Truffle migration
//! performs. The address only counts as deployed if the node has code there.

use std::path::PathBuf;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use publisher_core::{BuildArtifact, DeploymentState, Error};

pub struct RpcDeploymentState {
    provider: DynProvider,
    build_dir: PathBuf,
}

impl RpcDeploymentState {
    /// Connect over HTTP; no request is sent until the state is queried
    pub fn connect(rpc_url: &str, build_dir: PathBuf) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| eyre!("Invalid RPC URL '{}': {}", rpc_url, e))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self::new(provider, build_dir))
    }

    pub fn new(provider: DynProvider, build_dir: PathBuf) -> Self {
        Self {
            provider,
            build_dir,
        }
    }

    async fn network_id(&self) -> publisher_core::Result<String> {
        let version = self.provider.get_net_version().await.map_err(rpc_error)?;
        Ok(version.to_string())
    }
}

#[async_trait]
impl DeploymentState for RpcDeploymentState {
    async fn deployed_address(&self, contract: &str) -> publisher_core::Result<String> {
        let network_id = self.network_id().await?;
        let artifact = BuildArtifact::load(&self.build_dir, contract)?;
        let address = artifact.deployed_address(&network_id)?;

        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(rpc_error)?;
        if code.is_empty() {
            return Err(Error::not_deployed(contract, network_id));
        }

        Ok(address.to_string())
    }

    async fn accounts(&self) -> publisher_core::Result<Vec<String>> {
        let accounts = self.provider.get_accounts().await.map_err(rpc_error)?;
        Ok(accounts.iter().map(|a| a.to_string()).collect())
    }
}

fn rpc_error(e: impl std::fmt::Display) -> Error {
    Error::Rpc(e.to_string())
}
