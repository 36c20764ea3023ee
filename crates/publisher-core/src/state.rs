//! Deployment state
//!
//! The [`DeploymentState`] trait answers the two questions a publish run asks
//! of the chain: where a contract was deployed and which accounts exist.
//! The CLI backs it with a JSON-RPC node; tests use an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Source of deployed contract addresses and available accounts
#[async_trait]
pub trait DeploymentState: Send + Sync {
    /// Address the named contract is deployed at on the connected network
    async fn deployed_address(&self, contract: &str) -> Result<String>;

    /// All accounts available on the connected node, in node order
    async fn accounts(&self) -> Result<Vec<String>>;
}

/// Names of the contracts whose addresses go into the config record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedContracts {
    pub token: String,
    pub registry: String,
}

impl Default for TrackedContracts {
    fn default() -> Self {
        Self {
            token: "AudiusToken".to_string(),
            registry: "Registry".to_string(),
        }
    }
}

/// Config record written to every consumer.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub audius_token_address: String,
    pub registry_address: String,
    pub owner_wallet: String,
    pub all_wallets: Vec<String>,
}

impl DeploymentConfig {
    /// Build a record from queried state. The owner is the first account.
    pub fn new(token: String, registry: String, accounts: Vec<String>) -> Result<Self> {
        let owner_wallet = accounts.first().cloned().ok_or(Error::NoAccounts)?;
        Ok(Self {
            audius_token_address: token,
            registry_address: registry,
            owner_wallet,
            all_wallets: accounts,
        })
    }

    /// Compact JSON, as written to disk
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Query everything the config record needs.
pub async fn query_config(
    state: &dyn DeploymentState,
    contracts: &TrackedContracts,
) -> Result<DeploymentConfig> {
    let token = state.deployed_address(&contracts.token).await?;
    let registry = state.deployed_address(&contracts.registry).await?;
    let accounts = state.accounts().await?;
    DeploymentConfig::new(token, registry, accounts)
}
