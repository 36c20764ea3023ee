use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};
use publisher_core::{TrackedContracts, WorkspaceLayout};
use serde::Deserialize;

pub const PUBLISHER_CONFIG: &str = "publisher.toml";

/// Node used when neither the config file nor `--rpc-url` names one
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Publisher configuration file structure (publisher.toml)
/// Every key is optional; missing keys fall back to the workspace defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublisherConfig {
    /// Directory holding libs and the sibling services, relative to the project root
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,
    #[serde(default)]
    pub libs: Option<String>,
    #[serde(default)]
    pub siblings: Option<Vec<String>>,
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub home_config: Option<PathBuf>,
    #[serde(default)]
    pub contracts: ContractsConfig,
}

/// Contract names looked up in the build output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
}

impl PublisherConfig {
    /// Load configuration from a file, or use defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Could not read {}: {}", path.display(), e))?;

        let config: PublisherConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Build the workspace layout for a contracts project
    pub fn layout(&self, project_root: &Path) -> WorkspaceLayout {
        let mut layout = WorkspaceLayout::new(project_root);

        if let Some(root) = &self.workspace_root {
            layout = layout.with_workspace_root(project_root.join(root));
        }
        if let Some(libs) = &self.libs {
            layout = layout.with_libs(libs.as_str());
        }
        if let Some(siblings) = &self.siblings {
            layout = layout.with_siblings(siblings.iter().cloned());
        }
        if let Some(build_dir) = &self.build_dir {
            layout = layout.with_build_dir(build_dir.as_path());
        }
        if let Some(home_config) = &self.home_config {
            layout = layout.with_home_config(Some(home_config.clone()));
        }

        layout
    }

    /// RPC URL with environment variables resolved
    pub fn rpc_url(&self) -> Result<String> {
        match &self.rpc_url {
            Some(url) => expand_env_reference(url),
            None => Ok(DEFAULT_RPC_URL.to_string()),
        }
    }

    pub fn contracts(&self) -> TrackedContracts {
        let defaults = TrackedContracts::default();
        TrackedContracts {
            token: self.contracts.token.clone().unwrap_or(defaults.token),
            registry: self.contracts.registry.clone().unwrap_or(defaults.registry),
        }
    }
}

/// Expand a value that is exactly `${VAR}`; anything else is returned as is
fn expand_env_reference(value: &str) -> Result<String> {
    match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(name) => std::env::var(name)
            .map_err(|_| eyre!("rpc_url refers to ${{{}}}, which is not set", name)),
        None => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publisher_config() {
        let toml_content = r#"
workspace_root = "../.."
libs = "shared-libs"
siblings = ["identity-service"]
build_dir = "out/contracts"
rpc_url = "http://ganache:8545"

[contracts]
token = "StakingToken"
"#;

        let config: PublisherConfig = toml::from_str(toml_content).unwrap();
        let layout = config.layout(Path::new("/work/audius/eth-contracts"));

        assert_eq!(
            layout.workspace_root(),
            Path::new("/work/audius/eth-contracts/../..")
        );
        assert_eq!(layout.libs(), "shared-libs");
        assert_eq!(layout.siblings(), ["identity-service"]);
        assert_eq!(config.rpc_url().unwrap(), "http://ganache:8545");

        let contracts = config.contracts();
        assert_eq!(contracts.token, "StakingToken");
        assert_eq!(contracts.registry, "Registry");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PublisherConfig = toml::from_str("").unwrap();
        let layout = config.layout(Path::new("/work/eth-contracts"));

        assert_eq!(layout.workspace_root(), Path::new("/work"));
        assert_eq!(layout.libs(), "libs");
        assert_eq!(layout.siblings().len(), 3);
        assert_eq!(config.rpc_url().unwrap(), DEFAULT_RPC_URL);
        assert_eq!(config.contracts(), TrackedContracts::default());
    }

    #[test]
    fn test_home_config_override() {
        let config: PublisherConfig =
            toml::from_str(r#"home_config = "/tmp/eth-config.json""#).unwrap();
        let layout = config.layout(Path::new("/work/eth-contracts"));

        assert_eq!(
            layout.home_config(),
            Some(Path::new("/tmp/eth-config.json"))
        );
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PublisherConfig::load_or_default(&tmp.path().join(PUBLISHER_CONFIG)).unwrap();
        assert!(config.rpc_url.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(PUBLISHER_CONFIG);
        std::fs::write(&path, "siblings = 3").unwrap();

        assert!(PublisherConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn test_rpc_url_from_env() {
        std::env::set_var("TEST_PUBLISHER_RPC_URL", "http://node.test:8545");

        let config: PublisherConfig =
            toml::from_str(r#"rpc_url = "${TEST_PUBLISHER_RPC_URL}""#).unwrap();
        assert_eq!(config.rpc_url().unwrap(), "http://node.test:8545");

        std::env::remove_var("TEST_PUBLISHER_RPC_URL");
    }

    #[test]
    fn test_plain_rpc_url_is_kept() {
        let config: PublisherConfig =
            toml::from_str(r#"rpc_url = "http://ganache:8545/${path}""#).unwrap();
        assert_eq!(config.rpc_url().unwrap(), "http://ganache:8545/${path}");
    }

    #[test]
    fn test_rpc_url_env_not_set() {
        let config: PublisherConfig =
            toml::from_str(r#"rpc_url = "${PUBLISHER_UNSET_NODE_URL}""#).unwrap();

        let err = config.rpc_url().unwrap_err();
        assert!(err.to_string().contains("${PUBLISHER_UNSET_NODE_URL}"));
    }
}
