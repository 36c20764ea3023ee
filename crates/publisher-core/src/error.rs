use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Couldn't find expected path {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Build output not found at {}. Compile and migrate the contracts first.", .0.display())]
    BuildOutputMissing(PathBuf),

    #[error("Invalid artifact {}: {reason}", .path.display())]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("{contract} has not been deployed to detected network (network id: {network_id})")]
    NotDeployed { contract: String, network_id: String },

    #[error("No accounts available on the connected node")]
    NoAccounts,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an InvalidArtifact error
    pub fn invalid_artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotDeployed error
    pub fn not_deployed(contract: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self::NotDeployed {
            contract: contract.into(),
            network_id: network_id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
