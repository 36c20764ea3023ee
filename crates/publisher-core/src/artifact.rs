//! Build artifact handling
//!
//! Truffle writes one JSON file per contract into `build/contracts`. Each file
//! carries the ABI together with bytecode, source maps, the AST and the
//! `networks` map of deployed addresses. [`ArtifactRecord`] keeps only what
//! consumers need; [`BuildArtifact`] reads the deployed addresses.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Artifact Record
// =============================================================================

/// Minimal interface record published to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub contract_name: String,
    pub abi: serde_json::Value,
}

impl ArtifactRecord {
    /// Parse a build file, dropping everything but `contractName` and `abi`.
    pub fn from_build_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|reason| Error::invalid_artifact(path, reason))
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let record: Self = serde_json::from_str(content).map_err(|e| e.to_string())?;
        if !record.abi.is_array() {
            return Err("`abi` must be an array".to_string());
        }
        Ok(record)
    }

    /// Pretty-printed JSON with 2-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Build Artifact
// =============================================================================

/// A deployment entry in a build artifact's `networks` map
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkEntry {
    #[serde(default)]
    pub address: Option<String>,
}

/// The parts of a full build artifact needed to locate a deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildArtifact {
    pub contract_name: String,
    /// Keyed by network id (`net_version`)
    #[serde(default)]
    pub networks: HashMap<String, NetworkEntry>,
    #[serde(skip)]
    path: PathBuf,
}

impl BuildArtifact {
    /// Load `<build_dir>/<contract_name>.json`.
    pub fn load(build_dir: &Path, contract_name: &str) -> Result<Self> {
        let path = build_dir.join(format!("{}.json", contract_name));
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::invalid_artifact(&path, format!("could not read artifact: {}", e))
        })?;
        let mut artifact: Self = serde_json::from_str(&content)
            .map_err(|e| Error::invalid_artifact(&path, e.to_string()))?;
        artifact.path = path;
        Ok(artifact)
    }

    /// Address the contract was deployed to on the given network.
    pub fn deployed_address(&self, network_id: &str) -> Result<Address> {
        let address = self
            .networks
            .get(network_id)
            .and_then(|entry| entry.address.as_deref())
            .ok_or_else(|| Error::not_deployed(&self.contract_name, network_id))?;

        Address::from_str(address).map_err(|e| {
            Error::invalid_artifact(
                &self.path,
                format!("invalid address '{}' for network {}: {}", address, network_id, e),
            )
        })
    }
}

// =============================================================================
// Copy
// =============================================================================

/// Result of publishing a single artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    Written {
        contract_name: String,
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ArtifactOutcome::Written { .. })
    }
}

/// Transform every file in `build_dir` and write it under the same file name
/// into `out_dir`.
///
/// Only a failure to list `build_dir` is returned as an error. Directory
/// creation and per-file failures are recorded and the remaining files are
/// still attempted.
pub fn copy_build_directory(build_dir: &Path, out_dir: &Path) -> Result<Vec<ArtifactOutcome>> {
    let mut outcomes = Vec::new();

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        outcomes.push(ArtifactOutcome::Failed {
            path: out_dir.to_path_buf(),
            reason: format!("Error with creating folder: {}", e),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(build_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    for source in files {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = out_dir.join(file_name);

        let outcome = match publish_file(&source, &target) {
            Ok(contract_name) => ArtifactOutcome::Written {
                contract_name,
                path: target,
            },
            Err(e) => ArtifactOutcome::Failed {
                path: source,
                reason: e.to_string(),
            },
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn publish_file(source: &Path, target: &Path) -> Result<String> {
    let record = ArtifactRecord::from_build_file(source)?;
    std::fs::write(target, record.to_pretty_json()?)?;
    Ok(record.contract_name)
}
