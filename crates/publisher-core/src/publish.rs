//! The publish operation
//!
//! A run is a single forward pass: resolve directories, clean the libs
//! output, copy the reduced ABIs, query the deployment state and write the
//! config record to every destination. Fatal problems (missing libs project
//! or build output, failure to clean) are returned as errors before anything
//! is written. Everything after that is recorded in the [`PublishReport`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifact::{copy_build_directory, ArtifactOutcome};
use crate::error::Result;
use crate::layout::WorkspaceLayout;
use crate::state::{query_config, DeploymentConfig, DeploymentState, TrackedContracts};

// =============================================================================
// Report Types
// =============================================================================

/// A place the config record is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Libs,
    Sibling(String),
    Home,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Libs => write!(f, "libs"),
            Destination::Sibling(name) => write!(f, "{}", name),
            Destination::Home => write!(f, "home"),
        }
    }
}

/// What happened at a single destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationOutcome {
    Written { path: PathBuf },
    Skipped { reason: String },
    Failed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationReport {
    pub destination: Destination,
    pub outcome: DestinationOutcome,
}

/// Structured result of a publish run
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub abi_dir: PathBuf,
    pub artifacts: Vec<ArtifactOutcome>,
    /// The config record, or why the deployment state could not be queried
    pub config: std::result::Result<DeploymentConfig, String>,
    /// Empty when `config` is an error
    pub destinations: Vec<DestinationReport>,
}

impl PublishReport {
    pub fn written_artifacts(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_written()).count()
    }

    pub fn outcome(&self, destination: &Destination) -> Option<&DestinationOutcome> {
        self.destinations
            .iter()
            .find(|d| &d.destination == destination)
            .map(|d| &d.outcome)
    }

    /// True if anything failed. Skipped siblings are not failures.
    pub fn has_failures(&self) -> bool {
        self.config.is_err()
            || self
                .artifacts
                .iter()
                .any(|a| matches!(a, ArtifactOutcome::Failed { .. }))
            || self
                .destinations
                .iter()
                .any(|d| matches!(d.outcome, DestinationOutcome::Failed { .. }))
    }
}

// =============================================================================
// Publisher
// =============================================================================

/// Publishes ABIs and the deployment config for one workspace
pub struct Publisher<'a> {
    layout: &'a WorkspaceLayout,
    state: &'a dyn DeploymentState,
    contracts: TrackedContracts,
}

impl<'a> Publisher<'a> {
    pub fn new(layout: &'a WorkspaceLayout, state: &'a dyn DeploymentState) -> Self {
        Self {
            layout,
            state,
            contracts: TrackedContracts::default(),
        }
    }

    /// Override the contracts whose addresses go into the config record
    pub fn with_contracts(mut self, contracts: TrackedContracts) -> Self {
        self.contracts = contracts;
        self
    }

    pub async fn publish(&self) -> Result<PublishReport> {
        let libs_root = self.layout.libs_root()?;
        let build_dir = self.layout.build_output()?;

        let eth_contracts = WorkspaceLayout::eth_contracts_dir(&libs_root);
        if eth_contracts.exists() {
            std::fs::remove_dir_all(&eth_contracts)?;
        }

        let abi_dir = WorkspaceLayout::abi_dir(&libs_root);
        let artifacts = copy_build_directory(&build_dir, &abi_dir)?;

        let config = query_config(self.state, &self.contracts)
            .await
            .map_err(|e| e.to_string());

        let destinations = match &config {
            Ok(config) => self.write_configs(&libs_root, config)?,
            Err(_) => Vec::new(),
        };

        Ok(PublishReport {
            abi_dir,
            artifacts,
            config,
            destinations,
        })
    }

    fn write_configs(
        &self,
        libs_root: &Path,
        config: &DeploymentConfig,
    ) -> Result<Vec<DestinationReport>> {
        let json = config.to_json()?;
        let mut reports = Vec::new();

        reports.push(DestinationReport {
            destination: Destination::Libs,
            outcome: write_config(&WorkspaceLayout::libs_config_path(libs_root), &json),
        });

        for sibling in self.layout.siblings() {
            let outcome = match self.layout.resolve(sibling) {
                Ok(root) => write_config(&WorkspaceLayout::sibling_config_path(&root), &json),
                Err(e) => DestinationOutcome::Skipped {
                    reason: e.to_string(),
                },
            };
            reports.push(DestinationReport {
                destination: Destination::Sibling(sibling.clone()),
                outcome,
            });
        }

        let home = match self.layout.home_config() {
            Some(path) => write_config(path, &json),
            None => DestinationOutcome::Skipped {
                reason: "no home directory".to_string(),
            },
        };
        reports.push(DestinationReport {
            destination: Destination::Home,
            outcome: home,
        });

        Ok(reports)
    }
}

/// Write `json` to `path`, creating the parent directory if absent
fn write_config(path: &Path, json: &str) -> DestinationOutcome {
    let result = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(path, json));

    match result {
        Ok(()) => DestinationOutcome::Written {
            path: path.to_path_buf(),
        },
        Err(e) => DestinationOutcome::Failed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}
