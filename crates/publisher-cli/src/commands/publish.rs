//! Publish ABIs and deployment config to the libs project and sibling services

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use publisher_core::{ArtifactOutcome, Destination, DestinationOutcome, PublishReport, Publisher};

use crate::config::{PublisherConfig, PUBLISHER_CONFIG};
use crate::rpc::RpcDeploymentState;

/// Publish ABIs and deployment config after a migration
#[derive(Args)]
pub struct PublishCommand {
    /// Contracts project containing the build output
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Config file (defaults to publisher.toml in the project root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RPC endpoint of the node the contracts were migrated to
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Exit with an error if any artifact or config write failed
    #[arg(long)]
    pub strict: bool,
}

impl PublishCommand {
    pub async fn run(self) -> Result<()> {
        let project_root = std::fs::canonicalize(&self.project_root).map_err(|e| {
            eyre!(
                "Could not find project root {}: {}",
                self.project_root.display(),
                e
            )
        })?;

        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| project_root.join(PUBLISHER_CONFIG));
        let config = PublisherConfig::load_or_default(&config_path)?;

        let layout = config.layout(&project_root);
        let rpc_url = match self.rpc_url {
            Some(url) => url,
            None => config.rpc_url()?,
        };

        println!(
            "{} Connecting to {}...",
            style("->").blue(),
            style(&rpc_url).cyan()
        );
        let state = RpcDeploymentState::connect(&rpc_url, layout.build_output()?)?;

        println!(
            "{} Publishing artifacts from {}...",
            style("->").blue(),
            style(project_root.display()).cyan()
        );
        let report = Publisher::new(&layout, &state)
            .with_contracts(config.contracts())
            .publish()
            .await?;

        println!("{}", render_report(&report));

        if self.strict && report.has_failures() {
            return Err(eyre!("Publish finished with failures"));
        }

        Ok(())
    }
}

/// Console rendering of a publish run, one line per entry
fn render_report(report: &PublishReport) -> String {
    let mut lines = vec![format!(
        "{} Copied ABIs to {}",
        style("->").blue(),
        style(report.abi_dir.display()).cyan()
    )];
    for artifact in &report.artifacts {
        match artifact {
            ArtifactOutcome::Written { contract_name, .. } => {
                lines.push(format!(
                    "   {} {}",
                    style("+").green(),
                    style(contract_name).cyan()
                ));
            }
            ArtifactOutcome::Failed { path, reason } => {
                lines.push(format!(
                    "   {} {}: {}",
                    style("!").yellow(),
                    path.display(),
                    reason
                ));
            }
        }
    }

    let config = match &report.config {
        Ok(config) => config,
        Err(reason) => {
            lines.push(format!(
                "{} Could not query deployment state: {}",
                style("!").yellow(),
                reason
            ));
            lines.push("   No config files were written".to_string());
            return lines.join("\n");
        }
    };

    lines.push(format!("{} Deployment config", style("->").blue()));
    lines.push(format!(
        "   audiusTokenAddress: {}",
        style(&config.audius_token_address).yellow()
    ));
    lines.push(format!(
        "   registryAddress:    {}",
        style(&config.registry_address).yellow()
    ));
    lines.push(format!(
        "   ownerWallet:        {}",
        style(&config.owner_wallet).yellow()
    ));
    lines.push("   allWallets:".to_string());
    for wallet in &config.all_wallets {
        lines.push(format!("     {}", style(wallet).dim()));
    }

    for destination in &report.destinations {
        lines.push(render_destination(&destination.destination, &destination.outcome));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} Published {} ABI(s) and {} config file(s)",
        style("*").green().bold(),
        report.written_artifacts(),
        report
            .destinations
            .iter()
            .filter(|d| matches!(d.outcome, DestinationOutcome::Written { .. }))
            .count()
    ));

    lines.join("\n")
}

fn render_destination(destination: &Destination, outcome: &DestinationOutcome) -> String {
    match (destination, outcome) {
        (_, DestinationOutcome::Written { path }) => format!(
            "   {} {} {}",
            style("+").green(),
            style(destination).cyan(),
            style(path.display()).dim()
        ),
        (Destination::Sibling(_), DestinationOutcome::Skipped { reason }) => format!(
            "   {} {} doesn't exist, probably running via E2E setup scripts ({})",
            style("-").dim(),
            style(destination).dim(),
            reason
        ),
        (_, DestinationOutcome::Skipped { reason }) => format!(
            "   {} {} skipped: {}",
            style("-").dim(),
            style(destination).dim(),
            reason
        ),
        (Destination::Libs, DestinationOutcome::Failed { path, reason }) => format!(
            "   {} {} {}: {}",
            style("x").red().bold(),
            style(destination).red().bold(),
            path.display(),
            reason
        ),
        (_, DestinationOutcome::Failed { path, reason }) => format!(
            "   {} {} {}: {}",
            style("!").yellow(),
            style(destination).yellow(),
            path.display(),
            reason
        ),
    }
}
