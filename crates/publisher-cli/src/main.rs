mod commands;
mod config;
mod rpc;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::PublishCommand;

#[derive(Parser)]
#[command(name = "publish-artifacts")]
#[command(about = "Publish contract ABIs and deployment config to the libs project and sibling services")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    publish: PublishCommand,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.publish.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_arguments() {
        let cli = Cli::try_parse_from(["publish-artifacts"]).unwrap();
        assert_eq!(cli.publish.project_root, std::path::PathBuf::from("."));
        assert!(cli.publish.config.is_none());
        assert!(cli.publish.rpc_url.is_none());
        assert!(!cli.publish.strict);
    }

    #[test]
    fn test_parse_all_arguments() {
        let cli = Cli::try_parse_from([
            "publish-artifacts",
            "--project-root",
            "eth-contracts",
            "--config",
            "ci.toml",
            "--rpc-url",
            "http://ganache:8545",
            "--strict",
        ])
        .unwrap();

        assert_eq!(
            cli.publish.project_root,
            std::path::PathBuf::from("eth-contracts")
        );
        assert_eq!(cli.publish.config, Some(std::path::PathBuf::from("ci.toml")));
        assert_eq!(cli.publish.rpc_url.as_deref(), Some("http://ganache:8545"));
        assert!(cli.publish.strict);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
