//! CLI commands for publish-artifacts

pub mod publish;

pub use publish::PublishCommand;
