//! Core library for publishing contract ABIs and deployment config
//!
//! After contracts are compiled and migrated, [`Publisher`] copies reduced
//! ABI records into the shared libraries project and writes the deployment
//! config record to every consumer found in the [`WorkspaceLayout`].

pub mod artifact;
pub mod error;
pub mod layout;
pub mod publish;
pub mod state;

pub use artifact::{copy_build_directory, ArtifactOutcome, ArtifactRecord, BuildArtifact};
pub use error::{Error, Result};
pub use layout::WorkspaceLayout;
pub use publish::{Destination, DestinationOutcome, DestinationReport, PublishReport, Publisher};
pub use state::{query_config, DeploymentConfig, DeploymentState, TrackedContracts};
