//! Workspace layout
//!
//! The [`WorkspaceLayout`] struct locates the contracts project, the shared
//! libraries project and the sibling services that consume the generated
//! ABIs and config files. Every location is an explicit input with a
//! documented default.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default name of the shared libraries project
pub const DEFAULT_LIBS: &str = "libs";

/// Default optional sibling services, in publish order
pub const DEFAULT_SIBLINGS: [&str; 3] = ["identity-service", "creator-node", "content-service"];

/// Default build output, relative to the contracts project
pub const DEFAULT_BUILD_DIR: &str = "build/contracts";

const ETH_CONTRACTS_DIR: &str = "eth-contracts";
const ABI_DIR: &str = "ABIs";
const LIBS_CONFIG_FILE: &str = "config.json";
const SIBLING_CONFIG_FILE: &str = "eth-contract-config.json";
const HOME_CONFIG_DIR: &str = ".audius";
const HOME_CONFIG_FILE: &str = "eth-config.json";

/// Locations read and written by a publish run.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    project_root: PathBuf,
    workspace_root: PathBuf,
    libs: String,
    siblings: Vec<String>,
    build_dir: PathBuf,
    home_config: Option<PathBuf>,
}

impl WorkspaceLayout {
    /// Create a layout with default names for the given contracts project.
    ///
    /// The workspace root is the parent of `project_root`, and the home
    /// config lives at `~/.audius/eth-config.json`.
    pub fn new<P: Into<PathBuf>>(project_root: P) -> Self {
        let project_root = project_root.into();
        let workspace_root = project_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(".."));

        Self {
            project_root,
            workspace_root,
            libs: DEFAULT_LIBS.to_string(),
            siblings: DEFAULT_SIBLINGS.iter().map(|s| s.to_string()).collect(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            home_config: default_home_config(),
        }
    }

    /// Override the workspace root that sibling projects are resolved against.
    pub fn with_workspace_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// Override the shared libraries project name.
    pub fn with_libs<S: Into<String>>(mut self, libs: S) -> Self {
        self.libs = libs.into();
        self
    }

    /// Override the optional sibling project names.
    pub fn with_siblings<I, S>(mut self, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.siblings = siblings.into_iter().map(Into::into).collect();
        self
    }

    /// Override the build output directory, relative to the project root.
    pub fn with_build_dir<P: Into<PathBuf>>(mut self, build_dir: P) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    /// Override the per-user config path. `None` disables that destination.
    pub fn with_home_config(mut self, path: Option<PathBuf>) -> Self {
        self.home_config = path;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn libs(&self) -> &str {
        &self.libs
    }

    pub fn siblings(&self) -> &[String] {
        &self.siblings
    }

    pub fn home_config(&self) -> Option<&Path> {
        self.home_config.as_deref()
    }

    /// Resolve a project directory under the workspace root.
    ///
    /// Fails with [`Error::DirectoryNotFound`] when the directory is absent.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self.workspace_root.join(name);
        if !path.is_dir() {
            return Err(Error::DirectoryNotFound(path));
        }
        Ok(path)
    }

    /// Resolve the shared libraries project.
    pub fn libs_root(&self) -> Result<PathBuf> {
        self.resolve(&self.libs)
    }

    /// Resolve the build output directory of the contracts project.
    pub fn build_output(&self) -> Result<PathBuf> {
        let path = self.project_root.join(&self.build_dir);
        if !path.is_dir() {
            return Err(Error::BuildOutputMissing(path));
        }
        Ok(path)
    }

    pub fn eth_contracts_dir(libs_root: &Path) -> PathBuf {
        libs_root.join(ETH_CONTRACTS_DIR)
    }

    pub fn abi_dir(libs_root: &Path) -> PathBuf {
        Self::eth_contracts_dir(libs_root).join(ABI_DIR)
    }

    pub fn libs_config_path(libs_root: &Path) -> PathBuf {
        Self::eth_contracts_dir(libs_root).join(LIBS_CONFIG_FILE)
    }

    pub fn sibling_config_path(sibling_root: &Path) -> PathBuf {
        sibling_root.join(SIBLING_CONFIG_FILE)
    }
}

fn default_home_config() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(HOME_CONFIG_DIR).join(HOME_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let layout = WorkspaceLayout::new("/work/eth-contracts");
        assert_eq!(layout.project_root(), Path::new("/work/eth-contracts"));
        assert_eq!(layout.workspace_root(), Path::new("/work"));
        assert_eq!(layout.libs(), "libs");
        assert_eq!(
            layout.siblings(),
            ["identity-service", "creator-node", "content-service"]
        );
    }

    #[test]
    fn test_relative_project_root() {
        let layout = WorkspaceLayout::new("eth-contracts");
        assert_eq!(layout.workspace_root(), Path::new(""));

        let layout = WorkspaceLayout::new("");
        assert_eq!(layout.workspace_root(), Path::new(".."));
    }

    #[test]
    fn test_destination_paths() {
        let libs = Path::new("/work/libs");
        assert_eq!(
            WorkspaceLayout::abi_dir(libs),
            PathBuf::from("/work/libs/eth-contracts/ABIs")
        );
        assert_eq!(
            WorkspaceLayout::libs_config_path(libs),
            PathBuf::from("/work/libs/eth-contracts/config.json")
        );
        assert_eq!(
            WorkspaceLayout::sibling_config_path(Path::new("/work/creator-node")),
            PathBuf::from("/work/creator-node/eth-contract-config.json")
        );
    }

    #[test]
    fn test_resolve_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path().join("eth-contracts"));

        match layout.resolve("identity-service") {
            Err(Error::DirectoryNotFound(path)) => {
                assert_eq!(path, tmp.path().join("identity-service"))
            }
            other => panic!("expected DirectoryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("libs")).unwrap();
        let layout = WorkspaceLayout::new(tmp.path().join("eth-contracts"));

        assert_eq!(layout.libs_root().unwrap(), tmp.path().join("libs"));
    }

    #[test]
    fn test_build_output_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path());

        assert!(matches!(
            layout.build_output(),
            Err(Error::BuildOutputMissing(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let layout = WorkspaceLayout::new("/a/b")
            .with_workspace_root("/elsewhere")
            .with_libs("shared")
            .with_siblings(["one"])
            .with_build_dir("out")
            .with_home_config(None);

        assert_eq!(layout.workspace_root(), Path::new("/elsewhere"));
        assert_eq!(layout.libs(), "shared");
        assert_eq!(layout.siblings(), ["one"]);
        assert!(layout.home_config().is_none());
    }
}
