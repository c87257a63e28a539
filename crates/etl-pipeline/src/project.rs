//! Project directory layout.

use std::path::{Path, PathBuf};

/// File holding the deployed commit, written by the release build.
pub const GIT_HEAD_FILE: &str = "git_head.txt";

/// Git head reported when [`GIT_HEAD_FILE`] is absent.
pub const LOCAL_HEAD: &str = "local-head";

/// Paths of a project checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` if given, else the current directory.
    pub fn discover(root: Option<PathBuf>) -> std::io::Result<Self> {
        match root {
            Some(root) => Ok(Self::new(root)),
            None => std::env::current_dir().map(Self::new),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn conf_dir(&self) -> PathBuf {
        self.root.join("conf")
    }

    /// Configuration directory for one environment, e.g. `conf/local`.
    pub fn env_conf_dir(&self, env: &str) -> PathBuf {
        self.conf_dir().join(env)
    }

    /// Resolve a path from configuration against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Deployed commit from [`GIT_HEAD_FILE`], or [`LOCAL_HEAD`].
    pub fn git_head(&self) -> String {
        match std::fs::read_to_string(self.root.join(GIT_HEAD_FILE)) {
            Ok(contents) => contents.replace(['\n', '\r'], ""),
            Err(error) => {
                tracing::debug!(%error, "git head file not readable, using {LOCAL_HEAD}");
                LOCAL_HEAD.to_string()
            }
        }
    }
}
