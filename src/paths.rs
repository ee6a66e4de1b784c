//! Translation between user-visible paths and the paths this process uses.
//!
//! When the service runs inside a container, the user's home directory is
//! mounted somewhere else (for example `/home/ana` on the host is
//! `/host-home` in the container). Requests and responses always carry user
//! paths; filesystem calls always use service paths.

use std::path::{Path, PathBuf};

use crate::config::PathsConfig;

#[derive(Debug, Clone, Default)]
pub struct PathTranslator {
    user_home: Option<PathBuf>,
    service_home: PathBuf,
}

impl PathTranslator {
    /// An empty `user_home` disables translation entirely.
    pub fn new(user_home: Option<PathBuf>, service_home: PathBuf) -> Self {
        let user_home = user_home.filter(|p| !p.as_os_str().is_empty());
        Self {
            user_home,
            service_home,
        }
    }

    pub fn from_config(config: &PathsConfig) -> Self {
        Self::new(config.user_home.clone(), config.service_home.clone())
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.user_home.is_some()
    }

    pub fn to_service_path(&self, user_path: &Path) -> PathBuf {
        match &self.user_home {
            Some(user_home) => rebase(user_path, user_home, &self.service_home),
            None => user_path.to_path_buf(),
        }
    }

    pub fn to_user_path(&self, service_path: &Path) -> PathBuf {
        match &self.user_home {
            Some(user_home) => rebase(service_path, &self.service_home, user_home),
            None => service_path.to_path_buf(),
        }
    }
}

/// Swap the `from` prefix of `path` for `to`. Matching is per path component,
/// so `/home/al` is not a prefix of `/home/alice`.
fn rebase(path: &Path, from: &Path, to: &Path) -> PathBuf {
    match path.strip_prefix(from) {
        Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
        Ok(rest) => to.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
