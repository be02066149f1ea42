//! Plugin configuration loaded from an optional TOML file.

use grounds_access::{DEFAULT_SUPERUSER, PrivilegePolicy, superuser_policy};
use grounds_rpc::transport::DEFAULT_SOCKET_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings shared by every plugin binary.
///
/// ```toml
/// socket_path = "/tmp/groundsapi.sock"
/// superuser = "GOD"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Domain socket of the attribute store.
    pub socket_path: PathBuf,
    /// Actor that bypasses access lists. Empty disables the bypass.
    pub superuser: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            superuser: DEFAULT_SUPERUSER.to_string(),
        }
    }
}

impl PluginConfig {
    /// Loads configuration from `path`.
    ///
    /// A missing, unreadable or unparsable file yields the defaults; the
    /// plugin still answers its call.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PluginConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded plugin config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Loads from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Self::load_from).unwrap_or_default()
    }

    /// Replaces the socket path when `socket_path` is set.
    pub fn with_socket_override(mut self, socket_path: Option<PathBuf>) -> Self {
        if let Some(path) = socket_path {
            self.socket_path = path;
        }
        self
    }

    pub fn privilege_policy(&self) -> Box<dyn PrivilegePolicy> {
        superuser_policy(&self.superuser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from_str(contents: &str) -> PluginConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin.toml");
        std::fs::write(&path, contents).unwrap();
        PluginConfig::load_from(&path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PluginConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.socket_path, PathBuf::from("/tmp/groundsapi.sock"));
        assert_eq!(config.superuser, "GOD");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = load_from_str("superuser = \"Root\"\n");
        assert_eq!(config.superuser, "Root");
        assert_eq!(config.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
    }

    #[test]
    fn invalid_file_yields_defaults() {
        let config = load_from_str("superuser = [");
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn empty_superuser_disables_bypass() {
        let config = load_from_str("superuser = \"\"\nsocket_path = \"/run/grounds.sock\"\n");
        assert!(!config.privilege_policy().is_privileged("GOD"));
        assert_eq!(config.socket_path, PathBuf::from("/run/grounds.sock"));
    }

    #[test]
    fn socket_override_wins() {
        let config = PluginConfig::default().with_socket_override(Some("/x.sock".into()));
        assert_eq!(config.socket_path, PathBuf::from("/x.sock"));
        let config = config.with_socket_override(None);
        assert_eq!(config.socket_path, PathBuf::from("/x.sock"));
    }
}
