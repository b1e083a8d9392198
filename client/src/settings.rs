//! Persisted user preferences.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tappay_types::NetworkId;

use crate::ClientError;

/// Preferences shown on the settings screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_network")]
    pub network: NetworkId,

    #[serde(default)]
    pub profile_name: String,

    #[serde(default = "default_true")]
    pub notifications: bool,

    #[serde(default)]
    pub biometrics: bool,
}

fn default_network() -> NetworkId {
    NetworkId::Alfajores
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: default_network(),
            profile_name: String::new(),
            notifications: default_true(),
            biometrics: false,
        }
    }
}

impl Settings {
    /// Read settings from `path`, or the defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.notifications);
        assert!(!settings.biometrics);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            network: NetworkId::Mainnet,
            profile_name: "Ada".into(),
            notifications: false,
            biometrics: true,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "biometrics = true\n").unwrap();
        let settings = Settings::load_or_default(&path).unwrap();
        assert!(settings.biometrics);
        assert!(settings.notifications);
        assert_eq!(settings.network, NetworkId::Alfajores);
    }

    #[test]
    fn corrupt_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "notifications = \"maybe\"\n").unwrap();
        assert!(matches!(
            Settings::load_or_default(&path),
            Err(ClientError::Config(_))
        ));
    }
}
