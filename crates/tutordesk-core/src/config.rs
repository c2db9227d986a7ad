//! Application configuration management.
//!
//! Handles loading and saving tutordesk configuration:
//! - Listen address for the HTTP server
//! - Storage root directory for generated PDFs
//! - Path of the student record database

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutordeskError};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutordeskConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// PDF storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Student record database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

/// PDF storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory all file operations are confined to.
    /// Created at startup if absent.
    pub root: PathBuf,
}

/// Student record database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the embedded document store.
    pub path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("pdf-storage"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tutordesk.db"),
        }
    }
}

impl TutordeskConfig {
    /// Load configuration from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TutordeskError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| TutordeskError::ConfigParse(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from the given path, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TutordeskError::ConfigParse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// On Linux servers: `/etc/tutordesk/config.toml`
    /// For development: `~/.config/tutordesk/config.toml`
    #[must_use]
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/etc/tutordesk/config.toml")
        }
        #[cfg(not(target_os = "linux"))]
        {
            directories::ProjectDirs::from("", "", "tutordesk")
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("tutordesk.toml"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TutordeskConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.root, PathBuf::from("pdf-storage"));
        assert_eq!(config.database.path, PathBuf::from("tutordesk.db"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = TutordeskConfig::load_or_default(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = TutordeskConfig::default();
        config.server.port = 8080;
        config.storage.root = PathBuf::from("invoices");
        config.save(&path).unwrap();

        let loaded = TutordeskConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.storage.root, PathBuf::from("invoices"));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = TutordeskConfig::load(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(TutordeskError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "server = \"not a table\"").unwrap();

        let result = TutordeskConfig::load(&path);
        assert!(matches!(result, Err(TutordeskError::ConfigParse(_))));
    }
}
