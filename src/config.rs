use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding a built front end, served at `/` when set
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Host/container path mapping. Leaving `user_home` unset disables it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Home root as the user sees it (e.g. /home/ana)
    #[serde(default)]
    pub user_home: Option<PathBuf>,

    /// Where that same root is mounted for this process
    #[serde(default = "default_service_home")]
    pub service_home: PathBuf,
}

fn default_service_home() -> PathBuf {
    PathBuf::from("/host-home")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            user_home: None,
            service_home: default_service_home(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".to_string(),
        "jpeg".to_string(),
        "png".to_string(),
        "gif".to_string(),
        "bmp".to_string(),
        "webp".to_string(),
    ]
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Also write a daily rolling log file here
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = match std::env::var_os("SIDETAG_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => Self::config_path(),
        };

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            if let Err(e) = config.save_to(&config_path) {
                // Logging is not up yet; read-only config dirs are common in containers
                eprintln!("Warning: could not write default config to {:?}: {}", config_path, e);
            }
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply `PORT`, `HOST_HOME` and `USER_HOME` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
        }
        if let Some(service_home) = lookup("HOST_HOME").filter(|v| !v.is_empty()) {
            self.paths.service_home = PathBuf::from(service_home);
        }
        if let Some(user_home) = lookup("USER_HOME") {
            self.paths.user_home = if user_home.is_empty() {
                None
            } else {
                Some(PathBuf::from(user_home))
            };
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sidetag")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.paths.service_home, PathBuf::from("/host-home"));
        assert!(config.paths.user_home.is_none());
        assert_eq!(config.scanner.image_extensions.len(), 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths]\nuser_home = \"/home/ana\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.paths.user_home, Some(PathBuf::from("/home/ana")));
        assert_eq!(config.paths.service_home, PathBuf::from("/host-home"));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.server.port = 8080;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "4000"),
            ("HOST_HOME", "/mnt/home"),
            ("USER_HOME", "/Users/ana"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.paths.service_home, PathBuf::from("/mnt/home"));
        assert_eq!(config.paths.user_home, Some(PathBuf::from("/Users/ana")));
    }

    #[test]
    fn test_empty_user_home_disables_translation() {
        let mut config = Config::default();
        config.paths.user_home = Some(PathBuf::from("/home/ana"));
        config
            .apply_overrides(|k| (k == "USER_HOME").then(String::new))
            .unwrap();
        assert!(config.paths.user_home.is_none());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }
}
