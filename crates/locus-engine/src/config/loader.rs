use super::schema::EngineConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory.
const LOCAL_CONFIG: &str = "locus.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// The file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Locations searched by [`ConfigLoader::load_default`], first match wins.
    pub fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(LOCAL_CONFIG)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".locus").join("config.yaml"));
        }
        paths
    }

    /// Load the first existing candidate, or defaults when there is none.
    pub async fn load_default() -> Result<EngineConfig, ConfigError> {
        match Self::candidates().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path).await,
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(EngineConfig::default())
            }
        }
    }

    pub async fn load_from(path: &Path) -> Result<EngineConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(path, &content)
    }

    /// Parse YAML read from `path`. Blank content is the default configuration.
    pub fn parse(path: &Path, content: &str) -> Result<EngineConfig, ConfigError> {
        if content.trim().is_empty() {
            tracing::warn!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(EngineConfig::default());
        }
        let config = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
