use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use store::{ObjectStoreConfig, StoreConfig};
use url::Url;

use crate::users::UserConfig;

pub const APP_NAME: &str = "fragments";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const OBJECTS_DIR_NAME: &str = "objects";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Port for the HTTP API
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Public base URL used in `Location` headers, the request host if not set
    #[serde(default)]
    pub api_url: Option<Url>,
    /// Storage backend
    #[serde(default)]
    pub store: StoreConfig,
    /// Users allowed to authenticate against the API
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

fn default_api_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            api_url: None,
            store: StoreConfig::default(),
            users: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the fragments directory (~/.fragments)
    pub fragments_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the fragments directory path (custom or default ~/.fragments)
    pub fn fragments_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Durable storage rooted in the fragments directory.
    pub fn local_store_config(fragments_dir: &std::path::Path) -> StoreConfig {
        StoreConfig::Durable {
            sqlite_path: Some(fragments_dir.join(DB_FILE_NAME)),
            objects: ObjectStoreConfig::Local {
                path: fragments_dir.join(OBJECTS_DIR_NAME),
            },
        }
    }

    /// Initialize a new fragments directory.
    ///
    /// Without an explicit config the store is durable and lives next to the
    /// config file.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let fragments_dir = Self::fragments_dir(custom_path)?;

        if fragments_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&fragments_dir)?;

        let config = config.unwrap_or_else(|| AppConfig {
            store: Self::local_store_config(&fragments_dir),
            ..AppConfig::default()
        });

        if let StoreConfig::Durable {
            objects: ObjectStoreConfig::Local { path },
            ..
        } = &config.store
        {
            fs::create_dir_all(path)?;
        }

        let config_path = fragments_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            fragments_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the fragments directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let fragments_dir = Self::fragments_dir(custom_path)?;

        if !fragments_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = fragments_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            fragments_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("fragments directory not initialized. Run 'fragments init' first")]
    NotInitialized,

    #[error("fragments directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
