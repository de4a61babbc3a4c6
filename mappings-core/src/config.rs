//! Mappings command configuration.
//!
//! Load order: the bundled defaults, then the file named by `MAPPINGS_CONFIG`
//! (or `config/ext/mappings.toml` when present), then the `MAPPINGS_*`
//! environment overrides. Keys missing from a file keep their default.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use mappings_data::{Channel, Namespace, NamespaceId};
use mappings_utils::checks::{AccessLists, AllowBan};
use mappings_utils::pagination::DEFAULT_TIMEOUT_SECS;

/// Bundled defaults, also used as documentation for the file format.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MAPPINGS_CONFIG";
/// Configuration file used when [`CONFIG_ENV_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/ext/mappings.toml";

/// Longest pagination timeout accepted, in seconds (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

const NAMESPACES_ENV_VAR: &str = "MAPPINGS_NAMESPACES";
const TIMEOUT_ENV_VAR: &str = "MAPPINGS_TIMEOUT";
const SNAPSHOT_ENV_VAR: &str = "MAPPINGS_SNAPSHOT";

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root of the mappings configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MappingsConfig {
    pub settings: Settings,
    pub categories: IdLists,
    pub channels: IdLists,
    pub guilds: IdLists,
    pub yarn: YarnSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Namespace ids to register commands for; unknown ids are skipped at startup.
    pub namespaces: Vec<String>,
    /// Pagination timeout in seconds.
    pub timeout: u64,
    /// Path of the mappings snapshot served to queries.
    pub snapshot: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespaces: NamespaceId::ALL
                .into_iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            timeout: DEFAULT_TIMEOUT_SECS,
            snapshot: PathBuf::from("data/mappings.json"),
        }
    }
}

/// Allowed and banned ids for one scope.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdLists {
    pub allowed: Vec<u64>,
    pub banned: Vec<u64>,
}

impl IdLists {
    fn to_allow_ban(&self) -> AllowBan {
        AllowBan::new(self.allowed.iter().copied(), self.banned.iter().copied())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct YarnSettings {
    /// Optional channels switched on, e.g. `patchwork`.
    pub channels: Vec<Channel>,
    pub default_channel: Channel,
}

impl Default for YarnSettings {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            default_channel: Channel::Official,
        }
    }
}

impl MappingsConfig {
    /// Load configuration from disk and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match env::var(CONFIG_ENV_VAR) {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|path| path.exists()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("no mappings config file found, using bundled defaults");
                Self::from_toml(DEFAULT_CONFIG)?
            }
        };

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse one configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "mappings config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Apply `MAPPINGS_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup(NAMESPACES_ENV_VAR) {
            self.settings.namespaces = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV_VAR) {
            self.settings.timeout = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV_VAR} must be a number of seconds"))
            })?;
        }

        if let Some(raw) = lookup(SNAPSHOT_ENV_VAR) {
            self.settings.snapshot = PathBuf::from(raw.trim());
        }

        Ok(())
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.timeout == 0 {
            return Err(ConfigError::Invalid(
                "settings.timeout must be at least one second".to_owned(),
            ));
        }

        if self.settings.timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "settings.timeout must be at most {MAX_TIMEOUT_SECS} seconds"
            )));
        }

        let yarn = NamespaceId::Yarn.namespace();
        if let Some(channel) = self
            .yarn
            .channels
            .iter()
            .find(|channel| !yarn.supports(**channel))
        {
            return Err(ConfigError::Invalid(format!(
                "yarn.channels: `{channel}` is not a yarn channel"
            )));
        }

        Ok(())
    }

    /// Namespace ids as configured, unknown ones included.
    pub fn enabled_namespaces(&self) -> &[String] {
        &self.settings.namespaces
    }

    pub fn access_lists(&self) -> AccessLists {
        AccessLists {
            categories: self.categories.to_allow_ban(),
            channels: self.channels.to_allow_ban(),
            guilds: self.guilds.to_allow_ban(),
        }
    }

    /// Whether a channel may be used; only optional channels can be off.
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        !channel.is_optional() || self.yarn.channels.contains(&channel)
    }

    /// Channel used for a namespace when the caller names none.
    pub fn default_channel(&self, namespace: &Namespace) -> Option<Channel> {
        let configured = match namespace.key {
            NamespaceId::Yarn => Some(self.yarn.default_channel),
            _ => None,
        };

        namespace.default_channel(configured.filter(|channel| self.channel_enabled(*channel)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout)
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.settings.snapshot
    }
}
