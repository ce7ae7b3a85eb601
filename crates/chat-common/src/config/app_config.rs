//! Application configuration structs
//!
//! Loads configuration from environment variables and config files.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Environment variable prefix used by [`AppConfig::load`]
const ENV_PREFIX: &str = "CHAT";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub store: StoreConfig,
    pub storage: StorageConfig,
    pub location: LocationConfig,
    pub feed: FeedConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: default_env(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// Layout of the realtime keyed store
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root holding one partition per conversation
    pub messages_root: String,
    pub groups_root: String,
    pub profiles_root: String,
    /// Reserved child of a conversation partition holding typing flags
    pub typing_key: String,
    /// Profile records are keyed `{prefix}{participant id}`
    pub profile_key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            messages_root: "TheDiscussions".to_string(),
            groups_root: "GroupsTable".to_string(),
            profiles_root: "ProfilsTable".to_string(),
            typing_key: "typing".to_string(),
            profile_key_prefix: "Profil".to_string(),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base URL public object links are built from
    pub public_base_url: String,
    pub image_bucket: String,
    pub file_bucket: String,
    /// Content type for file uploads whose picker reported none
    pub default_file_content_type: String,
    pub max_file_size_mb: u32,
}

impl StorageConfig {
    /// Upload size limit in bytes
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:54321".to_string(),
            image_bucket: "profileImages".to_string(),
            file_bucket: "files".to_string(),
            default_file_content_type: "application/octet-stream".to_string(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

/// Shared location links
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub map_link_base: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            map_link_base: "https://www.google.com/maps".to_string(),
        }
    }
}

/// Feed rendering settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// UTC offset used to split the feed into calendar days
    pub utc_offset_minutes: i32,
}

impl FeedConfig {
    /// Day separator offset; out-of-range values fall back to UTC
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-feed".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_file_size() -> u32 {
    10
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Every setting has a default; set variables override it.
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(name) = env::var("APP_NAME") {
            config.app.name = name;
        }
        if let Some(app_env) = parse_var("APP_ENV")? {
            config.app.env = app_env;
        }

        if let Ok(root) = env::var("STORE_MESSAGES_ROOT") {
            config.store.messages_root = root;
        }
        if let Ok(root) = env::var("STORE_GROUPS_ROOT") {
            config.store.groups_root = root;
        }
        if let Ok(root) = env::var("STORE_PROFILES_ROOT") {
            config.store.profiles_root = root;
        }

        if let Ok(url) = env::var("STORAGE_PUBLIC_URL") {
            config.storage.public_base_url = url;
        }
        if let Ok(bucket) = env::var("STORAGE_IMAGE_BUCKET") {
            config.storage.image_bucket = bucket;
        }
        if let Ok(bucket) = env::var("STORAGE_FILE_BUCKET") {
            config.storage.file_bucket = bucket;
        }
        if let Some(size) = parse_var("MAX_FILE_SIZE_MB")? {
            config.storage.max_file_size_mb = size;
        }

        if let Ok(base) = env::var("MAP_LINK_BASE") {
            config.location.map_link_base = base;
        }
        if let Some(minutes) = parse_var("FEED_UTC_OFFSET_MINUTES")? {
            config.feed.utc_offset_minutes = minutes;
        }

        Ok(config)
    }

    /// Load configuration from a file, overridden by `CHAT__SECTION__KEY` variables
    ///
    /// A missing file is not an error; defaults fill whatever is not set.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
