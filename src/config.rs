//! Configuration file parser for ~/.config/steamdash/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use crate::api::Endpoints;
use crate::dashboard::{DrilldownSampling, ViewOptions};
use crate::util::validate_http_url;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable that overrides `api_key` from the file.
pub const API_KEY_ENV: &str = "STEAM_API_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A value parsed but is not usable (bad URL, zero sample, ...).
    #[error("Invalid config value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Steam Web API (catalog).
    pub api_base_url: String,

    /// Base URL of the Steam storefront (details, store pages).
    pub store_base_url: String,

    /// Steam Web API key. `STEAM_API_KEY` takes precedence.
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,

    /// How many catalog entries (from the front) to enrich.
    pub sample_size: usize,

    /// Pause between consecutive detail requests, in milliseconds.
    pub request_delay_ms: u64,

    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,

    /// Maximum number of games shown in a drilldown.
    pub drilldown_limit: usize,

    /// `"random"` (fresh subset per visit) or `"seeded"` (stable per genre).
    pub drilldown_sampling: DrilldownSampling,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Endpoints::DEFAULT_API_BASE.to_string(),
            store_base_url: Endpoints::DEFAULT_STORE_BASE.to_string(),
            api_key: None,
            sample_size: 100,
            request_delay_ms: 1000,
            request_timeout_secs: 30,
            drilldown_limit: 10,
            drilldown_sampling: DrilldownSampling::Random,
            theme: "dark".to_string(),
            keybindings: HashMap::new(),
        }
    }
}

/// Blank keys count as absent.
fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from))
}

const KNOWN_KEYS: [&str; 10] = [
    "api_base_url",
    "store_base_url",
    "api_key",
    "sample_size",
    "request_delay_ms",
    "request_timeout_secs",
    "drilldown_limit",
    "drilldown_sampling",
    "theme",
    "keybindings",
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            sample_size = config.sample_size,
            sampling = ?config.drilldown_sampling,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_base_url("api_base_url", &self.api_base_url)?;
        check_base_url("store_base_url", &self.store_base_url)?;

        if self.sample_size == 0 {
            return Err(ConfigError::Invalid {
                key: "sample_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.drilldown_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "drilldown_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve endpoint URLs, attaching the API key if one is configured.
    ///
    /// A bad base URL is reported under its own key.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        check_base_url("api_base_url", &self.api_base_url)?;
        check_base_url("store_base_url", &self.store_base_url)?;

        let endpoints = Endpoints::new(&self.api_base_url, &self.store_base_url).map_err(|e| {
            let key = if Url::parse(&self.api_base_url).is_err() {
                "api_base_url"
            } else {
                "store_base_url"
            };
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })?;
        Ok(endpoints.with_api_key(self.api_key()))
    }

    /// API key from `STEAM_API_KEY`, falling back to the config file.
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from)
            .or_else(|| self.api_key.clone())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            drilldown_limit: self.drilldown_limit,
            sampling: self.drilldown_sampling,
        }
    }
}

fn check_base_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    validate_http_url(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("steamdash_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.steampowered.com");
        assert_eq!(config.store_base_url, "https://store.steampowered.com");
        assert_eq!(config.sample_size, 100);
        assert_eq!(config.request_delay(), Duration::from_secs(1));
        assert_eq!(config.drilldown_limit, 10);
        assert_eq!(config.drilldown_sampling, DrilldownSampling::Random);
        assert_eq!(config.theme, "dark");
        assert!(config.keybindings.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/steamdash_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.sample_size, 100);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "sample_size = 25\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.sample_size, 25);
        assert_eq!(config.request_delay_ms, 1000);
        assert_eq!(config.drilldown_limit, 10);
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
api_base_url = "http://127.0.0.1:8080/steam"
store_base_url = "https://store.example.com"
api_key = "file-key"
sample_size = 40
request_delay_ms = 250
request_timeout_secs = 10
drilldown_limit = 5
drilldown_sampling = "seeded"
theme = "light"

[keybindings]
quit = "Ctrl+q"
back = "Backspace"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/steam");
        assert_eq!(config.sample_size, 40);
        assert_eq!(config.request_delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.view_options(),
            ViewOptions {
                drilldown_limit: 5,
                sampling: DrilldownSampling::Seeded,
            }
        );
        assert_eq!(config.theme, "light");
        assert_eq!(
            config.keybindings.get("back").map(String::as_str),
            Some("Backspace")
        );
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_sampling_rejected() {
        let path = write_config("bad_sampling", "drilldown_sampling = \"shuffle\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "sample_size = 3\nnot_a_key = true\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.sample_size, 3);
        cleanup(&path);
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let path = write_config("zero_sample", "sample_size = 0\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "sample_size", .. }));
        cleanup(&path);
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let config = Config {
            store_base_url: "ftp://store.example.com".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "store_base_url", .. }));
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config {
            api_key: Some(SecretString::from("super-secret-key-12345".to_string())),
            ..Config::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-key-12345"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_api_key_loaded_as_secret() {
        let path = write_config("secret_key", "api_key = \"file-key\"\n");
        let config = Config::load(&path).unwrap();
        let key = config.api_key.as_ref().map(|k| k.expose_secret().to_string());
        assert_eq!(key.as_deref(), Some("file-key"));
        assert!(!format!("{:?}", config).contains("file-key"));
        cleanup(&path);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let path = write_config("blank_key", "api_key = \"   \"\n");
        let config = Config::load(&path).unwrap();
        assert!(config.api_key.is_none());
        cleanup(&path);
    }

    #[test]
    fn test_endpoints_reports_offending_key() {
        let config = Config {
            store_base_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = config.endpoints().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "store_base_url", .. }));

        let config = Config {
            api_base_url: "mailto:nobody@example.com".to_string(),
            ..Config::default()
        };
        let err = config.endpoints().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "api_base_url", .. }));
    }

    #[test]
    fn test_endpoints_from_config() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9000".to_string(),
            store_base_url: "http://127.0.0.1:9001".to_string(),
            ..Config::default()
        };
        let endpoints = config.endpoints().unwrap();
        assert_eq!(
            endpoints.detail_url(5).as_str(),
            "http://127.0.0.1:9001/api/appdetails?appids=5"
        );
        assert_eq!(endpoints.store_base(), "http://127.0.0.1:9001/");
    }
}
